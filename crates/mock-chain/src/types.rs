//! RPC parameter and response types for the mock chain.

use asset_auction_module::{CallResponse, ErrorKind};
use asset_auction_types::{Auction, AuctionId};
use serde::{Deserialize, Serialize};

/// Block info response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockInfo {
    pub height: u64,
    /// Calls executed so far, committed or not
    pub calls: u64,
}

/// Parameters for registering an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAssetParams {
    pub asset_id: String,
    pub owner: String,
}

/// Parameters for starting an auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartAuctionParams {
    pub asset_id: String,
    pub platforms: Vec<String>,
}

/// Parameters for binding an auction to platform auctions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindAuctionParams {
    pub auction_id: AuctionId,
    pub cross_auction_ids: Vec<String>,
}

/// Parameters for ending an auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndAuctionParams {
    pub auction_id: AuctionId,
    /// Highest bid per platform, in platform order
    pub highest_bids: Vec<u64>,
    /// Highest bidder per platform, in platform order
    pub highest_bidders: Vec<String>,
}

/// Result of a raw `call_submit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallResponseRpc {
    AssetAdded,
    AuctionStarted { auction_id: AuctionId },
    AuctionBound,
    AuctionEnding { auction_id: AuctionId },
    AuctionEnded { auction: Auction },
}

impl From<CallResponse> for CallResponseRpc {
    fn from(response: CallResponse) -> Self {
        match response {
            CallResponse::AssetAdded => CallResponseRpc::AssetAdded,
            CallResponse::AuctionStarted(auction_id) => CallResponseRpc::AuctionStarted { auction_id },
            CallResponse::AuctionBound => CallResponseRpc::AuctionBound,
            CallResponse::AuctionEnding(auction_id) => CallResponseRpc::AuctionEnding { auction_id },
            CallResponse::AuctionEnded(auction) => CallResponseRpc::AuctionEnded { auction },
        }
    }
}

/// JSON-RPC error code for each error class.
pub fn error_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Decode => -32602,
        ErrorKind::NotFound => -32004,
        ErrorKind::Validation => -32010,
        ErrorKind::Store => -32020,
    }
}

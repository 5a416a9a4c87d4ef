//! Call message types for the auction module.

use asset_auction_types::{AssetId, AuctionId};
use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::AuctionError;

/// Call messages for the auction module.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum AuctionCall {
    // === Assets ===
    /// Register an asset with its initial owner.
    AddAsset { asset_id: AssetId, owner: String },

    // === Auction Lifecycle ===
    /// Start an auction for an asset across the given platforms.
    StartAuction {
        asset_id: AssetId,
        platforms: Vec<String>,
    },

    /// Record the auction ids assigned by each platform.
    BindAuction {
        auction_id: AuctionId,
        cross_auction_ids: Vec<String>,
    },

    /// Mark the asset's pending auction as ending.
    MarkAuctionEnding { asset_id: AssetId },

    /// Resolve the auction from each platform's highest bid and transfer the asset.
    EndAuction {
        auction_id: AuctionId,
        highest_bids: Vec<u64>,
        highest_bidders: Vec<String>,
    },
}

impl AuctionCall {
    /// Decode a borsh-encoded call.
    pub fn decode(bytes: &[u8]) -> Result<Self, AuctionError> {
        borsh::from_slice(bytes).map_err(|e| AuctionError::Decode(e.to_string()))
    }

    pub fn encode(&self) -> std::io::Result<Vec<u8>> {
        borsh::to_vec(self)
    }

    /// Name of the operation, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AuctionCall::AddAsset { .. } => "add_asset",
            AuctionCall::StartAuction { .. } => "start_auction",
            AuctionCall::BindAuction { .. } => "bind_auction",
            AuctionCall::MarkAuctionEnding { .. } => "mark_auction_ending",
            AuctionCall::EndAuction { .. } => "end_auction",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_encoded_call() {
        let call = AuctionCall::EndAuction {
            auction_id: 1,
            highest_bids: vec![5, 9],
            highest_bidders: vec!["bob".into(), "carol".into()],
        };
        let bytes = call.encode().unwrap();
        assert_eq!(AuctionCall::decode(&bytes).unwrap(), call);
    }

    #[test]
    fn test_decode_truncated_payload() {
        let call = AuctionCall::MarkAuctionEnding {
            asset_id: AssetId::parse("A1").unwrap(),
        };
        let bytes = call.encode().unwrap();
        let result = AuctionCall::decode(&bytes[..bytes.len() - 1]);
        assert!(matches!(result, Err(AuctionError::Decode(_))));
    }

    #[test]
    fn test_decode_unknown_variant() {
        assert!(matches!(
            AuctionCall::decode(&[42]),
            Err(AuctionError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_asset_id() {
        // Variant 3 (MarkAuctionEnding) carrying an empty asset id.
        let mut bytes = vec![3u8];
        bytes.extend(borsh::to_vec(&String::new()).unwrap());
        assert!(matches!(
            AuctionCall::decode(&bytes),
            Err(AuctionError::Decode(_))
        ));
    }
}

//! Storage key layout.
//!
//! Every entity lives under `<namespace>_<id>`. Namespaces are distinct and
//! none is a prefix of another, so distinct `(namespace, id)` pairs never map
//! to the same key. The singleton keys share no namespace prefix either.

use asset_auction_types::{AssetId, AuctionId};

pub const ASSETS_NAMESPACE: &str = "assets";
pub const AUCTIONS_NAMESPACE: &str = "auctions";

/// Key of the last assigned auction id.
pub const LAST_AUCTION_ID_KEY: &str = "last_auction_id";

/// Key of the module parameters written at genesis.
pub const PARAMS_KEY: &str = "module_params";

pub fn asset_key(asset_id: &AssetId) -> String {
    format!("{}_{}", ASSETS_NAMESPACE, asset_id)
}

pub fn auction_key(auction_id: AuctionId) -> String {
    format!("{}_{}", AUCTIONS_NAMESPACE, auction_id)
}

//! Query handlers for the auction module.
//!
//! These functions provide read-only access to asset and auction state.

use asset_auction_types::{Asset, AssetId, Auction, AuctionId};
use serde::{Deserialize, Serialize};

use crate::error::AuctionError;
use crate::handlers::HandlerResult;
use crate::state::{get_asset, get_auction, get_last_auction_id, StateStore};

/// Query request types.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum AuctionQuery {
    /// Get asset by ID.
    GetAsset { asset_id: AssetId },

    /// Get auction details by ID.
    GetAuction { auction_id: AuctionId },

    /// Get the last assigned auction ID.
    GetLastAuctionId,
}

/// Query response types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionQueryResponse {
    Asset(Asset),
    Auction(Auction),
    LastAuctionId(AuctionId),
}

/// Handle a query.
pub fn handle_query<S: StateStore + ?Sized>(
    store: &S,
    query: AuctionQuery,
) -> HandlerResult<AuctionQueryResponse> {
    match query {
        AuctionQuery::GetAsset { asset_id } => {
            query_asset(store, &asset_id).map(AuctionQueryResponse::Asset)
        }
        AuctionQuery::GetAuction { auction_id } => {
            query_auction(store, auction_id).map(AuctionQueryResponse::Auction)
        }
        AuctionQuery::GetLastAuctionId => {
            Ok(AuctionQueryResponse::LastAuctionId(get_last_auction_id(store)?))
        }
    }
}

/// Stored asset record.
pub fn query_asset<S: StateStore + ?Sized>(store: &S, asset_id: &AssetId) -> HandlerResult<Asset> {
    get_asset(store, asset_id)?.ok_or_else(|| AuctionError::AssetNotFound(asset_id.clone()))
}

/// Stored auction record.
pub fn query_auction<S: StateStore + ?Sized>(
    store: &S,
    auction_id: AuctionId,
) -> HandlerResult<Auction> {
    get_auction(store, auction_id)?.ok_or(AuctionError::AuctionNotFound(auction_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{handle_add_asset, handle_start_auction, CallContext};
    use crate::state::InMemoryStore;

    #[test]
    fn test_get_asset_not_found() {
        let store = InMemoryStore::new();
        let result = handle_query(
            &store,
            AuctionQuery::GetAsset {
                asset_id: AssetId::parse("A1").unwrap(),
            },
        );
        assert!(matches!(result, Err(AuctionError::AssetNotFound(_))));
    }

    #[test]
    fn test_get_auction_not_found() {
        let store = InMemoryStore::new();
        let result = handle_query(&store, AuctionQuery::GetAuction { auction_id: 1 });
        assert!(matches!(result, Err(AuctionError::AuctionNotFound(1))));
    }

    #[test]
    fn test_queries_after_start() {
        let mut store = InMemoryStore::new();
        let ctx = CallContext::default();
        let id = AssetId::parse("A1").unwrap();
        handle_add_asset(&mut store, &ctx, id.clone(), "alice".into()).unwrap();
        handle_start_auction(&mut store, &ctx, &id, vec!["x".into()]).unwrap();

        let response = handle_query(&store, AuctionQuery::GetLastAuctionId).unwrap();
        assert_eq!(response, AuctionQueryResponse::LastAuctionId(1));

        match handle_query(&store, AuctionQuery::GetAsset { asset_id: id.clone() }).unwrap() {
            AuctionQueryResponse::Asset(asset) => assert_eq!(asset.pending_auction_id, Some(1)),
            other => panic!("unexpected response: {:?}", other),
        }

        match handle_query(&store, AuctionQuery::GetAuction { auction_id: 1 }).unwrap() {
            AuctionQueryResponse::Auction(auction) => assert_eq!(auction.asset_id, id),
            other => panic!("unexpected response: {:?}", other),
        }
    }
}

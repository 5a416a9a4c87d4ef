//! End-to-end integration tests for the asset auction workspace.
//!
//! These tests exercise the full lifecycle against an in-memory ledger,
//! committing each call as one unit the way the host does:
//! 1. Asset registration
//! 2. Auction start
//! 3. Platform binding
//! 4. Closing
//! 5. Resolution and ownership transfer

#[cfg(test)]
mod tests {
    use asset_auction_client::encode_call_hex;
    use asset_auction_module::queries::{query_asset, query_auction};
    use asset_auction_module::state::get_last_auction_id;
    use asset_auction_module::{
        atomically, handlers, AuctionCall, AuctionError, AuctionGenesisConfig, CallContext,
        CallResponse, DuplicateAssetPolicy, GenesisAsset, HandlerResult, InMemoryStore,
    };
    use asset_auction_types::{AssetId, AuctionStatus};

    /// Minimal host: decodes a wire payload and commits the call atomically.
    struct Host {
        store: InMemoryStore,
        calls: u64,
    }

    impl Host {
        fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                calls: 0,
            }
        }

        fn with_genesis(config: AuctionGenesisConfig) -> Self {
            let mut host = Self::new();
            config.validate().unwrap();
            config.apply(&mut host.store).unwrap();
            host
        }

        fn submit(&mut self, call: AuctionCall) -> HandlerResult<CallResponse> {
            let payload = encode_call_hex(&call).unwrap();
            let bytes = hex::decode(payload).unwrap();
            let call = AuctionCall::decode(&bytes)?;

            self.calls += 1;
            let ctx = CallContext {
                tx_id: format!("tx-{}", self.calls),
                block_height: self.calls,
            };
            atomically(&mut self.store, |tx| handlers::dispatch(tx, &ctx, call))
        }
    }

    fn asset_id(raw: &str) -> AssetId {
        AssetId::parse(raw).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn add_asset(id: &str, owner: &str) -> AuctionCall {
        AuctionCall::AddAsset {
            asset_id: asset_id(id),
            owner: owner.into(),
        }
    }

    fn start_auction(id: &str, platforms: &[&str]) -> AuctionCall {
        AuctionCall::StartAuction {
            asset_id: asset_id(id),
            platforms: strings(platforms),
        }
    }

    /// Test the complete auction flow.
    #[test]
    fn test_full_auction_flow() {
        let mut host = Host::new();

        // ========================================
        // Phase 1: Register asset
        // ========================================

        host.submit(add_asset("A1", "alice")).unwrap();
        let asset = query_asset(&host.store, &asset_id("A1")).unwrap();
        assert_eq!(asset.owner, "alice");
        assert_eq!(asset.pending_auction_id, None);

        // ========================================
        // Phase 2: Start auction
        // ========================================

        let response = host.submit(start_auction("A1", &["x", "y"])).unwrap();
        assert_eq!(response, CallResponse::AuctionStarted(1));
        assert_eq!(
            query_asset(&host.store, &asset_id("A1")).unwrap().pending_auction_id,
            Some(1)
        );

        // ========================================
        // Phase 3: Bind to platform auctions
        // ========================================

        host.submit(AuctionCall::BindAuction {
            auction_id: 1,
            cross_auction_ids: strings(&["ext-x-9", "ext-y-9"]),
        })
        .unwrap();
        let auction = query_auction(&host.store, 1).unwrap();
        assert_eq!(auction.status, AuctionStatus::Bind);
        assert_eq!(auction.cross_auction_ids, strings(&["ext-x-9", "ext-y-9"]));

        // ========================================
        // Phase 4: Close bidding
        // ========================================

        let response = host
            .submit(AuctionCall::MarkAuctionEnding {
                asset_id: asset_id("A1"),
            })
            .unwrap();
        assert_eq!(response, CallResponse::AuctionEnding(1));
        assert_eq!(query_auction(&host.store, 1).unwrap().status, AuctionStatus::Ending);

        // ========================================
        // Phase 5: Resolve and transfer
        // ========================================

        let response = host
            .submit(AuctionCall::EndAuction {
                auction_id: 1,
                highest_bids: vec![5, 9],
                highest_bidders: strings(&["bob", "carol"]),
            })
            .unwrap();

        let ended = match response {
            CallResponse::AuctionEnded(auction) => auction,
            other => panic!("unexpected response: {:?}", other),
        };
        assert_eq!(ended.status, AuctionStatus::Ended);
        assert_eq!(ended.highest_bidder, "carol");
        assert_eq!(ended.highest_bid, 9);
        assert_eq!(ended.highest_bid_platform, "y");
        assert_eq!(query_auction(&host.store, 1).unwrap(), ended);

        let asset = query_asset(&host.store, &asset_id("A1")).unwrap();
        assert_eq!(asset.owner, "carol");
        assert_eq!(asset.pending_auction_id, None);
    }

    /// An asset can be auctioned again once its previous auction ends.
    #[test]
    fn test_resale_after_auction() {
        let mut host = Host::new();
        host.submit(add_asset("A1", "alice")).unwrap();

        host.submit(start_auction("A1", &["x"])).unwrap();
        host.submit(AuctionCall::EndAuction {
            auction_id: 1,
            highest_bids: vec![3],
            highest_bidders: strings(&["bob"]),
        })
        .unwrap();

        let response = host.submit(start_auction("A1", &["x", "y"])).unwrap();
        assert_eq!(response, CallResponse::AuctionStarted(2));
        host.submit(AuctionCall::EndAuction {
            auction_id: 2,
            highest_bids: vec![4, 4],
            highest_bidders: strings(&["dave", "erin"]),
        })
        .unwrap();

        let asset = query_asset(&host.store, &asset_id("A1")).unwrap();
        assert_eq!(asset.owner, "dave");
        assert_eq!(query_auction(&host.store, 1).unwrap().highest_bidder, "bob");
        assert_eq!(query_auction(&host.store, 2).unwrap().highest_bid_platform, "x");
    }

    /// A rejected start leaves asset, auctions, and counter untouched.
    #[test]
    fn test_conflicting_start_leaves_ledger_unchanged() {
        let mut host = Host::new();
        host.submit(add_asset("A1", "alice")).unwrap();
        host.submit(start_auction("A1", &["x"])).unwrap();

        let before = host.store.clone();
        let result = host.submit(start_auction("A1", &["y"]));

        assert!(matches!(result, Err(AuctionError::PendingAuctionExists { .. })));
        assert_eq!(get_last_auction_id(&host.store).unwrap(), 1);
        assert_eq!(
            query_asset(&host.store, &asset_id("A1")).unwrap(),
            query_asset(&before, &asset_id("A1")).unwrap()
        );
        assert_eq!(query_auction(&host.store, 1).unwrap(), query_auction(&before, 1).unwrap());
        assert!(matches!(
            query_auction(&host.store, 2),
            Err(AuctionError::AuctionNotFound(2))
        ));
    }

    /// Auction ids are global, not per asset.
    #[test]
    fn test_auction_ids_sequential_across_assets() {
        let mut host = Host::new();
        for (id, owner) in [("A1", "alice"), ("A2", "bob"), ("A3", "carol")] {
            host.submit(add_asset(id, owner)).unwrap();
        }

        let mut ids = Vec::new();
        for id in ["A2", "A1", "A3"] {
            match host.submit(start_auction(id, &["x"])).unwrap() {
                CallResponse::AuctionStarted(auction_id) => ids.push(auction_id),
                other => panic!("unexpected response: {:?}", other),
            }
        }

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(query_auction(&host.store, 1).unwrap().asset_id, asset_id("A2"));
    }

    /// Mismatched bind leaves the auction in its previous state.
    #[test]
    fn test_bind_length_mismatch_rejected() {
        let mut host = Host::new();
        host.submit(add_asset("A1", "alice")).unwrap();
        host.submit(start_auction("A1", &["x", "y", "z"])).unwrap();

        let result = host.submit(AuctionCall::BindAuction {
            auction_id: 1,
            cross_auction_ids: strings(&["ext-x", "ext-y"]),
        });

        assert!(matches!(result, Err(AuctionError::LengthMismatch { .. })));
        let auction = query_auction(&host.store, 1).unwrap();
        assert_eq!(auction.status, AuctionStatus::Started);
        assert_eq!(auction.cross_auction_ids.len(), 3);
    }

    /// Genesis assets and policy are honored by later calls.
    #[test]
    fn test_genesis_assets_and_overwrite_policy() {
        let mut config = AuctionGenesisConfig::default();
        config.params.duplicate_asset_policy = DuplicateAssetPolicy::Overwrite;
        config.assets = vec![GenesisAsset {
            id: "G1".into(),
            owner: "treasury".into(),
        }];
        let mut host = Host::with_genesis(config);

        assert_eq!(query_asset(&host.store, &asset_id("G1")).unwrap().owner, "treasury");
        host.submit(add_asset("G1", "alice")).unwrap();
        assert_eq!(query_asset(&host.store, &asset_id("G1")).unwrap().owner, "alice");
    }

    /// A failed end keeps the auction pending on the asset.
    #[test]
    fn test_end_auction_rejected_keeps_pending() {
        let mut host = Host::new();
        host.submit(add_asset("A1", "alice")).unwrap();
        host.submit(start_auction("A1", &["x", "y"])).unwrap();

        let result = host.submit(AuctionCall::EndAuction {
            auction_id: 1,
            highest_bids: vec![5],
            highest_bidders: strings(&["bob"]),
        });

        assert!(matches!(result, Err(AuctionError::LengthMismatch { .. })));
        let asset = query_asset(&host.store, &asset_id("A1")).unwrap();
        assert_eq!(asset.owner, "alice");
        assert_eq!(asset.pending_auction_id, Some(1));
        assert_eq!(query_auction(&host.store, 1).unwrap().status, AuctionStatus::Started);
    }
}

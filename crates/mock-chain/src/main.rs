//! Mock chain server for local testing of the asset auction module.
//!
//! This provides a JSON-RPC server that hosts the module over an in-memory
//! store. Every call runs inside its own transaction and commits only if
//! the handler succeeds. Calls are serialized by the chain write lock.

use anyhow::{Context, Result};
use clap::Parser;
use jsonrpsee::core::async_trait;
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::server::Server;
use jsonrpsee::types::ErrorObjectOwned;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use asset_auction_module::keys::ASSETS_NAMESPACE;
use asset_auction_module::state::{get_asset, Transaction};
use asset_auction_module::{
    atomically, handlers, queries, AuctionCall, AuctionError, AuctionGenesisConfig, CallContext,
    HandlerResult, InMemoryStore,
};
use asset_auction_types::{Asset, AssetId, Auction, AuctionId};

mod types;
use types::*;

#[derive(Parser)]
#[command(name = "mock-chain")]
#[command(about = "Local JSON-RPC host for the asset auction module")]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:9944")]
    listen: SocketAddr,

    /// Genesis configuration (JSON)
    #[arg(long)]
    genesis: Option<PathBuf>,
}

/// Shared chain state.
struct ChainState {
    /// Committed module state
    store: InMemoryStore,
    /// Number of committed calls
    block_height: u64,
    /// Number of executed calls
    calls: u64,
}

impl ChainState {
    fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            block_height: 0,
            calls: 0,
        }
    }

    fn next_context(&mut self) -> CallContext {
        self.calls += 1;
        CallContext {
            tx_id: format!("0x{:016x}", self.calls),
            block_height: self.block_height + 1,
        }
    }
}

/// RPC API definition for the mock chain.
#[rpc(server)]
pub trait MockChainApi {
    // ============ Asset Methods ============

    /// Register a new asset.
    #[method(name = "asset_add")]
    async fn asset_add(&self, params: AddAssetParams) -> Result<bool, ErrorObjectOwned>;

    // ============ Auction Methods ============

    /// Start an auction for an asset.
    #[method(name = "auction_start")]
    async fn auction_start(&self, params: StartAuctionParams) -> Result<u64, ErrorObjectOwned>;

    /// Bind an auction to its platform auctions.
    #[method(name = "auction_bind")]
    async fn auction_bind(&self, params: BindAuctionParams) -> Result<bool, ErrorObjectOwned>;

    /// Mark an asset's pending auction as ending.
    #[method(name = "auction_markEnding")]
    async fn auction_mark_ending(&self, asset_id: String) -> Result<u64, ErrorObjectOwned>;

    /// Resolve an auction and transfer the asset.
    #[method(name = "auction_end")]
    async fn auction_end(&self, params: EndAuctionParams) -> Result<Auction, ErrorObjectOwned>;

    /// Submit a hex-encoded borsh `AuctionCall`.
    #[method(name = "call_submit")]
    async fn call_submit(&self, payload: String) -> Result<CallResponseRpc, ErrorObjectOwned>;

    // ============ Query Methods ============

    /// Get current block info.
    #[method(name = "chain_getBlockInfo")]
    async fn chain_get_block_info(&self) -> Result<BlockInfo, ErrorObjectOwned>;

    /// Get asset by ID.
    #[method(name = "query_getAsset")]
    async fn query_get_asset(&self, asset_id: String) -> Result<Asset, ErrorObjectOwned>;

    /// Get auction by ID.
    #[method(name = "query_getAuction")]
    async fn query_get_auction(&self, auction_id: u64) -> Result<Auction, ErrorObjectOwned>;

    /// Get the last assigned auction ID.
    #[method(name = "query_getLastAuctionId")]
    async fn query_get_last_auction_id(&self) -> Result<u64, ErrorObjectOwned>;

    /// List all assets.
    #[method(name = "query_listAssets")]
    async fn query_list_assets(&self) -> Result<Vec<Asset>, ErrorObjectOwned>;
}

/// Implementation of the mock chain RPC server.
struct MockChainServer {
    state: Arc<RwLock<ChainState>>,
}

impl MockChainServer {
    fn new(store: InMemoryStore) -> Self {
        Self {
            state: Arc::new(RwLock::new(ChainState::new(store))),
        }
    }

    fn rpc_error(err: &AuctionError) -> ErrorObjectOwned {
        ErrorObjectOwned::owned(error_code(err.kind()), err.to_string(), None::<()>)
    }

    fn parse_asset_id(raw: &str) -> Result<AssetId, ErrorObjectOwned> {
        AssetId::parse(raw).map_err(|e| Self::rpc_error(&AuctionError::from(e)))
    }

    /// Run one call in its own transaction, committing on success.
    fn execute<T>(
        &self,
        op: &'static str,
        call: impl FnOnce(&mut Transaction<'_, InMemoryStore>, &CallContext) -> HandlerResult<T>,
    ) -> Result<T, ErrorObjectOwned> {
        let mut guard = self.state.write();
        let chain = &mut *guard;
        let ctx = chain.next_context();

        match atomically(&mut chain.store, |tx| call(tx, &ctx)) {
            Ok(value) => {
                chain.block_height = ctx.block_height;
                info!(op, tx = %ctx.tx_id, height = chain.block_height, "Call committed");
                Ok(value)
            }
            Err(e) => {
                warn!(op, tx = %ctx.tx_id, error = %e, "Call rejected");
                Err(Self::rpc_error(&e))
            }
        }
    }

    fn read<T>(&self, query: impl FnOnce(&InMemoryStore) -> HandlerResult<T>) -> Result<T, ErrorObjectOwned> {
        let state = self.state.read();
        query(&state.store).map_err(|e| Self::rpc_error(&e))
    }
}

#[async_trait]
impl MockChainApiServer for MockChainServer {
    async fn asset_add(&self, params: AddAssetParams) -> Result<bool, ErrorObjectOwned> {
        let asset_id = Self::parse_asset_id(&params.asset_id)?;
        self.execute("asset_add", |tx, ctx| {
            handlers::handle_add_asset(tx, ctx, asset_id, params.owner)
        })?;
        Ok(true)
    }

    async fn auction_start(&self, params: StartAuctionParams) -> Result<u64, ErrorObjectOwned> {
        let asset_id = Self::parse_asset_id(&params.asset_id)?;
        self.execute("auction_start", |tx, ctx| {
            handlers::handle_start_auction(tx, ctx, &asset_id, params.platforms)
        })
    }

    async fn auction_bind(&self, params: BindAuctionParams) -> Result<bool, ErrorObjectOwned> {
        self.execute("auction_bind", |tx, ctx| {
            handlers::handle_bind_auction(tx, ctx, params.auction_id, params.cross_auction_ids)
        })?;
        Ok(true)
    }

    async fn auction_mark_ending(&self, asset_id: String) -> Result<u64, ErrorObjectOwned> {
        let asset_id = Self::parse_asset_id(&asset_id)?;
        self.execute("auction_markEnding", |tx, ctx| {
            handlers::handle_mark_auction_ending(tx, ctx, &asset_id)
        })
    }

    async fn auction_end(&self, params: EndAuctionParams) -> Result<Auction, ErrorObjectOwned> {
        self.execute("auction_end", |tx, ctx| {
            handlers::handle_end_auction(
                tx,
                ctx,
                params.auction_id,
                &params.highest_bids,
                &params.highest_bidders,
            )
        })
    }

    async fn call_submit(&self, payload: String) -> Result<CallResponseRpc, ErrorObjectOwned> {
        let bytes = hex::decode(payload.trim_start_matches("0x"))
            .map_err(|e| Self::rpc_error(&AuctionError::Decode(format!("invalid hex: {}", e))))?;
        let call = AuctionCall::decode(&bytes).map_err(|e| Self::rpc_error(&e))?;
        let op = call.name();

        let response = self.execute(op, |tx, ctx| handlers::dispatch(tx, ctx, call))?;
        Ok(response.into())
    }

    async fn chain_get_block_info(&self) -> Result<BlockInfo, ErrorObjectOwned> {
        let state = self.state.read();
        Ok(BlockInfo {
            height: state.block_height,
            calls: state.calls,
        })
    }

    async fn query_get_asset(&self, asset_id: String) -> Result<Asset, ErrorObjectOwned> {
        let asset_id = Self::parse_asset_id(&asset_id)?;
        self.read(|store| queries::query_asset(store, &asset_id))
    }

    async fn query_get_auction(&self, auction_id: AuctionId) -> Result<Auction, ErrorObjectOwned> {
        self.read(|store| queries::query_auction(store, auction_id))
    }

    async fn query_get_last_auction_id(&self) -> Result<u64, ErrorObjectOwned> {
        self.read(|store| Ok(asset_auction_module::state::get_last_auction_id(store)?))
    }

    async fn query_list_assets(&self) -> Result<Vec<Asset>, ErrorObjectOwned> {
        self.read(|store| {
            let prefix = format!("{}_", ASSETS_NAMESPACE);
            let mut assets = Vec::new();
            for key in store.keys_with_prefix(&prefix) {
                let asset_id = AssetId::parse(&key[prefix.len()..])?;
                if let Some(asset) = get_asset(store, &asset_id)? {
                    assets.push(asset);
                }
            }
            Ok(assets)
        })
    }
}

fn load_genesis(path: Option<&PathBuf>) -> Result<InMemoryStore> {
    let mut store = InMemoryStore::new();
    let config = match path {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("reading genesis {}", path.display()))?;
            serde_json::from_str::<AuctionGenesisConfig>(&data)
                .with_context(|| format!("parsing genesis {}", path.display()))?
        }
        None => AuctionGenesisConfig::default(),
    };
    config.validate()?;
    config.apply(&mut store)?;
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mock_chain=info".parse()?)
                .add_directive("asset_auction_module=info".parse()?)
                .add_directive("jsonrpsee=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let store = load_genesis(cli.genesis.as_ref())?;

    info!("Starting mock chain server on {}", cli.listen);

    let server = Server::builder().build(cli.listen).await?;
    let handle = server.start(MockChainServer::new(store).into_rpc());

    info!("Mock chain server running. Press Ctrl+C to stop.");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    handle.stop()?;
    handle.stopped().await;

    Ok(())
}

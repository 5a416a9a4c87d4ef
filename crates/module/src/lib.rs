//! Asset ownership and multi-platform auction module.
//!
//! This module implements the ledger logic for transferring assets through
//! auctions that run on several external platforms at once:
//!
//! - Asset registration
//! - Auction start, platform binding, and closing
//! - Winner selection across platforms and ownership transfer
//!
//! # Architecture
//!
//! The module keeps no state between calls. Every handler takes the store
//! and context of the current call as arguments.
//! - `call`: Message types for state-changing operations
//! - `handlers`: Lifecycle state machine for processing calls
//! - `queries`: Read-only state access
//! - `state`: Store trait, call-scoped transactions, record registries
//! - `keys`: Storage key layout
//! - `genesis`: Initial configuration
//! - `error`: Error types
//!
//! # Example
//!
//! ```ignore
//! use asset_auction_module::{handlers, state::{atomically, InMemoryStore}, CallContext};
//!
//! let mut store = InMemoryStore::new();
//! let ctx = CallContext::default();
//!
//! atomically(&mut store, |tx| handlers::handle_add_asset(tx, &ctx, asset_id.clone(), "alice".into()))?;
//! let auction_id = atomically(&mut store, |tx| {
//!     handlers::handle_start_auction(tx, &ctx, &asset_id, vec!["x".into(), "y".into()])
//! })?;
//! ```

pub mod call;
pub mod error;
pub mod genesis;
pub mod handlers;
pub mod keys;
pub mod queries;
pub mod state;

pub use call::AuctionCall;
pub use error::{AuctionError, ErrorKind, StoreError};
pub use genesis::{AuctionGenesisConfig, DuplicateAssetPolicy, GenesisAsset, ModuleParams};
pub use handlers::{CallContext, CallResponse, HandlerResult};
pub use queries::{AuctionQuery, AuctionQueryResponse};
pub use state::{atomically, InMemoryStore, StateStore, Transaction};

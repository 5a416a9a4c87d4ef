//! Auction module error types.

use thiserror::Error;

use asset_auction_types::{AssetId, AuctionId, AuctionStatus, IdError};

/// Failure of the underlying key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Read failed for key {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Write failed for key {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("Corrupt record under key {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Error classes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Decode,
    Store,
}

/// Errors that can occur in the auction module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("Asset not found: {0}")]
    AssetNotFound(AssetId),

    #[error("Auction not found: {0}")]
    AuctionNotFound(AuctionId),

    #[error("Asset {0} has no pending auction")]
    NoPendingAuction(AssetId),

    #[error("Pending auction exists: asset {asset_id} is in auction {auction_id}")]
    PendingAuctionExists {
        asset_id: AssetId,
        auction_id: AuctionId,
    },

    #[error("Invalid status transition for auction {auction_id}: {from} -> {to}")]
    InvalidTransition {
        auction_id: AuctionId,
        from: AuctionStatus,
        to: AuctionStatus,
    },

    #[error("Length mismatch for {field}: expected {expected}, got {got}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invalid auction result: asset {asset_id} is not pending on auction {auction_id}")]
    AuctionResultMismatch {
        asset_id: AssetId,
        auction_id: AuctionId,
    },

    #[error("Asset already exists: {0}")]
    DuplicateAsset(AssetId),

    #[error("Auction needs at least one platform")]
    NoPlatforms,

    #[error("Too many platforms: limit {max}, got {got}")]
    TooManyPlatforms { max: usize, got: usize },

    #[error("Auction id space exhausted after {0}")]
    AuctionIdOverflow(AuctionId),

    #[error("Invalid asset id: {0}")]
    InvalidAssetId(#[from] IdError),

    #[error("Malformed call payload: {0}")]
    Decode(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AuctionError {
    /// Class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuctionError::AssetNotFound(_)
            | AuctionError::AuctionNotFound(_)
            | AuctionError::NoPendingAuction(_) => ErrorKind::NotFound,
            AuctionError::PendingAuctionExists { .. }
            | AuctionError::InvalidTransition { .. }
            | AuctionError::LengthMismatch { .. }
            | AuctionError::AuctionResultMismatch { .. }
            | AuctionError::DuplicateAsset(_)
            | AuctionError::NoPlatforms
            | AuctionError::TooManyPlatforms { .. }
            | AuctionError::AuctionIdOverflow(_) => ErrorKind::Validation,
            AuctionError::InvalidAssetId(_) | AuctionError::Decode(_) => ErrorKind::Decode,
            AuctionError::Store(_) => ErrorKind::Store,
        }
    }
}

//! Core type definitions for multi-platform asset auctions.
//!
//! This crate provides the shared data model used across the workspace:
//! asset and auction records, the auction status machine, and the codec
//! used to persist records in the key-value ledger.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =========================
// IDENTIFIERS
// =========================

/// Auction identifier, assigned sequentially starting at 1.
pub type AuctionId = u64;

/// Identifier of an asset.
///
/// Opaque to the core. Validated once when it enters the system so that
/// every value held internally is non-empty and free of whitespace and
/// control characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

/// Maximum accepted length of an asset identifier, in bytes.
pub const MAX_ASSET_ID_LEN: usize = 256;

/// Rejected identifier input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("Asset id is empty")]
    Empty,

    #[error("Asset id exceeds {MAX_ASSET_ID_LEN} bytes")]
    TooLong,

    #[error("Asset id contains whitespace or control characters")]
    InvalidCharacter,
}

impl AssetId {
    /// Parse an asset id from its textual form.
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        if raw.len() > MAX_ASSET_ID_LEN {
            return Err(IdError::TooLong);
        }
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(IdError::InvalidCharacter);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl BorshDeserialize for AssetId {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let raw = String::deserialize_reader(reader)?;
        Self::parse(&raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }
}

// =========================
// ASSET
// =========================

/// An owned item tracked by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    pub owner: String,

    /// Auction currently in progress for this asset.
    /// Persisted as `0` when there is none.
    #[serde(with = "pending_auction")]
    pub pending_auction_id: Option<AuctionId>,
}

impl Asset {
    /// A freshly registered asset with no auction in progress.
    pub fn new(id: AssetId, owner: impl Into<String>) -> Self {
        Self {
            id,
            owner: owner.into(),
            pending_auction_id: None,
        }
    }
}

mod pending_auction {
    use super::AuctionId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Option<AuctionId>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(id.unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<AuctionId>, D::Error> {
        let raw = AuctionId::deserialize(d)?;
        Ok((raw != 0).then_some(raw))
    }
}

// =========================
// AUCTION
// =========================

/// Auction lifecycle status.
///
/// Ordered; a status never moves backwards and `Ended` is terminal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub enum AuctionStatus {
    /// Created, platforms fixed, no cross-platform ids yet
    Started,
    /// Bound to auctions on the external platforms
    Bind,
    /// Bidding is closing on the external platforms
    Ending,
    /// Resolved, ownership transferred
    Ended,
}

impl AuctionStatus {
    /// Transition table for the auction state machine.
    pub fn can_transition_to(self, next: AuctionStatus) -> bool {
        use AuctionStatus::*;
        matches!(
            (self, next),
            (Started, Bind) | (Started, Ending) | (Bind, Ending) | (Started | Bind | Ending, Ended)
        )
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuctionStatus::Started => "Started",
            AuctionStatus::Bind => "Bind",
            AuctionStatus::Ending => "Ending",
            AuctionStatus::Ended => "Ended",
        };
        f.write_str(name)
    }
}

/// A multi-platform auction for a single asset.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: AuctionId,
    pub asset_id: AssetId,

    /// Participating platforms, fixed at start
    pub platforms: Vec<String>,

    /// Auction ids on each platform, positionally paired with `platforms`
    pub cross_auction_ids: Vec<String>,

    pub status: AuctionStatus,

    // Resolution (zero/empty until the auction ends)
    pub highest_bid: u64,
    pub highest_bidder: String,
    pub highest_bid_platform: String,
}

impl Auction {
    /// A new auction in `Started` with one empty cross-auction slot per platform.
    pub fn new(id: AuctionId, asset_id: AssetId, platforms: Vec<String>) -> Self {
        let cross_auction_ids = vec![String::new(); platforms.len()];
        Self {
            id,
            asset_id,
            platforms,
            cross_auction_ids,
            status: AuctionStatus::Started,
            highest_bid: 0,
            highest_bidder: String::new(),
            highest_bid_platform: String::new(),
        }
    }

    /// Whether a winner was recorded when the auction ended.
    pub fn has_winner(&self) -> bool {
        self.status == AuctionStatus::Ended && !self.highest_bidder.is_empty()
    }
}

// =========================
// RECORD CODEC
// =========================

/// Persisted record encoding failure.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to encode record: {0}")]
    Encode(String),

    #[error("Failed to decode record: {0}")]
    Decode(String),
}

/// Encode a record as a JSON object (field name to value).
pub fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(record).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a record previously written by [`encode_record`].
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

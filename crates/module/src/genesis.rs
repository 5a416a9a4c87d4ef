//! Genesis configuration for the auction module.
//!
//! This module defines the module parameters and the assets registered
//! when the ledger starts.

use asset_auction_types::{Asset, AssetId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

use crate::error::AuctionError;
use crate::state::{put_asset, set_params, StateStore};

/// What `AddAsset` does when the asset ID is already registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateAssetPolicy {
    /// Fail with a validation error
    #[default]
    Reject,
    /// Replace the stored record
    Overwrite,
}

/// Module parameters, persisted at genesis and read by every call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleParams {
    pub duplicate_asset_policy: DuplicateAssetPolicy,
    /// Maximum number of platforms in one auction
    pub max_platforms: u32,
}

impl Default for ModuleParams {
    fn default() -> Self {
        Self {
            duplicate_asset_policy: DuplicateAssetPolicy::Reject,
            max_platforms: 16,
        }
    }
}

/// An asset registered at genesis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenesisAsset {
    pub id: String,
    pub owner: String,
}

/// Genesis configuration for the auction module.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionGenesisConfig {
    pub params: ModuleParams,
    pub assets: Vec<GenesisAsset>,
}

impl AuctionGenesisConfig {
    /// Validate the genesis configuration.
    pub fn validate(&self) -> Result<(), GenesisValidationError> {
        if self.params.max_platforms == 0 {
            return Err(GenesisValidationError::InvalidParams(
                "max_platforms cannot be zero".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        for asset in &self.assets {
            AssetId::parse(&asset.id)
                .map_err(|e| GenesisValidationError::InvalidAsset(asset.id.clone(), e.to_string()))?;
            if !seen.insert(asset.id.as_str()) {
                return Err(GenesisValidationError::DuplicateAsset(asset.id.clone()));
            }
        }

        Ok(())
    }

    /// Write parameters and genesis assets into `store`.
    pub fn apply<S: StateStore + ?Sized>(&self, store: &mut S) -> Result<(), AuctionError> {
        set_params(store, &self.params)?;
        for genesis_asset in &self.assets {
            let id = AssetId::parse(&genesis_asset.id)?;
            put_asset(store, &Asset::new(id, genesis_asset.owner.clone()))?;
        }
        info!(assets = self.assets.len(), "Genesis applied");
        Ok(())
    }
}

/// Errors that can occur during genesis validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenesisValidationError {
    #[error("Invalid module parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid genesis asset {0}: {1}")]
    InvalidAsset(String, String),

    #[error("Duplicate genesis asset: {0}")]
    DuplicateAsset(String),
}

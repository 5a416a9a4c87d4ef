//! Typed JSON-RPC client for the mock chain.

use anyhow::Result;
use asset_auction_module::{AuctionCall, AuctionError};
use asset_auction_types::{Asset, AssetId, Auction, AuctionId};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::{Deserialize, Serialize};

/// Block info as reported by the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockInfo {
    pub height: u64,
    pub calls: u64,
}

/// Hex-encode a call for `call_submit`.
pub fn encode_call_hex(call: &AuctionCall) -> std::io::Result<String> {
    Ok(hex::encode(call.encode()?))
}

/// Decode a hex payload (optionally `0x`-prefixed) back into a call.
pub fn decode_call_hex(payload: &str) -> Result<AuctionCall, AuctionError> {
    let bytes = hex::decode(payload.trim_start_matches("0x"))
        .map_err(|e| AuctionError::Decode(format!("invalid hex: {}", e)))?;
    AuctionCall::decode(&bytes)
}

/// Client for the mock chain RPC API.
pub struct ChainClient {
    inner: HttpClient,
}

impl ChainClient {
    pub fn connect(url: &str) -> Result<Self> {
        Ok(Self {
            inner: HttpClientBuilder::default().build(url)?,
        })
    }

    pub async fn add_asset(&self, asset_id: &AssetId, owner: &str) -> Result<()> {
        let params = serde_json::json!({
            "asset_id": asset_id,
            "owner": owner,
        });
        let _: bool = self.inner.request("asset_add", rpc_params![params]).await?;
        Ok(())
    }

    pub async fn start_auction(&self, asset_id: &AssetId, platforms: &[String]) -> Result<AuctionId> {
        let params = serde_json::json!({
            "asset_id": asset_id,
            "platforms": platforms,
        });
        Ok(self.inner.request("auction_start", rpc_params![params]).await?)
    }

    pub async fn bind_auction(&self, auction_id: AuctionId, cross_auction_ids: &[String]) -> Result<()> {
        let params = serde_json::json!({
            "auction_id": auction_id,
            "cross_auction_ids": cross_auction_ids,
        });
        let _: bool = self.inner.request("auction_bind", rpc_params![params]).await?;
        Ok(())
    }

    pub async fn mark_auction_ending(&self, asset_id: &AssetId) -> Result<AuctionId> {
        Ok(self
            .inner
            .request("auction_markEnding", rpc_params![asset_id.as_str()])
            .await?)
    }

    pub async fn end_auction(
        &self,
        auction_id: AuctionId,
        highest_bids: &[u64],
        highest_bidders: &[String],
    ) -> Result<Auction> {
        let params = serde_json::json!({
            "auction_id": auction_id,
            "highest_bids": highest_bids,
            "highest_bidders": highest_bidders,
        });
        Ok(self.inner.request("auction_end", rpc_params![params]).await?)
    }

    /// Submit a hex-encoded call, returning the chain's response object.
    ///
    /// The payload is decoded locally first so malformed input never
    /// reaches the chain.
    pub async fn submit_call(&self, payload: &str) -> Result<(AuctionCall, serde_json::Value)> {
        let call = decode_call_hex(payload)?;
        let response = self
            .inner
            .request("call_submit", rpc_params![encode_call_hex(&call)?])
            .await?;
        Ok((call, response))
    }

    pub async fn get_asset(&self, asset_id: &AssetId) -> Result<Asset> {
        Ok(self
            .inner
            .request("query_getAsset", rpc_params![asset_id.as_str()])
            .await?)
    }

    pub async fn get_auction(&self, auction_id: AuctionId) -> Result<Auction> {
        Ok(self
            .inner
            .request("query_getAuction", rpc_params![auction_id])
            .await?)
    }

    pub async fn last_auction_id(&self) -> Result<AuctionId> {
        Ok(self
            .inner
            .request("query_getLastAuctionId", rpc_params![])
            .await?)
    }

    pub async fn list_assets(&self) -> Result<Vec<Asset>> {
        Ok(self.inner.request("query_listAssets", rpc_params![]).await?)
    }

    pub async fn block_info(&self) -> Result<BlockInfo> {
        Ok(self
            .inner
            .request("chain_getBlockInfo", rpc_params![])
            .await?)
    }
}

//! Call handlers for the auction module.
//!
//! These functions implement the asset and auction lifecycle. Each one
//! receives the store and context of the current call explicitly, reads
//! full snapshots, validates, and writes the updated snapshots back.
//!
//! Handlers that write more than one record (`start_auction`,
//! `end_auction`) rely on the host committing a call as one unit. Run
//! them inside [`crate::state::atomically`] or an equivalent host
//! transaction.

use asset_auction_types::{Asset, AssetId, Auction, AuctionId, AuctionStatus};
use tracing::{debug, info};

use crate::call::AuctionCall;
use crate::error::AuctionError;
use crate::genesis::DuplicateAssetPolicy;
use crate::state::{
    get_asset, get_auction, get_last_auction_id, get_params, put_asset, put_auction,
    set_last_auction_id, StateStore,
};

/// Context provided by the host for each call.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    /// Host transaction id, for logs
    pub tx_id: String,
    /// Current block height
    pub block_height: u64,
}

/// Result type for handlers.
pub type HandlerResult<T> = Result<T, AuctionError>;

/// Outcome of a dispatched call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallResponse {
    AssetAdded,
    AuctionStarted(AuctionId),
    AuctionBound,
    AuctionEnding(AuctionId),
    AuctionEnded(Auction),
}

/// Winning bid selected across platforms.
///
/// The default (bid 0, empty bidder and platform) is the result when no
/// platform reported a positive bid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WinningBid {
    pub bid: u64,
    pub bidder: String,
    pub platform: String,
}

/// Route a decoded call to its handler.
pub fn dispatch<S: StateStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    call: AuctionCall,
) -> HandlerResult<CallResponse> {
    debug!(tx = %ctx.tx_id, height = ctx.block_height, call = call.name(), "Dispatching call");
    match call {
        AuctionCall::AddAsset { asset_id, owner } => {
            handle_add_asset(store, ctx, asset_id, owner).map(|_| CallResponse::AssetAdded)
        }
        AuctionCall::StartAuction {
            asset_id,
            platforms,
        } => handle_start_auction(store, ctx, &asset_id, platforms).map(CallResponse::AuctionStarted),
        AuctionCall::BindAuction {
            auction_id,
            cross_auction_ids,
        } => handle_bind_auction(store, ctx, auction_id, cross_auction_ids)
            .map(|_| CallResponse::AuctionBound),
        AuctionCall::MarkAuctionEnding { asset_id } => {
            handle_mark_auction_ending(store, ctx, &asset_id).map(CallResponse::AuctionEnding)
        }
        AuctionCall::EndAuction {
            auction_id,
            highest_bids,
            highest_bidders,
        } => handle_end_auction(store, ctx, auction_id, &highest_bids, &highest_bidders)
            .map(CallResponse::AuctionEnded),
    }
}

fn load_asset<S: StateStore + ?Sized>(store: &S, asset_id: &AssetId) -> HandlerResult<Asset> {
    get_asset(store, asset_id)?.ok_or_else(|| AuctionError::AssetNotFound(asset_id.clone()))
}

fn load_auction<S: StateStore + ?Sized>(store: &S, auction_id: AuctionId) -> HandlerResult<Auction> {
    get_auction(store, auction_id)?.ok_or(AuctionError::AuctionNotFound(auction_id))
}

fn transition(auction: &mut Auction, next: AuctionStatus) -> HandlerResult<()> {
    if !auction.status.can_transition_to(next) {
        return Err(AuctionError::InvalidTransition {
            auction_id: auction.id,
            from: auction.status,
            to: next,
        });
    }
    auction.status = next;
    Ok(())
}

fn check_len(field: &'static str, expected: usize, got: usize) -> HandlerResult<()> {
    if expected != got {
        return Err(AuctionError::LengthMismatch {
            field,
            expected,
            got,
        });
    }
    Ok(())
}

/// Handle AddAsset call.
pub fn handle_add_asset<S: StateStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    asset_id: AssetId,
    owner: String,
) -> HandlerResult<()> {
    let params = get_params(store)?;

    if let Some(existing) = get_asset(store, &asset_id)? {
        match params.duplicate_asset_policy {
            DuplicateAssetPolicy::Reject => return Err(AuctionError::DuplicateAsset(asset_id)),
            // An asset in auction is never replaced out from under it.
            DuplicateAssetPolicy::Overwrite => {
                if let Some(auction_id) = existing.pending_auction_id {
                    return Err(AuctionError::PendingAuctionExists {
                        asset_id,
                        auction_id,
                    });
                }
            }
        }
    }

    let asset = Asset::new(asset_id, owner);
    put_asset(store, &asset)?;

    info!(tx = %ctx.tx_id, asset_id = %asset.id, owner = %asset.owner, "Asset added");
    Ok(())
}

/// Handle StartAuction call.
pub fn handle_start_auction<S: StateStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    asset_id: &AssetId,
    platforms: Vec<String>,
) -> HandlerResult<AuctionId> {
    let mut asset = load_asset(store, asset_id)?;

    if let Some(auction_id) = asset.pending_auction_id {
        return Err(AuctionError::PendingAuctionExists {
            asset_id: asset_id.clone(),
            auction_id,
        });
    }

    // Validate platforms
    if platforms.is_empty() {
        return Err(AuctionError::NoPlatforms);
    }
    let max = get_params(store)?.max_platforms as usize;
    if platforms.len() > max {
        return Err(AuctionError::TooManyPlatforms {
            max,
            got: platforms.len(),
        });
    }

    // Allocate auction ID
    let last_id = get_last_auction_id(store)?;
    let auction_id = last_id
        .checked_add(1)
        .ok_or(AuctionError::AuctionIdOverflow(last_id))?;
    let auction = Auction::new(auction_id, asset_id.clone(), platforms);

    put_auction(store, &auction)?;
    set_last_auction_id(store, auction_id)?;
    asset.pending_auction_id = Some(auction_id);
    put_asset(store, &asset)?;

    info!(
        tx = %ctx.tx_id,
        asset_id = %asset_id,
        auction_id,
        platforms = auction.platforms.len(),
        "Auction started"
    );
    Ok(auction_id)
}

/// Handle BindAuction call.
pub fn handle_bind_auction<S: StateStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    auction_id: AuctionId,
    cross_auction_ids: Vec<String>,
) -> HandlerResult<()> {
    let mut auction = load_auction(store, auction_id)?;

    check_len("cross_auction_ids", auction.platforms.len(), cross_auction_ids.len())?;
    transition(&mut auction, AuctionStatus::Bind)?;
    auction.cross_auction_ids = cross_auction_ids;
    put_auction(store, &auction)?;

    info!(tx = %ctx.tx_id, auction_id, "Auction bound to platforms");
    Ok(())
}

/// Handle MarkAuctionEnding call.
///
/// Returns the ID of the auction that was marked.
pub fn handle_mark_auction_ending<S: StateStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    asset_id: &AssetId,
) -> HandlerResult<AuctionId> {
    let asset = load_asset(store, asset_id)?;
    let auction_id = asset
        .pending_auction_id
        .ok_or_else(|| AuctionError::NoPendingAuction(asset_id.clone()))?;
    let mut auction = load_auction(store, auction_id)?;

    transition(&mut auction, AuctionStatus::Ending)?;
    put_auction(store, &auction)?;

    info!(tx = %ctx.tx_id, asset_id = %asset_id, auction_id, "Auction ending");
    Ok(auction_id)
}

/// Select the winning bid across platforms.
///
/// Positions are scanned in platform order and a bid wins only if it is
/// strictly greater than the best so far, so on a tie the lowest-index
/// platform keeps the win. Bids of 0 never win. Inputs must be positionally
/// paired; lengths are checked by the caller.
pub fn resolve_highest_bid(
    platforms: &[String],
    highest_bids: &[u64],
    highest_bidders: &[String],
) -> WinningBid {
    let mut best = WinningBid::default();

    for ((platform, &bid), bidder) in platforms.iter().zip(highest_bids).zip(highest_bidders) {
        if bid > best.bid {
            best = WinningBid {
                bid,
                bidder: bidder.clone(),
                platform: platform.clone(),
            };
        }
    }

    best
}

/// Handle EndAuction call.
///
/// Finalizes the auction and transfers the asset to the recorded highest
/// bidder. When no platform reported a bid above 0 the recorded bidder is
/// empty and so is the new owner.
pub fn handle_end_auction<S: StateStore + ?Sized>(
    store: &mut S,
    ctx: &CallContext,
    auction_id: AuctionId,
    highest_bids: &[u64],
    highest_bidders: &[String],
) -> HandlerResult<Auction> {
    let mut auction = load_auction(store, auction_id)?;

    let platforms = auction.platforms.len();
    check_len("highest_bids", platforms, highest_bids.len())?;
    check_len("highest_bidders", platforms, highest_bidders.len())?;
    transition(&mut auction, AuctionStatus::Ended)?;

    let mut asset = load_asset(store, &auction.asset_id)?;
    if asset.pending_auction_id != Some(auction_id) {
        return Err(AuctionError::AuctionResultMismatch {
            asset_id: asset.id,
            auction_id,
        });
    }

    let winner = resolve_highest_bid(&auction.platforms, highest_bids, highest_bidders);
    if winner.bidder.is_empty() {
        debug!(tx = %ctx.tx_id, auction_id, "No positive bid, asset released without an owner");
    }
    auction.highest_bid = winner.bid;
    auction.highest_bidder = winner.bidder;
    auction.highest_bid_platform = winner.platform;

    asset.owner = auction.highest_bidder.clone();
    asset.pending_auction_id = None;

    put_auction(store, &auction)?;
    put_asset(store, &asset)?;

    info!(
        tx = %ctx.tx_id,
        auction_id,
        asset_id = %asset.id,
        owner = %asset.owner,
        highest_bid = auction.highest_bid,
        platform = %auction.highest_bid_platform,
        "Auction ended"
    );
    Ok(auction)
}

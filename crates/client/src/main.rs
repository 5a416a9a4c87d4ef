//! CLI for driving asset auctions on the mock chain.
//!
//! This binary provides commands for:
//! - Registering assets
//! - Starting, binding, closing, and ending auctions
//! - Submitting pre-encoded calls
//! - Querying assets and auctions

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use asset_auction_client::ChainClient;
use asset_auction_types::{Asset, AssetId, Auction};

#[derive(Parser)]
#[command(name = "auction-cli")]
#[command(about = "CLI for multi-platform asset auctions")]
struct Cli {
    /// Mock chain RPC endpoint
    #[arg(long, default_value = "http://127.0.0.1:9944")]
    rpc: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new asset
    AddAsset {
        /// Asset ID
        #[arg(long)]
        asset_id: String,

        /// Initial owner
        #[arg(long)]
        owner: String,
    },

    /// Start an auction for an asset
    StartAuction {
        /// Asset ID
        #[arg(long)]
        asset_id: String,

        /// Participating platforms (comma-separated, in order)
        #[arg(long, value_delimiter = ',')]
        platforms: Vec<String>,
    },

    /// Record the auction ids assigned by each platform
    BindAuction {
        /// Auction ID
        #[arg(long)]
        auction_id: u64,

        /// Platform auction ids (comma-separated, in platform order)
        #[arg(long, value_delimiter = ',')]
        cross_auction_ids: Vec<String>,
    },

    /// Mark the asset's pending auction as ending
    MarkEnding {
        /// Asset ID
        #[arg(long)]
        asset_id: String,
    },

    /// End an auction with the highest bid from each platform
    EndAuction {
        /// Auction ID
        #[arg(long)]
        auction_id: u64,

        /// Highest bid per platform (comma-separated, in platform order)
        #[arg(long, value_delimiter = ',')]
        bids: Vec<u64>,

        /// Highest bidder per platform (comma-separated, in platform order)
        #[arg(long, value_delimiter = ',')]
        bidders: Vec<String>,
    },

    /// Submit a hex-encoded (borsh) call as-is
    Submit {
        /// Call payload, hex, optionally 0x-prefixed
        payload: String,
    },

    /// Get asset details
    GetAsset {
        /// Asset ID
        #[arg(long)]
        asset_id: String,
    },

    /// Get auction details
    GetAuction {
        /// Auction ID
        #[arg(long)]
        auction_id: u64,
    },

    /// List all assets
    ListAssets,

    /// Show chain height
    BlockInfo,
}

fn print_asset(asset: &Asset) {
    println!("Asset {}:", asset.id);
    println!("  Owner: {}", asset.owner);
    match asset.pending_auction_id {
        Some(id) => println!("  Pending Auction: {}", id),
        None => println!("  Pending Auction: none"),
    }
}

fn print_auction(auction: &Auction) {
    println!("Auction {}:", auction.id);
    println!("  Asset: {}", auction.asset_id);
    println!("  Status: {}", auction.status);
    for (platform, cross_id) in auction.platforms.iter().zip(&auction.cross_auction_ids) {
        if cross_id.is_empty() {
            println!("  Platform {}: (unbound)", platform);
        } else {
            println!("  Platform {}: {}", platform, cross_id);
        }
    }
    if auction.has_winner() {
        println!("  Highest Bid: {}", auction.highest_bid);
        println!("  Highest Bidder: {}", auction.highest_bidder);
        println!("  Winning Platform: {}", auction.highest_bid_platform);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("auction_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let client = ChainClient::connect(&cli.rpc)?;

    match cli.command {
        Commands::AddAsset { asset_id, owner } => {
            let asset_id = AssetId::parse(&asset_id)?;
            client.add_asset(&asset_id, &owner).await?;
            info!("Added asset {}", asset_id);
            println!("Asset {} registered to {}", asset_id, owner);
        }

        Commands::StartAuction {
            asset_id,
            platforms,
        } => {
            let asset_id = AssetId::parse(&asset_id)?;
            let auction_id = client.start_auction(&asset_id, &platforms).await?;
            info!("Started auction {} for asset {}", auction_id, asset_id);
            println!("Auction ID: {}", auction_id);
        }

        Commands::BindAuction {
            auction_id,
            cross_auction_ids,
        } => {
            client.bind_auction(auction_id, &cross_auction_ids).await?;
            println!("Auction {} bound", auction_id);
        }

        Commands::MarkEnding { asset_id } => {
            let asset_id = AssetId::parse(&asset_id)?;
            let auction_id = client.mark_auction_ending(&asset_id).await?;
            println!("Auction {} ending", auction_id);
        }

        Commands::EndAuction {
            auction_id,
            bids,
            bidders,
        } => {
            let auction = client.end_auction(auction_id, &bids, &bidders).await?;
            info!("Ended auction {}", auction_id);
            print_auction(&auction);
        }

        Commands::Submit { payload } => {
            let (call, response) = client.submit_call(&payload).await?;
            info!("Submitted {} call", call.name());
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::GetAsset { asset_id } => {
            let asset = client.get_asset(&AssetId::parse(&asset_id)?).await?;
            print_asset(&asset);
        }

        Commands::GetAuction { auction_id } => {
            let auction = client.get_auction(auction_id).await?;
            print_auction(&auction);
        }

        Commands::ListAssets => {
            let assets = client.list_assets().await?;
            if assets.is_empty() {
                println!("No assets found");
            } else {
                for asset in &assets {
                    print_asset(asset);
                }
            }
        }

        Commands::BlockInfo => {
            let info = client.block_info().await?;
            println!("Height: {}, calls: {}", info.height, info.calls);
        }
    }

    Ok(())
}

//! Client SDK for the asset auction mock chain.
//!
//! This crate provides a typed API for:
//! - Registering assets
//! - Driving auctions through start, bind, ending, and end
//! - Querying asset and auction records
//! - Submitting pre-encoded call payloads

pub mod rpc;

pub use rpc::{decode_call_hex, encode_call_hex, ChainClient};

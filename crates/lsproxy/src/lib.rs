//! `SymbolService` over the lsproxy HTTP API.

pub mod client;
mod wire;

pub use client::{LsproxyClient, LsproxyConfig};

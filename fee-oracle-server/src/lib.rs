//! Fee Oracle Server - mempool ingestion and fee estimation API
//!
//! Library surface of the server binary, exposed so integration tests can
//! drive the router, cache, and ingestion loop directly.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod server;
pub mod service;

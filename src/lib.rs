//! coinvault - multi-network key vault and sync engine
//!
//! Holds user key pairs for several coin networks, encrypts private keys
//! under a wallet password, validates addresses by checksum, and keeps
//! cached balances and transaction history fresh by fanning out queries to
//! per-network explorer services.
//!
//! - `address` - checksum validation and network classification
//! - `security` - password fingerprint guard
//! - `encryption` - password-gated private key encryption
//! - `keys` - WIF parsing and address derivation
//! - `vault` - the authoritative key pair store
//! - `network` - registry and explorer adapters
//! - `sync` - multi-network sync aggregator
//! - `storage` - persisted JSON documents
//! - `api` - HTTP surface
//! - `manager` - orchestration layer

pub mod address;
pub mod api;
pub mod config;
pub mod encryption;
pub mod error;
pub mod keys;
pub mod manager;
pub mod network;
pub mod security;
pub mod storage;
pub mod sync;
pub mod vault;

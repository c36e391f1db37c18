//! UtxoChain - a minimal UTXO ledger core
//!
//! Validates individual value-transfer transactions against an unspent-output
//! set, resolves batches of candidate transactions into a mutually consistent
//! subset, and maintains a forking chain of blocks with per-branch ledger
//! state and bounded memory retention.
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`transaction`] - Transaction types, validation and batch resolution
//! - [`block`] - Block structure
//! - [`chain`] - Unspent-output set, chain node tree and block admission
//! - [`mempool`] - Pending transaction pool
//!
//! ## Cryptography
//! - [`crypto`] - Keys, addresses, signatures (secp256k1)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! The core is single-threaded and synchronous: block admission runs to
//! completion before returning. A multi-threaded host must guard the whole
//! [`chain::Blockchain`] (tree plus mempool) behind one exclusive lock;
//! ledger snapshots handed out as copies are safe to share freely.

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod block;
pub mod chain;
pub mod mempool;
pub mod transaction;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

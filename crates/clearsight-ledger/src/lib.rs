//! # clearsight-ledger
//!
//! Immutable, append-only, SHA-256 hash-chained domain event ledger for the
//! CLEARSIGHT workspace.
//!
//! ## Overview
//!
//! Every successful state mutation in the registry and the claims engine is
//! recorded as a `LedgerEntry` that links to the previous entry via its
//! SHA-256 hash. Tampering with any entry — even a single byte — breaks the
//! chain and is detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clearsight_ledger::InMemoryLedger;
//! use clearsight_core::traits::LedgerWriter;
//!
//! let ledger = InMemoryLedger::new("claims");
//! ledger.append(&record)?;
//!
//! assert!(ledger.verify_integrity());
//! let log = ledger.export_log();
//! ```

pub mod chain;
pub mod entry;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use entry::{LedgerEntry, LedgerLog};
pub use memory::InMemoryLedger;

// ── Tests ─────────────────────────────────────────────────────────────────────

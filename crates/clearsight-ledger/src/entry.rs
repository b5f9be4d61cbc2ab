//! Ledger entry and exported log types.
//!
//! `LedgerEntry` is a single entry in the hash chain — it wraps an
//! `EventRecord` with sequence numbering and the SHA-256 hashes that make
//! tampering detectable. `LedgerLog` is the exported snapshot of a stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clearsight_contracts::event::EventRecord;

/// A single entry in the SHA-256 hash chain of one event stream.
///
/// Each entry commits to the previous entry via `prev_hash`, forming an
/// append-only chain. Modifying any field — including those of the embedded
/// `record` — invalidates `this_hash` and every subsequent `prev_hash`,
/// which `verify_chain` detects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Monotonically increasing position in the chain, starting at 0.
    pub sequence: u64,

    /// The stream this entry belongs to (e.g. "prescriptions", "claims").
    pub stream: String,

    /// The immutable domain event record.
    pub record: EventRecord,

    /// SHA-256 hash (hex) of the previous entry, or `GENESIS_HASH` for the
    /// first entry.
    pub prev_hash: String,

    /// SHA-256 hash (hex) of this entry's canonical content.
    ///
    /// Computed by `hash_entry()` over (stream, sequence, prev_hash,
    /// canonical JSON of record).
    pub this_hash: String,
}

impl LedgerEntry {
    /// The sentinel `prev_hash` used for the first entry in every chain.
    ///
    /// 64 hex zeros — a value that can never be the SHA-256 of real data,
    /// making genesis detection unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// An exported snapshot of one ledger stream.
///
/// Produced by `InMemoryLedger::export_log()`. The `terminal_hash` is the
/// `this_hash` of the last entry and can be used as a compact commitment to
/// the entire stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLog {
    /// The stream whose events are recorded here.
    pub stream: String,

    /// All entries in chain order (sequence 0 first).
    pub entries: Vec<LedgerEntry>,

    /// Wall-clock time (UTC) the log was exported.
    pub exported_at: DateTime<Utc>,

    /// The `this_hash` of the last entry. Empty string if the log is empty.
    pub terminal_hash: String,
}

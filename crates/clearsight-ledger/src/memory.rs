//! In-memory implementation of `LedgerWriter`.
//!
//! `InMemoryLedger` keeps all entries in a `Vec` protected by a `Mutex`,
//! making it safe to share behind an `Arc` while the registry and claims
//! engine append events.
//!
//! Use `export_log()` to obtain a `LedgerLog` snapshot, and
//! `verify_integrity()` at any time to confirm the chain has not been
//! tampered with in memory.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::debug;

use clearsight_contracts::{
    error::{ClearsightError, ClearsightResult},
    event::EventRecord,
};
use clearsight_core::traits::LedgerWriter;

use crate::{
    chain::{hash_entry, verify_chain},
    entry::{LedgerEntry, LedgerLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `InMemoryLedger`.
pub(crate) struct LedgerState {
    /// All entries written so far, in append order.
    pub(crate) entries: Vec<LedgerEntry>,

    /// The next sequence number to assign (starts at 0).
    pub(crate) sequence: u64,

    /// The `this_hash` of the last written entry, or `GENESIS_HASH` before
    /// any entry has been written.
    pub(crate) last_hash: String,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An in-memory, append-only event ledger backed by a SHA-256 hash chain.
///
/// # Thread safety
///
/// `append()` acquires a `Mutex` internally. Multiple threads may hold
/// clones of the containing `Arc` without additional synchronization.
pub struct InMemoryLedger {
    stream: String,
    pub(crate) state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    /// Create a new ledger for the given event stream.
    ///
    /// The internal `last_hash` is initialized to `LedgerEntry::GENESIS_HASH`
    /// so the first entry's `prev_hash` is automatically correct.
    pub fn new(stream: impl Into<String>) -> Self {
        let state = LedgerState {
            entries: Vec::new(),
            sequence: 0,
            last_hash: LedgerEntry::GENESIS_HASH.to_string(),
        };
        Self {
            stream: stream.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Export a `LedgerLog` snapshot containing all entries written so far.
    ///
    /// The `terminal_hash` is the `this_hash` of the last entry, or an empty
    /// string when no entries have been written.
    pub fn export_log(&self) -> LedgerLog {
        let state = self.state.lock().expect("ledger state lock poisoned");
        let terminal_hash = state
            .entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        LedgerLog {
            stream: self.stream.clone(),
            entries: state.entries.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        }
    }

    /// Verify that the in-memory chain has not been tampered with.
    ///
    /// Delegates to `verify_chain`, which checks both prev-hash linkage and
    /// hash correctness for every entry.
    pub fn verify_integrity(&self) -> bool {
        let state = self.state.lock().expect("ledger state lock poisoned");
        verify_chain(&state.entries)
    }

    /// The number of entries written so far.
    pub fn len(&self) -> usize {
        let state = self.state.lock().expect("ledger state lock poisoned");
        state.entries.len()
    }

    /// True if no entries have been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── LedgerWriter impl ─────────────────────────────────────────────────────────

impl LedgerWriter for InMemoryLedger {
    /// Append one event record to the hash chain.
    ///
    /// Computes `this_hash` from (stream, sequence, prev_hash, record),
    /// wraps the record in a `LedgerEntry`, appends it, then advances the
    /// sequence counter and `last_hash`.
    ///
    /// Returns `Err(LedgerWriteFailed)` only if the internal mutex is
    /// poisoned, which cannot happen under normal operation.
    fn append(&self, record: &EventRecord) -> ClearsightResult<()> {
        let mut state = self.state.lock().map_err(|e| ClearsightError::LedgerWriteFailed {
            reason: format!("ledger state lock poisoned: {}", e),
        })?;

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;

        let this_hash = hash_entry(&self.stream, sequence, record, &prev_hash);

        debug!(
            stream = %self.stream,
            sequence,
            event = ?record.event,
            "ledger entry appended"
        );

        let entry = LedgerEntry {
            sequence,
            stream: self.stream.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        };

        state.entries.push(entry);
        state.sequence += 1;
        state.last_hash = this_hash;

        Ok(())
    }
}

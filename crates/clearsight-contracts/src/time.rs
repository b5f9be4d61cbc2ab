//! Logical time.
//!
//! CLEARSIGHT never reads a wall clock for domain decisions. Every entry
//! point that needs "now" takes a `Timestamp` supplied by the host at call
//! time — in a ledger-host deployment this is the block height.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical timestamp (block height in a ledger-host deployment).
///
/// Totally ordered; expiry and validity-window comparisons are performed
/// directly on the wrapped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

//! Principal identity and role types.
//!
//! Every authorization decision in CLEARSIGHT is phrased as "does this
//! principal hold this role" — the role provider that answers is injected,
//! never hardcoded against specific addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque principal address.
///
/// Used to identify optometrists, insurers, patients' wallets, and agents.
/// The core never interprets the contents — comparison is exact-match only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Construct an address from any string-like value.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable numeric identifier for a patient.
///
/// Distinct from the patient's principal `Address` — the identity resolver
/// maps one to the other when a caller must be authorized as a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientId(pub u64);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "patient/{}", self.0)
    }
}

/// The roles a principal may hold.
///
/// Grants are append-only: once a principal holds a role it is never taken
/// away by the core (de-licensure is out of scope of this workspace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// May file claims against their own policies (directly or via agents).
    Patient,
    /// May issue prescriptions once registered (licensed).
    Optometrist,
    /// May create policies naming themselves and adjudicate claims on them.
    Insurer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Patient => "patient",
            Role::Optometrist => "optometrist",
            Role::Insurer => "insurer",
        };
        f.write_str(name)
    }
}

//! Insurance policy records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::{Address, PatientId};
use crate::time::Timestamp;

/// Monotonically assigned policy identifier (first policy has ID 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolicyId(pub u64);

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "policy/{}", self.0)
    }
}

/// What the policy covers.
///
/// `limit` is the maximum payout for a single claim. `reimbursement_percent`
/// is informational for payout calculation by the host; the engine itself
/// only enforces the per-claim limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTerms {
    pub limit: u64,
    pub reimbursement_percent: u8,
}

/// The half-open interval during which a policy accepts claims.
///
/// `contains(now)` is true for `starts_at <= now < ends_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

impl ValidityWindow {
    /// Return true if `now` falls inside the window (end exclusive).
    pub fn contains(&self, now: Timestamp) -> bool {
        self.starts_at <= now && now < self.ends_at
    }
}

/// A coverage agreement between a patient and an insurer.
///
/// One patient may hold multiple policies. Policies are never deleted;
/// the `active` flag is the only deactivation mechanism and the core does
/// not currently expose a path that clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePolicy {
    pub id: PolicyId,
    pub patient_id: PatientId,
    /// The insurer principal that issued this policy and adjudicates its claims.
    pub insurer: Address,
    pub terms: CoverageTerms,
    pub window: ValidityWindow,
    pub active: bool,
}

impl InsurancePolicy {
    /// Return true if the policy accepts claims at `now`.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.active && self.window.contains(now)
    }
}

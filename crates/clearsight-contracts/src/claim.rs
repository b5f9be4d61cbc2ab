//! Claim records and the claim state machine.
//!
//! A claim has exactly one state transition in its lifetime:
//!
//!   Filed → Approved
//!   Filed → Rejected
//!
//! Both outcomes are terminal. The claims engine serializes processing so
//! that exactly one transition wins; every later attempt observes
//! `ClaimAlreadyFinalized`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::PatientId;
use crate::policy::PolicyId;
use crate::prescription::PrescriptionId;
use crate::time::Timestamp;

/// Monotonically assigned claim identifier (first claim has ID 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId(pub u64);

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim/{}", self.0)
    }
}

/// Lifecycle state of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimStatus {
    /// Awaiting adjudication by the policy's insurer.
    Filed,
    /// Approved for payout. Terminal.
    Approved,
    /// Rejected. Terminal.
    Rejected,
}

impl ClaimStatus {
    /// Return true if no further transition is permitted from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimStatus::Filed => "filed",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// The insurer's ruling passed to `process_claim`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimDecision {
    /// Approve the claim for `amount`, which must not exceed the requested
    /// amount nor (when cap enforcement is on) the policy's per-claim limit.
    Approve { amount: u64 },
    /// Reject the claim outright.
    Reject,
}

/// A patient's reimbursement request under a policy, tied to a prescription.
///
/// Append-only ledger semantics: claims are never destroyed, and the status
/// transition applied by `process_claim` is the sole mutation a claim ever
/// receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub policy_id: PolicyId,
    /// The prescription this claim reimburses. Guaranteed valid (unexpired)
    /// at `filed_at`, even if it expires later.
    pub prescription_id: PrescriptionId,
    pub patient_id: PatientId,
    pub filed_at: Timestamp,
    pub amount_requested: u64,
    pub status: ClaimStatus,
    /// Set exactly when `status == Approved`, `None` otherwise.
    pub amount_approved: Option<u64>,
}

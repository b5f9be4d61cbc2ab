//! Domain events and ledger records.
//!
//! Every successful mutating operation emits exactly one `DomainEvent`,
//! wrapped in an `EventRecord` and appended to the ledger before the
//! in-memory state is touched. Records are never modified or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::claim::ClaimId;
use crate::identity::{Address, PatientId};
use crate::policy::PolicyId;
use crate::prescription::PrescriptionId;

/// One state mutation, as recorded on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DomainEvent {
    /// A principal was granted the optometrist role for the first time.
    /// Re-registrations are idempotent no-ops and emit nothing.
    OptometristRegistered { address: Address },

    PrescriptionIssued {
        id: PrescriptionId,
        patient_id: PatientId,
        optometrist: Address,
    },

    PolicyCreated {
        id: PolicyId,
        patient_id: PatientId,
        insurer: Address,
    },

    ClaimFiled {
        id: ClaimId,
        policy_id: PolicyId,
        prescription_id: PrescriptionId,
        amount_requested: u64,
    },

    ClaimApproved { id: ClaimId, amount_approved: u64 },

    ClaimRejected { id: ClaimId },
}

/// A domain event plus the wall-clock time it was recorded.
///
/// Domain decisions never read this timestamp — logical `Timestamp` values
/// supplied by the host drive all expiry and window comparisons. The
/// wall-clock value exists for operators reading exported ledgers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: DomainEvent,
    pub recorded_at: DateTime<Utc>,
}

impl EventRecord {
    /// Wrap `event` with the current wall-clock time.
    pub fn now(event: DomainEvent) -> Self {
        Self {
            event,
            recorded_at: Utc::now(),
        }
    }
}

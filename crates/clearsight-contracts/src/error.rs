//! Error taxonomy for the CLEARSIGHT workspace.
//!
//! All fallible operations return `ClearsightResult<T>`. Mutating operations
//! are all-or-nothing: any error means no state was written. Read operations
//! return `Option`/empty collections for absence instead of erroring.

use thiserror::Error;

use crate::claim::{ClaimId, ClaimStatus};
use crate::identity::PatientId;
use crate::policy::PolicyId;
use crate::prescription::PrescriptionId;
use crate::time::Timestamp;

/// The unified error type for CLEARSIGHT components.
#[derive(Debug, Error)]
pub enum ClearsightError {
    /// The caller does not hold the role (or identity) the operation requires.
    #[error("principal '{principal}' is not authorized: requires {required}")]
    Unauthorized { principal: String, required: String },

    /// The referenced policy does not exist.
    #[error("policy {id} not found")]
    PolicyNotFound { id: PolicyId },

    /// The policy exists but does not accept claims at the filing timestamp
    /// (inactive flag, or outside its validity window).
    #[error("policy {id} is not active at the filing timestamp")]
    PolicyInactive { id: PolicyId },

    /// The prescription is absent or already expired at the filing timestamp.
    ///
    /// The two cases are deliberately indistinguishable to the caller: a
    /// claim may only reference a prescription that is valid right now.
    #[error("prescription {id} is expired or does not exist")]
    PrescriptionExpiredOrNotFound { id: PrescriptionId },

    /// The prescription exists but belongs to a different patient than the
    /// policy covers.
    #[error("prescription {prescription_id} was not issued to {patient_id}")]
    PrescriptionNotForPatient {
        prescription_id: PrescriptionId,
        patient_id: PatientId,
    },

    /// The referenced claim does not exist.
    #[error("claim {id} not found")]
    ClaimNotFound { id: ClaimId },

    /// The claim was already approved or rejected; terminal states are
    /// immutable and further processing attempts always fail.
    #[error("claim {id} is already finalized (status: {status})")]
    ClaimAlreadyFinalized { id: ClaimId, status: ClaimStatus },

    /// Manufacturing verification is required by configuration but no
    /// dispensed-glasses record exists for the claim's prescription.
    #[error("no manufacturing record for prescription {prescription_id}")]
    NoManufacturingRecord { prescription_id: PrescriptionId },

    /// A date range or validity window with `ends <= starts`.
    #[error("invalid date range: {starts} must precede {ends}")]
    InvalidDateRange { starts: Timestamp, ends: Timestamp },

    /// A zero amount where a positive amount is required.
    #[error("invalid amount: {amount} (must be positive)")]
    InvalidAmount { amount: u64 },

    /// The approved amount exceeds what the claim requested.
    #[error("approved amount {approved} exceeds requested amount {requested}")]
    AmountExceedsRequested { approved: u64, requested: u64 },

    /// The approved amount exceeds the policy's per-claim coverage limit.
    #[error("approved amount {approved} exceeds coverage limit {limit}")]
    AmountExceedsCoverage { approved: u64, limit: u64 },

    /// The ledger could not persist an event record.
    ///
    /// Fatal to the mutation — a state change that cannot be recorded is
    /// not applied.
    #[error("ledger write failed: {reason}")]
    LedgerWriteFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the CLEARSIGHT crates.
pub type ClearsightResult<T> = Result<T, ClearsightError>;

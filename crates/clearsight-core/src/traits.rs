//! Collaborator trait definitions for the CLEARSIGHT components.
//!
//! These traits define the seams between the two domain components and
//! their external collaborators:
//!
//! - `RoleProvider` / `RoleRegistry` — who holds which role
//! - `IdentityResolver`              — patient IDs to principals, agent delegation
//! - `PrescriptionDirectory`         — read-only view the claims engine consumes
//! - `ManufacturingVerification`     — dispensed-glasses lookups (external)
//! - `LedgerWriter`                  — append-only event persistence
//!
//! The claims engine and prescription registry receive implementations by
//! injection at construction time and never reach for a concrete store or
//! host mechanism directly.

use clearsight_contracts::{
    error::ClearsightResult,
    event::EventRecord,
    identity::{Address, PatientId, Role},
    prescription::{GlassesRecord, Prescription, PrescriptionId},
    time::Timestamp,
};

/// Answers role membership queries.
///
/// Implementations are trusted and must be cheap — role checks sit on the
/// hot path of every mutating operation.
pub trait RoleProvider: Send + Sync {
    /// Return true if `principal` currently holds `role`.
    fn has_role(&self, principal: &Address, role: Role) -> bool;
}

/// A role provider that also accepts grants.
///
/// Grants are append-only: implementations never expose revocation to the
/// core. Granting a role a principal already holds is a no-op.
pub trait RoleRegistry: RoleProvider {
    /// Grant `role` to `principal`.
    ///
    /// Returns true if the grant is new, false if the principal already
    /// held the role (idempotent success either way).
    fn grant(&self, principal: Address, role: Role) -> bool;
}

/// Resolves patient identities and agent delegations.
///
/// Used to authorize patient-initiated actions: a caller may act for a
/// patient if it is the patient's own principal or a delegated agent.
pub trait IdentityResolver: Send + Sync {
    /// The principal address registered for `patient`, if any.
    fn patient_principal(&self, patient: PatientId) -> Option<Address>;

    /// Return true if `principal` is a delegated agent for `patient`.
    fn is_agent_for(&self, principal: &Address, patient: PatientId) -> bool;
}

/// The read-only prescription view the claims engine depends on.
///
/// Implemented by the prescription registry; the claims engine holds it as
/// a trait object and never sees the registry's mutable surface.
pub trait PrescriptionDirectory: Send + Sync {
    /// The stored prescription, or `None` if it was never issued.
    fn prescription(&self, id: PrescriptionId) -> Option<Prescription>;

    /// Return true iff the prescription exists and `now < expires_at`.
    fn is_valid_at(&self, id: PrescriptionId, now: Timestamp) -> bool {
        self.prescription(id)
            .map(|rx| rx.is_valid_at(now))
            .unwrap_or(false)
    }
}

/// The external manufacturing-verification collaborator.
///
/// Consumed, never written, by the claims engine: given a prescription ID,
/// reports whether corrective lenses were produced and dispensed for it.
pub trait ManufacturingVerification: Send + Sync {
    /// The dispensed-glasses record for `prescription`, if one exists.
    fn glasses_for(&self, prescription: PrescriptionId) -> Option<GlassesRecord>;
}

/// The append-only event ledger.
///
/// Every successful mutation produces exactly one `EventRecord`, appended
/// *before* in-memory state is touched. A failed append is fatal to the
/// mutation — the operation returns the error and writes nothing.
pub trait LedgerWriter: Send + Sync {
    /// Append one event record.
    ///
    /// Implementations must treat this as append-only; records are never
    /// modified or deleted.
    fn append(&self, record: &EventRecord) -> ClearsightResult<()>;
}

//! The prescription registry.
//!
//! Owns all prescription records and the per-patient issuance index.
//! Prescriptions are immutable once issued and are never deleted; the
//! per-patient index only ever grows. One `Mutex` around the whole state
//! is the serialization point that makes each entry point atomic.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use clearsight_contracts::{
    error::ClearsightResult,
    event::{DomainEvent, EventRecord},
    identity::{Address, PatientId, Role},
    prescription::{LensParameters, Prescription, PrescriptionId},
    time::Timestamp,
};
use clearsight_core::{
    authorize::{ensure_ordered_window, ensure_role},
    traits::{LedgerWriter, PrescriptionDirectory, RoleProvider, RoleRegistry},
};

// ── Requests ──────────────────────────────────────────────────────────────────

/// Everything an optometrist supplies when issuing a prescription.
///
/// The prescription ID is allocated by the registry, never by the caller.
#[derive(Debug, Clone)]
pub struct PrescriptionRequest {
    pub patient_id: PatientId,
    pub lenses: LensParameters,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

// ── Internal mutable state ────────────────────────────────────────────────────

struct RegistryState {
    /// All issued prescriptions, keyed by ID. Insert-only.
    prescriptions: BTreeMap<PrescriptionId, Prescription>,

    /// Patient → prescription IDs in issuance order. Never shrinks.
    patient_index: HashMap<PatientId, Vec<PrescriptionId>>,

    /// The last assigned prescription ID. Starts at 0; the counter is
    /// pre-incremented, so the first issued prescription has ID 1.
    last_prescription_id: u64,
}

// ── Public registry ───────────────────────────────────────────────────────────

/// The prescription registry component.
///
/// Collaborators are injected at construction: the role registry answers
/// (and records) licensure, and the ledger receives one event per
/// successful mutation.
pub struct PrescriptionRegistry {
    roles: Arc<dyn RoleRegistry>,
    ledger: Arc<dyn LedgerWriter>,
    state: Mutex<RegistryState>,
}

impl PrescriptionRegistry {
    /// Create an empty registry with the given collaborators.
    pub fn new(roles: Arc<dyn RoleRegistry>, ledger: Arc<dyn LedgerWriter>) -> Self {
        Self {
            roles,
            ledger,
            state: Mutex::new(RegistryState {
                prescriptions: BTreeMap::new(),
                patient_index: HashMap::new(),
                last_prescription_id: 0,
            }),
        }
    }

    /// Mark `address` as a licensed optometrist.
    ///
    /// Idempotent: re-registering a licensed address is a no-op success and
    /// emits no ledger event. Returns true if the registration is new.
    ///
    /// Registration is deliberately ungated, matching the source contract;
    /// the injected `RoleRegistry` is the seam for a gated variant.
    pub fn register_optometrist(&self, address: Address) -> ClearsightResult<bool> {
        // Hold the registry lock for the whole check-append-grant sequence so
        // concurrent registrations of the same address serialize: exactly one
        // caller sees the grant as new and exactly one event reaches the
        // ledger.
        let _state = self.state.lock().expect("registry state lock poisoned");

        if self.roles.has_role(&address, Role::Optometrist) {
            return Ok(false);
        }

        self.ledger.append(&EventRecord::now(DomainEvent::OptometristRegistered {
            address: address.clone(),
        }))?;
        self.roles.grant(address.clone(), Role::Optometrist);

        info!(optometrist = %address, "optometrist registered");
        Ok(true)
    }

    /// Issue a prescription for a patient.
    ///
    /// Preconditions, checked before anything is written:
    /// - `caller` holds the Optometrist role, else `Unauthorized`
    /// - `expires_at > issued_at`, else `InvalidDateRange`
    ///
    /// On success the next ID is allocated, the record stored, the patient
    /// index appended to, and a `PrescriptionIssued` event written.
    pub fn issue_prescription(
        &self,
        caller: &Address,
        request: PrescriptionRequest,
    ) -> ClearsightResult<PrescriptionId> {
        if let Err(err) = ensure_role(self.roles.as_ref(), caller, Role::Optometrist) {
            warn!(caller = %caller, "prescription issuance denied: not a licensed optometrist");
            return Err(err);
        }
        ensure_ordered_window(request.issued_at, request.expires_at)?;

        let mut state = self.state.lock().expect("registry state lock poisoned");

        let id = PrescriptionId(state.last_prescription_id + 1);
        let prescription = Prescription {
            id,
            patient_id: request.patient_id,
            optometrist: caller.clone(),
            lenses: request.lenses,
            issued_at: request.issued_at,
            expires_at: request.expires_at,
        };

        // Ledger first: a mutation that cannot be recorded is not applied.
        self.ledger.append(&EventRecord::now(DomainEvent::PrescriptionIssued {
            id,
            patient_id: request.patient_id,
            optometrist: caller.clone(),
        }))?;

        state.last_prescription_id = id.0;
        state
            .patient_index
            .entry(request.patient_id)
            .or_default()
            .push(id);
        state.prescriptions.insert(id, prescription);

        info!(
            prescription = %id,
            patient = %request.patient_id,
            optometrist = %caller,
            issued_at = %request.issued_at,
            expires_at = %request.expires_at,
            "prescription issued"
        );

        Ok(id)
    }

    /// The stored prescription, or `None` if it was never issued. Pure read.
    pub fn prescription(&self, id: PrescriptionId) -> Option<Prescription> {
        let state = self.state.lock().expect("registry state lock poisoned");
        state.prescriptions.get(&id).cloned()
    }

    /// All prescription IDs issued to `patient`, in issuance order.
    ///
    /// A patient with no prescriptions yields an empty vec, never an error.
    pub fn patient_prescriptions(&self, patient: PatientId) -> Vec<PrescriptionId> {
        let state = self.state.lock().expect("registry state lock poisoned");
        state.patient_index.get(&patient).cloned().unwrap_or_default()
    }

    /// Return true iff the prescription exists and is unexpired at `now`.
    ///
    /// Expiry is exclusive: false at exactly `expires_at`.
    pub fn is_prescription_valid(&self, id: PrescriptionId, now: Timestamp) -> bool {
        self.prescription(id)
            .map(|rx| rx.is_valid_at(now))
            .unwrap_or(false)
    }
}

impl PrescriptionDirectory for PrescriptionRegistry {
    fn prescription(&self, id: PrescriptionId) -> Option<Prescription> {
        PrescriptionRegistry::prescription(self, id)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clearsight_contracts::error::ClearsightError;
    use clearsight_directory::RoleDirectory;
    use clearsight_ledger::InMemoryLedger;

    fn make_registry() -> (PrescriptionRegistry, Arc<InMemoryLedger>) {
        let roles = Arc::new(RoleDirectory::new());
        let ledger = Arc::new(InMemoryLedger::new("prescriptions"));
        (PrescriptionRegistry::new(roles, ledger.clone()), ledger)
    }

    fn make_request(patient: u64, issued: u64, expires: u64) -> PrescriptionRequest {
        PrescriptionRequest {
            patient_id: PatientId(patient),
            lenses: LensParameters {
                sphere_right: -200,
                cylinder_right: -50,
                axis_right: 180,
                sphere_left: -175,
                cylinder_left: -25,
                axis_left: 175,
                add_power: 100,
                pd: 625,
            },
            issued_at: Timestamp(issued),
            expires_at: Timestamp(expires),
        }
    }

    /// An unlicensed caller is refused; after registration the identical
    /// call succeeds and returns ID 1.
    #[test]
    fn unlicensed_then_registered_scenario() {
        let (registry, _) = make_registry();
        let opt = Address::new("SP1OPT");

        let err = registry
            .issue_prescription(&opt, make_request(1, 10, 50))
            .unwrap_err();
        assert!(matches!(err, ClearsightError::Unauthorized { .. }));

        assert!(registry.register_optometrist(opt.clone()).unwrap());

        let id = registry
            .issue_prescription(&opt, make_request(1, 10, 50))
            .unwrap();
        assert_eq!(id, PrescriptionId(1));
    }

    #[test]
    fn re_registration_is_noop_success() {
        let (registry, ledger) = make_registry();
        let opt = Address::new("SP1OPT");

        assert!(registry.register_optometrist(opt.clone()).unwrap());
        assert!(!registry.register_optometrist(opt.clone()).unwrap());

        // Only the first registration reaches the ledger.
        assert_eq!(ledger.len(), 1);
    }

    /// IDs are strictly increasing and unique across issuances.
    #[test]
    fn prescription_ids_strictly_increasing() {
        let (registry, _) = make_registry();
        let opt = Address::new("SP1OPT");
        registry.register_optometrist(opt.clone()).unwrap();

        let ids: Vec<PrescriptionId> = (0..5)
            .map(|i| {
                registry
                    .issue_prescription(&opt, make_request(1 + i % 2, 10, 50))
                    .unwrap()
            })
            .collect();

        for (idx, id) in ids.iter().enumerate() {
            assert_eq!(id.0, idx as u64 + 1);
        }
    }

    #[test]
    fn rejects_inverted_date_range() {
        let (registry, ledger) = make_registry();
        let opt = Address::new("SP1OPT");
        registry.register_optometrist(opt.clone()).unwrap();

        let err = registry
            .issue_prescription(&opt, make_request(1, 50, 10))
            .unwrap_err();
        assert!(matches!(err, ClearsightError::InvalidDateRange { .. }));

        // Equal issue and expiry is also ordered wrong.
        let err = registry
            .issue_prescription(&opt, make_request(1, 30, 30))
            .unwrap_err();
        assert!(matches!(err, ClearsightError::InvalidDateRange { .. }));

        // Nothing was written beyond the registration event.
        assert_eq!(ledger.len(), 1);
        assert!(registry.prescription(PrescriptionId(1)).is_none());
    }

    #[test]
    fn stores_and_returns_record() {
        let (registry, _) = make_registry();
        let opt = Address::new("SP1OPT");
        registry.register_optometrist(opt.clone()).unwrap();

        let id = registry
            .issue_prescription(&opt, make_request(7, 10, 50))
            .unwrap();

        let rx = registry.prescription(id).unwrap();
        assert_eq!(rx.patient_id, PatientId(7));
        assert_eq!(rx.optometrist, opt);
        assert_eq!(rx.lenses.pd, 625);

        assert!(registry.prescription(PrescriptionId(99)).is_none());
    }

    #[test]
    fn patient_index_tracks_issuance_order() {
        let (registry, _) = make_registry();
        let opt = Address::new("SP1OPT");
        registry.register_optometrist(opt.clone()).unwrap();

        assert!(registry.patient_prescriptions(PatientId(1)).is_empty());

        let a = registry.issue_prescription(&opt, make_request(1, 10, 50)).unwrap();
        let _ = registry.issue_prescription(&opt, make_request(2, 10, 50)).unwrap();
        let c = registry.issue_prescription(&opt, make_request(1, 20, 60)).unwrap();

        assert_eq!(registry.patient_prescriptions(PatientId(1)), vec![a, c]);
    }

    /// Validity boundary: valid through `expires_at - 1`, invalid at and
    /// after `expires_at`, and false for unknown IDs.
    #[test]
    fn validity_boundaries() {
        let (registry, _) = make_registry();
        let opt = Address::new("SP1OPT");
        registry.register_optometrist(opt.clone()).unwrap();

        let id = registry
            .issue_prescription(&opt, make_request(1, 10, 50))
            .unwrap();

        assert!(registry.is_prescription_valid(id, Timestamp(10)));
        assert!(registry.is_prescription_valid(id, Timestamp(49)));
        assert!(!registry.is_prescription_valid(id, Timestamp(50)));
        assert!(!registry.is_prescription_valid(id, Timestamp(60)));

        assert!(!registry.is_prescription_valid(PrescriptionId(42), Timestamp(10)));
    }

    #[test]
    fn ledger_records_every_issuance() {
        let (registry, ledger) = make_registry();
        let opt = Address::new("SP1OPT");
        registry.register_optometrist(opt.clone()).unwrap();

        registry.issue_prescription(&opt, make_request(1, 10, 50)).unwrap();
        registry.issue_prescription(&opt, make_request(1, 20, 60)).unwrap();

        // One registration event plus two issuance events, chain intact.
        assert_eq!(ledger.len(), 3);
        assert!(ledger.verify_integrity());
    }

    /// Two simultaneous registrations of the same address: exactly one caller
    /// sees a new grant and exactly one event reaches the ledger.
    #[test]
    fn concurrent_registration_records_one_event() {
        use std::sync::Barrier;
        use std::thread;

        for _ in 0..200 {
            let (registry, ledger) = make_registry();
            let registry = Arc::new(registry);
            let barrier = Arc::new(Barrier::new(2));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let registry = registry.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        registry.register_optometrist(Address::new("SP1OPT")).unwrap()
                    })
                })
                .collect();

            let new_grants: Vec<bool> = handles
                .into_iter()
                .map(|h| h.join().expect("registration thread panicked"))
                .collect();

            assert_eq!(
                new_grants.iter().filter(|&&fresh| fresh).count(),
                1,
                "exactly one caller must see the grant as new (got {new_grants:?})"
            );
            assert_eq!(ledger.len(), 1);
            assert!(ledger.verify_integrity());
        }
    }
}

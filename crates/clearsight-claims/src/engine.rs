//! The insurance claims engine.
//!
//! Owns policies and claims; every external fact it needs — licensure,
//! patient identity, prescription validity, manufacturing verification —
//! arrives through an injected read-only trait object.
//!
//! Each mutating entry point validates every precondition, appends its
//! ledger event, and only then touches state, so any failure leaves no
//! partial write. One `Mutex` around the whole state serializes the calls;
//! in particular it is the arbiter that lets exactly one `process_claim`
//! win on a contested claim.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use clearsight_contracts::{
    claim::{Claim, ClaimDecision, ClaimId, ClaimStatus},
    error::{ClearsightError, ClearsightResult},
    event::{DomainEvent, EventRecord},
    identity::{Address, PatientId, Role},
    policy::{CoverageTerms, InsurancePolicy, PolicyId, ValidityWindow},
    prescription::PrescriptionId,
    time::Timestamp,
};
use clearsight_core::{
    authorize::{ensure_ordered_window, ensure_patient_or_agent, ensure_positive_amount, ensure_role},
    traits::{
        IdentityResolver, LedgerWriter, ManufacturingVerification, PrescriptionDirectory,
        RoleProvider,
    },
};

use crate::config::AdjudicationConfig;

// ── Requests ──────────────────────────────────────────────────────────────────

/// Everything an insurer supplies when creating a policy.
///
/// The policy ID is allocated by the engine, never by the caller.
#[derive(Debug, Clone)]
pub struct PolicyRequest {
    pub patient_id: PatientId,
    /// The insurer principal the policy names. Must equal the caller.
    pub insurer: Address,
    pub terms: CoverageTerms,
    pub window: ValidityWindow,
}

// ── Internal mutable state ────────────────────────────────────────────────────

struct ClaimsState {
    /// All policies, keyed by ID. Insert-only.
    policies: BTreeMap<PolicyId, InsurancePolicy>,

    /// Patient → policy IDs in creation order. Never shrinks.
    patient_index: HashMap<PatientId, Vec<PolicyId>>,

    /// All claims, keyed by ID. A claim receives exactly one mutation in
    /// its lifetime: the Filed → Approved/Rejected transition.
    claims: BTreeMap<ClaimId, Claim>,

    /// Last assigned policy ID (pre-incremented; first policy has ID 1).
    last_policy_id: u64,

    /// Last assigned claim ID (pre-incremented; first claim has ID 1).
    last_claim_id: u64,
}

// ── Public engine ─────────────────────────────────────────────────────────────

/// The claims engine component.
pub struct ClaimsEngine {
    config: AdjudicationConfig,
    roles: Arc<dyn RoleProvider>,
    identity: Arc<dyn IdentityResolver>,
    prescriptions: Arc<dyn PrescriptionDirectory>,
    manufacturing: Arc<dyn ManufacturingVerification>,
    ledger: Arc<dyn LedgerWriter>,
    state: Mutex<ClaimsState>,
}

impl ClaimsEngine {
    /// Create an empty engine with the given configuration and collaborators.
    pub fn new(
        config: AdjudicationConfig,
        roles: Arc<dyn RoleProvider>,
        identity: Arc<dyn IdentityResolver>,
        prescriptions: Arc<dyn PrescriptionDirectory>,
        manufacturing: Arc<dyn ManufacturingVerification>,
        ledger: Arc<dyn LedgerWriter>,
    ) -> Self {
        Self {
            config,
            roles,
            identity,
            prescriptions,
            manufacturing,
            ledger,
            state: Mutex::new(ClaimsState {
                policies: BTreeMap::new(),
                patient_index: HashMap::new(),
                claims: BTreeMap::new(),
                last_policy_id: 0,
                last_claim_id: 0,
            }),
        }
    }

    /// Create a policy for a patient.
    ///
    /// The caller must hold the Insurer role and be the insurer the request
    /// names — insurers cannot create policies on one another's behalf.
    pub fn create_policy(
        &self,
        caller: &Address,
        request: PolicyRequest,
    ) -> ClearsightResult<PolicyId> {
        ensure_role(self.roles.as_ref(), caller, Role::Insurer)?;
        if *caller != request.insurer {
            warn!(caller = %caller, insurer = %request.insurer, "policy creation denied: caller is not the named insurer");
            return Err(ClearsightError::Unauthorized {
                principal: caller.to_string(),
                required: format!("the named insurer {}", request.insurer),
            });
        }
        ensure_ordered_window(request.window.starts_at, request.window.ends_at)?;
        ensure_positive_amount(request.terms.limit)?;

        let mut state = self.state.lock().expect("claims state lock poisoned");

        let id = PolicyId(state.last_policy_id + 1);

        self.ledger.append(&EventRecord::now(DomainEvent::PolicyCreated {
            id,
            patient_id: request.patient_id,
            insurer: request.insurer.clone(),
        }))?;

        state.last_policy_id = id.0;
        state
            .patient_index
            .entry(request.patient_id)
            .or_default()
            .push(id);
        state.policies.insert(
            id,
            InsurancePolicy {
                id,
                patient_id: request.patient_id,
                insurer: request.insurer.clone(),
                terms: request.terms,
                window: request.window,
                active: true,
            },
        );

        info!(policy = %id, patient = %request.patient_id, insurer = %request.insurer, "policy created");
        Ok(id)
    }

    /// File a claim against a policy, referencing a prescription.
    ///
    /// Preconditions, in check order:
    /// - `amount_requested > 0`, else `InvalidAmount`
    /// - the policy exists, else `PolicyNotFound`
    /// - the policy is active and `now` is inside its window, else `PolicyInactive`
    /// - the prescription exists and is unexpired at `now`, else
    ///   `PrescriptionExpiredOrNotFound`
    /// - the prescription was issued to the policy's patient, else
    ///   `PrescriptionNotForPatient`
    /// - the caller is the patient's principal or a delegated agent, else
    ///   `Unauthorized`
    ///
    /// A filed claim therefore always had a valid prescription at its
    /// `filed_at`, even if the prescription expires later.
    pub fn file_claim(
        &self,
        caller: &Address,
        policy_id: PolicyId,
        prescription_id: PrescriptionId,
        amount_requested: u64,
        now: Timestamp,
    ) -> ClearsightResult<ClaimId> {
        ensure_positive_amount(amount_requested)?;

        let mut state = self.state.lock().expect("claims state lock poisoned");

        let policy = state
            .policies
            .get(&policy_id)
            .ok_or(ClearsightError::PolicyNotFound { id: policy_id })?
            .clone();

        if !policy.is_active_at(now) {
            warn!(policy = %policy_id, now = %now, "claim filing denied: policy not active");
            return Err(ClearsightError::PolicyInactive { id: policy_id });
        }

        let prescription = self
            .prescriptions
            .prescription(prescription_id)
            .filter(|rx| rx.is_valid_at(now))
            .ok_or(ClearsightError::PrescriptionExpiredOrNotFound { id: prescription_id })?;

        if prescription.patient_id != policy.patient_id {
            return Err(ClearsightError::PrescriptionNotForPatient {
                prescription_id,
                patient_id: policy.patient_id,
            });
        }

        ensure_patient_or_agent(self.identity.as_ref(), caller, policy.patient_id)?;

        let id = ClaimId(state.last_claim_id + 1);

        self.ledger.append(&EventRecord::now(DomainEvent::ClaimFiled {
            id,
            policy_id,
            prescription_id,
            amount_requested,
        }))?;

        state.last_claim_id = id.0;
        state.claims.insert(
            id,
            Claim {
                id,
                policy_id,
                prescription_id,
                patient_id: policy.patient_id,
                filed_at: now,
                amount_requested,
                status: ClaimStatus::Filed,
                amount_approved: None,
            },
        );

        info!(
            claim = %id,
            policy = %policy_id,
            prescription = %prescription_id,
            amount_requested,
            filed_at = %now,
            "claim filed"
        );

        Ok(id)
    }

    /// Adjudicate a filed claim.
    ///
    /// The caller must hold the Insurer role and be the insurer of the
    /// claim's policy. A claim in a terminal state always fails with
    /// `ClaimAlreadyFinalized` — under concurrent processing the state lock
    /// guarantees exactly one caller performs the transition.
    ///
    /// On `Approve { amount }`:
    /// - `amount > 0`, else `InvalidAmount`
    /// - `amount <= amount_requested`, else `AmountExceedsRequested`
    /// - `amount <= policy coverage limit` when cap enforcement is on,
    ///   else `AmountExceedsCoverage`
    /// - a dispensed-glasses record must exist when the manufacturing
    ///   cross-check is required, else `NoManufacturingRecord`
    ///
    /// Returns the finalized claim.
    pub fn process_claim(
        &self,
        caller: &Address,
        claim_id: ClaimId,
        decision: ClaimDecision,
    ) -> ClearsightResult<Claim> {
        let mut state = self.state.lock().expect("claims state lock poisoned");

        let claim = state
            .claims
            .get(&claim_id)
            .ok_or(ClearsightError::ClaimNotFound { id: claim_id })?
            .clone();

        if claim.status.is_terminal() {
            warn!(claim = %claim_id, status = %claim.status, "claim already finalized");
            return Err(ClearsightError::ClaimAlreadyFinalized {
                id: claim_id,
                status: claim.status,
            });
        }

        // Invariant: every stored claim references a stored policy.
        let policy = state
            .policies
            .get(&claim.policy_id)
            .ok_or(ClearsightError::PolicyNotFound { id: claim.policy_id })?
            .clone();

        ensure_role(self.roles.as_ref(), caller, Role::Insurer)?;
        if *caller != policy.insurer {
            warn!(caller = %caller, insurer = %policy.insurer, claim = %claim_id, "claim processing denied: caller is not the policy's insurer");
            return Err(ClearsightError::Unauthorized {
                principal: caller.to_string(),
                required: format!("insurer {} of {}", policy.insurer, policy.id),
            });
        }

        let (status, amount_approved, event) = match decision {
            ClaimDecision::Approve { amount } => {
                ensure_positive_amount(amount)?;
                if amount > claim.amount_requested {
                    return Err(ClearsightError::AmountExceedsRequested {
                        approved: amount,
                        requested: claim.amount_requested,
                    });
                }
                if self.config.enforce_coverage_cap && amount > policy.terms.limit {
                    return Err(ClearsightError::AmountExceedsCoverage {
                        approved: amount,
                        limit: policy.terms.limit,
                    });
                }
                if self.config.require_manufacturing_record
                    && self.manufacturing.glasses_for(claim.prescription_id).is_none()
                {
                    warn!(
                        claim = %claim_id,
                        prescription = %claim.prescription_id,
                        "approval blocked: no manufacturing record"
                    );
                    return Err(ClearsightError::NoManufacturingRecord {
                        prescription_id: claim.prescription_id,
                    });
                }

                (
                    ClaimStatus::Approved,
                    Some(amount),
                    DomainEvent::ClaimApproved {
                        id: claim_id,
                        amount_approved: amount,
                    },
                )
            }
            ClaimDecision::Reject => (
                ClaimStatus::Rejected,
                None,
                DomainEvent::ClaimRejected { id: claim_id },
            ),
        };

        self.ledger.append(&EventRecord::now(event))?;

        let stored = state
            .claims
            .get_mut(&claim_id)
            .ok_or(ClearsightError::ClaimNotFound { id: claim_id })?;
        stored.status = status;
        stored.amount_approved = amount_approved;
        let finalized = stored.clone();

        info!(claim = %claim_id, status = %status, ?amount_approved, "claim processed");
        Ok(finalized)
    }

    /// The stored policy, or `None`. Pure read.
    pub fn policy(&self, id: PolicyId) -> Option<InsurancePolicy> {
        let state = self.state.lock().expect("claims state lock poisoned");
        state.policies.get(&id).cloned()
    }

    /// All policy IDs held by `patient`, in creation order; empty when none.
    pub fn patient_policies(&self, patient: PatientId) -> Vec<PolicyId> {
        let state = self.state.lock().expect("claims state lock poisoned");
        state.patient_index.get(&patient).cloned().unwrap_or_default()
    }

    /// The stored claim, or `None`. Pure read.
    pub fn claim(&self, id: ClaimId) -> Option<Claim> {
        let state = self.state.lock().expect("claims state lock poisoned");
        state.claims.get(&id).cloned()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

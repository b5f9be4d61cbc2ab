//! In-memory implementation of `IdentityResolver`.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tracing::info;

use clearsight_contracts::identity::{Address, PatientId};
use clearsight_core::traits::IdentityResolver;

struct IdentityState {
    /// Patient ID → registered principal. Insert-only; a registration is
    /// never overwritten or removed.
    principals: HashMap<PatientId, Address>,

    /// Patient ID → principals the patient has delegated to file on their
    /// behalf. Append-only.
    agents: HashMap<PatientId, HashSet<Address>>,
}

/// An insert-only, in-memory patient identity directory.
///
/// Stand-in for the host's principal-resolution collaborator. Registration
/// of a patient ID that already has a principal is ignored (first write
/// wins), keeping the map append-only.
pub struct IdentityDirectory {
    state: Mutex<IdentityState>,
}

impl IdentityDirectory {
    /// Create an empty identity directory.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(IdentityState {
                principals: HashMap::new(),
                agents: HashMap::new(),
            }),
        }
    }

    /// Register `principal` as the identity behind `patient`.
    ///
    /// Returns true if the registration is new; false if the patient was
    /// already registered (existing registration is kept).
    pub fn register_patient(&self, patient: PatientId, principal: Address) -> bool {
        let mut state = self.state.lock().expect("identity state lock poisoned");
        if state.principals.contains_key(&patient) {
            return false;
        }
        info!(patient = %patient, principal = %principal, "patient registered");
        state.principals.insert(patient, principal);
        true
    }

    /// Record that `agent` may act on behalf of `patient`. Idempotent.
    pub fn authorize_agent(&self, patient: PatientId, agent: Address) -> bool {
        let mut state = self.state.lock().expect("identity state lock poisoned");
        let newly = state.agents.entry(patient).or_default().insert(agent.clone());
        if newly {
            info!(patient = %patient, agent = %agent, "agent delegation recorded");
        }
        newly
    }
}

impl Default for IdentityDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityResolver for IdentityDirectory {
    fn patient_principal(&self, patient: PatientId) -> Option<Address> {
        let state = self.state.lock().expect("identity state lock poisoned");
        state.principals.get(&patient).cloned()
    }

    fn is_agent_for(&self, principal: &Address, patient: PatientId) -> bool {
        let state = self.state.lock().expect("identity state lock poisoned");
        state
            .agents
            .get(&patient)
            .is_some_and(|agents| agents.contains(principal))
    }
}

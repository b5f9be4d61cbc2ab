//! Shared authorization and input-validation helpers.
//!
//! Every mutating entry point in the registry and the claims engine runs
//! its preconditions through these helpers before touching state, so the
//! all-or-nothing guarantee reduces to "validate first, write last".

use clearsight_contracts::{
    error::{ClearsightError, ClearsightResult},
    identity::{Address, PatientId, Role},
    time::Timestamp,
};

use crate::traits::{IdentityResolver, RoleProvider};

/// Require that `principal` holds `role`.
pub fn ensure_role<R>(roles: &R, principal: &Address, role: Role) -> ClearsightResult<()>
where
    R: RoleProvider + ?Sized,
{
    if roles.has_role(principal, role) {
        Ok(())
    } else {
        Err(ClearsightError::Unauthorized {
            principal: principal.to_string(),
            required: format!("{} role", role),
        })
    }
}

/// Require that `caller` may act on behalf of `patient`.
///
/// Allowed when the caller is the patient's own registered principal, or a
/// delegated agent. An unregistered patient authorizes nobody.
pub fn ensure_patient_or_agent<I>(
    identity: &I,
    caller: &Address,
    patient: PatientId,
) -> ClearsightResult<()>
where
    I: IdentityResolver + ?Sized,
{
    let is_patient = identity
        .patient_principal(patient)
        .is_some_and(|principal| principal == *caller);

    if is_patient || identity.is_agent_for(caller, patient) {
        Ok(())
    } else {
        Err(ClearsightError::Unauthorized {
            principal: caller.to_string(),
            required: format!("{} or a delegated agent", patient),
        })
    }
}

/// Require a positive amount.
pub fn ensure_positive_amount(amount: u64) -> ClearsightResult<()> {
    if amount == 0 {
        Err(ClearsightError::InvalidAmount { amount })
    } else {
        Ok(())
    }
}

/// Require `starts < ends` for a date range or validity window.
pub fn ensure_ordered_window(starts: Timestamp, ends: Timestamp) -> ClearsightResult<()> {
    if ends > starts {
        Ok(())
    } else {
        Err(ClearsightError::InvalidDateRange { starts, ends })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StaticRoles {
        held: Vec<(Address, Role)>,
    }

    impl RoleProvider for StaticRoles {
        fn has_role(&self, principal: &Address, role: Role) -> bool {
            self.held.iter().any(|(p, r)| p == principal && *r == role)
        }
    }

    struct StaticIdentity {
        principals: Mutex<HashMap<PatientId, Address>>,
        agents: Vec<(Address, PatientId)>,
    }

    impl IdentityResolver for StaticIdentity {
        fn patient_principal(&self, patient: PatientId) -> Option<Address> {
            self.principals.lock().unwrap().get(&patient).cloned()
        }

        fn is_agent_for(&self, principal: &Address, patient: PatientId) -> bool {
            self.agents.iter().any(|(a, p)| a == principal && *p == patient)
        }
    }

    #[test]
    fn ensure_role_rejects_missing_role() {
        let roles = StaticRoles {
            held: vec![(Address::new("SP1INS"), Role::Insurer)],
        };
        assert!(ensure_role(&roles, &Address::new("SP1INS"), Role::Insurer).is_ok());

        let err = ensure_role(&roles, &Address::new("SP1INS"), Role::Optometrist).unwrap_err();
        assert!(matches!(err, ClearsightError::Unauthorized { .. }));
    }

    #[test]
    fn ensure_patient_or_agent_accepts_patient_principal() {
        let identity = StaticIdentity {
            principals: Mutex::new(HashMap::from([(PatientId(1), Address::new("SP1PAT"))])),
            agents: vec![],
        };
        assert!(ensure_patient_or_agent(&identity, &Address::new("SP1PAT"), PatientId(1)).is_ok());
    }

    #[test]
    fn ensure_patient_or_agent_accepts_delegated_agent() {
        let identity = StaticIdentity {
            principals: Mutex::new(HashMap::from([(PatientId(1), Address::new("SP1PAT"))])),
            agents: vec![(Address::new("SP1AGENT"), PatientId(1))],
        };
        assert!(
            ensure_patient_or_agent(&identity, &Address::new("SP1AGENT"), PatientId(1)).is_ok()
        );
    }

    #[test]
    fn ensure_patient_or_agent_rejects_stranger() {
        let identity = StaticIdentity {
            principals: Mutex::new(HashMap::from([(PatientId(1), Address::new("SP1PAT"))])),
            agents: vec![],
        };
        let err = ensure_patient_or_agent(&identity, &Address::new("SP9EVE"), PatientId(1))
            .unwrap_err();
        assert!(matches!(err, ClearsightError::Unauthorized { .. }));
    }

    #[test]
    fn ensure_patient_or_agent_rejects_unregistered_patient() {
        let identity = StaticIdentity {
            principals: Mutex::new(HashMap::new()),
            agents: vec![],
        };
        // Nobody may act for a patient with no registered principal.
        assert!(
            ensure_patient_or_agent(&identity, &Address::new("SP1PAT"), PatientId(42)).is_err()
        );
    }

    #[test]
    fn ensure_positive_amount_rejects_zero() {
        assert!(ensure_positive_amount(1).is_ok());
        assert!(matches!(
            ensure_positive_amount(0),
            Err(ClearsightError::InvalidAmount { amount: 0 })
        ));
    }

    #[test]
    fn ensure_ordered_window_rejects_inverted_and_empty() {
        assert!(ensure_ordered_window(Timestamp(10), Timestamp(50)).is_ok());
        assert!(ensure_ordered_window(Timestamp(50), Timestamp(10)).is_err());
        assert!(ensure_ordered_window(Timestamp(10), Timestamp(10)).is_err());
    }
}

//! In-memory implementation of `RoleProvider` / `RoleRegistry`.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tracing::info;

use clearsight_contracts::identity::{Address, Role};
use clearsight_core::traits::{RoleProvider, RoleRegistry};

/// An append-only, in-memory role directory.
///
/// Grants accumulate and are never removed — matching the append-only map
/// semantics of a ledger host. If de-licensure is ever needed, this type is
/// the single seam where it would land.
///
/// # Thread safety
///
/// All methods acquire an internal `Mutex`; the directory can be shared
/// across threads behind an `Arc` with no additional synchronization.
#[derive(Default)]
pub struct RoleDirectory {
    state: Mutex<HashMap<Address, HashSet<Role>>>,
}

impl RoleDirectory {
    /// Create an empty role directory.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoleProvider for RoleDirectory {
    fn has_role(&self, principal: &Address, role: Role) -> bool {
        let state = self.state.lock().expect("role state lock poisoned");
        state
            .get(principal)
            .is_some_and(|roles| roles.contains(&role))
    }
}

impl RoleRegistry for RoleDirectory {
    /// Grant `role` to `principal`. Idempotent: re-granting returns false.
    fn grant(&self, principal: Address, role: Role) -> bool {
        let mut state = self.state.lock().expect("role state lock poisoned");
        let newly = state.entry(principal.clone()).or_default().insert(role);
        if newly {
            info!(principal = %principal, role = %role, "role granted");
        }
        newly
    }
}

//! # clearsight-directory
//!
//! In-memory reference implementations of the CLEARSIGHT collaborator
//! traits: role membership, patient identity and agent delegation, and
//! manufacturing-verification records.
//!
//! All three directories are `Mutex`-guarded, insert-only maps. Nothing is
//! ever removed — the append-only semantics of a ledger host are preserved
//! even in memory.

pub mod identity;
pub mod manufacturing;
pub mod roles;

pub use identity::IdentityDirectory;
pub use manufacturing::ManufacturingDirectory;
pub use roles::RoleDirectory;

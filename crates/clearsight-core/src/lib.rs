//! # clearsight-core
//!
//! Collaborator traits and shared authorization helpers for the CLEARSIGHT
//! vision-care claims workspace.
//!
//! This crate provides:
//! - The trait seams between the domain components and their collaborators
//!   (`RoleProvider`, `IdentityResolver`, `PrescriptionDirectory`,
//!   `ManufacturingVerification`, `LedgerWriter`)
//! - Precondition helpers shared by the registry and the claims engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clearsight_core::traits::{PrescriptionDirectory, RoleProvider};
//! use clearsight_core::authorize::ensure_role;
//! ```

pub mod authorize;
pub mod traits;

//! # clearsight-contracts
//!
//! Shared types, domain events, and error taxonomy for the CLEARSIGHT
//! vision-care claims workspace.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod claim;
pub mod error;
pub mod event;
pub mod identity;
pub mod policy;
pub mod prescription;
pub mod time;

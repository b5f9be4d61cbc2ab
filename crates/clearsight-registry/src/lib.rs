//! # clearsight-registry
//!
//! The prescription registry component: optometrist licensure, prescription
//! issuance, and validity checks.
//!
//! The registry owns prescription records and the per-patient issuance
//! index. It exposes its read side to the claims engine through the
//! `PrescriptionDirectory` trait, so the engine never sees the mutable
//! surface.

pub mod registry;

pub use registry::{PrescriptionRegistry, PrescriptionRequest};

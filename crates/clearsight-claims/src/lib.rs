//! # clearsight-claims
//!
//! The insurance claims engine: policy issuance, claim filing, and
//! adjudication for the CLEARSIGHT vision-care workspace.
//!
//! The engine owns policies and claims and depends on everything else —
//! licensure, patient identity, prescription validity, manufacturing
//! verification, the event ledger — through injected trait objects from
//! `clearsight-core`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clearsight_claims::{AdjudicationConfig, ClaimsEngine, PolicyRequest};
//!
//! let engine = ClaimsEngine::new(config, roles, identity, prescriptions, manufacturing, ledger);
//! let claim_id = engine.file_claim(&caller, policy_id, rx_id, 200, now)?;
//! ```

pub mod config;
pub mod engine;

pub use config::AdjudicationConfig;
pub use engine::{ClaimsEngine, PolicyRequest};

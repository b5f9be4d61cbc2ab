//! Prescription records.
//!
//! A prescription is immutable once issued. Its only time-dependent property
//! is validity, and expiry is exclusive: a prescription is already invalid at
//! exactly its expiry timestamp.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::{Address, PatientId};
use crate::time::Timestamp;

/// Monotonically assigned prescription identifier.
///
/// The registry's counter starts at 0 and pre-increments, so the first
/// issued prescription has ID 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrescriptionId(pub u64);

impl fmt::Display for PrescriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rx/{}", self.0)
    }
}

/// The refractive correction values of a prescription.
///
/// Powers (`sphere_*`, `cylinder_*`, `add_power`) are in hundredths of a
/// diopter, axes in whole degrees, and `pd` (pupillary distance) in tenths
/// of a millimeter. Signed because sphere and cylinder may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensParameters {
    pub sphere_right: i32,
    pub cylinder_right: i32,
    pub axis_right: i32,
    pub sphere_left: i32,
    pub cylinder_left: i32,
    pub axis_left: i32,
    pub add_power: i32,
    pub pd: i32,
}

/// An optometrist-issued optical correction record.
///
/// Owned by the prescription registry; claims reference it by ID but never
/// own or mutate it. Invariant: `expires_at > issued_at`, enforced at issue
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: PrescriptionId,
    pub patient_id: PatientId,
    /// The licensed optometrist who issued this prescription.
    pub optometrist: Address,
    pub lenses: LensParameters,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Prescription {
    /// Return true if this prescription is valid at `now`.
    ///
    /// Expiry is exclusive: `is_valid_at(expires_at)` is false.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

/// A manufacturing-verification record for dispensed glasses.
///
/// Produced by the external manufacturing-verification collaborator; the
/// claims engine only ever reads these, keyed by prescription ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlassesRecord {
    pub prescription_id: PrescriptionId,
    pub manufacturer: Address,
    /// Manufacturer's batch reference for the produced lenses.
    pub lens_batch: String,
    pub dispensed_at: Timestamp,
}

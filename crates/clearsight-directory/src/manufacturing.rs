//! In-memory implementation of `ManufacturingVerification`.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::info;

use clearsight_contracts::prescription::{GlassesRecord, PrescriptionId};
use clearsight_core::traits::ManufacturingVerification;

/// An insert-only, in-memory manufacturing-verification record store.
///
/// Stand-in for the external manufacturing collaborator in tests and the
/// demo. At most one dispensed-glasses record exists per prescription; the
/// first record wins and later writes are ignored.
#[derive(Default)]
pub struct ManufacturingDirectory {
    state: Mutex<HashMap<PrescriptionId, GlassesRecord>>,
}

impl ManufacturingDirectory {
    /// Create an empty manufacturing directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that glasses were produced and dispensed for a prescription.
    ///
    /// Returns true if the record is new; false if the prescription already
    /// has one (existing record is kept).
    pub fn record_dispensed(&self, record: GlassesRecord) -> bool {
        let mut state = self.state.lock().expect("manufacturing state lock poisoned");
        if state.contains_key(&record.prescription_id) {
            return false;
        }
        info!(
            prescription = %record.prescription_id,
            manufacturer = %record.manufacturer,
            lens_batch = %record.lens_batch,
            "glasses dispensed"
        );
        state.insert(record.prescription_id, record);
        true
    }
}

impl ManufacturingVerification for ManufacturingDirectory {
    fn glasses_for(&self, prescription: PrescriptionId) -> Option<GlassesRecord> {
        let state = self.state.lock().expect("manufacturing state lock poisoned");
        state.get(&prescription).cloned()
    }
}

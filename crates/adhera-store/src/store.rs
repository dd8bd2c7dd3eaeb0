//! The relational store boundary.
//!
//! `CohortStore` is the seam between the pipeline and whatever relational
//! store persists the dataset. The pipeline only inserts and loads — the
//! schema is append-only, so no update or delete operation exists on the
//! trait at all. Business logic never lives behind this boundary; the
//! aggregator always runs over a loaded, typed `Cohort`.

use tracing::info;

use adhera_contracts::entity::{Cohort, DoseRecord, Medication, Patient};
use adhera_contracts::error::AdheraResult;

/// A persistence backend for the three entity tables.
///
/// Implementations must enforce the schema's constraints on insert:
/// primary-key uniqueness for patients and medications, and foreign-key
/// existence for medications and dose records. A constraint violation is
/// surfaced as an error, never silently dropped.
pub trait CohortStore {
    /// Insert one patient row. Fails on a duplicate patient id.
    fn insert_patient(&self, patient: &Patient) -> AdheraResult<()>;

    /// Insert one medication row. Fails on a duplicate medication id or a
    /// missing owning patient.
    fn insert_medication(&self, medication: &Medication) -> AdheraResult<()>;

    /// Insert one dose record. Fails if the referenced patient or
    /// medication does not exist.
    fn insert_dose_record(&self, record: &DoseRecord) -> AdheraResult<()>;

    /// Load the full dataset back as a typed `Cohort`, entities in
    /// insertion order.
    fn load_cohort(&self) -> AdheraResult<Cohort>;

    /// Persist an entire generated cohort, table by table.
    ///
    /// Insertion order (patients, then medications, then dose records)
    /// guarantees every foreign key resolves at insert time for a cohort
    /// that satisfies the generator's invariants.
    fn save_cohort(&self, cohort: &Cohort) -> AdheraResult<()> {
        for patient in &cohort.patients {
            self.insert_patient(patient)?;
        }
        for medication in &cohort.medications {
            self.insert_medication(medication)?;
        }
        for record in &cohort.dose_records {
            self.insert_dose_record(record)?;
        }
        info!(
            patients = cohort.patients.len(),
            medications = cohort.medications.len(),
            dose_records = cohort.dose_records.len(),
            "cohort persisted"
        );
        Ok(())
    }
}

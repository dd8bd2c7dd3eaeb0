//! In-memory implementation of `CohortStore`.
//!
//! `InMemoryStore` is the reference implementation of the store boundary.
//! It keeps the three tables in `Vec`s protected by a `Mutex` and enforces
//! the schema's primary-key and foreign-key constraints on every insert,
//! the same checks a relational engine would run.
//!
//! The store is append-only: there is no update or delete path, so a row,
//! once inserted, is immutable for the lifetime of the store.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::debug;

use adhera_contracts::entity::{Cohort, DoseRecord, Medication, MedicationId, Patient, PatientId};
use adhera_contracts::error::{AdheraError, AdheraResult};

use crate::store::CohortStore;

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `InMemoryStore`.
struct TableState {
    patients: Vec<Patient>,
    medications: Vec<Medication>,
    dose_records: Vec<DoseRecord>,

    /// Index over `patients` for O(1) foreign-key checks.
    patient_ids: HashSet<PatientId>,
    /// Index over `medications` for O(1) foreign-key checks.
    medication_ids: HashSet<MedicationId>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory, append-only relational store for one cohort.
///
/// # Thread safety
///
/// Every operation acquires a `Mutex` internally; clones of the inner
/// `Arc` may be used from multiple threads without extra synchronization.
pub struct InMemoryStore {
    state: Arc<Mutex<TableState>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(TableState {
                patients: Vec::new(),
                medications: Vec::new(),
                dose_records: Vec::new(),
                patient_ids: HashSet::new(),
                medication_ids: HashSet::new(),
            })),
        }
    }

    /// Row counts per table: (patients, medications, dose records).
    pub fn table_counts(&self) -> AdheraResult<(usize, usize, usize)> {
        let state = self.lock()?;
        Ok((
            state.patients.len(),
            state.medications.len(),
            state.dose_records.len(),
        ))
    }

    fn lock(&self) -> AdheraResult<std::sync::MutexGuard<'_, TableState>> {
        self.state.lock().map_err(|e| AdheraError::StoreWrite {
            reason: format!("store state lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── CohortStore impl ──────────────────────────────────────────────────────────

impl CohortStore for InMemoryStore {
    /// Append one patient row, rejecting a duplicate primary key.
    fn insert_patient(&self, patient: &Patient) -> AdheraResult<()> {
        let mut state = self.lock()?;
        if !state.patient_ids.insert(patient.id) {
            return Err(AdheraError::StoreWrite {
                reason: format!("duplicate patient id {}", patient.id),
            });
        }
        state.patients.push(patient.clone());
        Ok(())
    }

    /// Append one medication row, rejecting a duplicate primary key or a
    /// dangling owner reference.
    fn insert_medication(&self, medication: &Medication) -> AdheraResult<()> {
        let mut state = self.lock()?;
        if !state.patient_ids.contains(&medication.patient_id) {
            return Err(AdheraError::DataIntegrity {
                reason: format!(
                    "medication {} references missing patient {}",
                    medication.id, medication.patient_id
                ),
            });
        }
        if !state.medication_ids.insert(medication.id) {
            return Err(AdheraError::StoreWrite {
                reason: format!("duplicate medication id {}", medication.id),
            });
        }
        state.medications.push(medication.clone());
        Ok(())
    }

    /// Append one dose record, rejecting dangling references.
    fn insert_dose_record(&self, record: &DoseRecord) -> AdheraResult<()> {
        let mut state = self.lock()?;
        if !state.patient_ids.contains(&record.patient_id) {
            return Err(AdheraError::DataIntegrity {
                reason: format!(
                    "dose record on {} references missing patient {}",
                    record.adherence_date, record.patient_id
                ),
            });
        }
        if !state.medication_ids.contains(&record.medication_id) {
            return Err(AdheraError::DataIntegrity {
                reason: format!(
                    "dose record on {} references missing medication {}",
                    record.adherence_date, record.medication_id
                ),
            });
        }
        state.dose_records.push(record.clone());
        Ok(())
    }

    /// Snapshot the three tables back into a typed `Cohort`, preserving
    /// insertion order.
    fn load_cohort(&self) -> AdheraResult<Cohort> {
        let state = self.lock()?;
        debug!(
            patients = state.patients.len(),
            medications = state.medications.len(),
            dose_records = state.dose_records.len(),
            "loading cohort from store"
        );
        Ok(Cohort {
            patients: state.patients.clone(),
            medications: state.medications.clone(),
            dose_records: state.dose_records.clone(),
        })
    }
}

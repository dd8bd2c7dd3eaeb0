//! The cohort generator.
//!
//! `generate` turns a validated `PipelineConfig` and a `RandomSource` into
//! a complete, internally consistent `Cohort`. The draw order below is part
//! of the contract, not an implementation accident: reordering any draw
//! changes the output of every later draw even under the same seed.
//!
//! Draw order:
//!
//! 1. Patients, for id 1..=n: age `[18,80)`, gender index `[0,2)`,
//!    condition index `[0,4)`, registration day offset `[0,365)`.
//! 2. Per patient in id order: medication count `[1,4)`; per medication:
//!    drug index `[0,5)`, prescription day offset `[0,300)`, then exactly
//!    30 dose draws, one per day offset, each a single index draw `[0,4)`
//!    into the multiset `[0, 1, 1, 1]` (75% taken).

use chrono::Duration;
use tracing::{debug, info};

use adhera_contracts::config::PipelineConfig;
use adhera_contracts::entity::{
    base_date, ChronicCondition, Cohort, DoseRecord, DrugName, Gender, Medication, MedicationId,
    Patient, PatientId, DOSES_PER_MEDICATION, STANDARD_DOSAGE,
};
use adhera_contracts::error::AdheraResult;

use crate::source::{RandomSource, StdSource};

/// The dose-taken multiset: one miss for every three taken doses.
const DOSE_MULTISET: [u8; 4] = [0, 1, 1, 1];

/// Registration dates fall within one year of the base date.
const REGISTRATION_WINDOW_DAYS: u64 = 365;

/// Prescription dates fall within 300 days of the base date.
const PRESCRIPTION_WINDOW_DAYS: u64 = 300;

/// Generate a cohort from an explicit random source.
///
/// Validates `config` first — generation never starts on an invalid
/// configuration. Given a valid configuration the generator is total: it
/// cannot fail at runtime.
///
/// The output satisfies the dataset invariants by construction: every
/// medication's patient exists before the medication is created, every
/// dose record's medication exists before the record is created, and each
/// medication carries exactly `DOSES_PER_MEDICATION` records covering day
/// offsets `0..30` with no gaps or duplicates.
pub fn generate(config: &PipelineConfig, source: &mut dyn RandomSource) -> AdheraResult<Cohort> {
    config.validate()?;

    let n_patients = config.n_patients;
    debug!(n_patients, seed = config.seed, "generating synthetic cohort");

    // Phase 1: all patients, fully, before any medication draw.
    let mut patients = Vec::with_capacity(n_patients as usize);
    for i in 1..=n_patients {
        let age = source.next_in(18, 80) as u8;
        let gender = Gender::ALL[source.next_in(0, 2) as usize];
        let condition = ChronicCondition::ALL[source.next_in(0, 4) as usize];
        let registration_date =
            base_date() + Duration::days(source.next_in(0, REGISTRATION_WINDOW_DAYS) as i64);

        patients.push(Patient {
            id: PatientId(i),
            age,
            gender,
            chronic_condition: condition,
            registration_date,
        });
    }

    // Phase 2: medications and dose records, per patient in id order.
    // medication_id is a global counter — it does not reset per patient.
    let mut medications = Vec::new();
    let mut dose_records = Vec::new();
    let mut next_medication_id: u32 = 1;

    for patient in &patients {
        let num_meds = source.next_in(1, 4);
        for _ in 0..num_meds {
            let medication_id = MedicationId(next_medication_id);
            next_medication_id += 1;

            let drug_name = DrugName::ALL[source.next_in(0, 5) as usize];
            let prescribed_date =
                base_date() + Duration::days(source.next_in(0, PRESCRIPTION_WINDOW_DAYS) as i64);

            medications.push(Medication {
                id: medication_id,
                patient_id: patient.id,
                drug_name,
                prescribed_date,
                dosage: STANDARD_DOSAGE.to_string(),
            });

            for day in 0..DOSES_PER_MEDICATION {
                let adherence_date = prescribed_date + Duration::days(i64::from(day));
                let doses_taken = DOSE_MULTISET[source.next_in(0, 4) as usize];
                dose_records.push(DoseRecord::new(
                    patient.id,
                    medication_id,
                    adherence_date,
                    doses_taken,
                    1,
                ));
            }
        }
    }

    info!(
        patients = patients.len(),
        medications = medications.len(),
        dose_records = dose_records.len(),
        seed = config.seed,
        "cohort generated"
    );

    Ok(Cohort {
        patients,
        medications,
        dose_records,
    })
}

/// Generate a cohort from the seed in `config`.
///
/// Convenience wrapper that builds the production `StdSource` from
/// `config.seed` and calls `generate`.
pub fn generate_seeded(config: &PipelineConfig) -> AdheraResult<Cohort> {
    let mut source = StdSource::from_seed(config.seed);
    generate(config, &mut source)
}

//! Core entity types for the synthetic adherence dataset.
//!
//! These types mirror the persisted relational schema:
//! `patients`, `medications`, and `adherence` (dose records).
//! Entities are created once by the cohort generator and never mutated or
//! deleted afterward — the dataset is append-only by construction.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every dose-taking history covers exactly this many consecutive days,
/// one record per day offset from the prescription date.
pub const DOSES_PER_MEDICATION: u32 = 30;

/// The anchor date for all generated registration and prescription dates.
pub fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("base date is a valid calendar date")
}

/// Stable identifier for a patient. Assigned as the 1-based generation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatientId(pub u32);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for a prescribed medication. Assigned from a global
/// 1-based counter that advances once per medication regardless of patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MedicationId(pub u32);

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Patient gender, as recorded in the cohort. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    /// All genders, in the order the generator draws from.
    pub const ALL: [Gender; 2] = [Gender::M, Gender::F];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The chronic condition a patient is being treated for. Closed set of four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChronicCondition {
    Hypertension,
    Diabetes,
    #[serde(rename = "Heart Disease")]
    HeartDisease,
    Asthma,
}

impl ChronicCondition {
    /// All conditions, in the order the generator draws from. This order is
    /// also the row order of the condition-level summary table.
    pub const ALL: [ChronicCondition; 4] = [
        ChronicCondition::Hypertension,
        ChronicCondition::Diabetes,
        ChronicCondition::HeartDisease,
        ChronicCondition::Asthma,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChronicCondition::Hypertension => "Hypertension",
            ChronicCondition::Diabetes => "Diabetes",
            ChronicCondition::HeartDisease => "Heart Disease",
            ChronicCondition::Asthma => "Asthma",
        }
    }
}

impl fmt::Display for ChronicCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The prescribed drug. Closed set of five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DrugName {
    Lisinopril,
    Metformin,
    Atorvastatin,
    Amlodipine,
    Albuterol,
}

impl DrugName {
    /// All drugs, in the order the generator draws from. This order is also
    /// the row order of the drug-level summary table.
    pub const ALL: [DrugName; 5] = [
        DrugName::Lisinopril,
        DrugName::Metformin,
        DrugName::Atorvastatin,
        DrugName::Amlodipine,
        DrugName::Albuterol,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DrugName::Lisinopril => "Lisinopril",
            DrugName::Metformin => "Metformin",
            DrugName::Atorvastatin => "Atorvastatin",
            DrugName::Amlodipine => "Amlodipine",
            DrugName::Albuterol => "Albuterol",
        }
    }
}

impl fmt::Display for DrugName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One patient in the synthetic cohort.
///
/// `age` is always in `18..=79`; `registration_date` falls within one year
/// of the base date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub age: u8,
    pub gender: Gender,
    pub chronic_condition: ChronicCondition,
    pub registration_date: NaiveDate,
}

/// One prescribed medication, owned by exactly one patient.
///
/// The owning patient always exists before the medication is created.
/// Each patient owns between one and three medications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: MedicationId,
    pub patient_id: PatientId,
    pub drug_name: DrugName,
    pub prescribed_date: NaiveDate,
    /// Fixed dosage directive in this model.
    pub dosage: String,
}

/// The fixed dosage directive attached to every generated medication.
pub const STANDARD_DOSAGE: &str = "1 tablet daily";

/// One day's dose-taking record for one medication.
///
/// `adherence_date` is the medication's prescription date plus a day offset
/// in `0..DOSES_PER_MEDICATION`. Both foreign keys always reference
/// existing entities in generator-produced data; the aggregator re-checks
/// this for externally supplied data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseRecord {
    pub patient_id: PatientId,
    pub medication_id: MedicationId,
    pub adherence_date: NaiveDate,
    /// 0 or 1 in this model.
    pub doses_taken: u8,
    /// Always 1 in this model.
    pub doses_prescribed: u8,
    /// `doses_taken / doses_prescribed * 100`, or 0 when nothing was
    /// prescribed. Always 0.0 or 100.0 given the model above.
    pub adherence_percentage: f64,
}

impl DoseRecord {
    /// Build a record, deriving `adherence_percentage` from the dose counts.
    pub fn new(
        patient_id: PatientId,
        medication_id: MedicationId,
        adherence_date: NaiveDate,
        doses_taken: u8,
        doses_prescribed: u8,
    ) -> Self {
        let adherence_percentage = if doses_prescribed > 0 {
            f64::from(doses_taken) / f64::from(doses_prescribed) * 100.0
        } else {
            0.0
        };
        Self {
            patient_id,
            medication_id,
            adherence_date,
            doses_taken,
            doses_prescribed,
            adherence_percentage,
        }
    }
}

/// One complete generation run: the full synthetic population.
///
/// Contents are a pure function of `(seed, n_patients)` — regenerating with
/// the same inputs yields an equal cohort. Collections are ordered by
/// ascending identifier (dose records by medication, then day offset).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    pub patients: Vec<Patient>,
    pub medications: Vec<Medication>,
    pub dose_records: Vec<DoseRecord>,
}

//! Summary row types handed to the reporting collaborator.
//!
//! These are the output tables of the aggregator: per-patient summaries,
//! condition and drug roll-ups, and the category distribution. They are
//! plain serializable rows; the visualization collaborator reads them and
//! never writes back.

use std::fmt;

use serde::{Deserialize, Serialize};

use adhera_contracts::entity::{ChronicCondition, DrugName, PatientId};

/// Adherence band for a scored patient.
///
/// A pure function of the average; a patient with no dose records has no
/// category at all (represented as `None` on the summary row), never
/// `Poor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdherenceCategory {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl AdherenceCategory {
    /// All categories, best first. Row order of the category distribution.
    pub const ALL: [AdherenceCategory; 4] = [
        AdherenceCategory::Excellent,
        AdherenceCategory::Good,
        AdherenceCategory::Fair,
        AdherenceCategory::Poor,
    ];

    /// Classify an average adherence percentage.
    ///
    /// Bands, evaluated top-down: `>= 90` Excellent, `>= 75` Good,
    /// `>= 50` Fair, otherwise Poor. Total and deterministic for every
    /// finite input.
    pub fn from_average(avg_adherence: f64) -> Self {
        if avg_adherence >= 90.0 {
            AdherenceCategory::Excellent
        } else if avg_adherence >= 75.0 {
            AdherenceCategory::Good
        } else if avg_adherence >= 50.0 {
            AdherenceCategory::Fair
        } else {
            AdherenceCategory::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdherenceCategory::Excellent => "Excellent",
            AdherenceCategory::Good => "Good",
            AdherenceCategory::Fair => "Fair",
            AdherenceCategory::Poor => "Poor",
        }
    }
}

impl fmt::Display for AdherenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the per-patient summary table.
///
/// Left-outer semantics: a patient with no dose records still gets a row,
/// with `avg_adherence` and `adherence_category` both `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub patient_id: PatientId,
    pub age: u8,
    pub chronic_condition: ChronicCondition,
    /// Mean of `adherence_percentage` over the patient's dose records;
    /// `None` when the patient has no dose records.
    pub avg_adherence: Option<f64>,
    /// Distinct medications with at least one dose record.
    pub num_medications: usize,
    /// `None` exactly when `avg_adherence` is `None`.
    pub adherence_category: Option<AdherenceCategory>,
}

/// One row of the condition-level roll-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub chronic_condition: ChronicCondition,
    /// Mean of the non-null patient averages for this condition; `None`
    /// when no patient with the condition has any dose records.
    pub avg_adherence: Option<f64>,
}

/// One row of the drug-level roll-up: prescriptions per drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugSummary {
    pub drug_name: DrugName,
    pub count: usize,
}

/// Patient counts per adherence band, plus the unscored remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryDistribution {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
    /// Patients with no dose records, and therefore no category.
    pub unscored: usize,
}

impl CategoryDistribution {
    /// Total patients counted across all bands including unscored.
    pub fn total(&self) -> usize {
        self.excellent + self.good + self.fair + self.poor + self.unscored
    }

    /// The count for one category band.
    pub fn count(&self, category: AdherenceCategory) -> usize {
        match category {
            AdherenceCategory::Excellent => self.excellent,
            AdherenceCategory::Good => self.good,
            AdherenceCategory::Fair => self.fair,
            AdherenceCategory::Poor => self.poor,
        }
    }
}

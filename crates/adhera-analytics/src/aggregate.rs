//! The adherence aggregator.
//!
//! Pure functions over the generated collections. Nothing here mutates a
//! patient, medication, or dose record — the aggregator reads the cohort
//! and produces new summary rows.
//!
//! Every entry point that walks dose records validates referential
//! integrity first. Generator-produced cohorts satisfy the foreign-key
//! invariants by construction; the check exists for externally supplied
//! data, where a dangling reference must abort aggregation rather than
//! silently skew the averages.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use adhera_contracts::entity::{ChronicCondition, Cohort, DrugName, MedicationId, PatientId};
use adhera_contracts::error::{AdheraError, AdheraResult};

use crate::summary::{
    AdherenceCategory, CategoryDistribution, ConditionSummary, DrugSummary, PatientSummary,
};

/// Check every foreign key in the cohort.
///
/// Verifies that each medication's owner exists, that each dose record's
/// patient and medication exist, and that a dose record's stored patient
/// agrees with its medication's owner. Returns
/// `AdheraError::DataIntegrity` naming the first dangling identifier.
pub fn validate_integrity(cohort: &Cohort) -> AdheraResult<()> {
    let patient_ids: HashSet<PatientId> = cohort.patients.iter().map(|p| p.id).collect();
    let mut medication_owner: HashMap<MedicationId, PatientId> = HashMap::new();

    for medication in &cohort.medications {
        if !patient_ids.contains(&medication.patient_id) {
            warn!(
                medication_id = %medication.id,
                patient_id = %medication.patient_id,
                "medication references missing patient"
            );
            return Err(AdheraError::DataIntegrity {
                reason: format!(
                    "medication {} references missing patient {}",
                    medication.id, medication.patient_id
                ),
            });
        }
        medication_owner.insert(medication.id, medication.patient_id);
    }

    for record in &cohort.dose_records {
        if !patient_ids.contains(&record.patient_id) {
            return Err(AdheraError::DataIntegrity {
                reason: format!(
                    "dose record on {} references missing patient {}",
                    record.adherence_date, record.patient_id
                ),
            });
        }
        match medication_owner.get(&record.medication_id) {
            None => {
                return Err(AdheraError::DataIntegrity {
                    reason: format!(
                        "dose record on {} references missing medication {}",
                        record.adherence_date, record.medication_id
                    ),
                });
            }
            Some(owner) if *owner != record.patient_id => {
                return Err(AdheraError::DataIntegrity {
                    reason: format!(
                        "dose record for patient {} uses medication {} owned by patient {}",
                        record.patient_id, record.medication_id, owner
                    ),
                });
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Per-patient accumulator for one pass over the dose records.
#[derive(Default)]
struct PatientAccumulator {
    percentage_sum: f64,
    record_count: usize,
    medications: HashSet<MedicationId>,
}

/// Compute the left-outer per-patient summary table.
///
/// Every patient gets a row, including those with no dose records (whose
/// `avg_adherence` and `adherence_category` are `None` — an undefined
/// average is never coerced to 0 or to `Poor`). `num_medications` counts
/// distinct medications with at least one dose record.
///
/// Rows are ordered by `avg_adherence` descending, unscored patients last,
/// ties broken by ascending patient id.
pub fn compute_patient_summaries(cohort: &Cohort) -> AdheraResult<Vec<PatientSummary>> {
    validate_integrity(cohort)?;

    let mut accumulators: HashMap<PatientId, PatientAccumulator> = HashMap::new();
    for record in &cohort.dose_records {
        let acc = accumulators.entry(record.patient_id).or_default();
        acc.percentage_sum += record.adherence_percentage;
        acc.record_count += 1;
        acc.medications.insert(record.medication_id);
    }

    let mut summaries: Vec<PatientSummary> = cohort
        .patients
        .iter()
        .map(|patient| {
            let (avg_adherence, num_medications) = match accumulators.get(&patient.id) {
                Some(acc) if acc.record_count > 0 => (
                    Some(acc.percentage_sum / acc.record_count as f64),
                    acc.medications.len(),
                ),
                _ => (None, 0),
            };
            PatientSummary {
                patient_id: patient.id,
                age: patient.age,
                chronic_condition: patient.chronic_condition,
                avg_adherence,
                num_medications,
                adherence_category: avg_adherence.map(AdherenceCategory::from_average),
            }
        })
        .collect();

    summaries.sort_by(|a, b| match (a.avg_adherence, b.avg_adherence) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(Ordering::Equal)
            .then(a.patient_id.cmp(&b.patient_id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.patient_id.cmp(&b.patient_id),
    });

    debug!(rows = summaries.len(), "patient summaries computed");
    Ok(summaries)
}

/// Select the intervention shortlist: scored patients below `threshold`,
/// worst first.
///
/// Unscored patients (no dose records) are excluded — an undefined average
/// is not evidence of poor adherence. Ties are broken by ascending patient
/// id, and the result is truncated to `limit`.
pub fn identify_intervention_candidates(
    summaries: &[PatientSummary],
    threshold: f64,
    limit: usize,
) -> Vec<PatientSummary> {
    let mut candidates: Vec<PatientSummary> = summaries
        .iter()
        .filter(|s| matches!(s.avg_adherence, Some(avg) if avg < threshold))
        .cloned()
        .collect();

    candidates.sort_by(|a, b| {
        // Filter above guarantees both averages are present.
        let x = a.avg_adherence.unwrap_or(f64::MAX);
        let y = b.avg_adherence.unwrap_or(f64::MAX);
        x.partial_cmp(&y)
            .unwrap_or(Ordering::Equal)
            .then(a.patient_id.cmp(&b.patient_id))
    });
    candidates.truncate(limit);

    info!(
        candidates = candidates.len(),
        threshold, limit, "intervention shortlist computed"
    );
    candidates
}

/// Roll patient averages up to condition level.
///
/// For each condition present among the patients, the mean of the non-null
/// patient averages. Patients with an undefined average are excluded from
/// the mean, not treated as 0; a condition whose patients are all unscored
/// yields `None`. Rows appear in condition declaration order.
pub fn condition_level_summary(summaries: &[PatientSummary]) -> Vec<ConditionSummary> {
    ChronicCondition::ALL
        .iter()
        .filter(|condition| summaries.iter().any(|s| s.chronic_condition == **condition))
        .map(|condition| {
            let scored: Vec<f64> = summaries
                .iter()
                .filter(|s| s.chronic_condition == *condition)
                .filter_map(|s| s.avg_adherence)
                .collect();
            let avg_adherence = if scored.is_empty() {
                None
            } else {
                Some(scored.iter().sum::<f64>() / scored.len() as f64)
            };
            ConditionSummary {
                chronic_condition: *condition,
                avg_adherence,
            }
        })
        .collect()
}

/// Count prescriptions per drug across the whole cohort.
///
/// Rows appear in drug declaration order; drugs with no prescriptions are
/// omitted.
pub fn drug_level_summary(cohort: &Cohort) -> Vec<DrugSummary> {
    DrugName::ALL
        .iter()
        .map(|drug| DrugSummary {
            drug_name: *drug,
            count: cohort
                .medications
                .iter()
                .filter(|m| m.drug_name == *drug)
                .count(),
        })
        .filter(|row| row.count > 0)
        .collect()
}

/// Count patients per adherence band.
pub fn category_distribution(summaries: &[PatientSummary]) -> CategoryDistribution {
    let mut dist = CategoryDistribution::default();
    for summary in summaries {
        match summary.adherence_category {
            Some(AdherenceCategory::Excellent) => dist.excellent += 1,
            Some(AdherenceCategory::Good) => dist.good += 1,
            Some(AdherenceCategory::Fair) => dist.fair += 1,
            Some(AdherenceCategory::Poor) => dist.poor += 1,
            None => dist.unscored += 1,
        }
    }
    dist
}

/// Cohort-wide mean of the non-null patient averages.
///
/// `None` when no patient has a defined average (including the empty
/// cohort).
pub fn overall_average(summaries: &[PatientSummary]) -> Option<f64> {
    let scored: Vec<f64> = summaries.iter().filter_map(|s| s.avg_adherence).collect();
    if scored.is_empty() {
        None
    } else {
        Some(scored.iter().sum::<f64>() / scored.len() as f64)
    }
}

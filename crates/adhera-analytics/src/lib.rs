//! # adhera-analytics
//!
//! The adherence aggregator: turns a generated `Cohort` into per-patient
//! summaries, an intervention shortlist, and condition/drug roll-ups.
//!
//! All operations are pure functions over borrowed collections. Dangling
//! foreign keys in externally supplied data abort aggregation with
//! `AdheraError::DataIntegrity`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use adhera_analytics::AdherenceReport;
//!
//! let report = AdherenceReport::build(RunId::new(), &config, &cohort)?;
//! ```

pub mod aggregate;
pub mod report;
pub mod summary;

pub use aggregate::{
    category_distribution, compute_patient_summaries, condition_level_summary, drug_level_summary,
    identify_intervention_candidates, overall_average, validate_integrity,
};
pub use report::AdherenceReport;
pub use summary::{
    AdherenceCategory, CategoryDistribution, ConditionSummary, DrugSummary, PatientSummary,
};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use adhera_cohort::{generate, ScriptedSource};
    use adhera_contracts::config::PipelineConfig;
    use adhera_contracts::entity::{
        base_date, ChronicCondition, Cohort, DoseRecord, DrugName, Gender, Medication,
        MedicationId, Patient, PatientId, STANDARD_DOSAGE,
    };
    use adhera_contracts::error::AdheraError;
    use adhera_contracts::run::RunId;

    use super::{
        category_distribution, compute_patient_summaries, condition_level_summary,
        drug_level_summary, identify_intervention_candidates, overall_average, validate_integrity,
        AdherenceCategory, AdherenceReport,
    };

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn patient(id: u32, condition: ChronicCondition) -> Patient {
        Patient {
            id: PatientId(id),
            age: 50,
            gender: Gender::F,
            chronic_condition: condition,
            registration_date: base_date(),
        }
    }

    fn medication(id: u32, patient_id: u32, drug: DrugName) -> Medication {
        Medication {
            id: MedicationId(id),
            patient_id: PatientId(patient_id),
            drug_name: drug,
            prescribed_date: base_date(),
            dosage: STANDARD_DOSAGE.to_string(),
        }
    }

    /// One dose record per entry of `taken`, on consecutive days.
    fn doses(patient_id: u32, medication_id: u32, taken: &[u8]) -> Vec<DoseRecord> {
        taken
            .iter()
            .enumerate()
            .map(|(day, &t)| {
                DoseRecord::new(
                    PatientId(patient_id),
                    MedicationId(medication_id),
                    base_date() + Duration::days(day as i64),
                    t,
                    1,
                )
            })
            .collect()
    }

    fn cohort(
        patients: Vec<Patient>,
        medications: Vec<Medication>,
        dose_records: Vec<DoseRecord>,
    ) -> Cohort {
        Cohort {
            patients,
            medications,
            dose_records,
        }
    }

    /// Three patients: 100% (id 1), 50% (id 2), unscored (id 3).
    fn mixed_cohort() -> Cohort {
        let patients = vec![
            patient(1, ChronicCondition::Diabetes),
            patient(2, ChronicCondition::Diabetes),
            patient(3, ChronicCondition::Asthma),
        ];
        let medications = vec![
            medication(1, 1, DrugName::Metformin),
            medication(2, 2, DrugName::Lisinopril),
            medication(3, 3, DrugName::Albuterol), // never dosed
        ];
        let mut dose_records = doses(1, 1, &[1, 1, 1, 1]);
        dose_records.extend(doses(2, 2, &[1, 0, 1, 0]));
        cohort(patients, medications, dose_records)
    }

    // ── Left-outer per-patient summary ───────────────────────────────────────

    /// A patient with no dose records gets a row with an undefined average
    /// and no category — never Poor, never zero.
    #[test]
    fn unscored_patient_has_null_average() {
        let summaries = compute_patient_summaries(&mixed_cohort()).unwrap();
        assert_eq!(summaries.len(), 3);

        let unscored = summaries
            .iter()
            .find(|s| s.patient_id == PatientId(3))
            .unwrap();
        assert_eq!(unscored.avg_adherence, None);
        assert_eq!(unscored.adherence_category, None);
        assert_eq!(unscored.num_medications, 0);
    }

    /// Rows are ordered by average descending with unscored patients last.
    #[test]
    fn summaries_ordered_best_first_nulls_last() {
        let summaries = compute_patient_summaries(&mixed_cohort()).unwrap();
        let ids: Vec<PatientId> = summaries.iter().map(|s| s.patient_id).collect();
        assert_eq!(ids, vec![PatientId(1), PatientId(2), PatientId(3)]);
        assert_eq!(summaries[0].avg_adherence, Some(100.0));
        assert_eq!(summaries[1].avg_adherence, Some(50.0));
    }

    /// Equal averages fall back to ascending patient id.
    #[test]
    fn summary_ties_broken_by_patient_id() {
        let patients = vec![
            patient(2, ChronicCondition::Asthma),
            patient(1, ChronicCondition::Asthma),
        ];
        let medications = vec![
            medication(1, 2, DrugName::Albuterol),
            medication(2, 1, DrugName::Albuterol),
        ];
        let mut dose_records = doses(2, 1, &[1, 0]);
        dose_records.extend(doses(1, 2, &[1, 0]));

        let summaries =
            compute_patient_summaries(&cohort(patients, medications, dose_records)).unwrap();
        let ids: Vec<PatientId> = summaries.iter().map(|s| s.patient_id).collect();
        assert_eq!(ids, vec![PatientId(1), PatientId(2)]);
    }

    /// `num_medications` counts distinct medications with at least one
    /// dose record, not prescriptions on paper.
    #[test]
    fn num_medications_counts_dosed_medications_only() {
        let patients = vec![patient(1, ChronicCondition::Hypertension)];
        let medications = vec![
            medication(1, 1, DrugName::Lisinopril),
            medication(2, 1, DrugName::Amlodipine), // prescribed, never dosed
        ];
        let dose_records = doses(1, 1, &[1, 1]);

        let summaries =
            compute_patient_summaries(&cohort(patients, medications, dose_records)).unwrap();
        assert_eq!(summaries[0].num_medications, 1);
    }

    /// Category is derived from the average through the band function.
    #[test]
    fn categories_assigned_from_average() {
        let summaries = compute_patient_summaries(&mixed_cohort()).unwrap();
        assert_eq!(
            summaries[0].adherence_category,
            Some(AdherenceCategory::Excellent)
        );
        assert_eq!(summaries[1].adherence_category, Some(AdherenceCategory::Fair));
    }

    /// An empty cohort yields empty tables, not an error.
    #[test]
    fn empty_cohort_yields_empty_results() {
        let empty = cohort(vec![], vec![], vec![]);
        let summaries = compute_patient_summaries(&empty).unwrap();
        assert!(summaries.is_empty());
        assert!(identify_intervention_candidates(&summaries, 75.0, 20).is_empty());
        assert!(condition_level_summary(&summaries).is_empty());
        assert!(drug_level_summary(&empty).is_empty());
        assert_eq!(overall_average(&summaries), None);
    }

    // ── Intervention shortlist ───────────────────────────────────────────────

    /// Candidates are below the threshold, worst first, and never include
    /// an unscored patient.
    #[test]
    fn candidates_below_threshold_worst_first() {
        let summaries = compute_patient_summaries(&mixed_cohort()).unwrap();
        let candidates = identify_intervention_candidates(&summaries, 75.0, 20);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].patient_id, PatientId(2));
        for candidate in &candidates {
            let avg = candidate.avg_adherence.expect("candidates are always scored");
            assert!(avg < 75.0);
        }
    }

    /// A patient exactly at the threshold is not a candidate.
    #[test]
    fn candidate_threshold_is_exclusive() {
        let patients = vec![patient(1, ChronicCondition::Diabetes)];
        let medications = vec![medication(1, 1, DrugName::Metformin)];
        let dose_records = doses(1, 1, &[1, 1, 1, 0]); // exactly 75.0

        let summaries =
            compute_patient_summaries(&cohort(patients, medications, dose_records)).unwrap();
        assert_eq!(summaries[0].avg_adherence, Some(75.0));
        assert!(identify_intervention_candidates(&summaries, 75.0, 20).is_empty());
    }

    /// The shortlist is truncated to the limit after sorting, so the worst
    /// patients survive the cut.
    #[test]
    fn candidates_truncated_to_limit() {
        let patients = vec![
            patient(1, ChronicCondition::Diabetes),
            patient(2, ChronicCondition::Diabetes),
            patient(3, ChronicCondition::Diabetes),
        ];
        let medications = vec![
            medication(1, 1, DrugName::Metformin),
            medication(2, 2, DrugName::Metformin),
            medication(3, 3, DrugName::Metformin),
        ];
        let mut dose_records = doses(1, 1, &[1, 0, 0, 0]); // 25%
        dose_records.extend(doses(2, 2, &[0, 0, 0, 0])); // 0%
        dose_records.extend(doses(3, 3, &[1, 1, 0, 0])); // 50%

        let summaries =
            compute_patient_summaries(&cohort(patients, medications, dose_records)).unwrap();
        let candidates = identify_intervention_candidates(&summaries, 75.0, 2);

        let ids: Vec<PatientId> = candidates.iter().map(|s| s.patient_id).collect();
        assert_eq!(ids, vec![PatientId(2), PatientId(1)]);
    }

    /// Equal averages on the shortlist are ordered by ascending patient id.
    #[test]
    fn candidate_ties_broken_by_patient_id() {
        let patients = vec![
            patient(5, ChronicCondition::Asthma),
            patient(2, ChronicCondition::Asthma),
        ];
        let medications = vec![
            medication(1, 5, DrugName::Albuterol),
            medication(2, 2, DrugName::Albuterol),
        ];
        let mut dose_records = doses(5, 1, &[0, 0]);
        dose_records.extend(doses(2, 2, &[0, 0]));

        let summaries =
            compute_patient_summaries(&cohort(patients, medications, dose_records)).unwrap();
        let candidates = identify_intervention_candidates(&summaries, 75.0, 20);
        let ids: Vec<PatientId> = candidates.iter().map(|s| s.patient_id).collect();
        assert_eq!(ids, vec![PatientId(2), PatientId(5)]);
    }

    // ── Condition and drug roll-ups ──────────────────────────────────────────

    /// Two diabetes patients at 100 and 50 average out to 75; the unscored
    /// asthma patient leaves that condition's mean undefined rather than
    /// dragging it to 0.
    #[test]
    fn condition_summary_means_and_nulls() {
        let summaries = compute_patient_summaries(&mixed_cohort()).unwrap();
        let rows = condition_level_summary(&summaries);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].chronic_condition, ChronicCondition::Diabetes);
        assert_eq!(rows[0].avg_adherence, Some(75.0));
        assert_eq!(rows[1].chronic_condition, ChronicCondition::Asthma);
        assert_eq!(rows[1].avg_adherence, None);
    }

    /// Drug counts cover the whole cohort, in declaration order, and omit
    /// drugs nobody was prescribed.
    #[test]
    fn drug_summary_counts_prescriptions() {
        let rows = drug_level_summary(&mixed_cohort());
        let counts: Vec<(DrugName, usize)> = rows.iter().map(|r| (r.drug_name, r.count)).collect();
        assert_eq!(
            counts,
            vec![
                (DrugName::Lisinopril, 1),
                (DrugName::Metformin, 1),
                (DrugName::Albuterol, 1),
            ]
        );
    }

    // ── Distribution and overall average ─────────────────────────────────────

    #[test]
    fn category_distribution_counts_all_bands() {
        let summaries = compute_patient_summaries(&mixed_cohort()).unwrap();
        let dist = category_distribution(&summaries);
        assert_eq!(dist.excellent, 1);
        assert_eq!(dist.fair, 1);
        assert_eq!(dist.unscored, 1);
        assert_eq!(dist.total(), 3);
    }

    /// The cohort-wide mean skips unscored patients.
    #[test]
    fn overall_average_excludes_unscored() {
        let summaries = compute_patient_summaries(&mixed_cohort()).unwrap();
        assert_eq!(overall_average(&summaries), Some(75.0));
    }

    // ── Integrity validation ─────────────────────────────────────────────────

    /// A dose record pointing at a medication nobody was prescribed aborts
    /// aggregation with the offending id in the message.
    #[test]
    fn dangling_medication_reference_rejected() {
        let mut bad = mixed_cohort();
        bad.dose_records
            .extend(doses(1, 99, &[1]));
        match compute_patient_summaries(&bad) {
            Err(AdheraError::DataIntegrity { reason }) => {
                assert!(reason.contains("99"), "reason: {}", reason);
            }
            other => panic!("expected DataIntegrity, got {:?}", other),
        }
    }

    /// A medication owned by a nonexistent patient is rejected.
    #[test]
    fn dangling_patient_reference_rejected() {
        let mut bad = mixed_cohort();
        bad.medications.push(medication(4, 42, DrugName::Amlodipine));
        match validate_integrity(&bad) {
            Err(AdheraError::DataIntegrity { reason }) => {
                assert!(reason.contains("42"), "reason: {}", reason);
            }
            other => panic!("expected DataIntegrity, got {:?}", other),
        }
    }

    /// A dose record whose patient disagrees with the medication's owner
    /// is rejected even though both entities exist.
    #[test]
    fn mismatched_dose_ownership_rejected() {
        let mut bad = mixed_cohort();
        // Medication 1 belongs to patient 1; record it against patient 2.
        bad.dose_records.extend(doses(2, 1, &[1]));
        assert!(matches!(
            validate_integrity(&bad),
            Err(AdheraError::DataIntegrity { .. })
        ));
    }

    // ── End-to-end scenarios ─────────────────────────────────────────────────

    /// One generated patient with a single forced medication and every
    /// dose taken scores a 100.0 average and lands in Excellent.
    #[test]
    fn generated_full_adherence_is_excellent() {
        let config = PipelineConfig {
            seed: 42,
            n_patients: 1,
            ..PipelineConfig::default()
        };
        let mut script = vec![45, 0, 1, 10, 1, 2, 5];
        script.extend(std::iter::repeat(1).take(30));
        let mut source = ScriptedSource::new(script);
        let cohort = generate(&config, &mut source).unwrap();

        let summaries = compute_patient_summaries(&cohort).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].avg_adherence, Some(100.0));
        assert_eq!(
            summaries[0].adherence_category,
            Some(AdherenceCategory::Excellent)
        );
        assert!(identify_intervention_candidates(&summaries, 75.0, 20).is_empty());
    }

    /// The assembled report is internally consistent with its tables.
    #[test]
    fn report_build_is_consistent() {
        let config = PipelineConfig::default();
        let cohort = mixed_cohort();
        let report = AdherenceReport::build(RunId::new(), &config, &cohort).unwrap();

        assert_eq!(report.n_patients, 3);
        assert_eq!(report.seed, config.seed);
        assert_eq!(report.patient_summary.len(), 3);
        assert_eq!(report.intervention_list.len(), 1);
        assert_eq!(report.category_distribution.total(), 3);
        assert_eq!(report.overall_average, Some(75.0));
    }
}

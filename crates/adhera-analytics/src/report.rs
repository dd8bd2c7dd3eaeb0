//! The assembled adherence report.
//!
//! `AdherenceReport` bundles every aggregator output table into one
//! serializable document — the handoff to the visualization collaborator,
//! which reads it and never writes back.

use serde::{Deserialize, Serialize};

use adhera_contracts::config::PipelineConfig;
use adhera_contracts::entity::Cohort;
use adhera_contracts::error::AdheraResult;
use adhera_contracts::run::RunId;

use crate::aggregate::{
    category_distribution, compute_patient_summaries, condition_level_summary, drug_level_summary,
    identify_intervention_candidates, overall_average,
};
use crate::summary::{CategoryDistribution, ConditionSummary, DrugSummary, PatientSummary};

/// Every output table of one aggregation run, plus run provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdherenceReport {
    /// The pipeline run that produced this report.
    pub run_id: RunId,
    /// Seed the cohort was generated from (from the run's configuration).
    pub seed: u64,
    /// Number of patients in the cohort.
    pub n_patients: usize,
    /// Mean of the non-null patient averages across the cohort.
    pub overall_average: Option<f64>,
    /// Per-patient rows, best adherence first, unscored last.
    pub patient_summary: Vec<PatientSummary>,
    /// Scored patients below the intervention threshold, worst first.
    pub intervention_list: Vec<PatientSummary>,
    pub condition_summary: Vec<ConditionSummary>,
    pub drug_summary: Vec<DrugSummary>,
    pub category_distribution: CategoryDistribution,
}

impl AdherenceReport {
    /// Run the full aggregation over `cohort` and assemble the report.
    ///
    /// Fails with `AdheraError::DataIntegrity` if the cohort contains a
    /// dangling reference; every table is otherwise a pure function of the
    /// cohort and the thresholds in `config`.
    pub fn build(run_id: RunId, config: &PipelineConfig, cohort: &Cohort) -> AdheraResult<Self> {
        let patient_summary = compute_patient_summaries(cohort)?;
        let intervention_list = identify_intervention_candidates(
            &patient_summary,
            config.intervention_threshold,
            config.intervention_limit,
        );
        let condition_summary = condition_level_summary(&patient_summary);
        let drug_summary = drug_level_summary(cohort);
        let category_distribution = category_distribution(&patient_summary);
        let overall_average = overall_average(&patient_summary);

        Ok(Self {
            run_id,
            seed: config.seed,
            n_patients: cohort.patients.len(),
            overall_average,
            patient_summary,
            intervention_list,
            condition_summary,
            drug_summary,
            category_distribution,
        })
    }
}

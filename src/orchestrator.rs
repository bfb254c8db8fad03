// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Recon Orchestrator
 * Sequences collection, aggregation and validation for one run
 *
 * Degraded sources and a missing/overrunning probe never fail a run;
 * only workspace creation and aggregation I/O do. The workspace
 * retain/discard decision belongs to the caller once run() returns.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::aggregator;
use crate::collector::ParallelCollector;
use crate::config::RunConfig;
use crate::errors::ReconResult;
use crate::sources::{self, DiscoverySource};
use crate::types::{
    FinalReport, ProgressEvent, ProgressSender, RunContext, SourceSummary, ValidationOutcome,
};
use crate::validation::{HttpxEngine, LivenessEngine, ValidationStage};
use crate::workspace::Workspace;
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// A completed run: the report, the validation detail, and the still-open
/// workspace awaiting the caller's retain/discard decision.
#[derive(Debug)]
pub struct ReconRun {
    pub report: FinalReport,
    pub validation: ValidationOutcome,
    pub workspace: Workspace,
}

pub struct ReconEngine {
    config: RunConfig,
    sources: Vec<Arc<dyn DiscoverySource>>,
    liveness: Arc<dyn LivenessEngine>,
}

impl ReconEngine {
    /// Engine over the static source registry and the httpx probe.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            sources: sources::registry(),
            liveness: Arc::new(HttpxEngine),
        }
    }

    /// Replace the source set (tests, embedders).
    pub fn with_sources(mut self, sources: Vec<Arc<dyn DiscoverySource>>) -> Self {
        self.sources = sources;
        self
    }

    /// Replace the liveness engine (tests, embedders).
    pub fn with_liveness(mut self, engine: Arc<dyn LivenessEngine>) -> Self {
        self.liveness = engine;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the full pipeline: workspace -> collect -> merge -> validate.
    pub async fn run(&self, progress: Option<ProgressSender>) -> ReconResult<ReconRun> {
        let started_at = chrono::Utc::now();
        let clock = Instant::now();
        let run_id = generate_run_id();

        info!(
            "[Engine] Starting recon run {} for {}",
            run_id, self.config.domain
        );

        let work_root = self.config.work_root();
        let workspace = Workspace::create(&work_root, &run_id)?;

        let ctx = Arc::new(RunContext::new(
            self.config.domain.clone(),
            run_id.clone(),
            workspace.root().to_path_buf(),
            self.config.verbose,
            self.config.source_timeout(),
            self.config.passive_timeout(),
            self.config.probe_timeout(),
            progress,
        ));

        let collector = ParallelCollector::new(self.sources.clone());
        let reports = collector.collect_all(&ctx).await;

        let merged = aggregator::merge(reports.values())?;
        let merged_path = ctx.merged_artifact();
        aggregator::persist(&merged, &merged_path)?;
        ctx.emit(ProgressEvent::MergeCompleted {
            unique_hosts: merged.len(),
        });

        // Final artifact lives outside the workspace so it survives cleanup.
        let report_path = work_root.join(format!("{}-subs.txt", self.config.domain));
        let stage = ValidationStage::new(
            Arc::clone(&self.liveness),
            self.config.status_allow_list.clone(),
        );
        let validation = stage
            .validate(&merged, &merged_path, &report_path, &ctx)
            .await;

        let mut source_rows: Vec<SourceSummary> = reports
            .values()
            .map(|r| SourceSummary {
                source: r.source.clone(),
                outcome: r.outcome.clone(),
                hostnames: r.hostnames.len(),
            })
            .collect();
        source_rows.sort_by(|a, b| a.source.cmp(&b.source));

        let validation_skip_reason = match &validation {
            ValidationOutcome::Skipped { reason } => Some(reason.clone()),
            ValidationOutcome::Validated { .. } => None,
        };

        let report = FinalReport {
            domain: self.config.domain.clone(),
            run_id,
            started_at: started_at.to_rfc3339(),
            completed_at: chrono::Utc::now().to_rfc3339(),
            duration_seconds: clock.elapsed().as_secs_f64(),
            merged_count: merged.len(),
            validated_count: validation.records().len(),
            validation_skipped: validation.is_skipped(),
            validation_skip_reason,
            sources: source_rows,
            merged_artifact: merged_path,
            report_artifact: report_path.exists().then_some(report_path),
            workspace: workspace.root().to_path_buf(),
        };

        info!(
            "[Engine] Run {} complete: {} merged, {} validated in {:.2}s",
            report.run_id, report.merged_count, report.validated_count, report.duration_seconds
        );

        Ok(ReconRun {
            report,
            validation,
            workspace,
        })
    }
}

/// Timestamp plus a random suffix; unique enough for workspace naming
/// without coordinating anything.
fn generate_run_id() -> String {
    let suffix: u16 = rand::rng().random();
    format!("{}-{:04x}", chrono::Utc::now().timestamp(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_differ() {
        let a = generate_run_id();
        let b = generate_run_id();
        // Same timestamp second is likely; the suffix keeps them distinct.
        assert!(a != b || a.len() >= 6);
    }
}

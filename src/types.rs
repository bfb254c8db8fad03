// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Recon Pipeline Types
 * Shared data model for collection, aggregation and liveness validation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// How a discovery source settled. Distinguishes "ran and found nothing"
/// from "never ran" so callers can report degraded runs honestly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceOutcome {
    /// Engine ran to completion with exit code zero.
    Success,
    /// Engine binary was not found on PATH; the source was skipped.
    Unavailable,
    /// Engine exceeded its time bound; partial output (if any) was kept.
    TimedOut,
    /// Engine exited non-zero; partial output (if any) was kept.
    ExecutionError { code: i32 },
    /// The worker task itself died (panic, spawn failure).
    Failed { reason: String },
}

impl SourceOutcome {
    /// True for every outcome other than a clean run.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, SourceOutcome::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceOutcome::Success => "success",
            SourceOutcome::Unavailable => "unavailable",
            SourceOutcome::TimedOut => "timed_out",
            SourceOutcome::ExecutionError { .. } => "execution_error",
            SourceOutcome::Failed { .. } => "failed",
        }
    }
}

impl std::fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceOutcome::ExecutionError { code } => write!(f, "execution_error({})", code),
            SourceOutcome::Failed { reason } => write!(f, "failed({})", reason),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Per-source result row produced by one adapter run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: String,
    pub outcome: SourceOutcome,
    /// Hostnames as the engine emitted them, trimmed but not yet normalized.
    pub hostnames: Vec<String>,
    /// Intermediate artifact this source wrote inside the workspace, if any.
    pub artifact: Option<PathBuf>,
}

impl SourceReport {
    pub fn unavailable(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            outcome: SourceOutcome::Unavailable,
            hostnames: Vec::new(),
            artifact: None,
        }
    }

    pub fn failed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            outcome: SourceOutcome::Failed {
                reason: reason.into(),
            },
            hostnames: Vec::new(),
            artifact: None,
        }
    }
}

/// The deduplicated, sorted, lowercase hostname set handed to validation.
///
/// Invariant: every element is non-empty, lowercase, and appears exactly
/// once, in ascending lexicographic order. Only the aggregator constructs
/// one, so the invariant holds by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedSet {
    hosts: Vec<String>,
}

impl MergedSet {
    pub(crate) fn from_sorted_union(hosts: Vec<String>) -> Self {
        debug_assert!(hosts.windows(2).all(|w| w[0] < w[1]));
        Self { hosts }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.hosts.iter()
    }
}

/// One live host as reported by the probing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRecord {
    pub host: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
}

/// Result of the liveness-validation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Validated { records: Vec<ValidatedRecord> },
    Skipped { reason: String },
}

impl ValidationOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ValidationOutcome::Skipped { .. })
    }

    pub fn records(&self) -> &[ValidatedRecord] {
        match self {
            ValidationOutcome::Validated { records } => records,
            ValidationOutcome::Skipped { .. } => &[],
        }
    }
}

/// Per-source summary line carried in the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    pub outcome: SourceOutcome,
    pub hostnames: usize,
}

/// End-of-run report assembled by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub domain: String,
    pub run_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub duration_seconds: f64,
    pub merged_count: usize,
    pub validated_count: usize,
    pub validation_skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_skip_reason: Option<String>,
    /// Sorted by source name so report content is deterministic.
    pub sources: Vec<SourceSummary>,
    pub merged_artifact: PathBuf,
    /// Raw output file of the probing engine, outside the workspace.
    /// Absent when validation was skipped before the engine ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_artifact: Option<PathBuf>,
    pub workspace: PathBuf,
}

/// Structured progress events emitted by the pipeline and rendered by the
/// presentation layer, so the core never prints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    CollectionStarted { sources: Vec<String> },
    SourceStarted { source: String },
    SourceSettled {
        source: String,
        outcome: SourceOutcome,
        hostnames: usize,
    },
    MergeCompleted { unique_hosts: usize },
    ValidationStarted { engine: String },
    ValidationSkipped { reason: String },
    ValidationCompleted { live_hosts: usize },
}

pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

/// Immutable per-run context. Built once by the orchestrator; every other
/// component receives it by shared reference.
#[derive(Debug)]
pub struct RunContext {
    pub domain: String,
    pub run_id: String,
    pub workspace: PathBuf,
    pub verbose: bool,
    pub source_timeout: Duration,
    pub passive_timeout: Duration,
    pub probe_timeout: Duration,
    progress: Option<ProgressSender>,
}

impl RunContext {
    pub fn new(
        domain: String,
        run_id: String,
        workspace: PathBuf,
        verbose: bool,
        source_timeout: Duration,
        passive_timeout: Duration,
        probe_timeout: Duration,
        progress: Option<ProgressSender>,
    ) -> Self {
        Self {
            domain,
            run_id,
            workspace,
            verbose,
            source_timeout,
            passive_timeout,
            probe_timeout,
            progress,
        }
    }

    /// Fire a progress event. Send failures are ignored: a dropped receiver
    /// means nobody is rendering progress, which is not an error.
    pub fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event);
        }
    }

    /// Workspace path of the intermediate artifact for one source. The name
    /// embeds the source so concurrent adapters never share a file.
    pub fn source_artifact(&self, source: &str) -> PathBuf {
        self.workspace.join(format!("{}-{}.txt", source, self.domain))
    }

    /// Workspace path of the merged hostname artifact.
    pub fn merged_artifact(&self) -> PathBuf {
        self.workspace.join(format!("subdomains-{}.txt", self.domain))
    }
}

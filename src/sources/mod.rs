// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Discovery Source Adapters
 * Uniform wrappers around external subdomain-discovery engines
 *
 * Each adapter resolves its own engine binary, bounds its own execution,
 * and folds every failure mode into a SourceReport. Nothing in here can
 * abort the pipeline.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod amass;
pub mod assetfinder;
pub mod findomain;
pub mod subfinder;

use crate::exec::EngineStatus;
use crate::types::{RunContext, SourceOutcome, SourceReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// One external discovery engine behind a uniform contract.
///
/// `collect` never returns an error: degraded conditions (missing binary,
/// timeout, non-zero exit, spawn failure) are folded into the report's
/// outcome tag with whatever partial output exists.
#[async_trait::async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Source name; keys the collector's result map and names the artifact.
    fn name(&self) -> &'static str;

    /// Collect candidate hostnames for the run's target domain.
    async fn collect(&self, ctx: &RunContext) -> SourceReport;
}

/// Static registry of known discovery engines, fixed at process start.
pub fn registry() -> Vec<Arc<dyn DiscoverySource>> {
    vec![
        Arc::new(subfinder::Subfinder),
        Arc::new(findomain::Findomain),
        Arc::new(assetfinder::Assetfinder),
        Arc::new(amass::Amass),
    ]
}

/// Resolve an engine binary on PATH. Resolved once per run per source;
/// an unavailable engine is skipped, never retried.
pub(crate) fn resolve_binary(name: &str) -> Option<PathBuf> {
    match which::which(name) {
        Ok(path) => Some(path),
        Err(_) => {
            debug!("[Sources] {} not found on PATH", name);
            None
        }
    }
}

/// Map an engine's exit status to the source outcome, warning on every
/// degraded case.
pub(crate) fn outcome_for(source: &str, status: &EngineStatus, stderr: &str) -> SourceOutcome {
    match status {
        EngineStatus::Exited { code: 0 } => SourceOutcome::Success,
        EngineStatus::Exited { code } => {
            warn!(
                "[{}] engine exited with code {}: {}",
                source,
                code,
                stderr.trim()
            );
            SourceOutcome::ExecutionError { code: *code }
        }
        EngineStatus::TimedOut => {
            warn!("[{}] engine timed out; keeping partial output", source);
            SourceOutcome::TimedOut
        }
    }
}

/// Read an artifact this source's engine wrote, trimming and dropping
/// empty lines. Missing file means the engine produced nothing.
pub(crate) fn read_artifact(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Persist stdout-captured hostnames so the aggregator can re-read them
/// from disk like every other contribution. A write failure here only
/// costs the artifact; the in-memory lines still flow downstream.
pub(crate) fn persist_stdout(source: &str, path: &Path, lines: &[String]) -> Option<PathBuf> {
    if lines.is_empty() {
        return None;
    }
    match std::fs::write(path, lines.join("\n")) {
        Ok(()) => Some(path.to_path_buf()),
        Err(e) => {
            warn!(
                "[{}] could not write artifact {}: {}",
                source,
                path.display(),
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_fixed_source_set() {
        let sources = registry();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["subfinder", "findomain", "assetfinder", "amass"]);
    }

    #[test]
    fn outcome_mapping() {
        assert_eq!(
            outcome_for("subfinder", &EngineStatus::Exited { code: 0 }, ""),
            SourceOutcome::Success
        );
        assert_eq!(
            outcome_for("subfinder", &EngineStatus::Exited { code: 2 }, "boom"),
            SourceOutcome::ExecutionError { code: 2 }
        );
        assert_eq!(
            outcome_for("amass", &EngineStatus::TimedOut, ""),
            SourceOutcome::TimedOut
        );
    }

    #[test]
    fn read_artifact_missing_file_is_empty() {
        assert!(read_artifact(Path::new("/nonexistent/artifact.txt")).is_empty());
    }

    #[test]
    fn persist_stdout_skips_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assetfinder-example.com.txt");
        assert!(persist_stdout("assetfinder", &path, &[]).is_none());
        assert!(!path.exists());

        let lines = vec!["a.example.com".to_string()];
        assert!(persist_stdout("assetfinder", &path, &lines).is_some());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a.example.com");
    }
}

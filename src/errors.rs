// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Recon Error Types
 * Pipeline error taxonomy with thiserror
 *
 * Per-source and validation conditions are contained at their stage
 * boundary and surface as outcome tags, never as pipeline failures.
 * Only workspace creation and aggregation I/O abort a run.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::types::SourceOutcome;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Run-fatal pipeline errors.
#[derive(Error, Debug)]
pub enum ReconError {
    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Scoped-workspace lifecycle errors.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("failed to create workspace {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove workspace {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Aggregation I/O errors. A missing intermediate artifact is an empty
/// contribution and never reaches here; these cover an artifact that exists
/// but cannot be read, and a merged artifact that cannot be written.
#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("failed to read intermediate artifact {path}: {source}")]
    ReadArtifact {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write merged artifact {path}: {source}")]
    WriteMerged {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Per-source degraded conditions. Logged and folded into a
/// [`SourceOutcome`]; never propagated as a pipeline failure.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("engine binary not found for {engine}")]
    Unavailable { engine: String },

    #[error("{engine} exceeded its {timeout:?} bound")]
    Timeout { engine: String, timeout: Duration },

    #[error("{engine} exited with code {code}")]
    Execution { engine: String, code: i32 },

    #[error("failed to spawn {engine} engine: {reason}")]
    Spawn { engine: String, reason: String },
}

impl SourceError {
    /// Outcome tag this condition folds into.
    pub fn outcome(&self) -> SourceOutcome {
        match self {
            SourceError::Unavailable { .. } => SourceOutcome::Unavailable,
            SourceError::Timeout { .. } => SourceOutcome::TimedOut,
            SourceError::Execution { code, .. } => SourceOutcome::ExecutionError { code: *code },
            SourceError::Spawn { reason, .. } => SourceOutcome::Failed {
                reason: reason.clone(),
            },
        }
    }
}

/// Validation-stage degraded conditions. The pipeline completes with the
/// unvalidated merged set when one of these occurs.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("no liveness engine found (tried httpx, httpx-toolkit)")]
    Unavailable,

    #[error("liveness probe exceeded its {timeout:?} bound")]
    Timeout { timeout: Duration },
}

/// Result type for pipeline operations.
pub type ReconResult<T> = Result<T, ReconError>;

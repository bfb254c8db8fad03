// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Result Aggregator
 * Normalizes, deduplicates and deterministically orders collected hostnames
 *
 * The merge is a set union over normalized lines, so it is commutative,
 * associative and idempotent; that property is what makes the
 * barrier-then-merge design safe under any task completion order.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::AggregationError;
use crate::types::{MergedSet, SourceReport};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

/// Normalize one raw line: trim, drop if empty, lowercase.
pub fn normalize(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Merge every source's contribution into one deduplicated, sorted set.
///
/// Both the in-memory hostnames and the on-disk artifact of each report
/// are read; file-only contributions (an engine whose stdout capture was
/// empty) still make it in. A missing artifact is an empty contribution;
/// an unreadable one is fatal.
pub fn merge<'a, I>(reports: I) -> Result<MergedSet, AggregationError>
where
    I: IntoIterator<Item = &'a SourceReport>,
{
    let mut union: BTreeSet<String> = BTreeSet::new();

    for report in reports {
        for line in &report.hostnames {
            if let Some(host) = normalize(line) {
                union.insert(host);
            }
        }

        if let Some(path) = &report.artifact {
            for line in read_artifact_lines(path)? {
                if let Some(host) = normalize(&line) {
                    union.insert(host);
                }
            }
        }
    }

    debug!("[Aggregator] union holds {} unique hostnames", union.len());
    Ok(MergedSet::from_sorted_union(union.into_iter().collect()))
}

/// Write the merged set as a newline-delimited UTF-8 artifact.
pub fn persist(set: &MergedSet, path: &Path) -> Result<(), AggregationError> {
    std::fs::write(path, set.hosts().join("\n")).map_err(|source| {
        AggregationError::WriteMerged {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(
        "[Aggregator] wrote {} hostnames to {}",
        set.len(),
        path.display()
    );
    Ok(())
}

fn read_artifact_lines(path: &Path) -> Result<Vec<String>, AggregationError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path).map_err(|source| AggregationError::ReadArtifact {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(str::to_string).collect())
}

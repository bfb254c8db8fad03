// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scoped Run Workspace
 * Per-run directory for intermediate artifacts
 *
 * Created eagerly before collection. Each source writes to a distinct,
 * pre-named file inside it, so concurrent adapters never contend. The
 * retain/discard decision belongs to the caller at end of run.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::WorkspaceError;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create the scoped directory under `work_root`.
    pub fn create(work_root: &Path, run_id: &str) -> Result<Self, WorkspaceError> {
        let root = work_root.join(format!(".lonkero-recon-{}", run_id));
        std::fs::create_dir_all(&root).map_err(|source| WorkspaceError::Create {
            path: root.clone(),
            source,
        })?;
        debug!("[Workspace] Created {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keep the workspace on disk and hand back its path.
    pub fn retain(self) -> PathBuf {
        debug!("[Workspace] Retained {}", self.root.display());
        self.root
    }

    /// Remove the workspace and everything in it.
    pub fn discard(self) -> Result<(), WorkspaceError> {
        debug!("[Workspace] Removing {}", self.root.display());
        std::fs::remove_dir_all(&self.root).map_err(|source| WorkspaceError::Remove {
            path: self.root.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::create(dir.path(), "test-run").unwrap();
        let root = ws.root().to_path_buf();
        assert!(root.is_dir());
        assert!(root.ends_with(".lonkero-recon-test-run"));

        ws.discard().unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn retain_leaves_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::create(dir.path(), "keep-run").unwrap();
        let root = ws.retain();
        assert!(root.is_dir());
    }

    #[test]
    fn nested_work_root_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("recon");
        let ws = Workspace::create(&nested, "deep").unwrap();
        assert!(ws.root().is_dir());
    }
}

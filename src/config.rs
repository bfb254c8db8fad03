// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Run Configuration
 * Resolved configuration for one reconnaissance run
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{ReconError, ReconResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

/// Resolved `{domain, verbose, timeouts}` configuration handed to the
/// orchestrator. The CLI (or an embedding caller) builds one of these; the
/// pipeline itself never prompts.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunConfig {
    /// Target apex domain, e.g. `example.com`.
    #[validate(length(min = 3))]
    pub domain: String,

    #[serde(default)]
    pub verbose: bool,

    /// Time bound for each standard discovery engine.
    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_source_timeout")]
    pub source_timeout_secs: u64,

    /// Time bound for heavier passive engines (amass).
    #[validate(range(min = 1, max = 7200))]
    #[serde(default = "default_passive_timeout")]
    pub passive_timeout_secs: u64,

    /// Time bound for the liveness probe, which scales with candidate count.
    #[validate(range(min = 1, max = 7200))]
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// HTTP status codes considered interesting by the validation stage.
    #[validate(length(min = 1))]
    #[serde(default = "default_allow_list")]
    pub status_allow_list: Vec<u16>,

    /// Directory the workspace and final artifact live under.
    /// Defaults to the current directory.
    #[serde(default)]
    pub work_root: Option<PathBuf>,
}

fn default_source_timeout() -> u64 {
    180
}

fn default_passive_timeout() -> u64 {
    420
}

fn default_probe_timeout() -> u64 {
    420
}

fn default_allow_list() -> Vec<u16> {
    vec![200, 302, 403, 401]
}

impl RunConfig {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            verbose: false,
            source_timeout_secs: default_source_timeout(),
            passive_timeout_secs: default_passive_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            status_allow_list: default_allow_list(),
            work_root: None,
        }
    }

    /// Load a config file (JSON) and return it unvalidated; callers run
    /// [`RunConfig::validated`] once CLI overrides are applied.
    pub fn from_file(path: &Path) -> ReconResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ReconError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            ReconError::Configuration(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// Validate field constraints plus domain shape. The domain must carry
    /// at least one dot; everything else is the engines' problem.
    pub fn validated(self) -> ReconResult<Self> {
        self.validate()
            .map_err(|e| ReconError::Configuration(e.to_string()))?;
        let domain = self.domain.trim();
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(ReconError::Configuration(format!(
                "'{}' does not look like a domain (expected e.g. example.com)",
                domain
            )));
        }
        Ok(self)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    pub fn passive_timeout(&self) -> Duration {
        Duration::from_secs(self.passive_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn work_root(&self) -> PathBuf {
        self.work_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_bounds() {
        let config = RunConfig::new("example.com");
        assert_eq!(config.source_timeout_secs, 180);
        assert_eq!(config.passive_timeout_secs, 420);
        assert_eq!(config.probe_timeout_secs, 420);
        assert_eq!(config.status_allow_list, vec![200, 302, 403, 401]);
        assert!(!config.verbose);
    }

    #[test]
    fn validated_accepts_plain_domain() {
        assert!(RunConfig::new("example.com").validated().is_ok());
        assert!(RunConfig::new("sub.example.co.uk").validated().is_ok());
    }

    #[test]
    fn validated_rejects_non_domains() {
        assert!(RunConfig::new("localhost").validated().is_err());
        assert!(RunConfig::new(".example.com").validated().is_err());
        assert!(RunConfig::new("example.com.").validated().is_err());
        assert!(RunConfig::new("x").validated().is_err());
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recon.json");
        let config = RunConfig::new("example.com");
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = RunConfig::from_file(&path).unwrap();
        assert_eq!(loaded.domain, "example.com");
        assert_eq!(loaded.status_allow_list, vec![200, 302, 403, 401]);
    }

    #[test]
    fn partial_config_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recon.json");
        std::fs::write(&path, r#"{"domain": "example.com"}"#).unwrap();

        let loaded = RunConfig::from_file(&path).unwrap();
        assert_eq!(loaded.source_timeout_secs, 180);
        assert_eq!(loaded.status_allow_list, vec![200, 302, 403, 401]);
    }
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Liveness Validation Stage
 * Probes merged candidates for live HTTP(S) services via httpx
 *
 * The probing engine is optional: when it is missing the pipeline still
 * completes and surfaces the unvalidated merged set. A probe timeout
 * degrades to whatever partial output the engine emitted.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::ValidationError;
use crate::exec::{run_engine, EngineStatus};
use crate::sources::resolve_binary;
use crate::types::{MergedSet, ProgressEvent, RunContext, ValidatedRecord, ValidationOutcome};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Binaries probed for, in preference order.
const HTTPX_BINARIES: &[&str] = &["httpx", "httpx-toolkit"];

/// Raw result of one probing-engine invocation.
#[derive(Debug)]
pub struct ProbeRun {
    /// Annotated output lines, one per responding host.
    pub lines: Vec<String>,
    pub timed_out: bool,
}

/// One external liveness-probing engine behind a mockable seam.
#[async_trait::async_trait]
pub trait LivenessEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Probe every host listed in `merged`, writing the engine's raw
    /// annotated output to `report` (the final report artifact).
    async fn probe(
        &self,
        merged: &Path,
        report: &Path,
        allow_list: &[u16],
        ctx: &RunContext,
    ) -> Result<ProbeRun, ValidationError>;
}

/// httpx / httpx-toolkit invocation:
/// `httpx -l <merged> -sc -title -td -nc -silent -mc <codes> -o <report>`.
pub struct HttpxEngine;

#[async_trait::async_trait]
impl LivenessEngine for HttpxEngine {
    fn name(&self) -> &'static str {
        "httpx"
    }

    async fn probe(
        &self,
        merged: &Path,
        report: &Path,
        allow_list: &[u16],
        ctx: &RunContext,
    ) -> Result<ProbeRun, ValidationError> {
        let binary = HTTPX_BINARIES
            .iter()
            .find_map(|name| resolve_binary(name))
            .ok_or(ValidationError::Unavailable)?;

        let codes = allow_list
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let merged_arg = merged.to_string_lossy().into_owned();
        let report_arg = report.to_string_lossy().into_owned();
        let args = [
            "-l",
            merged_arg.as_str(),
            "-sc",
            "-title",
            "-td",
            "-nc",
            "-silent",
            "-mc",
            codes.as_str(),
            "-o",
            report_arg.as_str(),
        ];

        let output = run_engine(&binary, &args, None, ctx.probe_timeout)
            .await
            .map_err(|e| {
                warn!("[Validation] failed to spawn {}: {}", binary.display(), e);
                ValidationError::Unavailable
            })?;

        let timed_out = output.status == EngineStatus::TimedOut;
        if let EngineStatus::Exited { code } = output.status {
            if code != 0 {
                warn!(
                    "[Validation] probe exited with code {}: {}",
                    code,
                    output.stderr.trim()
                );
            }
        }

        // Prefer the engine's own report file; it survives a timeout kill.
        // Fall back to the stdout capture and persist it ourselves so the
        // final artifact exists either way.
        let lines = match std::fs::read_to_string(report) {
            Ok(text) => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => {
                let lines = output.stdout_lines();
                if !lines.is_empty() {
                    if let Err(e) = std::fs::write(report, lines.join("\n")) {
                        warn!(
                            "[Validation] could not write report {}: {}",
                            report.display(),
                            e
                        );
                    }
                }
                lines
            }
        };

        Ok(ProbeRun { lines, timed_out })
    }
}

/// Wraps one liveness engine and filters its output to the interesting
/// status codes.
pub struct ValidationStage {
    engine: Arc<dyn LivenessEngine>,
    allow_list: Vec<u16>,
}

impl ValidationStage {
    pub fn new(engine: Arc<dyn LivenessEngine>, allow_list: Vec<u16>) -> Self {
        Self { engine, allow_list }
    }

    pub async fn validate(
        &self,
        merged: &MergedSet,
        merged_path: &Path,
        report_path: &Path,
        ctx: &RunContext,
    ) -> ValidationOutcome {
        if merged.is_empty() {
            info!("[Validation] no candidate hostnames, skipping probe");
            let reason = "no candidate hostnames".to_string();
            ctx.emit(ProgressEvent::ValidationSkipped {
                reason: reason.clone(),
            });
            return ValidationOutcome::Skipped { reason };
        }

        ctx.emit(ProgressEvent::ValidationStarted {
            engine: self.engine.name().to_string(),
        });

        match self
            .engine
            .probe(merged_path, report_path, &self.allow_list, ctx)
            .await
        {
            Ok(run) => {
                if run.timed_out {
                    warn!(
                        "[Validation] probe timed out after {:?}; using partial output ({} lines)",
                        ctx.probe_timeout,
                        run.lines.len()
                    );
                }
                let records: Vec<ValidatedRecord> = run
                    .lines
                    .iter()
                    .filter_map(|line| parse_probe_line(line))
                    .filter(|record| self.allow_list.contains(&record.status))
                    .collect();
                info!("[Validation] {} live hosts", records.len());
                ctx.emit(ProgressEvent::ValidationCompleted {
                    live_hosts: records.len(),
                });
                ValidationOutcome::Validated { records }
            }
            Err(e) => {
                warn!("[Validation] skipped: {}", e);
                let reason = e.to_string();
                ctx.emit(ProgressEvent::ValidationSkipped {
                    reason: reason.clone(),
                });
                ValidationOutcome::Skipped { reason }
            }
        }
    }
}

/// Parse one annotated probe line: `https://host [status] [title] [tech,...]`.
/// Lines without a parseable status are dropped.
pub fn parse_probe_line(line: &str) -> Option<ValidatedRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (url, rest) = match line.split_once(char::is_whitespace) {
        Some((url, rest)) => (url, rest.trim()),
        None => (line, ""),
    };
    let host = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string();
    if host.is_empty() {
        return None;
    }

    let groups = bracket_groups(rest);
    let status = groups
        .first()?
        .split(',')
        .next()?
        .trim()
        .parse::<u16>()
        .ok()?;
    let title = groups
        .get(1)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let technologies = groups
        .get(2)
        .map(|g| {
            g.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(ValidatedRecord {
        host,
        status,
        title,
        technologies,
    })
}

/// Extract top-level `[...]` groups, tolerating nested brackets in titles.
fn bracket_groups(s: &str) -> Vec<String> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut depth: u32 = 0;
    for c in s.chars() {
        match c {
            '[' => {
                if depth > 0 {
                    current.push(c);
                }
                depth += 1;
            }
            ']' => {
                if depth > 1 {
                    depth -= 1;
                    current.push(c);
                } else if depth == 1 {
                    depth = 0;
                    groups.push(std::mem::take(&mut current));
                }
            }
            _ => {
                if depth > 0 {
                    current.push(c);
                }
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_ctx() -> RunContext {
        RunContext::new(
            "example.com".to_string(),
            "test".to_string(),
            std::env::temp_dir(),
            false,
            Duration::from_secs(5),
            Duration::from_secs(5),
            Duration::from_secs(5),
            None,
        )
    }

    #[test]
    fn parse_full_line() {
        let record =
            parse_probe_line("https://a.example.com [200] [Welcome Portal] [nginx,PHP]").unwrap();
        assert_eq!(record.host, "a.example.com");
        assert_eq!(record.status, 200);
        assert_eq!(record.title.as_deref(), Some("Welcome Portal"));
        assert_eq!(record.technologies, vec!["nginx", "PHP"]);
    }

    #[test]
    fn parse_line_without_title_or_tech() {
        let record = parse_probe_line("http://b.example.com [403]").unwrap();
        assert_eq!(record.host, "b.example.com");
        assert_eq!(record.status, 403);
        assert_eq!(record.title, None);
        assert!(record.technologies.is_empty());
    }

    #[test]
    fn parse_tolerates_brackets_in_title() {
        let record =
            parse_probe_line("https://c.example.com [302] [Redirecting [beta]] [Varnish]").unwrap();
        assert_eq!(record.status, 302);
        assert_eq!(record.title.as_deref(), Some("Redirecting [beta]"));
        assert_eq!(record.technologies, vec!["Varnish"]);
    }

    #[test]
    fn parse_drops_unparseable_lines() {
        assert!(parse_probe_line("").is_none());
        assert!(parse_probe_line("bare.example.com").is_none());
        assert!(parse_probe_line("https://x.example.com [banana]").is_none());
    }

    struct ScriptedEngine {
        lines: Vec<&'static str>,
        available: bool,
    }

    #[async_trait::async_trait]
    impl LivenessEngine for ScriptedEngine {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn probe(
            &self,
            _merged: &Path,
            report: &Path,
            _allow_list: &[u16],
            _ctx: &RunContext,
        ) -> Result<ProbeRun, ValidationError> {
            if !self.available {
                return Err(ValidationError::Unavailable);
            }
            let lines: Vec<String> = self.lines.iter().map(|l| l.to_string()).collect();
            std::fs::write(report, lines.join("\n")).unwrap();
            Ok(ProbeRun {
                lines,
                timed_out: false,
            })
        }
    }

    fn merged_fixture() -> MergedSet {
        crate::aggregator::merge([&crate::types::SourceReport {
            source: "subfinder".to_string(),
            outcome: crate::types::SourceOutcome::Success,
            hostnames: vec![
                "a.example.com".to_string(),
                "b.example.com".to_string(),
                "c.example.com".to_string(),
            ],
            artifact: None,
        }])
        .unwrap()
    }

    #[tokio::test]
    async fn out_of_allow_list_hosts_are_silently_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let stage = ValidationStage::new(
            Arc::new(ScriptedEngine {
                lines: vec![
                    "https://a.example.com [200] [Home]",
                    "https://b.example.com [404] [Not Found]",
                    "https://c.example.com [403]",
                ],
                available: true,
            }),
            vec![200, 302, 403, 401],
        );

        let outcome = stage
            .validate(
                &merged_fixture(),
                &dir.path().join("merged.txt"),
                &dir.path().join("example.com-subs.txt"),
                &test_ctx(),
            )
            .await;

        let records = outcome.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].host, "a.example.com");
        assert_eq!(records[0].status, 200);
        assert_eq!(records[1].host, "c.example.com");
        assert_eq!(records[1].status, 403);
    }

    #[tokio::test]
    async fn missing_engine_degrades_to_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let stage = ValidationStage::new(
            Arc::new(ScriptedEngine {
                lines: vec![],
                available: false,
            }),
            vec![200],
        );

        let outcome = stage
            .validate(
                &merged_fixture(),
                &dir.path().join("merged.txt"),
                &dir.path().join("example.com-subs.txt"),
                &test_ctx(),
            )
            .await;
        assert!(outcome.is_skipped());
    }

    #[tokio::test]
    async fn empty_merged_set_skips_without_invoking_engine() {
        let dir = tempfile::tempdir().unwrap();
        let stage = ValidationStage::new(
            Arc::new(ScriptedEngine {
                lines: vec!["https://ghost.example.com [200]"],
                available: true,
            }),
            vec![200],
        );

        let outcome = stage
            .validate(
                &MergedSet::default(),
                &dir.path().join("merged.txt"),
                &dir.path().join("example.com-subs.txt"),
                &test_ctx(),
            )
            .await;
        assert!(outcome.is_skipped());
        assert!(!dir.path().join("example.com-subs.txt").exists());
    }
}

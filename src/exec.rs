// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Bounded Engine Execution
 * Runs an external engine with a hard time bound
 *
 * Every engine invocation goes through here: piped stdio, explicit working
 * directory when the engine needs one, and kill-on-timeout. Adapters never
 * touch the process-wide current directory.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// How a bounded invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// Process ran to completion (any exit code).
    Exited { code: i32 },
    /// Time bound elapsed; the process was killed. Output already written
    /// to disk by the engine survives and is the caller's to salvage.
    TimedOut,
}

#[derive(Debug)]
pub struct EngineOutput {
    pub status: EngineStatus,
    pub stdout: String,
    pub stderr: String,
}

impl EngineOutput {
    fn timed_out() -> Self {
        Self {
            status: EngineStatus::TimedOut,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Non-empty trimmed stdout lines.
    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Run `binary args...` bounded by `bound`, optionally with an explicit
/// working directory. An I/O error here means the process could not be
/// spawned at all; a non-zero exit is reported through [`EngineStatus`].
pub async fn run_engine(
    binary: &Path,
    args: &[&str],
    working_dir: Option<&Path>,
    bound: Duration,
) -> std::io::Result<EngineOutput> {
    debug!(
        "[Exec] {} {} (bound {:?})",
        binary.display(),
        args.join(" "),
        bound
    );

    let mut cmd = Command::new(binary);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    match timeout(bound, cmd.output()).await {
        Ok(Ok(output)) => Ok(EngineOutput {
            status: EngineStatus::Exited {
                code: output.status.code().unwrap_or(-1),
            },
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
        Ok(Err(e)) => Err(e),
        Err(_) => Ok(EngineOutput::timed_out()),
    }
}

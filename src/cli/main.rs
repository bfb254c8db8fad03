// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Lonkero Recon - Subdomain Reconnaissance Pipeline
 * Standalone CLI around the recon engine
 *
 * Features:
 * - Parallel passive enumeration (subfinder, findomain, assetfinder, amass)
 * - Deterministic merge of all source output
 * - HTTP liveness validation via httpx
 * - JSON report output
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{warn, Level};

use lonkero_recon::config::RunConfig;
use lonkero_recon::orchestrator::{ReconEngine, ReconRun};
use lonkero_recon::types::{ProgressEvent, ProgressReceiver, ValidationOutcome};

/// Lonkero Recon - Subdomain Reconnaissance Pipeline
#[derive(Parser)]
#[command(name = "lonkero-recon")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version = "1.2.0")]
#[command(about = "Subdomain recon built for actual pentests. Parallel, best-effort, Rust.", long_about = None)]
struct Cli {
    /// Target domain (e.g. example.com)
    #[arg(short, long, required_unless_present = "config")]
    domain: Option<String>,

    /// Configuration file path (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// Quiet mode - suppress banner and progress
    #[arg(short, long)]
    quiet: bool,

    /// Per-source timeout in seconds
    #[arg(long)]
    source_timeout: Option<u64>,

    /// Heavy passive engine (amass) timeout in seconds
    #[arg(long)]
    passive_timeout: Option<u64>,

    /// Liveness probe timeout in seconds
    #[arg(long)]
    probe_timeout: Option<u64>,

    /// Status codes treated as interesting (comma-separated)
    #[arg(long, value_delimiter = ',')]
    match_codes: Option<Vec<u16>>,

    /// Directory the workspace and final artifact live under
    #[arg(long)]
    work_root: Option<PathBuf>,

    /// Copy the final artifact into this directory after the run
    #[arg(short = 'o', long)]
    save_dir: Option<PathBuf>,

    /// Keep the intermediate workspace instead of removing it
    #[arg(long)]
    keep_workspace: bool,

    /// Print the validated host list after the run
    #[arg(long)]
    show: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    // Create async runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("lonkero-recon")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::new(cli.domain.clone().unwrap_or_default()),
    };

    // CLI flags override the config file
    if let Some(domain) = &cli.domain {
        config.domain = domain.clone();
    }
    if cli.verbose || cli.debug {
        config.verbose = true;
    }
    if let Some(secs) = cli.source_timeout {
        config.source_timeout_secs = secs;
    }
    if let Some(secs) = cli.passive_timeout {
        config.passive_timeout_secs = secs;
    }
    if let Some(secs) = cli.probe_timeout {
        config.probe_timeout_secs = secs;
    }
    if let Some(codes) = &cli.match_codes {
        config.status_allow_list = codes.clone();
    }
    if let Some(root) = &cli.work_root {
        config.work_root = Some(root.clone());
    }

    let config = config.validated()?;

    if !cli.quiet && !cli.json {
        banner();
    }

    let (renderer, progress_tx) = if cli.quiet || cli.json {
        (None, None)
    } else {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Some(spawn_renderer(rx, config.verbose)), Some(tx))
    };

    let engine = ReconEngine::new(config);
    let run = engine.run(progress_tx).await?;

    // The engine dropped its sender; the renderer drains and exits.
    if let Some(handle) = renderer {
        let _ = handle.await;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&run.report)?);
    } else {
        print_summary(&run);
    }

    if cli.show {
        show_results(&run);
    }

    if let Some(dest_dir) = &cli.save_dir {
        save_artifact(&run, dest_dir)?;
    }

    let ReconRun { workspace, .. } = run;
    if cli.keep_workspace {
        let path = workspace.retain();
        if !cli.quiet {
            println!("[i] Workspace kept at: {}", path.display());
        }
    } else if let Err(e) = workspace.discard() {
        warn!("[Cli] {}", e);
    }

    Ok(())
}

fn banner() {
    print!("\x1b[92m");
    println!("    ____");
    println!("   / __ \\___  _________  ____");
    println!("  / /_/ / _ \\/ ___/ __ \\/ __ \\");
    print!("\x1b[91m");
    println!(" / _, _/  __/ /__/ /_/ / / / /");
    println!("/_/ |_|\\___/\\___/\\____/_/ /_/");
    print!("\x1b[0m");
    println!();
    println!("        lonkero-recon - subdomain reconnaissance by Bountyy Oy");
    println!();
}

fn spawn_renderer(mut rx: ProgressReceiver, verbose: bool) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                ProgressEvent::CollectionStarted { sources } => {
                    println!(
                        "\x1b[1;34mCollecting subdomains with {} sources ({})...\x1b[0m",
                        sources.len(),
                        sources.join(", ")
                    );
                }
                ProgressEvent::SourceStarted { source } => {
                    if verbose {
                        println!("[*] {} started", source);
                    }
                }
                ProgressEvent::SourceSettled {
                    source,
                    outcome,
                    hostnames,
                } => {
                    if outcome.is_degraded() {
                        println!("[!] {} settled: {} ({} hostnames)", source, outcome, hostnames);
                    } else {
                        println!("[+] {} finished - {} hostnames", source, hostnames);
                    }
                }
                ProgressEvent::MergeCompleted { unique_hosts } => {
                    println!("\x1b[1;34mMerging results...\x1b[0m");
                    println!("[+] Unique hostnames: {}", unique_hosts);
                }
                ProgressEvent::ValidationStarted { engine } => {
                    println!("\x1b[1;34mValidating with {}...\x1b[0m", engine);
                }
                ProgressEvent::ValidationSkipped { reason } => {
                    println!("[!] Validation skipped: {}", reason);
                }
                ProgressEvent::ValidationCompleted { live_hosts } => {
                    println!("[+] Live hosts: {}", live_hosts);
                }
            }
        }
    })
}

fn print_summary(run: &ReconRun) {
    let report = &run.report;
    println!();
    println!("\x1b[1;32mAll subdomains processed.\x1b[0m");
    println!(
        "[+] {} unique hostnames, {} validated in {:.2}s",
        report.merged_count, report.validated_count, report.duration_seconds
    );
    if let Some(path) = &report.report_artifact {
        println!("[+] Final output: {}", path.display());
    } else {
        println!("[+] Merged output: {}", report.merged_artifact.display());
    }
}

fn show_results(run: &ReconRun) {
    match &run.validation {
        ValidationOutcome::Validated { records } => {
            println!();
            for record in records {
                let title = record.title.as_deref().unwrap_or("-");
                println!("{} [{}] [{}]", record.host, record.status, title);
            }
        }
        ValidationOutcome::Skipped { .. } => {
            // Best we have is the unvalidated merged set.
            if let Ok(text) = std::fs::read_to_string(&run.report.merged_artifact) {
                println!();
                println!("{}", text);
            }
        }
    }
}

fn save_artifact(run: &ReconRun, dest_dir: &PathBuf) -> Result<()> {
    let source = run
        .report
        .report_artifact
        .as_ref()
        .unwrap_or(&run.report.merged_artifact);
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("cannot create {}", dest_dir.display()))?;
    let file_name = source
        .file_name()
        .context("artifact path has no file name")?;
    let dest = dest_dir.join(file_name);
    std::fs::copy(source, &dest)
        .with_context(|| format!("cannot copy {} to {}", source.display(), dest.display()))?;
    println!("[+] Copied to: {}", dest.display());
    Ok(())
}

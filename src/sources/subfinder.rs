// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - subfinder Adapter
 * Passive enumeration via projectdiscovery subfinder
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use super::{outcome_for, read_artifact, resolve_binary, DiscoverySource};
use crate::exec::run_engine;
use crate::types::{RunContext, SourceReport};
use tracing::{debug, warn};

/// Wraps `subfinder -d <domain> -all -silent -o <artifact>`. The engine
/// writes the artifact itself; we read it back for the in-memory result,
/// which also salvages partial output after a timeout.
pub struct Subfinder;

#[async_trait::async_trait]
impl DiscoverySource for Subfinder {
    fn name(&self) -> &'static str {
        "subfinder"
    }

    async fn collect(&self, ctx: &RunContext) -> SourceReport {
        let Some(binary) = resolve_binary(self.name()) else {
            debug!("[Subfinder] not installed, skipping");
            return SourceReport::unavailable(self.name());
        };

        let artifact = ctx.source_artifact(self.name());
        let artifact_arg = artifact.to_string_lossy().into_owned();
        let args = [
            "-d",
            ctx.domain.as_str(),
            "-all",
            "-silent",
            "-o",
            artifact_arg.as_str(),
        ];

        match run_engine(&binary, &args, None, ctx.source_timeout).await {
            Ok(output) => {
                let outcome = outcome_for(self.name(), &output.status, &output.stderr);
                let hostnames = read_artifact(&artifact);
                SourceReport {
                    source: self.name().to_string(),
                    outcome,
                    hostnames,
                    artifact: artifact.exists().then_some(artifact),
                }
            }
            Err(e) => {
                warn!("[Subfinder] failed to spawn engine: {}", e);
                SourceReport::failed(self.name(), e.to_string())
            }
        }
    }
}

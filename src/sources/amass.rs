// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - amass Adapter
 * Passive enumeration via OWASP amass
 *
 * amass walks far more passive sources than the lighter engines, so it
 * runs under the longer passive timeout.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use super::{outcome_for, persist_stdout, resolve_binary, DiscoverySource};
use crate::exec::run_engine;
use crate::types::{RunContext, SourceReport};
use tracing::{debug, warn};

/// Wraps `amass enum -d <domain> -passive -silent`, stdout-captured.
pub struct Amass;

#[async_trait::async_trait]
impl DiscoverySource for Amass {
    fn name(&self) -> &'static str {
        "amass"
    }

    async fn collect(&self, ctx: &RunContext) -> SourceReport {
        let Some(binary) = resolve_binary(self.name()) else {
            debug!("[Amass] not installed, skipping");
            return SourceReport::unavailable(self.name());
        };

        let args = ["enum", "-d", ctx.domain.as_str(), "-passive", "-silent"];
        match run_engine(&binary, &args, None, ctx.passive_timeout).await {
            Ok(output) => {
                let outcome = outcome_for(self.name(), &output.status, &output.stderr);
                let hostnames = output.stdout_lines();
                let artifact =
                    persist_stdout(self.name(), &ctx.source_artifact(self.name()), &hostnames);
                SourceReport {
                    source: self.name().to_string(),
                    outcome,
                    hostnames,
                    artifact,
                }
            }
            Err(e) => {
                warn!("[Amass] failed to spawn engine: {}", e);
                SourceReport::failed(self.name(), e.to_string())
            }
        }
    }
}

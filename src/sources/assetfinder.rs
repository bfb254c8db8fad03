// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - assetfinder Adapter
 * Passive enumeration via assetfinder
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use super::{outcome_for, persist_stdout, resolve_binary, DiscoverySource};
use crate::exec::run_engine;
use crate::types::{RunContext, SourceReport};
use tracing::{debug, warn};

/// Wraps `assetfinder -subs-only <domain>`. The engine only emits to
/// stdout, so the adapter persists the capture as the workspace artifact.
pub struct Assetfinder;

#[async_trait::async_trait]
impl DiscoverySource for Assetfinder {
    fn name(&self) -> &'static str {
        "assetfinder"
    }

    async fn collect(&self, ctx: &RunContext) -> SourceReport {
        let Some(binary) = resolve_binary(self.name()) else {
            debug!("[Assetfinder] not installed, skipping");
            return SourceReport::unavailable(self.name());
        };

        let args = ["-subs-only", ctx.domain.as_str()];
        match run_engine(&binary, &args, None, ctx.source_timeout).await {
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
                warn!("[Assetfinder] failed to spawn engine: {}", e);
                SourceReport::failed(self.name(), e.to_string())
            }
        }
    }
}

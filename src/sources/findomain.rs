// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - findomain Adapter
 * Passive enumeration via findomain
 *
 * findomain's --output mode writes <domain>.txt relative to its working
 * directory, so this adapter pins the subprocess working directory to the
 * run workspace. The process-wide current directory is never touched; a
 * chdir here would leak into concurrently running adapters.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use super::{outcome_for, read_artifact, resolve_binary, DiscoverySource};
use crate::exec::run_engine;
use crate::types::{RunContext, SourceReport};
use tracing::{debug, warn};

pub struct Findomain;

#[async_trait::async_trait]
impl DiscoverySource for Findomain {
    fn name(&self) -> &'static str {
        "findomain"
    }

    async fn collect(&self, ctx: &RunContext) -> SourceReport {
        let Some(binary) = resolve_binary(self.name()) else {
            debug!("[Findomain] not installed, skipping");
            return SourceReport::unavailable(self.name());
        };

        // Engine-dictated artifact name, unique in the workspace because no
        // other source writes a bare <domain>.txt.
        let artifact = ctx.workspace.join(format!("{}.txt", ctx.domain));
        let args = ["--output", "-t", ctx.domain.as_str()];

        match run_engine(&binary, &args, Some(&ctx.workspace), ctx.source_timeout).await {
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
                warn!("[Findomain] failed to spawn engine: {}", e);
                SourceReport::failed(self.name(), e.to_string())
            }
        }
    }
}

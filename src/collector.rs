// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Parallel Source Collector
 * Fan-out/fan-in scheduler over the discovery sources
 *
 * One task per registered source, all dispatched at once, joined at a
 * full barrier. A worker that panics settles as a Failed report for its
 * source; siblings are never cancelled. Results are keyed by source
 * name, so completion order cannot affect aggregate content.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::sources::DiscoverySource;
use crate::types::{ProgressEvent, RunContext, SourceReport};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

pub struct ParallelCollector {
    sources: Vec<Arc<dyn DiscoverySource>>,
}

impl ParallelCollector {
    pub fn new(sources: Vec<Arc<dyn DiscoverySource>>) -> Self {
        Self { sources }
    }

    /// Run every registered source concurrently and block until all of
    /// them have settled (completed, timed out inside the adapter, or
    /// died). Never fails; a degraded source is a degraded report row.
    pub async fn collect_all(&self, ctx: &Arc<RunContext>) -> HashMap<String, SourceReport> {
        info!(
            "[Collector] Dispatching {} discovery sources for {}",
            self.sources.len(),
            ctx.domain
        );
        ctx.emit(ProgressEvent::CollectionStarted {
            sources: self.sources.iter().map(|s| s.name().to_string()).collect(),
        });

        let mut join_set = JoinSet::new();
        let mut pending: HashMap<tokio::task::Id, String> = HashMap::new();

        for source in &self.sources {
            let name = source.name().to_string();
            let source = Arc::clone(source);
            let ctx = Arc::clone(ctx);
            let handle = join_set.spawn(async move {
                ctx.emit(ProgressEvent::SourceStarted {
                    source: source.name().to_string(),
                });
                let report = source.collect(&ctx).await;
                ctx.emit(ProgressEvent::SourceSettled {
                    source: report.source.clone(),
                    outcome: report.outcome.clone(),
                    hostnames: report.hostnames.len(),
                });
                report
            });
            pending.insert(handle.id(), name);
        }

        // Full barrier: nothing flows downstream until every task settles.
        let mut results = HashMap::with_capacity(self.sources.len());
        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((id, report)) => {
                    pending.remove(&id);
                    info!(
                        "[Collector] {} settled: {} ({} hostnames)",
                        report.source,
                        report.outcome,
                        report.hostnames.len()
                    );
                    results.insert(report.source.clone(), report);
                }
                Err(join_err) => {
                    let name = pending
                        .remove(&join_err.id())
                        .unwrap_or_else(|| "unknown".to_string());
                    warn!("[Collector] {} worker died: {}", name, join_err);
                    let report = SourceReport::failed(&name, join_err.to_string());
                    ctx.emit(ProgressEvent::SourceSettled {
                        source: name.clone(),
                        outcome: report.outcome.clone(),
                        hostnames: 0,
                    });
                    results.insert(name, report);
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceOutcome;
    use std::time::Duration;

    struct StaticSource {
        name: &'static str,
        hostnames: Vec<&'static str>,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl DiscoverySource for StaticSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn collect(&self, _ctx: &RunContext) -> SourceReport {
            tokio::time::sleep(self.delay).await;
            SourceReport {
                source: self.name.to_string(),
                outcome: SourceOutcome::Success,
                hostnames: self.hostnames.iter().map(|h| h.to_string()).collect(),
                artifact: None,
            }
        }
    }

    struct PanickingSource;

    #[async_trait::async_trait]
    impl DiscoverySource for PanickingSource {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn collect(&self, _ctx: &RunContext) -> SourceReport {
            panic!("engine wrapper bug");
        }
    }

    fn test_ctx() -> Arc<RunContext> {
        Arc::new(RunContext::new(
            "example.com".to_string(),
            "test".to_string(),
            std::env::temp_dir(),
            false,
            Duration::from_secs(5),
            Duration::from_secs(5),
            Duration::from_secs(5),
            None,
        ))
    }

    #[tokio::test]
    async fn results_are_keyed_by_source_name() {
        let collector = ParallelCollector::new(vec![
            Arc::new(StaticSource {
                name: "slow",
                hostnames: vec!["a.example.com"],
                delay: Duration::from_millis(50),
            }),
            Arc::new(StaticSource {
                name: "fast",
                hostnames: vec!["b.example.com"],
                delay: Duration::ZERO,
            }),
        ]);

        let results = collector.collect_all(&test_ctx()).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results["slow"].hostnames, vec!["a.example.com"]);
        assert_eq!(results["fast"].hostnames, vec!["b.example.com"]);
    }

    #[tokio::test]
    async fn panicked_worker_settles_as_failed_without_cancelling_siblings() {
        let collector = ParallelCollector::new(vec![
            Arc::new(PanickingSource) as Arc<dyn DiscoverySource>,
            Arc::new(StaticSource {
                name: "healthy",
                hostnames: vec!["a.example.com"],
                delay: Duration::from_millis(20),
            }),
        ]);

        let results = collector.collect_all(&test_ctx()).await;
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results["broken"].outcome,
            SourceOutcome::Failed { .. }
        ));
        assert!(results["broken"].hostnames.is_empty());
        assert_eq!(results["healthy"].outcome, SourceOutcome::Success);
        assert_eq!(results["healthy"].hostnames, vec!["a.example.com"]);
    }

    #[tokio::test]
    async fn empty_source_list_yields_empty_map() {
        let collector = ParallelCollector::new(Vec::new());
        let results = collector.collect_all(&test_ctx()).await;
        assert!(results.is_empty());
    }
}

//! Concurrent link counting
//!
//! Each qualifying link is probed by its own task. Tasks report their
//! outcome back through a `JoinSet`; the counting loop is the only owner of
//! the tally, so no counter is ever shared between tasks.
//!
//! # Fan-out
//!
//! | Concern | Mechanism |
//! |---------|-----------|
//! | Max probes in flight | Semaphore with `max_concurrent` permits |
//! | Completion barrier | Drain the `JoinSet` until empty |
//! | Early termination | `CancellationToken` + abort-on-drop of the `JoinSet` |
//! | Probe task panics | Whole count fails with `LinkProbeFailed` |

use crate::links::classify::{classify_link, ClassifiedLink};
use crate::links::prober::{LinkProber, ProbeStatus};
use crate::report::LinkTally;
use crate::{AnalysisError, AnalysisResult};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;
use url::Url;

/// What a probe task reports back to the counting loop
#[derive(Debug)]
struct ProbeOutcome {
    link: ClassifiedLink,
    status: ProbeStatus,
}

/// Counts internal, external and inaccessible links for one page
pub struct LinkCounter {
    prober: Arc<dyn LinkProber>,
    max_concurrent: usize,
    dispatch: Dispatch,
}

impl LinkCounter {
    /// Creates a counter that keeps at most `max_concurrent` probes in flight
    ///
    /// Probe tasks log through the dispatcher that is current when the
    /// counter is created; use [`LinkCounter::with_dispatch`] to override.
    pub fn new(prober: Arc<dyn LinkProber>, max_concurrent: usize) -> Self {
        Self {
            prober,
            max_concurrent: max_concurrent.max(1),
            dispatch: tracing::dispatcher::get_default(|dispatch| dispatch.clone()),
        }
    }

    /// Routes log output of probe tasks to `dispatch`
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Classifies and probes every href, returning the aggregated tally
    ///
    /// Hrefs that are not absolute URLs are skipped. The call returns only
    /// after every dispatched probe has finished. If `cancel` fires, or a
    /// probe task dies, outstanding probes are abandoned and the count
    /// fails with [`AnalysisError::LinkProbeFailed`].
    pub async fn count(
        &self,
        hrefs: &[String],
        base: &Url,
        cancel: &CancellationToken,
    ) -> AnalysisResult<LinkTally> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut probes = JoinSet::new();

        for href in hrefs {
            let Some(link) = classify_link(href, base) else {
                tracing::debug!(link = %href, "Invalid link format");
                continue;
            };

            let prober = Arc::clone(&self.prober);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();

            let task = async move {
                let _permit = tokio::select! {
                    permit = semaphore.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return Err(AnalysisError::LinkProbeFailed),
                    },
                    _ = cancel.cancelled() => return Err(AnalysisError::LinkProbeFailed),
                };

                let status = tokio::select! {
                    status = prober.probe(&link.url) => status,
                    _ = cancel.cancelled() => return Err(AnalysisError::LinkProbeFailed),
                };

                Ok::<_, AnalysisError>(ProbeOutcome { link, status })
            };
            probes.spawn(task.with_subscriber(self.dispatch.clone()));
        }

        tracing::debug!(dispatched = probes.len(), "Probing links");

        let mut tally = LinkTally::default();
        while let Some(joined) = probes.join_next().await {
            let outcome = match joined {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(err)) => {
                    tracing::warn!("Link probing cancelled");
                    cancel.cancel();
                    return Err(err);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Link probe task failed");
                    cancel.cancel();
                    return Err(AnalysisError::LinkProbeFailed);
                }
            };

            let accessible = outcome.status.is_accessible();
            if !accessible {
                tracing::info!(
                    link = %outcome.link.url,
                    status_code = ?outcome.status.status_code(),
                    "Inaccessible link"
                );
            }
            tally.record(outcome.link.kind, accessible);
        }

        tracing::info!(
            total_links = tally.total(),
            internal_links = tally.internal,
            external_links = tally.external,
            inaccessible_links = tally.inaccessible,
            "Link analysis completed successfully"
        );

        Ok(tally)
    }
}

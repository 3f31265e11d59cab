//! Analysis orchestrator
//!
//! This module contains the entry point of an analysis run:
//! - Fetching the target page and buffering its body
//! - Dispatching the extraction units and the link counter concurrently
//! - Merging partial results into one `AnalysisReport`, or returning the
//!   first terminal `AnalysisError`
//!
//! Every run owns a cancellation token that fires when the run returns or
//! is dropped, so link probes never outlive the call that started them.

mod fetch;
mod phase;

pub use fetch::{build_http_client, fetch_page, read_body};
pub use phase::AnalysisPhase;

use crate::config::Config;
use crate::links::{HttpProber, LinkCounter, LinkProber};
use crate::parser;
use crate::report::{AnalysisReport, LinkTally};
use crate::{AnalysisError, AnalysisResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;
use url::Url;

/// A page URL together with the HTML fetched for it
///
/// Shared read-only between all units of one run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    url: Url,
    content: String,
}

impl AnalysisRequest {
    pub fn new(url: Url, content: impl Into<String>) -> Self {
        Self {
            url,
            content: content.into(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Runs page analyses
///
/// An `Analyzer` is cheap to share behind an `Arc`; each call to
/// [`Analyzer::analyze`] is independent and keeps no state between runs.
pub struct Analyzer {
    client: Client,
    links: LinkCounter,
    fetch_timeout: Duration,
    dispatch: Dispatch,
}

impl Analyzer {
    /// Creates an analyzer from its collaborators
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for the page fetch
    /// * `prober` - Liveness check applied to every counted link
    /// * `fetch_timeout` - Deadline for fetching and reading the page
    /// * `max_concurrent_probes` - Upper bound on probes in flight per run
    ///
    /// Logging goes to the dispatcher that is current at construction time;
    /// see [`Analyzer::with_dispatch`].
    pub fn new(
        client: Client,
        prober: Arc<dyn LinkProber>,
        fetch_timeout: Duration,
        max_concurrent_probes: usize,
    ) -> Self {
        Self {
            client,
            links: LinkCounter::new(prober, max_concurrent_probes),
            fetch_timeout,
            dispatch: tracing::dispatcher::get_default(|dispatch| dispatch.clone()),
        }
    }

    /// Builds an analyzer with an HTTP client and HEAD prober from `config`
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.http)?;
        Ok(Self::with_client(client, config))
    }

    /// Builds an analyzer around an existing client; page fetches and link
    /// probes both go through `client`
    pub fn with_client(client: Client, config: &Config) -> Self {
        let prober = HttpProber::new(client.clone(), config.http.probe_timeout());

        Self::new(
            client,
            Arc::new(prober),
            config.http.fetch_timeout(),
            config.probing.max_concurrent_probes,
        )
    }

    /// Sends all log output of this analyzer, including its worker tasks,
    /// to `dispatch`
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.links = self.links.with_dispatch(dispatch.clone());
        self.dispatch = dispatch;
        self
    }

    /// Fetches `url` and produces its report
    ///
    /// # Errors
    ///
    /// * `FetchFailed` - the GET failed at the transport level or timed out
    /// * `ReadBodyFailed` - the body could not be buffered
    /// * `LinkProbeFailed` - the link probing machinery broke down
    ///
    /// # Example
    ///
    /// ```no_run
    /// use url::Url;
    /// use web_analyzer::{Analyzer, Config};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let analyzer = Analyzer::from_config(&Config::default())?;
    /// let report = analyzer.analyze(&Url::parse("https://example.com/")?).await?;
    /// println!("{} has {} external links", report.title, report.links.external);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn analyze(&self, url: &Url) -> AnalysisResult<AnalysisReport> {
        let cancel = CancellationToken::new();
        let _cancel_on_exit = cancel.clone().drop_guard();

        self.run(url, &cancel)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    /// Produces a report for content that has already been fetched
    pub async fn analyze_content(&self, request: AnalysisRequest) -> AnalysisResult<AnalysisReport> {
        let cancel = CancellationToken::new();
        let _cancel_on_exit = cancel.clone().drop_guard();

        self.run_units(Arc::new(request), &cancel)
            .with_subscriber(self.dispatch.clone())
            .await
    }

    async fn run(&self, url: &Url, cancel: &CancellationToken) -> AnalysisResult<AnalysisReport> {
        let mut tracker = PhaseTracker::new();

        tracker.advance(AnalysisPhase::Fetching);
        tracing::info!(url = %url, "Fetching the web page");
        let response = fetch_page(&self.client, url, self.fetch_timeout)
            .await
            .map_err(|err| tracker.fail(err))?;

        tracker.advance(AnalysisPhase::Reading);
        let content = read_body(response).await.map_err(|err| tracker.fail(err))?;

        tracker.advance(AnalysisPhase::Analyzing);
        let request = Arc::new(AnalysisRequest::new(url.clone(), content));
        let report = self
            .run_units(request, cancel)
            .await
            .map_err(|err| tracker.fail(err))?;

        tracker.advance(AnalysisPhase::Reported);
        tracing::info!(url = %url, "Web page analysis completed successfully");

        Ok(report)
    }

    /// Runs every extraction unit and the link counter concurrently
    ///
    /// Returns as soon as the link counter fails; results of the other
    /// units are discarded in that case.
    async fn run_units(
        &self,
        request: Arc<AnalysisRequest>,
        cancel: &CancellationToken,
    ) -> AnalysisResult<AnalysisReport> {
        let (headings, has_login_form, title, html_version, links) = tokio::try_join!(
            self.extract(&request, "headings", parser::count_headings),
            self.extract(&request, "login_form", parser::contains_login_form),
            self.extract(&request, "title", parser::extract_title),
            self.extract(&request, "html_version", parser::detect_html_version),
            self.count_links(&request, cancel),
        )?;

        Ok(AnalysisReport::new(
            title,
            html_version,
            headings,
            links,
            has_login_form,
        ))
    }

    async fn count_links(
        &self,
        request: &Arc<AnalysisRequest>,
        cancel: &CancellationToken,
    ) -> AnalysisResult<LinkTally> {
        let hrefs = self.extract(request, "links", parser::collect_links).await?;
        self.links.count(&hrefs, request.url(), cancel).await
    }

    /// Runs one parser extraction on the blocking pool
    ///
    /// Extraction is best-effort: a unit that dies yields its empty result
    /// instead of failing the run.
    async fn extract<T, F>(
        &self,
        request: &Arc<AnalysisRequest>,
        unit: &'static str,
        extractor: F,
    ) -> AnalysisResult<T>
    where
        T: Default + Send + 'static,
        F: FnOnce(&str) -> T + Send + 'static,
    {
        let request = Arc::clone(request);
        let dispatch = self.dispatch.clone();

        let handle = tokio::task::spawn_blocking(move || {
            tracing::dispatcher::with_default(&dispatch, || extractor(request.content()))
        });

        match handle.await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(unit, error = %e, "Extraction unit failed, using empty result");
                Ok(T::default())
            }
        }
    }
}

/// Walks a run through its phases and logs every transition
struct PhaseTracker {
    phase: AnalysisPhase,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            phase: AnalysisPhase::Idle,
        }
    }

    fn advance(&mut self, next: AnalysisPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid analysis phase transition: {} -> {}",
            self.phase,
            next
        );
        tracing::debug!(from = %self.phase, to = %next, "Analysis phase changed");
        self.phase = next;
    }

    fn fail(&mut self, err: AnalysisError) -> AnalysisError {
        tracing::warn!(phase = %self.phase, error = %err, "Analysis failed");
        self.advance(AnalysisPhase::Failed);
        err
    }
}

//! Crawler coordinator - main harvest orchestration logic
//!
//! This module contains the run loop that drives every configured target
//! through the pipeline:
//! - Fetching the raw category page
//! - Detecting a "load more" control
//! - Expanding paginated pages in a rendering session
//! - Extracting product records
//! - Handing the records to the sink

use crate::config::{resolve_targets, Config};
use crate::crawler::document::{CssQuery, Document};
use crate::crawler::extractor::ProductExtractor;
use crate::crawler::loader::{InteractiveLoader, LoaderSettings, Renderer};
use crate::crawler::pagination::has_load_more;
use crate::crawler::{build_http_client, fetch_page, PageTarget};
use crate::output::{ProductSink, RunReport, TargetOutcome};
use crate::state::TargetState;
use crate::{HarvestError, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Main harvest coordinator structure
pub struct Coordinator {
    client: Client,
    extractor: ProductExtractor,
    load_more: CssQuery,
    loader: InteractiveLoader,
    sink: Box<dyn ProductSink>,
    isolate_failures: bool,
}

/// Result of pushing one target through the pipeline
struct Harvested {
    records: usize,
    paginated: bool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    /// * `renderer` - Opens browser sessions for paginated pages
    /// * `sink` - Receives the records of each target
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - A selector did not compile or the HTTP client could not be built
    pub fn new(
        config: Config,
        renderer: Arc<dyn Renderer>,
        sink: Box<dyn ProductSink>,
    ) -> Result<Self> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        let extractor = ProductExtractor::new(&config.selectors)?;
        let load_more = CssQuery::parse("load-more", &config.selectors.load_more)?;
        let loader = InteractiveLoader::new(
            renderer,
            LoaderSettings::from_config(&config.crawler, &config.browser),
        );

        Ok(Self {
            client,
            extractor,
            load_more,
            loader,
            sink,
            isolate_failures: config.crawler.isolate_failures,
        })
    }

    /// Runs every target in order
    ///
    /// By default the first failing target aborts the run and its error is
    /// returned; nothing is written for it or for any later target. With
    /// `isolate-failures` every target runs and failures end up in the report.
    pub async fn run(&self, targets: &[PageTarget]) -> Result<RunReport> {
        tracing::info!("Starting harvest of {} targets", targets.len());
        let mut report = RunReport::start();

        for target in targets {
            let mut state = TargetState::Pending;
            tracing::info!("Processing {} -> {}", target.url, target.destination);

            match self.process_target(target, &mut state).await {
                Ok(harvested) => {
                    tracing::info!(
                        "Wrote {} records to {}",
                        harvested.records,
                        target.destination
                    );
                    report.record(TargetOutcome::done(
                        &target.destination,
                        target.url.as_str(),
                        harvested.records,
                        harvested.paginated,
                    ));
                }
                Err(e) => {
                    let failed_in = state;
                    advance(&mut state, TargetState::Failed)?;
                    tracing::error!(
                        "Target {} failed while {}: {}",
                        target.destination,
                        failed_in,
                        e
                    );

                    if !self.isolate_failures {
                        return Err(e);
                    }
                    report.record(TargetOutcome::failed(
                        &target.destination,
                        target.url.as_str(),
                        e.to_string(),
                    ));
                }
            }
        }

        report.finish();
        tracing::info!(
            "Harvest completed: {} records, {} failed targets",
            report.total_records(),
            report.failed_count()
        );
        Ok(report)
    }

    /// Processes a single target
    ///
    /// `state` is left at the step that was running when an error occurred.
    async fn process_target(
        &self,
        target: &PageTarget,
        state: &mut TargetState,
    ) -> Result<Harvested> {
        let url = &target.url;

        advance(state, TargetState::Fetching)?;
        let body = fetch_page(&self.client, url).await?;
        let document = Document::parse(url.as_str(), &body)?;

        advance(state, TargetState::Detecting)?;
        let paginated = has_load_more(&document, &self.load_more);

        let document = if paginated {
            let static_blocks = self.extractor.count_blocks(&document);
            drop(document);
            tracing::debug!(
                "{} has a load-more control ({} blocks before expansion)",
                url,
                static_blocks
            );

            advance(state, TargetState::Loading)?;
            let expanded = self.loader.load(url).await?;
            tracing::debug!(
                "Expanded {} to {} blocks",
                url,
                self.extractor.count_blocks(&expanded)
            );
            expanded
        } else {
            tracing::debug!("{} is static", url);
            document
        };

        advance(state, TargetState::Extracting)?;
        let products = self.extractor.extract(&document)?;

        advance(state, TargetState::Writing)?;
        let path = self.sink.write(&target.destination, &products)?;
        tracing::debug!("Output written to {}", path.display());

        advance(state, TargetState::Done)?;
        Ok(Harvested {
            records: products.len(),
            paginated,
        })
    }
}

/// Moves `state` to `next`, rejecting steps the pipeline does not allow
fn advance(state: &mut TargetState, next: TargetState) -> Result<()> {
    if !state.can_transition_to(next) {
        return Err(HarvestError::InvalidTransition {
            from: *state,
            to: next,
        });
    }
    tracing::trace!("{} -> {}", state, next);
    *state = next;
    Ok(())
}

/// Runs the configured targets
///
/// This is the main entry point for a harvest. It will:
/// 1. Resolve the target table against `base-url`
/// 2. Build the HTTP client and the extractor
/// 3. Process each target in order
/// 4. Return the run report
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::Config;
/// use catalog_harvest::crawler::{run_targets, ChromiumRenderer};
/// use catalog_harvest::output::CsvSink;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let renderer = Arc::new(ChromiumRenderer::new(config.browser.clone(), Duration::from_secs(30)));
/// let sink = Box::new(CsvSink::new(&config.output.directory));
/// let report = run_targets(config, renderer, sink).await?;
/// println!("{} records", report.total_records());
/// # Ok(())
/// # }
/// ```
pub async fn run_targets(
    config: Config,
    renderer: Arc<dyn Renderer>,
    sink: Box<dyn ProductSink>,
) -> Result<RunReport> {
    let targets = resolve_targets(&config)?;
    let coordinator = Coordinator::new(config, renderer, sink)?;
    coordinator.run(&targets).await
}

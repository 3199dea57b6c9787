//! Search submission control
//!
//! The controller owns the last submitted query and drives one full cycle
//! per accepted submission: show the loading indicator, collapse the
//! results region, fetch, render, reveal. Identical re-submissions are
//! suppressed before any of that happens, and responses that come back
//! after a newer submission are discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::display::DisplaySurface;
use crate::render;
use crate::service::QueryService;
use crate::telemetry::UsageHandle;
use crate::types::ResultSet;

/// Drives the search cycle against a query service and a display surface
pub struct SearchController {
    service: Arc<dyn QueryService>,
    surface: Arc<dyn DisplaySurface>,
    usage: Option<UsageHandle>,
    /// Most recently submitted query; None until the first submission
    last_submitted: Mutex<Option<String>>,
    /// Submission counter used to tag in-flight fetches
    generation: AtomicU64,
}

impl SearchController {
    /// Create a new controller
    pub fn new(service: Arc<dyn QueryService>, surface: Arc<dyn DisplaySurface>) -> Self {
        Self {
            service,
            surface,
            usage: None,
            last_submitted: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Report accepted submissions to the given usage handle
    pub fn with_usage(mut self, usage: UsageHandle) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Submit the startup query (typically empty) to populate the
    /// prototypical results before any keystroke arrives.
    pub async fn start(&self, initial: &str) {
        self.submit(initial).await;
    }

    /// Submit a query.
    ///
    /// A query equal to the last submitted one is a no-op. Otherwise the
    /// fetch is issued only after the collapse transition has completed,
    /// and the response is dropped if a newer submission has since been
    /// accepted.
    pub async fn submit(&self, input: &str) {
        {
            let mut last = self.last_submitted.lock().unwrap();
            if last.as_deref() == Some(input) {
                tracing::debug!(query = input, "identical query suppressed");
                return;
            }
            *last = Some(input.to_string());
        }

        let submission = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            query = input,
            submission,
            service = self.service.name(),
            "query accepted"
        );

        if let Some(usage) = &self.usage {
            usage.report_usage("app", input);
        }

        self.surface.show_loading().await;
        self.surface.hide_results().await;

        let fetched = if input.is_empty() {
            self.service.fetch_prototypical().await
        } else {
            self.service.fetch_search(input).await
        };

        match fetched {
            Ok(results) => {
                if self.generation.load(Ordering::SeqCst) != submission {
                    tracing::debug!(query = input, submission, "discarding stale response");
                    return;
                }
                self.on_results(results).await;
            }
            Err(error) => {
                tracing::warn!(query = input, error = %error, "query failed");
                self.surface.hide_loading().await;
                self.surface.show_error(&format!("search failed: {error:#}")).await;
            }
        }
    }

    /// Deliver a result set to the surface: render, drop the loading
    /// indicator, reveal - in that order.
    async fn on_results(&self, mut results: ResultSet) {
        results.normalize();
        let blocks = render::render(&results);

        self.surface.render(&blocks).await;
        self.surface.hide_loading().await;
        self.surface.show_results().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::time::Duration;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use crate::render::RecordBlock;
    use crate::types::Record;

    /// Shared call journal so fakes can record a single global order
    type Journal = Arc<Mutex<Vec<String>>>;

    fn record(source: &str, title: &str) -> Record {
        Record {
            source: source.to_string(),
            title: title.to_string(),
            link: "http://x".to_string(),
            link_will_search: false,
            score: None,
        }
    }

    struct FakeService {
        journal: Journal,
        fail: bool,
        /// Per-query artificial latency, keyed by query ("" = prototypical)
        delays: HashMap<String, Duration>,
    }

    impl FakeService {
        fn new(journal: Journal) -> Self {
            Self {
                journal,
                fail: false,
                delays: HashMap::new(),
            }
        }

        fn failing(journal: Journal) -> Self {
            Self {
                journal,
                fail: true,
                delays: HashMap::new(),
            }
        }

        fn with_delay(mut self, query: &str, delay: Duration) -> Self {
            self.delays.insert(query.to_string(), delay);
            self
        }

        async fn respond(&self, query: &str) -> Result<ResultSet> {
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(ResultSet {
                records: vec![record("BBC", &format!("about:{query}"))],
            })
        }
    }

    #[async_trait]
    impl QueryService for FakeService {
        fn name(&self) -> &str {
            "fake"
        }

        async fn fetch_prototypical(&self) -> Result<ResultSet> {
            self.journal.lock().unwrap().push("fetch:prototypical".to_string());
            self.respond("").await
        }

        async fn fetch_search(&self, query: &str) -> Result<ResultSet> {
            self.journal.lock().unwrap().push(format!("fetch:{query}"));
            self.respond(query).await
        }
    }

    struct FakeSurface {
        journal: Journal,
    }

    impl FakeSurface {
        fn new(journal: Journal) -> Self {
            Self { journal }
        }

        fn push(&self, event: &str) {
            self.journal.lock().unwrap().push(event.to_string());
        }
    }

    #[async_trait]
    impl DisplaySurface for FakeSurface {
        async fn show_loading(&self) {
            self.push("show_loading");
        }

        async fn hide_loading(&self) {
            self.push("hide_loading");
        }

        async fn hide_results(&self) {
            self.push("hide_results");
        }

        async fn show_results(&self) {
            self.push("show_results");
        }

        async fn render(&self, blocks: &[RecordBlock]) {
            let titles: Vec<&str> = blocks.iter().map(|b| b.title.as_str()).collect();
            self.push(&format!("render:{}", titles.join(",")));
        }

        async fn show_error(&self, message: &str) {
            self.push(&format!("error:{message}"));
        }
    }

    fn controller_with(service: FakeService, journal: &Journal) -> SearchController {
        SearchController::new(
            Arc::new(service),
            Arc::new(FakeSurface::new(journal.clone())),
        )
    }

    fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn events(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_identical_query_is_suppressed() {
        let journal = journal();
        let controller = controller_with(FakeService::new(journal.clone()), &journal);

        controller.submit("climate").await;
        controller.submit("climate").await;

        let fetches: Vec<String> = events(&journal)
            .into_iter()
            .filter(|e| e.starts_with("fetch:"))
            .collect();
        assert_eq!(fetches, vec!["fetch:climate"]);
    }

    #[tokio::test]
    async fn test_empty_query_routes_to_prototypical() {
        let journal = journal();
        let controller = controller_with(FakeService::new(journal.clone()), &journal);

        controller.submit("").await;
        controller.submit("economy").await;

        let fetches: Vec<String> = events(&journal)
            .into_iter()
            .filter(|e| e.starts_with("fetch:"))
            .collect();
        assert_eq!(fetches, vec!["fetch:prototypical", "fetch:economy"]);
    }

    #[tokio::test]
    async fn test_fetch_waits_for_collapse_and_reveal_comes_last() {
        let journal = journal();
        let controller = controller_with(FakeService::new(journal.clone()), &journal);

        controller.submit("economy").await;

        assert_eq!(
            events(&journal),
            vec![
                "show_loading",
                "hide_results",
                "fetch:economy",
                "render:about:economy",
                "hide_loading",
                "show_results",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_hides_loading_and_shows_error() {
        let journal = journal();
        let controller = controller_with(FakeService::failing(journal.clone()), &journal);

        controller.submit("economy").await;

        let events = events(&journal);
        assert_eq!(events[3], "hide_loading");
        assert!(events[4].starts_with("error:search failed"));
        assert!(!events.iter().any(|e| e == "show_results"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let journal = journal();
        let service =
            FakeService::new(journal.clone()).with_delay("slow", Duration::from_millis(100));
        let controller = Arc::new(controller_with(service, &journal));

        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("slow").await })
        };
        tokio::task::yield_now().await;

        // Second submission overtakes the delayed first one
        controller.submit("fast").await;
        slow.await.unwrap();

        let renders: Vec<String> = events(&journal)
            .into_iter()
            .filter(|e| e.starts_with("render:"))
            .collect();
        assert_eq!(renders, vec!["render:about:fast"]);
    }

    #[tokio::test]
    async fn test_startup_submission_populates_prototypical() {
        let journal = journal();
        let controller = controller_with(FakeService::new(journal.clone()), &journal);

        controller.start("").await;

        assert!(events(&journal).contains(&"fetch:prototypical".to_string()));
        assert!(events(&journal).contains(&"render:about:".to_string()));
    }
}

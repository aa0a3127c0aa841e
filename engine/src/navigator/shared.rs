//! Shared navigator for async hosts
//!
//! Wraps a [`Navigator`] in `Arc<tokio::sync::Mutex<_>>` so intents stay
//! serialized while enrichment calls run as spawned tasks. A task holds
//! the lock only to read its request and to apply the reply; the external
//! call itself happens with the lock released, so coin input is never
//! blocked on it.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::debug;

use super::engine::Navigator;
use super::screen::Screen;
use crate::hints::{enrich_with_timeout, EnrichmentRequest, TextEnricher};
use crate::models::RoundError;

/// Cloneable handle to one navigator plus its text enricher
#[derive(Clone)]
pub struct SharedNavigator {
    inner: Arc<Mutex<Navigator>>,
    enricher: Arc<dyn TextEnricher>,
}

impl SharedNavigator {
    pub fn new(navigator: Navigator, enricher: Arc<dyn TextEnricher>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(navigator)),
            enricher,
        }
    }

    /// Exclusive access for any intent
    pub async fn lock(&self) -> MutexGuard<'_, Navigator> {
        self.inner.lock().await
    }

    /// Ask for a hint and start enriching it in the background.
    ///
    /// Returns the deterministic text right away, plus the enrichment task
    /// when one was started. The task resolves to whether its reply was
    /// applied.
    pub async fn get_hint(&self) -> Result<(String, Option<JoinHandle<bool>>), RoundError> {
        let (text, request) = {
            let mut nav = self.inner.lock().await;
            let text = nav.get_hint()?;
            (text, nav.hint_enrichment_request())
        };
        let task = request.and_then(|request| self.spawn_enrichment(request));
        Ok((text, task))
    }

    /// Open the Summary screen and start enriching its feedback
    pub async fn show_summary(&self) -> (Option<String>, Option<JoinHandle<bool>>) {
        let (text, request) = {
            let mut nav = self.inner.lock().await;
            nav.navigate(Screen::Summary);
            (
                nav.feedback_text().map(str::to_string),
                nav.feedback_enrichment_request(),
            )
        };
        let task = request.and_then(|request| self.spawn_enrichment(request));
        (text, task)
    }

    /// Run `request` on the tokio runtime and apply the reply if it is
    /// still current. `None` when the enricher is unavailable.
    pub fn spawn_enrichment(&self, request: EnrichmentRequest) -> Option<JoinHandle<bool>> {
        if !self.enricher.is_available() {
            return None;
        }
        let inner = Arc::clone(&self.inner);
        let enricher = Arc::clone(&self.enricher);

        Some(tokio::spawn(async move {
            let timeout = inner.lock().await.config().enrichment_timeout();
            match enrich_with_timeout(enricher.as_ref(), &request, timeout).await {
                Ok(reply) => inner.lock().await.apply_enrichment(reply),
                Err(e) => {
                    debug!(error = %e, "enrichment failed; keeping deterministic text");
                    false
                }
            }
        }))
    }
}

impl std::fmt::Debug for SharedNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedNavigator")
            .field("enricher_available", &self.enricher.is_available())
            .finish_non_exhaustive()
    }
}

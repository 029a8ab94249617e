use std::sync::Arc;

use crate::{
    cache::{Cache, CacheKey},
    debug::{DebugCategory, DebugSink},
    error::{AppError, AppResult},
    models::{Catalog, ShowRecord},
    services::{extract, model::ModelClient, normalize, prompts},
};

/// Fallback catalog tag for cross-catalog search results that arrive
/// without a `service` field
const MULTIPLE_CATALOGS: &str = "Multiple Services";

/// Orchestrates the cache-check → call → extract → normalize → store
/// pipeline for every query kind
///
/// Collaborators are injected rather than ambient so tests can swap the
/// model and storage; the cache and debug sink are cheap to clone and share
/// their state across clones.
#[derive(Clone)]
pub struct QueryService {
    model: Arc<dyn ModelClient>,
    cache: Cache,
    debug: DebugSink,
}

impl QueryService {
    pub fn new(model: Arc<dyn ModelClient>, cache: Cache, debug: DebugSink) -> Self {
        Self {
            model,
            cache,
            debug,
        }
    }

    /// Debug sink for observer registration by presentation code
    pub fn debug(&self) -> &DebugSink {
        &self.debug
    }

    /// Top trending/highly-rated items for one catalog
    pub async fn fetch_trending(&self, catalog: Catalog) -> AppResult<Vec<ShowRecord>> {
        let key = CacheKey::Trending(catalog);
        let prompt = prompts::trending_prompt(catalog);
        self.run_pipeline(key, prompt, catalog.name(), catalog.name(), false)
            .await
    }

    /// Title search scoped to one catalog
    pub async fn search(&self, catalog: Catalog, query: &str) -> AppResult<Vec<ShowRecord>> {
        let key = CacheKey::Search(catalog, query.to_string());
        let prompt = prompts::search_prompt(catalog, query);
        self.run_pipeline(key, prompt, catalog.name(), catalog.name(), false)
            .await
    }

    /// Single search spanning every known catalog
    ///
    /// Every returned record carries `source_catalog`; records the model
    /// left untagged fall back to a generic label.
    pub async fn search_across_catalogs(&self, query: &str) -> AppResult<Vec<ShowRecord>> {
        let key = CacheKey::SearchAll(query.to_string());
        let prompt = prompts::search_all_prompt(query);
        self.run_pipeline(key, prompt, "all", "cross-catalog", true)
            .await
    }

    /// Trending items from every catalog, fetched in parallel
    ///
    /// Each per-catalog fetch settles independently; failures are logged and
    /// discarded, and surviving records are tagged with their originating
    /// catalog. Fails only when every catalog failed.
    pub async fn fetch_trending_aggregate(&self) -> AppResult<Vec<ShowRecord>> {
        let mut tasks = Vec::new();
        for catalog in Catalog::ALL {
            let service = self.clone();
            let task = tokio::spawn(async move { service.fetch_trending(catalog).await });
            tasks.push((catalog, task));
        }

        let mut records = Vec::new();
        let mut failures = 0;

        for (catalog, task) in tasks {
            match task.await {
                Ok(Ok(batch)) => {
                    records.extend(batch.into_iter().map(|mut record| {
                        record.source_catalog = Some(catalog.name().to_string());
                        record
                    }));
                }
                Ok(Err(e)) => {
                    failures += 1;
                    tracing::warn!(catalog = %catalog, error = %e, "Trending fetch failed");
                }
                Err(e) => {
                    failures += 1;
                    tracing::error!(catalog = %catalog, error = %e, "Task join error");
                }
            }
        }

        if failures > 0 {
            tracing::warn!(
                success_count = Catalog::ALL.len() - failures,
                error_count = failures,
                "Partial aggregate fetch failure"
            );
        }

        if failures == Catalog::ALL.len() {
            let err = AppError::AllSourcesFailed;
            self.debug.publish(DebugCategory::Error, err.to_string());
            return Err(err);
        }

        Ok(records)
    }

    async fn run_pipeline(
        &self,
        key: CacheKey,
        prompt: String,
        id_context: &str,
        failure_label: &str,
        tag_untagged: bool,
    ) -> AppResult<Vec<ShowRecord>> {
        if let Some(records) = self.cache.get(&key).await {
            self.debug
                .publish(DebugCategory::Cache, format!("Cache hit for {}", key));
            return Ok(records);
        }
        self.debug
            .publish(DebugCategory::Cache, format!("Cache miss for {}", key));

        self.debug.publish(
            DebugCategory::Request,
            format!("Prompt for {} ({} chars)", key, prompt.len()),
        );

        let text = match self.model.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                let err = classify_call_failure(e, failure_label);
                self.debug.publish(DebugCategory::Error, err.to_string());
                return Err(err);
            }
        };

        self.debug.publish(
            DebugCategory::Response,
            format!("{} returned {} chars", self.model.name(), text.len()),
        );

        let raw = match extract::extract(&text) {
            Ok(raw) => raw,
            Err(e) => {
                self.debug.publish(DebugCategory::Error, e.to_string());
                return Err(e);
            }
        };

        let mut records = normalize::normalize(&raw, id_context);
        if tag_untagged {
            for record in &mut records {
                if record.source_catalog.is_none() {
                    record.source_catalog = Some(MULTIPLE_CATALOGS.to_string());
                }
            }
        }

        self.cache.put(&key, &records).await;
        self.debug.publish(
            DebugCategory::Cache,
            format!("Stored {} records under {}", records.len(), key),
        );

        Ok(records)
    }
}

/// Folds an upstream call error into the user-facing taxonomy
///
/// Known timeout indicators map to a retry-oriented timeout message; every
/// other upstream failure becomes the generic call failure for the label.
fn classify_call_failure(error: AppError, label: &str) -> AppError {
    if error.is_timeout() {
        tracing::warn!(label = %label, error = %error, "Model call timed out");
        AppError::Timeout(label.to_string())
    } else {
        tracing::error!(label = %label, error = %error, "Model call failed");
        AppError::CallFailed(label.to_string())
    }
}

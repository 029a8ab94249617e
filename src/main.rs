use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use streamscout::{
    Cache, Catalog, Config, DebugBuffer, DebugSink, FileStorage, GeminiClient, MemoryStorage,
    QueryService, Storage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let storage: Arc<dyn Storage> = match &config.cache_path {
        Some(path) => Arc::new(FileStorage::new(path)),
        None => Arc::new(MemoryStorage::new()),
    };

    let model = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
    ));

    let debug = DebugSink::new();
    let buffer = DebugBuffer::new();
    buffer.attach(&debug);

    let service = QueryService::new(model, Cache::new(storage), debug);

    // Usage: streamscout [catalog|all] [query]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let catalog = args.first().map(String::as_str).unwrap_or("netflix");
    let query = args.get(1).map(String::as_str);

    let records = match (parse_catalog(catalog), query) {
        (Some(catalog), Some(query)) => service.search(catalog, query).await?,
        (Some(catalog), None) => service.fetch_trending(catalog).await?,
        (None, Some(query)) => service.search_across_catalogs(query).await?,
        (None, None) => service.fetch_trending_aggregate().await?,
    };

    for record in &records {
        let scores = format!(
            "critics {} / audience {}",
            record
                .critic_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into()),
            record
                .audience_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into()),
        );
        let catalog = record.source_catalog.as_deref().unwrap_or("");
        println!(
            "{} ({}) [{}] {} {}",
            record.title, record.year, scores, record.genre, catalog
        );
    }

    for event in buffer.snapshot() {
        tracing::debug!(category = %event.category, message = %event.message, "pipeline event");
    }

    Ok(())
}

fn parse_catalog(name: &str) -> Option<Catalog> {
    Catalog::ALL
        .into_iter()
        .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
}

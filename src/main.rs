use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use office_hours_match::config::{LogFormat, LoggingSettings, Settings};
use office_hours_match::core::{DisabledReasoning, Matcher, ReasoningGenerator};
use office_hours_match::models::ScoringWeights;
use office_hours_match::routes::{self, matches::AppState};
use office_hours_match::services::{CacheManager, LlmReasoningClient, MatchingService, PostgresClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Failed to load configuration: {}", e),
        )
    })?;

    init_tracing(&settings.logging);

    info!("Starting Office Hours match service...");
    info!("Configuration loaded successfully");

    // Initialize cache manager, falling back to the in-process tier without Redis
    let cache_ttl = settings.cache.ttl_secs;
    let l1_cache_size = settings.cache.l1_cache_size;

    let cache = match settings.cache.redis_url.as_deref() {
        Some(redis_url) => match CacheManager::new(redis_url, l1_cache_size, cache_ttl).await {
            Ok(c) => {
                info!("Cache manager initialized (L1: {} entries, TTL: {}s, Redis L2)", l1_cache_size, cache_ttl);
                c
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), using in-memory cache only", e);
                CacheManager::in_memory(l1_cache_size, cache_ttl)
            }
        },
        None => {
            info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
            CacheManager::in_memory(l1_cache_size, cache_ttl)
        }
    };

    // Initialize PostgreSQL client
    let postgres = PostgresClient::from_settings(
        &settings.database.url,
        settings.database.max_connections,
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
    })?;

    info!("PostgreSQL client initialized");

    // Initialize reasoning generator
    let reasoning_timeout = Duration::from_secs(settings.reasoning.timeout_secs);
    let reasoning: Arc<dyn ReasoningGenerator> = match settings.reasoning.api_key.clone() {
        Some(api_key) => match LlmReasoningClient::new(
            settings.reasoning.base_url.clone(),
            api_key,
            settings.reasoning.model.clone(),
            reasoning_timeout,
        ) {
            Ok(client) => {
                info!("Reasoning client initialized (model: {})", settings.reasoning.model);
                Arc::new(client)
            }
            Err(e) => {
                warn!("Failed to build reasoning client ({}), using templated reasoning", e);
                Arc::new(DisabledReasoning::new(e.to_string()))
            }
        },
        None => {
            warn!("No reasoning API key configured, using templated reasoning");
            Arc::new(DisabledReasoning::new("no API key configured"))
        }
    };

    // Initialize matcher with configured weights
    let weights = ScoringWeights::from(&settings.scoring.weights);

    let matcher = Matcher::new(weights, reasoning)
        .with_reasoning_timeout(reasoning_timeout)
        .with_reasoning_threshold(settings.matching.reasoning_threshold);

    info!("Matcher initialized with weights: {:?}", weights);

    // Build application state
    let app_state = AppState {
        service: Arc::new(MatchingService::new(Arc::new(postgres), Arc::new(cache), matcher)),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

/// Install the global subscriber; RUST_LOG overrides the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }
}

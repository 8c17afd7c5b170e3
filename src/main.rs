use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use kindred_match::config::{PoolStoreKind, Settings};
use kindred_match::core::{FallbackSupplier, Matcher, ProfileGenerator, TextEmbedder};
use kindred_match::routes::{self, matches::AppState};
use kindred_match::services::{
    ConfiguredModelProvider, FallbackPoolStore, InMemoryPoolStore, RedisPoolStore,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST),
        )
        .content_type("application/json")
        .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Pick the configured fallback pool store, degrading to memory when Redis is unreachable
async fn build_pool_store(settings: &Settings) -> Arc<dyn FallbackPoolStore> {
    let fallback = &settings.fallback;

    match (fallback.store, fallback.redis_url.as_deref()) {
        (PoolStoreKind::Redis, Some(url)) => {
            match RedisPoolStore::new(url, fallback.key_prefix.clone()).await {
                Ok(store) => {
                    info!(
                        "Fallback pool stored in Redis under {}",
                        fallback.key_prefix
                    );
                    Arc::new(store)
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis ({}), keeping fallback pool in memory",
                        e
                    );
                    Arc::new(InMemoryPoolStore::new())
                }
            }
        }
        (PoolStoreKind::Redis, None) => {
            warn!(
                "Redis fallback store selected without fallback.redis_url, keeping pool in memory"
            );
            Arc::new(InMemoryPoolStore::new())
        }
        (PoolStoreKind::Memory, _) => {
            info!("Fallback pool kept in memory");
            Arc::new(InMemoryPoolStore::new())
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // Initialize logging; LOG_LEVEL / LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format =
        std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Kindred matching service...");
    info!("Configuration loaded successfully");

    let provider = Arc::new(ConfiguredModelProvider::new(settings.embedding.clone()));
    let embedder = Arc::new(TextEmbedder::from_settings(provider, &settings.embedding));

    info!(
        "Text embedder ready ({:?} backend, {} entry cache, {}ms timeout)",
        settings.embedding.backend,
        settings.embedding.cache_capacity,
        settings.embedding.timeout_ms
    );

    let store = build_pool_store(&settings).await;
    let fallback = Arc::new(FallbackSupplier::new(
        store,
        ProfileGenerator::new(settings.fallback.seed),
    ));

    let matcher = Matcher::new(embedder, fallback)
        .with_scoring_concurrency(settings.ranking.scoring_concurrency);

    info!(
        "Matcher initialized (scoring concurrency {})",
        settings.ranking.scoring_concurrency
    );

    // Build application state
    let app_state = AppState { matcher };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
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

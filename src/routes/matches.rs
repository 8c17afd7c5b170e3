use crate::core::Matcher;
use crate::models::{ErrorResponse, FallbackRequest, HealthResponse, RankRequest, RankResponse};
use actix_web::{web, HttpResponse, Responder};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/rank", web::post().to(rank_matches))
        .route("/matches/fallback", web::post().to(fallback_matches))
        .route("/embeddings/stats", web::get().to(embedding_stats));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank a candidate pool for a seeker
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "seeker": { "id": "u1", "age": 27, "gender": "male", "genderSeeking": "female", ... },
///   "candidates": [ { "id": "u2", ... } ]
/// }
/// ```
async fn rank_matches(state: web::Data<AppState>, req: web::Json<RankRequest>) -> impl Responder {
    if let Err(errors) = req.validate_profiles() {
        tracing::info!("Validation failed for rank request: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    tracing::info!(
        "Ranking {} candidates for {}",
        req.candidates.len(),
        req.seeker.id
    );

    let result = state
        .matcher
        .rank_detailed(&req.seeker, &req.candidates)
        .await;

    tracing::debug!(
        "Rank for {} resolved via {:?} ({} eligible of {})",
        req.seeker.id,
        result.source,
        result.eligible_candidates,
        result.total_candidates
    );

    HttpResponse::Ok().json(RankResponse {
        total_results: result.matches.len(),
        matches: result.matches,
    })
}

/// Substitute profiles for a requested gender
///
/// POST /api/v1/matches/fallback
async fn fallback_matches(
    state: web::Data<AppState>,
    req: web::Json<FallbackRequest>,
) -> impl Responder {
    let matches = state.matcher.fallback().fallback(req.gender_seeking).await;

    HttpResponse::Ok().json(RankResponse {
        total_results: matches.len(),
        matches,
    })
}

/// Embedding cache statistics
async fn embedding_stats(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.matcher.embedder().stats())
}

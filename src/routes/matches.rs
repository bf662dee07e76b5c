use crate::models::{
    ErrorResponse, ExplainMatchQuery, HealthResponse, ListMatchesQuery, ListMatchesResponse,
    MenteeMatchesResponse, RefreshMatchesRequest, RefreshMatchesResponse,
};
use crate::services::{MatchingError, MatchingService};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MatchingService>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches", web::get().to(list_matches))
        .route("/matches/refresh", web::post().to(refresh_matches))
        .route("/matches/explain", web::get().to(explain_match))
        .route("/mentors/{mentor_id}/mentees", web::get().to(mentor_mentees));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.service.health().await { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// List a mentee's matches
///
/// GET /api/v1/matches?menteeId={id}&expertise=a,b&industry=c&minRating=4&limit=10
async fn list_matches(
    state: web::Data<AppState>,
    query: web::Query<ListMatchesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors.to_string());
    }
    if let Err(response) = check_id("menteeId", &query.mentee_id) {
        return response;
    }

    tracing::info!("Listing matches for mentee: {}", query.mentee_id);

    match state.service.matches_for_mentee(&query.mentee_id, &query.filters()).await {
        Ok(matches) => HttpResponse::Ok().json(ListMatchesResponse {
            mentee_id: query.mentee_id.clone(),
            total_results: matches.len(),
            matches,
        }),
        Err(e) => error_response("Failed to fetch matches", e),
    }
}

/// Regenerate a mentee's matches
///
/// POST /api/v1/matches/refresh
///
/// Request body:
/// ```json
/// {
///   "menteeId": "string"
/// }
/// ```
async fn refresh_matches(
    state: web::Data<AppState>,
    req: web::Json<RefreshMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }
    if let Err(response) = check_id("menteeId", &req.mentee_id) {
        return response;
    }

    match state.service.refresh_matches(&req.mentee_id).await {
        Ok(count) => {
            tracing::info!("Refreshed {} matches for mentee {}", count, req.mentee_id);
            HttpResponse::Ok().json(RefreshMatchesResponse {
                count,
                message: format!("Generated {} matches", count),
            })
        }
        Err(e) => error_response("Failed to refresh matches", e),
    }
}

/// Explain a single mentee/mentor pair
///
/// GET /api/v1/matches/explain?menteeId={id}&mentorId={id}
async fn explain_match(
    state: web::Data<AppState>,
    query: web::Query<ExplainMatchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors.to_string());
    }
    if let Err(response) = check_id("menteeId", &query.mentee_id)
        .and_then(|_| check_id("mentorId", &query.mentor_id))
    {
        return response;
    }

    match state.service.explain_match(&query.mentee_id, &query.mentor_id).await {
        Ok(explanation) => HttpResponse::Ok().json(explanation),
        Err(e) => error_response("Failed to explain match", e),
    }
}

/// Rank active mentees for a mentor
///
/// GET /api/v1/mentors/{mentorId}/mentees
async fn mentor_mentees(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let mentor_id = path.into_inner();
    if let Err(response) = check_id("mentorId", &mentor_id) {
        return response;
    }

    match state.service.matches_for_mentor(&mentor_id).await {
        Ok(mentees) => HttpResponse::Ok().json(MenteeMatchesResponse { mentor_id, mentees }),
        Err(e) => error_response("Failed to rank mentees", e),
    }
}

fn validation_error(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

fn check_id(field: &str, value: &str) -> Result<(), HttpResponse> {
    uuid::Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| validation_error(format!("{} must be a UUID", field)))
}

fn error_response(context: &str, err: MatchingError) -> HttpResponse {
    match err {
        MatchingError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message,
            status_code: 404,
        }),
        MatchingError::InvalidInput(message) => validation_error(message),
        MatchingError::Store(e) => {
            tracing::error!("{}: {}", context, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

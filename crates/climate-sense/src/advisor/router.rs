use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{ChallengeId, ChatRequest, UserId};
use super::generator::{GenerationError, TextGenerator};
use super::repository::{ClimateRepository, RepositoryError};
use super::service::{AdvisorError, ClimateAdvisorService};
use crate::footprint::UserInputs;

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
const RATE_LIMITED_MESSAGE: &str =
    "AI is temporarily busy. Please try again in a few seconds.";
const GENERATION_FAILED_MESSAGE: &str = "Something went wrong while processing AI response.";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct FootprintRequest {
    pub user_id: UserId,
    pub inputs: UserInputs,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub inputs: UserInputs,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub inputs: UserInputs,
    #[serde(default)]
    pub analysis: String,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeRequest {
    pub user_id: UserId,
    pub inputs: UserInputs,
    #[serde(default)]
    pub recommendations: String,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// Router builder exposing the scoring and guidance endpoints.
pub fn advisor_router<G, R>(service: Arc<ClimateAdvisorService<G, R>>) -> Router
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    Router::new()
        .route("/api/v1/users", post(register_handler::<G, R>))
        .route(
            "/api/v1/users/:user_id/history",
            get(history_handler::<G, R>),
        )
        .route("/api/v1/footprint", post(footprint_handler::<G, R>))
        .route("/api/v1/analysis", post(analysis_handler::<G, R>))
        .route(
            "/api/v1/recommendations",
            post(recommendation_handler::<G, R>),
        )
        .route("/api/v1/challenges", post(challenge_handler::<G, R>))
        .route(
            "/api/v1/challenges/:challenge_id/accept",
            post(accept_challenge_handler::<G, R>),
        )
        .route("/api/v1/chat", post(chat_handler::<G, R>))
        .route("/api/v1/leaderboard", get(leaderboard_handler::<G, R>))
        .with_state(service)
}

pub(crate) async fn register_handler<G, R>(
    State(service): State<Arc<ClimateAdvisorService<G, R>>>,
    Json(request): Json<RegisterRequest>,
) -> Response
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    match service.register(&request.username) {
        Ok(user) => {
            let payload = json!({
                "success": true,
                "user_id": user.id,
                "username": user.username,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn footprint_handler<G, R>(
    State(service): State<Arc<ClimateAdvisorService<G, R>>>,
    Json(request): Json<FootprintRequest>,
) -> Response
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    match service.assess(&request.user_id, &request.inputs) {
        Ok(assessment) => {
            let payload = json!({ "success": true, "footprint": assessment });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn analysis_handler<G, R>(
    State(service): State<Arc<ClimateAdvisorService<G, R>>>,
    Json(request): Json<AnalysisRequest>,
) -> Response
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    match service.analyze(&request.inputs).await {
        Ok(analysis) => {
            let payload = json!({ "success": true, "analysis": analysis });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recommendation_handler<G, R>(
    State(service): State<Arc<ClimateAdvisorService<G, R>>>,
    Json(request): Json<RecommendationRequest>,
) -> Response
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    match service.recommend(&request.inputs, &request.analysis).await {
        Ok(recommendations) => {
            let payload = json!({ "success": true, "recommendations": recommendations });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn challenge_handler<G, R>(
    State(service): State<Arc<ClimateAdvisorService<G, R>>>,
    Json(request): Json<ChallengeRequest>,
) -> Response
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    match service
        .challenge(&request.user_id, &request.inputs, &request.recommendations)
        .await
    {
        Ok(issued) => {
            let payload = json!({
                "success": true,
                "challenge": issued.challenge,
                "challenge_id": issued.challenge_id,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn accept_challenge_handler<G, R>(
    State(service): State<Arc<ClimateAdvisorService<G, R>>>,
    Path(challenge_id): Path<String>,
) -> Response
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    let id = ChallengeId(challenge_id);
    match service.accept_challenge(&id) {
        Ok(_) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(AdvisorError::Repository(RepositoryError::NotFound)) => failure(
            StatusCode::NOT_FOUND,
            format!("Challenge {} not found", id),
        ),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn chat_handler<G, R>(
    State(service): State<Arc<ClimateAdvisorService<G, R>>>,
    Json(request): Json<ChatRequest>,
) -> Response
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    match service.chat(request).await {
        Ok(response) => {
            let payload = json!({ "success": true, "response": response });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<G, R>(
    State(service): State<Arc<ClimateAdvisorService<G, R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    match service.history(&UserId(user_id)) {
        Ok(history) => {
            let payload = json!({
                "success": true,
                "footprints": history.footprints,
                "challenges": history.challenges,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn leaderboard_handler<G, R>(
    State(service): State<Arc<ClimateAdvisorService<G, R>>>,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    match service.leaderboard(limit) {
        Ok(entries) => {
            let payload = json!({ "success": true, "leaderboard": entries });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AdvisorError) -> Response {
    match error {
        AdvisorError::Input(error) => failure(StatusCode::BAD_REQUEST, error.to_string()),
        AdvisorError::InvalidRequest(message) => failure(StatusCode::BAD_REQUEST, message),
        AdvisorError::UnknownUser(_) => {
            failure(StatusCode::UNAUTHORIZED, "User not registered".to_string())
        }
        AdvisorError::Generation(GenerationError::RateLimited(detail)) => {
            warn!(%detail, "text generation rate limited");
            failure(
                StatusCode::TOO_MANY_REQUESTS,
                RATE_LIMITED_MESSAGE.to_string(),
            )
        }
        AdvisorError::Generation(GenerationError::NotConfigured) => failure(
            StatusCode::SERVICE_UNAVAILABLE,
            GenerationError::NotConfigured.to_string(),
        ),
        AdvisorError::Generation(GenerationError::Failed(detail)) => {
            warn!(%detail, "text generation failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERATION_FAILED_MESSAGE.to_string(),
            )
        }
        AdvisorError::Repository(RepositoryError::NotFound) => {
            failure(StatusCode::NOT_FOUND, RepositoryError::NotFound.to_string())
        }
        AdvisorError::Repository(RepositoryError::Conflict) => {
            failure(StatusCode::CONFLICT, RepositoryError::Conflict.to_string())
        }
        AdvisorError::Repository(error) => {
            failure(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    }
}

fn failure(status: StatusCode, message: String) -> Response {
    let payload = json!({ "success": false, "error": message });
    (status, Json(payload)).into_response()
}

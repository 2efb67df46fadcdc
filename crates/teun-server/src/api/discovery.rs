use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use teun_db::NewDiscoveryResult;
use teun_pipeline::{resolve_session_token, DiscoveryRequest, DiscoveryResponse, PipelineError};
use uuid::Uuid;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

const MISSING_INPUT_MESSAGE: &str = "Vul een URL of zoekwoord in";
const INVALID_BODY_MESSAGE: &str = "Ongeldig verzoek. Controleer de invoer.";
const GENERIC_FAILURE_MESSAGE: &str = "Er ging iets mis. Probeer het opnieuw.";

#[derive(Debug, Deserialize)]
pub(super) struct SessionQuery {
    session: Option<String>,
    limit: Option<i64>,
}

pub(super) async fn run_discovery(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Json<DiscoveryRequest>, JsonRejection>,
) -> Result<Json<DiscoveryResponse>, ApiError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!(error = %e, "rejected discovery body");
        ApiError::new(req_id.0.clone(), "bad_request", INVALID_BODY_MESSAGE)
    })?;

    let session_token = resolve_session_token(
        headers
            .get("x-session-token")
            .and_then(|v| v.to_str().ok()),
    );

    let response = match state.pipeline.run(&request, &session_token).await {
        Ok(response) => response,
        Err(PipelineError::MissingInput) => {
            return Err(ApiError::new(req_id.0, "bad_request", MISSING_INPUT_MESSAGE));
        }
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "prompt discovery failed");
            return Err(ApiError::new(req_id.0, "internal_error", GENERIC_FAILURE_MESSAGE));
        }
    };

    if let Some(pool) = state.pool.as_ref() {
        persist(pool, &request, &response).await;
    }

    Ok(Json(response))
}

/// Stores a finished run; failures are logged and never reach the caller.
async fn persist(pool: &PgPool, request: &DiscoveryRequest, response: &DiscoveryResponse) {
    let new = match new_result(request, response) {
        Ok(new) => new,
        Err(e) => {
            tracing::warn!(error = %e, "could not serialize discovery result");
            return;
        }
    };
    match teun_db::insert_discovery_result(pool, &new).await {
        Ok(row) => {
            tracing::info!(
                id = %row.public_id,
                session = %row.session_token,
                "stored discovery result"
            );
        }
        Err(e) => tracing::warn!(error = %e, "failed to store discovery result"),
    }
}

fn new_result(
    request: &DiscoveryRequest,
    response: &DiscoveryResponse,
) -> Result<NewDiscoveryResult, serde_json::Error> {
    fn json<T: Serialize>(value: &T) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(value)
    }

    Ok(NewDiscoveryResult {
        session_token: response.session_token.clone(),
        website: request.url().map(str::to_string),
        keyword: request.keyword().map(str::to_string),
        brand_name: request
            .brand_name()
            .map(str::to_string)
            .or_else(|| (!response.company_name.is_empty()).then(|| response.company_name.clone())),
        industry: request.industry().map(str::to_string),
        location: request.location().map(str::to_string),
        prompts: json(&response.prompts)?,
        clusters: json(&response.clusters)?,
        extracted_keywords: json(&response.extracted_keywords)?,
        top_competitors: json(&response.top_competitors)?,
        source: response.source.as_ref().map(json).transpose()?,
        meta: json(&response.meta)?,
    })
}

fn require_pool(state: &AppState, request_id: &str) -> Result<PgPool, ApiError> {
    state.pool.clone().ok_or_else(|| {
        ApiError::new(request_id, "unavailable", "opslag is niet geconfigureerd")
    })
}

pub(super) async fn get_result(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let public_id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::new(req_id.0.clone(), "bad_request", "ongeldig id"))?;
    let pool = require_pool(&state, &req_id.0)?;

    let row = teun_db::get_discovery_result(&pool, public_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: row,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_for_session(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SessionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let session = params
        .session
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "bad_request", "session is verplicht"))?;
    let pool = require_pool(&state, &req_id.0)?;

    let limit = normalize_limit(params.limit);
    let rows = teun_db::list_discovery_results_by_session(&pool, session, limit)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}

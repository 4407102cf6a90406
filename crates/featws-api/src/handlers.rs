//! Rulesheet request handlers

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use featws_core::{FindResult, Rulesheet};
use featws_store::{Page, RulesheetFilter};

use crate::error::ApiError;
use crate::server::SharedState;

/// Deadline applied to every service operation
pub const REQUEST_DEADLINE: Duration = Duration::from_secs(10);

async fn with_deadline<T>(
    fut: impl Future<Output = featws_core::Result<T>>,
) -> Result<T, ApiError> {
    match tokio::time::timeout(REQUEST_DEADLINE, fut).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => Err(ApiError::Timeout),
    }
}

/// POST /api/v1/rulesheets
pub async fn create(
    State(state): State<SharedState>,
    Json(mut payload): Json<Rulesheet>,
) -> Result<impl IntoResponse, ApiError> {
    with_deadline(state.service.create(&mut payload)).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

/// GET /api/v1/rulesheets
///
/// `limit` and `page` control pagination (0 disables it), `count=true`
/// switches the response to a `FindResult`, and every remaining query
/// parameter is a filter field.
pub async fn list(
    State(state): State<SharedState>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let limit = take_number(&mut params, "limit")?;
    let page = take_number(&mut params, "page")?;
    let count_only = params
        .remove("count")
        .is_some_and(|value| value == "true");

    let filter =
        RulesheetFilter::from_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;

    if count_only {
        let count = with_deadline(state.service.count(&filter)).await?;
        return Ok(Json(FindResult { count }).into_response());
    }

    let found = with_deadline(state.service.find(&filter, Page::new(limit, page))).await?;
    Ok(Json(found).into_response())
}

/// GET /api/v1/rulesheets/:id
pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Rulesheet>, ApiError> {
    let id = parse_id(&id)?;
    let found = with_deadline(state.service.get(id)).await?;
    found.map(Json).ok_or(ApiError::NotFound)
}

/// PUT /api/v1/rulesheets/:id
pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(mut payload): Json<Rulesheet>,
) -> Result<Json<Rulesheet>, ApiError> {
    payload.id = parse_id(&id)?;
    let updated = with_deadline(state.service.update(&mut payload)).await?;
    if updated {
        Ok(Json(payload))
    } else {
        Err(ApiError::NotFound)
    }
}

/// DELETE /api/v1/rulesheets/:id
pub async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let deleted = with_deadline(state.service.delete(id)).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse().map_err(|_| ApiError::BadRequest {
        message: format!("invalid id: {raw}"),
    })
}

fn take_number(params: &mut HashMap<String, String>, key: &str) -> Result<i64, ApiError> {
    match params.remove(key) {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|_| ApiError::BadRequest {
            message: format!("{key} must be a number"),
        }),
    }
}

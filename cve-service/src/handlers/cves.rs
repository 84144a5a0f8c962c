use crate::dtos::{CountResponse, CveListParams, CveListResponse};
use crate::models::CveRecord;
use crate::startup::AppState;
use anyhow::anyhow;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use service_core::error::AppError;

pub async fn list_cves(
    State(state): State<AppState>,
    params: Result<Query<CveListParams>, QueryRejection>,
) -> Result<Json<CveListResponse>, AppError> {
    let Query(params) =
        params.map_err(|e| AppError::Validation(anyhow!("Invalid query parameters: {}", e)))?;

    let skip = non_negative("skip", params.skip.unwrap_or(0))?;
    let limit = match params.limit {
        Some(limit) => non_negative("limit", limit)?,
        None => state.config.pagination.default_limit,
    };

    let page = state.query.list_paginated(skip, limit).await?;
    Ok(Json(CveListResponse::from(page)))
}

pub async fn get_cve(
    State(state): State<AppState>,
    Path(cve_id): Path<String>,
) -> Result<Json<CveRecord>, AppError> {
    let record = state.query.get_by_identifier(&cve_id).await?;
    Ok(Json(record))
}

pub async fn count_cves(State(state): State<AppState>) -> Result<Json<CountResponse>, AppError> {
    let count = state.query.count().await?;
    Ok(Json(CountResponse::from(count)))
}

fn non_negative(name: &str, value: i64) -> Result<u64, AppError> {
    u64::try_from(value).map_err(|_| {
        AppError::Validation(anyhow!(
            "Query parameter '{}' must be a non-negative integer, got {}",
            name,
            value
        ))
    })
}

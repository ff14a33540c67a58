//! Storefront listings. Only active items are ever returned here.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use temple_core::catalog::ServiceCategory;
use temple_core::content::{ContentType, ValidationError};

use crate::error::ApiResult;
use crate::state::AppState;

use super::non_blank;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/services", get(list_services))
        .route("/api/content", get(list_content))
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentParams {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub category: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceParams {
    pub category: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub fn parse_content_type(raw: Option<String>) -> Result<Option<ContentType>, ValidationError> {
    non_blank(raw)
        .map(|t| {
            t.parse::<ContentType>()
                .map_err(|e| ValidationError::InvalidType { value: e.0 })
        })
        .transpose()
}

async fn list_services(
    State(state): State<AppState>,
    params: Result<Query<ServiceParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let category = non_blank(params.category)
        .map(|c| c.parse::<ServiceCategory>())
        .transpose()?;
    let page = state.query().page(params.limit, params.offset);

    let services = state.query().list_services(category, page).await?;
    Ok(Json(json!({ "success": true, "services": services })))
}

async fn list_content(
    State(state): State<AppState>,
    params: Result<Query<ContentParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let content_type = parse_content_type(params.content_type)?;
    let page = state.query().page(params.limit, params.offset);

    let contents = state
        .query()
        .list_public(content_type, non_blank(params.category), page)
        .await?;
    Ok(Json(json!({ "success": true, "contents": contents })))
}

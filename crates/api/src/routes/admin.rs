//! Admin dashboard endpoints. Every handler takes [`RequireAdmin`], so an
//! unauthenticated request is rejected before any work is done.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use temple_core::auth::AdminIdentity;
use temple_core::content::{ContentId, ContentItemDraft, ContentPatch, ValidationError};

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

use super::catalog::{parse_content_type, ContentParams};
use super::{non_blank, PageParams};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/content",
            get(list_content)
                .post(create_content)
                .patch(update_content)
                .delete(delete_content),
        )
        .route(
            "/api/admin/content/{id}",
            patch(update_content_at).delete(delete_content_at),
        )
        .route("/api/admin/stats", get(stats))
        .route("/api/admin/bookings", get(list_bookings))
        .route("/api/admin/users", get(list_users))
}

fn object(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(ApiError::BadRequest("request body must be a JSON object".into())),
    }
}

/// The `id` of a PATCH body, as a number or numeric string.
fn body_id(fields: &Map<String, Value>) -> Result<ContentId, ValidationError> {
    match fields.get("id") {
        None | Some(Value::Null) => Err(ValidationError::Missing { field: "id" }),
        Some(Value::Number(n)) => n.as_i64().ok_or(ValidationError::NotAnInteger { field: "id" }),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| ValidationError::NotAnInteger { field: "id" }),
        Some(_) => Err(ValidationError::NotAnInteger { field: "id" }),
    }
}

async fn list_content(
    State(state): State<AppState>,
    RequireAdmin { .. }: RequireAdmin,
    params: Result<Query<ContentParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let content_type = parse_content_type(params.content_type)?;
    let page = state.query().page(params.limit, params.offset);

    let contents = state
        .query()
        .list_admin(content_type, non_blank(params.category), page)
        .await?;
    Ok(Json(json!({ "success": true, "contents": contents })))
}

async fn create_content(
    State(state): State<AppState>,
    RequireAdmin { admin, .. }: RequireAdmin,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    let draft = ContentItemDraft::from_fields(&object(body)?)?;

    let content = state.admin().create(&admin, draft).await?;
    Ok(Json(json!({ "success": true, "content": content })))
}

async fn apply_patch(
    state: &AppState,
    admin: &AdminIdentity,
    id: ContentId,
    fields: &Map<String, Value>,
) -> ApiResult<Json<Value>> {
    let patch = ContentPatch::from_fields(fields)?;
    let content = state.admin().update(admin, id, patch).await?;
    Ok(Json(json!({ "success": true, "content": content })))
}

async fn update_content(
    State(state): State<AppState>,
    RequireAdmin { admin, .. }: RequireAdmin,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    let fields = object(body)?;
    let id = body_id(&fields)?;
    apply_patch(&state, &admin, id, &fields).await
}

async fn update_content_at(
    State(state): State<AppState>,
    RequireAdmin { admin, .. }: RequireAdmin,
    id: Result<Path<ContentId>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let Json(body) = body?;
    apply_patch(&state, &admin, id, &object(body)?).await
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    id: Option<ContentId>,
}

async fn delete_content(
    State(state): State<AppState>,
    RequireAdmin { admin, .. }: RequireAdmin,
    params: Result<Query<DeleteParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let id = params.id.ok_or(ValidationError::Missing { field: "id" })?;
    state.admin().delete(&admin, id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn delete_content_at(
    State(state): State<AppState>,
    RequireAdmin { admin, .. }: RequireAdmin,
    id: Result<Path<ContentId>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    state.admin().delete(&admin, id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn stats(
    State(state): State<AppState>,
    RequireAdmin { admin, .. }: RequireAdmin,
) -> ApiResult<Json<Value>> {
    let stats = state.stats().compute_snapshot(&admin).await?;
    Ok(Json(json!({ "success": true, "stats": stats })))
}

async fn list_bookings(
    State(state): State<AppState>,
    RequireAdmin { .. }: RequireAdmin,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let page = state.query().page(params.limit, params.offset);
    let bookings = state.store().list_bookings(page).await?;
    Ok(Json(json!({ "success": true, "bookings": bookings })))
}

async fn list_users(
    State(state): State<AppState>,
    RequireAdmin { .. }: RequireAdmin,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let page = state.query().page(params.limit, params.offset);
    let users = state.store().list_users(page).await?;
    Ok(Json(json!({ "success": true, "users": users })))
}

//! Shopper cart endpoints, keyed by the `x-cart-session` header.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use temple_core::cart::{AddOutcome, CartSelector, CartState};
use temple_core::catalog::ServiceId;
use temple_core::content::ValidationError;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::{CartSession, MaybeSession};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(show).delete(clear))
        .route("/api/cart/items", post(add).delete(remove_by_service))
        .route("/api/cart/items/{index}", delete(remove_at))
}

fn cart_body(cart: CartState) -> Json<Value> {
    Json(json!({ "success": true, "cart": cart }))
}

async fn show(State(state): State<AppState>, CartSession(session): CartSession) -> Json<Value> {
    cart_body(state.carts().peek(&session).await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddRequest {
    service_id: ServiceId,
}

async fn add(
    State(state): State<AppState>,
    CartSession(session): CartSession,
    MaybeSession(identity): MaybeSession,
    body: Result<Json<AddRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(AddRequest { service_id }) = body?;
    let service = state.query().get_active_service(service_id).await?;

    let cart = state.carts().open(&session).await;
    let mut cart = cart.lock().await;
    match cart.add_item(&service, || identity.is_some()).await {
        AddOutcome::Added(cart) => Ok(cart_body(cart)),
        AddOutcome::AuthRequired(pending) => Err(ApiError::AuthRequired(pending)),
    }
}

async fn remove_at(
    State(state): State<AppState>,
    CartSession(session): CartSession,
    index: Result<Path<usize>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(index) = index?;
    let cart = state.carts().open(&session).await;
    let mut cart = cart.lock().await;
    Ok(cart_body(cart.remove_item(CartSelector::Index(index)).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoveParams {
    service_id: Option<ServiceId>,
}

async fn remove_by_service(
    State(state): State<AppState>,
    CartSession(session): CartSession,
    params: Result<Query<RemoveParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let id = params
        .service_id
        .ok_or(ValidationError::Missing { field: "serviceId" })?;
    let cart = state.carts().open(&session).await;
    let mut cart = cart.lock().await;
    Ok(cart_body(cart.remove_item(CartSelector::Id(id)).await?))
}

async fn clear(State(state): State<AppState>, CartSession(session): CartSession) -> Json<Value> {
    let cart = state.carts().open(&session).await;
    let mut cart = cart.lock().await;
    cart_body(cart.clear().await)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use serde_json::{json, Value};
    use temple_core::auth::Role;
    use temple_core::catalog::{Service, ServiceCategory};

    use crate::routes::testing::{app, send, token};

    fn cart_request(method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-cart-session", "session-1");
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn aarti(id: i64, active: bool) -> Service {
        Service {
            id,
            name_en: "Morning Aarti".into(),
            name_hi: Some("प्रातः आरती".into()),
            description_en: "Sunrise aarti".into(),
            description_hi: None,
            category: ServiceCategory::DailyAarti,
            price: 101.0,
            duration: 30,
            image_url: None,
            benefits_en: vec![],
            benefits_hi: vec![],
            is_active: active,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn unauthenticated_add_then_retry_after_login() {
        let (app, state, store) = app();
        store.insert_service(aarti(5, true)).await;

        let (status, body) = send(
            &app,
            cart_request("POST", "/api/cart/items", None, Some(json!({ "serviceId": 5 }))),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["type"], "authRequired");
        assert_eq!(body["error"]["pending"]["serviceId"], 5);

        let (_, body) = send(&app, cart_request("GET", "/api/cart", None, None)).await;
        assert!(body["cart"]["items"].as_array().unwrap().is_empty());

        let shopper = token(&state, Role::Shopper);
        let (status, body) = send(
            &app,
            cart_request("POST", "/api/cart/items", Some(&shopper), Some(json!({ "serviceId": 5 }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let items = body["cart"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], 5);
        assert_eq!(items[0]["type"], "service");
        assert_eq!(items[0]["nameEn"], "Morning Aarti");
        assert_eq!(body["cart"]["persisted"], true);
    }

    #[tokio::test]
    async fn duplicates_remove_and_clear() {
        let (app, state, store) = app();
        store.insert_service(aarti(1, true)).await;
        let shopper = token(&state, Role::Shopper);

        for _ in 0..3 {
            let (status, _) = send(
                &app,
                cart_request("POST", "/api/cart/items", Some(&shopper), Some(json!({ "serviceId": 1 }))),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(&app, cart_request("DELETE", "/api/cart/items/0", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cart"]["items"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            &app,
            cart_request("DELETE", "/api/cart/items?serviceId=1", None, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cart"]["items"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, cart_request("DELETE", "/api/cart/items/9", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, cart_request("DELETE", "/api/cart", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["cart"]["items"].as_array().unwrap().is_empty());
        assert_eq!(body["cart"]["total"], 0.0);
    }

    #[tokio::test]
    async fn inactive_or_missing_service_is_404() {
        let (app, state, store) = app();
        store.insert_service(aarti(2, false)).await;
        let shopper = token(&state, Role::Shopper);

        for id in [2, 99] {
            let (status, _) = send(
                &app,
                cart_request("POST", "/api/cart/items", Some(&shopper), Some(json!({ "serviceId": id }))),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn missing_session_header_is_400() {
        let (app, _, _) = app();
        let request = Request::builder()
            .method("GET")
            .uri("/api/cart")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "badRequest");
    }

    #[tokio::test]
    async fn reading_unknown_carts_keeps_nothing_live() {
        let (app, state, _) = app();
        for i in 0..200 {
            let request = Request::builder()
                .method("GET")
                .uri("/api/cart")
                .header("x-cart-session", format!("visitor-{i}"))
                .body(Body::empty())
                .unwrap();
            let (status, body) = send(&app, request).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body["cart"]["items"].as_array().unwrap().is_empty());
        }
        assert_eq!(state.carts().open_count().await, 0);
    }

    #[tokio::test]
    async fn non_numeric_index_is_a_json_400() {
        let (app, _, _) = app();
        let (status, body) =
            send(&app, cart_request("DELETE", "/api/cart/items/first", None, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "badRequest");
        assert_eq!(body["error"]["statusCode"], 400);
    }
}

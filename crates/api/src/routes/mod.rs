pub mod admin;
pub mod cart;
pub mod catalog;
pub mod health;
pub mod session;

use axum::Router;
use serde::Deserialize;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(catalog::routes())
        .merge(admin::routes())
        .merge(session::routes())
        .merge(cart::routes())
        .with_state(state)
}

/// `limit`/`offset` query parameters shared by every listing.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Treat `?category=` the same as no parameter at all.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//! Catalog read and write services.

pub mod admin;
pub mod query;
pub mod service;

use thiserror::Error;

use crate::content::ValidationError;
use crate::store::StoreError;

pub use admin::CatalogAdminService;
pub use query::{CatalogQueryService, ContentFilter, PageBounds, Pagination, ServiceFilter};
pub use service::{Service, ServiceCategory, ServiceId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no catalog entry with id {0}")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

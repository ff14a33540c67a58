//! Persistence boundary.
//!
//! The store is constructed once at startup and shared as `Arc<dyn Store>`.
//! [`postgres::PgStore`] is the production backend, [`memory::MemoryStore`]
//! backs tests and local runs, and [`unconfigured::UnconfiguredStore`] stands
//! in when no database URL is configured. [`timed::TimedStore`] bounds every
//! call with a timeout.

pub mod memory;
pub mod postgres;
pub mod timed;
pub mod unconfigured;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::bookings::{Booking, BookingTotals, TimeWindow, User, UserCredentials};
use crate::catalog::{ContentFilter, Pagination, Service, ServiceFilter, ServiceId};
use crate::content::{ContentId, ContentItem, ContentItemDraft, ContentPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database not configured; set DATABASE_URL")]
    Unconfigured,

    #[error("store operation {operation} timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed row: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Whether the failure means "try again later" rather than a defect.
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::Unconfigured | StoreError::Timeout { .. } => true,
            StoreError::Database(err) => match err {
                sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::Protocol(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::WorkerCrashed => true,
                sqlx::Error::Database(db) => db.code().is_some_and(|code| connection_lost(&code)),
                _ => false,
            },
            StoreError::Malformed(_) => false,
        }
    }
}

/// SQLSTATE codes for a dropped or refused connection: class 08 and the
/// server shutdown / startup codes.
fn connection_lost(sqlstate: &str) -> bool {
    sqlstate.starts_with("08") || matches!(sqlstate, "57P01" | "57P02" | "57P03")
}

/// Catalog content and services.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    /// Items matching `filter`, ordered by `order`, creation time, then id.
    async fn list_contents(
        &self,
        filter: &ContentFilter,
        page: Pagination,
    ) -> Result<Vec<ContentItem>, StoreError>;

    async fn get_content(&self, id: ContentId) -> Result<Option<ContentItem>, StoreError>;

    async fn insert_content(&self, draft: &ContentItemDraft) -> Result<ContentItem, StoreError>;

    /// Atomically apply `patch`. `None` when the id does not exist.
    async fn update_content(
        &self,
        id: ContentId,
        patch: &ContentPatch,
    ) -> Result<Option<ContentItem>, StoreError>;

    /// Hard delete. `false` when the id does not exist.
    async fn delete_content(&self, id: ContentId) -> Result<bool, StoreError>;

    /// Services matching `filter`, ordered by creation time then id.
    async fn list_services(
        &self,
        filter: &ServiceFilter,
        page: Pagination,
    ) -> Result<Vec<Service>, StoreError>;

    async fn get_service(&self, id: ServiceId) -> Result<Option<Service>, StoreError>;

    async fn count_active_services(&self) -> Result<u64, StoreError>;
}

/// Bookings and user accounts.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Newest first.
    async fn list_bookings(&self, page: Pagination) -> Result<Vec<Booking>, StoreError>;

    /// Newest first.
    async fn list_users(&self, page: Pagination) -> Result<Vec<User>, StoreError>;

    /// Count of all bookings and revenue of confirmed/completed ones created
    /// within `window` (all time when `None`).
    async fn booking_totals(&self, window: Option<TimeWindow>)
        -> Result<BookingTotals, StoreError>;

    async fn user_count(&self, window: Option<TimeWindow>) -> Result<u64, StoreError>;

    async fn find_user_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, StoreError>;
}

/// Everything the services need from persistence.
pub trait Store: CatalogStore + ActivityStore {}

impl<T: CatalogStore + ActivityStore> Store for T {}

use async_trait::async_trait;

use crate::bookings::{Booking, BookingTotals, TimeWindow, User, UserCredentials};
use crate::catalog::{ContentFilter, Pagination, Service, ServiceFilter, ServiceId};
use crate::content::{ContentId, ContentItem, ContentItemDraft, ContentPatch};

use super::{ActivityStore, CatalogStore, StoreError};

/// Stand-in used when no database is configured. Every operation fails with
/// [`StoreError::Unconfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredStore;

#[async_trait]
impl CatalogStore for UnconfiguredStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn list_contents(
        &self,
        _filter: &ContentFilter,
        _page: Pagination,
    ) -> Result<Vec<ContentItem>, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn get_content(&self, _id: ContentId) -> Result<Option<ContentItem>, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn insert_content(&self, _draft: &ContentItemDraft) -> Result<ContentItem, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn update_content(
        &self,
        _id: ContentId,
        _patch: &ContentPatch,
    ) -> Result<Option<ContentItem>, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn delete_content(&self, _id: ContentId) -> Result<bool, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn list_services(
        &self,
        _filter: &ServiceFilter,
        _page: Pagination,
    ) -> Result<Vec<Service>, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn get_service(&self, _id: ServiceId) -> Result<Option<Service>, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn count_active_services(&self) -> Result<u64, StoreError> {
        Err(StoreError::Unconfigured)
    }
}

#[async_trait]
impl ActivityStore for UnconfiguredStore {
    async fn list_bookings(&self, _page: Pagination) -> Result<Vec<Booking>, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn list_users(&self, _page: Pagination) -> Result<Vec<User>, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn booking_totals(
        &self,
        _window: Option<TimeWindow>,
    ) -> Result<BookingTotals, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn user_count(&self, _window: Option<TimeWindow>) -> Result<u64, StoreError> {
        Err(StoreError::Unconfigured)
    }

    async fn find_user_credentials(
        &self,
        _email: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        Err(StoreError::Unconfigured)
    }
}

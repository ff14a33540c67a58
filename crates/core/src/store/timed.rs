use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::bookings::{Booking, BookingTotals, TimeWindow, User, UserCredentials};
use crate::catalog::{ContentFilter, Pagination, Service, ServiceFilter, ServiceId};
use crate::content::{ContentId, ContentItem, ContentItemDraft, ContentPatch};

use super::{ActivityStore, CatalogStore, Store, StoreError};

/// Bounds every call on the wrapped store by `timeout`.
///
/// A call that runs out of time is reported as [`StoreError::Timeout`]. It is
/// not retried and must not be assumed to have been applied.
#[derive(Clone)]
pub struct TimedStore {
    inner: Arc<dyn Store>,
    timeout: Duration,
}

impl TimedStore {
    pub fn new(inner: Arc<dyn Store>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "store operation timed out");
                Err(StoreError::Timeout {
                    operation,
                    elapsed: self.timeout,
                })
            }
        }
    }
}

#[async_trait]
impl CatalogStore for TimedStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.bounded("ping", self.inner.ping()).await
    }

    async fn list_contents(
        &self,
        filter: &ContentFilter,
        page: Pagination,
    ) -> Result<Vec<ContentItem>, StoreError> {
        self.bounded("list_contents", self.inner.list_contents(filter, page))
            .await
    }

    async fn get_content(&self, id: ContentId) -> Result<Option<ContentItem>, StoreError> {
        self.bounded("get_content", self.inner.get_content(id)).await
    }

    async fn insert_content(&self, draft: &ContentItemDraft) -> Result<ContentItem, StoreError> {
        self.bounded("insert_content", self.inner.insert_content(draft))
            .await
    }

    async fn update_content(
        &self,
        id: ContentId,
        patch: &ContentPatch,
    ) -> Result<Option<ContentItem>, StoreError> {
        self.bounded("update_content", self.inner.update_content(id, patch))
            .await
    }

    async fn delete_content(&self, id: ContentId) -> Result<bool, StoreError> {
        self.bounded("delete_content", self.inner.delete_content(id))
            .await
    }

    async fn list_services(
        &self,
        filter: &ServiceFilter,
        page: Pagination,
    ) -> Result<Vec<Service>, StoreError> {
        self.bounded("list_services", self.inner.list_services(filter, page))
            .await
    }

    async fn get_service(&self, id: ServiceId) -> Result<Option<Service>, StoreError> {
        self.bounded("get_service", self.inner.get_service(id)).await
    }

    async fn count_active_services(&self) -> Result<u64, StoreError> {
        self.bounded("count_active_services", self.inner.count_active_services())
            .await
    }
}

#[async_trait]
impl ActivityStore for TimedStore {
    async fn list_bookings(&self, page: Pagination) -> Result<Vec<Booking>, StoreError> {
        self.bounded("list_bookings", self.inner.list_bookings(page))
            .await
    }

    async fn list_users(&self, page: Pagination) -> Result<Vec<User>, StoreError> {
        self.bounded("list_users", self.inner.list_users(page)).await
    }

    async fn booking_totals(
        &self,
        window: Option<TimeWindow>,
    ) -> Result<BookingTotals, StoreError> {
        self.bounded("booking_totals", self.inner.booking_totals(window))
            .await
    }

    async fn user_count(&self, window: Option<TimeWindow>) -> Result<u64, StoreError> {
        self.bounded("user_count", self.inner.user_count(window)).await
    }

    async fn find_user_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        self.bounded(
            "find_user_credentials",
            self.inner.find_user_credentials(email),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    /// Delegates to a memory store but stalls on `ping` and `delete_content`.
    struct Stalling(MemoryStore);

    #[async_trait]
    impl CatalogStore for Stalling {
        async fn ping(&self) -> Result<(), StoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
        async fn list_contents(
            &self,
            filter: &ContentFilter,
            page: Pagination,
        ) -> Result<Vec<ContentItem>, StoreError> {
            self.0.list_contents(filter, page).await
        }
        async fn get_content(&self, id: ContentId) -> Result<Option<ContentItem>, StoreError> {
            self.0.get_content(id).await
        }
        async fn insert_content(
            &self,
            draft: &ContentItemDraft,
        ) -> Result<ContentItem, StoreError> {
            self.0.insert_content(draft).await
        }
        async fn update_content(
            &self,
            id: ContentId,
            patch: &ContentPatch,
        ) -> Result<Option<ContentItem>, StoreError> {
            self.0.update_content(id, patch).await
        }
        async fn delete_content(&self, _id: ContentId) -> Result<bool, StoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(true)
        }
        async fn list_services(
            &self,
            filter: &ServiceFilter,
            page: Pagination,
        ) -> Result<Vec<Service>, StoreError> {
            self.0.list_services(filter, page).await
        }
        async fn get_service(&self, id: ServiceId) -> Result<Option<Service>, StoreError> {
            self.0.get_service(id).await
        }
        async fn count_active_services(&self) -> Result<u64, StoreError> {
            self.0.count_active_services().await
        }
    }

    #[async_trait]
    impl ActivityStore for Stalling {
        async fn list_bookings(&self, page: Pagination) -> Result<Vec<Booking>, StoreError> {
            self.0.list_bookings(page).await
        }
        async fn list_users(&self, page: Pagination) -> Result<Vec<User>, StoreError> {
            self.0.list_users(page).await
        }
        async fn booking_totals(
            &self,
            window: Option<TimeWindow>,
        ) -> Result<BookingTotals, StoreError> {
            self.0.booking_totals(window).await
        }
        async fn user_count(&self, window: Option<TimeWindow>) -> Result<u64, StoreError> {
            self.0.user_count(window).await
        }
        async fn find_user_credentials(
            &self,
            email: &str,
        ) -> Result<Option<UserCredentials>, StoreError> {
            self.0.find_user_credentials(email).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operations_time_out() {
        let store = TimedStore::new(
            Arc::new(Stalling(MemoryStore::new())),
            Duration::from_millis(50),
        );

        let err = store.ping().await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout { operation: "ping", .. }));
        assert!(err.is_unavailable());

        let err = store.delete_content(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout { operation: "delete_content", .. }));
    }

    #[tokio::test]
    async fn fast_operations_pass_through() {
        let store = TimedStore::new(Arc::new(MemoryStore::new()), Duration::from_secs(5));
        assert_eq!(store.count_active_services().await.unwrap(), 0);
        assert!(store.booking_totals(None).await.unwrap().count == 0);
    }
}

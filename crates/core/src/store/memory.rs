use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::bookings::{Booking, BookingTotals, TimeWindow, User, UserCredentials};
use crate::catalog::{ContentFilter, Pagination, Service, ServiceFilter, ServiceId};
use crate::content::{ContentId, ContentItem, ContentItemDraft, ContentPatch};

use super::{ActivityStore, CatalogStore, StoreError};

/// In-process store. Each mutation runs under a single write lock, so
/// concurrent updates and deletes of one item serialize.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: BTreeMap<ContentId, ContentItem>,
    services: BTreeMap<ServiceId, Service>,
    bookings: Vec<Booking>,
    users: Vec<(User, String)>,
    last_content_id: ContentId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_service(&self, service: Service) {
        self.state
            .write()
            .await
            .services
            .insert(service.id, service);
    }

    pub async fn insert_booking(&self, booking: Booking) {
        self.state.write().await.bookings.push(booking);
    }

    pub async fn insert_user(&self, user: User, password_hash: impl Into<String>) {
        self.state
            .write()
            .await
            .users
            .push((user, password_hash.into()));
    }
}

fn paginate<T>(items: impl Iterator<Item = T>, page: Pagination) -> Vec<T> {
    items
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

fn in_window(window: Option<TimeWindow>, at: DateTime<Utc>) -> bool {
    match window {
        Some(w) => w.contains(at),
        None => true,
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_contents(
        &self,
        filter: &ContentFilter,
        page: Pagination,
    ) -> Result<Vec<ContentItem>, StoreError> {
        let state = self.state.read().await;
        let mut matching: Vec<&ContentItem> =
            state.contents.values().filter(|i| filter.matches(i)).collect();
        matching.sort_by_key(|i| i.display_key());
        Ok(paginate(matching.into_iter().cloned(), page))
    }

    async fn get_content(&self, id: ContentId) -> Result<Option<ContentItem>, StoreError> {
        Ok(self.state.read().await.contents.get(&id).cloned())
    }

    async fn insert_content(&self, draft: &ContentItemDraft) -> Result<ContentItem, StoreError> {
        let mut state = self.state.write().await;
        state.last_content_id += 1;
        let now = Utc::now();
        let item = ContentItem {
            id: state.last_content_id,
            content_type: draft.content_type,
            title_en: draft.title_en.clone(),
            title_hi: draft.title_hi.clone(),
            description_en: draft.description_en.clone(),
            description_hi: draft.description_hi.clone(),
            image_url: draft.image_url.clone(),
            price: draft.price,
            category: draft.category.clone(),
            is_active: draft.is_active,
            order: draft.order,
            created_at: now,
            updated_at: now,
        };
        state.contents.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_content(
        &self,
        id: ContentId,
        patch: &ContentPatch,
    ) -> Result<Option<ContentItem>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.contents.get_mut(&id).map(|item| {
            patch.apply_to(item, Utc::now());
            item.clone()
        }))
    }

    async fn delete_content(&self, id: ContentId) -> Result<bool, StoreError> {
        Ok(self.state.write().await.contents.remove(&id).is_some())
    }

    async fn list_services(
        &self,
        filter: &ServiceFilter,
        page: Pagination,
    ) -> Result<Vec<Service>, StoreError> {
        let state = self.state.read().await;
        let mut matching: Vec<&Service> =
            state.services.values().filter(|s| filter.matches(s)).collect();
        matching.sort_by_key(|s| (s.created_at, s.id));
        Ok(paginate(matching.into_iter().cloned(), page))
    }

    async fn get_service(&self, id: ServiceId) -> Result<Option<Service>, StoreError> {
        Ok(self.state.read().await.services.get(&id).cloned())
    }

    async fn count_active_services(&self) -> Result<u64, StoreError> {
        let state = self.state.read().await;
        Ok(state.services.values().filter(|s| s.is_active).count() as u64)
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn list_bookings(&self, page: Pagination) -> Result<Vec<Booking>, StoreError> {
        let state = self.state.read().await;
        let mut bookings: Vec<&Booking> = state.bookings.iter().collect();
        bookings.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(paginate(bookings.into_iter().cloned(), page))
    }

    async fn list_users(&self, page: Pagination) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;
        let mut users: Vec<&User> = state.users.iter().map(|(u, _)| u).collect();
        users.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(paginate(users.into_iter().cloned(), page))
    }

    async fn booking_totals(
        &self,
        window: Option<TimeWindow>,
    ) -> Result<BookingTotals, StoreError> {
        let state = self.state.read().await;
        let totals = state
            .bookings
            .iter()
            .filter(|b| in_window(window, b.created_at))
            .fold(BookingTotals::default(), |mut acc, b| {
                acc.count += 1;
                if b.status.is_revenue() {
                    acc.revenue += b.amount;
                }
                acc
            });
        Ok(totals)
    }

    async fn user_count(&self, window: Option<TimeWindow>) -> Result<u64, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|(u, _)| in_window(window, u.created_at))
            .count() as u64)
    }

    async fn find_user_credentials(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.email.eq_ignore_ascii_case(email))
            .map(|(u, hash)| UserCredentials {
                email: u.email.clone(),
                password_hash: hash.clone(),
            }))
    }
}

use std::sync::Arc;

use crate::content::{ContentItem, ContentType};
use crate::store::Store;

use super::service::{Service, ServiceCategory, ServiceId};
use super::CatalogError;

/// Limits applied to every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    /// Resolve caller-supplied values against `bounds`. The limit is clamped
    /// to `1..=max_limit`.
    pub fn bounded(limit: Option<u32>, offset: Option<u32>, bounds: PageBounds) -> Self {
        let limit = limit
            .unwrap_or(bounds.default_limit)
            .clamp(1, bounds.max_limit.max(1));
        Self {
            limit,
            offset: offset.unwrap_or(0),
        }
    }
}

/// Restrictions for a content listing. `None` means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub content_type: Option<ContentType>,
    pub category: Option<String>,
    pub active_only: bool,
}

impl ContentFilter {
    pub fn matches(&self, item: &ContentItem) -> bool {
        if self.active_only && !item.is_active {
            return false;
        }
        if let Some(t) = self.content_type {
            if item.content_type != t {
                return false;
            }
        }
        match &self.category {
            Some(c) => item.category.as_deref() == Some(c.as_str()),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub category: Option<ServiceCategory>,
    pub active_only: bool,
}

impl ServiceFilter {
    pub fn matches(&self, service: &Service) -> bool {
        if self.active_only && !service.is_active {
            return false;
        }
        match self.category {
            Some(c) => service.category == c,
            None => true,
        }
    }
}

/// Read side of the catalog, shared by the storefront and the admin list view.
#[derive(Clone)]
pub struct CatalogQueryService {
    store: Arc<dyn Store>,
    bounds: PageBounds,
}

impl CatalogQueryService {
    pub fn new(store: Arc<dyn Store>, bounds: PageBounds) -> Self {
        Self { store, bounds }
    }

    pub fn page(&self, limit: Option<u32>, offset: Option<u32>) -> Pagination {
        Pagination::bounded(limit, offset, self.bounds)
    }

    pub async fn list(
        &self,
        filter: &ContentFilter,
        page: Pagination,
    ) -> Result<Vec<ContentItem>, CatalogError> {
        Ok(self.store.list_contents(filter, page).await?)
    }

    /// Storefront listing. Inactive items are never returned.
    pub async fn list_public(
        &self,
        content_type: Option<ContentType>,
        category: Option<String>,
        page: Pagination,
    ) -> Result<Vec<ContentItem>, CatalogError> {
        let filter = ContentFilter {
            content_type,
            category,
            active_only: true,
        };
        self.list(&filter, page).await
    }

    /// Admin listing. Shows items regardless of status.
    pub async fn list_admin(
        &self,
        content_type: Option<ContentType>,
        category: Option<String>,
        page: Pagination,
    ) -> Result<Vec<ContentItem>, CatalogError> {
        let filter = ContentFilter {
            content_type,
            category,
            active_only: false,
        };
        self.list(&filter, page).await
    }

    pub async fn list_services(
        &self,
        category: Option<ServiceCategory>,
        page: Pagination,
    ) -> Result<Vec<Service>, CatalogError> {
        let filter = ServiceFilter {
            category,
            active_only: true,
        };
        Ok(self.store.list_services(&filter, page).await?)
    }

    /// A service that can currently be booked.
    pub async fn get_active_service(&self, id: ServiceId) -> Result<Service, CatalogError> {
        match self.store.get_service(id).await? {
            Some(service) if service.is_active => Ok(service),
            _ => Err(CatalogError::NotFound(id)),
        }
    }
}

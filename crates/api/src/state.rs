use std::sync::Arc;

use temple_core::auth::SessionGuard;
use temple_core::cart::{CartRegistry, CartStorage};
use temple_core::catalog::{CatalogAdminService, CatalogQueryService, PageBounds};
use temple_core::events::bus::EventBus;
use temple_core::stats::StatsAggregator;
use temple_core::store::Store;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: Arc<dyn Store>,
    query: CatalogQueryService,
    admin: CatalogAdminService,
    stats: StatsAggregator,
    guard: SessionGuard,
    carts: Arc<CartRegistry>,
    config: AppConfig,
    event_bus: EventBus,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        cart_storage: Arc<dyn CartStorage>,
        guard: SessionGuard,
        config: AppConfig,
        event_bus: EventBus,
    ) -> Self {
        let bounds = PageBounds {
            max_limit: config.max_page_limit,
            ..PageBounds::default()
        };
        Self {
            inner: Arc::new(InnerState {
                query: CatalogQueryService::new(Arc::clone(&store), bounds),
                admin: CatalogAdminService::new(Arc::clone(&store), event_bus.clone()),
                stats: StatsAggregator::new(Arc::clone(&store)),
                carts: Arc::new(CartRegistry::new(
                    cart_storage,
                    event_bus.clone(),
                    config.cart_idle_ttl,
                )),
                store,
                guard,
                config,
                event_bus,
            }),
        }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.inner.store
    }

    pub fn query(&self) -> &CatalogQueryService {
        &self.inner.query
    }

    pub fn admin(&self) -> &CatalogAdminService {
        &self.inner.admin
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.inner.stats
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.inner.guard
    }

    pub fn carts(&self) -> &Arc<CartRegistry> {
        &self.inner.carts
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }
}

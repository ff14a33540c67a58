use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Service, ServiceId};
use crate::events::bus::EventBus;
use crate::events::types::{CartEvent, TempleEvent};

use super::item::CartItem;
use super::storage::CartStorage;

/// The cart as returned to callers after each operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub total: f64,
    /// False once a storage write has failed; the cart then only lives as
    /// long as this aggregator.
    pub persisted: bool,
}

/// An add that was refused for lack of a session. Carries enough to retry
/// once the shopper has logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAdd {
    pub service_id: ServiceId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(CartState),
    AuthRequired(PendingAdd),
}

/// Which entry to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartSelector {
    /// Position in the cart.
    Index(usize),
    /// First entry referencing this service.
    Id(ServiceId),
}

impl fmt::Display for CartSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartSelector::Index(i) => write!(f, "index {i}"),
            CartSelector::Id(id) => write!(f, "service {id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error("no cart entry at {0}")]
    NoSuchEntry(CartSelector),
}

/// One shopper's cart. Operations on it are strictly sequential (`&mut self`);
/// different carts share nothing but the storage backend.
pub struct CartAggregator {
    key: String,
    items: Vec<CartItem>,
    storage: Arc<dyn CartStorage>,
    events: EventBus,
    diverged: bool,
}

impl CartAggregator {
    /// Acquire the cart stored under `key`, empty on first access.
    pub async fn load(key: String, storage: Arc<dyn CartStorage>, events: EventBus) -> Self {
        let items = match storage.load(&key).await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(cart = %key, "could not load cart, starting empty: {err}");
                Vec::new()
            }
        };
        Self {
            key,
            items,
            storage,
            events,
            diverged: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn state(&self) -> CartState {
        CartState {
            items: self.items.clone(),
            total: self.items.iter().map(|i| i.price).sum(),
            persisted: !self.diverged,
        }
    }

    /// Snapshot `candidate` and append it, unless `auth_check` fails.
    /// Never merges with an existing entry for the same service.
    pub async fn add_item(
        &mut self,
        candidate: &Service,
        auth_check: impl FnOnce() -> bool,
    ) -> AddOutcome {
        self.add_item_at(candidate, auth_check, Utc::now()).await
    }

    async fn add_item_at(
        &mut self,
        candidate: &Service,
        auth_check: impl FnOnce() -> bool,
        now: DateTime<Utc>,
    ) -> AddOutcome {
        if !auth_check() {
            return AddOutcome::AuthRequired(PendingAdd {
                service_id: candidate.id,
            });
        }
        self.items.push(CartItem::snapshot(candidate, now));
        self.flush().await;
        AddOutcome::Added(self.state())
    }

    pub async fn remove_item(&mut self, selector: CartSelector) -> Result<CartState, CartError> {
        let position = match selector {
            CartSelector::Index(i) if i < self.items.len() => Some(i),
            CartSelector::Index(_) => None,
            CartSelector::Id(id) => self.items.iter().position(|item| item.id == id),
        };
        let position = position.ok_or(CartError::NoSuchEntry(selector))?;
        self.items.remove(position);
        self.flush().await;
        Ok(self.state())
    }

    pub async fn clear(&mut self) -> CartState {
        self.items.clear();
        self.flush().await;
        self.state()
    }

    /// Write the cart back and notify observers. A failed write keeps the
    /// in-memory mutation and marks the cart as diverged.
    async fn flush(&mut self) {
        if let Err(err) = self.storage.persist(&self.key, &self.items).await {
            self.diverged = true;
            tracing::warn!(
                cart = %self.key,
                items = self.items.len(),
                "cart persistence failed, continuing with session-only cart: {err}"
            );
        }
        self.events.publish(TempleEvent::CartUpdated(CartEvent {
            cart_key: self.key.clone(),
            item_count: self.items.len(),
            persisted: !self.diverged,
            timestamp: Utc::now(),
        }));
    }
}

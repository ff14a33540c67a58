use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::events::bus::EventBus;

use super::aggregator::{CartAggregator, CartState};
use super::storage::{cart_key, CartStorage};

struct Slot {
    cart: Arc<Mutex<CartAggregator>>,
    touched: Instant,
}

/// Live carts keyed by client session.
///
/// Each cart sits behind its own lock, so requests against one session run
/// one at a time while different sessions proceed independently. A cart that
/// lost its storage stays usable here until it goes idle. Carts untouched for
/// `idle_ttl` are dropped by [`CartRegistry::evict_idle`], together with their
/// stored copy.
pub struct CartRegistry {
    storage: Arc<dyn CartStorage>,
    events: EventBus,
    idle_ttl: Duration,
    carts: Mutex<HashMap<String, Slot>>,
}

impl CartRegistry {
    pub fn new(storage: Arc<dyn CartStorage>, events: EventBus, idle_ttl: Duration) -> Self {
        Self {
            storage,
            events,
            idle_ttl,
            carts: Mutex::new(HashMap::new()),
        }
    }

    /// The cart for `session`, loaded from storage on first access.
    pub async fn open(&self, session: &str) -> Arc<Mutex<CartAggregator>> {
        let key = cart_key(session);
        if let Some(cart) = self.touch(&key).await {
            return cart;
        }

        // Loading happens outside the map lock; a racing open for the same
        // session keeps whichever cart got inserted first.
        let loaded =
            CartAggregator::load(key.clone(), Arc::clone(&self.storage), self.events.clone())
                .await;

        let mut carts = self.carts.lock().await;
        let slot = carts.entry(key).or_insert_with(|| Slot {
            cart: Arc::new(Mutex::new(loaded)),
            touched: Instant::now(),
        });
        slot.touched = Instant::now();
        Arc::clone(&slot.cart)
    }

    /// Current state of the cart for `session` without registering it.
    pub async fn peek(&self, session: &str) -> CartState {
        let key = cart_key(session);
        if let Some(cart) = self.touch(&key).await {
            let state = cart.lock().await.state();
            return state;
        }
        CartAggregator::load(key, Arc::clone(&self.storage), self.events.clone())
            .await
            .state()
    }

    async fn touch(&self, key: &str) -> Option<Arc<Mutex<CartAggregator>>> {
        let mut carts = self.carts.lock().await;
        let slot = carts.get_mut(key)?;
        slot.touched = Instant::now();
        Some(Arc::clone(&slot.cart))
    }

    /// Drop carts idle for at least `idle_ttl` and their stored copies.
    /// Carts a request is still holding are kept. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = {
            let mut carts = self.carts.lock().await;
            let keys: Vec<String> = carts
                .iter()
                .filter(|(_, slot)| {
                    now.duration_since(slot.touched) >= self.idle_ttl
                        && Arc::strong_count(&slot.cart) == 1
                })
                .map(|(key, _)| key.clone())
                .collect();
            for key in &keys {
                carts.remove(key);
            }
            keys
        };

        for key in &expired {
            if let Err(err) = self.storage.remove(key).await {
                tracing::warn!(cart = %key, "could not drop stored cart: {err}");
            }
        }
        if !expired.is_empty() {
            tracing::debug!(evicted = expired.len(), "evicted idle carts");
        }
        expired.len()
    }

    /// Sweep idle carts every `every` until the process exits.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(every).await;
                self.evict_idle().await;
            }
        })
    }

    pub async fn open_count(&self) -> usize {
        self.carts.lock().await.len()
    }
}

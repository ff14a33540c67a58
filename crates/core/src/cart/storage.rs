use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use super::item::CartItem;

/// Fixed namespace for persisted carts.
pub const CART_KEY: &str = "temple_cart";

/// Storage key for the cart of one client session.
pub fn cart_key(session: &str) -> String {
    format!("{CART_KEY}:{session}")
}

#[derive(Debug, Error)]
pub enum CartStorageError {
    #[error("cart storage unavailable: {0}")]
    Unavailable(String),

    #[error("cart storage quota exceeded: {needed} bytes, limit {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("stored cart is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Where carts live between requests. Carts are stored as the serialized
/// JSON list of their items.
#[async_trait]
pub trait CartStorage: Send + Sync {
    async fn load(&self, key: &str) -> Result<Vec<CartItem>, CartStorageError>;

    async fn persist(&self, key: &str, items: &[CartItem]) -> Result<(), CartStorageError>;

    /// Forget the cart under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), CartStorageError>;
}

/// Server-side session store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCartStorage {
    entries: RwLock<HashMap<String, String>>,
    /// Maximum serialized size of one cart, if any.
    quota: Option<usize>,
}

impl MemoryCartStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(quota),
        }
    }

    /// Raw serialized form, as written by the last successful persist.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl CartStorage for MemoryCartStorage {
    async fn load(&self, key: &str) -> Result<Vec<CartItem>, CartStorageError> {
        match self.entries.read().await.get(key) {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, key: &str, items: &[CartItem]) -> Result<(), CartStorageError> {
        let raw = serde_json::to_string(items)?;
        if let Some(limit) = self.quota {
            if raw.len() > limit {
                return Err(CartStorageError::QuotaExceeded {
                    needed: raw.len(),
                    limit,
                });
            }
        }
        self.entries.write().await.insert(key.to_string(), raw);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CartStorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

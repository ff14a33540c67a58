//! Shopper cart: an ordered, append-only list of booking intents.

pub mod aggregator;
pub mod item;
pub mod registry;
pub mod storage;

pub use aggregator::{AddOutcome, CartAggregator, CartError, CartSelector, CartState, PendingAdd};
pub use item::{CartItem, CartItemKind};
pub use registry::CartRegistry;
pub use storage::{cart_key, CartStorage, CartStorageError, MemoryCartStorage, CART_KEY};

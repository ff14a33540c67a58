use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentId;

/// Events emitted after successful catalog mutations and cart changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TempleEvent {
    ContentChanged(ContentEvent),
    CartUpdated(CartEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentAction {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEvent {
    pub content_id: ContentId,
    pub action: ContentAction,
    /// Email of the administrator who made the change.
    pub actor: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEvent {
    pub cart_key: String,
    pub item_count: usize,
    /// False when the storage write failed and the cart is session-only.
    pub persisted: bool,
    pub timestamp: DateTime<Utc>,
}

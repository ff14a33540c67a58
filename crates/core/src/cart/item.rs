use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Service, ServiceCategory, ServiceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartItemKind {
    Service,
}

/// A booking intent. Catalog fields are copied when the item is added and
/// do not follow later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Id of the referenced service; not unique within a cart.
    pub id: ServiceId,
    #[serde(rename = "type")]
    pub kind: CartItemKind,
    pub name_en: String,
    pub name_hi: Option<String>,
    pub price: f64,
    pub duration: u32,
    pub image_url: Option<String>,
    pub category: ServiceCategory,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn snapshot(service: &Service, added_at: DateTime<Utc>) -> Self {
        Self {
            id: service.id,
            kind: CartItemKind::Service,
            name_en: service.name_en.clone(),
            name_hi: service.name_hi.clone(),
            price: service.price,
            duration: service.duration,
            image_url: service.image_url.clone(),
            category: service.category,
            added_at,
        }
    }
}

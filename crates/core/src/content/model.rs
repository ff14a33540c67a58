use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a catalog content item.
pub type ContentId = i64;

/// The fixed set of content kinds. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    ServiceCard,
    DonationProject,
    ShopProduct,
    Event,
    GalleryImage,
    Announcement,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::ServiceCard,
        ContentType::DonationProject,
        ContentType::ShopProduct,
        ContentType::Event,
        ContentType::GalleryImage,
        ContentType::Announcement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::ServiceCard => "SERVICE_CARD",
            ContentType::DonationProject => "DONATION_PROJECT",
            ContentType::ShopProduct => "SHOP_PRODUCT",
            ContentType::Event => "EVENT",
            ContentType::GalleryImage => "GALLERY_IMAGE",
            ContentType::Announcement => "ANNOUNCEMENT",
        }
    }

    /// Which optional fields carry meaning for this kind.
    pub fn capabilities(&self) -> Capabilities {
        match self {
            ContentType::ServiceCard | ContentType::ShopProduct => Capabilities {
                priced: true,
                image_centric: false,
            },
            ContentType::GalleryImage => Capabilities {
                priced: false,
                image_centric: true,
            },
            ContentType::DonationProject | ContentType::Event | ContentType::Announcement => {
                Capabilities {
                    priced: false,
                    image_centric: false,
                }
            }
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown content type: {0}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownContentType(s.to_string()))
    }
}

/// Capability view of a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub priced: bool,
    pub image_centric: bool,
}

/// A published unit of catalog content.
/// Maps to the `contents` PostgreSQL table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: ContentId,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title_en: String,
    pub title_hi: Option<String>,
    pub description_en: String,
    pub description_hi: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub is_active: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Price as shown to shoppers. `None` for kinds that are not priced.
    pub fn listed_price(&self) -> Option<f64> {
        if self.content_type.capabilities().priced {
            self.price
        } else {
            None
        }
    }

    /// Display ordering: `order`, then creation time, then id.
    pub fn display_key(&self) -> (i32, DateTime<Utc>, ContentId) {
        (self.order, self.created_at, self.id)
    }
}

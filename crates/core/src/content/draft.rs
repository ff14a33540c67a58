use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::model::{ContentItem, ContentType};
use super::validate::{require_amount, require_text, FieldReader, ValidationError};

/// Input for creating a content item. Required fields are plain values,
/// optional ones are `Option`s.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItemDraft {
    pub content_type: ContentType,
    pub title_en: String,
    pub description_en: String,
    pub title_hi: Option<String>,
    pub description_hi: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub is_active: bool,
    pub order: i32,
}

impl ContentItemDraft {
    /// A visible draft at the default position.
    pub fn new(
        content_type: ContentType,
        title_en: impl Into<String>,
        description_en: impl Into<String>,
    ) -> Self {
        Self {
            content_type,
            title_en: title_en.into(),
            description_en: description_en.into(),
            title_hi: None,
            description_hi: None,
            image_url: None,
            price: None,
            category: None,
            is_active: true,
            order: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("titleEn", &self.title_en)?;
        require_text("descriptionEn", &self.description_en)?;
        if let Some(price) = self.price {
            require_amount("price", price)?;
        }
        Ok(())
    }

    /// Build a draft from a submitted form object.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        let reader = FieldReader::new(fields);

        let content_type = match fields.get("type") {
            None | Some(Value::Null) => return Err(ValidationError::Missing { field: "type" }),
            Some(Value::String(s)) => s
                .parse::<ContentType>()
                .map_err(|e| ValidationError::InvalidType { value: e.0 })?,
            Some(other) => {
                return Err(ValidationError::InvalidType {
                    value: other.to_string(),
                })
            }
        };

        let draft = Self {
            content_type,
            title_en: reader.required_text("titleEn")?,
            description_en: reader.required_text("descriptionEn")?,
            title_hi: reader.optional_text("titleHi")?.flatten(),
            description_hi: reader.optional_text("descriptionHi")?.flatten(),
            image_url: reader.optional_text("imageUrl")?.flatten(),
            price: reader.optional_amount("price")?.flatten(),
            category: reader.optional_text("category")?.flatten(),
            is_active: reader.optional_bool("isActive")?.unwrap_or(true),
            order: reader.optional_integer("order")?.unwrap_or(0),
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// A partial update. `None` leaves a field unchanged; for nullable fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentPatch {
    /// Only used to reject attempts to change the type.
    pub content_type: Option<ContentType>,
    pub title_en: Option<String>,
    pub title_hi: Option<Option<String>>,
    pub description_en: Option<String>,
    pub description_hi: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub price: Option<Option<f64>>,
    pub category: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub order: Option<i32>,
}

impl ContentPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title_en {
            require_text("titleEn", title)?;
        }
        if let Some(description) = &self.description_en {
            require_text("descriptionEn", description)?;
        }
        if let Some(Some(price)) = self.price {
            require_amount("price", price)?;
        }
        Ok(())
    }

    /// Build a patch from a submitted form object. Unknown keys and `id` are
    /// ignored; the identifier comes from the request path.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        let reader = FieldReader::new(fields);

        let content_type = match fields.get("type") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(
                s.parse::<ContentType>()
                    .map_err(|e| ValidationError::InvalidType { value: e.0 })?,
            ),
            Some(other) => {
                return Err(ValidationError::InvalidType {
                    value: other.to_string(),
                })
            }
        };

        let title_en = if reader.contains("titleEn") {
            Some(reader.required_text("titleEn")?)
        } else {
            None
        };
        let description_en = if reader.contains("descriptionEn") {
            Some(reader.required_text("descriptionEn")?)
        } else {
            None
        };

        let patch = Self {
            content_type,
            title_en,
            title_hi: reader.optional_text("titleHi")?,
            description_en,
            description_hi: reader.optional_text("descriptionHi")?,
            image_url: reader.optional_text("imageUrl")?,
            price: reader.optional_amount("price")?,
            category: reader.optional_text("category")?,
            is_active: reader.optional_bool("isActive")?,
            order: reader.optional_integer("order")?,
        };
        patch.validate()?;
        Ok(patch)
    }

    /// Apply the specified fields to `item`, leaving the rest untouched.
    pub fn apply_to(&self, item: &mut ContentItem, now: DateTime<Utc>) {
        if let Some(v) = &self.title_en {
            item.title_en = v.clone();
        }
        if let Some(v) = &self.title_hi {
            item.title_hi = v.clone();
        }
        if let Some(v) = &self.description_en {
            item.description_en = v.clone();
        }
        if let Some(v) = &self.description_hi {
            item.description_hi = v.clone();
        }
        if let Some(v) = &self.image_url {
            item.image_url = v.clone();
        }
        if let Some(v) = self.price {
            item.price = v;
        }
        if let Some(v) = &self.category {
            item.category = v.clone();
        }
        if let Some(v) = self.is_active {
            item.is_active = v;
        }
        if let Some(v) = self.order {
            item.order = v;
        }
        item.updated_at = now;
    }
}

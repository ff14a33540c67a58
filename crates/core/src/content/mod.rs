//! Catalog content items: model, typed input and validation.

pub mod draft;
pub mod model;
pub mod validate;

pub use draft::{ContentItemDraft, ContentPatch};
pub use model::{Capabilities, ContentId, ContentItem, ContentType};
pub use validate::ValidationError;

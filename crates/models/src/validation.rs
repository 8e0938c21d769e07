//! Presence checks for request bodies. Values are not type- or range-checked.

use serde_json::{Map, Value};

use crate::{business, errors::ModelError, review};

/// First field of `fields` that `content` lacks.
pub fn missing_field(content: &Map<String, Value>, fields: &[&'static str]) -> Option<&'static str> {
    fields.iter().copied().find(|f| !content.contains_key(*f))
}

/// Borrow `body` as an object holding every field in `fields`.
pub fn require_fields<'a>(body: &'a Value, fields: &[&'static str]) -> Result<&'a Map<String, Value>, ModelError> {
    let content = body.as_object().ok_or(ModelError::NotAnObject)?;
    match missing_field(content, fields) {
        Some(field) => Err(ModelError::MissingAttribute(field)),
        None => Ok(content),
    }
}

/// Business bodies need name, street_address, city, state, zip_code and owner_id.
/// `Ok` hands back the body as an object.
pub fn validate_business(body: &Value) -> Result<&Map<String, Value>, ModelError> {
    require_fields(body, &business::REQUIRED_FIELDS)
}

/// Review bodies need user_id, business_id and stars.
pub fn validate_review(body: &Value) -> Result<&Map<String, Value>, ModelError> {
    require_fields(body, &review::REQUIRED_FIELDS)
}

/// Review updates only need stars.
pub fn validate_review_update(body: &Value) -> Result<&Map<String, Value>, ModelError> {
    require_fields(body, &review::UPDATE_REQUIRED_FIELDS)
}

use serde_json::{Map, Value};

use crate::entity::{Entity, EntityKind, Key};

pub const KIND: EntityKind = EntityKind::Reviews;

pub const USER_ID: &str = "user_id";
pub const BUSINESS_ID: &str = "business_id";
pub const STARS: &str = "stars";
pub const REVIEW_TEXT: &str = "review_text";

pub const REQUIRED_FIELDS: [&str; 3] = [USER_ID, BUSINESS_ID, STARS];

/// An update only needs `stars`; user and business are fixed at creation.
pub const UPDATE_REQUIRED_FIELDS: [&str; 1] = [STARS];

pub fn key(id: i64) -> Key {
    Key::with_id(KIND, id)
}

/// Unsaved review built from a validated body; `review_text` only if supplied.
pub fn new_entity(content: &Map<String, Value>) -> Entity {
    let mut entity = Entity::new(Key::incomplete(KIND));
    entity.update_from(content, &REQUIRED_FIELDS);
    entity.update_from(content, &[REVIEW_TEXT]);
    entity
}

pub fn apply_update(entity: &mut Entity, content: &Map<String, Value>) {
    entity.update_from(content, &[STARS, REVIEW_TEXT]);
}

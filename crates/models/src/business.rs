use serde_json::{Map, Value};

use crate::entity::{Entity, EntityKind, Key};

pub const KIND: EntityKind = EntityKind::Businesses;

pub const OWNER_ID: &str = "owner_id";

/// Fields a create or update body must carry.
pub const REQUIRED_FIELDS: [&str; 6] = ["name", "street_address", "city", "state", "zip_code", OWNER_ID];

/// Fields an update replaces. `owner_id` is fixed at creation.
pub const MUTABLE_FIELDS: [&str; 5] = ["name", "street_address", "city", "state", "zip_code"];

pub fn key(id: i64) -> Key {
    Key::with_id(KIND, id)
}

/// Unsaved business built from a validated body.
pub fn new_entity(content: &Map<String, Value>) -> Entity {
    let mut entity = Entity::new(Key::incomplete(KIND));
    entity.update_from(content, &[OWNER_ID]);
    entity.update_from(content, &MUTABLE_FIELDS);
    entity
}

pub fn apply_update(entity: &mut Entity, content: &Map<String, Value>) {
    entity.update_from(content, &MUTABLE_FIELDS);
}

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named category of records in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Businesses,
    Reviews,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Businesses => "businesses",
            EntityKind::Reviews => "reviews",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a record. `id` stays `None` until the store assigns one on `put`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub kind: EntityKind,
    pub id: Option<i64>,
}

impl Key {
    /// Key without an id; the store allocates one when the entity is first saved.
    pub fn incomplete(kind: EntityKind) -> Self {
        Self { kind, id: None }
    }

    pub fn with_id(kind: EntityKind, id: i64) -> Self {
        Self { kind, id: Some(id) }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{}/{}", self.kind, id),
            None => write!(f, "{}/<unassigned>", self.kind),
        }
    }
}

/// One stored record: a key plus free-form JSON properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub key: Key,
    pub properties: Map<String, Value>,
}

impl Entity {
    pub fn new(key: Key) -> Self {
        Self { key, properties: Map::new() }
    }

    pub fn id(&self) -> Option<i64> {
        self.key.id
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.properties.get(field)
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.properties.insert(field.to_string(), value);
    }

    /// Copy `fields` from `content` into the entity, skipping absent ones.
    pub fn update_from(&mut self, content: &Map<String, Value>, fields: &[&str]) {
        for field in fields {
            if let Some(v) = content.get(*field) {
                self.set(field, v.clone());
            }
        }
    }

    /// Response representation: the properties with the key id attached as `id`.
    pub fn to_json(&self) -> Value {
        let mut out = self.properties.clone();
        if let Some(id) = self.id() {
            out.insert("id".to_string(), Value::from(id));
        }
        Value::Object(out)
    }
}

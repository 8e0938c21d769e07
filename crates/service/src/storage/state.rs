use std::collections::BTreeMap;

use models::{Entity, EntityKind, Key};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Query;

type Properties = Map<String, Value>;

/// Records of every kind plus the id counter. Ids are shared across kinds
/// and never handed out twice, even after deletes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default = "first_id")]
    next_id: i64,
    #[serde(default)]
    kinds: BTreeMap<String, BTreeMap<i64, Properties>>,
}

fn first_id() -> i64 { 1 }

impl Default for StoreState {
    fn default() -> Self {
        Self { next_id: first_id(), kinds: BTreeMap::new() }
    }
}

impl StoreState {
    pub fn get(&self, key: &Key) -> Option<Entity> {
        let id = key.id?;
        self.kinds
            .get(key.kind.as_str())
            .and_then(|records| records.get(&id))
            .map(|props| Entity { key: *key, properties: props.clone() })
    }

    pub fn put(&mut self, entity: &Entity) -> Key {
        let id = match entity.key.id {
            Some(id) => {
                self.next_id = self.next_id.max(id.saturating_add(1));
                id
            }
            None => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        };
        self.kinds
            .entry(entity.key.kind.as_str().to_string())
            .or_default()
            .insert(id, entity.properties.clone());
        Key::with_id(entity.key.kind, id)
    }

    pub fn delete(&mut self, key: &Key) -> bool {
        let Some(id) = key.id else { return false };
        self.kinds
            .get_mut(key.kind.as_str())
            .map(|records| records.remove(&id).is_some())
            .unwrap_or(false)
    }

    pub fn delete_multi(&mut self, keys: &[Key]) -> usize {
        keys.iter().filter(|k| self.delete(k)).count()
    }

    pub fn query(&self, query: &Query) -> Vec<Entity> {
        let kind: EntityKind = query.kind;
        self.kinds
            .get(kind.as_str())
            .map(|records| {
                records
                    .iter()
                    .filter(|(_, props)| query.matches(props))
                    .map(|(id, props)| Entity { key: Key::with_id(kind, *id), properties: props.clone() })
                    .collect()
            })
            .unwrap_or_default()
    }
}

//! Name-keyed lookup index kept alongside insertion order.
//!
//! Every collection in the repository is an id-keyed arena plus one of
//! these: the ordered id list drives listing, the map drives lookup.

use std::collections::HashMap;
use uuid::Uuid;

/// Case-insensitive, whitespace-insensitive key for a name
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Clone, Debug, Default)]
pub struct NameIndex {
    order: Vec<Uuid>,
    by_key: HashMap<String, Uuid>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Uuid> {
        self.by_key.get(&normalize(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_key.contains_key(&normalize(name))
    }

    /// Append `id` under `name`; returns false and leaves the index
    /// untouched if the name is taken
    pub fn insert(&mut self, name: &str, id: Uuid) -> bool {
        let key = normalize(name);
        if self.by_key.contains_key(&key) {
            return false;
        }
        self.by_key.insert(key, id);
        self.order.push(id);
        true
    }

    /// Re-key the entry for `old` under `new`, keeping its position
    ///
    /// Returns false with no change if `old` is absent or `new` belongs to
    /// a different entry.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let old_key = normalize(old);
        let new_key = normalize(new);
        let Some(&id) = self.by_key.get(&old_key) else {
            return false;
        };
        match self.by_key.get(&new_key) {
            Some(&other) if other != id => return false,
            _ => {}
        }
        self.by_key.remove(&old_key);
        self.by_key.insert(new_key, id);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<Uuid> {
        let id = self.by_key.remove(&normalize(name))?;
        self.order.retain(|existing| *existing != id);
        Some(id)
    }

    /// Ids in insertion order
    pub fn ids(&self) -> &[Uuid] {
        &self.order
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

//! In-memory keyed collection of schema texts, one triple per game type.

use dashmap::DashMap;

/// The schema texts registered for one game type, one per payload phase.
#[derive(Debug, Clone)]
pub struct GameSchemas {
    pub init: String,
    pub action: String,
    pub end: String,
}

/// Keyed collection of [`GameSchemas`] texts.
///
/// This is the broker's storage boundary: a simple get/insert/remove/find
/// surface. Mutations are routed through
/// [`JsonSchemaValidator`](crate::validation::JsonSchemaValidator) so the
/// compiled-schema cache is flushed on every change.
pub struct SchemaStore {
    entries: DashMap<String, GameSchemas>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, game_type: &str) -> Option<GameSchemas> {
        self.entries.get(game_type).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, game_type: impl Into<String>, schemas: GameSchemas) {
        self.entries.insert(game_type.into(), schemas);
    }

    /// Returns whether an entry was present.
    pub fn remove(&self, game_type: &str) -> bool {
        self.entries.remove(game_type).is_some()
    }

    pub fn contains(&self, game_type: &str) -> bool {
        self.entries.contains_key(game_type)
    }

    pub fn game_types(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

//! Compiled-schema cache and the validation entry point.

use crate::error::ServerError;
use crate::validation::{GameSchemas, SchemaError, SchemaStore};
use dashmap::DashMap;
use jsonschema::{Draft, Validator};
use parlor_protocol::GamePhase;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Game type whose schema set ships with the server, so a fresh instance
/// can host a game out of the box.
pub const EXAMPLE_GAME_TYPE: &str = "maumau";

/// Compiled draft-7 validators for one game type, one per payload phase.
pub struct CompiledSchemaSet {
    init: Validator,
    action: Validator,
    end: Validator,
}

impl CompiledSchemaSet {
    fn compile(game_type: &str, schemas: &GameSchemas) -> Result<Self, SchemaError> {
        Ok(Self {
            init: compile_one(game_type, GamePhase::Init, &schemas.init)?,
            action: compile_one(game_type, GamePhase::Action, &schemas.action)?,
            end: compile_one(game_type, GamePhase::End, &schemas.end)?,
        })
    }

    /// Validation errors for `payload` against the given phase's schema;
    /// empty means the payload conforms.
    fn validate(&self, phase: GamePhase, payload: &Value) -> Vec<String> {
        let validator = match phase {
            GamePhase::Init => &self.init,
            GamePhase::Action => &self.action,
            GamePhase::End => &self.end,
        };
        validator
            .iter_errors(payload)
            .map(|error| error.to_string())
            .collect()
    }
}

fn compile_one(game_type: &str, phase: GamePhase, text: &str) -> Result<Validator, SchemaError> {
    let schema: Value = serde_json::from_str(text).map_err(|e| SchemaError::InvalidSchema {
        game_type: game_type.to_string(),
        phase,
        message: format!("schema text is not valid JSON: {e}"),
    })?;
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(&schema)
        .map_err(|e| SchemaError::InvalidSchema {
            game_type: game_type.to_string(),
            phase,
            message: e.to_string(),
        })
}

/// Validates game payloads against their game type's schema set.
///
/// Validator sets are compiled lazily on first use and cached; any mutation
/// of the underlying store goes through [`save_schemas`] /
/// [`delete_schemas`], which flush the cache in the same call so no stale
/// compiled schema survives a change. A validation that already picked up
/// its `Arc`'d set may finish against the pre-flush schema.
///
/// [`save_schemas`]: JsonSchemaValidator::save_schemas
/// [`delete_schemas`]: JsonSchemaValidator::delete_schemas
pub struct JsonSchemaValidator {
    store: Arc<SchemaStore>,
    cache: DashMap<String, Arc<CompiledSchemaSet>>,
}

impl JsonSchemaValidator {
    pub fn new(store: Arc<SchemaStore>) -> Self {
        Self {
            store,
            cache: DashMap::new(),
        }
    }

    /// Whether a schema set is registered for the game type.
    pub fn exists(&self, game_type: &str) -> bool {
        self.store.contains(game_type)
    }

    /// Validates a payload string against the phase schema of `game_type`.
    ///
    /// Returns the (possibly empty) list of violation messages. Payload
    /// text that is not JSON at all is reported as a violation, not a
    /// fault; [`SchemaError::NotFound`] is returned only when the store has
    /// no entry for the game type.
    pub fn validate(
        &self,
        game_type: &str,
        phase: GamePhase,
        payload: &str,
    ) -> Result<Vec<String>, SchemaError> {
        let set = self.compiled_set(game_type)?;
        let payload_json: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(e) => return Ok(vec![format!("payload is not valid JSON: {e}")]),
        };
        Ok(set.validate(phase, &payload_json))
    }

    /// Returns the compiled schema set for `game_type`, compiling and caching
    /// it on first use. Errors with [`SchemaError::NotFound`] when the store
    /// has no entry for the game type.
    fn compiled_set(&self, game_type: &str) -> Result<Arc<CompiledSchemaSet>, SchemaError> {
        if let Some(set) = self.cache.get(game_type) {
            return Ok(Arc::clone(set.value()));
        }
        let schemas = self
            .store
            .get(game_type)
            .ok_or_else(|| SchemaError::NotFound {
                game_type: game_type.to_string(),
            })?;
        let set = Arc::new(CompiledSchemaSet::compile(game_type, &schemas)?);
        self.cache.insert(game_type.to_string(), Arc::clone(&set));
        Ok(set)
    }

    /// Drops every cached compiled schema set.
    pub fn flush(&self) {
        self.cache.clear();
    }

    /// Registers (or replaces) the schema set for a game type and flushes
    /// the cache. Texts that do not compile as draft-7 schemas are rejected
    /// and the store is left unchanged.
    pub fn save_schemas(
        &self,
        game_type: &str,
        init: &str,
        action: &str,
        end: &str,
    ) -> Result<(), SchemaError> {
        let schemas = GameSchemas {
            init: init.to_string(),
            action: action.to_string(),
            end: end.to_string(),
        };
        CompiledSchemaSet::compile(game_type, &schemas)?;
        self.store.insert(game_type, schemas);
        self.flush();
        Ok(())
    }

    /// Removes the schema set for a game type and flushes the cache.
    /// Returns whether an entry was present.
    pub fn delete_schemas(&self, game_type: &str) -> bool {
        let removed = self.store.remove(game_type);
        self.flush();
        removed
    }

    /// Seeds the bundled example game so a fresh server can run it.
    pub fn seed_example_schemas(&self) {
        let result = self.save_schemas(
            EXAMPLE_GAME_TYPE,
            include_str!("../../schemas/maumau.init.json"),
            include_str!("../../schemas/maumau.action.json"),
            include_str!("../../schemas/maumau.end.json"),
        );
        match result {
            Ok(()) => info!("Seeded example schema set for game type `{}`", EXAMPLE_GAME_TYPE),
            Err(e) => warn!("Failed to seed example schemas: {}", e),
        }
    }

    /// Loads every `<game_type>.{init,action,end}.json` triple found in
    /// `dir`. Incomplete triples are skipped with a warning. Returns how
    /// many game types were loaded.
    pub fn load_directory(&self, dir: &Path) -> Result<usize, ServerError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            ServerError::Internal(format!(
                "cannot read schema directory {}: {e}",
                dir.display()
            ))
        })?;

        let mut loaded = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| ServerError::Internal(format!("cannot scan schema directory: {e}")))?
                .path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(game_type) = file_name.strip_suffix(".init.json") else {
                continue;
            };

            let action_path = dir.join(format!("{game_type}.action.json"));
            let end_path = dir.join(format!("{game_type}.end.json"));
            if !action_path.exists() || !end_path.exists() {
                warn!(
                    "Skipping schema set `{}`: missing {} or {}",
                    game_type,
                    action_path.display(),
                    end_path.display()
                );
                continue;
            }

            let init = read_schema(&path)?;
            let action = read_schema(&action_path)?;
            let end = read_schema(&end_path)?;
            self.save_schemas(game_type, &init, &action, &end)?;
            info!("Loaded schema set for game type `{}`", game_type);
            loaded += 1;
        }
        Ok(loaded)
    }
}

fn read_schema(path: &Path) -> Result<String, ServerError> {
    std::fs::read_to_string(path)
        .map_err(|e| ServerError::Internal(format!("cannot read schema {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERMISSIVE: &str = r#"{ "type": "object" }"#;
    const NEEDS_WINNER: &str = r#"{
        "type": "object",
        "required": ["winner"],
        "properties": { "winner": { "type": "string" } }
    }"#;

    fn validator() -> JsonSchemaValidator {
        JsonSchemaValidator::new(Arc::new(SchemaStore::new()))
    }

    #[test]
    fn conforming_payload_yields_no_errors() {
        let validator = validator();
        validator
            .save_schemas("test", PERMISSIVE, PERMISSIVE, NEEDS_WINNER)
            .unwrap();

        let errors = validator
            .validate("test", GamePhase::End, r#"{"winner":"alice"}"#)
            .unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn violating_payload_yields_error_strings() {
        let validator = validator();
        validator
            .save_schemas("test", PERMISSIVE, PERMISSIVE, NEEDS_WINNER)
            .unwrap();

        let errors = validator.validate("test", GamePhase::End, "{}").unwrap();
        assert!(!errors.is_empty());
    }

    #[test]
    fn malformed_payload_text_is_a_violation_not_a_fault() {
        let validator = validator();
        validator
            .save_schemas("test", PERMISSIVE, PERMISSIVE, PERMISSIVE)
            .unwrap();

        let errors = validator
            .validate("test", GamePhase::Action, "{not json")
            .unwrap();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn unknown_game_type_is_not_found() {
        let validator = validator();
        let result = validator.validate("ghost", GamePhase::Action, "{}");
        assert!(matches!(
            result,
            Err(SchemaError::NotFound { game_type }) if game_type == "ghost"
        ));
    }

    #[test]
    fn schema_that_does_not_compile_is_rejected_at_save() {
        let validator = validator();
        let result = validator.save_schemas("bad", PERMISSIVE, r#"{"type": 42}"#, PERMISSIVE);
        assert!(matches!(result, Err(SchemaError::InvalidSchema { .. })));
        assert!(!validator.exists("bad"));
    }

    #[test]
    fn saving_new_schemas_invalidates_cached_validators() {
        let validator = validator();
        validator
            .save_schemas("test", PERMISSIVE, PERMISSIVE, PERMISSIVE)
            .unwrap();
        // Warm the cache with the permissive end schema.
        assert!(validator.validate("test", GamePhase::End, "{}").unwrap().is_empty());

        validator
            .save_schemas("test", PERMISSIVE, PERMISSIVE, NEEDS_WINNER)
            .unwrap();
        let errors = validator.validate("test", GamePhase::End, "{}").unwrap();
        assert!(!errors.is_empty(), "stale compiled schema used after save");
    }

    #[test]
    fn deleting_schemas_makes_game_type_unknown() {
        let validator = validator();
        validator
            .save_schemas("test", PERMISSIVE, PERMISSIVE, PERMISSIVE)
            .unwrap();
        validator.validate("test", GamePhase::Init, "{}").unwrap();

        assert!(validator.delete_schemas("test"));
        assert!(!validator.delete_schemas("test"));
        assert!(matches!(
            validator.validate("test", GamePhase::Init, "{}"),
            Err(SchemaError::NotFound { .. })
        ));
    }

    #[test]
    fn seeded_example_game_validates_actions() {
        let validator = validator();
        validator.seed_example_schemas();
        assert!(validator.exists(EXAMPLE_GAME_TYPE));

        let ok = validator
            .validate(EXAMPLE_GAME_TYPE, GamePhase::Action, r#"{"action":"DRAW"}"#)
            .unwrap();
        assert!(ok.is_empty());

        let bad = validator
            .validate(EXAMPLE_GAME_TYPE, GamePhase::End, "{}")
            .unwrap();
        assert!(!bad.is_empty());
    }

    #[test]
    fn load_directory_picks_up_complete_triples() {
        let dir = tempfile::tempdir().unwrap();
        for (suffix, text) in [
            ("init", PERMISSIVE),
            ("action", PERMISSIVE),
            ("end", NEEDS_WINNER),
        ] {
            std::fs::write(dir.path().join(format!("skat.{suffix}.json")), text).unwrap();
        }
        // An incomplete triple next to it is skipped.
        std::fs::write(dir.path().join("chess.init.json"), PERMISSIVE).unwrap();

        let validator = validator();
        let loaded = validator.load_directory(dir.path()).unwrap();
        assert_eq!(loaded, 1);
        assert!(validator.exists("skat"));
        assert!(!validator.exists("chess"));
    }
}

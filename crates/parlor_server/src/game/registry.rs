//! The canonical map from session id to live game instance.

use crate::game::GameInstance;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Owns every live [`GameInstance`], keyed by session id.
///
/// This is a plain collection with no interior locking: it lives inside the
/// [`GameService`](crate::game::GameService) mutex, which linearizes every
/// mutation against create/join/leave/reap.
#[derive(Debug, Default)]
pub struct GameRegistry {
    sessions: HashMap<String, GameInstance>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an instance. Returns false (and leaves the registry
    /// unchanged) if the session id is already taken — this is the only
    /// uniqueness check; game types may recur across sessions.
    pub fn add(&mut self, instance: GameInstance) -> bool {
        match self.sessions.entry(instance.session_id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(instance);
                true
            }
        }
    }

    pub fn remove(&mut self, session_id: &str) -> Option<GameInstance> {
        self.sessions.remove(session_id)
    }

    pub fn get(&self, session_id: &str) -> Option<&GameInstance> {
        self.sessions.get(session_id)
    }

    pub fn get_mut(&mut self, session_id: &str) -> Option<&mut GameInstance> {
        self.sessions.get_mut(session_id)
    }

    pub fn all(&self) -> impl Iterator<Item = &GameInstance> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Player;
    use crate::game::Member;

    fn instance(game_type: &str, session_id: &str) -> GameInstance {
        let player = Player::new("host", "127.0.0.1:0".parse().unwrap());
        GameInstance::new(game_type, session_id, Member::of(&player))
    }

    #[test]
    fn duplicate_session_id_is_rejected() {
        let mut registry = GameRegistry::new();
        assert!(registry.add(instance("maumau", "s1")));
        assert!(!registry.add(instance("maumau", "s1")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn same_game_type_different_sessions_coexist() {
        let mut registry = GameRegistry::new();
        assert!(registry.add(instance("maumau", "s1")));
        assert!(registry.add(instance("maumau", "s2")));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn remove_and_lookup() {
        let mut registry = GameRegistry::new();
        registry.add(instance("maumau", "s1"));
        assert!(registry.get("s1").is_some());
        assert!(registry.remove("s1").is_some());
        assert!(registry.get("s1").is_none());
        assert!(registry.remove("s1").is_none());
    }
}

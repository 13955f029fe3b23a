//! Session coordination: the create/join/leave state machine and the
//! orphaned-session reaper.

use crate::connection::{Player, PlayerId};
use crate::game::{GameInstance, GameRegistry, Member};
use parlor_protocol::{CreateGameStatus, JoinGameStatus, LeaveGameStatus};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::info;

/// Coordinator state guarded by the service's single mutex.
///
/// `associations` maps a player to the session it currently belongs to; a
/// player is a key here iff it is a member of exactly one instance in the
/// registry. Both structures are only ever touched together, under the same
/// lock, which is what keeps them consistent.
struct State {
    registry: GameRegistry,
    associations: HashMap<PlayerId, String>,
}

/// State-transition logic for game sessions.
///
/// Every player is either unassociated, hosting, or joined; leave and
/// disconnect always return it to unassociated, and a player can never be in
/// two games. All operations (including the reaper scan) serialize on one
/// coarse mutex; none of them performs I/O while holding it.
pub struct GameService {
    state: Mutex<State>,
    orphan_timeout: Duration,
}

impl GameService {
    /// Creates a coordinator that reaps instances left empty for longer
    /// than `orphan_timeout`.
    pub fn new(orphan_timeout: Duration) -> Self {
        Self {
            state: Mutex::new(State {
                registry: GameRegistry::new(),
                associations: HashMap::new(),
            }),
            orphan_timeout,
        }
    }

    // A poisoned lock only means another thread panicked mid-operation; the
    // state itself is never left half-updated (every transition completes
    // before the guard drops), so recover the guard instead of propagating.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a new session with the initiator as its first member.
    ///
    /// The associated-check, the registry insert and the association write
    /// are one atomic unit: of any number of concurrent creates with the
    /// same session id, exactly one succeeds.
    pub fn create_game(
        &self,
        game_type: &str,
        session_id: &str,
        initiator: &Player,
    ) -> CreateGameStatus {
        let mut state = self.state();
        if state.associations.contains_key(&initiator.id) {
            return CreateGameStatus::AlreadyAssociatedWithGame;
        }
        let instance = GameInstance::new(game_type, session_id, Member::of(initiator));
        if !state.registry.add(instance) {
            return CreateGameStatus::SessionIdAlreadyExists;
        }
        state.associations.insert(initiator.id, session_id.to_string());
        CreateGameStatus::Success
    }

    /// Adds the player to an existing session.
    pub fn join_game(&self, player: &Player, session_id: &str) -> JoinGameStatus {
        let mut state = self.state();
        if state.associations.contains_key(&player.id) {
            return JoinGameStatus::AlreadyAssociatedWithGame;
        }
        let Some(instance) = state.registry.get_mut(session_id) else {
            return JoinGameStatus::InvalidSessionId;
        };
        if instance.has_member_named(&player.name) {
            return JoinGameStatus::PlayerNameAlreadyTaken;
        }
        instance.add_member(Member::of(player));
        state.associations.insert(player.id, session_id.to_string());
        JoinGameStatus::Success
    }

    /// Removes the player from its current session.
    ///
    /// The instance survives even when its last member leaves; only the
    /// reaper destroys empty instances, after the orphan timeout.
    pub fn leave_game(&self, player_id: PlayerId) -> LeaveGameStatus {
        let mut state = self.state();
        let Some(session_id) = state.associations.remove(&player_id) else {
            return LeaveGameStatus::NoAssociatedGame;
        };
        if let Some(instance) = state.registry.get_mut(&session_id) {
            instance.remove_member(player_id);
        }
        LeaveGameStatus::Success
    }

    /// Removes every instance that has sat empty for longer than the orphan
    /// timeout. Returns how many were removed.
    ///
    /// Runs under the same mutex as `join_game`, so a join that clears the
    /// orphan timestamp can never interleave with the scan.
    pub fn remove_orphaned_games(&self) -> usize {
        let mut state = self.state();
        let expired: Vec<String> = state
            .registry
            .all()
            .filter(|instance| instance.is_orphaned(self.orphan_timeout))
            .map(|instance| instance.session_id.clone())
            .collect();
        for session_id in &expired {
            state.registry.remove(session_id);
            info!("Removed game with id {} because it was orphaned", session_id);
        }
        expired.len()
    }

    /// Snapshot of the instance the player currently belongs to.
    pub fn current_game(&self, player_id: PlayerId) -> Option<GameInstance> {
        let state = self.state();
        let session_id = state.associations.get(&player_id)?;
        state.registry.get(session_id).cloned()
    }

    /// Snapshot of an instance by session id.
    pub fn get_by_session_id(&self, session_id: &str) -> Option<GameInstance> {
        self.state().registry.get(session_id).cloned()
    }

    /// Current membership of a session (empty if the session is gone).
    pub fn members(&self, session_id: &str) -> Vec<Member> {
        self.state()
            .registry
            .get(session_id)
            .map(|instance| instance.members().to_vec())
            .unwrap_or_default()
    }

    /// Snapshot of every live instance.
    pub fn all(&self) -> Vec<GameInstance> {
        self.state().registry.all().cloned().collect()
    }
}

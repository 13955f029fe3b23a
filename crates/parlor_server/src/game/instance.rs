//! One active play session and its membership.

use crate::connection::{Player, PlayerId};
use std::time::{Duration, Instant};

/// A game member: the connection handle plus the name other members see.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: PlayerId,
    pub name: String,
}

impl Member {
    pub fn of(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
        }
    }
}

/// One active play session.
///
/// `session_id` is globally unique across live instances; `game_type` is
/// not — several sessions of the same game may run at once. Members are
/// referenced by id and name only: dropping an instance never touches the
/// players themselves.
#[derive(Debug, Clone)]
pub struct GameInstance {
    pub game_type: String,
    pub session_id: String,
    members: Vec<Member>,
    orphan_candidate_since: Option<Instant>,
}

impl GameInstance {
    /// Creates an instance with the initializing player as its first member.
    pub fn new(game_type: impl Into<String>, session_id: impl Into<String>, initializer: Member) -> Self {
        Self {
            game_type: game_type.into(),
            session_id: session_id.into(),
            members: vec![initializer],
            orphan_candidate_since: None,
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn has_member_named(&self, name: &str) -> bool {
        self.members.iter().any(|member| member.name == name)
    }

    /// Adds a member and clears the orphan timestamp.
    pub fn add_member(&mut self, member: Member) {
        self.members.push(member);
        self.update_orphan_status();
    }

    /// Removes a member, stamping the orphan timestamp if the instance
    /// became empty. Returns whether the member was present.
    pub fn remove_member(&mut self, id: PlayerId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member.id != id);
        self.update_orphan_status();
        self.members.len() < before
    }

    /// When the instance last became empty of members, if it still is.
    pub fn orphan_candidate_since(&self) -> Option<Instant> {
        self.orphan_candidate_since
    }

    /// Whether the instance has sat empty for longer than `timeout`.
    pub fn is_orphaned(&self, timeout: Duration) -> bool {
        self.orphan_candidate_since
            .is_some_and(|since| since.elapsed() > timeout)
    }

    // The timestamp is set once when the member list becomes empty and only
    // cleared by a member joining; repeated removals on an already-empty
    // instance must not refresh it.
    fn update_orphan_status(&mut self) {
        if self.members.is_empty() {
            if self.orphan_candidate_since.is_none() {
                self.orphan_candidate_since = Some(Instant::now());
            }
        } else {
            self.orphan_candidate_since = None;
        }
    }
}

//! Player management: id → entity resolution.

use crate::registry::SimError;
use crate::state::{EntityId, PlayerId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// System component mapping player ids to their entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerManager {
    players: FxHashMap<PlayerId, EntityId>,
}

impl PlayerManager {
    /// Resolve the entity representing a player.
    pub fn get_player_by_id(&self, id: PlayerId) -> Result<EntityId, SimError> {
        self.players
            .get(&id)
            .copied()
            .ok_or(SimError::UnknownPlayer(id))
    }

    pub(crate) fn insert(&mut self, id: PlayerId, entity: EntityId) {
        self.players.insert(id, entity);
    }

    /// Registered player ids, sorted.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<_> = self.players.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

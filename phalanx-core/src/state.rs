//! Simulation state: entities, players, templates, modifiers.

use crate::fixed::Fixed;
use crate::modifiers::{ModifiersManager, StatPath};
use crate::player::PlayerManager;
use crate::registry::SimError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque handle for an in-game object.
///
/// Prevents mixing entity handles with player ids or other numeric types.
/// Entity 0 is reserved for the system scope
/// ([`SYSTEM_ENTITY`](crate::registry::SYSTEM_ENTITY)).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EntityId(pub u32);

/// Numeric player identifier.
///
/// The original scripting layer addressed players by string id; here the
/// id is typed and parsing happens only at the CLI boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type TemplateName = String;

/// Unit identity and base statistics.
///
/// Classes feed the modifier class filters; stats hold the unmodified
/// values that [`ModifiersManager::modified_value`] resolves against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub classes: Vec<String>,
    pub stats: BTreeMap<StatPath, Fixed>,
}

/// Complete simulation state.
///
/// Cloneable and serializable; [`step_sim`](crate::step::step_sim) is the
/// only mutation path during normal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Monotonic tick counter.
    pub tick: u64,
    /// Next entity id to allocate. Entity 0 is the system scope.
    pub next_entity_id: u32,
    pub players: PlayerManager,
    pub modifiers: ModifiersManager,
    pub templates: FxHashMap<TemplateName, UnitTemplate>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            tick: 0,
            next_entity_id: 1,
            players: PlayerManager::default(),
            modifiers: ModifiersManager::default(),
            templates: FxHashMap::default(),
        }
    }
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh entity handle.
    pub fn alloc_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Register a player, allocating its entity.
    pub fn add_player(&mut self, id: PlayerId) -> EntityId {
        let entity = self.alloc_entity();
        self.players.insert(id, entity);
        tracing::debug!(player = %id, ?entity, "added player");
        entity
    }

    /// Resolve a stat for a unit of `template` owned by `entity`,
    /// with all applicable modifiers folded in.
    pub fn stat_value(
        &self,
        entity: EntityId,
        template: &str,
        path: &StatPath,
    ) -> Result<Fixed, SimError> {
        let tmpl = self
            .templates
            .get(template)
            .ok_or_else(|| SimError::UnknownTemplate(template.to_string()))?;
        let base = tmpl
            .stats
            .get(path)
            .copied()
            .ok_or_else(|| SimError::UnknownStat {
                template: template.to_string(),
                path: path.clone(),
            })?;
        Ok(self
            .modifiers
            .modified_value(entity, path, base, &tmpl.classes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{paths, ClassFilter, ModifierSpec};

    #[test]
    fn test_entity_allocation_skips_system_entity() {
        let mut state = SimState::new();
        assert_eq!(state.alloc_entity(), EntityId(1));
        assert_eq!(state.alloc_entity(), EntityId(2));
    }

    #[test]
    fn test_add_player_allocates_entity() {
        let mut state = SimState::new();
        let ent = state.add_player(PlayerId(1));
        assert_eq!(state.players.get_player_by_id(PlayerId(1)).unwrap(), ent);
    }

    #[test]
    fn test_stat_value_resolves_through_modifiers() {
        let mut state = SimState::new();
        let ent = state.add_player(PlayerId(1));
        state.templates.insert(
            "cavalry_javelineer".to_string(),
            UnitTemplate {
                classes: vec!["Cavalry".into(), "Ranged".into()],
                stats: [(
                    StatPath::from(paths::RANGED_PIERCE_DAMAGE),
                    Fixed::from_int(16),
                )]
                .into_iter()
                .collect(),
            },
        );

        let path = StatPath::from(paths::RANGED_PIERCE_DAMAGE);
        assert_eq!(
            state.stat_value(ent, "cavalry_javelineer", &path).unwrap(),
            Fixed::from_int(16)
        );

        state.modifiers.add_modifiers(
            "cheat/superfast",
            ModifierSpec::multiply(path.clone(), ClassFilter::single("Cavalry"), 1.5),
            ent,
        );
        assert_eq!(
            state.stat_value(ent, "cavalry_javelineer", &path).unwrap(),
            Fixed::from_int(24)
        );
    }

    #[test]
    fn test_stat_value_unknown_template_and_stat() {
        let state = SimState::new();
        let path = StatPath::from(paths::RANGED_PIERCE_DAMAGE);
        assert!(matches!(
            state.stat_value(EntityId(1), "nope", &path),
            Err(SimError::UnknownTemplate(_))
        ));
    }
}

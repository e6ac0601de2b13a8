//! Cheat definitions.
//!
//! Each cheat is a typed configuration: the parameters the scripting
//! layer used to splice in by string substitution are ordinary struct
//! fields here. Applying a cheat performs the same fixed sequence the
//! original scripts did: resolve the player manager, resolve the player
//! entity, resolve the modifiers manager, register one named modifier
//! set.

use crate::modifiers::{paths, ClassFilter, ModifierName, ModifierSpec, StatPath};
use crate::registry::{InterfaceId, SimError, SYSTEM_ENTITY};
use crate::state::{PlayerId, SimState};
use serde::{Deserialize, Serialize};

/// Unit class the built-in cheat set targets.
const CAVALRY: &str = "Cavalry";

/// A cheat a player can activate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheatSpec {
    /// Multiply one stat for the player's cavalry.
    ///
    /// Registers under `"cheat/<stat>"`, so each stat path gets its own
    /// removable modifier set.
    StatMultiplier { stat: StatPath, multiplier: f32 },

    /// The `superfast` cheat: scale cavalry ranged pierce damage.
    ///
    /// A fixed stat path under the fixed name `"cheat/superfast"`. Kept
    /// as its own definition rather than a `StatMultiplier` alias; the
    /// two are independent cheats that happen to overlap today.
    Superfast { speed_multiplier: f32 },

    /// Scale cavalry ranged attack speed.
    ///
    /// Registers the generic multiplier once for repeat time and once
    /// for prepare time, the pairing the balance-sweep tooling applies.
    CavalryAttackSpeed { scale: f32 },
}

impl CheatSpec {
    /// Apply this cheat on behalf of `player`.
    pub fn apply(&self, sim: &mut SimState, player: PlayerId) -> Result<(), SimError> {
        tracing::info!(%player, cheat = ?self, "applying cheat");
        match self {
            CheatSpec::StatMultiplier { stat, multiplier } => {
                apply_stat_multiplier(sim, player, stat, *multiplier)
            }
            CheatSpec::Superfast { speed_multiplier } => {
                apply_superfast(sim, player, *speed_multiplier)
            }
            CheatSpec::CavalryAttackSpeed { scale } => {
                apply_stat_multiplier(sim, player, &StatPath::from(paths::RANGED_REPEAT_TIME), *scale)?;
                apply_stat_multiplier(sim, player, &StatPath::from(paths::RANGED_PREPARE_TIME), *scale)
            }
        }
    }
}

/// The generic templated cheat: `"cheat/<stat>"`, cavalry-only multiply.
fn apply_stat_multiplier(
    sim: &mut SimState,
    player: PlayerId,
    stat: &StatPath,
    multiplier: f32,
) -> Result<(), SimError> {
    let player_ent = sim
        .query_interface(SYSTEM_ENTITY, InterfaceId::PlayerManager)?
        .into_player_manager()
        .ok_or(SimError::missing(SYSTEM_ENTITY, InterfaceId::PlayerManager))?
        .get_player_by_id(player)?;

    let modifiers = sim
        .query_interface_mut(SYSTEM_ENTITY, InterfaceId::ModifiersManager)?
        .into_modifiers_manager()
        .ok_or(SimError::missing(
            SYSTEM_ENTITY,
            InterfaceId::ModifiersManager,
        ))?;

    let name: ModifierName = format!("cheat/{stat}");
    modifiers.add_modifiers(
        name,
        ModifierSpec::multiply(stat.clone(), ClassFilter::single(CAVALRY), multiplier),
        player_ent,
    );
    Ok(())
}

/// The specialized cheat: fixed name, fixed pierce-damage path.
fn apply_superfast(
    sim: &mut SimState,
    player: PlayerId,
    speed_multiplier: f32,
) -> Result<(), SimError> {
    let player_ent = sim
        .query_interface(SYSTEM_ENTITY, InterfaceId::PlayerManager)?
        .into_player_manager()
        .ok_or(SimError::missing(SYSTEM_ENTITY, InterfaceId::PlayerManager))?
        .get_player_by_id(player)?;

    let modifiers = sim
        .query_interface_mut(SYSTEM_ENTITY, InterfaceId::ModifiersManager)?
        .into_modifiers_manager()
        .ok_or(SimError::missing(
            SYSTEM_ENTITY,
            InterfaceId::ModifiersManager,
        ))?;

    modifiers.add_modifiers(
        "cheat/superfast",
        ModifierSpec::multiply(
            StatPath::from(paths::RANGED_PIERCE_DAMAGE),
            ClassFilter::single(CAVALRY),
            speed_multiplier,
        ),
        player_ent,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SimStateBuilder;

    fn pierce() -> StatPath {
        StatPath::from(paths::RANGED_PIERCE_DAMAGE)
    }

    #[test]
    fn test_stat_multiplier_call_contract() {
        let mut sim = SimStateBuilder::new().with_player(1).build();

        CheatSpec::StatMultiplier {
            stat: pierce(),
            multiplier: 2.0,
        }
        .apply(&mut sim, PlayerId(1))
        .unwrap();

        let player_ent = sim.players.get_player_by_id(PlayerId(1)).unwrap();
        let entries = sim.modifiers.entries(player_ent);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "cheat/Attack/Ranged/Damage/Pierce");
        assert_eq!(
            entries[0].spec,
            ModifierSpec::multiply(pierce(), ClassFilter::single("Cavalry"), 2.0)
        );
        // Registered against the player's entity and nothing else
        assert!(sim.modifiers.entries(SYSTEM_ENTITY).is_empty());
    }

    #[test]
    fn test_superfast_call_contract() {
        let mut sim = SimStateBuilder::new().with_player(1).build();

        CheatSpec::Superfast {
            speed_multiplier: 1.5,
        }
        .apply(&mut sim, PlayerId(1))
        .unwrap();

        let player_ent = sim.players.get_player_by_id(PlayerId(1)).unwrap();
        let entries = sim.modifiers.entries(player_ent);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "cheat/superfast");
        assert_eq!(
            entries[0].spec,
            ModifierSpec::multiply(pierce(), ClassFilter::single("Cavalry"), 1.5)
        );
    }

    #[test]
    fn test_double_activation_registers_two_entries() {
        let mut sim = SimStateBuilder::new().with_player(1).build();
        let cheat = CheatSpec::Superfast {
            speed_multiplier: 1.5,
        };

        cheat.apply(&mut sim, PlayerId(1)).unwrap();
        cheat.apply(&mut sim, PlayerId(1)).unwrap();

        let player_ent = sim.players.get_player_by_id(PlayerId(1)).unwrap();
        assert_eq!(sim.modifiers.entries(player_ent).len(), 2);
    }

    #[test]
    fn test_attack_speed_registers_both_paths() {
        let mut sim = SimStateBuilder::new().with_player(1).build();

        CheatSpec::CavalryAttackSpeed { scale: 0.5 }
            .apply(&mut sim, PlayerId(1))
            .unwrap();

        let player_ent = sim.players.get_player_by_id(PlayerId(1)).unwrap();
        let names: Vec<_> = sim
            .modifiers
            .entries(player_ent)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "cheat/Attack/Ranged/RepeatTime",
                "cheat/Attack/Ranged/PrepareTime"
            ]
        );
    }

    #[test]
    fn test_unknown_player_is_an_error() {
        let mut sim = SimStateBuilder::new().with_player(1).build();
        let err = CheatSpec::Superfast {
            speed_multiplier: 1.5,
        }
        .apply(&mut sim, PlayerId(9))
        .unwrap_err();
        assert_eq!(err, SimError::UnknownPlayer(PlayerId(9)));
        // Nothing was registered
        let player_ent = sim.players.get_player_by_id(PlayerId(1)).unwrap();
        assert!(sim.modifiers.entries(player_ent).is_empty());
    }

    #[test]
    fn test_no_multiplier_validation() {
        // A nonsense factor registers unchanged; validation is the
        // host's business, not the cheat layer's.
        let mut sim = SimStateBuilder::new().with_player(1).build();
        CheatSpec::Superfast {
            speed_multiplier: -3.0,
        }
        .apply(&mut sim, PlayerId(1))
        .unwrap();
        let player_ent = sim.players.get_player_by_id(PlayerId(1)).unwrap();
        assert_eq!(sim.modifiers.entries(player_ent).len(), 1);
    }

    #[test]
    fn test_cheat_spec_serde_tagging() {
        let cheat = CheatSpec::Superfast {
            speed_multiplier: 1.5,
        };
        let json = serde_json::to_value(&cheat).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "superfast", "speed_multiplier": 1.5 })
        );
        let back: CheatSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, cheat);
    }
}

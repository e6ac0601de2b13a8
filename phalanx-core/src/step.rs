use crate::config::SimConfig;
use crate::input::{Command, PlayerInputs};
use crate::registry::{InterfaceId, SimError, SYSTEM_ENTITY};
use crate::state::{PlayerId, SimState};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("cheats are disabled in this simulation")]
    CheatsDisabled,
    #[error(transparent)]
    Sim(#[from] SimError),
}

/// Advance the simulation by one tick.
///
/// Pure transition: clones the state, bumps the tick, executes commands.
/// A failing command is logged and skipped; it never aborts the tick.
pub fn step_sim(state: &SimState, inputs: &[PlayerInputs], config: &SimConfig) -> SimState {
    let mut new_state = state.clone();
    new_state.tick = state.tick + 1;

    for player_input in inputs {
        for cmd in &player_input.commands {
            if let Err(e) = execute_command(&mut new_state, player_input.player, cmd, config) {
                log::warn!(
                    "Failed to execute command for player {}: {}",
                    player_input.player,
                    e
                );
            }
        }
    }

    new_state
}

fn execute_command(
    state: &mut SimState,
    player: PlayerId,
    cmd: &Command,
    config: &SimConfig,
) -> Result<(), ActionError> {
    match cmd {
        Command::Cheat(spec) => {
            if !config.cheats_enabled {
                return Err(ActionError::CheatsDisabled);
            }
            spec.apply(state, player)?;
            Ok(())
        }
        Command::RemoveCheat { name } => {
            let player_ent = state
                .query_interface(SYSTEM_ENTITY, InterfaceId::PlayerManager)?
                .into_player_manager()
                .ok_or(SimError::missing(SYSTEM_ENTITY, InterfaceId::PlayerManager))?
                .get_player_by_id(player)?;
            let modifiers = state
                .query_interface_mut(SYSTEM_ENTITY, InterfaceId::ModifiersManager)?
                .into_modifiers_manager()
                .ok_or(SimError::missing(
                    SYSTEM_ENTITY,
                    InterfaceId::ModifiersManager,
                ))?;
            modifiers.remove_all_modifiers(name, player_ent);
            Ok(())
        }
        Command::Quit => Ok(()), // Handled by the outer loop; harmless here
    }
}

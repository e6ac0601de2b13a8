use crate::cheats::CheatSpec;
use crate::modifiers::ModifierName;
use crate::state::PlayerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInputs {
    pub player: PlayerId,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Command {
    /// Activate a cheat for the issuing player.
    Cheat(CheatSpec),

    /// Remove every modifier set the issuing player registered under `name`.
    RemoveCheat { name: ModifierName },

    // Meta
    Quit,
}

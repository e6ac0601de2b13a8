use crate::fixed::Fixed;
use crate::modifiers::{paths, StatPath};
use crate::state::{PlayerId, SimState, UnitTemplate};

pub struct SimStateBuilder {
    state: SimState,
}

impl SimStateBuilder {
    pub fn new() -> Self {
        Self {
            state: SimState::new(),
        }
    }

    pub fn with_player(mut self, id: u32) -> Self {
        self.state.add_player(PlayerId(id));
        self
    }

    pub fn with_template(mut self, name: &str, classes: &[&str], stats: &[(&str, f32)]) -> Self {
        self.state.templates.insert(
            name.to_string(),
            UnitTemplate {
                classes: classes.iter().map(|c| c.to_string()).collect(),
                stats: stats
                    .iter()
                    .map(|(path, value)| (StatPath::from(*path), Fixed::from_f32(*value)))
                    .collect(),
            },
        );
        self
    }

    pub fn build(self) -> SimState {
        self.state
    }
}

impl Default for SimStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-player skirmish with the matchup templates the balance tooling
/// runs: cavalry javelineers against spearmen and slingers.
pub fn skirmish_state() -> SimState {
    SimStateBuilder::new()
        .with_player(1)
        .with_player(2)
        .with_template(
            "cavalry_javelineer",
            &["Cavalry", "Ranged", "Citizen"],
            &[
                (paths::RANGED_PIERCE_DAMAGE, 16.0),
                (paths::RANGED_REPEAT_TIME, 1250.0),
                (paths::RANGED_PREPARE_TIME, 500.0),
            ],
        )
        .with_template(
            "spearman",
            &["Infantry", "Melee", "Citizen"],
            &[(paths::RANGED_PIERCE_DAMAGE, 0.0)],
        )
        .with_template(
            "slinger",
            &["Infantry", "Ranged", "Citizen"],
            &[
                (paths::RANGED_PIERCE_DAMAGE, 11.0),
                (paths::RANGED_REPEAT_TIME, 1000.0),
            ],
        )
        .build()
}

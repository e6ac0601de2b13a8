//! # Phalanx Simulation Core
//!
//! Deterministic skirmish-simulation state with a cheat/modifier layer.
//!
//! Cheats are typed configurations that resolve engine components and
//! register class-filtered stat modifiers against a player entity. The
//! crate implements the core loop: state → commands → state transitions.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  CheatSpec   │────▶│ PlayerInputs │────▶│  step_sim   │
//! │ (typed cfg)  │     │ (commands)   │     │ (pure fn)   │
//! └──────────────┘     └──────────────┘     └──────┬──────┘
//!                                                  │
//!                      ┌──────────────┐     ┌──────▼──────┐
//!                      │  Observers   │◀────│  SimState   │
//!                      │  (side fx)   │     │ (new state) │
//!                      └──────────────┘     └─────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SimState`] | Complete simulation state (players, templates, modifiers) |
//! | [`CheatSpec`] | Typed cheat definitions (stat multiplier, superfast, attack speed) |
//! | [`ModifiersManager`] | Named, class-filtered stat modifier sets per entity |
//! | [`Command`] / [`step_sim`] | Pure transition: `(state, inputs) -> state` |
//! | [`SimObserver`] | Trait for observing state changes (event log, metrics) |
//!
//! ## Component lookup
//!
//! System-wide services are resolved the way the original scripting host
//! exposed them: a capability lookup by [`InterfaceId`] against the
//! reserved [`SYSTEM_ENTITY`] scope. See [`SimState::query_interface`].

pub mod cheats;
pub mod config;
pub mod fixed;
pub mod input;
pub mod modifiers;
pub mod observer;
pub mod player;
pub mod registry;
pub mod state;
pub mod step;
pub mod testing;

pub use cheats::CheatSpec;
pub use config::SimConfig;
pub use fixed::Fixed;
pub use input::{Command, PlayerInputs};
pub use modifiers::{
    ClassFilter, ModifierEffect, ModifierName, ModifierRule, ModifierSpec, ModifiersManager,
    StatPath,
};
pub use observer::event_log::{EventLogObserver, SimEvent};
pub use observer::{ObserverConfig, ObserverError, ObserverRegistry, SimObserver, Snapshot};
pub use player::PlayerManager;
pub use registry::{Interface, InterfaceId, InterfaceMut, SimError, SYSTEM_ENTITY};
pub use state::{EntityId, PlayerId, SimState, UnitTemplate};
pub use step::{step_sim, ActionError};

//! Component-interface lookup.
//!
//! System-wide services hang off the reserved [`SYSTEM_ENTITY`] scope and
//! are resolved by well-known interface id, the same capability-lookup
//! contract the scripting layer of the original host exposed. Lookups on
//! entities that do not carry the component fail with a structured error.

use crate::modifiers::{ModifiersManager, StatPath};
use crate::player::PlayerManager;
use crate::state::{EntityId, PlayerId, SimState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known scope carrying the system-wide components.
pub const SYSTEM_ENTITY: EntityId = EntityId(0);

/// Well-known interface identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceId {
    PlayerManager,
    ModifiersManager,
}

impl std::fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterfaceId::PlayerManager => f.write_str("PlayerManager"),
            InterfaceId::ModifiersManager => f.write_str("ModifiersManager"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("unknown player id {0}")]
    UnknownPlayer(PlayerId),
    #[error("entity {entity:?} exposes no {iid} interface")]
    MissingInterface { entity: EntityId, iid: InterfaceId },
    #[error("unknown unit template `{0}`")]
    UnknownTemplate(String),
    #[error("template `{template}` has no `{path}` stat")]
    UnknownStat { template: String, path: StatPath },
}

impl SimError {
    pub(crate) fn missing(entity: EntityId, iid: InterfaceId) -> Self {
        Self::MissingInterface { entity, iid }
    }
}

/// Shared interface handle resolved by [`SimState::query_interface`].
#[derive(Debug)]
pub enum Interface<'a> {
    PlayerManager(&'a PlayerManager),
    ModifiersManager(&'a ModifiersManager),
}

impl<'a> Interface<'a> {
    pub fn into_player_manager(self) -> Option<&'a PlayerManager> {
        match self {
            Interface::PlayerManager(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_modifiers_manager(self) -> Option<&'a ModifiersManager> {
        match self {
            Interface::ModifiersManager(c) => Some(c),
            _ => None,
        }
    }
}

/// Exclusive interface handle resolved by [`SimState::query_interface_mut`].
pub enum InterfaceMut<'a> {
    PlayerManager(&'a mut PlayerManager),
    ModifiersManager(&'a mut ModifiersManager),
}

impl<'a> InterfaceMut<'a> {
    pub fn into_player_manager(self) -> Option<&'a mut PlayerManager> {
        match self {
            InterfaceMut::PlayerManager(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_modifiers_manager(self) -> Option<&'a mut ModifiersManager> {
        match self {
            InterfaceMut::ModifiersManager(c) => Some(c),
            _ => None,
        }
    }
}

impl SimState {
    /// Capability lookup: resolve `iid` on `entity`.
    ///
    /// Only [`SYSTEM_ENTITY`] carries the two system components; any
    /// other scope yields [`SimError::MissingInterface`].
    pub fn query_interface(
        &self,
        entity: EntityId,
        iid: InterfaceId,
    ) -> Result<Interface<'_>, SimError> {
        if entity != SYSTEM_ENTITY {
            return Err(SimError::missing(entity, iid));
        }
        Ok(match iid {
            InterfaceId::PlayerManager => Interface::PlayerManager(&self.players),
            InterfaceId::ModifiersManager => Interface::ModifiersManager(&self.modifiers),
        })
    }

    /// Exclusive variant of [`query_interface`](Self::query_interface).
    pub fn query_interface_mut(
        &mut self,
        entity: EntityId,
        iid: InterfaceId,
    ) -> Result<InterfaceMut<'_>, SimError> {
        if entity != SYSTEM_ENTITY {
            return Err(SimError::missing(entity, iid));
        }
        Ok(match iid {
            InterfaceId::PlayerManager => InterfaceMut::PlayerManager(&mut self.players),
            InterfaceId::ModifiersManager => InterfaceMut::ModifiersManager(&mut self.modifiers),
        })
    }
}

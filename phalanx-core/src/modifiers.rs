//! Modifier system for dynamic stat mutations.
//!
//! Cheats (and any future game mechanic) mutate unit statistics by
//! registering *named modifier sets* against an entity. A set maps stat
//! paths to rules; each rule carries a class filter and an additive or
//! multiplicative effect. Resolution is read-only: base values stay in
//! the unit templates and [`ModifiersManager::modified_value`] folds the
//! applicable rules over them in [`Fixed`] arithmetic.
//!
//! The JSON shape of [`ModifierSpec`] is normative:
//!
//! ```json
//! { "Attack/Ranged/Damage/Pierce": [ { "affects": [["Cavalry"]], "multiply": 2.0 } ] }
//! ```

use crate::fixed::Fixed;
use crate::state::EntityId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known stat paths addressed by the built-in cheats.
pub mod paths {
    pub const RANGED_PIERCE_DAMAGE: &str = "Attack/Ranged/Damage/Pierce";
    pub const RANGED_REPEAT_TIME: &str = "Attack/Ranged/RepeatTime";
    pub const RANGED_PREPARE_TIME: &str = "Attack/Ranged/PrepareTime";
}

/// Slash-separated path identifying which stat a rule modifies.
///
/// Paths are opaque to the modifier store; they only have to match the
/// keys used in unit templates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatPath(String);

impl StatPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl std::fmt::Display for StatPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Namespaced identifier for a registered modifier set (e.g. `"cheat/superfast"`).
///
/// Names exist for bookkeeping: removal drops every set with a matching name.
pub type ModifierName = String;

/// Target-class filter: outer list is OR, inner list is AND.
///
/// `[["Cavalry"]]` matches any unit carrying the `Cavalry` class;
/// `[["Cavalry", "Ranged"], ["Siege"]]` matches ranged cavalry or any
/// siege unit. An empty outer list matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassFilter(pub Vec<Vec<String>>);

impl ClassFilter {
    /// Filter matching units that carry a single class.
    pub fn single(class: &str) -> Self {
        Self(vec![vec![class.to_string()]])
    }

    /// True when any OR branch has all of its classes present.
    pub fn matches(&self, classes: &[String]) -> bool {
        self.0
            .iter()
            .any(|all_of| all_of.iter().all(|c| classes.iter().any(|u| u == c)))
    }
}

/// Effect a rule applies to the stat value.
///
/// Factors are `f32` on the wire; registration converts them to [`Fixed`]
/// once, so resolution never touches float math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierEffect {
    /// Multiplicative factor: stacks as a product.
    Multiply(f32),
    /// Additive bonus: stacks as a sum, applied before multipliers.
    Add(f32),
}

/// One modifier rule: a class filter plus an effect.
///
/// The effect enum is flattened so the wire form reads
/// `{ "affects": [["Cavalry"]], "multiply": 2.0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierRule {
    pub affects: ClassFilter,
    #[serde(flatten)]
    pub effect: ModifierEffect,
}

/// Mapping from stat path to an ordered sequence of rules.
///
/// Constructed fresh per registration and handed to the manager; callers
/// never read modifier state back through it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierSpec(pub BTreeMap<StatPath, Vec<ModifierRule>>);

impl ModifierSpec {
    /// Single-path, single-rule multiplicative spec.
    pub fn multiply(path: StatPath, affects: ClassFilter, factor: f32) -> Self {
        let mut map = BTreeMap::new();
        map.insert(
            path,
            vec![ModifierRule {
                affects,
                effect: ModifierEffect::Multiply(factor),
            }],
        );
        Self(map)
    }

    /// Append a rule for a path, creating the path entry if needed.
    pub fn push_rule(&mut self, path: StatPath, rule: ModifierRule) {
        self.0.entry(path).or_default().push(rule);
    }

    /// Stat paths this spec touches, in path order.
    pub fn stat_paths(&self) -> Vec<StatPath> {
        self.0.keys().cloned().collect()
    }
}

/// Rule with its factor pre-converted to fixed-point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CompiledRule {
    affects: ClassFilter,
    effect: CompiledEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum CompiledEffect {
    Multiply(Fixed),
    Add(Fixed),
}

impl From<&ModifierRule> for CompiledRule {
    fn from(rule: &ModifierRule) -> Self {
        Self {
            affects: rule.affects.clone(),
            effect: match rule.effect {
                ModifierEffect::Multiply(f) => CompiledEffect::Multiply(Fixed::from_f32(f)),
                ModifierEffect::Add(f) => CompiledEffect::Add(Fixed::from_f32(f)),
            },
        }
    }
}

/// A named modifier set registered against an entity.
///
/// Keeps the wire spec for bookkeeping alongside the compiled rules used
/// during resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierEntry {
    pub name: ModifierName,
    pub spec: ModifierSpec,
    compiled: BTreeMap<StatPath, Vec<CompiledRule>>,
}

impl ModifierEntry {
    fn new(name: ModifierName, spec: ModifierSpec) -> Self {
        let compiled = spec
            .0
            .iter()
            .map(|(path, rules)| (path.clone(), rules.iter().map(CompiledRule::from).collect()))
            .collect();
        Self {
            name,
            spec,
            compiled,
        }
    }
}

/// Store of named modifier sets, keyed by target entity.
///
/// Registration order is preserved per entity. Duplicate names stack:
/// re-registering a name appends a separate entry, and removal by name
/// drops every entry carrying it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifiersManager {
    entries: FxHashMap<EntityId, Vec<ModifierEntry>>,
}

impl ModifiersManager {
    /// Register a named modifier set against `entity`.
    ///
    /// Fire-and-forget from the caller's view; the spec is converted to
    /// fixed-point once and kept until removed by name.
    pub fn add_modifiers(
        &mut self,
        name: impl Into<ModifierName>,
        spec: ModifierSpec,
        entity: EntityId,
    ) {
        let name = name.into();
        tracing::debug!(?entity, %name, paths = ?spec.stat_paths(), "registering modifier set");
        self.entries
            .entry(entity)
            .or_default()
            .push(ModifierEntry::new(name, spec));
    }

    /// Drop every set named `name` on `entity`. Returns how many were removed.
    pub fn remove_all_modifiers(&mut self, name: &str, entity: EntityId) -> usize {
        let Some(sets) = self.entries.get_mut(&entity) else {
            return 0;
        };
        let before = sets.len();
        sets.retain(|entry| entry.name != name);
        let removed = before - sets.len();
        if removed > 0 {
            tracing::debug!(?entity, name, removed, "removed modifier sets");
        }
        removed
    }

    /// True when `entity` has at least one set named `name`.
    pub fn has_modifier(&self, name: &str, entity: EntityId) -> bool {
        self.entries
            .get(&entity)
            .is_some_and(|sets| sets.iter().any(|entry| entry.name == name))
    }

    /// Registered sets for `entity`, in registration order.
    pub fn entries(&self, entity: EntityId) -> &[ModifierEntry] {
        self.entries.get(&entity).map_or(&[], Vec::as_slice)
    }

    /// Entities carrying at least one registered set, sorted.
    pub fn modified_entities(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, sets)| !sets.is_empty())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// Resolve `path` for a unit with `classes`, owned by `entity`.
    ///
    /// Applicable rules fold as `(base + Σ add) × Π multiply`, walking
    /// sets in registration order. A rule applies when its class filter
    /// matches; with no applicable rules the base value passes through.
    pub fn modified_value(
        &self,
        entity: EntityId,
        path: &StatPath,
        base: Fixed,
        classes: &[String],
    ) -> Fixed {
        let mut additive = Fixed::ZERO;
        let mut factor = Fixed::ONE;

        for entry in self.entries(entity) {
            let Some(rules) = entry.compiled.get(path) else {
                continue;
            };
            for rule in rules {
                if !rule.affects.matches(classes) {
                    continue;
                }
                match rule.effect {
                    CompiledEffect::Add(a) => additive += a,
                    CompiledEffect::Multiply(m) => factor *= m,
                }
            }
        }

        (base + additive) * factor
    }
}

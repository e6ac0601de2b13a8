//! Event log observer recording modifier activity as JSONL.
//!
//! Detects changes by comparing the modifier store between ticks and
//! writes structured JSON lines to any `Write` destination (stdout,
//! file, pipe):
//!
//! ```json
//! {"type":"modifiers_applied","tick":1,"entity":1,"name":"cheat/superfast","paths":["Attack/Ranged/Damage/Pierce"]}
//! ```

use super::{ObserverConfig, ObserverError, SimObserver, Snapshot};
use crate::modifiers::{ModifierName, StatPath};
use crate::state::{EntityId, SimState};
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Events detected by comparing modifier state between ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    /// A named modifier set was registered against an entity.
    ModifiersApplied {
        tick: u64,
        entity: EntityId,
        name: ModifierName,
        paths: Vec<StatPath>,
    },

    /// Every set with this name was removed from an entity.
    ModifiersRemoved {
        tick: u64,
        entity: EntityId,
        name: ModifierName,
        /// How many stacked sets the removal dropped.
        count: usize,
    },
}

/// Observer writing one JSON line per detected event.
pub struct EventLogObserver {
    inner: Mutex<EventLogState>,
    config: ObserverConfig,
}

struct EventLogState {
    writer: BufWriter<Box<dyn Write + Send>>,
    prev: Option<Arc<SimState>>,
}

impl EventLogObserver {
    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Mutex::new(EventLogState {
                writer: BufWriter::new(Box::new(writer)),
                prev: None,
            }),
            config: ObserverConfig { frequency: 1 },
        }
    }

    pub fn to_file(path: impl AsRef<Path>) -> Result<Self, ObserverError> {
        let file = std::fs::File::create(path)?;
        Ok(Self::to_writer(file))
    }
}

impl SimObserver for EventLogObserver {
    fn on_tick(&self, snapshot: &Snapshot) -> Result<(), ObserverError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ObserverError::Render("Lock poisoned".to_string()))?;

        let events = match &inner.prev {
            Some(prev) => detect_events(prev, &snapshot.state, snapshot.tick),
            None => Vec::new(),
        };

        for event in &events {
            serde_json::to_writer(&mut inner.writer, event)?;
            inner.writer.write_all(b"\n")?;
        }
        if !events.is_empty() {
            inner.writer.flush()?;
        }

        inner.prev = Some(Arc::clone(&snapshot.state));
        Ok(())
    }

    fn name(&self) -> &str {
        "EventLogObserver"
    }

    fn config(&self) -> ObserverConfig {
        self.config.clone()
    }
}

/// Diff the modifier stores of two states.
///
/// Names are compared as multisets per entity: extra occurrences in the
/// new state become `ModifiersApplied` (one per stacked registration),
/// missing occurrences become a single `ModifiersRemoved` with a count.
fn detect_events(prev: &SimState, curr: &SimState, tick: u64) -> Vec<SimEvent> {
    let mut events = Vec::new();

    let mut entities: Vec<EntityId> = prev.modifiers.modified_entities();
    for id in curr.modifiers.modified_entities() {
        if !entities.contains(&id) {
            entities.push(id);
        }
    }
    entities.sort();

    for entity in entities {
        let old = prev.modifiers.entries(entity);
        let new = curr.modifiers.entries(entity);

        let mut names: Vec<&str> = old.iter().map(|e| e.name.as_str()).collect();
        for name in new.iter().map(|e| e.name.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names.sort();
        names.dedup();

        for name in names {
            let old_count = old.iter().filter(|e| e.name == name).count();
            let new_count = new.iter().filter(|e| e.name == name).count();

            if new_count > old_count {
                for entry in new
                    .iter()
                    .filter(|e| e.name == name)
                    .skip(old_count)
                {
                    events.push(SimEvent::ModifiersApplied {
                        tick,
                        entity,
                        name: entry.name.clone(),
                        paths: entry.spec.stat_paths(),
                    });
                }
            } else if new_count < old_count {
                events.push(SimEvent::ModifiersRemoved {
                    tick,
                    entity,
                    name: name.to_string(),
                    count: old_count - new_count,
                });
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cheats::CheatSpec;
    use crate::config::SimConfig;
    use crate::input::{Command, PlayerInputs};
    use crate::state::PlayerId;
    use crate::step::step_sim;
    use crate::testing::skirmish_state;

    /// Write sink the test can read back after the observer is boxed.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn lines(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    fn superfast_inputs() -> Vec<PlayerInputs> {
        vec![PlayerInputs {
            player: PlayerId(1),
            commands: vec![Command::Cheat(CheatSpec::Superfast {
                speed_multiplier: 1.5,
            })],
        }]
    }

    #[test]
    fn test_applied_and_removed_events() {
        let buf = SharedBuf::default();
        let observer = EventLogObserver::to_writer(buf.clone());
        let config = SimConfig::default();

        let s0 = skirmish_state();
        observer.on_tick(&Snapshot::new(s0.clone(), 0)).unwrap();

        let s1 = step_sim(&s0, &superfast_inputs(), &config);
        observer.on_tick(&Snapshot::new(s1.clone(), s1.tick)).unwrap();

        let s2 = step_sim(
            &s1,
            &[PlayerInputs {
                player: PlayerId(1),
                commands: vec![Command::RemoveCheat {
                    name: "cheat/superfast".to_string(),
                }],
            }],
            &config,
        );
        observer.on_tick(&Snapshot::new(s2.clone(), s2.tick)).unwrap();

        let lines = buf.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "modifiers_applied");
        assert_eq!(lines[0]["name"], "cheat/superfast");
        assert_eq!(lines[0]["paths"][0], "Attack/Ranged/Damage/Pierce");
        assert_eq!(lines[1]["type"], "modifiers_removed");
        assert_eq!(lines[1]["count"], 1);
    }

    #[test]
    fn test_stacked_registrations_emit_one_event_each() {
        let buf = SharedBuf::default();
        let observer = EventLogObserver::to_writer(buf.clone());
        let config = SimConfig::default();

        let s0 = skirmish_state();
        observer.on_tick(&Snapshot::new(s0.clone(), 0)).unwrap();

        let mut inputs = superfast_inputs();
        inputs[0]
            .commands
            .push(Command::Cheat(CheatSpec::Superfast {
                speed_multiplier: 2.0,
            }));
        let s1 = step_sim(&s0, &inputs, &config);
        observer.on_tick(&Snapshot::new(s1, 1)).unwrap();

        let lines = buf.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines
            .iter()
            .all(|l| l["type"] == "modifiers_applied" && l["name"] == "cheat/superfast"));
    }

    #[test]
    fn test_quiet_tick_emits_nothing() {
        let buf = SharedBuf::default();
        let observer = EventLogObserver::to_writer(buf.clone());

        let s0 = skirmish_state();
        observer.on_tick(&Snapshot::new(s0.clone(), 0)).unwrap();
        observer.on_tick(&Snapshot::new(s0, 1)).unwrap();

        assert!(buf.lines().is_empty());
    }
}

//! Input bindings and the rate command channel
//!
//! The window layer reports key names; bindings turn them into
//! [`RateCommand`]s which the player consumes once per tick.

use crate::settings::InputSettings;
use replay_core::RateCommand;
use std::collections::{HashMap, VecDeque};

/// Key name to command lookup. Names compare case-insensitively.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    keys: HashMap<String, RateCommand>,
}

impl KeyBindings {
    pub fn from_settings(settings: &InputSettings) -> Self {
        let mut keys = HashMap::new();
        let groups = [
            (&settings.increase, RateCommand::Increase),
            (&settings.decrease, RateCommand::Decrease),
            (&settings.pause, RateCommand::Pause),
        ];
        for (names, command) in groups {
            for name in names {
                if let Some(previous) = keys.insert(normalize(name), command) {
                    if previous != command {
                        tracing::warn!(key = %name, ?previous, ?command, "key bound twice; last binding wins");
                    }
                }
            }
        }
        Self { keys }
    }

    pub fn command_for(&self, key: &str) -> Option<RateCommand> {
        self.keys.get(&normalize(key)).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&InputSettings::default())
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Commands collected between two ticks, in arrival order.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<RateCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: RateCommand) {
        self.pending.push_back(command);
    }

    /// Queue the command bound to `key`, if any. Returns whether one was queued.
    pub fn push_key(&mut self, bindings: &KeyBindings, key: &str) -> bool {
        match bindings.command_for(key) {
            Some(command) => {
                self.push(command);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move every pending command into `out`, oldest first.
    pub fn drain_into(&mut self, out: &mut Vec<RateCommand>) {
        out.extend(self.pending.drain(..));
    }
}

//! Name-to-entrypoint mapping for hero simulations.
//!
//! Hosts build one registry at start-up and pass it to the bootstrap code;
//! the container's `data-sim` attribute picks the entry.

use crate::error::{SimError, SimResult};

pub const DEFAULT_SIMULATION: &str = "lanterns";

pub struct SimRegistry<F> {
    entries: Vec<(String, F)>,
}

impl<F> Default for SimRegistry<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F> SimRegistry<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, entry: F) -> &mut Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((name, entry)),
        }
        self
    }

    /// Look up `name`, falling back to [`DEFAULT_SIMULATION`] when it is empty.
    pub fn resolve(&self, name: Option<&str>) -> SimResult<&F> {
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n,
            _ => DEFAULT_SIMULATION,
        };
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
            .ok_or_else(|| SimError::UnknownSimulation(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

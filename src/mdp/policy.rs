use std::fmt;

use super::error::MdpError;
use super::state::{state_at, state_index, State};
use crate::topology::CityId;

/// Solver output for one state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyEntry {
    /// Expected discounted return from this state under the policy.
    pub value: f64,
    /// City to move toward (the task destination means "carry the task").
    pub best_action: CityId,
}

/// Frozen policy: one [`PolicyEntry`] per state, looked up by direct index.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTable {
    city_count: usize,
    entries: Vec<PolicyEntry>,
    sweeps: usize,
}

impl PolicyTable {
    pub(crate) fn new(city_count: usize, entries: Vec<PolicyEntry>, sweeps: usize) -> Self {
        debug_assert_eq!(entries.len(), city_count * city_count);
        Self {
            city_count,
            entries,
            sweeps,
        }
    }

    /// Returns the entry for `(current, target)`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownState` if either city lies outside the state space the
    /// table was solved for.
    pub fn lookup(&self, current: CityId, target: CityId) -> Result<PolicyEntry, MdpError> {
        let index = state_index(self.city_count, State::new(current, target))?;
        Ok(self.entries[index])
    }

    /// Number of sweeps the solver ran to produce this table.
    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    pub fn city_count(&self) -> usize {
        self.city_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// State values in state-space layout order.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    pub fn entries(&self) -> &[PolicyEntry] {
        &self.entries
    }

    /// Iterates over `(state, entry)` in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (State, PolicyEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (state_at(self.city_count, i), *e))
    }
}

impl fmt::Display for PolicyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Policy ({} states) ===", self.entries.len())?;
        for (state, entry) in self.iter() {
            writeln!(
                f,
                "  {} -> {} (value {:.4})",
                state,
                entry.best_action.index(),
                entry.value
            )?;
        }
        write!(f, "  Sweeps: {}", self.sweeps)
    }
}

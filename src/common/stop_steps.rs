use crate::common::depth::Depth;
use crate::common::time::Time;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A user-pinned waypoint held during the ascent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StopStep {
    pub depth: Depth,
    pub time: Time,
}

impl StopStep {
    pub fn new(depth: Depth, time: Time) -> Self {
        Self { depth, time }
    }
}

/// Ordered (deepest first) user stop steps. The list always keeps at least
/// one row; a zero-time row is a placeholder the profile builder skips.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StopSteps {
    steps: Vec<StopStep>,
}

impl Default for StopSteps {
    fn default() -> Self {
        Self {
            steps: vec![StopStep::new(Depth::from_meters(5.), Time::zero())],
        }
    }
}

impl StopSteps {
    pub fn new(steps: Vec<StopStep>) -> Self {
        if steps.is_empty() {
            return Self::default();
        }
        let mut stop_steps = Self { steps };
        stop_steps.sort();
        stop_steps
    }

    pub fn push(&mut self, step: StopStep) {
        self.steps.push(step);
        self.sort();
    }

    /// Removes the row at `index`, keeping at least one row.
    pub fn remove(&mut self, index: usize) -> Option<StopStep> {
        if self.steps.len() <= 1 || index >= self.steps.len() {
            return None;
        }
        Some(self.steps.remove(index))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn get(&self, index: usize) -> Option<&StopStep> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, StopStep> {
        self.steps.iter()
    }

    /// Stops the builder actually holds between `from` (exclusive) and the
    /// surface, deepest first.
    pub fn effective_below(&self, from: Depth) -> Vec<StopStep> {
        self.steps
            .iter()
            .filter(|s| !s.time.is_zero() && s.depth < from && s.depth > Depth::zero())
            .copied()
            .collect()
    }

    fn sort(&mut self) {
        self.steps
            .sort_by(|a, b| b.depth.as_meters().total_cmp(&a.depth.as_meters()));
    }
}

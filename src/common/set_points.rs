use crate::common::depth::Depth;
use crate::common::global_types::Pressure;
use crate::common::parameters::Parameters;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One row of the PpO2 schedule: this setpoint applies from `depth` on up,
/// until the next shallower row takes over.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetPoint {
    pub depth: Depth,
    pub setpoint: Pressure,
}

impl SetPoint {
    pub fn new(depth: Depth, setpoint: Pressure) -> Self {
        Self { depth, setpoint }
    }
}

/// Piecewise-constant PpO2 schedule over depth, kept sorted by decreasing
/// depth with decreasing setpoint breaking depth ties.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetPoints {
    points: Vec<SetPoint>,
}

impl Default for SetPoints {
    fn default() -> Self {
        Self::new(vec![
            SetPoint::new(Depth::from_meters(1000.), 1.3),
            SetPoint::new(Depth::from_meters(40.), 1.4),
            SetPoint::new(Depth::from_meters(21.), 1.5),
            SetPoint::new(Depth::from_meters(6.), 1.6),
        ])
    }
}

impl SetPoints {
    pub fn new(points: Vec<SetPoint>) -> Self {
        let mut set_points = Self { points };
        set_points.sort();
        set_points
    }

    pub fn empty() -> Self {
        Self { points: vec![] }
    }

    pub fn push(&mut self, point: SetPoint) {
        self.points.push(point);
        self.sort();
    }

    pub fn remove(&mut self, index: usize) -> Option<SetPoint> {
        if index >= self.points.len() {
            return None;
        }
        Some(self.points.remove(index))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SetPoint> {
        self.points.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, SetPoint> {
        self.points.iter()
    }

    fn sort(&mut self) {
        self.points.sort_by(|a, b| {
            b.depth
                .as_meters()
                .total_cmp(&a.depth.as_meters())
                .then(b.setpoint.total_cmp(&a.setpoint))
        });
    }

    /// Setpoint in effect at a depth.
    ///
    /// Without the boost flag the deepest (bottom) setpoint applies
    /// throughout; an empty schedule falls back to the diluent PpO2 ceiling.
    pub fn effective_setpoint(&self, depth: Depth, boosted: bool, params: &Parameters) -> Pressure {
        let Some(deepest) = self.points.first() else {
            return params.max_ppo2_diluent;
        };
        if depth >= deepest.depth || !boosted {
            return deepest.setpoint;
        }
        let shallowest = self.points[self.points.len() - 1];
        if depth < shallowest.depth {
            return shallowest.setpoint;
        }
        for window in self.points.windows(2) {
            if depth < window[0].depth && depth >= window[1].depth {
                return window[0].setpoint;
            }
        }
        // depth equals the shallowest entry
        shallowest.setpoint
    }
}

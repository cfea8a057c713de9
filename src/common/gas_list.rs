use crate::common::depth::Depth;
use crate::common::environment::Environment;
use crate::common::error::PlanError;
use crate::common::gas::Gas;
use crate::common::global_types::{GasStatus, GasType};
use crate::common::parameters::Parameters;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered set of configured gases with the depth/mode selection rules.
///
/// The list never drops below one entry; `remove` on the final entry is a
/// no-op.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasList {
    gases: Vec<Gas>,
}

impl Default for GasList {
    fn default() -> Self {
        Self {
            gases: vec![Gas::air()],
        }
    }
}

impl GasList {
    pub fn new(gases: Vec<Gas>) -> Self {
        if gases.is_empty() {
            return Self::default();
        }
        Self { gases }
    }

    pub fn push(&mut self, gas: Gas) {
        self.gases.push(gas);
    }

    /// Removes the entry at `index`, keeping at least one entry in the list.
    pub fn remove(&mut self, index: usize) -> Option<Gas> {
        if self.gases.len() <= 1 || index >= self.gases.len() {
            return None;
        }
        Some(self.gases.remove(index))
    }

    pub fn len(&self) -> usize {
        self.gases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Gas> {
        self.gases.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Gas> {
        self.gases.iter()
    }

    pub fn set_status(&mut self, index: usize, status: GasStatus) {
        if let Some(gas) = self.gases.get_mut(index) {
            gas.set_status(status);
        }
    }

    /// Indices of active gases of the given type.
    pub fn active_of_type(&self, gas_type: GasType) -> Vec<usize> {
        self.gases
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_active() && g.gas_type() == gas_type)
            .map(|(i, _)| i)
            .collect()
    }

    /// Checks composition-independent validity of every active gas.
    pub fn validate(&self, params: &Parameters, env: &Environment) -> Result<(), PlanError> {
        for gas in self.gases.iter().filter(|g| g.is_active()) {
            if gas.surface_ppo2(env) > params.max_ppo2_deco {
                return Err(PlanError::InvalidGasMix {
                    reason: "PpO2 over the deco limit at the surface",
                });
            }
        }
        Ok(())
    }

    /// Open-circuit bottom gas for a depth: active Bottom mix within MOD,
    /// richest O2 first, more He breaking ties.
    pub fn select_bottom(&self, depth: Depth, params: &Parameters, env: &Environment) -> Option<Gas> {
        self.select_richest(depth, params, env, |g| g.gas_type() == GasType::Bottom)
    }

    /// Deco-phase gas: any active Deco or Bottom mix within the MOD of its
    /// own type limit, richest O2 first, more He breaking ties.
    pub fn select_deco(&self, depth: Depth, params: &Parameters, env: &Environment) -> Option<Gas> {
        self.select_richest(depth, params, env, |g| {
            matches!(g.gas_type(), GasType::Deco | GasType::Bottom)
        })
    }

    /// CC diluent for a depth: the active diluent with the highest He
    /// content still within its MOD.
    pub fn select_diluent(
        &self,
        depth: Depth,
        params: &Parameters,
        env: &Environment,
    ) -> Option<Gas> {
        self.gases
            .iter()
            .filter(|g| g.is_active() && g.gas_type() == GasType::Diluent)
            .filter(|g| g.max_operating_depth(params.max_ppo2_for(g.gas_type()), env) >= depth)
            .fold(None, |best: Option<&Gas>, g| match best {
                None => Some(g),
                Some(b) if g.he_pct() > b.he_pct() => Some(g),
                Some(b) => Some(b),
            })
            .copied()
    }

    fn select_richest(
        &self,
        depth: Depth,
        params: &Parameters,
        env: &Environment,
        eligible: impl Fn(&Gas) -> bool,
    ) -> Option<Gas> {
        self.gases
            .iter()
            .filter(|g| g.is_active() && eligible(g))
            .filter(|g| g.max_operating_depth(params.max_ppo2_for(g.gas_type()), env) >= depth)
            .fold(None, |best: Option<&Gas>, g| match best {
                None => Some(g),
                Some(b) if (g.o2_pct(), g.he_pct()) > (b.o2_pct(), b.he_pct()) => Some(g),
                Some(b) => Some(b),
            })
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Parameters, Environment) {
        let params = Parameters::default();
        (params, params.environment)
    }

    fn deco(o2: f64, he: f64) -> Gas {
        Gas::new(o2, he, GasType::Deco).unwrap()
    }

    #[test]
    fn test_default_seed() {
        let list = GasList::default();
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0), Some(&Gas::air()));
    }

    #[test]
    fn test_keeps_last_entry() {
        let mut list = GasList::default();
        assert_eq!(list.remove(0), None);
        list.push(deco(50., 0.));
        assert!(list.remove(0).is_some());
        assert_eq!(list.remove(0), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_select_deco_prefers_richest_within_mod() {
        let (params, env) = setup();
        let mut list = GasList::default();
        list.push(deco(50., 0.));
        list.push(deco(100., 0.));

        // at 21m only ean50 is within MOD
        let selected = list.select_deco(Depth::from_meters(21.), &params, &env);
        assert_eq!(selected.map(|g| g.o2_pct()), Some(50.));

        // at 5m oxygen wins
        let selected = list.select_deco(Depth::from_meters(5.), &params, &env);
        assert_eq!(selected.map(|g| g.o2_pct()), Some(100.));

        // at 40m only the bottom mix fits
        let selected = list.select_deco(Depth::from_meters(40.), &params, &env);
        assert_eq!(selected, Some(Gas::air()));
    }

    #[test]
    fn test_select_he_tie_break() {
        let (params, env) = setup();
        let mut list = GasList::new(vec![deco(35., 0.), deco(35., 25.)]);
        list.push(Gas::air());
        let selected = list.select_deco(Depth::from_meters(20.), &params, &env);
        assert_eq!(selected.map(|g| g.he_pct()), Some(25.));
    }

    #[test]
    fn test_inactive_gas_never_selected() {
        let (params, env) = setup();
        let mut list = GasList::default();
        list.push(deco(50., 0.).with_status(GasStatus::Inactive));
        let selected = list.select_deco(Depth::from_meters(10.), &params, &env);
        assert_eq!(selected, Some(Gas::air()));
    }

    #[test]
    fn test_select_diluent_highest_he() {
        let (params, env) = setup();
        let list = GasList::new(vec![
            Gas::new(21., 0., GasType::Diluent).unwrap(),
            Gas::new(18., 45., GasType::Diluent).unwrap(),
            Gas::air(),
        ]);
        let selected = list.select_diluent(Depth::from_meters(50.), &params, &env);
        assert_eq!(selected.map(|g| g.he_pct()), Some(45.));
    }

    #[test]
    fn test_no_gas_for_depth() {
        let (params, env) = setup();
        let list = GasList::new(vec![deco(50., 0.)]);
        assert_eq!(list.select_deco(Depth::from_meters(40.), &params, &env), None);
    }

    #[test]
    fn test_active_of_type() {
        let list = GasList::new(vec![
            Gas::air(),
            deco(50., 0.),
            deco(100., 0.).with_status(GasStatus::Inactive),
        ]);
        assert_eq!(list.active_of_type(GasType::Deco), vec![1]);
        assert_eq!(list.active_of_type(GasType::Bottom), vec![0]);
    }
}

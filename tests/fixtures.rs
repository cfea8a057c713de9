use dive_planner::{
    Depth, DiveMode, DivePlan, Gas, GasList, GasType, Parameters, SetPoint, SetPoints, Time,
};

pub fn gas_air() -> Gas {
    Gas::air()
}

pub fn deco_gas(o2: f64, he: f64) -> Gas {
    Gas::new(o2, he, GasType::Deco).unwrap()
}

pub fn diluent(o2: f64, he: f64) -> Gas {
    Gas::new(o2, he, GasType::Diluent).unwrap()
}

pub fn bottom_gas(o2: f64, he: f64) -> Gas {
    Gas::new(o2, he, GasType::Bottom).unwrap()
}

/// OC air plan with default parameters (GF 30/70).
pub fn plan_air(depth: f64, minutes: f64) -> DivePlan {
    DivePlan::new(
        Depth::from_meters(depth),
        Time::from_minutes(minutes),
        DiveMode::OC,
        false,
        None,
    )
}

/// OC plan with a bottom mix and deco gases.
pub fn plan_trimix(depth: f64, minutes: f64, bottom: Gas, deco: Vec<Gas>) -> DivePlan {
    let mut gases = vec![bottom];
    gases.extend(deco);
    DivePlan::new(
        Depth::from_meters(depth),
        Time::from_minutes(minutes),
        DiveMode::OC,
        false,
        None,
    )
    .with_gas_list(GasList::new(gases))
}

/// CC plan on an air diluent with a boosted setpoint schedule.
pub fn plan_cc(depth: f64, minutes: f64, set_points: Vec<(f64, f64)>) -> DivePlan {
    let points = set_points
        .into_iter()
        .map(|(d, sp)| SetPoint::new(Depth::from_meters(d), sp))
        .collect();
    DivePlan::new(
        Depth::from_meters(depth),
        Time::from_minutes(minutes),
        DiveMode::CC,
        true,
        None,
    )
    .with_gas_list(GasList::new(vec![diluent(21., 0.), gas_air()]))
    .with_set_points(SetPoints::new(points))
}

pub fn default_params() -> Parameters {
    Parameters::default()
}

#[macro_export]
macro_rules! assert_close_to_abs {
    ($a:expr, $b:expr, $tolerance:expr) => {
        if ($a - $b).abs() > $tolerance {
            panic!(
                "{} is not close to {} with tolerance of {}",
                $a, $b, $tolerance
            );
        }
    };
}

#[macro_export]
macro_rules! assert_close_to_percent {
    ($a:expr, $b:expr, $tolerance_percent:expr) => {
        let tolerance = $b * ($tolerance_percent / 100.0);
        if ($a - $b).abs() > tolerance {
            panic!(
                "{} is not close to {} within {} percent tolerance ({})",
                $a, $b, $tolerance_percent, tolerance
            );
        }
    };
}

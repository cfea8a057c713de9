use dive_planner::{CancelToken, Depth, DivePlan, GasStatus, GasType, PlanError};

pub mod fixtures;

#[test]
fn test_max_time_extends_first_stop() {
    let mut plan = fixtures::plan_air(40., 30.);
    plan.build().unwrap();
    let first_stop = plan.first_stop_index().expect("deco dive expected");
    let original_minutes = plan.steps()[first_stop].time.as_minutes();
    let original_tts = plan.tts_from_first_stop().as_minutes();
    let budget = plan.params().tts_budget.as_minutes();

    let token = CancelToken::new();
    let (max_minutes, tts_at_max) = plan.max_time_and_tts(&token).unwrap();

    assert!(max_minutes >= original_minutes);
    assert!(
        tts_at_max <= original_tts + budget + 1e-9,
        "TTS {tts_at_max} blew the budget over {original_tts}"
    );

    // the plan itself is untouched
    assert_eq!(plan.steps()[first_stop].time.as_minutes(), original_minutes);
}

#[test]
fn test_max_time_without_stops() {
    // a no-deco bounce has no stop to extend
    let mut plan = fixtures::plan_air(12., 11.);
    plan.build().unwrap();
    if plan.first_stop_index().is_none() {
        let token = CancelToken::new();
        let (max_minutes, _) = plan.max_time_and_tts(&token).unwrap();
        assert_eq!(max_minutes, 0.);
    }
}

#[test]
fn test_max_time_cancellation() {
    let plan = {
        let mut p = fixtures::plan_air(40., 30.);
        p.build().unwrap();
        p
    };
    let token = CancelToken::new();
    token.cancel();
    assert_eq!(plan.max_time_and_tts(&token), Err(PlanError::Cancelled));
}

#[test]
fn test_optimise_deco_gas_keeps_or_improves() {
    let mut plan = fixtures::plan_trimix(
        51.,
        25.,
        fixtures::bottom_gas(21., 35.),
        vec![fixtures::deco_gas(50., 0.), fixtures::deco_gas(36., 0.)],
    );
    plan.build().unwrap();
    let baseline_ascent = plan.ascent_time().as_minutes();

    let token = CancelToken::new();
    let improvement = plan.optimise_deco_gas(&token).unwrap();

    assert!(improvement >= 0.);
    assert!(plan.ascent_time().as_minutes() <= baseline_ascent + 1e-9 || improvement == 0.);
    // the plan remains built either way
    assert!(!plan.steps().is_empty());
}

#[test]
fn test_optimise_single_deco_gas_is_noop() {
    let mut plan = fixtures::plan_trimix(
        45.,
        20.,
        fixtures::bottom_gas(21., 30.),
        vec![fixtures::deco_gas(50., 0.)],
    );
    plan.build().unwrap();
    let before = plan.steps().to_vec();

    let token = CancelToken::new();
    let improvement = plan.optimise_deco_gas(&token).unwrap();
    assert_eq!(improvement, 0.);
    assert_eq!(plan.steps(), &before[..]);
}

#[test]
fn test_optimise_cancellation_leaves_plan_unchanged() {
    let mut plan = fixtures::plan_trimix(
        51.,
        25.,
        fixtures::bottom_gas(21., 35.),
        vec![fixtures::deco_gas(50., 0.), fixtures::deco_gas(36., 0.)],
    );
    plan.build().unwrap();
    let before = plan.steps().to_vec();
    let statuses: Vec<GasStatus> = plan.gas_list().iter().map(|g| g.status()).collect();

    let token = CancelToken::new();
    token.cancel();
    assert_eq!(plan.optimise_deco_gas(&token), Err(PlanError::Cancelled));
    assert_eq!(plan.steps(), &before[..]);
    let statuses_after: Vec<GasStatus> = plan.gas_list().iter().map(|g| g.status()).collect();
    assert_eq!(statuses, statuses_after);
}

#[test]
fn test_best_gas_for_depth_scenario() {
    // 50m bottom mix at PpO2 1.4 and END 30
    let params = fixtures::default_params();
    let gas =
        DivePlan::best_gas_for_depth(Depth::from_meters(50.), GasType::Bottom, &params).unwrap();
    assert_eq!(gas.o2_pct(), 23.);
    assert!(gas.he_pct() > 25. && gas.he_pct() < 40.);
    assert_eq!(gas.n2_pct(), 100. - gas.o2_pct() - gas.he_pct());

    let end = gas.equivalent_narcotic_depth(Depth::from_meters(50.), true, &params.environment);
    assert_close_to_abs!(end.as_meters(), 30., 1.);
}

#[test]
fn test_best_gas_respects_type_limit() {
    let params = fixtures::default_params();
    let bottom =
        DivePlan::best_gas_for_depth(Depth::from_meters(40.), GasType::Bottom, &params).unwrap();
    let deco =
        DivePlan::best_gas_for_depth(Depth::from_meters(40.), GasType::Deco, &params).unwrap();
    // the deco limit is looser, so the deco mix is richer
    assert!(deco.o2_pct() > bottom.o2_pct());
}

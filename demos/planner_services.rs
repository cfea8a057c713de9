use dive_planner::{CancelToken, Depth, DiveMode, DivePlan, Gas, GasList, GasType, Time};

fn main() {
    let bottom = Gas::new(21., 35., GasType::Bottom).unwrap();
    let ean50 = Gas::new(50., 0., GasType::Deco).unwrap();
    let ean36 = Gas::new(36., 0., GasType::Deco).unwrap();

    let mut plan = DivePlan::new(
        Depth::from_meters(51.),
        Time::from_minutes(25.),
        DiveMode::OC,
        false,
        None,
    )
    .with_gas_list(GasList::new(vec![bottom, ean50, ean36]));

    plan.build().expect("plannable dive");
    let token = CancelToken::new();

    let (max_minutes, tts) = plan.max_time_and_tts(&token).expect("max time");
    println!("first stop can be held for {max_minutes:.0} min (TTS {tts:.1} min)");

    let improvement = plan.optimise_deco_gas(&token).expect("optimisation");
    println!("deco gas optimisation saved {improvement:.1} min of ascent");

    let best = DivePlan::best_gas_for_depth(
        Depth::from_meters(51.),
        GasType::Bottom,
        plan.params(),
    )
    .expect("best mix");
    println!("best bottom mix for 51m: {best}");
}

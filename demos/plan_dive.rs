use dive_planner::{Depth, DiveMode, DivePlan, Gas, GasList, GasType, Parameters, Time};

fn main() {
    let params = Parameters::new().with_gradient_factors(30, 70);

    // bottom mix and deco gases
    let bottom = Gas::new(18., 45., GasType::Bottom).unwrap();
    let ean50 = Gas::new(50., 0., GasType::Deco).unwrap();
    let oxygen = Gas::new(100., 0., GasType::Deco).unwrap();

    let mut plan = DivePlan::new(
        Depth::from_meters(60.),
        Time::from_minutes(25.),
        DiveMode::OC,
        false,
        None,
    )
    .with_parameters(params)
    .with_gas_list(GasList::new(vec![bottom, ean50, oxygen]));

    plan.build().expect("plannable dive");

    println!("{plan}");
    println!(
        "runtime {:.1} min, ascent {:.1} min, CNS {:.0}%, OTU {:.0}",
        plan.total_runtime().as_minutes(),
        plan.ascent_time().as_minutes(),
        plan.cns(),
        plan.otu()
    );
    for usage in plan.consumption().usages {
        println!(
            "gas {}: {:.0} L ({:.0} L with reserve)",
            usage.gas, usage.liters, usage.liters_with_reserve
        );
    }
}

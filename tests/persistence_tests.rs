use dive_planner::{
    load_gas_list, load_parameters, load_set_points, save_gas_list, save_parameters,
    save_set_points, Depth, Gas, GasList, GasStatus, GasType, Parameters, PersistenceError,
    SetPoint, SetPoints, Time,
};

#[test]
fn test_set_points_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let set_points = SetPoints::new(vec![
        SetPoint::new(Depth::from_meters(40.), 1.4),
        SetPoint::new(Depth::from_meters(21.), 1.5),
        SetPoint::new(Depth::from_meters(6.), 1.6),
    ]);
    save_set_points(dir.path(), &set_points).unwrap();
    let loaded = load_set_points(dir.path()).unwrap();
    assert_eq!(loaded, set_points);
}

#[test]
fn test_gas_list_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut gas_list = GasList::new(vec![
        Gas::air(),
        Gas::new(50., 0., GasType::Deco).unwrap(),
        Gas::new(18., 45., GasType::Diluent)
            .unwrap()
            .with_status(GasStatus::Inactive),
    ]);
    gas_list.push(Gas::new(100., 0., GasType::Deco).unwrap());
    save_gas_list(dir.path(), &gas_list).unwrap();
    let loaded = load_gas_list(dir.path()).unwrap();
    assert_eq!(loaded, gas_list);
}

#[test]
fn test_parameters_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let params = Parameters::default()
        .with_gradient_factors(45, 85)
        .with_sac_rates(17., 15.)
        .with_end_limit(Depth::from_meters(36.), false)
        .with_tts_budget(Time::from_minutes(3.))
        .with_tanks(2, 12., 232., 1.35);
    save_parameters(dir.path(), &params).unwrap();
    let loaded = load_parameters(dir.path()).unwrap();
    assert_eq!(loaded, params);
}

#[test]
fn test_missing_files_seed_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(load_set_points(dir.path()).unwrap(), SetPoints::default());
    assert_eq!(load_gas_list(dir.path()).unwrap(), GasList::default());
    assert_eq!(load_parameters(dir.path()).unwrap(), Parameters::default());
}

#[test]
fn test_default_seeds_match_documented_values() {
    let set_points = SetPoints::default();
    let expected = [(1000., 1.3), (40., 1.4), (21., 1.5), (6., 1.6)];
    assert_eq!(set_points.len(), expected.len());
    for (point, (depth, sp)) in set_points.iter().zip(expected) {
        assert_eq!(point.depth, Depth::from_meters(depth));
        assert_eq!(point.setpoint, sp);
    }

    let gas_list = GasList::default();
    assert_eq!(gas_list.len(), 1);
    let seed = gas_list.get(0).unwrap();
    assert_eq!(seed.o2_pct(), 21.);
    assert_eq!(seed.gas_type(), GasType::Bottom);
    assert_eq!(seed.status(), GasStatus::Active);
}

#[test]
fn test_legacy_headerless_set_points_migrate() {
    let dir = tempfile::tempdir().unwrap();
    // legacy layout: bare count followed by depth/setpoint pairs
    let mut bytes: Vec<u8> = vec![];
    bytes.extend_from_slice(&2u64.to_ne_bytes());
    bytes.extend_from_slice(&40f64.to_ne_bytes());
    bytes.extend_from_slice(&1.3f64.to_ne_bytes());
    bytes.extend_from_slice(&6f64.to_ne_bytes());
    bytes.extend_from_slice(&1.0f64.to_ne_bytes());
    std::fs::write(dir.path().join("setpoints.dat"), bytes).unwrap();

    let loaded = load_set_points(dir.path()).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.get(0), Some(&SetPoint::new(Depth::from_meters(40.), 1.3)));

    // saving rewrites in the current versioned format
    save_set_points(dir.path(), &loaded).unwrap();
    let reloaded = load_set_points(dir.path()).unwrap();
    assert_eq!(reloaded, loaded);
}

#[test]
fn test_unknown_version_refused() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes: Vec<u8> = vec![];
    bytes.extend_from_slice(&0x4450_4C4Eu32.to_ne_bytes());
    bytes.extend_from_slice(&99u32.to_ne_bytes());
    bytes.extend_from_slice(&0u64.to_ne_bytes());
    std::fs::write(dir.path().join("gaslist.dat"), bytes).unwrap();

    let result = load_gas_list(dir.path());
    assert!(matches!(
        result,
        Err(PersistenceError::UnsupportedVersion { found: 99 })
    ));
}

#[test]
fn test_truncated_file_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes: Vec<u8> = vec![];
    bytes.extend_from_slice(&5u64.to_ne_bytes());
    bytes.extend_from_slice(&40f64.to_ne_bytes());
    std::fs::write(dir.path().join("setpoints.dat"), bytes).unwrap();

    let result = load_set_points(dir.path());
    assert!(matches!(result, Err(PersistenceError::Corrupt(_))));
}

#[test]
fn test_empty_gas_list_file_keeps_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    let list = GasList::default();
    save_gas_list(dir.path(), &list).unwrap();
    let loaded = load_gas_list(dir.path()).unwrap();
    assert_eq!(loaded.len(), 1);
}

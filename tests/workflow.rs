use std::fs;

use approx::assert_relative_eq;
use loadset::prelude::*;
use tempfile::tempdir;

fn engine_mounts() -> Vec<Interface> {
    vec![
        Interface::new("Engine Mount (Port)", -317.7275, 378.6529, 3984.2688),
        Interface::new("Engine Mount (Fail Safe)", 0.0, 494.2962, 3984.2688),
        Interface::new("Engine Mount (Starboard)", 317.7275, 378.6529, 3984.2688),
        Interface::new("Forward Outer Flange", 0.0, 0.0, 3874.2688),
        Interface::new("Aft Outer Flange", 0.0, 0.0, 4153.8389),
    ]
}

fn engine_ranges() -> LoadRanges {
    let json = r#"{
        "Engine Mount (Port)": {"Fy": [3000.0, 7000.0], "Fz": [3000.0, 7000.0]},
        "Engine Mount (Starboard)": {"Fy": [3000.0, 7000.0], "Fz": [3000.0, 7000.0]},
        "Forward Outer Flange": {"My": [500000.0, 600000.0]}
    }"#;
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_generated_cases_are_balanced_and_in_range() {
    let interfaces = engine_mounts();
    let ranges = engine_ranges();
    let options = GeneratorOptions::default()
        .with_num_cases(25)
        .with_seed(42)
        .with_name("Engine Mount Balanced Loads");

    let loadset = generate_balanced_loadset(&interfaces, &ranges, &options).unwrap();
    assert_eq!(loadset.name(), Some("Engine Mount Balanced Loads"));
    assert_eq!(loadset.load_cases().len(), 25);

    let system = EquilibriumSystem::new(&interfaces);
    for case in loadset.load_cases() {
        let check = system.verify_load_case(case, 1e-6);
        assert!(check.is_balanced, "{:?}: {check:?}", case.name());

        let port = case.point_loads()[0].force_moment();
        assert!((3000.0..=7000.0).contains(&port.fy));
        assert!((3000.0..=7000.0).contains(&port.fz));
        let flange = case.point_loads()[3].force_moment();
        assert!((500000.0..=600000.0).contains(&flange.my));
    }
}

#[test]
fn test_generation_is_reproducible() {
    let options = GeneratorOptions::default().with_num_cases(4).with_seed(1234);
    let first = generate_balanced_loadset(&engine_mounts(), &engine_ranges(), &options).unwrap();
    let second = generate_balanced_loadset(&engine_mounts(), &engine_ranges(), &options).unwrap();
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());

    let other_seed = GeneratorOptions::default().with_num_cases(4).with_seed(4321);
    let third = generate_balanced_loadset(&engine_mounts(), &engine_ranges(), &other_seed).unwrap();
    assert_ne!(first, third);
}

#[test]
fn test_generate_envelope_export() {
    let dir = tempdir().unwrap();
    let options = GeneratorOptions::default().with_num_cases(30).with_seed(7);
    let generated = generate_balanced_loadset(&engine_mounts(), &engine_ranges(), &options).unwrap();

    let envelope = generated.envelope().unwrap();
    assert!(!envelope.load_cases().is_empty());
    assert!(envelope.load_cases().len() <= generated.load_cases().len());

    // Every extreme of the full set survives in the envelope
    let full = generated.point_extremes();
    let reduced = envelope.point_extremes();
    for (point, components) in &full {
        for (component, ext) in components {
            assert_eq!(reduced[point][component].max, ext.max);
            if ext.min.value < 0.0 {
                assert_eq!(reduced[point][component].min, ext.min);
            }
        }
    }

    let written = envelope.to_ansys(dir.path(), "engine").unwrap();
    assert_eq!(written.len(), envelope.load_cases().len());
    for path in &written {
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("engine_Case_"));
        assert!(name.ends_with(".inp"));
    }
}

#[test]
fn test_compare_export_and_reload() {
    let dir = tempdir().unwrap();
    let old = LoadSet::new(
        "Old",
        1,
        Units::new(ForceUnit::N),
        vec![LoadCase::new(
            "LC1",
            vec![PointLoad::new("Point A", ForceMoment::new(1000.0, 0.0, 0.0, 0.0, 0.0, -200.0))],
        )],
    );
    let new = LoadSet::new(
        "New",
        2,
        Units::new(ForceUnit::KN),
        vec![LoadCase::new(
            "LC1",
            vec![PointLoad::new("Point A", ForceMoment::new(1.5, 0.0, 0.0, 0.0, 0.0, -0.25))],
        )],
    );

    let comparison = old.compare_to(&new);
    for row in &comparison.comparison_rows {
        assert_relative_eq!(row.abs_diff, row.loadset2_value - row.loadset1_value);
    }

    let path = dir.path().join("comparison.json");
    comparison.write_json(&path).unwrap();
    let reloaded = LoadSetCompare::read_json(&path).unwrap();
    assert_eq!(reloaded, comparison);
    assert_eq!(reloaded.loadset2_metadata.version, 2);
}

#[test]
fn test_session_from_files() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    let options = GeneratorOptions::default().with_num_cases(5).with_seed(3);
    let generated = generate_balanced_loadset(&engine_mounts(), &engine_ranges(), &options).unwrap();
    generated.write_json(&first).unwrap();
    generated.factor(1.1).write_json(&second).unwrap();

    let mut session = Session::new();
    let summary = session.load_from_json(&first).unwrap();
    assert_eq!(summary.num_load_cases, 5);
    assert_eq!(summary.total_point_loads, 25);
    session.load_comparison_from_json(&second).unwrap();
    session.compare().unwrap();

    let out = dir.path().join("cmp.json");
    session.export_comparison_json(&out).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("\"comparison_rows\""));

    let cases = session.load_cases().unwrap();
    assert_eq!(cases[0].name.as_deref(), Some("Case_001"));
    assert_eq!(cases[0].num_point_loads, 5);
}

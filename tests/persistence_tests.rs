use chrono::NaiveDate;
use pert_schedule::persistence::{
    PersistenceError, ProjectFile, export_activities_to_csv, export_schedule_to_csv,
    import_activities_from_csv, load_config_from_json, load_project_from_json,
    read_activities_csv, save_project_to_json, write_schedule_csv,
};
use pert_schedule::{
    Activity, EngineConfig, SchedulingStore, UnresolvedDependencyPolicy, compute_schedule,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_activities() -> Vec<Activity> {
    vec![
        Activity::with_estimates(1, "Survey", 1.0, 2.0, 3.0),
        Activity::with_estimates(2, "Foundation", 3.0, 4.0, 8.0).depends_on(["Survey"]),
        Activity::with_estimates(3, "Permits", 1.0, 1.5, 2.0).depends_on(["Survey"]),
        Activity::with_estimates(4, "Framing", 5.0, 6.0, 7.0).depends_on(["Foundation", "Permits"]),
    ]
}

#[test]
fn project_json_round_trip_restores_store() {
    let mut store = SchedulingStore::new();
    store.set_activities(sample_activities()).unwrap();
    store.set_start_date(Some(d(2025, 4, 7)));

    let tmp = NamedTempFile::new().expect("create temp file");
    save_project_to_json(&store, tmp.path()).expect("save project");

    let project = load_project_from_json(tmp.path()).expect("load project");
    assert_eq!(project, ProjectFile::from_store(&store));

    let mut restored = SchedulingStore::new();
    project.apply_to(&mut restored).unwrap();
    assert_eq!(restored.activities(), store.activities());
    assert_eq!(restored.start_date(), Some(d(2025, 4, 7)));
    assert_eq!(
        restored.get_schedule().unwrap(),
        store.get_schedule().unwrap()
    );
}

#[test]
fn project_json_uses_camel_case_fields() {
    let mut store = SchedulingStore::new();
    store
        .insert_activity(Activity::with_estimates(1, "A", 1.0, 2.0, 3.0))
        .unwrap();
    let tmp = NamedTempFile::new().unwrap();
    save_project_to_json(&store, tmp.path()).unwrap();

    let text = fs::read_to_string(tmp.path()).unwrap();
    assert!(text.contains("\"startDate\": null"));
    assert!(text.contains("\"mostLikely\": 2.0"));
}

#[test]
fn project_json_with_duplicate_ids_is_rejected() {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(
        tmp.path(),
        r#"{"startDate":"2025-01-06","activities":[
            {"id":1,"name":"A","optimistic":1,"mostLikely":1,"pessimistic":1,"dependencies":[]},
            {"id":1,"name":"B","optimistic":1,"mostLikely":1,"pessimistic":1}
        ]}"#,
    )
    .unwrap();
    let err = load_project_from_json(tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn missing_project_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_project_from_json(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
}

#[test]
fn activity_csv_round_trip() {
    let tmp = NamedTempFile::new().unwrap();
    export_activities_to_csv(&sample_activities(), tmp.path()).unwrap();
    let imported = import_activities_from_csv(tmp.path()).unwrap();
    assert_eq!(imported, sample_activities());
}

#[test]
fn activity_csv_splits_dependency_field() {
    let input = "\
id,name,optimistic,most_likely,pessimistic,dependencies
1,A,1,2,3,
2,B,2,3,4,\"A\"
3,C,1,1,1,\"A, B\"
";
    let activities = read_activities_csv(input.as_bytes()).unwrap();
    assert_eq!(activities.len(), 3);
    assert!(activities[0].dependencies.is_empty());
    assert_eq!(activities[2].dependencies, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(activities[1].most_likely, 3.0);
}

#[test]
fn activity_csv_refuses_names_that_would_not_round_trip() {
    let tmp = NamedTempFile::new().unwrap();
    for name in ["Design, phase 1", " Design", "Design "] {
        let activities = vec![
            Activity::with_estimates(1, name, 1.0, 1.0, 1.0),
            Activity::with_estimates(2, "Build", 1.0, 2.0, 3.0).depends_on([name]),
        ];
        let err = export_activities_to_csv(&activities, tmp.path()).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidData(_)), "{name:?}");
    }

    // the same project keeps its names through JSON
    let mut store = SchedulingStore::new();
    store
        .set_activities(vec![
            Activity::with_estimates(1, "Design, phase 1", 1.0, 1.0, 1.0),
            Activity::with_estimates(2, "Build", 1.0, 2.0, 3.0).depends_on(["Design, phase 1"]),
        ])
        .unwrap();
    save_project_to_json(&store, tmp.path()).unwrap();
    let project = load_project_from_json(tmp.path()).unwrap();
    assert_eq!(project.activities, store.activities());

    // names with surrounding spaces are not silently trimmed on import
    let input = "id,name,optimistic,most_likely,pessimistic,dependencies\n1, A,1,1,1,\n";
    let err = read_activities_csv(input.as_bytes()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn activity_csv_with_bad_number_is_rejected() {
    let input = "id,name,optimistic,most_likely,pessimistic,dependencies\n1,A,one,2,3,\n";
    let err = read_activities_csv(input.as_bytes()).unwrap_err();
    assert!(matches!(err, PersistenceError::Csv(_)));
}

#[test]
fn schedule_csv_has_export_columns() {
    let activities = sample_activities();
    let schedule = compute_schedule(&activities, d(2025, 4, 7), &EngineConfig::default()).unwrap();

    let mut buffer = Vec::new();
    write_schedule_csv(&activities, &schedule, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "Name,Optimistic,Most Likely,Pessimistic,Expected Duration,ES,EF,LS,LF,Slack,Dependencies,On Critical Path,Start Date,End Date"
    );
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "Survey,1.0,2.0,3.0,2,0,2,0,2,0,,Yes,2025-04-07,2025-04-09");
    assert!(lines[3].starts_with("Permits,"));
    assert!(lines[3].contains(",No,"));
    assert!(lines[4].contains("\"Foundation, Permits\""));
}

#[test]
fn schedule_csv_file_export() {
    let activities = sample_activities();
    let schedule = compute_schedule(&activities, d(2025, 4, 7), &EngineConfig::default()).unwrap();
    let tmp = NamedTempFile::new().unwrap();
    export_schedule_to_csv(&activities, &schedule, tmp.path()).unwrap();

    let text = fs::read_to_string(tmp.path()).unwrap();
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn config_loads_from_json() {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(
        tmp.path(),
        r#"{"confidence_levels":[50,99],"unresolved_dependencies":"ignore"}"#,
    )
    .unwrap();

    let config = load_config_from_json(tmp.path()).unwrap();
    assert_eq!(config.confidence_levels, vec![50.0, 99.0]);
    assert_eq!(
        config.unresolved_dependencies,
        UnresolvedDependencyPolicy::Ignore
    );
    assert!(!config.enforce_field_validation);
}

use cycledag::build_suite;
use cycledag::errors::CycledagError;
use cycledag::suite::{SuiteAssembler, TaskRegistry};
use cycledag_test_utils::builders::ConfigFileBuilder;
use cycledag_test_utils::init_tracing;
use cycledag_test_utils::tree::{child_names, exists, gate, var};

fn open_loop() -> ConfigFileBuilder {
    ConfigFileBuilder::new("2020010100", "2020010118").cycle_length("6h")
}

#[test]
fn test_four_cycles_without_assimilation() {
    init_tracing();
    let cfg = open_loop().build();
    let suite = build_suite(&cfg, &TaskRegistry::standard(), "test").unwrap();
    let tree = &suite.tree;

    assert_eq!(
        child_names(tree, "/test"),
        vec![
            "InitRun",
            "StaticData",
            "2020010100",
            "2020010106",
            "2020010112",
            "2020010118"
        ]
    );

    assert_eq!(
        child_names(tree, "/test/2020010100/Initialization"),
        vec!["OfflinePrep"]
    );
    for cycle in ["2020010106", "2020010112", "2020010118"] {
        assert_eq!(
            child_names(tree, &format!("/test/{cycle}/Initialization")),
            vec!["CycleFirstGuess"]
        );
    }

    // No cycle 24h earlier exists, so CycleInput only waits on PrepareCycle.
    for cycle in ["2020010100", "2020010106", "2020010112", "2020010118"] {
        assert_eq!(
            gate(tree, &format!("/test/{cycle}/CycleInput")),
            format!("(/test/{cycle}/PrepareCycle == complete)")
        );
    }
}

#[test]
fn test_cycle_family_layout() {
    let cfg = open_loop().build();
    let suite = build_suite(&cfg, &TaskRegistry::standard(), "test").unwrap();
    let tree = &suite.tree;

    assert_eq!(
        child_names(tree, "/test/2020010106"),
        vec![
            "PrepareCycle",
            "CycleInput",
            "Initialization",
            "Prediction",
            "PostProcessing"
        ]
    );
    assert_eq!(child_names(tree, "/test/2020010106/CycleInput"), vec!["Forcing"]);
    assert_eq!(
        child_names(tree, "/test/2020010106/Prediction"),
        vec!["Forecast", "LogProgress"]
    );
    assert_eq!(
        child_names(tree, "/test/2020010106/PostProcessing"),
        vec!["LogProgressPP"]
    );

    assert_eq!(
        gate(tree, "/test/2020010106/Prediction"),
        "(/test/2020010106/CycleInput == complete AND /test/2020010106/Initialization == complete)"
    );
    assert_eq!(
        gate(tree, "/test/2020010106/Prediction/LogProgress"),
        "(/test/2020010106/Prediction/Forecast == complete)"
    );
    assert_eq!(
        gate(tree, "/test/2020010106/PostProcessing"),
        "(/test/2020010106/Prediction == complete)"
    );
    assert_eq!(gate(tree, "/test/2020010106/PostProcessing/LogProgressPP"), "");

    assert_eq!(var(tree, "/test/2020010106", "DTG").as_deref(), Some("2020010106"));
    assert_eq!(var(tree, "/test/2020010106", "FCINT").as_deref(), Some("6"));
    assert_eq!(
        var(tree, "/test/2020010106/Prediction/Forecast", "WRKDIR").as_deref(),
        Some("/exp/work/test/2020010106/Prediction/Forecast")
    );
}

#[test]
fn test_static_data_and_compilation() {
    let cfg = open_loop().compile(true).build();
    let suite = build_suite(&cfg, &TaskRegistry::standard(), "test").unwrap();
    let tree = &suite.tree;

    assert_eq!(
        child_names(tree, "/test/Compilation"),
        vec![
            "SyncSourceCode",
            "ConfigureOfflineBinaries",
            "MakeOfflineBinaries"
        ]
    );
    assert_eq!(
        gate(tree, "/test/Compilation/MakeOfflineBinaries"),
        "(/test/Compilation/ConfigureOfflineBinaries == complete)"
    );
    assert_eq!(
        gate(tree, "/test/StaticData"),
        "(/test/InitRun == complete AND /test/Compilation == complete)"
    );
    assert_eq!(child_names(tree, "/test/StaticData"), vec!["Pgd"]);
    assert_eq!(
        gate(tree, "/test/2020010100"),
        "(/test/InitRun == complete AND /test/StaticData == complete)"
    );
}

#[test]
fn test_static_data_per_decade() {
    let cfg = ConfigFileBuilder::new("2020010900", "2020012200")
        .cycle_length("24h")
        .one_decade(true)
        .build();
    let suite = build_suite(&cfg, &TaskRegistry::standard(), "test").unwrap();
    let tree = &suite.tree;

    assert_eq!(
        child_names(tree, "/test/StaticData"),
        vec!["Decade20200101", "Decade20200111", "Decade20200121"]
    );
    assert!(exists(tree, "/test/StaticData/Decade20200111/Pgd"));
    assert_eq!(
        var(tree, "/test/StaticData/Decade20200121", "DECADE").as_deref(),
        Some("20200121")
    );
}

#[test]
fn test_modify_forcing_and_warm_start() {
    let cfg = open_loop().modify_forcing(true).initial_prep(false).build();
    let suite = build_suite(&cfg, &TaskRegistry::standard(), "test").unwrap();
    let tree = &suite.tree;

    assert_eq!(
        child_names(tree, "/test/2020010100/CycleInput"),
        vec!["Forcing", "ModifyForcing"]
    );
    assert_eq!(
        gate(tree, "/test/2020010100/CycleInput/ModifyForcing"),
        "(/test/2020010100/CycleInput/Forcing == complete)"
    );
    assert_eq!(
        child_names(tree, "/test/2020010100/Initialization"),
        vec!["CycleFirstGuess"]
    );
}

#[test]
fn test_enumeration_failure_aborts_before_any_node() {
    let cfg = ConfigFileBuilder::new("2020010103", "2020010118")
        .hh_list("0,6,12,18")
        .build();
    let registry = TaskRegistry::standard();
    let result = SuiteAssembler::new(&cfg, &registry).build();
    assert!(matches!(result, Err(CycledagError::NoIntervalFound { hour: 3, .. })));
}

#[test]
fn test_missing_task_in_registry_aborts() {
    let cfg = open_loop().build();
    let mut registry = TaskRegistry::new();
    registry.register("InitRun", cycledag::suite::standard_task);

    match build_suite(&cfg, &registry, "test") {
        Err(CycledagError::UnknownTask(name)) => assert_eq!(name, "Pgd"),
        other => panic!("expected UnknownTask, got {other:?}"),
    }
}

#[test]
fn test_suite_name_override() {
    let cfg = open_loop().case("from_config").build();
    let registry = TaskRegistry::standard();

    let suite = SuiteAssembler::new(&cfg, &registry).build().unwrap();
    assert!(exists(&suite.tree, "/from_config/InitRun"));

    let suite = SuiteAssembler::new(&cfg, &registry)
        .with_suite_name("other")
        .build()
        .unwrap();
    assert!(exists(&suite.tree, "/other/InitRun"));
    assert_eq!(var(&suite.tree, "/other", "CASE").as_deref(), Some("other"));
    assert_eq!(
        var(&suite.tree, "/other/InitRun", "WRKDIR").as_deref(),
        Some("/exp/work/other/InitRun")
    );
}

#[test]
fn test_suite_name_override_must_be_a_node_name() {
    let cfg = open_loop().build();
    let registry = TaskRegistry::standard();

    for bad in ["", "a/b", "../x", "with space"] {
        match SuiteAssembler::new(&cfg, &registry).with_suite_name(bad).build() {
            Err(CycledagError::InvalidNodeName { name, .. }) => assert_eq!(name, bad),
            other => panic!("expected InvalidNodeName for {bad:?}, got {other:?}"),
        }
    }
}

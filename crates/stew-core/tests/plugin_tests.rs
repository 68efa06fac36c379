use std::collections::BTreeMap;

use stew_core::driver::check_unique;
use stew_core::{build_templates, register_plugin, DriverError, StewConfig};
use stew_gen::select::{Category, Filters, SelectError};
use stew_host::UsageDriver;
use stew_ir::format::ECHO_FILE;
use stew_ir::semantic::echo_output;
use stew_sandbox::{ExecutionMode, Sandbox};

fn config(filters: &[(&str, bool)], execution: ExecutionMode) -> StewConfig {
    StewConfig {
        filters: filters
            .iter()
            .map(|(name, on)| (name.to_string(), *on))
            .collect::<BTreeMap<_, _>>(),
        execution,
        ..StewConfig::default()
    }
}

fn registered(config: &StewConfig) -> Sandbox {
    let mut sandbox = Sandbox::new(config.sandbox_config());
    register_plugin(&mut sandbox, config).unwrap();
    sandbox
}

fn assert_every_example_passes(sandbox: &Sandbox) {
    let outcomes = sandbox.run_examples();
    assert_eq!(outcomes.len(), sandbox.example_count());
    let failures: Vec<String> = outcomes
        .iter()
        .filter(|o| !o.is_ok())
        .map(|o| format!("{}::{}: {:?}", o.action, o.example, o.result))
        .collect();
    assert!(failures.is_empty(), "{} failures:\n{}", failures.len(), failures.join("\n"));
}

#[test]
fn test_full_plugin_replays_sync() {
    let sandbox = registered(&config(&[], ExecutionMode::Sync));
    assert_every_example_passes(&sandbox);
}

#[test]
fn test_full_plugin_replays_async() {
    let sandbox = registered(&config(&[], ExecutionMode::Async));
    assert_every_example_passes(&sandbox);
}

#[test]
fn test_registration_order_and_names() {
    let sandbox = registered(&StewConfig::default());
    let ids: Vec<&str> = sandbox.action_ids().collect();
    assert_eq!(ids[0], "int_params_1");
    for expected in [
        "list_int_params_1",
        "collection_artifact_params_4",
        "metadata_params_6",
        "multiple_outputs_5",
        "collection_second",
        "typemap_str_int",
        "typemap_bool_flag",
        "typemap_artifacts",
        "typemap_the_matrix",
        "typemap_the_matrix_reloaded",
        "typemap_the_matrix_revolutions",
        "typemap_the_matrix_resurrections",
        "typemap_the_matrix_6",
        "typemap_lists",
        "typemap_sets_defaults5",
        "typemap_collections",
    ] {
        assert!(ids.contains(&expected), "missing {expected}");
    }
    assert!(!ids.contains(&"list_metadata_params_1"));
    assert!(!ids.contains(&"typemap_the_matrix_7"));
}

#[test]
fn test_three_outputs_hold_their_ordinals() {
    let sandbox = registered(&StewConfig::default());
    let mut session = sandbox.session();
    let bindings: Vec<(String, String)> = (1..=3)
        .map(|n| (format!("output{n}"), format!("output{n}")))
        .collect();
    let outputs = session.action("multiple_outputs_3", vec![], &bindings).unwrap();
    assert_eq!(outputs.len(), 3);
    for output in &outputs {
        output.assert_output_type(&echo_output()).unwrap();
    }
    outputs[1].assert_has_line_matching(ECHO_FILE, "^2$").unwrap();
    outputs[2].assert_has_line_matching(ECHO_FILE, "^3$").unwrap();
    assert!(outputs[2].assert_has_line_matching(ECHO_FILE, "^2$").is_err());
}

#[test]
fn test_int_range_1_param_domain() {
    let sandbox = registered(&config(&[("ints", true)], ExecutionMode::Sync));
    let signature = sandbox.signature("int_params_2").unwrap();
    let spec = &signature.parameters[0];
    assert_eq!(spec.name, "int_range_1_param");
    assert_eq!(spec.logical_type.to_string(), "Int % Range(None, 3)");

    let outcomes = sandbox.run_action_examples("int_params_2").unwrap();
    assert!(outcomes.iter().all(|o| o.is_ok()));
}

#[test]
fn test_filters_select_categories() {
    let templates =
        build_templates(&Filters::from_map(&config(&[("ints", true)], ExecutionMode::Sync).filters).unwrap())
            .unwrap();
    let ids: Vec<&str> = templates.iter().map(|t| t.action_id()).collect();
    // Seven int templates, five output-arity variants, three output collections.
    assert_eq!(ids.len(), 15);
    assert!(ids.iter().all(|id| !id.starts_with("typemap_")));

    // A single matrix generator is degenerate and skipped.
    let templates = build_templates(&Filters::only([Category::Ints, Category::Typemaps])).unwrap();
    assert!(templates.iter().all(|t| !t.action_id().starts_with("typemap_")));

    let templates =
        build_templates(&Filters::only([Category::Ints, Category::Strings, Category::Typemaps])).unwrap();
    let ids: Vec<&str> = templates.iter().map(|t| t.action_id()).collect();
    assert!(ids.contains(&"typemap_str_int"));
    assert!(!ids.contains(&"typemap_bool_flag"));
    assert!(ids.contains(&"typemap_the_matrix"));
    assert!(ids.contains(&"typemap_the_matrix_revolutions"));
    assert!(!ids.contains(&"typemap_lists"));
}

#[test]
fn test_filtered_typemaps_replay() {
    let sandbox = registered(&config(
        &[("ints", true), ("strings", true), ("typemaps", true), ("collections", true)],
        ExecutionMode::Async,
    ));
    assert!(sandbox.signature("typemap_sets").is_some());
    assert_every_example_passes(&sandbox);
}

#[test]
fn test_filter_errors() {
    let mut sandbox = Sandbox::new(Default::default());
    let err = register_plugin(&mut sandbox, &config(&[("complex", true)], ExecutionMode::Sync)).unwrap_err();
    assert!(matches!(err, DriverError::Select(SelectError::UnknownFilter(_))));

    let err = register_plugin(
        &mut sandbox,
        &config(&[("ints", false), ("strings", false)], ExecutionMode::Sync),
    )
    .unwrap_err();
    assert!(matches!(err, DriverError::Select(SelectError::NothingSelected)));
    // Nothing reached the host.
    assert_eq!(sandbox.action_count(), 0);
    assert_eq!(sandbox.semantic_types().count(), 0);
}

#[test]
fn test_generation_is_restartable() {
    let first = build_templates(&Filters::all()).unwrap();
    let second = build_templates(&Filters::all()).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.action_id(), b.action_id());
        assert_eq!(a.invocation_domain(), b.invocation_domain());
    }
}

#[test]
fn test_duplicate_ids_rejected() {
    let mut templates = build_templates(&Filters::only([Category::Bools])).unwrap();
    templates.push(templates[0].clone());
    assert!(matches!(
        check_unique(&templates),
        Err(DriverError::DuplicateAction(id)) if id == "bool_params_1"
    ));
}

#[test]
fn test_report_serializes() {
    let config = StewConfig::default();
    let mut sandbox = Sandbox::new(config.sandbox_config());
    let report = register_plugin(&mut sandbox, &config).unwrap();
    assert_eq!(report.actions.len(), sandbox.action_count());
    assert_eq!(report.example_count(), sandbox.example_count());
    assert!(report.semantic_types.iter().any(|t| t == "IntWrapper[WrappedInt1 | WrappedInt2]"));

    let summary = report.action("int_params_1").unwrap();
    assert_eq!(summary.parameters[0].name, "single_int");
    assert!(summary.parameters[0].required);
    assert!(!summary.parameters[1].required);

    let json: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["plugin"]["name"], "mystery-stew");
    assert_eq!(json["actions"][0]["id"], "int_params_1");
    assert_eq!(json["actions"][0]["outputs"][0]["name"], "only_output");
}

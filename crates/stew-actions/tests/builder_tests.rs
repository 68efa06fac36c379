use stew_actions::outputs::{generate_multiple_output_methods, generate_output_collection_methods};
use stew_actions::single::generate_single_type_methods;
use stew_actions::typemap::{
    generate_the_matrix, typemap_artifacts, typemap_bool_flag, typemap_str_int,
};
use stew_actions::BuildError;
use stew_gen::artifacts::artifact_params;
use stew_gen::collections::{collection_paramgen, list_paramgen, set_paramgen, LiftError};
use stew_gen::metadata::metadata_params;
use stew_gen::primitive::int_params;
use stew_gen::select::{matrix_generators, Filters};
use stew_gen::ParamGenerator;
use stew_ir::argument::Argument;
use stew_ir::semantic::{echo_output, echo_output_branch};
use stew_ir::template::{ActionTemplate, Invocation, ParamDefault};
use stew_ir::types::TypeDescriptor;
use stew_ir::value::Value;

fn args(invocation: &Invocation) -> Vec<(&str, &Argument)> {
    invocation
        .arguments
        .iter()
        .map(|(name, arg)| (name.as_str(), arg))
        .collect()
}

fn single_int_action() -> ActionTemplate {
    generate_single_type_methods(&int_params()).unwrap().remove(0)
}

#[test]
fn test_single_type_parameters() {
    let action = single_int_action();
    assert_eq!(action.action_id(), "int_params_1");
    let names: Vec<&str> = action.parameter_specs().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "single_int",
            "optional_single_int",
            "default0_single_int",
            "default1_single_int",
            "default2_single_int",
        ]
    );
    assert_eq!(action.parameter_specs()[0].default, ParamDefault::NoDefault);
    assert_eq!(action.parameter_specs()[1].default, ParamDefault::Value(Value::None));
    assert_eq!(action.parameter_specs()[3].default, ParamDefault::Value(Value::Int(0)));
    assert_eq!(
        action.registered_outputs(),
        [("only_output".to_string(), echo_output())]
    );
}

#[test]
fn test_single_type_invocation_order() {
    let action = single_int_action();
    let domain = action.invocation_domain();
    // three values, every default, rotation
    assert_eq!(domain.len(), 5);
    for (invocation, value) in domain.iter().zip([-1, 0, 1]) {
        assert_eq!(args(invocation), [("single_int", &Argument::from(value))]);
    }

    assert_eq!(
        args(&domain[3]),
        [
            ("single_int", &Argument::from(1)),
            ("optional_single_int", &Argument::Value(Value::None)),
            ("default0_single_int", &Argument::from(-1)),
            ("default1_single_int", &Argument::from(0)),
            ("default2_single_int", &Argument::from(1)),
        ]
    );
}

#[test]
fn test_every_default_passes_own_defaults() {
    let action = single_int_action();
    let every_default = &action.invocation_domain()[3];
    for spec in &action.parameter_specs()[1..] {
        let passed = every_default.argument(&spec.name).unwrap();
        assert_eq!(passed.as_literal().as_ref(), spec.default.value());
    }

    let artifact = generate_single_type_methods(&artifact_params()).unwrap().remove(0);
    let every_default = &artifact.invocation_domain()[3];
    assert_eq!(every_default.arguments.len(), 2);
    assert_eq!(every_default.arguments[0].1, artifact.invocation_domain()[2].arguments[0].1);
    assert_eq!(
        every_default.argument("optional_simple_type1"),
        Some(&Argument::Value(Value::None))
    );
}

#[test]
fn test_rotation_scenario() {
    let action = single_int_action();
    let rotated = &action.invocation_domain()[4];
    assert_eq!(
        args(rotated),
        [
            ("single_int", &Argument::from(1)),
            ("optional_single_int", &Argument::from(1)),
            ("default0_single_int", &Argument::from(1)),
            ("default1_single_int", &Argument::from(-1)),
            ("default2_single_int", &Argument::from(0)),
        ]
    );
}

#[test]
fn test_semantic_and_metadata_skip_defaults() {
    for generator in [artifact_params(), metadata_params()] {
        for action in generate_single_type_methods(&generator).unwrap() {
            assert_eq!(action.parameter_specs().len(), 2, "{}", action.action_id());
        }
    }
}

#[test]
fn test_lifted_single_type_actions_build() {
    for generator in [
        list_paramgen(int_params()).unwrap(),
        set_paramgen(artifact_params()).unwrap(),
        collection_paramgen(int_params()).unwrap(),
    ] {
        let actions = generate_single_type_methods(&generator).unwrap();
        assert_eq!(actions.len(), generator.templates().len());
        assert!(actions[0].action_id().starts_with(generator.name()));
    }
}

#[test]
fn test_multiple_outputs() {
    let actions = generate_multiple_output_methods().unwrap();
    assert_eq!(actions.len(), 5);
    let three = &actions[2];
    assert_eq!(three.action_id(), "multiple_outputs_3");
    assert_eq!(
        three.output_names().collect::<Vec<_>>(),
        ["output1", "output2", "output3"]
    );
    assert!(three.parameter_specs().is_empty());
    assert_eq!(three.invocation_domain().len(), 1);
}

#[test]
fn test_output_collections() {
    let actions = generate_output_collection_methods().unwrap();
    let ids: Vec<&str> = actions.iter().map(|a| a.action_id()).collect();
    assert_eq!(ids, ["collection_only", "collection_first", "collection_second"]);
    assert_eq!(
        actions[2].registered_outputs()[1],
        (
            "output_collection".to_string(),
            TypeDescriptor::collection_of(echo_output())
        )
    );
}

#[test]
fn test_hand_built_type_maps() {
    let str_int = typemap_str_int().unwrap();
    assert_eq!(str_int.invocation_domain().len(), 2);

    let flag = typemap_bool_flag().unwrap();
    let last = flag.invocation_domain().last().unwrap();
    assert!(last.arguments.is_empty());
    assert_eq!(last.expected_outputs[0].1, echo_output_branch(3));
    assert_eq!(
        flag.spec("flag").unwrap().default,
        ParamDefault::Value(Value::from("auto"))
    );

    let artifacts = typemap_artifacts().unwrap();
    assert_eq!(artifacts.invocation_domain().len(), 8);
}

#[test]
fn test_the_matrix() {
    let generators = matrix_generators(&Filters::all());
    let actions = generate_the_matrix("typemap_the_matrix", &generators).unwrap();
    assert_eq!(actions.len(), 1 + generators.len());

    let matrix = &actions[0];
    // float_params is the widest generator
    assert_eq!(matrix.parameter_specs().len(), 7);
    // five rows need two output slots
    assert_eq!(matrix.output_names().collect::<Vec<_>>(), ["output1", "output2"]);
    assert_eq!(matrix.invocation_domain().len(), 5);

    let b = echo_output_branch;
    let expected: Vec<TypeDescriptor> = matrix.invocation_domain()[4]
        .expected_outputs
        .iter()
        .map(|(_, t)| t.clone())
        .collect();
    assert_eq!(expected, vec![b(2), b(2)]);

    let ids: Vec<&str> = actions[1..].iter().map(|a| a.action_id()).collect();
    assert_eq!(
        ids,
        [
            "typemap_the_matrix_reloaded",
            "typemap_the_matrix_revolutions",
            "typemap_the_matrix_resurrections",
            "typemap_the_matrix_5",
            "typemap_the_matrix_6",
        ]
    );
    for action in &actions[1..] {
        assert_eq!(action.invocation_domain().len(), 1);
        assert!(action.invocation_domain()[0].arguments.is_empty());
        assert!(action.parameter_specs().iter().all(|s| !s.is_required()));
    }
}

#[test]
fn test_lifted_matrices_build() {
    let generators = matrix_generators(&Filters::all());
    let lifts: [(&str, fn(ParamGenerator) -> Result<ParamGenerator, LiftError>); 3] = [
        ("typemap_lists", list_paramgen),
        ("typemap_sets", set_paramgen),
        ("typemap_collections", collection_paramgen),
    ];
    for (base, lift) in lifts {
        let lifted = generators
            .iter()
            .cloned()
            .map(lift)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let actions = generate_the_matrix(base, &lifted).unwrap();
        assert_eq!(actions[1].action_id(), format!("{base}_defaults1"));
    }
}

#[test]
fn test_degenerate_matrix_rejected() {
    let err = generate_the_matrix("typemap_the_matrix", &[int_params()]).unwrap_err();
    assert!(matches!(err, BuildError::DegenerateTypeMap { found: 1, .. }));
}

#[test]
fn test_overlapping_rows_rejected() {
    let err = generate_the_matrix("typemap_twins", &[int_params(), int_params()]).unwrap_err();
    assert!(matches!(
        err,
        BuildError::AmbiguousTypeMap { row: 1, resolved: Some(0), .. }
    ));
}

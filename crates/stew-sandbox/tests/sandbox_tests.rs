use stew_actions::single::generate_single_type_methods;
use stew_actions::typemap::typemap_str_int;
use stew_actions::outputs::generate_output_collection_methods;
use stew_echo::disguise;
use stew_gen::artifacts::{artifact_params, SINGLE_INT1_1};
use stew_gen::metadata::{METADATA1, METADATA2};
use stew_gen::primitive::int_params;
use stew_host::{ActionRegistry, HostError, InputRef, Registration, UsageDriver, UsageInput};
use stew_ir::format::{ECHO_FILE, SINGLE_INT_FILE};
use stew_ir::semantic::{
    echo_output, echo_output_branch, int_wrapper, output_branches, single_int1, single_int2,
    wrapped_int1, wrapped_int2,
};
use stew_ir::template::ActionTemplate;
use stew_ir::types::{SemanticType, TypeDescriptor, ViewType};
use stew_ir::value::Value;
use stew_sandbox::{ExecutionMode, Sandbox, SandboxConfig};

fn semantic_types() -> Vec<SemanticType> {
    let mut types = vec![
        single_int1(),
        single_int2(),
        wrapped_int1(),
        wrapped_int2(),
        int_wrapper(TypeDescriptor::artifact(wrapped_int1())),
    ];
    for ty in std::iter::once(echo_output()).chain(output_branches()) {
        if let TypeDescriptor::Artifact(semantic) = ty {
            types.push(semantic);
        }
    }
    types
}

fn prepared(mode: ExecutionMode) -> Sandbox {
    let mut sandbox = Sandbox::new(SandboxConfig::with_mode(mode));
    for ty in semantic_types() {
        sandbox.register_semantic_type(&ty).unwrap();
    }
    sandbox
        .register_format(&ViewType::SingleIntFormat.to_string(), SINGLE_INT_FILE)
        .unwrap();
    sandbox
        .register_transformer(ViewType::Int, ViewType::SingleIntFormat)
        .unwrap();
    sandbox
}

fn register(sandbox: &mut Sandbox, template: &ActionTemplate) -> Result<(), HostError> {
    sandbox.register_action(Registration {
        function: disguise(template),
        name: template.action_id().to_string(),
        description: String::new(),
        examples: Vec::new(),
    })
}

fn first_int_action() -> ActionTemplate {
    generate_single_type_methods(&int_params()).unwrap().remove(0)
}

#[test]
fn test_duplicate_action_rejected() {
    let mut sandbox = prepared(ExecutionMode::Sync);
    let template = first_int_action();
    register(&mut sandbox, &template).unwrap();
    assert!(matches!(
        register(&mut sandbox, &template),
        Err(HostError::DuplicateAction(id)) if id == "int_params_1"
    ));
    assert_eq!(sandbox.action_count(), 1);
}

#[test]
fn test_unregistered_semantic_type_rejected() {
    let mut sandbox = Sandbox::new(SandboxConfig::default());
    let result = register(&mut sandbox, &first_int_action());
    assert!(matches!(
        result,
        Err(HostError::UnknownSemanticType { name, .. }) if name == "EchoOutput"
    ));
}

#[test]
fn test_artifact_import_needs_format_and_transformer() {
    let mut bare = Sandbox::new(SandboxConfig::default());
    for ty in semantic_types() {
        bare.register_semantic_type(&ty).unwrap();
    }
    assert!(matches!(
        bare.session().init_artifact("a", SINGLE_INT1_1),
        Err(HostError::UnknownFormat(_))
    ));
    bare.register_format("SingleIntFormat", SINGLE_INT_FILE).unwrap();
    assert!(matches!(
        bare.session().init_artifact("a", SINGLE_INT1_1),
        Err(HostError::MissingTransformer { .. })
    ));
    bare.register_transformer(ViewType::Int, ViewType::SingleIntFormat)
        .unwrap();
    assert!(bare.session().init_artifact("a", SINGLE_INT1_1).is_ok());
}

#[test]
fn test_action_echoes_each_argument() {
    let mut sandbox = prepared(ExecutionMode::Sync);
    let template = first_int_action();
    register(&mut sandbox, &template).unwrap();

    let mut session = sandbox.session();
    let outputs = session
        .action(
            "int_params_1",
            vec![("single_int".into(), UsageInput::Value(Value::Int(-1)))],
            &[("only_output".into(), "out".into())],
        )
        .unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].name(), "out");
    outputs[0].assert_output_type(&echo_output()).unwrap();
    outputs[0]
        .assert_has_line_matching(ECHO_FILE, r#"^\["single_int",-1,"int"\]$"#)
        .unwrap();
    // An unpassed default is filled in by the host.
    outputs[0]
        .assert_has_line_matching(ECHO_FILE, r#"^\["optional_single_int",null,"none"\]$"#)
        .unwrap();
}

#[test]
fn test_action_type_checks_inputs() {
    let mut sandbox = prepared(ExecutionMode::Sync);
    register(&mut sandbox, &first_int_action()).unwrap();
    let mut session = sandbox.session();
    let bindings = [("only_output".to_string(), "out".to_string())];

    assert!(matches!(
        session.action(
            "int_params_1",
            vec![("single_int".into(), UsageInput::Value(Value::from("3")))],
            &bindings,
        ),
        Err(HostError::TypeMismatch { .. })
    ));
    assert!(matches!(
        session.action(
            "int_params_1",
            vec![("single_int".into(), UsageInput::Value(Value::None))],
            &bindings,
        ),
        Err(HostError::TypeMismatch { .. })
    ));
    assert!(matches!(
        session.action("int_params_1", vec![], &bindings),
        Err(HostError::MissingParameter { .. })
    ));
    assert!(matches!(
        session.action("nope", vec![], &bindings),
        Err(HostError::UnknownAction(_))
    ));
    assert!(matches!(
        session.action(
            "int_params_1",
            vec![("single_int".into(), UsageInput::Value(Value::Int(0)))],
            &[],
        ),
        Err(HostError::OutputBinding { .. })
    ));
}

#[test]
fn test_typemap_output_resolves_per_row() {
    for mode in [ExecutionMode::Sync, ExecutionMode::Async] {
        let mut sandbox = prepared(mode);
        register(&mut sandbox, &typemap_str_int().unwrap()).unwrap();
        let mut session = sandbox.session();
        let bindings = [("output".to_string(), "output".to_string())];

        let int_out = session
            .action(
                "typemap_str_int",
                vec![("param".into(), UsageInput::Value(Value::Int(1)))],
                &bindings,
            )
            .unwrap();
        int_out[0].assert_output_type(&echo_output_branch(1)).unwrap();

        let str_out = session
            .action(
                "typemap_str_int",
                vec![("param".into(), UsageInput::Value(Value::from("foo")))],
                &bindings,
            )
            .unwrap();
        str_out[0].assert_output_type(&echo_output_branch(2)).unwrap();
        assert!(str_out[0].assert_output_type(&echo_output_branch(1)).is_err());
    }
}

#[test]
fn test_artifact_records_round_trip_through_format() {
    let mut sandbox = prepared(ExecutionMode::Async);
    let templates = generate_single_type_methods(&artifact_params()).unwrap();
    register(&mut sandbox, &templates[0]).unwrap();
    let mut session = sandbox.session();

    let record = session.init_artifact("single_int1_1", SINGLE_INT1_1).unwrap();
    assert_eq!(record, InputRef::new("single_int1_1"));
    // Recording the same name twice keeps the first record.
    session.init_artifact("single_int1_1", SINGLE_INT1_1).unwrap();
    assert_eq!(session.record_count(), 1);

    let param = templates[0].parameter_specs()[0].name.clone();
    let outputs = session
        .action(
            templates[0].action_id(),
            vec![(param.clone(), UsageInput::Record(record))],
            &[("only_output".into(), "out".into())],
        )
        .unwrap();
    outputs[0]
        .assert_has_line_matching(ECHO_FILE, &format!(r#"^\["{param}",42,"int"\]$"#))
        .unwrap();
}

#[test]
fn test_metadata_records() {
    let sandbox = prepared(ExecutionMode::Sync);
    let mut session = sandbox.session();
    let md1 = session.init_metadata("metadata1", METADATA1).unwrap();
    let md2 = session.init_metadata("metadata2", METADATA2).unwrap();
    session.merge_metadata("metadata1_metadata2", &[md1.clone(), md2]).unwrap();
    assert!(matches!(
        session.merge_metadata("empty", &[]),
        Err(HostError::Metadata(_))
    ));
    assert!(matches!(
        session.get_metadata_column("x", "col1", &InputRef::new("missing")),
        Err(HostError::UnknownRecord(_))
    ));
    let column = session.get_metadata_column("metadata1_col1", "col1", &md1);
    assert!(column.is_ok());
    assert!(matches!(
        session.get_metadata_column("bogus", "col1", &column.unwrap()),
        Err(HostError::NotMetadata(_))
    ));
}

#[test]
fn test_collection_output_members() {
    let mut sandbox = prepared(ExecutionMode::Sync);
    let templates = generate_output_collection_methods().unwrap();
    for template in &templates {
        register(&mut sandbox, template).unwrap();
    }
    let mut session = sandbox.session();
    let outputs = session
        .action(
            "collection_second",
            vec![],
            &[
                ("output".into(), "output".into()),
                ("output_collection".into(), "output_collection".into()),
            ],
        )
        .unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].member_keys(), None);
    assert_eq!(
        outputs[1].member_keys(),
        Some(vec!["1".to_string(), "2".to_string()])
    );
    outputs[1]
        .member("2")
        .unwrap()
        .assert_has_line_matching(ECHO_FILE, "^2: 2$")
        .unwrap();
}

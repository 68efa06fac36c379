//! Registration driver.
//!
//! All templates are built before anything touches the registry, so a
//! configuration error leaves the host untouched.

use std::collections::HashSet;

use stew_actions::outputs::{generate_multiple_output_methods, generate_output_collection_methods};
use stew_actions::single::generate_single_type_methods;
use stew_actions::typemap::{
    generate_the_matrix, typemap_artifacts, typemap_bool_flag, typemap_str_int,
};
use stew_actions::BuildError;
use stew_echo::disguise;
use stew_gen::collections::{lift, Lift, LiftError};
use stew_gen::select::{get_param_generators, matrix_generators, Category, Filters, SelectError};
use stew_gen::ParamGenerator;
use stew_host::{ActionRegistry, HostError, Registration};
use stew_ir::format::SINGLE_INT_FILE;
use stew_ir::semantic::{
    echo_output, int_wrapper, output_branches, single_int1, single_int2, wrapped_int1,
    wrapped_int2,
};
use stew_ir::template::ActionTemplate;
use stew_ir::types::{SemanticType, TypeDescriptor, ViewType};
use stew_usage::usage_examples;

use crate::config::StewConfig;
use crate::report::{ActionSummary, RegistrationReport};

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Lift(#[from] LiftError),

    #[error("action id '{0}' is generated twice")]
    DuplicateAction(String),

    #[error("registration failed: {0}")]
    Host(#[from] HostError),
}

/// Lifted type-map matrices, registered when collections are on.
const LIFTED_MATRICES: [(&str, Lift); 3] = [
    ("typemap_lists", Lift::List),
    ("typemap_sets", Lift::Set),
    ("typemap_collections", Lift::Collection),
];

/// Every semantic type the generated actions mention.
pub fn semantic_types() -> Vec<SemanticType> {
    let mut types: Vec<SemanticType> = std::iter::once(echo_output())
        .chain(output_branches())
        .filter_map(|ty| match ty {
            TypeDescriptor::Artifact(semantic) => Some(semantic),
            _ => None,
        })
        .collect();
    types.extend([
        single_int1(),
        single_int2(),
        int_wrapper(
            TypeDescriptor::artifact(wrapped_int1()) | TypeDescriptor::artifact(wrapped_int2()),
        ),
        wrapped_int1(),
        wrapped_int2(),
    ]);
    types
}

/// Action templates in registration order: single-type actions per
/// generator, output-arity variants, then type maps.
pub fn build_templates(filters: &Filters) -> Result<Vec<ActionTemplate>, DriverError> {
    let mut templates = Vec::new();
    for generator in get_param_generators(filters)? {
        let built = generate_single_type_methods(&generator)?;
        tracing::debug!(generator = generator.name(), actions = built.len(), "built single-type actions");
        templates.extend(built);
    }
    templates.extend(generate_multiple_output_methods()?);
    templates.extend(generate_output_collection_methods()?);
    if filters.should_add(Category::Typemaps) {
        templates.extend(typemap_templates(filters)?);
    }
    check_unique(&templates)?;
    Ok(templates)
}

fn typemap_templates(filters: &Filters) -> Result<Vec<ActionTemplate>, DriverError> {
    let mut templates = Vec::new();
    if filters.should_add(Category::Strings) && filters.should_add(Category::Ints) {
        templates.push(typemap_str_int()?);
    }
    if filters.should_add(Category::Strings) && filters.should_add(Category::Bools) {
        templates.push(typemap_bool_flag()?);
    }
    if filters.should_add(Category::Artifacts) {
        templates.push(typemap_artifacts()?);
    }

    let base = matrix_generators(filters);
    push_matrix(&mut templates, "typemap_the_matrix", &base)?;
    if filters.should_add(Category::Collections) {
        for (action_id, kind) in LIFTED_MATRICES {
            let lifted = base
                .iter()
                .cloned()
                .map(|generator| lift(kind, generator))
                .collect::<Result<Vec<ParamGenerator>, LiftError>>()?;
            push_matrix(&mut templates, action_id, &lifted)?;
        }
    }
    Ok(templates)
}

fn push_matrix(
    templates: &mut Vec<ActionTemplate>,
    action_id: &str,
    generators: &[ParamGenerator],
) -> Result<(), DriverError> {
    match generate_the_matrix(action_id, generators) {
        Ok(built) => {
            templates.extend(built);
            Ok(())
        }
        Err(BuildError::DegenerateTypeMap { action, found }) => {
            tracing::debug!(action = %action, generators = found, "skipping degenerate type map");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub fn check_unique(templates: &[ActionTemplate]) -> Result<(), DriverError> {
    let mut seen = HashSet::new();
    for template in templates {
        if !seen.insert(template.action_id()) {
            return Err(DriverError::DuplicateAction(template.action_id().to_string()));
        }
    }
    Ok(())
}

fn describe(template: &ActionTemplate) -> String {
    format!(
        "Echoes {} parameter(s) into {} output(s) across {} example(s).",
        template.parameter_specs().len(),
        template.registered_outputs().len(),
        template.invocation_domain().len()
    )
}

/// Build every selected action and register it, with its echo body and
/// usage examples, on `registry`.
pub fn register_plugin(
    registry: &mut dyn ActionRegistry,
    config: &StewConfig,
) -> Result<RegistrationReport, DriverError> {
    let filters = config.selection()?;
    let templates = build_templates(&filters)?;

    let mut report = RegistrationReport::new(config.plugin.clone());
    for semantic_type in semantic_types() {
        registry.register_semantic_type(&semantic_type)?;
        report.semantic_types.push(semantic_type.to_string());
    }
    registry.register_format(&ViewType::SingleIntFormat.to_string(), SINGLE_INT_FILE)?;
    registry.register_transformer(ViewType::Int, ViewType::SingleIntFormat)?;

    for template in &templates {
        let examples = usage_examples(template);
        report.actions.push(ActionSummary::of(template, examples.len()));
        registry.register_action(Registration {
            function: disguise(template),
            name: template.action_id().replace('_', " "),
            description: describe(template),
            examples,
        })?;
    }

    tracing::info!(
        plugin = %config.plugin.name,
        actions = report.actions.len(),
        examples = report.example_count(),
        "registered plugin"
    );
    Ok(report)
}

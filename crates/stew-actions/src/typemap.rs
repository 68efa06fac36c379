//! Type-map actions.
//!
//! The hand-built maps exercise one dispatching parameter each. The matrix
//! wires several generators through one map: row `i` takes generator `i`'s
//! templates (cycled to the widest generator) as its input types and the
//! `i`-th branch combination as its outputs.
//!
//! ```text
//! (param1,  param2,          paramL)  --> (output1,  output2)
//!  Int,     Int % Range,     ...       |   Branch1,  Branch1
//!  Bool,    Bool % Choices,  ...       |   Branch1,  Branch2
//!  Float,   Float % Range,   ...       |   Branch1,  Branch3
//!  ...                                 |   Branch2,  Branch1
//! ```

use std::sync::Arc;

use stew_gen::artifacts::{
    SINGLE_INT1_1, SINGLE_INT1_2, SINGLE_INT2_1, SINGLE_INT2_2, WRAPPED_INT1_1, WRAPPED_INT1_2,
    WRAPPED_INT2_1, WRAPPED_INT2_2,
};
use stew_gen::ParamGenerator;
use stew_ir::argument::Argument;
use stew_ir::semantic::{
    echo_output_branch, int_wrapper, output_branches, single_int1, single_int2, wrapped_int1,
    wrapped_int2, OUTPUT_BRANCHES,
};
use stew_ir::template::{ActionTemplate, Invocation, ParamDefault, ParamSpec};
use stew_ir::typemap::{TypeMap, TypeMapRow};
use stew_ir::types::{TypeDescriptor, ViewType};
use stew_ir::value::Value;

use crate::BuildError;

const OUTPUT: &str = "output";

/// Smallest `s >= 1` with `OUTPUT_BRANCHES^s >= rows`.
pub fn output_slots(rows: usize) -> usize {
    let mut slots = 1;
    let mut capacity = OUTPUT_BRANCHES;
    while capacity < rows {
        slots += 1;
        capacity = capacity.saturating_mul(OUTPUT_BRANCHES);
    }
    slots
}

/// The `idx`-th element of the branch product over `slots` slots, last slot
/// varying fastest.
fn branch_combination(idx: usize, slots: usize) -> Vec<TypeDescriptor> {
    let branches = output_branches();
    let mut digits = vec![0; slots];
    let mut rest = idx;
    for digit in digits.iter_mut().rev() {
        *digit = rest % OUTPUT_BRANCHES;
        rest /= OUTPUT_BRANCHES;
    }
    digits.into_iter().map(|d| branches[d].clone()).collect()
}

// ── Hand-built maps ──────────────────────────────────────────────────

fn one_parameter_map(
    action_id: &str,
    rows: Vec<(TypeDescriptor, TypeDescriptor)>,
    param: &str,
    view_type: ViewType,
    default: ParamDefault,
    invocations: Vec<(Option<Argument>, TypeDescriptor)>,
) -> Result<ActionTemplate, BuildError> {
    let map = TypeMap::new(
        rows.into_iter()
            .map(|(input, output)| TypeMapRow {
                inputs: vec![input],
                outputs: vec![output],
            })
            .collect(),
    )?;
    let (t_in, t_out) = single_variables(&map);

    let spec = ParamSpec::new(param, t_in, view_type, default);
    let domain = invocations
        .into_iter()
        .map(|(arg, expected)| {
            let arguments = arg.map(|a| (param.to_string(), a)).into_iter().collect();
            Invocation::new(arguments, vec![(OUTPUT.to_string(), expected)])
        })
        .collect();

    Ok(ActionTemplate::new(
        action_id,
        vec![spec],
        vec![(OUTPUT.to_string(), t_out)],
        domain,
    )?)
}

fn single_variables(map: &Arc<TypeMap>) -> (TypeDescriptor, TypeDescriptor) {
    let mut inputs = map.input_variables();
    let mut outputs = map.output_variables();
    (inputs.remove(0), outputs.remove(0))
}

/// `Int -> Branch1`, `Str -> Branch2`.
pub fn typemap_str_int() -> Result<ActionTemplate, BuildError> {
    one_parameter_map(
        "typemap_str_int",
        vec![
            (TypeDescriptor::int(), echo_output_branch(1)),
            (TypeDescriptor::string(), echo_output_branch(2)),
        ],
        "param",
        ViewType::Union(vec![ViewType::Int, ViewType::Str]),
        ParamDefault::NoDefault,
        vec![
            (Some(Argument::from(1)), echo_output_branch(1)),
            (Some(Argument::from("foo")), echo_output_branch(2)),
        ],
    )
}

/// A flag that is `true`, `false` or `"auto"`, defaulting to `"auto"`.
pub fn typemap_bool_flag() -> Result<ActionTemplate, BuildError> {
    one_parameter_map(
        "typemap_bool_flag",
        vec![
            (
                TypeDescriptor::boolean().choices([Value::Bool(true)]),
                echo_output_branch(1),
            ),
            (
                TypeDescriptor::boolean().choices([Value::Bool(false)]),
                echo_output_branch(2),
            ),
            (
                TypeDescriptor::string().choices([Value::from("auto")]),
                echo_output_branch(3),
            ),
        ],
        "flag",
        ViewType::Union(vec![ViewType::Bool, ViewType::Str]),
        ParamDefault::Value(Value::from("auto")),
        vec![
            (Some(Argument::from(true)), echo_output_branch(1)),
            (Some(Argument::from(false)), echo_output_branch(2)),
            (Some(Argument::from("auto")), echo_output_branch(3)),
            (None, echo_output_branch(3)),
        ],
    )
}

pub fn typemap_artifacts() -> Result<ActionTemplate, BuildError> {
    let wrapped = TypeDescriptor::artifact(int_wrapper(
        TypeDescriptor::artifact(wrapped_int1()) | TypeDescriptor::artifact(wrapped_int2()),
    ));
    let invocations = [
        (SINGLE_INT1_1, 1),
        (SINGLE_INT1_2, 1),
        (SINGLE_INT2_1, 2),
        (SINGLE_INT2_2, 2),
        (WRAPPED_INT1_1, 3),
        (WRAPPED_INT1_2, 3),
        (WRAPPED_INT2_1, 3),
        (WRAPPED_INT2_2, 3),
    ]
    .into_iter()
    .map(|(factory, branch)| (Some(Argument::from(factory)), echo_output_branch(branch)))
    .collect();

    one_parameter_map(
        "typemap_artifacts",
        vec![
            (TypeDescriptor::artifact(single_int1()), echo_output_branch(1)),
            (TypeDescriptor::artifact(single_int2()), echo_output_branch(2)),
            (wrapped, echo_output_branch(3)),
        ],
        "input",
        ViewType::SingleIntFormat,
        ParamDefault::NoDefault,
        invocations,
    )
}

// ── The matrix ───────────────────────────────────────────────────────

fn defaults_action_id(base: &str, idx: usize) -> String {
    if base == "typemap_the_matrix" {
        match idx {
            0 => "typemap_the_matrix_reloaded".to_string(),
            1 => "typemap_the_matrix_revolutions".to_string(),
            2 => "typemap_the_matrix_resurrections".to_string(),
            _ => format!("typemap_the_matrix_{}", idx + 2),
        }
    } else {
        format!("{base}_defaults{}", idx + 1)
    }
}

fn union_view(views: Vec<ViewType>) -> ViewType {
    let mut distinct: Vec<ViewType> = Vec::new();
    for view in views {
        if !distinct.contains(&view) {
            distinct.push(view);
        }
    }
    if distinct.len() == 1 {
        distinct.remove(0)
    } else {
        ViewType::Union(distinct)
    }
}

/// One action with one invocation per generator, followed by one action
/// per generator whose parameters default to that generator's row.
pub fn generate_the_matrix(
    action_base_id: &str,
    generators: &[ParamGenerator],
) -> Result<Vec<ActionTemplate>, BuildError> {
    if generators.len() < 2 {
        return Err(BuildError::DegenerateTypeMap {
            action: action_base_id.to_string(),
            found: generators.len(),
        });
    }

    let selected: Vec<_> = generators.iter().map(ParamGenerator::templates).collect();
    for (generator, templates) in generators.iter().zip(&selected) {
        if templates.is_empty() {
            return Err(BuildError::EmptyGenerator(generator.name().to_string()));
        }
    }
    let longest = selected.iter().map(Vec::len).max().unwrap_or(0);
    let slots = output_slots(selected.len());

    // Row-major: rows are generators, columns are cycled templates.
    let mut row_types = Vec::with_capacity(selected.len());
    let mut row_values = Vec::with_capacity(selected.len());
    for templates in &selected {
        let mut types = Vec::with_capacity(longest);
        let mut values = Vec::with_capacity(longest);
        for template in templates.iter().cycle().take(longest) {
            let value = template
                .first()
                .cloned()
                .ok_or_else(|| BuildError::EmptyDomain(template.base_name.clone()))?;
            types.push(template.logical_type.clone());
            values.push(value);
        }
        row_types.push(types);
        row_values.push(values);
    }
    let views: Vec<ViewType> = (0..longest)
        .map(|col| {
            union_view(
                selected
                    .iter()
                    .map(|templates| templates[col % templates.len()].view_type.clone())
                    .collect(),
            )
        })
        .collect();

    let combinations: Vec<Vec<TypeDescriptor>> = (0..selected.len())
        .map(|row| branch_combination(row, slots))
        .collect();
    let map = TypeMap::new(
        row_types
            .into_iter()
            .zip(&combinations)
            .map(|(inputs, outputs)| TypeMapRow {
                inputs,
                outputs: outputs.clone(),
            })
            .collect(),
    )?;

    for (row, values) in row_values.iter().enumerate() {
        let realized = values
            .iter()
            .map(Argument::preview)
            .collect::<Result<Vec<_>, _>>()?;
        let resolved = map.resolve(&realized);
        if resolved != Some(row) {
            return Err(BuildError::AmbiguousTypeMap {
                action: action_base_id.to_string(),
                row,
                resolved,
            });
        }
    }

    let param_names: Vec<String> = (1..=longest).map(|j| format!("param{j}")).collect();
    let t_inputs = map.input_variables();
    let registered_outputs: Vec<(String, TypeDescriptor)> = map
        .output_variables()
        .into_iter()
        .enumerate()
        .map(|(idx, var)| (format!("output{}", idx + 1), var))
        .collect();

    let expected = |row: usize| -> Vec<(String, TypeDescriptor)> {
        registered_outputs
            .iter()
            .zip(&combinations[row])
            .map(|((name, _), branch)| (name.clone(), branch.clone()))
            .collect()
    };

    let specs: Vec<ParamSpec> = param_names
        .iter()
        .zip(&t_inputs)
        .zip(&views)
        .map(|((name, var), view)| {
            ParamSpec::new(name.clone(), var.clone(), view.clone(), ParamDefault::NoDefault)
        })
        .collect();
    let invocations = row_values
        .iter()
        .enumerate()
        .map(|(row, values)| {
            Invocation::new(
                param_names.iter().cloned().zip(values.iter().cloned()).collect(),
                expected(row),
            )
        })
        .collect();

    let mut actions = vec![ActionTemplate::new(
        action_base_id,
        specs.clone(),
        registered_outputs.clone(),
        invocations,
    )?];

    for (row, values) in row_values.iter().enumerate() {
        let defaulted = specs
            .iter()
            .zip(values)
            .enumerate()
            .map(|(index, (spec, value))| {
                let value = value.as_literal().ok_or_else(|| BuildError::NonLiteralDefault {
                    template: spec.name.clone(),
                    index,
                })?;
                Ok(ParamSpec {
                    default: ParamDefault::Value(value),
                    ..spec.clone()
                })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;
        actions.push(ActionTemplate::new(
            defaults_action_id(action_base_id, row),
            defaulted,
            registered_outputs.clone(),
            vec![Invocation::new(Vec::new(), expected(row))],
        )?);
    }

    Ok(actions)
}

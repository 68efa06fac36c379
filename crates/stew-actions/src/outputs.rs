//! Parameterless actions that vary only in output arity and shape.

use stew_ir::semantic::echo_output;
use stew_ir::template::{ActionTemplate, Invocation};
use stew_ir::types::TypeDescriptor;

use crate::BuildError;

pub const MAX_OUTPUTS: usize = 5;

fn no_argument_action(
    action_id: &str,
    outputs: Vec<(String, TypeDescriptor)>,
) -> Result<ActionTemplate, BuildError> {
    let invocation = Invocation::new(Vec::new(), outputs.clone());
    Ok(ActionTemplate::new(action_id, Vec::new(), outputs, vec![invocation])?)
}

/// `multiple_outputs_1` .. `multiple_outputs_5`.
pub fn generate_multiple_output_methods() -> Result<Vec<ActionTemplate>, BuildError> {
    (1..=MAX_OUTPUTS)
        .map(|count| {
            let outputs = (1..=count)
                .map(|idx| (format!("output{idx}"), echo_output()))
                .collect();
            no_argument_action(&format!("multiple_outputs_{count}"), outputs)
        })
        .collect()
}

pub fn generate_output_collection_methods() -> Result<Vec<ActionTemplate>, BuildError> {
    let collection = || ("output_collection".to_string(), TypeDescriptor::collection_of(echo_output()));
    let single = || ("output".to_string(), echo_output());
    Ok(vec![
        no_argument_action(
            "collection_only",
            vec![("output".to_string(), TypeDescriptor::collection_of(echo_output()))],
        )?,
        no_argument_action("collection_first", vec![collection(), single()])?,
        no_argument_action("collection_second", vec![single(), collection()])?,
    ])
}

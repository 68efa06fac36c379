//! Single-type actions: one required parameter, one optional parameter and,
//! for primitive shapes, one defaulted parameter per domain value.

use stew_gen::ParamGenerator;
use stew_ir::argument::Argument;
use stew_ir::semantic::echo_output;
use stew_ir::template::{ActionTemplate, Invocation, ParamDefault, ParamTemplate};
use stew_ir::value::Value;

use crate::{BuildError, ONLY_OUTPUT};

/// One action per template, named `{generator}_{n}` with `n` 1-based.
pub fn generate_single_type_methods(
    generator: &ParamGenerator,
) -> Result<Vec<ActionTemplate>, BuildError> {
    generator
        .templates()
        .iter()
        .enumerate()
        .map(|(idx, param)| single_type_action(format!("{}_{}", generator.name(), idx + 1), param))
        .collect()
}

pub fn single_type_action(
    action_id: String,
    param: &ParamTemplate,
) -> Result<ActionTemplate, BuildError> {
    let last = param
        .last()
        .cloned()
        .ok_or_else(|| BuildError::EmptyDomain(param.base_name.clone()))?;
    let outputs = vec![(ONLY_OUTPUT.to_string(), echo_output())];

    let primary = param.mint_spec("", ParamDefault::NoDefault);
    let optional = param.mint_spec("optional_", ParamDefault::Value(Value::None));

    // Explicit arguments equal to each default.
    let mut defaults = vec![(optional.name.clone(), Argument::Value(Value::None))];
    let mut specs = vec![primary, optional];

    let lt = &param.logical_type;
    if !lt.is_metadata() && !lt.is_semantic() {
        for (index, arg) in param.domain.iter().enumerate() {
            let value = arg.as_literal().ok_or_else(|| BuildError::NonLiteralDefault {
                template: param.base_name.clone(),
                index,
            })?;
            let spec = param.mint_spec(&format!("default{index}_"), ParamDefault::Value(value.clone()));
            defaults.push((spec.name.clone(), Argument::Value(value)));
            specs.push(spec);
        }
    }

    let primary_name = specs[0].name.clone();
    let mut domain: Vec<Invocation> = param
        .domain
        .iter()
        .map(|arg| Invocation::new(vec![(primary_name.clone(), arg.clone())], outputs.clone()))
        .collect();

    let mut every_default = vec![(primary_name, last.clone())];
    every_default.extend(defaults);
    domain.push(Invocation::new(every_default, outputs.clone()));

    if param.domain.len() > 1 {
        let mut shifted = vec![last.clone(), last];
        shifted.extend(param.domain.iter().cloned());
        shifted.rotate_right(1);
        let rotated = specs
            .iter()
            .map(|spec| spec.name.clone())
            .zip(shifted)
            .collect();
        domain.push(Invocation::new(rotated, outputs.clone()));
    }

    Ok(ActionTemplate::new(action_id, specs, outputs, domain)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stew_ir::types::{TypeDescriptor, ViewType};

    fn names(invocation: &Invocation) -> Vec<&str> {
        invocation.arguments.iter().map(|(n, _)| n.as_str()).collect()
    }

    #[test]
    fn test_single_value_domain_has_no_rotation() {
        let param = ParamTemplate::new(
            "flag",
            TypeDescriptor::boolean(),
            ViewType::Bool,
            [Argument::from(true)],
        );
        let action = single_type_action("bools_1".into(), &param).unwrap();
        assert_eq!(action.invocation_domain().len(), 2);
        assert_eq!(
            names(&action.invocation_domain()[1]),
            ["flag", "optional_flag", "default0_flag"]
        );
    }
}

//! Primitive parameter shapes.
//!
//! Range domains sit on both sides of zero and as close to each bound as
//! the bound allows: the bound itself when inclusive, one step inside when
//! exclusive (1 for ints, 0.01 for floats).

use stew_ir::argument::Argument;
use stew_ir::template::ParamTemplate;
use stew_ir::types::{Range, TypeDescriptor, ViewType};
use stew_ir::value::Value;

use crate::ParamGenerator;

/// Strings a host might be tempted to coerce.
pub const MEAN_STRINGS: [&str; 5] = ["None", "-1", "True", "False", "<[^#^]>"];

pub fn int_params() -> ParamGenerator {
    ParamGenerator::new("int_params", int_templates)
}

pub fn float_params() -> ParamGenerator {
    ParamGenerator::new("float_params", float_templates)
}

pub fn string_params() -> ParamGenerator {
    ParamGenerator::new("string_params", string_templates)
}

pub fn bool_params() -> ParamGenerator {
    ParamGenerator::new("bool_params", bool_templates)
}

pub fn primitive_union_params() -> ParamGenerator {
    ParamGenerator::new("primitive_union_params", primitive_union_templates)
}

fn ints(values: &[i64]) -> Vec<Argument> {
    values.iter().map(|&v| Argument::from(v)).collect()
}

fn floats(values: &[f64]) -> Vec<Argument> {
    values.iter().map(|&v| Argument::from(v)).collect()
}

fn int_template(name: &str, range: Option<Range>, values: &[i64]) -> ParamTemplate {
    let ty = match range {
        Some(range) => TypeDescriptor::int().range(range),
        None => TypeDescriptor::int(),
    };
    ParamTemplate::new(name, ty, ViewType::Int, ints(values))
}

fn float_template(name: &str, range: Option<Range>, values: &[f64]) -> ParamTemplate {
    let ty = match range {
        Some(range) => TypeDescriptor::float().range(range),
        None => TypeDescriptor::float(),
    };
    ParamTemplate::new(name, ty, ViewType::Float, floats(values))
}

fn int_templates() -> Vec<ParamTemplate> {
    let two_sided = || Range::between(-3.0, 4.0);
    vec![
        int_template("single_int", None, &[-1, 0, 1]),
        int_template("int_range_1_param", Some(Range::until(3.0)), &[-42, 0, 2]),
        int_template(
            "int_range_1_param_i_e",
            Some(Range::until(3.0).inclusive_end()),
            &[-43, 0, 3],
        ),
        int_template("int_range_2_params", Some(two_sided()), &[-3, 0, 3]),
        int_template(
            "int_range_2_params_i_e",
            Some(two_sided().inclusive_end()),
            &[-3, 0, 4],
        ),
        int_template(
            "int_range_2_params_no_i",
            Some(two_sided().exclusive_start()),
            &[-2, 0, 3],
        ),
        int_template(
            "int_range_2_params_i_e_ex_s",
            Some(two_sided().exclusive_start().inclusive_end()),
            &[-2, 0, 4],
        ),
    ]
}

fn float_templates() -> Vec<ParamTemplate> {
    let two_sided = || Range::between(-3.5, 3.5);
    vec![
        float_template("single_float", None, &[-1.5, 0.0, 1.5]),
        float_template("float_range_1_param", Some(Range::until(2.5)), &[-42.5, 0.0, 2.49]),
        float_template(
            "float_range_1_param_i_e",
            Some(Range::until(2.5).inclusive_end()),
            &[-42.5, 0.0, 2.5],
        ),
        float_template("float_range_2_params", Some(two_sided()), &[-3.5, 0.0, 3.49]),
        float_template(
            "float_range_2_params_i_e",
            Some(two_sided().inclusive_end()),
            &[-3.5, 0.0, 3.5],
        ),
        float_template(
            "float_range_2_params_no_i",
            Some(two_sided().exclusive_start()),
            &[-3.49, 0.0, 3.49],
        ),
        float_template(
            "float_range_2_params_i_e_ex_s",
            Some(two_sided().exclusive_start().inclusive_end()),
            &[-3.49, 0.0, 3.5],
        ),
    ]
}

fn string_templates() -> Vec<ParamTemplate> {
    let domain = || MEAN_STRINGS.iter().map(|&s| Argument::from(s));
    vec![
        ParamTemplate::new("string", TypeDescriptor::string(), ViewType::Str, domain()),
        ParamTemplate::new(
            "string_choices",
            TypeDescriptor::string().choices(MEAN_STRINGS.iter().map(|&s| Value::from(s))),
            ViewType::Str,
            domain(),
        ),
    ]
}

fn bool_templates() -> Vec<ParamTemplate> {
    let choices = |values: &[bool]| {
        TypeDescriptor::boolean().choices(values.iter().map(|&b| Value::Bool(b)))
    };
    let domain = |values: &[bool]| values.iter().map(|&b| Argument::from(b)).collect::<Vec<_>>();
    vec![
        ParamTemplate::new("boolean", TypeDescriptor::boolean(), ViewType::Bool, domain(&[true, false])),
        ParamTemplate::new("boolean_true", choices(&[true]), ViewType::Bool, domain(&[true])),
        ParamTemplate::new("boolean_false", choices(&[false]), ViewType::Bool, domain(&[false])),
        ParamTemplate::new(
            "boolean_choice",
            choices(&[true, false]),
            ViewType::Bool,
            domain(&[true, false]),
        ),
    ]
}

fn primitive_union_templates() -> Vec<ParamTemplate> {
    let disjoint = TypeDescriptor::int().range(Range::between(5.0, 10.0))
        | TypeDescriptor::int().range(Range::between(15.0, 20.0));

    let auto_int = TypeDescriptor::int().range(Range::at_least(1.0))
        | TypeDescriptor::string().choices([Value::from("auto")]);

    let kitchen_sink = TypeDescriptor::float().range(Range::between(0.0, 1.0))
        | TypeDescriptor::int()
        | TypeDescriptor::string().choices([Value::from("auto"), Value::from("Beef")])
        | TypeDescriptor::boolean()
        | TypeDescriptor::float().range(Range::between(10.0, 11.0));

    vec![
        ParamTemplate::new("disjoint", disjoint, ViewType::Int, ints(&[5, 9, 15, 19])),
        ParamTemplate::new(
            "auto_int",
            auto_int,
            ViewType::Object,
            [Argument::from(1), Argument::from(10), Argument::from("auto")],
        ),
        ParamTemplate::new(
            "kitchen_sink",
            kitchen_sink,
            ViewType::Object,
            [
                Argument::from(0.5),
                Argument::from(1000),
                Argument::from("Beef"),
                Argument::from("auto"),
                Argument::from(true),
                Argument::from(false),
                Argument::from(10.103),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_range_1_param_stays_below_its_end() {
        let templates = int_params().templates();
        let template = templates
            .iter()
            .find(|t| t.base_name == "int_range_1_param")
            .unwrap();
        assert!(template.logical_type.accepts(&Value::Int(2)));
        assert!(!template.domain.contains(&Argument::from(3)));
        assert!(template.domain.contains(&Argument::from(2)));
    }

    #[test]
    fn test_every_primitive_domain_validates() {
        for generator in [
            int_params(),
            float_params(),
            string_params(),
            bool_params(),
            primitive_union_params(),
        ] {
            for template in generator.templates() {
                template
                    .validate()
                    .unwrap_or_else(|e| panic!("{}: {e}", generator.name()));
            }
        }
    }
}

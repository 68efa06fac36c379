use std::collections::BTreeMap;

use stew_gen::artifacts::artifact_params;
use stew_gen::collections::{collection_paramgen, list_paramgen, set_paramgen, LiftError};
use stew_gen::metadata::metadata_params;
use stew_gen::primitive::{bool_params, float_params, int_params};
use stew_gen::select::{get_param_generators, matrix_generators, Category, Filters, SelectError};
use stew_ir::argument::Argument;
use stew_ir::types::{Range, TypeDescriptor, ViewType};
use stew_ir::value::Value;

fn combinations(k: usize) -> usize {
    k * k.saturating_sub(1) / 2
}

#[test]
fn test_generators_are_restartable() {
    let generators = get_param_generators(&Filters::all()).unwrap();
    for generator in &generators {
        assert_eq!(generator.templates(), generator.templates(), "{}", generator.name());
    }
}

#[test]
fn test_numeric_domains_respect_ranges() {
    for generator in [int_params(), float_params()] {
        for template in generator.templates() {
            for arg in &template.domain {
                let value = arg.as_literal().unwrap();
                assert!(
                    template.logical_type.accepts(&value),
                    "{} rejects {value}",
                    template.base_name
                );
            }
        }
    }
}

#[test]
fn test_inclusive_bounds_are_hit() {
    let templates = int_params().templates();
    let i_e = templates.iter().find(|t| t.base_name == "int_range_2_params_i_e").unwrap();
    assert_eq!(i_e.last(), Some(&Argument::from(4)));
    assert!(!TypeDescriptor::int().range(Range::between(-3.0, 4.0)).accepts(&Value::Int(4)));
}

#[test]
fn test_lifting_counts() {
    for generator in [int_params(), bool_params(), artifact_params()] {
        let base = generator.templates();
        let lifted = list_paramgen(generator.clone()).unwrap().templates();
        assert_eq!(base.len(), lifted.len());
        for (b, l) in base.iter().zip(&lifted) {
            let k = b.domain.len();
            assert_eq!(l.domain.len(), k + combinations(k).min(2) + 1, "{}", l.base_name);
            assert_eq!(l.base_name, format!("{}_list", b.base_name));
        }
    }
}

#[test]
fn test_lift_single_element_domain() {
    let lifted = set_paramgen(bool_params()).unwrap().templates();
    let boolean_true = lifted.iter().find(|t| t.base_name == "boolean_true_set").unwrap();
    assert_eq!(
        boolean_true.domain,
        vec![
            Argument::Set(vec![Argument::from(true)]),
            Argument::Set(vec![Argument::from(true)]),
        ]
    );
    assert_eq!(boolean_true.view_type, ViewType::Set);
}

#[test]
fn test_collection_lift_keys_by_position() {
    let lifted = collection_paramgen(int_params()).unwrap();
    assert_eq!(lifted.name(), "collection_int_params");
    let first = &lifted.templates()[0];
    assert_eq!(first.base_name, "single_int_collection");
    assert!(first.logical_type.is_collection());
    assert_eq!(
        first.domain.last(),
        Some(&Argument::Dict(vec![
            ("0".into(), Argument::from(-1)),
            ("1".into(), Argument::from(0)),
            ("2".into(), Argument::from(1)),
        ]))
    );
    for template in lifted.templates() {
        template.validate().unwrap();
    }
}

#[test]
fn test_semantic_lift_keeps_view() {
    for template in list_paramgen(artifact_params()).unwrap().templates() {
        assert_eq!(template.view_type, ViewType::SingleIntFormat);
        template.validate().unwrap();
    }
}

#[test]
fn test_metadata_cannot_be_lifted() {
    let err = list_paramgen(metadata_params()).unwrap_err();
    assert!(matches!(err, LiftError::Metadata(name) if name == "metadata_params"));
}

#[test]
fn test_no_filters_selects_everything() {
    let generators = get_param_generators(&Filters::all()).unwrap();
    // six liftable categories with three lifts each, plus metadata
    assert_eq!(generators.len(), 6 * 4 + 1);
    assert!(!generators.iter().any(|g| g.name() == "list_metadata_params"));
}

#[test]
fn test_filters_select_categories() {
    let generators = get_param_generators(&Filters::only([Category::Ints])).unwrap();
    let names: Vec<&str> = generators.iter().map(|g| g.name()).collect();
    assert_eq!(names, ["int_params"]);

    let generators =
        get_param_generators(&Filters::only([Category::Bools, Category::Collections])).unwrap();
    let names: Vec<&str> = generators.iter().map(|g| g.name()).collect();
    assert_eq!(
        names,
        ["bool_params", "list_bool_params", "set_bool_params", "collection_bool_params"]
    );
}

#[test]
fn test_unknown_filter_rejected() {
    let map = BTreeMap::from([("doubles".to_string(), true)]);
    assert!(matches!(Filters::from_map(&map), Err(SelectError::UnknownFilter(name)) if name == "doubles"));
}

#[test]
fn test_all_false_filters_rejected() {
    let map = BTreeMap::from([("ints".to_string(), false), ("typemaps".to_string(), true)]);
    let filters = Filters::from_map(&map).unwrap();
    assert!(matches!(get_param_generators(&filters), Err(SelectError::NothingSelected)));
}

#[test]
fn test_matrix_generator_order() {
    let names: Vec<String> = matrix_generators(&Filters::all())
        .iter()
        .map(|g| g.name().to_string())
        .collect();
    assert_eq!(
        names,
        ["int_params", "bool_params", "float_params", "string_params", "primitive_union_params"]
    );
}

//! Single-integer artifacts.
//!
//! Every factory goes through the on-disk format so a malformed payload
//! fails where it is produced.

use stew_ir::argument::Argument;
use stew_ir::format::SingleIntFormat;
use stew_ir::semantic::{int_wrapper, single_int1, single_int2, wrapped_int1, wrapped_int2};
use stew_ir::template::ParamTemplate;
use stew_ir::types::{SemanticType, TypeDescriptor, ViewType};
use stew_ir::value::{Artifact, Factory, FactoryError};

use crate::ParamGenerator;

fn import(semantic_type: SemanticType, value: i64) -> Result<Artifact, FactoryError> {
    Ok(Artifact::from_format(semantic_type, &SingleIntFormat::write(value))?)
}

fn wrapped1() -> SemanticType {
    int_wrapper(TypeDescriptor::artifact(wrapped_int1()))
}

fn wrapped2() -> SemanticType {
    int_wrapper(TypeDescriptor::artifact(wrapped_int2()))
}

macro_rules! artifact_factory {
    ($konst:ident, $name:ident, $semantic:expr, $value:expr) => {
        fn $name() -> Result<Artifact, FactoryError> {
            import($semantic, $value)
        }
        pub const $konst: Factory<Artifact> = Factory::new(stringify!($name), $name);
    };
}

artifact_factory!(SINGLE_INT1_1, single_int1_1, single_int1(), 42);
artifact_factory!(SINGLE_INT1_2, single_int1_2, single_int1(), 43);
artifact_factory!(SINGLE_INT1_3, single_int1_3, single_int1(), 44);
artifact_factory!(SINGLE_INT2_1, single_int2_1, single_int2(), 2019);
artifact_factory!(SINGLE_INT2_2, single_int2_2, single_int2(), 2020);
artifact_factory!(SINGLE_INT2_3, single_int2_3, single_int2(), 2021);
artifact_factory!(WRAPPED_INT1_1, wrapped_int1_1, wrapped1(), 11);
artifact_factory!(WRAPPED_INT1_2, wrapped_int1_2, wrapped1(), 12);
artifact_factory!(WRAPPED_INT2_1, wrapped_int2_1, wrapped2(), 21);
artifact_factory!(WRAPPED_INT2_2, wrapped_int2_2, wrapped2(), 22);

pub fn artifact_params() -> ParamGenerator {
    ParamGenerator::new("artifact_params", artifact_templates)
}

fn template(name: &str, ty: TypeDescriptor, factories: &[Factory<Artifact>]) -> ParamTemplate {
    ParamTemplate::new(
        name,
        ty,
        ViewType::SingleIntFormat,
        factories.iter().map(|&f| Argument::from(f)),
    )
}

fn artifact_templates() -> Vec<ParamTemplate> {
    let wrapped_field =
        TypeDescriptor::artifact(wrapped_int1()) | TypeDescriptor::artifact(wrapped_int2());
    vec![
        template(
            "simple_type1",
            TypeDescriptor::artifact(single_int1()),
            &[SINGLE_INT1_1, SINGLE_INT1_2, SINGLE_INT1_3],
        ),
        template(
            "simple_type2",
            TypeDescriptor::artifact(single_int2()),
            &[SINGLE_INT2_1, SINGLE_INT2_2, SINGLE_INT2_3],
        ),
        template(
            "union_type",
            TypeDescriptor::artifact(single_int1()) | TypeDescriptor::artifact(single_int2()),
            &[SINGLE_INT1_1, SINGLE_INT2_1, SINGLE_INT2_2, SINGLE_INT1_3],
        ),
        template(
            "wrapped_type",
            TypeDescriptor::artifact(int_wrapper(wrapped_field)),
            &[WRAPPED_INT1_1, WRAPPED_INT2_1, WRAPPED_INT2_2],
        ),
    ]
}

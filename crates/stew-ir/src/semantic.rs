//! Semantic types the plugin registers with the host.

use crate::types::{SemanticType, TypeDescriptor};

/// Number of distinct output branch markers available to type maps.
pub const OUTPUT_BRANCHES: usize = 3;

pub fn echo_output() -> TypeDescriptor {
    TypeDescriptor::artifact(SemanticType::new("EchoOutput"))
}

/// `EchoOutputBranch1` .. `EchoOutputBranch3`.
pub fn echo_output_branch(n: usize) -> TypeDescriptor {
    TypeDescriptor::artifact(SemanticType::new(format!("EchoOutputBranch{n}")))
}

pub fn output_branches() -> Vec<TypeDescriptor> {
    (1..=OUTPUT_BRANCHES).map(echo_output_branch).collect()
}

pub fn single_int1() -> SemanticType {
    SemanticType::new("SingleInt1")
}

pub fn single_int2() -> SemanticType {
    SemanticType::new("SingleInt2")
}

pub fn wrapped_int1() -> SemanticType {
    SemanticType::new("WrappedInt1")
}

pub fn wrapped_int2() -> SemanticType {
    SemanticType::new("WrappedInt2")
}

/// `IntWrapper[field]`.
pub fn int_wrapper(field: TypeDescriptor) -> SemanticType {
    SemanticType::new("IntWrapper").with_field(field)
}

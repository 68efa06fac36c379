//! Action template builders.
//!
//! Each builder turns parameter templates into [`ActionTemplate`]s: the
//! formal parameters, the declared outputs, and the invocations that
//! exercise them. Builders are pure and run before anything is registered.
//!
//! [`ActionTemplate`]: stew_ir::template::ActionTemplate

pub mod outputs;
pub mod single;
pub mod typemap;

use stew_ir::template::TemplateError;
use stew_ir::typemap::TypeMapError;
use stew_ir::value::FactoryError;

/// Name of the only output of single-type actions and hand-built type maps.
pub const ONLY_OUTPUT: &str = "only_output";

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    TypeMap(#[from] TypeMapError),

    #[error("domain element could not be realized: {0}")]
    Factory(#[from] FactoryError),

    #[error("generator '{0}' produced no templates")]
    EmptyGenerator(String),

    #[error("template '{0}' has an empty domain")]
    EmptyDomain(String),

    #[error("template '{template}': domain element {index} cannot be used as a default")]
    NonLiteralDefault { template: String, index: usize },

    #[error("type map '{action}' needs at least two generators, got {found}")]
    DegenerateTypeMap { action: String, found: usize },

    #[error("type map '{action}': row {row} dispatches to {resolved:?}")]
    AmbiguousTypeMap {
        action: String,
        row: usize,
        resolved: Option<usize>,
    },
}

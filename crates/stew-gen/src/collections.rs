//! Collection lifters.
//!
//! A lift wraps every template of a base generator in a container type and
//! replaces its domain with a small grouping of the base domain: every
//! singleton, the first two pairs, and one grouping of all elements.

use stew_ir::argument::Argument;
use stew_ir::template::ParamTemplate;
use stew_ir::types::{TypeDescriptor, ViewType};

use crate::ParamGenerator;

#[derive(Debug, thiserror::Error)]
pub enum LiftError {
    #[error("metadata generator '{0}' cannot be lifted into a collection")]
    Metadata(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lift {
    List,
    Set,
    /// String keyed by position.
    Collection,
}

impl Lift {
    pub const ALL: [Lift; 3] = [Lift::List, Lift::Set, Lift::Collection];

    pub fn prefix(self) -> &'static str {
        match self {
            Lift::List => "list",
            Lift::Set => "set",
            Lift::Collection => "collection",
        }
    }

    pub(crate) fn apply(self, base: &ParamTemplate) -> ParamTemplate {
        let groupings = underpowered_set(&base.domain);
        let (logical_type, container, domain): (_, _, Vec<Argument>) = match self {
            Lift::List => (
                TypeDescriptor::list_of(base.logical_type.clone()),
                ViewType::List,
                groupings.into_iter().map(Argument::List).collect(),
            ),
            Lift::Set => (
                TypeDescriptor::set_of(base.logical_type.clone()),
                ViewType::Set,
                groupings.into_iter().map(Argument::Set).collect(),
            ),
            Lift::Collection => (
                TypeDescriptor::collection_of(base.logical_type.clone()),
                ViewType::Dict,
                groupings
                    .into_iter()
                    .map(|group| {
                        Argument::Dict(
                            group
                                .into_iter()
                                .enumerate()
                                .map(|(idx, arg)| (idx.to_string(), arg))
                                .collect(),
                        )
                    })
                    .collect(),
            ),
        };
        let view_type = if base.logical_type.is_semantic() {
            base.view_type.clone()
        } else {
            container
        };
        ParamTemplate::new(
            format!("{}_{}", base.base_name, self.prefix()),
            logical_type,
            view_type,
            domain,
        )
    }
}

/// Every singleton, then up to two 2-combinations in lexicographic order,
/// then all elements together.
///
/// For one element the singleton and the full grouping coincide and both
/// are kept.
pub fn underpowered_set<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let mut groupings: Vec<Vec<T>> = items.iter().map(|item| vec![item.clone()]).collect();

    let pairs = (0..items.len())
        .flat_map(|i| (i + 1..items.len()).map(move |j| (i, j)))
        .take(2);
    for (i, j) in pairs {
        groupings.push(vec![items[i].clone(), items[j].clone()]);
    }

    groupings.push(items.to_vec());
    groupings
}

pub fn lift(lift: Lift, generator: ParamGenerator) -> Result<ParamGenerator, LiftError> {
    if generator.is_metadata() {
        return Err(LiftError::Metadata(generator.name().to_string()));
    }
    Ok(ParamGenerator::lifted(lift, generator))
}

pub fn list_paramgen(generator: ParamGenerator) -> Result<ParamGenerator, LiftError> {
    lift(Lift::List, generator)
}

pub fn set_paramgen(generator: ParamGenerator) -> Result<ParamGenerator, LiftError> {
    lift(Lift::Set, generator)
}

pub fn collection_paramgen(generator: ParamGenerator) -> Result<ParamGenerator, LiftError> {
    lift(Lift::Collection, generator)
}

//! Category filters.
//!
//! An empty filter map selects every category. Otherwise a category is on
//! only when its entry is `true`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::artifacts::artifact_params;
use crate::collections::{lift, Lift, LiftError};
use crate::metadata::metadata_params;
use crate::primitive::{bool_params, float_params, int_params, primitive_union_params, string_params};
use crate::ParamGenerator;

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("filter '{0}' is not recognized")]
    UnknownFilter(String),

    #[error("at least one generator category must be enabled")]
    NothingSelected,

    #[error(transparent)]
    Lift(#[from] LiftError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Ints,
    Floats,
    Strings,
    Bools,
    Metadata,
    PrimitiveUnions,
    Artifacts,
    Collections,
    Typemaps,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Ints,
        Category::Floats,
        Category::Strings,
        Category::Bools,
        Category::Metadata,
        Category::PrimitiveUnions,
        Category::Artifacts,
        Category::Collections,
        Category::Typemaps,
    ];

    /// Categories that contribute generators of their own, in registration
    /// order.
    pub const BASIC: [Category; 7] = [
        Category::Ints,
        Category::Floats,
        Category::Strings,
        Category::Bools,
        Category::Metadata,
        Category::PrimitiveUnions,
        Category::Artifacts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Ints => "ints",
            Category::Floats => "floats",
            Category::Strings => "strings",
            Category::Bools => "bools",
            Category::Metadata => "metadata",
            Category::PrimitiveUnions => "primitive_unions",
            Category::Artifacts => "artifacts",
            Category::Collections => "collections",
            Category::Typemaps => "typemaps",
        }
    }

    /// The base generator, if this category has one.
    pub fn generator(self) -> Option<ParamGenerator> {
        match self {
            Category::Ints => Some(int_params()),
            Category::Floats => Some(float_params()),
            Category::Strings => Some(string_params()),
            Category::Bools => Some(bool_params()),
            Category::Metadata => Some(metadata_params()),
            Category::PrimitiveUnions => Some(primitive_union_params()),
            Category::Artifacts => Some(artifact_params()),
            Category::Collections | Category::Typemaps => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Category {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| SelectError::UnknownFilter(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Empty means everything.
    entries: BTreeMap<Category, bool>,
}

impl Filters {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn from_map(map: &BTreeMap<String, bool>) -> Result<Self, SelectError> {
        let entries = map
            .iter()
            .map(|(name, &on)| Ok((name.parse::<Category>()?, on)))
            .collect::<Result<_, SelectError>>()?;
        Ok(Self { entries })
    }

    pub fn only(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            entries: categories.into_iter().map(|c| (c, true)).collect(),
        }
    }

    pub fn should_add(&self, category: Category) -> bool {
        self.entries.is_empty() || self.entries.get(&category).copied().unwrap_or(false)
    }
}

/// Every selected base generator, each followed by its list, set and
/// collection lifts when collections are on. Metadata is never lifted.
pub fn get_param_generators(filters: &Filters) -> Result<Vec<ParamGenerator>, SelectError> {
    let add_collections = filters.should_add(Category::Collections);
    let mut selected = Vec::new();

    for category in Category::BASIC {
        if !filters.should_add(category) {
            continue;
        }
        let Some(generator) = category.generator() else {
            continue;
        };
        selected.push(generator.clone());
        if add_collections && category != Category::Metadata {
            for kind in Lift::ALL {
                selected.push(lift(kind, generator.clone())?);
            }
        }
    }

    if selected.is_empty() {
        return Err(SelectError::NothingSelected);
    }
    Ok(selected)
}

/// Base generators that feed the type-map matrix, in column order.
pub fn matrix_generators(filters: &Filters) -> Vec<ParamGenerator> {
    [
        Category::Ints,
        Category::Bools,
        Category::Floats,
        Category::Strings,
        Category::PrimitiveUnions,
    ]
    .into_iter()
    .filter(|&c| filters.should_add(c))
    .filter_map(Category::generator)
    .collect()
}

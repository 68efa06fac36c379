//! Domain generators.
//!
//! A [`ParamGenerator`] is a named, zero-argument source of
//! [`ParamTemplate`]s. Calling [`ParamGenerator::templates`] again yields the
//! same sequence; generators hold no iteration state.
//!
//! - [`primitive`]: ints, floats, strings, bools, primitive unions.
//! - [`metadata`]: whole tables and single columns.
//! - [`artifacts`]: single-integer artifacts behind named factories.
//! - [`collections`]: list/set/collection lifts of any non-metadata generator.
//! - [`select`]: category filters and the selected generator list.

pub mod artifacts;
pub mod collections;
pub mod metadata;
pub mod primitive;
pub mod select;

use std::fmt;

use stew_ir::template::ParamTemplate;

use crate::collections::Lift;

#[derive(Clone)]
enum Source {
    Base(fn() -> Vec<ParamTemplate>),
    Lifted { lift: Lift, base: Box<ParamGenerator> },
}

#[derive(Clone)]
pub struct ParamGenerator {
    name: String,
    source: Source,
}

impl ParamGenerator {
    pub fn new(name: impl Into<String>, produce: fn() -> Vec<ParamTemplate>) -> Self {
        Self {
            name: name.into(),
            source: Source::Base(produce),
        }
    }

    pub(crate) fn lifted(lift: Lift, base: ParamGenerator) -> Self {
        Self {
            name: format!("{}_{}", lift.prefix(), base.name),
            source: Source::Lifted {
                lift,
                base: Box::new(base),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A fresh copy of the template sequence.
    pub fn templates(&self) -> Vec<ParamTemplate> {
        match &self.source {
            Source::Base(produce) => produce(),
            Source::Lifted { lift, base } => base.templates().iter().map(|t| lift.apply(t)).collect(),
        }
    }

    /// Whether any template takes metadata.
    pub fn is_metadata(&self) -> bool {
        self.templates().iter().any(|t| t.logical_type.is_metadata())
    }
}

impl fmt::Debug for ParamGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParamGenerator({})", self.name)
    }
}

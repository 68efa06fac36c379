use crate::metadata::{Metadata, MetadataError};
use crate::value::{Artifact, Factory, FactoryError, Value};

/// An unrealized domain element.
///
/// Literals are ready to pass; artifacts and metadata stay deferred behind
/// factories until a replay realizes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Value(Value),
    Artifact(Factory<Artifact>),
    Metadata(Factory<Metadata>),
    /// A column projected out of a table.
    Column {
        table: Factory<Metadata>,
        column: String,
    },
    /// Several tables merged in sequence.
    Merged(Vec<Factory<Metadata>>),
    List(Vec<Argument>),
    Set(Vec<Argument>),
    Dict(Vec<(String, Argument)>),
}

impl Argument {
    pub fn column(table: Factory<Metadata>, column: impl Into<String>) -> Self {
        Argument::Column {
            table,
            column: column.into(),
        }
    }

    /// The plain value, if nothing inside is deferred.
    pub fn as_literal(&self) -> Option<Value> {
        match self {
            Argument::Value(value) => Some(value.clone()),
            Argument::List(items) => items
                .iter()
                .map(Argument::as_literal)
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
            Argument::Set(items) => items
                .iter()
                .map(Argument::as_literal)
                .collect::<Option<Vec<_>>>()
                .map(Value::Set),
            Argument::Dict(entries) => entries
                .iter()
                .map(|(k, v)| v.as_literal().map(|v| (k.clone(), v)))
                .collect::<Option<Vec<_>>>()
                .map(Value::Dict),
            Argument::Artifact(_)
            | Argument::Metadata(_)
            | Argument::Column { .. }
            | Argument::Merged(_) => None,
        }
    }

    /// Realize directly by calling factories, with no host involvement and
    /// no memoization.
    pub fn preview(&self) -> Result<Value, FactoryError> {
        Ok(match self {
            Argument::Value(value) => value.clone(),
            Argument::Artifact(factory) => Value::Artifact(factory.produce()?),
            Argument::Metadata(factory) => Value::Metadata(factory.produce()?),
            Argument::Column { table, column } => Value::Column(table.produce()?.column(column)?),
            Argument::Merged(tables) => Value::Metadata(merge_all(tables)?),
            Argument::List(items) => Value::List(preview_all(items)?),
            Argument::Set(items) => Value::Set(preview_all(items)?),
            Argument::Dict(entries) => Value::Dict(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), v.preview()?)))
                    .collect::<Result<_, FactoryError>>()?,
            ),
        })
    }
}

fn preview_all(items: &[Argument]) -> Result<Vec<Value>, FactoryError> {
    items.iter().map(Argument::preview).collect()
}

fn merge_all(tables: &[Factory<Metadata>]) -> Result<Metadata, FactoryError> {
    let mut iter = tables.iter();
    let mut merged = match iter.next() {
        Some(first) => first.produce()?,
        None => return Err(MetadataError::NothingToMerge.into()),
    };
    for next in iter {
        merged = merged.merge(&next.produce()?)?;
    }
    Ok(merged)
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Value(value)
    }
}

impl From<i64> for Argument {
    fn from(i: i64) -> Self {
        Argument::Value(Value::Int(i))
    }
}

impl From<f64> for Argument {
    fn from(x: f64) -> Self {
        Argument::Value(Value::Float(x))
    }
}

impl From<bool> for Argument {
    fn from(b: bool) -> Self {
        Argument::Value(Value::Bool(b))
    }
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::Value(Value::Str(s.to_string()))
    }
}

impl From<Factory<Artifact>> for Argument {
    fn from(factory: Factory<Artifact>) -> Self {
        Argument::Artifact(factory)
    }
}

impl From<Factory<Metadata>> for Argument {
    fn from(factory: Factory<Metadata>) -> Self {
        Argument::Metadata(factory)
    }
}

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::format::{FormatError, SingleIntFormat};
use crate::metadata::{Metadata, MetadataColumn, MetadataError};
use crate::types::SemanticType;

/// A realized argument value, as the echo body receives it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Distinct elements; iteration order carries no meaning.
    Set(Vec<Value>),
    /// String keyed, insertion ordered.
    Dict(Vec<(String, Value)>),
    Artifact(Artifact),
    Metadata(Metadata),
    Column(MetadataColumn),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "'{s}'"),
            Value::List(items) => write!(f, "[{}]", join(items)),
            Value::Set(items) => write!(f, "{{{}}}", join(items)),
            Value::Dict(entries) => {
                let entries: Vec<String> =
                    entries.iter().map(|(k, v)| format!("'{k}': {v}")).collect();
                write!(f, "{{{}}}", entries.join(", "))
            }
            Value::Artifact(artifact) => {
                write!(f, "<{}: {}>", artifact.semantic_type, artifact.value)
            }
            Value::Metadata(md) => write!(f, "<Metadata: {} ids>", md.ids().len()),
            Value::Column(column) => write!(f, "<MetadataColumn: {}>", column.name()),
        }
    }
}

fn join(items: &[Value]) -> String {
    items
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Artifacts ────────────────────────────────────────────────────────

/// An imported artifact stored in the single-integer format.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    semantic_type: SemanticType,
    value: i64,
}

impl Artifact {
    pub fn import(semantic_type: SemanticType, value: i64) -> Self {
        Self {
            semantic_type,
            value,
        }
    }

    /// Import from the on-disk single-integer format.
    pub fn from_format(semantic_type: SemanticType, text: &str) -> Result<Self, FormatError> {
        let value = SingleIntFormat::read(text)?;
        Ok(Self::import(semantic_type, value))
    }

    /// The on-disk single-integer format of this artifact.
    pub fn to_format(&self) -> String {
        SingleIntFormat::write(self.value)
    }

    pub fn semantic_type(&self) -> &SemanticType {
        &self.semantic_type
    }

    pub fn get_int(&self) -> i64 {
        self.value
    }
}

// ── Factories ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FactoryError {
    #[error("metadata factory failed: {0}")]
    Metadata(#[from] MetadataError),

    #[error("artifact factory failed: {0}")]
    Format(#[from] FormatError),
}

/// A named, deferred constructor for an artifact or metadata table.
///
/// Identity is the name: two factories with the same name are the same
/// factory for memoization purposes.
pub struct Factory<T> {
    name: &'static str,
    produce: fn() -> Result<T, FactoryError>,
}

impl<T> Factory<T> {
    pub const fn new(name: &'static str, produce: fn() -> Result<T, FactoryError>) -> Self {
        Self { name, produce }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn produce(&self) -> Result<T, FactoryError> {
        (self.produce)()
    }
}

impl<T> Clone for Factory<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Factory<T> {}

impl<T> PartialEq for Factory<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for Factory<T> {}

impl<T> Hash for Factory<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Factory({})", self.name)
    }
}

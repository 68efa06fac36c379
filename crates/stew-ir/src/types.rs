use std::fmt;
use std::ops::BitOr;

use crate::metadata::ColumnType;
use crate::typemap::TypeVariable;
use crate::value::Value;

// ── Primitive refinements ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int,
    Float,
    Str,
    Bool,
}

impl PrimitiveKind {
    fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (PrimitiveKind::Int, Value::Int(_))
                | (PrimitiveKind::Float, Value::Float(_))
                | (PrimitiveKind::Str, Value::Str(_))
                | (PrimitiveKind::Bool, Value::Bool(_))
        )
    }

    fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "Int",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Str => "Str",
            PrimitiveKind::Bool => "Bool",
        }
    }
}

/// A numeric interval. Missing bounds are open.
///
/// Defaults mirror the host framework: inclusive start, exclusive end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub inclusive_start: bool,
    pub inclusive_end: bool,
}

impl Range {
    /// Unbounded below, exclusive `end`.
    pub fn until(end: f64) -> Self {
        Self {
            start: None,
            end: Some(end),
            inclusive_start: true,
            inclusive_end: false,
        }
    }

    /// Inclusive `start`, unbounded above.
    pub fn at_least(start: f64) -> Self {
        Self {
            start: Some(start),
            end: None,
            inclusive_start: true,
            inclusive_end: false,
        }
    }

    /// Inclusive `start`, exclusive `end`.
    pub fn between(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            inclusive_start: true,
            inclusive_end: false,
        }
    }

    pub fn inclusive_end(mut self) -> Self {
        self.inclusive_end = true;
        self
    }

    pub fn exclusive_start(mut self) -> Self {
        self.inclusive_start = false;
        self
    }

    pub fn contains(&self, x: f64) -> bool {
        let above = match self.start {
            None => true,
            Some(s) if self.inclusive_start => x >= s,
            Some(s) => x > s,
        };
        let below = match self.end {
            None => true,
            Some(e) if self.inclusive_end => x <= e,
            Some(e) => x < e,
        };
        above && below
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<f64>| b.map_or_else(|| "None".to_string(), |v| v.to_string());
        write!(f, "Range({}, {}", bound(self.start), bound(self.end))?;
        if !self.inclusive_start {
            write!(f, ", inclusive_start=False")?;
        }
        if self.inclusive_end {
            write!(f, ", inclusive_end=True")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Refinement {
    Range(Range),
    Choices(Vec<Value>),
}

impl Refinement {
    fn admits(&self, value: &Value) -> bool {
        match self {
            Refinement::Range(range) => match value {
                Value::Int(i) => range.contains(*i as f64),
                Value::Float(x) => range.contains(*x),
                _ => false,
            },
            Refinement::Choices(choices) => choices.contains(value),
        }
    }
}

// ── Metadata and semantic kinds ──────────────────────────────────────

/// Column subtype accepted by a `MetadataColumn[...]` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Categorical,
    Numeric,
    Any,
}

impl ColumnKind {
    pub fn admits(self, column: ColumnType) -> bool {
        match self {
            ColumnKind::Any => true,
            ColumnKind::Categorical => column == ColumnType::Categorical,
            ColumnKind::Numeric => column == ColumnType::Numeric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    Table,
    Column(ColumnKind),
}

/// A named content type registered with the host, e.g. `SingleInt1` or
/// `IntWrapper[WrappedInt1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticType {
    pub name: String,
    pub fields: Vec<TypeDescriptor>,
}

impl SemanticType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: TypeDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.fields.is_empty() {
            let fields: Vec<String> = self.fields.iter().map(|t| t.to_string()).collect();
            write!(f, "[{}]", fields.join(", "))?;
        }
        Ok(())
    }
}

// ── Type descriptor ──────────────────────────────────────────────────

/// Broad classification used wherever behavior depends on what kind of
/// parameter a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Primitive,
    Metadata,
    Semantic,
    Variable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Primitive {
        kind: PrimitiveKind,
        refinement: Option<Refinement>,
    },
    Union(Vec<TypeDescriptor>),
    Metadata(MetadataKind),
    Artifact(SemanticType),
    List(Box<TypeDescriptor>),
    Set(Box<TypeDescriptor>),
    Collection(Box<TypeDescriptor>),
    Var(TypeVariable),
}

impl TypeDescriptor {
    pub fn int() -> Self {
        Self::primitive(PrimitiveKind::Int)
    }

    pub fn float() -> Self {
        Self::primitive(PrimitiveKind::Float)
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::Str)
    }

    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    fn primitive(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive {
            kind,
            refinement: None,
        }
    }

    /// Refine a primitive with a range. Non-primitives are returned unchanged.
    pub fn range(self, range: Range) -> Self {
        self.refine(Refinement::Range(range))
    }

    /// Refine a primitive with an allowed literal set.
    pub fn choices(self, choices: impl IntoIterator<Item = Value>) -> Self {
        self.refine(Refinement::Choices(choices.into_iter().collect()))
    }

    fn refine(self, refinement: Refinement) -> Self {
        match self {
            TypeDescriptor::Primitive { kind, .. } => TypeDescriptor::Primitive {
                kind,
                refinement: Some(refinement),
            },
            other => other,
        }
    }

    pub fn metadata() -> Self {
        TypeDescriptor::Metadata(MetadataKind::Table)
    }

    pub fn column(kind: ColumnKind) -> Self {
        TypeDescriptor::Metadata(MetadataKind::Column(kind))
    }

    pub fn artifact(semantic: SemanticType) -> Self {
        TypeDescriptor::Artifact(semantic)
    }

    pub fn list_of(inner: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(inner))
    }

    pub fn set_of(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Set(Box::new(inner))
    }

    pub fn collection_of(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Collection(Box::new(inner))
    }

    pub fn classify(&self) -> TypeClass {
        match self {
            TypeDescriptor::Primitive { .. } => TypeClass::Primitive,
            TypeDescriptor::Metadata(_) => TypeClass::Metadata,
            TypeDescriptor::Artifact(_) => TypeClass::Semantic,
            TypeDescriptor::Var(_) => TypeClass::Variable,
            TypeDescriptor::List(inner)
            | TypeDescriptor::Set(inner)
            | TypeDescriptor::Collection(inner) => inner.classify(),
            // Union members share a class; an empty union is never built.
            TypeDescriptor::Union(members) => members
                .first()
                .map_or(TypeClass::Primitive, TypeDescriptor::classify),
        }
    }

    pub fn is_metadata(&self) -> bool {
        self.classify() == TypeClass::Metadata
    }

    pub fn is_semantic(&self) -> bool {
        self.classify() == TypeClass::Semantic
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, TypeDescriptor::Collection(_))
    }

    /// Whether `value` is a legal instance of this type.
    ///
    /// Type variables accept anything one of their type-map rows accepts at
    /// that position; output variables accept nothing.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeDescriptor::Primitive { kind, refinement }, v) => {
                kind.matches(v) && refinement.as_ref().map_or(true, |r| r.admits(v))
            }
            (TypeDescriptor::Union(members), v) => members.iter().any(|m| m.accepts(v)),
            (TypeDescriptor::Metadata(MetadataKind::Table), Value::Metadata(_)) => true,
            (TypeDescriptor::Metadata(MetadataKind::Column(kind)), Value::Column(column)) => {
                kind.admits(column.column_type())
            }
            (TypeDescriptor::Artifact(_), Value::Artifact(artifact)) => {
                self.admits_semantic(artifact.semantic_type())
            }
            (TypeDescriptor::List(inner), Value::List(items))
            | (TypeDescriptor::Set(inner), Value::Set(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            (TypeDescriptor::Collection(inner), Value::Dict(entries)) => {
                entries.iter().all(|(_, item)| inner.accepts(item))
            }
            (TypeDescriptor::Var(var), v) => var.admits(v),
            _ => false,
        }
    }

    /// Every semantic type name this descriptor mentions, type-map rows
    /// included, in first-seen order.
    pub fn semantic_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_semantic_names(&mut names);
        names
    }

    fn collect_semantic_names(&self, names: &mut Vec<String>) {
        match self {
            TypeDescriptor::Primitive { .. } | TypeDescriptor::Metadata(_) => {}
            TypeDescriptor::Artifact(semantic) => {
                if !names.contains(&semantic.name) {
                    names.push(semantic.name.clone());
                }
                for field in &semantic.fields {
                    field.collect_semantic_names(names);
                }
            }
            TypeDescriptor::Union(members) => {
                for member in members {
                    member.collect_semantic_names(names);
                }
            }
            TypeDescriptor::List(inner)
            | TypeDescriptor::Set(inner)
            | TypeDescriptor::Collection(inner) => inner.collect_semantic_names(names),
            TypeDescriptor::Var(var) => {
                for row in 0..var.map().rows().len() {
                    if let Some(concrete) = var.resolve(row) {
                        concrete.collect_semantic_names(names);
                    }
                }
            }
        }
    }

    /// Subtype check of a concrete semantic type against this pattern.
    pub fn admits_semantic(&self, concrete: &SemanticType) -> bool {
        match self {
            TypeDescriptor::Artifact(pattern) => {
                pattern.name == concrete.name
                    && pattern.fields.len() == concrete.fields.len()
                    && pattern
                        .fields
                        .iter()
                        .zip(&concrete.fields)
                        .all(|(expected, actual)| match actual {
                            TypeDescriptor::Artifact(inner) => expected.admits_semantic(inner),
                            other => expected == other,
                        })
            }
            TypeDescriptor::Union(members) => members.iter().any(|m| m.admits_semantic(concrete)),
            _ => false,
        }
    }
}

impl BitOr for TypeDescriptor {
    type Output = TypeDescriptor;

    /// Flattening union: `a | b | c` yields one three-member union.
    fn bitor(self, rhs: TypeDescriptor) -> TypeDescriptor {
        let mut members = match self {
            TypeDescriptor::Union(members) => members,
            other => vec![other],
        };
        match rhs {
            TypeDescriptor::Union(more) => members.extend(more),
            other => members.push(other),
        }
        TypeDescriptor::Union(members)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive { kind, refinement } => {
                write!(f, "{}", kind.name())?;
                match refinement {
                    None => Ok(()),
                    Some(Refinement::Range(range)) => write!(f, " % {range}"),
                    Some(Refinement::Choices(choices)) => {
                        let choices: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
                        write!(f, " % Choices({})", choices.join(", "))
                    }
                }
            }
            TypeDescriptor::Union(members) => {
                let members: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(f, "{}", members.join(" | "))
            }
            TypeDescriptor::Metadata(MetadataKind::Table) => write!(f, "Metadata"),
            TypeDescriptor::Metadata(MetadataKind::Column(kind)) => match kind {
                ColumnKind::Categorical => write!(f, "MetadataColumn[Categorical]"),
                ColumnKind::Numeric => write!(f, "MetadataColumn[Numeric]"),
                ColumnKind::Any => write!(f, "MetadataColumn[Categorical | Numeric]"),
            },
            TypeDescriptor::Artifact(semantic) => write!(f, "{semantic}"),
            TypeDescriptor::List(inner) => write!(f, "List[{inner}]"),
            TypeDescriptor::Set(inner) => write!(f, "Set[{inner}]"),
            TypeDescriptor::Collection(inner) => write!(f, "Collection[{inner}]"),
            TypeDescriptor::Var(var) => write!(f, "{var}"),
        }
    }
}

// ── View types ───────────────────────────────────────────────────────

/// The representation a parameter is handed to the echo body as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewType {
    Int,
    Float,
    Str,
    Bool,
    /// Mixed primitive unions.
    Object,
    SingleIntFormat,
    Metadata,
    CategoricalColumn,
    NumericColumn,
    Column,
    List,
    Set,
    Dict,
    Union(Vec<ViewType>),
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewType::Int => "int",
            ViewType::Float => "float",
            ViewType::Str => "str",
            ViewType::Bool => "bool",
            ViewType::Object => "object",
            ViewType::SingleIntFormat => "SingleIntFormat",
            ViewType::Metadata => "Metadata",
            ViewType::CategoricalColumn => "CategoricalMetadataColumn",
            ViewType::NumericColumn => "NumericMetadataColumn",
            ViewType::Column => "MetadataColumn",
            ViewType::List => "list",
            ViewType::Set => "set",
            ViewType::Dict => "dict",
            ViewType::Union(members) => {
                let members: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                return write!(f, "Union[{}]", members.join(", "));
            }
        };
        write!(f, "{name}")
    }
}

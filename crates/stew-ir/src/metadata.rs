//! Small in-memory metadata tables.
//!
//! Tables are keyed by an ordered id index. Cells may be missing. JSON forms
//! follow the tabular (`{column: {id: cell}}`) and series (`{id: cell}`)
//! layouts the echo output is compared against.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Categorical,
    Numeric,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Categorical(Vec<Option<String>>),
    Numeric(Vec<Option<f64>>),
}

impl ColumnValues {
    pub fn categorical(cells: &[Option<&str>]) -> Self {
        ColumnValues::Categorical(cells.iter().map(|c| c.map(str::to_string)).collect())
    }

    pub fn numeric(cells: &[Option<f64>]) -> Self {
        ColumnValues::Numeric(cells.to_vec())
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Categorical(cells) => cells.len(),
            ColumnValues::Numeric(cells) => cells.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnValues::Categorical(_) => ColumnType::Categorical,
            ColumnValues::Numeric(_) => ColumnType::Numeric,
        }
    }

    fn cell_json(&self, idx: usize) -> JsonValue {
        match self {
            ColumnValues::Categorical(cells) => cells[idx]
                .as_ref()
                .map_or(JsonValue::Null, |s| JsonValue::String(s.clone())),
            ColumnValues::Numeric(cells) => cells[idx].map_or(JsonValue::Null, JsonValue::from),
        }
    }

    fn select(&self, positions: &[usize]) -> Self {
        match self {
            ColumnValues::Categorical(cells) => {
                ColumnValues::Categorical(positions.iter().map(|&p| cells[p].clone()).collect())
            }
            ColumnValues::Numeric(cells) => {
                ColumnValues::Numeric(positions.iter().map(|&p| cells[p]).collect())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata has no ids")]
    NoIds,

    #[error("duplicate id '{0}'")]
    DuplicateId(String),

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("column '{column}' has {found} cells, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("no column named '{0}'")]
    MissingColumn(String),

    #[error("column '{0}' exists in both merged tables")]
    OverlappingColumn(String),

    #[error("merged tables share no ids")]
    NoSharedIds,

    #[error("no tables to merge")]
    NothingToMerge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    id_header: String,
    ids: Vec<String>,
    columns: Vec<(String, ColumnValues)>,
}

impl Metadata {
    pub fn new(
        id_header: impl Into<String>,
        ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, MetadataError> {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Err(MetadataError::NoIds);
        }
        let mut seen = HashSet::new();
        for id in &ids {
            if !seen.insert(id.as_str()) {
                return Err(MetadataError::DuplicateId(id.clone()));
            }
        }
        Ok(Self {
            id_header: id_header.into(),
            ids,
            columns: Vec::new(),
        })
    }

    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: ColumnValues,
    ) -> Result<Self, MetadataError> {
        let name = name.into();
        if self.columns.iter().any(|(existing, _)| *existing == name) {
            return Err(MetadataError::DuplicateColumn(name));
        }
        if values.len() != self.ids.len() {
            return Err(MetadataError::LengthMismatch {
                column: name,
                expected: self.ids.len(),
                found: values.len(),
            });
        }
        self.columns.push((name, values));
        Ok(self)
    }

    pub fn id_header(&self) -> &str {
        &self.id_header
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Project a single column.
    pub fn column(&self, name: &str) -> Result<MetadataColumn, MetadataError> {
        let (_, values) = self
            .columns
            .iter()
            .find(|(existing, _)| existing == name)
            .ok_or_else(|| MetadataError::MissingColumn(name.to_string()))?;
        Ok(MetadataColumn {
            name: name.to_string(),
            id_header: self.id_header.clone(),
            ids: self.ids.clone(),
            values: values.clone(),
        })
    }

    /// Inner join on ids, keeping this table's id order.
    pub fn merge(&self, other: &Metadata) -> Result<Metadata, MetadataError> {
        for name in other.column_names() {
            if self.column_names().any(|existing| existing == name) {
                return Err(MetadataError::OverlappingColumn(name.to_string()));
            }
        }

        let other_positions: HashMap<&str, usize> = other
            .ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.as_str(), idx))
            .collect();

        let mut ids = Vec::new();
        let mut left = Vec::new();
        let mut right = Vec::new();
        for (idx, id) in self.ids.iter().enumerate() {
            if let Some(&other_idx) = other_positions.get(id.as_str()) {
                ids.push(id.clone());
                left.push(idx);
                right.push(other_idx);
            }
        }
        if ids.is_empty() {
            return Err(MetadataError::NoSharedIds);
        }

        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), values.select(&left)))
            .chain(
                other
                    .columns
                    .iter()
                    .map(|(name, values)| (name.clone(), values.select(&right))),
            )
            .collect();

        Ok(Metadata {
            id_header: self.id_header.clone(),
            ids,
            columns,
        })
    }

    /// Tabular JSON form: `{column: {id: cell}}`.
    pub fn to_json(&self) -> JsonValue {
        let mut table = Map::new();
        for (name, values) in &self.columns {
            table.insert(name.clone(), series_json(&self.ids, values));
        }
        JsonValue::Object(table)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataColumn {
    name: String,
    id_header: String,
    ids: Vec<String>,
    values: ColumnValues,
}

impl MetadataColumn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_header(&self) -> &str {
        &self.id_header
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn column_type(&self) -> ColumnType {
        self.values.column_type()
    }

    /// Series JSON form: `{id: cell}`.
    pub fn to_json(&self) -> JsonValue {
        series_json(&self.ids, &self.values)
    }
}

fn series_json(ids: &[String], values: &ColumnValues) -> JsonValue {
    let mut series = Map::new();
    for (idx, id) in ids.iter().enumerate() {
        series.insert(id.clone(), values.cell_json(idx));
    }
    JsonValue::Object(series)
}

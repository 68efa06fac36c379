//! Type-level dispatch tables.
//!
//! A [`TypeMap`] relates rows of input types to rows of output types. The
//! host picks the first row whose every input type accepts the realized
//! inputs, and that row's outputs become the concrete output types. Rows are
//! expected to be disjoint; [`TypeMap::new`] only checks shape.

use std::fmt;
use std::sync::Arc;

use crate::types::TypeDescriptor;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeMapRow {
    pub inputs: Vec<TypeDescriptor>,
    pub outputs: Vec<TypeDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeMap {
    rows: Vec<TypeMapRow>,
    input_arity: usize,
    output_arity: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum TypeMapError {
    #[error("type map has no rows")]
    Empty,

    #[error("type map row {row} has {found} inputs, expected {expected}")]
    InputArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("type map row {row} has {found} outputs, expected {expected}")]
    OutputArity {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl TypeMap {
    pub fn new(rows: Vec<TypeMapRow>) -> Result<Arc<Self>, TypeMapError> {
        let first = rows.first().ok_or(TypeMapError::Empty)?;
        let input_arity = first.inputs.len();
        let output_arity = first.outputs.len();

        for (row, entry) in rows.iter().enumerate() {
            if entry.inputs.len() != input_arity {
                return Err(TypeMapError::InputArity {
                    row,
                    expected: input_arity,
                    found: entry.inputs.len(),
                });
            }
            if entry.outputs.len() != output_arity {
                return Err(TypeMapError::OutputArity {
                    row,
                    expected: output_arity,
                    found: entry.outputs.len(),
                });
            }
        }

        Ok(Arc::new(Self {
            rows,
            input_arity,
            output_arity,
        }))
    }

    pub fn rows(&self) -> &[TypeMapRow] {
        &self.rows
    }

    pub fn input_arity(&self) -> usize {
        self.input_arity
    }

    pub fn output_arity(&self) -> usize {
        self.output_arity
    }

    /// Index of the first row whose inputs all accept `inputs` (given in
    /// input-position order).
    pub fn resolve(&self, inputs: &[Value]) -> Option<usize> {
        if inputs.len() != self.input_arity {
            return None;
        }
        self.rows.iter().position(|row| {
            row.inputs
                .iter()
                .zip(inputs)
                .all(|(ty, value)| ty.accepts(value))
        })
    }

    /// One input variable per input position.
    pub fn input_variables(self: &Arc<Self>) -> Vec<TypeDescriptor> {
        (0..self.input_arity)
            .map(|position| self.variable(VarRole::Input, position))
            .collect()
    }

    /// One output variable per output position.
    pub fn output_variables(self: &Arc<Self>) -> Vec<TypeDescriptor> {
        (0..self.output_arity)
            .map(|position| self.variable(VarRole::Output, position))
            .collect()
    }

    fn variable(self: &Arc<Self>, role: VarRole, position: usize) -> TypeDescriptor {
        TypeDescriptor::Var(TypeVariable {
            map: Arc::clone(self),
            role,
            position,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarRole {
    Input,
    Output,
}

/// One position of a type map, used as a parameter or output type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeVariable {
    map: Arc<TypeMap>,
    role: VarRole,
    position: usize,
}

impl TypeVariable {
    pub fn map(&self) -> &Arc<TypeMap> {
        &self.map
    }

    pub fn role(&self) -> VarRole {
        self.role
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether both variables belong to the same map instance.
    pub fn shares_map(&self, other: &TypeVariable) -> bool {
        Arc::ptr_eq(&self.map, &other.map)
    }

    pub(crate) fn admits(&self, value: &Value) -> bool {
        match self.role {
            VarRole::Input => self
                .map
                .rows
                .iter()
                .any(|row| row.inputs[self.position].accepts(value)),
            VarRole::Output => false,
        }
    }

    /// Concrete type of this variable once `row` has been selected.
    pub fn resolve(&self, row: usize) -> Option<&TypeDescriptor> {
        let entry = self.map.rows.get(row)?;
        match self.role {
            VarRole::Input => entry.inputs.get(self.position),
            VarRole::Output => entry.outputs.get(self.position),
        }
    }
}

impl fmt::Display for TypeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            VarRole::Input => write!(f, "T_in{}", self.position + 1),
            VarRole::Output => write!(f, "T_out{}", self.position + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Range;

    fn branch(n: usize) -> TypeDescriptor {
        crate::semantic::echo_output_branch(n)
    }

    #[test]
    fn test_resolve_first_matching_row() {
        let map = TypeMap::new(vec![
            TypeMapRow {
                inputs: vec![TypeDescriptor::int()],
                outputs: vec![branch(1)],
            },
            TypeMapRow {
                inputs: vec![TypeDescriptor::string()],
                outputs: vec![branch(2)],
            },
        ])
        .unwrap();

        assert_eq!(map.resolve(&[Value::Int(1)]), Some(0));
        assert_eq!(map.resolve(&[Value::Str("foo".into())]), Some(1));
        assert_eq!(map.resolve(&[Value::Bool(true)]), None);
    }

    #[test]
    fn test_variables_resolve_per_row() {
        let map = TypeMap::new(vec![
            TypeMapRow {
                inputs: vec![TypeDescriptor::int().range(Range::until(0.0))],
                outputs: vec![branch(1), branch(2)],
            },
            TypeMapRow {
                inputs: vec![TypeDescriptor::int().range(Range::at_least(0.0))],
                outputs: vec![branch(2), branch(3)],
            },
        ])
        .unwrap();

        let outputs = map.output_variables();
        assert_eq!(outputs.len(), 2);
        match &outputs[1] {
            TypeDescriptor::Var(var) => {
                assert_eq!(var.resolve(0), Some(&branch(2)));
                assert_eq!(var.resolve(1), Some(&branch(3)));
            }
            other => panic!("expected variable, got {other}"),
        }

        let inputs = map.input_variables();
        assert!(inputs[0].accepts(&Value::Int(-5)));
        assert!(inputs[0].accepts(&Value::Int(5)));
        assert!(!inputs[0].accepts(&Value::Float(5.0)));
        assert!(!outputs[0].accepts(&Value::Int(5)));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = TypeMap::new(vec![
            TypeMapRow {
                inputs: vec![TypeDescriptor::int()],
                outputs: vec![branch(1)],
            },
            TypeMapRow {
                inputs: vec![TypeDescriptor::int(), TypeDescriptor::string()],
                outputs: vec![branch(2)],
            },
        ]);
        assert!(matches!(result, Err(TypeMapError::InputArity { row: 1, .. })));
        assert!(matches!(TypeMap::new(vec![]), Err(TypeMapError::Empty)));
    }
}

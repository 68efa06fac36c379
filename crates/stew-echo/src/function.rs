//! Echo callables built from action templates.

use std::collections::HashSet;

use stew_ir::template::{ActionTemplate, ParamSpec};
use stew_ir::types::TypeDescriptor;
use stew_ir::value::Value;

use crate::normalize::canonical_line;

/// Member keys of a collection output that receives no arguments.
pub const COLLECTION_KEYS: [&str; 2] = ["1", "2"];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EchoError {
    #[error("'{action}' has no parameter '{name}'")]
    UnknownArgument { action: String, name: String },

    #[error("'{action}' received '{name}' twice")]
    RepeatedArgument { action: String, name: String },

    #[error("'{action}' was called without '{name}'")]
    MissingArgument { action: String, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    Single,
    Collection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSignature {
    pub name: String,
    pub semantic_type: TypeDescriptor,
    pub shape: OutputShape,
}

/// What the registration API introspects.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub parameters: Vec<ParamSpec>,
    pub outputs: Vec<OutputSignature>,
}

/// One produced output.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputPayload {
    /// Contents of `echo.txt`.
    Single(String),
    /// Member key and the contents of that member's `echo.txt`.
    Collection(Vec<(String, String)>),
}

impl OutputPayload {
    pub fn shape(&self) -> OutputShape {
        match self {
            OutputPayload::Single(_) => OutputShape::Single,
            OutputPayload::Collection(_) => OutputShape::Collection,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EchoFunction {
    signature: Signature,
}

/// Build the echo callable for `template`.
pub fn disguise(template: &ActionTemplate) -> EchoFunction {
    let outputs = template
        .registered_outputs()
        .iter()
        .map(|(name, ty)| OutputSignature {
            name: name.clone(),
            semantic_type: ty.clone(),
            shape: if ty.is_collection() {
                OutputShape::Collection
            } else {
                OutputShape::Single
            },
        })
        .collect();
    EchoFunction {
        signature: Signature {
            name: template.action_id().to_string(),
            parameters: template.parameter_specs().to_vec(),
            outputs,
        },
    }
}

impl EchoFunction {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    /// Run the body. `kwargs` must name every parameter exactly once; the
    /// host fills in defaults before calling.
    pub fn call(&self, kwargs: &[(String, Value)]) -> Result<Vec<OutputPayload>, EchoError> {
        self.check_arguments(kwargs)?;

        let lines: Vec<(String, String)> = kwargs
            .iter()
            .map(|(name, value)| (name.clone(), canonical_line(name, value)))
            .collect();

        Ok(self
            .signature
            .outputs
            .iter()
            .enumerate()
            .map(|(idx, output)| {
                let ordinal = idx + 1;
                match (output.shape, idx) {
                    (OutputShape::Single, 0) => OutputPayload::Single(
                        lines.iter().map(|(_, line)| format!("{line}\n")).collect(),
                    ),
                    (OutputShape::Single, _) => OutputPayload::Single(ordinal.to_string()),
                    (OutputShape::Collection, 0) if !lines.is_empty() => OutputPayload::Collection(
                        lines
                            .iter()
                            .map(|(name, line)| (name.clone(), format!("{line}\n")))
                            .collect(),
                    ),
                    (OutputShape::Collection, _) => OutputPayload::Collection(
                        COLLECTION_KEYS
                            .iter()
                            .map(|key| (key.to_string(), format!("{ordinal}: {key}")))
                            .collect(),
                    ),
                }
            })
            .collect())
    }

    fn check_arguments(&self, kwargs: &[(String, Value)]) -> Result<(), EchoError> {
        let action = &self.signature.name;
        let mut seen = HashSet::new();
        for (name, _) in kwargs {
            if !self.signature.parameters.iter().any(|p| &p.name == name) {
                return Err(EchoError::UnknownArgument {
                    action: action.clone(),
                    name: name.clone(),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(EchoError::RepeatedArgument {
                    action: action.clone(),
                    name: name.clone(),
                });
            }
        }
        if let Some(missing) = self
            .signature
            .parameters
            .iter()
            .find(|p| !seen.contains(p.name.as_str()))
        {
            return Err(EchoError::MissingArgument {
                action: action.clone(),
                name: missing.name.clone(),
            });
        }
        Ok(())
    }
}

//! Parameter and action templates.
//!
//! A [`ParamTemplate`] is a typed parameter shape with a representative
//! domain. An [`ActionTemplate`] is one synthetic action: its formal
//! parameters, its declared outputs, and the invocations that exercise it.
//! Both are built once during generation and only read afterwards.

use std::collections::HashSet;

use crate::argument::Argument;
use crate::types::{TypeDescriptor, ViewType};
use crate::value::{FactoryError, Value};

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template '{0}' has an empty domain")]
    EmptyDomain(String),

    #[error("template '{template}': domain element {index} could not be realized: {source}")]
    Unrealizable {
        template: String,
        index: usize,
        #[source]
        source: FactoryError,
    },

    #[error("template '{template}': domain element {index} ({value}) is not a {logical_type}")]
    OutOfDomain {
        template: String,
        index: usize,
        value: String,
        logical_type: String,
    },

    #[error("action '{action}': duplicate parameter '{name}'")]
    DuplicateParameter { action: String, name: String },

    #[error("action '{action}': duplicate output '{name}'")]
    DuplicateOutput { action: String, name: String },

    #[error("action '{action}': default of '{name}' ({value}) is not a {logical_type}")]
    InvalidDefault {
        action: String,
        name: String,
        value: String,
        logical_type: String,
    },

    #[error("action '{action}': invocation {invocation} passes unknown parameter '{name}'")]
    UnknownArgument {
        action: String,
        invocation: usize,
        name: String,
    },

    #[error("action '{action}': invocation {invocation} passes '{name}' twice")]
    RepeatedArgument {
        action: String,
        invocation: usize,
        name: String,
    },

    #[error("action '{action}': invocation {invocation} expects outputs {found:?}, registered {expected:?}")]
    OutputMismatch {
        action: String,
        invocation: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

// ── Parameter templates ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ParamTemplate {
    pub base_name: String,
    pub logical_type: TypeDescriptor,
    pub view_type: ViewType,
    /// Ordered; builders index into it.
    pub domain: Vec<Argument>,
}

impl ParamTemplate {
    pub fn new(
        base_name: impl Into<String>,
        logical_type: TypeDescriptor,
        view_type: ViewType,
        domain: impl IntoIterator<Item = Argument>,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            logical_type,
            view_type,
            domain: domain.into_iter().collect(),
        }
    }

    /// A named parameter of this template's type, `{prefix}{base_name}`.
    pub fn mint_spec(&self, prefix: &str, default: ParamDefault) -> ParamSpec {
        ParamSpec {
            name: format!("{prefix}{}", self.base_name),
            logical_type: self.logical_type.clone(),
            view_type: self.view_type.clone(),
            default,
        }
    }

    pub fn first(&self) -> Option<&Argument> {
        self.domain.first()
    }

    pub fn last(&self) -> Option<&Argument> {
        self.domain.last()
    }

    /// Check that the domain is non-empty and every element realizes to a
    /// value the logical type accepts.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.domain.is_empty() {
            return Err(TemplateError::EmptyDomain(self.base_name.clone()));
        }
        for (index, argument) in self.domain.iter().enumerate() {
            let value = argument
                .preview()
                .map_err(|source| TemplateError::Unrealizable {
                    template: self.base_name.clone(),
                    index,
                    source,
                })?;
            if !self.logical_type.accepts(&value) {
                return Err(TemplateError::OutOfDomain {
                    template: self.base_name.clone(),
                    index,
                    value: value.to_string(),
                    logical_type: self.logical_type.to_string(),
                });
            }
        }
        Ok(())
    }
}

// ── Parameter specs ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ParamDefault {
    /// The parameter is required.
    NoDefault,
    /// `Value::None` marks an optional parameter.
    Value(Value),
}

impl ParamDefault {
    pub fn value(&self) -> Option<&Value> {
        match self {
            ParamDefault::NoDefault => None,
            ParamDefault::Value(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub logical_type: TypeDescriptor,
    pub view_type: ViewType,
    pub default: ParamDefault,
}

impl ParamSpec {
    pub fn new(
        name: impl Into<String>,
        logical_type: TypeDescriptor,
        view_type: ViewType,
        default: ParamDefault,
    ) -> Self {
        Self {
            name: name.into(),
            logical_type,
            view_type,
            default,
        }
    }

    pub fn is_required(&self) -> bool {
        self.default == ParamDefault::NoDefault
    }
}

// ── Invocations ──────────────────────────────────────────────────────

/// One legal call of an action and the output types it must produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub arguments: Vec<(String, Argument)>,
    pub expected_outputs: Vec<(String, TypeDescriptor)>,
}

impl Invocation {
    pub fn new(
        arguments: Vec<(String, Argument)>,
        expected_outputs: Vec<(String, TypeDescriptor)>,
    ) -> Self {
        Self {
            arguments,
            expected_outputs,
        }
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, argument)| argument)
    }
}

// ── Action templates ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ActionTemplate {
    action_id: String,
    parameter_specs: Vec<ParamSpec>,
    registered_outputs: Vec<(String, TypeDescriptor)>,
    invocation_domain: Vec<Invocation>,
}

impl ActionTemplate {
    pub fn new(
        action_id: impl Into<String>,
        parameter_specs: Vec<ParamSpec>,
        registered_outputs: Vec<(String, TypeDescriptor)>,
        invocation_domain: Vec<Invocation>,
    ) -> Result<Self, TemplateError> {
        let template = Self {
            action_id: action_id.into(),
            parameter_specs,
            registered_outputs,
            invocation_domain,
        };
        template.check()?;
        Ok(template)
    }

    fn check(&self) -> Result<(), TemplateError> {
        let action = &self.action_id;

        let mut names = HashSet::new();
        for spec in &self.parameter_specs {
            if !names.insert(spec.name.as_str()) {
                return Err(TemplateError::DuplicateParameter {
                    action: action.clone(),
                    name: spec.name.clone(),
                });
            }
            if let ParamDefault::Value(value) = &spec.default {
                if !value.is_none() && !spec.logical_type.accepts(value) {
                    return Err(TemplateError::InvalidDefault {
                        action: action.clone(),
                        name: spec.name.clone(),
                        value: value.to_string(),
                        logical_type: spec.logical_type.to_string(),
                    });
                }
            }
        }

        let mut outputs = HashSet::new();
        for (name, _) in &self.registered_outputs {
            if !outputs.insert(name.as_str()) {
                return Err(TemplateError::DuplicateOutput {
                    action: action.clone(),
                    name: name.clone(),
                });
            }
        }
        let expected: Vec<String> = self.output_names().map(str::to_string).collect();

        for (invocation, call) in self.invocation_domain.iter().enumerate() {
            let mut passed = HashSet::new();
            for (name, _) in &call.arguments {
                if !names.contains(name.as_str()) {
                    return Err(TemplateError::UnknownArgument {
                        action: action.clone(),
                        invocation,
                        name: name.clone(),
                    });
                }
                if !passed.insert(name.as_str()) {
                    return Err(TemplateError::RepeatedArgument {
                        action: action.clone(),
                        invocation,
                        name: name.clone(),
                    });
                }
            }

            let found: Vec<String> = call
                .expected_outputs
                .iter()
                .map(|(name, _)| name.clone())
                .collect();
            if found != expected {
                return Err(TemplateError::OutputMismatch {
                    action: action.clone(),
                    invocation,
                    expected: expected.clone(),
                    found,
                });
            }
        }
        Ok(())
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn parameter_specs(&self) -> &[ParamSpec] {
        &self.parameter_specs
    }

    pub fn spec(&self, name: &str) -> Option<&ParamSpec> {
        self.parameter_specs.iter().find(|spec| spec.name == name)
    }

    pub fn registered_outputs(&self) -> &[(String, TypeDescriptor)] {
        &self.registered_outputs
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.registered_outputs.iter().map(|(name, _)| name.as_str())
    }

    pub fn invocation_domain(&self) -> &[Invocation] {
        &self.invocation_domain
    }
}

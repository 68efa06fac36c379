use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use stew_echo::{EchoFunction, Signature};
use stew_host::{ActionRegistry, HostError, Registration, UsageError, UsageExample};
use stew_ir::types::{SemanticType, TypeDescriptor, ViewType};

use crate::config::SandboxConfig;
use crate::session::Session;

/// A registered action as the sandbox keeps it.
pub(crate) struct RegisteredAction {
    pub(crate) function: Arc<EchoFunction>,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) examples: Vec<Box<dyn UsageExample>>,
}

/// An in-memory plugin host.
pub struct Sandbox {
    config: SandboxConfig,
    semantic_types: BTreeSet<String>,
    /// Format name to the file it is stored in.
    formats: BTreeMap<String, String>,
    transformers: Vec<(ViewType, ViewType)>,
    actions: Vec<RegisteredAction>,
    index: HashMap<String, usize>,
}

/// Result of replaying one usage example.
#[derive(Debug, Clone)]
pub struct ExampleOutcome {
    pub action: String,
    pub example: String,
    pub result: Result<(), UsageError>,
}

impl ExampleOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl Sandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            config,
            semantic_types: BTreeSet::new(),
            formats: BTreeMap::new(),
            transformers: Vec::new(),
            actions: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn has_semantic_type(&self, name: &str) -> bool {
        self.semantic_types.contains(name)
    }

    pub fn semantic_types(&self) -> impl Iterator<Item = &str> {
        self.semantic_types.iter().map(String::as_str)
    }

    pub fn format_file(&self, format: &str) -> Option<&str> {
        self.formats.get(format).map(String::as_str)
    }

    pub fn has_transformer(&self, from: &ViewType, to: &ViewType) -> bool {
        self.transformers.iter().any(|(f, t)| f == from && t == to)
    }

    /// Action ids in registration order.
    pub fn action_ids(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|a| a.function.name())
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn example_count(&self) -> usize {
        self.actions.iter().map(|a| a.examples.len()).sum()
    }

    pub fn signature(&self, action_id: &str) -> Option<&Signature> {
        self.lookup(action_id).map(|a| a.function.signature())
    }

    /// Display name and description of a registered action.
    pub fn describe(&self, action_id: &str) -> Option<(&str, &str)> {
        self.lookup(action_id)
            .map(|a| (a.name.as_str(), a.description.as_str()))
    }

    pub(crate) fn lookup(&self, action_id: &str) -> Option<&RegisteredAction> {
        self.index.get(action_id).map(|&idx| &self.actions[idx])
    }

    /// A fresh execution session with no recorded inputs.
    pub fn session(&self) -> Session<'_> {
        Session::new(self)
    }

    /// Replay the examples of one action, each in its own session.
    pub fn run_action_examples(&self, action_id: &str) -> Result<Vec<ExampleOutcome>, HostError> {
        let action = self
            .lookup(action_id)
            .ok_or_else(|| HostError::UnknownAction(action_id.to_string()))?;
        Ok(self.replay(action))
    }

    /// Replay every registered example, in registration order.
    pub fn run_examples(&self) -> Vec<ExampleOutcome> {
        let outcomes: Vec<ExampleOutcome> = self
            .actions
            .iter()
            .flat_map(|action| self.replay(action))
            .collect();
        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        tracing::info!(
            examples = outcomes.len(),
            failed,
            mode = ?self.config.mode,
            "replayed usage examples"
        );
        outcomes
    }

    fn replay(&self, action: &RegisteredAction) -> Vec<ExampleOutcome> {
        action
            .examples
            .iter()
            .map(|example| {
                let mut session = self.session();
                ExampleOutcome {
                    action: action.function.name().to_string(),
                    example: example.name().to_string(),
                    result: example.run(&mut session),
                }
            })
            .collect()
    }

    fn check_known_types(&self, action: &str, ty: &TypeDescriptor) -> Result<(), HostError> {
        match ty
            .semantic_names()
            .into_iter()
            .find(|name| !self.semantic_types.contains(name))
        {
            Some(name) => Err(HostError::UnknownSemanticType {
                action: action.to_string(),
                name,
            }),
            None => Ok(()),
        }
    }
}

impl ActionRegistry for Sandbox {
    fn register_semantic_type(&mut self, semantic_type: &SemanticType) -> Result<(), HostError> {
        tracing::trace!(semantic_type = %semantic_type, "registered semantic type");
        self.semantic_types.insert(semantic_type.name.clone());
        Ok(())
    }

    fn register_format(&mut self, format: &str, file_name: &str) -> Result<(), HostError> {
        self.formats.insert(format.to_string(), file_name.to_string());
        Ok(())
    }

    fn register_transformer(&mut self, from: ViewType, to: ViewType) -> Result<(), HostError> {
        if !self.has_transformer(&from, &to) {
            self.transformers.push((from, to));
        }
        Ok(())
    }

    fn register_action(&mut self, registration: Registration) -> Result<(), HostError> {
        let action_id = registration.action_id().to_string();
        if self.index.contains_key(&action_id) {
            return Err(HostError::DuplicateAction(action_id));
        }

        let signature = registration.function.signature();
        for spec in &signature.parameters {
            self.check_known_types(&action_id, &spec.logical_type)?;
        }
        for output in &signature.outputs {
            self.check_known_types(&action_id, &output.semantic_type)?;
        }

        tracing::debug!(
            action = %action_id,
            parameters = signature.parameters.len(),
            outputs = signature.outputs.len(),
            examples = registration.examples.len(),
            "registered action"
        );
        self.index.insert(action_id, self.actions.len());
        self.actions.push(RegisteredAction {
            function: Arc::new(registration.function),
            name: registration.name,
            description: registration.description,
            examples: registration.examples,
        });
        Ok(())
    }
}

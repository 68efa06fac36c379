//! The registration API.

use stew_echo::EchoFunction;
use stew_ir::types::{SemanticType, ViewType};

use crate::error::{HostError, UsageError};
use crate::usage::UsageDriver;

/// A replayable example attached to a registered action.
pub trait UsageExample: Send + Sync {
    fn name(&self) -> &str;

    fn run(&self, driver: &mut dyn UsageDriver) -> Result<(), UsageError>;
}

/// Everything the host needs to register one action.
pub struct Registration {
    pub function: EchoFunction,
    pub name: String,
    pub description: String,
    pub examples: Vec<Box<dyn UsageExample>>,
}

impl Registration {
    pub fn action_id(&self) -> &str {
        self.function.name()
    }
}

pub trait ActionRegistry {
    fn register_semantic_type(&mut self, semantic_type: &SemanticType) -> Result<(), HostError>;

    /// A text format stored in a single file named `file_name`.
    fn register_format(&mut self, format: &str, file_name: &str) -> Result<(), HostError>;

    fn register_transformer(&mut self, from: ViewType, to: ViewType) -> Result<(), HostError>;

    fn register_action(&mut self, registration: Registration) -> Result<(), HostError>;
}

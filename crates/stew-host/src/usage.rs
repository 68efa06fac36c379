//! The execution API a usage example drives.

use stew_ir::metadata::Metadata;
use stew_ir::types::TypeDescriptor;
use stew_ir::value::{Artifact, Factory, Value};

use crate::error::{AssertionError, HostError};

/// A recorded artifact or metadata input, by recording name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputRef {
    name: String,
}

impl InputRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One argument as submitted to [`UsageDriver::action`].
#[derive(Debug, Clone, PartialEq)]
pub enum UsageInput {
    Value(Value),
    Record(InputRef),
    List(Vec<UsageInput>),
    Set(Vec<UsageInput>),
    Dict(Vec<(String, UsageInput)>),
}

pub trait UsageDriver {
    fn init_artifact(
        &mut self,
        name: &str,
        factory: Factory<Artifact>,
    ) -> Result<InputRef, HostError>;

    fn init_metadata(
        &mut self,
        name: &str,
        factory: Factory<Metadata>,
    ) -> Result<InputRef, HostError>;

    fn get_metadata_column(
        &mut self,
        name: &str,
        column: &str,
        metadata: &InputRef,
    ) -> Result<InputRef, HostError>;

    /// Merge recorded tables left to right.
    fn merge_metadata(&mut self, name: &str, records: &[InputRef]) -> Result<InputRef, HostError>;

    /// Run `action_id`. `outputs` binds each declared output name to the
    /// name it is recorded under; one handle comes back per binding, in
    /// order.
    fn action(
        &mut self,
        action_id: &str,
        inputs: Vec<(String, UsageInput)>,
        outputs: &[(String, String)],
    ) -> Result<Vec<Box<dyn OutputHandle>>, HostError>;
}

/// A produced output.
pub trait OutputHandle: Send {
    fn name(&self) -> &str;

    /// Semantic type equality with `expected`.
    fn assert_output_type(&self, expected: &TypeDescriptor) -> Result<(), AssertionError>;

    /// Some line of the file at `path` matches the regular expression.
    fn assert_has_line_matching(&self, path: &str, expression: &str) -> Result<(), AssertionError>;

    /// Number of lines in the file at `path`.
    fn line_count(&self, path: &str) -> Result<usize, AssertionError>;

    /// Member keys in order, or `None` for a single output.
    fn member_keys(&self) -> Option<Vec<String>>;

    fn member(&self, key: &str) -> Result<&dyn OutputHandle, AssertionError>;
}

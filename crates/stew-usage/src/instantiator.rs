use std::collections::HashMap;

use stew_echo::function::COLLECTION_KEYS;
use stew_echo::normalize::canonical_line;
use stew_host::{AssertionError, InputRef, OutputHandle, UsageDriver, UsageError, UsageExample, UsageInput};
use stew_ir::argument::Argument;
use stew_ir::format::ECHO_FILE;
use stew_ir::metadata::{Metadata, MetadataError};
use stew_ir::template::{ActionTemplate, Invocation, ParamDefault, ParamSpec};
use stew_ir::types::TypeDescriptor;
use stew_ir::value::{Artifact, Factory, Value};

/// Anchored, escaped pattern matching exactly `line`.
pub fn exact_line(line: &str) -> String {
    format!("^{}$", regex::escape(line))
}

/// Replays one invocation of one action and checks every output.
#[derive(Debug, Clone)]
pub struct UsageInstantiator {
    name: String,
    action_id: String,
    parameter_specs: Vec<ParamSpec>,
    arguments: Vec<(String, Argument)>,
    expected_outputs: Vec<(String, TypeDescriptor)>,
}

impl UsageInstantiator {
    pub fn new(name: impl Into<String>, template: &ActionTemplate, invocation: &Invocation) -> Self {
        Self {
            name: name.into(),
            action_id: template.action_id().to_string(),
            parameter_specs: template.parameter_specs().to_vec(),
            arguments: invocation.arguments.clone(),
            expected_outputs: invocation.expected_outputs.clone(),
        }
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn replay(&self, driver: &mut dyn UsageDriver) -> Result<(), UsageError> {
        tracing::debug!(example = %self.name, action = %self.action_id, "replaying");

        let mut memo = Memo::default();
        let mut inputs = Vec::with_capacity(self.arguments.len());
        let mut realized: Vec<(String, Value)> = Vec::with_capacity(self.parameter_specs.len());

        for (name, argument) in &self.arguments {
            if !self.parameter_specs.iter().any(|spec| &spec.name == name) {
                return Err(UsageError::UnknownParameter {
                    example: self.name.clone(),
                    action: self.action_id.clone(),
                    parameter: name.clone(),
                });
            }
            let (input, value) = memo.resolve(driver, argument)?;
            inputs.push((name.clone(), input));
            realized.push((name.clone(), value));
        }
        for spec in &self.parameter_specs {
            if realized.iter().any(|(name, _)| *name == spec.name) {
                continue;
            }
            if let ParamDefault::Value(default) = &spec.default {
                realized.push((spec.name.clone(), default.clone()));
            }
        }

        let bindings: Vec<(String, String)> = self
            .expected_outputs
            .iter()
            .map(|(name, _)| (name.clone(), name.clone()))
            .collect();
        let results = driver.action(&self.action_id, inputs, &bindings)?;
        if results.len() != self.expected_outputs.len() {
            return Err(UsageError::OutputCount {
                example: self.name.clone(),
                expected: self.expected_outputs.len(),
                found: results.len(),
            });
        }

        for (idx, (handle, (_, expected))) in results.iter().zip(&self.expected_outputs).enumerate() {
            handle.assert_output_type(expected)?;
            if idx == 0 {
                assert_echoed(handle.as_ref(), &realized)?;
            } else {
                assert_ordinal(handle.as_ref(), idx + 1)?;
            }
        }
        Ok(())
    }
}

fn assert_echoed(handle: &dyn OutputHandle, realized: &[(String, Value)]) -> Result<(), UsageError> {
    match handle.member_keys() {
        None => {
            assert_line_count(handle, realized.len())?;
            for (name, value) in realized {
                handle.assert_has_line_matching(ECHO_FILE, &exact_line(&canonical_line(name, value)))?;
            }
        }
        Some(_) if realized.is_empty() => assert_ordinal(handle, 1)?,
        Some(_) => {
            for (name, value) in realized {
                let member = handle.member(name)?;
                assert_line_count(member, 1)?;
                member.assert_has_line_matching(ECHO_FILE, &exact_line(&canonical_line(name, value)))?;
            }
        }
    }
    Ok(())
}

/// One echoed line per realized argument, no more.
fn assert_line_count(handle: &dyn OutputHandle, expected: usize) -> Result<(), UsageError> {
    let found = handle.line_count(ECHO_FILE)?;
    if found == expected {
        Ok(())
    } else {
        Err(AssertionError::LineCount {
            output: handle.name().to_string(),
            path: ECHO_FILE.to_string(),
            expected,
            found,
        }
        .into())
    }
}

fn assert_ordinal(handle: &dyn OutputHandle, ordinal: usize) -> Result<(), UsageError> {
    match handle.member_keys() {
        None => handle.assert_has_line_matching(ECHO_FILE, &exact_line(&ordinal.to_string()))?,
        Some(_) => {
            for key in COLLECTION_KEYS {
                handle
                    .member(key)?
                    .assert_has_line_matching(ECHO_FILE, &exact_line(&format!("{ordinal}: {key}")))?;
            }
        }
    }
    Ok(())
}

impl UsageExample for UsageInstantiator {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, driver: &mut dyn UsageDriver) -> Result<(), UsageError> {
        self.replay(driver).inspect_err(|err| {
            tracing::warn!(example = %self.name, action = %self.action_id, error = %err, "replay failed");
        })
    }
}

/// One example per invocation, named `example_{n}` from 0.
pub fn usage_examples(template: &ActionTemplate) -> Vec<Box<dyn UsageExample>> {
    template
        .invocation_domain()
        .iter()
        .enumerate()
        .map(|(idx, invocation)| {
            Box::new(UsageInstantiator::new(format!("example_{idx}"), template, invocation))
                as Box<dyn UsageExample>
        })
        .collect()
}

/// Recorded inputs for a single replay, keyed by factory.
#[derive(Default)]
struct Memo {
    artifacts: HashMap<Factory<Artifact>, (InputRef, Artifact)>,
    metadata: HashMap<Factory<Metadata>, (InputRef, Metadata)>,
}

impl Memo {
    fn artifact(
        &mut self,
        driver: &mut dyn UsageDriver,
        factory: Factory<Artifact>,
    ) -> Result<(InputRef, Artifact), UsageError> {
        if let Some(hit) = self.artifacts.get(&factory) {
            return Ok(hit.clone());
        }
        let record = driver.init_artifact(factory.name(), factory)?;
        let entry = (record, factory.produce()?);
        self.artifacts.insert(factory, entry.clone());
        Ok(entry)
    }

    fn metadata(
        &mut self,
        driver: &mut dyn UsageDriver,
        factory: Factory<Metadata>,
    ) -> Result<(InputRef, Metadata), UsageError> {
        if let Some(hit) = self.metadata.get(&factory) {
            return Ok(hit.clone());
        }
        let record = driver.init_metadata(factory.name(), factory)?;
        let entry = (record, factory.produce()?);
        self.metadata.insert(factory, entry.clone());
        Ok(entry)
    }

    /// The submitted input and the value the action should observe.
    fn resolve(
        &mut self,
        driver: &mut dyn UsageDriver,
        argument: &Argument,
    ) -> Result<(UsageInput, Value), UsageError> {
        Ok(match argument {
            Argument::Value(value) => (UsageInput::Value(value.clone()), value.clone()),
            Argument::Artifact(factory) => {
                let (record, artifact) = self.artifact(driver, *factory)?;
                (UsageInput::Record(record), Value::Artifact(artifact))
            }
            Argument::Metadata(factory) => {
                let (record, md) = self.metadata(driver, *factory)?;
                (UsageInput::Record(record), Value::Metadata(md))
            }
            Argument::Column { table, column } => {
                let (record, md) = self.metadata(driver, *table)?;
                let name = format!("{}_{}", table.name(), column);
                let projected = driver.get_metadata_column(&name, column, &record)?;
                (UsageInput::Record(projected), Value::Column(md.column(column)?))
            }
            Argument::Merged(tables) => {
                let mut records = Vec::with_capacity(tables.len());
                let mut merged: Option<Metadata> = None;
                for table in tables {
                    let (record, md) = self.metadata(driver, *table)?;
                    records.push(record);
                    merged = Some(match merged {
                        None => md,
                        Some(left) => left.merge(&md)?,
                    });
                }
                let merged = merged.ok_or(MetadataError::NothingToMerge)?;
                let name = tables.iter().map(|t| t.name()).collect::<Vec<_>>().join("_");
                let record = driver.merge_metadata(&name, &records)?;
                (UsageInput::Record(record), Value::Metadata(merged))
            }
            Argument::List(items) => {
                let (inputs, values) = self.resolve_all(driver, items)?;
                (UsageInput::List(inputs), Value::List(values))
            }
            Argument::Set(items) => {
                let (inputs, values) = self.resolve_all(driver, items)?;
                (UsageInput::Set(inputs), Value::Set(values))
            }
            Argument::Dict(entries) => {
                let mut inputs = Vec::with_capacity(entries.len());
                let mut values = Vec::with_capacity(entries.len());
                for (key, item) in entries {
                    let (input, value) = self.resolve(driver, item)?;
                    inputs.push((key.clone(), input));
                    values.push((key.clone(), value));
                }
                (UsageInput::Dict(inputs), Value::Dict(values))
            }
        })
    }

    fn resolve_all(
        &mut self,
        driver: &mut dyn UsageDriver,
        items: &[Argument],
    ) -> Result<(Vec<UsageInput>, Vec<Value>), UsageError> {
        let mut inputs = Vec::with_capacity(items.len());
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            let (input, value) = self.resolve(driver, item)?;
            inputs.push(input);
            values.push(value);
        }
        Ok((inputs, values))
    }
}

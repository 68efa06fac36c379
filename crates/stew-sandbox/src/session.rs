use std::collections::HashMap;
use std::sync::Arc;

use stew_echo::{EchoFunction, OutputPayload};
use stew_host::{HostError, InputRef, OutputHandle, UsageDriver, UsageInput};
use stew_ir::metadata::{Metadata, MetadataColumn, MetadataError};
use stew_ir::template::{ParamDefault, ParamSpec};
use stew_ir::typemap::VarRole;
use stew_ir::types::{TypeDescriptor, ViewType};
use stew_ir::value::{Artifact, Factory, Value};
use tokio::runtime::Runtime;

use crate::config::ExecutionMode;
use crate::output::SandboxOutput;
use crate::sandbox::Sandbox;

#[derive(Debug, Clone)]
enum Record {
    Artifact(Artifact),
    Metadata(Metadata),
    Column(MetadataColumn),
}

/// Execution state for one usage example: recorded inputs, keyed by the
/// name they were recorded under.
pub struct Session<'a> {
    sandbox: &'a Sandbox,
    records: HashMap<String, Record>,
    runtime: Option<Runtime>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(sandbox: &'a Sandbox) -> Self {
        Self {
            sandbox,
            records: HashMap::new(),
            runtime: None,
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    fn record(&self, name: &str) -> Result<&Record, HostError> {
        self.records
            .get(name)
            .ok_or_else(|| HostError::UnknownRecord(name.to_string()))
    }

    fn metadata(&self, record: &InputRef) -> Result<&Metadata, HostError> {
        match self.record(record.name())? {
            Record::Metadata(md) => Ok(md),
            _ => Err(HostError::NotMetadata(record.name().to_string())),
        }
    }

    fn realize(&self, input: &UsageInput) -> Result<Value, HostError> {
        Ok(match input {
            UsageInput::Value(value) => value.clone(),
            UsageInput::Record(record) => match self.record(record.name())? {
                Record::Artifact(artifact) => Value::Artifact(artifact.clone()),
                Record::Metadata(md) => Value::Metadata(md.clone()),
                Record::Column(column) => Value::Column(column.clone()),
            },
            UsageInput::List(items) => Value::List(self.realize_all(items)?),
            UsageInput::Set(items) => Value::Set(self.realize_all(items)?),
            UsageInput::Dict(entries) => Value::Dict(
                entries
                    .iter()
                    .map(|(key, item)| Ok((key.clone(), self.realize(item)?)))
                    .collect::<Result<_, HostError>>()?,
            ),
        })
    }

    fn realize_all(&self, items: &[UsageInput]) -> Result<Vec<Value>, HostError> {
        items.iter().map(|item| self.realize(item)).collect()
    }

    fn execute(
        &mut self,
        function: Arc<EchoFunction>,
        kwargs: Vec<(String, Value)>,
    ) -> Result<Vec<OutputPayload>, HostError> {
        match self.sandbox.config().mode {
            ExecutionMode::Sync => Ok(function.call(&kwargs)?),
            ExecutionMode::Async => {
                if self.runtime.is_none() {
                    let runtime = tokio::runtime::Builder::new_current_thread()
                        .build()
                        .map_err(|err| HostError::Runtime(err.to_string()))?;
                    self.runtime = Some(runtime);
                }
                let runtime = self
                    .runtime
                    .as_ref()
                    .ok_or_else(|| HostError::Runtime("runtime unavailable".to_string()))?;
                let joined = runtime.block_on(async move {
                    tokio::task::spawn_blocking(move || function.call(&kwargs)).await
                });
                Ok(joined.map_err(|err| HostError::Runtime(err.to_string()))??)
            }
        }
    }
}

/// Bind `inputs` against `parameters`, filling defaults and type-checking
/// every value. The result is in declaration order.
fn bind_arguments(
    action: &str,
    parameters: &[ParamSpec],
    mut inputs: Vec<(String, Value)>,
) -> Result<Vec<(String, Value)>, HostError> {
    if let Some((name, _)) = inputs
        .iter()
        .find(|(name, _)| !parameters.iter().any(|p| &p.name == name))
    {
        return Err(HostError::UnknownParameter {
            action: action.to_string(),
            parameter: name.clone(),
        });
    }

    let mut kwargs = Vec::with_capacity(parameters.len());
    for spec in parameters {
        let value = match inputs.iter().position(|(name, _)| *name == spec.name) {
            Some(idx) => inputs.swap_remove(idx).1,
            None => match &spec.default {
                ParamDefault::Value(default) => default.clone(),
                ParamDefault::NoDefault => {
                    return Err(HostError::MissingParameter {
                        action: action.to_string(),
                        parameter: spec.name.clone(),
                    })
                }
            },
        };

        let admitted = if value.is_none() {
            matches!(spec.default, ParamDefault::Value(Value::None))
        } else {
            spec.logical_type.accepts(&value)
        };
        if !admitted {
            return Err(HostError::TypeMismatch {
                action: action.to_string(),
                parameter: spec.name.clone(),
                expected: spec.logical_type.to_string(),
                value: value.to_string(),
            });
        }
        kwargs.push((spec.name.clone(), value));
    }
    Ok(kwargs)
}

/// Concrete type of a declared output. Output variables are resolved
/// through the row their map selects for the bound input variables.
fn concrete_output_type(
    action: &str,
    declared: &TypeDescriptor,
    parameters: &[ParamSpec],
    kwargs: &[(String, Value)],
) -> Result<TypeDescriptor, HostError> {
    let TypeDescriptor::Var(output) = declared else {
        return Ok(declared.clone());
    };
    let unresolved = || HostError::UnresolvedTypeMap {
        action: action.to_string(),
    };

    let mut positioned: Vec<(usize, &Value)> = parameters
        .iter()
        .zip(kwargs)
        .filter_map(|(spec, (_, value))| match &spec.logical_type {
            TypeDescriptor::Var(input)
                if input.role() == VarRole::Input && input.shares_map(output) =>
            {
                Some((input.position(), value))
            }
            _ => None,
        })
        .collect();
    positioned.sort_by_key(|(position, _)| *position);
    let values: Vec<Value> = positioned.into_iter().map(|(_, v)| v.clone()).collect();

    let row = output.map().resolve(&values).ok_or_else(unresolved)?;
    output.resolve(row).cloned().ok_or_else(unresolved)
}

impl UsageDriver for Session<'_> {
    fn init_artifact(
        &mut self,
        name: &str,
        factory: Factory<Artifact>,
    ) -> Result<InputRef, HostError> {
        let format = ViewType::SingleIntFormat.to_string();
        if self.sandbox.format_file(&format).is_none() {
            return Err(HostError::UnknownFormat(format));
        }
        if !self
            .sandbox
            .has_transformer(&ViewType::Int, &ViewType::SingleIntFormat)
        {
            return Err(HostError::MissingTransformer {
                from: ViewType::Int.to_string(),
                to: format,
            });
        }
        if self.records.contains_key(name) {
            return Ok(InputRef::new(name));
        }

        let artifact = factory.produce()?;
        if let Some(unknown) = TypeDescriptor::artifact(artifact.semantic_type().clone())
            .semantic_names()
            .into_iter()
            .find(|n| !self.sandbox.has_semantic_type(n))
        {
            return Err(HostError::UnknownSemanticType {
                action: name.to_string(),
                name: unknown,
            });
        }
        let stored = Artifact::from_format(artifact.semantic_type().clone(), &artifact.to_format())?;
        tracing::trace!(record = name, "imported artifact");
        self.records.insert(name.to_string(), Record::Artifact(stored));
        Ok(InputRef::new(name))
    }

    fn init_metadata(
        &mut self,
        name: &str,
        factory: Factory<Metadata>,
    ) -> Result<InputRef, HostError> {
        if !self.records.contains_key(name) {
            let md = factory.produce()?;
            self.records.insert(name.to_string(), Record::Metadata(md));
        }
        Ok(InputRef::new(name))
    }

    fn get_metadata_column(
        &mut self,
        name: &str,
        column: &str,
        metadata: &InputRef,
    ) -> Result<InputRef, HostError> {
        if !self.records.contains_key(name) {
            let projected = self.metadata(metadata)?.column(column)?;
            self.records.insert(name.to_string(), Record::Column(projected));
        }
        Ok(InputRef::new(name))
    }

    fn merge_metadata(&mut self, name: &str, records: &[InputRef]) -> Result<InputRef, HostError> {
        if !self.records.contains_key(name) {
            let (first, rest) = records.split_first().ok_or(MetadataError::NothingToMerge)?;
            let mut merged = self.metadata(first)?.clone();
            for record in rest {
                merged = merged.merge(self.metadata(record)?)?;
            }
            self.records.insert(name.to_string(), Record::Metadata(merged));
        }
        Ok(InputRef::new(name))
    }

    fn action(
        &mut self,
        action_id: &str,
        inputs: Vec<(String, UsageInput)>,
        outputs: &[(String, String)],
    ) -> Result<Vec<Box<dyn OutputHandle>>, HostError> {
        let action = self
            .sandbox
            .lookup(action_id)
            .ok_or_else(|| HostError::UnknownAction(action_id.to_string()))?;
        let function = Arc::clone(&action.function);
        let signature = function.signature().clone();

        if outputs.len() != signature.outputs.len() {
            return Err(HostError::OutputBinding {
                action: action_id.to_string(),
                expected: signature.outputs.len(),
                found: outputs.len(),
            });
        }

        let realized = inputs
            .iter()
            .map(|(name, input)| Ok((name.clone(), self.realize(input)?)))
            .collect::<Result<Vec<_>, HostError>>()?;
        let kwargs = bind_arguments(action_id, &signature.parameters, realized)?;

        let mut concrete = Vec::with_capacity(outputs.len());
        for (declared, recorded) in outputs {
            let idx = signature
                .outputs
                .iter()
                .position(|o| &o.name == declared)
                .ok_or_else(|| HostError::OutputBinding {
                    action: action_id.to_string(),
                    expected: signature.outputs.len(),
                    found: outputs.len(),
                })?;
            let ty = concrete_output_type(
                action_id,
                &signature.outputs[idx].semantic_type,
                &signature.parameters,
                &kwargs,
            )?;
            concrete.push((idx, recorded.clone(), ty));
        }

        let payloads = self.execute(function, kwargs)?;
        tracing::debug!(action = action_id, outputs = payloads.len(), "executed action");

        let mut payloads: Vec<Option<OutputPayload>> = payloads.into_iter().map(Some).collect();
        concrete
            .into_iter()
            .map(|(idx, recorded, ty)| {
                let payload = payloads
                    .get_mut(idx)
                    .and_then(Option::take)
                    .ok_or_else(|| HostError::OutputBinding {
                        action: action_id.to_string(),
                        expected: outputs.len(),
                        found: idx,
                    })?;
                Ok(Box::new(SandboxOutput::new(recorded, ty, payload)) as Box<dyn OutputHandle>)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stew_ir::types::Range;

    fn spec(name: &str, ty: TypeDescriptor, default: ParamDefault) -> ParamSpec {
        ParamSpec::new(name, ty, ViewType::Int, default)
    }

    #[test]
    fn test_bind_fills_defaults_in_declaration_order() {
        let params = vec![
            spec("a", TypeDescriptor::int(), ParamDefault::NoDefault),
            spec("b", TypeDescriptor::int(), ParamDefault::Value(Value::Int(7))),
            spec("c", TypeDescriptor::int(), ParamDefault::Value(Value::None)),
        ];
        let kwargs = bind_arguments("act", &params, vec![("a".into(), Value::Int(1))]).unwrap();
        assert_eq!(
            kwargs,
            vec![
                ("a".to_string(), Value::Int(1)),
                ("b".to_string(), Value::Int(7)),
                ("c".to_string(), Value::None),
            ]
        );
    }

    #[test]
    fn test_bind_rejects_bad_arguments() {
        let params = vec![spec(
            "a",
            TypeDescriptor::int().range(Range::until(3.0)),
            ParamDefault::NoDefault,
        )];
        assert!(matches!(
            bind_arguments("act", &params, vec![]),
            Err(HostError::MissingParameter { .. })
        ));
        assert!(matches!(
            bind_arguments("act", &params, vec![("a".into(), Value::Int(3))]),
            Err(HostError::TypeMismatch { .. })
        ));
        assert!(matches!(
            bind_arguments("act", &params, vec![("a".into(), Value::None)]),
            Err(HostError::TypeMismatch { .. })
        ));
        assert!(matches!(
            bind_arguments("act", &params, vec![("z".into(), Value::Int(1))]),
            Err(HostError::UnknownParameter { .. })
        ));
    }
}

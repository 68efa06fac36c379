use serde::Serialize;
use stew_ir::template::ActionTemplate;

use crate::config::PluginInfo;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSummary {
    pub name: String,
    pub logical_type: String,
    pub view_type: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSummary {
    pub name: String,
    pub semantic_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionSummary {
    pub id: String,
    pub parameters: Vec<ParameterSummary>,
    pub outputs: Vec<OutputSummary>,
    pub examples: usize,
}

impl ActionSummary {
    pub fn of(template: &ActionTemplate, examples: usize) -> Self {
        Self {
            id: template.action_id().to_string(),
            parameters: template
                .parameter_specs()
                .iter()
                .map(|spec| ParameterSummary {
                    name: spec.name.clone(),
                    logical_type: spec.logical_type.to_string(),
                    view_type: spec.view_type.to_string(),
                    required: spec.is_required(),
                })
                .collect(),
            outputs: template
                .registered_outputs()
                .iter()
                .map(|(name, ty)| OutputSummary {
                    name: name.clone(),
                    semantic_type: ty.to_string(),
                })
                .collect(),
            examples,
        }
    }
}

/// What the driver registered, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationReport {
    pub plugin: PluginInfo,
    pub semantic_types: Vec<String>,
    pub actions: Vec<ActionSummary>,
}

impl RegistrationReport {
    pub fn new(plugin: PluginInfo) -> Self {
        Self {
            plugin,
            semantic_types: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn action(&self, id: &str) -> Option<&ActionSummary> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn example_count(&self) -> usize {
        self.actions.iter().map(|a| a.examples).sum()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

use std::collections::BTreeMap;

use regex::Regex;
use stew_echo::OutputPayload;
use stew_host::{AssertionError, OutputHandle};
use stew_ir::format::ECHO_FILE;
use stew_ir::types::TypeDescriptor;

#[derive(Debug, Clone)]
enum Contents {
    Files(BTreeMap<String, String>),
    Members(Vec<SandboxOutput>),
}

/// A materialized output: files for a single artifact, members for a
/// collection.
#[derive(Debug, Clone)]
pub struct SandboxOutput {
    name: String,
    semantic_type: TypeDescriptor,
    contents: Contents,
}

impl SandboxOutput {
    pub fn new(name: impl Into<String>, semantic_type: TypeDescriptor, payload: OutputPayload) -> Self {
        let name = name.into();
        let contents = match payload {
            OutputPayload::Single(text) => Contents::Files(echo_file(text)),
            OutputPayload::Collection(members) => {
                let member_type = match &semantic_type {
                    TypeDescriptor::Collection(inner) => inner.as_ref().clone(),
                    other => other.clone(),
                };
                Contents::Members(
                    members
                        .into_iter()
                        .map(|(key, text)| SandboxOutput {
                            name: key,
                            semantic_type: member_type.clone(),
                            contents: Contents::Files(echo_file(text)),
                        })
                        .collect(),
                )
            }
        };
        Self {
            name,
            semantic_type,
            contents,
        }
    }

    pub fn semantic_type(&self) -> &TypeDescriptor {
        &self.semantic_type
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        match &self.contents {
            Contents::Files(files) => files.get(path).map(String::as_str),
            Contents::Members(_) => None,
        }
    }
}

fn echo_file(text: String) -> BTreeMap<String, String> {
    BTreeMap::from([(ECHO_FILE.to_string(), text)])
}

impl OutputHandle for SandboxOutput {
    fn name(&self) -> &str {
        &self.name
    }

    fn assert_output_type(&self, expected: &TypeDescriptor) -> Result<(), AssertionError> {
        if &self.semantic_type == expected {
            Ok(())
        } else {
            Err(AssertionError::OutputType {
                output: self.name.clone(),
                expected: expected.to_string(),
                found: self.semantic_type.to_string(),
            })
        }
    }

    fn assert_has_line_matching(&self, path: &str, expression: &str) -> Result<(), AssertionError> {
        let text = self.file(path).ok_or_else(|| AssertionError::MissingFile {
            output: self.name.clone(),
            path: path.to_string(),
        })?;
        let pattern = Regex::new(expression).map_err(|err| AssertionError::InvalidExpression {
            expression: expression.to_string(),
            message: err.to_string(),
        })?;
        if text.lines().any(|line| pattern.is_match(line)) {
            Ok(())
        } else {
            Err(AssertionError::NoMatchingLine {
                output: self.name.clone(),
                path: path.to_string(),
                expression: expression.to_string(),
            })
        }
    }

    fn line_count(&self, path: &str) -> Result<usize, AssertionError> {
        self.file(path)
            .map(|text| text.lines().count())
            .ok_or_else(|| AssertionError::MissingFile {
                output: self.name.clone(),
                path: path.to_string(),
            })
    }

    fn member_keys(&self) -> Option<Vec<String>> {
        match &self.contents {
            Contents::Files(_) => None,
            Contents::Members(members) => Some(members.iter().map(|m| m.name.clone()).collect()),
        }
    }

    fn member(&self, key: &str) -> Result<&dyn OutputHandle, AssertionError> {
        match &self.contents {
            Contents::Files(_) => Err(AssertionError::NotACollection {
                output: self.name.clone(),
            }),
            Contents::Members(members) => members
                .iter()
                .find(|m| m.name == key)
                .map(|m| m as &dyn OutputHandle)
                .ok_or_else(|| AssertionError::MissingMember {
                    output: self.name.clone(),
                    key: key.to_string(),
                }),
        }
    }
}

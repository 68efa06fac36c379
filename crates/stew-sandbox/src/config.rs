//! Sandbox configuration: how echo bodies are executed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Call the echo body on the replaying thread.
    #[default]
    Sync,
    /// Run the echo body on a tokio blocking task, driven by a
    /// current-thread runtime owned by the session.
    Async,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub mode: ExecutionMode,
}

impl SandboxConfig {
    pub fn with_mode(mode: ExecutionMode) -> Self {
        Self { mode }
    }
}

//! In-memory reference host.
//!
//! [`sandbox::Sandbox`] implements the registration API and hands out
//! per-example [`session::Session`]s implementing the execution API. Echo
//! bodies run inline or on a tokio blocking task, per [`config::SandboxConfig`].

pub mod config;
pub mod output;
pub mod sandbox;
pub mod session;

pub use config::{ExecutionMode, SandboxConfig};
pub use sandbox::{ExampleOutcome, Sandbox};

//! Interfaces to the plugin host.
//!
//! The registration side ([`registry::ActionRegistry`]) receives semantic
//! types, formats, transformers and echo actions with their usage examples.
//! The execution side ([`usage::UsageDriver`]) records inputs, runs actions
//! and hands back [`usage::OutputHandle`]s to assert against. Nothing here
//! holds global state; callers pass the host in.

pub mod error;
pub mod registry;
pub mod usage;

pub use error::{AssertionError, HostError, UsageError};
pub use registry::{ActionRegistry, Registration, UsageExample};
pub use usage::{InputRef, OutputHandle, UsageDriver, UsageInput};

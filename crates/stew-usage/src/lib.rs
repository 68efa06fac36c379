//! Replayable usage examples.
//!
//! A [`UsageInstantiator`] replays one invocation against a
//! [`UsageDriver`](stew_host::UsageDriver): it records every deferred input
//! once per replay, runs the action, and asserts that the first output
//! echoes each realized argument and that later outputs carry their ordinal.

pub mod instantiator;

pub use instantiator::{exact_line, usage_examples, UsageInstantiator};

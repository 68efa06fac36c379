//! Value objects shared by every stage of the stew pipeline.
//!
//! Generators produce [`template::ParamTemplate`]s, builders assemble them into
//! [`template::ActionTemplate`]s, and the echo/usage layers read those
//! templates back. Nothing in this crate talks to a host framework.

pub mod argument;
pub mod format;
pub mod metadata;
pub mod semantic;
pub mod template;
pub mod typemap;
pub mod types;
pub mod value;

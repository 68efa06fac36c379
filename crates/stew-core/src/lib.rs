//! Plugin assembly: configuration, logging, and the registration driver
//! that turns the selected generators into registered echo actions.

pub mod config;
pub mod driver;
pub mod logging;
pub mod report;

pub use config::{ConfigError, PluginInfo, StewConfig};
pub use driver::{build_templates, register_plugin, DriverError};
pub use report::RegistrationReport;

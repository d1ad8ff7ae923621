//! Extension configuration
//!
//! The reserved-for-templates field set is configuration data: the
//! built-in set is used unless a TOML file overrides it.

mod defaults;
mod reserved;

pub use defaults::ATTRS_RESERVED_FOR_TEMPLATES;
pub use reserved::{ConfigError, ExtensionsConfig, ReservedAttributes, TemplatesConfig};

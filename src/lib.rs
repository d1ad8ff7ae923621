//! Batch Extensions - extended job models for the batch job service
//!
//! This crate wraps the base job-submission model with template-mode
//! fields (task factories, application templates) and enforces that a
//! templated job leaves the reserved-for-templates fields unset.

pub mod config;
pub mod error;
pub mod models;

pub use config::{ConfigError, ReservedAttributes, ATTRS_RESERVED_FOR_TEMPLATES};
pub use error::ExtensionError;
pub use models::{
    ApplicationTemplateInfo, ExtendedJobParameter, ExtendedJobParameterBuilder, TaskFactory,
    TaskFactoryError, TemplateReserved,
};

//! Batch Service Base Models
//!
//! Defines the base job-submission models and their JSON wire format.
//! Every model carries an explicit field map (`FieldSpec`) that drives the
//! generic serializer in [`wire`].

pub mod common;
pub mod error;
pub mod field;
pub mod job;
pub mod task;
pub mod wire;

pub use common::{EnvironmentSetting, MetadataItem};
pub use error::ValidationError;
pub use field::{FieldSpec, FieldType, WireModel};
pub use job::{
    AutoPoolSpecification, JobAddParameter, JobConstraints, OnAllTasksComplete, OnTaskFailure,
    PoolInformation, PoolLifetimeOption,
};
pub use task::{
    JobManagerTask, JobPreparationTask, JobReleaseTask, ResourceFile, TaskAddParameter,
    TaskConstraints, TaskDependencies,
};

/// Maximum length of a job or task ID.
pub const MAX_ID_LENGTH: usize = 64;

/// Maximum length of a display name, in Unicode scalar values.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 1024;

/// Lowest job priority accepted by the service.
pub const PRIORITY_MIN: i32 = -1000;

/// Highest job priority accepted by the service.
pub const PRIORITY_MAX: i32 = 1000;

//! Extended models
//!
//! Models that wrap a base service model and add template-mode fields.

mod job;
mod task_factory;
mod template;

pub use job::{ExtendedJobParameter, ExtendedJobParameterBuilder, EXTENSION_FIELDS};
pub use task_factory::{
    FileCollectionTaskFactory, FileSource, MergeTask, ParameterSet, ParametricSweepTaskFactory,
    RepeatTask, TaskCollectionTaskFactory, TaskFactory, TaskFactoryError,
};
pub use template::{ApplicationTemplateInfo, TemplateReserved};

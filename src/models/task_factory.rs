//! Task factories
//!
//! A task factory describes a set of tasks the service generates when the
//! job is expanded. The wire form is tagged by `"type"`.

use batch_models::common::{validate_display_name, validate_environment, validate_id, validate_non_empty};
use batch_models::{EnvironmentSetting, ResourceFile, TaskAddParameter, TaskConstraints, ValidationError};
use serde::{Deserialize, Serialize};

/// Task factory validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskFactoryError {
    #[error("Parameter set step cannot be 0")]
    ZeroStep,

    #[error("Parameter set step must be negative if start ({start}) is greater than end ({end})")]
    StepMustBeNegative { start: i64, end: i64 },

    #[error("Parameter set step must be positive if start ({start}) is less than end ({end})")]
    StepMustBePositive { start: i64, end: i64 },

    #[error("Parametric sweep requires at least one parameter set")]
    NoParameterSets,

    #[error("File source requires exactly one of file_group, url, container_url; got {0}")]
    FileSource(usize),

    #[error("Task collection requires at least one task")]
    EmptyTaskCollection,

    #[error("Duplicate task id in task collection: {0}")]
    DuplicateTaskId(String),

    #[error("Invalid task: {0}")]
    Task(#[from] ValidationError),
}

fn default_step() -> i64 {
    1
}

/// An inclusive integer range swept by a parametric sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub start: i64,
    pub end: i64,
    #[serde(default = "default_step")]
    pub step: i64,
}

impl ParameterSet {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end, step: 1 }
    }

    pub fn with_step(start: i64, end: i64, step: i64) -> Self {
        Self { start, end, step }
    }

    pub fn validate(&self) -> Result<(), TaskFactoryError> {
        if self.step == 0 {
            return Err(TaskFactoryError::ZeroStep);
        }
        if self.start > self.end && self.step > 0 {
            return Err(TaskFactoryError::StepMustBeNegative {
                start: self.start,
                end: self.end,
            });
        }
        if self.start < self.end && self.step < 0 {
            return Err(TaskFactoryError::StepMustBePositive {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Number of values in the range.
    ///
    /// `None` when the set is invalid or the count does not fit in a `u64`.
    pub fn value_count(&self) -> Option<u64> {
        self.validate().ok()?;
        let span = (i128::from(self.end) - i128::from(self.start)).checked_div(i128::from(self.step))?;
        u64::try_from(span + 1).ok()
    }
}

/// Task template repeated once per generated task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub command_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_files: Option<Vec<ResourceFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_settings: Option<Vec<EnvironmentSetting>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<TaskConstraints>,
}

impl RepeatTask {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            display_name: None,
            command_line: command_line.into(),
            resource_files: None,
            environment_settings: None,
            constraints: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.display_name {
            validate_display_name("repeat_task.display_name", name)?;
        }
        validate_non_empty("repeat_task.command_line", &self.command_line)?;
        for file in self.resource_files.iter().flatten() {
            file.validate()?;
        }
        validate_environment("repeat_task.environment_settings", self.environment_settings.as_deref())?;
        if let Some(constraints) = &self.constraints {
            constraints.validate()?;
        }
        Ok(())
    }
}

/// Task run after every generated task has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub task: RepeatTask,
}

impl MergeTask {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = &self.id {
            validate_id("merge_task.id", id)?;
        }
        self.task.validate()
    }
}

/// Where a task-per-file factory finds its input files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_url: Option<String>,
    /// Blob name prefix filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl FileSource {
    pub fn file_group(name: impl Into<String>) -> Self {
        Self {
            file_group: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), TaskFactoryError> {
        let count = [
            self.file_group.is_some(),
            self.url.is_some(),
            self.container_url.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if count != 1 {
            return Err(TaskFactoryError::FileSource(count));
        }
        Ok(())
    }
}

/// One task per combination of parameter values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParametricSweepTaskFactory {
    pub parameter_sets: Vec<ParameterSet>,
    pub repeat_task: RepeatTask,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_task: Option<MergeTask>,
}

impl ParametricSweepTaskFactory {
    /// Number of tasks the sweep generates, excluding the merge task.
    /// `None` on overflow.
    pub fn task_count(&self) -> Option<u64> {
        self.parameter_sets
            .iter()
            .try_fold(1u64, |acc, set| acc.checked_mul(set.value_count()?))
    }
}

/// One task per input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCollectionTaskFactory {
    pub source: FileSource,
    pub repeat_task: RepeatTask,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_task: Option<MergeTask>,
}

/// An explicit list of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCollectionTaskFactory {
    pub tasks: Vec<TaskAddParameter>,
}

/// Polymorphic task-generation spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TaskFactory {
    ParametricSweep(ParametricSweepTaskFactory),
    TaskPerFile(FileCollectionTaskFactory),
    TaskCollection(TaskCollectionTaskFactory),
}

impl TaskFactory {
    /// Wire value of the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskFactory::ParametricSweep(_) => "parametricSweep",
            TaskFactory::TaskPerFile(_) => "taskPerFile",
            TaskFactory::TaskCollection(_) => "taskCollection",
        }
    }

    pub fn validate(&self) -> Result<(), TaskFactoryError> {
        match self {
            TaskFactory::ParametricSweep(sweep) => {
                if sweep.parameter_sets.is_empty() {
                    return Err(TaskFactoryError::NoParameterSets);
                }
                sweep.parameter_sets.iter().try_for_each(ParameterSet::validate)?;
                sweep.repeat_task.validate()?;
                if let Some(merge) = &sweep.merge_task {
                    merge.validate()?;
                }
            }
            TaskFactory::TaskPerFile(per_file) => {
                per_file.source.validate()?;
                per_file.repeat_task.validate()?;
                if let Some(merge) = &per_file.merge_task {
                    merge.validate()?;
                }
            }
            TaskFactory::TaskCollection(collection) => {
                if collection.tasks.is_empty() {
                    return Err(TaskFactoryError::EmptyTaskCollection);
                }
                let mut seen: Vec<String> = Vec::with_capacity(collection.tasks.len());
                for task in &collection.tasks {
                    task.validate()?;
                    // Task IDs are case-insensitive within a job
                    let key = task.id.to_lowercase();
                    if seen.contains(&key) {
                        return Err(TaskFactoryError::DuplicateTaskId(task.id.clone()));
                    }
                    seen.push(key);
                }
            }
        }
        Ok(())
    }
}

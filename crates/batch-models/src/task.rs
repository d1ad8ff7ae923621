//! Task models attached to a job.
//!
//! The Job Manager, Job Preparation and Job Release tasks are owned by the
//! job that declares them. `TaskAddParameter` is a standalone task, used by
//! task collections.

use serde::{Deserialize, Serialize};

use crate::common::{
    validate_display_name, validate_environment, validate_id, validate_non_empty,
    EnvironmentSetting,
};
use crate::error::ValidationError;

/// A file to download to the compute node before the task runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_container_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_storage_container_name: Option<String>,
    /// Destination path relative to the task working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Octal file mode (Linux nodes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_mode: Option<String>,
}

impl ResourceFile {
    /// Resource file downloaded from a single URL.
    pub fn from_url(http_url: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            http_url: Some(http_url.into()),
            storage_container_url: None,
            auto_storage_container_name: None,
            file_path: Some(file_path.into()),
            file_mode: None,
        }
    }

    /// Exactly one source must be given.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let sources = [
            self.http_url.is_some(),
            self.storage_container_url.is_some(),
            self.auto_storage_container_name.is_some(),
        ];
        match sources.iter().filter(|set| **set).count() {
            1 => Ok(()),
            0 => Err(ValidationError::Conflict(
                "resource file needs one of httpUrl, storageContainerUrl, autoStorageContainerName"
                    .to_string(),
            )),
            _ => Err(ValidationError::Conflict(
                "resource file may set only one of httpUrl, storageContainerUrl, autoStorageContainerName"
                    .to_string(),
            )),
        }
    }
}

pub(crate) fn validate_resource_files(files: Option<&[ResourceFile]>) -> Result<(), ValidationError> {
    files.unwrap_or_default().iter().try_for_each(ResourceFile::validate)
}

/// Execution constraints for a single task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConstraints {
    /// ISO-8601 duration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wall_clock_time: Option<String>,
    /// ISO-8601 duration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_time: Option<String>,
    /// -1 retries without limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_task_retry_count: Option<i32>,
}

impl TaskConstraints {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_retry_count("max_task_retry_count", self.max_task_retry_count)
    }
}

pub(crate) fn validate_retry_count(field: &str, count: Option<i32>) -> Result<(), ValidationError> {
    match count {
        Some(value) if value < -1 => Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: i64::from(value),
            min: -1,
            max: i64::from(i32::MAX),
        }),
        _ => Ok(()),
    }
}

/// Details of the Job Manager task launched when the job starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobManagerTask {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub command_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_files: Option<Vec<ResourceFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_settings: Option<Vec<EnvironmentSetting>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<TaskConstraints>,
    /// Whether completion of this task completes the job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kill_job_on_completion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_exclusive: Option<bool>,
}

impl JobManagerTask {
    pub fn new(id: impl Into<String>, command_line: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            command_line: command_line.into(),
            resource_files: None,
            environment_settings: None,
            constraints: None,
            kill_job_on_completion: None,
            run_exclusive: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id("job_manager_task.id", &self.id)?;
        if let Some(name) = &self.display_name {
            validate_display_name("job_manager_task.display_name", name)?;
        }
        validate_non_empty("job_manager_task.command_line", &self.command_line)?;
        validate_resource_files(self.resource_files.as_deref())?;
        validate_environment(
            "job_manager_task.environment_settings",
            self.environment_settings.as_deref(),
        )?;
        if let Some(constraints) = &self.constraints {
            constraints.validate()?;
        }
        Ok(())
    }
}

/// Task run on each compute node before any other task of the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPreparationTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub command_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_files: Option<Vec<ResourceFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_settings: Option<Vec<EnvironmentSetting>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<TaskConstraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerun_on_node_reboot_after_success: Option<bool>,
}

impl JobPreparationTask {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            id: None,
            command_line: command_line.into(),
            resource_files: None,
            environment_settings: None,
            constraints: None,
            wait_for_success: None,
            rerun_on_node_reboot_after_success: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = &self.id {
            validate_id("job_preparation_task.id", id)?;
        }
        validate_non_empty("job_preparation_task.command_line", &self.command_line)?;
        validate_resource_files(self.resource_files.as_deref())?;
        validate_environment(
            "job_preparation_task.environment_settings",
            self.environment_settings.as_deref(),
        )?;
        if let Some(constraints) = &self.constraints {
            constraints.validate()?;
        }
        Ok(())
    }
}

/// Task run on each node that ran the Job Preparation task, when the job ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReleaseTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub command_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_files: Option<Vec<ResourceFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_settings: Option<Vec<EnvironmentSetting>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wall_clock_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_time: Option<String>,
}

impl JobReleaseTask {
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            id: None,
            command_line: command_line.into(),
            resource_files: None,
            environment_settings: None,
            max_wall_clock_time: None,
            retention_time: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = &self.id {
            validate_id("job_release_task.id", id)?;
        }
        validate_non_empty("job_release_task.command_line", &self.command_line)?;
        validate_resource_files(self.resource_files.as_deref())?;
        validate_environment(
            "job_release_task.environment_settings",
            self.environment_settings.as_deref(),
        )
    }
}

/// Inclusive range of task IDs a task depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskIdRange {
    pub start: i64,
    pub end: i64,
}

/// Tasks that must complete before a task is scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDependencies {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id_ranges: Option<Vec<TaskIdRange>>,
}

/// A task to add to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAddParameter {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub command_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_files: Option<Vec<ResourceFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_settings: Option<Vec<EnvironmentSetting>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<TaskConstraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<TaskDependencies>,
}

impl TaskAddParameter {
    pub fn new(id: impl Into<String>, command_line: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            command_line: command_line.into(),
            resource_files: None,
            environment_settings: None,
            constraints: None,
            depends_on: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id("task.id", &self.id)?;
        if let Some(name) = &self.display_name {
            validate_display_name("task.display_name", name)?;
        }
        validate_non_empty("task.command_line", &self.command_line)?;
        validate_resource_files(self.resource_files.as_deref())?;
        validate_environment("task.environment_settings", self.environment_settings.as_deref())?;
        if let Some(constraints) = &self.constraints {
            constraints.validate()?;
        }
        for range in self.depends_on.iter().flat_map(|d| d.task_id_ranges.iter().flatten()) {
            if range.start > range.end {
                return Err(ValidationError::Conflict(format!(
                    "task id range start {} is greater than end {}",
                    range.start, range.end
                )));
            }
        }
        Ok(())
    }
}

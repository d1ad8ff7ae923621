//! Base job descriptor (`JobAddParameter`) and its sub-objects.

use serde::{Deserialize, Serialize};

use crate::common::{
    validate_display_name, validate_environment, validate_id, validate_non_empty,
    EnvironmentSetting, MetadataItem,
};
use crate::error::ValidationError;
use crate::field::{FieldSpec, FieldType, WireModel};
use crate::task::{validate_retry_count, JobManagerTask, JobPreparationTask, JobReleaseTask};
use crate::{PRIORITY_MAX, PRIORITY_MIN};

/// Action taken when every task in the job has completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnAllTasksComplete {
    /// Leave the job active
    #[default]
    NoAction,
    /// Terminate the job with reason `AllTasksComplete`
    TerminateJob,
}

/// Action taken when any task in the job fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnTaskFailure {
    #[default]
    NoAction,
    /// Take the job action from the failed task's exit conditions
    PerformExitOptionsJobAction,
}

/// Execution constraints for a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConstraints {
    /// ISO-8601 duration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wall_clock_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_task_retry_count: Option<i32>,
}

/// Lifetime of an auto pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PoolLifetimeOption {
    Job,
    JobSchedule,
}

/// Auto pool created for the job and torn down with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoPoolSpecification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_pool_id_prefix: Option<String>,
    pub pool_lifetime_option: PoolLifetimeOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<bool>,
    /// Pool specification, owned by the pool models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<serde_json::Value>,
}

/// The pool a job runs on: an existing pool or an auto pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_pool_specification: Option<AutoPoolSpecification>,
}

impl PoolInformation {
    /// Reference an existing pool by ID.
    pub fn pool(pool_id: impl Into<String>) -> Self {
        Self {
            pool_id: Some(pool_id.into()),
            auto_pool_specification: None,
        }
    }

    /// Run the job on an auto pool.
    pub fn auto(spec: AutoPoolSpecification) -> Self {
        Self {
            pool_id: None,
            auto_pool_specification: Some(spec),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match (&self.pool_id, &self.auto_pool_specification) {
            (Some(id), None) => validate_non_empty("pool_info.pool_id", id),
            (None, Some(_)) => Ok(()),
            (Some(_), Some(_)) => Err(ValidationError::Conflict(
                "pool_info may set only one of pool_id and auto_pool_specification".to_string(),
            )),
            (None, None) => Err(ValidationError::MissingRequired(
                "pool_info.pool_id".to_string(),
            )),
        }
    }
}

/// A job to add to the batch service.
///
/// `None` means "not set" and is omitted from the wire; it is distinct from
/// a present-but-empty value such as `Some(vec![])` or `Some(false)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAddParameter {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<JobConstraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_manager_task: Option<JobManagerTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_preparation_task: Option<JobPreparationTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_release_task: Option<JobReleaseTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_environment_settings: Option<Vec<EnvironmentSetting>>,
    pub pool_info: PoolInformation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_all_tasks_complete: Option<OnAllTasksComplete>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_task_failure: Option<OnTaskFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<MetadataItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses_task_dependencies: Option<bool>,
}

/// Field map for [`JobAddParameter`], in declaration order.
pub const JOB_ADD_PARAMETER_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("id", "id", FieldType::Str),
    FieldSpec::optional("display_name", "displayName", FieldType::Str),
    FieldSpec::optional("priority", "priority", FieldType::Int),
    FieldSpec::optional("constraints", "constraints", FieldType::Model("JobConstraints")),
    FieldSpec::optional("job_manager_task", "jobManagerTask", FieldType::Model("JobManagerTask")),
    FieldSpec::optional(
        "job_preparation_task",
        "jobPreparationTask",
        FieldType::Model("JobPreparationTask"),
    ),
    FieldSpec::optional("job_release_task", "jobReleaseTask", FieldType::Model("JobReleaseTask")),
    FieldSpec::optional(
        "common_environment_settings",
        "commonEnvironmentSettings",
        FieldType::List("EnvironmentSetting"),
    ),
    FieldSpec::required("pool_info", "poolInfo", FieldType::Model("PoolInformation")),
    FieldSpec::optional(
        "on_all_tasks_complete",
        "onAllTasksComplete",
        FieldType::Enum("OnAllTasksComplete"),
    ),
    FieldSpec::optional("on_task_failure", "onTaskFailure", FieldType::Enum("OnTaskFailure")),
    FieldSpec::optional("metadata", "metadata", FieldType::List("MetadataItem")),
    FieldSpec::optional("uses_task_dependencies", "usesTaskDependencies", FieldType::Bool),
];

impl JobAddParameter {
    /// Create a job with only the required fields set.
    pub fn new(id: impl Into<String>, pool_info: PoolInformation) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            priority: None,
            constraints: None,
            job_manager_task: None,
            job_preparation_task: None,
            job_release_task: None,
            common_environment_settings: None,
            pool_info,
            on_all_tasks_complete: None,
            on_task_failure: None,
            metadata: None,
            uses_task_dependencies: None,
        }
    }

    /// Priority the service applies, defaulting to 0 when unset.
    pub fn effective_priority(&self) -> i32 {
        self.priority.unwrap_or(0)
    }

    /// Check primitive field rules: lengths, ranges, identifiers and
    /// the structural rules of nested sub-objects.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id("id", &self.id)?;

        if let Some(name) = &self.display_name {
            validate_display_name("display_name", name)?;
        }

        if let Some(priority) = self.priority {
            if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
                return Err(ValidationError::OutOfRange {
                    field: "priority".to_string(),
                    value: i64::from(priority),
                    min: i64::from(PRIORITY_MIN),
                    max: i64::from(PRIORITY_MAX),
                });
            }
        }

        if let Some(constraints) = &self.constraints {
            validate_retry_count("constraints.max_task_retry_count", constraints.max_task_retry_count)?;
        }

        if let Some(task) = &self.job_manager_task {
            task.validate()?;
        }
        if let Some(task) = &self.job_preparation_task {
            task.validate()?;
        }
        if let Some(task) = &self.job_release_task {
            // Rule: a release task undoes what the preparation task did
            if self.job_preparation_task.is_none() {
                return Err(ValidationError::Conflict(
                    "job_release_task cannot be specified without job_preparation_task"
                        .to_string(),
                ));
            }
            task.validate()?;
        }

        validate_environment(
            "common_environment_settings",
            self.common_environment_settings.as_deref(),
        )?;

        self.pool_info.validate()?;

        for item in self.metadata.iter().flatten() {
            validate_non_empty("metadata.name", &item.name)?;
        }

        Ok(())
    }
}

impl WireModel for JobAddParameter {
    const MODEL_NAME: &'static str = "JobAddParameter";

    fn field_map() -> &'static [FieldSpec] {
        JOB_ADD_PARAMETER_FIELDS
    }
}

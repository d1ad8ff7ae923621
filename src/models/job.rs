//! Extended job parameter
//!
//! Wraps the base [`JobAddParameter`] and adds two template-mode fields:
//! a task factory and an application template reference. A job may be
//! specified explicitly or through a template, never both: when a template
//! is referenced, every field in the reserved-for-templates set must be
//! left unset.

use batch_models::field::{FieldSpec, FieldType, WireModel};
use batch_models::job::JOB_ADD_PARAMETER_FIELDS;
use batch_models::{
    wire, EnvironmentSetting, JobAddParameter, JobConstraints, JobManagerTask, JobPreparationTask,
    JobReleaseTask, MetadataItem, OnAllTasksComplete, OnTaskFailure, PoolInformation,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use super::task_factory::TaskFactory;
use super::template::{ApplicationTemplateInfo, TemplateReserved};
use crate::config::ReservedAttributes;
use crate::error::ExtensionError;

/// Field map entries added on top of the base job map.
pub const EXTENSION_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("task_factory", "taskFactory", FieldType::Model("TaskFactoryBase")),
    FieldSpec::optional(
        "application_template_info",
        "applicationTemplateInfo",
        FieldType::Model("ApplicationTemplateInfo"),
    ),
];

/// A job to add, with optional task factory and application template.
///
/// Instances are only produced by [`ExtendedJobParameterBuilder`],
/// [`ExtendedJobParameter::from_parts`] or deserialization, all of which
/// run the full validation. Fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedJobParameter {
    #[serde(flatten)]
    base: JobAddParameter,
    #[serde(skip_serializing_if = "Option::is_none")]
    task_factory: Option<TaskFactory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_template_info: Option<ApplicationTemplateInfo>,
}

/// Unvalidated wire shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExtendedJob {
    #[serde(flatten)]
    base: JobAddParameter,
    #[serde(default)]
    task_factory: Option<TaskFactory>,
    #[serde(default)]
    application_template_info: Option<ApplicationTemplateInfo>,
}

// Decodes through the field map so serde callers get the same key checks
// as `from_wire`.
impl<'de> Deserialize<'de> for ExtendedJobParameter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_wire(value).map_err(de::Error::custom)
    }
}

impl ExtendedJobParameter {
    /// Start building a job from its two required fields.
    pub fn builder(id: impl Into<String>, pool_info: PoolInformation) -> ExtendedJobParameterBuilder {
        ExtendedJobParameterBuilder {
            base: JobAddParameter::new(id, pool_info),
            task_factory: None,
            application_template_info: None,
        }
    }

    /// Assemble and validate a job.
    ///
    /// A templated job is checked against the reserved-for-templates rule
    /// before anything else, so a reserved field is reported as a conflict
    /// even when its own contents are malformed. Base field rules and the
    /// task factory shape run afterwards.
    pub fn from_parts(
        base: JobAddParameter,
        task_factory: Option<TaskFactory>,
        application_template_info: Option<ApplicationTemplateInfo>,
        reserved: &ReservedAttributes,
    ) -> Result<Self, ExtensionError> {
        let job = Self {
            base,
            task_factory,
            application_template_info,
        };

        if let Some(template) = &job.application_template_info {
            // Rule: jobs may not use properties reserved for template use
            if let Err(err) = job.check_reserved(reserved) {
                tracing::warn!(job_id = %job.base.id, error = %err, "rejected templated job");
                return Err(err);
            }
            template.validate()?;
        }

        job.base.validate()?;

        if let Some(factory) = &job.task_factory {
            factory.validate()?;
        }

        if let Some(template) = &job.application_template_info {
            tracing::debug!(
                job_id = %job.base.id,
                template = %template.file_path,
                "built templated job"
            );
        }

        Ok(job)
    }

    /// Base field map followed by the extension entries.
    pub fn attribute_map() -> &'static [FieldSpec] {
        static MAP: OnceLock<Vec<FieldSpec>> = OnceLock::new();
        MAP.get_or_init(|| {
            JOB_ADD_PARAMETER_FIELDS
                .iter()
                .chain(EXTENSION_FIELDS)
                .copied()
                .collect()
        })
    }

    /// Decode from a wire document, checking against `reserved`.
    pub fn from_wire_with(value: Value, reserved: &ReservedAttributes) -> Result<Self, ExtensionError> {
        let object = value
            .as_object()
            .ok_or_else(|| batch_models::ValidationError::Json("job must be a JSON object".to_string()))?;
        wire::check_object(Self::MODEL_NAME, Self::attribute_map(), object)?;
        let raw: RawExtendedJob = serde_json::from_value(value)?;
        Self::from_parts(raw.base, raw.task_factory, raw.application_template_info, reserved)
    }

    /// Decode from a wire document using the built-in reserved set.
    pub fn from_wire(value: Value) -> Result<Self, ExtensionError> {
        Self::from_wire_with(value, ReservedAttributes::builtin())
    }

    /// Decode from a JSON string using the built-in reserved set.
    pub fn from_json_str(s: &str) -> Result<Self, ExtensionError> {
        Self::from_wire(serde_json::from_str(s)?)
    }

    /// Encode to the wire form. Unset fields are omitted.
    pub fn to_wire(&self) -> Result<Value, ExtensionError> {
        Ok(wire::to_wire(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, ExtensionError> {
        Ok(serde_json::to_string(&self.to_wire()?)?)
    }

    /// SHA-256 hex of the RFC 8785 canonical wire form.
    ///
    /// Jobs built from identical inputs have identical fingerprints.
    pub fn fingerprint(&self) -> Result<String, ExtensionError> {
        let wire = self.to_wire()?;
        let canonical = serde_json_canonicalizer::to_vec(&wire)
            .map_err(|e| ExtensionError::Canonicalization(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Reserved fields that are set, in declaration order. Empty unless a
    /// template is referenced.
    pub fn reserved_fields_set(&self, reserved: &ReservedAttributes) -> Vec<String> {
        self.reserved_conflicts(reserved)
    }

    pub fn is_templated(&self) -> bool {
        self.application_template_info.is_some()
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.base.display_name.as_deref()
    }

    pub fn priority(&self) -> Option<i32> {
        self.base.priority
    }

    pub fn constraints(&self) -> Option<&JobConstraints> {
        self.base.constraints.as_ref()
    }

    pub fn job_manager_task(&self) -> Option<&JobManagerTask> {
        self.base.job_manager_task.as_ref()
    }

    pub fn job_preparation_task(&self) -> Option<&JobPreparationTask> {
        self.base.job_preparation_task.as_ref()
    }

    pub fn job_release_task(&self) -> Option<&JobReleaseTask> {
        self.base.job_release_task.as_ref()
    }

    pub fn common_environment_settings(&self) -> Option<&[EnvironmentSetting]> {
        self.base.common_environment_settings.as_deref()
    }

    pub fn pool_info(&self) -> &PoolInformation {
        &self.base.pool_info
    }

    pub fn on_all_tasks_complete(&self) -> Option<OnAllTasksComplete> {
        self.base.on_all_tasks_complete
    }

    pub fn on_task_failure(&self) -> Option<OnTaskFailure> {
        self.base.on_task_failure
    }

    pub fn metadata(&self) -> Option<&[MetadataItem]> {
        self.base.metadata.as_deref()
    }

    pub fn uses_task_dependencies(&self) -> Option<bool> {
        self.base.uses_task_dependencies
    }

    pub fn task_factory(&self) -> Option<&TaskFactory> {
        self.task_factory.as_ref()
    }

    pub fn application_template_info(&self) -> Option<&ApplicationTemplateInfo> {
        self.application_template_info.as_ref()
    }

    /// The embedded base job.
    pub fn base(&self) -> &JobAddParameter {
        &self.base
    }

    /// Drop the extension fields and keep the base job.
    pub fn into_base(self) -> JobAddParameter {
        self.base
    }
}

impl TemplateReserved for ExtendedJobParameter {
    fn template_fields(&self) -> Vec<(&'static str, bool)> {
        let base = &self.base;
        vec![
            ("display_name", base.display_name.is_some()),
            ("priority", base.priority.is_some()),
            ("constraints", base.constraints.is_some()),
            ("job_manager_task", base.job_manager_task.is_some()),
            ("job_preparation_task", base.job_preparation_task.is_some()),
            ("job_release_task", base.job_release_task.is_some()),
            ("common_environment_settings", base.common_environment_settings.is_some()),
            ("on_all_tasks_complete", base.on_all_tasks_complete.is_some()),
            ("on_task_failure", base.on_task_failure.is_some()),
            ("metadata", base.metadata.is_some()),
            ("uses_task_dependencies", base.uses_task_dependencies.is_some()),
            ("task_factory", self.task_factory.is_some()),
        ]
    }

    fn uses_template(&self) -> bool {
        self.is_templated()
    }
}

impl WireModel for ExtendedJobParameter {
    const MODEL_NAME: &'static str = "ExtendedJobParameter";

    fn field_map() -> &'static [FieldSpec] {
        Self::attribute_map()
    }
}

/// Builder for [`ExtendedJobParameter`]. Every setter marks its field as set.
#[derive(Debug, Clone)]
pub struct ExtendedJobParameterBuilder {
    base: JobAddParameter,
    task_factory: Option<TaskFactory>,
    application_template_info: Option<ApplicationTemplateInfo>,
}

impl ExtendedJobParameterBuilder {
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.base.display_name = Some(display_name.into());
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.base.priority = Some(priority);
        self
    }

    pub fn constraints(mut self, constraints: JobConstraints) -> Self {
        self.base.constraints = Some(constraints);
        self
    }

    pub fn job_manager_task(mut self, task: JobManagerTask) -> Self {
        self.base.job_manager_task = Some(task);
        self
    }

    pub fn job_preparation_task(mut self, task: JobPreparationTask) -> Self {
        self.base.job_preparation_task = Some(task);
        self
    }

    pub fn job_release_task(mut self, task: JobReleaseTask) -> Self {
        self.base.job_release_task = Some(task);
        self
    }

    pub fn common_environment_settings(mut self, settings: Vec<EnvironmentSetting>) -> Self {
        self.base.common_environment_settings = Some(settings);
        self
    }

    pub fn on_all_tasks_complete(mut self, action: OnAllTasksComplete) -> Self {
        self.base.on_all_tasks_complete = Some(action);
        self
    }

    pub fn on_task_failure(mut self, action: OnTaskFailure) -> Self {
        self.base.on_task_failure = Some(action);
        self
    }

    pub fn metadata(mut self, metadata: Vec<MetadataItem>) -> Self {
        self.base.metadata = Some(metadata);
        self
    }

    pub fn uses_task_dependencies(mut self, uses: bool) -> Self {
        self.base.uses_task_dependencies = Some(uses);
        self
    }

    pub fn task_factory(mut self, factory: TaskFactory) -> Self {
        self.task_factory = Some(factory);
        self
    }

    pub fn application_template_info(mut self, template: ApplicationTemplateInfo) -> Self {
        self.application_template_info = Some(template);
        self
    }

    /// Validate against the built-in reserved set.
    pub fn build(self) -> Result<ExtendedJobParameter, ExtensionError> {
        self.build_with(ReservedAttributes::builtin())
    }

    /// Validate against a configured reserved set.
    pub fn build_with(self, reserved: &ReservedAttributes) -> Result<ExtendedJobParameter, ExtensionError> {
        ExtendedJobParameter::from_parts(
            self.base,
            self.task_factory,
            self.application_template_info,
            reserved,
        )
    }
}

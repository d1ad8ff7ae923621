//! Built-in reserved-for-templates field set
//!
//! Fields an application template is responsible for populating. A job that
//! references a template must leave all of these unset. Adding a new
//! template-overridable field to a model means adding its name here too.

/// Field names reserved for application templates, shared by every
/// extended model that supports templates.
pub const ATTRS_RESERVED_FOR_TEMPLATES: &[&str] = &[
    "job_manager_task",
    "common_environment_settings",
    "uses_task_dependencies",
    "on_all_tasks_complete",
    "on_task_failure",
    "task_factory",
    "job_preparation_task",
    "job_release_task",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set() {
        assert_eq!(ATTRS_RESERVED_FOR_TEMPLATES.len(), 8);
        assert!(ATTRS_RESERVED_FOR_TEMPLATES.contains(&"task_factory"));
        assert!(!ATTRS_RESERVED_FOR_TEMPLATES.contains(&"id"));
        assert!(!ATTRS_RESERVED_FOR_TEMPLATES.contains(&"metadata"));
    }
}

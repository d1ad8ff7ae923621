//! Extended Job Parameter Validation Tests
//!
//! Template-mode exclusivity, reserved-rule precedence and configured
//! reserved sets.

use batch_extensions::models::{
    FileCollectionTaskFactory, FileSource, ParameterSet, ParametricSweepTaskFactory, RepeatTask,
    TaskCollectionTaskFactory,
};
use batch_extensions::{
    ApplicationTemplateInfo, ExtendedJobParameter, ExtendedJobParameterBuilder, ExtensionError,
    ReservedAttributes, TaskFactory, ATTRS_RESERVED_FOR_TEMPLATES,
};
use batch_models::{
    EnvironmentSetting, JobConstraints, JobManagerTask, JobPreparationTask, JobReleaseTask,
    MetadataItem, OnAllTasksComplete, OnTaskFailure, PoolInformation, TaskAddParameter,
    ValidationError,
};

fn builder() -> ExtendedJobParameterBuilder {
    ExtendedJobParameter::builder("job1", PoolInformation::pool("pool1"))
}

fn template() -> ApplicationTemplateInfo {
    ApplicationTemplateInfo::new("templates/job.json")
}

fn sweep() -> TaskFactory {
    TaskFactory::ParametricSweep(ParametricSweepTaskFactory {
        parameter_sets: vec![ParameterSet::new(1, 3)],
        repeat_task: RepeatTask::new("echo {0}"),
        merge_task: None,
    })
}

/// Set the named reserved field on a builder.
fn set_reserved(builder: ExtendedJobParameterBuilder, name: &str) -> ExtendedJobParameterBuilder {
    match name {
        "job_manager_task" => builder.job_manager_task(JobManagerTask::new("manager", "run.sh")),
        "job_preparation_task" => builder.job_preparation_task(JobPreparationTask::new("prep.sh")),
        "job_release_task" => builder.job_release_task(JobReleaseTask::new("release.sh")),
        "common_environment_settings" => {
            builder.common_environment_settings(vec![EnvironmentSetting::new("A", "1")])
        }
        "on_all_tasks_complete" => builder.on_all_tasks_complete(OnAllTasksComplete::TerminateJob),
        "on_task_failure" => builder.on_task_failure(OnTaskFailure::NoAction),
        "uses_task_dependencies" => builder.uses_task_dependencies(true),
        "task_factory" => builder.task_factory(sweep()),
        other => panic!("not a reserved field: {}", other),
    }
}

/// Declaration order of the built-in reserved fields.
const DECLARATION_ORDER: &[&str] = &[
    "job_manager_task",
    "job_preparation_task",
    "job_release_task",
    "common_environment_settings",
    "on_all_tasks_complete",
    "on_task_failure",
    "uses_task_dependencies",
    "task_factory",
];

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_scenario_minimal_job() {
    let job = builder().build().expect("minimal job is valid");
    assert_eq!(job.id(), "job1");
    assert_eq!(job.pool_info().pool_id.as_deref(), Some("pool1"));
    assert!(job.task_factory().is_none());
    assert!(job.application_template_info().is_none());
}

#[test]
fn test_scenario_template_with_task_factory() {
    let err = builder()
        .application_template_info(template())
        .task_factory(sweep())
        .build()
        .unwrap_err();
    assert!(err.is_reserved_conflict());
    assert_eq!(err.reserved_fields().unwrap(), ["task_factory"]);
    assert_eq!(
        err.to_string(),
        "Jobs using application templates may not use these properties: task_factory"
    );
}

#[test]
fn test_scenario_template_only() {
    let job = builder().application_template_info(template()).build().unwrap();
    assert!(job.is_templated());
    assert_eq!(job.application_template_info().unwrap().file_path, "templates/job.json");
}

#[test]
fn test_scenario_priority_out_of_range() {
    let err = builder().priority(2000).build().unwrap_err();
    match err {
        ExtensionError::Base(ValidationError::OutOfRange { field, value, .. }) => {
            assert_eq!(field, "priority");
            assert_eq!(value, 2000);
        }
        other => panic!("expected base range error, got {:?}", other),
    }
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_no_template_never_conflicts() {
    let mut b = builder();
    for name in DECLARATION_ORDER {
        b = set_reserved(b, name);
    }
    let job = b.build().expect("explicit mode accepts every field");
    assert!(job.reserved_fields_set(ReservedAttributes::builtin()).is_empty());
}

#[test]
fn test_each_reserved_field_conflicts_alone() {
    for name in ATTRS_RESERVED_FOR_TEMPLATES {
        let err = set_reserved(builder().application_template_info(template()), name)
            .build()
            .unwrap_err();
        let fields = err.reserved_fields().expect("reserved conflict");
        assert_eq!(fields, [name.to_string()]);
    }
}

#[test]
fn test_all_reserved_fields_reported_in_declaration_order() {
    // Set in reverse declaration order to show setter order is irrelevant
    let mut b = builder().application_template_info(template());
    for name in DECLARATION_ORDER.iter().rev() {
        b = set_reserved(b, name);
    }
    let err = b.build().unwrap_err();
    assert_eq!(err.reserved_fields().unwrap(), DECLARATION_ORDER);
}

#[test]
fn test_empty_values_count_as_set() {
    let err = builder()
        .application_template_info(template())
        .common_environment_settings(vec![])
        .uses_task_dependencies(false)
        .build()
        .unwrap_err();
    assert_eq!(
        err.reserved_fields().unwrap(),
        ["common_environment_settings", "uses_task_dependencies"]
    );
}

#[test]
fn test_non_reserved_fields_with_template() {
    let job = builder()
        .display_name("Nightly")
        .priority(-1000)
        .constraints(JobConstraints {
            max_wall_clock_time: Some("PT1H".to_string()),
            max_task_retry_count: Some(3),
        })
        .metadata(vec![MetadataItem::new("team", "render")])
        .application_template_info(template().with_parameter("frames", 100))
        .build()
        .unwrap();
    assert_eq!(job.display_name(), Some("Nightly"));
    assert_eq!(job.priority(), Some(-1000));
    assert_eq!(job.metadata().map(<[MetadataItem]>::len), Some(1));
}

#[test]
fn test_reserved_conflict_reported_before_base_error() {
    let err = builder()
        .priority(5000)
        .task_factory(sweep())
        .application_template_info(template())
        .build()
        .unwrap_err();
    assert_eq!(err.reserved_fields().unwrap(), ["task_factory"]);
}

#[test]
fn test_base_error_with_template_and_no_reserved_fields() {
    let err = builder()
        .priority(5000)
        .application_template_info(template())
        .build()
        .unwrap_err();
    assert!(matches!(err, ExtensionError::Base(ValidationError::OutOfRange { .. })));
}

#[test]
fn test_release_task_alone_conflicts_with_template() {
    let err = builder()
        .job_release_task(JobReleaseTask::new("cleanup.sh"))
        .application_template_info(template())
        .build()
        .unwrap_err();
    assert_eq!(err.reserved_fields().unwrap(), ["job_release_task"]);

    // Without a template the same job breaks the base pairing rule
    let err = builder()
        .job_release_task(JobReleaseTask::new("cleanup.sh"))
        .build()
        .unwrap_err();
    assert!(matches!(err, ExtensionError::Base(ValidationError::Conflict(_))));
}

#[test]
fn test_invalid_task_factory_conflicts_with_template() {
    let zero_step = TaskFactory::ParametricSweep(ParametricSweepTaskFactory {
        parameter_sets: vec![ParameterSet::with_step(1, 5, 0)],
        repeat_task: RepeatTask::new("echo {0}"),
        merge_task: None,
    });
    let err = builder()
        .task_factory(zero_step)
        .application_template_info(template())
        .build()
        .unwrap_err();
    assert_eq!(err.reserved_fields().unwrap(), ["task_factory"]);
}

#[test]
fn test_malformed_job_manager_task_conflicts_with_template() {
    let err = builder()
        .job_manager_task(JobManagerTask::new("m", " "))
        .application_template_info(template())
        .build()
        .unwrap_err();
    assert_eq!(err.reserved_fields().unwrap(), ["job_manager_task"]);
}

#[test]
fn test_empty_template_path_with_reserved_field() {
    let err = builder()
        .task_factory(sweep())
        .application_template_info(ApplicationTemplateInfo::new(""))
        .build()
        .unwrap_err();
    assert_eq!(err.reserved_fields().unwrap(), ["task_factory"]);
}

#[test]
fn test_invalid_base_id() {
    let err = ExtendedJobParameter::builder("job with spaces", PoolInformation::pool("p"))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ExtensionError::Base(ValidationError::InvalidCharacters { .. })
    ));

    let err = ExtendedJobParameter::builder("x".repeat(65), PoolInformation::pool("p"))
        .build()
        .unwrap_err();
    assert!(matches!(err, ExtensionError::Base(ValidationError::TooLong { .. })));
}

#[test]
fn test_empty_template_path_rejected() {
    let err = builder()
        .application_template_info(ApplicationTemplateInfo::new(""))
        .build()
        .unwrap_err();
    assert!(matches!(err, ExtensionError::Template(_)));
}

#[test]
fn test_task_factories_validated_in_explicit_mode() {
    let per_file = TaskFactory::TaskPerFile(FileCollectionTaskFactory {
        source: FileSource::default(),
        repeat_task: RepeatTask::new("process {fileName}"),
        merge_task: None,
    });
    let err = builder().task_factory(per_file).build().unwrap_err();
    assert!(matches!(err, ExtensionError::TaskFactory(_)));

    let collection = TaskFactory::TaskCollection(TaskCollectionTaskFactory {
        tasks: vec![TaskAddParameter::new("t1", "echo hi"), TaskAddParameter::new("t2", "echo bye")],
    });
    let job = builder().task_factory(collection).build().unwrap();
    assert_eq!(job.task_factory().map(TaskFactory::kind), Some("taskCollection"));
}

// =============================================================================
// Configured reserved sets
// =============================================================================

#[test]
fn test_narrowed_reserved_set() {
    let reserved = ReservedAttributes::from_names(["task_factory"]);
    let job = builder()
        .job_manager_task(JobManagerTask::new("manager", "run.sh"))
        .application_template_info(template())
        .build_with(&reserved)
        .expect("job manager task is not reserved in this configuration");
    assert!(job.job_manager_task().is_some());

    let err = builder()
        .task_factory(sweep())
        .application_template_info(template())
        .build_with(&reserved)
        .unwrap_err();
    assert_eq!(err.reserved_fields().unwrap(), ["task_factory"]);
}

#[test]
fn test_widened_reserved_set() {
    let reserved = ReservedAttributes::from_names(
        ATTRS_RESERVED_FOR_TEMPLATES
            .iter()
            .copied()
            .chain(["metadata", "display_name"]),
    );
    let err = builder()
        .display_name("Nightly")
        .metadata(vec![MetadataItem::new("team", "render")])
        .application_template_info(template())
        .build_with(&reserved)
        .unwrap_err();
    assert_eq!(err.reserved_fields().unwrap(), ["display_name", "metadata"]);
}

#[test]
fn test_empty_reserved_set_allows_everything() {
    let reserved = ReservedAttributes::from_names(Vec::<String>::new());
    let job = builder()
        .task_factory(sweep())
        .uses_task_dependencies(true)
        .application_template_info(template())
        .build_with(&reserved);
    assert!(job.is_ok());
}

#[test]
fn test_reserved_set_from_toml_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[templates]").unwrap();
    writeln!(file, "reserved = [\"on_task_failure\"]").unwrap();

    let reserved = ReservedAttributes::from_file(file.path()).unwrap();
    let err = builder()
        .on_task_failure(OnTaskFailure::PerformExitOptionsJobAction)
        .on_all_tasks_complete(OnAllTasksComplete::TerminateJob)
        .application_template_info(template())
        .build_with(&reserved)
        .unwrap_err();
    assert_eq!(err.reserved_fields().unwrap(), ["on_task_failure"]);
}

use thiserror::Error;

/// Failures raised while building or evaluating an activity network or a PERT run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("dependency cycle detected at activity '{activity}'")]
    Cycle { activity: String },

    #[error("activity '{activity}' depends on '{dependency}', which is not in the network")]
    DependencyNotFound { activity: String, dependency: String },

    #[error("'{name}' has invalid {field} {value} (must be a non-negative number)")]
    InvalidDuration {
        name: String,
        field: &'static str,
        value: f64,
    },

    #[error(
        "completion probability for task '{task}' against target {target} is undefined: project standard deviation is zero"
    )]
    UndefinedProbability { task: String, target: f64 },

    #[error("activity '{0}' already exists")]
    DuplicateActivity(String),

    #[error("activity '{0}' not found")]
    ActivityNotFound(String),
}

impl ScheduleError {
    /// Stable snake_case code for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::Cycle { .. } => "cycle",
            ScheduleError::DependencyNotFound { .. } => "dependency_not_found",
            ScheduleError::InvalidDuration { .. } => "invalid_duration",
            ScheduleError::UndefinedProbability { .. } => "undefined_probability",
            ScheduleError::DuplicateActivity(_) => "duplicate_activity",
            ScheduleError::ActivityNotFound(_) => "activity_not_found",
        }
    }

    /// Name of the activity or task the error is about.
    pub fn subject(&self) -> &str {
        match self {
            ScheduleError::Cycle { activity } => activity,
            ScheduleError::DependencyNotFound { activity, .. } => activity,
            ScheduleError::InvalidDuration { name, .. } => name,
            ScheduleError::UndefinedProbability { task, .. } => task,
            ScheduleError::DuplicateActivity(name) => name,
            ScheduleError::ActivityNotFound(name) => name,
        }
    }
}

use crate::activity_validation;
use crate::error::ScheduleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed reference to an activity inside the [`ActivityNetwork`](crate::ActivityNetwork)
/// that issued it.
///
/// Ids are positional: removing an activity shifts the ids of every activity added after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivityId(pub(crate) usize);

impl ActivityId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit of work in a CPM network.
///
/// The schedule fields stay `None` until [`ActivityNetwork::compute`](crate::ActivityNetwork::compute)
/// succeeds and are cleared whenever the network changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    name: String,
    duration: f64,
    dependencies: Vec<ActivityId>,
    earliest_start: Option<f64>,
    earliest_finish: Option<f64>,
    latest_start: Option<f64>,
    latest_finish: Option<f64>,
    slack: Option<f64>,
}

impl Activity {
    pub fn new(name: impl Into<String>, duration: f64) -> Result<Self, ScheduleError> {
        let name = name.into();
        activity_validation::validate_non_negative(&name, "duration", duration)?;
        Ok(Self {
            name,
            duration,
            dependencies: Vec::new(),
            earliest_start: None,
            earliest_finish: None,
            latest_start: None,
            latest_finish: None,
            slack: None,
        })
    }

    /// Records a predecessor. Adding the same dependency twice is a no-op.
    pub fn add_dependency(&mut self, dependency: ActivityId) {
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn dependencies(&self) -> &[ActivityId] {
        &self.dependencies
    }

    pub fn earliest_start(&self) -> Option<f64> {
        self.earliest_start
    }

    pub fn earliest_finish(&self) -> Option<f64> {
        self.earliest_finish
    }

    pub fn latest_start(&self) -> Option<f64> {
        self.latest_start
    }

    pub fn latest_finish(&self) -> Option<f64> {
        self.latest_finish
    }

    pub fn slack(&self) -> Option<f64> {
        self.slack
    }

    /// True once computed with zero slack.
    pub fn is_critical(&self) -> bool {
        self.slack == Some(0.0)
    }

    /// Stores computed times. A slack within `tolerance` of zero is snapped to
    /// exactly zero, so critical activities never carry a rounding residue.
    pub(crate) fn apply_schedule(&mut self, early: (f64, f64), late: (f64, f64), tolerance: f64) {
        let (earliest_start, earliest_finish) = early;
        let (latest_start, latest_finish) = late;
        let mut slack = latest_start - earliest_start;
        if slack.abs() <= tolerance {
            slack = 0.0;
        }
        self.earliest_start = Some(earliest_start);
        self.earliest_finish = Some(earliest_finish);
        self.latest_start = Some(latest_start);
        self.latest_finish = Some(latest_finish);
        self.slack = Some(slack);
    }

    pub(crate) fn reset_schedule(&mut self) {
        self.earliest_start = None;
        self.earliest_finish = None;
        self.latest_start = None;
        self.latest_finish = None;
        self.slack = None;
    }

    pub(crate) fn dependencies_mut(&mut self) -> &mut Vec<ActivityId> {
        &mut self.dependencies
    }
}

/// Flattened view of one activity for display collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub name: String,
    pub duration: f64,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_finish: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_finish: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack: Option<f64>,
    pub is_critical: bool,
}

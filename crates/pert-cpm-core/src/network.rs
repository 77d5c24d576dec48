use crate::activity::{Activity, ActivityId, ActivityReport};
use crate::activity_validation;
use crate::calculations::backward_pass::BackwardPass;
use crate::calculations::critical_path;
use crate::calculations::forward_pass::ForwardPass;
use crate::error::ScheduleError;
use crate::graph::NetworkDag;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Result of one CPM computation, in the shape display collaborators consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpmSummary {
    pub activity_count: usize,
    pub critical_count: usize,
    pub critical_path: Vec<String>,
    pub total_duration: f64,
}

impl CpmSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("activities={}", self.activity_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("duration={}", self.total_duration));
        if !self.critical_path.is_empty() {
            parts.push(format!("path={}", self.critical_path.join("->")));
        }
        parts.join(", ")
    }
}

/// Name-based activity definition as collected from a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityInput {
    pub name: String,
    pub duration: f64,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ActivityInput {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies<S: Into<String>>(
        mut self,
        dependencies: impl IntoIterator<Item = S>,
    ) -> Self {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityNetwork {
    activities: Vec<Activity>,
    critical_path: Vec<ActivityId>,
    total_duration: Option<f64>,
}

impl ActivityNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network from name-based definitions in any order.
    ///
    /// Every activity is registered before dependencies are resolved, so a
    /// dependency may be listed after its dependent.
    pub fn from_inputs(inputs: &[ActivityInput]) -> Result<Self, ScheduleError> {
        let mut activities = Vec::with_capacity(inputs.len());
        for input in inputs {
            activities.push(Activity::new(input.name.as_str(), input.duration)?);
        }
        activity_validation::validate_activity_collection(&activities)?;

        let mut network = Self {
            activities,
            ..Self::default()
        };
        for (idx, input) in inputs.iter().enumerate() {
            for dependency in &input.dependencies {
                let dep_id = network.resolve_dependency(&input.name, dependency)?;
                network.activities[idx].add_dependency(dep_id);
            }
        }
        Ok(network)
    }

    /// Appends an activity without checking names or dependencies.
    pub fn add_activity(&mut self, activity: Activity) -> ActivityId {
        self.invalidate();
        self.activities.push(activity);
        ActivityId(self.activities.len() - 1)
    }

    /// Creates an activity whose dependencies name previously added activities.
    pub fn add_named<S: AsRef<str>>(
        &mut self,
        name: &str,
        duration: f64,
        dependencies: &[S],
    ) -> Result<ActivityId, ScheduleError> {
        activity_validation::validate_unique_name(&self.activities, name)?;
        let mut activity = Activity::new(name, duration)?;
        for dependency in dependencies {
            activity.add_dependency(self.resolve_dependency(name, dependency.as_ref())?);
        }
        Ok(self.add_activity(activity))
    }

    pub fn add_dependency(
        &mut self,
        activity: ActivityId,
        dependency: ActivityId,
    ) -> Result<(), ScheduleError> {
        let target = self
            .activities
            .get_mut(activity.index())
            .ok_or_else(|| ScheduleError::ActivityNotFound(activity.to_string()))?;
        target.add_dependency(dependency);
        self.invalidate();
        Ok(())
    }

    pub fn add_dependency_by_name(
        &mut self,
        activity: &str,
        dependency: &str,
    ) -> Result<(), ScheduleError> {
        let activity_id = self
            .find(activity)
            .ok_or_else(|| ScheduleError::ActivityNotFound(activity.to_string()))?;
        let dep_id = self.resolve_dependency(activity, dependency)?;
        self.add_dependency(activity_id, dep_id)
    }

    /// Removes the named activity and strips it from every dependency list.
    /// Ids issued for activities added after it shift down by one.
    pub fn remove_activity(&mut self, name: &str) -> bool {
        let Some(removed) = self.find(name) else {
            return false;
        };
        self.activities.remove(removed.index());
        for activity in &mut self.activities {
            let dependencies = activity.dependencies_mut();
            dependencies.retain(|&dep| dep != removed);
            for dep in dependencies.iter_mut() {
                if dep.0 > removed.0 {
                    dep.0 -= 1;
                }
            }
        }
        self.invalidate();
        true
    }

    pub fn clear(&mut self) {
        self.activities.clear();
        self.critical_path.clear();
        self.total_duration = None;
    }

    pub fn find(&self, name: &str) -> Option<ActivityId> {
        self.activities
            .iter()
            .position(|activity| activity.name() == name)
            .map(ActivityId)
    }

    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.get(id.index())
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn critical_path(&self) -> &[ActivityId] {
        &self.critical_path
    }

    pub fn critical_path_names(&self) -> Vec<String> {
        self.critical_path
            .iter()
            .filter_map(|&id| self.activity(id))
            .map(|activity| activity.name().to_string())
            .collect()
    }

    /// `None` until a compute succeeds on the current activity set.
    pub fn total_duration(&self) -> Option<f64> {
        self.total_duration
    }

    pub fn is_computed(&self) -> bool {
        self.total_duration.is_some()
    }

    /// Runs the forward pass, backward pass and critical path trace.
    ///
    /// On failure every derived field is left undefined.
    pub fn compute(&mut self) -> Result<CpmSummary, ScheduleError> {
        self.invalidate();
        match self.run_passes() {
            Ok(summary) => {
                debug!(
                    activities = summary.activity_count,
                    critical = summary.critical_count,
                    total_duration = summary.total_duration,
                    "computed critical path"
                );
                Ok(summary)
            }
            Err(err) => {
                warn!(kind = err.kind(), subject = err.subject(), "cpm compute failed");
                Err(err)
            }
        }
    }

    fn run_passes(&mut self) -> Result<CpmSummary, ScheduleError> {
        let dag = NetworkDag::build(&self.activities)?;
        let order = dag.topological_order(&self.activities)?;

        let forward = ForwardPass::new(&self.activities, &dag);
        let early = forward.execute(&order);
        let project_end = forward.project_end(&early);
        let late = BackwardPass::new(&self.activities, &dag).execute(&order, project_end);

        let tolerance = activity_validation::schedule_tolerance(project_end);
        for (idx, activity) in self.activities.iter_mut().enumerate() {
            activity.apply_schedule(early[idx], late[idx], tolerance);
        }

        self.critical_path = critical_path::trace(&self.activities, &dag, tolerance)
            .into_iter()
            .map(ActivityId)
            .collect();
        self.total_duration = Some(project_end);
        Ok(self.summary(project_end))
    }

    fn summary(&self, total_duration: f64) -> CpmSummary {
        CpmSummary {
            activity_count: self.activities.len(),
            critical_count: self.activities.iter().filter(|a| a.is_critical()).count(),
            critical_path: self.critical_path_names(),
            total_duration,
        }
    }

    /// Display rows for every activity, in input order.
    pub fn reports(&self) -> Vec<ActivityReport> {
        self.activities
            .iter()
            .map(|activity| ActivityReport {
                name: activity.name().to_string(),
                duration: activity.duration(),
                dependencies: activity
                    .dependencies()
                    .iter()
                    .map(|&dep| match self.activity(dep) {
                        Some(found) => found.name().to_string(),
                        None => dep.to_string(),
                    })
                    .collect(),
                earliest_start: activity.earliest_start(),
                earliest_finish: activity.earliest_finish(),
                latest_start: activity.latest_start(),
                latest_finish: activity.latest_finish(),
                slack: activity.slack(),
                is_critical: activity.is_critical(),
            })
            .collect()
    }

    fn resolve_dependency(
        &self,
        activity: &str,
        dependency: &str,
    ) -> Result<ActivityId, ScheduleError> {
        self.find(dependency)
            .ok_or_else(|| ScheduleError::DependencyNotFound {
                activity: activity.to_string(),
                dependency: dependency.to_string(),
            })
    }

    fn invalidate(&mut self) {
        for activity in &mut self.activities {
            activity.reset_schedule();
        }
        self.critical_path.clear();
        self.total_duration = None;
    }
}

/// Computes the schedule of `network` in place and returns its summary.
pub fn compute_cpm(network: &mut ActivityNetwork) -> Result<CpmSummary, ScheduleError> {
    network.compute()
}

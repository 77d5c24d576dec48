use crate::activity_validation;
use crate::error::ScheduleError;
use crate::normal::standard_normal_cdf;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A task with a three-point duration estimate.
///
/// `expected`, `variance` and `standard_deviation` are derived once at construction.
/// The estimates are not required to satisfy `optimistic <= most_likely <= pessimistic`;
/// out-of-order values are accepted and produce whatever the formulas yield.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PertTask {
    name: String,
    optimistic: f64,
    most_likely: f64,
    pessimistic: f64,
    expected: f64,
    variance: f64,
    standard_deviation: f64,
}

impl PertTask {
    pub fn new(
        name: impl Into<String>,
        optimistic: f64,
        most_likely: f64,
        pessimistic: f64,
    ) -> Result<Self, ScheduleError> {
        let name = name.into();
        activity_validation::validate_non_negative(&name, "optimistic estimate", optimistic)?;
        activity_validation::validate_non_negative(&name, "most likely estimate", most_likely)?;
        activity_validation::validate_non_negative(&name, "pessimistic estimate", pessimistic)?;

        let expected = (optimistic + 4.0 * most_likely + pessimistic) / 6.0;
        let spread = (pessimistic - optimistic) / 6.0;
        let variance = spread * spread;
        Ok(Self {
            name,
            optimistic,
            most_likely,
            pessimistic,
            expected,
            variance,
            standard_deviation: variance.sqrt(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn optimistic(&self) -> f64 {
        self.optimistic
    }

    pub fn most_likely(&self) -> f64 {
        self.most_likely
    }

    pub fn pessimistic(&self) -> f64 {
        self.pessimistic
    }

    pub fn expected(&self) -> f64 {
        self.expected
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PertTaskInput {
    pub name: String,
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
}

impl PertTaskInput {
    pub fn to_task(&self) -> Result<PertTask, ScheduleError> {
        PertTask::new(
            self.name.as_str(),
            self.optimistic,
            self.most_likely,
            self.pessimistic,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskProbability {
    pub name: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PertSummary {
    pub project_expected: f64,
    pub project_variance: f64,
    pub project_standard_deviation: f64,
    pub target_time: f64,
    /// One entry per task, in insertion order.
    pub per_task_probability: Vec<TaskProbability>,
}

impl PertSummary {
    /// Probability for the first task with this name.
    pub fn probability_for(&self, name: &str) -> Option<f64> {
        self.per_task_probability
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.probability)
    }
}

/// Aggregates three-point estimates into project-level figures.
///
/// Tasks are treated as one sequential chain: project expectation and variance
/// are plain sums over every registered task.
#[derive(Debug, Clone, Default)]
pub struct PertEstimator {
    tasks: Vec<PertTask>,
    project_expected: f64,
    project_variance: f64,
    project_standard_deviation: f64,
}

impl PertEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: impl IntoIterator<Item = PertTask>) -> Self {
        let mut estimator = Self {
            tasks: tasks.into_iter().collect(),
            ..Self::default()
        };
        estimator.recompute();
        estimator
    }

    pub fn add_task(
        &mut self,
        name: impl Into<String>,
        optimistic: f64,
        most_likely: f64,
        pessimistic: f64,
    ) -> Result<&PertTask, ScheduleError> {
        let task = PertTask::new(name, optimistic, most_likely, pessimistic)?;
        Ok(self.push_task(task))
    }

    pub fn push_task(&mut self, task: PertTask) -> &PertTask {
        self.tasks.push(task);
        self.recompute();
        &self.tasks[self.tasks.len() - 1]
    }

    pub fn recompute(&mut self) {
        self.project_expected = self.tasks.iter().map(PertTask::expected).sum();
        self.project_variance = self.tasks.iter().map(PertTask::variance).sum();
        self.project_standard_deviation = self.project_variance.sqrt();
        debug!(
            tasks = self.tasks.len(),
            expected = self.project_expected,
            variance = self.project_variance,
            "recomputed pert aggregates"
        );
    }

    /// `1 - Φ(z)` for `task` at `target_time`, where z is scaled by the
    /// project-level standard deviation.
    ///
    /// A zero-deviation project only has a defined answer when the target equals the
    /// task's expected time.
    pub fn completion_probability(
        &self,
        task: &PertTask,
        target_time: f64,
    ) -> Result<f64, ScheduleError> {
        let deviation = target_time - task.expected();
        let z = if self.project_standard_deviation > 0.0 {
            deviation / self.project_standard_deviation
        } else if deviation.abs() <= activity_validation::schedule_tolerance(target_time) {
            0.0
        } else {
            return Err(ScheduleError::UndefinedProbability {
                task: task.name().to_string(),
                target: target_time,
            });
        };
        Ok(1.0 - standard_normal_cdf(z))
    }

    /// Summary with every task evaluated against the project expected time.
    pub fn summary(&self) -> Result<PertSummary, ScheduleError> {
        self.summary_against(self.project_expected)
    }

    pub fn summary_against(&self, target_time: f64) -> Result<PertSummary, ScheduleError> {
        let per_task_probability = self
            .tasks
            .iter()
            .map(|task| {
                self.completion_probability(task, target_time)
                    .map(|probability| TaskProbability {
                        name: task.name().to_string(),
                        probability,
                    })
            })
            .collect::<Result<Vec<_>, ScheduleError>>()?;

        Ok(PertSummary {
            project_expected: self.project_expected,
            project_variance: self.project_variance,
            project_standard_deviation: self.project_standard_deviation,
            target_time,
            per_task_probability,
        })
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
        self.project_expected = 0.0;
        self.project_variance = 0.0;
        self.project_standard_deviation = 0.0;
    }

    pub fn task(&self, name: &str) -> Option<&PertTask> {
        self.tasks.iter().find(|task| task.name() == name)
    }

    pub fn tasks(&self) -> &[PertTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn project_expected(&self) -> f64 {
        self.project_expected
    }

    pub fn project_variance(&self) -> f64 {
        self.project_variance
    }

    pub fn project_standard_deviation(&self) -> f64 {
        self.project_standard_deviation
    }
}

/// Aggregates `tasks` and evaluates each against the project expected time.
pub fn compute_pert(tasks: &[PertTask]) -> Result<PertSummary, ScheduleError> {
    PertEstimator::from_tasks(tasks.iter().cloned()).summary()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_order_estimates_are_accepted() {
        let task = PertTask::new("Odd", 6.0, 4.0, 2.0).unwrap();
        assert_eq!(task.expected(), 4.0);
        assert!((task.variance() - 4.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn negative_estimate_names_the_field() {
        let err = PertTask::new("T", 1.0, -2.0, 3.0).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidDuration {
                name: "T".into(),
                field: "most likely estimate",
                value: -2.0,
            }
        );
    }

    #[test]
    fn zero_variance_project_is_defined_only_at_expected_time() {
        let mut estimator = PertEstimator::new();
        estimator.add_task("Fixed", 5.0, 5.0, 5.0).unwrap();
        let task = estimator.task("Fixed").unwrap().clone();

        let at_expected = estimator.completion_probability(&task, 5.0).unwrap();
        assert!((at_expected - (1.0 - standard_normal_cdf(0.0))).abs() < 1e-12);

        let err = estimator.completion_probability(&task, 7.0).unwrap_err();
        assert_eq!(err.kind(), "undefined_probability");
        assert_eq!(err.subject(), "Fixed");
    }
}

use pert_cpm::{PertEstimator, PertTask, ScheduleError, compute_pert, standard_normal_cdf};

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

#[test]
fn three_point_estimate_derives_expected_and_variance() {
    let task = PertTask::new("T", 2.0, 4.0, 6.0).unwrap();
    assert_eq!(task.expected(), 4.0);
    assert!(close(task.variance(), 0.444, 1e-3));
    assert!(close(task.standard_deviation(), 0.667, 1e-3));
    assert_eq!(task.optimistic(), 2.0);
    assert_eq!(task.most_likely(), 4.0);
    assert_eq!(task.pessimistic(), 6.0);
}

#[test]
fn two_task_project_aggregates_as_a_chain() {
    let mut estimator = PertEstimator::new();
    estimator.add_task("T1", 1.0, 2.0, 3.0).unwrap();
    estimator.add_task("T2", 2.0, 4.0, 6.0).unwrap();

    assert_eq!(estimator.len(), 2);
    assert!(close(estimator.project_expected(), 6.0, 1e-12));
    assert!(close(estimator.project_variance(), 0.556, 1e-3));
    assert!(close(estimator.project_standard_deviation(), 0.745, 1e-3));
}

#[test]
fn default_summary_evaluates_against_project_expected_time() {
    let tasks = vec![
        PertTask::new("T1", 1.0, 2.0, 3.0).unwrap(),
        PertTask::new("T2", 2.0, 4.0, 6.0).unwrap(),
    ];
    let summary = compute_pert(&tasks).unwrap();

    assert!(close(summary.target_time, 6.0, 1e-12));
    assert_eq!(summary.per_task_probability.len(), 2);
    assert_eq!(summary.per_task_probability[0].name, "T1");
    assert!(close(
        summary.probability_for("T1").unwrap(),
        0.528_782_563_708_922_7,
        1e-9
    ));
    assert!(close(
        summary.probability_for("T2").unwrap(),
        0.553_222_425_167_783_5,
        1e-9
    ));
    assert_eq!(summary.probability_for("missing"), None);
}

#[test]
fn explicit_target_time() {
    let mut estimator = PertEstimator::new();
    estimator.add_task("T1", 1.0, 2.0, 3.0).unwrap();
    estimator.add_task("T2", 2.0, 4.0, 6.0).unwrap();

    let summary = estimator.summary_against(2.0).unwrap();
    assert_eq!(summary.target_time, 2.0);
    // T2 expected 4.0: z = (2 - 4) / 0.745
    assert!(close(
        summary.probability_for("T2").unwrap(),
        0.446_777_574_832_216_5,
        1e-9
    ));
}

#[test]
fn probabilities_at_mirrored_z_sum_to_one() {
    let mut estimator = PertEstimator::new();
    estimator.add_task("T1", 1.0, 2.0, 3.0).unwrap();
    estimator.add_task("T2", 2.0, 4.0, 6.0).unwrap();
    let task = estimator.task("T2").unwrap().clone();
    let sd = estimator.project_standard_deviation();

    for z in [0.3, 1.0, 2.5] {
        let above = estimator
            .completion_probability(&task, task.expected() + z * sd)
            .unwrap();
        let below = estimator
            .completion_probability(&task, task.expected() - z * sd)
            .unwrap();
        assert!(close(above + below, 1.0, 1e-3), "z={z}");
    }
}

#[test]
fn probability_uses_the_fixed_polynomial() {
    let mut estimator = PertEstimator::new();
    estimator.add_task("T", 0.0, 3.0, 6.0).unwrap();
    let task = estimator.task("T").unwrap().clone();

    // Project standard deviation is 1.0, so z equals the offset.
    let p = estimator.completion_probability(&task, 4.0).unwrap();
    assert_eq!(p, 1.0 - standard_normal_cdf(1.0));
}

#[test]
fn clear_resets_tasks_and_aggregates() {
    let mut estimator = PertEstimator::new();
    estimator.add_task("T1", 1.0, 2.0, 3.0).unwrap();
    estimator.clear();

    assert!(estimator.is_empty());
    assert_eq!(estimator.project_expected(), 0.0);
    assert_eq!(estimator.project_variance(), 0.0);
    assert_eq!(estimator.project_standard_deviation(), 0.0);

    estimator.add_task("T2", 2.0, 4.0, 6.0).unwrap();
    assert_eq!(estimator.project_expected(), 4.0);
}

#[test]
fn negative_estimates_are_rejected_and_not_added() {
    let mut estimator = PertEstimator::new();
    let err = estimator.add_task("Bad", -1.0, 2.0, 3.0).unwrap_err();
    assert_eq!(err.kind(), "invalid_duration");
    assert_eq!(err.subject(), "Bad");
    assert!(estimator.is_empty());
}

#[test]
fn zero_variance_project_reports_undefined_probability() {
    let tasks = vec![
        PertTask::new("A", 2.0, 2.0, 2.0).unwrap(),
        PertTask::new("B", 3.0, 3.0, 3.0).unwrap(),
    ];
    let err = compute_pert(&tasks).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::UndefinedProbability {
            task: "A".into(),
            target: 5.0,
        }
    );
}

#[test]
fn empty_estimator_summary_is_empty() {
    let summary = PertEstimator::new().summary().unwrap();
    assert_eq!(summary.project_expected, 0.0);
    assert!(summary.per_task_probability.is_empty());
}

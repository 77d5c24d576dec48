use crate::activity::Activity;
use crate::error::ScheduleError;
use std::collections::HashSet;

/// Relative tolerance used when comparing accumulated times.
pub(crate) const EPSILON: f64 = 1e-9;

/// Absolute tolerance for times in a schedule whose largest magnitude is `scale`.
/// Never smaller than `EPSILON`.
pub(crate) fn schedule_tolerance(scale: f64) -> f64 {
    EPSILON * scale.abs().max(1.0)
}

pub(crate) fn approx_equal(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Rejects negative, NaN and infinite values for a duration or an estimate.
pub(crate) fn validate_non_negative(
    name: &str,
    field: &'static str,
    value: f64,
) -> Result<(), ScheduleError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ScheduleError::InvalidDuration {
            name: name.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

pub(crate) fn validate_unique_name(
    activities: &[Activity],
    name: &str,
) -> Result<(), ScheduleError> {
    if activities.iter().any(|activity| activity.name() == name) {
        return Err(ScheduleError::DuplicateActivity(name.to_string()));
    }
    Ok(())
}

pub(crate) fn validate_activity_collection(activities: &[Activity]) -> Result<(), ScheduleError> {
    let mut seen = HashSet::with_capacity(activities.len());
    for activity in activities {
        if !seen.insert(activity.name()) {
            return Err(ScheduleError::DuplicateActivity(activity.name().to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_and_non_finite_values_are_rejected() {
        assert!(validate_non_negative("A", "duration", 0.0).is_ok());
        assert!(validate_non_negative("A", "duration", 2.5).is_ok());

        let err = validate_non_negative("A", "duration", -1.0).unwrap_err();
        assert_eq!(err.kind(), "invalid_duration");
        assert_eq!(err.subject(), "A");

        assert!(validate_non_negative("A", "duration", f64::NAN).is_err());
        assert!(validate_non_negative("A", "pessimistic estimate", f64::INFINITY).is_err());
    }

    #[test]
    fn tolerance_grows_with_schedule_scale() {
        assert_eq!(schedule_tolerance(0.0), EPSILON);
        assert_eq!(schedule_tolerance(0.5), EPSILON);
        assert!((schedule_tolerance(2.0e8) - 0.2).abs() < 1e-12);
        assert!(approx_equal(2.0e8, 2.0e8 + 1.0e-7, schedule_tolerance(2.0e8)));
        assert!(!approx_equal(1.0, 1.0 + 1.0e-7, schedule_tolerance(1.0)));
    }

    #[test]
    fn duplicate_names_are_reported() {
        let activities = vec![
            Activity::new("A", 1.0).unwrap(),
            Activity::new("B", 1.0).unwrap(),
            Activity::new("A", 2.0).unwrap(),
        ];
        assert_eq!(
            validate_activity_collection(&activities),
            Err(ScheduleError::DuplicateActivity("A".into()))
        );
        assert!(validate_unique_name(&activities[..2], "C").is_ok());
        assert!(validate_unique_name(&activities[..2], "B").is_err());
    }
}

use crate::activity::Activity;
use crate::activity_validation::approx_equal;
use crate::graph::NetworkDag;

/// Traces the critical path from a sink back to a source through zero-slack
/// dependency edges and returns it in source-to-sink order.
///
/// Activities must already carry their computed schedule. Among zero-slack
/// candidates the one with the latest early finish wins; remaining ties go to the
/// lower input index. Finish times within `tolerance` count as tied.
pub fn trace(activities: &[Activity], dag: &NetworkDag, tolerance: f64) -> Vec<usize> {
    let Some(mut current) = pick(activities, dag.sinks(), tolerance) else {
        return Vec::new();
    };

    let mut path = vec![current];
    while let Some(pred) = pick(activities, dag.predecessors(current), tolerance) {
        path.push(pred);
        current = pred;
    }
    path.reverse();
    path
}

fn pick(
    activities: &[Activity],
    candidates: impl Iterator<Item = usize>,
    tolerance: f64,
) -> Option<usize> {
    candidates
        .filter(|&idx| activities[idx].is_critical())
        .fold(None, |best, idx| match best {
            Some(best) if !prefer(activities, idx, best, tolerance) => Some(best),
            _ => Some(idx),
        })
}

fn prefer(activities: &[Activity], candidate: usize, best: usize, tolerance: f64) -> bool {
    let finish = |idx: usize| activities[idx].earliest_finish().unwrap_or(0.0);
    let (candidate_finish, best_finish) = (finish(candidate), finish(best));
    if approx_equal(candidate_finish, best_finish, tolerance) {
        candidate < best
    } else {
        candidate_finish > best_finish
    }
}

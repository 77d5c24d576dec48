use crate::activity::Activity;
use crate::graph::NetworkDag;

pub struct ForwardPass<'a> {
    activities: &'a [Activity],
    dag: &'a NetworkDag,
}

impl<'a> ForwardPass<'a> {
    pub fn new(activities: &'a [Activity], dag: &'a NetworkDag) -> Self {
        Self { activities, dag }
    }

    /// Returns `(earliest_start, earliest_finish)` per activity index.
    /// `order` must be a topological order of the dag.
    pub fn execute(&self, order: &[usize]) -> Vec<(f64, f64)> {
        let mut early = vec![(0.0, 0.0); self.activities.len()];

        for &idx in order {
            // Early start is max of all predecessor finishes
            let earliest_start = self
                .dag
                .predecessors(idx)
                .map(|pred| early[pred].1)
                .fold(0.0, f64::max);
            let earliest_finish = earliest_start + self.activities[idx].duration();
            early[idx] = (earliest_start, earliest_finish);
        }

        early
    }

    /// Project end: the latest early finish among sink activities.
    pub fn project_end(&self, early: &[(f64, f64)]) -> f64 {
        self.dag.sinks().map(|idx| early[idx].1).fold(0.0, f64::max)
    }
}

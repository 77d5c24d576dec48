use crate::activity::Activity;
use crate::graph::NetworkDag;

pub struct BackwardPass<'a> {
    activities: &'a [Activity],
    dag: &'a NetworkDag,
}

impl<'a> BackwardPass<'a> {
    pub fn new(activities: &'a [Activity], dag: &'a NetworkDag) -> Self {
        Self { activities, dag }
    }

    /// Returns `(latest_start, latest_finish)` per activity index.
    pub fn execute(&self, order: &[usize], project_end: f64) -> Vec<(f64, f64)> {
        let mut late = vec![(project_end, project_end); self.activities.len()];

        // Reverse topological order
        for &idx in order.iter().rev() {
            // Determine allowed late finish from successors' late starts
            let latest_finish = self
                .dag
                .successors(idx)
                .map(|succ| late[succ].0)
                .fold(project_end, f64::min);
            let latest_start = latest_finish - self.activities[idx].duration();
            late[idx] = (latest_start, latest_finish);
        }

        late
    }
}

pub mod activity;
pub(crate) mod activity_validation;
pub mod calculations;
pub mod error;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod network;
pub mod normal;
pub mod pert;

pub use activity::{Activity, ActivityId, ActivityReport};
pub use error::ScheduleError;
pub use network::{ActivityInput, ActivityNetwork, CpmSummary, compute_cpm};
pub use normal::standard_normal_cdf;
pub use pert::{
    PertEstimator, PertSummary, PertTask, PertTaskInput, TaskProbability, compute_pert,
};

pub mod metrics;

pub use metrics::{LineageScore, SimulationMetrics};

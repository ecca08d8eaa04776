//! Predator/prey arena simulation.
//!
//! Perception-limited creatures steer, forage, fight, flee and reproduce on a
//! bounded 2D field with regrowing plants and rectangular obstacles.

pub mod checkpoint;
pub mod config;
pub mod creature;
pub mod error;
pub mod evolution;
pub mod export;
pub mod simulation;
pub mod stats;
pub mod steering;
pub mod world;

pub use config::Config;
pub use error::{Error, Result};
pub use simulation::SimulationState;

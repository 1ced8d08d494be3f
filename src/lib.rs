//! A robot on a 10x10 field of cans that learns, with tabular Q-learning, to pick cans up
//! and stay off the walls.
//!
//! ```no_run
//! use rand::{rngs::StdRng, SeedableRng};
//! use robby::experiment::{self, EvalConfig, LogMonitor, TrainConfig};
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let training = experiment::train(TrainConfig::new(5000, 200), &mut rng, &mut LogMonitor)?;
//! let stats = experiment::evaluate(&training.q_table, &EvalConfig::new(5000, 200), &mut rng)?;
//! println!("{stats}");
//! # Ok::<(), robby::Error>(())
//! ```

/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Input validation errors
pub mod error;

/// Exploration policies
pub mod exploration;

/// Training and evaluation runs
pub mod experiment;

/// The can field
pub mod gym;

/// Transitions
pub mod memory;

/// Terminal visualization
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use error::{Error, Result};
pub use util::mean_std;

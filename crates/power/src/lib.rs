#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::float_cmp)]
//! # POWER Policy Search
//!
//! Policy learning by Weighting Exploration with the Returns: a model-free
//! update rule for linear control policies that replaces gradient steps with
//! a closed-form, reward-weighted regression.
//!
//! ## Key Components
//!
//! -   **World and policy:** the [`World`] and [`NoisePolicy`] traits are the
//!     only things the learner needs from its surroundings.
//!     [`LinearGaussianPolicy`] is the usual exploration policy.
//! -   **Episodes:** [`run_episode`] performs one rollout and returns the
//!     reward-to-go weighted statistics in [`EpisodeStats`].
//! -   **Batches:** [`average_episodes`] averages those statistics over several
//!     rollouts and solves `W̄⁻¹ N̄` for the parameter update.
//! -   **Improvement:** [`improve`] repeats the batch step and adds each update
//!     to the parameter.
//!
//! Hyperparameters live in [`PowerConfig`], which can also be read from JSON.
//! Failures carry a [`Location`] naming the iteration, episode and step that
//! produced them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use power::{improve, LinearGaussianPolicy, PowerConfig};
//!
//! let config = PowerConfig::from_json(r#"{ "num_updates": 20, "max_steps": 50 }"#)?;
//! let mut policy = LinearGaussianPolicy::new(1.0, 7);
//! let mut theta = linalg::Vector::zeros(2);
//! let returns = improve(&mut world, &mut policy, &mut theta, &config)?;
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod improve;
pub mod noise;
pub mod rollout;
pub mod world;

pub use linalg::{LinalgError, Matrix, Vector};

pub use batch::{average_episodes, BatchUpdate};
pub use config::{Inversion, PowerConfig};
pub use error::{Location, PowerError, Result, Violation};
pub use improve::improve;
pub use noise::{LinearGaussianPolicy, ZeroNoisePolicy};
pub use rollout::{
    aggregate, precision_weight, reward_to_go, rollout, run_episode, EpisodeStats, Trajectory,
    Transition,
};
pub use world::{NoisePolicy, World};

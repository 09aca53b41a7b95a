use std::fmt;

use linalg::LinalgError;
use thiserror::Error;

/// Where in the improvement run a failure was observed.
///
/// Each layer fills in its own index while the error travels outward: the
/// episode simulator sets `step`, the batch averager `episode` and the
/// improvement loop `iteration`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub iteration: Option<usize>,
    pub episode: Option<usize>,
    pub step: Option<usize>,
}

impl Location {
    #[must_use]
    pub fn step(step: usize) -> Self {
        Self { step: Some(step), ..Self::default() }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            self.iteration.map(|i| format!("iteration {i}")),
            self.episode.map(|e| format!("episode {e}")),
            self.step.map(|s| format!("step {s}")),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            f.write_str("unknown location")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// A [`World`](crate::World) or [`NoisePolicy`](crate::NoisePolicy) broke its contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("world returned non-finite reward {0}")]
    NonFiniteReward(f64),
    #[error("world returned a non-finite state")]
    NonFiniteState,
    #[error("policy returned non-finite action {0}")]
    NonFiniteAction(f64),
    #[error("policy returned a non-finite noise sample")]
    NonFiniteNoise,
    #[error("world returned state of dimension {found}, expected {expected}")]
    StateDimension { expected: usize, found: usize },
    #[error("policy returned noise of dimension {found}, expected {expected}")]
    NoiseDimension { expected: usize, found: usize },
    #[error("exploration covariance is {rows}x{cols}, expected {expected}x{expected}")]
    CovarianceDimension { expected: usize, rows: usize, cols: usize },
}

#[derive(Error, Debug)]
pub enum PowerError {
    #[error("degenerate precision weight at {location}: quadratic form evaluated to {value}")]
    DegenerateWeight { location: Location, value: f64 },
    #[error("singular aggregate weight at {location}")]
    SingularUpdate {
        location: Location,
        #[source]
        source: LinalgError,
    },
    #[error("contract violation at {location}: {violation}")]
    ContractViolation { location: Location, violation: Violation },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl PowerError {
    pub(crate) fn violation(step: usize, violation: Violation) -> Self {
        PowerError::ContractViolation { location: Location::step(step), violation }
    }

    /// The location carried by this error, if it is tied to a rollout.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            PowerError::DegenerateWeight { location, .. }
            | PowerError::SingularUpdate { location, .. }
            | PowerError::ContractViolation { location, .. } => Some(location),
            PowerError::InvalidConfig(_) | PowerError::Config(_) => None,
        }
    }

    fn location_mut(&mut self) -> Option<&mut Location> {
        match self {
            PowerError::DegenerateWeight { location, .. }
            | PowerError::SingularUpdate { location, .. }
            | PowerError::ContractViolation { location, .. } => Some(location),
            PowerError::InvalidConfig(_) | PowerError::Config(_) => None,
        }
    }

    #[must_use]
    pub(crate) fn in_episode(mut self, episode: usize) -> Self {
        if let Some(location) = self.location_mut() {
            location.episode = Some(episode);
        }
        self
    }

    #[must_use]
    pub(crate) fn in_iteration(mut self, iteration: usize) -> Self {
        if let Some(location) = self.location_mut() {
            location.iteration = Some(iteration);
        }
        self
    }
}

pub type Result<T> = std::result::Result<T, PowerError>;

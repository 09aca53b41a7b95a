use linalg::Matrix;
use serde::{Deserialize, Serialize};

use crate::error::{PowerError, Result};

/// How the averaged weight matrix is inverted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Inversion {
    /// Gauss-Jordan inversion. A relative pivot at or below `tolerance`
    /// aborts the iteration with [`PowerError::SingularUpdate`].
    Exact { tolerance: f64 },
    /// Symmetric pseudo-inverse. Eigenvalues at or below `tolerance` times
    /// the largest one are treated as zero.
    Pseudo { tolerance: f64 },
}

impl Inversion {
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        match *self {
            Inversion::Exact { tolerance } | Inversion::Pseudo { tolerance } => tolerance,
        }
    }
}

impl Default for Inversion {
    fn default() -> Self {
        Inversion::Exact { tolerance: 1e-12 }
    }
}

/// Hyperparameters of one improvement run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Scale of the isotropic exploration covariance used in the step weights.
    pub sigma: f64,
    /// Parameter updates performed by [`improve`](crate::improve).
    pub num_updates: usize,
    /// Episodes averaged per update.
    pub num_episodes: usize,
    /// Step limit per episode. At least one step always runs.
    pub max_steps: usize,
    pub inversion: Inversion,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            sigma: 0.5,
            num_updates: 10,
            num_episodes: 10,
            max_steps: 100,
            inversion: Inversion::default(),
        }
    }
}

impl PowerConfig {
    /// Parses a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    /// [`PowerError::Config`] for malformed JSON and
    /// [`PowerError::InvalidConfig`] if validation fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PowerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// [`PowerError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.num_episodes == 0 {
            return Err(PowerError::InvalidConfig("num_episodes must be at least 1".into()));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(PowerError::InvalidConfig(format!(
                "sigma must be finite and non-negative, got {}",
                self.sigma
            )));
        }
        let tolerance = self.inversion.tolerance();
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(PowerError::InvalidConfig(format!(
                "inversion tolerance must be finite and non-negative, got {tolerance}"
            )));
        }
        Ok(())
    }

    /// Exploration covariance `sigma · I` for a `dim`-dimensional state.
    #[must_use]
    pub fn covariance(&self, dim: usize) -> Matrix {
        Matrix::from_diagonal_element(dim, dim, self.sigma)
    }
}

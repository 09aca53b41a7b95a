use linalg::{all_finite, invert, pseudo_invert, LinalgError, Matrix, Vector};
use tracing::{debug, warn};

use crate::config::{Inversion, PowerConfig};
use crate::error::{Location, PowerError, Result};
use crate::rollout::run_episode;
use crate::world::{NoisePolicy, World};

/// Result of averaging a batch of episodes under one parameter.
#[derive(Clone, Debug)]
pub struct BatchUpdate {
    /// Weighted least-squares step `W̄⁻¹ N̄`.
    pub update: Vector,
    /// Mean undiscounted return of the batch.
    pub mean_return: f64,
}

/// Runs `config.num_episodes` episodes with the same `theta` and solves for
/// the parameter update.
///
/// # Errors
/// [`PowerError::InvalidConfig`] for a configuration that fails validation,
/// any episode failure tagged with its episode index, and
/// [`PowerError::SingularUpdate`] when the averaged weight cannot be inverted
/// or the solved update is not finite.
pub fn average_episodes<W, P>(
    world: &mut W,
    policy: &mut P,
    theta: &Vector,
    config: &PowerConfig,
) -> Result<BatchUpdate>
where
    W: World + ?Sized,
    P: NoisePolicy + ?Sized,
{
    config.validate()?;
    average_validated(world, policy, theta, config)
}

/// [`average_episodes`] for a configuration the caller already validated.
pub(crate) fn average_validated<W, P>(
    world: &mut W,
    policy: &mut P,
    theta: &Vector,
    config: &PowerConfig,
) -> Result<BatchUpdate>
where
    W: World + ?Sized,
    P: NoisePolicy + ?Sized,
{
    let dim = theta.len();
    let covariance = config.covariance(dim);
    let mut weight_mean = Matrix::zeros(dim, dim);
    let mut noise_mean = Vector::zeros(dim);
    let mut return_sum = 0.0;

    for episode in 0..config.num_episodes {
        let stats = run_episode(world, policy, theta, &covariance, config.max_steps)
            .map_err(|e| e.in_episode(episode))?;
        weight_mean += &stats.weight_sum;
        noise_mean += &stats.noise_weighted_sum;
        return_sum += stats.total_return;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = config.num_episodes as f64;
    weight_mean /= n;
    noise_mean /= n;

    let update = solve(&weight_mean, &noise_mean, config.inversion)?;
    if !all_finite(update.iter()) {
        return Err(PowerError::SingularUpdate {
            location: Location::default(),
            source: LinalgError::NonFinite,
        });
    }
    let mean_return = return_sum / n;
    debug!(mean_return, update_norm = update.norm(), "batch averaged");
    Ok(BatchUpdate { update, mean_return })
}

fn solve(weight: &Matrix, noise: &Vector, inversion: Inversion) -> Result<Vector> {
    let singular = |source: LinalgError| PowerError::SingularUpdate { location: Location::default(), source };
    let inverse = match inversion {
        Inversion::Exact { tolerance } => invert(weight, tolerance).map_err(singular)?,
        Inversion::Pseudo { tolerance } => {
            let (inverse, dropped) = pseudo_invert(weight, tolerance).map_err(singular)?;
            if dropped > 0 {
                warn!(dropped, "pseudo-inverse discarded near-singular directions");
            }
            inverse
        }
    };
    Ok(inverse * noise)
}

use linalg::Vector;
use tracing::info;

use crate::batch::average_validated;
use crate::config::PowerConfig;
use crate::error::Result;
use crate::world::{NoisePolicy, World};

/// Applies `config.num_updates` POWER updates to `theta` in place.
///
/// There is no step size and no early stopping: each iteration adds the
/// full weighted least-squares update. Returns the mean return measured
/// in each iteration, before its update was applied.
///
/// With `num_updates == 0` this is a no-op and the configuration is not
/// checked.
///
/// # Errors
/// [`PowerError::InvalidConfig`](crate::PowerError::InvalidConfig) when there is work to do and the
/// configuration fails validation. Otherwise the first failing iteration
/// aborts the run with its index attached.
/// `theta` keeps all updates applied before that iteration.
pub fn improve<W, P>(
    world: &mut W,
    policy: &mut P,
    theta: &mut Vector,
    config: &PowerConfig,
) -> Result<Vec<f64>>
where
    W: World + ?Sized,
    P: NoisePolicy + ?Sized,
{
    if config.num_updates == 0 {
        return Ok(Vec::new());
    }
    config.validate()?;
    let mut history = Vec::with_capacity(config.num_updates);
    for iteration in 0..config.num_updates {
        let batch = average_validated(world, policy, theta, config)
            .map_err(|e| e.in_iteration(iteration))?;
        *theta += &batch.update;
        info!(
            iteration,
            mean_return = batch.mean_return,
            update_norm = batch.update.norm(),
            "policy updated"
        );
        history.push(batch.mean_return);
    }
    Ok(history)
}

//! # Episode Simulation
//!
//! Runs a single exploratory rollout and folds it into the two statistics
//! the update needs: the reward-weighted precision sum `Σ W_i R_i` and the
//! reward-weighted noise sum `Σ W_i ε_i R_i`, where `R_i` is the reward-to-go
//! from step `i`.

use linalg::{all_finite, Matrix, Vector};
use tracing::debug;

use crate::error::{Location, PowerError, Result, Violation};
use crate::world::{NoisePolicy, World};

/// One executed step.
#[derive(Clone, Debug)]
pub struct Transition {
    pub state: Vector,
    pub noise: Vector,
    pub reward: f64,
}

/// Transitions of a single episode in execution order.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    pub transitions: Vec<Transition>,
}

impl Trajectory {
    #[must_use]
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Reward-to-go for every step. Element 0 is the episode return.
    #[must_use]
    pub fn returns(&self) -> Vec<f64> {
        let mut rewards: Vec<f64> = self.transitions.iter().map(|t| t.reward).collect();
        reward_to_go(&mut rewards);
        rewards
    }
}

/// Statistics of one episode, ready to be averaged.
#[derive(Clone, Debug)]
pub struct EpisodeStats {
    pub weight_sum: Matrix,
    pub noise_weighted_sum: Vector,
    /// Undiscounted return of the whole episode.
    pub total_return: f64,
    pub steps: usize,
}

/// Replaces every reward with the sum of itself and all later rewards.
pub fn reward_to_go(rewards: &mut [f64]) {
    let mut acc = 0.0;
    for r in rewards.iter_mut().rev() {
        acc += *r;
        *r = acc;
    }
}

/// Precision weight of step `step`.
///
/// Step 0 always weighs with the identity. Later steps use
/// `s sᵗ / (sᵗ Σ s)` for state `s` and exploration covariance `Σ`.
///
/// # Errors
/// [`PowerError::DegenerateWeight`] when `sᵗ Σ s` is zero or not finite.
pub fn precision_weight(step: usize, state: &Vector, covariance: &Matrix) -> Result<Matrix> {
    if step == 0 {
        return Ok(Matrix::identity(state.len(), state.len()));
    }
    let scale = state.dot(&(covariance * state));
    if scale == 0.0 || !scale.is_finite() {
        return Err(PowerError::DegenerateWeight { location: Location::step(step), value: scale });
    }
    Ok(state * state.transpose() * scale.recip())
}

/// Runs the world until it reports a terminal state or `max_steps` steps
/// have been taken. The first step is taken unconditionally.
///
/// # Errors
/// [`PowerError::ContractViolation`] when the world or policy returns
/// non-finite values or vectors of the wrong dimension.
pub fn rollout<W, P>(world: &mut W, policy: &mut P, theta: &Vector, max_steps: usize) -> Result<Trajectory>
where
    W: World + ?Sized,
    P: NoisePolicy + ?Sized,
{
    let dim = theta.len();
    let mut state = Vector::zeros(dim);
    let mut trajectory = Trajectory::default();

    loop {
        let step = trajectory.len();
        let (action, noise) = policy.sample(theta, &state);
        check_policy(step, dim, action, &noise)?;

        let (reward, next_state) = world.act(&state, action);
        check_world(step, dim, reward, &next_state)?;

        trajectory.transitions.push(Transition { state, noise, reward });
        state = next_state;

        if trajectory.len() >= max_steps || world.is_terminal(&state) {
            break;
        }
    }
    Ok(trajectory)
}

/// Folds a finished trajectory into its weighted sums.
///
/// # Errors
/// [`PowerError::DegenerateWeight`] for the first step whose weight is undefined.
pub fn aggregate(trajectory: &Trajectory, covariance: &Matrix) -> Result<EpisodeStats> {
    let dim = covariance.nrows();
    let returns = trajectory.returns();
    let mut weight_sum = Matrix::zeros(dim, dim);
    let mut noise_weighted_sum = Vector::zeros(dim);

    for (i, (t, &ret)) in trajectory.transitions.iter().zip(&returns).enumerate() {
        let weight = precision_weight(i, &t.state, covariance)?;
        noise_weighted_sum += &weight * &t.noise * ret;
        weight_sum += weight * ret;
    }

    Ok(EpisodeStats {
        weight_sum,
        noise_weighted_sum,
        total_return: returns.first().copied().unwrap_or(0.0),
        steps: trajectory.len(),
    })
}

/// Runs one exploratory episode and returns its weighted statistics.
///
/// The state starts at the zero vector with the dimension of `theta`.
///
/// # Errors
/// [`PowerError::DegenerateWeight`] or [`PowerError::ContractViolation`],
/// located at the offending step.
pub fn run_episode<W, P>(
    world: &mut W,
    policy: &mut P,
    theta: &Vector,
    covariance: &Matrix,
    max_steps: usize,
) -> Result<EpisodeStats>
where
    W: World + ?Sized,
    P: NoisePolicy + ?Sized,
{
    if covariance.shape() != (theta.len(), theta.len()) {
        return Err(PowerError::ContractViolation {
            location: Location::default(),
            violation: Violation::CovarianceDimension {
                expected: theta.len(),
                rows: covariance.nrows(),
                cols: covariance.ncols(),
            },
        });
    }
    let trajectory = rollout(world, policy, theta, max_steps)?;
    let stats = aggregate(&trajectory, covariance)?;
    debug!(steps = stats.steps, total_return = stats.total_return, "episode finished");
    Ok(stats)
}

fn check_policy(step: usize, dim: usize, action: f64, noise: &Vector) -> Result<()> {
    if noise.len() != dim {
        return Err(PowerError::violation(
            step,
            Violation::NoiseDimension { expected: dim, found: noise.len() },
        ));
    }
    if !all_finite(noise.iter()) {
        return Err(PowerError::violation(step, Violation::NonFiniteNoise));
    }
    if !action.is_finite() {
        return Err(PowerError::violation(step, Violation::NonFiniteAction(action)));
    }
    Ok(())
}

fn check_world(step: usize, dim: usize, reward: f64, next_state: &Vector) -> Result<()> {
    if !reward.is_finite() {
        return Err(PowerError::violation(step, Violation::NonFiniteReward(reward)));
    }
    if next_state.len() != dim {
        return Err(PowerError::violation(
            step,
            Violation::StateDimension { expected: dim, found: next_state.len() },
        ));
    }
    if !all_finite(next_state.iter()) {
        return Err(PowerError::violation(step, Violation::NonFiniteState));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_to_go_is_suffix_sum() {
        let mut rewards = vec![1.0, -2.0, 0.5, 3.0];
        reward_to_go(&mut rewards);
        assert_eq!(rewards, vec![2.5, 1.5, 3.5, 3.0]);
    }

    #[test]
    fn reward_to_go_of_empty_slice() {
        let mut rewards: Vec<f64> = Vec::new();
        reward_to_go(&mut rewards);
        assert!(rewards.is_empty());
    }

    #[test]
    fn later_steps_use_scaled_outer_product() {
        let state = Vector::from_vec(vec![1.0, 1.0]);
        let w = precision_weight(1, &state, &Matrix::from_diagonal_element(2, 2, 0.5)).unwrap();
        // s sᵗ / (0.5 * 2)
        assert_eq!(w, Matrix::from_element(2, 2, 1.0));
    }
}

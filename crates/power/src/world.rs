use linalg::Vector;

/// Environment the learner acts in.
///
/// Each call to [`act`] applies one scalar action in the given state and
/// returns the reward together with the successor state. The learner treats
/// the world as a black box: internal randomness is allowed, but the state
/// vector must keep the dimension of the policy parameter.
///
/// [`act`]: World::act
pub trait World {
    /// Apply `action` in `state`, returning `(reward, next_state)`.
    fn act(&mut self, state: &Vector, action: f64) -> (f64, Vector);

    /// Whether `state` ends the episode.
    fn is_terminal(&self, state: &Vector) -> bool;
}

/// Exploration policy around the linear mean action `θ · state`.
///
/// Returns the action to apply and the exact perturbation that produced it,
/// which the update rule weights by the observed returns.
pub trait NoisePolicy {
    fn sample(&mut self, theta: &Vector, state: &Vector) -> (f64, Vector);
}

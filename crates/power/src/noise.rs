use linalg::Vector;

use crate::world::NoisePolicy;

/// Gaussian parameter-space exploration.
///
/// Every call draws `ε ~ N(0, std_dev² I)` and acts with the perturbed
/// linear policy `(θ + ε) · state`.
pub struct LinearGaussianPolicy {
    std_dev: f64,
    rng: fastrand::Rng,
}

impl LinearGaussianPolicy {
    #[must_use]
    pub fn new(std_dev: f64, seed: u64) -> Self {
        Self { std_dev, rng: fastrand::Rng::with_seed(seed) }
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Box-Muller transform over two uniform draws.
    fn standard_normal(&mut self) -> f64 {
        // 1 - u lies in (0, 1], keeping the logarithm finite.
        let u1 = 1.0 - self.rng.f64();
        let u2 = self.rng.f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

impl NoisePolicy for LinearGaussianPolicy {
    fn sample(&mut self, theta: &Vector, state: &Vector) -> (f64, Vector) {
        let dim = theta.len();
        let noise = Vector::from_iterator(dim, (0..dim).map(|_| self.std_dev * self.standard_normal()));
        let action = (theta + &noise).dot(state);
        (action, noise)
    }
}

/// Acts with the mean action `θ · state` and reports zero noise.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroNoisePolicy;

impl NoisePolicy for ZeroNoisePolicy {
    fn sample(&mut self, theta: &Vector, state: &Vector) -> (f64, Vector) {
        (theta.dot(state), Vector::zeros(theta.len()))
    }
}

#![allow(dead_code)]

use power::{NoisePolicy, Vector, World};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Moves the state by a fixed increment each step and pays a constant reward.
/// Terminal once the first state coordinate reaches `terminal_at`.
pub struct DriftWorld {
    pub increment: Vector,
    pub reward: f64,
    pub terminal_at: Option<f64>,
    pub calls: usize,
}

impl DriftWorld {
    pub fn new(increment: Vec<f64>, reward: f64) -> Self {
        Self { increment: Vector::from_vec(increment), reward, terminal_at: None, calls: 0 }
    }

    pub fn terminal_at(mut self, threshold: f64) -> Self {
        self.terminal_at = Some(threshold);
        self
    }
}

impl World for DriftWorld {
    fn act(&mut self, state: &Vector, _action: f64) -> (f64, Vector) {
        self.calls += 1;
        (self.reward, state.clone() + self.increment.clone())
    }

    fn is_terminal(&self, state: &Vector) -> bool {
        self.terminal_at.is_some_and(|t| state[0] >= t)
    }
}

/// Every state is terminal.
pub struct AlwaysTerminal {
    pub dim: usize,
}

impl World for AlwaysTerminal {
    fn act(&mut self, _state: &Vector, _action: f64) -> (f64, Vector) {
        (1.0, Vector::from_vec(vec![1.0; self.dim]))
    }

    fn is_terminal(&self, _state: &Vector) -> bool {
        true
    }
}

/// One-dimensional tracking task: reward `exp(-(action - target)²)`, and the
/// state jumps to `[1]` after the first step so the action equals `θ + ε`.
pub struct TargetWorld {
    pub target: f64,
}

impl World for TargetWorld {
    fn act(&mut self, _state: &Vector, action: f64) -> (f64, Vector) {
        let err = action - self.target;
        ((-err * err).exp(), Vector::from_vec(vec![1.0]))
    }

    fn is_terminal(&self, _state: &Vector) -> bool {
        false
    }
}

/// World driven by a closure over the global call index.
pub struct ScriptedWorld<F> {
    pub script: F,
    pub calls: usize,
}

impl<F> ScriptedWorld<F>
where
    F: FnMut(usize, &Vector) -> (f64, Vector),
{
    pub fn new(script: F) -> Self {
        Self { script, calls: 0 }
    }
}

impl<F> World for ScriptedWorld<F>
where
    F: FnMut(usize, &Vector) -> (f64, Vector),
{
    fn act(&mut self, state: &Vector, _action: f64) -> (f64, Vector) {
        let out = (self.script)(self.calls, state);
        self.calls += 1;
        out
    }

    fn is_terminal(&self, _state: &Vector) -> bool {
        false
    }
}

/// Always perturbs the parameter by the same noise vector.
pub struct FixedNoisePolicy {
    pub noise: Vector,
}

impl FixedNoisePolicy {
    pub fn new(noise: Vec<f64>) -> Self {
        Self { noise: Vector::from_vec(noise) }
    }
}

impl NoisePolicy for FixedNoisePolicy {
    fn sample(&mut self, theta: &Vector, state: &Vector) -> (f64, Vector) {
        let action = (theta.clone() + self.noise.clone()).dot(state);
        (action, self.noise.clone())
    }
}

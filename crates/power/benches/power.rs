use criterion::{black_box, criterion_group, criterion_main, Criterion};
use power::{average_episodes, LinearGaussianPolicy, PowerConfig, Vector, World};

/// Linear drift with a quadratic penalty on the action.
struct DriftWorld;

impl World for DriftWorld {
    fn act(&mut self, state: &Vector, action: f64) -> (f64, Vector) {
        let next = Vector::from_vec(state.iter().enumerate().map(|(i, s)| 0.9 * s + 0.1 * (i + 1) as f64).collect());
        ((-action * action).exp(), next)
    }

    fn is_terminal(&self, _state: &Vector) -> bool {
        false
    }
}

fn bench_average_episodes(c: &mut Criterion) {
    let cfg = PowerConfig { num_episodes: 20, max_steps: 50, ..PowerConfig::default() };
    for dim in [2usize, 8] {
        let theta = Vector::zeros(dim);
        c.bench_function(&format!("average_episodes_d{dim}"), |b| {
            let mut policy = LinearGaussianPolicy::new(0.5, 3);
            b.iter(|| {
                let batch = average_episodes(&mut DriftWorld, &mut policy, black_box(&theta), &cfg)
                    .expect("benchmark world is well-posed");
                black_box(batch.update)
            });
        });
    }
}

criterion_group!(benches, bench_average_episodes);
criterion_main!(benches);

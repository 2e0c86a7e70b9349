//! Benchmarks for the soft actor-critic learning update.
//!
//! Run with:
//!
//! ```bash
//! cargo bench --bench sac_update
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array1;
use sacrl::activations::Activation;
use sacrl::algorithms::{bootstrap_targets, SoftActorCritic};
use sacrl::config::TrainingConfig;
use sacrl::environment::{Pendulum, PendulumState};
use sacrl::network::FeedForward;
use sacrl::optimizer::OptimizerConfig;
use sacrl::replay_buffer::ReplayBuffer;

type PendulumAgent = SoftActorCritic<Pendulum, FeedForward, FeedForward, OptimizerConfig, ReplayBuffer<PendulumState>>;

/// An agent whose buffer already holds one full episode of experience.
fn warmed_up_agent(hidden: usize, batch_size: usize) -> PendulumAgent {
    let config = TrainingConfig::default()
        .with_step_limit(200)
        .with_exploration_steps(usize::MAX)
        .with_seed(0);
    let critic = FeedForward::new(&[4, hidden, hidden, 1], &[Activation::Relu, Activation::Relu, Activation::Linear])
        .expect("critic");
    let policy = FeedForward::new(&[3, hidden, hidden, 1], &[Activation::Relu, Activation::Relu, Activation::Tanh])
        .expect("policy");
    let mut agent = SoftActorCritic::new(
        config,
        critic,
        policy,
        ReplayBuffer::new(10_000, batch_size).expect("buffer").with_seed(0),
        OptimizerConfig::adam(),
        OptimizerConfig::adam(),
        Pendulum::new().with_seed(0),
    )
    .expect("agent");
    agent.episode().expect("warm-up episode");
    agent
}

fn bench_update_batch_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("sac_update_batch");
    for batch_size in [16_usize, 64, 256] {
        let mut agent = warmed_up_agent(64, batch_size);
        group.bench_with_input(BenchmarkId::new("batch", batch_size), &batch_size, |b, _| {
            b.iter(|| agent.update().expect("update"));
        });
    }
    group.finish();
}

fn bench_update_hidden_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("sac_update_hidden");
    for hidden in [32_usize, 128, 256] {
        let mut agent = warmed_up_agent(hidden, 64);
        group.bench_with_input(BenchmarkId::new("hidden", hidden), &hidden, |b, _| {
            b.iter(|| agent.update().expect("update"));
        });
    }
    group.finish();
}

fn bench_soft_update(c: &mut Criterion) {
    let mut agent = warmed_up_agent(256, 64);
    c.bench_function("soft_update_hidden256", |b| {
        b.iter(|| agent.soft_update(black_box(0.005)));
    });
}

fn bench_bootstrap_targets(c: &mut Criterion) {
    let n = 1024;
    let rewards = Array1::from_shape_fn(n, |i| (i % 7) as f32 * -0.1);
    let terminals = Array1::from_shape_fn(n, |i| i % 50 == 0);
    let q1 = Array1::from_shape_fn(n, |i| (i as f32 * 0.01).sin());
    let q2 = Array1::from_shape_fn(n, |i| (i as f32 * 0.01).cos());

    c.bench_function("bootstrap_targets_1024", |b| {
        b.iter(|| {
            bootstrap_targets(
                black_box(rewards.view()),
                black_box(terminals.view()),
                black_box(q1.view()),
                black_box(q2.view()),
                0.99,
            )
        });
    });
}

criterion_group!(
    benches,
    bench_update_batch_size,
    bench_update_hidden_width,
    bench_soft_update,
    bench_bootstrap_targets
);
criterion_main!(benches);

//! Pendulum swing-up trained with the twin-critic soft actor-critic loop.
//!
//! Run with:
//!
//! ```bash
//! RUST_LOG=sacrl=debug cargo run --release --example pendulum_sac
//! ```
//!
//! An optional first argument names a JSON file with a `TrainingConfig`.

use sacrl::activations::Activation;
use sacrl::algorithms::SacBuilder;
use sacrl::config::TrainingConfig;
use sacrl::environment::{Pendulum, PendulumState};
use sacrl::network::{FeedForward, WeightInit};
use sacrl::optimizer::OptimizerConfig;
use sacrl::replay_buffer::ReplayBuffer;
use tracing::info;
use tracing_subscriber::EnvFilter;

const EPISODES: usize = 200;
const HIDDEN: usize = 128;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => TrainingConfig::from_file(path)?,
        None => TrainingConfig::default()
            .with_step_limit(200)
            .with_exploration_steps(1000)
            .with_step_size(0.0005),
    };
    info!(?config, "starting pendulum training");

    // Critic input is `torque ⧺ [cos, sin, theta_dot]`.
    let critic = FeedForward::new(&[4, HIDDEN, HIDDEN, 1], &[Activation::Relu, Activation::Relu, Activation::Linear])?
        .with_init(WeightInit::XavierUniform)?;
    // Tanh keeps the policy inside [-1, 1]; the environment clamps torque to [-2, 2].
    let policy = FeedForward::new(&[3, HIDDEN, HIDDEN, 1], &[Activation::Relu, Activation::Relu, Activation::Tanh])?
        .with_init(WeightInit::XavierUniform)?;

    let mut agent = SacBuilder::new(config)
        .critic(critic)
        .policy(policy)
        .replay(ReplayBuffer::<PendulumState>::new(100_000, 64)?)
        .critic_optimizer(OptimizerConfig::adam())
        .policy_optimizer(OptimizerConfig::adam())
        .environment(Pendulum::new())
        .build()?;

    let mut returns = Vec::with_capacity(EPISODES);
    for episode in 0..EPISODES {
        let episode_return = agent.episode()?;
        returns.push(episode_return);

        if (episode + 1) % 10 == 0 {
            let recent = &returns[returns.len().saturating_sub(10)..];
            let average = recent.iter().sum::<f32>() / recent.len() as f32;
            info!(
                episode = episode + 1,
                total_steps = agent.total_steps(),
                updates = agent.updates(),
                average_return = average,
                "training progress"
            );
        }
    }

    agent.set_deterministic(true);
    let mut evaluation = 0.0;
    for _ in 0..10 {
        evaluation += agent.episode()?;
    }
    info!(average_return = evaluation / 10.0, "greedy evaluation");

    Ok(())
}

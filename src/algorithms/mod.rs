//! # Actor-Critic Algorithms
//!
//! ### Off-Policy Methods
//!
//! - **SAC-style twin-critic training** ([`SoftActorCritic`])
//!   - Deterministic policy perturbed by clipped uniform exploration noise
//!   - Two independently initialised critics regressed onto a clipped double-Q target
//!   - Policy gradient routed through the action block of the lower critic's input
//!   - Target critics tracked by exponential averaging only
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sacrl::activations::Activation;
//! use sacrl::algorithms::SacBuilder;
//! use sacrl::config::TrainingConfig;
//! use sacrl::environment::{Pendulum, PendulumState};
//! use sacrl::network::FeedForward;
//! use sacrl::optimizer::OptimizerConfig;
//! use sacrl::replay_buffer::ReplayBuffer;
//!
//! let mut agent = SacBuilder::new(TrainingConfig::default().with_exploration_steps(500))
//!     .critic(FeedForward::new(&[4, 64, 1], &[Activation::Relu, Activation::Linear]).unwrap())
//!     .policy(FeedForward::new(&[3, 64, 1], &[Activation::Relu, Activation::Tanh]).unwrap())
//!     .replay(ReplayBuffer::<PendulumState>::new(10_000, 64).unwrap())
//!     .critic_optimizer(OptimizerConfig::adam())
//!     .policy_optimizer(OptimizerConfig::adam())
//!     .environment(Pendulum::new())
//!     .build()
//!     .unwrap();
//!
//! let episode_return = agent.episode().unwrap();
//! ```

pub mod sac;

pub use sac::{bootstrap_targets, SacBuilder, SoftActorCritic};

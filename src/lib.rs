//! # sacrl - Twin-Critic Actor-Critic Training for Continuous Control
//!
//! sacrl implements the training loop of a Soft-Actor-Critic-style agent: it
//! interacts with an environment, stores transitions, and periodically updates a
//! deterministic policy and a pair of critics together with slowly tracking target
//! copies of those critics.
//!
//! The collaborators the loop coordinates are traits, each with one concrete
//! implementation shipped in the crate:
//!
//! | Capability | Trait | Shipped implementation |
//! |------------|-------|------------------------|
//! | Function approximator | [`network::Network`] | [`network::FeedForward`] |
//! | Parameter updater | [`optimizer::Optimizer`] / [`optimizer::Updater`] | [`optimizer::OptimizerConfig`] |
//! | Transition store | [`replay_buffer::TransitionStore`] | [`replay_buffer::ReplayBuffer`] |
//! | Environment | [`environment::Environment`] | [`environment::Pendulum`] |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sacrl::activations::Activation;
//! use sacrl::algorithms::SoftActorCritic;
//! use sacrl::config::TrainingConfig;
//! use sacrl::environment::{Pendulum, PendulumState};
//! use sacrl::network::FeedForward;
//! use sacrl::optimizer::OptimizerConfig;
//! use sacrl::replay_buffer::ReplayBuffer;
//!
//! let config = TrainingConfig::default()
//!     .with_exploration_steps(1000)
//!     .with_step_limit(200);
//!
//! // Critics see `action ⧺ state`, 1 + 3 features for the pendulum.
//! let critic = FeedForward::new(&[4, 128, 128, 1], &[Activation::Relu, Activation::Relu, Activation::Linear]).unwrap();
//! let policy = FeedForward::new(&[3, 128, 128, 1], &[Activation::Relu, Activation::Relu, Activation::Tanh]).unwrap();
//!
//! let mut agent = SoftActorCritic::new(
//!     config,
//!     critic,
//!     policy,
//!     ReplayBuffer::<PendulumState>::new(100_000, 64).unwrap(),
//!     OptimizerConfig::adam(),
//!     OptimizerConfig::adam(),
//!     Pendulum::new(),
//! )
//! .unwrap();
//!
//! for episode in 0..100 {
//!     let episode_return = agent.episode().unwrap();
//!     println!("episode {episode}: {episode_return:.1}");
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions for dense layers
//! - [`algorithms`] - The twin-critic actor-critic agent
//! - [`config`] - Training configuration
//! - [`environment`] - Environment capability and the pendulum task
//! - [`error`] - Error types and result handling
//! - [`loss`] - Regression losses
//! - [`network`] - Network capability, critic inputs and the dense MLP
//! - [`optimizer`] - Parameter updaters
//! - [`replay_buffer`] - Transition storage and minibatches
//! - [`types`] - States, actions and transitions

pub mod activations;
pub mod algorithms;
pub mod config;
pub mod environment;
pub mod error;
pub mod loss;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod types;

#[cfg(test)]
mod tests;

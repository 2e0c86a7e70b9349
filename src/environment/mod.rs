//! # Environments
//!
//! The agent drives any type implementing [`Environment`]. Implementations may be
//! stochastic, but each call must complete synchronously.

pub mod pendulum;

use crate::error::Result;
use crate::types::{ContinuousAction, State};

pub use pendulum::{Pendulum, PendulumState};

/// Continuous-action environment capability.
pub trait Environment {
    type State: State;

    /// Number of action components the environment expects.
    fn action_dim(&self) -> usize;

    /// Draw a starting state for a new episode.
    fn initial_sample(&mut self) -> Result<Self::State>;

    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Apply `action` in `state`, returning the next state and the reward.
    fn sample(&mut self, state: &Self::State, action: &ContinuousAction) -> Result<(Self::State, f32)>;
}

use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

use super::Environment;
use crate::error::{Result, SacError};
use crate::types::{ContinuousAction, State};

/// Pendulum state: angle, angular velocity and steps taken so far.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendulumState {
    pub theta: f32,
    pub theta_dot: f32,
    pub steps: usize,
}

impl State for PendulumState {
    /// `[cos(theta), sin(theta), theta_dot]`
    fn encode(&self) -> Array1<f32> {
        array![self.theta.cos(), self.theta.sin(), self.theta_dot]
    }
}

/// Inverted pendulum swing-up with a single continuous torque action.
///
/// Rewards are the negated cost `angle^2 + 0.1 * speed^2 + 0.001 * torque^2`,
/// so the best achievable reward per step is 0.
#[derive(Clone, Debug)]
pub struct Pendulum {
    pub max_speed: f32,
    pub max_torque: f32,
    pub dt: f32,
    pub gravity: f32,
    pub mass: f32,
    pub length: f32,
    /// Steps after which a state counts as terminal, 0 for never
    pub max_steps: usize,
    rng: StdRng,
}

impl Default for Pendulum {
    fn default() -> Self {
        Self::new()
    }
}

impl Pendulum {
    pub fn new() -> Self {
        Pendulum {
            max_speed: 8.0,
            max_torque: 2.0,
            dt: 0.05,
            gravity: 10.0,
            mass: 1.0,
            length: 1.0,
            max_steps: 200,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    fn angle_normalize(angle: f32) -> f32 {
        (angle + PI).rem_euclid(2.0 * PI) - PI
    }
}

impl Environment for Pendulum {
    type State = PendulumState;

    fn action_dim(&self) -> usize {
        1
    }

    fn initial_sample(&mut self) -> Result<PendulumState> {
        Ok(PendulumState {
            theta: self.rng.gen_range(-PI..PI),
            theta_dot: self.rng.gen_range(-1.0..1.0),
            steps: 0,
        })
    }

    fn is_terminal(&self, state: &PendulumState) -> bool {
        self.max_steps != 0 && state.steps >= self.max_steps
    }

    fn sample(&mut self, state: &PendulumState, action: &ContinuousAction) -> Result<(PendulumState, f32)> {
        if action.len() != 1 {
            return Err(SacError::dimension_mismatch(
                "1 action component".to_string(),
                format!("{} action components", action.len()),
            ));
        }
        let torque = action.values[0].clamp(-self.max_torque, self.max_torque);
        if !torque.is_finite() {
            return Err(SacError::Environment(format!("non-finite torque {}", action.values[0])));
        }

        let costs = Self::angle_normalize(state.theta).powi(2)
            + 0.1 * state.theta_dot.powi(2)
            + 0.001 * torque.powi(2);

        let theta_dot = state.theta_dot
            + (-3.0 * self.gravity / (2.0 * self.length) * (state.theta + PI).sin()
                + 3.0 / (self.mass * self.length.powi(2)) * torque)
                * self.dt;
        let theta_dot = theta_dot.clamp(-self.max_speed, self.max_speed);
        let theta = state.theta + theta_dot * self.dt;

        let next = PendulumState {
            theta,
            theta_dot,
            steps: state.steps + 1,
        };
        Ok((next, -costs))
    }
}

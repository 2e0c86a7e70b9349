//! # Training Configuration
//!
//! Immutable per-run settings read by [`SoftActorCritic`](crate::algorithms::SoftActorCritic).
//! A configuration can be assembled with the `with_*` setters or loaded from JSON;
//! any field missing from the JSON document keeps its default.
//!
//! ```rust
//! use sacrl::config::TrainingConfig;
//!
//! let config = TrainingConfig::default()
//!     .with_discount(0.95)
//!     .with_exploration_steps(500)
//!     .with_step_limit(0);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SacError};

/// How per-sample policy gradients are combined over a minibatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradientAggregation {
    /// Sum the per-sample gradients; the step size absorbs the batch scale.
    #[default]
    Sum,
    /// Divide the summed gradient by the batch size.
    Mean,
}

/// Output gradient handed to the chosen critic's backward pass during the
/// policy update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyGradientSeed {
    /// Backpropagate the negated critic output `-q`, so the step scales with `|q|`.
    #[default]
    NegatedValue,
    /// Backpropagate `-1` per sample, the gradient of the objective `-Q`.
    NegativeOne,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Discount factor applied to bootstrapped values
    pub discount: f32,
    /// Step size handed to every updater
    pub step_size: f32,
    /// Per-episode step cap, 0 means unbounded
    pub step_limit: usize,
    /// Lifetime steps collected before the first learning update
    pub exploration_steps: usize,
    /// Lifetime steps between target critic synchronisations
    pub target_network_sync_interval: usize,
    /// Interpolation factor used by the soft target update
    pub soft_update_rate: f32,
    /// Upper bound of the uniform exploration noise
    pub exploration_noise_scale: f32,
    /// Symmetric bound the noise is clamped to before it is added
    pub exploration_noise_clip: f32,
    pub gradient_aggregation: GradientAggregation,
    pub policy_gradient_seed: PolicyGradientSeed,
    /// Seed for the exploration noise generator
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            discount: 0.99,
            step_size: 0.001,
            step_limit: 200,
            exploration_steps: 1000,
            target_network_sync_interval: 1,
            soft_update_rate: 0.005,
            exploration_noise_scale: 0.1,
            exploration_noise_clip: 0.25,
            gradient_aggregation: GradientAggregation::Sum,
            policy_gradient_seed: PolicyGradientSeed::NegatedValue,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn with_discount(mut self, discount: f32) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_step_size(mut self, step_size: f32) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn with_exploration_steps(mut self, steps: usize) -> Self {
        self.exploration_steps = steps;
        self
    }

    pub fn with_target_network_sync_interval(mut self, interval: usize) -> Self {
        self.target_network_sync_interval = interval;
        self
    }

    pub fn with_soft_update_rate(mut self, rho: f32) -> Self {
        self.soft_update_rate = rho;
        self
    }

    pub fn with_exploration_noise(mut self, scale: f32, clip: f32) -> Self {
        self.exploration_noise_scale = scale;
        self.exploration_noise_clip = clip;
        self
    }

    pub fn with_gradient_aggregation(mut self, aggregation: GradientAggregation) -> Self {
        self.gradient_aggregation = aggregation;
        self
    }

    pub fn with_policy_gradient_seed(mut self, seed: PolicyGradientSeed) -> Self {
        self.policy_gradient_seed = seed;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field against its admissible range.
    pub fn validate(&self) -> Result<()> {
        if !(self.discount > 0.0 && self.discount <= 1.0) {
            return Err(SacError::invalid_parameter(
                "discount".to_string(),
                format!("must be in (0, 1], got {}", self.discount),
            ));
        }
        if !(self.step_size > 0.0) || !self.step_size.is_finite() {
            return Err(SacError::invalid_parameter(
                "step_size".to_string(),
                format!("must be positive and finite, got {}", self.step_size),
            ));
        }
        if self.target_network_sync_interval == 0 {
            return Err(SacError::invalid_parameter(
                "target_network_sync_interval",
                "must be at least 1",
            ));
        }
        if !(self.soft_update_rate > 0.0 && self.soft_update_rate <= 1.0) {
            return Err(SacError::invalid_parameter(
                "soft_update_rate".to_string(),
                format!("must be in (0, 1], got {}", self.soft_update_rate),
            ));
        }
        if !(self.exploration_noise_scale >= 0.0) || !self.exploration_noise_scale.is_finite() {
            return Err(SacError::invalid_parameter(
                "exploration_noise_scale".to_string(),
                format!("must be non-negative and finite, got {}", self.exploration_noise_scale),
            ));
        }
        if !(self.exploration_noise_clip >= 0.0) || !self.exploration_noise_clip.is_finite() {
            return Err(SacError::invalid_parameter(
                "exploration_noise_clip".to_string(),
                format!("must be non-negative and finite, got {}", self.exploration_noise_clip),
            ));
        }
        Ok(())
    }

    /// Parse and validate a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TrainingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Whether the per-episode step cap has been reached.
    pub(crate) fn step_limit_reached(&self, steps: usize) -> bool {
        self.step_limit != 0 && steps >= self.step_limit
    }
}

use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SacError};

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeightInit {
    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },

    /// Xavier/Glorot uniform initialization
    XavierUniform,
}

impl Default for WeightInit {
    fn default() -> Self {
        WeightInit::Uniform { min: -0.1, max: 0.1 }
    }
}

impl WeightInit {
    pub fn validate(&self) -> Result<()> {
        match self {
            WeightInit::Uniform { min, max } if !(min < max) => Err(SacError::invalid_parameter(
                "weight_init".to_string(),
                format!("uniform range [{}, {}) is empty", min, max),
            )),
            _ => Ok(()),
        }
    }

    /// Draw a `(fan_in, fan_out)` weight matrix.
    pub fn initialize_weights(&self, shape: (usize, usize)) -> Array2<f32> {
        let (fan_in, fan_out) = shape;

        match self {
            WeightInit::Uniform { min, max } => Array2::random(shape, Uniform::new(*min, *max)),
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out).max(1) as f32).sqrt();
                Array2::random(shape, Uniform::new(-limit, limit))
            }
        }
    }
}

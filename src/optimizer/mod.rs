//! # Parameter Updaters
//!
//! An [`Updater`] is bound to exactly one parameter block: it is created once from
//! that block (so stateful rules can size their moment estimates) and then invoked
//! repeatedly with a gradient. [`Optimizer`] is the factory side of that contract;
//! the agent binds one updater per trained network, so the two critics never share
//! momentum state.
//!
//! ```rust
//! use sacrl::optimizer::{Optimizer, OptimizerConfig, Updater};
//! use ndarray::array;
//!
//! let mut params = array![1.0f32, -1.0];
//! let mut adam = OptimizerConfig::adam().bind(&params);
//! adam.update(&mut params, 0.01, array![0.5, -0.5].view()).unwrap();
//! ```

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SacError};

/// Stateful update rule bound to one parameter block.
pub trait Updater {
    /// Apply one descent step of `step_size` along `gradient` to `parameters` in place.
    fn update(&mut self, parameters: &mut Array1<f32>, step_size: f32, gradient: ArrayView1<f32>) -> Result<()>;
}

/// Factory that binds a fresh [`Updater`] to a parameter block.
pub trait Optimizer {
    type Updater: Updater;

    fn bind(&self, parameters: &Array1<f32>) -> Self::Updater;
}

fn check_shapes(parameters: &Array1<f32>, gradient: &ArrayView1<f32>) -> Result<()> {
    if parameters.len() != gradient.len() {
        return Err(SacError::dimension_mismatch(
            format!("gradient of length {}", parameters.len()),
            format!("gradient of length {}", gradient.len()),
        ));
    }
    Ok(())
}

/// Serializable choice of update rule and its hyperparameters.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerConfig {
    Sgd,
    Adam { beta1: f32, beta2: f32, epsilon: f32 },
    RmsProp { beta: f32, epsilon: f32 },
}

impl OptimizerConfig {
    pub fn adam() -> Self {
        OptimizerConfig::Adam {
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }

    pub fn rms_prop() -> Self {
        OptimizerConfig::RmsProp { beta: 0.9, epsilon: 1e-8 }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::adam()
    }
}

impl Optimizer for OptimizerConfig {
    type Updater = OptimizerWrapper;

    fn bind(&self, parameters: &Array1<f32>) -> OptimizerWrapper {
        let size = parameters.len();
        match *self {
            OptimizerConfig::Sgd => OptimizerWrapper::SGD(SGD::new()),
            OptimizerConfig::Adam { beta1, beta2, epsilon } => {
                OptimizerWrapper::Adam(Adam::new(size, beta1, beta2, epsilon))
            }
            OptimizerConfig::RmsProp { beta, epsilon } => {
                OptimizerWrapper::RMSProp(RMSProp::new(size, beta, epsilon))
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
    RMSProp(RMSProp),
}

impl Updater for OptimizerWrapper {
    fn update(&mut self, parameters: &mut Array1<f32>, step_size: f32, gradient: ArrayView1<f32>) -> Result<()> {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update(parameters, step_size, gradient),
            OptimizerWrapper::Adam(optimizer) => optimizer.update(parameters, step_size, gradient),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.update(parameters, step_size, gradient),
        }
    }
}

/// Plain gradient descent.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Updater for SGD {
    fn update(&mut self, parameters: &mut Array1<f32>, step_size: f32, gradient: ArrayView1<f32>) -> Result<()> {
        check_shapes(parameters, &gradient)?;
        parameters.zip_mut_with(&gradient, |w, &g| *w -= step_size * g);
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m: Array1<f32>,
    v: Array1<f32>,
    /// Number of updates applied so far
    pub t: i32,
}

impl Adam {
    pub fn new(size: usize, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m: Array1::zeros(size),
            v: Array1::zeros(size),
            t: 0,
        }
    }
}

impl Updater for Adam {
    fn update(&mut self, parameters: &mut Array1<f32>, step_size: f32, gradient: ArrayView1<f32>) -> Result<()> {
        check_shapes(parameters, &gradient)?;
        check_shapes(&self.m, &gradient)?;
        self.t += 1;

        let (beta1, beta2) = (self.beta1, self.beta2);
        self.m.zip_mut_with(&gradient, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        self.v.zip_mut_with(&gradient, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        let m_correction = 1.0 - beta1.powi(self.t);
        let v_correction = 1.0 - beta2.powi(self.t);
        let epsilon = self.epsilon;

        ndarray::Zip::from(parameters)
            .and(&self.m)
            .and(&self.v)
            .for_each(|w, &m, &v| {
                let m_hat = m / m_correction;
                let v_hat = v / v_correction;
                *w -= step_size * m_hat / (v_hat.sqrt() + epsilon);
            });
        Ok(())
    }
}

/// RMSProp optimizer
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RMSProp {
    pub beta: f32,
    pub epsilon: f32,
    v: Array1<f32>,
}

impl RMSProp {
    pub fn new(size: usize, beta: f32, epsilon: f32) -> Self {
        RMSProp {
            beta,
            epsilon,
            v: Array1::zeros(size),
        }
    }
}

impl Updater for RMSProp {
    fn update(&mut self, parameters: &mut Array1<f32>, step_size: f32, gradient: ArrayView1<f32>) -> Result<()> {
        check_shapes(parameters, &gradient)?;
        check_shapes(&self.v, &gradient)?;

        // Update moving average of squared gradients
        let beta = self.beta;
        self.v.zip_mut_with(&gradient, |v, &g| *v = beta * *v + (1.0 - beta) * g * g);

        let epsilon = self.epsilon;
        ndarray::Zip::from(parameters)
            .and(&gradient)
            .and(&self.v)
            .for_each(|w, &g, &v| *w -= step_size * g / (v.sqrt() + epsilon));
        Ok(())
    }
}

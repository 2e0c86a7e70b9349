//! # Function Approximators
//!
//! The agent only talks to networks through the [`Network`] trait: inference with
//! [`Network::predict`], a recorded pass with [`Network::forward`], and
//! [`Network::backward`] which returns both the parameter gradient and the gradient
//! with respect to the input. Every network owns one flat parameter block that
//! updaters mutate in place.
//!
//! Batches are row-major: each row of an input matrix is one sample.
//!
//! [`FeedForward`] is the dense multilayer perceptron shipped with the crate, and
//! [`CriticInput`] is the `action ⧺ state` matrix fed to critics.

pub mod critic_input;
pub mod feed_forward;
pub mod initialization;

use ndarray::{Array1, Array2, ArrayView2};

use crate::error::Result;

pub use critic_input::CriticInput;
pub use feed_forward::{FeedForward, LayerShape};
pub use initialization::WeightInit;

/// Gradients produced by one backward pass.
#[derive(Clone, Debug)]
pub struct Backprop {
    /// Gradient with respect to the parameter block, same layout as [`Network::parameters`]
    pub parameters: Array1<f32>,
    /// Gradient with respect to the input batch, same shape as the input
    pub input: Array2<f32>,
}

/// Differentiable function approximator with a single mutable parameter block.
pub trait Network: Clone {
    /// Number of input features per sample
    fn input_size(&self) -> usize;

    /// Number of output features per sample
    fn output_size(&self) -> usize;

    fn parameters(&self) -> &Array1<f32>;

    fn parameters_mut(&mut self) -> &mut Array1<f32>;

    /// Draw a fresh set of parameters.
    fn reset_parameters(&mut self);

    /// Inference only; records nothing for a later backward pass.
    fn predict(&self, input: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Evaluate and record the intermediate values needed by [`Network::backward`].
    fn forward(&mut self, input: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Backpropagate `output_gradient` for `input`.
    fn backward(&mut self, input: ArrayView2<f32>, output_gradient: ArrayView2<f32>) -> Result<Backprop>;
}

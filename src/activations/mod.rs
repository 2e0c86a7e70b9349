//! # Activation Functions Module
//!
//! Element-wise non-linearities used by [`FeedForward`](crate::network::FeedForward)
//! layers. Each variant can be applied to a minibatch in place and differentiated
//! with respect to its pre-activation input.
//!
//! - **ReLU**: `max(0, x)`, the default for hidden layers
//! - **Linear**: identity, the usual critic output
//! - **Tanh**: bounded output in (-1, 1), the usual policy output
//! - **Sigmoid**: `1 / (1 + e^(-x))`
//! - **LeakyReLU**: ReLU with a small negative slope

pub mod functions;

pub use functions::Activation;

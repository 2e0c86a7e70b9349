use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Environment state that can be encoded into a fixed-width feature vector
pub trait State: Clone + Debug {
    /// Encode the state as a dense feature vector
    fn encode(&self) -> Array1<f32>;
}

/// Standard dense state representation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DenseState {
    pub data: Array1<f32>,
}

impl DenseState {
    pub fn new(data: Array1<f32>) -> Self {
        DenseState { data }
    }

    pub fn from_vec(data: Vec<f32>) -> Self {
        DenseState {
            data: Array1::from_vec(data),
        }
    }
}

impl State for DenseState {
    fn encode(&self) -> Array1<f32> {
        self.data.clone()
    }
}

/// Continuous action representation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinuousAction {
    pub values: Array1<f32>,
}

impl ContinuousAction {
    pub fn new(values: Array1<f32>) -> Self {
        ContinuousAction { values }
    }

    pub fn from_vec(values: Vec<f32>) -> Self {
        ContinuousAction {
            values: Array1::from_vec(values),
        }
    }

    pub fn zeros(width: usize) -> Self {
        ContinuousAction {
            values: Array1::zeros(width),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn view(&self) -> ArrayView1<f32> {
        self.values.view()
    }
}

/// One recorded interaction step. Owned by the transition store once stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<S: State> {
    pub state: S,
    pub action: ContinuousAction,
    pub reward: f32,
    pub next_state: S,
    pub terminal: bool,
    pub discount: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dense_state_encode() {
        let state = DenseState::from_vec(vec![1.0, 2.0]);
        assert_eq!(state.encode(), array![1.0, 2.0]);
    }

    #[test]
    fn test_continuous_action() {
        let action = ContinuousAction::zeros(3);
        assert_eq!(action.len(), 3);
        assert!(!action.is_empty());
        assert_eq!(ContinuousAction::from_vec(vec![0.5]).view(), array![0.5].view());
    }
}

use ndarray::{concatenate, s, Array2, ArrayView2, Axis};

use crate::error::{Result, SacError};

/// Critic input batch: action features followed by state features on each row.
///
/// The action width is kept alongside the data so that a gradient over the
/// whole input can be cut back to the action block without index arithmetic
/// at the call site.
#[derive(Clone, Debug, PartialEq)]
pub struct CriticInput {
    data: Array2<f32>,
    action_width: usize,
}

impl CriticInput {
    /// Concatenate `actions` and `states` along the feature axis.
    pub fn join<'a>(actions: ArrayView2<'a, f32>, states: ArrayView2<'a, f32>) -> Result<Self> {
        if actions.nrows() != states.nrows() {
            return Err(SacError::dimension_mismatch(
                format!("{} action rows", states.nrows()),
                format!("{} action rows", actions.nrows()),
            ));
        }
        let data = concatenate(Axis(1), &[actions, states])
            .map_err(|e| SacError::dimension_mismatch("joinable action and state blocks".to_string(), e.to_string()))?;
        Ok(CriticInput {
            data,
            action_width: actions.ncols(),
        })
    }

    pub fn view(&self) -> ArrayView2<f32> {
        self.data.view()
    }

    pub fn action_width(&self) -> usize {
        self.action_width
    }

    pub fn state_width(&self) -> usize {
        self.data.ncols() - self.action_width
    }

    pub fn batch_size(&self) -> usize {
        self.data.nrows()
    }

    pub fn actions(&self) -> ArrayView2<f32> {
        self.data.slice(s![.., ..self.action_width])
    }

    pub fn states(&self) -> ArrayView2<f32> {
        self.data.slice(s![.., self.action_width..])
    }

    /// Keep only the action columns of a gradient taken with respect to this input.
    pub fn action_gradient(&self, input_gradient: ArrayView2<f32>) -> Result<Array2<f32>> {
        if input_gradient.dim() != self.data.dim() {
            return Err(SacError::dimension_mismatch(
                format!("{:?}", self.data.dim()),
                format!("{:?}", input_gradient.dim()),
            ));
        }
        Ok(input_gradient.slice(s![.., ..self.action_width]).to_owned())
    }
}

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::{Backprop, Network, WeightInit};
use crate::activations::Activation;
use crate::error::{Result, SacError};

/// Shape and non-linearity of one fully connected layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerShape {
    pub input_size: usize,
    pub output_size: usize,
    pub activation: Activation,
}

impl LayerShape {
    fn weight_count(&self) -> usize {
        self.input_size * self.output_size
    }

    fn parameter_count(&self) -> usize {
        self.weight_count() + self.output_size
    }
}

/// Values recorded by [`FeedForward::forward`] for the next backward pass.
#[derive(Clone, Debug)]
struct ForwardCache {
    input: Array2<f32>,
    /// Input seen by each layer
    layer_inputs: Vec<Array2<f32>>,
    /// Affine output of each layer before its activation
    pre_activations: Vec<Array2<f32>>,
}

/// A dense multilayer perceptron over one flat parameter block.
///
/// Layer `l` owns the range `[offset_l, offset_l + in*out + out)` of the block:
/// first its `in x out` weight matrix in row-major order, then its biases.
/// Weights are drawn from [`WeightInit`] and biases start at zero.
///
/// # Example
///
/// ```rust
/// use sacrl::activations::Activation;
/// use sacrl::network::{FeedForward, Network};
/// use ndarray::array;
///
/// let mut critic = FeedForward::new(&[3, 16, 1], &[Activation::Relu, Activation::Linear]).unwrap();
/// let q = critic.predict(array![[0.1, 0.2, 0.3]].view()).unwrap();
/// assert_eq!(q.dim(), (1, 1));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedForward {
    layers: Vec<LayerShape>,
    parameters: Array1<f32>,
    init: WeightInit,
    #[serde(skip)]
    cache: Option<ForwardCache>,
}

impl FeedForward {
    /// Create a network with the given layer sizes and one activation per layer.
    pub fn new(layer_sizes: &[usize], activations: &[Activation]) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(SacError::invalid_parameter(
                "layer_sizes",
                "need at least an input and an output size",
            ));
        }
        if activations.len() != layer_sizes.len() - 1 {
            return Err(SacError::dimension_mismatch(
                format!("{} activations", layer_sizes.len() - 1),
                format!("{} activations", activations.len()),
            ));
        }
        if layer_sizes.iter().any(|&n| n == 0) {
            return Err(SacError::invalid_parameter("layer_sizes", "sizes must be non-zero"));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| LayerShape {
                input_size: window[0],
                output_size: window[1],
                activation,
            })
            .collect::<Vec<_>>();

        let mut network = FeedForward {
            layers,
            parameters: Array1::zeros(0),
            init: WeightInit::default(),
            cache: None,
        };
        network.reset_parameters();
        Ok(network)
    }

    /// Switch the initialization strategy and redraw the parameters.
    pub fn with_init(mut self, init: WeightInit) -> Result<Self> {
        init.validate()?;
        self.init = init;
        self.reset_parameters();
        Ok(self)
    }

    /// Replace the parameter block wholesale.
    pub fn with_parameters(mut self, parameters: Array1<f32>) -> Result<Self> {
        if parameters.len() != self.parameter_count() {
            return Err(SacError::dimension_mismatch(
                format!("{} parameters", self.parameter_count()),
                format!("{} parameters", parameters.len()),
            ));
        }
        self.parameters = parameters;
        self.cache = None;
        Ok(self)
    }

    pub fn layers(&self) -> &[LayerShape] {
        &self.layers
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(LayerShape::parameter_count).sum()
    }

    fn layer_parameters(&self, index: usize) -> Result<(ArrayView2<f32>, ArrayView1<f32>)> {
        let offset: usize = self.layers[..index].iter().map(LayerShape::parameter_count).sum();
        let layer = &self.layers[index];
        let weights = self
            .parameters
            .slice(s![offset..offset + layer.weight_count()])
            .into_shape((layer.input_size, layer.output_size))
            .map_err(|e| SacError::dimension_mismatch("contiguous weight block".to_string(), e.to_string()))?;
        let biases = self
            .parameters
            .slice(s![offset + layer.weight_count()..offset + layer.parameter_count()]);
        Ok((weights, biases))
    }

    fn check_input(&self, input: &ArrayView2<f32>) -> Result<()> {
        if input.ncols() != self.input_size() {
            return Err(SacError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{} input features", input.ncols()),
            ));
        }
        Ok(())
    }

    fn run(&self, input: ArrayView2<f32>) -> Result<(Array2<f32>, ForwardCache)> {
        self.check_input(&input)?;

        let mut layer_inputs = Vec::with_capacity(self.layers.len());
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        let mut current = input.to_owned();

        for (index, layer) in self.layers.iter().enumerate() {
            let (weights, biases) = self.layer_parameters(index)?;
            let mut outputs = current.dot(&weights) + &biases.insert_axis(Axis(0));
            pre_activations.push(outputs.clone());
            layer.activation.apply_batch(&mut outputs);
            layer_inputs.push(std::mem::replace(&mut current, outputs));
        }

        let cache = ForwardCache {
            input: input.to_owned(),
            layer_inputs,
            pre_activations,
        };
        Ok((current, cache))
    }
}

impl Network for FeedForward {
    fn input_size(&self) -> usize {
        self.layers[0].input_size
    }

    fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size
    }

    fn parameters(&self) -> &Array1<f32> {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Array1<f32> {
        self.cache = None;
        &mut self.parameters
    }

    fn reset_parameters(&mut self) {
        let mut blocks = Vec::with_capacity(self.parameter_count());
        for layer in &self.layers {
            let weights = self.init.initialize_weights((layer.input_size, layer.output_size));
            blocks.extend(weights.iter().copied());
            blocks.extend(std::iter::repeat(0.0).take(layer.output_size));
        }
        self.parameters = Array1::from_vec(blocks);
        self.cache = None;
    }

    fn predict(&self, input: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.run(input).map(|(output, _)| output)
    }

    fn forward(&mut self, input: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (output, cache) = self.run(input)?;
        self.cache = Some(cache);
        Ok(output)
    }

    fn backward(&mut self, input: ArrayView2<f32>, output_gradient: ArrayView2<f32>) -> Result<Backprop> {
        let expected = (input.nrows(), self.output_size());
        if output_gradient.dim() != expected {
            return Err(SacError::dimension_mismatch(
                format!("{:?} output gradient", expected),
                format!("{:?} output gradient", output_gradient.dim()),
            ));
        }

        let recorded = matches!(&self.cache, Some(cache) if cache.input == input);
        if !recorded {
            self.forward(input)?;
        }
        let cache = self
            .cache
            .as_ref()
            .ok_or_else(|| SacError::invalid_parameter("cache", "forward() must be called before backward()"))?;

        let mut gradient = Array1::zeros(self.parameter_count());
        let mut offset = self.parameter_count();
        let mut current_error = output_gradient.to_owned();

        for index in (0..self.layers.len()).rev() {
            let layer = &self.layers[index];
            let (weights, _) = self.layer_parameters(index)?;

            let activation_deriv = layer.activation.derivative_batch(cache.pre_activations[index].view());
            let adjusted_error = current_error * &activation_deriv;
            let weight_gradients = cache.layer_inputs[index].t().dot(&adjusted_error);
            let bias_gradients = adjusted_error.sum_axis(Axis(0));

            offset -= layer.parameter_count();
            let weight_end = offset + layer.weight_count();
            gradient
                .slice_mut(s![offset..weight_end])
                .iter_mut()
                .zip(weight_gradients.iter())
                .for_each(|(g, &w)| *g = w);
            gradient
                .slice_mut(s![weight_end..weight_end + layer.output_size])
                .assign(&bias_gradients);

            current_error = adjusted_error.dot(&weights.t());
        }

        Ok(Backprop {
            parameters: gradient,
            input: current_error,
        })
    }
}

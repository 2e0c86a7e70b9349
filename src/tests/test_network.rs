use ndarray::{array, Array1};

use crate::activations::Activation;
use crate::network::{CriticInput, FeedForward, Network, WeightInit};
use crate::optimizer::{Optimizer, OptimizerConfig, Updater};
use crate::loss::{Loss, MeanSquaredError};

#[test]
fn test_predict_matches_forward() {
    let mut net = FeedForward::new(&[3, 6, 2], &[Activation::Tanh, Activation::Linear]).unwrap();
    let input = array![[0.1, 0.2, 0.3], [-0.3, 0.0, 0.9]];
    let predicted = net.predict(input.view()).unwrap();
    let forward = net.forward(input.view()).unwrap();
    assert_eq!(predicted, forward);
    assert_eq!(forward.dim(), (2, 2));
}

#[test]
fn test_parameter_gradient_matches_finite_difference() {
    let mut net = FeedForward::new(&[2, 4, 1], &[Activation::Tanh, Activation::Linear])
        .unwrap()
        .with_init(WeightInit::XavierUniform)
        .unwrap();
    let input = array![[0.5, -0.25]];
    let bp = net.backward(input.view(), array![[1.0]].view()).unwrap();

    let eps = 1e-3;
    let base = net.parameters().clone();
    for k in [0usize, 3, 8, base.len() - 1] {
        let mut plus = base.clone();
        plus[k] += eps;
        let mut minus = base.clone();
        minus[k] -= eps;
        let up = net.clone().with_parameters(plus).unwrap().predict(input.view()).unwrap()[[0, 0]];
        let down = net.clone().with_parameters(minus).unwrap().predict(input.view()).unwrap()[[0, 0]];
        let numeric = (up - down) / (2.0 * eps);
        assert!((numeric - bp.parameters[k]).abs() < 1e-2, "parameter {}: {} vs {}", k, numeric, bp.parameters[k]);
    }
}

#[test]
fn test_regression_reduces_loss() {
    let mut net = FeedForward::new(&[1, 8, 1], &[Activation::Tanh, Activation::Linear])
        .unwrap()
        .with_init(WeightInit::XavierUniform)
        .unwrap();
    let mut updater = OptimizerConfig::Sgd.bind(net.parameters());
    let inputs = array![[-1.0], [-0.5], [0.0], [0.5], [1.0]];
    let targets = inputs.mapv(|x: f32| 0.5 * x);

    let initial = MeanSquaredError.compute_batch(net.predict(inputs.view()).unwrap().view(), targets.view());
    for _ in 0..200 {
        let out = net.forward(inputs.view()).unwrap();
        let error = MeanSquaredError.gradient_batch(out.view(), targets.view());
        let bp = net.backward(inputs.view(), error.view()).unwrap();
        updater.update(net.parameters_mut(), 0.1, bp.parameters.view()).unwrap();
    }
    let trained = MeanSquaredError.compute_batch(net.predict(inputs.view()).unwrap().view(), targets.view());
    assert!(trained < initial, "loss went from {} to {}", initial, trained);
}

#[test]
fn test_clone_then_reset_is_independent() {
    let original = FeedForward::new(&[4, 8, 1], &[Activation::Relu, Activation::Linear]).unwrap();
    let mut twin = original.clone();
    twin.reset_parameters();

    assert_eq!(twin.layers(), original.layers());
    assert_ne!(twin.parameters(), original.parameters());

    twin.parameters_mut().fill(0.0);
    assert!(original.parameters().iter().any(|&v| v != 0.0));
}

#[test]
fn test_action_gradient_routes_through_critic_input() {
    // q = 2 * a + 3 * s, so dq/da = 2 regardless of input
    let mut critic = FeedForward::new(&[2, 1], &[Activation::Linear])
        .unwrap()
        .with_parameters(array![2.0, 3.0, 0.0])
        .unwrap();
    let input = CriticInput::join(array![[0.7]].view(), array![[-1.2]].view()).unwrap();
    critic.forward(input.view()).unwrap();
    let bp = critic.backward(input.view(), array![[-1.0]].view()).unwrap();

    assert_eq!(bp.input, array![[-2.0, -3.0]]);
    assert_eq!(input.action_gradient(bp.input.view()).unwrap(), array![[-2.0]]);
}

#[test]
fn test_with_parameters_checks_length() {
    let net = FeedForward::new(&[2, 1], &[Activation::Linear]).unwrap();
    assert!(net.with_parameters(Array1::zeros(2)).is_err());
}

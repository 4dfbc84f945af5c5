//! Feed-forward policy whose kernels are restricted to +1 / -1.
//!
//! Hidden layers apply the configured activation; the output layer is linear
//! and the chosen action is the first index holding the maximum.

use crate::error::PolicyError;
use crate::store::{LayerWeights, WeightSet, WeightStore};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Anything able to turn a perception vector into an action index.
pub trait Policy {
    fn decide(&self, perception: &[f32]) -> Result<usize, PolicyError>;
    fn action_size(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Tanh,
    Relu,
    Sigmoid,
    Identity,
}

impl Activation {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Identity => x,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkShape {
    pub state_size: usize,
    pub hidden: Vec<usize>,
    pub action_size: usize,
}

impl NetworkShape {
    pub fn new(state_size: usize, hidden: &[usize], action_size: usize) -> Self {
        Self {
            state_size,
            hidden: hidden.to_vec(),
            action_size,
        }
    }

    /// `(outputs, inputs)` of every layer, input side first.
    pub fn layer_dims(&self) -> Vec<(usize, usize)> {
        let mut widths = Vec::with_capacity(self.hidden.len() + 2);
        widths.push(self.state_size);
        widths.extend_from_slice(&self.hidden);
        widths.push(self.action_size);
        widths.windows(2).map(|w| (w[1], w[0])).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryLayer {
    inputs: usize,
    outputs: usize,
    kernel: Vec<f32>,
    bias: Vec<f32>,
}

impl BinaryLayer {
    fn random<R: Rng + ?Sized>(outputs: usize, inputs: usize, rng: &mut R) -> Self {
        let kernel = (0..outputs * inputs)
            .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
            .collect();
        Self {
            inputs,
            outputs,
            kernel,
            bias: vec![0.0; outputs],
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.outputs, self.inputs)
    }

    /// Row-major `outputs x inputs`.
    pub fn kernel(&self) -> &[f32] {
        &self.kernel
    }

    pub fn bias(&self) -> &[f32] {
        &self.bias
    }

    fn forward(&self, input: &[f32], out: &mut Vec<f32>) {
        out.clear();
        out.extend(
            self.kernel
                .chunks_exact(self.inputs)
                .zip(&self.bias)
                .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b),
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryNetwork {
    layers: Vec<BinaryLayer>,
    activation: Activation,
}

impl BinaryNetwork {
    /// Fresh network: every kernel entry is an independent fair draw from
    /// {+1, -1}; biases start at zero.
    pub fn random<R: Rng + ?Sized>(
        shape: &NetworkShape,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self, PolicyError> {
        let dims = shape.layer_dims();
        if dims.iter().any(|&(outputs, inputs)| outputs == 0 || inputs == 0) {
            return Err(PolicyError::EmptyNetwork);
        }
        let layers = dims
            .into_iter()
            .map(|(outputs, inputs)| BinaryLayer::random(outputs, inputs, rng))
            .collect();
        Ok(Self { layers, activation })
    }

    /// Rebuilds a network from a snapshot, checking it against `shape`.
    pub fn from_weights(
        shape: &NetworkShape,
        activation: Activation,
        weights: WeightSet,
    ) -> Result<Self, PolicyError> {
        let dims = shape.layer_dims();
        if dims.iter().any(|&(outputs, inputs)| outputs == 0 || inputs == 0) {
            return Err(PolicyError::EmptyNetwork);
        }
        if weights.layers.len() != dims.len() {
            return Err(PolicyError::LayerCount {
                expected: dims.len(),
                actual: weights.layers.len(),
            });
        }

        let mut layers = Vec::with_capacity(dims.len());
        for (layer, (w, &(outputs, inputs))) in weights.layers.into_iter().zip(&dims).enumerate() {
            let actual = (w.outputs, w.inputs);
            if actual != (outputs, inputs)
                || w.kernel.len() != outputs * inputs
                || w.bias.len() != outputs
            {
                return Err(PolicyError::LayerShape {
                    layer,
                    expected: (outputs, inputs),
                    actual,
                });
            }
            if let Some((index, &value)) = w
                .kernel
                .iter()
                .enumerate()
                .find(|&(_, &v)| v != 1.0 && v != -1.0)
            {
                return Err(PolicyError::NonBinaryWeight { layer, index, value });
            }
            layers.push(BinaryLayer {
                inputs,
                outputs,
                kernel: w.kernel,
                bias: w.bias,
            });
        }
        Ok(Self { layers, activation })
    }

    pub fn weights(&self) -> WeightSet {
        WeightSet {
            layers: self
                .layers
                .iter()
                .map(|l| LayerWeights {
                    inputs: l.inputs,
                    outputs: l.outputs,
                    kernel: l.kernel.clone(),
                    bias: l.bias.clone(),
                })
                .collect(),
        }
    }

    pub fn save<S: WeightStore + ?Sized>(&self, store: &mut S, name: &str) -> Result<(), PolicyError> {
        store.save(name, &self.weights())?;
        debug!(name, layers = self.layers.len(), "saved binary network");
        Ok(())
    }

    pub fn restore<S: WeightStore + ?Sized>(
        shape: &NetworkShape,
        activation: Activation,
        store: &S,
        name: &str,
    ) -> Result<Self, PolicyError> {
        let net = Self::from_weights(shape, activation, store.load(name)?)?;
        debug!(name, layers = net.layers.len(), "restored binary network");
        Ok(net)
    }

    pub fn layers(&self) -> &[BinaryLayer] {
        &self.layers
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn state_size(&self) -> usize {
        self.layers[0].inputs
    }

    /// Negates one kernel entry; the only way to change a weight.
    ///
    /// # Panics
    /// If `layer`, `row` or `col` is out of range.
    pub fn flip_weight(&mut self, layer: usize, row: usize, col: usize) {
        let l = &mut self.layers[layer];
        assert!(row < l.outputs && col < l.inputs, "kernel index out of range");
        let w = &mut l.kernel[row * l.inputs + col];
        *w = -*w;
    }

    pub fn bias_mut(&mut self, layer: usize) -> &mut [f32] {
        &mut self.layers[layer].bias
    }

    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>, PolicyError> {
        let expected = self.state_size();
        if input.len() != expected {
            return Err(PolicyError::InputWidth {
                expected,
                actual: input.len(),
            });
        }

        let last = self.layers.len() - 1;
        let mut x = input.to_vec();
        let mut y = Vec::new();
        for (i, layer) in self.layers.iter().enumerate() {
            layer.forward(&x, &mut y);
            if i != last {
                y.iter_mut().for_each(|v| *v = self.activation.apply(*v));
            }
            std::mem::swap(&mut x, &mut y);
        }
        Ok(x)
    }
}

impl Policy for BinaryNetwork {
    fn decide(&self, perception: &[f32]) -> Result<usize, PolicyError> {
        Ok(argmax(&self.forward(perception)?))
    }

    fn action_size(&self) -> usize {
        self.layers[self.layers.len() - 1].outputs
    }
}

/// Index of the first maximum. NaN never wins.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    let mut best_v = f32::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best_v {
            best_v = v;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn shape() -> NetworkShape {
        NetworkShape::new(10, &[32, 32], 3)
    }

    fn network(seed: u64) -> BinaryNetwork {
        BinaryNetwork::random(&shape(), Activation::Tanh, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn builds_declared_layers() {
        let net = network(1);
        let shapes: Vec<_> = net.layers().iter().map(BinaryLayer::shape).collect();
        assert_eq!(shapes, vec![(32, 10), (32, 32), (3, 32)]);
        for layer in net.layers() {
            assert_eq!(layer.bias().len(), layer.shape().0);
            assert!(layer.kernel().iter().all(|&w| w == 1.0 || w == -1.0));
        }
    }

    #[test]
    fn decide_stays_in_action_range() {
        let net = network(2);
        let input: Vec<f32> = (0..10).map(|i| i as f32).collect();
        for _ in 0..4 {
            assert!(net.decide(&input).unwrap() < 3);
        }
        assert_eq!(net.action_size(), 3);
    }

    #[test]
    fn wrong_input_width_is_rejected() {
        let net = network(3);
        let err = net.decide(&[0.0; 9]).unwrap_err();
        assert!(matches!(err, PolicyError::InputWidth { expected: 10, actual: 9 }));
    }

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.5, 2.0, 2.0, -1.0]), 1);
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[f32::NAN, 1.0]), 1);
    }

    #[test]
    fn output_layer_is_linear() {
        let shape = NetworkShape::new(2, &[], 2);
        let weights = WeightSet {
            layers: vec![LayerWeights {
                inputs: 2,
                outputs: 2,
                kernel: vec![1.0, 1.0, -1.0, 1.0],
                bias: vec![0.5, -3.0],
            }],
        };
        let net = BinaryNetwork::from_weights(&shape, Activation::Tanh, weights).unwrap();
        assert_eq!(net.forward(&[2.0, 3.0]).unwrap(), vec![5.5, -2.0]);
        assert_eq!(net.decide(&[2.0, 3.0]).unwrap(), 0);
    }

    #[test]
    fn hidden_layers_apply_activation() {
        let shape = NetworkShape::new(1, &[1], 1);
        let layer = |bias| LayerWeights {
            inputs: 1,
            outputs: 1,
            kernel: vec![-1.0],
            bias: vec![bias],
        };
        let weights = WeightSet {
            layers: vec![layer(0.0), layer(0.0)],
        };
        let net = BinaryNetwork::from_weights(&shape, Activation::Relu, weights).unwrap();
        // relu(-4) = 0, then linear -0
        assert_eq!(net.forward(&[4.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn flip_keeps_weights_binary() {
        let mut net = network(4);
        let before = net.layers()[1].kernel()[5 * 32 + 7];
        net.flip_weight(1, 5, 7);
        assert_eq!(net.layers()[1].kernel()[5 * 32 + 7], -before);
        net.bias_mut(2)[0] = 0.25;
        assert_eq!(net.layers()[2].bias()[0], 0.25);
    }

    #[test]
    fn restore_checks_shape_up_front() {
        let mut store = MemoryStore::default();
        network(5).save(&mut store, "net").unwrap();

        let other = NetworkShape::new(10, &[16, 32], 3);
        let err = BinaryNetwork::restore(&other, Activation::Tanh, &store, "net").unwrap_err();
        assert!(matches!(err, PolicyError::LayerShape { layer: 0, .. }));

        let deeper = NetworkShape::new(10, &[32, 32, 32], 3);
        let err = BinaryNetwork::restore(&deeper, Activation::Tanh, &store, "net").unwrap_err();
        assert!(matches!(err, PolicyError::LayerCount { expected: 4, actual: 3 }));
    }

    #[test]
    fn restore_rejects_non_binary_kernel() {
        let mut weights = network(6).weights();
        weights.layers[2].kernel[4] = 0.5;
        let err = BinaryNetwork::from_weights(&shape(), Activation::Tanh, weights).unwrap_err();
        assert!(matches!(err, PolicyError::NonBinaryWeight { layer: 2, index: 4, .. }));
    }
}

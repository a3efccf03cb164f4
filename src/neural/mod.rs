pub mod activations;

use crate::prelude::*;
use std::sync::Arc;

use crate::matrix::{ops::Dot, Matrix};
use crate::random::Generator;
use log::{debug, trace, warn};

use self::activations::{Activation, Activations};

/// Weights and biases between two sets of neurons, followed by an activation.
#[derive(Clone)]
pub struct Layer {
    weights: Matrix,
    biases: Matrix,
    activation: Arc<dyn Activation + Send + Sync>,
}

/// An ordered stack of layers where every layer accepts what the previous one emits.
#[derive(Clone)]
pub struct NeuralNet {
    layers: Vec<Layer>,
}

impl Layer {
    /// Initializes a layer given the number of inputs and neurons.
    /// Weights (`outs x ins`) are drawn first, then biases (`outs x 1`),
    /// all uniformly in `[-1, 1)`.
    /// Activation function is initially the identity (f(x) = x)
    pub fn new(ins: usize, outs: usize, rng: &mut Generator) -> Result<Self> {
        let weights = Matrix::random(outs, ins, rng)?;
        let biases = Matrix::random(outs, 1, rng)?;
        debug!("initialized {ins} -> {outs} layer");
        Ok(Self {
            weights,
            biases,
            activation: Arc::new(Activations::Identity),
        })
    }

    /// Builds a layer from explicit parameters. `biases` must be a column
    /// with one entry per row of `weights`.
    pub fn from_parts(weights: Matrix, biases: Matrix) -> Result<Self> {
        if biases.dim() != (weights.rows(), 1) {
            return Err(Error::ShapeMismatch {
                op: "layer",
                lhs: weights.dim(),
                rhs: biases.dim(),
            });
        }
        Ok(Self {
            weights,
            biases,
            activation: Arc::new(Activations::Identity),
        })
    }

    /// Add an activation function of this layer
    pub fn with_activation(mut self, activation: impl Activation + Send + Sync + 'static) -> Self {
        self.activation = Arc::new(activation);
        self
    }

    /// Propagates a column vector (`ins x 1`) through the layer, producing `outs x 1`.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        let z = self.weights.dot(input)?.add(&self.biases)?;
        self.activation.loss(&z)
    }

    /// Returns the amount of inputs this layer accepts
    pub fn ins(&self) -> usize {
        self.weights.cols()
    }

    /// Returns the amount of neurons in the layer
    pub fn outs(&self) -> usize {
        self.weights.rows()
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }
}

impl NeuralNet {
    /// Validates that adjacent layers fit together. No network exists unless
    /// every pair does.
    pub fn new(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::EmptyNetwork);
        }

        for (index, pair) in layers.windows(2).enumerate() {
            let (outs, ins) = (pair[0].outs(), pair[1].ins());
            if outs != ins {
                warn!("rejecting network: layer {index} emits {outs} values, next layer expects {ins}");
                return Err(Error::LayerIncompatibility { index, outs, ins });
            }
        }

        let net = Self { layers };
        debug!("built network with shape {:?}", net.shape());
        Ok(net)
    }

    /// Returns a new network with one more layer fed by the current last layer.
    pub fn with_layer(
        self,
        outs: usize,
        activation: impl Activation + Send + Sync + 'static,
        rng: &mut Generator,
    ) -> Result<Self> {
        let layer = Layer::new(self.output_size(), outs, rng)?.with_activation(activation);
        let mut layers = self.layers;
        layers.push(layer);
        Self::new(layers)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Neuron counts from the input through every layer: `[ins_0, outs_0, outs_1, ...]`.
    pub fn shape(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.layers.iter().map(Layer::outs))
            .collect()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].ins()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].outs()
    }

    /// Propagates an input column vector through every layer.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        self.layers
            .iter()
            .enumerate()
            .try_fold(input.clone(), |acc, (i, layer)| {
                trace!("forward through layer {i}: {:?} -> {}", acc.dim(), layer.outs());
                layer.forward(&acc)
            })
    }

    /// Like [`NeuralNet::forward`], but keeps every intermediate output.
    /// The input comes first and the final output last.
    pub fn forward_trace(&self, input: &Matrix) -> Result<Vec<Matrix>> {
        let mut outputs = vec![input.clone()];
        for (i, layer) in self.layers.iter().enumerate() {
            trace!("forward through layer {i}: {:?} -> {}", outputs[i].dim(), layer.outs());
            outputs.push(layer.forward(&outputs[outputs.len() - 1])?);
        }
        Ok(outputs)
    }
}

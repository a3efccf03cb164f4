use crate::matrix::Matrix;
use crate::prelude::*;

pub trait Activation {
    /// Returns the activation applied element-wise to `x`
    fn loss(&self, x: &Matrix) -> Result<Matrix>;
    /// Returns the derivative of the activation with respect to its input,
    /// evaluated element-wise at `x` (the pre-activation values).
    fn dloss(&self, x: &Matrix) -> Result<Matrix>;
}

/// `x` for non-negative inputs, `alpha * x` otherwise.
///
/// `alpha` is expected in `(0, 1)`; both `loss` and `dloss` rely on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeakyReLU {
    pub alpha: f64,
}

impl LeakyReLU {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }
}

impl Activation for LeakyReLU {
    fn loss(&self, x: &Matrix) -> Result<Matrix> {
        x.maximum(&x.scale(self.alpha))
    }

    fn dloss(&self, x: &Matrix) -> Result<Matrix> {
        x.gt(0.0).maximum(self.alpha)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Activations {
    Identity,
    Sigmoid,
    Arctan,
    ReLU,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Activation for Activations {
    fn loss(&self, x: &Matrix) -> Result<Matrix> {
        use Activations::*;
        Ok(match self {
            Identity => x.clone(),
            Sigmoid => x.map(sigmoid),
            Arctan => x.map(f64::atan),
            ReLU => x.maximum(0.0)?,
        })
    }

    fn dloss(&self, x: &Matrix) -> Result<Matrix> {
        use Activations::*;
        Ok(match self {
            Identity => x.map(|_| 1.0),
            Sigmoid => x.map(|x| sigmoid(x) * (1.0 - sigmoid(x))),
            Arctan => x.map(|x| 1.0 / (1.0 + x * x)),
            ReLU => x.gt(0.0),
        })
    }
}

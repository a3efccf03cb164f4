use std::fmt;

use thiserror::Error;

/// Which side of the scalar/matrix split an operand falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Scalar,
    Matrix,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandKind::Scalar => write!(f, "scalar"),
            OperandKind::Matrix => write!(f, "matrix"),
        }
    }
}

/// Error type for dense_nn
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two matrices have dimensions that don't fit the requested operation.
    #[error("shape mismatch in {op}: {lhs:?} vs {rhs:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// An operation received an operand kind it does not support.
    #[error("type mismatch in {op}: expected {expected}, got {got}")]
    TypeMismatch {
        op: &'static str,
        expected: OperandKind,
        got: OperandKind,
    },

    /// Layer `index` emits `outs` values but layer `index + 1` expects `ins`.
    #[error("layer {index} is incompatible with the next one: {outs} != {ins}")]
    LayerIncompatibility { index: usize, outs: usize, ins: usize },

    #[error("matrix must have at least one row and one column, got {nrows}x{ncols}")]
    EmptyMatrix { nrows: usize, ncols: usize },

    #[error("row {row} has {got} elements, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("a network needs at least one layer")]
    EmptyNetwork,

    #[error("generator modulus must lie in [2, 2^127), got {modulus}")]
    InvalidModulus { modulus: u128 },
}

pub type Result<T> = std::result::Result<T, Error>;

pub use crate::matrix::{Comparison, Dot, Matrix, Operand, Transpose};
pub use crate::neural::{
    activations::{Activation, Activations, LeakyReLU},
    Layer, NeuralNet,
};
pub use crate::random::{Generator, LcgParams, SharedGenerator, DEFAULT_SEED};

use crate::prelude::*;
use crate::random::Generator;
use std::fmt;
use std::ops::Index;

pub mod ops;

pub use ops::{Comparison, Dot, Operand, Transpose};

/// A dense, row-major matrix of `f64` with at least one row and one column.
///
/// Matrices are values: every operation returns a new matrix.
#[derive(Debug, PartialEq, Clone)]
pub struct Matrix {
    data: Vec<f64>,
    dim: (usize, usize),
}

fn check_dim(nrows: usize, ncols: usize) -> Result<()> {
    if nrows == 0 || ncols == 0 {
        return Err(Error::EmptyMatrix { nrows, ncols });
    }
    Ok(())
}

impl Matrix {
    /// Builds a matrix from nested arrays; an empty array is rejected.
    pub fn from_array<const R: usize, const C: usize>(arr: [[f64; C]; R]) -> Result<Self> {
        check_dim(R, C)?;
        let data = arr.into_iter().flatten().collect();
        Ok(Self { data, dim: (R, C) })
    }

    pub fn from_vec(vec: Vec<Vec<f64>>) -> Result<Self> {
        let rows = vec.len();
        let cols = vec.first().map(|row| row.len()).unwrap_or(0);
        check_dim(rows, cols)?;

        let mut data = Vec::with_capacity(rows * cols);
        for (i, row) in vec.into_iter().enumerate() {
            if cols != row.len() {
                return Err(Error::RaggedRows {
                    row: i,
                    expected: cols,
                    got: row.len(),
                });
            }
            data.extend(row);
        }

        Ok(Self {
            data,
            dim: (rows, cols),
        })
    }

    /// Broadcasts `value` into an `nrows x ncols` matrix.
    pub fn filled(value: f64, nrows: usize, ncols: usize) -> Result<Self> {
        check_dim(nrows, ncols)?;
        Ok(Self {
            data: vec![value; nrows * ncols],
            dim: (nrows, ncols),
        })
    }

    /// A column vector.
    pub fn column(values: Vec<f64>) -> Result<Self> {
        check_dim(values.len(), 1)?;
        Ok(Self {
            dim: (values.len(), 1),
            data: values,
        })
    }

    /// Draws `nrows * ncols` values from `rng` in row-major order,
    /// each rescaled from `[0, 1)` to `[-1, 1)`.
    pub fn random(nrows: usize, ncols: usize, rng: &mut Generator) -> Result<Self> {
        check_dim(nrows, ncols)?;
        let data = rng.take(nrows * ncols).map(|x| 2.0 * x - 1.0).collect();
        Ok(Self {
            data,
            dim: (nrows, ncols),
        })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    pub fn rows(&self) -> usize {
        self.dim.0
    }

    pub fn cols(&self) -> usize {
        self.dim.1
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols();
        &self.data[start..start + self.cols()]
    }

    /// Elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.data.iter()
    }

    pub fn to_vec(&self) -> Vec<Vec<f64>> {
        self.data
            .chunks(self.cols())
            .map(|row| row.to_vec())
            .collect()
    }

    /// Applies a function to every element, keeping the shape.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Matrix {
        Matrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            dim: self.dim,
        }
    }

    /// Combines two same-shaped matrices element by element.
    pub fn interleave<F: Fn(f64, f64) -> f64>(f: F, lhs: &Matrix, rhs: &Matrix) -> Result<Matrix> {
        Self::interleave_named("interleave", f, lhs, rhs)
    }

    pub(crate) fn interleave_named<F: Fn(f64, f64) -> f64>(
        op: &'static str,
        f: F,
        lhs: &Matrix,
        rhs: &Matrix,
    ) -> Result<Matrix> {
        if lhs.dim != rhs.dim {
            return Err(Error::ShapeMismatch {
                op,
                lhs: lhs.dim,
                rhs: rhs.dim,
            });
        }

        Ok(Matrix {
            data: lhs
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
            dim: lhs.dim,
        })
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i * self.cols() + j]
    }
}

/// Renders the backing grid as nested lists: `[[1.0, 2.0], [3.0, 4.0]]`.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (r, row) in self.data.chunks(self.cols()).enumerate() {
            if r > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (c, x) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{x:?}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

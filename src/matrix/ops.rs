use super::Matrix;
use crate::prelude::*;

/// Right-hand side of a binary matrix operation.
///
/// Scalars broadcast over every element. Matrices combine element by
/// element and must match the left-hand shape exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    Scalar(f64),
    Matrix(&'a Matrix),
}

impl Operand<'_> {
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Scalar(_) => OperandKind::Scalar,
            Operand::Matrix(_) => OperandKind::Matrix,
        }
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl<'a> From<&'a Matrix> for Operand<'a> {
    fn from(value: &'a Matrix) -> Self {
        Operand::Matrix(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl Comparison {
    pub fn holds(self, a: f64, b: f64) -> bool {
        use Comparison::*;
        match self {
            Lt => a < b,
            Le => a <= b,
            Eq => a == b,
            Ne => a != b,
            Gt => a > b,
            Ge => a >= b,
        }
    }
}

pub trait Dot<I> {
    type Output;
    fn dot(self, rhs: I) -> Result<Self::Output>;
}

pub trait Transpose {
    fn transpose(&self) -> Self;
}

impl Transpose for Matrix {
    fn transpose(&self) -> Self {
        let (rows, cols) = self.dim();
        let data = (0..cols)
            .flat_map(|col| (0..rows).map(move |row| (row, col)))
            .map(|idx| self[idx])
            .collect();
        Matrix {
            data,
            dim: (cols, rows),
        }
    }
}

impl<'a> Dot<&Matrix> for &'a Matrix {
    type Output = Matrix;
    fn dot(self, rhs: &Matrix) -> Result<Self::Output> {
        if self.cols() != rhs.rows() {
            return Err(Error::ShapeMismatch {
                op: "dot",
                lhs: self.dim(),
                rhs: rhs.dim(),
            });
        }

        // each entry sums left to right, starting from 0.0
        let data = (0..self.rows())
            .flat_map(|r| (0..rhs.cols()).map(move |c| (r, c)))
            .map(|(r, c)| {
                self.row(r)
                    .iter()
                    .enumerate()
                    .fold(0.0, |sum, (i, x)| sum + x * rhs[(i, c)])
            })
            .collect();

        Ok(Matrix {
            data,
            dim: (self.rows(), rhs.cols()),
        })
    }
}

fn scalar_only(op: &'static str, rhs: Operand<'_>) -> Result<f64> {
    match rhs {
        Operand::Scalar(k) => Ok(k),
        Operand::Matrix(_) => Err(Error::TypeMismatch {
            op,
            expected: OperandKind::Scalar,
            got: OperandKind::Matrix,
        }),
    }
}

impl Matrix {
    /// Scalar operands broadcast, matrix operands need the same shape.
    fn broadcast<F: Fn(f64, f64) -> f64>(
        &self,
        op: &'static str,
        rhs: Operand<'_>,
        f: F,
    ) -> Result<Matrix> {
        match rhs {
            Operand::Scalar(k) => Ok(self.map(|x| f(x, k))),
            Operand::Matrix(m) => Matrix::interleave_named(op, f, self, m),
        }
    }

    /// Adds a scalar to every element, or a same-shaped matrix element-wise.
    pub fn add<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Matrix> {
        self.broadcast("add", rhs.into(), |a, b| a + b)
    }

    /// Subtracts a scalar from every element, or a same-shaped matrix element-wise.
    pub fn sub<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Matrix> {
        self.broadcast("sub", rhs.into(), |a, b| a - b)
    }

    /// Element-wise maximum against a scalar or a same-shaped matrix.
    pub fn maximum<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Matrix> {
        self.broadcast("maximum", rhs.into(), f64::max)
    }

    /// Scales every element. Only scalars are accepted, so `multiply` never
    /// means an element-wise or matrix product; use [`Dot`] for the latter.
    pub fn multiply<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Matrix> {
        let k = scalar_only("multiply", rhs.into())?;
        Ok(self.scale(k))
    }

    pub fn scale(&self, k: f64) -> Matrix {
        self.map(|x| x * k)
    }

    pub fn neg(&self) -> Matrix {
        self.map(|x| -x)
    }

    /// Compares every element against a scalar: 1.0 where `op` holds, 0.0 elsewhere.
    pub fn compare<'a>(&self, rhs: impl Into<Operand<'a>>, op: Comparison) -> Result<Matrix> {
        let k = scalar_only("compare", rhs.into())?;
        Ok(self.compare_scalar(k, op))
    }

    fn compare_scalar(&self, k: f64, op: Comparison) -> Matrix {
        self.map(|x| if op.holds(x, k) { 1.0 } else { 0.0 })
    }

    pub fn lt(&self, k: f64) -> Matrix {
        self.compare_scalar(k, Comparison::Lt)
    }

    pub fn le(&self, k: f64) -> Matrix {
        self.compare_scalar(k, Comparison::Le)
    }

    pub fn eq_scalar(&self, k: f64) -> Matrix {
        self.compare_scalar(k, Comparison::Eq)
    }

    pub fn ne_scalar(&self, k: f64) -> Matrix {
        self.compare_scalar(k, Comparison::Ne)
    }

    pub fn gt(&self, k: f64) -> Matrix {
        self.compare_scalar(k, Comparison::Gt)
    }

    pub fn ge(&self, k: f64) -> Matrix {
        self.compare_scalar(k, Comparison::Ge)
    }
}

#[cfg(test)]
mod tests {
    use crate::matrix::{
        ops::{Comparison, Dot, Operand, Transpose},
        Matrix,
    };
    use crate::prelude::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn m<const R: usize, const C: usize>(arr: [[f64; C]; R]) -> Matrix {
        Matrix::from_array(arr).unwrap()
    }

    #[test]
    fn matrix_transpose() {
        let matrix = m([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).transpose();

        assert_eq!(matrix.to_vec(), [[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]);
        assert_eq!(matrix.dim(), (3, 2));
    }

    #[test]
    fn dot_with_identity() {
        let a = m([[2.0, -1.0], [0.5, 4.0]]);
        let id = m([[1.0, 0.0], [0.0, 1.0]]);

        assert_eq!(a.dot(&id).unwrap(), a);
        assert_eq!(id.dot(&a).unwrap(), a);
    }

    #[test]
    fn dot_row_times_column() {
        let row = m([[1.0, -2.0, 0.5]]);
        let col = Matrix::column(vec![4.0, 1.0, -2.0]).unwrap();

        assert_eq!(row.dot(&col).unwrap().to_vec(), [[1.0]]);
        // outer product
        assert_eq!(
            col.dot(&row).unwrap().to_vec(),
            [[4.0, -8.0, 2.0], [1.0, -2.0, 0.5], [-2.0, 4.0, -1.0]]
        );
    }

    #[test]
    fn matrix_vector_multiplication() {
        let w = m([[1.0, -1.0], [0.5, 2.0], [0.0, 3.0]]);
        let x = Matrix::column(vec![1.0, 2.0]).unwrap();

        let y = w.dot(&x).unwrap();
        assert_eq!(y.to_vec(), [[-1.0], [4.5], [6.0]]);
    }

    #[test]
    fn dot_inner_width_mismatch() {
        let w = m([[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]]);
        let x = Matrix::column(vec![1.0, 1.0]).unwrap();

        assert_eq!(
            w.dot(&x),
            Err(Error::ShapeMismatch {
                op: "dot",
                lhs: (2, 3),
                rhs: (2, 1)
            })
        );
        // transposing fixes the product
        assert_eq!(w.transpose().dot(&x).unwrap().to_vec(), [[3.0], [5.0], [7.0]]);
    }

    #[test]
    fn matrix_addition() {
        let m1 = m([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let m2 = m([[1.0, 2.0], [3.0, 4.0], [2.0, 1.0]]);

        let m3 = m1.add(&m2);
        assert_eq!(m3.unwrap().to_vec(), [[2.0, 4.0], [6.0, 8.0], [7.0, 7.0]]);
    }

    #[test]
    fn matrix_addition_err() {
        // unequal rows
        let m1 = m([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).transpose();
        let m2 = m([[1.0, 2.0], [3.0, 4.0]]);

        assert_eq!(
            m1.add(&m2),
            Err(Error::ShapeMismatch {
                op: "add",
                lhs: (2, 3),
                rhs: (2, 2)
            })
        );

        // unequal cols
        let m2 = m([[1.0, 2.0, 1.0], [3.0, 4.0, 1.0], [1.0, 2.0, 3.0]]);
        assert!(matches!(
            m1.add(&m2),
            Err(Error::ShapeMismatch { op: "add", .. })
        ));
    }

    #[test]
    fn scalar_addition_broadcasts() {
        let m1 = m([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m1.add(0.5).unwrap().to_vec(), [[1.5, 2.5], [3.5, 4.5]]);
        assert_eq!(m1.add(Operand::Scalar(-1.0)).unwrap(), m1.sub(1.0).unwrap());
    }

    #[test]
    fn matrix_subtraction() {
        let m1 = m([[5.0, 5.0], [5.0, 5.0]]);
        let m2 = m([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m1.sub(&m2).unwrap().to_vec(), [[4.0, 3.0], [2.0, 1.0]]);
        assert_eq!(m2.sub(&m2).unwrap(), Matrix::filled(0.0, 2, 2).unwrap());
        assert!(m1.sub(&m([[1.0]])).is_err());
    }

    #[test]
    fn multiply_is_scalar_only() {
        let m1 = m([[1.0, -2.0], [3.0, 0.0]]);
        assert_eq!(m1.multiply(2.0).unwrap().to_vec(), [[2.0, -4.0], [6.0, 0.0]]);
        assert_eq!(m1.multiply(2.0).unwrap(), m1.scale(2.0));
        assert_eq!(
            m1.multiply(&m1),
            Err(Error::TypeMismatch {
                op: "multiply",
                expected: OperandKind::Scalar,
                got: OperandKind::Matrix
            })
        );
    }

    #[test]
    fn negation() {
        let m1 = m([[1.0, -2.0]]);
        assert_eq!(m1.neg().to_vec(), [[-1.0, 2.0]]);
    }

    #[test]
    fn comparisons_yield_indicators() {
        let m1 = m([[-1.0, 0.0, 2.0]]);

        assert_eq!(m1.lt(0.0).to_vec(), [[1.0, 0.0, 0.0]]);
        assert_eq!(m1.le(0.0).to_vec(), [[1.0, 1.0, 0.0]]);
        assert_eq!(m1.eq_scalar(0.0).to_vec(), [[0.0, 1.0, 0.0]]);
        assert_eq!(m1.ne_scalar(0.0).to_vec(), [[1.0, 0.0, 1.0]]);
        assert_eq!(m1.gt(0.0).to_vec(), [[0.0, 0.0, 1.0]]);
        assert_eq!(m1.ge(0.0).to_vec(), [[0.0, 1.0, 1.0]]);

        assert_eq!(m1.compare(0.0, Comparison::Gt).unwrap(), m1.gt(0.0));
        assert_eq!(
            m1.compare(&m1, Comparison::Eq),
            Err(Error::TypeMismatch {
                op: "compare",
                expected: OperandKind::Scalar,
                got: OperandKind::Matrix
            })
        );
    }

    #[test]
    fn maximum_scalar_and_matrix() {
        let m1 = m([[-1.0, 4.0], [2.0, -3.0]]);
        let m2 = m([[0.0, 1.0], [5.0, -4.0]]);

        assert_eq!(m1.maximum(0.0).unwrap().to_vec(), [[0.0, 4.0], [2.0, 0.0]]);
        assert_eq!(m1.maximum(&m2).unwrap().to_vec(), [[0.0, 4.0], [5.0, -3.0]]);
        assert_eq!(
            m1.maximum(&m([[1.0, 2.0]])),
            Err(Error::ShapeMismatch {
                op: "maximum",
                lhs: (2, 2),
                rhs: (1, 2)
            })
        );
    }

    #[test]
    fn operand_kinds() {
        let m1 = m([[1.0]]);
        assert_eq!(Operand::from(2.0).kind(), OperandKind::Scalar);
        assert_eq!(Operand::from(&m1).kind(), OperandKind::Matrix);
    }

    #[test]
    fn error_messages() {
        let err = m([[1.0, 2.0]]).dot(&m([[1.0, 2.0]])).unwrap_err();
        assert_eq!(err.to_string(), "shape mismatch in dot: (1, 2) vs (1, 2)");

        let err = m([[1.0]]).multiply(&m([[1.0]])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch in multiply: expected scalar, got matrix"
        );
    }

    fn shape() -> impl Strategy<Value = (usize, usize)> {
        (1usize..6, 1usize..6)
    }

    fn matrix_of(
        (rows, cols): (usize, usize),
    ) -> impl Strategy<Value = Matrix> {
        prop::collection::vec(
            prop::collection::vec(-100.0f64..100.0, cols),
            rows,
        )
        .prop_map(|rows| Matrix::from_vec(rows).unwrap())
    }

    fn same_shaped_pair() -> impl Strategy<Value = (Matrix, Matrix)> {
        shape().prop_flat_map(|dim| (matrix_of(dim), matrix_of(dim)))
    }

    fn same_shaped_triple() -> impl Strategy<Value = (Matrix, Matrix, Matrix)> {
        shape().prop_flat_map(|dim| (matrix_of(dim), matrix_of(dim), matrix_of(dim)))
    }

    fn assert_close(a: &Matrix, b: &Matrix) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    proptest! {
        #[test]
        fn dot_shape(r in 1usize..6, n in 1usize..6, c in 1usize..6, k in 1usize..6) {
            let a = Matrix::filled(1.0, r, n).unwrap();
            let b = Matrix::filled(1.0, n, c).unwrap();
            prop_assert_eq!(a.dot(&b).unwrap().dim(), (r, c));

            let bad = Matrix::filled(1.0, n + k, c).unwrap();
            let is_shape_mismatch = matches!(a.dot(&bad), Err(Error::ShapeMismatch { .. }));
            prop_assert!(is_shape_mismatch);
        }

        #[test]
        fn add_commutes((a, b) in same_shaped_pair()) {
            prop_assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
        }

        #[test]
        fn add_associates((a, b, c) in same_shaped_triple()) {
            let left = a.add(&b).unwrap().add(&c).unwrap();
            let right = a.add(&b.add(&c).unwrap()).unwrap();
            assert_close(&left, &right);
        }

        #[test]
        fn scalar_add_matches_filled(a in shape().prop_flat_map(matrix_of), k in -10.0f64..10.0) {
            let filled = Matrix::filled(k, a.rows(), a.cols()).unwrap();
            prop_assert_eq!(a.add(k).unwrap(), a.add(&filled).unwrap());
        }

        #[test]
        fn multiply_distributes((a, b) in same_shaped_pair(), k in -10.0f64..10.0) {
            let left = a.add(&b).unwrap().multiply(k).unwrap();
            let right = a.multiply(k).unwrap().add(&b.multiply(k).unwrap()).unwrap();
            assert_close(&left, &right);
        }

        #[test]
        fn maximum_properties((a, b) in same_shaped_pair(), k in -100.0f64..100.0) {
            prop_assert_eq!(a.maximum(&a).unwrap(), a.clone());
            prop_assert_eq!(a.maximum(&b).unwrap(), b.maximum(&a).unwrap());

            let upper = a.maximum(k).unwrap();
            for (&u, &x) in upper.iter().zip(a.iter()) {
                prop_assert!(u >= x && u >= k);
            }
        }

        #[test]
        fn transpose_twice_is_identity(a in shape().prop_flat_map(matrix_of)) {
            prop_assert_eq!(a.transpose().transpose(), a);
        }
    }
}

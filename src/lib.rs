//! Dense matrices and feed-forward networks for inference.
//!
//! ```
//! use dense_nn::prelude::*;
//!
//! let mut rng = Generator::new(73);
//! let net = NeuralNet::new(vec![
//!     Layer::new(2, 3, &mut rng)?.with_activation(LeakyReLU::new(0.1)),
//!     Layer::new(3, 1, &mut rng)?.with_activation(LeakyReLU::new(0.1)),
//! ])?;
//!
//! let out = net.forward(&Matrix::column(vec![1.0, 2.0])?)?;
//! assert_eq!(out.dim(), (1, 1));
//! # Ok::<(), dense_nn::prelude::Error>(())
//! ```

pub mod matrix;
pub mod neural;
pub mod prelude;
pub mod random;

//! Defines the `Error` type for the mmlscore library, along with a few numeric helpers shared by
//! the learners.

use crate::status::RowStatus;

use std::f64::consts::PI;
use std::result;

pub type Result<T> = result::Result<T, MmlError>;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MmlError {

    /// An observed code fell outside the domain `[0, arity)` of its column
    #[error("Row {row} holds code {code}, outside the domain [0, {arity})")]
    InvalidDomain { row: usize, code: usize, arity: usize },

    /// Zero usable rows where the requested operation needs at least one
    #[error("Not enough data has been provided")]
    EmptyInput,

    /// A row status the current component is not designed to interpret
    #[error("Unhandled status at row {row}: {status}")]
    UnhandledStatus { row: usize, status: RowStatus },

    /// A contract operation intentionally not implemented by a learner
    #[error("{learner} does not support {operation}")]
    UnsupportedOperation { learner: String, operation: &'static str },

    /// A categorical domain must contain at least one value
    #[error("Invalid arity ({0}), a domain must have at least one value")]
    InvalidArity(usize),

    /// A configuration value or parameter vector that does not satisfy its constraints
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A row or column index outside its source
    #[error("Selected index {index} is out of range for a source of length {len}")]
    InvalidSelection { index: usize, len: usize },

    /// Columns that should be row-aligned are not
    #[error("Expected {expected} rows, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// A learner was handed a model family it does not estimate
    #[error("{learner} cannot handle a {model} model")]
    ModelMismatch { learner: String, model: &'static str },

}


/// Counts at or below this are summed term by term in `ln_rising_factorial`; larger counts go
/// through `ln_gamma`.
const DIRECT_SUM_LIMIT: usize = 256;


/// Natural log of the Gamma function for `x > 0`.
///
/// The argument is shifted up with the recurrence `Γ(x) = Γ(x + 1) / x` until the Stirling
/// series is accurate, then the series is evaluated with Bernoulli corrections up to `x^-7`.
pub fn ln_gamma(x: f64) -> f64 {
    if x <= 0.0 {
        return f64::INFINITY;
    }

    let mut x = x;
    let mut shift = 0.0;
    while x < 15.0 {
        shift -= x.ln();
        x += 1.0;
    }

    let inv_x = 1.0 / x;
    let inv_x2 = inv_x * inv_x;
    let series = inv_x * (1.0 / 12.0 - inv_x2 * (1.0 / 360.0 - inv_x2 * (1.0 / 1260.0 - inv_x2 / 1680.0)));

    shift + (x - 0.5) * x.ln() - x + 0.5 * (2.0 * PI).ln() + series
}


/// Natural log of the rising factorial `a (a + 1) ... (a + n - 1)`.
///
/// # Args
/// * `a`: the (positive) base of the product
/// * `n`: the number of terms. `n == 0` is the empty product.
pub fn ln_rising_factorial(a: f64, n: usize) -> f64 {
    if n <= DIRECT_SUM_LIMIT {
        (0..n).map(|j| (a + j as f64).ln()).sum()
    } else {
        ln_gamma(a + n as f64) - ln_gamma(a)
    }
}

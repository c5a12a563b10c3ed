//! Defines a `Model`, the family a set of fitted parameters belongs to, together with the
//! sufficient statistics and parameters learners exchange.
//!
//! A learner returns its fit as an `Msy`: the (model, sufficient statistics, parameters) triple.
//! Two families are supported:
//!
//! * `Model::Multinomial`: the marginal distribution of a single discrete variable
//! * `Model::Cpt`: a conditional probability table, one multinomial per joint assignment (a
//!   *context*) of the parent variables

use crate::status::RowStatus;
use crate::util::{MmlError, Result};
use crate::variable::{Column, Table};

use itertools::Itertools;
use ndarray::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum Model {

    /// A distribution over `0..arity`
    Multinomial { arity: usize },

    /// A distribution over `0..arity` for each context of the parents. Contexts are numbered in
    /// mixed radix over `parent_arities`, with the last parent varying fastest.
    Cpt { arity: usize, parent_arities: Vec<usize> }

}

/// Sufficient statistics of a `Model` over some data
#[derive(Clone, Debug, PartialEq)]
pub enum SufficientStats {

    /// Number of occurrences of each value
    Counts(Array1<usize>),

    /// Number of occurrences of each value (columns) in each context (rows)
    Table(Array2<usize>)

}

/// Fitted parameters of a `Model`
#[derive(Clone, Debug, PartialEq)]
pub enum Params {

    /// A probability for each value
    Probabilities(Array1<f64>),

    /// A probability for each value (columns) in each context (rows). Every row sums to 1.
    Table(Array2<f64>)

}

/// The (model, sufficient statistics, parameters) triple produced by a learner
#[derive(Clone, Debug, PartialEq)]
pub struct Msy {

    pub model: Model,

    pub stats: SufficientStats,

    pub params: Params

}


impl Model {

    /// Construct a multinomial `Model` over the domain of `x`
    pub fn multinomial_for(x: &dyn Column) -> Self {
        Model::Multinomial { arity: x.arity() }
    }

    /// Construct a `Model::Cpt` for `x` given the columns of `z` as parents
    pub fn cpt_for(x: &dyn Column, z: &dyn Table) -> Self {
        Model::Cpt {
            arity: x.arity(),
            parent_arities: (0..z.num_columns()).map(|c| z.arity(c)).collect()
        }
    }

    /// The arity of the modelled variable
    pub fn arity(&self) -> usize {
        match *self {
            Model::Multinomial { arity } => arity,
            Model::Cpt { arity, .. } => arity
        }
    }

    /// The number of parent contexts. A `Model::Multinomial` has exactly one.
    pub fn num_contexts(&self) -> usize {
        match *self {
            Model::Multinomial { .. } => 1,
            Model::Cpt { ref parent_arities, .. } => parent_arities.iter().product()
        }
    }

    /// A short name for the family
    pub fn kind(&self) -> &'static str {
        match *self {
            Model::Multinomial { .. } => "multinomial",
            Model::Cpt { .. } => "cpt"
        }
    }

    /// Check that `x` and `z` have the shape this `Model` expects.
    ///
    /// # Errors
    /// * `MmlError::LengthMismatch` if `x` and `z` do not have the same number of rows
    /// * `MmlError::InvalidParameter` if an arity (or the number of parents) disagrees
    pub fn check_shape(&self, x: &dyn Column, z: &dyn Table) -> Result<()> {
        if x.len() != z.num_rows() {
            return Err(MmlError::LengthMismatch { expected: x.len(), found: z.num_rows() });
        }

        if x.arity() != self.arity() {
            return Err(MmlError::InvalidParameter(
                format!("a model of arity {} was given data of arity {}", self.arity(), x.arity())
            ));
        }

        if let Model::Cpt { ref parent_arities, .. } = *self {
            let found: Vec<usize> = (0..z.num_columns()).map(|c| z.arity(c)).collect();
            if found != *parent_arities {
                return Err(MmlError::InvalidParameter(format!(
                    "a model with parents of arity ({}) was given parents of arity ({})",
                    parent_arities.iter().join(", "),
                    found.iter().join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Read the code of `x` at `row`, checking that it may be used for estimation.
    ///
    /// # Errors
    /// * `MmlError::UnhandledStatus` if the row is not `RowStatus::Proper`
    /// * `MmlError::InvalidDomain` if the code is outside `0..self.arity()`
    pub fn observed_code(&self, x: &dyn Column, row: usize) -> Result<usize> {
        let status = x.status(row);
        if status != RowStatus::Proper {
            return Err(MmlError::UnhandledStatus { row, status });
        }

        let code = x.code(row);
        if code >= self.arity() {
            return Err(MmlError::InvalidDomain { row, code, arity: self.arity() });
        }

        Ok(code)
    }

    /// The context index of `row` of the parents `z`.
    ///
    /// # Errors
    /// * `MmlError::InvalidDomain` if a parent code is out of range
    pub fn context(&self, z: &dyn Table, row: usize) -> Result<usize> {
        match *self {
            Model::Multinomial { .. } => Ok(0),
            Model::Cpt { ref parent_arities, .. } => {
                let mut ctx = 0;
                for (col, &arity) in parent_arities.iter().enumerate() {
                    let code = z.code(row, col);
                    if code >= arity {
                        return Err(MmlError::InvalidDomain { row, code, arity });
                    }
                    ctx = ctx * arity + code;
                }
                Ok(ctx)
            }
        }
    }

    /// Compute the sufficient statistics of this `Model` over the data.
    ///
    /// # Args
    /// * `x`: the observations of the modelled variable
    /// * `z`: the observations of the parents, row-aligned with `x`
    ///
    /// # Errors
    /// * any error of `check_shape`, `observed_code` or `context`
    pub fn sufficient(&self, x: &dyn Column, z: &dyn Table) -> Result<SufficientStats> {
        self.check_shape(x, z)?;

        match *self {
            Model::Multinomial { arity } => {
                let mut counts = Array1::zeros(arity);
                for row in 0..x.len() {
                    counts[self.observed_code(x, row)?] += 1;
                }
                Ok(SufficientStats::Counts(counts))
            },
            Model::Cpt { arity, .. } => {
                let mut counts = Array2::zeros((self.num_contexts(), arity));
                for row in 0..x.len() {
                    let code = self.observed_code(x, row)?;
                    counts[[self.context(z, row)?, code]] += 1;
                }
                Ok(SufficientStats::Table(counts))
            }
        }
    }

}


impl SufficientStats {

    /// The total number of observations summarised
    pub fn total(&self) -> usize {
        match *self {
            SufficientStats::Counts(ref counts) => counts.sum(),
            SufficientStats::Table(ref counts) => counts.sum()
        }
    }

}


impl Params {

    /// Check that these parameters have the shape `model` expects
    ///
    /// # Errors
    /// * `MmlError::InvalidParameter` if they do not
    pub fn check_shape(&self, model: &Model) -> Result<()> {
        let ok = match (self, model) {
            (&Params::Probabilities(ref p), &Model::Multinomial { arity }) => p.len() == arity,
            (&Params::Table(ref p), &Model::Cpt { arity, .. }) => p.dim() == (model.num_contexts(), arity),
            _ => false
        };

        if ok {
            Ok(())
        } else {
            Err(MmlError::InvalidParameter(format!("parameters do not fit a {} model of arity {}", model.kind(), model.arity())))
        }
    }

}

//! Defines the `InterventionLearner`, a decorator that lets any `Learner` handle data in which
//! the modelled variable was sometimes intervened upon.
//!
//! A row where the target was set from outside the process tells us nothing about the
//! distribution of the target given its parents, so those rows are removed (from `x` and `z`
//! alike) before the sub-learner sees the data.

use crate::model::{Model, Msy, Params, SufficientStats};
use crate::selector::RowSelector;
use crate::status::RowStatus;
use crate::util::{MmlError, Result};
use crate::variable::{Column, Table};
use super::{unsupported, Learner};

use std::fmt;
use tracing::debug;

/// Find the rows of `x` that must be passed on to a learner.
///
/// # Returns
/// * `None` if every row is `RowStatus::Proper`, meaning the data can be used as is
/// * otherwise, the indices of the proper rows in their original order
///
/// # Errors
/// * `MmlError::UnhandledStatus` for the first row that is neither proper nor an intervention
pub fn filter_rows(x: &dyn Column) -> Result<Option<Vec<usize>>> {
    let mut rows = Vec::with_capacity(x.len());

    for row in 0..x.len() {
        match x.status(row) {
            RowStatus::Proper => rows.push(row),
            RowStatus::Intervention => (),
            status => return Err(MmlError::UnhandledStatus { row, status })
        }
    }

    if rows.len() == x.len() {
        Ok(None)
    } else {
        Ok(Some(rows))
    }
}

/// Wraps a sub-learner, hiding intervened rows of the target from it.
///
/// Only fitting from raw data is filtered. Sufficient statistics have already lost the row
/// statuses, so `s_parameterize` and `s_cost` are unsupported. Costing a model fitted elsewhere
/// (`cost`) is unsupported too; call the sub-learner directly for that.
#[derive(Clone, Debug, PartialEq)]
pub struct InterventionLearner<L> {

    sub: L

}

impl<L: Learner> InterventionLearner<L> {

    /// Wrap `sub`
    pub fn new(sub: L) -> Self {
        InterventionLearner { sub }
    }

    /// The wrapped learner
    pub fn sub(&self) -> &L {
        &self.sub
    }

    /// Run `op` on `x` and `z` with the intervened rows removed.
    fn filtered<T, F>(&self, x: &dyn Column, z: &dyn Table, op: F) -> Result<T>
        where F: FnOnce(&dyn Column, &dyn Table) -> Result<T>
    {
        if x.len() != z.num_rows() {
            return Err(MmlError::LengthMismatch { expected: x.len(), found: z.num_rows() });
        }

        match filter_rows(x)? {
            None => op(x, z),
            Some(rows) => {
                debug!(learner = %self, rows = x.len(), dropped = x.len() - rows.len(), "dropping intervened rows");
                let z = RowSelector::over_table(z, Some(rows.clone()), None)?;
                let x = RowSelector::over_column(x, Some(rows))?;
                op(&x, &z)
            }
        }
    }

}

impl<L: Learner> fmt::Display for InterventionLearner<L> {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "intervention({})", self.sub.name())
    }

}

impl<L: Learner> Learner for InterventionLearner<L> {

    fn name(&self) -> String {
        self.to_string()
    }

    fn parameterize(&self, prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<Msy> {
        self.filtered(x, z, |x, z| self.sub.parameterize(prior, x, z))
    }

    fn s_parameterize(&self, _model: &Model, _stats: &SufficientStats) -> Result<Msy> {
        Err(unsupported(self, "s_parameterize"))
    }

    fn cost(
        &self,
        _model: &Model,
        _prior: Option<&Params>,
        _x: &dyn Column,
        _z: &dyn Table,
        _params: &Params
    ) -> Result<f64> {
        Err(unsupported(self, "cost"))
    }

    fn s_cost(&self, _model: &Model, _stats: &SufficientStats, _params: &Params) -> Result<f64> {
        Err(unsupported(self, "s_cost"))
    }

    /// An `Msy` from this learner was produced by the sub-learner, so it is costed there.
    fn msy_cost(&self, msy: &Msy) -> Result<f64> {
        self.sub.msy_cost(msy)
    }

    fn parameterize_and_cost(&self, prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<f64> {
        self.filtered(x, z, |x, z| self.sub.parameterize_and_cost(prior, x, z))
    }

    fn s_parameterize_and_cost(&self, _model: &Model, _stats: &SufficientStats) -> Result<f64> {
        Err(unsupported(self, "s_parameterize_and_cost"))
    }

}

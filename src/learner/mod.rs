//! Defines a `Learner`, which fits the parameters of a `Model` to data and measures the code
//! length (in nats) of the data under those parameters.
//!
//! The contract mirrors the two ways a search procedure hands data to a learner: as raw rows
//! (`parameterize`, `cost`, `parameterize_and_cost`) or as already aggregated sufficient
//! statistics (`s_parameterize`, `s_cost`, `s_parameterize_and_cost`). Every fit is returned as
//! an `Msy` triple that can be costed later with `msy_cost`.
//!
//! Learners hold only immutable configuration, so a single instance may be shared between
//! threads. Each call is a pure function of its inputs.

use crate::model::{Model, Msy, Params, SufficientStats};
use crate::util::{MmlError, Result};
use crate::variable::{Column, Table};

use std::fmt;

mod bde;
mod config;
mod cpt;
mod intervention;
mod mle;

pub use self::bde::BdeLearner;
pub use self::config::{BdeConfig, LearnerConfig};
pub use self::cpt::BdeCptLearner;
pub use self::intervention::{filter_rows, InterventionLearner};
pub use self::mle::MlLearner;

/// A trait that represents the ability to parameterize and cost a `Model` from data.
///
/// # Args
/// Across all operations:
/// * `prior`: optional prior or context information. Learners that have no use for it ignore it.
/// * `x`: the observations of the variable being modelled
/// * `z`: the observations of its parents, row-aligned with `x`. A learner for a marginal
///   distribution only uses `z` for its row count.
/// * `model`, `stats`, `params`: the components of an `Msy`
pub trait Learner: fmt::Debug + Send + Sync {

    /// A short name identifying the learner and its configuration
    fn name(&self) -> String;

    /// Fit a model to `x` given `z`
    fn parameterize(&self, prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<Msy>;

    /// Fit a model from already computed sufficient statistics
    fn s_parameterize(&self, model: &Model, stats: &SufficientStats) -> Result<Msy>;

    /// The cost of `x` given `z` under `params`, without fitting
    fn cost(
        &self,
        model: &Model,
        _prior: Option<&Params>,
        x: &dyn Column,
        z: &dyn Table,
        params: &Params
    ) -> Result<f64> {
        let stats = model.sufficient(x, z)?;
        self.s_cost(model, &stats, params)
    }

    /// The cost of data summarised by `stats` under `params`
    fn s_cost(&self, model: &Model, stats: &SufficientStats, params: &Params) -> Result<f64>;

    /// The cost of an `Msy` produced by this learner
    fn msy_cost(&self, msy: &Msy) -> Result<f64> {
        self.s_cost(&msy.model, &msy.stats, &msy.params)
    }

    /// Fit and cost in one step
    fn parameterize_and_cost(&self, prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<f64> {
        let msy = self.parameterize(prior, x, z)?;
        self.msy_cost(&msy)
    }

    /// Fit and cost sufficient statistics in one step
    fn s_parameterize_and_cost(&self, model: &Model, stats: &SufficientStats) -> Result<f64> {
        let msy = self.s_parameterize(model, stats)?;
        self.msy_cost(&msy)
    }

}

impl<L: Learner + ?Sized> Learner for Box<L> {

    fn name(&self) -> String {
        (**self).name()
    }

    fn parameterize(&self, prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<Msy> {
        (**self).parameterize(prior, x, z)
    }

    fn s_parameterize(&self, model: &Model, stats: &SufficientStats) -> Result<Msy> {
        (**self).s_parameterize(model, stats)
    }

    fn cost(
        &self,
        model: &Model,
        prior: Option<&Params>,
        x: &dyn Column,
        z: &dyn Table,
        params: &Params
    ) -> Result<f64> {
        (**self).cost(model, prior, x, z, params)
    }

    fn s_cost(&self, model: &Model, stats: &SufficientStats, params: &Params) -> Result<f64> {
        (**self).s_cost(model, stats, params)
    }

    fn msy_cost(&self, msy: &Msy) -> Result<f64> {
        (**self).msy_cost(msy)
    }

    fn parameterize_and_cost(&self, prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<f64> {
        (**self).parameterize_and_cost(prior, x, z)
    }

    fn s_parameterize_and_cost(&self, model: &Model, stats: &SufficientStats) -> Result<f64> {
        (**self).s_parameterize_and_cost(model, stats)
    }

}


/// Build the error for an operation `learner` does not implement
pub(crate) fn unsupported<L: Learner + ?Sized>(learner: &L, operation: &'static str) -> MmlError {
    MmlError::UnsupportedOperation { learner: learner.name(), operation }
}

/// Build the error for a model family `learner` does not estimate
pub(crate) fn mismatch<L: Learner + ?Sized>(learner: &L, model: &Model) -> MmlError {
    MmlError::ModelMismatch { learner: learner.name(), model: model.kind() }
}

/// `-sum(n * ln p)` over the cells with a non-zero count.
///
/// A zero probability on an observed value gives an infinite cost.
pub(crate) fn cross_entropy<'a, I>(cells: I) -> f64
    where I: IntoIterator<Item = (&'a usize, &'a f64)>
{
    cells.into_iter()
         .filter(|&(&n, _)| n > 0)
         .map(|(&n, &p)| -(n as f64) * p.ln())
         .sum()
}

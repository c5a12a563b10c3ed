//! Defines the `BdeCptLearner`, which learns a conditional probability table for a discrete
//! variable given its parents.
//!
//! Rows are partitioned by the joint assignment (context) of the parents and a BDE estimate is
//! made within each context. The equivalent sample size is shared evenly between the contexts,
//! so a table over `C` contexts uses `ESS / C` per context. See Heckerman & Geiger (1995).

use crate::model::{Model, Msy, Params, SufficientStats};
use crate::util::{MmlError, Result};
use crate::variable::{Column, Table};
use super::bde::{check_ess, check_prior, closed_form_cost, posterior_mean, SequentialCost};
use super::{cross_entropy, mismatch, Learner};

use ndarray::prelude::*;
use tracing::{debug, trace};

/// BDE `Learner` for a conditional probability table.
#[derive(Clone, Debug, PartialEq)]
pub struct BdeCptLearner {

    /// Equivalent sample size of the whole table
    ess: f64

}

impl BdeCptLearner {

    /// Construct a `BdeCptLearner`.
    ///
    /// # Errors
    /// * `MmlError::InvalidParameter` unless `ess` is finite and strictly positive
    pub fn new(ess: f64) -> Result<Self> {
        check_ess(ess)?;
        Ok(BdeCptLearner { ess })
    }

    /// The equivalent sample size of the whole table
    pub fn ess(&self) -> f64 {
        self.ess
    }

    /// The equivalent sample size used within each context of `model`
    pub fn leaf_ess(&self, model: &Model) -> f64 {
        self.ess / model.num_contexts() as f64
    }

    fn counts<'s>(&self, model: &Model, stats: &'s SufficientStats) -> Result<ArrayView2<'s, usize>> {
        match (model, stats) {
            (&Model::Cpt { arity, .. }, &SufficientStats::Table(ref counts))
                if counts.dim() == (model.num_contexts(), arity) => Ok(counts.view()),
            (&Model::Cpt { .. }, _) => {
                Err(MmlError::InvalidParameter(String::from("statistics do not fit the conditional probability table")))
            },
            _ => Err(mismatch(self, model))
        }
    }

}

impl Learner for BdeCptLearner {

    fn name(&self) -> String {
        format!("bde_cpt({})", self.ess)
    }

    fn parameterize(&self, _prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<Msy> {
        let model = Model::cpt_for(x, z);
        let stats = model.sufficient(x, z)?;
        debug!(learner = %self.name(), rows = x.len(), contexts = model.num_contexts(), "parameterize");
        self.s_parameterize(&model, &stats)
    }

    fn s_parameterize(&self, model: &Model, stats: &SufficientStats) -> Result<Msy> {
        let counts = self.counts(model, stats)?;
        let leaf_ess = self.leaf_ess(model);
        check_prior(leaf_ess, model.arity())?;

        let mut params = Array2::zeros(counts.dim());
        for (mut p, n) in params.outer_iter_mut().zip(counts.outer_iter()) {
            p.assign(&posterior_mean(leaf_ess, n));
        }

        Ok(Msy {
            model: model.clone(),
            stats: stats.clone(),
            params: Params::Table(params)
        })
    }

    fn s_cost(&self, model: &Model, stats: &SufficientStats, params: &Params) -> Result<f64> {
        let counts = self.counts(model, stats)?;
        params.check_shape(model)?;

        match *params {
            Params::Table(ref p) => Ok(cross_entropy(counts.iter().zip(p.iter()))),
            Params::Probabilities(_) => Err(mismatch(self, model))
        }
    }

    fn msy_cost(&self, msy: &Msy) -> Result<f64> {
        self.s_parameterize_and_cost(&msy.model, &msy.stats)
    }

    fn parameterize_and_cost(&self, _prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<f64> {
        let model = Model::cpt_for(x, z);
        model.check_shape(x, z)?;

        let leaf_ess = self.leaf_ess(&model);
        check_prior(leaf_ess, model.arity())?;
        let mut counts = Array2::zeros((model.num_contexts(), model.arity()));
        let mut sequences: Vec<SequentialCost> = (0..model.num_contexts())
            .map(|_| SequentialCost::new(leaf_ess, model.arity()))
            .collect();

        for row in 0..x.len() {
            let code = model.observed_code(x, row)?;
            let ctx = model.context(z, row)?;
            let charge = sequences[ctx].charge(counts[[ctx, code]]);
            counts[[ctx, code]] += 1;
            trace!(row, ctx, code, charge, "bde cpt charge");
        }

        Ok(sequences.iter().map(|s| s.total()).sum())
    }

    fn s_parameterize_and_cost(&self, model: &Model, stats: &SufficientStats) -> Result<f64> {
        let counts = self.counts(model, stats)?;
        let leaf_ess = self.leaf_ess(model);
        check_prior(leaf_ess, model.arity())?;
        Ok(counts.outer_iter().map(|n| closed_form_cost(leaf_ess, n)).sum())
    }

}

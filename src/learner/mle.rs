//! Defines the `MlLearner`, which uses Maximum Likelihood Estimation to estimate the parameters of
//! a multinomial distribution.

use crate::model::{Model, Msy, Params, SufficientStats};
use crate::util::{MmlError, Result};
use crate::variable::{Column, Table};
use super::{cross_entropy, mismatch, Learner};

use tracing::debug;

/// A Maximum Likelihood `Learner` for the marginal distribution of a single variable.
///
/// The estimate of each parameter is its relative frequency (see K&F Eq. 17.5). The cost of the
/// data is its negative log likelihood under the estimate; no cost is charged for stating the
/// parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MlLearner;

impl MlLearner {

    /// Construct an ML learner
    pub fn new() -> Self {
        MlLearner
    }

}

impl Learner for MlLearner {

    fn name(&self) -> String {
        String::from("ml")
    }

    fn parameterize(&self, _prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<Msy> {
        let model = Model::multinomial_for(x);
        let stats = model.sufficient(x, z)?;
        debug!(learner = %self.name(), rows = x.len(), arity = x.arity(), "parameterize");
        self.s_parameterize(&model, &stats)
    }

    /// # Errors
    /// * `MmlError::EmptyInput` if there are no observations, as the estimate is undefined
    fn s_parameterize(&self, model: &Model, stats: &SufficientStats) -> Result<Msy> {
        let counts = match (model, stats) {
            (&Model::Multinomial { arity }, &SufficientStats::Counts(ref counts)) if counts.len() == arity => counts,
            (&Model::Multinomial { .. }, _) => {
                return Err(MmlError::InvalidParameter(String::from("statistics do not fit a multinomial model")));
            },
            _ => return Err(mismatch(self, model))
        };

        //                  M[x]
        //      theta x =  ------
        //                   M
        let total = counts.sum();
        if total == 0 {
            return Err(MmlError::EmptyInput);
        }

        let params = counts.mapv(|n| n as f64 / total as f64);

        Ok(Msy {
            model: model.clone(),
            stats: stats.clone(),
            params: Params::Probabilities(params)
        })
    }

    fn s_cost(&self, model: &Model, stats: &SufficientStats, params: &Params) -> Result<f64> {
        params.check_shape(model)?;

        match (stats, params) {
            (&SufficientStats::Counts(ref n), &Params::Probabilities(ref p)) if n.len() == p.len() => {
                Ok(cross_entropy(n.iter().zip(p.iter())))
            },
            _ => Err(MmlError::InvalidParameter(String::from("statistics do not fit a multinomial model")))
        }
    }

}

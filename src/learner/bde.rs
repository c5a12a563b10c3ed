//! Defines the `BdeLearner`, a Bayesian-Dirichlet-equivalent learner for the marginal
//! distribution of a discrete variable.
//!
//! The prior is a symmetric Dirichlet whose total weight is the equivalent sample size (ESS):
//! each of the `arity` values starts with `ESS / arity` pseudo-observations. The fitted
//! parameters are the posterior mean
//!
//! ```text
//!     p[k] = (n[k] + ESS / arity) / (N + ESS)
//! ```
//!
//! and the cost of the data is its sequential Bayesian predictive code length: each row is
//! charged `-ln p(x_i | x_0 .. x_{i-1})`. Because only counts enter the charge, the total does not
//! depend on row order and has the closed form
//!
//! ```text
//!     ln[ESS]^(N) - sum_k ln[ESS / arity]^(n[k])
//! ```
//!
//! where `[a]^(n) = a (a + 1) ... (a + n - 1)` is the rising factorial.

use crate::model::{Model, Msy, Params, SufficientStats};
use crate::util::{ln_rising_factorial, MmlError, Result};
use crate::variable::{Column, Table};
use super::{cross_entropy, mismatch, Learner};

use ndarray::prelude::*;
use tracing::{debug, trace};

/// Bayesian-Dirichlet-equivalent `Learner` with a fixed equivalent sample size.
#[derive(Clone, Debug, PartialEq)]
pub struct BdeLearner {

    /// Equivalent sample size, the total weight of the prior
    ess: f64

}

impl BdeLearner {

    /// Construct a `BdeLearner`.
    ///
    /// # Errors
    /// * `MmlError::InvalidParameter` unless `ess` is finite and strictly positive
    pub fn new(ess: f64) -> Result<Self> {
        check_ess(ess)?;
        Ok(BdeLearner { ess })
    }

    /// The equivalent sample size
    pub fn ess(&self) -> f64 {
        self.ess
    }

    fn counts<'s>(&self, model: &Model, stats: &'s SufficientStats) -> Result<ArrayView1<'s, usize>> {
        match (model, stats) {
            (&Model::Multinomial { arity }, &SufficientStats::Counts(ref counts)) if counts.len() == arity => {
                Ok(counts.view())
            },
            (&Model::Multinomial { .. }, _) => {
                Err(MmlError::InvalidParameter(String::from("statistics do not fit a multinomial model")))
            },
            _ => Err(mismatch(self, model))
        }
    }

}

impl Learner for BdeLearner {

    fn name(&self) -> String {
        format!("bde({})", self.ess)
    }

    fn parameterize(&self, _prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<Msy> {
        let model = Model::multinomial_for(x);
        let stats = model.sufficient(x, z)?;
        debug!(learner = %self.name(), rows = x.len(), arity = x.arity(), "parameterize");
        self.s_parameterize(&model, &stats)
    }

    fn s_parameterize(&self, model: &Model, stats: &SufficientStats) -> Result<Msy> {
        let counts = self.counts(model, stats)?;
        check_prior(self.ess, model.arity())?;
        let params = posterior_mean(self.ess, counts);

        Ok(Msy {
            model: model.clone(),
            stats: stats.clone(),
            params: Params::Probabilities(params)
        })
    }

    /// Cross-entropy of the data under the given parameters. No Bayesian updating takes place.
    fn s_cost(&self, model: &Model, stats: &SufficientStats, params: &Params) -> Result<f64> {
        let counts = self.counts(model, stats)?;
        params.check_shape(model)?;

        match *params {
            Params::Probabilities(ref p) => Ok(cross_entropy(counts.iter().zip(p.iter()))),
            Params::Table(_) => Err(mismatch(self, model))
        }
    }

    /// The parameters of an `Msy` from this learner are determined by its statistics, so the
    /// cost is the closed form sequential code length of those statistics.
    fn msy_cost(&self, msy: &Msy) -> Result<f64> {
        self.s_parameterize_and_cost(&msy.model, &msy.stats)
    }

    /// Charge each row in turn, in the order given, against the posterior of the rows before it.
    fn parameterize_and_cost(&self, _prior: Option<&Params>, x: &dyn Column, z: &dyn Table) -> Result<f64> {
        let model = Model::multinomial_for(x);
        model.check_shape(x, z)?;
        check_prior(self.ess, model.arity())?;

        let mut counts = Array1::zeros(model.arity());
        let mut sequence = SequentialCost::new(self.ess, model.arity());
        for row in 0..x.len() {
            let code = model.observed_code(x, row)?;
            let charge = sequence.charge(counts[code]);
            counts[code] += 1;
            trace!(row, code, charge, "bde charge");
        }

        debug!(learner = %self.name(), rows = x.len(), cost = sequence.total(), "parameterize_and_cost");
        Ok(sequence.total())
    }

    fn s_parameterize_and_cost(&self, model: &Model, stats: &SufficientStats) -> Result<f64> {
        let counts = self.counts(model, stats)?;
        check_prior(self.ess, model.arity())?;
        Ok(closed_form_cost(self.ess, counts))
    }

}


pub(crate) fn check_ess(ess: f64) -> Result<()> {
    if ess.is_finite() && ess > 0.0 {
        Ok(())
    } else {
        Err(MmlError::InvalidParameter(format!("ess must be finite and positive, found {}", ess)))
    }
}

/// Check that `ess` still gives each of `arity` values a non-zero share of the prior.
pub(crate) fn check_prior(ess: f64, arity: usize) -> Result<()> {
    if ess / arity as f64 > 0.0 {
        Ok(())
    } else {
        Err(MmlError::InvalidParameter(format!("ess {} is too small to share between {} values", ess, arity)))
    }
}

/// `(n[k] + ess / arity) / (N + ess)` for each `k`. All zero counts give the uniform distribution.
pub(crate) fn posterior_mean(ess: f64, counts: ArrayView1<usize>) -> Array1<f64> {
    let alpha = ess / counts.len() as f64;
    let total = counts.sum() as f64 + ess;
    counts.mapv(|n| (n as f64 + alpha) / total)
}

/// The sequential code length of `counts`, computed in closed form
pub(crate) fn closed_form_cost(ess: f64, counts: ArrayView1<usize>) -> f64 {
    let alpha = ess / counts.len() as f64;
    let cost = ln_rising_factorial(ess, counts.sum())
        - counts.iter().map(|&n| ln_rising_factorial(alpha, n)).sum::<f64>();

    // a single valued domain costs nothing; the two sums above cancel but may leave rounding
    if counts.len() == 1 { 0.0 } else { cost }
}

/// Running state of a sequential code length over one context
pub(crate) struct SequentialCost {

    ess: f64,

    alpha: f64,

    /// Number of rows charged so far
    seen: usize,

    /// Sum of the charges so far, less its rounding error
    sum: f64,

    /// Rounding error lost from `sum` (Neumaier summation)
    compensation: f64

}

impl SequentialCost {

    pub fn new(ess: f64, arity: usize) -> Self {
        SequentialCost { ess, alpha: ess / arity as f64, seen: 0, sum: 0.0, compensation: 0.0 }
    }

    /// The sum of the charges so far
    pub fn total(&self) -> f64 {
        self.sum + self.compensation
    }

    /// Charge a row whose value has been seen `count` times before. Returns the charge.
    pub fn charge(&mut self, count: usize) -> f64 {
        let p = (count as f64 + self.alpha) / (self.seen as f64 + self.ess);
        let charge = -p.ln();
        self.seen += 1;

        let sum = self.sum + charge;
        if self.sum.abs() >= charge.abs() {
            self.compensation += (self.sum - sum) + charge;
        } else {
            self.compensation += (charge - sum) + self.sum;
        }
        self.sum = sum;

        charge
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::variable::{DiscreteColumn, Frame};
    use ndarray::array;

    const ESS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 9.6];

    fn fit(learner: &BdeLearner, arity: usize, codes: &[usize]) -> (Array1<f64>, f64) {
        let x = DiscreteColumn::new(arity, codes.to_vec()).unwrap();
        let z = Frame::empty(codes.len());

        let msy = learner.parameterize(None, &x, &z).unwrap();
        let cost = learner.parameterize_and_cost(None, &x, &z).unwrap();
        match msy.params {
            Params::Probabilities(p) => (p, cost),
            _ => panic!("Wrong parameter type")
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-8
    }

    #[test]
    fn invalid_ess() {
        for &ess in &[0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(BdeLearner::new(ess).is_err(), "ess = {}", ess);
        }
        assert_eq!(2.5, BdeLearner::new(2.5).unwrap().ess());
    }

    #[test]
    /// A single binary observation: p = [(1 + 1) / 3, (0 + 1) / 3], charged -ln(1/2)
    fn binary_single_row() {
        let learner = BdeLearner::new(2.0).unwrap();
        let (p, cost) = fit(&learner, 2, &[0]);

        assert!(close(2.0 / 3.0, p[0]));
        assert!(close(1.0 / 3.0, p[1]));
        assert!(close(-(0.5_f64).ln(), cost));
    }

    #[test]
    /// The ternary dataset [2, 2, 1, 0] with ESS 5
    fn ternary() {
        let learner = BdeLearner::new(5.0).unwrap();
        let (p, cost) = fit(&learner, 3, &[2, 2, 1, 0]);
        let a = 5.0 / 3.0;

        assert!(close((1.0 + a) / 9.0, p[0]));
        assert!(close((1.0 + a) / 9.0, p[1]));
        assert!(close((2.0 + a) / 9.0, p[2]));
        assert!(close(1.0, p.sum()));

        // a (a + 1) * a * a / (5 * 6 * 7 * 8)
        let expected = -(a * (a + 1.0) * a * a / (5.0 * 6.0 * 7.0 * 8.0)).ln();
        assert!(close(expected, cost));
    }

    #[test]
    /// Parameters over several datasets and prior strengths
    fn params_grid() {
        for &ess in ESS.iter() {
            let learner = BdeLearner::new(ess).unwrap();

            let (p, _) = fit(&learner, 2, &[0]);
            assert!(close((ess / 2.0 + 1.0) / (ess + 1.0), p[0]));

            let (p, _) = fit(&learner, 2, &[1, 1]);
            assert!(close((ess / 2.0 + 0.0) / (ess + 2.0), p[0]));

            let (p, _) = fit(&learner, 2, &[0, 0, 1]);
            assert!(close((ess / 2.0 + 2.0) / (ess + 3.0), p[0]));

            let (p, _) = fit(&learner, 3, &[0]);
            assert!(close((ess / 3.0 + 1.0) / (ess + 1.0), p[0]));
            assert!(close((ess / 3.0 + 0.0) / (ess + 1.0), p[1]));

            let (p, _) = fit(&learner, 3, &[2]);
            assert!(close((ess / 3.0 + 0.0) / (ess + 1.0), p[0]));
            assert!(close((ess / 3.0 + 0.0) / (ess + 1.0), p[1]));

            let (p, _) = fit(&learner, 3, &[2, 2, 1, 0]);
            assert!(close((ess / 3.0 + 1.0) / (ess + 4.0), p[0]));
            assert!(close((ess / 3.0 + 1.0) / (ess + 4.0), p[1]));
        }
    }

    #[test]
    /// Costs over several datasets and prior strengths
    fn costs_grid() {
        for &ess in ESS.iter() {
            let learner = BdeLearner::new(ess).unwrap();
            let b = ess / 2.0;
            let t = ess / 3.0;

            assert!(close(-(0.5_f64).ln(), fit(&learner, 2, &[0]).1));
            assert!(close(-(0.5 * (b + 1.0) / (ess + 1.0)).ln(), fit(&learner, 2, &[1, 1]).1));
            assert!(close(
                -(0.5 * (b + 1.0) / (ess + 1.0) * b / (ess + 2.0)).ln(),
                fit(&learner, 2, &[0, 0, 1]).1
            ));

            assert!(close(-(1.0_f64 / 3.0).ln(), fit(&learner, 3, &[0]).1));
            assert!(close(-(1.0_f64 / 3.0).ln(), fit(&learner, 3, &[2]).1));
            assert!(close(
                -(1.0 / 3.0 * (t + 1.0) / (ess + 1.0) * t / (ess + 2.0) * t / (ess + 3.0)).ln(),
                fit(&learner, 3, &[2, 2, 1, 0]).1
            ));
        }
    }

    #[test]
    /// msy_cost of a fit agrees with fitting and costing in one step
    fn msy_cost_matches() {
        for &ess in ESS.iter() {
            let learner = BdeLearner::new(ess).unwrap();
            let x = DiscreteColumn::new(3, vec![2, 2, 1, 0, 0, 2, 1]).unwrap();
            let z = Frame::empty(7);

            let msy = learner.parameterize(None, &x, &z).unwrap();
            let sequential = learner.parameterize_and_cost(None, &x, &z).unwrap();
            assert!((learner.msy_cost(&msy).unwrap() - sequential).abs() < 1e-9);
            assert!((learner.s_parameterize_and_cost(&msy.model, &msy.stats).unwrap() - sequential).abs() < 1e-9);
        }
    }

    #[test]
    /// Many rows: the running sum of charges must not drift from the closed form
    fn sequential_matches_closed_form_many_rows() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(2024);
        let codes: Vec<usize> = (0..200_000).map(|_| rng.gen_range(0..5)).collect();
        let n = codes.len();
        let x = DiscreteColumn::new(5, codes).unwrap();
        let z = Frame::empty(n);

        let learner = BdeLearner::new(0.3).unwrap();
        let sequential = learner.parameterize_and_cost(None, &x, &z).unwrap();
        let msy = learner.parameterize(None, &x, &z).unwrap();
        let closed = learner.msy_cost(&msy).unwrap();
        assert!((sequential - closed).abs() < 1e-9, "sequential {} closed form {}", sequential, closed);
    }

    #[test]
    /// An ess so small that it vanishes when shared between the values is rejected on use
    fn vanishing_prior() {
        let learner = BdeLearner::new(5e-324).unwrap();
        let x = DiscreteColumn::binary(vec![0]).unwrap();
        let z = Frame::empty(1);

        for err in vec![
            learner.parameterize(None, &x, &z).err(),
            learner.parameterize_and_cost(None, &x, &z).err(),
            learner.s_parameterize_and_cost(&Model::Multinomial { arity: 2 }, &SufficientStats::Counts(array![1, 0])).err()
        ] {
            match err {
                Some(MmlError::InvalidParameter(_)) => (),
                other => panic!("expected an invalid parameter, found {:?}", other)
            }
        }
    }

    #[test]
    fn no_rows() {
        let learner = BdeLearner::new(3.0).unwrap();
        let (p, cost) = fit(&learner, 4, &[]);
        assert_eq!(array![0.25, 0.25, 0.25, 0.25], p);
        assert_eq!(0.0, cost);
    }

    #[test]
    fn single_valued_domain() {
        let learner = BdeLearner::new(0.7).unwrap();
        let (p, cost) = fit(&learner, 1, &[0, 0, 0, 0, 0]);
        assert_eq!(array![1.0], p);
        assert_eq!(0.0, cost);

        let stats = SufficientStats::Counts(array![5]);
        assert_eq!(0.0, learner.s_parameterize_and_cost(&Model::Multinomial { arity: 1 }, &stats).unwrap());
    }

    #[test]
    /// Costing against fixed parameters is a plain cross entropy
    fn fixed_params_cost() {
        let learner = BdeLearner::new(2.0).unwrap();
        let x = DiscreteColumn::new(3, vec![0, 1, 1, 2]).unwrap();
        let z = Frame::empty(4);
        let model = Model::Multinomial { arity: 3 };
        let params = Params::Probabilities(array![0.5, 0.25, 0.25]);

        let cost = learner.cost(&model, None, &x, &z, &params).unwrap();
        let expected = -(0.5_f64.ln() + 2.0 * 0.25_f64.ln() + 0.25_f64.ln());
        assert!(close(expected, cost));
    }

    #[test]
    /// The cost of the data under its own posterior mean is not the sequential cost
    fn fixed_params_cost_differs_from_sequential() {
        let learner = BdeLearner::new(2.0).unwrap();
        let x = DiscreteColumn::new(2, vec![0, 0, 1]).unwrap();
        let z = Frame::empty(3);

        let msy = learner.parameterize(None, &x, &z).unwrap();
        let fixed = learner.cost(&msy.model, None, &x, &z, &msy.params).unwrap();
        let sequential = learner.parameterize_and_cost(None, &x, &z).unwrap();
        assert!(fixed < sequential);
    }

    #[test]
    fn wrong_params() {
        let learner = BdeLearner::new(2.0).unwrap();
        let model = Model::Multinomial { arity: 3 };
        let stats = SufficientStats::Counts(array![1, 1, 1]);
        let params = Params::Probabilities(array![0.5, 0.5]);
        assert!(learner.s_cost(&model, &stats, &params).is_err());

        let stats = SufficientStats::Counts(array![1, 1]);
        assert!(learner.s_parameterize(&model, &stats).is_err());
    }

    #[test]
    fn wrong_model() {
        let learner = BdeLearner::new(2.0).unwrap();
        let model = Model::Cpt { arity: 2, parent_arities: vec![2] };
        let stats = SufficientStats::Table(Array2::zeros((2, 2)));

        match learner.s_parameterize(&model, &stats) {
            Err(MmlError::ModelMismatch { model: "cpt", .. }) => (),
            other => panic!("expected a model mismatch, found {:?}", other)
        }
    }

    #[test]
    fn invalid_code() {
        let learner = BdeLearner::new(2.0).unwrap();
        let x = DiscreteColumn::binary(vec![0, 1, 2]).unwrap();
        let z = Frame::empty(3);

        let expected = Some(MmlError::InvalidDomain { row: 2, code: 2, arity: 2 });
        assert_eq!(expected, learner.parameterize(None, &x, &z).err());
        assert_eq!(expected, learner.parameterize_and_cost(None, &x, &z).err());
    }

    #[test]
    /// Rows that are not proper never reach the estimate unnoticed
    fn intervention_not_filtered() {
        use crate::status::RowStatus;

        let learner = BdeLearner::new(2.0).unwrap();
        let x = DiscreteColumn::binary(vec![0, 1]).unwrap().with_status(0, RowStatus::Intervention).unwrap();
        let z = Frame::empty(2);

        let expected = Some(MmlError::UnhandledStatus { row: 0, status: RowStatus::Intervention });
        assert_eq!(expected, learner.parameterize_and_cost(None, &x, &z).err());
    }

    #[test]
    fn sequential_state() {
        let mut seq = SequentialCost::new(2.0, 2);
        assert!(close(-(0.5_f64).ln(), seq.charge(0)));
        assert!(close(-(2.0_f64 / 3.0).ln(), seq.charge(1)));
        assert!(close(-(0.5_f64).ln() - (2.0_f64 / 3.0).ln(), seq.total()));
    }
}

//! Serializable description of a learner stack, so the learner used to score a network can be
//! chosen from a configuration file rather than in code.
//!
//! ```text
//! { "learner": "intervention", "sub": { "learner": "bde_cpt", "ess": 2.0 } }
//! ```

use crate::util::Result;
use super::{BdeCptLearner, BdeLearner, InterventionLearner, Learner, MlLearner};

use serde::{Deserialize, Serialize};

/// Options of the BDE learners
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BdeConfig {

    /// Equivalent sample size (default: 5)
    #[serde(default = "default_ess")]
    pub ess: f64

}

/// A learner, possibly wrapped in decorators
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "learner", rename_all = "snake_case", deny_unknown_fields)]
pub enum LearnerConfig {

    /// `BdeLearner`
    Bde(BdeConfig),

    /// `BdeCptLearner`
    BdeCpt(BdeConfig),

    /// `MlLearner`
    Ml,

    /// `InterventionLearner` around `sub`
    Intervention { sub: Box<LearnerConfig> }

}

fn default_ess() -> f64 {
    5.0
}

impl Default for BdeConfig {

    fn default() -> Self {
        BdeConfig { ess: default_ess() }
    }

}

impl Default for LearnerConfig {

    fn default() -> Self {
        LearnerConfig::Bde(BdeConfig::default())
    }

}

impl LearnerConfig {

    /// Wrap this configuration in an intervention filter
    pub fn with_interventions(self) -> Self {
        LearnerConfig::Intervention { sub: Box::new(self) }
    }

    /// Construct the described learner.
    ///
    /// # Errors
    /// * `MmlError::InvalidParameter` if an option is out of range
    pub fn build(&self) -> Result<Box<dyn Learner>> {
        let learner: Box<dyn Learner> = match *self {
            LearnerConfig::Bde(ref c) => Box::new(BdeLearner::new(c.ess)?),
            LearnerConfig::BdeCpt(ref c) => Box::new(BdeCptLearner::new(c.ess)?),
            LearnerConfig::Ml => Box::new(MlLearner::new()),
            LearnerConfig::Intervention { ref sub } => Box::new(InterventionLearner::new(sub.build()?))
        };

        Ok(learner)
    }

}

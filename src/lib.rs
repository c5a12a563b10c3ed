//! Minimum-message-length scoring of discrete conditional distributions.
//!
//! A `Learner` fits the parameters of a `Model` for one variable given its parents and reports
//! the code length of the data, the score a structure search compares candidate networks by.

pub mod learner;
pub mod model;
pub mod selector;
pub mod status;
pub mod util;
pub mod variable;

pub use learner::{BdeCptLearner, BdeLearner, InterventionLearner, Learner, LearnerConfig, MlLearner};
pub use model::{Model, Msy, Params, SufficientStats};
pub use selector::RowSelector;
pub use status::RowStatus;
pub use util::{MmlError, Result};
pub use variable::{Column, DiscreteColumn, Frame, Table};

//! Definition of the `RowStatus` tag.
//!
//! Every observation of a variable carries a `RowStatus` describing how it must be treated by
//! estimation. Only `Proper` observations are ever counted by an estimator; the other tags exist
//! so that filters (see `InterventionLearner`) can decide what to do with them.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowStatus {

    /// A normally observed value
    Proper,

    /// The value was forced from outside the process being modelled. It is known a priori and
    /// must not contribute to the estimate of the intervened variable's own distribution.
    Intervention,

    /// The value is missing
    Unobserved,

    /// A value is present but is not meaningful in this context
    Irrelevant,

    /// A value is present but out of range
    Invalid,

    /// Not implemented or undefined
    NotApplicable

}

impl RowStatus {

    /// All status tags, in declaration order
    pub const ALL: [RowStatus; 6] = [
        RowStatus::Proper,
        RowStatus::Intervention,
        RowStatus::Unobserved,
        RowStatus::Irrelevant,
        RowStatus::Invalid,
        RowStatus::NotApplicable
    ];

    /// Check if this is a normally observed value
    pub fn is_proper(self) -> bool {
        self == RowStatus::Proper
    }

    /// A short human readable description of the status
    pub fn description(self) -> &'static str {
        match self {
            RowStatus::Proper => "Proper value.",
            RowStatus::Intervention => "Value has been intervened upon.",
            RowStatus::Unobserved => "Unobserved value.",
            RowStatus::Irrelevant => "Value is irrelevant in this context.",
            RowStatus::Invalid => "Value out of range.",
            RowStatus::NotApplicable => "Not implemented or undefined."
        }
    }

}

impl Default for RowStatus {

    fn default() -> Self {
        RowStatus::Proper
    }

}

impl fmt::Display for RowStatus {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }

}

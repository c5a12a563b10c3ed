//! Definition of the variable module
//!
//! The observations of a discrete random variable are held in a `Column`: an ordered sequence of
//! integer codes in `[0, arity)`, each tagged with a `RowStatus`. A `Table` is a row-aligned set
//! of such columns, used to carry the parents of the variable being modelled.
//!
//! Both are traits so that learners can be handed owned data (`DiscreteColumn`, `Frame`) or a
//! view over it (`RowSelector`) interchangeably.

use crate::status::RowStatus;
use crate::util::{MmlError, Result};

/// The observed values of a single discrete variable.
pub trait Column {

    /// The number of rows in the `Column`
    fn len(&self) -> usize;

    /// The size of the domain. Valid codes are `0..arity`
    fn arity(&self) -> usize;

    /// The code observed at `row`.
    ///
    /// # Panics
    /// if `row >= self.len()`
    fn code(&self, row: usize) -> usize;

    /// The status of the observation at `row`.
    ///
    /// # Panics
    /// if `row >= self.len()`
    fn status(&self, row: usize) -> RowStatus;

    /// Check if the `Column` has no rows
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

}

/// A row-aligned collection of discrete `Column`s.
pub trait Table {

    /// The number of rows shared by every column
    fn num_rows(&self) -> usize;

    /// The number of columns
    fn num_columns(&self) -> usize;

    /// The arity of `column`
    fn arity(&self, column: usize) -> usize;

    /// The code at (`row`, `column`)
    fn code(&self, row: usize, column: usize) -> usize;

}


/// An in-memory `Column`.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteColumn {

    /// The size of the domain
    arity: usize,

    /// The raw codes. These are not checked against `arity`; consumers validate what they read.
    codes: Vec<usize>,

    /// Per-row status, `None` when every row is `RowStatus::Proper`
    statuses: Option<Vec<RowStatus>>

}

impl DiscreteColumn {

    /// Construct a `DiscreteColumn` over the domain `0..arity` where every row is proper.
    ///
    /// # Errors
    /// * `MmlError::InvalidArity` if `arity == 0`
    pub fn new(arity: usize, codes: Vec<usize>) -> Result<Self> {
        if arity == 0 {
            return Err(MmlError::InvalidArity(arity));
        }

        Ok(DiscreteColumn { arity, codes, statuses: None })
    }

    /// Construct a two-valued `DiscreteColumn`
    pub fn binary(codes: Vec<usize>) -> Result<Self> {
        DiscreteColumn::new(2, codes)
    }

    /// Replace the status of every row.
    ///
    /// # Errors
    /// * `MmlError::LengthMismatch` if there is not exactly one status per row
    pub fn with_statuses(mut self, statuses: Vec<RowStatus>) -> Result<Self> {
        if statuses.len() != self.codes.len() {
            return Err(MmlError::LengthMismatch { expected: self.codes.len(), found: statuses.len() });
        }

        self.statuses = Some(statuses);
        Ok(self)
    }

    /// Set the status of a single row.
    ///
    /// # Errors
    /// * `MmlError::InvalidSelection` if `row` is not a row of this column
    pub fn with_status(mut self, row: usize, status: RowStatus) -> Result<Self> {
        let len = self.codes.len();
        if row >= len {
            return Err(MmlError::InvalidSelection { index: row, len });
        }

        self.statuses.get_or_insert_with(|| vec![RowStatus::Proper; len])[row] = status;
        Ok(self)
    }

    /// The raw codes of the column
    pub fn codes(&self) -> &[usize] {
        &self.codes
    }

}

impl Column for DiscreteColumn {

    fn len(&self) -> usize {
        self.codes.len()
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn code(&self, row: usize) -> usize {
        self.codes[row]
    }

    fn status(&self, row: usize) -> RowStatus {
        match self.statuses {
            Some(ref statuses) => statuses[row],
            None => {
                assert!(row < self.codes.len(), "row {} out of range", row);
                RowStatus::Proper
            }
        }
    }

}


/// An in-memory `Table`.
///
/// A `Frame` may have no columns at all, in which case it still records a row count. This is
/// how a variable without parents is presented to a learner.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {

    rows: usize,

    columns: Vec<DiscreteColumn>

}

impl Frame {

    /// Construct a `Frame` with `rows` rows and no columns
    pub fn empty(rows: usize) -> Self {
        Frame { rows, columns: Vec::new() }
    }

    /// Construct a `Frame` from row-aligned columns.
    ///
    /// # Errors
    /// * `MmlError::InvalidParameter` if `columns` is empty (use `Frame::empty`)
    /// * `MmlError::LengthMismatch` if the columns do not all have the same length
    pub fn new(columns: Vec<DiscreteColumn>) -> Result<Self> {
        let rows = match columns.first() {
            Some(c) => c.len(),
            None => {
                return Err(MmlError::InvalidParameter(
                    String::from("a Frame needs at least one column, use Frame::empty otherwise")
                ));
            }
        };

        if let Some(c) = columns.iter().find(|c| c.len() != rows) {
            return Err(MmlError::LengthMismatch { expected: rows, found: c.len() });
        }

        Ok(Frame { rows, columns })
    }

    /// Get a column of the `Frame`
    pub fn column(&self, idx: usize) -> Option<&DiscreteColumn> {
        self.columns.get(idx)
    }

}

impl Table for Frame {

    fn num_rows(&self) -> usize {
        self.rows
    }

    fn num_columns(&self) -> usize {
        self.columns.len()
    }

    fn arity(&self, column: usize) -> usize {
        self.columns[column].arity()
    }

    fn code(&self, row: usize, column: usize) -> usize {
        self.columns[column].code(row)
    }

}

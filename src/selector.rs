//! Defines the `RowSelector`, a read-only view exposing a chosen subset of the rows (and, for
//! tables, columns) of a source without copying it.
//!
//! Row lists are used as given: order is kept and duplicates are honoured, so a selector can
//! stand in for a sorted, filtered or resampled copy of the data. Selecting from a selector
//! composes the index lists against the original source, so views never nest more than one
//! level deep.

use crate::status::RowStatus;
use crate::util::{MmlError, Result};
use crate::variable::{Column, Table};

use rand::Rng;

pub struct RowSelector<'a, S: ?Sized> {

    /// The data this view is over
    source: &'a S,

    /// The number of rows in `source`
    source_len: usize,

    /// The visible rows, in terms of `source`. `None` exposes every row in order.
    rows: Option<Vec<usize>>,

    /// The visible columns, in terms of `source`. `None` exposes every column.
    columns: Option<Vec<usize>>

}

impl<'a, S: ?Sized> RowSelector<'a, S> {

    /// The source of the view
    pub fn source(&self) -> &'a S {
        self.source
    }

    /// The selected rows, in terms of the source
    pub fn rows(&self) -> Option<&[usize]> {
        self.rows.as_ref().map(|r| r.as_slice())
    }

    /// The selected columns, in terms of the source
    pub fn columns(&self) -> Option<&[usize]> {
        self.columns.as_ref().map(|c| c.as_slice())
    }

    /// Number of rows visible through the view
    pub fn selected_len(&self) -> usize {
        match self.rows {
            Some(ref rows) => rows.len(),
            None => self.source_len
        }
    }

    /// Select rows of this view. The result is a view over the same source whose row list is the
    /// composition of both selections; columns are carried over unchanged.
    ///
    /// # Args
    /// * `rows`: rows of *this view* to keep, or `None` to keep them all
    ///
    /// # Errors
    /// * `MmlError::InvalidSelection` if any index is `>= self.selected_len()`
    pub fn select(&self, rows: Option<Vec<usize>>) -> Result<Self> {
        let rows = match rows {
            None => self.rows.clone(),
            Some(rows) => {
                check_indices(&rows, self.selected_len())?;
                Some(match self.rows {
                    Some(ref outer) => rows.into_iter().map(|r| outer[r]).collect(),
                    None => rows
                })
            }
        };

        Ok(RowSelector {
            source: self.source,
            source_len: self.source_len,
            rows,
            columns: self.columns.clone()
        })
    }

    fn source_row(&self, row: usize) -> usize {
        match self.rows {
            Some(ref rows) => rows[row],
            None => {
                assert!(row < self.source_len, "row {} out of range", row);
                row
            }
        }
    }

}

impl<'a, S: ?Sized> Clone for RowSelector<'a, S> {

    fn clone(&self) -> Self {
        RowSelector {
            source: self.source,
            source_len: self.source_len,
            rows: self.rows.clone(),
            columns: self.columns.clone()
        }
    }

}


impl<'a, C: Column + ?Sized> RowSelector<'a, C> {

    /// Construct a view over the given rows of a `Column`.
    ///
    /// # Errors
    /// * `MmlError::InvalidSelection` if a row index is out of range
    pub fn over_column(source: &'a C, rows: Option<Vec<usize>>) -> Result<Self> {
        let source_len = source.len();
        if let Some(ref rows) = rows {
            check_indices(rows, source_len)?;
        }

        Ok(RowSelector { source, source_len, rows, columns: None })
    }

    /// Construct a bootstrap resample of a `Column`: as many rows as the source, drawn uniformly
    /// with replacement.
    pub fn bootstrap<R: Rng + ?Sized>(source: &'a C, rng: &mut R) -> Self {
        let source_len = source.len();
        let rows = bootstrap_rows(source_len, source_len, rng);
        RowSelector { source, source_len, rows: Some(rows), columns: None }
    }

}

impl<'a, C: Column + ?Sized> Column for RowSelector<'a, C> {

    fn len(&self) -> usize {
        self.selected_len()
    }

    fn arity(&self) -> usize {
        self.source.arity()
    }

    fn code(&self, row: usize) -> usize {
        self.source.code(self.source_row(row))
    }

    fn status(&self, row: usize) -> RowStatus {
        self.source.status(self.source_row(row))
    }

}


impl<'a, T: Table + ?Sized> RowSelector<'a, T> {

    /// Construct a view over the given rows and columns of a `Table`.
    ///
    /// # Errors
    /// * `MmlError::InvalidSelection` if a row or column index is out of range
    pub fn over_table(source: &'a T, rows: Option<Vec<usize>>, columns: Option<Vec<usize>>) -> Result<Self> {
        let source_len = source.num_rows();
        if let Some(ref rows) = rows {
            check_indices(rows, source_len)?;
        }
        if let Some(ref columns) = columns {
            check_indices(columns, source.num_columns())?;
        }

        Ok(RowSelector { source, source_len, rows, columns })
    }

    fn source_column(&self, column: usize) -> usize {
        match self.columns {
            Some(ref columns) => columns[column],
            None => column
        }
    }

}

impl<'a, T: Table + ?Sized> Table for RowSelector<'a, T> {

    fn num_rows(&self) -> usize {
        self.selected_len()
    }

    fn num_columns(&self) -> usize {
        match self.columns {
            Some(ref columns) => columns.len(),
            None => self.source.num_columns()
        }
    }

    fn arity(&self, column: usize) -> usize {
        self.source.arity(self.source_column(column))
    }

    fn code(&self, row: usize, column: usize) -> usize {
        self.source.code(self.source_row(row), self.source_column(column))
    }

}


/// Draw `n` row indices uniformly, with replacement, from `0..len`.
///
/// Use the same list for a target column and its parents to keep them aligned. An empty source
/// has no rows to draw, so `len == 0` gives an empty list whatever `n` is.
pub fn bootstrap_rows<R: Rng + ?Sized>(len: usize, n: usize, rng: &mut R) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }

    (0..n).map(|_| rng.gen_range(0..len)).collect()
}

fn check_indices(indices: &[usize], len: usize) -> Result<()> {
    match indices.iter().find(|&&i| i >= len) {
        Some(&index) => Err(MmlError::InvalidSelection { index, len }),
        None => Ok(())
    }
}

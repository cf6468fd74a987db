//! Row-level contract with the storage backend.
//!
//! The pipelines never see bytes on disk. A [`GridStore`] resolves grid
//! names to headers and hands out a [`RowReader`] or [`RowWriter`] that
//! moves whole storage rows as [`RowBuffer`]s. Row indices are storage
//! indices: row 0 is whatever the grid's row order stores first.

use crate::error::Result;
use crate::format::Representation;
use crate::header::GridHeader;
use crate::row::RowBuffer;

/// Sequential access to the rows of an existing grid.
pub trait RowReader {
    /// Representation of the stored values.
    fn representation(&self) -> Representation;

    /// Fill `row` with storage row `index`.
    ///
    /// `row` has the stored width and the reader's representation.
    fn read_row(&mut self, index: usize, row: &mut RowBuffer) -> Result<()>;
}

/// Row-by-row output to a newly created grid.
pub trait RowWriter {
    /// Store `row` as storage row `index`.
    fn write_row(&mut self, index: usize, row: &RowBuffer) -> Result<()>;

    /// Persist the value range attribute, in real-world units.
    fn put_actual_range(&mut self, min: f64, max: f64) -> Result<()>;

    /// Flush and close.
    fn finish(self) -> Result<()>;
}

/// A named collection of grids.
pub trait GridStore {
    type Reader<'a>: RowReader
    where
        Self: 'a;
    type Writer<'a>: RowWriter
    where
        Self: 'a;

    /// Header of the stored grid `name`, describing its full extent.
    fn read_info(&self, name: &str) -> Result<GridHeader>;

    /// Open the grid described by `header` for reading.
    fn open_reader(&self, header: &GridHeader) -> Result<Self::Reader<'_>>;

    /// Create (or replace) the grid described by `header`.
    ///
    /// The header already carries the output dimensions, bounds and
    /// sentinel; unwritten rows hold the sentinel.
    fn create_writer(&mut self, header: &GridHeader) -> Result<Self::Writer<'_>>;

    /// Rewrite header metadata of an existing grid without touching its data.
    fn update_info(&mut self, header: &GridHeader) -> Result<()>;
}

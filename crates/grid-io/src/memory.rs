//! In-memory grid store.
//!
//! Keeps every grid as typed rows in storage order. Useful as a scratch
//! store and as the backend of the pipeline tests.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::codec::{GridStore, RowReader, RowWriter};
use crate::error::{GridIoError, Result};
use crate::format::Representation;
use crate::header::GridHeader;
use crate::row::RowBuffer;

/// A grid held by [`MemoryGridStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredGrid {
    pub header: GridHeader,
    /// Rows in storage order.
    pub rows: Vec<RowBuffer>,
    /// Value range persisted by the last writer.
    pub actual_range: Option<(f64, f64)>,
}

impl StoredGrid {
    fn check_row(&self, index: usize, row: &RowBuffer) -> Result<()> {
        if index >= self.rows.len() {
            return Err(GridIoError::codec(format!(
                "row {} out of range for {} ({} rows)",
                index,
                self.header.name,
                self.rows.len()
            )));
        }
        let representation = self.header.format.representation;
        if row.representation() != representation || row.len() != self.header.nx {
            return Err(GridIoError::codec(format!(
                "row of {} {} values does not match {} ({} x {})",
                row.len(),
                row.representation(),
                self.header.name,
                self.header.nx,
                representation
            )));
        }
        Ok(())
    }
}

/// Grids keyed by name.
#[derive(Debug, Default)]
pub struct MemoryGridStore {
    grids: HashMap<String, StoredGrid>,
}

impl MemoryGridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a grid from its header and rows in storage order.
    pub fn insert(&mut self, header: GridHeader, rows: Vec<RowBuffer>) -> Result<()> {
        header.validate()?;
        if rows.len() != header.ny {
            return Err(GridIoError::invalid_header(
                &header.name,
                format!("expected {} rows, got {}", header.ny, rows.len()),
            ));
        }
        let representation = header.format.representation;
        for (index, row) in rows.iter().enumerate() {
            if row.representation() != representation {
                return Err(GridIoError::format_mismatch(
                    &header.name,
                    format!(
                        "row {} is {} but the header says {}",
                        index,
                        row.representation(),
                        representation
                    ),
                ));
            }
            if row.len() != header.nx {
                return Err(GridIoError::invalid_header(
                    &header.name,
                    format!("row {} has {} values, expected {}", index, row.len(), header.nx),
                ));
            }
        }
        self.grids.insert(
            header.name.clone(),
            StoredGrid {
                header,
                rows,
                actual_range: None,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&StoredGrid> {
        self.grids.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.grids.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<StoredGrid> {
        self.grids.remove(name)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    fn lookup(&self, name: &str) -> Result<&StoredGrid> {
        self.grids
            .get(name)
            .ok_or_else(|| GridIoError::NotFound(name.to_string()))
    }
}

pub struct MemoryRowReader<'a> {
    grid: &'a StoredGrid,
}

impl RowReader for MemoryRowReader<'_> {
    fn representation(&self) -> Representation {
        self.grid.header.format.representation
    }

    fn read_row(&mut self, index: usize, row: &mut RowBuffer) -> Result<()> {
        self.grid.check_row(index, row)?;
        row.clone_from(&self.grid.rows[index]);
        Ok(())
    }
}

pub struct MemoryRowWriter<'a> {
    grid: &'a mut StoredGrid,
}

impl RowWriter for MemoryRowWriter<'_> {
    fn write_row(&mut self, index: usize, row: &RowBuffer) -> Result<()> {
        self.grid.check_row(index, row)?;
        self.grid.rows[index].clone_from(row);
        Ok(())
    }

    fn put_actual_range(&mut self, min: f64, max: f64) -> Result<()> {
        self.grid.actual_range = Some((min, max));
        Ok(())
    }

    fn finish(self) -> Result<()> {
        Ok(())
    }
}

impl GridStore for MemoryGridStore {
    type Reader<'a> = MemoryRowReader<'a>;
    type Writer<'a> = MemoryRowWriter<'a>;

    fn read_info(&self, name: &str) -> Result<GridHeader> {
        let grid = self.lookup(name)?;
        let mut header = grid.header.clone();
        if let Some((min, max)) = grid.actual_range {
            header.z_min = min;
            header.z_max = max;
        }
        Ok(header)
    }

    fn open_reader(&self, header: &GridHeader) -> Result<Self::Reader<'_>> {
        let grid = self.lookup(&header.name)?;
        Ok(MemoryRowReader { grid })
    }

    fn create_writer(&mut self, header: &GridHeader) -> Result<Self::Writer<'_>> {
        header.validate()?;
        let representation = header.format.representation;
        let blank = RowBuffer::try_filled(representation, header.nx, header.nan_value)?;
        let grid = StoredGrid {
            header: header.clone(),
            rows: vec![blank; header.ny],
            actual_range: None,
        };

        let grid = match self.grids.entry(header.name.clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(grid);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(grid),
        };
        Ok(MemoryRowWriter { grid })
    }

    fn update_info(&mut self, header: &GridHeader) -> Result<()> {
        let grid = self
            .grids
            .get_mut(&header.name)
            .ok_or_else(|| GridIoError::NotFound(header.name.clone()))?;
        if header.nx != grid.header.nx || header.ny != grid.header.ny {
            return Err(GridIoError::invalid_header(
                &header.name,
                format!(
                    "cannot resize stored grid from {}x{} to {}x{}",
                    grid.header.nx, grid.header.ny, header.nx, header.ny
                ),
            ));
        }
        if header.format != grid.header.format {
            return Err(GridIoError::format_mismatch(
                &header.name,
                format!("stored as {}, header says {}", grid.header.format, header.format),
            ));
        }
        grid.header = header.clone();
        Ok(())
    }
}

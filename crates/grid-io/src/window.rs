//! Window resolution: geographic subregion to physical rows and columns.
//!
//! [`resolve_window`] turns a requested region into the physical row range,
//! the logical output size, and an index map giving, for every logical
//! column, the stored column to sample. Longitude wrap-around on geographic
//! grids is handled here so the row pipelines only ever see plain indices.

use tracing::debug;

use crate::error::{GridIoError, GridWarning, Result};
use crate::header::{GridHeader, Region};
use crate::row::try_alloc;

/// Fraction of a cell tolerated when converting bounds to row/column indices.
const INDEX_SLACK: f64 = 0.1;

/// Fraction of a cell below which a bound counts as already on the grid.
const SNAP_SLACK: f64 = 1.0e-4;

/// Physical extent and column mapping of one read or write call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWindow {
    /// Logical columns.
    pub width: usize,
    /// Logical rows.
    pub height: usize,
    /// First stored column covered; negative or past `nx` only when wrapping.
    pub first_col: i64,
    pub last_col: i64,
    /// First stored row from the top of the grid.
    pub first_row: usize,
    pub last_row: usize,
    /// Stored column sampled by each logical column.
    pub index_map: Vec<usize>,
    /// The region after snapping and clamping.
    pub region: Region,
    pub warnings: Vec<GridWarning>,
}

impl ResolvedWindow {
    /// True if columns are taken in a run without wrapping.
    pub fn is_contiguous(&self) -> bool {
        self.index_map.windows(2).all(|pair| pair[1] == pair[0] + 1)
    }
}

/// Resolve `region` against `header`.
///
/// An all-zero region selects the whole grid. Otherwise the region is
/// normalized across the dateline, clamped to the grid's extent (non-global
/// grids only), and snapped onto the grid lines. The caller's `region` is
/// overwritten with the result.
pub fn resolve_window(header: &GridHeader, region: &mut Region) -> Result<ResolvedWindow> {
    header.validate()?;

    let mut warnings = Vec::new();
    let g = header.registration.extra_node();

    let (width, height, first_col, last_col, first_row, last_row) = if region.is_entire() {
        *region = header.region();
        (
            header.nx as i64,
            header.ny as i64,
            0,
            header.nx as i64 - 1,
            0,
            header.ny as i64 - 1,
        )
    } else {
        adjust_loose_region(header, region, &mut warnings)?;

        let width = ((region.east - region.west) / header.x_inc).round() as i64 + g;
        let height = ((region.north - region.south) / header.y_inc).round() as i64 + g;

        let first_col = ((region.west - header.x_min) / header.x_inc + INDEX_SLACK).floor() as i64;
        let mut last_col =
            ((region.east - header.x_min) / header.x_inc - INDEX_SLACK).ceil() as i64 - 1 + g;
        let first_row = ((header.y_max - region.north) / header.y_inc + INDEX_SLACK).floor() as i64;
        let mut last_row =
            ((header.y_max - region.south) / header.y_inc - INDEX_SLACK).ceil() as i64 - 1 + g;

        if last_col - first_col + 1 > width {
            last_col -= 1;
        }
        if last_row - first_row + 1 > height {
            last_row -= 1;
        }
        (width, height, first_col, last_col, first_row, last_row)
    };

    if width <= 0 || height <= 0 {
        return Err(GridIoError::invalid_geometry(
            &header.name,
            format!("subset has non-positive size {}x{}", width, height),
        ));
    }
    if first_row < 0 || last_row >= header.ny as i64 || last_row - first_row + 1 != height {
        return Err(GridIoError::invalid_geometry(
            &header.name,
            format!(
                "rows {}..={} do not fit a grid of {} rows",
                first_row, last_row, header.ny
            ),
        ));
    }

    let (width, height) = (width as usize, height as usize);
    let index_map = build_index_map(header, region, width, first_col)?;

    debug!(
        name = %header.name,
        width,
        height,
        first_col,
        last_col,
        first_row,
        last_row,
        "resolved grid window"
    );

    Ok(ResolvedWindow {
        width,
        height,
        first_col,
        last_col,
        first_row: first_row as usize,
        last_row: last_row as usize,
        index_map,
        region: *region,
        warnings,
    })
}

/// Bring a loosely specified region onto the grid.
fn adjust_loose_region(
    header: &GridHeader,
    region: &mut Region,
    warnings: &mut Vec<GridWarning>,
) -> Result<()> {
    if header.geographic && region.east < region.west {
        region.east += 360.0;
    }

    let y_slack = SNAP_SLACK * header.y_inc;
    if region.south < header.y_min - y_slack || region.north > header.y_max + y_slack {
        return Err(GridIoError::invalid_geometry(
            &header.name,
            format!(
                "requested latitudes {}/{} fall outside {}/{}",
                region.south, region.north, header.y_min, header.y_max
            ),
        ));
    }
    region.south = region.south.max(header.y_min);
    region.north = region.north.min(header.y_max);

    if !header.is_global() {
        if header.geographic {
            if region.east < header.x_min {
                region.west += 360.0;
                region.east += 360.0;
            } else if region.west > header.x_max {
                region.west -= 360.0;
                region.east -= 360.0;
            }
        }

        let mut clamped = false;
        if region.west < header.x_min {
            region.west = header.x_min;
            clamped = true;
        }
        if region.east > header.x_max {
            region.east = header.x_max;
            clamped = true;
        }
        if clamped {
            warnings.push(GridWarning::SubsetClamped {
                name: header.name.clone(),
            });
        }
    }

    let mut snapped = false;
    for (bound, origin, inc) in [
        (&mut region.west, header.x_min, header.x_inc),
        (&mut region.east, header.x_min, header.x_inc),
        (&mut region.south, header.y_min, header.y_inc),
        (&mut region.north, header.y_min, header.y_inc),
    ] {
        let on_grid = origin + ((*bound - origin) / inc).round() * inc;
        if (*bound - on_grid).abs() > SNAP_SLACK * inc {
            snapped = true;
        }
        *bound = on_grid;
    }
    if snapped {
        warnings.push(GridWarning::SubsetSnapped {
            name: header.name.clone(),
        });
    }

    Ok(())
}

fn build_index_map(
    header: &GridHeader,
    region: &Region,
    width: usize,
    first_col: i64,
) -> Result<Vec<usize>> {
    let mut index_map = try_alloc::<usize>(width, "column index map")?;
    let half = header.registration.half_cell();
    let small = INDEX_SLACK * header.x_inc;

    for i in 0..width {
        let col = if header.geographic {
            let mut x = col_to_x(i, region.west, region.east, header.x_inc, half, width);
            if header.x_min - x > small {
                x += 360.0;
            } else if x - header.x_max > small {
                x -= 360.0;
            }
            x_to_col(x, header.x_min, header.x_inc, half)
        } else {
            first_col + i as i64
        };

        if col < 0 || col >= header.nx as i64 {
            return Err(GridIoError::invalid_geometry(
                &header.name,
                format!("column {} maps outside the {} stored columns", col, header.nx),
            ));
        }
        index_map.push(col as usize);
    }
    Ok(index_map)
}

/// Node x coordinate of logical column `i`; the last column is pinned to `east`.
fn col_to_x(i: usize, west: f64, east: f64, inc: f64, half: f64, width: usize) -> f64 {
    if i + 1 == width {
        east - half * inc
    } else {
        west + (i as f64 + half) * inc
    }
}

fn x_to_col(x: f64, x_min: f64, inc: f64, half: f64) -> i64 {
    ((x - x_min) / inc - half).round() as i64
}

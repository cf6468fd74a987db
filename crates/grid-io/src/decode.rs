//! Row decode pipeline: stored rows into the caller's logical grid.

use tracing::debug;

use crate::codec::{GridStore, RowReader};
use crate::error::{GridIoError, GridWarning, IoReport, Result};
use crate::format::FormatFamily;
use crate::header::{GridHeader, Region, RowOrder};
use crate::layout::{LogicalLayout, Padding};
use crate::policy::{MissingValuePolicy, RangeAccumulator};
use crate::row::RowBuffer;
use crate::window::resolve_window;

/// Name denoting standard input/output.
pub(crate) const PIPE_NAME: &str = "=";

pub(crate) fn check_target(header: &GridHeader) -> Result<()> {
    if header.name == PIPE_NAME {
        return Err(GridIoError::UnsupportedTarget(header.name.clone()));
    }
    if header.format.family != FormatFamily::Coards {
        return Err(GridIoError::format_mismatch(
            &header.name,
            format!("format {} is not handled by the row pipeline", header.format),
        ));
    }
    Ok(())
}

/// Read `region` of a stored grid into `grid`.
///
/// `header` must describe the stored grid, as returned by
/// [`read_grid_info`](crate::info::read_grid_info). On success it describes
/// the materialized window: `nx`/`ny` are the unpadded logical size, the
/// bounds are the resolved region and `z_min`/`z_max` the real-world range
/// of the valid cells read. Logical row 0 is always the northernmost row.
///
/// Padding cells and, in complex mode, imaginary slots are left untouched.
pub fn read_grid<S: GridStore>(
    store: &S,
    header: &mut GridHeader,
    grid: &mut [f32],
    region: &mut Region,
    padding: Padding,
    complex: bool,
) -> Result<IoReport> {
    check_target(header)?;

    let mut report = IoReport::default();
    let window = resolve_window(header, region)?;
    let layout = LogicalLayout::new(window.width, window.height, padding, complex);
    layout.check(grid.len())?;

    let mut reader = store.open_reader(header)?;
    let representation = reader.representation();
    if representation != header.format.representation {
        return Err(GridIoError::format_mismatch(
            &header.name,
            format!(
                "grid is stored as {} but the header expects {}",
                representation, header.format.representation
            ),
        ));
    }

    debug!(
        name = %header.name,
        rows = window.height,
        cols = window.width,
        representation = %representation,
        "reading grid rows"
    );

    let policy = MissingValuePolicy::from_header(header);
    let scaled = header.is_scaled();
    let (scale, offset) = (header.z_scale_factor, header.z_add_offset);
    let mut range = RangeAccumulator::default();
    let mut row = RowBuffer::try_new(representation, header.nx)?;

    // Storage rows are visited in ascending order; for bottom-up storage the
    // window's rows are complemented first.
    let ny = header.ny;
    let (first, last) = match header.row_order {
        RowOrder::TopDown => (window.first_row, window.last_row),
        RowOrder::BottomUp => (ny - 1 - window.last_row, ny - 1 - window.first_row),
    };

    for storage_row in first..=last {
        reader.read_row(storage_row, &mut row)?;
        let logical_row = header.row_order.storage_row(storage_row, ny) - window.first_row;

        for (i, &col) in window.index_map.iter().enumerate() {
            let raw = row.get(col);
            let value = if policy.is_missing(raw) {
                f64::NAN
            } else {
                range.update(raw);
                if scaled {
                    raw * scale + offset
                } else {
                    raw
                }
            };
            grid[layout.index(logical_row, i)] = value as f32;
        }
    }
    drop(reader);

    header.nx = window.width;
    header.ny = window.height;
    header.set_region(&window.region);
    report.extend(window.warnings);

    match range.to_real(scale, offset) {
        Some((min, max)) => {
            header.z_min = min;
            header.z_max = max;
        }
        None => {
            header.z_min = f64::NAN;
            header.z_max = f64::NAN;
            report.push(GridWarning::EmptyValidRange {
                name: header.name.clone(),
            });
        }
    }
    report.valid_cells = range.count();

    debug!(
        name = %header.name,
        valid_cells = report.valid_cells,
        z_min = header.z_min,
        z_max = header.z_max,
        "finished reading grid"
    );
    report.emit();
    Ok(report)
}

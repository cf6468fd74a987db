//! Row encode pipeline: the caller's logical grid into stored rows.

use tracing::debug;

use crate::codec::{GridStore, RowWriter};
use crate::decode::check_target;
use crate::error::{GridIoError, GridWarning, IoReport, Result};
use crate::format::Representation;
use crate::header::{GridHeader, Region};
use crate::layout::{LogicalLayout, Padding};
use crate::policy::{MissingValuePolicy, RangeAccumulator};
use crate::row::RowBuffer;
use crate::window::resolve_window;

/// Conversion of real-world values to one stored representation.
#[derive(Debug, Clone, Copy)]
pub struct Quantizer {
    representation: Representation,
    sentinel: f64,
    scale: f64,
    offset: f64,
    scaled: bool,
    /// Exclusive bounds for integer output, inclusive magnitude for floats.
    lo: f64,
    hi: f64,
}

/// Result of quantizing one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantized {
    /// A valid stored value.
    Value(f64),
    /// The input was NaN.
    Missing(f64),
    /// The input did not fit the representation.
    OutOfRange(f64),
}

impl Quantizer {
    pub fn new(header: &GridHeader, policy: &MissingValuePolicy) -> Self {
        let representation = header.format.representation;
        // Both floating representations are limited to the 32-bit float range.
        let (lo, hi) = if representation.is_integral() {
            let (min, max) = representation.bounds();
            (min - 0.5, max + 0.5)
        } else {
            (-(f32::MAX as f64), f32::MAX as f64)
        };
        Self {
            representation,
            sentinel: policy.fill_value(),
            scale: header.z_scale_factor,
            offset: header.z_add_offset,
            scaled: header.is_scaled(),
            lo,
            hi,
        }
    }

    /// Stored code for real-world `value`.
    ///
    /// Integer output is rounded half to even; values at or beyond half a
    /// unit past the type's range become the sentinel.
    #[inline]
    pub fn quantize(&self, value: f64) -> Quantized {
        if value.is_nan() {
            return Quantized::Missing(self.sentinel);
        }
        let stored = if self.scaled {
            (value - self.offset) / self.scale
        } else {
            value
        };

        if self.representation.is_integral() {
            if stored <= self.lo || stored >= self.hi {
                Quantized::OutOfRange(self.sentinel)
            } else {
                Quantized::Value(stored.round_ties_even())
            }
        } else if stored.abs() > self.hi {
            Quantized::OutOfRange(self.sentinel)
        } else if self.representation == Representation::Float {
            Quantized::Value(stored as f32 as f64)
        } else {
            Quantized::Value(stored)
        }
    }
}

/// Write `region` of the logical grid `grid` as a new stored grid.
///
/// `header` describes the logical grid on entry: `nx`/`ny` and the bounds
/// give the size and extent of `grid` without padding, and its format,
/// scaling, sentinel and row order select the output encoding. Before the
/// first row is written the header is narrowed to the resolved window; on
/// success `z_min`/`z_max` hold the real-world range of the written values.
pub fn write_grid<S: GridStore>(
    store: &mut S,
    header: &mut GridHeader,
    grid: &[f32],
    region: &mut Region,
    padding: Padding,
    complex: bool,
) -> Result<IoReport> {
    check_target(header)?;

    let mut report = IoReport::default();
    let window = resolve_window(header, region)?;
    let layout = LogicalLayout::new(header.nx, header.ny, padding, complex);
    layout.check(grid.len())?;

    let representation = header.format.representation;
    let policy = MissingValuePolicy::for_encoding(header, representation);
    let sentinel = policy.fill_value();
    let sentinel_fits = if representation.is_integral() {
        let (min, max) = representation.bounds();
        sentinel.fract() == 0.0 && sentinel >= min && sentinel <= max
    } else {
        sentinel.is_nan() || sentinel.abs() <= f32::MAX as f64
    };
    if !sentinel_fits {
        return Err(GridIoError::invalid_header(
            &header.name,
            format!("no-data value {} does not fit {}", sentinel, representation),
        ));
    }

    header.nx = window.width;
    header.ny = window.height;
    header.set_region(&window.region);
    // Stored at the precision it is read back with.
    header.nan_value = if representation == Representation::Float {
        sentinel as f32 as f64
    } else {
        sentinel
    };
    report.extend(window.warnings.iter().cloned());

    let policy = MissingValuePolicy::from_header(header);
    let quantizer = Quantizer::new(header, &policy);
    let mut row = RowBuffer::try_new(representation, window.width)?;
    let mut range = RangeAccumulator::default();
    let mut out_of_range = 0usize;

    debug!(
        name = %header.name,
        rows = window.height,
        cols = window.width,
        representation = %representation,
        "writing grid rows"
    );

    let mut writer = store.create_writer(header)?;
    for logical_row in (window.first_row..=window.last_row).rev() {
        for (i, &col) in window.index_map.iter().enumerate() {
            let value = grid[layout.index(logical_row, col)] as f64;
            let stored = match quantizer.quantize(value) {
                Quantized::Value(v) => {
                    range.update(v);
                    v
                }
                Quantized::Missing(v) => v,
                Quantized::OutOfRange(v) => {
                    out_of_range += 1;
                    v
                }
            };
            row.set(i, stored)?;
        }
        let storage_row = header
            .row_order
            .storage_row(logical_row - window.first_row, window.height);
        writer.write_row(storage_row, &row)?;
    }

    if out_of_range > 0 {
        report.push(GridWarning::OutOfRange {
            name: header.name.clone(),
            count: out_of_range,
        });
    }

    match range.to_real(header.z_scale_factor, header.z_add_offset) {
        Some((min, max)) => {
            writer.put_actual_range(min, max)?;
            header.z_min = min;
            header.z_max = max;
        }
        None => {
            writer.put_actual_range(0.0, 0.0)?;
            header.z_min = f64::NAN;
            header.z_max = f64::NAN;
            report.push(GridWarning::EmptyValidRange {
                name: header.name.clone(),
            });
        }
    }
    writer.finish()?;
    report.valid_cells = range.count();

    debug!(
        name = %header.name,
        valid_cells = report.valid_cells,
        out_of_range,
        "finished writing grid"
    );
    report.emit();
    Ok(report)
}

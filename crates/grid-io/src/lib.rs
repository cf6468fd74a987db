//! Subregion I/O for geophysical grids
//!
//! This crate reads and writes two-dimensional grids through a row-level
//! storage contract while presenting callers with a simple logical view: a
//! row-major `f32` buffer restricted to a geographic window, optionally
//! surrounded by padding and interleaved for complex data.
//!
//! - **Windows**: arbitrary subregions snapped to the grid, with longitude
//!   wrap-around on global geographic grids
//! - **Row order**: top-down and bottom-up storage read back identically
//! - **Quantization**: byte/short/int/float/double output with scale,
//!   offset, rounding and out-of-range clamping
//!
//! # Architecture
//!
//! ```text
//! header + region + padding + buffer
//!      │
//!      ▼
//! resolve_window() ──► rows, columns, index map
//!      │
//!      ├─► read_grid():  RowReader::read_row ─► remap ─► NaN substitution ─► buffer
//!      │
//!      └─► write_grid(): buffer ─► quantize ─► RowWriter::write_row
//!               │
//!               ▼
//!      header updated in place (size, bounds, z range)
//! ```
//!
//! # Example
//!
//! ```
//! use grid_io::{
//!     read_grid, read_grid_info, write_grid, GridHeader, MemoryGridStore, Padding, Region,
//!     Registration,
//! };
//!
//! let mut store = MemoryGridStore::new();
//! let mut header = GridHeader::new(
//!     "depth.nc",
//!     Region::new(0.0, 4.0, 0.0, 2.0),
//!     1.0,
//!     1.0,
//!     Registration::Pixel,
//! )?;
//! let values: Vec<f32> = (0..8).map(|v| v as f32).collect();
//! write_grid(&mut store, &mut header, &values, &mut Region::entire(), Padding::default(), false)?;
//!
//! let mut header = read_grid_info(&store, "depth.nc")?;
//! let mut region = Region::new(1.0, 3.0, 0.0, 2.0);
//! let mut out = vec![0.0_f32; 4];
//! read_grid(&store, &mut header, &mut out, &mut region, Padding::default(), false)?;
//! assert_eq!(out, vec![1.0, 2.0, 5.0, 6.0]);
//! # Ok::<(), grid_io::GridIoError>(())
//! ```

pub mod codec;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod header;
pub mod info;
pub mod layout;
pub mod memory;
pub mod policy;
pub mod row;
pub mod steps;
pub mod units;
pub mod window;

// Re-export commonly used types at crate root
pub use codec::{GridStore, RowReader, RowWriter};
pub use decode::read_grid;
pub use encode::{write_grid, Quantized, Quantizer};
pub use error::{GridIoError, GridWarning, IoReport, Result};
pub use format::{FormatFamily, FormatParseError, GridFormat, Representation};
pub use header::{GridHeader, Region, Registration, RowOrder};
pub use info::{read_grid_info, update_grid_info};
pub use layout::{LogicalLayout, Padding};
pub use memory::{MemoryGridStore, StoredGrid};
pub use policy::{MissingValuePolicy, RangeAccumulator};
pub use row::RowBuffer;
pub use steps::check_step;
pub use units::NameUnits;
pub use window::{resolve_window, ResolvedWindow};

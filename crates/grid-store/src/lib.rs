//! Zarr storage backend for grid-io.
//!
//! [`ZarrGridStore`] implements [`grid_io::GridStore`] over a directory of
//! Zarr V3 arrays, one array per grid, with COARDS-style attributes carrying
//! the header. Rows are read and written whole, so row-chunked arrays keep
//! each row access to a single chunk.
//!
//! # Example
//!
//! ```no_run
//! use grid_io::{read_grid, read_grid_info, Padding, Region};
//! use grid_store::{ZarrGridStore, ZarrStoreConfig};
//!
//! let store = ZarrGridStore::open("/data/grids", ZarrStoreConfig::from_env())?;
//! let mut header = read_grid_info(&store, "etopo")?;
//! let mut region = Region::new(-100.0, -80.0, 18.0, 31.0);
//! let mut sizing = region;
//! let window = grid_io::resolve_window(&header, &mut sizing)?;
//! let mut grid = vec![0.0_f32; window.width * window.height];
//! read_grid(&store, &mut header, &mut grid, &mut region, Padding::default(), false)?;
//! # Ok::<(), grid_io::GridIoError>(())
//! ```

pub mod attrs;
pub mod config;
pub mod store;

pub use config::{ZarrCompression, ZarrStoreConfig};
pub use store::{ZarrGridStore, ZarrRowReader, ZarrRowWriter};

//! Header-only operations.

use tracing::debug;

use crate::codec::GridStore;
use crate::decode::PIPE_NAME;
use crate::error::{GridIoError, Result};
use crate::header::GridHeader;

/// Read the header of the stored grid `name`.
///
/// The returned header describes the full stored extent and is the usual
/// starting point for [`read_grid`](crate::decode::read_grid).
pub fn read_grid_info<S: GridStore>(store: &S, name: &str) -> Result<GridHeader> {
    if name == PIPE_NAME {
        return Err(GridIoError::UnsupportedTarget(name.to_string()));
    }
    let header = store.read_info(name)?;
    header.validate()?;
    debug!(
        name = %header.name,
        nx = header.nx,
        ny = header.ny,
        format = %header.format,
        "read grid header"
    );
    Ok(header)
}

/// Rewrite the metadata of an existing grid without touching its values.
pub fn update_grid_info<S: GridStore>(store: &mut S, header: &GridHeader) -> Result<()> {
    if header.name == PIPE_NAME {
        return Err(GridIoError::UnsupportedTarget(header.name.clone()));
    }
    header.validate()?;
    store.update_info(header)?;
    debug!(name = %header.name, "updated grid header");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{Region, Registration};
    use crate::memory::MemoryGridStore;
    use crate::row::RowBuffer;

    #[test]
    fn test_read_and_update_info() {
        let mut store = MemoryGridStore::new();
        let header = GridHeader::new(
            "info.nc",
            Region::new(-10.0, 10.0, -5.0, 5.0),
            5.0,
            5.0,
            Registration::GridLine,
        )
        .unwrap();
        store
            .insert(header, vec![RowBuffer::Float(vec![0.0; 5]); 3])
            .unwrap();

        let mut info = read_grid_info(&store, "info.nc").unwrap();
        assert_eq!((info.nx, info.ny), (5, 3));
        assert_eq!(info.region(), Region::new(-10.0, 10.0, -5.0, 5.0));

        info.z_units = "Depth [m]".to_string();
        update_grid_info(&mut store, &info).unwrap();
        assert_eq!(read_grid_info(&store, "info.nc").unwrap().z_units, "Depth [m]");
    }

    #[test]
    fn test_pipe_has_no_header() {
        let mut store = MemoryGridStore::new();
        assert!(matches!(
            read_grid_info(&store, "="),
            Err(GridIoError::UnsupportedTarget(_))
        ));
        let header = GridHeader {
            name: "=".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            update_grid_info(&mut store, &header),
            Err(GridIoError::UnsupportedTarget(_))
        ));
    }
}

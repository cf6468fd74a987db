//! Zarr V3 grid store on the local filesystem.
//!
//! Every grid is a two-dimensional Zarr array of shape `[ny, nx]` in its own
//! directory under the store root. Chunks span whole rows so that each row
//! read or write touches a single chunk.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use grid_io::{
    GridHeader, GridIoError, GridStore, Representation, Result, RowBuffer, RowReader, RowWriter,
};
use serde_json::json;
use tracing::{debug, warn};
use zarrs::array::codec::bytes_to_bytes::blosc::{
    BloscCodec, BloscCompressionLevel, BloscCompressor, BloscShuffleMode,
};
use zarrs::array::codec::BytesToBytesCodecTraits;
use zarrs::array::{Array, ArrayBuilder};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

use crate::attrs;
use crate::config::{ZarrCompression, ZarrStoreConfig};

/// Name of the Zarr V3 metadata document inside an array directory.
const METADATA_FILE: &str = "zarr.json";

fn zarr_error(name: &str, err: impl std::fmt::Display) -> GridIoError {
    GridIoError::codec(format!("{}: {}", name, err))
}

/// A directory of Zarr grids.
#[derive(Debug, Clone)]
pub struct ZarrGridStore {
    root: PathBuf,
    config: ZarrStoreConfig,
}

impl ZarrGridStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>, config: ZarrStoreConfig) -> Result<Self> {
        config.validate().map_err(GridIoError::Codec)?;
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!(root = %root.display(), compression = %config.compression, "opened grid store");
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ZarrStoreConfig {
        &self.config
    }

    /// True if a grid called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.array_dir(name)
            .map(|dir| dir.join(METADATA_FILE).is_file())
            .unwrap_or(false)
    }

    /// Directory of grid `name`, rejecting names that escape the root.
    fn array_dir(&self, name: &str) -> Result<PathBuf> {
        if name == "=" {
            return Err(GridIoError::UnsupportedTarget(name.to_string()));
        }
        let relative = Path::new(name);
        let plain = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(GridIoError::invalid_header(
                name,
                "grid names must be relative paths inside the store",
            ));
        }
        Ok(self.root.join(relative))
    }

    fn open_array(&self, name: &str) -> Result<Array<FilesystemStore>> {
        let dir = self.array_dir(name)?;
        if !dir.join(METADATA_FILE).is_file() {
            return Err(GridIoError::NotFound(name.to_string()));
        }
        let store = FilesystemStore::new(&dir).map_err(|e| zarr_error(name, e))?;
        Array::open(Arc::new(store), "/").map_err(|e| zarr_error(name, e))
    }

    fn representation(name: &str, array: &Array<FilesystemStore>) -> Result<Representation> {
        attrs::representation_of(array.data_type()).ok_or_else(|| {
            GridIoError::format_mismatch(
                name,
                format!("unsupported data type {:?}", array.data_type()),
            )
        })
    }

    /// Create the compression codec based on configuration.
    fn compression_codec(
        &self,
        representation: Representation,
    ) -> Result<Option<Arc<dyn BytesToBytesCodecTraits>>> {
        let compressor = match self.config.compression {
            ZarrCompression::None => return Ok(None),
            ZarrCompression::BloscLz4 => BloscCompressor::LZ4,
            ZarrCompression::BloscZstd => BloscCompressor::Zstd,
        };

        let level = BloscCompressionLevel::try_from(self.config.compression_level)
            .map_err(|_| GridIoError::codec("invalid compression level"))?;

        // typesize is required when shuffle is enabled
        let (shuffle, typesize) = if self.config.shuffle {
            (BloscShuffleMode::Shuffle, Some(representation.size_of()))
        } else {
            (BloscShuffleMode::NoShuffle, None)
        };

        let codec = BloscCodec::new(compressor, level, None, shuffle, typesize)
            .map_err(|e| GridIoError::codec(e.to_string()))?;
        let codec: Arc<dyn BytesToBytesCodecTraits> = Arc::new(codec);
        Ok(Some(codec))
    }
}

/// Reads whole rows from one array.
pub struct ZarrRowReader {
    name: String,
    array: Array<FilesystemStore>,
    representation: Representation,
    nx: usize,
}

impl ZarrRowReader {
    fn row_subset(&self, index: usize) -> Result<ArraySubset> {
        ArraySubset::new_with_start_shape(vec![index as u64, 0], vec![1, self.nx as u64])
            .map_err(|e| zarr_error(&self.name, e))
    }
}

impl RowReader for ZarrRowReader {
    fn representation(&self) -> Representation {
        self.representation
    }

    fn read_row(&mut self, index: usize, row: &mut RowBuffer) -> Result<()> {
        if row.len() != self.nx || row.representation() != self.representation {
            return Err(GridIoError::codec(format!(
                "row buffer of {} {} values does not fit {}",
                row.len(),
                row.representation(),
                self.name
            )));
        }
        let subset = self.row_subset(index)?;
        let array = &self.array;
        let name = self.name.as_str();
        match row {
            RowBuffer::Byte(values) => {
                *values = array
                    .retrieve_array_subset_elements::<i8>(&subset)
                    .map_err(|e| zarr_error(name, e))?
            }
            RowBuffer::Short(values) => {
                *values = array
                    .retrieve_array_subset_elements::<i16>(&subset)
                    .map_err(|e| zarr_error(name, e))?
            }
            RowBuffer::Int(values) => {
                *values = array
                    .retrieve_array_subset_elements::<i32>(&subset)
                    .map_err(|e| zarr_error(name, e))?
            }
            RowBuffer::Float(values) => {
                *values = array
                    .retrieve_array_subset_elements::<f32>(&subset)
                    .map_err(|e| zarr_error(name, e))?
            }
            RowBuffer::Double(values) => {
                *values = array
                    .retrieve_array_subset_elements::<f64>(&subset)
                    .map_err(|e| zarr_error(name, e))?
            }
        }
        Ok(())
    }
}

/// Writes whole rows into a freshly created array.
pub struct ZarrRowWriter {
    name: String,
    array: Array<FilesystemStore>,
    representation: Representation,
    nx: usize,
}

impl RowWriter for ZarrRowWriter {
    fn write_row(&mut self, index: usize, row: &RowBuffer) -> Result<()> {
        if row.len() != self.nx || row.representation() != self.representation {
            return Err(GridIoError::codec(format!(
                "row of {} {} values does not fit {}",
                row.len(),
                row.representation(),
                self.name
            )));
        }
        let subset =
            ArraySubset::new_with_start_shape(vec![index as u64, 0], vec![1, self.nx as u64])
                .map_err(|e| zarr_error(&self.name, e))?;
        let stored = match row {
            RowBuffer::Byte(values) => self.array.store_array_subset_elements(&subset, values),
            RowBuffer::Short(values) => self.array.store_array_subset_elements(&subset, values),
            RowBuffer::Int(values) => self.array.store_array_subset_elements(&subset, values),
            RowBuffer::Float(values) => self.array.store_array_subset_elements(&subset, values),
            RowBuffer::Double(values) => self.array.store_array_subset_elements(&subset, values),
        };
        stored.map_err(|e| zarr_error(&self.name, e))
    }

    fn put_actual_range(&mut self, min: f64, max: f64) -> Result<()> {
        self.array
            .attributes_mut()
            .insert("actual_range".to_string(), json!([min, max]));
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.array
            .store_metadata()
            .map_err(|e| zarr_error(&self.name, e))?;
        debug!(name = %self.name, "closed grid writer");
        Ok(())
    }
}

impl GridStore for ZarrGridStore {
    type Reader<'a> = ZarrRowReader;
    type Writer<'a> = ZarrRowWriter;

    fn read_info(&self, name: &str) -> Result<GridHeader> {
        let array = self.open_array(name)?;
        let representation = Self::representation(name, &array)?;
        let (header, warnings) =
            attrs::header_from_attributes(name, array.shape(), representation, array.attributes())?;
        for warning in &warnings {
            warn!(warning = %warning, "grid header warning");
        }
        Ok(header)
    }

    fn open_reader(&self, header: &GridHeader) -> Result<Self::Reader<'_>> {
        let array = self.open_array(&header.name)?;
        let representation = Self::representation(&header.name, &array)?;
        let shape = array.shape();
        if shape != [header.ny as u64, header.nx as u64] {
            return Err(GridIoError::format_mismatch(
                &header.name,
                format!(
                    "array shape {:?} does not match header {}x{}",
                    shape, header.ny, header.nx
                ),
            ));
        }
        Ok(ZarrRowReader {
            name: header.name.clone(),
            array,
            representation,
            nx: header.nx,
        })
    }

    fn create_writer(&mut self, header: &GridHeader) -> Result<Self::Writer<'_>> {
        header.validate()?;
        let dir = self.array_dir(&header.name)?;
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;

        let representation = header.format.representation;
        let mut attributes = attrs::header_attributes(header);
        attributes.insert(
            "history".to_string(),
            json!(format!("{} created by grid-io", Utc::now().to_rfc3339())),
        );

        let chunk_rows = self.config.chunk_rows.min(header.ny);
        let chunk_grid: zarrs::array::ChunkGrid = vec![chunk_rows as u64, header.nx as u64]
            .try_into()
            .map_err(|e| GridIoError::codec(format!("{:?}", e)))?;

        let mut binding = ArrayBuilder::new(
            vec![header.ny as u64, header.nx as u64], // shape [rows, cols]
            attrs::data_type(representation),
            chunk_grid,
            attrs::fill_value(representation, header.nan_value),
        );
        let mut builder = binding.attributes(attributes);
        if let Some(codec) = self.compression_codec(representation)? {
            builder = builder.bytes_to_bytes_codecs(vec![codec]);
        }

        let store = FilesystemStore::new(&dir).map_err(|e| zarr_error(&header.name, e))?;
        let array = builder
            .build(Arc::new(store), "/")
            .map_err(|e| zarr_error(&header.name, e))?;
        array
            .store_metadata()
            .map_err(|e| zarr_error(&header.name, e))?;

        debug!(
            name = %header.name,
            nx = header.nx,
            ny = header.ny,
            chunk_rows,
            representation = %representation,
            "created grid array"
        );

        Ok(ZarrRowWriter {
            name: header.name.clone(),
            array,
            representation,
            nx: header.nx,
        })
    }

    fn update_info(&mut self, header: &GridHeader) -> Result<()> {
        let mut array = self.open_array(&header.name)?;
        let representation = Self::representation(&header.name, &array)?;
        if representation != header.format.representation {
            return Err(GridIoError::format_mismatch(
                &header.name,
                format!(
                    "stored as {}, header says {}",
                    representation, header.format.representation
                ),
            ));
        }
        if array.shape() != [header.ny as u64, header.nx as u64] {
            return Err(GridIoError::invalid_header(
                &header.name,
                "cannot change the size of a stored grid",
            ));
        }

        array.attributes_mut().extend(attrs::header_attributes(header));
        array
            .store_metadata()
            .map_err(|e| zarr_error(&header.name, e))?;
        debug!(name = %header.name, "rewrote grid attributes");
        Ok(())
    }
}

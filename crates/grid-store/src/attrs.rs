//! Mapping between grid headers and Zarr array attributes.
//!
//! Attributes follow the COARDS conventions where they have an equivalent:
//! coordinate vectors `x`/`y`, `long_name`/`units` per axis, `scale_factor`,
//! `add_offset`, `missing_value` and `actual_range`. Exact bounds and
//! spacing are kept alongside so a header survives a round trip unchanged.

use grid_io::{
    GridFormat, GridHeader, GridIoError, GridWarning, NameUnits, Region, Registration,
    Representation, Result, RowOrder,
};
use serde_json::{json, Map, Value};
use zarrs::array::{DataType, FillValue};

pub const CONVENTIONS: &str = "COARDS/CF-1.0";

/// Zarr data type storing `representation`.
pub fn data_type(representation: Representation) -> DataType {
    match representation {
        Representation::Byte => DataType::Int8,
        Representation::Short => DataType::Int16,
        Representation::Int => DataType::Int32,
        Representation::Float => DataType::Float32,
        Representation::Double => DataType::Float64,
    }
}

/// Representation of a Zarr data type, if it is one the pipelines handle.
pub fn representation_of(data_type: &DataType) -> Option<Representation> {
    match data_type {
        DataType::Int8 => Some(Representation::Byte),
        DataType::Int16 => Some(Representation::Short),
        DataType::Int32 => Some(Representation::Int),
        DataType::Float32 => Some(Representation::Float),
        DataType::Float64 => Some(Representation::Double),
        _ => None,
    }
}

/// Array fill value for the grid's no-data value.
pub fn fill_value(representation: Representation, sentinel: f64) -> FillValue {
    match representation {
        Representation::Byte => FillValue::from(sentinel as i8),
        Representation::Short => FillValue::from(sentinel as i16),
        Representation::Int => FillValue::from(sentinel as i32),
        Representation::Float => FillValue::from(sentinel as f32),
        Representation::Double => FillValue::from(sentinel),
    }
}

fn label_attributes(attrs: &mut Map<String, Value>, axis: &str, label: &str) {
    let label = NameUnits::parse(label);
    attrs.insert(format!("{}_long_name", axis), json!(label.long_name));
    attrs.insert(format!("{}_units", axis), json!(label.units));
}

/// Attributes describing `header`.
pub fn header_attributes(header: &GridHeader) -> Map<String, Value> {
    let mut attrs = Map::new();
    attrs.insert("Conventions".to_string(), json!(CONVENTIONS));
    attrs.insert("title".to_string(), json!(header.title));
    attrs.insert("remark".to_string(), json!(header.remark));
    attrs.insert(
        "node_offset".to_string(),
        json!(header.registration.node_offset()),
    );
    attrs.insert("x".to_string(), json!(header.x_coordinates()));
    attrs.insert("y".to_string(), json!(header.y_coordinates()));
    attrs.insert("x_range".to_string(), json!([header.x_min, header.x_max]));
    attrs.insert("y_range".to_string(), json!([header.y_min, header.y_max]));
    attrs.insert("increment".to_string(), json!([header.x_inc, header.y_inc]));
    label_attributes(&mut attrs, "x", &header.x_units);
    label_attributes(&mut attrs, "y", &header.y_units);
    label_attributes(&mut attrs, "z", &header.z_units);
    attrs.insert("scale_factor".to_string(), json!(header.z_scale_factor));
    attrs.insert("add_offset".to_string(), json!(header.z_add_offset));
    // NaN serializes as null.
    attrs.insert("missing_value".to_string(), json!(header.nan_value));
    attrs.insert("geographic".to_string(), json!(header.geographic));
    attrs.insert("actual_range".to_string(), json!([header.z_min, header.z_max]));
    attrs
}

fn number(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

fn numbers(attrs: &Map<String, Value>, key: &str) -> Option<Vec<f64>> {
    attrs
        .get(key)
        .and_then(Value::as_array)
        .map(|values| values.iter().map(number).collect())
}

fn pair(attrs: &Map<String, Value>, key: &str) -> Option<(f64, f64)> {
    match numbers(attrs, key)?.as_slice() {
        [a, b] => Some((*a, *b)),
        _ => None,
    }
}

fn string(attrs: &Map<String, Value>, key: &str) -> String {
    attrs
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn label(attrs: &Map<String, Value>, axis: &str) -> String {
    let long_name = attrs
        .get(&format!("{}_long_name", axis))
        .and_then(Value::as_str)
        .unwrap_or(axis);
    let units = attrs
        .get(&format!("{}_units", axis))
        .and_then(Value::as_str)
        .map(str::to_string);
    NameUnits {
        long_name: long_name.to_string(),
        units,
    }
    .to_string()
}

/// Rebuild a header from the attributes of an array of `shape` `[ny, nx]`.
///
/// Arrays written by this crate carry exact bounds and spacing. For other
/// arrays the extent is inferred from the `x`/`y` coordinate vectors, which
/// may produce step-uniformity warnings.
pub fn header_from_attributes(
    name: &str,
    shape: &[u64],
    representation: Representation,
    attrs: &Map<String, Value>,
) -> Result<(GridHeader, Vec<GridWarning>)> {
    let [ny, nx] = shape else {
        return Err(GridIoError::format_mismatch(
            name,
            format!("expected a 2-D array, found {} dimensions", shape.len()),
        ));
    };
    let (nx, ny) = (*nx as usize, *ny as usize);

    let registration = Registration::from_node_offset(
        attrs.get("node_offset").and_then(Value::as_u64).unwrap_or(0),
    );
    let x = numbers(attrs, "x").unwrap_or_default();
    let y = numbers(attrs, "y").unwrap_or_default();

    let ranges = (
        pair(attrs, "x_range"),
        pair(attrs, "y_range"),
        pair(attrs, "increment"),
    );
    let (mut header, warnings) = match ranges {
        (Some((x_min, x_max)), Some((y_min, y_max)), Some((x_inc, y_inc))) => {
            let row_order = match y.as_slice() {
                [first, .., last] if first > last => RowOrder::TopDown,
                _ => RowOrder::BottomUp,
            };
            // Node counts come from the extent so a mismatched shape is caught below.
            let header = GridHeader::new(
                name,
                Region::new(x_min, x_max, y_min, y_max),
                x_inc,
                y_inc,
                registration,
            )?
            .with_row_order(row_order);
            (header, Vec::new())
        }
        _ => GridHeader::from_axes(name, &x, &y, registration)?,
    };

    if header.nx != nx || header.ny != ny {
        return Err(GridIoError::format_mismatch(
            name,
            format!(
                "attributes describe {}x{} nodes but the array is {}x{}",
                header.nx, header.ny, nx, ny
            ),
        ));
    }

    header.format = GridFormat::coards(representation);
    header.title = string(attrs, "title");
    header.remark = string(attrs, "remark");
    header.x_units = label(attrs, "x");
    header.y_units = label(attrs, "y");
    header.z_units = label(attrs, "z");
    header.z_scale_factor = attrs
        .get("scale_factor")
        .and_then(Value::as_f64)
        .unwrap_or(1.0);
    header.z_add_offset = attrs
        .get("add_offset")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    header.nan_value = attrs.get("missing_value").map_or(f64::NAN, number);
    header.geographic = attrs
        .get("geographic")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if let Some((z_min, z_max)) = pair(attrs, "actual_range") {
        header.z_min = z_min;
        header.z_max = z_max;
    }

    Ok((header, warnings))
}

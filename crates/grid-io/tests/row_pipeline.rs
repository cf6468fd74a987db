//! End-to-end tests of the read and write pipelines against the in-memory store.

use grid_io::{
    read_grid, read_grid_info, write_grid, GridFormat, GridHeader, GridIoError, GridWarning,
    MemoryGridStore, Padding, Region, Registration, Representation, RowBuffer, RowOrder,
};
use test_utils::{
    assert_approx_eq, assert_grid_approx_eq, create_bathymetry_grid, create_grid_with_nans,
    create_test_grid, extrema_4x4, grid::GLOBAL_1DEG, grid::SIMPLE_10X10, pad_grid, unpad_grid,
};

fn header(name: &str, west: f64, east: f64, south: f64, north: f64) -> GridHeader {
    GridHeader::new(
        name,
        Region::new(west, east, south, north),
        1.0,
        1.0,
        Registration::Pixel,
    )
    .unwrap()
}

fn write_all(store: &mut MemoryGridStore, header: &mut GridHeader, grid: &[f32]) {
    write_grid(
        store,
        header,
        grid,
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .unwrap();
}

fn read_all(store: &MemoryGridStore, name: &str) -> (GridHeader, Vec<f32>) {
    let mut header = read_grid_info(store, name).unwrap();
    let mut grid = vec![0.0; header.nx * header.ny];
    read_grid(
        store,
        &mut header,
        &mut grid,
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .unwrap();
    (header, grid)
}

#[test]
fn test_float_round_trip_keeps_nans() {
    let mut store = MemoryGridStore::new();
    let grid = create_grid_with_nans(8, 6, &[(0, 0), (3, 2), (7, 5)]);
    let mut h = header("float.nc", 0.0, 8.0, 0.0, 6.0);
    write_all(&mut store, &mut h, &grid);

    let (read_header, out) = read_all(&store, "float.nc");
    assert_grid_approx_eq!(&out, &grid, 0.0);
    assert_eq!((read_header.nx, read_header.ny), (8, 6));
    assert_eq!(read_header.z_min, 1.0);
    assert_eq!(read_header.z_max, 5006.0);
}

#[test]
fn test_scaled_short_round_trip_within_quantization() {
    let mut store = MemoryGridStore::new();
    let grid = create_bathymetry_grid(40, 20);
    let mut h = header("short.nc", 0.0, 40.0, 0.0, 20.0)
        .with_format(GridFormat::coards(Representation::Short))
        .with_scaling(0.5, 0.0);
    let report = write_grid(
        &mut store,
        &mut h,
        &grid,
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.valid_cells, 800);
    assert_eq!(h.nan_value, -32768.0);

    let (_, out) = read_all(&store, "short.nc");
    assert_grid_approx_eq!(&out, &grid, 0.2501);
}

#[test]
fn test_row_order_invariance() {
    let mut store = MemoryGridStore::new();
    let grid = create_test_grid(5, 4);

    let mut top_down = header("td.nc", 0.0, 5.0, 0.0, 4.0).with_row_order(RowOrder::TopDown);
    write_all(&mut store, &mut top_down, &grid);
    let mut bottom_up = header("bu.nc", 0.0, 5.0, 0.0, 4.0).with_row_order(RowOrder::BottomUp);
    write_all(&mut store, &mut bottom_up, &grid);

    let td_rows = &store.get("td.nc").unwrap().rows;
    let bu_rows = &store.get("bu.nc").unwrap().rows;
    for j in 0..4 {
        assert_eq!(td_rows[j], bu_rows[3 - j]);
    }
    assert_eq!(td_rows[0], RowBuffer::Float(vec![0.0, 1.0, 2.0, 3.0, 4.0]));

    let (_, td) = read_all(&store, "td.nc");
    let (_, bu) = read_all(&store, "bu.nc");
    let td_bits: Vec<u32> = td.iter().map(|v| v.to_bits()).collect();
    let bu_bits: Vec<u32> = bu.iter().map(|v| v.to_bits()).collect();
    assert_eq!(td_bits, bu_bits);
    assert_eq!(td, grid);

    for name in ["td.nc", "bu.nc"] {
        let mut h = read_grid_info(&store, name).unwrap();
        let mut out = vec![0.0; 4];
        read_grid(
            &store,
            &mut h,
            &mut out,
            &mut Region::new(1.0, 3.0, 1.0, 3.0),
            Padding::default(),
            false,
        )
        .unwrap();
        assert_eq!(out, vec![1001.0, 1002.0, 2001.0, 2002.0], "{}", name);
    }
}

#[test]
fn test_padding_does_not_disturb_values() {
    let mut store = MemoryGridStore::new();
    let grid = create_test_grid(6, 4);
    let mut h = header("pad.nc", 0.0, 6.0, 0.0, 4.0);
    write_all(&mut store, &mut h, &grid);

    let (_, plain) = read_all(&store, "pad.nc");

    let pad = [2, 1, 3, 2];
    let mut padded = vec![-777.0_f32; (6 + 3) * (4 + 5) * 2];
    let mut h = read_grid_info(&store, "pad.nc").unwrap();
    read_grid(
        &store,
        &mut h,
        &mut padded,
        &mut Region::entire(),
        Padding::from_array(pad),
        true,
    )
    .unwrap();

    assert_eq!(unpad_grid(&padded, 6, 4, pad, true), plain);
    assert_eq!(padded.iter().filter(|v| **v == -777.0).count(), 162 - 24);
    assert_eq!((h.nx, h.ny), (6, 4));
}

#[test]
fn test_padded_complex_write() {
    let mut store = MemoryGridStore::new();
    let grid = create_test_grid(3, 3);
    let pad = [1, 1, 2, 0];
    let padded = pad_grid(&grid, 3, 3, pad, true, f32::NAN);
    let mut h = header("cplx.nc", 0.0, 3.0, 0.0, 3.0);
    write_grid(
        &mut store,
        &mut h,
        &padded,
        &mut Region::entire(),
        Padding::from_array(pad),
        true,
    )
    .unwrap();

    let (_, out) = read_all(&store, "cplx.nc");
    assert_eq!(out, grid);
}

#[test]
fn test_clamp_at_half_unit_past_max() {
    let mut store = MemoryGridStore::new();
    let mut h = header("clamp.nc", 0.0, 2.0, 0.0, 1.0)
        .with_format(GridFormat::coards(Representation::Short));
    let report = write_grid(
        &mut store,
        &mut h,
        &[32767.5, 32767.49],
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .unwrap();

    assert_eq!(report.out_of_range(), 1);
    assert_eq!(
        report.warnings,
        vec![GridWarning::OutOfRange {
            name: "clamp.nc".to_string(),
            count: 1
        }]
    );
    let stored = store.get("clamp.nc").unwrap();
    assert_eq!(stored.rows[0], RowBuffer::Short(vec![-32768, 32767]));
    assert_eq!(stored.actual_range, Some((32767.0, 32767.0)));
}

#[test]
fn test_extrema_of_4x4_grid() {
    let mut store = MemoryGridStore::new();
    let stored_header = header("extrema.nc", 0.0, 4.0, 0.0, 4.0).with_row_order(RowOrder::TopDown);
    let rows = extrema_4x4()
        .chunks(4)
        .map(|row| RowBuffer::from(row.to_vec()))
        .collect();
    store.insert(stored_header, rows).unwrap();

    let (mut h, grid) = read_all(&store, "extrema.nc");
    assert_eq!((h.z_min, h.z_max), (1.0, 16.0));

    h.name = "extrema_copy.nc".to_string();
    let report = write_grid(
        &mut store,
        &mut h,
        &grid,
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .unwrap();
    assert_eq!(report.valid_cells, 14);
    assert_eq!(
        store.get("extrema_copy.nc").unwrap().actual_range,
        Some((1.0, 16.0))
    );
    assert_eq!((h.z_min, h.z_max), (1.0, 16.0));
}

#[test]
fn test_all_nan_grid_persists_zero_range() {
    let mut store = MemoryGridStore::new();
    let grid = vec![f32::NAN; 12];
    let mut h = header("empty.nc", 0.0, 4.0, 0.0, 3.0)
        .with_format(GridFormat::coards(Representation::Int));
    let report = write_grid(
        &mut store,
        &mut h,
        &grid,
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .unwrap();

    assert!(report.is_empty_range());
    assert_eq!(report.valid_cells, 0);
    assert_eq!(store.get("empty.nc").unwrap().actual_range, Some((0.0, 0.0)));
    assert!(h.z_min.is_nan() && h.z_max.is_nan());

    let mut h = read_grid_info(&store, "empty.nc").unwrap();
    let mut out = vec![0.0; 12];
    let report = read_grid(
        &store,
        &mut h,
        &mut out,
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .unwrap();
    assert!(out.iter().all(|v| v.is_nan()));
    assert!(report.is_empty_range());
    assert!(h.z_min.is_nan());
}

#[test]
fn test_wrap_around_greenwich() {
    let mut store = MemoryGridStore::new();
    let (w, e, s, n) = GLOBAL_1DEG.region();
    let (width, height) = (GLOBAL_1DEG.width(), GLOBAL_1DEG.height());
    let grid = create_test_grid(width, height);
    let mut h = header("global.nc", w, e, s, n).geographic(true);
    write_all(&mut store, &mut h, &grid);

    let mut h = read_grid_info(&store, "global.nc").unwrap();
    let mut region = Region::new(350.0, 10.0, -10.0, 10.0);
    let mut out = vec![0.0; 20 * 20];
    read_grid(
        &store,
        &mut h,
        &mut out,
        &mut region,
        Padding::default(),
        false,
    )
    .unwrap();

    assert_eq!((h.nx, h.ny), (20, 20));
    assert_eq!((h.x_min, h.x_max), (350.0, 370.0));
    // Logical row 0 is latitude 9.5, stored row 80 from the top.
    assert_eq!(out[0], 80350.0);
    assert_eq!(out[9], 80359.0);
    assert_eq!(out[10], 80000.0);
    assert_eq!(out[19], 80009.0);
    assert_eq!(out[19 * 20 + 19], 99009.0);
}

#[test]
fn test_subregion_write() {
    let mut store = MemoryGridStore::new();
    let grid = create_test_grid(SIMPLE_10X10.width(), SIMPLE_10X10.height());
    let mut h = header("sub.nc", 0.0, 10.0, 0.0, 10.0);
    let mut region = Region::new(2.0, 5.0, 3.0, 7.0);
    write_grid(
        &mut store,
        &mut h,
        &grid,
        &mut region,
        Padding::default(),
        false,
    )
    .unwrap();
    assert_eq!((h.nx, h.ny), (3, 4));
    assert_eq!(h.region(), Region::new(2.0, 5.0, 3.0, 7.0));

    let (info, out) = read_all(&store, "sub.nc");
    assert_eq!(info.region(), Region::new(2.0, 5.0, 3.0, 7.0));
    let expected: Vec<f32> = (0..4)
        .flat_map(|r| (0..3).map(move |c| ((3 + r) * 1000 + 2 + c) as f32))
        .collect();
    assert_eq!(out, expected);
}

#[test]
fn test_pipe_and_bad_sentinel_are_rejected() {
    let mut store = MemoryGridStore::new();
    let mut pipe = header("=", 0.0, 2.0, 0.0, 2.0);
    let err = write_grid(
        &mut store,
        &mut pipe,
        &[0.0; 4],
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, GridIoError::UnsupportedTarget(_)));

    let mut bad = header("bad.nc", 0.0, 2.0, 0.0, 2.0)
        .with_format(GridFormat::coards(Representation::Byte))
        .with_nan_value(1000.0);
    let err = write_grid(
        &mut store,
        &mut bad,
        &[0.0; 4],
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, GridIoError::InvalidHeader { .. }));
    assert!(store.is_empty());
    assert_eq!(bad.nx, 2);
}

#[test]
fn test_float_sentinel_beyond_f32_is_rejected() {
    let mut store = MemoryGridStore::new();
    let mut huge = header("huge.nc", 0.0, 2.0, 0.0, 1.0).with_nan_value(1.0e300);
    let err = write_grid(
        &mut store,
        &mut huge,
        &[f32::NAN, 3.0],
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, GridIoError::InvalidHeader { .. }));
    assert!(store.is_empty());

    // A sentinel inside the f32 range still turns missing cells back into NaN.
    let mut h = header("finite.nc", 0.0, 2.0, 0.0, 1.0).with_nan_value(-1.0e30);
    write_all(&mut store, &mut h, &[f32::NAN, 3.0]);
    let (back, out) = read_all(&store, "finite.nc");
    assert!(out[0].is_nan());
    assert_eq!(out[1], 3.0);
    assert_eq!((back.z_min, back.z_max), (3.0, 3.0));
}

#[test]
fn test_padded_complex_write_across_dateline() {
    let mut store = MemoryGridStore::new();
    let (w, e, s, n) = GLOBAL_1DEG.region();
    let (width, height) = (GLOBAL_1DEG.width(), GLOBAL_1DEG.height());
    let grid = create_test_grid(width, height);
    let pad = [2, 1, 1, 3];
    let padded = pad_grid(&grid, width, height, pad, true, f32::NAN);
    let mut h = header("dateline.nc", w, e, s, n).geographic(true);
    let mut region = Region::new(355.0, 5.0, -2.0, 2.0);
    write_grid(
        &mut store,
        &mut h,
        &padded,
        &mut region,
        Padding::from_array(pad),
        true,
    )
    .unwrap();
    assert_eq!((h.nx, h.ny), (10, 4));
    assert_eq!((h.x_min, h.x_max), (355.0, 365.0));

    let (_, out) = read_all(&store, "dateline.nc");
    // Logical row 0 is latitude 1.5, stored row 88 from the top of the source.
    for row in 0..4 {
        let base = ((88 + row) * 1000) as f32;
        let expected: Vec<f32> = (355..360)
            .chain(0..5)
            .map(|col| base + col as f32)
            .collect();
        assert_eq!(out[row * 10..(row + 1) * 10], expected[..]);
    }
}

#[test]
fn test_read_reports_snapped_window() {
    let mut store = MemoryGridStore::new();
    let grid = create_test_grid(10, 10);
    let mut h = header("snap.nc", 0.0, 10.0, 0.0, 10.0);
    write_all(&mut store, &mut h, &grid);

    let mut h = read_grid_info(&store, "snap.nc").unwrap();
    let mut region = Region::new(1.2, 3.9, 0.0, 10.0);
    let mut out = vec![0.0; 30];
    let report = read_grid(
        &store,
        &mut h,
        &mut out,
        &mut region,
        Padding::default(),
        false,
    )
    .unwrap();
    assert!(report.warnings.contains(&GridWarning::SubsetSnapped {
        name: "snap.nc".to_string()
    }));
    assert_approx_eq!(h.x_min, 1.0, 1e-12);
    assert_approx_eq!(h.x_max, 4.0, 1e-12);
    assert_eq!(&out[..3], &[1.0, 2.0, 3.0]);
}

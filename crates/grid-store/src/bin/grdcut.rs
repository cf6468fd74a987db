//! Cut a subregion out of a stored grid.
//!
//! Reads `--region` of the input grid and writes it as a new grid in the
//! same store, optionally re-encoded with a different format, scaling or
//! no-data value. With `--info` only the input header is printed.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use grid_io::{
    read_grid, read_grid_info, resolve_window, write_grid, GridFormat, Padding, Region,
};
use grid_store::{ZarrGridStore, ZarrStoreConfig};

#[derive(Parser, Debug)]
#[command(name = "grdcut")]
#[command(about = "Extract a subregion of a grid into a new grid")]
struct Args {
    /// Input grid name
    input: String,

    /// Output grid name (required unless --info is given)
    output: Option<String>,

    /// Store directory holding the grids
    #[arg(long, env = "GRID_ROOT", default_value = "./grids")]
    root: String,

    /// Subregion as west/east/south/north (default: whole grid)
    #[arg(short = 'R', long, value_parser = parse_region)]
    region: Option<Region>,

    /// Output format code: nb, ns, ni, nf or nd (default: same as input)
    #[arg(short, long)]
    format: Option<GridFormat>,

    /// Output scale factor
    #[arg(long)]
    scale: Option<f64>,

    /// Output offset
    #[arg(long)]
    offset: Option<f64>,

    /// Output no-data value
    #[arg(long)]
    nan: Option<f64>,

    /// Print the input header as JSON and exit
    #[arg(long)]
    info: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn parse_region(s: &str) -> Result<Region, String> {
    let parts = s
        .split('/')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid region {}: {}", s, e))?;
    match parts.as_slice() {
        [w, e, s, n] => Ok(Region::new(*w, *e, *s, *n)),
        _ => Err(format!("region must be west/east/south/north, got {}", s)),
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args)?;

    let config = ZarrStoreConfig::from_env();
    let mut store = ZarrGridStore::open(&args.root, config)
        .with_context(|| format!("opening grid store {}", args.root))?;

    let mut header = read_grid_info(&store, &args.input)
        .with_context(|| format!("reading header of {}", args.input))?;

    if args.info {
        println!("{}", serde_json::to_string_pretty(&header)?);
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .context("an output grid name is required")?;

    let mut region = args.region.unwrap_or_else(Region::entire);
    let mut sizing = region;
    let window = resolve_window(&header, &mut sizing)?;
    let mut grid = vec![0.0_f32; window.width * window.height];

    let report = read_grid(
        &store,
        &mut header,
        &mut grid,
        &mut region,
        Padding::default(),
        false,
    )
    .with_context(|| format!("reading {}", args.input))?;

    info!(
        input = %args.input,
        nx = header.nx,
        ny = header.ny,
        west = region.west,
        east = region.east,
        south = region.south,
        north = region.north,
        valid_cells = report.valid_cells,
        "Read subregion"
    );

    let mut out = header.clone();
    out.name = output.clone();
    if let Some(format) = args.format {
        out.format = format;
    }
    if args.scale.is_some() || args.offset.is_some() {
        out.z_scale_factor = args.scale.unwrap_or(1.0);
        out.z_add_offset = args.offset.unwrap_or(0.0);
    }
    if let Some(nan) = args.nan {
        out.nan_value = nan;
    }

    let report = write_grid(
        &mut store,
        &mut out,
        &grid,
        &mut Region::entire(),
        Padding::default(),
        false,
    )
    .with_context(|| format!("writing {}", output))?;

    info!(
        output = %output,
        format = %out.format,
        z_min = out.z_min,
        z_max = out.z_max,
        out_of_range = report.out_of_range(),
        "Wrote grid"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region() {
        assert_eq!(
            parse_region("-10/10/-5.5/5").unwrap(),
            Region::new(-10.0, 10.0, -5.5, 5.0)
        );
        assert!(parse_region("1/2/3").is_err());
        assert!(parse_region("a/b/c/d").is_err());
    }
}

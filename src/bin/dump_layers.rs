//! Layer dump utility: stitches area chunks into full layer images.
//!
//! Usage: cargo run --release --bin dump_layers -- [OPTIONS]
//!
//! Input structure:
//!   <assets>/
//!     areas.json                     # Area catalog (name + chunk grid shape)
//!     <area>/                        # Optional per-area directory
//!       <area>_BKG_R000_C000.png     # BKG_<area>-R000_C000.png with --naming kind-first
//!       <area>_NM_R000_C000.png
//!       ...
//!       <area>_BKGSM.png             # Thumbnail
//!
//! Output structure:
//!   <output>/
//!     <area>_background.png
//!     <area>_normal.png
//!     <area>_height.png
//!     <area>_as.png
//!     <area>_thumb.png               # With --thumbnail

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use areamap::area::{Area, AreaCatalog, ChunkNaming};
use areamap::assets::{self, DumpConfig};

const CATALOG_FILENAME: &str = "areas.json";

#[derive(Debug)]
struct Args {
    config: DumpConfig,
    manifest: Option<PathBuf>,
    area: Option<String>,
    rows: Option<u32>,
    cols: Option<u32>,
}

fn parse_args() -> Result<Args, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut args = args.into_iter();

    let mut config = DumpConfig::default();
    let mut output_dir: Option<PathBuf> = None;
    let mut manifest: Option<PathBuf> = None;
    let mut area: Option<String> = None;
    let mut rows: Option<u32> = None;
    let mut cols: Option<u32> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-m" | "--manifest" => {
                manifest = Some(PathBuf::from(next_value(&mut args, &arg)?));
            }
            "-a" | "--assets" => {
                config.assets_dir = PathBuf::from(next_value(&mut args, &arg)?);
            }
            "-o" | "--output" => {
                output_dir = Some(PathBuf::from(next_value(&mut args, &arg)?));
            }
            "--area" => {
                area = Some(next_value(&mut args, &arg)?);
            }
            "--rows" => {
                rows = Some(parse_number(&next_value(&mut args, &arg)?, &arg)?);
            }
            "--cols" => {
                cols = Some(parse_number(&next_value(&mut args, &arg)?, &arg)?);
            }
            "-j" | "--jobs" => {
                config.jobs = parse_number(&next_value(&mut args, &arg)?, &arg)?;
            }
            "--naming" => {
                let value = next_value(&mut args, &arg)?;
                config.naming = ChunkNaming::from_name(&value)
                    .ok_or_else(|| format!("--naming: unknown scheme {value:?}"))?;
            }
            "--thumbnail" => {
                config.include_thumbnail = true;
            }
            "--strict" => {
                config.strict_cells = true;
            }
            "-h" | "--help" | "help" => {
                return Err("show_help".to_string());
            }
            other => {
                return Err(format!("unknown option {other:?}"));
            }
        }
    }

    if rows.is_some() != cols.is_some() {
        return Err("--rows and --cols must be given together".to_string());
    }
    if rows.is_some() && area.is_none() {
        return Err("--rows and --cols require --area".to_string());
    }

    // Layers land next to the chunks unless told otherwise.
    config.output_dir = output_dir.unwrap_or_else(|| config.assets_dir.clone());

    Ok(Args {
        config,
        manifest,
        area,
        rows,
        cols,
    })
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{flag}: invalid number {value:?}"))
}

fn print_help() {
    println!("Layer Dump Utility");
    println!("==================");
    println!();
    println!("Usage: dump_layers [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -m, --manifest <PATH>   Area catalog (default: <assets>/areas.json)");
    println!("  -a, --assets <DIR>      Chunk directory (default: _assets_)");
    println!("  -o, --output <DIR>      Output directory (default: same as --assets)");
    println!("  --area <NAME>           Only dump this area");
    println!("  --rows <N> --cols <N>   Grid shape of --area, bypasses the catalog");
    println!("  -j, --jobs <N>          Max parallel chunk decodes (default: 4)");
    println!("  --naming <SCHEME>       Chunk names: area-first (default) or kind-first");
    println!("  --thumbnail             Also write <area>_thumb.png");
    println!("  --strict                Fail on uneven chunk heights within a row");
    println!();
    println!("Examples:");
    println!("  dump_layers --assets pillars_assets --output layers");
    println!("  dump_layers --area yenwood --rows 3 --cols 4 --thumbnail");
    println!("  dump_layers --assets pillars_assets --naming kind-first");
}

fn run(args: Args) -> areamap::core::Result<usize> {
    let catalog = match (&args.area, args.rows, args.cols) {
        (Some(name), Some(rows), Some(cols)) => {
            AreaCatalog::new(vec![Area::new(name.clone(), rows, cols)])
        }
        _ => {
            let path = args
                .manifest
                .clone()
                .unwrap_or_else(|| args.config.assets_dir.join(CATALOG_FILENAME));
            AreaCatalog::load(&path)?
        }
    };

    let written = assets::dump_catalog(&catalog, &args.config, args.area.as_deref())?;
    Ok(written.len())
}

fn main() -> ExitCode {
    areamap::core::logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) if e == "show_help" => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}");
            print_help();
            return ExitCode::FAILURE;
        }
    };

    // Cap decode parallelism to bound peak memory
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(args.config.jobs.max(1))
        .build_global()
    {
        log::warn!("Failed to configure thread pool: {}", e);
    }

    log::info!("Assets: {}", args.config.assets_dir.display());
    log::info!("Output: {}", args.config.output_dir.display());

    let start = Instant::now();
    match run(args) {
        Ok(count) => {
            log::info!("Wrote {} layer files in {:.2?}", count, start.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

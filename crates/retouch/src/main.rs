//! retouch: apply the effect pipeline to an image file from the command line.
//!
//! Drives a [`Session`] headlessly: effects come from flags (or a full
//! `--config-json`), an optional `--select` crops the image through the
//! same preview-space mapping an interactive front end uses, and an
//! optional `--events` script is replayed afterwards.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin retouch -- [OPTIONS] --output <OUTPUT> <INPUT>
//! ```
//!
//! Set `RUST_LOG=debug` to see every recompute.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use retouch_pipeline::{
    EffectConfig, MorphOp, PipelineError, PreviewPoint, Raster, Session, SessionEvent,
    ToggleCounts,
};

/// Toggle effects, morphology, threshold, rotation and gamma for a single
/// image.
///
/// Toggle flags may be repeated: an even count cancels out.
#[derive(Parser)]
#[command(name = "retouch", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Output path; the format follows the extension.
    #[arg(short, long)]
    output: PathBuf,

    /// Mirror horizontally.
    #[arg(long, action = ArgAction::Count)]
    flip: u8,

    /// Convert to single-channel grayscale.
    #[arg(long, action = ArgAction::Count)]
    grayscale: u8,

    /// Invert every channel.
    #[arg(long, action = ArgAction::Count)]
    negative: u8,

    /// Binarize at --threshold.
    #[arg(long, action = ArgAction::Count)]
    binarize: u8,

    /// Morphology steps in order (repeatable, or comma-separated).
    #[arg(long = "morph", value_enum, value_delimiter = ',', value_name = "OP")]
    morphology: Vec<Morph>,

    /// Binarization threshold.
    #[arg(long, default_value_t = EffectConfig::DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Apply a second binarization after morphology.
    #[arg(long)]
    threshold_enabled: bool,

    /// Counter-clockwise rotation in degrees.
    #[arg(
        long,
        default_value_t = EffectConfig::DEFAULT_ROTATION_ANGLE,
        value_parser = clap::builder::RangedU64ValueParser::<u16>::new()
            .range(0..=u64::from(EffectConfig::MAX_ROTATION_ANGLE)),
    )]
    rotate: u16,

    /// Gamma exponent (0.1-5.0).
    #[arg(long, default_value_t = EffectConfig::DEFAULT_GAMMA)]
    gamma: f64,

    /// Morphology kernel side length (odd, 1-15).
    #[arg(long, default_value_t = EffectConfig::DEFAULT_KERNEL_SIZE)]
    kernel_size: u8,

    /// Full effect config as a JSON string.
    ///
    /// When provided, all other effect flags are ignored. The JSON must be
    /// a valid `EffectConfig` serialization; missing fields take defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Crop by dragging "X1,Y1,X2,Y2" on the 255px-wide input preview.
    #[arg(long, value_name = "X1,Y1,X2,Y2")]
    select: Option<String>,

    /// JSON file with a list of session events to replay after loading.
    #[arg(long, value_name = "FILE")]
    events: Option<PathBuf>,

    /// Also write the processed preview (255px wide, RGB) to this path.
    #[arg(long, value_name = "FILE")]
    preview: Option<PathBuf>,

    /// Print the final effect config as JSON on stdout.
    #[arg(long)]
    print_config: bool,
}

/// Morphology operation selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Morph {
    Erode,
    Dilate,
}

impl From<Morph> for MorphOp {
    fn from(m: Morph) -> Self {
        match m {
            Morph::Erode => Self::Erode,
            Morph::Dilate => Self::Dilate,
        }
    }
}

/// Build an [`EffectConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual effect flags are ignored. The result is not validated here;
/// [`Session::with_config`] does that.
fn config_from_cli(cli: &Cli) -> Result<EffectConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(EffectConfig {
        toggles: ToggleCounts {
            flip: u32::from(cli.flip),
            grayscale: u32::from(cli.grayscale),
            negative: u32::from(cli.negative),
            binarize: u32::from(cli.binarize),
        },
        morphology: cli.morphology.iter().copied().map(MorphOp::from).collect(),
        threshold: cli.threshold,
        threshold_enabled: cli.threshold_enabled,
        rotation_angle: cli.rotate,
        gamma: cli.gamma,
        kernel_size: cli.kernel_size,
    })
}

/// Parse `--select "X1,Y1,X2,Y2"` into the two drag corners.
fn parse_selection(s: &str) -> Result<(PreviewPoint, PreviewPoint), String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid selection coordinate '{part}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        &[x1, y1, x2, y2] => Ok((PreviewPoint::new(x1, y1), PreviewPoint::new(x2, y2))),
        _ => Err(format!(
            "selection must be 'X1,Y1,X2,Y2', got {} value(s): '{s}'",
            values.len()
        )),
    }
}

fn read_events(path: &std::path::Path) -> Result<Vec<SessionEvent>, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    serde_json::from_str(&json).map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = config_from_cli(cli)?;
    let mut session = Session::with_config(config)?;

    log::info!("Reading image from {}", cli.input.display());
    let source = retouch_io::load(&cli.input)?;
    let dims = source.dimensions();
    log::info!(
        "Loaded {}x{} ({} channel(s))",
        dims.width,
        dims.height,
        source.channels()
    );
    session.load(source)?;

    if let Some(ref spec) = cli.select {
        let (start, end) = parse_selection(spec)?;
        match session.select(start, end) {
            Ok(Some(region)) => log::info!(
                "Selected ({}, {})-({}, {}) in source pixels",
                region.x1,
                region.y1,
                region.x2,
                region.y2
            ),
            Ok(None) => {}
            Err(PipelineError::EmptySelection) => {
                log::warn!("Selection '{spec}' has zero area; keeping the full image");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(ref path) = cli.events {
        let events = read_events(path)?;
        log::info!("Replaying {} event(s) from {}", events.len(), path.display());
        for event in events {
            session.handle(event)?;
        }
    }

    let processed = session
        .processed()
        .ok_or("no processed image after load")?;
    log::info!("Saving to {}", cli.output.display());
    retouch_io::save(&cli.output, processed)?;

    if let Some(ref path) = cli.preview
        && let Some(preview) = session.processed_preview()
    {
        log::info!("Saving preview to {}", path.display());
        retouch_io::save(path, &Raster::Rgb(preview))?;
    }

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(session.config())?);
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => {
            log::info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use retouch_pipeline::Toggle;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("retouch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_effect_config() {
        let cli = parse(&["in.png", "-o", "out.png"]);
        assert_eq!(config_from_cli(&cli).unwrap(), EffectConfig::default());
    }

    #[test]
    fn repeated_toggles_are_counted() {
        let cli = parse(&["in.png", "-o", "out.png", "--flip", "--flip", "--negative"]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.toggles.count(Toggle::Flip), 2);
        assert!(!config.toggles.is_active(Toggle::Flip));
        assert!(config.toggles.is_active(Toggle::Negative));
    }

    #[test]
    fn morphology_order_is_preserved() {
        let cli = parse(&[
            "in.png", "-o", "out.png", "--morph", "dilate,erode", "--morph", "dilate",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(
            config.morphology,
            vec![MorphOp::Dilate, MorphOp::Erode, MorphOp::Dilate]
        );
    }

    #[test]
    fn rotation_out_of_range_rejected() {
        let result = Cli::try_parse_from(["retouch", "in.png", "-o", "o.png", "--rotate", "361"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = parse(&[
            "in.png",
            "-o",
            "out.png",
            "--gamma",
            "2.5",
            "--config-json",
            r#"{"kernel_size": 7, "morphology": ["erode"]}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.kernel_size, 7);
        assert_eq!(config.morphology, vec![MorphOp::Erode]);
        assert!((config.gamma - EffectConfig::DEFAULT_GAMMA).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_config_json_reported() {
        let cli = parse(&["in.png", "-o", "out.png", "--config-json", "{not json"]);
        let err = config_from_cli(&cli).unwrap_err();
        assert!(err.contains("--config-json"), "{err}");
    }

    #[test]
    fn selection_parses_four_values() {
        let (start, end) = parse_selection("10, 10,50.5,50").unwrap();
        assert_eq!(start, PreviewPoint::new(10.0, 10.0));
        assert_eq!(end, PreviewPoint::new(50.5, 50.0));
    }

    #[test]
    fn selection_rejects_bad_input() {
        assert!(parse_selection("10,10,50").is_err());
        assert!(parse_selection("10,10,50,50,1").is_err());
        assert!(parse_selection("a,10,50,50").is_err());
    }
}

// noteflake: render a MIDI file as a symmetric dot drawing.
//
// Usage:
//   noteflake <input.mid> [output.svg] [--mode MODE] [--width W] [--height H]
//     [--config layout.json] [--pixel-ratio R]
//
// Modes: sequential, sequential-index, mandala, mandala-index, tracks
//
// --width/--height are the window size; the shell margins are removed
// before layout. Set RUST_LOG=debug for per-frame logging.

use std::path::Path;
use std::process::ExitCode;

use noteflake::{
    parse_file, render_tracks_to_svg, LayoutConfig, LayoutMode, RenderOptions, ViewSize,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> noteflake::Result<()> {
    let positional: Vec<&str> = positional_args(args);
    let Some(input) = positional.first().copied() else {
        eprintln!("usage: noteflake <input.mid> [output.svg] [--mode MODE] [--width W] [--height H] [--config FILE] [--pixel-ratio R]");
        return Err(noteflake::Error::InvalidConfig("missing input file".into()));
    };
    let default_output = Path::new(input).with_extension("svg");
    let output = positional
        .get(1)
        .map(|s| Path::new(s).to_path_buf())
        .unwrap_or(default_output);

    let mut config = match flag_value(args, "--config") {
        Some(path) => LayoutConfig::from_file(path)?,
        None => LayoutConfig::default(),
    };
    if let Some(mode) = flag_value(args, "--mode") {
        config.mode = mode.parse::<LayoutMode>()?;
    }
    config.validate()?;

    let window_width: f64 = parse_flag(args, "--width")?.unwrap_or(800.0);
    let window_height: f64 = parse_flag(args, "--height")?.unwrap_or(600.0);
    let view = ViewSize::from_window(window_width, window_height);

    let mut options = RenderOptions::default();
    if let Some(ratio) = parse_flag(args, "--pixel-ratio")? {
        options.pixel_ratio = ratio;
    }

    info!(input, mode = ?config.mode, width = view.width, height = view.height, "rendering");

    let tracks = parse_file(input)?;
    let svg = render_tracks_to_svg(&tracks, view, &config, &options);
    std::fs::write(&output, svg).map_err(|source| noteflake::Error::Io {
        path: output.display().to_string(),
        source,
    })?;

    info!(output = %output.display(), "wrote SVG");
    Ok(())
}

/// Arguments that are neither flags nor flag values.
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> noteflake::Result<Option<T>> {
    match flag_value(args, flag) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| noteflake::Error::InvalidConfig(format!("invalid value '{v}' for {flag}"))),
    }
}

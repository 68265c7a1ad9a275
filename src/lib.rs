//! noteflake: symmetric visual art from MIDI note sequences.
//!
//! Notes are projected onto a 2D view with radial and kaleidoscopic
//! transforms: each note becomes an anchor point whose distance from the
//! center follows its time (or index) and whose offset follows its pitch,
//! and the anchor is then rotated (and mirrored) around the center.
//!
//! # Example
//! ```no_run
//! use noteflake::{parse_file, render_tracks_to_svg, LayoutConfig, RenderOptions, ViewSize};
//!
//! let tracks = parse_file("path/to/song.mid").unwrap();
//! let view = ViewSize::from_window(1280.0, 900.0);
//! let svg = render_tracks_to_svg(&tracks, view, &LayoutConfig::default(), &RenderOptions::default());
//! println!("{} tracks, {} bytes of SVG", tracks.len(), svg.len());
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod midi;
pub mod model;
pub mod projection;
pub mod renderer;
pub mod scale;

#[cfg(target_os = "android")]
pub mod android;

use std::path::Path;

pub use config::{LayoutConfig, RenderOptions};
pub use error::{Error, Result};
pub use layout::{project, LayoutMode, MandalaDistance, RayAssignment};
pub use midi::parse_midi;
pub use model::*;
pub use projection::{rotated_positions, AngleMode, Symmetry};
pub use renderer::{Canvas, DriverState, FrameStats, RenderDriver, SvgCanvas};
pub use scale::LinearScale;

/// Read a MIDI file and return its tracks.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Track>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    parse_bytes(&data)
}

/// Parse MIDI bytes into tracks.
pub fn parse_bytes(data: &[u8]) -> Result<Vec<Track>> {
    parse_midi(data)
}

/// Load tracks from JSON (`[[{"start":0,"end":1,"pitch":60}, ...], ...]`).
pub fn tracks_from_json(json: &str) -> Result<Vec<Track>> {
    Ok(serde_json::from_str(json)?)
}

/// Convert a projected frame to a JSON string.
/// Useful for passing data across FFI boundaries.
pub fn frame_to_json(frame: &Frame) -> Result<String> {
    Ok(serde_json::to_string(frame)?)
}

/// Draw `tracks` into a fresh SVG document.
pub fn render_tracks_to_svg(
    tracks: &[Track],
    view: ViewSize,
    config: &LayoutConfig,
    options: &RenderOptions,
) -> String {
    if view.width <= 0.0 || view.height <= 0.0 {
        return renderer::empty_svg("Nothing to draw");
    }
    let mut driver = RenderDriver::new(SvgCanvas::new(options.clone()), config.clone())
        .with_pixel_ratio(options.pixel_ratio)
        .with_tracks(tracks.to_vec());
    driver.mount(view);
    driver.canvas().build()
}

/// Parse MIDI bytes and render to SVG.
pub fn render_bytes_to_svg(
    data: &[u8],
    view: ViewSize,
    config: &LayoutConfig,
    options: &RenderOptions,
) -> Result<String> {
    let tracks = parse_bytes(data)?;
    Ok(render_tracks_to_svg(&tracks, view, config, options))
}

/// Parse a MIDI file and render it directly to SVG.
pub fn render_file_to_svg<P: AsRef<Path>>(
    path: P,
    view: ViewSize,
    config: &LayoutConfig,
    options: &RenderOptions,
) -> Result<String> {
    let tracks = parse_file(path)?;
    Ok(render_tracks_to_svg(&tracks, view, config, options))
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI for iOS (static library) and Android (JNI)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Resolve an optional JSON layout config; null or empty means defaults.
fn config_from_json(json: Option<&str>) -> Result<LayoutConfig> {
    match json {
        Some(s) if !s.trim().is_empty() => LayoutConfig::from_json_str(s),
        _ => Ok(LayoutConfig::default()),
    }
}

/// Render MIDI bytes to SVG and return it as a C string.
/// The caller must free the returned string with `noteflake_free_string`.
///
/// `width`/`height` are the window size; the shell margins are subtracted.
/// `config_json` may be null for the default layout.
///
/// # Safety
/// `data` must point to `len` valid bytes. `config_json` must be null or a
/// valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn noteflake_render_bytes(
    data: *const u8,
    len: usize,
    config_json: *const c_char,
    width: f64,
    height: f64,
) -> *mut c_char {
    if data.is_null() || len == 0 {
        return std::ptr::null_mut();
    }
    let bytes = unsafe { std::slice::from_raw_parts(data, len) };
    let json = if config_json.is_null() {
        None
    } else {
        match unsafe { CStr::from_ptr(config_json) }.to_str() {
            Ok(s) => Some(s),
            Err(_) => return std::ptr::null_mut(),
        }
    };

    let config = match config_from_json(json) {
        Ok(c) => c,
        Err(_) => return std::ptr::null_mut(),
    };
    let view = ViewSize::from_window(width, height);

    match render_bytes_to_svg(bytes, view, &config, &RenderOptions::default()) {
        Ok(svg) => CString::new(svg).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by noteflake functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a noteflake function, or null.
#[no_mangle]
pub unsafe extern "C" fn noteflake_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

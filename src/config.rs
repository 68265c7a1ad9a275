//! Tunable layout and rendering parameters.
//!
//! Every constant the layouts use (scale fractions, inner radii, the dot
//! radius clamp, colors) lives here so a JSON file can override it. All
//! fields have defaults, so `{}` is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::LayoutMode;
use crate::model::Color;
use crate::projection::AngleMode;

/// d3's `schemeCategory10`.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Fill of single-track layouts.
pub const DEFAULT_FOREGROUND: &str = "rgba(255, 255, 255, 0.3)";
pub const DEFAULT_BACKGROUND: &str = "#1e1e1e";

/// Largest accepted rotation count, one copy per degree.
pub const MAX_FOLD: u32 = 360;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub angle_mode: AngleMode,
    /// Track drawn by the single-track layouts
    pub track: usize,
    /// Upper bound for data-derived dot radii
    pub max_radius: f64,
    pub ray: RayParams,
    pub mandala: MandalaParams,
    pub tracks: TrackRayParams,
    /// Fill of single-track layouts
    pub foreground: Color,
    /// Per-track fills of the multi-track layout, cycled by track index
    pub palette: Vec<Color>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::default(),
            angle_mode: AngleMode::default(),
            track: 0,
            max_radius: 5.0,
            ray: RayParams::default(),
            mandala: MandalaParams::default(),
            tracks: TrackRayParams::default(),
            foreground: Color::new(DEFAULT_FOREGROUND),
            palette: CATEGORY10.iter().map(|c| Color::new(*c)).collect(),
        }
    }
}

/// Sequential-ray ("snowflake") layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RayParams {
    /// Outer radius as a fraction of the larger view dimension
    pub whole_fraction: f64,
    /// Distance of the first note from the center
    pub inner_radius: f64,
    /// Vertical anchor offset per octave
    pub octave_step: f64,
    pub dot_radius: f64,
}

impl Default for RayParams {
    fn default() -> Self {
        Self {
            whole_fraction: 0.3,
            inner_radius: 20.0,
            octave_step: 10.0,
            dot_radius: 2.0,
        }
    }
}

/// Mirrored-symmetry ("mandala") layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MandalaParams {
    pub whole_fraction: f64,
    /// Inner radius in dot radii when distance follows start time
    pub time_inner_dots: f64,
    /// Inner radius in dot radii when distance follows note index
    pub index_inner_dots: f64,
    /// Pixel range of the pitch offset when distance follows note index
    pub index_pitch_range: (f64, f64),
}

impl Default for MandalaParams {
    fn default() -> Self {
        Self {
            whole_fraction: 0.3,
            time_inner_dots: 12.0,
            index_inner_dots: 6.0,
            index_pitch_range: (5.0, 20.0),
        }
    }
}

/// Multi-track ray layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackRayParams {
    pub whole_fraction: f64,
    /// Inner radius as a fraction of the outer radius
    pub inner_fraction: f64,
}

impl Default for TrackRayParams {
    fn default() -> Self {
        Self {
            whole_fraction: 0.35,
            inner_fraction: 0.1,
        }
    }
}

impl LayoutConfig {
    pub fn with_mode(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if let LayoutMode::MirroredSixFold { symmetry, .. } = &self.mode {
            if symmetry.fold == 0 {
                return Err(Error::InvalidConfig("fold must be at least 1".into()));
            }
            if symmetry.fold > MAX_FOLD {
                return Err(Error::InvalidConfig(format!(
                    "fold must be at most {MAX_FOLD}, got {}",
                    symmetry.fold
                )));
            }
        }
        let fractions = [
            ("ray.whole_fraction", self.ray.whole_fraction),
            ("mandala.whole_fraction", self.mandala.whole_fraction),
            ("tracks.whole_fraction", self.tracks.whole_fraction),
        ];
        for (name, value) in fractions {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }
        let lengths = [
            ("max_radius", self.max_radius),
            ("ray.inner_radius", self.ray.inner_radius),
            ("ray.octave_step", self.ray.octave_step),
            ("ray.dot_radius", self.ray.dot_radius),
            ("mandala.time_inner_dots", self.mandala.time_inner_dots),
            ("mandala.index_inner_dots", self.mandala.index_inner_dots),
            ("tracks.inner_fraction", self.tracks.inner_fraction),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        let (lo, hi) = self.mandala.index_pitch_range;
        if !(lo.is_finite() && hi.is_finite()) {
            return Err(Error::InvalidConfig("mandala.index_pitch_range must be finite".into()));
        }
        if self.palette.is_empty() {
            return Err(Error::InvalidConfig("palette must not be empty".into()));
        }
        Ok(())
    }

    /// Fill for track `index` in the multi-track layout.
    pub fn track_color(&self, index: usize) -> Color {
        match self.palette.len() {
            0 => self.foreground.clone(),
            n => self.palette[index % n].clone(),
        }
    }
}

/// Output options of the SVG canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOptions {
    /// Physical pixels per view pixel
    pub pixel_ratio: f64,
    /// Fill painted under every frame; `None` leaves the SVG transparent
    pub background: Option<Color>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            background: Some(Color::new(DEFAULT_BACKGROUND)),
        }
    }
}

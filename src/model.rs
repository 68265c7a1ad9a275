//! Data model shared by the projection engine, the MIDI loader and the
//! renderer.
//!
//! Notes and tracks are produced once by the MIDI loader and then only
//! read. Everything the engine emits (points, draw commands) is rebuilt
//! from scratch for every frame.

use serde::{Deserialize, Serialize};

/// Highest valid MIDI pitch.
pub const MAX_PITCH: u8 = 127;

/// Margins the hosting shell subtracts from the window before handing the
/// size to the view.
pub const SHELL_MARGIN_WIDTH: f64 = 20.0;
pub const SHELL_MARGIN_HEIGHT: f64 = 200.0;

/// A single musical event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Onset time. Units are opaque; only comparisons within one file matter.
    pub start: f64,
    /// Release time, same units as `start`
    pub end: f64,
    /// MIDI pitch (0–127)
    pub pitch: u8,
}

impl Note {
    pub fn new(start: f64, end: f64, pitch: u8) -> Self {
        Self { start, end, pitch }
    }

    /// Finite times and an in-range pitch.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.pitch <= MAX_PITCH
    }

    /// Pitch class, 0 = C.
    pub fn pitch_class(&self) -> u8 {
        self.pitch % 12
    }

    /// Octave relative to the one containing middle C.
    pub fn octave_offset(&self) -> i32 {
        (self.pitch / 12) as i32 - 4
    }
}

/// Notes of one MIDI track, in parse order.
pub type Track = Vec<Note>;

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewSize {
    fn default() -> Self {
        Self::from_window(800.0, 600.0)
    }
}

impl ViewSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Derive the drawable size from an outer window size by removing the
    /// shell margins.
    pub fn from_window(window_width: f64, window_height: f64) -> Self {
        Self {
            width: (window_width - SHELL_MARGIN_WIDTH).floor().max(0.0),
            height: (window_height - SHELL_MARGIN_HEIGHT).floor().max(0.0),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn max_dimension(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// A position in view coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A dot to draw: position plus radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl ProjectedPoint {
    pub fn at(point: Point, radius: f64) -> Self {
        Self {
            x: point.x,
            y: point.y,
            radius,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A CSS color string (`#1f77b4`, `rgba(...)`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new(css: impl Into<String>) -> Self {
        Self(css.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One filled circle of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub point: ProjectedPoint,
    pub color: Color,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Size the frame was laid out for
    pub view: ViewSize,
    /// Circles in draw order
    pub commands: Vec<DrawCommand>,
    /// Notes dropped because they had non-finite times or an invalid pitch
    pub skipped_notes: usize,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

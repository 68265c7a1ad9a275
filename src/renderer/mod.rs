//! Render driver: clears the canvas and repaints every dot of a frame
//! whenever the view, the notes or the layout change.
//!
//! Drawing itself goes through the [`Canvas`] trait, so the same driver
//! paints into an SVG document ([`SvgCanvas`]) or any host surface.

mod svg_builder;

use serde::Serialize;
use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::layout::project;
use crate::model::{Color, Frame, Track, ViewSize};

pub use svg_builder::SvgCanvas;
pub(crate) use svg_builder::empty_svg;

// ═══════════════════════════════════════════════════════════════════════
// Drawing collaborator
// ═══════════════════════════════════════════════════════════════════════

/// The drawing primitives the driver needs from a surface.
pub trait Canvas {
    /// Size the backing store for `view` at `pixel_ratio` physical pixels
    /// per view pixel. Called once, before the first frame.
    fn setup(&mut self, view: ViewSize, pixel_ratio: f64);

    /// The host changed the displayed size after setup.
    fn resize(&mut self, _view: ViewSize) {}

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn set_fill_style(&mut self, color: &Color);

    fn draw_filled_circle(&mut self, x: f64, y: f64, radius: f64);
}

// ═══════════════════════════════════════════════════════════════════════
// Driver
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Canvas backing store not sized yet
    Uninitialized,
    Ready,
}

/// What one redraw painted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub points: usize,
    pub skipped_notes: usize,
}

pub struct RenderDriver<C: Canvas> {
    canvas: C,
    state: DriverState,
    view: ViewSize,
    tracks: Vec<Track>,
    config: LayoutConfig,
    pixel_ratio: f64,
}

impl<C: Canvas> RenderDriver<C> {
    pub fn new(canvas: C, config: LayoutConfig) -> Self {
        Self {
            canvas,
            state: DriverState::Uninitialized,
            view: ViewSize::default(),
            tracks: Vec::new(),
            config,
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    /// Notes to draw from the first frame on.
    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks;
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn view(&self) -> ViewSize {
        self.view
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Set up the canvas and draw the first frame. Mounting again only
    /// resizes and redraws; the backing store is set up once.
    pub fn mount(&mut self, view: ViewSize) -> FrameStats {
        self.view = view;
        match self.state {
            DriverState::Uninitialized => {
                self.canvas.setup(view, self.pixel_ratio);
                self.state = DriverState::Ready;
                debug!(width = view.width, height = view.height, "canvas mounted");
            }
            DriverState::Ready => self.canvas.resize(view),
        }
        self.paint()
    }

    /// New viewport size. The size is kept even before mount.
    pub fn resize(&mut self, view: ViewSize) -> Result<FrameStats> {
        self.view = view;
        self.ensure_ready()?;
        self.canvas.resize(view);
        Ok(self.paint())
    }

    /// New note data. The tracks are kept even before mount.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) -> Result<FrameStats> {
        self.tracks = tracks;
        self.redraw()
    }

    pub fn set_config(&mut self, config: LayoutConfig) -> Result<FrameStats> {
        self.config = config;
        self.redraw()
    }

    pub fn redraw(&mut self) -> Result<FrameStats> {
        self.ensure_ready()?;
        Ok(self.paint())
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.state {
            DriverState::Ready => Ok(()),
            DriverState::Uninitialized => Err(Error::NotMounted),
        }
    }

    fn paint(&mut self) -> FrameStats {
        let frame = project(&self.tracks, self.view, &self.config);
        self.canvas.clear_rect(0.0, 0.0, self.view.width, self.view.height);
        paint_frame(&mut self.canvas, &frame);

        let stats = FrameStats {
            points: frame.len(),
            skipped_notes: frame.skipped_notes,
        };
        debug!(points = stats.points, skipped = stats.skipped_notes, "frame painted");
        stats
    }
}

/// Issue one filled circle per command. The fill style is only set when
/// it differs from the previous command's.
pub fn paint_frame<C: Canvas + ?Sized>(canvas: &mut C, frame: &Frame) {
    let mut current: Option<&Color> = None;
    for cmd in &frame.commands {
        if current != Some(&cmd.color) {
            canvas.set_fill_style(&cmd.color);
            current = Some(&cmd.color);
        }
        canvas.draw_filled_circle(cmd.point.x, cmd.point.y, cmd.point.radius);
    }
}

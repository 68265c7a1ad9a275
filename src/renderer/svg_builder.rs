//! SVG canvas: accumulates the circles of one frame and produces a
//! standalone SVG document.

use crate::config::RenderOptions;
use crate::model::{Color, ViewSize};

use super::Canvas;

// ═══════════════════════════════════════════════════════════════════════
// SvgCanvas
// ═══════════════════════════════════════════════════════════════════════

/// A [`Canvas`] that records draw calls as SVG elements.
///
/// The `viewBox` is the logical view size; `width`/`height` are scaled by
/// the pixel ratio. A clear covering the whole frame discards everything
/// drawn so far.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    elements: Vec<String>,
    width: f64,
    height: f64,
    options: RenderOptions,
    fill: Color,
}

impl Default for SvgCanvas {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl SvgCanvas {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            elements: Vec::new(),
            width: 0.0,
            height: 0.0,
            options,
            fill: Color::new("black"),
        }
    }

    /// Number of elements drawn since the last full clear.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn size(&self) -> ViewSize {
        ViewSize::new(self.width, self.height)
    }

    pub fn build(&self) -> String {
        let ratio = self.options.pixel_ratio;
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width,
            self.height,
            self.width * ratio,
            self.height * ratio
        );
        svg.push('\n');
        if let Some(bg) = &self.options.background {
            svg.push_str("  ");
            svg.push_str(&rect(0.0, 0.0, self.width, self.height, bg));
            svg.push('\n');
        }
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn covers_frame(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        x <= 0.0 && y <= 0.0 && x + w >= self.width && y + h >= self.height
    }
}

impl Canvas for SvgCanvas {
    fn setup(&mut self, view: ViewSize, pixel_ratio: f64) {
        self.width = view.width;
        self.height = view.height;
        if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            self.options.pixel_ratio = pixel_ratio;
        }
        self.elements.clear();
    }

    fn resize(&mut self, view: ViewSize) {
        self.width = view.width;
        self.height = view.height;
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        if self.covers_frame(x, y, w, h) {
            self.elements.clear();
        } else if let Some(bg) = &self.options.background {
            // Nothing can be erased from an SVG; paint over with the background.
            let patch = rect(x, y, w, h, bg);
            self.elements.push(patch);
        }
    }

    fn set_fill_style(&mut self, color: &Color) {
        self.fill = color.clone();
    }

    fn draw_filled_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.elements.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
            x,
            y,
            radius,
            escape_attr(self.fill.as_str())
        ));
    }
}

fn rect(x: f64, y: f64, w: f64, h: f64, fill: &Color) -> String {
    format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
        x,
        y,
        w,
        h,
        escape_attr(fill.as_str())
    )
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ═══════════════════════════════════════════════════════════════════════
// Empty SVG fallback
// ═══════════════════════════════════════════════════════════════════════

pub(crate) fn empty_svg(message: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 100\">\
         <text x=\"200\" y=\"50\" text-anchor=\"middle\" font-size=\"14\" fill=\"gray\">{}</text>\
         </svg>",
        escape_attr(message)
    )
}

//! Canvas-like drawing API over pdf-writer content streams
//!
//! Callers work in top-left page coordinates (y grows downwards, the way the
//! report template is laid out); the canvas flips every coordinate into
//! PDF user space against the page height.

use pdf_writer::{Content, Name, Str};

use crate::font_metrics::Font;
use crate::types::{Color, PageSize, Rect};
use crate::unicode_utils::unicode_to_winansi;

/// Graphics state mirrored on the Rust side to skip redundant operators
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_width: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            fill_color: Color::black(),
            stroke_color: Color::black(),
            line_width: 1.0,
        }
    }
}

/// Drawing surface for a single page
pub struct PdfCanvas {
    content: Content,
    page: PageSize,
    state: CanvasState,
}

impl PdfCanvas {
    pub fn new(page: PageSize) -> Self {
        Self {
            content: Content::new(),
            page,
            state: CanvasState::default(),
        }
    }

    /// Finished content stream bytes
    pub fn finish(self) -> Vec<u8> {
        self.content.finish()
    }

    fn flip_y(&self, y: f64) -> f32 {
        (self.page.height - y) as f32
    }

    // ===== Colors and line styles =====

    pub fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != color {
            self.state.fill_color = color;
            self.content
                .set_fill_rgb(color.r as f32, color.g as f32, color.b as f32);
        }
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.state.stroke_color != color {
            self.state.stroke_color = color;
            self.content
                .set_stroke_rgb(color.r as f32, color.g as f32, color.b as f32);
        }
    }

    pub fn set_line_width(&mut self, width: f64) {
        if self.state.line_width != width {
            self.state.line_width = width;
            self.content.set_line_width(width as f32);
        }
    }

    // ===== Drawing =====

    fn path_rect(&mut self, rect: Rect) {
        let bottom = self.flip_y(rect.bottom());
        self.content
            .rect(rect.x as f32, bottom, rect.width as f32, rect.height as f32);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.set_fill_color(color);
        self.path_rect(rect);
        self.content.fill_nonzero();
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.set_stroke_color(color);
        self.set_line_width(width);
        self.path_rect(rect);
        self.content.stroke();
    }

    pub fn fill_and_stroke_rect(&mut self, rect: Rect, fill: Color, stroke: Color, width: f64) {
        self.set_fill_color(fill);
        self.set_stroke_color(stroke);
        self.set_line_width(width);
        self.path_rect(rect);
        self.content.fill_nonzero_and_stroke();
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64) {
        self.set_stroke_color(color);
        self.set_line_width(width);
        let (start, end) = (self.flip_y(y1), self.flip_y(y2));
        self.content.move_to(x1 as f32, start);
        self.content.line_to(x2 as f32, end);
        self.content.stroke();
    }

    // ===== Text =====

    /// Draw a single line of text with its baseline at `baseline_y`
    pub fn draw_text(&mut self, x: f64, baseline_y: f64, text: &str, font: Font, size: f64, color: Color) {
        if text.is_empty() {
            return;
        }
        self.set_fill_color(color);
        let y = self.flip_y(baseline_y);
        let encoded = unicode_to_winansi(text);
        self.content.begin_text();
        self.content.set_font(font.resource_name(), size as f32);
        self.content.next_line(x as f32, y);
        self.content.show(Str(&encoded));
        self.content.end_text();
    }

    // ===== Images =====

    /// Paint an image XObject stretched over `rect`
    pub fn draw_image(&mut self, image_name: Name<'_>, rect: Rect) {
        let bottom = self.flip_y(rect.bottom());
        self.content.save_state();
        self.content.transform([
            rect.width as f32,
            0.0,
            0.0,
            rect.height as f32,
            rect.x as f32,
            bottom,
        ]);
        self.content.x_object(image_name);
        self.content.restore_state();
    }
}

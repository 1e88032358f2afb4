//! Drawing surface trait for pluggable canvas implementations.
//!
//! This module defines the `Canvas` trait: the subset of the Canvas 2D API
//! the painter and the scroll bars draw with. The browser backend wraps a
//! `CanvasRenderingContext2d`; the recording backend captures calls for
//! tests and scenario replay.

use crate::error::Result;
use crate::types::{Point, Rect};

/// Canvas 2D operations used by the tile painter and the scroll bars.
///
/// Coordinates are canvas device pixels. State calls (`save`, transforms,
/// styles) behave like their Canvas 2D counterparts.
pub trait Canvas {
    /// Bitmap type tiles are stored as.
    type Image;

    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn size(&self) -> Point {
        Point::new(self.width(), self.height())
    }

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn scale(&mut self, x: f64, y: f64);

    fn set_fill_style(&mut self, style: &str);
    fn set_stroke_style(&mut self, style: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_font(&mut self, font: &str);

    fn fill_rect(&mut self, rect: Rect);
    fn stroke_rect(&mut self, rect: Rect);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    /// Restrict later drawing to `rect` until the next `restore`.
    fn clip_rect(&mut self, rect: Rect);

    /// Copy `src` of `image` into `dst` on the canvas.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the image (e.g. a detached
    /// bitmap or a lost context).
    fn draw_image(&mut self, image: &Self::Image, src: Rect, dst: Rect) -> Result<()>;
}

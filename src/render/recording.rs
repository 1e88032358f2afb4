//! A canvas that records draw calls instead of rasterizing them.
//!
//! Used on native targets by the tests, the benchmark and the scenario
//! replay CLI. Images are opaque numeric ids.

use std::collections::HashSet;

use serde::Serialize;

use super::backend::Canvas;
use crate::error::{Result, TileviewError};
use crate::types::Rect;

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Scale { x: f64, y: f64 },
    FillStyle { style: String },
    StrokeStyle { style: String },
    LineWidth { width: f64 },
    GlobalAlpha { alpha: f64 },
    Font { font: String },
    FillRect { rect: Rect },
    StrokeRect { rect: Rect },
    FillText { text: String, x: f64, y: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64 },
    ClosePath,
    Fill,
    Stroke,
    Clip { rect: Rect },
    DrawImage { image: u64, src: Rect, dst: Rect },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
    rejected: HashSet<u64>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            rejected: HashSet::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Hand out the recorded ops and start a fresh recording.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Make `draw_image` fail for `image`, as a detached bitmap would.
    pub fn reject_image(&mut self, image: u64) {
        self.rejected.insert(image);
    }

    /// `(image, dst)` of every successful blit, in order.
    pub fn blits(&self) -> Vec<(u64, Rect)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::DrawImage { image, dst, .. } => Some((*image, *dst)),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

impl Canvas for RecordingCanvas {
    type Image = u64;

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.push(DrawOp::Translate { x, y });
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.push(DrawOp::Scale { x, y });
    }

    fn set_fill_style(&mut self, style: &str) {
        self.push(DrawOp::FillStyle {
            style: style.to_string(),
        });
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.push(DrawOp::StrokeStyle {
            style: style.to_string(),
        });
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawOp::LineWidth { width });
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.push(DrawOp::GlobalAlpha { alpha });
    }

    fn set_font(&mut self, font: &str) {
        self.push(DrawOp::Font {
            font: font.to_string(),
        });
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.push(DrawOp::FillRect { rect });
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.push(DrawOp::StrokeRect { rect });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, _max_width: Option<f64>) {
        self.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn begin_path(&mut self) {
        self.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawOp::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, _start_angle: f64, _end_angle: f64) {
        self.push(DrawOp::Arc { x, y, radius });
    }

    fn close_path(&mut self) {
        self.push(DrawOp::ClosePath);
    }

    fn fill(&mut self) {
        self.push(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawOp::Stroke);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.push(DrawOp::Clip { rect });
    }

    fn draw_image(&mut self, image: &u64, src: Rect, dst: Rect) -> Result<()> {
        if self.rejected.contains(image) {
            return Err(TileviewError::Canvas(format!("image {image} is detached")));
        }
        self.push(DrawOp::DrawImage {
            image: *image,
            src,
            dst,
        });
        Ok(())
    }
}

//! Viewport configuration passed explicitly into every paint and scroll call.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TileviewError};
use crate::types::{Point, Rect, TileCoordinate};

use super::zoom::zoom_scale;

/// Kind of document being viewed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    #[default]
    Text,
    Spreadsheet,
    Presentation,
    Drawing,
}

/// Form factor of the host; decides scroll bar visibility and the mobile slider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

/// Uniform page stack of a file-based (PDF-like) view, in core pixels at
/// the current zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileBasedLayout {
    pub part_width: f64,
    pub part_height: f64,
    /// Vertical gap between consecutive parts.
    pub gap: f64,
    pub parts: u32,
}

impl FileBasedLayout {
    /// Distance from one part's top to the next.
    pub fn part_stride(&self) -> f64 {
        (self.part_height + self.gap).round()
    }
}

/// Everything the painter and scroll engine need to know about the document
/// and the viewport it is shown in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub doc_type: DocType,
    pub platform: Platform,
    pub dpi_scale: f64,
    /// Right-to-left sheet; mirrors horizontal drawing and scrolling.
    pub rtl: bool,
    pub zoom: i32,
    pub min_zoom: i32,
    pub max_zoom: i32,
    pub part: i32,
    pub mode: i32,
    /// Document size in core pixels at `zoom`.
    pub document_size: Point,
    /// Frozen rows/columns extent in core pixels; zero when not split.
    pub split_pos: Point,
    pub tile_size: f64,
    pub file_based: Option<FileBasedLayout>,
    /// Writer page rectangles in document core pixels.
    pub page_rects: Vec<Rect>,
    /// Multi-page layout rectangles in canvas pixels.
    pub multi_page_rects: Vec<Rect>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            doc_type: DocType::Text,
            platform: Platform::Desktop,
            dpi_scale: 1.0,
            rtl: false,
            zoom: 10,
            min_zoom: 1,
            max_zoom: 18,
            part: 0,
            mode: 0,
            document_size: Point::ZERO,
            split_pos: Point::ZERO,
            tile_size: 256.0,
            file_based: None,
            page_rects: Vec::new(),
            multi_page_rects: Vec::new(),
        }
    }
}

impl ViewportConfig {
    /// Reject configurations the geometry code cannot work with.
    pub fn validate(&self) -> Result<()> {
        let size = self.document_size;
        if !size.x.is_finite() || !size.y.is_finite() || size.x < 0.0 || size.y < 0.0 {
            return Err(TileviewError::Config(format!(
                "document size must be finite and non-negative, got {}x{}",
                size.x, size.y
            )));
        }
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(TileviewError::Config(format!(
                "tile size must be positive, got {}",
                self.tile_size
            )));
        }
        if !self.dpi_scale.is_finite() || self.dpi_scale <= 0.0 {
            return Err(TileviewError::Config(format!(
                "dpi scale must be positive, got {}",
                self.dpi_scale
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(TileviewError::Config(format!(
                "min zoom {} exceeds max zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom < self.min_zoom || self.zoom > self.max_zoom {
            return Err(TileviewError::Config(format!(
                "zoom {} outside [{}, {}]",
                self.zoom, self.min_zoom, self.max_zoom
            )));
        }
        let split = self.split_pos;
        if !split.x.is_finite() || !split.y.is_finite() || split.x < 0.0 || split.y < 0.0 {
            return Err(TileviewError::Config("split position must be finite and non-negative".into()));
        }
        Ok(())
    }

    pub fn tile_size_point(&self) -> Point {
        Point::new(self.tile_size, self.tile_size)
    }

    /// DPI scale rounded for line widths and fonts; never below 1.
    pub fn rounded_dpi_scale(&self) -> f64 {
        self.dpi_scale.round().max(1.0)
    }

    pub fn is_spreadsheet(&self) -> bool {
        self.doc_type == DocType::Spreadsheet
    }

    pub fn is_desktop(&self) -> bool {
        self.platform == Platform::Desktop
    }

    /// Spreadsheets always carry a split-pane context, even with no split.
    pub fn pane_bounds_active(&self) -> bool {
        self.is_spreadsheet()
    }

    /// Mirroring only applies to right-to-left spreadsheets.
    pub fn mirror_tiles(&self) -> bool {
        self.rtl && self.is_spreadsheet()
    }

    /// Whether `coords` lies inside the document at its own zoom level.
    pub fn is_valid_tile(&self, coords: &TileCoordinate) -> bool {
        if coords.x < 0 || coords.y < 0 {
            return false;
        }
        let scale = zoom_scale(f64::from(coords.zoom), f64::from(self.zoom));
        let pos = coords.pos();
        pos.x <= self.document_size.x * scale && pos.y <= self.document_size.y * scale
    }
}

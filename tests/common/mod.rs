//! Common test utilities: fixture configs, tile stores and an engine harness.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use tileview::layout::{DocType, PaintContext, ViewportConfig};
use tileview::render::{MemoryTileStore, RecordingCanvas};
use tileview::replay::ReplayContainer;
use tileview::types::{Point, Tile, TileCoordinate};
use tileview::viewer::{ScrollEngine, ScrollOptions, ScrollScope};

pub const VIEW: Point = Point { x: 800.0, y: 600.0 };

// ============================================================================
// Configs
// ============================================================================

/// Desktop text document of `width` x `height` core pixels at zoom 10.
pub fn text_config(width: f64, height: f64) -> ViewportConfig {
    ViewportConfig {
        document_size: Point::new(width, height),
        ..ViewportConfig::default()
    }
}

/// Desktop spreadsheet with frozen rows/columns up to `split`.
pub fn spreadsheet_config(width: f64, height: f64, split: Point) -> ViewportConfig {
    ViewportConfig {
        doc_type: DocType::Spreadsheet,
        document_size: Point::new(width, height),
        split_pos: split,
        ..ViewportConfig::default()
    }
}

// ============================================================================
// Tiles
// ============================================================================

/// Store holding loaded tiles; `(x, y, zoom, image id)`.
pub fn store_with(tiles: &[(i64, i64, i32, u64)]) -> MemoryTileStore<u64> {
    let mut store = MemoryTileStore::new(tiles.len().max(1));
    for &(x, y, zoom, image) in tiles {
        store.insert(Tile::ready(TileCoordinate::new(x, y, zoom, 0, 0), image));
    }
    store
}

/// Store with every tile of a `columns` x `rows` grid at `zoom`, numbered
/// row by row from 1.
pub fn grid_store(columns: i64, rows: i64, zoom: i32) -> MemoryTileStore<u64> {
    let mut tiles = Vec::new();
    let mut image = 1;
    for j in 0..rows {
        for i in 0..columns {
            tiles.push((i * 256, j * 256, zoom, image));
            image += 1;
        }
    }
    store_with(&tiles)
}

pub fn context_at(config: &ViewportConfig, top_left: Point) -> PaintContext {
    PaintContext::new(config, top_left, VIEW, VIEW, None)
}

pub fn canvas() -> RecordingCanvas {
    RecordingCanvas::new(VIEW.x, VIEW.y)
}

// ============================================================================
// Scroll engine harness
// ============================================================================

/// A scroll engine over an 800x600 canvas with a recording container.
pub struct EngineFixture {
    pub config: ViewportConfig,
    pub container: ReplayContainer,
    pub engine: ScrollEngine,
}

impl EngineFixture {
    pub fn new(config: ViewportConfig) -> Self {
        Self::with_options(config, ScrollOptions::default())
    }

    pub fn with_options(config: ViewportConfig, options: ScrollOptions) -> Self {
        let mut engine = ScrollEngine::new(options);
        engine.initialize(&config);
        engine.resize(VIEW);
        Self {
            config,
            container: ReplayContainer::with_size(VIEW),
            engine,
        }
    }

    /// Run `f` against the engine at time `now`.
    pub fn at<R>(&mut self, now: f64, f: impl FnOnce(&mut ScrollEngine, &mut ScrollScope<'_>) -> R) -> R {
        let mut scope = ScrollScope::new(&self.config, &mut self.container, now);
        f(&mut self.engine, &mut scope)
    }

    pub fn offset(&self) -> Point {
        self.engine.offset()
    }
}

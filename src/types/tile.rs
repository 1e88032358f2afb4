use serde::{Deserialize, Serialize};

use super::coord::TileCoordinate;

/// Lifecycle of a tile in the store.
///
/// `Partial` means the bitmap is stale and a delta is on its way; it still
/// draws. Invalidation moves `Ready` back to `Partial`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    #[default]
    Missing,
    Requested,
    Partial,
    Ready,
}

/// Counters shown by the debug overlay. Never read by the paint logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDebugCounters {
    pub wire_id: u64,
    pub invalid_from: u64,
    pub view_id: i32,
    pub load_count: u32,
    pub delta_count: u32,
    pub update_count: u32,
    pub invalidate_count: u32,
    pub missing_content: u32,
    pub gc_errors: u32,
    pub raw_delta_bytes: usize,
}

/// A tile owned by a [`TileStore`](crate::render::TileStore).
///
/// `B` is the bitmap type of the canvas backend the tile is drawn with.
#[derive(Debug, Clone)]
pub struct Tile<B> {
    pub coords: TileCoordinate,
    pub state: TileState,
    pub bitmap: Option<B>,
    pub debug: TileDebugCounters,
}

impl<B> Tile<B> {
    /// A tile with no content yet.
    pub fn new(coords: TileCoordinate) -> Self {
        Self {
            coords,
            state: TileState::Missing,
            bitmap: None,
            debug: TileDebugCounters::default(),
        }
    }

    /// A fully loaded tile.
    pub fn ready(coords: TileCoordinate, bitmap: B) -> Self {
        let mut tile = Self::new(coords);
        tile.load(bitmap);
        tile
    }

    pub fn mark_requested(&mut self) {
        if self.state == TileState::Missing {
            self.state = TileState::Requested;
        }
    }

    /// Full keyframe arrived.
    pub fn load(&mut self, bitmap: B) {
        self.bitmap = Some(bitmap);
        self.state = TileState::Ready;
        self.debug.load_count = self.debug.load_count.saturating_add(1);
    }

    /// Delta applied on top of the current bitmap.
    pub fn apply_delta(&mut self, bitmap: B, raw_len: usize) {
        if self.bitmap.is_none() {
            self.debug.missing_content = self.debug.missing_content.saturating_add(1);
        }
        self.bitmap = Some(bitmap);
        self.state = TileState::Ready;
        self.debug.delta_count = self.debug.delta_count.saturating_add(1);
        self.debug.update_count = self.debug.update_count.saturating_add(1);
        self.debug.raw_delta_bytes = self.debug.raw_delta_bytes.saturating_add(raw_len);
    }

    /// Content went stale; keep drawing the old bitmap until a delta lands.
    pub fn invalidate(&mut self) {
        self.debug.invalidate_count = self.debug.invalidate_count.saturating_add(1);
        self.debug.invalid_from = self.debug.wire_id;
        self.state = match self.state {
            TileState::Ready | TileState::Partial => TileState::Partial,
            other => other,
        };
    }

    pub fn has_content(&self) -> bool {
        self.bitmap.is_some() && matches!(self.state, TileState::Partial | TileState::Ready)
    }

    pub fn needs_fetch(&self) -> bool {
        self.state != TileState::Ready
    }

    pub fn is_ready_to_draw(&self) -> bool {
        self.has_content()
    }
}

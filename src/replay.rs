//! Scenario replay against a recording canvas.
//!
//! A scenario is a JSON document holding a configuration, the tiles that are
//! present and a list of timestamped steps. Replaying it drives a
//! [`ViewportSession`] exactly like the browser surface does, with a
//! [`ReplayContainer`] standing in for the page.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TileviewError};
use crate::layout::{ViewportConfig, ZoomFrame};
use crate::render::{DrawOp, FrameOutcome, MemoryTileStore, PainterOptions, RecordingCanvas};
use crate::types::{round_i64, Point, Tile, TileCoordinate};
use crate::viewer::{
    AnchorSection, AnimationClock, AnimationOptions, Axis, Container, Cursor, InputEvent, ScrollGeometry,
    ScrollOptions, ScrollState, ViewportSession,
};

/// Browser line height in CSS pixels.
pub const DEFAULT_LINE_HEIGHT: f64 = 16.0;

/// [`Container`] with an explicit frame clock and call counters.
#[derive(Debug, Clone)]
pub struct ReplayContainer {
    pub anchor: AnchorSection,
    pub clock: AnimationClock,
    pub drawing_allowed: bool,
    pub dragging: bool,
    pub zoom_changed: bool,
    pub in_zoom_animation: bool,
    pub line_height: f64,
    pub cursor: Cursor,
    pub redraws: usize,
    pub stop_animating_calls: usize,
    pub animations_started: Vec<AnimationOptions>,
    pub offset_updates: Vec<Point>,
}

impl ReplayContainer {
    pub fn new(anchor: AnchorSection) -> Self {
        Self {
            anchor,
            clock: AnimationClock::new(),
            drawing_allowed: true,
            dragging: false,
            zoom_changed: false,
            in_zoom_animation: false,
            line_height: DEFAULT_LINE_HEIGHT,
            cursor: Cursor::Default,
            redraws: 0,
            stop_animating_calls: 0,
            animations_started: Vec::new(),
            offset_updates: Vec::new(),
        }
    }

    /// Anchor at the origin covering `size`.
    pub fn with_size(size: Point) -> Self {
        Self::new(AnchorSection::new(Point::ZERO, size))
    }
}

impl Container for ReplayContainer {
    fn document_anchor(&self) -> AnchorSection {
        self.anchor
    }

    fn is_dragging_something(&self) -> bool {
        self.dragging
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn stop_animating(&mut self) {
        self.stop_animating_calls += 1;
        self.clock.stop();
    }

    fn start_animating(&mut self, options: AnimationOptions) -> bool {
        let started = self.clock.start(options);
        if started {
            self.animations_started.push(options);
        }
        started
    }

    fn reset_animation(&mut self) {
        self.clock.reset();
    }

    fn is_animating(&self) -> bool {
        self.clock.is_running()
    }

    fn is_zoom_changed(&self) -> bool {
        self.zoom_changed
    }

    fn is_in_zoom_animation(&self) -> bool {
        self.in_zoom_animation
    }

    fn drawing_allowed(&self) -> bool {
        self.drawing_allowed
    }

    fn scroll_line_height(&self) -> f64 {
        self.line_height
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn on_scroll_offset_updated(&mut self, offset: Point) {
        self.offset_updates.push(offset);
    }
}

/// A tile present before the first step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    pub x: i64,
    pub y: i64,
    /// Defaults to the configured zoom.
    #[serde(default)]
    pub zoom: Option<i32>,
    #[serde(default)]
    pub part: i32,
    #[serde(default)]
    pub mode: i32,
    /// `false` leaves the tile requested but without a bitmap.
    #[serde(default = "default_loaded")]
    pub loaded: bool,
}

fn default_loaded() -> bool {
    true
}

/// One timestamped action. Input frames (`{"type": "frame"}`) paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScenarioStep {
    Input { event: InputEvent },
    Resize { width: f64, height: f64 },
    SetDrawingAllowed { allowed: bool },
    SetDragging { dragging: bool },
    BeginZoom { frame: ZoomFrame },
    UpdateZoom { frame: ZoomFrame },
    EndZoom { zoom: i32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub config: ViewportConfig,
    pub painter: PainterOptions,
    pub scroll: ScrollOptions,
    pub canvas_size: Point,
    /// Defaults to the whole canvas.
    pub anchor: Option<AnchorSection>,
    pub line_height: f64,
    pub tiles: Vec<TileSpec>,
    /// Load every tile covering the document at the configured zoom.
    pub fill_document: bool,
    pub steps: Vec<ScenarioStep>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            config: ViewportConfig::default(),
            painter: PainterOptions::default(),
            scroll: ScrollOptions::default(),
            canvas_size: Point::new(800.0, 600.0),
            anchor: None,
            line_height: DEFAULT_LINE_HEIGHT,
            tiles: Vec::new(),
            fill_document: false,
            steps: Vec::new(),
        }
    }
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas_size.x <= 0.0 || self.canvas_size.y <= 0.0 {
            return Err(TileviewError::Scenario(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_size.x, self.canvas_size.y
            )));
        }
        if self.line_height <= 0.0 {
            return Err(TileviewError::Scenario("line height must be positive".to_string()));
        }
        let tile_size = round_i64(self.config.tile_size).max(1);
        if let Some(tile) = self
            .tiles
            .iter()
            .find(|t| t.x.rem_euclid(tile_size) != 0 || t.y.rem_euclid(tile_size) != 0)
        {
            return Err(TileviewError::Scenario(format!(
                "tile at ({}, {}) is not aligned to the {tile_size}px grid",
                tile.x, tile.y
            )));
        }
        self.config.validate()
    }

    /// Tile store holding the scenario's tiles; bitmaps are numbered from 1.
    pub fn tile_store(&self) -> MemoryTileStore<u64> {
        let mut coords: Vec<(TileCoordinate, bool)> = self
            .tiles
            .iter()
            .map(|t| {
                let zoom = t.zoom.unwrap_or(self.config.zoom);
                (TileCoordinate::new(t.x, t.y, zoom, t.part, t.mode), t.loaded)
            })
            .collect();
        if self.fill_document {
            coords.extend(document_tiles(&self.config).into_iter().map(|c| (c, true)));
        }

        let mut store = MemoryTileStore::new(coords.len().max(1));
        for (bitmap, (coords, loaded)) in (1_u64..).zip(coords) {
            let tile = if loaded {
                Tile::ready(coords, bitmap)
            } else {
                let mut tile = Tile::new(coords);
                tile.mark_requested();
                tile
            };
            store.insert(tile);
        }
        store
    }
}

/// Coordinates of every tile covering the document at the configured zoom.
fn document_tiles(config: &ViewportConfig) -> Vec<TileCoordinate> {
    let tile = config.tile_size_point();
    if tile.x <= 0.0 || tile.y <= 0.0 {
        return Vec::new();
    }
    let columns = round_i64((config.document_size.x / tile.x).ceil());
    let rows = round_i64((config.document_size.y / tile.y).ceil());
    (0..rows)
        .flat_map(|j| (0..columns).map(move |i| (i, j)))
        .filter_map(|(i, j)| TileCoordinate::from_index(i, j, tile, config.zoom, config.part, config.mode))
        .collect()
}

/// Ops and outcome of one painted frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub now: f64,
    pub outcome: FrameOutcome,
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub offset: Point,
    pub state: ScrollState,
    pub vertical: ScrollGeometry,
    pub horizontal: ScrollGeometry,
    pub cursor: Cursor,
    pub redraws: usize,
    pub stop_animating_calls: usize,
    pub offset_updates: Vec<Point>,
    pub frames: Vec<FrameRecord>,
}

/// Drives a session through scenario steps.
pub struct Replay {
    pub session: ViewportSession,
    pub container: ReplayContainer,
    pub canvas: RecordingCanvas,
    pub tiles: MemoryTileStore<u64>,
    pub frames: Vec<FrameRecord>,
}

impl Replay {
    pub fn new(scenario: &Scenario) -> Result<Self> {
        scenario.validate()?;
        let mut session = ViewportSession::new(
            scenario.config.clone(),
            scenario.painter.clone(),
            scenario.scroll.clone(),
        )?;
        session.resize(scenario.canvas_size);

        let anchor = scenario
            .anchor
            .unwrap_or_else(|| AnchorSection::new(Point::ZERO, scenario.canvas_size));
        let mut container = ReplayContainer::new(anchor);
        container.line_height = scenario.line_height;

        Ok(Self {
            session,
            container,
            canvas: RecordingCanvas::new(scenario.canvas_size.x, scenario.canvas_size.y),
            tiles: scenario.tile_store(),
            frames: Vec::new(),
        })
    }

    pub fn run(&mut self, steps: &[ScenarioStep]) {
        for step in steps {
            self.step(step);
        }
    }

    pub fn step(&mut self, step: &ScenarioStep) {
        match step {
            ScenarioStep::Input {
                event: InputEvent::Frame { now },
            } => {
                self.frame(*now);
            }
            ScenarioStep::Input { event } => {
                self.session.poll_timers(&mut self.container, event.now());
                self.session.handle_input(&mut self.container, event);
            }
            ScenarioStep::Resize { width, height } => {
                let size = Point::new(*width, *height);
                self.canvas.resize(size.x, size.y);
                self.container.anchor = AnchorSection::new(self.container.anchor.top_left, size);
                self.session.resize(size);
            }
            ScenarioStep::SetDrawingAllowed { allowed } => self.container.drawing_allowed = *allowed,
            ScenarioStep::SetDragging { dragging } => self.container.dragging = *dragging,
            ScenarioStep::BeginZoom { frame } => {
                self.session.begin_zoom_animation(&mut self.container, *frame);
            }
            ScenarioStep::UpdateZoom { frame } => self.session.update_zoom_frame(*frame),
            ScenarioStep::EndZoom { zoom } => {
                self.container.zoom_changed = self.session.config().zoom != *zoom;
                self.session.end_zoom_animation(*zoom);
            }
        }
    }

    /// Poll timers, then paint one frame at `now`.
    pub fn frame(&mut self, now: f64) -> FrameOutcome {
        self.session.poll_timers(&mut self.container, now);
        let timing = self.container.clock.tick(now);
        let outcome = self
            .session
            .on_frame(&mut self.canvas, &self.tiles, &mut self.container, now, timing);
        self.container.zoom_changed = false;
        self.frames.push(FrameRecord {
            now,
            outcome,
            ops: self.canvas.take_ops(),
        });
        outcome
    }

    pub fn report(mut self) -> ReplayReport {
        let vertical = self.session.scroll_geometry(&mut self.container, Axis::Vertical);
        let horizontal = self.session.scroll_geometry(&mut self.container, Axis::Horizontal);
        ReplayReport {
            offset: self.session.offset(),
            state: self.session.engine().state(),
            vertical,
            horizontal,
            cursor: self.container.cursor,
            redraws: self.container.redraws,
            stop_animating_calls: self.container.stop_animating_calls,
            offset_updates: self.container.offset_updates,
            frames: self.frames,
        }
    }
}

/// Replay a whole scenario and report where it ended up.
pub fn replay(scenario: &Scenario) -> Result<ReplayReport> {
    let mut replay = Replay::new(scenario)?;
    replay.run(&scenario.steps);
    tracing::debug!(frames = replay.frames.len(), "scenario replayed");
    Ok(replay.report())
}

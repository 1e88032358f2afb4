//! The layout and scheduling substrate the viewport lives in.

use serde::{Deserialize, Serialize};

use crate::types::{Bounds, Point};

/// Canvas region the document is drawn into, in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorSection {
    pub top_left: Point,
    pub size: Point,
}

impl AnchorSection {
    pub const fn new(top_left: Point, size: Point) -> Self {
        Self { top_left, size }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin_size(self.top_left, self.size)
    }

    /// Inclusive of the top-left edge, exclusive of the bottom-right.
    pub fn contains(&self, point: Point) -> bool {
        let max = self.top_left + self.size;
        point.x >= self.top_left.x && point.y >= self.top_left.y && point.x < max.x && point.y < max.y
    }
}

/// Mouse cursor requested by the scroll bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
        }
    }
}

/// Options for [`Container::start_animating`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationOptions {
    /// Length of the animation in ms. `None` runs until stopped.
    pub duration: Option<f64>,
}

/// Timing of one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTiming {
    /// Frames since the animation started; negative outside an animation.
    pub frame_count: i64,
    /// Milliseconds since the animation started.
    pub elapsed: f64,
    /// Frame duration relative to a 60 Hz frame.
    pub frame_time_ratio: f64,
    /// Last frame of a finite animation.
    pub finished: bool,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self {
            frame_count: -1,
            elapsed: 0.0,
            frame_time_ratio: 1.0,
            finished: false,
        }
    }
}

/// Services the painter and the scroll engine consume from their host.
///
/// All methods are called from the frame or event handler of a single
/// viewport; none of them may re-enter the session.
pub trait Container {
    /// Where the document is drawn on the canvas.
    fn document_anchor(&self) -> AnchorSection;

    fn section_includes_point(&self, section: &AnchorSection, point: Point) -> bool {
        section.contains(point)
    }

    /// A pointer drag is in progress anywhere on the canvas.
    fn is_dragging_something(&self) -> bool;

    fn request_redraw(&mut self);

    fn stop_animating(&mut self);

    /// Start the frame clock. Returns false when it could not be started.
    fn start_animating(&mut self, options: AnimationOptions) -> bool;

    /// Restart the running animation from frame zero.
    fn reset_animation(&mut self);

    fn is_animating(&self) -> bool;

    /// The zoom level changed since the tiles on screen were painted.
    fn is_zoom_changed(&self) -> bool;

    fn is_in_zoom_animation(&self) -> bool;

    /// False while the host cannot redraw, e.g. before the first layout.
    fn drawing_allowed(&self) -> bool;

    /// Height of one wheel "line" in CSS pixels.
    fn scroll_line_height(&self) -> f64;

    fn set_cursor(&mut self, cursor: Cursor);

    /// Called with the new document offset after every applied scroll.
    fn on_scroll_offset_updated(&mut self, offset: Point);
}

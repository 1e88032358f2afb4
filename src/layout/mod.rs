//! Viewport geometry shared by the painter and the scroll engine.
//!
//! This module handles:
//! - The explicit viewport configuration value
//! - Zoom level arithmetic
//! - Split-pane bounds for frozen rows and columns
//! - The per-frame paint context
//! - Tile enumeration for file-based page stacks

mod config;
mod pages;
mod paint_context;
mod panes;
pub mod zoom;

pub use config::{DocType, FileBasedLayout, Platform, ViewportConfig};
pub use pages::PageLayoutQuery;
pub use paint_context::{PaintContext, ZoomFrame};
pub use panes::{max_pane_min, pane_bounds_list, pane_freeze, PaneFreeze};

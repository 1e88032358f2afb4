//! Core value types shared by the painter and the scroll engine.

mod coord;
mod geometry;
mod tile;

pub use coord::*;
pub use geometry::*;
pub use tile::*;

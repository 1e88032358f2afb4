//! Zoom level arithmetic. Each integer zoom step scales by 1.2.

/// Zoom level at which one core pixel maps to one document pixel.
pub const DEFAULT_ZOOM: f64 = 10.0;

/// Multiplicative scale between adjacent zoom levels.
pub const ZOOM_STEP_FACTOR: f64 = 1.2;

/// Scale that converts lengths at zoom `from` into lengths at zoom `to`.
pub fn zoom_scale(to: f64, from: f64) -> f64 {
    ZOOM_STEP_FACTOR.powf(to - from)
}

/// Zoom reached from `from` by applying `scale`. Inverse of [`zoom_scale`].
pub fn scale_zoom(scale: f64, from: f64) -> f64 {
    from + scale.ln() / ZOOM_STEP_FACTOR.ln()
}

/// Absolute scale of `zoom` relative to [`DEFAULT_ZOOM`].
pub fn zoom_to_factor(zoom: f64) -> f64 {
    zoom_scale(zoom, DEFAULT_ZOOM)
}

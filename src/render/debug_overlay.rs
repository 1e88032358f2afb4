//! Per-tile debug overlay and the missing-tile checkerboard.
//!
//! Only paints; never touches tile state.

use super::backend::Canvas;
use super::colors::palette;
use crate::types::{Rect, Tile};

/// Nominal tile edge the overlay is laid out for.
const OVERLAY_TILE_SIZE: f64 = 256.0;
const CHECKER_SIZE: f64 = 32.0;
const SWATCH_SIZE: f64 = 12.0;
const HISTOGRAM_CELL: f64 = 4.0;
/// `(OVERLAY_TILE_SIZE - 16) / HISTOGRAM_CELL`
const HISTOGRAM_ROW_CELLS: u32 = 60;
const LINE_HEIGHT: f64 = 12.0;

/// Checkerboard for the part `src` of a tile that has no bitmap, at `dst`.
pub fn draw_checkerboard<C: Canvas>(canvas: &mut C, src: Rect, dst: Rect) {
    canvas.save();
    canvas.clip_rect(dst);
    let (ox, oy) = (dst.x - src.x, dst.y - src.y);
    let mut dark_row = true;
    let mut y = 0.0;
    while y < OVERLAY_TILE_SIZE {
        let mut dark = dark_row;
        let mut x = 0.0;
        while x < OVERLAY_TILE_SIZE {
            let square = Rect::new(ox + x, oy + y, CHECKER_SIZE, CHECKER_SIZE);
            if overlaps(&square, &dst) {
                canvas.set_fill_style(if dark {
                    palette::CHECKERBOARD_DARK
                } else {
                    palette::CHECKERBOARD_LIGHT
                });
                canvas.fill_rect(square);
            }
            dark = !dark;
            x += CHECKER_SIZE;
        }
        dark_row = !dark_row;
        y += CHECKER_SIZE;
    }
    canvas.restore();
}

/// Border, status swatch, delta histogram and counters of `tile`, drawn
/// inside the blitted region.
pub fn draw_tile_overlay<C: Canvas, B>(canvas: &mut C, tile: &Tile<B>, src: Rect, dst: Rect) {
    canvas.save();
    canvas.clip_rect(dst);

    // Lay out against the whole tile; clipping hides what is not visible.
    let x0 = dst.x - src.x;
    let y0 = dst.y - src.y;

    canvas.set_line_width(1.0);
    canvas.set_stroke_style(palette::DEBUG_TILE_BORDER);
    canvas.begin_path();
    canvas.move_to(x0 + 0.5, y0 + 0.5);
    canvas.line_to(x0 + 0.5, y0 + OVERLAY_TILE_SIZE + 0.5);
    canvas.line_to(x0 + OVERLAY_TILE_SIZE + 0.5, y0 + OVERLAY_TILE_SIZE + 0.5);
    canvas.line_to(x0 + OVERLAY_TILE_SIZE + 0.5, y0 + 0.5);
    canvas.line_to(x0 + 0.5, y0 + 0.5);
    canvas.stroke();

    let status = if !tile.has_content() {
        palette::DEBUG_NO_CONTENT
    } else if tile.needs_fetch() {
        palette::DEBUG_NEEDS_FETCH
    } else {
        palette::DEBUG_READY
    };
    canvas.set_fill_style(status);
    canvas.fill_rect(Rect::new(x0 + 1.5, y0 + 1.5, SWATCH_SIZE, SWATCH_SIZE));

    let debug = &tile.debug;
    if debug.delta_count > 0 {
        let hx = x0 + 1.5 + SWATCH_SIZE + 2.0;
        let hy = y0 + 1.5;
        canvas.set_fill_style(palette::DEBUG_DELTAS);
        draw_histogram(canvas, hx, hy, debug.delta_count, 0);
        canvas.set_fill_style(palette::DEBUG_UPDATES);
        draw_histogram(canvas, hx, hy, debug.update_count, debug.delta_count);
    }

    #[allow(clippy::cast_precision_loss)] // byte counts shown to two decimals
    let delta_kb = debug.raw_delta_bytes as f64 / 1024.0;
    let lines = [
        format!("wireId: {}", debug.wire_id),
        format!("invalidFrom: {}", debug.invalid_from),
        format!("nviewid: {}", debug.view_id),
        format!("invalidates: {}", debug.invalidate_count),
        format!(
            "tile: {} \u{394}: {} upd: {}",
            debug.load_count, debug.delta_count, debug.update_count
        ),
        format!("misses: {} gce: {}", debug.missing_content, debug.gc_errors),
        format!("dlta size/kB: {delta_kb:.2}"),
    ];
    #[allow(clippy::cast_precision_loss)]
    let block = LINE_HEIGHT * lines.len() as f64;
    let start_y = OVERLAY_TILE_SIZE - block;

    canvas.set_fill_style(palette::DEBUG_TEXT_BACKGROUND);
    canvas.fill_rect(Rect::new(x0 + 1.5, y0 + start_y - LINE_HEIGHT, 100.0, block + 8.0));

    canvas.set_font("12px sans");
    canvas.set_fill_style(palette::BLACK);
    let mut y = y0 + start_y;
    for line in &lines {
        canvas.fill_text(line, x0 + 5.5, y, None);
        y += LINE_HEIGHT;
    }

    canvas.restore();
}

/// Bar of `value` cells after `offset` already-filled cells, wrapping into
/// rows beside the status swatch.
fn draw_histogram<C: Canvas>(canvas: &mut C, x: f64, y: f64, value: u32, offset: u32) {
    let max_cells = HISTOGRAM_ROW_CELLS;
    let row_skip = offset / max_cells;
    let y = y + f64::from(row_skip) * HISTOGRAM_CELL;
    let offset = offset - row_skip * max_cells;

    let first_row = value.min(max_cells - offset);
    if first_row > 0 {
        canvas.fill_rect(Rect::new(
            x + f64::from(offset) * HISTOGRAM_CELL,
            y,
            f64::from(first_row) * HISTOGRAM_CELL,
            HISTOGRAM_CELL,
        ));
    }

    let rest = value - first_row;
    let full_rows = rest / max_cells;
    if full_rows > 0 {
        canvas.fill_rect(Rect::new(
            x,
            y + HISTOGRAM_CELL,
            f64::from(max_cells) * HISTOGRAM_CELL,
            f64::from(full_rows) * HISTOGRAM_CELL,
        ));
    }

    let last_row = rest % max_cells;
    if last_row > 0 {
        canvas.fill_rect(Rect::new(
            x,
            y + f64::from(full_rows) * HISTOGRAM_CELL + HISTOGRAM_CELL,
            f64::from(last_row) * HISTOGRAM_CELL,
            HISTOGRAM_CELL,
        ));
    }
}

fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

//! Page backgrounds drawn beneath the tiles.

use super::backend::Canvas;
use super::colors::palette;
use super::painter::TilePainter;
use crate::layout::{DocType, FileBasedLayout, PaintContext, ViewportConfig};
use crate::types::{Bounds, Rect};

impl TilePainter {
    /// Page rectangles for file-based, multi-page and text documents.
    ///
    /// Other document kinds have no page backgrounds.
    pub fn draw_page_backgrounds<C: Canvas>(
        &self,
        canvas: &mut C,
        config: &ViewportConfig,
        ctx: &PaintContext,
    ) {
        let multi_page = !config.multi_page_rects.is_empty();
        if config.file_based.is_none() && !multi_page && config.doc_type != DocType::Text {
            return;
        }

        let dpi = config.rounded_dpi_scale();
        canvas.set_fill_style(palette::PAGE_TEXT);
        canvas.set_stroke_style(palette::PAGE_BORDER);
        canvas.set_line_width(dpi);
        canvas.set_font(&format!("{}px {}", 40.0 * dpi, self.options().page_font_family));

        if let Some(layout) = &config.file_based {
            draw_file_based_pages(canvas, layout, &ctx.view_bounds);
        } else if multi_page {
            canvas.set_fill_style(&self.options().document_background_color);
            for rect in &config.multi_page_rects {
                canvas.stroke_rect(*rect);
                canvas.fill_rect(*rect);
            }
        } else {
            self.draw_text_pages(canvas, config, &ctx.view_bounds);
        }
    }

    fn draw_text_pages<C: Canvas>(&self, canvas: &mut C, config: &ViewportConfig, view: &Bounds) {
        let top = view.min.y;
        let bottom = view.max.y;
        let inside = |y: f64| y > top && y < bottom;

        canvas.set_fill_style(&self.options().document_background_color);
        for page in &config.page_rects {
            let page_bottom = page.y + page.height;
            let spans_view = page.y < top && page_bottom > bottom;
            if !(inside(page.y) || inside(page_bottom) || spans_view) {
                continue;
            }
            canvas.fill_rect(Rect::new(
                page.x.round() - view.min.x,
                page.y.round() - view.min.y,
                page.width.round(),
                page.height.round(),
            ));
        }
    }
}

/// Bordered, numbered pages of a uniform page stack.
fn draw_file_based_pages<C: Canvas>(canvas: &mut C, layout: &FileBasedLayout, view: &Bounds) {
    let stride = layout.part_stride();
    if stride.is_nan() || stride <= 0.0 || layout.parts == 0 {
        return;
    }
    let last_part = f64::from(layout.parts) - 1.0;
    let top = (view.min.y / stride).floor().max(0.0);
    let bottom = (view.max.y / stride).ceil().min(last_part);

    let width = layout.part_width.round();
    let height = layout.part_height.round();
    let mut start_y = stride * top;
    let mut page = top;
    while page <= bottom {
        let rect = Rect::new(-view.min.x, start_y - view.min.y, width, height);
        canvas.stroke_rect(rect);
        canvas.fill_text(
            &format!("{}", page + 1.0),
            (width * 0.5).round() - view.min.x,
            ((2.0 * start_y + height) * 0.5).round() - view.min.y,
            Some(width * 0.4),
        );
        start_y += stride;
        page += 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawOp, RecordingCanvas};
    use crate::types::Point;

    fn ctx_at(config: &ViewportConfig, top: f64) -> PaintContext {
        PaintContext::new(config, Point::new(0.0, top), Point::new(800.0, 600.0), Point::new(800.0, 600.0), None)
    }

    #[test]
    fn test_text_pages_intersecting_view_are_filled() {
        let config = ViewportConfig {
            page_rects: vec![
                Rect::new(0.0, 0.0, 700.0, 900.0),
                Rect::new(0.0, 1000.0, 700.0, 900.0),
                Rect::new(0.0, 2000.0, 700.0, 900.0),
            ],
            ..ViewportConfig::default()
        };
        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        TilePainter::default().draw_page_backgrounds(&mut canvas, &config, &ctx_at(&config, 800.0));
        let fills: Vec<Rect> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![Rect::new(0.0, -800.0, 700.0, 900.0), Rect::new(0.0, 200.0, 700.0, 900.0)]);
    }

    #[test]
    fn test_spreadsheet_has_no_page_backgrounds() {
        let config = ViewportConfig {
            doc_type: DocType::Spreadsheet,
            page_rects: vec![Rect::new(0.0, 0.0, 100.0, 100.0)],
            ..ViewportConfig::default()
        };
        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        TilePainter::default().draw_page_backgrounds(&mut canvas, &config, &ctx_at(&config, 0.0));
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_file_based_pages_are_numbered_from_top_visible() {
        let config = ViewportConfig {
            doc_type: DocType::Drawing,
            file_based: Some(FileBasedLayout {
                part_width: 600.0,
                part_height: 800.0,
                gap: 200.0,
                parts: 5,
            }),
            ..ViewportConfig::default()
        };
        let mut canvas = RecordingCanvas::new(800.0, 600.0);
        TilePainter::default().draw_page_backgrounds(&mut canvas, &config, &ctx_at(&config, 1500.0));
        let labels: Vec<&str> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["2", "3", "4"]);
    }
}

//! Direct Canvas2D output for hosts that draw the overlay themselves.

use pano_core::{DrawStyle, Point};
use pano_render::DrawingSink;
use web_sys::CanvasRenderingContext2d;

pub struct Canvas2dSink<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> Canvas2dSink<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn circle(&self, p: Point, style: &DrawStyle) {
        let ctx = self.ctx;
        ctx.begin_path();
        let _ = ctx.arc(p.x, p.y, style.handle_radius, 0.0, std::f64::consts::TAU);
        if let Some(fill) = &style.fill {
            ctx.set_fill_style_str(fill);
            ctx.fill();
        }
        ctx.set_stroke_style_str(&style.color);
        ctx.set_line_width(style.width);
        ctx.stroke();
    }
}

impl DrawingSink for Canvas2dSink<'_> {
    fn draw_polyline(&mut self, _id: &str, points: &[Point], style: &DrawStyle) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let ctx = self.ctx;
        ctx.save();
        ctx.begin_path();
        ctx.move_to(first.x, first.y);
        for p in rest {
            ctx.line_to(p.x, p.y);
        }
        ctx.set_stroke_style_str(&style.color);
        ctx.set_line_width(style.width);
        ctx.stroke();
        ctx.restore();
    }

    fn draw_handles(&mut self, _id: &str, points: &[Point], style: &DrawStyle) {
        self.ctx.save();
        for &p in points {
            self.circle(p, style);
        }
        self.ctx.restore();
    }

    fn draw_handle(&mut self, _id: &str, point: Point, style: &DrawStyle) {
        self.ctx.save();
        self.circle(point, style);
        self.ctx.restore();
    }

    fn draw_text_box(&mut self, _id: &str, lines: &[String], anchor: Point, style: &DrawStyle) {
        let ctx = self.ctx;
        let line_height = style.font_size * 1.2;
        ctx.save();
        ctx.set_font(&format!("{}px sans-serif", style.font_size));
        ctx.set_text_baseline("top");
        ctx.set_text_align("left");

        let width = lines
            .iter()
            .filter_map(|l| ctx.measure_text(l).ok())
            .map(|m| m.width())
            .fold(0.0, f64::max);
        if let Some(bg) = &style.background {
            ctx.set_fill_style_str(bg);
            ctx.fill_rect(
                anchor.x,
                anchor.y,
                width + style.padding * 2.0,
                lines.len() as f64 * line_height + style.padding * 2.0,
            );
        }

        ctx.set_fill_style_str(&style.color);
        for (i, line) in lines.iter().enumerate() {
            let _ = ctx.fill_text(
                line,
                anchor.x + style.padding,
                anchor.y + style.padding + line_height * i as f64,
            );
        }
        ctx.restore();
    }
}

//! SVG overlay output: a `DrawingSink` that writes one `<svg>` document.
//!
//! Every element carries the primitive's id, so a host can diff or style
//! the overlay by id (`panorama-curve-<vp>-active`, `measure-label`, ...).

use pano_core::{DrawStyle, Point};
use pano_render::DrawingSink;
use std::fmt::Write;

/// Approximate glyph advance as a fraction of font size, for label boxes.
const CHAR_WIDTH_EM: f64 = 0.6;
const LINE_HEIGHT_EM: f64 = 1.2;

pub struct SvgSink {
    out: String,
}

impl SvgSink {
    pub fn new(width: f64, height: f64) -> Self {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        out.push('\n');
        Self { out }
    }

    /// Close the document and return it.
    pub fn finish(mut self) -> String {
        self.out.push_str("</svg>\n");
        self.out
    }

    fn circle(&mut self, id: Option<&str>, p: Point, style: &DrawStyle) {
        self.out.push_str("  <circle");
        if let Some(id) = id {
            let _ = write!(self.out, r#" id="{}""#, escape(id));
        }
        let _ = writeln!(
            self.out,
            r#" cx="{:.2}" cy="{:.2}" r="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            p.x,
            p.y,
            style.handle_radius,
            escape(style.fill.as_deref().unwrap_or("none")),
            escape(&style.color),
            style.width,
        );
    }
}

impl DrawingSink for SvgSink {
    fn draw_polyline(&mut self, id: &str, points: &[Point], style: &DrawStyle) {
        if points.is_empty() {
            return;
        }
        let coords: Vec<String> = points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect();
        let _ = writeln!(
            self.out,
            r#"  <polyline id="{}" points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            escape(id),
            coords.join(" "),
            escape(&style.color),
            style.width,
        );
    }

    fn draw_handles(&mut self, id: &str, points: &[Point], style: &DrawStyle) {
        let _ = writeln!(self.out, r#"  <g id="{}">"#, escape(id));
        for &p in points {
            self.out.push_str("  ");
            self.circle(None, p, style);
        }
        self.out.push_str("  </g>\n");
    }

    fn draw_handle(&mut self, id: &str, point: Point, style: &DrawStyle) {
        self.circle(Some(id), point, style);
    }

    fn draw_text_box(&mut self, id: &str, lines: &[String], anchor: Point, style: &DrawStyle) {
        let line_height = style.font_size * LINE_HEIGHT_EM;
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = longest as f64 * style.font_size * CHAR_WIDTH_EM + style.padding * 2.0;
        let height = lines.len() as f64 * line_height + style.padding * 2.0;

        let _ = writeln!(self.out, r#"  <g id="{}">"#, escape(id));
        if let Some(bg) = &style.background {
            let _ = writeln!(
                self.out,
                r#"    <rect x="{:.2}" y="{:.2}" width="{width:.2}" height="{height:.2}" fill="{}"/>"#,
                anchor.x,
                anchor.y,
                escape(bg),
            );
        }
        let _ = writeln!(
            self.out,
            r#"    <text fill="{}" font-size="{}px" font-family="sans-serif">"#,
            escape(&style.color),
            style.font_size,
        );
        let x = anchor.x + style.padding;
        for (i, line) in lines.iter().enumerate() {
            let y = anchor.y + style.padding + style.font_size + line_height * i as f64;
            let _ = writeln!(
                self.out,
                r#"      <tspan x="{x:.2}" y="{y:.2}">{}</tspan>"#,
                escape(line),
            );
        }
        self.out.push_str("    </text>\n  </g>\n");
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

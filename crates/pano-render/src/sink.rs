//! Drawing sink: where the curve tool sends its primitives.
//!
//! The tool never touches a display surface. Each render pass calls the sink
//! once per visible element; the host decides how to present it (SVG overlay,
//! Canvas2D, a recorded draw list for tests).

use pano_core::{DrawStyle, Point};
use serde::Serialize;
use smallvec::SmallVec;

/// Receiver for drawing primitives, addressed by element id.
pub trait DrawingSink {
    fn draw_polyline(&mut self, id: &str, points: &[Point], style: &DrawStyle);
    fn draw_handles(&mut self, id: &str, points: &[Point], style: &DrawStyle);
    fn draw_handle(&mut self, id: &str, point: Point, style: &DrawStyle);
    fn draw_text_box(&mut self, id: &str, lines: &[String], anchor: Point, style: &DrawStyle);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Primitive {
    Polyline {
        id: String,
        points: Vec<Point>,
        style: DrawStyle,
    },
    Handles {
        id: String,
        points: Vec<Point>,
        style: DrawStyle,
    },
    Handle {
        id: String,
        point: Point,
        style: DrawStyle,
    },
    TextBox {
        id: String,
        lines: SmallVec<[String; 2]>,
        anchor: Point,
        style: DrawStyle,
    },
}

impl Primitive {
    pub fn id(&self) -> &str {
        match self {
            Primitive::Polyline { id, .. }
            | Primitive::Handles { id, .. }
            | Primitive::Handle { id, .. }
            | Primitive::TextBox { id, .. } => id,
        }
    }
}

/// A sink that records every call in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawList {
    pub primitives: Vec<Primitive>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// First primitive drawn with this id.
    pub fn find(&self, id: &str) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.id() == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.primitives.iter().map(Primitive::id).collect()
    }

    /// Text lines of the first text box with this id.
    pub fn text_lines(&self, id: &str) -> Option<&[String]> {
        self.primitives.iter().find_map(|p| match p {
            Primitive::TextBox { id: pid, lines, .. } if pid == id => Some(lines.as_slice()),
            _ => None,
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.primitives).unwrap_or_else(|_| "[]".to_string())
    }

    /// Replay the recorded calls into another sink.
    pub fn replay(&self, sink: &mut dyn DrawingSink) {
        for p in &self.primitives {
            match p {
                Primitive::Polyline { id, points, style } => sink.draw_polyline(id, points, style),
                Primitive::Handles { id, points, style } => sink.draw_handles(id, points, style),
                Primitive::Handle { id, point, style } => sink.draw_handle(id, *point, style),
                Primitive::TextBox {
                    id,
                    lines,
                    anchor,
                    style,
                } => sink.draw_text_box(id, lines, *anchor, style),
            }
        }
    }
}

impl DrawingSink for DrawList {
    fn draw_polyline(&mut self, id: &str, points: &[Point], style: &DrawStyle) {
        self.primitives.push(Primitive::Polyline {
            id: id.to_string(),
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    fn draw_handles(&mut self, id: &str, points: &[Point], style: &DrawStyle) {
        self.primitives.push(Primitive::Handles {
            id: id.to_string(),
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    fn draw_handle(&mut self, id: &str, point: Point, style: &DrawStyle) {
        self.primitives.push(Primitive::Handle {
            id: id.to_string(),
            point,
            style: style.clone(),
        });
    }

    fn draw_text_box(&mut self, id: &str, lines: &[String], anchor: Point, style: &DrawStyle) {
        self.primitives.push(Primitive::TextBox {
            id: id.to_string(),
            lines: lines.iter().cloned().collect(),
            anchor,
            style: style.clone(),
        });
    }
}

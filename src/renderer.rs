// src/renderer.rs
use egui::Pos2;

use crate::stroke::{Segment, StrokeStyle, mirror_x};
use crate::surface::Surface;
use crate::tools::{SprayNozzle, ToolKind, ToolState};

/// The pointer-is-down state between stroke start and stroke end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSession {
    last_point: Pos2,
}

impl StrokeSession {
    pub fn begin(at: Pos2) -> Self {
        Self { last_point: at }
    }

    pub fn last_point(&self) -> Pos2 {
        self.last_point
    }

    /// Records `to` as the new last point and returns the segment walked.
    pub fn advance(&mut self, to: Pos2) -> Segment {
        let segment = Segment::new(self.last_point, to);
        self.last_point = to;
        segment
    }
}

/// Turns one pointer step into raster mutations according to the tool state.
#[derive(Debug, Default)]
pub struct StrokeRenderer {
    nozzle: SprayNozzle,
}

impl StrokeRenderer {
    pub fn new(nozzle: SprayNozzle) -> Self {
        Self { nozzle }
    }

    /// Renders the step from `segment.from()` to `segment.to()`.
    ///
    /// Brush, eraser and rainbow draw the segment itself; spray scatters dots
    /// around the end point. With symmetry on, each primitive is repeated at
    /// `surface.width() - x`. The rainbow hue advances once per call.
    pub fn render(&mut self, surface: &mut Surface, tools: &mut ToolState, segment: Segment) {
        let canvas_width = surface.width() as f32;

        match tools.tool {
            ToolKind::Brush => {
                let style = StrokeStyle::paint(tools.color, tools.size);
                draw_line(surface, segment, &style, tools.symmetry, canvas_width);
            }
            ToolKind::Eraser => {
                let style = StrokeStyle::erase(tools.size);
                draw_line(surface, segment, &style, tools.symmetry, canvas_width);
            }
            ToolKind::Rainbow => {
                let style = StrokeStyle::paint(tools.hue.color(), tools.size);
                draw_line(surface, segment, &style, tools.symmetry, canvas_width);
                tools.hue.advance();
            }
            ToolKind::Spray => {
                for dot in self.nozzle.scatter(segment.to(), tools.size) {
                    surface.plot_dot(dot, tools.color);
                    if tools.symmetry {
                        surface.plot_dot(mirror_x(dot, canvas_width), tools.color);
                    }
                }
            }
        }
    }
}

fn draw_line(
    surface: &mut Surface,
    segment: Segment,
    style: &StrokeStyle,
    symmetry: bool,
    canvas_width: f32,
) {
    surface.draw_segment(segment, style);
    if symmetry {
        surface.draw_segment(segment.mirrored(canvas_width), style);
    }
}

use egui::{Color32, Pos2, Rect};

/// How a primitive combines with the pixels already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Paint over existing pixels (source-over)
    Normal,
    /// Remove existing pixels, leaving them transparent (destination-out)
    Erase,
}

// Immutable description of how a primitive is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    color: Color32,
    width: f32,
    blend: BlendMode,
}

impl StrokeStyle {
    // Create a style that paints with the given color
    pub fn paint(color: Color32, width: f32) -> Self {
        Self {
            color,
            width,
            blend: BlendMode::Normal,
        }
    }

    // Create a style that clears pixels; the color is irrelevant
    pub fn erase(width: f32) -> Self {
        Self {
            color: Color32::BLACK,
            width,
            blend: BlendMode::Erase,
        }
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn blend(&self) -> BlendMode {
        self.blend
    }
}

/// A straight line between two explicit points. A segment with equal
/// endpoints is a single round dot once it is given a width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    from: Pos2,
    to: Pos2,
}

impl Segment {
    pub fn new(from: Pos2, to: Pos2) -> Self {
        Self { from, to }
    }

    pub fn dot(at: Pos2) -> Self {
        Self { from: at, to: at }
    }

    pub fn from(&self) -> Pos2 {
        self.from
    }

    pub fn to(&self) -> Pos2 {
        self.to
    }

    /// Reflects both endpoints across the vertical axis of a canvas `canvas_width` wide.
    pub fn mirrored(&self, canvas_width: f32) -> Self {
        Self {
            from: mirror_x(self.from, canvas_width),
            to: mirror_x(self.to, canvas_width),
        }
    }

    /// Shortest distance from `p` to any point on the segment.
    pub fn distance_to(&self, p: Pos2) -> f32 {
        let d = self.to - self.from;
        let len_sq = d.length_sq();
        if len_sq <= f32::EPSILON {
            return p.distance(self.from);
        }
        let t = ((p - self.from).dot(d) / len_sq).clamp(0.0, 1.0);
        p.distance(self.from + d * t)
    }

    /// Bounding box of the segment grown by `radius` on every side.
    pub fn bounds(&self, radius: f32) -> Rect {
        Rect::from_two_pos(self.from, self.to).expand(radius)
    }
}

// Reflect a point across the vertical center line: x becomes width - x
pub fn mirror_x(p: Pos2, canvas_width: f32) -> Pos2 {
    Pos2::new(canvas_width - p.x, p.y)
}

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::color::HuePhase;

mod spray;
pub use spray::{DEFAULT_DENSITY as SPRAY_DENSITY, SprayNozzle};

/// The brush tools the toolbar offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Rainbow,
    Spray,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [Self::Brush, Self::Rainbow, Self::Spray, Self::Eraser];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Brush => "Brush",
            Self::Eraser => "Eraser",
            Self::Rainbow => "Rainbow",
            Self::Spray => "Spray",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Brush => "🖌",
            Self::Eraser => "⌫",
            Self::Rainbow => "🌈",
            Self::Spray => "💨",
        }
    }
}

/// Everything the toolbar controls: which tool, which color, how wide,
/// whether strokes are mirrored, and where the rainbow hue currently is.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    pub tool: ToolKind,
    pub color: Color32,
    pub size: f32,
    pub symmetry: bool,
    pub hue: HuePhase,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            color: Color32::BLACK,
            size: 5.0,
            symmetry: false,
            hue: HuePhase::default(),
        }
    }
}

impl ToolState {
    pub fn toggle_symmetry(&mut self) -> bool {
        self.symmetry = !self.symmetry;
        self.symmetry
    }
}

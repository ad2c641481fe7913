#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod file_handler;
pub mod history;
pub mod input;
pub mod panels;
pub mod playback;
pub mod renderer;
pub mod sketchpad;
pub mod stroke;
pub mod surface;
pub mod texture;
pub mod tools;

pub use app::SketchApp;
pub use color::{HuePhase, hue_to_color};
pub use config::{ConfigError, SketchConfig};
pub use error::{ImportError, SnapshotError};
pub use history::{History, Snapshot};
pub use input::{InputEvent, InputLocation};
pub use playback::{Playback, PlaybackEvent};
pub use renderer::{StrokeRenderer, StrokeSession};
pub use sketchpad::Sketchpad;
pub use stroke::{BlendMode, Segment, StrokeStyle};
pub use surface::Surface;
pub use tools::{SprayNozzle, ToolKind, ToolState};

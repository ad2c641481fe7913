use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position relative to the canvas' top-left corner
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

/// Input, already translated into what the sketchpad understands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the canvas
    PointerDown { location: InputLocation },
    /// Pointer moved while over the canvas
    PointerMove { location: InputLocation },
    /// Primary button released
    PointerUp,
    /// Pointer left the canvas
    PointerLeave,
    Undo,
    Redo,
}

/// Pointer state for one frame, as read from egui
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerFrame {
    pub hover_pos: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
    /// The canvas widget has the pointer, with no other layer on top of it
    pub canvas_hovered: bool,
}

/// Handles converting raw egui input into our domain-specific InputEvents
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    was_in_canvas: bool,
    canvas_rect: Rect,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            was_in_canvas: false,
            canvas_rect,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Creates an InputLocation from a screen position
    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation {
            position: (pos - self.canvas_rect.min).to_pos2(),
            is_in_canvas: self.canvas_rect.contains(pos),
        }
    }

    /// Process raw egui input and generate our InputEvents.
    /// `canvas_hovered` comes from the canvas response, so pointer input over
    /// popups and other windows covering the canvas is not treated as drawing.
    pub fn process_input(&mut self, ctx: &Context, canvas_hovered: bool) -> Vec<InputEvent> {
        let (frame, keys) = ctx.input(|input| {
            let frame = PointerFrame {
                hover_pos: input.pointer.hover_pos(),
                pressed: input.pointer.button_pressed(PointerButton::Primary),
                released: input.pointer.button_released(PointerButton::Primary),
                canvas_hovered,
            };
            let keys: Vec<(Key, Modifiers)> = input
                .raw
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => Some((*key, *modifiers)),
                    _ => None,
                })
                .collect();
            (frame, keys)
        });

        let mut events = self.pointer_events(frame);
        events.extend(keys.into_iter().filter_map(|(key, modifiers)| shortcut(key, modifiers)));
        events
    }

    /// Turns one frame of pointer state into events. Press and release are
    /// reported before leave so a stroke that ends outside still closes.
    pub fn pointer_events(&mut self, frame: PointerFrame) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let location = frame.hover_pos.map(|pos| self.make_location(pos));
        let in_canvas = frame.canvas_hovered && location.is_some_and(|l| l.is_in_canvas);

        if let Some(location) = location {
            if in_canvas && frame.pressed {
                events.push(InputEvent::PointerDown { location });
            } else if in_canvas && frame.hover_pos != self.last_pointer_pos {
                events.push(InputEvent::PointerMove { location });
            }
        }
        if frame.released {
            events.push(InputEvent::PointerUp);
        }
        if self.was_in_canvas && !in_canvas {
            events.push(InputEvent::PointerLeave);
        }

        self.last_pointer_pos = frame.hover_pos;
        self.was_in_canvas = in_canvas;
        events
    }
}

/// Ctrl+Z undoes; Ctrl+Y and Ctrl+Shift+Z redo
pub fn shortcut(key: Key, modifiers: Modifiers) -> Option<InputEvent> {
    if !modifiers.command {
        return None;
    }
    match key {
        Key::Z if modifiers.shift => Some(InputEvent::Redo),
        Key::Z => Some(InputEvent::Undo),
        Key::Y => Some(InputEvent::Redo),
        _ => None,
    }
}

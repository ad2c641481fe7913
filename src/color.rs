use egui::Color32;

/// Degrees in a full turn of the hue wheel.
pub const FULL_TURN: f32 = 360.0;

/// Default hue advance per rainbow segment, in degrees.
pub const DEFAULT_HUE_STEP: f32 = 5.0;

/// Converts a hue (degrees) at full saturation and value into an opaque color.
///
/// Standard HSV to RGB: chroma `c = v * s`, `x = c * (1 - |(h / 60) mod 2 - 1|)`,
/// `m = v - c`, channels picked by 60° sextant and scaled to `0..=255` by truncation.
/// Hues outside `[0, 360)` are wrapped first; non-finite input is treated as 0°.
pub fn hue_to_color(hue: f32) -> Color32 {
    hsv_to_color(hue, 1.0, 1.0)
}

fn hsv_to_color(hue: f32, saturation: f32, value: f32) -> Color32 {
    let h = if hue.is_finite() {
        f64::from(hue).rem_euclid(f64::from(FULL_TURN))
    } else {
        0.0
    };
    let s = f64::from(saturation);
    let v = f64::from(value);

    let c = v * s;
    let x = c * (1.0 - (((h / 60.0) % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Color32::from_rgb(to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).floor().clamp(0.0, 255.0) as u8
}

/// The rainbow brush's hue cursor. Starts at 0° and wraps modulo 360°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HuePhase {
    degrees: f32,
    step: f32,
}

impl Default for HuePhase {
    fn default() -> Self {
        Self::new(DEFAULT_HUE_STEP)
    }
}

impl HuePhase {
    pub fn new(step: f32) -> Self {
        Self { degrees: 0.0, step }
    }

    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn color(&self) -> Color32 {
        hue_to_color(self.degrees)
    }

    /// Moves the phase forward by one step, wrapping at 360°.
    pub fn advance(&mut self) {
        self.degrees = (self.degrees + self.step).rem_euclid(FULL_TURN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(hue_to_color(0.0), Color32::from_rgb(255, 0, 0));
        assert_eq!(hue_to_color(120.0), Color32::from_rgb(0, 255, 0));
        assert_eq!(hue_to_color(240.0), Color32::from_rgb(0, 0, 255));
    }

    #[test]
    fn test_secondary_hues() {
        assert_eq!(hue_to_color(60.0), Color32::from_rgb(255, 255, 0));
        assert_eq!(hue_to_color(180.0), Color32::from_rgb(0, 255, 255));
        assert_eq!(hue_to_color(300.0), Color32::from_rgb(255, 0, 255));
    }

    #[test]
    fn test_channels_are_truncated() {
        // x = 0.5 at 30°, so green is 127.5 before truncation
        assert_eq!(hue_to_color(30.0), Color32::from_rgb(255, 127, 0));
    }

    #[test]
    fn test_out_of_range_hue_wraps() {
        assert_eq!(hue_to_color(360.0), hue_to_color(0.0));
        assert_eq!(hue_to_color(-120.0), hue_to_color(240.0));
        assert_eq!(hue_to_color(f32::NAN), hue_to_color(0.0));
    }

    #[test]
    fn test_phase_wraps_after_full_turn() {
        let mut phase = HuePhase::default();
        for _ in 0..72 {
            phase.advance();
        }
        assert_eq!(phase.degrees(), 0.0);
    }

    #[test]
    fn test_phase_advances_by_step() {
        let mut phase = HuePhase::new(5.0);
        phase.advance();
        phase.advance();
        assert_eq!(phase.degrees(), 10.0);
        assert_eq!(phase.color(), hue_to_color(10.0));
    }
}

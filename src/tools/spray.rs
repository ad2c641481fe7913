use egui::{Pos2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Dots scattered per pointer move
pub const DEFAULT_DENSITY: usize = 30;

/// Produces the scattered dot positions for the spray tool.
pub struct SprayNozzle {
    rng: StdRng,
    density: usize,
}

impl std::fmt::Debug for SprayNozzle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SprayNozzle")
            .field("density", &self.density)
            .finish()
    }
}

impl Default for SprayNozzle {
    fn default() -> Self {
        Self::new(DEFAULT_DENSITY)
    }
}

impl SprayNozzle {
    pub fn new(density: usize) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            density,
        }
    }

    /// A nozzle with a fixed seed, for reproducible output
    pub fn seeded(density: usize, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            density,
        }
    }

    pub fn density(&self) -> usize {
        self.density
    }

    /// Returns `density` points around `center`, each axis jittered
    /// independently and uniformly within `[-radius, radius]`.
    pub fn scatter(&mut self, center: Pos2, radius: f32) -> Vec<Pos2> {
        let radius = radius.abs();
        (0..self.density)
            .map(|_| {
                let jitter = Vec2::new(self.jitter(radius), self.jitter(radius));
                center + jitter
            })
            .collect()
    }

    fn jitter(&mut self, radius: f32) -> f32 {
        (self.rng.r#gen::<f32>() - 0.5) * radius * 2.0
    }
}

//! Color assignment for committers and branches.

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// An RGB color, displayed as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Creates a color from its components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Assigns a random color to each key on first encounter.
///
/// The same key always maps to the same color for the lifetime of the
/// palette. With a seed the sequence of colors is reproducible.
#[derive(Debug)]
pub struct Palette {
    colors: HashMap<String, Color>,
    rng: StdRng,
}

impl Palette {
    /// Creates a palette, seeded when `seed` is set, from OS entropy otherwise.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            colors: HashMap::new(),
            rng,
        }
    }

    /// Returns the color of `key`, assigning a new one if needed.
    pub fn color_for(&mut self, key: &str) -> Color {
        if let Some(color) = self.colors.get(key) {
            return *color;
        }
        let color = Color::new(self.rng.random(), self.rng.random(), self.rng.random());
        self.colors.insert(key.to_string(), color);
        color
    }

    /// Number of keys with an assigned color.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if no color was assigned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

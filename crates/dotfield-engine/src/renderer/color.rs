//! Colours and the light/dark scheme shared by all views.

use serde::{Deserialize, Serialize};

use crate::systems::rng::Rng;

/// RGBA colour, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a colour from RGB u8 values (0-255) with full opacity.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same colour with the given alpha, clamped to 0..=1.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    pub fn is_transparent(&self) -> bool {
        !(self.a > 0.0)
    }

    /// CSS `rgba(...)` string for Canvas2D style setters.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            self.a.clamp(0.0, 1.0),
        )
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

/// Page colour scheme, toggled by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Full-surface background fill.
    pub fn background(&self) -> Rgba {
        match self {
            Theme::Dark => Rgba::rgb8(0x17, 0x17, 0x17),
            Theme::Light => Rgba::rgb8(0xf5, 0xf2, 0xea),
        }
    }

    /// Colour for dots and lines; callers set the alpha.
    pub fn ink(&self) -> Rgba {
        match self {
            Theme::Dark => Rgba::WHITE,
            Theme::Light => Rgba::BLACK,
        }
    }
}

/// Rainbow palette used by the logo dots when the rainbow easter egg is on.
pub const RAINBOW_RGB: [[u8; 3]; 7] = [
    [138, 43, 226],
    [59, 130, 246],
    [34, 197, 94],
    [250, 204, 21],
    [239, 68, 68],
    [6, 182, 212],
    [236, 72, 153],
];

/// Pick a random rainbow colour with the given alpha.
pub fn random_rainbow(rng: &mut Rng, alpha: f32) -> Rgba {
    let [r, g, b] = RAINBOW_RGB[rng.next_int(RAINBOW_RGB.len() as u32) as usize];
    Rgba::rgb8(r, g, b).with_alpha(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_string() {
        assert_eq!(Rgba::WHITE.with_alpha(0.5).to_css(), "rgba(255, 255, 255, 0.5)");
        assert_eq!(Rgba::BLACK.to_css(), "rgba(0, 0, 0, 1)");
    }

    #[test]
    fn theme_colours() {
        assert_eq!(Theme::Dark.ink(), Rgba::WHITE);
        assert_eq!(Theme::Light.ink(), Rgba::BLACK);
        assert_eq!(Theme::Dark.background().to_css(), "rgba(23, 23, 23, 1)");
        assert_eq!(Theme::from_dark_flag(true), Theme::Dark);
    }

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Rgba::WHITE.with_alpha(3.0).a, 1.0);
        assert_eq!(Rgba::WHITE.with_alpha(-1.0).a, 0.0);
        assert!(Rgba::WHITE.with_alpha(0.0).is_transparent());
    }

    #[test]
    fn rainbow_is_from_palette() {
        let mut rng = Rng::new(42);
        for _ in 0..50 {
            let c = random_rainbow(&mut rng, 0.4);
            assert_eq!(c.a, 0.4);
            assert!(RAINBOW_RGB
                .iter()
                .any(|[r, g, b]| Rgba::rgb8(*r, *g, *b).with_alpha(0.4) == c));
        }
    }
}

use ::rand::Rng;
use macroquad::prelude::*;

/// Colors a layer draws its units from, all sharing one base alpha.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(rgb: &[[u8; 3]], alpha: f32) -> Self {
        let colors = rgb
            .iter()
            .map(|[r, g, b]| {
                Color::new(
                    *r as f32 / 255.0,
                    *g as f32 / 255.0,
                    *b as f32 / 255.0,
                    alpha,
                )
            })
            .collect();
        Self { colors }
    }

    /// Uniform pick; an empty palette falls back to white.
    pub fn pick(&self, rng: &mut impl Rng) -> Color {
        if self.colors.is_empty() {
            return WHITE;
        }
        self.colors[rng.gen_range(0..self.colors.len())]
    }
}

/// Scale a color's alpha by `opacity`, clamped to `[0, 1]`.
pub fn faded(color: Color, opacity: f32) -> Color {
    Color::new(color.r, color.g, color.b, color.a * opacity.clamp(0.0, 1.0))
}

/// Color with its rgb scaled by alpha, for surfaces that blend premultiplied.
pub fn premultiplied(color: Color) -> Color {
    Color::new(color.r * color.a, color.g * color.a, color.b * color.a, color.a)
}

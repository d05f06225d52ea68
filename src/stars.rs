use ::rand::{Rng, SeedableRng};
use macroquad::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::StarsConfig;
use crate::effect::{Census, Effect, STARS};
use crate::surface::{Backdrop, Surface};
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub phase: f32,
    pub speed: f32,
}

/// Fixed set of twinkling stars. Nothing is spawned or removed after startup.
pub struct Starfield {
    cfg: StarsConfig,
    stars: Vec<Star>,
}

impl Starfield {
    pub fn new(cfg: StarsConfig, count: usize, viewport: &Viewport, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| {
                let pos = vec2(
                    rng.gen::<f32>() * viewport.width,
                    rng.gen::<f32>() * viewport.height,
                );
                let radius = cfg.radius.sample(&mut rng);
                let phase = rng.gen::<f32>() * std::f32::consts::TAU;
                Star {
                    pos,
                    radius,
                    opacity: twinkle(&cfg, phase),
                    phase,
                    speed: cfg.twinkle_speed.sample(&mut rng),
                }
            })
            .collect();
        Self { cfg, stars }
    }

    #[cfg(test)]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}

fn twinkle(cfg: &StarsConfig, phase: f32) -> f32 {
    cfg.opacity_base + phase.sin() * cfg.opacity_amplitude
}

impl Effect for Starfield {
    fn layer(&self) -> &'static str {
        STARS
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Clear
    }

    fn emit(&mut self, _elapsed_ms: f32, _viewport: &Viewport) {}

    fn simulate(&mut self, _viewport: &Viewport) {
        for star in &mut self.stars {
            star.phase += star.speed;
            star.opacity = twinkle(&self.cfg, star.phase);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for star in &self.stars {
            let color = Color::new(1.0, 1.0, 1.0, star.opacity.max(0.0));
            surface.fill_circle(star.pos, star.radius, color);
        }
    }

    fn reap(&mut self) {}

    fn stop(&mut self) {}

    fn clear(&mut self) {
        self.stars.clear();
    }

    fn census(&self) -> Census {
        Census {
            units: self.stars.len(),
            fragments: 0,
        }
    }
}

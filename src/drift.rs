use ::rand::{Rng, SeedableRng};
use macroquad::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::DriftConfig;
use crate::effect::{Census, Effect, PARTICLES};
use crate::palette::{faded, Palette};
use crate::surface::{Backdrop, Surface};
use crate::viewport::Viewport;

/// Slow floating particle that never dies; it wraps around the viewport edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drifter {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: Color,
    pub opacity: f32,
}

pub struct DriftField {
    drifters: Vec<Drifter>,
}

impl DriftField {
    pub fn new(
        cfg: DriftConfig,
        palette_rgb: &[[u8; 3]],
        count: usize,
        viewport: &Viewport,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let palette = Palette::new(palette_rgb, cfg.alpha);
        let span = cfg.max_speed * 2.0;
        let drifters = (0..count)
            .map(|_| Drifter {
                pos: vec2(
                    rng.gen::<f32>() * viewport.width,
                    rng.gen::<f32>() * viewport.height,
                ),
                size: cfg.size.sample(&mut rng),
                velocity: vec2(
                    (rng.gen::<f32>() - 0.5) * span,
                    (rng.gen::<f32>() - 0.5) * span,
                ),
                color: palette.pick(&mut rng),
                opacity: cfg.opacity.sample(&mut rng),
            })
            .collect();
        Self { drifters }
    }

    #[cfg(test)]
    pub fn drifters(&self) -> &[Drifter] {
        &self.drifters
    }

    #[cfg(test)]
    pub fn push(&mut self, drifter: Drifter) {
        self.drifters.push(drifter);
    }
}

impl Effect for DriftField {
    fn layer(&self) -> &'static str {
        PARTICLES
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Clear
    }

    fn emit(&mut self, _elapsed_ms: f32, _viewport: &Viewport) {}

    fn simulate(&mut self, viewport: &Viewport) {
        for d in &mut self.drifters {
            d.pos = viewport.wrap(d.pos + d.velocity);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for d in &self.drifters {
            surface.fill_circle(d.pos, d.size, faded(d.color, d.opacity));
        }
    }

    fn reap(&mut self) {}

    fn stop(&mut self) {}

    fn clear(&mut self) {
        self.drifters.clear();
    }

    fn census(&self) -> Census {
        Census {
            units: self.drifters.len(),
            fragments: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NEON;

    #[test]
    fn drifters_never_leave_the_viewport() {
        let vp = Viewport::new(320.0, 240.0);
        let mut field = DriftField::new(DriftConfig::default(), &NEON, 40, &vp, 17);
        for _ in 0..5000 {
            field.simulate(&vp);
            for d in field.drifters() {
                assert!(vp.contains(d.pos), "{:?} outside viewport", d.pos);
            }
        }
    }

    #[test]
    fn wrap_is_exact_modulo_dimension() {
        let vp = Viewport::new(100.0, 50.0);
        let mut field = DriftField::new(DriftConfig::default(), &NEON, 0, &vp, 1);
        field.push(Drifter {
            pos: vec2(99.9, 0.05),
            velocity: vec2(0.15, -0.1),
            size: 1.0,
            color: WHITE,
            opacity: 0.5,
        });
        field.simulate(&vp);
        let p = field.drifters()[0].pos;
        assert!((p.x - 0.05).abs() < 1e-4);
        assert!((p.y - 49.95).abs() < 1e-4);
    }

    #[test]
    fn shrinking_viewport_pulls_drifters_back_inside() {
        let big = Viewport::new(1000.0, 1000.0);
        let small = Viewport::new(200.0, 150.0);
        let mut field = DriftField::new(DriftConfig::default(), &NEON, 40, &big, 3);
        field.simulate(&small);
        assert!(field.drifters().iter().all(|d| small.contains(d.pos)));
    }

    #[test]
    fn velocities_are_small_and_opacity_in_range() {
        let cfg = DriftConfig::default();
        let field = DriftField::new(cfg.clone(), &NEON, 100, &Viewport::new(500.0, 500.0), 5);
        for d in field.drifters() {
            assert!(d.velocity.x.abs() <= cfg.max_speed);
            assert!(d.velocity.y.abs() <= cfg.max_speed);
            assert!(cfg.opacity.contains(d.opacity));
            assert!((d.color.a - cfg.alpha).abs() < 1e-6);
        }
    }
}

use std::collections::VecDeque;

use ::rand::{Rng, SeedableRng};
use macroquad::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::config::{CrackerConfig, RocketsConfig};
use crate::effect::{Census, Effect, ROCKETS};
use crate::emitter::Emitter;
use crate::palette::{faded, Palette};
use crate::particles::{Ballistics, FragmentPool, FragmentStyle, Flight};
use crate::surface::{fill_glowing, Backdrop, Surface};
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub life: f32,
}

/// Fast rocket leaving a short fading trail.
#[derive(Clone, Debug, PartialEq)]
pub struct Rocket {
    pub flight: Flight,
    pub color: Color,
    pub trail: VecDeque<TrailPoint>,
}

impl Rocket {
    /// Record the trail, move, fade the trail. Returns true on the explosion tick.
    fn advance(&mut self, trail_len: usize, trail_fade: f32) -> bool {
        if self.flight.exploded {
            return false;
        }
        self.trail.push_back(TrailPoint {
            pos: self.flight.pos,
            life: 1.0,
        });
        while self.trail.len() > trail_len {
            self.trail.pop_front();
        }
        let exploded = self.flight.advance();
        for point in &mut self.trail {
            point.life -= trail_fade;
        }
        exploded
    }
}

/// Ground-level burst whose fragments live inside the blast itself.
#[derive(Clone, Debug)]
pub struct CrackerBlast {
    pub life: f32,
    decay: f32,
    fragments: FragmentPool,
}

impl CrackerBlast {
    pub fn new(origin: Vec2, color: Color, cfg: &CrackerConfig, rng: &mut impl Rng) -> Self {
        let mut fragments = FragmentPool::new(Ballistics::position_first(cfg.gravity));
        fragments.fountain(origin, color, cfg, rng);
        Self {
            life: 1.0,
            decay: cfg.blast_decay,
            fragments,
        }
    }

    fn step(&mut self) {
        self.life -= self.decay;
        self.fragments.step();
        self.fragments.reap();
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0 || self.fragments.is_empty()
    }

    #[cfg(test)]
    pub fn fragments(&self) -> &FragmentPool {
        &self.fragments
    }
}

/// Dense rockets with trails and explosions, plus cracker blasts along the ground.
pub struct RocketsAndCrackers {
    cfg: RocketsConfig,
    palette: Palette,
    glow_alpha: f32,
    rng: ChaCha8Rng,
    rocket_emitter: Emitter,
    cracker_emitter: Emitter,
    rockets: Vec<Rocket>,
    explosions: FragmentPool,
    blasts: Vec<CrackerBlast>,
}

impl RocketsAndCrackers {
    pub fn new(cfg: RocketsConfig, palette_rgb: &[[u8; 3]], glow_alpha: f32, seed: u64) -> Self {
        Self {
            palette: Palette::new(palette_rgb, cfg.alpha),
            glow_alpha,
            rng: ChaCha8Rng::seed_from_u64(seed),
            rocket_emitter: Emitter::new(cfg.interval_ms, cfg.start_delay_ms),
            cracker_emitter: Emitter::new(cfg.crackers.interval_ms, cfg.crackers.start_delay_ms),
            rockets: Vec::new(),
            explosions: FragmentPool::new(Ballistics::velocity_first(
                cfg.burst.gravity,
                cfg.burst.friction,
            )),
            blasts: Vec::new(),
            cfg,
        }
    }

    pub fn launch_rocket(&mut self, viewport: &Viewport) {
        let rng = &mut self.rng;
        let x = rng.gen::<f32>() * viewport.width;
        let target_y = viewport.height * (0.15 + 0.3 * rng.gen::<f32>());
        let velocity = vec2(
            (rng.gen::<f32>() - 0.5) * 0.5,
            -(rng.gen::<f32>() * 3.0 + 2.5),
        );
        let color = self.palette.pick(rng);
        self.rockets.push(Rocket {
            flight: Flight {
                pos: vec2(x, viewport.height),
                velocity,
                target_y,
                exploded: false,
            },
            color,
            trail: VecDeque::with_capacity(self.cfg.trail_len + 1),
        });
    }

    pub fn set_off_cracker(&mut self, viewport: &Viewport) {
        let x = self.rng.gen::<f32>() * viewport.width;
        let origin = vec2(x, viewport.height - self.cfg.crackers.ground_offset);
        let color = self.palette.pick(&mut self.rng);
        let blast = CrackerBlast::new(origin, color, &self.cfg.crackers, &mut self.rng);
        self.blasts.push(blast);
    }

    #[cfg(test)]
    pub fn push_rocket(&mut self, rocket: Rocket) {
        self.rockets.push(rocket);
    }

    #[cfg(test)]
    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    #[cfg(test)]
    pub fn explosions(&self) -> &FragmentPool {
        &self.explosions
    }

    #[cfg(test)]
    pub fn blasts(&self) -> &[CrackerBlast] {
        &self.blasts
    }

    fn draw_rocket(&self, surface: &mut dyn Surface, rocket: &Rocket) {
        for (prev, point) in rocket.trail.iter().zip(rocket.trail.iter().skip(1)) {
            if point.life <= 0.0 {
                continue;
            }
            surface.stroke_line(
                prev.pos,
                point.pos,
                self.cfg.trail_width,
                faded(rocket.color, point.life * self.cfg.trail_opacity),
            );
        }
        fill_glowing(
            surface,
            rocket.flight.pos,
            self.cfg.body_radius,
            faded(rocket.color, self.cfg.body_opacity),
            self.cfg.body_glow,
            self.glow_alpha,
        );
    }
}

impl Effect for RocketsAndCrackers {
    fn layer(&self) -> &'static str {
        ROCKETS
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Veil(self.cfg.veil)
    }

    fn emit(&mut self, elapsed_ms: f32, viewport: &Viewport) {
        let rockets = self.rocket_emitter.advance(elapsed_ms, &mut self.rng);
        for _ in 0..rockets {
            self.launch_rocket(viewport);
        }
        let crackers = self.cracker_emitter.advance(elapsed_ms, &mut self.rng);
        for _ in 0..crackers {
            self.set_off_cracker(viewport);
        }
    }

    fn simulate(&mut self, _viewport: &Viewport) {
        for rocket in &mut self.rockets {
            if rocket.advance(self.cfg.trail_len, self.cfg.trail_fade) {
                let spawned = self.explosions.burst(
                    rocket.flight.pos,
                    rocket.color,
                    &self.cfg.burst,
                    &mut self.rng,
                );
                trace!(x = rocket.flight.pos.x, y = rocket.flight.pos.y, spawned, "rocket burst");
            }
        }
        self.explosions.step();
        for blast in &mut self.blasts {
            blast.step();
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for rocket in &self.rockets {
            if !rocket.flight.exploded {
                self.draw_rocket(surface, rocket);
            }
        }
        self.explosions.draw(
            surface,
            FragmentStyle {
                opacity: self.cfg.burst.opacity,
                glow: self.cfg.burst_glow,
                glow_alpha: self.glow_alpha,
            },
        );
        let cracker_style = FragmentStyle {
            opacity: self.cfg.crackers.opacity,
            glow: self.cfg.crackers.glow,
            glow_alpha: self.glow_alpha,
        };
        for blast in &self.blasts {
            blast.fragments.draw(surface, cracker_style);
        }
    }

    fn reap(&mut self) {
        self.rockets.retain(|r| !r.flight.exploded);
        self.explosions.reap();
        self.blasts.retain(|b| !b.is_dead());
    }

    fn stop(&mut self) {
        self.rocket_emitter.stop();
        self.cracker_emitter.stop();
    }

    fn clear(&mut self) {
        self.rockets.clear();
        self.explosions.clear();
        self.blasts.clear();
    }

    fn census(&self) -> Census {
        let cracker_fragments: usize = self.blasts.iter().map(|b| b.fragments.len()).sum();
        Census {
            units: self.rockets.len() + self.blasts.len(),
            fragments: self.explosions.len() + cracker_fragments,
        }
    }
}

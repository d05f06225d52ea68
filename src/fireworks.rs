use ::rand::{Rng, SeedableRng};
use macroquad::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::config::FireworksConfig;
use crate::effect::{Census, Effect, FIREWORKS};
use crate::emitter::Emitter;
use crate::palette::{faded, Palette};
use crate::particles::{Ballistics, FragmentPool, FragmentStyle, Flight};
use crate::surface::{Backdrop, Surface};
use crate::viewport::Viewport;

/// Firework in flight, before it bursts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shell {
    pub flight: Flight,
    pub color: Color,
}

/// Slow, sparse fireworks: one shell every few seconds, bursting into sparks.
pub struct Fireworks {
    cfg: FireworksConfig,
    palette: Palette,
    glow_alpha: f32,
    rng: ChaCha8Rng,
    emitter: Emitter,
    shells: Vec<Shell>,
    sparks: FragmentPool,
}

impl Fireworks {
    pub fn new(cfg: FireworksConfig, palette_rgb: &[[u8; 3]], glow_alpha: f32, seed: u64) -> Self {
        let emitter = Emitter::new(cfg.interval_ms, cfg.start_delay_ms);
        let sparks = FragmentPool::new(Ballistics::velocity_first(
            cfg.burst.gravity,
            cfg.burst.friction,
        ));
        Self {
            palette: Palette::new(palette_rgb, cfg.alpha),
            glow_alpha,
            rng: ChaCha8Rng::seed_from_u64(seed),
            emitter,
            shells: Vec::new(),
            sparks,
            cfg,
        }
    }

    /// Launch one shell from a random spot on the bottom edge.
    pub fn launch(&mut self, viewport: &Viewport) {
        let rng = &mut self.rng;
        let x = rng.gen::<f32>() * viewport.width;
        let target_y = viewport.height * (0.2 + 0.4 * rng.gen::<f32>());
        let velocity = vec2(
            (rng.gen::<f32>() - 0.5) * 1.5,
            -(rng.gen::<f32>() * 2.0 + 1.5),
        );
        let color = self.palette.pick(rng);
        self.shells.push(Shell {
            flight: Flight {
                pos: vec2(x, viewport.height),
                velocity,
                target_y,
                exploded: false,
            },
            color,
        });
    }

    #[cfg(test)]
    pub fn push_shell(&mut self, shell: Shell) {
        self.shells.push(shell);
    }

    #[cfg(test)]
    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    #[cfg(test)]
    pub fn sparks(&self) -> &FragmentPool {
        &self.sparks
    }
}

impl Effect for Fireworks {
    fn layer(&self) -> &'static str {
        FIREWORKS
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Veil(self.cfg.veil)
    }

    fn emit(&mut self, elapsed_ms: f32, viewport: &Viewport) {
        let due = self.emitter.advance(elapsed_ms, &mut self.rng);
        for _ in 0..due {
            self.launch(viewport);
        }
        if due > 0 {
            debug!(
                launched = self.emitter.fired(),
                next_in_ms = ?self.emitter.last_interval_ms(),
                "firework shell launched"
            );
        }
    }

    fn simulate(&mut self, _viewport: &Viewport) {
        for shell in &mut self.shells {
            if shell.flight.advance() {
                let spawned = self.sparks.burst(
                    shell.flight.pos,
                    shell.color,
                    &self.cfg.burst,
                    &mut self.rng,
                );
                trace!(x = shell.flight.pos.x, y = shell.flight.pos.y, spawned, "firework burst");
            }
        }
        self.sparks.step();
    }

    fn render(&self, surface: &mut dyn Surface) {
        for shell in &self.shells {
            if shell.flight.exploded {
                continue;
            }
            surface.fill_circle(
                shell.flight.pos,
                self.cfg.shell_radius,
                faded(shell.color, self.cfg.shell_opacity),
            );
        }
        self.sparks.draw(
            surface,
            FragmentStyle {
                opacity: self.cfg.burst.opacity,
                glow: 0.0,
                glow_alpha: self.glow_alpha,
            },
        );
    }

    fn reap(&mut self) {
        self.shells.retain(|s| !s.flight.exploded);
        self.sparks.reap();
    }

    fn stop(&mut self) {
        self.emitter.stop();
    }

    fn clear(&mut self) {
        self.shells.clear();
        self.sparks.clear();
    }

    fn census(&self) -> Census {
        Census {
            units: self.shells.len(),
            fragments: self.sparks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SkyConfig, NEON};
    use crate::surface::testing::Recorder;

    fn fireworks(seed: u64) -> Fireworks {
        let cfg = SkyConfig::default();
        Fireworks::new(cfg.fireworks, &NEON, cfg.glow_alpha, seed)
    }

    fn shell_at(y: f32, target_y: f32) -> Shell {
        Shell {
            flight: Flight {
                pos: vec2(200.0, y),
                velocity: vec2(0.0, -2.0),
                target_y,
                exploded: false,
            },
            color: RED,
        }
    }

    #[test]
    fn shell_bursts_once_into_thirty_sparks() {
        let vp = Viewport::new(800.0, 600.0);
        let mut fw = fireworks(1);
        fw.push_shell(shell_at(105.0, 100.0));

        fw.simulate(&vp); // 103
        fw.reap();
        assert_eq!(fw.sparks().len(), 0);

        fw.simulate(&vp); // 101
        fw.reap();
        fw.simulate(&vp); // 99 -> burst
        assert_eq!(fw.sparks().len(), 30);
        assert!(fw.shells()[0].flight.exploded);

        fw.reap();
        assert!(fw.shells().is_empty(), "exploded shell leaves the flight list");
        assert_eq!(fw.sparks().len(), 30, "its sparks stay behind");
    }

    #[test]
    fn exploded_shell_is_not_drawn_but_sparks_are() {
        let vp = Viewport::new(800.0, 600.0);
        let mut fw = fireworks(2);
        fw.push_shell(shell_at(101.0, 100.0));
        fw.simulate(&vp);

        let mut surface = Recorder::new(800.0, 600.0);
        surface.prepare(fw.backdrop());
        fw.render(&mut surface);
        assert_eq!(surface.circles().len(), 30);
    }

    #[test]
    fn launch_starts_at_bottom_edge_aiming_for_middle_band() {
        let vp = Viewport::new(1000.0, 800.0);
        let mut fw = fireworks(3);
        for _ in 0..100 {
            fw.launch(&vp);
        }
        for s in fw.shells() {
            assert_eq!(s.flight.pos.y, 800.0);
            assert!(s.flight.target_y >= 160.0 && s.flight.target_y <= 480.0);
            assert!(s.flight.velocity.y <= -1.5 && s.flight.velocity.y >= -3.5);
            assert!(s.flight.velocity.x.abs() <= 0.75);
        }
    }

    #[test]
    fn first_shell_waits_for_start_delay() {
        let vp = Viewport::new(800.0, 600.0);
        let mut fw = fireworks(4);
        fw.emit(1999.0, &vp);
        assert!(fw.shells().is_empty());
        fw.emit(1.0, &vp);
        assert_eq!(fw.shells().len(), 1);
    }

    #[test]
    fn backdrop_is_translucent_veil() {
        assert_eq!(fireworks(5).backdrop(), Backdrop::Veil(0.15));
    }
}

use ::rand::Rng;
use macroquad::prelude::*;

use crate::config::{BurstConfig, CrackerConfig};
use crate::palette::faded;
use crate::surface::{fill_glowing, Surface};

/// Whether gravity/friction touch the velocity before or after the move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOrder {
    /// `v.y += g; v *= friction; p += v`
    VelocityFirst,
    /// `p += v; v.y += g; v *= friction`
    PositionFirst,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ballistics {
    pub gravity: f32,
    pub friction: f32,
    pub order: StepOrder,
}

impl Ballistics {
    pub fn velocity_first(gravity: f32, friction: f32) -> Self {
        Self {
            gravity,
            friction,
            order: StepOrder::VelocityFirst,
        }
    }

    pub fn position_first(gravity: f32) -> Self {
        Self {
            gravity,
            friction: 1.0,
            order: StepOrder::PositionFirst,
        }
    }
}

/// Ballistic decay unit: firework spark, rocket explosion particle, cracker fragment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub color: Color,
    pub life: f32,
    pub decay: f32,
    pub size: f32,
}

impl Fragment {
    pub fn new(pos: Vec2, velocity: Vec2, color: Color, decay: f32, size: f32) -> Self {
        Self {
            pos,
            velocity,
            color,
            life: 1.0,
            decay,
            size,
        }
    }

    pub fn step(&mut self, ballistics: &Ballistics) {
        match ballistics.order {
            StepOrder::VelocityFirst => {
                self.velocity.y += ballistics.gravity;
                self.velocity *= ballistics.friction;
                self.pos += self.velocity;
            }
            StepOrder::PositionFirst => {
                self.pos += self.velocity;
                self.velocity.y += ballistics.gravity;
                self.velocity *= ballistics.friction;
            }
        }
        self.life -= self.decay;
    }

    pub fn is_spent(&self) -> bool {
        self.life <= 0.0
    }
}

/// How a pool paints its fragments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentStyle {
    /// Multiplier on `life` for the draw alpha.
    pub opacity: f32,
    pub glow: f32,
    pub glow_alpha: f32,
}

/// One collection of ballistic fragments sharing the same physics.
#[derive(Clone, Debug)]
pub struct FragmentPool {
    fragments: Vec<Fragment>,
    ballistics: Ballistics,
}

impl FragmentPool {
    pub fn new(ballistics: Ballistics) -> Self {
        Self {
            fragments: Vec::new(),
            ballistics,
        }
    }

    /// Spray `cfg.count` fragments from `origin`, each axis of velocity in
    /// `[-speed/2, speed/2)`. Returns the number spawned.
    pub fn burst(
        &mut self,
        origin: Vec2,
        color: Color,
        cfg: &BurstConfig,
        rng: &mut impl Rng,
    ) -> usize {
        self.fragments.reserve(cfg.count);
        for _ in 0..cfg.count {
            let velocity = vec2(
                (rng.gen::<f32>() - 0.5) * cfg.speed,
                (rng.gen::<f32>() - 0.5) * cfg.speed,
            );
            let decay = cfg.decay.sample(rng);
            let size = cfg.size.sample(rng);
            self.fragments
                .push(Fragment::new(origin, velocity, color, decay, size));
        }
        cfg.count
    }

    /// Upward fountain for cracker blasts: horizontal spread like a burst,
    /// vertical speed drawn from `lift` and pointing up.
    pub fn fountain(
        &mut self,
        origin: Vec2,
        color: Color,
        cfg: &CrackerConfig,
        rng: &mut impl Rng,
    ) {
        self.fragments.reserve(cfg.fragments);
        for _ in 0..cfg.fragments {
            let velocity = vec2((rng.gen::<f32>() - 0.5) * cfg.spread, -cfg.lift.sample(rng));
            let size = cfg.size.sample(rng);
            let decay = cfg.decay.sample(rng);
            self.fragments
                .push(Fragment::new(origin, velocity, color, decay, size));
        }
    }

    #[cfg(test)]
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    pub fn step(&mut self) {
        for f in &mut self.fragments {
            f.step(&self.ballistics);
        }
    }

    /// Drop spent fragments. Returns how many were removed.
    pub fn reap(&mut self) -> usize {
        let before = self.fragments.len();
        self.fragments.retain(|f| !f.is_spent());
        before - self.fragments.len()
    }

    pub fn draw(&self, surface: &mut dyn Surface, style: FragmentStyle) {
        for f in &self.fragments {
            if f.is_spent() {
                continue;
            }
            let color = faded(f.color, f.life * style.opacity);
            fill_glowing(surface, f.pos, f.size, color, style.glow, style.glow_alpha);
        }
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}

/// Straight climb toward a target height, ending in exactly one explosion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flight {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub target_y: f32,
    pub exploded: bool,
}

impl Flight {
    /// Move once. Returns true on the tick the unit reaches (or overshoots)
    /// its target height; never again afterwards.
    pub fn advance(&mut self) -> bool {
        if self.exploded {
            return false;
        }
        self.pos += self.velocity;
        if self.pos.y <= self.target_y {
            self.exploded = true;
            return true;
        }
        false
    }
}

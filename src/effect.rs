use crate::config::SkyConfig;
use crate::drift::DriftField;
use crate::fireworks::Fireworks;
use crate::rockets::RocketsAndCrackers;
use crate::stars::Starfield;
use crate::surface::{Backdrop, Surface};
use crate::viewport::{DeviceTier, Viewport};

pub const STARS: &str = "stars";
pub const PARTICLES: &str = "particles";
pub const FIREWORKS: &str = "fireworks";
pub const ROCKETS: &str = "rockets";

/// Bottom-to-top compositing order.
pub const LAYER_ORDER: [&str; 4] = [STARS, PARTICLES, FIREWORKS, ROCKETS];

/// Live unit counts for one layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    /// Top-level units: stars, drifters, shells/rockets in flight, cracker blasts.
    pub units: usize,
    /// Decaying fragments spawned by bursts.
    pub fragments: usize,
}

impl Census {
    pub fn total(&self) -> usize {
        self.units + self.fragments
    }
}

/// One self-contained particle system bound to a single layer.
///
/// The driver calls, per tick: `emit`, `simulate`, `render`, `reap`.
pub trait Effect {
    /// Stable name of the surface this effect draws on.
    fn layer(&self) -> &'static str;

    fn backdrop(&self) -> Backdrop;

    /// Advance emitter clocks and spawn whatever fell due.
    fn emit(&mut self, elapsed_ms: f32, viewport: &Viewport);

    fn simulate(&mut self, viewport: &Viewport);

    fn render(&self, surface: &mut dyn Surface);

    /// Remove expired units. Runs after `render`, so the frame just drawn is unaffected.
    fn reap(&mut self);

    /// Cancel all emitters. Units already alive keep animating.
    fn stop(&mut self);

    /// Drop every unit.
    fn clear(&mut self);

    fn census(&self) -> Census;
}

/// The four standard effects for this viewport. Low-tier devices get fewer
/// ambient units and no fireworks or rockets.
pub fn standard_effects(cfg: &SkyConfig, viewport: &Viewport, seed: u64) -> Vec<Box<dyn Effect>> {
    let tier = viewport.tier();
    let mut effects: Vec<Box<dyn Effect>> = Vec::with_capacity(LAYER_ORDER.len());

    let star_count = match tier {
        DeviceTier::Low => cfg.stars.count_low,
        DeviceTier::Standard => cfg.stars.count,
    };
    effects.push(Box::new(Starfield::new(
        cfg.stars.clone(),
        star_count,
        viewport,
        layer_seed(seed, 0),
    )));

    let drift_count = match tier {
        DeviceTier::Low => cfg.particles.count_low,
        DeviceTier::Standard => cfg.particles.count,
    };
    effects.push(Box::new(DriftField::new(
        cfg.particles.clone(),
        &cfg.palette,
        drift_count,
        viewport,
        layer_seed(seed, 1),
    )));

    if tier == DeviceTier::Standard {
        effects.push(Box::new(Fireworks::new(
            cfg.fireworks.clone(),
            &cfg.palette,
            cfg.glow_alpha,
            layer_seed(seed, 2),
        )));
        effects.push(Box::new(RocketsAndCrackers::new(
            cfg.rockets.clone(),
            &cfg.palette,
            cfg.glow_alpha,
            layer_seed(seed, 3),
        )));
    }

    effects
}

fn layer_seed(root: u64, index: u64) -> u64 {
    root.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tier_builds_all_layers_in_order() {
        let effects = standard_effects(&SkyConfig::default(), &Viewport::new(1280.0, 800.0), 1);
        let layers: Vec<&str> = effects.iter().map(|e| e.layer()).collect();
        assert_eq!(layers, LAYER_ORDER.to_vec());
        assert_eq!(effects[0].census().units, SkyConfig::default().stars.count);
        assert_eq!(effects[1].census().units, SkyConfig::default().particles.count);
    }

    #[test]
    fn low_tier_drops_fireworks_and_rockets() {
        let cfg = SkyConfig::default();
        let effects = standard_effects(&cfg, &Viewport::new(640.0, 480.0), 1);
        let layers: Vec<&str> = effects.iter().map(|e| e.layer()).collect();
        assert_eq!(layers, vec![STARS, PARTICLES]);
        assert_eq!(effects[0].census().units, cfg.stars.count_low);
        assert_eq!(effects[1].census().units, cfg.particles.count_low);
    }
}

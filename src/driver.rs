use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::effect::{Census, Effect};
use crate::error::SkyError;
use crate::surface::{Surface, SurfaceProvider};
use crate::viewport::Viewport;

/// Shared stop flag for the frame loop. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// An effect bound to the surface it draws on.
pub struct Layer<S> {
    pub effect: Box<dyn Effect>,
    pub surface: S,
}

/// Owns every mounted layer and steps them in lockstep.
pub struct FrameDriver<S: Surface> {
    layers: Vec<Layer<S>>,
    viewport: Viewport,
    tick_ms: f32,
    ticks: u64,
}

impl<S: Surface> FrameDriver<S> {
    pub fn new(viewport: Viewport, tick_ms: f32) -> Self {
        Self {
            layers: Vec::new(),
            viewport,
            tick_ms,
            ticks: 0,
        }
    }

    /// Bind an effect to its surface. Without a surface the effect is dropped
    /// and never started.
    pub fn mount(
        &mut self,
        effect: Box<dyn Effect>,
        provider: &mut impl SurfaceProvider<S>,
    ) -> Result<(), SkyError> {
        let layer = effect.layer();
        let surface = provider
            .acquire(layer, &self.viewport)
            .ok_or(SkyError::SurfaceMissing { layer })?;
        debug!(layer, "layer mounted");
        self.layers.push(Layer { effect, surface });
        Ok(())
    }

    /// Mount each effect, skipping the ones whose surface is missing.
    /// Returns how many were mounted.
    pub fn mount_all(
        &mut self,
        effects: Vec<Box<dyn Effect>>,
        provider: &mut impl SurfaceProvider<S>,
    ) -> usize {
        let mut mounted = 0;
        for effect in effects {
            match self.mount(effect, provider) {
                Ok(()) => mounted += 1,
                Err(e) => warn!("skipping layer: {e}"),
            }
        }
        mounted
    }

    /// One frame: emit, simulate, render, present, reap, for every layer.
    pub fn step(&mut self) {
        let viewport = self.viewport;
        for layer in &mut self.layers {
            let effect = &mut layer.effect;
            effect.emit(self.tick_ms, &viewport);
            effect.simulate(&viewport);
            layer.surface.prepare(effect.backdrop());
            effect.render(&mut layer.surface);
            layer.surface.present();
            effect.reap();
        }
        self.ticks += 1;
    }

    /// Step until cancelled or `max_ticks` have run. Returns the ticks run.
    pub fn run(&mut self, token: &CancelToken, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && !token.is_cancelled() {
            self.step();
            ran += 1;
        }
        ran
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return;
        }
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        for layer in &mut self.layers {
            layer.surface.resize(viewport.width, viewport.height);
        }
    }

    /// Stop every emitter and drop every unit.
    pub fn dispose(&mut self) {
        for layer in &mut self.layers {
            layer.effect.stop();
            layer.effect.clear();
        }
        info!(ticks = self.ticks, "sky disposed");
    }

    pub fn layers(&self) -> &[Layer<S>] {
        &self.layers
    }

    pub fn census(&self) -> Vec<(&'static str, Census)> {
        self.layers
            .iter()
            .map(|l| (l.effect.layer(), l.effect.census()))
            .collect()
    }

    #[cfg(test)]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SkyConfig, TICK_MS};
    use crate::effect::{standard_effects, FIREWORKS, PARTICLES, ROCKETS, STARS};
    use crate::surface::testing::{DrawOp, Recorder, RecorderProvider};

    fn driver_with(layers: Vec<&'static str>, seed: u64) -> FrameDriver<Recorder> {
        let vp = Viewport::new(1280.0, 800.0);
        let mut driver = FrameDriver::new(vp, TICK_MS);
        let mut provider = RecorderProvider { layers };
        driver.mount_all(standard_effects(&SkyConfig::default(), &vp, seed), &mut provider);
        driver
    }

    fn all_layers() -> Vec<&'static str> {
        vec![STARS, PARTICLES, FIREWORKS, ROCKETS]
    }

    #[test]
    fn missing_surface_skips_only_that_layer() {
        let mut driver = driver_with(vec![STARS, ROCKETS], 1);
        let names: Vec<&str> = driver.census().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec![STARS, ROCKETS]);

        driver.run(&CancelToken::new(), 200);
        let rockets = driver.census()[1].1;
        assert!(rockets.total() > 0, "rockets layer keeps running");
    }

    #[test]
    fn mount_reports_missing_surface() {
        let vp = Viewport::new(1280.0, 800.0);
        let mut driver: FrameDriver<Recorder> = FrameDriver::new(vp, TICK_MS);
        let mut provider = RecorderProvider { layers: vec![] };
        let mut effects = standard_effects(&SkyConfig::default(), &vp, 1);
        let err = driver.mount(effects.remove(0), &mut provider).unwrap_err();
        assert!(matches!(err, SkyError::SurfaceMissing { layer: "stars" }));
        assert!(driver.layers().is_empty());
    }

    #[test]
    fn same_seed_gives_identical_runs() {
        let mut a = driver_with(all_layers(), 42);
        let mut b = driver_with(all_layers(), 42);
        for _ in 0..600 {
            a.step();
            b.step();
            for (la, lb) in a.layers().iter().zip(b.layers()) {
                assert_eq!(la.surface.ops, lb.surface.ops);
            }
        }
        assert_eq!(a.census(), b.census());
    }

    #[test]
    fn every_frame_prepares_draws_then_presents() {
        let mut driver = driver_with(all_layers(), 7);
        driver.run(&CancelToken::new(), 240);
        for layer in driver.layers() {
            let ops = &layer.surface.ops;
            assert_eq!(ops.first(), Some(&DrawOp::Prepare(layer.effect.backdrop())));
            assert_eq!(ops.last(), Some(&DrawOp::Present));
        }
    }

    #[test]
    fn run_stops_when_token_is_cancelled() {
        let mut driver = driver_with(all_layers(), 3);
        let token = CancelToken::new();
        assert_eq!(driver.run(&token, 10), 10);

        let observer = token.clone();
        token.cancel();
        assert!(observer.is_cancelled());
        assert_eq!(driver.run(&token, 10), 0);
        assert_eq!(driver.ticks(), 10);
    }

    #[test]
    fn dispose_stops_emitters_and_empties_layers() {
        let mut driver = driver_with(all_layers(), 9);
        driver.run(&CancelToken::new(), 300);
        driver.dispose();
        for (_, census) in driver.census() {
            assert_eq!(census.total(), 0);
        }
        driver.run(&CancelToken::new(), 600);
        for (_, census) in driver.census() {
            assert_eq!(census.total(), 0, "no emitter fires after dispose");
        }
    }

    #[test]
    fn resize_propagates_to_surfaces() {
        let mut driver = driver_with(all_layers(), 5);
        driver.resize(640.0, 360.0);
        assert_eq!(driver.viewport(), Viewport::new(640.0, 360.0));
        for layer in driver.layers() {
            assert_eq!(layer.surface.size, macroquad::prelude::vec2(640.0, 360.0));
        }
    }

    #[test]
    fn fireworks_appear_after_their_start_delay() {
        let mut driver = driver_with(vec![FIREWORKS], 11);
        // 2000 ms at 60 ticks per second is tick 120.
        driver.run(&CancelToken::new(), 119);
        assert_eq!(driver.census()[0].1.total(), 0);
        driver.run(&CancelToken::new(), 2);
        assert_eq!(driver.census()[0].1.units, 1);
    }
}

// All tunable sky constants in one place. `SkyConfig` mirrors them and can be
// overridden from a JSON file.

use ::rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SkyError;

// Frame clock
pub const FIXED_DT: f32 = 1.0 / 60.0;
pub const TICK_MS: f32 = FIXED_DT * 1000.0;
pub const MAX_TICKS_PER_FRAME: u32 = 4;
pub const DEFAULT_SEED: u64 = 2026;

// Emitters
pub const MIN_SPAWN_INTERVAL_MS: f32 = 1.0;
pub const MAX_SPAWNS_PER_ADVANCE: u32 = 64;

// Window
pub const WINDOW_WIDTH: i32 = 1280;
pub const WINDOW_HEIGHT: i32 = 800;

// Device tier
pub const LOW_TIER_MAX_WIDTH: f32 = 768.0;
pub const LOW_TIER_MAX_HEIGHT: f32 = 600.0;

// Palette (neon pink, cyan, purple, orange)
pub const NEON: [[u8; 3]; 4] = [[255, 0, 110], [0, 245, 255], [131, 56, 236], [255, 190, 11]];
pub const GLOW_ALPHA: f32 = 0.25;

// Stars
pub const STAR_COUNT: usize = 100;
pub const STAR_COUNT_LOW: usize = 50;
pub const STAR_RADIUS_MIN: f32 = 0.5;
pub const STAR_RADIUS_MAX: f32 = 2.0;
pub const STAR_TWINKLE_SPEED_MIN: f32 = 0.005;
pub const STAR_TWINKLE_SPEED_MAX: f32 = 0.015;
pub const STAR_OPACITY_BASE: f32 = 0.3;
pub const STAR_OPACITY_AMPLITUDE: f32 = 0.3;

// Floating particles
pub const DRIFT_COUNT: usize = 40;
pub const DRIFT_COUNT_LOW: usize = 20;
pub const DRIFT_MAX_SPEED: f32 = 0.15;
pub const DRIFT_SIZE_MIN: f32 = 1.0;
pub const DRIFT_SIZE_MAX: f32 = 4.0;
pub const DRIFT_OPACITY_MIN: f32 = 0.2;
pub const DRIFT_OPACITY_MAX: f32 = 0.6;
pub const DRIFT_ALPHA: f32 = 0.3;

// Fireworks
pub const FIREWORK_START_DELAY_MS: f32 = 2000.0;
pub const FIREWORK_INTERVAL_MIN_MS: f32 = 4000.0;
pub const FIREWORK_INTERVAL_MAX_MS: f32 = 8000.0;
pub const FIREWORK_ALPHA: f32 = 0.4;
pub const FIREWORK_VEIL: f32 = 0.15;
pub const FIREWORK_SHELL_RADIUS: f32 = 2.5;
pub const FIREWORK_SHELL_OPACITY: f32 = 0.7;
pub const FIREWORK_BURST: usize = 30;
pub const FIREWORK_GRAVITY: f32 = 0.08;
pub const FIREWORK_FRICTION: f32 = 0.98;
pub const FIREWORK_SPARK_SPEED: f32 = 6.0;
pub const FIREWORK_DECAY_MIN: f32 = 0.01;
pub const FIREWORK_DECAY_MAX: f32 = 0.025;
pub const FIREWORK_SPARK_SIZE_MIN: f32 = 1.5;
pub const FIREWORK_SPARK_SIZE_MAX: f32 = 4.0;
pub const FIREWORK_SPARK_OPACITY: f32 = 0.6;

// Rockets
pub const ROCKET_START_DELAY_MS: f32 = 1500.0;
pub const ROCKET_INTERVAL_MIN_MS: f32 = 300.0;
pub const ROCKET_INTERVAL_MAX_MS: f32 = 600.0;
pub const ROCKET_ALPHA: f32 = 0.5;
pub const ROCKET_VEIL: f32 = 0.1;
pub const ROCKET_BODY_RADIUS: f32 = 3.0;
pub const ROCKET_BODY_OPACITY: f32 = 0.8;
pub const ROCKET_BODY_GLOW: f32 = 15.0;
pub const ROCKET_TRAIL_LEN: usize = 5;
pub const ROCKET_TRAIL_FADE: f32 = 0.2;
pub const ROCKET_TRAIL_WIDTH: f32 = 2.0;
pub const ROCKET_TRAIL_OPACITY: f32 = 0.6;
pub const ROCKET_BURST: usize = 25;
pub const ROCKET_GRAVITY: f32 = 0.1;
pub const ROCKET_FRICTION: f32 = 0.97;
pub const ROCKET_SPARK_SPEED: f32 = 8.0;
pub const ROCKET_DECAY_MIN: f32 = 0.015;
pub const ROCKET_DECAY_MAX: f32 = 0.035;
pub const ROCKET_SPARK_SIZE_MIN: f32 = 2.0;
pub const ROCKET_SPARK_SIZE_MAX: f32 = 5.0;
pub const ROCKET_SPARK_OPACITY: f32 = 0.7;
pub const ROCKET_SPARK_GLOW: f32 = 10.0;

// Cracker blasts
pub const CRACKER_START_DELAY_MS: f32 = 1500.0;
pub const CRACKER_INTERVAL_MIN_MS: f32 = 200.0;
pub const CRACKER_INTERVAL_MAX_MS: f32 = 400.0;
pub const CRACKER_GROUND_OFFSET: f32 = 20.0;
pub const CRACKER_FRAGMENTS: usize = 20;
pub const CRACKER_BLAST_DECAY: f32 = 0.03;
pub const CRACKER_GRAVITY: f32 = 0.15;
pub const CRACKER_SPREAD: f32 = 6.0;
pub const CRACKER_LIFT_MIN: f32 = 2.0;
pub const CRACKER_LIFT_MAX: f32 = 10.0;
pub const CRACKER_DECAY_MIN: f32 = 0.02;
pub const CRACKER_DECAY_MAX: f32 = 0.05;
pub const CRACKER_SIZE_MIN: f32 = 1.0;
pub const CRACKER_SIZE_MAX: f32 = 3.0;
pub const CRACKER_OPACITY: f32 = 0.6;
pub const CRACKER_GLOW: f32 = 8.0;

/// Half-open numeric range `[min, max)` used for randomized parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform draw from the span. A degenerate span yields `min`.
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    #[cfg(test)]
    pub fn midpoint(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    #[cfg(test)]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarsConfig {
    pub count: usize,
    pub count_low: usize,
    pub radius: Span,
    pub twinkle_speed: Span,
    pub opacity_base: f32,
    pub opacity_amplitude: f32,
}

impl Default for StarsConfig {
    fn default() -> Self {
        Self {
            count: STAR_COUNT,
            count_low: STAR_COUNT_LOW,
            radius: Span::new(STAR_RADIUS_MIN, STAR_RADIUS_MAX),
            twinkle_speed: Span::new(STAR_TWINKLE_SPEED_MIN, STAR_TWINKLE_SPEED_MAX),
            opacity_base: STAR_OPACITY_BASE,
            opacity_amplitude: STAR_OPACITY_AMPLITUDE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub count: usize,
    pub count_low: usize,
    pub max_speed: f32,
    pub size: Span,
    pub opacity: Span,
    pub alpha: f32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            count: DRIFT_COUNT,
            count_low: DRIFT_COUNT_LOW,
            max_speed: DRIFT_MAX_SPEED,
            size: Span::new(DRIFT_SIZE_MIN, DRIFT_SIZE_MAX),
            opacity: Span::new(DRIFT_OPACITY_MIN, DRIFT_OPACITY_MAX),
            alpha: DRIFT_ALPHA,
        }
    }
}

/// Parameters for a burst of ballistic fragments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    pub count: usize,
    pub gravity: f32,
    pub friction: f32,
    /// Each velocity axis is drawn from `[-speed/2, speed/2)`.
    pub speed: f32,
    pub decay: Span,
    pub size: Span,
    pub opacity: f32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            count: FIREWORK_BURST,
            gravity: FIREWORK_GRAVITY,
            friction: FIREWORK_FRICTION,
            speed: FIREWORK_SPARK_SPEED,
            decay: Span::new(FIREWORK_DECAY_MIN, FIREWORK_DECAY_MAX),
            size: Span::new(FIREWORK_SPARK_SIZE_MIN, FIREWORK_SPARK_SIZE_MAX),
            opacity: FIREWORK_SPARK_OPACITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    pub start_delay_ms: f32,
    pub interval_ms: Span,
    pub alpha: f32,
    pub veil: f32,
    pub shell_radius: f32,
    pub shell_opacity: f32,
    pub burst: BurstConfig,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: FIREWORK_START_DELAY_MS,
            interval_ms: Span::new(FIREWORK_INTERVAL_MIN_MS, FIREWORK_INTERVAL_MAX_MS),
            alpha: FIREWORK_ALPHA,
            veil: FIREWORK_VEIL,
            shell_radius: FIREWORK_SHELL_RADIUS,
            shell_opacity: FIREWORK_SHELL_OPACITY,
            burst: BurstConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrackerConfig {
    pub start_delay_ms: f32,
    pub interval_ms: Span,
    pub ground_offset: f32,
    pub fragments: usize,
    pub blast_decay: f32,
    pub gravity: f32,
    pub spread: f32,
    pub lift: Span,
    pub decay: Span,
    pub size: Span,
    pub opacity: f32,
    pub glow: f32,
}

impl Default for CrackerConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: CRACKER_START_DELAY_MS,
            interval_ms: Span::new(CRACKER_INTERVAL_MIN_MS, CRACKER_INTERVAL_MAX_MS),
            ground_offset: CRACKER_GROUND_OFFSET,
            fragments: CRACKER_FRAGMENTS,
            blast_decay: CRACKER_BLAST_DECAY,
            gravity: CRACKER_GRAVITY,
            spread: CRACKER_SPREAD,
            lift: Span::new(CRACKER_LIFT_MIN, CRACKER_LIFT_MAX),
            decay: Span::new(CRACKER_DECAY_MIN, CRACKER_DECAY_MAX),
            size: Span::new(CRACKER_SIZE_MIN, CRACKER_SIZE_MAX),
            opacity: CRACKER_OPACITY,
            glow: CRACKER_GLOW,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketsConfig {
    pub start_delay_ms: f32,
    pub interval_ms: Span,
    pub alpha: f32,
    pub veil: f32,
    pub body_radius: f32,
    pub body_opacity: f32,
    pub body_glow: f32,
    pub trail_len: usize,
    pub trail_fade: f32,
    pub trail_width: f32,
    pub trail_opacity: f32,
    pub burst: BurstConfig,
    pub burst_glow: f32,
    pub crackers: CrackerConfig,
}

impl Default for RocketsConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: ROCKET_START_DELAY_MS,
            interval_ms: Span::new(ROCKET_INTERVAL_MIN_MS, ROCKET_INTERVAL_MAX_MS),
            alpha: ROCKET_ALPHA,
            veil: ROCKET_VEIL,
            body_radius: ROCKET_BODY_RADIUS,
            body_opacity: ROCKET_BODY_OPACITY,
            body_glow: ROCKET_BODY_GLOW,
            trail_len: ROCKET_TRAIL_LEN,
            trail_fade: ROCKET_TRAIL_FADE,
            trail_width: ROCKET_TRAIL_WIDTH,
            trail_opacity: ROCKET_TRAIL_OPACITY,
            burst: BurstConfig {
                count: ROCKET_BURST,
                gravity: ROCKET_GRAVITY,
                friction: ROCKET_FRICTION,
                speed: ROCKET_SPARK_SPEED,
                decay: Span::new(ROCKET_DECAY_MIN, ROCKET_DECAY_MAX),
                size: Span::new(ROCKET_SPARK_SIZE_MIN, ROCKET_SPARK_SIZE_MAX),
                opacity: ROCKET_SPARK_OPACITY,
            },
            burst_glow: ROCKET_SPARK_GLOW,
            crackers: CrackerConfig::default(),
        }
    }
}

/// Full sky configuration. Missing JSON fields fall back to the constants above.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub palette: Vec<[u8; 3]>,
    pub glow_alpha: f32,
    pub stars: StarsConfig,
    pub particles: DriftConfig,
    pub fireworks: FireworksConfig,
    pub rockets: RocketsConfig,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            palette: NEON.to_vec(),
            glow_alpha: GLOW_ALPHA,
            stars: StarsConfig::default(),
            particles: DriftConfig::default(),
            fireworks: FireworksConfig::default(),
            rockets: RocketsConfig::default(),
        }
    }
}

impl SkyConfig {
    pub fn from_json(text: &str) -> Result<Self, SkyError> {
        let cfg: SkyConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &str) -> Result<Self, SkyError> {
        let text = std::fs::read_to_string(path).map_err(|source| SkyError::ConfigRead {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Reject spawn windows that are inverted, negative or shorter than
    /// `MIN_SPAWN_INTERVAL_MS`.
    pub fn validate(&self) -> Result<(), SkyError> {
        check_window("fireworks", self.fireworks.interval_ms)?;
        check_window("rockets", self.rockets.interval_ms)?;
        check_window("crackers", self.rockets.crackers.interval_ms)?;
        Ok(())
    }
}

fn check_window(emitter: &'static str, window: Span) -> Result<(), SkyError> {
    if window.min < 0.0
        || window.min > window.max
        || window.max < MIN_SPAWN_INTERVAL_MS
        || !window.max.is_finite()
    {
        return Err(SkyError::InvalidWindow {
            emitter,
            min_ms: window.min,
            max_ms: window.max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let cfg = SkyConfig::from_json(r#"{ "fireworks": { "burst": { "count": 12 } } }"#).unwrap();
        assert_eq!(cfg.fireworks.burst.count, 12);
        assert_eq!(cfg.fireworks.burst.gravity, FIREWORK_GRAVITY);
        assert_eq!(cfg.rockets.burst.count, ROCKET_BURST);
        assert_eq!(cfg.palette.len(), NEON.len());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = SkyConfig::from_json(
            r#"{ "rockets": { "crackers": { "interval_ms": { "min": 500.0, "max": 100.0 } } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SkyError::InvalidWindow { emitter: "crackers", .. }));
    }

    #[test]
    fn zero_and_sub_millisecond_windows_are_rejected() {
        let err = SkyConfig::from_json(r#"{ "rockets": { "interval_ms": { "min": 0.0, "max": 0.0 } } }"#)
            .unwrap_err();
        assert!(matches!(err, SkyError::InvalidWindow { emitter: "rockets", .. }));

        let err = SkyConfig::from_json(
            r#"{ "fireworks": { "interval_ms": { "min": 0.001, "max": 0.5 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SkyError::InvalidWindow { emitter: "fireworks", .. }));

        let cfg = SkyConfig::from_json(r#"{ "rockets": { "interval_ms": { "min": 0.0, "max": 1.0 } } }"#)
            .unwrap();
        assert_eq!(cfg.rockets.interval_ms, Span::new(0.0, 1.0));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = SkyConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SkyError::ConfigParse(_)));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = SkyConfig::load("/definitely/not/here/sky.json").unwrap_err();
        assert!(matches!(err, SkyError::ConfigRead { .. }));
    }

    #[test]
    fn span_samples_stay_in_range_and_degenerate_span_is_constant() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let span = Span::new(0.01, 0.025);
        for _ in 0..1000 {
            let v = span.sample(&mut rng);
            assert!((0.01..0.025).contains(&v));
        }
        assert_eq!(Span::new(3.0, 3.0).sample(&mut rng), 3.0);
    }
}

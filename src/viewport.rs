use macroquad::prelude::*;

use crate::config;

/// Coarse device class, picked from the viewport at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceTier {
    Low,
    Standard,
}

impl DeviceTier {
    pub fn label(self) -> &'static str {
        match self {
            DeviceTier::Low => "low",
            DeviceTier::Standard => "standard",
        }
    }
}

/// Drawable area shared by every layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Small screens (narrow AND short) get the reduced effect set.
    pub fn tier(&self) -> DeviceTier {
        if self.width < config::LOW_TIER_MAX_WIDTH && self.height < config::LOW_TIER_MAX_HEIGHT {
            DeviceTier::Low
        } else {
            DeviceTier::Standard
        }
    }

    /// Wrap a position into `[0, width) x [0, height)`.
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        vec2(wrap_axis(pos.x, self.width), wrap_axis(pos.y, self.height))
    }

    #[cfg(test)]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x < self.width && pos.y >= 0.0 && pos.y < self.height
    }
}

fn wrap_axis(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

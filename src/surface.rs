use macroquad::prelude::*;

use crate::viewport::Viewport;

/// How a layer treats last frame's pixels before drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Backdrop {
    /// Wipe to transparent.
    Clear,
    /// Paint translucent black over the old frame, leaving fading trails.
    Veil(f32),
}

/// A 2D drawing target owned by exactly one layer.
pub trait Surface {
    fn resize(&mut self, width: f32, height: f32);
    fn prepare(&mut self, backdrop: Backdrop);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn present(&mut self) {}
}

/// Hands out surfaces by stable layer name. `None` means the layer has nowhere
/// to draw and must not start.
pub trait SurfaceProvider<S: Surface> {
    fn acquire(&mut self, layer: &str, viewport: &Viewport) -> Option<S>;
}

/// Filled circle with a larger translucent halo underneath.
pub fn fill_glowing(
    surface: &mut dyn Surface,
    center: Vec2,
    radius: f32,
    color: Color,
    blur: f32,
    glow_alpha: f32,
) {
    if blur > 0.0 {
        let halo = Color::new(color.r, color.g, color.b, color.a * glow_alpha);
        surface.fill_circle(center, radius + blur * 0.5, halo);
    }
    surface.fill_circle(center, radius, color);
}

#[cfg(test)]
pub mod testing {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawOp {
        Prepare(Backdrop),
        Circle { center: Vec2, radius: f32, color: Color },
        Line { from: Vec2, to: Vec2, width: f32, color: Color },
        Present,
    }

    /// Surface that records draw calls instead of touching the GPU.
    #[derive(Clone, Debug)]
    pub struct Recorder {
        pub size: Vec2,
        pub ops: Vec<DrawOp>,
    }

    impl Recorder {
        pub fn new(width: f32, height: f32) -> Self {
            Self {
                size: vec2(width, height),
                ops: Vec::new(),
            }
        }

        pub fn circles(&self) -> Vec<(Vec2, f32, Color)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Circle { center, radius, color } => Some((*center, *radius, *color)),
                    _ => None,
                })
                .collect()
        }

        pub fn lines(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).count()
        }
    }

    impl Surface for Recorder {
        fn resize(&mut self, width: f32, height: f32) {
            self.size = vec2(width, height);
        }

        fn prepare(&mut self, backdrop: Backdrop) {
            self.ops.clear();
            self.ops.push(DrawOp::Prepare(backdrop));
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.ops.push(DrawOp::Circle { center, radius, color });
        }

        fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
            self.ops.push(DrawOp::Line { from, to, width, color });
        }

        fn present(&mut self) {
            self.ops.push(DrawOp::Present);
        }
    }

    /// Provides recorders only for the listed layers.
    pub struct RecorderProvider {
        pub layers: Vec<&'static str>,
    }

    impl SurfaceProvider<Recorder> for RecorderProvider {
        fn acquire(&mut self, layer: &str, viewport: &Viewport) -> Option<Recorder> {
            self.layers
                .iter()
                .any(|l| *l == layer)
                .then(|| Recorder::new(viewport.width, viewport.height))
        }
    }
}

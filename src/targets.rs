use macroquad::miniquad::{BlendFactor, BlendState, BlendValue, Equation, PipelineParams};
use macroquad::prelude::*;

use crate::error::SkyError;
use crate::palette::premultiplied;
use crate::surface::{Backdrop, Surface, SurfaceProvider};
use crate::viewport::Viewport;

const LAYER_VERT: &str = r#"#version 100
attribute vec3 position;
attribute vec2 texcoord;
attribute vec4 color0;
varying lowp vec2 uv;
varying lowp vec4 color;
uniform mat4 Model;
uniform mat4 Projection;
void main() {
    gl_Position = Projection * Model * vec4(position, 1);
    color = color0 / 255.0;
    uv = texcoord;
}
"#;

const LAYER_FRAG: &str = r#"#version 100
precision lowp float;
varying lowp vec4 color;
varying lowp vec2 uv;
uniform sampler2D Texture;
void main() {
    gl_FragColor = color * texture2D(Texture, uv);
}
"#;

/// `src + dst * (1 - src.a)` on both color and alpha. Targets hold
/// premultiplied pixels, so a layer's alpha is applied exactly once.
fn premultiplied_over() -> BlendState {
    BlendState::new(
        Equation::Add,
        BlendFactor::One,
        BlendFactor::OneMinusValue(BlendValue::SourceAlpha),
    )
}

fn load_layer_material() -> Result<Material, SkyError> {
    load_material(
        ShaderSource::Glsl {
            vertex: LAYER_VERT,
            fragment: LAYER_FRAG,
        },
        MaterialParams {
            pipeline_params: PipelineParams {
                color_blend: Some(premultiplied_over()),
                alpha_blend: Some(premultiplied_over()),
                ..Default::default()
            },
            ..Default::default()
        },
    )
    .map_err(|e| SkyError::Material(format!("{e:?}")))
}

/// Offscreen render target backing one layer. Pixels persist between frames,
/// which is what lets a `Backdrop::Veil` leave trails.
pub struct LayerTarget {
    target: RenderTarget,
    material: Material,
    width: u32,
    height: u32,
}

impl LayerTarget {
    fn new(width: f32, height: f32, material: Material) -> Self {
        let (width, height) = (width.max(1.0) as u32, height.max(1.0) as u32);
        Self {
            target: Self::allocate(width, height),
            material,
            width,
            height,
        }
    }

    fn allocate(width: u32, height: u32) -> RenderTarget {
        let target = render_target(width, height);
        target.texture.set_filter(FilterMode::Linear);
        target
    }

    fn camera(&self) -> Camera2D {
        Camera2D {
            render_target: Some(self.target.clone()),
            ..Camera2D::from_display_rect(Rect::new(
                0.0,
                0.0,
                self.width as f32,
                self.height as f32,
            ))
        }
    }

    /// Composite this layer onto the current (screen) camera.
    pub fn blit(&self) {
        gl_use_material(&self.material);
        draw_texture_ex(
            &self.target.texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );
        gl_use_default_material();
    }
}

impl Surface for LayerTarget {
    fn resize(&mut self, width: f32, height: f32) {
        let (width, height) = (width.max(1.0) as u32, height.max(1.0) as u32);
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.target = Self::allocate(width, height);
        }
    }

    fn prepare(&mut self, backdrop: Backdrop) {
        set_camera(&self.camera());
        gl_use_material(&self.material);
        match backdrop {
            Backdrop::Clear => clear_background(Color::new(0.0, 0.0, 0.0, 0.0)),
            Backdrop::Veil(alpha) => draw_rectangle(
                0.0,
                0.0,
                self.width as f32,
                self.height as f32,
                Color::new(0.0, 0.0, 0.0, alpha),
            ),
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        draw_circle(center.x, center.y, radius, premultiplied(color));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        draw_line(from.x, from.y, to.x, to.y, width, premultiplied(color));
    }

    fn present(&mut self) {
        gl_use_default_material();
        set_default_camera();
    }
}

/// Creates a render target for every layer allowed by the launch options.
pub struct LayerTargets {
    allowed: Option<Vec<&'static str>>,
    material: Material,
}

impl LayerTargets {
    pub fn new(allowed: Option<Vec<&'static str>>) -> Result<Self, SkyError> {
        Ok(Self {
            allowed,
            material: load_layer_material()?,
        })
    }
}

impl SurfaceProvider<LayerTarget> for LayerTargets {
    fn acquire(&mut self, layer: &str, viewport: &Viewport) -> Option<LayerTarget> {
        let permitted = match &self.allowed {
            Some(list) => list.iter().any(|l| *l == layer),
            None => true,
        };
        permitted.then(|| LayerTarget::new(viewport.width, viewport.height, self.material.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::faded;

    /// CPU model of `premultiplied_over`, rgba.
    fn over(dst: [f32; 4], src: Color) -> [f32; 4] {
        let src = [src.r, src.g, src.b, src.a];
        let keep = 1.0 - src[3];
        [0, 1, 2, 3].map(|i| src[i] + dst[i] * keep)
    }

    fn as_color(px: [f32; 4]) -> Color {
        Color::new(px[0], px[1], px[2], px[3])
    }

    #[test]
    fn unit_opacity_reaches_the_screen_once() {
        let black_screen = [0.0, 0.0, 0.0, 1.0];
        for opacity in [0.3, 0.24, 0.8] {
            let unit = faded(WHITE, opacity);
            let layer = over([0.0; 4], premultiplied(unit));
            let screen = over(black_screen, as_color(layer));
            assert!((screen[0] - opacity).abs() < 1e-6, "{opacity} shows as {}", screen[0]);
            assert!((layer[3] - opacity).abs() < 1e-6, "layer alpha is not squared");
        }
    }

    #[test]
    fn veil_fades_layer_pixels_toward_transparent() {
        let lit = over([0.0; 4], premultiplied(Color::new(1.0, 0.0, 0.0, 1.0)));
        let veiled = over(lit, premultiplied(Color::new(0.0, 0.0, 0.0, 0.15)));
        assert!((veiled[0] - 0.85).abs() < 1e-6);
        assert!((veiled[3] - 0.85).abs() < 1e-6);
    }

    #[test]
    fn overlapping_units_accumulate_like_direct_drawing() {
        let a = faded(Color::new(1.0, 0.0, 0.0, 1.0), 0.5);
        let b = faded(Color::new(0.0, 0.0, 1.0, 1.0), 0.5);
        let layer = over(over([0.0; 4], premultiplied(a)), premultiplied(b));
        let via_layer = over([0.0, 0.0, 0.0, 1.0], as_color(layer));

        // Straight alpha drawn directly onto the black screen: red then blue.
        let direct = [0.25, 0.0, 0.5];
        for i in 0..3 {
            assert!((via_layer[i] - direct[i]).abs() < 1e-6);
        }
    }
}

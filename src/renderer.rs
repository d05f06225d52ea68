use macroquad::prelude::*;

use crate::driver::FrameDriver;
use crate::greeting::{Greeting, BASE_TITLE};
use crate::targets::LayerTarget;

const BG_COLOR: Color = Color::new(0.02, 0.01, 0.06, 1.0);
const TITLE_COLOR: Color = Color::new(1.0, 0.75, 0.04, 1.0);
const NAME_COLOR: Color = Color::new(0.0, 0.96, 1.0, 1.0);
const SHADOW: Color = Color::new(0.0, 0.0, 0.0, 0.6);

/// Composite every layer bottom to top, then the greeting on top.
pub fn draw(driver: &FrameDriver<LayerTarget>, greeting: &Greeting) {
    set_default_camera();
    clear_background(BG_COLOR);

    for layer in driver.layers() {
        layer.surface.blit();
    }

    draw_greeting(greeting);
}

fn draw_greeting(greeting: &Greeting) {
    let cx = screen_width() * 0.5;
    let cy = screen_height() * 0.45;
    let title_size = (screen_width() / 18.0).clamp(28.0, 72.0);
    let name_size = title_size * 0.8;

    centered_text(BASE_TITLE, cx, cy, title_size, TITLE_COLOR);
    centered_text(greeting.display_name(), cx, cy + title_size * 1.2, name_size, NAME_COLOR);
}

fn centered_text(text: &str, cx: f32, y: f32, size: f32, color: Color) {
    let width = measure_text(text, None, size as u16, 1.0).width;
    let x = cx - width * 0.5;
    draw_text(text, x + 2.0, y + 2.0, size, SHADOW);
    draw_text(text, x, y, size, color);
}

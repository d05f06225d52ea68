use macroquad::prelude::*;
use tracing::{error, info, warn};

mod config;
mod drift;
mod driver;
mod effect;
mod emitter;
mod error;
mod fireworks;
mod greeting;
mod palette;
mod particles;
mod renderer;
mod rockets;
mod stars;
mod stats;
mod surface;
mod targets;
mod ui;
mod viewport;

use config::SkyConfig;
use driver::{CancelToken, FrameDriver};
use greeting::LaunchOptions;
use stats::SkyStats;
use targets::LayerTargets;
use ui::{OverlayInfo, UiState};
use viewport::Viewport;

fn window_conf() -> Conf {
    let title = LaunchOptions::from_env()
        .map(|opts| opts.greeting().title())
        .unwrap_or_else(|_| greeting::BASE_TITLE.to_string());
    Conf {
        window_title: title,
        window_width: config::WINDOW_WIDTH,
        window_height: config::WINDOW_HEIGHT,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn load_config(opts: &LaunchOptions) -> SkyConfig {
    let Some(path) = opts.config_path.as_deref() else {
        return SkyConfig::default();
    };
    match SkyConfig::load(path) {
        Ok(cfg) => {
            info!(path, "config loaded");
            cfg
        }
        Err(e) => {
            error!("{e}; falling back to defaults");
            SkyConfig::default()
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();

    let opts = LaunchOptions::from_env().unwrap_or_else(|e| {
        warn!("{e}; using default launch options");
        LaunchOptions::default()
    });
    let cfg = load_config(&opts);
    let greeting = opts.greeting();

    let viewport = Viewport::new(screen_width(), screen_height());
    let tier = viewport.tier();
    info!(
        seed = opts.seed,
        tier = tier.label(),
        width = viewport.width,
        height = viewport.height,
        name = greeting.display_name(),
        "starting sky"
    );

    let mut driver = FrameDriver::new(viewport, config::TICK_MS);
    match LayerTargets::new(opts.layers.clone()) {
        Ok(mut targets) => {
            let mounted = driver.mount_all(
                effect::standard_effects(&cfg, &viewport, opts.seed),
                &mut targets,
            );
            info!(mounted, "layers mounted");
        }
        Err(e) => error!("{e}; showing the greeting without effects"),
    }

    let token = CancelToken::new();
    let mut accumulator = 0.0f32;
    let mut sky_stats = SkyStats::new(300);
    let mut ui_state = UiState::default();

    while !token.is_cancelled() {
        let frame_time = get_frame_time();
        driver.resize(screen_width(), screen_height());

        if is_key_pressed(KeyCode::Escape) {
            token.cancel();
        }
        if is_key_pressed(KeyCode::F1) {
            ui_state.show_overlay = !ui_state.show_overlay;
        }
        if is_key_pressed(KeyCode::Space) {
            ui_state.paused = !ui_state.paused;
        }

        if ui_state.paused {
            accumulator = 0.0;
        } else {
            accumulator += frame_time.min(0.25);
            let due = ((accumulator / config::FIXED_DT) as u32).min(config::MAX_TICKS_PER_FRAME);
            let ran = driver.run(&token, u64::from(due));
            accumulator -= ran as f32 * config::FIXED_DT;
            if due == config::MAX_TICKS_PER_FRAME {
                // Too far behind; drop the backlog instead of spiralling.
                accumulator = accumulator.min(config::FIXED_DT);
            }
        }

        renderer::draw(&driver, &greeting);

        let census = driver.census();
        sky_stats.record(frame_time * 1000.0, &census);
        let info = OverlayInfo {
            fps: get_fps(),
            ticks: driver.ticks(),
            tier: tier.label(),
            census: &census,
        };
        ui::draw_ui(&mut ui_state, &info, &sky_stats);

        next_frame().await;
    }

    driver.dispose();
}

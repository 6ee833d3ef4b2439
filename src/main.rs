//! GeoWare Arcade headless runner
//!
//! Drives the simulation core without a window: rolls barrels down a small
//! staircase level and fires a bubble into a seeded grid, logging outcomes.
//! Pass a tuning JSON file as the first argument to override the defaults.

#[cfg(not(target_arch = "wasm32"))]
use glam::Vec2;

#[cfg(not(target_arch = "wasm32"))]
use geoware_arcade::Tuning;
#[cfg(not(target_arch = "wasm32"))]
use geoware_arcade::sim::{Actor, Barrel, BarrelId, BubbleGrid, Level, Paddle, Rect};

/// Ticks the runner simulates before giving up on a barrel
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u32 = 2_000;

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning() -> Tuning {
    let Some(path) = std::env::args().nth(1) else {
        return Tuning::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(err) => {
                log::warn!("{err}; using default tuning");
                Tuning::default()
            }
        },
        Err(err) => {
            log::warn!("Cannot read {path}: {err}; using default tuning");
            Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn staircase() -> Level {
    Level::new(Rect::new(0.0, 0.0, 224.0, 256.0))
        .with_platform(1, Rect::new(0.0, 60.0, 200.0, 8.0))
        .with_platform(2, Rect::new(24.0, 110.0, 200.0, 8.0))
        .with_platform(3, Rect::new(0.0, 160.0, 200.0, 8.0))
        .with_platform(4, Rect::new(0.0, 232.0, 224.0, 8.0))
        .with_ladder(1, Rect::new(150.0, 60.0, 8.0, 50.0), true)
        .with_ladder(2, Rect::new(60.0, 110.0, 8.0, 50.0), true)
        .with_ladder(3, Rect::new(120.0, 160.0, 8.0, 72.0), false)
        .with_player_at(Vec2::new(20.0, 220.0))
}

#[cfg(not(target_arch = "wasm32"))]
fn run_barrels(tuning: &Tuning) {
    let level = staircase();
    let mut barrels: Vec<Barrel> = (0..4)
        .map(|i| Barrel::seeded(BarrelId(i), Vec2::new(8.0, 40.0), tuning.barrel.clone(), 0x5eed + u64::from(i)))
        .collect();

    for (i, barrel) in barrels.iter_mut().enumerate() {
        let mut tick = 0;
        while !barrel.is_removed() && tick < MAX_TICKS {
            barrel.update(&level);
            tick += 1;
        }
        log::info!(
            "Barrel {} finished after {} ticks at ({:.1}, {:.1}), removed: {}",
            i,
            tick,
            barrel.body().pos.x,
            barrel.body().pos.y,
            barrel.is_removed()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_paddle(tuning: &Tuning) {
    let level = Level::new(Rect::new(0.0, 0.0, 224.0, 256.0));
    let mut paddle = Paddle::new(Vec2::new(96.0, 240.0), 32.0, tuning.paddle.clone());
    paddle.move_left();
    for _ in 0..60 {
        paddle.update(&level);
    }
    log::info!("Paddle parked at x = {:.1}", paddle.body().pos.x);
}

#[cfg(not(target_arch = "wasm32"))]
fn run_bubbles(tuning: &Tuning) {
    let mut grid = BubbleGrid::new(Rect::new(0.0, 0.0, 200.0, 240.0), tuning.bubble.clone());
    let r = tuning.bubble.radius;

    // One row hanging from the ceiling
    for col in 0..8 {
        grid.spawn(Vec2::new(r + col as f32 * 2.0 * r, r), col % 3);
    }
    let ids: Vec<_> = grid.bubbles().iter().map(|b| b.id).collect();
    for pair in ids.windows(2) {
        grid.connect(pair[0], pair[1]);
    }
    grid.refresh_support();

    let shot = grid.spawn_launched(Vec2::new(100.0, 220.0), 1, 75.0, 6.0);
    for tick in 0..MAX_TICKS {
        let report = grid.update();
        if report.attached.contains(&shot) {
            log::info!("Shot attached after {} ticks", tick + 1);
            break;
        }
    }

    let dropped = grid.pop(&ids[2..3]);
    log::info!("Popped one bubble, {} left hanging", dropped.len());
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("GeoWare Arcade (headless) starting...");

    let tuning = load_tuning();
    run_barrels(&tuning);
    run_paddle(&tuning);
    run_bubbles(&tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host application drives the library directly on the web
}

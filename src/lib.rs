//! Tilt Maze - A tilt-controlled ball maze
//!
//! Core modules:
//! - `sim`: Level loading, collision categories, contact resolution and game state
//! - `settings`: Data-driven configuration loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{InputMode, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Scene dimensions (16 x 12 tiles)
    pub const SCENE_WIDTH: f32 = 1024.0;
    pub const SCENE_HEIGHT: f32 = 768.0;

    /// Level tiles are square, in scene units
    pub const TILE_SIZE: f32 = 64.0;

    /// Player spawn point at level start (column 1, row 10)
    pub const PLAYER_SPAWN: (f32, f32) = (96.0, 672.0);
    /// Player ball radius (sprite width / 2)
    pub const PLAYER_RADIUS: f32 = 32.0;
    pub const PLAYER_LINEAR_DAMPING: f32 = 0.5;

    /// Vortex spin rate (half a turn per second)
    pub const VORTEX_SPIN_RATE: f32 = std::f32::consts::PI;

    /// Score changes
    pub const STAR_BONUS: i64 = 1;
    pub const VORTEX_PENALTY: i64 = -1;

    /// Death animation: slide into the vortex, then shrink away
    pub const DEATH_MOVE_SECS: f32 = 0.25;
    pub const DEATH_SCALE_SECS: f32 = 0.25;
    pub const DEATH_FINAL_SCALE: f32 = 0.0001;

    /// Touch drag: gravity = (touch - player) / divisor
    pub const DRAG_GRAVITY_DIVISOR: f32 = 100.0;
    /// Accelerometer: gravity = (-y, x) * scale (landscape)
    pub const TILT_GRAVITY_SCALE: f32 = 50.0;

    /// Fixed HUD/background layout
    pub const BACKGROUND_POS: (f32, f32) = (512.0, 384.0);
    pub const SCORE_LABEL_POS: (f32, f32) = (16.0, 16.0);
    pub const SCORE_LABEL_FONT: &str = "Chalkduster";
}

/// Center of the tile at (column, row), origin at the bottom-left
#[inline]
pub fn tile_center(column: usize, row: usize) -> Vec2 {
    let half = consts::TILE_SIZE / 2.0;
    Vec2::new(
        consts::TILE_SIZE * column as f32 + half,
        consts::TILE_SIZE * row as f32 + half,
    )
}

/// Score display string
#[inline]
pub fn score_text(score: i64) -> String {
    format!("Score: {}", score)
}

/// Player spawn point as a vector
#[inline]
pub fn player_spawn() -> Vec2 {
    Vec2::new(consts::PLAYER_SPAWN.0, consts::PLAYER_SPAWN.1)
}

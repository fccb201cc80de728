//! Ninja Dash - a side-scrolling arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `renderer`: Canvas 2D drawing with procedural vector fallback
//! - `audio`: Web Audio SFX synthesis and the background step sequencer
//! - `settings`: Player preferences persisted to LocalStorage

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep. Velocities are tuned in units per tick, so
    /// the sim runs at 60 Hz regardless of display refresh rate.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player sprite dimensions and spawn column
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_MAX_HP: i32 = 100;
    /// Horizontal run speed (per tick) set by a directional press
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Upward impulse applied on jump (screen y grows downward)
    pub const JUMP_IMPULSE: f32 = -15.0;
    /// Downward acceleration per tick while airborne
    pub const GRAVITY: f32 = 0.8;
    /// Ground band height at the bottom of the field
    pub const GROUND_HEIGHT: f32 = 100.0;

    /// Racer jump arc: phase advance per tick, 0 to PI over ~40 ticks
    pub const ARC_RATE: f32 = std::f32::consts::PI / 40.0;
    /// Render height of the arc at its apex
    pub const ARC_AMPLITUDE: f32 = 80.0;
    /// Phase window (fractions of PI) where contact damage is suppressed
    pub const ARC_CLEAR_START: f32 = 0.25;
    pub const ARC_CLEAR_END: f32 = 0.75;

    /// Adversary defaults
    pub const ADVERSARY_SIZE: f32 = 50.0;
    pub const ADVERSARY_HP: i32 = 20;
    /// Random extra distance past the trailing edge at spawn
    pub const SPAWN_OFFSET_MAX: f32 = 200.0;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_DAMAGE: i32 = 10;

    /// Score awarded when an adversary's hp reaches zero
    pub const KILL_REWARD: u32 = 10;
    /// Player hp lost per tick of adversary contact
    pub const CONTACT_DAMAGE: i32 = 1;

    /// Background parallax scroll speed (per tick)
    pub const PARALLAX_SPEED: f32 = 1.0;
}

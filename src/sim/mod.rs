//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod state;
pub mod tick;

pub use collision::{Aabb, resolve_player_contact, resolve_projectiles};
pub use entity::Entity;
pub use state::{
    Adversary, Background, DifficultyCurve, Field, GameEvent, GameMode, GamePhase, JumpState,
    Player, Projectile, WorldState,
};
pub use tick::{TickInput, tick};

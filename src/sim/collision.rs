//! Axis-aligned collision resolution
//!
//! Two independent passes run once per tick, after all entities have updated
//! and off-screen deaths have been pruned: projectiles against adversaries
//! first, then the player against adversaries. Damage is commutative, so no
//! ordering is needed among simultaneous hits.

use glam::Vec2;

use super::entity::Entity;
use super::state::{Adversary, GameEvent, Player, Projectile};
use crate::consts::{CONTACT_DAMAGE, KILL_REWARD, PROJECTILE_DAMAGE};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from top-left position and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Box around a circle, radius as half-extent
    pub fn from_center_radius(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    /// Strict overlap test; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Projectile x adversary pass. Each projectile strikes at most one adversary
/// per tick and dies on impact; already-dead entities are skipped so nothing
/// is hit twice across ticks.
pub fn resolve_projectiles(
    projectiles: &mut [Projectile],
    adversaries: &mut [Adversary],
    score: &mut u32,
    events: &mut Vec<GameEvent>,
) {
    for projectile in projectiles.iter_mut() {
        if !projectile.alive {
            continue;
        }
        let shot = projectile.aabb();
        for adversary in adversaries.iter_mut() {
            if !adversary.alive {
                continue;
            }
            if shot.overlaps(&adversary.aabb()) {
                projectile.alive = false;
                if adversary.apply_hit(PROJECTILE_DAMAGE) {
                    *score += KILL_REWARD;
                    events.push(GameEvent::AdversaryDestroyed);
                } else {
                    events.push(GameEvent::AdversaryHit);
                }
                break;
            }
        }
    }
}

/// Player x adversary pass. Contact is continuous: every adversary
/// overlapping this tick costs hp, unless the jump-arc window suppresses it.
/// Returns true if the player's hp reached zero.
pub fn resolve_player_contact(player: &mut Player, adversaries: &[Adversary]) -> bool {
    if player.contact_suppressed() {
        return false;
    }
    let body = player.aabb();
    for adversary in adversaries {
        if adversary.alive && body.overlaps(&adversary.aabb()) {
            player.apply_contact(CONTACT_DAMAGE);
        }
    }
    player.hp == 0
}

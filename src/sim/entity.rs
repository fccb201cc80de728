//! Shared entity contract
//!
//! Every simulated object advances once per tick, reports a bounding box for
//! collision tests, and carries a liveness flag. Pruning and the collision
//! resolver only see this surface, never the concrete types.

use super::collision::Aabb;
use super::state::{Adversary, Field, Player, Projectile};

pub trait Entity {
    /// Advance one tick: apply velocity and entity-specific physics, test
    /// liveness-ending conditions. Called exactly once per tick per live
    /// entity.
    fn update(&mut self, field: &Field);

    /// Axis-aligned bounding box at the current position
    fn aabb(&self) -> Aabb;

    /// False once marked for removal; dead entities are purged at the next
    /// prune and never revived
    fn alive(&self) -> bool;
}

impl Entity for Player {
    fn update(&mut self, field: &Field) {
        self.advance(field);
    }

    fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    fn alive(&self) -> bool {
        self.hp > 0
    }
}

impl Entity for Adversary {
    fn update(&mut self, _field: &Field) {
        self.advance();
    }

    fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    fn alive(&self) -> bool {
        self.alive
    }
}

impl Entity for Projectile {
    fn update(&mut self, field: &Field) {
        self.advance(field);
    }

    /// Circular projectile proxied as a box with its radius as half-extent
    fn aabb(&self) -> Aabb {
        Aabb::from_center_radius(self.pos, self.radius)
    }

    fn alive(&self) -> bool {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameMode;
    use glam::Vec2;

    #[test]
    fn test_dead_entities_pruned_and_stay_dead() {
        let field = Field::new(800.0, 600.0);
        let mut adversaries = vec![
            Adversary::new(400.0, 450.0, 3.0),
            Adversary::new(2.0, 450.0, 60.0),
        ];
        for adv in &mut adversaries {
            adv.update(&field);
        }
        adversaries.retain(|a| a.alive());
        assert_eq!(adversaries.len(), 1);
        assert_eq!(adversaries[0].pos.x, 397.0);
    }

    #[test]
    fn test_projectile_culled_off_trailing_edge() {
        let field = Field::new(800.0, 600.0);
        let mut projectile = Projectile::new(Vec2::new(796.0, 300.0));
        projectile.update(&field);
        assert!(!projectile.alive());
    }

    #[test]
    fn test_player_alive_tracks_hp() {
        let field = Field::new(800.0, 600.0);
        let mut player = Player::new(GameMode::Runner, &field);
        assert!(player.alive());
        player.hp = 0;
        assert!(!player.alive());
    }
}

//! Per-tick simulation driver
//!
//! Advances one frame in a fixed order: background, player, projectiles
//! (update then prune), spawn gate, adversaries (update then prune),
//! collision passes, a final prune, frame counter. Entities marked dead by
//! the resolver are purged before the tick ends, so a dead entity is never
//! updated again.

use glam::Vec2;
use rand::Rng;

use super::collision::{resolve_player_contact, resolve_projectiles};
use super::entity::Entity;
use super::state::{Adversary, GameEvent, GameMode, GamePhase, Projectile, WorldState};
use crate::consts::*;

/// Input commands for a single tick. One-shot flags (`jump`, `fire`) are
/// cleared by the shell after each processed tick so a discrete press acts
/// exactly once.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal axis, -1..1 (keyboard press or joystick displacement)
    pub move_x: f32,
    /// Vertical axis, -1..1 (racer only)
    pub move_y: f32,
    /// Jump trigger
    pub jump: bool,
    /// Projectile trigger (runner only)
    pub fire: bool,
}

/// Advance the world by one tick. A no-op outside the Running phase, so the
/// terminal state latches the final score.
pub fn tick(world: &mut WorldState, input: &TickInput) {
    if world.phase != GamePhase::Running {
        return;
    }

    let field = world.field;
    world.background.advance(&field);

    // Input events become player velocity; presses set a fixed magnitude,
    // releases zero it (the shell keeps the axis at 0 when nothing is held)
    world.player.vel.x = input.move_x.clamp(-1.0, 1.0) * PLAYER_SPEED;
    if world.mode == GameMode::Racer {
        world.player.vel.y = input.move_y.clamp(-1.0, 1.0) * PLAYER_SPEED;
    }
    if input.jump && world.player.try_jump() {
        world.events.push(GameEvent::Jumped);
    }
    if input.fire && world.mode == GameMode::Runner {
        let muzzle = Vec2::new(
            world.player.pos.x + world.player.size.x,
            world.player.pos.y + world.player.size.y / 2.0,
        );
        world.projectiles.push(Projectile::new(muzzle));
        world.events.push(GameEvent::Fired);
    }

    world.player.update(&field);

    for projectile in &mut world.projectiles {
        projectile.update(&field);
    }
    world.projectiles.retain(|p| p.alive);

    spawn_gate(world);

    for adversary in &mut world.adversaries {
        adversary.update(&field);
    }
    world.adversaries.retain(|a| a.alive);

    resolve_projectiles(
        &mut world.projectiles,
        &mut world.adversaries,
        &mut world.score,
        &mut world.events,
    );
    if resolve_player_contact(&mut world.player, &world.adversaries) {
        world.phase = GamePhase::GameOver;
        world.events.push(GameEvent::GameOver);
    }
    // Entities the resolver killed are purged now, so a dead entity never
    // receives another update
    world.projectiles.retain(|p| p.alive);
    world.adversaries.retain(|a| a.alive);

    world.frames += 1;
}

/// Materialize a new adversary when the frame counter crosses the cadence
/// gate. Interval and speed band both follow the difficulty curve; speed is
/// fixed at spawn for the entity's lifetime.
fn spawn_gate(world: &mut WorldState) {
    let interval = world.difficulty.spawn_interval(world.score);
    if !world.frames.is_multiple_of(interval) {
        return;
    }

    let (lo, hi) = world.difficulty.speed_range(world.score);
    let speed = world.rng.random_range(lo..hi);
    // Past the trailing edge plus a random offset so entities don't pop in
    let x = world.field.width + world.rng.random_range(0.0..SPAWN_OFFSET_MAX);
    let y = match world.mode {
        GameMode::Runner => world.field.ground_y() - ADVERSARY_SIZE,
        GameMode::Racer => {
            // On a field too short for the road the band collapses to a line
            let bottom = world.field.ground_y() - ADVERSARY_SIZE;
            let top = world.field.road_top().min(bottom);
            if bottom > top {
                world.rng.random_range(top..bottom)
            } else {
                top
            }
        }
    };
    world.adversaries.push(Adversary::new(x, y, speed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::JumpState;

    fn runner_world(seed: u64) -> WorldState {
        WorldState::new(seed, GameMode::Runner, 800.0, 600.0)
    }

    /// Push the spawn gate out of the way so a scenario controls its own
    /// adversaries. The first tick still spawns (frame 0 crosses the gate),
    /// so absorb it and clear.
    fn isolated_world(seed: u64) -> WorldState {
        let mut world = runner_world(seed);
        world.difficulty.base_interval = 1_000_000;
        world.difficulty.min_interval = 1_000_000;
        world.start();
        tick(&mut world, &TickInput::default());
        world.adversaries.clear();
        world.events.clear();
        world
    }

    #[test]
    fn test_idle_does_not_tick() {
        let mut world = runner_world(1);
        tick(&mut world, &TickInput::default());
        assert_eq!(world.frames, 0);
        assert!(world.adversaries.is_empty());
    }

    #[test]
    fn test_start_begins_session() {
        let mut world = runner_world(1);
        world.start();
        assert_eq!(world.phase, GamePhase::Running);
        tick(&mut world, &TickInput::default());
        assert_eq!(world.frames, 1);
        // Frame 0 crosses the spawn gate immediately
        assert_eq!(world.adversaries.len(), 1);
    }

    #[test]
    fn test_spawned_speed_within_band() {
        let mut world = runner_world(7);
        world.start();
        tick(&mut world, &TickInput::default());
        let (lo, hi) = world.difficulty.speed_range(0);
        let adversary = &world.adversaries[0];
        assert!(adversary.speed >= lo && adversary.speed < hi);
        assert!(adversary.pos.x >= world.field.width - adversary.speed);
    }

    #[test]
    fn test_fire_spawns_one_projectile_per_press() {
        let mut world = isolated_world(2);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &fire);
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.drain_events(), vec![GameEvent::Fired]);

        // Shell clears the one-shot; no second projectile
        tick(&mut world, &TickInput::default());
        assert_eq!(world.projectiles.len(), 1);
    }

    #[test]
    fn test_racer_ignores_fire() {
        let mut world = WorldState::new(3, GameMode::Racer, 800.0, 600.0);
        world.start();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &fire);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_offscreen_adversary_pruned_without_score() {
        let mut world = isolated_world(4);
        world.adversaries.push(Adversary::new(10.0, 450.0, 100.0));
        tick(&mut world, &TickInput::default());
        assert!(world.adversaries.is_empty());
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_contact_for_ten_ticks_costs_ten_hp() {
        let mut world = isolated_world(5);
        // Parked on the player, zero speed
        let player_pos = world.player.pos;
        world
            .adversaries
            .push(Adversary::new(player_pos.x, player_pos.y, 0.0));
        for _ in 0..10 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.player.hp, 90);
        assert_eq!(world.phase, GamePhase::Running);
    }

    #[test]
    fn test_two_hits_kill_and_score_once() {
        let mut world = isolated_world(6);
        let ground = world.field.ground_y();
        world
            .adversaries
            .push(Adversary::new(600.0, ground - ADVERSARY_SIZE, 0.0));

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        // Fire two shots a few ticks apart; each travels right and strikes
        tick(&mut world, &fire);
        for _ in 0..60 {
            tick(&mut world, &TickInput::default());
            if world.projectiles.is_empty() {
                break;
            }
        }
        assert_eq!(world.adversaries[0].hp, ADVERSARY_HP - PROJECTILE_DAMAGE);
        assert_eq!(world.score, 0);

        tick(&mut world, &fire);
        for _ in 0..60 {
            tick(&mut world, &TickInput::default());
            if world.adversaries.is_empty() {
                break;
            }
        }
        assert!(world.adversaries.is_empty());
        assert_eq!(world.score, KILL_REWARD);
    }

    #[test]
    fn test_destroyed_adversary_purged_same_tick() {
        let mut world = isolated_world(12);
        let player_pos = world.player.pos;
        let mut adversary = Adversary::new(160.0, player_pos.y, 0.0);
        adversary.hp = PROJECTILE_DAMAGE;
        world.adversaries.push(adversary);

        // The shot spawns at the muzzle and advances into the adversary on
        // the same tick; both casualties are gone before the tick ends
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &fire);
        assert!(world.adversaries.is_empty());
        assert!(world.projectiles.is_empty());
        assert_eq!(world.score, KILL_REWARD);
    }

    #[test]
    fn test_racer_short_viewport_stays_in_bounds() {
        // A viewport too short for the road band must degrade, not panic
        let mut world = WorldState::new(11, GameMode::Racer, 800.0, 180.0);
        world.start();
        let input = TickInput {
            move_y: 1.0,
            jump: true,
            ..Default::default()
        };
        for _ in 0..240 {
            tick(&mut world, &input);
        }
        let bottom = world.field.ground_y() - world.player.size.y;
        assert_eq!(world.player.pos.y, bottom);
        for adversary in &world.adversaries {
            assert!(adversary.pos.y + ADVERSARY_SIZE <= world.field.ground_y());
        }
    }

    #[test]
    fn test_game_over_latches_score_and_frames() {
        let mut world = isolated_world(8);
        world.player.hp = 1;
        world.score = 30;
        let player_pos = world.player.pos;
        world
            .adversaries
            .push(Adversary::new(player_pos.x, player_pos.y, 0.0));

        tick(&mut world, &TickInput::default());
        assert_eq!(world.phase, GamePhase::GameOver);
        assert_eq!(world.player.hp, 0);
        assert!(world.drain_events().contains(&GameEvent::GameOver));

        let frames = world.frames;
        for _ in 0..100 {
            tick(&mut world, &TickInput::default());
        }
        assert_eq!(world.frames, frames);
        assert_eq!(world.score, 30);
    }

    #[test]
    fn test_restart_reproduces_initial_state() {
        let mut world = runner_world(9);
        world.start();
        let jump = TickInput {
            jump: true,
            fire: true,
            move_x: 1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut world, &jump);
        }

        // Restart is a full replacement, regardless of the prior session
        let fresh = runner_world(9);
        assert_eq!(fresh.phase, GamePhase::Idle);
        assert_eq!(fresh.score, 0);
        assert_eq!(fresh.frames, 0);
        assert_eq!(fresh.player.hp, PLAYER_MAX_HP);
        assert_eq!(fresh.player.pos.x, PLAYER_SPAWN_X);
        assert_eq!(fresh.player.jump, JumpState::Grounded);
        assert!(fresh.adversaries.is_empty());
        assert!(fresh.projectiles.is_empty());
        assert!(fresh.events.is_empty());
    }

    #[test]
    fn test_determinism_same_seed_same_world() {
        let mut a = runner_world(42);
        let mut b = runner_world(42);
        a.start();
        b.start();
        let input = TickInput {
            move_x: 1.0,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.score, b.score);
        assert_eq!(a.adversaries.len(), b.adversaries.len());
        for (x, y) in a.adversaries.iter().zip(&b.adversaries) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.speed, y.speed);
        }
    }

    #[test]
    fn test_jump_event_raised_once() {
        let mut world = isolated_world(10);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut world, &jump);
        assert_eq!(world.drain_events(), vec![GameEvent::Jumped]);
        // Still airborne: held jump does not re-trigger
        tick(&mut world, &jump);
        assert!(world.drain_events().is_empty());
    }
}

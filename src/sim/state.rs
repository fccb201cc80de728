//! Game state and core simulation types
//!
//! The whole session lives in one [`WorldState`] owned by the shell. Restart
//! builds a fresh value rather than patching the old one, so stale entities
//! from a previous session can never leak into the next.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Before the first start or after game over, not ticking
    Idle,
    /// Active gameplay
    Running,
    /// Run ended, score latched
    GameOver,
}

/// Gameplay variant. One parameterized design covers both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Gravity jump, projectiles, ground line
    #[default]
    Runner,
    /// Free 2D movement on a road, timed jump arc, no projectiles
    Racer,
}

/// Events raised by the sim for the shell to turn into sound effects.
/// The sim never talks to the audio backend directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    Fired,
    AdversaryHit,
    AdversaryDestroyed,
    GameOver,
}

/// Visible field geometry. Resizing the canvas rebuilds this, which moves the
/// ground line and movement bounds with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Top of the ground band
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_HEIGHT
    }

    /// Rightmost x the player's left edge may reach. The player is confined
    /// to the leading part of the field so the background scroll reads as
    /// forward motion.
    pub fn player_max_x(&self, mode: GameMode) -> f32 {
        match mode {
            GameMode::Runner => self.width * 0.5,
            GameMode::Racer => self.width * 0.4,
        }
    }

    /// Top of the racer's road region
    pub fn road_top(&self) -> f32 {
        self.height * 0.3
    }
}

/// Player jump state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpState {
    Grounded,
    /// Runner: integrating gravity until the ground line is reached
    Airborne,
    /// Racer: timed arc, phase runs 0..PI at a fixed rate
    Arc { phase: f32 },
}

/// The controllable entity, one per session
#[derive(Debug, Clone)]
pub struct Player {
    pub mode: GameMode,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub hp: i32,
    pub jump: JumpState,
}

impl Player {
    pub fn new(mode: GameMode, field: &Field) -> Self {
        let size = Vec2::splat(PLAYER_SIZE);
        let y = match mode {
            GameMode::Runner => field.ground_y() - size.y,
            GameMode::Racer => (field.road_top() + field.ground_y() - size.y) / 2.0,
        };
        Self {
            mode,
            pos: Vec2::new(PLAYER_SPAWN_X, y),
            size,
            vel: Vec2::ZERO,
            hp: PLAYER_MAX_HP,
            jump: JumpState::Grounded,
        }
    }

    /// Attempt a jump. Only accepted while grounded; returns whether the
    /// transition happened so the caller can raise [`GameEvent::Jumped`].
    pub fn try_jump(&mut self) -> bool {
        if self.jump != JumpState::Grounded {
            return false;
        }
        match self.mode {
            GameMode::Runner => {
                self.vel.y = JUMP_IMPULSE;
                self.jump = JumpState::Airborne;
            }
            GameMode::Racer => {
                self.jump = JumpState::Arc { phase: 0.0 };
            }
        }
        true
    }

    /// Vertical render offset of the racer's jump arc (0 when not arcing)
    pub fn arc_offset(&self) -> f32 {
        match self.jump {
            JumpState::Arc { phase } => phase.sin() * ARC_AMPLITUDE,
            _ => 0.0,
        }
    }

    /// Contact damage is suppressed near the apex of the racer's arc so the
    /// player can clear an obstacle
    pub fn contact_suppressed(&self) -> bool {
        use std::f32::consts::PI;
        match self.jump {
            JumpState::Arc { phase } => {
                phase > ARC_CLEAR_START * PI && phase < ARC_CLEAR_END * PI
            }
            _ => false,
        }
    }

    /// Take contact damage, clamped at zero
    pub fn apply_contact(&mut self, damage: i32) {
        self.hp = (self.hp - damage).max(0);
    }

    pub fn advance(&mut self, field: &Field) {
        match self.mode {
            GameMode::Runner => self.advance_runner(field),
            GameMode::Racer => self.advance_racer(field),
        }
    }

    fn advance_runner(&mut self, field: &Field) {
        self.pos.y += self.vel.y;
        if self.pos.y + self.size.y < field.ground_y() {
            self.vel.y += GRAVITY;
            self.jump = JumpState::Airborne;
        } else {
            // Landed: snap to the ground line and zero vertical velocity
            self.vel.y = 0.0;
            self.pos.y = field.ground_y() - self.size.y;
            self.jump = JumpState::Grounded;
        }

        self.pos.x += self.vel.x;
        self.clamp_to(field);
    }

    fn advance_racer(&mut self, field: &Field) {
        if let JumpState::Arc { phase } = self.jump {
            let next = phase + ARC_RATE;
            self.jump = if next >= std::f32::consts::PI {
                JumpState::Grounded
            } else {
                JumpState::Arc { phase: next }
            };
        }

        self.pos += self.vel;
        self.clamp_to(field);
    }

    /// Re-clamp into the movement bounds for the current field geometry.
    /// On a field too short to hold the full road the band degenerates to a
    /// single line rather than inverting.
    pub fn clamp_to(&mut self, field: &Field) {
        self.pos.x = self.pos.x.clamp(0.0, field.player_max_x(self.mode));
        if self.mode == GameMode::Racer {
            let bottom = field.ground_y() - self.size.y;
            let top = field.road_top().min(bottom);
            self.pos.y = self.pos.y.clamp(top, bottom);
        }
    }
}

/// An enemy or obstacle scrolling in from the trailing edge
#[derive(Debug, Clone)]
pub struct Adversary {
    pub pos: Vec2,
    pub size: Vec2,
    /// Leftward speed per tick, fixed at spawn for the entity's lifetime
    pub speed: f32,
    pub hp: i32,
    pub alive: bool,
}

impl Adversary {
    pub fn new(x: f32, y: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::splat(ADVERSARY_SIZE),
            speed,
            hp: ADVERSARY_HP,
            alive: true,
        }
    }

    pub fn advance(&mut self) {
        self.pos.x -= self.speed;
        if self.pos.x + self.size.x < 0.0 {
            self.alive = false;
        }
    }

    /// Take a projectile hit; returns true if this hit destroyed it
    pub fn apply_hit(&mut self, damage: i32) -> bool {
        self.hp -= damage;
        if self.hp <= 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// A player-fired shuriken with straight-line motion
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub alive: bool,
}

impl Projectile {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PROJECTILE_RADIUS,
            speed: PROJECTILE_SPEED,
            alive: true,
        }
    }

    pub fn advance(&mut self, field: &Field) {
        self.pos.x += self.speed;
        if self.pos.x - self.radius > field.width {
            self.alive = false;
        }
    }
}

/// Scrolling parallax backdrop. Purely visual, never collides.
#[derive(Debug, Clone, Default)]
pub struct Background {
    pub offset: f32,
    pub speed: f32,
}

impl Background {
    pub fn new() -> Self {
        Self {
            offset: 0.0,
            speed: PARALLAX_SPEED,
        }
    }

    pub fn advance(&mut self, field: &Field) {
        self.offset -= self.speed;
        if self.offset <= -field.width {
            self.offset = 0.0;
        }
    }
}

/// Spawn cadence and speed as one configurable curve over score, replacing
/// per-variant hard-coded thresholds. Interval is monotonically
/// non-increasing; the speed band's lower bound rises with score.
#[derive(Debug, Clone)]
pub struct DifficultyCurve {
    /// Spawn gate interval at score 0, in frames
    pub base_interval: u64,
    /// Interval floor
    pub min_interval: u64,
    /// Frames removed from the interval per `score_step` points
    pub interval_step: u64,
    pub score_step: u32,
    /// Lower bound of the spawn speed band at score 0
    pub base_speed: f32,
    /// Width of the random speed band
    pub speed_band: f32,
    /// Speed added to the band's lower bound per score point
    pub speed_ramp: f32,
    /// Cap on the band's upper bound
    pub max_speed: f32,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            base_interval: 120,
            min_interval: 40,
            interval_step: 30,
            score_step: 50,
            base_speed: 3.0,
            speed_band: 2.0,
            speed_ramp: 0.01,
            max_speed: 9.0,
        }
    }
}

impl DifficultyCurve {
    /// Frames between spawns at the given score
    pub fn spawn_interval(&self, score: u32) -> u64 {
        let steps = (score / self.score_step.max(1)) as u64;
        self.base_interval
            .saturating_sub(steps * self.interval_step)
            .max(self.min_interval)
    }

    /// Inclusive-exclusive speed band sampled at spawn
    pub fn speed_range(&self, score: u32) -> (f32, f32) {
        let hi_cap = self.max_speed - self.speed_band;
        let lo = (self.base_speed + score as f32 * self.speed_ramp).min(hi_cap);
        (lo, lo + self.speed_band)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct WorldState {
    pub mode: GameMode,
    pub phase: GamePhase,
    pub field: Field,
    pub score: u32,
    /// Tick counter, the clock for spawn cadence and difficulty
    pub frames: u64,
    pub player: Player,
    pub adversaries: Vec<Adversary>,
    pub projectiles: Vec<Projectile>,
    pub background: Background,
    pub difficulty: DifficultyCurve,
    pub rng: Pcg32,
    /// Pending events, drained by the shell after each tick
    pub events: Vec<GameEvent>,
}

impl WorldState {
    /// Build an idle session. Call [`WorldState::start`] to begin ticking.
    pub fn new(seed: u64, mode: GameMode, width: f32, height: f32) -> Self {
        let field = Field::new(width, height);
        Self {
            mode,
            phase: GamePhase::Idle,
            field,
            score: 0,
            frames: 0,
            player: Player::new(mode, &field),
            adversaries: Vec::new(),
            projectiles: Vec::new(),
            background: Background::new(),
            difficulty: DifficultyCurve::default(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Idle -> Running. No-op in any other phase.
    pub fn start(&mut self) {
        if self.phase == GamePhase::Idle {
            self.phase = GamePhase::Running;
        }
    }

    /// Viewport resized: rebuild field geometry and re-clamp the player
    pub fn resize(&mut self, width: f32, height: f32) {
        self.field = Field::new(width, height);
        let field = self.field;
        self.player.clamp_to(&field);
    }

    /// Hand pending events to the shell
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Field {
        Field::new(800.0, 600.0)
    }

    #[test]
    fn test_jump_only_while_grounded() {
        let f = field();
        let mut player = Player::new(GameMode::Runner, &f);
        assert!(player.try_jump());
        assert_eq!(player.jump, JumpState::Airborne);
        // Second jump mid-air is rejected
        player.advance(&f);
        assert!(!player.try_jump());
    }

    #[test]
    fn test_runner_lands_on_ground_line() {
        let f = field();
        let mut player = Player::new(GameMode::Runner, &f);
        player.try_jump();
        // Integrate until landing; impulse -15 with gravity 0.8 lands well
        // within 60 ticks
        for _ in 0..60 {
            player.advance(&f);
        }
        assert_eq!(player.jump, JumpState::Grounded);
        assert_eq!(player.pos.y, f.ground_y() - player.size.y);
        assert_eq!(player.vel.y, 0.0);
    }

    #[test]
    fn test_player_clamped_to_leading_half() {
        let f = field();
        let mut player = Player::new(GameMode::Runner, &f);
        player.vel.x = 1000.0;
        player.advance(&f);
        assert_eq!(player.pos.x, f.player_max_x(GameMode::Runner));
        player.vel.x = -10000.0;
        player.advance(&f);
        assert_eq!(player.pos.x, 0.0);
    }

    #[test]
    fn test_racer_arc_phase_resets() {
        let f = field();
        let mut player = Player::new(GameMode::Racer, &f);
        assert!(player.try_jump());
        let mut saw_suppression = false;
        let mut saw_lift = false;
        for _ in 0..200 {
            player.advance(&f);
            saw_suppression |= player.contact_suppressed();
            saw_lift |= player.arc_offset() > 0.0;
            if player.jump == JumpState::Grounded {
                break;
            }
        }
        assert_eq!(player.jump, JumpState::Grounded);
        assert!(saw_suppression);
        assert!(saw_lift);
        assert_eq!(player.arc_offset(), 0.0);
        assert!(!player.contact_suppressed());
    }

    #[test]
    fn test_racer_clamped_on_short_field() {
        // Field too short for the road band: the bounds degenerate to the
        // ground line instead of inverting
        let f = Field::new(800.0, 180.0);
        let mut player = Player::new(GameMode::Racer, &f);
        player.vel.y = 100.0;
        player.advance(&f);
        assert_eq!(player.pos.y, f.ground_y() - player.size.y);
        player.vel.y = -100.0;
        player.advance(&f);
        assert_eq!(player.pos.y, f.ground_y() - player.size.y);
    }

    #[test]
    fn test_contact_damage_clamped_at_zero() {
        let f = field();
        let mut player = Player::new(GameMode::Runner, &f);
        player.hp = 3;
        for _ in 0..10 {
            player.apply_contact(1);
        }
        assert_eq!(player.hp, 0);
    }

    #[test]
    fn test_adversary_position_after_n_ticks() {
        let mut adv = Adversary::new(1000.0, 450.0, 5.0);
        for _ in 0..50 {
            adv.advance();
        }
        assert_eq!(adv.pos.x, 750.0);
        assert!(adv.alive);
    }

    #[test]
    fn test_adversary_dies_off_left_edge() {
        let mut adv = Adversary::new(10.0, 450.0, 100.0);
        adv.advance();
        assert!(!adv.alive);
    }

    #[test]
    fn test_difficulty_interval_non_increasing() {
        let curve = DifficultyCurve::default();
        let mut last = u64::MAX;
        for score in 0..500 {
            let interval = curve.spawn_interval(score);
            assert!(interval <= last);
            assert!(interval >= curve.min_interval);
            last = interval;
        }
        assert_eq!(curve.spawn_interval(0), 120);
        assert_eq!(curve.spawn_interval(60), 90);
        assert_eq!(curve.spawn_interval(110), 60);
    }

    #[test]
    fn test_difficulty_speed_band_capped() {
        let curve = DifficultyCurve::default();
        let (lo0, hi0) = curve.speed_range(0);
        assert_eq!(lo0, 3.0);
        assert_eq!(hi0, 5.0);
        let (_, hi) = curve.speed_range(100_000);
        assert!(hi <= curve.max_speed);
    }
}

//! Fly entity - a devious, hard-to-catch fly with erratic movement
//!
//! The behavior machine is a tagged union: each state carries its own timers
//! and payload, so a stale landing target can never leak into another state.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{angle_between, lerp};

/// Behavior state. Exactly one is active; `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlyState {
    /// Random walk with periodic heading changes
    Wandering { timer: f32, change_after: f32 },
    /// Orbiting the baby's face before diving in
    Circling { timer: f32 },
    /// Closing on the baby's face with jittered heading
    Approaching { timer: f32 },
    /// Easing onto a fixed point near the baby
    Landing { target: Vec2, timer: f32 },
    /// Knocked back by a shoo or dodge; impulse decays each tick
    Shooed { impulse: Vec2, timer: f32 },
    /// Squashed or flung off-screen; fades out, then pruned
    Dead { timer: f32 },
}

/// One insect. Owned by the session, created on spawn, pruned once
/// dead-and-faded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fly {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: FlyState,
    /// Current wander heading (radians)
    pub wander_angle: f32,
    /// Phase of the sinusoidal zigzag offset
    pub erratic_phase: f32,
    /// Per-fly randomized zigzag shape
    pub zigzag_amplitude: f32,
    pub zigzag_freq: f32,
    /// Chance per wander-cycle of turning toward the baby; set at spawn
    pub baby_bias: f32,
    /// Seconds before the next dodge is allowed
    pub dodge_cooldown: f32,
    /// Time-based difficulty scalars, recomputed every tick
    pub speed_multiplier: f32,
    pub dodge_chance: f32,
    /// Death fade, 1 -> 0 over a third of a second
    pub alpha: f32,
}

/// Global speed scaling: ramps from 1x to 4x over six minutes
#[inline]
pub fn speed_multiplier_at(game_time: f32) -> f32 {
    1.0 + (game_time.max(0.0) / 90.0).min(3.0)
}

/// Global dodge chance: 85% base, creeping to the 92% cap
#[inline]
pub fn dodge_chance_at(game_time: f32) -> f32 {
    (0.85 + game_time.max(0.0) / 600.0).min(0.92)
}

impl Fly {
    /// Spawn just outside a random screen edge
    pub fn spawn<R: Rng>(id: u32, baby_bias: f32, rng: &mut R) -> Self {
        let pos = match rng.random_range(0..4u8) {
            0 => Vec2::new(rng.random_range(30.0..GAME_WIDTH - 30.0), -20.0),
            1 => Vec2::new(GAME_WIDTH + 20.0, rng.random_range(30.0..GAME_HEIGHT * 0.7)),
            2 => Vec2::new(rng.random_range(30.0..GAME_WIDTH - 30.0), GAME_HEIGHT * 0.8),
            _ => Vec2::new(-20.0, rng.random_range(30.0..GAME_HEIGHT * 0.7)),
        };

        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            state: FlyState::Wandering {
                timer: 0.0,
                change_after: rng.random_range(0.3..1.2),
            },
            wander_angle: rng.random_range(0.0..std::f32::consts::TAU),
            erratic_phase: rng.random_range(0.0..std::f32::consts::TAU),
            zigzag_amplitude: rng.random_range(30.0..80.0),
            zigzag_freq: rng.random_range(3.0..7.0),
            baby_bias,
            dodge_cooldown: 0.0,
            speed_multiplier: 1.0,
            dodge_chance: dodge_chance_at(0.0),
            alpha: 1.0,
        }
    }

    /// Advance one tick. `face` is the baby's face center, read-only for the
    /// whole tick; `game_time` is elapsed survival time.
    pub fn update<R: Rng>(&mut self, dt: f32, face: Vec2, game_time: f32, rng: &mut R) {
        self.erratic_phase += dt * self.zigzag_freq;
        self.dodge_cooldown = (self.dodge_cooldown - dt).max(0.0);

        self.speed_multiplier = speed_multiplier_at(game_time);
        self.dodge_chance = dodge_chance_at(game_time);

        match self.state {
            FlyState::Wandering { .. } => self.update_wandering(dt, rng),
            FlyState::Circling { .. } => self.update_circling(dt, face, rng),
            FlyState::Approaching { .. } => self.update_approaching(dt, face, rng),
            FlyState::Landing { .. } => self.update_landing(dt),
            FlyState::Shooed { .. } => self.update_shooed(dt, rng),
            FlyState::Dead { .. } => self.update_dead(dt),
        }

        // Keep live flies in the play area (above the crib rail)
        if !matches!(self.state, FlyState::Shooed { .. } | FlyState::Dead { .. }) {
            self.pos.x = self.pos.x.clamp(-10.0, GAME_WIDTH + 10.0);
            self.pos.y = self.pos.y.clamp(-10.0, GAME_HEIGHT * 0.8);
        }
    }

    fn update_wandering<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        let (mut timer, mut change_after) = match self.state {
            FlyState::Wandering { timer, change_after } => (timer, change_after),
            _ => return,
        };
        timer += dt;

        if timer >= change_after {
            if rng.random::<f32>() < self.baby_bias {
                // Sometimes circle first, sometimes dive straight in
                self.state = if rng.random::<f32>() < 0.4 {
                    FlyState::Circling { timer: 0.0 }
                } else {
                    FlyState::Approaching { timer: 0.0 }
                };
                return;
            }
            self.wander_angle += rng.random_range(-std::f32::consts::FRAC_PI_2..std::f32::consts::FRAC_PI_2);
            timer = 0.0;
            change_after = rng.random_range(0.3..1.0);
        }

        // Erratic heading drift plus a sinusoidal zigzag offset
        self.wander_angle += (rng.random::<f32>() - 0.5) * dt * 5.0;
        let erratic = self.erratic_phase.sin() * self.zigzag_amplitude * dt;

        let spd = FLY_BASE_SPEED * self.speed_multiplier * 0.7;
        let target_vx = self.wander_angle.cos() * spd;
        let target_vy = self.wander_angle.sin() * spd + erratic;

        self.vel.x = lerp(self.vel.x, target_vx, dt * 4.0);
        self.vel.y = lerp(self.vel.y, target_vy, dt * 4.0);
        self.pos += self.vel * dt;

        // Bounce off edges and re-derive the heading
        if self.pos.x < 10.0 || self.pos.x > GAME_WIDTH - 10.0 {
            self.vel.x = -self.vel.x;
            self.wander_angle = self.vel.y.atan2(self.vel.x);
        }
        if self.pos.y < 10.0 || self.pos.y > GAME_HEIGHT * 0.75 {
            self.vel.y = -self.vel.y;
            self.wander_angle = self.vel.y.atan2(self.vel.x);
        }

        self.state = FlyState::Wandering { timer, change_after };
    }

    fn update_circling<R: Rng>(&mut self, dt: f32, face: Vec2, rng: &mut R) {
        let mut timer = match self.state {
            FlyState::Circling { timer } => timer,
            _ => return,
        };
        timer += dt;

        let angle = angle_between(face, self.pos);
        let circle_angle = angle + std::f32::consts::FRAC_PI_2;
        let d = self.pos.distance(face);
        // The orbit radius itself breathes, so the path never settles
        let target_dist = 80.0 + (timer * 2.0).sin() * 20.0;
        let radial_force = (d - target_dist) * 2.0;
        let spd = FLY_BASE_SPEED * self.speed_multiplier * 0.8;

        let target_vx = circle_angle.cos() * spd - angle.cos() * radial_force;
        let target_vy = circle_angle.sin() * spd - angle.sin() * radial_force;
        self.vel.x = lerp(self.vel.x, target_vx, dt * 3.0);
        self.vel.y = lerp(self.vel.y, target_vy, dt * 3.0);
        self.pos += self.vel * dt;

        // After circling for a while, dive in
        if timer > 2.0 + rng.random::<f32>() * 2.0 {
            self.state = FlyState::Approaching { timer: 0.0 };
        } else {
            self.state = FlyState::Circling { timer };
        }
    }

    fn update_approaching<R: Rng>(&mut self, dt: f32, face: Vec2, rng: &mut R) {
        let mut timer = match self.state {
            FlyState::Approaching { timer } => timer,
            _ => return,
        };
        timer += dt;

        let angle = angle_between(self.pos, face);

        // Two superimposed perturbations keep the path unpredictable
        let jitter = (timer * 8.0).sin() * 0.8;
        let zigzag = (timer * 5.0).cos() * 0.5;
        let spd = FLY_BASE_SPEED * self.speed_multiplier * 1.2;

        self.vel.x = lerp(self.vel.x, (angle + jitter + zigzag).cos() * spd, dt * 2.5);
        self.vel.y = lerp(self.vel.y, (angle + jitter + zigzag).sin() * spd, dt * 2.5);
        self.pos += self.vel * dt;

        if self.pos.distance(face) < LANDING_DISTANCE {
            let target = face
                + Vec2::new(rng.random_range(-12.0..12.0), rng.random_range(-8.0..8.0));
            self.state = FlyState::Landing { target, timer: 0.0 };
            return;
        }

        // Give up after three seconds and fall back to circling or wandering
        if timer > 3.0 {
            if rng.random::<f32>() < 0.3 {
                self.state = FlyState::Circling { timer: 0.0 };
            } else {
                self.wander_angle = rng.random_range(0.0..std::f32::consts::TAU);
                self.state = FlyState::Wandering {
                    timer: 0.0,
                    change_after: rng.random_range(0.3..1.0),
                };
            }
            return;
        }

        self.state = FlyState::Approaching { timer };
    }

    fn update_landing(&mut self, dt: f32) {
        let (target, mut timer) = match self.state {
            FlyState::Landing { target, timer } => (target, timer),
            _ => return,
        };
        timer += dt;

        self.pos.x = lerp(self.pos.x, target.x, dt * 3.0);
        self.pos.y = lerp(self.pos.y, target.y, dt * 3.0);
        self.vel.x = lerp(self.vel.x, 0.0, dt * 5.0);
        self.vel.y = lerp(self.vel.y, 0.0, dt * 5.0);

        self.state = FlyState::Landing { target, timer };
    }

    fn update_shooed<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        let (mut impulse, mut timer) = match self.state {
            FlyState::Shooed { impulse, timer } => (impulse, timer),
            _ => return,
        };
        timer += dt;

        self.pos += impulse * dt;
        impulse *= SHOO_FRICTION;

        if timer > 0.5 {
            let off_screen = self.pos.x < -30.0
                || self.pos.x > GAME_WIDTH + 30.0
                || self.pos.y < -30.0
                || self.pos.y > GAME_HEIGHT + 30.0;
            if off_screen {
                self.state = FlyState::Dead { timer: 0.0 };
            } else {
                // Resume wandering along the residual impulse direction
                self.wander_angle = impulse.y.atan2(impulse.x);
                self.vel = impulse;
                self.state = FlyState::Wandering {
                    timer: 0.0,
                    change_after: rng.random_range(0.3..1.0),
                };
            }
            return;
        }

        self.state = FlyState::Shooed { impulse, timer };
    }

    fn update_dead(&mut self, dt: f32) {
        let mut timer = match self.state {
            FlyState::Dead { timer } => timer,
            _ => return,
        };
        timer += dt;
        self.alpha = (1.0 - timer * 3.0).max(0.0);
        self.state = FlyState::Dead { timer };
    }

    /// Knock the fly back along `dir` (swipe direction). No-op when dead.
    pub fn shoo(&mut self, dir: Vec2, force: f32) {
        if matches!(self.state, FlyState::Dead { .. }) {
            return;
        }
        let dir = if dir.length_squared() > 0.0 {
            dir.normalize()
        } else {
            Vec2::X
        };
        self.state = FlyState::Shooed {
            impulse: dir * force * self.speed_multiplier,
            timer: 0.0,
        };
    }

    /// Evasive burst away from a tap, at a randomized angle offset. Gated by
    /// the per-fly cooldown; a suppressed dodge still counts as a miss for
    /// the tapper.
    pub fn dodge<R: Rng>(&mut self, tap: Vec2, rng: &mut R) {
        if matches!(self.state, FlyState::Dead { .. }) || self.dodge_cooldown > 0.0 {
            return;
        }
        self.dodge_cooldown = DODGE_COOLDOWN;

        let base_angle = angle_between(tap, self.pos);
        let offset = rng.random_range(-std::f32::consts::FRAC_PI_3..std::f32::consts::FRAC_PI_3);
        let force = FLY_DODGE_SPEED * self.speed_multiplier;
        self.state = FlyState::Shooed {
            impulse: Vec2::new((base_angle + offset).cos(), (base_angle + offset).sin()) * force,
            timer: 0.0,
        };
    }

    /// Kill the fly. It stays in the collection through the fade-out.
    pub fn squash(&mut self) {
        self.state = FlyState::Dead { timer: 0.0 };
    }

    /// True while the fly is landed within touching distance of the face
    pub fn is_on_baby(&self, face: Vec2) -> bool {
        matches!(self.state, FlyState::Landing { .. }) && self.pos.distance(face) < ON_BABY_RADIUS
    }

    /// Landing duration, while in the landing state
    pub fn landing_timer(&self) -> Option<f32> {
        match self.state {
            FlyState::Landing { timer, .. } => Some(timer),
            _ => None,
        }
    }

    /// Normalized closeness to the baby's face: 1 at contact, 0 beyond
    /// [`PROXIMITY_MAX_DIST`]
    pub fn proximity(&self, face: Vec2) -> f32 {
        (1.0 - self.pos.distance(face) / PROXIMITY_MAX_DIST).clamp(0.0, 1.0)
    }

    /// Eligible for removal: fully dead, past the grace window. The window is
    /// longer than the visual fade on purpose.
    pub fn is_dead(&self) -> bool {
        matches!(self.state, FlyState::Dead { timer } if timer > 0.5)
    }

    /// Excluded from gestures and meter drain
    pub fn is_inert(&self) -> bool {
        matches!(self.state, FlyState::Dead { .. } | FlyState::Shooed { .. })
    }
}

//! Sleep Tight - defend a sleeping baby from devious flies
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fly AI, baby state, sleep meter, gestures)
//! - `input`: Tap/swipe buffering at the input-collaborator boundary
//! - `save`: Leaderboard and lifetime stats with export/import
//! - `settings`: Player preferences

pub mod input;
pub mod save;
pub mod settings;
pub mod sim;

pub use save::{SaveData, ScoreRecord};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical play-area size (portrait, scaled to fit the screen)
    pub const GAME_WIDTH: f32 = 400.0;
    pub const GAME_HEIGHT: f32 = 720.0;

    /// Largest frame delta the sim will accept (slow frames are clamped,
    /// not integrated in one unstable step)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Fly movement
    pub const FLY_BASE_SPEED: f32 = 100.0;
    pub const FLY_DODGE_SPEED: f32 = 500.0;
    pub const SHOO_BASE_FORCE: f32 = 250.0;
    /// Per-tick decay applied to a shoo/dodge impulse
    pub const SHOO_FRICTION: f32 = 0.93;

    /// Dodge-eligibility radius around a tap. Wider than the squash radius:
    /// a fly between the two can be dodge-rolled but never squashed.
    pub const TAP_DODGE_RADIUS: f32 = 50.0;
    pub const TAP_SQUASH_RADIUS: f32 = 35.0;
    pub const DODGE_COOLDOWN: f32 = 0.3;

    /// Swipe hit radius (point-to-segment distance)
    pub const SWIPE_HIT_RADIUS: f32 = 50.0;

    /// Distance from the baby's face at which an approaching fly lands
    pub const LANDING_DISTANCE: f32 = 30.0;
    /// Radius within which a landed fly counts as sitting on the baby
    pub const ON_BABY_RADIUS: f32 = 40.0;
    /// How long a fly may sit on the baby's face before the game ends
    pub const LANDING_GAME_OVER_SECS: f32 = 0.7;

    /// Proximity falls to zero at this distance from the baby's face
    pub const PROXIMITY_MAX_DIST: f32 = 220.0;

    /// Sleep meter rates (per second) and one-time gesture costs
    pub const METER_PASSIVE_RECOVERY: f32 = 1.5;
    pub const METER_BUZZ_DRAIN: f32 = 12.0;
    pub const METER_BUZZ_EXPONENT: f32 = 1.8;
    pub const METER_CIRCLING_DRAIN: f32 = 5.0;
    pub const METER_LANDING_DRAIN: f32 = 45.0;
    pub const METER_TAP_COST: f32 = 3.0;
    pub const METER_SWIPE_COST: f32 = 2.0;
    pub const METER_SQUASH_COST: f32 = 6.0;

    /// Scoring
    pub const SCORE_PER_SECOND: f32 = 10.0;
    pub const SHOO_POINTS: f32 = 5.0;
    pub const SQUASH_POINTS: f32 = 75.0;
    pub const COMBO_BONUS_PER_STEP: f32 = 15.0;
    /// Rolling window: a squash must follow the previous one within this
    /// many seconds to extend the combo
    pub const COMBO_WINDOW: f32 = 3.0;

    /// Spawning
    pub const MAX_FLIES: usize = 6;
    pub const SPAWN_INTERVAL_START: f32 = 5.0;
    pub const SPAWN_INTERVAL_MIN: f32 = 1.5;

    /// Baby
    pub const SAFE_ZONE_RADIUS: f32 = 140.0;
    pub const STIR_DURATION: f32 = 2.0;
    pub const WAKE_RATE: f32 = 1.2;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Angle (radians) of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Shortest distance from `point` to the segment `a`-`b`
///
/// A degenerate (zero-length) segment is treated as the point `a`.
pub fn point_to_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < 0.0001 {
        return point.distance(a);
    }
    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

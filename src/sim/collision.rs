//! Gesture resolution - taps and swipes against flies
//!
//! Pure functions: geometry plus the dodge roll go in, an outcome comes out.
//! The session tick applies outcomes (state changes, score, sleep cost,
//! events), which keeps the probabilistic branch testable with forced rolls.

use glam::Vec2;

use crate::consts::*;
use crate::point_to_segment_distance;

/// What a single tap did to a single fly
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapContact {
    /// Beyond the 50-unit interaction radius; nothing happens
    OutOfRange,
    /// Dodge roll succeeded; the fly evades and the tap is a miss
    Dodged,
    /// Dodge roll failed and the fly is inside the squash radius
    Candidate { dist: f32 },
    /// Dodge roll failed, but the fly sits in the forgiving 35..50 band:
    /// too far to squash, close enough to have been rolled. A plain miss.
    Miss,
}

/// Resolve one tap against one fly. `roll` is the dodge sample in [0,1);
/// callers draw it from the session RNG, tests force it.
///
/// The dodge-eligibility radius (50) deliberately exceeds the squash radius
/// (35): a fly between them can be dodge-rolled without ever being
/// squashable. Do not collapse the two.
pub fn resolve_tap_contact(tap: Vec2, fly_pos: Vec2, dodge_chance: f32, roll: f32) -> TapContact {
    let dist = tap.distance(fly_pos);
    if dist >= TAP_DODGE_RADIUS {
        return TapContact::OutOfRange;
    }
    if roll < dodge_chance {
        return TapContact::Dodged;
    }
    if dist < TAP_SQUASH_RADIUS {
        TapContact::Candidate { dist }
    } else {
        TapContact::Miss
    }
}

/// Of all squash candidates, only the nearest is actually squashed.
/// Distance is the ordering key; equal distances fall back to the lower fly
/// id so the choice stays deterministic.
pub fn nearest_candidate(candidates: &[(u32, f32)]) -> Option<u32> {
    candidates
        .iter()
        .min_by(|(id_a, d_a), (id_b, d_b)| {
            d_a.partial_cmp(d_b)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(id_a.cmp(id_b))
        })
        .map(|(id, _)| *id)
}

/// True when the swipe segment passes within the hit radius of the fly
pub fn swipe_hits(fly_pos: Vec2, start: Vec2, end: Vec2) -> bool {
    point_to_segment_distance(fly_pos, start, end) < SWIPE_HIT_RADIUS
}

/// Knockback magnitude for a shoo: base force plus a speed bonus
#[inline]
pub fn shoo_force(swipe_speed: f32) -> f32 {
    SHOO_BASE_FORCE + swipe_speed * 100.0
}

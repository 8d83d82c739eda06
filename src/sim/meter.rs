//! Sleep meter - the game's single failure resource
//!
//! Every tick the session sums one delta out of named per-source
//! contributions and applies it exactly once. The contributions are plain
//! additions, so the result cannot depend on the order sources are visited.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Clamped scalar in [0,100]. 100 = deep sleep, 0 = the baby wakes up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SleepMeter {
    value: f32,
}

impl Default for SleepMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl SleepMeter {
    pub fn new() -> Self {
        Self { value: 100.0 }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Apply the frame's summed delta, clamping to [0,100]
    pub fn apply(&mut self, delta: f32) {
        self.value = (self.value + delta).clamp(0.0, 100.0);
    }

    /// Terminal trigger: the meter bottomed out
    pub fn is_depleted(&self) -> bool {
        self.value <= 0.0
    }

    #[cfg(test)]
    pub fn set_for_test(&mut self, value: f32) {
        self.value = value;
    }
}

/// Constant recovery while nothing disturbs the baby
#[inline]
pub fn passive_recovery(dt: f32) -> f32 {
    METER_PASSIVE_RECOVERY * dt
}

/// Drain from a fly buzzing near the face. Zero below the 0.2 proximity
/// floor, then super-linear in proximity.
#[inline]
pub fn buzz_drain(proximity: f32, dt: f32) -> f32 {
    if proximity > 0.2 {
        -(proximity.powf(METER_BUZZ_EXPONENT) * METER_BUZZ_DRAIN) * dt
    } else {
        0.0
    }
}

/// Extra drain while a fly orbits close by (the anticipation)
#[inline]
pub fn circling_drain(proximity: f32, dt: f32) -> f32 {
    if proximity > 0.3 {
        -METER_CIRCLING_DRAIN * dt
    } else {
        0.0
    }
}

/// Dominant term: a fly sitting on the baby is catastrophic if not
/// interrupted quickly
#[inline]
pub fn landing_drain(dt: f32) -> f32 {
    -METER_LANDING_DRAIN * dt
}

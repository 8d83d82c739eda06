//! Baby entity - the thing being defended
//!
//! Mostly a reactive animation driver: the sleep meter and disturbance
//! events push it between sleeping, stirring, and (irreversibly) waking.
//! The stir/wake transitions gate game-over conditions, so they live in the
//! sim rather than the presentation layer.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::lerp;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BabyState {
    Sleeping,
    /// Transient distress; auto-reverts to sleeping
    Stirring { timer: f32 },
    /// One-way. Progress ramps to 1.0 and stays there.
    Waking { progress: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baby {
    /// Body center; the face and safe zone are fixed offsets from it
    pub pos: Vec2,
    pub state: BabyState,
    /// Expression intensities in [0,1], decayed toward 0 unless re-triggered
    pub stir_amount: f32,
    pub pout_amount: f32,
    pub smile_amount: f32,
    pub eyebrow_raise: f32,
    pub hand_wave_amount: f32,
    pub leg_kick_amount: f32,
    expression_timer: f32,
}

impl Default for Baby {
    fn default() -> Self {
        Self::new()
    }
}

impl Baby {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(GAME_WIDTH * 0.5, GAME_HEIGHT * 0.42),
            state: BabyState::Sleeping,
            stir_amount: 0.0,
            pout_amount: 0.0,
            smile_amount: 0.0,
            eyebrow_raise: 0.0,
            hand_wave_amount: 0.0,
            leg_kick_amount: 0.0,
            expression_timer: 0.0,
        }
    }

    /// Center of the face - the point flies aim for
    pub fn face_center(&self) -> Vec2 {
        self.pos - Vec2::new(0.0, 70.0)
    }

    /// True iff `point` lies inside the no-squash zone around the baby.
    /// Squashing a fly here is an instant loss.
    pub fn is_in_safe_zone(&self, point: Vec2) -> bool {
        point.distance(self.pos - Vec2::new(0.0, 20.0)) < SAFE_ZONE_RADIUS
    }

    pub fn update<R: Rng>(&mut self, dt: f32, sleep_meter: f32, rng: &mut R) {
        self.expression_timer += dt;

        match self.state {
            BabyState::Sleeping => {
                self.stir_amount = lerp(self.stir_amount, 0.0, dt * 1.5);
                self.pout_amount = lerp(self.pout_amount, 0.0, dt * 2.0);
                self.smile_amount = lerp(self.smile_amount, 0.0, dt * 1.5);
                self.eyebrow_raise = lerp(self.eyebrow_raise, 0.0, dt * 2.0);
                self.hand_wave_amount = lerp(self.hand_wave_amount, 0.0, dt * 0.5);
                self.leg_kick_amount = lerp(self.leg_kick_amount, 0.0, dt * 0.4);

                // Occasional dream expressions
                if self.expression_timer > 2.5 {
                    let roll: f32 = rng.random();
                    if roll < 0.25 {
                        self.smile_amount = 1.0;
                    } else if roll < 0.45 {
                        self.pout_amount = 0.7;
                    } else if roll < 0.6 {
                        self.eyebrow_raise = 0.8;
                    } else if roll < 0.7 {
                        self.hand_wave_amount = 1.0;
                        self.leg_kick_amount = 0.5;
                    }
                    self.expression_timer = 0.0;
                }

                // A draining meter shows on the face before it hits zero
                if sleep_meter < 60.0 {
                    self.stir_amount =
                        lerp(self.stir_amount, (60.0 - sleep_meter) / 60.0, dt * 2.0);
                    if sleep_meter < 40.0 {
                        self.pout_amount =
                            lerp(self.pout_amount, (40.0 - sleep_meter) / 40.0, dt * 1.5);
                        self.eyebrow_raise = lerp(self.eyebrow_raise, 0.5, dt * 2.0);
                    }
                }
            }
            BabyState::Stirring { timer } => {
                let timer = timer + dt;
                self.stir_amount = 0.5 + 0.4 * (timer * 6.0).sin();
                self.pout_amount = lerp(self.pout_amount, 0.9, dt * 4.0);
                self.eyebrow_raise = lerp(self.eyebrow_raise, 0.6, dt * 3.0);
                self.leg_kick_amount = 0.3 + 0.3 * (timer * 4.0).sin();
                self.state = if timer > STIR_DURATION {
                    BabyState::Sleeping
                } else {
                    BabyState::Stirring { timer }
                };
            }
            BabyState::Waking { progress } => {
                self.state = BabyState::Waking {
                    progress: (progress + dt * WAKE_RATE).clamp(0.0, 1.0),
                };
                self.stir_amount = 1.0;
                self.leg_kick_amount = 0.8;
                self.hand_wave_amount = 0.8;
            }
        }
    }

    /// Register a disturbance. Only a sleeping baby starts stirring; a
    /// stirring or waking baby is unaffected.
    pub fn stir(&mut self) {
        if self.state == BabyState::Sleeping {
            self.state = BabyState::Stirring { timer: 0.0 };
        }
    }

    /// Game over: eyes open, crying. Never reversed within a session.
    pub fn wake_up(&mut self) {
        self.state = BabyState::Waking { progress: 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn test_rng() -> Pcg32 {
        Pcg32::seed_from_u64(11)
    }

    #[test]
    fn test_stir_reverts_to_sleeping() {
        let mut rng = test_rng();
        let mut baby = Baby::new();
        baby.stir();
        assert!(matches!(baby.state, BabyState::Stirring { .. }));

        // 2.5 simulated seconds is past the 2.0s stir duration
        for _ in 0..150 {
            baby.update(1.0 / 60.0, 100.0, &mut rng);
        }
        assert_eq!(baby.state, BabyState::Sleeping);
    }

    #[test]
    fn test_stir_only_from_sleeping() {
        let mut baby = Baby::new();
        baby.wake_up();
        baby.stir();
        assert!(matches!(baby.state, BabyState::Waking { .. }));
    }

    #[test]
    fn test_waking_is_irreversible() {
        let mut rng = test_rng();
        let mut baby = Baby::new();
        baby.wake_up();
        for _ in 0..600 {
            baby.update(1.0 / 60.0, 0.0, &mut rng);
            assert!(matches!(baby.state, BabyState::Waking { .. }));
        }
        match baby.state {
            BabyState::Waking { progress } => assert_eq!(progress, 1.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_low_meter_raises_stir_intensity() {
        let mut rng = test_rng();
        let mut calm = Baby::new();
        let mut uneasy = Baby::new();
        for _ in 0..120 {
            calm.update(1.0 / 60.0, 100.0, &mut rng);
            uneasy.update(1.0 / 60.0, 20.0, &mut rng);
        }
        assert!(uneasy.stir_amount > calm.stir_amount);
        assert!(uneasy.pout_amount > 0.1);
    }

    #[test]
    fn test_safe_zone() {
        let baby = Baby::new();
        let center = baby.pos - Vec2::new(0.0, 20.0);
        assert!(baby.is_in_safe_zone(center));
        assert!(baby.is_in_safe_zone(center + Vec2::new(139.0, 0.0)));
        assert!(!baby.is_in_safe_zone(center + Vec2::new(141.0, 0.0)));
    }
}

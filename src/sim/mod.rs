//! Gameplay simulation
//!
//! Everything that decides the outcome of a run lives here, and nothing
//! else does: fly behavior, the baby's reactive state, the sleep meter,
//! gesture resolution, and the session tick. The module is deterministic
//! (seeded RNG, fixed update ordering) and has no platform dependencies,
//! so a whole run can be replayed in a unit test.

pub mod baby;
pub mod collision;
pub mod fly;
pub mod meter;
pub mod state;
pub mod tick;

pub use baby::{Baby, BabyState};
pub use collision::{nearest_candidate, resolve_tap_contact, shoo_force, swipe_hits, TapContact};
pub use fly::{dodge_chance_at, speed_multiplier_at, Fly, FlyState};
pub use meter::SleepMeter;
pub use state::{
    GameEvent, GameOverCause, GamePhase, GameState, SessionCommand, Swipe, Tap, TickInput,
};
pub use tick::tick;

//! Session state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::baby::Baby;
use super::fly::Fly;
use super::meter::SleepMeter;

/// Top-level session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    /// Brief how-to overlay; the first tap starts play
    Tutorial,
    Playing,
    GameOver,
    Leaderboard,
    Settings,
}

/// Why the run ended. Carried by the game-over transition, never a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Sleep meter drained to zero
    Buzzing,
    /// A squash landed inside the baby's safe zone
    TouchedBaby,
    /// A fly sat on the baby's face past the landing threshold
    FlyLanded,
}

impl GameOverCause {
    pub fn message(&self) -> &'static str {
        match self {
            GameOverCause::Buzzing => "Too much buzzing woke the baby up!",
            GameOverCause::TouchedBaby => "Ouch! You tapped the baby! Be more careful!",
            GameOverCause::FlyLanded => "A fly sat on the baby's face too long!",
        }
    }
}

/// An accepted tap gesture, already in game coordinates
#[derive(Debug, Clone, Copy)]
pub struct Tap {
    pub pos: Vec2,
    /// Milliseconds, monotonic per the input collaborator
    pub timestamp: f64,
}

/// An accepted swipe gesture
#[derive(Debug, Clone, Copy)]
pub struct Swipe {
    pub start: Vec2,
    pub end: Vec2,
    /// Gesture speed in units/ms, as reported by the input collaborator
    pub speed: f32,
    pub timestamp: f64,
}

impl Swipe {
    /// Direction and length of the stroke
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }
}

/// Session-level external command (menu buttons etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    StartGame,
    Retry,
    ReturnToMenu,
    ShowLeaderboard,
    ShowSettings,
}

/// Everything the outside world feeds into one tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub taps: Vec<Tap>,
    pub swipes: Vec<Swipe>,
    pub command: Option<SessionCommand>,
}

/// Fire-and-forget notification for the audio/particle/haptic sink.
/// Pushed during the tick, drained by the shell via [`GameState::take_events`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    FlySpawned { id: u32 },
    /// A swipe connected with a fly
    Shoo { id: u32 },
    /// A fly evaded a tap
    Dodge { id: u32 },
    /// A fly was squashed
    Squash { id: u32 },
    /// Any accepted tap makes noise
    TapNoise,
    /// A fly is sitting on the baby this tick
    LandingDrain { id: u32 },
    /// The baby started stirring
    Stir,
    /// Critical-meter pulse, every 0.8s below 20
    Heartbeat,
    GameOver { cause: GameOverCause },
}

/// Complete session state. All gameplay randomness flows through the owned,
/// seeded RNG, so a fixed seed plus a fixed input sequence replays exactly.
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub baby: Baby,
    /// Live flies; membership changes every frame via spawn/prune
    pub flies: Vec<Fly>,
    pub sleep_meter: SleepMeter,
    /// Elapsed survival time for the current run (seconds)
    pub time_survived: f32,
    /// Monotonically increasing within a run
    pub score: f32,
    pub flies_neutralized: u32,
    /// Consecutive-squash counter; decays via `combo_timer`
    pub combo: u32,
    /// Seconds since the last squash (rolling window)
    pub combo_timer: f32,
    pub spawn_timer: f32,
    pub heartbeat_timer: f32,
    pub tutorial_timer: f32,
    pub game_over_cause: Option<GameOverCause>,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            baby: Baby::new(),
            flies: Vec::new(),
            sleep_meter: SleepMeter::new(),
            time_survived: 0.0,
            score: 0.0,
            flies_neutralized: 0,
            combo: 0,
            combo_timer: 0.0,
            spawn_timer: 0.0,
            heartbeat_timer: 0.0,
            tutorial_timer: 0.0,
            game_over_cause: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset gameplay fields and enter the tutorial with one fly buzzing
    pub fn start_run(&mut self) {
        self.phase = GamePhase::Tutorial;
        self.baby = Baby::new();
        self.flies.clear();
        self.sleep_meter = SleepMeter::new();
        self.time_survived = 0.0;
        self.score = 0.0;
        self.flies_neutralized = 0;
        self.combo = 0;
        self.combo_timer = 0.0;
        self.spawn_timer = 0.0;
        self.heartbeat_timer = 0.0;
        self.tutorial_timer = 0.0;
        self.game_over_cause = None;
        self.spawn_fly();
        log::info!("run started (seed {})", self.seed);
    }

    /// Spawn one fly at the current difficulty's baby bias
    pub fn spawn_fly(&mut self) {
        let bias = (0.3 + self.time_survived / 150.0).min(0.75);
        let id = self.next_entity_id();
        let fly = Fly::spawn(id, bias, &mut self.rng);
        log::debug!("fly {} spawned at {:?} (bias {:.2})", id, fly.pos, bias);
        self.flies.push(fly);
        self.push_event(GameEvent::FlySpawned { id });
    }

    /// Flies that count against the concurrent-fly cap
    pub fn live_fly_count(&self) -> usize {
        self.flies
            .iter()
            .filter(|f| !matches!(f.state, super::fly::FlyState::Dead { .. }))
            .count()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain this tick's sink notifications (audio/particles/haptics)
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

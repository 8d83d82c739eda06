//! Sleep Tight entry point
//!
//! Native builds run a short headless demo session: a seeded game fed a
//! scripted gesture stream at a fixed timestep. Useful for eyeballing the
//! difficulty curve from the log output without a browser.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    use glam::Vec2;
    use sleep_tight::sim::{
        tick, GameEvent, GamePhase, GameState, SessionCommand, Swipe, Tap, TickInput,
    };

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2026);
    log::info!("Sleep Tight headless demo, seed {seed}");

    let mut state = GameState::new(seed);
    tick(
        &mut state,
        &TickInput {
            command: Some(SessionCommand::StartGame),
            ..Default::default()
        },
        1.0 / 60.0,
    );

    let dt = 1.0 / 60.0;
    let mut squashes = 0u32;
    let mut shoos = 0u32;

    // Scripted player: periodic swipes across the middle of the play area
    // and occasional taps at the last known fly position
    for frame in 0u64..(5 * 60 * 60) {
        let mut input = TickInput::default();

        if state.phase == GamePhase::Tutorial && frame % 45 == 0 {
            input.taps.push(Tap {
                pos: Vec2::new(200.0, 650.0),
                timestamp: frame as f64,
            });
        } else if state.phase == GamePhase::Playing {
            if frame % 50 == 0 {
                input.swipes.push(Swipe {
                    start: Vec2::new(40.0, 160.0),
                    end: Vec2::new(360.0, 200.0),
                    speed: 1.5,
                    timestamp: frame as f64,
                });
            }
            if frame % 137 == 0 {
                if let Some(fly) = state.flies.first() {
                    input.taps.push(Tap {
                        pos: fly.pos,
                        timestamp: frame as f64,
                    });
                }
            }
        }

        tick(&mut state, &input, dt);

        for event in state.take_events() {
            match event {
                GameEvent::Squash { id } => {
                    squashes += 1;
                    log::info!("squashed fly {id}");
                }
                GameEvent::Shoo { .. } => shoos += 1,
                GameEvent::GameOver { cause } => log::info!("{}", cause.message()),
                _ => {}
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "survived {:.1}s, score {:.0}, {} squashed, {} shooed, meter {:.0}",
        state.time_survived,
        state.score,
        squashes,
        shoos,
        state.sleep_meter.value()
    );
    if let Some(cause) = state.game_over_cause {
        println!("{}", cause.message());
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM builds drive the sim from the JS shell through the library API
}

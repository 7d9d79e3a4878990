//! Skitter - headless chase driver
//!
//! Runs the test arena with a scripted player for a number of frames and
//! logs where the player and the creature end up. Set `RUST_LOG=debug` to
//! see grapple, jump and climb transitions.
//!
//! Usage: `skitter [frames]`

use anyhow::Context;
use skitter_game::{RawInput, Simulation};

const DEFAULT_FRAMES: u64 = 600;

/// Distance at which the creature catches the player.
const CATCH_DISTANCE: f32 = 2.0;

/// Scripted input: run away, jump now and then, swing from the beam once.
fn scripted_input(frame: u64) -> RawInput {
    let mut input = RawInput {
        backward: true,
        jump: frame % 90 == 45,
        ..Default::default()
    };

    match frame {
        // Look up at the beam and fire
        120 => {
            input.mouse_delta = (0.0, -400.0);
            input.grapple = true;
        }
        // Level the camera again
        121 => input.mouse_delta = (0.0, 400.0),
        _ => {}
    }

    input
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let frames = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("frame count must be a number, got {arg:?}"))?,
        None => DEFAULT_FRAMES,
    };

    let mut simulation = Simulation::test().context("failed to build the test arena")?;

    for frame in 0..frames {
        simulation.frame(&scripted_input(frame));

        if frame % 60 == 0 {
            let player = simulation.player_position();
            let creature = simulation.creature().root_position();
            log::info!(
                "frame {frame}: player ({:.2}, {:.2}, {:.2}) creature ({:.2}, {:.2}, {:.2}) distance {:.2}",
                player.x,
                player.y,
                player.z,
                creature.x,
                creature.y,
                creature.z,
                simulation.distance_to_creature()
            );
        }

        if simulation.distance_to_creature() < CATCH_DISTANCE {
            log::info!("Caught after {} frames", frame + 1);
            return Ok(());
        }
    }

    log::info!(
        "Escaped for {frames} frames, creature {:.2} away",
        simulation.distance_to_creature()
    );
    Ok(())
}

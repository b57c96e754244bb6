//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically. Within a round
//! the order is fixed: spawn, pig physics, balloon motion, collisions, then
//! session checks.

use std::cmp::Ordering;

use super::collision::resolve;
use super::pig::{ControlSignal, PigStep};
use super::state::{GameStage, GameState};

/// Ticks of velocity the autopilot looks ahead when steering
const AUTOPILOT_LOOKAHEAD_TICKS: f32 = 8.0;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held (up) or released (down)
    pub control: ControlSignal,
    /// Start signal (tap/click on the start prompt)
    pub start: bool,
    /// Demo mode - the pig steers itself
    pub autopilot: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    for action in state.timers.drain_due(state.time_ticks) {
        state.run_deferred(action);
    }

    state.update_scenery();

    match state.stage {
        GameStage::Menu | GameStage::Ready => {
            if input.start {
                state.start_round();
            }
        }
        GameStage::InGame => step_round(state, input),
        GameStage::EndGame => {}
    }
}

fn step_round(state: &mut GameState, input: &TickInput) {
    let control = if input.autopilot {
        autopilot_signal(state)
    } else {
        input.control
    };

    if state.spawner.advance(state.speed, state.config.spawn_spacing) {
        state.spawn_balloon();
    }

    let step = match state.pig.as_mut() {
        Some(pig) => pig.apply_control(control, state.speed),
        None => PigStep::Stalled,
    };

    let speed = state.speed;
    for balloon in state.balloons.iter_mut() {
        balloon.advance(1, speed);
    }

    if let Some(pig) = &state.pig {
        let outcome = resolve(pig, &state.balloons);
        if !outcome.is_empty() {
            state.apply_outcome(&outcome);
        }
    }

    state.check_bonus();
    if step == PigStep::Stalled || state.is_terminal() {
        state.end_round();
    }
}

/// Steer toward the nearest balloon that has not yet passed the pig
fn autopilot_signal(state: &GameState) -> ControlSignal {
    let Some(pig) = &state.pig else {
        return ControlSignal::Down;
    };

    let target_y = state
        .balloons
        .iter()
        .filter(|b| b.bounds().right() >= pig.pos.x)
        .min_by(|a, b| a.pos.x.partial_cmp(&b.pos.x).unwrap_or(Ordering::Equal))
        .map(|b| b.pos.y)
        .unwrap_or(state.config.viewport.height / 2.0);

    // Aim the pig's middle at the balloon's base
    let desired = target_y - pig.size.y * 0.25;
    let predicted = pig.pos.y + pig.velocity * AUTOPILOT_LOOKAHEAD_TICKS;
    if predicted < desired {
        ControlSignal::Up
    } else {
        ControlSignal::Down
    }
}

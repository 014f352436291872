//! Match director
//!
//! Advances the match by one tick: phase transitions, the clock, then (while
//! running) vehicles, ball, collisions, replay recording and goal detection.
//! Physics constants are per tick; `dt` only feeds the match clock.

use super::ai::BotPolicy;
use super::ball::step_ball;
use super::collision::resolve_collisions;
use super::input::{ControlIntent, ControlSource, HumanControl, TickInput, WorldView};
use super::replay::ReplayFrame;
use super::state::{Ball, GameEvent, GameState, MatchPhase, Vehicle};
use super::vehicle::{clamp_to_walls, step_vehicle};
use crate::consts::*;

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    advance(state, input, dt);
    state.cap_events();
}

fn advance(state: &mut GameState, input: &TickInput, dt: f32) {
    // Frame stalls must not drain the clock in one go
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };

    if input.restart {
        state.restart();
        return;
    }

    if input.pause {
        match state.match_state.phase {
            MatchPhase::Running => {
                state.match_state.phase = MatchPhase::Paused;
                log::info!("Paused");
                return;
            }
            MatchPhase::Paused => {
                state.match_state.phase = MatchPhase::Running;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    match state.match_state.phase {
        MatchPhase::Paused | MatchPhase::Ended { .. } => {}
        MatchPhase::GoalPause { ticks_remaining, scorer } => {
            if state.replay_playhead + 1 < state.replay.len() {
                state.replay_playhead += 1;
            }
            let ticks_remaining = ticks_remaining.saturating_sub(1);
            state.match_state.phase = if ticks_remaining == 0 {
                MatchPhase::Resetting
            } else {
                MatchPhase::GoalPause { ticks_remaining, scorer }
            };
        }
        MatchPhase::Resetting => {
            state.reset_kickoff();
            state.match_state.phase = MatchPhase::Running;
            log::info!("Kickoff");
        }
        MatchPhase::Running => run_clock_and_physics(state, input, dt),
    }
}

fn run_clock_and_physics(state: &mut GameState, input: &TickInput, dt: f32) {
    let ms = &mut state.match_state;
    ms.clock -= dt;
    if ms.clock <= 0.0 {
        ms.clock = 0.0;
        let winner = ms.leader();
        ms.phase = MatchPhase::Ended { winner };
        state.events.push(GameEvent::MatchEnded { winner });
        log::info!(
            "Match over: Blue {} - {} Orange ({:?})",
            ms.blue_score,
            ms.orange_score,
            ms.result()
        );
        return;
    }

    step_physics(state, input);
    state.time_ticks += 1;

    if let Some(scorer) = state.goal_detector.check(&state.ball, &state.arena) {
        let ms = &mut state.match_state;
        ms.add_goal(scorer);
        let pause_ticks = state.tuning.match_.goal_pause_ticks;
        ms.phase = MatchPhase::GoalPause {
            ticks_remaining: pause_ticks,
            scorer,
        };
        // Play back the run-up so the last replay frame lands on the goal
        state.replay_playhead = state.replay.len().saturating_sub(pause_ticks as usize);
        state.events.push(GameEvent::GoalScored { team: scorer });
        log::info!(
            "Goal for {}! Blue {} - {} Orange",
            scorer.as_str(),
            ms.blue_score,
            ms.orange_score
        );
    }
}

fn step_physics(state: &mut GameState, input: &TickInput) {
    let GameState {
        arena,
        tuning,
        vehicles,
        ball,
        replay,
        bot_mode,
        events,
        ..
    } = state;

    {
        let world = WorldView {
            ball: &*ball,
            arena: &*arena,
            tuning: &*tuning,
        };

        let human = &mut vehicles[HUMAN_SLOT];
        let human_intent = HumanControl::from_input(input).intent(human, &world);
        step_vehicle(human, &human_intent, arena, &tuning.vehicle, events);

        let bot = &mut vehicles[BOT_SLOT];
        let bot_intent = if bot.kickoff_delay > 0 {
            bot.kickoff_delay -= 1;
            ControlIntent::idle()
        } else {
            let decision = BotPolicy.decide(bot, &world);
            if *bot_mode != Some(decision.mode) {
                log::debug!(
                    "Bot mode -> {} (target {:.1}, {:.1})",
                    decision.mode.as_str(),
                    decision.target.x,
                    decision.target.z
                );
                *bot_mode = Some(decision.mode);
            }
            decision.intent
        };
        step_vehicle(bot, &bot_intent, arena, &tuning.vehicle, events);
    }

    step_ball(ball, arena, &tuning.ball);
    resolve_collisions(vehicles, ball, &tuning.vehicle, &tuning.contact, events);
    // Separation may have pushed a vehicle into a wall
    for vehicle in vehicles.iter_mut() {
        clamp_to_walls(vehicle, arena, &tuning.vehicle);
    }

    replay.record(capture_frame(ball, vehicles));
}

fn capture_frame(ball: &Ball, vehicles: &[Vehicle; 2]) -> ReplayFrame {
    ReplayFrame {
        ball: ball.body.pos,
        ball_spin: ball.spin,
        vehicles: [vehicles[HUMAN_SLOT].pose(), vehicles[BOT_SLOT].pose()],
    }
}

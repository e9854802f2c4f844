//! Per-frame simulation tick
//!
//! Turns the frame's input into world gravity and advances every object's
//! action sequence. Contacts are fed in separately through
//! [`handle_contact`](super::contact::handle_contact).

use glam::Vec2;

use super::action::{Completion, Step};
use super::object::ObjectId;
use super::state::{GameEvent, GamePhase, GameState};
use crate::InputMode;
use crate::consts::*;

/// Touch/pointer event for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Began(Vec2),
    Moved(Vec2),
    Ended,
}

/// Input sampled for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Touch/drag change this frame (simulator substitute for tilt)
    pub touch: Option<TouchEvent>,
    /// Raw two-axis accelerometer reading (device held in landscape)
    pub accelerometer: Option<Vec2>,
}

/// Gravity pulling the ball toward the touch point
#[inline]
pub fn gravity_from_drag(touch: Vec2, player: Vec2) -> Vec2 {
    (touch - player) / DRAG_GRAVITY_DIVISOR
}

/// Gravity from an accelerometer reading; axes swap for landscape
#[inline]
pub fn gravity_from_tilt(reading: Vec2) -> Vec2 {
    Vec2::new(-reading.y, reading.x) * TILT_GRAVITY_SCALE
}

/// Record a touch event (recorded even while input is locked)
pub fn apply_touch(state: &mut GameState, event: TouchEvent) {
    match event {
        TouchEvent::Began(pos) | TouchEvent::Moved(pos) => state.last_touch_position = Some(pos),
        TouchEvent::Ended => state.last_touch_position = None,
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, mode: InputMode, dt: f32) {
    state.time_ticks += 1;

    if let Some(event) = input.touch {
        apply_touch(state, event);
    }

    if state.phase == GamePhase::Playing {
        update_gravity(state, input, mode);
    }

    run_actions(state, dt);
}

fn update_gravity(state: &mut GameState, input: &TickInput, mode: InputMode) {
    match mode {
        InputMode::Touch => {
            let player = state.player_object().map(|p| p.pos);
            if let (Some(touch), Some(player)) = (state.last_touch_position, player) {
                state.gravity = gravity_from_drag(touch, player);
            }
        }
        InputMode::Accelerometer => {
            if let Some(reading) = input.accelerometer {
                state.gravity = gravity_from_tilt(reading);
            }
        }
    }
}

/// Advance all action sequences, then apply removals and completions
fn run_actions(state: &mut GameState, dt: f32) {
    let mut removed: Vec<ObjectId> = Vec::new();
    let mut completions: Vec<Completion> = Vec::new();

    for obj in state.objects.iter_mut() {
        let Some(mut seq) = obj.actions.take() else {
            continue;
        };
        match seq.advance(obj, dt) {
            Step::Running => obj.actions = Some(seq),
            step => {
                if step == Step::Removed {
                    removed.push(obj.id);
                }
                completions.extend(seq.on_complete);
            }
        }
    }

    for id in removed {
        state.objects.remove(id);
        if state.player == Some(id) {
            state.player = None;
        }
    }

    for completion in completions {
        match completion {
            Completion::RespawnPlayer => respawn_player(state),
        }
    }
}

fn respawn_player(state: &mut GameState) {
    if let Some(old) = state.player.take() {
        state.objects.remove(old);
    }
    let id = state.spawn_player();
    state.phase = GamePhase::Playing;
    state.push_event(GameEvent::PlayerRespawned { player: id });
    log::info!("Player respawned at level start");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player_spawn;
    use crate::sim::contact::handle_contact;
    use crate::sim::level::MemoryLevelSource;
    use crate::sim::object::ObjectKind;

    fn source() -> MemoryLevelSource {
        MemoryLevelSource::new().with_level(1, "xxxx\nxsvx\nxf x\nxxxx")
    }

    #[test]
    fn test_drag_gravity() {
        let mut state = GameState::new(&source(), 1).unwrap();
        let input = TickInput {
            touch: Some(TouchEvent::Began(Vec2::new(196.0, 472.0))),
            ..Default::default()
        };
        tick(&mut state, &input, InputMode::Touch, SIM_DT);
        assert_eq!(state.gravity, Vec2::new(1.0, -2.0));

        // Gravity holds while the finger stays put
        tick(&mut state, &TickInput::default(), InputMode::Touch, SIM_DT);
        assert_eq!(state.gravity, Vec2::new(1.0, -2.0));

        let release = TickInput {
            touch: Some(TouchEvent::Ended),
            ..Default::default()
        };
        tick(&mut state, &release, InputMode::Touch, SIM_DT);
        assert_eq!(state.last_touch_position, None);
        assert_eq!(state.gravity, Vec2::new(1.0, -2.0));
    }

    #[test]
    fn test_tilt_gravity_swaps_axes() {
        let mut state = GameState::new(&source(), 1).unwrap();
        let input = TickInput {
            accelerometer: Some(Vec2::new(0.2, -0.4)),
            ..Default::default()
        };
        tick(&mut state, &input, InputMode::Accelerometer, SIM_DT);
        assert!((state.gravity - Vec2::new(20.0, 10.0)).length() < 0.0001);
    }

    #[test]
    fn test_vortex_spins() {
        let mut state = GameState::new(&source(), 1).unwrap();
        for _ in 0..15 {
            tick(&mut state, &TickInput::default(), InputMode::Accelerometer, SIM_DT);
        }
        let vortex = state.objects.iter().find(|o| o.kind == ObjectKind::Vortex).unwrap();
        assert!((vortex.rotation - std::f32::consts::FRAC_PI_4).abs() < 0.01);
    }

    #[test]
    fn test_death_then_respawn() {
        let src = source();
        let mut state = GameState::new(&src, 1).unwrap();
        let player = state.player.unwrap();
        let vortex_obj = state.objects.iter().find(|o| o.kind == ObjectKind::Vortex).unwrap();
        let (vortex, vortex_pos) = (vortex_obj.id, vortex_obj.pos);

        handle_contact(&mut state, player, vortex, &src).unwrap();
        assert!(state.is_game_over());
        assert_eq!(state.score, -1);

        // Input is ignored during the animation
        let tilt = TickInput {
            accelerometer: Some(Vec2::new(1.0, 1.0)),
            ..Default::default()
        };
        tick(&mut state, &tilt, InputMode::Accelerometer, 0.25);
        assert_eq!(state.gravity, Vec2::ZERO);
        assert_eq!(state.objects.get(player).map(|p| p.pos), Some(vortex_pos));
        assert!(state.is_game_over());

        tick(&mut state, &TickInput::default(), InputMode::Accelerometer, 0.25);
        assert!(!state.is_game_over());
        assert!(!state.objects.contains(player));

        let respawned = state.player_object().unwrap();
        assert_ne!(respawned.id, player);
        assert_eq!(respawned.pos, player_spawn());
        assert_eq!(respawned.scale, 1.0);
        assert!(respawned.body.as_ref().unwrap().dynamic);
        assert_eq!(state.count_kind(ObjectKind::Player), 1);
        assert_eq!(state.score, -1);
        assert!(
            state
                .events()
                .contains(&GameEvent::PlayerRespawned { player: respawned.id })
        );
    }

    #[test]
    fn test_touch_recorded_while_game_over() {
        let src = source();
        let mut state = GameState::new(&src, 1).unwrap();
        state.phase = GamePhase::Transitioning;
        let input = TickInput {
            touch: Some(TouchEvent::Moved(Vec2::new(5.0, 5.0))),
            ..Default::default()
        };
        tick(&mut state, &input, InputMode::Touch, SIM_DT);
        assert_eq!(state.last_touch_position, Some(Vec2::new(5.0, 5.0)));
        assert_eq!(state.gravity, Vec2::ZERO);
    }
}

//! Contact resolution
//!
//! The host physics engine reports contacts as unordered pairs of object
//! ids. Only pairs involving the player matter; the other object's tag
//! decides the outcome.

use super::action::{Action, ActionSequence, Completion};
use super::level::{LevelError, LevelSource};
use super::object::{ObjectId, Tag};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Effect of the player touching a tagged object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub score_delta: i64,
    /// Player dies and respawns at the level start
    pub kills_player: bool,
    /// The contacted object is consumed
    pub removes_other: bool,
    pub advances_level: bool,
}

/// Outcome of a contact for a given tag (untagged objects do nothing)
pub fn resolve(tag: Option<Tag>) -> Resolution {
    match tag {
        Some(Tag::Vortex) => Resolution {
            score_delta: VORTEX_PENALTY,
            kills_player: true,
            ..Default::default()
        },
        Some(Tag::Star) => Resolution {
            score_delta: STAR_BONUS,
            removes_other: true,
            ..Default::default()
        },
        Some(Tag::Finish) => Resolution {
            advances_level: true,
            ..Default::default()
        },
        None => Resolution::default(),
    }
}

/// Handle a contact between `a` and `b`.
///
/// Returns the resolution that was applied, or `None` if the contact was
/// ignored (no player involved, stale ids, or mid death animation). Fails
/// only when reaching the finish and the next level cannot be loaded.
pub fn handle_contact(
    state: &mut GameState,
    a: ObjectId,
    b: ObjectId,
    source: &dyn LevelSource,
) -> Result<Option<Resolution>, LevelError> {
    if state.is_game_over() {
        return Ok(None);
    }
    if !state.objects.contains(a) || !state.objects.contains(b) {
        return Ok(None);
    }

    let other = match state.player {
        Some(player) if player == a => b,
        Some(player) if player == b => a,
        _ => return Ok(None),
    };

    let Some(tag) = state.objects.get(other).and_then(|o| o.tag()) else {
        return Ok(None);
    };
    let resolution = resolve(Some(tag));
    log::debug!("Player contact with {:?} ({:?})", tag, other);

    if resolution.kills_player {
        kill_player(state, other);
    }
    if resolution.removes_other {
        state.objects.remove(other);
        state.push_event(GameEvent::StarCollected { star: other });
    }
    state.add_score(resolution.score_delta);
    if resolution.advances_level {
        advance_level(state, source)?;
    }

    Ok(Some(resolution))
}

/// Freeze the player and pull it into the vortex
fn kill_player(state: &mut GameState, vortex: ObjectId) {
    let Some(target) = state.objects.get(vortex).map(|o| o.pos) else {
        return;
    };
    let Some(player) = state.player.and_then(|id| state.objects.get_mut(id)) else {
        return;
    };

    if let Some(body) = player.body.as_mut() {
        body.dynamic = false;
    }
    player.actions = Some(
        ActionSequence::new(vec![
            Action::MoveTo { target, duration: DEATH_MOVE_SECS },
            Action::ScaleTo { scale: DEATH_FINAL_SCALE, duration: DEATH_SCALE_SECS },
            Action::Remove,
        ])
        .with_completion(Completion::RespawnPlayer),
    );

    state.phase = GamePhase::Transitioning;
    state.push_event(GameEvent::PlayerDied { vortex });
    log::info!("Player fell into vortex {:?}", vortex);
}

/// Clear the scene and rebuild it for the next level, keeping the score
fn advance_level(state: &mut GameState, source: &dyn LevelSource) -> Result<(), LevelError> {
    state.objects.clear();
    state.player = None;
    state.score_label = None;
    state.level += 1;
    state.last_touch_position = None;
    log::info!("Advancing to level {}", state.level);
    state.push_event(GameEvent::LevelAdvanced { level: state.level });
    state.setup_scene(source)
}

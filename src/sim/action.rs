//! Scripted object actions
//!
//! A sequence runs its actions one after another, advanced once per tick.
//! Time left over when a timed action ends carries into the next one, so a
//! sequence always takes exactly the sum of its durations.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::object::GameObject;

/// A single step of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Slide linearly to `target`
    MoveTo { target: Vec2, duration: f32 },
    /// Scale linearly to `scale`
    ScaleTo { scale: f32, duration: f32 },
    /// Remove the object from the scene (ends the sequence)
    Remove,
    /// Spin at `rate` rad/s; never finishes
    RotateForever { rate: f32 },
}

/// What to do once a sequence has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    /// Recreate the player at the spawn point and resume play
    RespawnPlayer,
}

/// Result of advancing a sequence by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Running,
    Finished,
    /// A `Remove` action ran; the caller must drop the object
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSequence {
    actions: Vec<Action>,
    index: usize,
    elapsed: f32,
    /// Position/scale captured when the current timed action started
    start: Option<(Vec2, f32)>,
    pub on_complete: Option<Completion>,
}

impl ActionSequence {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            index: 0,
            elapsed: 0.0,
            start: None,
            on_complete: None,
        }
    }

    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.on_complete = Some(completion);
        self
    }

    /// Action currently running, if any
    pub fn current(&self) -> Option<&Action> {
        self.actions.get(self.index)
    }

    /// Advance the sequence by `dt` seconds, applying it to `obj`
    pub fn advance(&mut self, obj: &mut GameObject, dt: f32) -> Step {
        let mut remaining = dt;
        loop {
            let Some(action) = self.actions.get(self.index).copied() else {
                return Step::Finished;
            };

            let duration = match action {
                Action::RotateForever { rate } => {
                    obj.rotation = (obj.rotation + rate * remaining).rem_euclid(TAU);
                    return Step::Running;
                }
                Action::Remove => {
                    self.index = self.actions.len();
                    return Step::Removed;
                }
                Action::MoveTo { duration, .. } | Action::ScaleTo { duration, .. } => duration,
            };

            let (from_pos, from_scale) = *self.start.get_or_insert((obj.pos, obj.scale));
            self.elapsed += remaining;
            let t = if duration > 0.0 {
                (self.elapsed / duration).min(1.0)
            } else {
                1.0
            };

            match action {
                Action::MoveTo { target, .. } if t >= 1.0 => obj.pos = target,
                Action::MoveTo { target, .. } => obj.pos = from_pos.lerp(target, t),
                Action::ScaleTo { scale, .. } if t >= 1.0 => obj.scale = scale,
                Action::ScaleTo { scale, .. } => obj.scale = from_scale + (scale - from_scale) * t,
                _ => {}
            }

            if t < 1.0 {
                return Step::Running;
            }

            remaining = (self.elapsed - duration).max(0.0);
            self.elapsed = 0.0;
            self.start = None;
            self.index += 1;
        }
    }
}

//! Game state and scene setup
//!
//! The state owns the object arena. Score changes go through
//! [`GameState::add_score`], which rewrites the HUD label and queues a
//! [`GameEvent::ScoreChanged`] for the host.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::{LevelError, LevelSource, load_level};
use super::object::{GameObject, ObjectArena, ObjectId, ObjectKind, Visual};
use crate::score_text;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player input drives gravity, contacts are resolved
    #[default]
    Playing,
    /// Death animation running; input and contacts are ignored
    Transitioning,
}

/// Notifications for the host, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelLoaded { level: u32, objects: usize },
    ScoreChanged { score: i64, text: String },
    StarCollected { star: ObjectId },
    PlayerDied { vortex: ObjectId },
    PlayerRespawned { player: ObjectId },
    LevelAdvanced { level: u32 },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current level number (1-based)
    pub level: u32,
    /// Score, carried across levels; may go negative
    pub score: i64,
    pub phase: GamePhase,
    /// Last touch/drag point, cleared on release and on level change
    pub last_touch_position: Option<Vec2>,
    /// Gravity the host physics world should use
    pub gravity: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub objects: ObjectArena,
    /// Current player object (absent only between removal and respawn)
    pub player: Option<ObjectId>,
    pub score_label: Option<ObjectId>,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            level: 1,
            score: 0,
            phase: GamePhase::Playing,
            last_touch_position: None,
            gravity: Vec2::ZERO,
            time_ticks: 0,
            objects: ObjectArena::new(),
            player: None,
            score_label: None,
            events: Vec::new(),
        }
    }
}

impl GameState {
    /// Build the initial scene for `level`
    pub fn new(source: &dyn LevelSource, level: u32) -> Result<Self, LevelError> {
        let mut state = Self {
            level: level.max(1),
            ..Self::default()
        };
        state.setup_scene(source)?;
        Ok(state)
    }

    /// True while the death animation runs
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::Transitioning
    }

    /// Full scene setup: background, level objects, player, HUD, still gravity.
    ///
    /// Used both for the first scene and after reaching the finish; callers
    /// clear the arena first when rebuilding.
    pub fn setup_scene(&mut self, source: &dyn LevelSource) -> Result<(), LevelError> {
        self.objects.insert(GameObject::background());
        self.load_level(source)?;
        self.spawn_player();
        self.score_label = Some(self.objects.insert(GameObject::score_label(self.score)));
        self.gravity = Vec2::ZERO;
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// Load the current level and register its objects.
    ///
    /// Does not clear previous level objects.
    pub fn load_level(&mut self, source: &dyn LevelSource) -> Result<usize, LevelError> {
        let grid = load_level(source, self.level)?;
        let mut count = 0;
        for placement in grid.placements() {
            if let Some(obj) = GameObject::from_placement(&placement) {
                self.objects.insert(obj);
                count += 1;
            }
        }
        self.events.push(GameEvent::LevelLoaded {
            level: self.level,
            objects: count,
        });
        Ok(count)
    }

    /// Create a fresh player at the spawn point
    pub fn spawn_player(&mut self) -> ObjectId {
        let id = self.objects.insert(GameObject::player());
        self.player = Some(id);
        id
    }

    pub fn player_object(&self) -> Option<&GameObject> {
        self.player.and_then(|id| self.objects.get(id))
    }

    /// Apply a score change and notify the HUD and host
    pub fn add_score(&mut self, delta: i64) {
        if delta == 0 {
            return;
        }
        self.score += delta;
        let text = score_text(self.score);
        if let Some(label) = self.score_label.and_then(|id| self.objects.get_mut(id)) {
            if let Visual::Label { text: shown, .. } = &mut label.visual {
                shown.clone_from(&text);
            }
        }
        self.events.push(GameEvent::ScoreChanged {
            score: self.score,
            text,
        });
    }

    /// Text the score label currently shows
    pub fn score_label_text(&self) -> Option<&str> {
        let label = self.score_label.and_then(|id| self.objects.get(id))?;
        match &label.visual {
            Visual::Label { text, .. } => Some(text),
            Visual::Sprite { .. } => None,
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queued events, without clearing them
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn count_kind(&self, kind: ObjectKind) -> usize {
        self.objects.count_kind(kind)
    }
}

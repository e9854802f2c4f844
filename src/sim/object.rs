//! Scene objects
//!
//! The scene is an arena of objects keyed by a stable [`ObjectId`]. The host
//! renderer draws them, the host physics engine simulates their bodies and
//! reports contacts back by id.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionSequence};
use super::category::{BodyFilters, Category};
use super::level::{Placement, TileKind};
use crate::consts::*;
use crate::{player_spawn, score_text};

/// Stable object identifier, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// What an object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Background,
    Player,
    Wall,
    Vortex,
    Star,
    Finish,
    ScoreLabel,
}

/// Semantic tag the contact resolver dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Vortex,
    Star,
    Finish,
}

impl ObjectKind {
    pub fn tag(self) -> Option<Tag> {
        match self {
            ObjectKind::Vortex => Some(Tag::Vortex),
            ObjectKind::Star => Some(Tag::Star),
            ObjectKind::Finish => Some(Tag::Finish),
            _ => None,
        }
    }
}

/// How the host draws an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Visual {
    Sprite { image: String },
    Label { text: String, font: String },
}

/// Collider shape, centered on the object position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Rect { size: Vec2 },
    Circle { radius: f32 },
}

/// Physics body description handed to the host engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub collider: Collider,
    pub filters: BodyFilters,
    /// Static bodies are never moved by the simulation
    pub dynamic: bool,
    pub allows_rotation: bool,
    pub linear_damping: f32,
}

impl Body {
    fn fixed(collider: Collider, filters: BodyFilters) -> Self {
        Self {
            collider,
            filters,
            dynamic: false,
            allows_rotation: true,
            linear_damping: 0.0,
        }
    }
}

/// One object in the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub pos: Vec2,
    /// Draw order (background -1, level 0, player 1, HUD 2)
    pub z: i32,
    pub scale: f32,
    /// Radians
    pub rotation: f32,
    pub visual: Visual,
    pub body: Option<Body>,
    pub actions: Option<ActionSequence>,
}

impl GameObject {
    fn new(kind: ObjectKind, pos: Vec2, visual: Visual) -> Self {
        Self {
            id: ObjectId(0),
            kind,
            pos,
            z: 0,
            scale: 1.0,
            rotation: 0.0,
            visual,
            body: None,
            actions: None,
        }
    }

    fn sprite(kind: ObjectKind, pos: Vec2, image: &str) -> Self {
        Self::new(kind, pos, Visual::Sprite { image: image.to_string() })
    }

    pub fn tag(&self) -> Option<Tag> {
        self.kind.tag()
    }

    /// Full-screen backdrop
    pub fn background() -> Self {
        let mut obj = Self::sprite(
            ObjectKind::Background,
            Vec2::new(BACKGROUND_POS.0, BACKGROUND_POS.1),
            "background",
        );
        obj.z = -1;
        obj
    }

    /// Player ball at the level spawn point
    pub fn player() -> Self {
        let mut obj = Self::sprite(ObjectKind::Player, player_spawn(), "player");
        obj.z = 1;
        obj.body = Some(Body {
            collider: Collider::Circle { radius: PLAYER_RADIUS },
            filters: BodyFilters::player(),
            dynamic: true,
            allows_rotation: false,
            linear_damping: PLAYER_LINEAR_DAMPING,
        });
        obj
    }

    /// Bottom-left HUD score text
    pub fn score_label(score: i64) -> Self {
        let mut obj = Self::new(
            ObjectKind::ScoreLabel,
            Vec2::new(SCORE_LABEL_POS.0, SCORE_LABEL_POS.1),
            Visual::Label {
                text: score_text(score),
                font: SCORE_LABEL_FONT.to_string(),
            },
        );
        obj.z = 2;
        obj
    }

    pub fn wall(pos: Vec2) -> Self {
        let mut obj = Self::sprite(ObjectKind::Wall, pos, "block");
        obj.body = Some(Body::fixed(
            Collider::Rect { size: Vec2::splat(TILE_SIZE) },
            BodyFilters::wall(),
        ));
        obj
    }

    /// Spinning hazard
    pub fn vortex(pos: Vec2) -> Self {
        let mut obj = Self::sprite(ObjectKind::Vortex, pos, "vortex");
        obj.body = Some(Body::fixed(
            Collider::Circle { radius: TILE_SIZE / 2.0 },
            BodyFilters::passable(Category::Vortex),
        ));
        obj.actions = Some(ActionSequence::new(vec![Action::RotateForever {
            rate: VORTEX_SPIN_RATE,
        }]));
        obj
    }

    pub fn star(pos: Vec2) -> Self {
        let mut obj = Self::sprite(ObjectKind::Star, pos, "star");
        obj.body = Some(Body::fixed(
            Collider::Circle { radius: TILE_SIZE / 2.0 },
            BodyFilters::passable(Category::Star),
        ));
        obj
    }

    pub fn finish(pos: Vec2) -> Self {
        let mut obj = Self::sprite(ObjectKind::Finish, pos, "finish");
        obj.body = Some(Body::fixed(
            Collider::Circle { radius: TILE_SIZE / 2.0 },
            BodyFilters::passable(Category::Finish),
        ));
        obj
    }

    /// Object for a level placement, `None` for empty tiles
    pub fn from_placement(placement: &Placement) -> Option<Self> {
        match placement.kind {
            TileKind::Wall => Some(Self::wall(placement.pos)),
            TileKind::Vortex => Some(Self::vortex(placement.pos)),
            TileKind::Star => Some(Self::star(placement.pos)),
            TileKind::Finish => Some(Self::finish(placement.pos)),
            TileKind::Empty => None,
        }
    }
}

/// Arena of scene objects, iterated in id order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectArena {
    objects: BTreeMap<ObjectId, GameObject>,
    next_id: u32,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Insert an object, assigning it a fresh id
    pub fn insert(&mut self, mut obj: GameObject) -> ObjectId {
        let id = ObjectId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        obj.id = id;
        self.objects.insert(id, obj);
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<GameObject> {
        self.objects.remove(&id)
    }

    /// Remove every object; ids keep counting up
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.objects.values_mut()
    }

    pub fn count_kind(&self, kind: ObjectKind) -> usize {
        self.iter().filter(|o| o.kind == kind).count()
    }
}

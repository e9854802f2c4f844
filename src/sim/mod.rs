//! Simulation module
//!
//! All gameplay logic lives here. Physics integration, drawing and device
//! polling belong to the host engine:
//! - The host reads the object arena and `GameState::gravity`
//! - The host reports contacts by object id
//! - One `tick` per rendered frame, single-threaded

pub mod action;
pub mod category;
pub mod contact;
pub mod level;
pub mod object;
pub mod state;
pub mod tick;

pub use action::{Action, ActionSequence, Completion, Step};
pub use category::{BodyFilters, Category, CategoryMask};
pub use contact::{Resolution, handle_contact, resolve};
pub use level::{
    DirLevelSource, LevelError, LevelGrid, LevelSource, MalformedReason, MemoryLevelSource,
    Placement, TileKind, load_level, resource_name,
};
pub use object::{Body, Collider, GameObject, ObjectArena, ObjectId, ObjectKind, Tag, Visual};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, TouchEvent, apply_touch, gravity_from_drag, gravity_from_tilt, tick};

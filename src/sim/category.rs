//! Collision categories
//!
//! Every body carries exactly one "is-a" category plus two masks:
//! - contact-test: which categories raise a contact event on touch
//! - collision: which categories physically block this body
//!
//! Stars, vortices and the finish are passable (empty collision mask) but
//! still contact-detectable by the player.

use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Collision category of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Category {
    Player = 1,
    Wall = 2,
    Star = 4,
    Vortex = 8,
    Finish = 16,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Player,
        Category::Wall,
        Category::Star,
        Category::Vortex,
        Category::Finish,
    ];

    #[inline]
    pub fn bit(self) -> u32 {
        self as u32
    }
}

/// A set of categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CategoryMask(u32);

impl CategoryMask {
    pub const EMPTY: CategoryMask = CategoryMask(0);
    /// Engine default for collision masks: blocked by everything
    pub const ALL: CategoryMask = CategoryMask(u32::MAX);

    pub const fn of(category: Category) -> Self {
        CategoryMask(category as u32)
    }

    pub fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn intersects(self, other: CategoryMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bits, for handing to a host physics engine
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Categories in this mask, in declaration order
    pub fn iter(self) -> impl Iterator<Item = Category> {
        Category::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl From<Category> for CategoryMask {
    fn from(category: Category) -> Self {
        CategoryMask::of(category)
    }
}

impl BitOr for CategoryMask {
    type Output = CategoryMask;

    fn bitor(self, rhs: CategoryMask) -> CategoryMask {
        CategoryMask(self.0 | rhs.0)
    }
}

impl BitOr<Category> for CategoryMask {
    type Output = CategoryMask;

    fn bitor(self, rhs: Category) -> CategoryMask {
        CategoryMask(self.0 | rhs.bit())
    }
}

impl BitOr for Category {
    type Output = CategoryMask;

    fn bitor(self, rhs: Category) -> CategoryMask {
        CategoryMask(self.bit() | rhs.bit())
    }
}

impl BitOrAssign<Category> for CategoryMask {
    fn bitor_assign(&mut self, rhs: Category) {
        self.0 |= rhs.bit();
    }
}

/// Category plus contact-test and collision masks of one body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyFilters {
    pub category: Category,
    pub contact_test: CategoryMask,
    pub collision: CategoryMask,
}

impl BodyFilters {
    /// Player reports stars, vortices and the finish, bounces off walls
    pub fn player() -> Self {
        Self {
            category: Category::Player,
            contact_test: Category::Star | Category::Vortex | Category::Finish,
            collision: CategoryMask::of(Category::Wall),
        }
    }

    pub fn wall() -> Self {
        Self {
            category: Category::Wall,
            contact_test: CategoryMask::EMPTY,
            collision: CategoryMask::ALL,
        }
    }

    /// Passable pickups and hazards: contact-test the player only
    pub fn passable(category: Category) -> Self {
        Self {
            category,
            contact_test: CategoryMask::of(Category::Player),
            collision: CategoryMask::EMPTY,
        }
    }

    /// True if touching `other` raises a contact event
    pub fn contacts(&self, other: &BodyFilters) -> bool {
        self.contact_test.contains(other.category) || other.contact_test.contains(self.category)
    }

    /// True if this body is physically stopped by `other`
    pub fn blocked_by(&self, other: &BodyFilters) -> bool {
        self.collision.contains(other.category)
    }
}

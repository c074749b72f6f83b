//! Entity identifiers and category tags.
//!
//! An [`EntityId`] is a plain monotonic handle: ids are never recycled, so a
//! destroyed entity's id stays dead forever. This keeps same-tick references
//! trivially safe -- an id either points at a live or pending entity, or at
//! nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// A unique, monotonically increasing entity identifier.
///
/// Ids are allocated by [`EntityStore::create`](crate::store::EntityStore::create)
/// from its `total_created` counter and are never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Construct an id from its raw counter value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw `u64` representation.
    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// Entity category, used as the key for the store's ordered per-tag views.
///
/// A closed enum rather than a free-form string: every category the
/// simulation knows about is listed here, and each gets its own
/// insertion-ordered view in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// The controllable character.
    Player,
    /// Solid level geometry (has collisions).
    Tile,
    /// Non-solid scenery (rendered, never collided with).
    Decoration,
    /// Goombas, Koopas, and their shells.
    Enemy,
    /// Short-lived visual effect (debris, coins, death poses); destroyed when
    /// its animation clip ends.
    AnimationEffect,
}

impl Tag {
    /// All tags, in a fixed order. Used to size and index per-tag storage.
    pub const ALL: [Tag; 5] = [
        Tag::Player,
        Tag::Tile,
        Tag::Decoration,
        Tag::Enemy,
        Tag::AnimationEffect,
    ];

    /// Dense index of this tag within [`Tag::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Tag::Player => 0,
            Tag::Tile => 1,
            Tag::Decoration => 2,
            Tag::Enemy => 3,
            Tag::AnimationEffect => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

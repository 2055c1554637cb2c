//! Content and surface flags for collision filtering.
//!
//! Content flags decide which brushes block a query. Surface flags travel
//! with every reported contact so the presentation layer can react to what
//! the actor is touching.

use serde::{Deserialize, Serialize};

/// Content flags describe what type of volume a brush is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space.
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry: walls, floors, steps.
    pub const SOLID: Self = Self(1 << 0);

    /// Blocks actors but nothing else.
    pub const ACTOR_CLIP: Self = Self(1 << 1);

    /// Non-blocking volume, ignored by movement.
    pub const TRIGGER: Self = Self(1 << 2);

    /// Everything an actor capsule collides with.
    pub const MASK_ACTOR_SOLID: Self = Self(Self::SOLID.0 | Self::ACTOR_CLIP.0);

    /// Check if these flags contain every bit of `other`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Surface flags describe gameplay properties of a brush surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SurfaceFlags(pub u32);

impl SurfaceFlags {
    /// No special properties.
    pub const NONE: Self = Self(0);

    /// Moving platform. Cameras snap instead of smoothing while the actor
    /// touches one.
    pub const PLATFORM: Self = Self(1 << 0);

    /// Check if these flags contain every bit of `other`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

//! Trace results and shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::SurfaceFlags;

/// Result of sweeping a shape through the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// How far along the sweep the shape got before touching something.
    ///
    /// - `1.0` = traveled the full distance (no collision)
    /// - `0.0` = blocked immediately at start
    pub fraction: f32,

    /// Final position of the shape origin (feet) after the sweep.
    ///
    /// Always outside solid geometry when `fraction < 1.0`.
    pub end_position: Vec3,

    /// Surface normal at the impact, pointing out of the obstacle.
    pub hit_normal: Option<Vec3>,

    /// World-space point on the obstacle surface where the shape touched it.
    pub hit_point: Option<Vec3>,

    /// Surface flags of the brush that was hit.
    pub hit_surface: SurfaceFlags,

    /// Whether the sweep started inside solid geometry.
    pub started_in_solid: bool,

    /// Whether the shape could not move at all.
    pub all_solid: bool,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO)
    }
}

impl TraceResult {
    /// Create a trace result indicating no collision occurred.
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            hit_point: None,
            hit_surface: SurfaceFlags::NONE,
            started_in_solid: false,
            all_solid: false,
        }
    }

    /// Check if this trace hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }
}

/// Shape swept through the world.
///
/// Every shape is positioned by its bottom-center, which for the actor
/// capsule is the feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// A vertical capsule (cylinder with hemisphere caps).
    Capsule {
        /// Radius of the cylinder and end caps.
        radius: f32,
        /// Total height from bottom of lower cap to top of upper cap.
        height: f32,
    },

    /// A sphere resting on its origin.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },
}

impl TraceShape {
    /// Build an actor capsule, keeping it at least as tall as it is wide.
    pub fn capsule(radius: f32, height: f32) -> Self {
        Self::Capsule {
            radius,
            height: height.max(radius * 2.0),
        }
    }

    /// Get the effective horizontal radius of this shape.
    pub fn radius(&self) -> f32 {
        match self {
            Self::Capsule { radius, .. } | Self::Sphere { radius } => *radius,
        }
    }

    /// Get the height of this shape.
    pub fn height(&self) -> f32 {
        match self {
            Self::Capsule { height, .. } => *height,
            Self::Sphere { radius } => radius * 2.0,
        }
    }
}

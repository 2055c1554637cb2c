//! The move-and-collide contract between locomotion and collision.
//!
//! Locomotion never queries geometry directly. Once per tick it hands a
//! [`MoveRequest`] to a [`CollisionBackend`] and reads back a
//! [`MoveOutcome`]; the only other query is the overhead probe used to keep
//! a crouched actor from standing into a ceiling.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::SurfaceFlags;
use super::trace::TraceShape;

/// Default number of slide iterations per move.
pub const DEFAULT_MAX_BOUNCES: u32 = 4;

/// A hit normal whose dot with `up` is at or below this is a ceiling.
pub const CEILING_MAX_DOT: f32 = -0.7;

/// One surface touched during a move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// World-space point on the obstacle surface.
    pub position: Vec3,
    /// Surface normal, pointing out of the obstacle toward the actor.
    pub normal: Vec3,
    /// Surface flags of the obstacle.
    pub surface: SurfaceFlags,
}

/// A single move submitted to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Current position of the actor's feet.
    pub position: Vec3,
    /// Desired velocity (meters/second).
    pub velocity: Vec3,
    /// Body shape for this move.
    pub shape: TraceShape,
    /// World up direction.
    pub up: Vec3,
    /// Time step the velocity is integrated over.
    pub delta_time: f32,
    /// Maximum number of slide iterations.
    pub max_bounces: u32,
    /// Steepest walkable floor, in radians from `up`.
    pub floor_max_angle: f32,
    /// Keep vertical motion from sliding the body down walkable slopes.
    pub stop_on_slope: bool,
}

impl MoveRequest {
    /// Create a request with the default bounce count, a 45 degree floor
    /// limit and `stop_on_slope` off.
    pub fn new(position: Vec3, velocity: Vec3, shape: TraceShape, delta_time: f32) -> Self {
        Self {
            position,
            velocity,
            shape,
            up: Vec3::Y,
            delta_time,
            max_bounces: DEFAULT_MAX_BOUNCES,
            floor_max_angle: std::f32::consts::FRAC_PI_4,
            stop_on_slope: false,
        }
    }

    /// Set the steepest walkable floor angle.
    pub fn with_floor_max_angle(mut self, radians: f32) -> Self {
        self.floor_max_angle = radians;
        self
    }

    /// Check whether `normal` counts as a floor for this request.
    #[inline]
    pub fn is_floor(&self, normal: Vec3) -> bool {
        normal.dot(self.up) >= self.floor_max_angle.cos() - 1e-4
    }
}

/// What happened during a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Position of the feet after the move.
    pub position: Vec3,
    /// Velocity left after clipping against everything that was hit.
    pub velocity: Vec3,
    /// The body ended the move resting on a walkable surface.
    pub on_floor: bool,
    /// Normal of the supporting floor, `up` when not on a floor.
    pub floor_normal: Vec3,
    /// The body hit something overhead during the move.
    pub on_ceiling: bool,
    /// One record per surface hit, in hit order.
    pub contacts: Vec<Contact>,
}

impl MoveOutcome {
    /// An outcome where nothing was hit and the body did not move.
    pub fn resting_at(position: Vec3, up: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            on_floor: false,
            floor_normal: up,
            on_ceiling: false,
            contacts: Vec::new(),
        }
    }

    /// Check whether any contact carries all of `flags`.
    pub fn touches(&self, flags: SurfaceFlags) -> bool {
        self.contacts.iter().any(|c| c.surface.contains(flags))
    }
}

/// Region above a (partially) crouched actor that must be clear to stand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverheadProbe {
    /// Position of the actor's feet.
    pub feet: Vec3,
    /// Horizontal radius of the probe.
    pub radius: f32,
    /// Height above the feet where the probe starts.
    pub bottom: f32,
    /// Height above the feet where the probe ends.
    pub top: f32,
}

impl OverheadProbe {
    /// Shape and origin covering `bottom..top` above the feet.
    ///
    /// A span shorter than the probe diameter collapses to a sphere sitting
    /// on `bottom`.
    pub fn shape_and_origin(&self) -> (TraceShape, Vec3) {
        let span = self.top - self.bottom;
        let origin = self.feet + Vec3::Y * self.bottom;
        if span <= self.radius * 2.0 {
            (TraceShape::Sphere { radius: self.radius }, origin)
        } else {
            (
                TraceShape::Capsule {
                    radius: self.radius,
                    height: span,
                },
                origin,
            )
        }
    }
}

/// A collision system able to move a body and answer overhead probes.
pub trait CollisionBackend {
    /// Move the body along `request.velocity * request.delta_time`, sliding
    /// along whatever it hits.
    fn move_and_slide(&self, request: &MoveRequest) -> MoveOutcome;

    /// Check whether anything solid overlaps the probe region.
    fn overhead_blocked(&self, probe: &OverheadProbe) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_classification() {
        let request = MoveRequest::new(Vec3::ZERO, Vec3::ZERO, TraceShape::capsule(0.4, 1.8), 0.016)
            .with_floor_max_angle(0.7);

        assert!(request.is_floor(Vec3::Y));
        // ~30 degree slope
        assert!(request.is_floor(Vec3::new(0.5, 0.866, 0.0)));
        // ~60 degree slope
        assert!(!request.is_floor(Vec3::new(0.866, 0.5, 0.0)));
        assert!(!request.is_floor(Vec3::X));
    }

    #[test]
    fn test_touches_surface() {
        let mut outcome = MoveOutcome::resting_at(Vec3::ZERO, Vec3::Y);
        assert!(!outcome.touches(SurfaceFlags::PLATFORM));

        outcome.contacts.push(Contact {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            surface: SurfaceFlags::PLATFORM,
        });
        assert!(outcome.touches(SurfaceFlags::PLATFORM));
    }

    #[test]
    fn test_probe_shape_short_span_is_sphere() {
        let probe = OverheadProbe {
            feet: Vec3::ZERO,
            radius: 0.35,
            bottom: 1.6,
            top: 1.9,
        };
        let (shape, origin) = probe.shape_and_origin();
        assert!(matches!(shape, TraceShape::Sphere { .. }));
        assert_eq!(origin, Vec3::new(0.0, 1.6, 0.0));
    }

    #[test]
    fn test_probe_shape_long_span_is_capsule() {
        let probe = OverheadProbe {
            feet: Vec3::new(1.0, 0.0, 0.0),
            radius: 0.35,
            bottom: 1.0,
            top: 1.9,
        };
        let (shape, origin) = probe.shape_and_origin();
        assert!((shape.height() - 0.9).abs() < 1e-5);
        assert_eq!(origin, Vec3::new(1.0, 1.0, 0.0));
    }
}

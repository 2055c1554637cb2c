//! Move-and-slide collision response.
//!
//! Sweeps the body along its motion, and on every hit clips the remaining
//! motion against the hit plane so the body slides along walls, floors and
//! ceilings instead of stopping dead.

use glam::Vec3;

use super::backend::{Contact, MoveOutcome, MoveRequest, CEILING_MAX_DOT};
use super::flags::ContentFlags;
use super::world::CollisionWorld;

/// Motion shorter than this (squared) is treated as no motion.
const MIN_MOTION_SQUARED: f32 = 1e-10;

/// Tolerance for "moving into a plane" checks.
const INTO_PLANE_EPSILON: f32 = 1e-4;

/// Remove the component of `vector` pointing into a surface.
///
/// Components moving away from the surface are kept as-is.
pub fn clip_velocity(vector: Vec3, normal: Vec3) -> Vec3 {
    let into = vector.dot(normal);
    if into < 0.0 {
        vector - normal * into
    } else {
        vector
    }
}

/// Move a body through `world`, sliding along every surface it hits.
///
/// # Arguments
///
/// * `world` - The collision world to move through
/// * `request` - Position, velocity, shape and floor rules for this move
/// * `mask` - Content flags the body collides with
pub fn move_and_slide(world: &CollisionWorld, request: &MoveRequest, mask: ContentFlags) -> MoveOutcome {
    let up = match request.up.try_normalize() {
        Some(up) => up,
        None => Vec3::Y,
    };

    let mut position = world.resolve_penetration(request.position, request.shape, mask);
    let mut outcome = MoveOutcome::resting_at(position, up);

    if !request.velocity.is_finite() || !request.delta_time.is_finite() || request.delta_time <= 0.0 {
        return outcome;
    }

    let mut velocity = request.velocity;
    let mut motion = velocity * request.delta_time;
    let mut planes: Vec<Vec3> = Vec::with_capacity(request.max_bounces as usize);
    let mut best_floor_dot = f32::NEG_INFINITY;

    for _ in 0..request.max_bounces.max(1) {
        if motion.length_squared() < MIN_MOTION_SQUARED {
            break;
        }

        let trace = world.trace(position, position + motion, request.shape, mask);
        position = trace.end_position;

        let Some(normal) = trace.hit_normal else {
            break;
        };

        outcome.contacts.push(Contact {
            position: trace.hit_point.unwrap_or(position),
            normal,
            surface: trace.hit_surface,
        });

        let remaining = motion * (1.0 - trace.fraction);
        let along_up = normal.dot(up);
        let is_floor = request.is_floor(normal);

        if is_floor {
            outcome.on_floor = true;
            if along_up > best_floor_dot {
                best_floor_dot = along_up;
                outcome.floor_normal = normal;
            }
        } else if along_up <= CEILING_MAX_DOT {
            outcome.on_ceiling = true;
        }

        // Wedged inside geometry the sweep could not get out of.
        if trace.all_solid {
            velocity = Vec3::ZERO;
            break;
        }

        if is_floor && request.stop_on_slope {
            // Only the sideways part of the motion travels along the slope.
            motion = clip_velocity(remaining - up * remaining.dot(up), normal);
            velocity = clip_velocity(velocity - up * velocity.dot(up), normal);
        } else {
            motion = clip_velocity(remaining, normal);
            velocity = clip_velocity(velocity, normal);
        }

        // Clipping against this plane can push back into an earlier one;
        // follow the crease between them instead.
        if let Some(&previous) = planes
            .iter()
            .find(|p| motion.dot(**p) < -INTO_PLANE_EPSILON)
        {
            let crease = previous.cross(normal).normalize_or_zero();
            motion = crease * motion.dot(crease);
            velocity = crease * velocity.dot(crease);
        }

        planes.push(normal);
    }

    outcome.position = position;
    outcome.velocity = velocity;
    outcome
}

//! Step-up assist.
//!
//! Looks for a low, steep contact in front of a grounded actor and answers
//! with an upward nudge plus a short snap, so the next tick's floor snap
//! carries the actor onto the step. This is a heuristic: at high speed the
//! detection window can be skipped and the actor stops against the step.

use glam::Vec3;

use super::config::LocomotionConfig;
use super::state::ActorState;

/// Check the previous move's contacts for a step and nudge the actor up it.
///
/// Returns `true` if a step was found.
pub fn assist_step(config: &LocomotionConfig, state: &mut ActorState) -> bool {
    if !state.grounded {
        return false;
    }

    let horizontal = Vec3::new(state.velocity.x, 0.0, state.velocity.z);
    if horizontal.length_squared() < 1e-6 {
        return false;
    }

    let floor_cos = config.slope_limit.cos();
    let step = state.contacts.contacts.iter().find(|contact| {
        let rise = contact.position.y - state.position.y;
        if rise <= config.step_min_rise || rise >= config.step_height {
            return false;
        }
        // Walkable surfaces are handled by the floor snap
        if contact.normal.y >= floor_cos - 1e-4 {
            return false;
        }
        let inward = Vec3::new(contact.normal.x, 0.0, contact.normal.z).normalize_or_zero();
        horizontal.dot(inward) < -config.step_approach_threshold
    });

    let Some(step) = step else {
        return false;
    };

    log::debug!(
        "Step-up: rise {:.2} at {:?}",
        step.position.y - state.position.y,
        step.position
    );
    state.snap_distance = config.step_snap_distance;
    state.ground_vector.y = config.step_nudge;
    true
}

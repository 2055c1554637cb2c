//! Jump impulse and ceiling clamp.
//!
//! Gravity is not applied here; the ground tracker owns it. While grounded
//! the vertical component is the floor snap, not free integration.

use glam::Vec3;

use super::config::LocomotionConfig;
use super::state::{ActorState, LocomotionCommand, SpeedModifier};

/// Apply a jump or ceiling clamp. Returns `true` if the actor jumped.
pub fn integrate_vertical(
    config: &LocomotionConfig,
    state: &mut ActorState,
    command: &LocomotionCommand,
) -> bool {
    let requested = if config.jump_on_hold {
        command.jump_pressed
    } else {
        command.jump_just_pressed
    };

    if requested && state.grounded {
        let mut strength = config.jump_strength;
        if state.is_crouching() {
            strength *= config.crouch_jump_multiplier;
        }
        if state.speed_modifier == SpeedModifier::Sprint {
            strength *= config.sprint_jump_multiplier;
        }

        state.grounded = false;
        state.snap_distance = config.jump_snap_distance;
        state.ground_vector = Vec3::Y * strength;

        log::debug!("Jump: {:.1} m/s", strength);
        return true;
    }

    // Don't stick under ceilings
    if !state.grounded && state.contacts.on_ceiling && state.ground_vector.y > 0.0 {
        state.ground_vector.y = 0.0;
    }

    false
}

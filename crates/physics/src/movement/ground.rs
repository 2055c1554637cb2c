//! Ground contact tracking.
//!
//! Reads the floor result of the previous move and decides whether the actor
//! is grounded for the coming tick. A grounded actor is pulled onto the floor
//! along its normal instead of falling, which keeps it glued to downward
//! slopes. An airborne actor integrates gravity into the ground vector.

use glam::Vec3;

use super::config::LocomotionConfig;
use super::stance::crouch_set_state;
use super::state::ActorState;

/// Ground contact change for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundEvent {
    /// Still on the floor.
    Grounded,
    /// Still in the air.
    Airborne,
    /// Lost the floor this tick.
    LeftGround,
    /// Touched down at `fall_speed`.
    Landed { fall_speed: f32 },
    /// Touched down fast enough to be knocked out of a crouch.
    HardLanding { fall_speed: f32 },
}

/// Update `grounded` and the ground vector from the last move's contacts.
pub fn track_ground(config: &LocomotionConfig, state: &mut ActorState, delta_time: f32) -> GroundEvent {
    if !state.contacts.on_floor {
        let event = if state.grounded {
            log::debug!("Left ground at {:?}", state.position);
            GroundEvent::LeftGround
        } else {
            GroundEvent::Airborne
        };
        state.grounded = false;
        state.ground_vector += Vec3::NEG_Y * config.gravity * delta_time;
        return event;
    }

    let mut event = GroundEvent::Grounded;
    if !state.grounded {
        let fall_speed = (-state.ground_vector.y).max(0.0);
        if fall_speed > config.hard_landing_speed {
            crouch_set_state(state, false, config.hard_landing_cooldown);
            log::debug!("Hard landing at {:.1} m/s", fall_speed);
            event = GroundEvent::HardLanding { fall_speed };
        } else {
            log::debug!("Landed at {:.1} m/s", fall_speed);
            event = GroundEvent::Landed { fall_speed };
        }
        state.velocity *= config.landing_damping;
    }

    let floor_normal = state.contacts.floor_normal.try_normalize().unwrap_or(Vec3::Y);
    state.grounded = true;
    state.ground_vector = -floor_normal * state.snap_distance;
    state.snap_distance =
        config.ground_snap_distance + state.horizontal_speed() * config.snap_speed_factor;

    event
}

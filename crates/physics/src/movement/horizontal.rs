//! Horizontal motion from directional intent.
//!
//! On the ground, velocity blends exponentially toward the target velocity.
//! In the air, acceleration is additive and capped, which leaves the actor
//! little control but lets jumps carry their take-off momentum.

use glam::{Vec2, Vec3};

use super::config::LocomotionConfig;
use super::state::{ActorState, LocomotionCommand, SpeedModifier};

/// Rotate a local move axis (x = right, y = forward) into world space.
///
/// Returns a unit vector, or zero when there is no intent.
pub fn wish_direction(yaw: f32, axis: Vec2) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let forward = Vec3::new(cos_yaw, 0.0, sin_yaw);
    let right = Vec3::new(-sin_yaw, 0.0, cos_yaw);
    (forward * axis.y + right * axis.x).normalize_or_zero()
}

/// Pick the speed rule for this tick: slide > crouch > sprint > walk.
pub fn select_modifier(state: &ActorState, command: &LocomotionCommand) -> SpeedModifier {
    if state.slide.active {
        SpeedModifier::Slide
    } else if state.is_crouching() {
        SpeedModifier::Crouch
    } else if command.sprint_held {
        SpeedModifier::Sprint
    } else {
        SpeedModifier::Walk
    }
}

/// Target speed for a modifier.
pub fn target_speed(config: &LocomotionConfig, state: &ActorState, modifier: SpeedModifier) -> f32 {
    match modifier {
        SpeedModifier::Slide => state.slide.speed,
        SpeedModifier::Crouch => config.crouch_speed(),
        SpeedModifier::Sprint => config.sprint_speed(),
        SpeedModifier::Walk => config.base_speed,
    }
}

/// Integrate horizontal velocity for one tick.
pub fn integrate_horizontal(
    config: &LocomotionConfig,
    state: &mut ActorState,
    command: &LocomotionCommand,
    delta_time: f32,
) {
    let modifier = select_modifier(state, command);
    state.speed_modifier = modifier;

    // A slide keeps the heading it started with
    if !state.slide.active {
        state.move_direction = wish_direction(state.yaw, command.move_axis);
    }
    let direction = state.move_direction;

    if state.grounded {
        let target = direction * target_speed(config, state, modifier);
        let weight = (config.ground_strength * delta_time).clamp(0.0, 1.0);
        state.velocity = state.velocity.lerp(target, weight);
    } else {
        state.velocity += direction * config.air_strength * delta_time;
        state.velocity = state.velocity.clamp_length_max(config.max_air_speed);
    }
    state.velocity.y = 0.0;
}

//! Slide sub-state of crouching.
//!
//! A slide starts when the actor crouches while sprinting. It begins at a
//! boosted speed and decays at the ground strength rate. Downhill floors
//! cancel part of the decay, and can reverse it up to the speed cap.

use glam::Vec3;

use super::config::LocomotionConfig;
use super::horizontal::wish_direction;
use super::state::{ActorState, LocomotionCommand};

/// Why a slide ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideStop {
    /// The actor left the crouch.
    Released,
    /// Speed decayed to zero.
    Exhausted,
    /// The floor got steeper than the slide slope limit.
    TooSteep,
    /// Ground contact was lost and slides do not persist in the air.
    Airborne,
}

/// Slide change for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlideEvent {
    Idle,
    Started { speed: f32 },
    Sliding,
    Stopped(SlideStop),
}

/// Angle between a floor normal and up, in radians.
#[inline]
fn slope_angle(normal: Vec3) -> f32 {
    normal.normalize_or_zero().y.clamp(-1.0, 1.0).acos()
}

/// Start, advance or end a slide.
pub fn update_slide(
    config: &LocomotionConfig,
    state: &mut ActorState,
    command: &LocomotionCommand,
    delta_time: f32,
) -> SlideEvent {
    state.slide.cooldown = (state.slide.cooldown - delta_time).max(0.0);

    if !state.is_crouching() {
        state.slide.blocked = false;
        if state.slide.active {
            return stop(state, SlideStop::Released);
        }
        return SlideEvent::Idle;
    }

    let floor_normal = state.contacts.floor_normal;

    if state.slide.active {
        let mut downhill = 0.0;
        if state.grounded {
            if slope_angle(floor_normal) > config.slide_max_slope {
                return stop(state, SlideStop::TooSteep);
            }
            downhill = Vec3::new(floor_normal.x, 0.0, floor_normal.z).dot(state.slide.heading);
        } else if !config.slide_persists_airborne {
            return stop(state, SlideStop::Airborne);
        }

        let decay = config.ground_strength - config.slide_slope_gain * downhill.max(0.0);
        state.slide.speed = (state.slide.speed - decay * delta_time).min(config.slide_max_speed);
        if state.slide.speed <= 0.0 {
            state.slide.speed = 0.0;
            return stop(state, SlideStop::Exhausted);
        }
        return SlideEvent::Sliding;
    }

    let eligible = command.sprint_held
        && state.sprint_timer >= config.slide_min_sprint_time
        && state.slide.cooldown <= 0.0
        && !state.slide.blocked
        && state.grounded
        && slope_angle(floor_normal) <= config.slide_max_slope;
    if !eligible {
        return SlideEvent::Idle;
    }

    let mut heading = wish_direction(state.yaw, command.move_axis);
    if heading == Vec3::ZERO {
        heading = state.move_direction;
    }
    if heading == Vec3::ZERO {
        heading = state.forward_direction();
    }

    let speed = config.slide_entry_speed().min(config.slide_max_speed);
    state.slide.active = true;
    state.slide.speed = speed;
    state.slide.cooldown = config.slide_cooldown;
    state.slide.blocked = true;
    state.slide.heading = heading;
    state.move_direction = heading;

    log::debug!("Slide started at {:.1} m/s heading {:?}", speed, heading);
    SlideEvent::Started { speed }
}

fn stop(state: &mut ActorState, reason: SlideStop) -> SlideEvent {
    state.slide.active = false;
    log::debug!("Slide stopped: {:?}", reason);
    SlideEvent::Stopped(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::state::Stance;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (LocomotionConfig, ActorState) {
        let config = LocomotionConfig::default();
        let mut state = ActorState::spawn(Vec3::ZERO, 0.0, &config);
        state.grounded = true;
        state.stance = Stance::Crouching;
        (config, state)
    }

    fn crouch_sprint() -> LocomotionCommand {
        LocomotionCommand {
            move_axis: Vec2::Y,
            sprint_held: true,
            crouch_held: true,
            ..LocomotionCommand::captured()
        }
    }

    #[test]
    fn test_entry_from_crouch_sprint() {
        let (config, mut state) = setup();

        let event = update_slide(&config, &mut state, &crouch_sprint(), DT);
        assert_eq!(event, SlideEvent::Started { speed: config.slide_entry_speed() });
        assert!(state.slide.active);
        assert_eq!(state.slide.cooldown, config.slide_cooldown);
        assert!((state.slide.heading - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_no_entry_without_sprint() {
        let (config, mut state) = setup();
        let command = LocomotionCommand {
            sprint_held: false,
            ..crouch_sprint()
        };

        assert_eq!(update_slide(&config, &mut state, &command, DT), SlideEvent::Idle);
        assert!(!state.slide.active);
    }

    #[test]
    fn test_entry_needs_sprint_time() {
        let config = LocomotionConfig {
            slide_min_sprint_time: 0.5,
            ..Default::default()
        };
        let mut state = ActorState::spawn(Vec3::ZERO, 0.0, &config);
        state.grounded = true;
        state.stance = Stance::Crouching;

        state.sprint_timer = 0.2;
        assert_eq!(update_slide(&config, &mut state, &crouch_sprint(), DT), SlideEvent::Idle);

        state.sprint_timer = 0.6;
        assert!(matches!(
            update_slide(&config, &mut state, &crouch_sprint(), DT),
            SlideEvent::Started { .. }
        ));
    }

    #[test]
    fn test_entry_blocked_by_steep_floor() {
        let (config, mut state) = setup();
        state.contacts.floor_normal = Vec3::new(1.0, 1.0, 0.0).normalize();

        // 45 degrees is steeper than the 0.7 rad slide limit
        assert_eq!(update_slide(&config, &mut state, &crouch_sprint(), DT), SlideEvent::Idle);
    }

    #[test]
    fn test_flat_decay_is_linear() {
        let (config, mut state) = setup();
        update_slide(&config, &mut state, &crouch_sprint(), DT);
        let start = state.slide.speed;

        update_slide(&config, &mut state, &crouch_sprint(), DT);
        assert!((state.slide.speed - (start - config.ground_strength * DT)).abs() < 1e-4);
    }

    #[test]
    fn test_downhill_accelerates_to_cap() {
        let (config, mut state) = setup();
        let config = LocomotionConfig {
            slide_slope_gain: 40.0,
            ..config
        };
        update_slide(&config, &mut state, &crouch_sprint(), DT);

        // Floor tilts down along +X (the slide heading)
        state.contacts.floor_normal = Vec3::new(0.5, 1.0, 0.0).normalize();
        let start = state.slide.speed;
        update_slide(&config, &mut state, &crouch_sprint(), DT);
        assert!(state.slide.speed > start);

        for _ in 0..600 {
            update_slide(&config, &mut state, &crouch_sprint(), DT);
        }
        assert_eq!(state.slide.speed, config.slide_max_speed);
        assert!(state.slide.active);
    }

    #[test]
    fn test_uphill_decays_at_nominal_rate() {
        let (config, mut state) = setup();
        update_slide(&config, &mut state, &crouch_sprint(), DT);

        state.contacts.floor_normal = Vec3::new(-0.5, 1.0, 0.0).normalize();
        let start = state.slide.speed;
        update_slide(&config, &mut state, &crouch_sprint(), DT);
        assert!((state.slide.speed - (start - config.ground_strength * DT)).abs() < 1e-4);
    }

    #[test]
    fn test_release_stops_and_clears_latch() {
        let (config, mut state) = setup();
        update_slide(&config, &mut state, &crouch_sprint(), DT);

        state.stance = Stance::Standing;
        assert_eq!(
            update_slide(&config, &mut state, &crouch_sprint(), DT),
            SlideEvent::Stopped(SlideStop::Released)
        );
        assert!(!state.slide.active);
        assert!(!state.slide.blocked);
    }

    #[test]
    fn test_latch_prevents_retrigger() {
        let (config, mut state) = setup();
        update_slide(&config, &mut state, &crouch_sprint(), DT);

        // Exhaust the slide while still holding crouch and sprint
        let mut stopped = false;
        for _ in 0..600 {
            if update_slide(&config, &mut state, &crouch_sprint(), DT)
                == SlideEvent::Stopped(SlideStop::Exhausted)
            {
                stopped = true;
                break;
            }
        }
        assert!(stopped);

        // Cooldown has long expired, but crouch was never released
        for _ in 0..120 {
            assert_eq!(update_slide(&config, &mut state, &crouch_sprint(), DT), SlideEvent::Idle);
        }
    }

    #[test]
    fn test_airborne_behaviour_configurable() {
        let (config, mut state) = setup();
        update_slide(&config, &mut state, &crouch_sprint(), DT);
        state.grounded = false;
        assert_eq!(update_slide(&config, &mut state, &crouch_sprint(), DT), SlideEvent::Sliding);

        let config = LocomotionConfig {
            slide_persists_airborne: false,
            ..config
        };
        assert_eq!(
            update_slide(&config, &mut state, &crouch_sprint(), DT),
            SlideEvent::Stopped(SlideStop::Airborne)
        );
    }

    #[test]
    fn test_heading_falls_back_to_last_direction() {
        let (config, mut state) = setup();
        state.move_direction = Vec3::Z;
        let command = LocomotionCommand {
            move_axis: Vec2::ZERO,
            ..crouch_sprint()
        };

        update_slide(&config, &mut state, &command, DT);
        assert_eq!(state.slide.heading, Vec3::Z);
    }
}

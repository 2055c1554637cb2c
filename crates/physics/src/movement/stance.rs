//! Standing/crouching state machine with continuous height.
//!
//! The discrete [`Stance`] picks a target height; `body_height` walks toward
//! it at a fixed rate. Head and collider placement are pure functions of the
//! height so the camera, collider and mesh never disagree.
//!
//! Every stance change goes through [`crouch_set_state`], which refuses to do
//! anything while the stance cooldown runs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionBackend, OverheadProbe};

use super::config::{CrouchMode, LocomotionConfig};
use super::state::{ActorState, LocomotionCommand, Stance};

/// Heights closer than this to the target snap onto it.
const HEIGHT_EPSILON: f32 = 1e-4;

/// Probe radius relative to the actor radius, so walls beside the actor
/// do not count as overhead.
const PROBE_RADIUS_SCALE: f32 = 0.9;

/// Gap between the top of the current body and the start of the probe.
const PROBE_CLEARANCE: f32 = 0.02;

/// What happened to the discrete stance this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanceEvent {
    Unchanged,
    Crouched,
    Stood,
    /// Went from standing to crouching because something is overhead.
    ForcedCrouch,
    /// A stand was requested but something is overhead.
    StandBlocked,
}

/// Placement derived from the body height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StancePose {
    /// Capsule height.
    pub body_height: f32,
    /// Eye position relative to the feet.
    pub head_offset: Vec3,
    /// Capsule center relative to the feet.
    pub collider_offset: Vec3,
}

impl StancePose {
    /// Pose for `body_height`, clamped to the configured extremes.
    pub fn at(config: &LocomotionConfig, body_height: f32) -> Self {
        let body_height = body_height.clamp(config.crouching_height, config.standing_height);
        let span = config.standing_height - config.crouching_height;
        let t = if span > 0.0 {
            (body_height - config.crouching_height) / span
        } else {
            1.0
        };
        let head = config.head_offset_crouching
            + (config.head_offset_standing - config.head_offset_crouching) * t;

        Self {
            body_height,
            head_offset: Vec3::Y * head,
            collider_offset: Vec3::Y * (body_height * 0.5),
        }
    }
}

/// Request a stance, starting `cooldown` seconds of suppression on success.
///
/// A successful change also becomes the toggle latch, so a stance forced
/// from outside (e.g. a hard landing) is not undone by a stale toggle.
/// Returns `false` without touching anything while a cooldown is running.
pub fn crouch_set_state(state: &mut ActorState, crouch: bool, cooldown: f32) -> bool {
    if state.stance_cooldown > 0.0 {
        return false;
    }

    state.stance = if crouch {
        Stance::Crouching
    } else {
        Stance::Standing
    };
    state.crouch_latched = crouch;
    state.stance_cooldown = cooldown.max(0.0);
    true
}

/// Advance the stance state machine by one tick.
pub fn update_stance<B: CollisionBackend + ?Sized>(
    config: &LocomotionConfig,
    state: &mut ActorState,
    command: &LocomotionCommand,
    backend: &B,
    delta_time: f32,
) -> StanceEvent {
    state.stance_cooldown = (state.stance_cooldown - delta_time).max(0.0);

    let before = state.stance;

    // Resolve the requested stance
    let requested = match config.crouch_mode {
        CrouchMode::Hold => command.crouch_held,
        CrouchMode::Toggle => {
            // Presses during the cooldown are dropped, not queued
            if command.crouch_held && !state.crouch_held_previous && state.stance_cooldown <= 0.0 {
                state.crouch_latched = !state.crouch_latched;
            }
            state.crouch_latched
        }
    };
    state.crouch_held_previous = command.crouch_held;
    crouch_set_state(state, requested, 0.0);

    // Never stand into something
    let mut forced = false;
    if state.stance == Stance::Standing
        && state.body_height < config.standing_height
        && backend.overhead_blocked(&overhead_probe(config, state))
    {
        // Being held down is not a toggle; stand again once clear.
        let latched = state.crouch_latched;
        forced = crouch_set_state(state, true, 0.0);
        state.crouch_latched = latched;
    }

    step_height(config, state, delta_time);

    let event = match (before, state.stance) {
        (Stance::Standing, Stance::Crouching) if forced => StanceEvent::ForcedCrouch,
        (Stance::Standing, Stance::Crouching) => StanceEvent::Crouched,
        (Stance::Crouching, Stance::Standing) => StanceEvent::Stood,
        (Stance::Crouching, Stance::Crouching) if forced => StanceEvent::StandBlocked,
        _ => StanceEvent::Unchanged,
    };

    match event {
        StanceEvent::ForcedCrouch => log::debug!("Forced crouch: obstruction overhead"),
        StanceEvent::Crouched | StanceEvent::Stood => {
            log::debug!("Stance {:?} -> {:?}", before, state.stance)
        }
        _ => {}
    }

    event
}

/// Region that must be clear for the actor to reach full height.
pub fn overhead_probe(config: &LocomotionConfig, state: &ActorState) -> OverheadProbe {
    OverheadProbe {
        feet: state.position,
        radius: config.actor_radius * PROBE_RADIUS_SCALE,
        bottom: state.body_height + PROBE_CLEARANCE,
        top: config.standing_height + config.overhead_probe_margin,
    }
}

/// Move `body_height` toward the current stance's extreme.
fn step_height(config: &LocomotionConfig, state: &mut ActorState, delta_time: f32) {
    let target = match state.stance {
        Stance::Standing => config.standing_height,
        Stance::Crouching => config.crouching_height,
    };
    if state.body_height == target {
        return;
    }

    let step = config.crouch_transition_speed * delta_time;
    let remaining = target - state.body_height;
    if remaining.abs() <= step + HEIGHT_EPSILON {
        state.body_height = target;
    } else {
        state.body_height += step * remaining.signum();
    }
}

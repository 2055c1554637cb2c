//! Actor state and per-tick input snapshot.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::{Contact, MoveOutcome, SurfaceFlags, TraceShape};

use super::config::LocomotionConfig;

/// Discrete stance. The body height interpolates between the two extremes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Standing,
    Crouching,
}

/// Which rule picked this tick's target speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedModifier {
    #[default]
    Walk,
    Sprint,
    Crouch,
    Slide,
}

/// Slide sub-state, only active while crouching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideState {
    /// A slide is in progress.
    pub active: bool,
    /// Current slide speed (meters/second).
    pub speed: f32,
    /// Time until another slide may start (seconds).
    pub cooldown: f32,
    /// Set when a slide starts; cleared only by releasing crouch.
    pub blocked: bool,
    /// Horizontal direction the slide travels in.
    pub heading: Vec3,
}

/// Collision results of the previous tick's move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactReport {
    /// Resting on a walkable surface.
    pub on_floor: bool,
    /// Normal of the supporting floor.
    pub floor_normal: Vec3,
    /// Hit something overhead.
    pub on_ceiling: bool,
    /// Every surface touched, in hit order.
    pub contacts: Vec<Contact>,
}

impl Default for ContactReport {
    fn default() -> Self {
        Self {
            on_floor: false,
            floor_normal: Vec3::Y,
            on_ceiling: false,
            contacts: Vec::new(),
        }
    }
}

impl ContactReport {
    /// Check whether any contact carries all of `flags`.
    pub fn touches(&self, flags: SurfaceFlags) -> bool {
        self.contacts.iter().any(|c| c.surface.contains(flags))
    }
}

impl From<MoveOutcome> for ContactReport {
    fn from(outcome: MoveOutcome) -> Self {
        Self {
            on_floor: outcome.on_floor,
            floor_normal: outcome.floor_normal,
            on_ceiling: outcome.on_ceiling,
            contacts: outcome.contacts,
        }
    }
}

/// Complete locomotion state of one actor.
///
/// Horizontal velocity and the ground vector are integrated separately and
/// only summed when the move is submitted to the collision backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    /// Position of the feet in world space.
    pub position: Vec3,

    /// Intent-driven horizontal velocity (y is always 0).
    pub velocity: Vec3,

    /// Floor snap, gravity, jump and step-assist velocity.
    pub ground_vector: Vec3,

    /// Velocity the backend reported after the last move.
    pub resolved_velocity: Vec3,

    /// View yaw in radians, wrapped to -PI..PI.
    pub yaw: f32,

    /// View pitch in radians, clamped by the configured limit.
    pub pitch: f32,

    /// Resting on a walkable floor as of the last move.
    pub grounded: bool,

    /// Snap distance used by the next grounded tick.
    pub snap_distance: f32,

    /// Current discrete stance.
    pub stance: Stance,

    /// Current capsule height.
    pub body_height: f32,

    /// Time left during which stance changes are ignored (seconds).
    pub stance_cooldown: f32,

    /// Crouch button state on the previous tick, for toggle edges.
    pub crouch_held_previous: bool,

    /// Crouch request latched by toggle presses.
    pub crouch_latched: bool,

    /// Slide sub-state.
    pub slide: SlideState,

    /// Continuous sprint time (seconds).
    pub sprint_timer: f32,

    /// Current world-space movement direction (unit length or zero).
    pub move_direction: Vec3,

    /// Target-speed rule selected on the last tick.
    pub speed_modifier: SpeedModifier,

    /// Collision results of the last move.
    pub contacts: ContactReport,
}

impl ActorState {
    /// Create a freshly spawned actor: standing, airborne, timers at zero.
    pub fn spawn(position: Vec3, yaw: f32, config: &LocomotionConfig) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            ground_vector: Vec3::ZERO,
            resolved_velocity: Vec3::ZERO,
            yaw,
            pitch: 0.0,
            grounded: false,
            snap_distance: config.ground_snap_distance,
            stance: Stance::Standing,
            body_height: config.standing_height,
            stance_cooldown: 0.0,
            crouch_held_previous: false,
            crouch_latched: false,
            slide: SlideState::default(),
            sprint_timer: 0.0,
            move_direction: Vec3::ZERO,
            speed_modifier: SpeedModifier::Walk,
            contacts: ContactReport::default(),
        }
    }

    /// Velocity submitted to the collision backend.
    #[inline]
    pub fn move_velocity(&self) -> Vec3 {
        self.velocity + self.ground_vector
    }

    /// Current horizontal speed.
    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Check if the stance is crouching.
    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.stance == Stance::Crouching
    }

    /// Forward direction from yaw (horizontal only).
    pub fn forward_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_yaw, 0.0, sin_yaw)
    }

    /// Right direction from yaw (horizontal only).
    pub fn right_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(-sin_yaw, 0.0, cos_yaw)
    }

    /// Full look direction including pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
    }

    /// Collision capsule for the current body height.
    pub fn capsule(&self, config: &LocomotionConfig) -> TraceShape {
        TraceShape::capsule(config.actor_radius, self.body_height)
    }
}

/// Input snapshot for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocomotionCommand {
    /// Directional intent: x = right, y = forward. Length at most 1.
    pub move_axis: Vec2,

    /// View change this tick in radians: x = yaw, y = pitch.
    pub look_delta: Vec2,

    /// Jump button is down.
    pub jump_pressed: bool,

    /// Jump button went down this tick.
    pub jump_just_pressed: bool,

    /// Sprint button is down.
    pub sprint_held: bool,

    /// Crouch button is down.
    pub crouch_held: bool,

    /// Input is captured; when false every intent reads as neutral.
    pub input_captured: bool,
}

impl LocomotionCommand {
    /// A neutral command with input captured.
    pub fn captured() -> Self {
        Self {
            input_captured: true,
            ..Default::default()
        }
    }

    /// The command as the controller should see it.
    ///
    /// Uncaptured input is neutral. Non-finite axes become zero and axes
    /// longer than 1 are renormalized.
    pub fn effective(&self) -> Self {
        if !self.input_captured {
            return Self::default();
        }

        let move_axis = if !self.move_axis.is_finite() {
            Vec2::ZERO
        } else if self.move_axis.length_squared() > 1.0 {
            self.move_axis.normalize_or_zero()
        } else {
            self.move_axis
        };
        let look_delta = if self.look_delta.is_finite() {
            self.look_delta
        } else {
            Vec2::ZERO
        };

        Self {
            move_axis,
            look_delta,
            ..*self
        }
    }

    /// Check if any movement input is active.
    #[inline]
    pub fn has_move_intent(&self) -> bool {
        self.move_axis.length_squared() > 1e-4
    }
}

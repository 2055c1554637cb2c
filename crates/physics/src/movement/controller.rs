//! Locomotion controller.
//!
//! This is the main entry point for actor movement. It takes one input
//! snapshot per tick and runs the locomotion components in a fixed order,
//! then submits a single move to the collision backend.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::collision::{CollisionBackend, MoveRequest};

use super::config::{ConfigError, LocomotionConfig};
use super::ground::{track_ground, GroundEvent};
use super::horizontal::integrate_horizontal;
use super::ports::PresentationFrame;
use super::slide::{update_slide, SlideEvent};
use super::stance::{update_stance, StanceEvent};
use super::state::{ActorState, ContactReport, LocomotionCommand};
use super::step::assist_step;
use super::vertical::integrate_vertical;

/// Downward speed used to drop a freshly spawned actor onto the floor.
const SETTLE_SPEED: f32 = 4.0;

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// State to present for this tick.
    pub frame: PresentationFrame,
    pub ground: GroundEvent,
    pub stance: StanceEvent,
    pub slide: SlideEvent,
    pub jumped: bool,
    pub stepped: bool,
}

/// Actor locomotion controller.
///
/// Handles:
/// - Ground contact, snapping and landings
/// - Walking, sprinting and air control
/// - Jumping and ceiling clamps
/// - Crouching with overhead checks
/// - Sliding
/// - Step-up assist
///
/// # Example
///
/// ```ignore
/// let controller = LocomotionController::new(LocomotionConfig::default())?;
/// let mut state = controller.spawn(spawn_position, 0.0);
///
/// // Each tick:
/// controller.tick(&mut state, &command, &world, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
}

impl LocomotionController {
    /// Create a controller, rejecting an invalid configuration.
    pub fn new(config: LocomotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self {
            config: LocomotionConfig::default(),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Create the state of an actor spawning at `position`.
    pub fn spawn(&self, position: Vec3, yaw: f32) -> ActorState {
        ActorState::spawn(position, yaw, &self.config)
    }

    /// Spawn an actor and drop it onto whatever is below `position`.
    ///
    /// Floors up to `SETTLE_SPEED` meters down are found. The actor is still
    /// airborne afterwards; the first tick registers the landing.
    pub fn spawn_on_ground<B: CollisionBackend + ?Sized>(
        &self,
        position: Vec3,
        yaw: f32,
        backend: &B,
    ) -> ActorState {
        let mut state = self.spawn(position, yaw);
        let request = MoveRequest {
            max_bounces: self.config.max_bounces,
            ..MoveRequest::new(
                position,
                Vec3::NEG_Y * SETTLE_SPEED,
                state.capsule(&self.config),
                1.0,
            )
            .with_floor_max_angle(self.config.slope_limit)
        };

        let outcome = backend.move_and_slide(&request);
        if outcome.position.is_finite() {
            state.position = outcome.position;
        }
        state.contacts = ContactReport::from(outcome);
        log::debug!("Spawned at {:?} (on floor: {})", state.position, state.contacts.on_floor);
        state
    }

    /// Advance `state` by one tick.
    ///
    /// Returns `None` without touching the state if `delta_time` is not a
    /// positive finite number. Longer steps are clamped to `max_tick_delta`.
    ///
    /// # Arguments
    ///
    /// * `state` - The actor's state (will be modified)
    /// * `command` - Input snapshot for this tick
    /// * `backend` - Collision backend the move is submitted to
    /// * `delta_time` - Time step in seconds
    pub fn tick<B: CollisionBackend + ?Sized>(
        &self,
        state: &mut ActorState,
        command: &LocomotionCommand,
        backend: &B,
        delta_time: f32,
    ) -> Option<TickReport> {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            log::warn!("Rejected tick with delta time {}", delta_time);
            return None;
        }
        let delta_time = delta_time.min(self.config.max_tick_delta);
        let command = command.effective();
        let config = &self.config;

        self.update_view_angles(state, &command);

        let ground = track_ground(config, state, delta_time);
        self.update_sprint_timer(state, &command, delta_time);
        let stance = update_stance(config, state, &command, backend, delta_time);
        let slide = update_slide(config, state, &command, delta_time);
        integrate_horizontal(config, state, &command, delta_time);
        let stepped = assist_step(config, state);
        let jumped = integrate_vertical(config, state, &command);

        self.submit_move(state, backend, delta_time);

        let frame = PresentationFrame::capture(config, state);
        log::trace!(
            "tick pos={:?} vel={:?} grounded={} stance={:?} height={:.2} modifier={:?}",
            state.position,
            state.resolved_velocity,
            state.grounded,
            state.stance,
            state.body_height,
            state.speed_modifier
        );

        Some(TickReport {
            frame,
            ground,
            stance,
            slide,
            jumped,
            stepped,
        })
    }

    // ========================================================================
    // View Angles
    // ========================================================================

    fn update_view_angles(&self, state: &mut ActorState, command: &LocomotionCommand) {
        state.yaw = (state.yaw + command.look_delta.x + PI).rem_euclid(TAU) - PI;
        state.pitch =
            (state.pitch + command.look_delta.y).clamp(-self.config.max_pitch, self.config.max_pitch);
    }

    // ========================================================================
    // Timers
    // ========================================================================

    fn update_sprint_timer(&self, state: &mut ActorState, command: &LocomotionCommand, delta_time: f32) {
        if command.sprint_held && command.has_move_intent() && !state.is_crouching() {
            state.sprint_timer += delta_time;
        } else {
            state.sprint_timer = 0.0;
        }
    }

    // ========================================================================
    // Collision
    // ========================================================================

    fn submit_move<B: CollisionBackend + ?Sized>(&self, state: &mut ActorState, backend: &B, delta_time: f32) {
        let request = MoveRequest {
            position: state.position,
            velocity: state.move_velocity(),
            shape: state.capsule(&self.config),
            up: Vec3::Y,
            delta_time,
            max_bounces: self.config.max_bounces,
            floor_max_angle: self.config.slope_limit,
            stop_on_slope: self.config.stop_on_slope,
        };

        let outcome = backend.move_and_slide(&request);
        if outcome.position.is_finite() && outcome.velocity.is_finite() {
            state.position = outcome.position;
            state.resolved_velocity = outcome.velocity;
        } else {
            log::warn!("Collision backend returned a non-finite move; keeping last position");
            state.resolved_velocity = Vec3::ZERO;
        }
        state.contacts = ContactReport::from(outcome);
    }
}

// ============================================================================
// Tests
// ============================================================================

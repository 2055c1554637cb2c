//! Player input handling.
//!
//! This module converts raw device state (keys, mouse motion) into the
//! [`LocomotionCommand`] the controller consumes once per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stride_physics::movement::{InputSource, LocomotionCommand};

use crate::mouse::MouseCapture;

/// Raw player input for a single frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Mouse delta this frame (pixels).
    pub mouse_delta: Vec2,

    /// Action buttons pressed.
    pub actions: ActionInput,

    /// Frame number this input was generated.
    pub frame: u32,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub crouch: bool,
    pub sprint: bool,
    pub escape: bool,
}

/// Mouse look settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// View rotation per pixel of mouse motion (degrees).
    pub sensitivity: f32,

    /// Moving the mouse up looks down.
    pub invert_y: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            invert_y: false,
        }
    }
}

impl PlayerInput {
    /// Movement axis (x = right, y = forward), unit length or zero.
    pub fn move_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.movement.forward {
            axis.y += 1.0;
        }
        if self.movement.backward {
            axis.y -= 1.0;
        }
        if self.movement.right {
            axis.x += 1.0;
        }
        if self.movement.left {
            axis.x -= 1.0;
        }

        // Diagonals are not faster
        axis.normalize_or_zero()
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward
            || self.movement.backward
            || self.movement.left
            || self.movement.right
    }
}

/// Turns successive [`PlayerInput`] frames into locomotion commands.
///
/// Tracks the jump edge and mouse capture between frames. Call
/// [`InputState::feed`] with the latest device state before each tick.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    config: InputConfig,
    mouse: MouseCapture,
    current: PlayerInput,
    jump_previous: bool,
}

impl InputState {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Replace the device state sampled by the next tick.
    pub fn feed(&mut self, input: PlayerInput) {
        self.current = input;
    }

    /// Mouse capture state.
    pub fn mouse(&self) -> &MouseCapture {
        &self.mouse
    }

    /// Mutable mouse capture state.
    pub fn mouse_mut(&mut self) -> &mut MouseCapture {
        &mut self.mouse
    }

    /// Look delta in radians (x = yaw, y = pitch) for a mouse delta in pixels.
    pub fn look_delta(&self, mouse_delta: Vec2) -> Vec2 {
        let scale = self.config.sensitivity.to_radians();
        let pitch_sign = if self.config.invert_y { 1.0 } else { -1.0 };
        Vec2::new(mouse_delta.x * scale, mouse_delta.y * scale * pitch_sign)
    }

    /// Build the command for the current frame and advance edge tracking.
    pub fn command(&mut self) -> LocomotionCommand {
        self.mouse.update(self.current.actions.escape);

        let actions = self.current.actions;
        let jump_just_pressed = actions.jump && !self.jump_previous;
        self.jump_previous = actions.jump;

        let command = LocomotionCommand {
            move_axis: self.current.move_axis(),
            look_delta: self.look_delta(self.current.mouse_delta),
            jump_pressed: actions.jump,
            jump_just_pressed,
            sprint_held: actions.sprint,
            crouch_held: actions.crouch,
            input_captured: self.mouse.is_captured(),
        };

        // Mouse motion is consumed once
        self.current.mouse_delta = Vec2::ZERO;
        command
    }
}

impl InputSource for InputState {
    fn sample(&mut self) -> LocomotionCommand {
        self.command().effective()
    }
}

//! Collaborator contracts around the controller.
//!
//! The controller never looks its collaborators up. An [`InputSource`] is
//! sampled once per tick and a [`PresentationSink`] receives a
//! [`PresentationFrame`] once per tick; nothing flows back from the sink.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::SurfaceFlags;

use super::config::LocomotionConfig;
use super::stance::StancePose;
use super::state::{ActorState, LocomotionCommand, Stance};

/// Produces one input snapshot per tick.
pub trait InputSource {
    fn sample(&mut self) -> LocomotionCommand;
}

impl<T: InputSource + ?Sized> InputSource for &mut T {
    fn sample(&mut self) -> LocomotionCommand {
        (**self).sample()
    }
}

/// Applies controller output to a collider, mesh and camera.
pub trait PresentationSink {
    fn publish(&mut self, frame: &PresentationFrame);
}

impl<T: PresentationSink + ?Sized> PresentationSink for &mut T {
    fn publish(&mut self, frame: &PresentationFrame) {
        (**self).publish(frame)
    }
}

/// Discards every frame.
impl PresentationSink for () {
    fn publish(&mut self, _frame: &PresentationFrame) {}
}

/// Everything a presentation layer needs from one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresentationFrame {
    /// Feet position.
    pub position: Vec3,
    /// Velocity resolved by the collision backend.
    pub velocity: Vec3,
    /// Capsule height.
    pub body_height: f32,
    /// Eye position relative to the feet.
    pub head_offset: Vec3,
    /// Capsule center relative to the feet.
    pub collider_offset: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub grounded: bool,
    pub stance: Stance,
    pub sliding: bool,
    /// Standing on or touching a surface tagged as a moving platform.
    pub on_platform: bool,
}

impl PresentationFrame {
    /// Capture the presentation-relevant part of `state`.
    pub fn capture(config: &LocomotionConfig, state: &ActorState) -> Self {
        let pose = StancePose::at(config, state.body_height);
        Self {
            position: state.position,
            velocity: state.resolved_velocity,
            body_height: pose.body_height,
            head_offset: pose.head_offset,
            collider_offset: pose.collider_offset,
            yaw: state.yaw,
            pitch: state.pitch,
            grounded: state.grounded,
            stance: state.stance,
            sliding: state.slide.active,
            on_platform: state.contacts.touches(SurfaceFlags::PLATFORM),
        }
    }

    /// World-space eye position.
    #[inline]
    pub fn eye_position(&self) -> Vec3 {
        self.position + self.head_offset
    }

    /// World-space capsule center.
    #[inline]
    pub fn collider_center(&self) -> Vec3 {
        self.position + self.collider_offset
    }
}

//! First-person locomotion state machine.
//!
//! One tick runs these components in order, each a free function over
//! `&LocomotionConfig` and `&mut ActorState`:
//!
//! - Ground contact tracking (floor snap, gravity, landings)
//! - Stance (standing/crouching with continuous height)
//! - Slide (crouch + sprint sub-state)
//! - Horizontal motion (ground blend, capped air acceleration)
//! - Step-up assist
//! - Vertical motion (jump, ceiling clamp)
//!
//! The [`LocomotionController`] sequences them and submits exactly one move
//! per tick to a [`CollisionBackend`](crate::collision::CollisionBackend).
//! The contacts of that move feed the next tick.
//!
//! # Design
//!
//! Collaborators are passed in, never looked up: input arrives as a
//! [`LocomotionCommand`], presentation leaves as a [`PresentationFrame`].
//! Given the same commands and backend answers, a tick sequence always
//! produces the same state.

mod config;
mod controller;
mod ground;
mod horizontal;
mod ports;
mod slide;
mod stance;
mod state;
mod step;
mod vertical;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, CrouchMode, LocomotionConfig};
pub use controller::{LocomotionController, TickReport};
pub use ground::{track_ground, GroundEvent};
pub use horizontal::{integrate_horizontal, select_modifier, target_speed, wish_direction};
pub use ports::{InputSource, PresentationFrame, PresentationSink};
pub use slide::{update_slide, SlideEvent, SlideStop};
pub use stance::{crouch_set_state, overhead_probe, update_stance, StanceEvent, StancePose};
pub use state::{ActorState, ContactReport, LocomotionCommand, SlideState, SpeedModifier, Stance};
pub use step::assist_step;
pub use vertical::integrate_vertical;

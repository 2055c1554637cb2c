//! Collision detection and response for a capsule-shaped actor.
//!
//! # Key Types
//!
//! - [`CollisionBackend`]: The contract locomotion moves through
//! - [`CollisionWorld`]: parry3d-backed level geometry implementing it
//! - [`MoveRequest`] / [`MoveOutcome`]: One move-and-slide call and its result
//! - [`TraceShape`]: Shape used for sweeps and overlap tests
//!
//! # Move and slide
//!
//! A move sweeps the body along its motion, records a [`Contact`] for every
//! surface it hits and clips the remaining motion against it. A hit is a
//! floor if its normal is within the request's slope limit, a ceiling if it
//! faces mostly down, otherwise a wall.

mod backend;
mod flags;
mod slide;
mod trace;
mod world;

pub use backend::{
    CollisionBackend, Contact, MoveOutcome, MoveRequest, OverheadProbe, CEILING_MAX_DOT,
    DEFAULT_MAX_BOUNCES,
};
pub use flags::{ContentFlags, SurfaceFlags};
pub use slide::{clip_velocity, move_and_slide};
pub use trace::{TraceResult, TraceShape};
pub use world::{CollisionBrush, CollisionWorld};

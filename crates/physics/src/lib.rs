//! Stride Physics
//!
//! Collision and locomotion for a single first-person actor.
//!
//! # Architecture
//!
//! The crate is split into two systems:
//!
//! - **Collision**: Sweeps capsules through static brushes and slides along
//!   what they hit
//! - **Movement**: The locomotion state machine, which talks to collision only
//!   through the [`CollisionBackend`] trait
//!
//! # Design Principles
//!
//! 1. **Determinism**: Same inputs always produce same outputs
//! 2. **Explicit state**: Every component reads and writes one [`ActorState`]
//! 3. **Configuration up front**: Bad tuning is rejected when a controller is
//!    built, never per tick

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{
    CollisionBackend, CollisionWorld, ContentFlags, MoveOutcome, MoveRequest, SurfaceFlags,
    TraceResult, TraceShape,
};
pub use movement::{
    ActorState, InputSource, LocomotionCommand, LocomotionConfig, LocomotionController,
    PresentationFrame, PresentationSink, Stance, TickReport,
};

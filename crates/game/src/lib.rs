//! Stride game layer
//!
//! Everything around the locomotion controller:
//!
//! - Device input, mouse capture and mouse look
//! - Follow camera and body visuals
//! - A test level with stairs, a ramp, a low tunnel and a platform
//! - The player rig and the fixed-step simulation loop
//!
//! # Architecture
//!
//! The controller in `stride_physics` never reaches out to these pieces.
//! Input is sampled into it and frames are pushed out of it, once per tick.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Simulation                          │
//! │  ┌────────────┐    ┌──────────────┐    ┌────────────────┐   │
//! │  │ InputState │───►│ Locomotion   │───►│ Presentation   │   │
//! │  │ (+ mouse)  │    │ Controller   │    │ (camera, body) │   │
//! │  └────────────┘    └──────┬───────┘    └────────────────┘   │
//! │                           ▼                                 │
//! │                    CollisionWorld (level)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod camera;
pub mod input;
pub mod level;
pub mod mouse;
pub mod player;
pub mod simulation;

// Re-export main types
pub use camera::{BodyVisual, CameraConfig, FollowCamera, Presentation};
pub use input::{InputConfig, InputState, PlayerInput};
pub use level::{Level, SpawnPoint};
pub use mouse::MouseCapture;
pub use player::Player;
pub use simulation::{Simulation, SimulationConfig, SimulationConfigError};

// Re-export physics types for convenience
pub use stride_physics::{
    ActorState, CollisionWorld, ContentFlags, LocomotionCommand, LocomotionConfig,
    LocomotionController, PresentationFrame, Stance, SurfaceFlags, TickReport,
};

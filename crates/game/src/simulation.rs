//! Fixed-step simulation loop.
//!
//! Wall-clock time is fed in through [`Simulation::advance`] and spent in
//! whole ticks. The simulation is deterministic: the same config, level and
//! input sequence always produce the same actor state.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_physics::movement::{ConfigError, LocomotionController, TickReport};
use stride_physics::LocomotionConfig;
use thiserror::Error;

use crate::camera::{CameraConfig, Presentation};
use crate::input::{InputConfig, InputState, PlayerInput};
use crate::level::Level;
use crate::player::Player;

/// Most wall-clock time a single `advance` call will simulate.
const MAX_FRAME_TIME: f32 = 0.25;

/// Errors from loading a simulation configuration.
#[derive(Debug, Error)]
pub enum SimulationConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid locomotion config: {0}")]
    Locomotion(#[from] ConfigError),

    #[error("tick rate must be at least 1")]
    ZeroTickRate,
}

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Locomotion tuning.
    pub locomotion: LocomotionConfig,

    /// Mouse look settings.
    pub input: InputConfig,

    /// Follow camera settings.
    pub camera: CameraConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            locomotion: LocomotionConfig::default(),
            input: InputConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SimulationConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationConfigError> {
        if self.tick_rate == 0 {
            return Err(SimulationConfigError::ZeroTickRate);
        }
        self.locomotion.validate()?;
        Ok(())
    }
}

/// The simulation: one player moving through one level.
#[derive(Debug)]
pub struct Simulation {
    /// Ticks run so far.
    pub frame: u64,

    config: SimulationConfig,
    level: Level,
    player: Player<InputState, Presentation>,

    /// Wall-clock time not yet spent on ticks.
    accumulator: f32,
    paused: bool,
}

impl Simulation {
    /// Create a simulation with the player at the level's first spawn point.
    pub fn new(config: SimulationConfig, level: Level) -> Result<Self, SimulationConfigError> {
        config.validate()?;
        let controller = LocomotionController::new(config.locomotion.clone())?;

        let (position, facing) = level
            .get_player_spawn(0)
            .map_or((Vec3::ZERO, 0.0), |spawn| (spawn.position, spawn.facing));

        let presentation =
            Presentation::new(config.camera, config.locomotion.standing_height, config.delta_time());
        let mut player = Player::new(
            controller,
            position,
            facing,
            InputState::new(config.input),
            presentation,
        );
        player.respawn(position, facing, &level.collision);

        log::info!(
            "Simulation started in {} at {} Hz",
            level.name,
            config.tick_rate
        );

        Ok(Self {
            frame: 0,
            config,
            level,
            player,
            accumulator: 0.0,
            paused: false,
        })
    }

    /// Create a simulation with default configuration and test arena.
    pub fn test_arena() -> Result<Self, SimulationConfigError> {
        Self::new(SimulationConfig::default(), Level::test_arena())
    }

    /// Move the player to the named spawn point. Returns `false` if the
    /// level has no such spawn.
    pub fn respawn_at(&mut self, name: &str) -> bool {
        let Some(spawn) = self.level.spawn(name) else {
            log::warn!("No spawn point named {name}");
            return false;
        };
        let (position, facing) = (spawn.position, spawn.facing);
        self.player.respawn(position, facing, &self.level.collision);
        true
    }

    /// Set the device state the next tick samples.
    pub fn set_input(&mut self, input: PlayerInput) {
        self.player.input_mut().feed(input);
    }

    /// Run a single tick. Does nothing while paused.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.paused {
            return None;
        }

        let report = self.player.step(&self.level.collision, self.config.delta_time());
        if report.is_some() {
            self.frame += 1;
        }
        report
    }

    /// Spend `elapsed` seconds of wall-clock time on ticks.
    ///
    /// Leftover time carries over to the next call. Returns the number of
    /// ticks run.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if self.paused || !elapsed.is_finite() || elapsed <= 0.0 {
            return 0;
        }

        if elapsed > MAX_FRAME_TIME {
            log::warn!("Frame took {elapsed:.3}s, dropping time beyond {MAX_FRAME_TIME}s");
        }
        self.accumulator = (self.accumulator + elapsed).min(MAX_FRAME_TIME);

        let delta_time = self.config.delta_time();
        let mut ticks = 0;
        while self.accumulator >= delta_time {
            self.tick();
            self.accumulator -= delta_time;
            ticks += 1;
        }
        ticks
    }

    /// Stop advancing. State is kept as is.
    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Simulation paused at frame {}", self.frame);
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Simulation resumed at frame {}", self.frame);
        }
        self.paused = false;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &Player<InputState, Presentation> {
        &self.player
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn forward() -> PlayerInput {
        let mut input = PlayerInput::default();
        input.movement.forward = true;
        input
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::test_arena().unwrap();
        assert_eq!(sim.frame, 0);
        assert!(!sim.is_paused());

        let spawn = sim.level().get_player_spawn(0).unwrap().position;
        assert!((sim.player().position() - spawn).length() < 0.01);
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut sim = Simulation::test_arena().unwrap();

        sim.tick();
        assert_eq!(sim.frame, 1);

        sim.tick();
        assert_eq!(sim.frame, 2);
    }

    #[test]
    fn test_movement_input() {
        let mut sim = Simulation::test_arena().unwrap();
        let start_pos = sim.player().position();

        sim.set_input(forward());
        for _ in 0..60 {
            sim.tick();
        }

        let end_pos = sim.player().position();
        let distance = (end_pos - start_pos).length();
        assert!(distance > 1.0, "Player should have moved, distance={}", distance);
        // Spawn faces +X
        assert!(end_pos.x > start_pos.x);
    }

    #[test]
    fn test_determinism() {
        let inputs: Vec<_> = (0..100)
            .map(|i| {
                let mut input = PlayerInput::default();
                input.movement.forward = i % 2 == 0;
                input.movement.right = i % 3 == 0;
                input.actions.jump = i % 10 == 0;
                input.actions.crouch = i % 25 > 20;
                input
            })
            .collect();

        let run = || {
            let mut sim = Simulation::test_arena().unwrap();
            for input in &inputs {
                sim.set_input(input.clone());
                sim.tick();
            }
            sim.player().state().clone()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_pause_stops_ticking() {
        let mut sim = Simulation::test_arena().unwrap();
        sim.set_input(forward());
        sim.tick();

        sim.pause();
        let before = sim.player().state().clone();
        assert!(sim.tick().is_none());
        assert_eq!(sim.advance(1.0), 0);
        assert_eq!(sim.frame, 1);
        assert_eq!(sim.player().state(), &before);

        sim.resume();
        assert!(sim.tick().is_some());
        assert_eq!(sim.frame, 2);
    }

    #[test]
    fn test_advance_carries_leftover_time() {
        let config = SimulationConfig {
            tick_rate: 20,
            ..Default::default()
        };
        let mut sim = Simulation::new(config, Level::test_arena()).unwrap();

        assert_eq!(sim.advance(0.125), 2);
        assert_eq!(sim.advance(0.03), 1);
        assert_eq!(sim.frame, 3);
    }

    #[test]
    fn test_advance_clamps_long_frames() {
        let mut sim = Simulation::test_arena().unwrap();
        let ticks = sim.advance(10.0);
        assert!((14..=15).contains(&ticks), "ticks={}", ticks);
    }

    #[test]
    fn test_respawn_at_named_point() {
        let mut sim = Simulation::test_arena().unwrap();
        assert!(sim.respawn_at("stairs"));
        assert!((sim.player().position().x - 2.0).abs() < 0.01);
        assert!(!sim.respawn_at("nowhere"));
    }

    #[test]
    fn test_config_from_json() {
        let config = SimulationConfig::from_json(
            r#"{ "tick_rate": 120, "locomotion": { "gravity": 30.0 }, "input": { "invert_y": true } }"#,
        )
        .unwrap();
        assert_eq!(config.tick_rate, 120);
        assert_eq!(config.locomotion.gravity, 30.0);
        assert_eq!(config.locomotion.base_speed, LocomotionConfig::default().base_speed);
        assert!(config.input.invert_y);
        assert!((config.delta_time() - 1.0 / 120.0).abs() < 1e-7);
    }

    #[test]
    fn test_config_errors() {
        assert!(matches!(
            SimulationConfig::from_json("{ not json"),
            Err(SimulationConfigError::Parse(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{ "tick_rate": 0 }"#),
            Err(SimulationConfigError::ZeroTickRate)
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{ "locomotion": { "crouching_height": 5.0 } }"#),
            Err(SimulationConfigError::Locomotion(_))
        ));
    }
}

//! Locomotion configuration constants.
//!
//! All tuning lives here. Values use metric units (meters, seconds, radians)
//! unless noted. Out-of-range combinations are rejected once by
//! [`LocomotionConfig::validate`], never per tick.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the crouch button maps to the crouch request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrouchMode {
    /// Crouch while the button is held.
    #[default]
    Hold,
    /// Each press flips between standing and crouching.
    Toggle,
}

/// Invalid configuration, reported when a controller is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("crouching height {crouching} must be below standing height {standing}")]
    CrouchNotBelowStanding { crouching: f32, standing: f32 },

    #[error("capsule height {height} is shorter than its diameter {diameter}")]
    CapsuleTooShort { height: f32, diameter: f32 },

    #[error("crouching head offset {crouching} is above standing head offset {standing}")]
    HeadOffsetInverted { crouching: f32, standing: f32 },

    #[error("step band is empty: minimum rise {min_rise} must be below step height {step_height}")]
    EmptyStepBand { min_rise: f32, step_height: f32 },

    #[error("{field} must be finite")]
    NotFinite { field: &'static str },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Configuration for the locomotion state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    // ========================================================================
    // Body
    // ========================================================================
    /// Capsule radius (meters).
    pub actor_radius: f32,

    /// Capsule height when standing (meters).
    pub standing_height: f32,

    /// Capsule height when fully crouched (meters).
    pub crouching_height: f32,

    /// Head (camera) height above the feet when standing (meters).
    pub head_offset_standing: f32,

    /// Head (camera) height above the feet when fully crouched (meters).
    pub head_offset_crouching: f32,

    // ========================================================================
    // Horizontal movement
    // ========================================================================
    /// Walking speed (meters/second).
    pub base_speed: f32,

    /// Sprint speed as a multiple of `base_speed`.
    pub sprint_multiplier: f32,

    /// Crouch speed as a multiple of `base_speed`.
    pub crouch_multiplier: f32,

    /// Ground blend strength: `v = lerp(v, target, ground_strength * dt)`.
    pub ground_strength: f32,

    /// Air acceleration (meters/second²) along the wish direction.
    pub air_strength: f32,

    /// Horizontal speed cap while airborne (meters/second).
    pub max_air_speed: f32,

    // ========================================================================
    // Vertical movement
    // ========================================================================
    /// Gravity acceleration (meters/second²).
    pub gravity: f32,

    /// Upward jump impulse (meters/second).
    pub jump_strength: f32,

    /// Jump impulse multiplier while crouching.
    pub crouch_jump_multiplier: f32,

    /// Jump impulse multiplier while sprinting.
    pub sprint_jump_multiplier: f32,

    /// Jump every tick the button is held instead of once per press.
    pub jump_on_hold: bool,

    // ========================================================================
    // Ground contact
    // ========================================================================
    /// Steepest walkable floor (radians from up).
    pub slope_limit: f32,

    /// Baseline snap distance pulling a grounded actor onto the floor.
    pub ground_snap_distance: f32,

    /// Extra snap per meter/second of horizontal speed.
    pub snap_speed_factor: f32,

    /// Snap distance right after a jump.
    pub jump_snap_distance: f32,

    /// Fall speed above which landing forces a stand (meters/second).
    pub hard_landing_speed: f32,

    /// Horizontal velocity kept on landing (0.0-1.0).
    pub landing_damping: f32,

    /// Keep downward motion from sliding the actor down walkable slopes.
    pub stop_on_slope: bool,

    // ========================================================================
    // Stance
    // ========================================================================
    /// Hold or toggle crouching.
    pub crouch_mode: CrouchMode,

    /// Body height change rate (meters/second).
    pub crouch_transition_speed: f32,

    /// Stance lock after a hard landing forces a stand (seconds).
    pub hard_landing_cooldown: f32,

    /// How far above standing height the overhead probe reaches (meters).
    pub overhead_probe_margin: f32,

    // ========================================================================
    // Slide
    // ========================================================================
    /// Slide entry speed as a multiple of sprint speed.
    pub slide_boost: f32,

    /// Time before another slide may start (seconds).
    pub slide_cooldown: f32,

    /// Continuous sprint needed before a slide may start (seconds).
    pub slide_min_sprint_time: f32,

    /// Decay reduction per unit of downhill slope (meters/second²).
    pub slide_slope_gain: f32,

    /// Slide speed cap (meters/second).
    pub slide_max_speed: f32,

    /// Steepest floor a slide may start on or continue over (radians).
    pub slide_max_slope: f32,

    /// Let a slide continue while airborne.
    pub slide_persists_airborne: bool,

    // ========================================================================
    // Step-up
    // ========================================================================
    /// Highest obstacle treated as a step (meters above the feet).
    pub step_height: f32,

    /// Lowest contact treated as a step (meters above the feet).
    pub step_min_rise: f32,

    /// How hard the actor must push into a step, as `-(velocity · normal)`.
    pub step_approach_threshold: f32,

    /// Upward nudge applied on a detected step (meters/second).
    pub step_nudge: f32,

    /// Snap distance on the tick after a step nudge.
    pub step_snap_distance: f32,

    // ========================================================================
    // Simulation
    // ========================================================================
    /// Longest time step a single tick integrates (seconds).
    pub max_tick_delta: f32,

    /// Slide iterations per move.
    pub max_bounces: u32,

    /// View pitch limit (radians, both directions).
    pub max_pitch: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            // Body
            actor_radius: 0.4,
            standing_height: 1.8,
            crouching_height: 1.0,
            head_offset_standing: 1.6,
            head_offset_crouching: 0.8,

            // Horizontal
            base_speed: 3.0,
            sprint_multiplier: 2.5,
            crouch_multiplier: 0.55,
            ground_strength: 10.0,
            air_strength: 12.0,
            max_air_speed: 7.5,   // sprint speed

            // Vertical
            gravity: 42.0,        // heavy, snappy arcs
            jump_strength: 12.0,  // ~1.7m apex
            crouch_jump_multiplier: 1.0,
            sprint_jump_multiplier: 1.0,
            jump_on_hold: false,

            // Ground contact
            slope_limit: 0.7,     // ~40 degrees
            ground_snap_distance: 5.0,
            snap_speed_factor: 0.0,
            jump_snap_distance: 1.0,
            hard_landing_speed: 17.0,
            landing_damping: 0.5,
            stop_on_slope: false,

            // Stance
            crouch_mode: CrouchMode::Hold,
            crouch_transition_speed: 6.0,
            hard_landing_cooldown: 0.5,
            overhead_probe_margin: 0.1,

            // Slide
            slide_boost: 2.0,
            slide_cooldown: 1.0,
            slide_min_sprint_time: 0.0,
            slide_slope_gain: 20.0,
            slide_max_speed: 20.0,
            slide_max_slope: 0.7,
            slide_persists_airborne: true,

            // Step-up
            step_height: 0.35,
            step_min_rise: 0.02,
            step_approach_threshold: 1.0,
            step_nudge: 6.0,
            step_snap_distance: 1.0,

            // Simulation
            max_tick_delta: 0.1,
            max_bounces: 4,
            max_pitch: 70f32.to_radians(),
        }
    }
}

impl LocomotionConfig {
    /// Fast, floaty movement with strong air control.
    pub fn arcade() -> Self {
        Self {
            base_speed: 4.0,
            sprint_multiplier: 2.0,
            gravity: 30.0,
            jump_strength: 11.0,
            air_strength: 20.0,
            max_air_speed: 9.0,
            crouch_mode: CrouchMode::Toggle,
            slide_cooldown: 0.5,
            ..Default::default()
        }
    }

    /// Slower movement, weak air control and reduced jumps from crouch/sprint.
    pub fn tactical() -> Self {
        Self {
            base_speed: 2.5,
            sprint_multiplier: 2.0,
            crouch_multiplier: 0.45,
            air_strength: 6.0,
            max_air_speed: 5.0,
            crouch_jump_multiplier: 0.8,
            sprint_jump_multiplier: 0.9,
            hard_landing_speed: 14.0,
            hard_landing_cooldown: 0.8,
            slide_min_sprint_time: 0.4,
            slide_cooldown: 1.5,
            ..Default::default()
        }
    }

    /// Sprinting target speed.
    #[inline]
    pub fn sprint_speed(&self) -> f32 {
        self.base_speed * self.sprint_multiplier
    }

    /// Crouching target speed.
    #[inline]
    pub fn crouch_speed(&self) -> f32 {
        self.base_speed * self.crouch_multiplier
    }

    /// Speed a slide starts at.
    #[inline]
    pub fn slide_entry_speed(&self) -> f32 {
        self.sprint_speed() * self.slide_boost
    }

    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("actor_radius", self.actor_radius),
            ("standing_height", self.standing_height),
            ("crouching_height", self.crouching_height),
            ("head_offset_standing", self.head_offset_standing),
            ("head_offset_crouching", self.head_offset_crouching),
            ("base_speed", self.base_speed),
            ("sprint_multiplier", self.sprint_multiplier),
            ("crouch_multiplier", self.crouch_multiplier),
            ("ground_strength", self.ground_strength),
            ("air_strength", self.air_strength),
            ("max_air_speed", self.max_air_speed),
            ("gravity", self.gravity),
            ("jump_strength", self.jump_strength),
            ("crouch_jump_multiplier", self.crouch_jump_multiplier),
            ("sprint_jump_multiplier", self.sprint_jump_multiplier),
            ("slope_limit", self.slope_limit),
            ("ground_snap_distance", self.ground_snap_distance),
            ("snap_speed_factor", self.snap_speed_factor),
            ("jump_snap_distance", self.jump_snap_distance),
            ("hard_landing_speed", self.hard_landing_speed),
            ("landing_damping", self.landing_damping),
            ("crouch_transition_speed", self.crouch_transition_speed),
            ("hard_landing_cooldown", self.hard_landing_cooldown),
            ("overhead_probe_margin", self.overhead_probe_margin),
            ("slide_boost", self.slide_boost),
            ("slide_cooldown", self.slide_cooldown),
            ("slide_min_sprint_time", self.slide_min_sprint_time),
            ("slide_slope_gain", self.slide_slope_gain),
            ("slide_max_speed", self.slide_max_speed),
            ("slide_max_slope", self.slide_max_slope),
            ("step_height", self.step_height),
            ("step_min_rise", self.step_min_rise),
            ("step_approach_threshold", self.step_approach_threshold),
            ("step_nudge", self.step_nudge),
            ("step_snap_distance", self.step_snap_distance),
            ("max_tick_delta", self.max_tick_delta),
            ("max_pitch", self.max_pitch),
        ];
        if let Some(&(field, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite { field });
        }

        let positive = [
            ("actor_radius", self.actor_radius),
            ("crouching_height", self.crouching_height),
            ("base_speed", self.base_speed),
            ("ground_strength", self.ground_strength),
            ("air_strength", self.air_strength),
            ("max_air_speed", self.max_air_speed),
            ("gravity", self.gravity),
            ("jump_strength", self.jump_strength),
            ("ground_snap_distance", self.ground_snap_distance),
            ("jump_snap_distance", self.jump_snap_distance),
            ("crouch_transition_speed", self.crouch_transition_speed),
            ("slide_max_speed", self.slide_max_speed),
            ("step_height", self.step_height),
            ("step_snap_distance", self.step_snap_distance),
            ("max_tick_delta", self.max_tick_delta),
            ("max_bounces", self.max_bounces as f32),
        ];
        if let Some(&(field, value)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(ConfigError::NotPositive { field, value });
        }

        if self.crouching_height >= self.standing_height {
            return Err(ConfigError::CrouchNotBelowStanding {
                crouching: self.crouching_height,
                standing: self.standing_height,
            });
        }
        let diameter = self.actor_radius * 2.0;
        if self.crouching_height < diameter {
            return Err(ConfigError::CapsuleTooShort {
                height: self.crouching_height,
                diameter,
            });
        }
        if self.head_offset_crouching > self.head_offset_standing {
            return Err(ConfigError::HeadOffsetInverted {
                crouching: self.head_offset_crouching,
                standing: self.head_offset_standing,
            });
        }
        if self.step_min_rise >= self.step_height {
            return Err(ConfigError::EmptyStepBand {
                min_rise: self.step_min_rise,
                step_height: self.step_height,
            });
        }

        let half_pi = std::f32::consts::FRAC_PI_2;
        let ranges = [
            ("slope_limit", self.slope_limit, 0.0, half_pi),
            ("slide_max_slope", self.slide_max_slope, 0.0, half_pi),
            ("max_pitch", self.max_pitch, 0.0, half_pi),
            ("landing_damping", self.landing_damping, 0.0, 1.0),
            ("sprint_multiplier", self.sprint_multiplier, 0.0, f32::MAX),
            ("crouch_multiplier", self.crouch_multiplier, 0.0, f32::MAX),
            ("crouch_jump_multiplier", self.crouch_jump_multiplier, 0.0, f32::MAX),
            ("sprint_jump_multiplier", self.sprint_jump_multiplier, 0.0, f32::MAX),
            ("snap_speed_factor", self.snap_speed_factor, 0.0, f32::MAX),
            ("hard_landing_speed", self.hard_landing_speed, 0.0, f32::MAX),
            ("hard_landing_cooldown", self.hard_landing_cooldown, 0.0, f32::MAX),
            ("overhead_probe_margin", self.overhead_probe_margin, 0.0, f32::MAX),
            ("slide_boost", self.slide_boost, 0.0, f32::MAX),
            ("slide_cooldown", self.slide_cooldown, 0.0, f32::MAX),
            ("slide_min_sprint_time", self.slide_min_sprint_time, 0.0, f32::MAX),
            ("slide_slope_gain", self.slide_slope_gain, 0.0, f32::MAX),
            ("step_min_rise", self.step_min_rise, 0.0, f32::MAX),
            ("step_approach_threshold", self.step_approach_threshold, 0.0, f32::MAX),
            ("step_nudge", self.step_nudge, 0.0, f32::MAX),
        ];
        if let Some(&(field, value, min, max)) = ranges
            .iter()
            .find(|(_, value, min, max)| *value < *min || *value > *max)
        {
            return Err(ConfigError::OutOfRange { field, value, min, max });
        }

        Ok(())
    }
}

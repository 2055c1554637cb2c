//! Follow camera and body visuals.
//!
//! Both consume [`PresentationFrame`]s and never feed anything back into the
//! controller. [`Presentation`] bundles them behind the
//! [`PresentationSink`] contract.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use stride_physics::movement::{PresentationFrame, PresentationSink, Stance};

/// Camera settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical catch-up rate (1/seconds).
    pub follow_rate: f32,

    /// Field of view in degrees.
    pub fov: f32,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_rate: 10.0,
            fov: 90.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

/// First-person camera that trails the head vertically.
///
/// Horizontal placement and view angles follow the actor exactly; height
/// eases toward the eye so steps and crouches do not jerk the view. On a
/// moving platform the camera snaps instead.
#[derive(Debug, Clone)]
pub struct FollowCamera {
    pub config: CameraConfig,

    /// Eye position in world space.
    pub position: Vec3,

    pub pitch: f32,
    pub yaw: f32,

    placed: bool,
}

impl FollowCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            position: Vec3::ZERO,
            pitch: 0.0,
            yaw: 0.0,
            placed: false,
        }
    }

    /// Move toward the eye position of `frame`.
    pub fn update(&mut self, frame: &PresentationFrame, delta_time: f32) {
        let target = frame.eye_position();
        self.pitch = frame.pitch;
        self.yaw = frame.yaw;

        if !self.placed || frame.on_platform {
            self.position = target;
            self.placed = true;
            return;
        }

        let weight = (self.config.follow_rate * delta_time).clamp(0.0, 1.0);
        self.position.x = target.x;
        self.position.z = target.z;
        self.position.y += (target.y - self.position.y) * weight;
    }

    /// Direction the camera looks in.
    pub fn forward(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
    }

    /// Get the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    /// Get the projection matrix for rendering.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fov.to_radians(),
            self.config.aspect,
            self.config.near,
            self.config.far,
        )
    }
}

/// Collider and mesh dimensions for the current body height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyVisual {
    /// Height the mesh is modelled at.
    pub standing_height: f32,

    pub collider_height: f32,

    /// Collider center relative to the feet.
    pub collider_offset: Vec3,

    /// Vertical scale applied to the mesh.
    pub mesh_scale: f32,

    /// Mesh origin relative to the feet.
    pub mesh_offset: Vec3,

    pub stance: Stance,
}

impl BodyVisual {
    pub fn new(standing_height: f32) -> Self {
        Self {
            standing_height,
            collider_height: standing_height,
            collider_offset: Vec3::Y * (standing_height * 0.5),
            mesh_scale: 1.0,
            mesh_offset: Vec3::Y * (standing_height * 0.5),
            stance: Stance::Standing,
        }
    }

    /// Adopt the dimensions published in `frame`.
    pub fn apply(&mut self, frame: &PresentationFrame) {
        self.collider_height = frame.body_height;
        self.collider_offset = frame.collider_offset;
        self.mesh_scale = if self.standing_height > 0.0 {
            frame.body_height / self.standing_height
        } else {
            1.0
        };
        self.mesh_offset = frame.collider_offset;
        self.stance = frame.stance;
    }
}

/// Camera plus body visuals, fed once per tick.
#[derive(Debug, Clone)]
pub struct Presentation {
    pub camera: FollowCamera,
    pub body: BodyVisual,

    /// Step the camera eases over per published frame (seconds).
    pub tick_delta: f32,

    /// Last frame received.
    pub last_frame: Option<PresentationFrame>,

    pub frames_published: u64,
}

impl Presentation {
    pub fn new(config: CameraConfig, standing_height: f32, tick_delta: f32) -> Self {
        Self {
            camera: FollowCamera::new(config),
            body: BodyVisual::new(standing_height),
            tick_delta,
            last_frame: None,
            frames_published: 0,
        }
    }
}

impl PresentationSink for Presentation {
    fn publish(&mut self, frame: &PresentationFrame) {
        self.camera.update(frame, self.tick_delta);
        self.body.apply(frame);
        self.last_frame = Some(*frame);
        self.frames_published += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn frame_at(position: Vec3, head: f32) -> PresentationFrame {
        PresentationFrame {
            position,
            velocity: Vec3::ZERO,
            body_height: 1.8,
            head_offset: Vec3::Y * head,
            collider_offset: Vec3::Y * 0.9,
            yaw: 0.0,
            pitch: 0.0,
            grounded: true,
            stance: Stance::Standing,
            sliding: false,
            on_platform: false,
        }
    }

    #[test]
    fn test_first_frame_snaps() {
        let mut camera = FollowCamera::new(CameraConfig::default());
        camera.update(&frame_at(Vec3::new(1.0, 2.0, 3.0), 1.6), DT);
        assert!((camera.position - Vec3::new(1.0, 3.6, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_height_eases_horizontal_follows() {
        let mut camera = FollowCamera::new(CameraConfig::default());
        camera.update(&frame_at(Vec3::ZERO, 1.6), DT);

        // Step up 0.3 and move sideways
        camera.update(&frame_at(Vec3::new(0.5, 0.3, 0.0), 1.6), DT);
        assert_eq!(camera.position.x, 0.5);
        let expected = 1.6 + 0.3 * (10.0 * DT);
        assert!((camera.position.y - expected).abs() < 1e-5);

        for _ in 0..120 {
            camera.update(&frame_at(Vec3::new(0.5, 0.3, 0.0), 1.6), DT);
        }
        assert!((camera.position.y - 1.9).abs() < 1e-3);
    }

    #[test]
    fn test_platform_snaps() {
        let mut camera = FollowCamera::new(CameraConfig::default());
        camera.update(&frame_at(Vec3::ZERO, 1.6), DT);

        let mut frame = frame_at(Vec3::new(0.0, 1.0, 0.0), 1.6);
        frame.on_platform = true;
        camera.update(&frame, DT);
        assert!((camera.position.y - 2.6).abs() < 1e-5);
    }

    #[test]
    fn test_view_matrix_looks_forward() {
        let mut camera = FollowCamera::new(CameraConfig::default());
        camera.update(&frame_at(Vec3::ZERO, 1.6), DT);

        // A point ahead (+X at yaw 0) ends up in front of the camera (-Z in view space)
        let ahead = camera.view_matrix().transform_point3(Vec3::new(5.0, 1.6, 0.0));
        assert!(ahead.z < 0.0);
        assert!(ahead.x.abs() < 1e-4);
    }

    #[test]
    fn test_body_visual_tracks_height() {
        let mut body = BodyVisual::new(1.8);
        let mut frame = frame_at(Vec3::ZERO, 0.8);
        frame.body_height = 0.9;
        frame.collider_offset = Vec3::Y * 0.45;
        frame.stance = Stance::Crouching;

        body.apply(&frame);
        assert_eq!(body.collider_height, 0.9);
        assert!((body.mesh_scale - 0.5).abs() < 1e-6);
        assert_eq!(body.stance, Stance::Crouching);
    }

    #[test]
    fn test_presentation_is_a_sink() {
        let mut presentation = Presentation::new(CameraConfig::default(), 1.8, DT);
        presentation.publish(&frame_at(Vec3::new(0.0, 0.0, 0.0), 1.6));
        presentation.publish(&frame_at(Vec3::new(1.0, 0.0, 0.0), 1.6));

        assert_eq!(presentation.frames_published, 2);
        assert_eq!(presentation.last_frame.map(|f| f.position.x), Some(1.0));
        assert_eq!(presentation.camera.position.x, 1.0);
    }
}

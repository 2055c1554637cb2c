//! Level geometry and spawn points.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use stride_physics::{CollisionWorld, ContentFlags, SurfaceFlags};

/// A level containing collision geometry and spawn points.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world the actor moves through.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,
}

/// A named place to put the actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub name: String,

    /// Feet position in world space.
    pub position: Vec3,

    /// Initial facing direction (yaw in radians).
    pub facing: f32,
}

impl SpawnPoint {
    pub fn new(name: &str, position: Vec3, facing: f32) -> Self {
        Self {
            name: name.to_string(),
            position,
            facing,
        }
    }
}

// Test arena layout. Yaw 0 faces +X.
const ARENA_SIZE: f32 = 50.0;
const WALL_HEIGHT: f32 = 5.0;
const WALL_THICKNESS: f32 = 0.5;

const STAIR_COUNT: usize = 4;
const STAIR_RISE: f32 = 0.2;
const STAIR_RUN: f32 = 0.6;
const STAIR_START_X: f32 = 5.0;
const STAIR_END_X: f32 = 20.0;
const STAIR_Z: f32 = 10.0;

const RAMP_ANGLE_DEGREES: f32 = 15.0;

/// Height of the tunnel ceiling's underside.
pub const TUNNEL_CLEARANCE: f32 = 1.4;
const TUNNEL_Z: f32 = -25.0;

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
        }
    }

    /// Create the locomotion test arena.
    ///
    /// A walled floor with a flight of stairs, a shallow ramp, a tunnel too
    /// low to stand in and a slab tagged as a moving platform. Each feature
    /// has a spawn point in front of it.
    pub fn test_arena() -> Self {
        let mut level = Self::new("test_arena", "Test Arena");

        // Floor
        level.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(ARENA_SIZE, 0.5, ARENA_SIZE),
            ContentFlags::SOLID,
        );

        // Walls
        for (center, half) in [
            (Vec3::new(0.0, 0.0, -ARENA_SIZE), Vec3::new(ARENA_SIZE, 0.0, WALL_THICKNESS)),
            (Vec3::new(0.0, 0.0, ARENA_SIZE), Vec3::new(ARENA_SIZE, 0.0, WALL_THICKNESS)),
            (Vec3::new(ARENA_SIZE, 0.0, 0.0), Vec3::new(WALL_THICKNESS, 0.0, ARENA_SIZE)),
            (Vec3::new(-ARENA_SIZE, 0.0, 0.0), Vec3::new(WALL_THICKNESS, 0.0, ARENA_SIZE)),
        ] {
            level.collision.add_box(
                center + Vec3::Y * (WALL_HEIGHT / 2.0),
                half + Vec3::Y * (WALL_HEIGHT / 2.0),
                ContentFlags::SOLID,
            );
        }

        // Stairs climbing toward +X, every step runs to the far end
        for i in 0..STAIR_COUNT {
            let start = STAIR_START_X + STAIR_RUN * i as f32;
            let top = STAIR_RISE * (i + 1) as f32;
            level.collision.add_box(
                Vec3::new((start + STAIR_END_X) / 2.0, top / 2.0, STAIR_Z),
                Vec3::new((STAIR_END_X - start) / 2.0, top / 2.0, 2.0),
                ContentFlags::SOLID,
            );
        }

        // Ramp rising toward +X, its low end buried in the floor
        level.collision.add_oriented_box(
            Vec3::new(10.0, 0.0, -10.0),
            Vec3::new(6.0, 0.5, 2.0),
            Quat::from_rotation_z(RAMP_ANGLE_DEGREES.to_radians()),
            ContentFlags::SOLID,
        );

        // Low tunnel along +X
        level.collision.add_box(
            Vec3::new(-5.0, TUNNEL_CLEARANCE + 0.25, TUNNEL_Z),
            Vec3::new(5.0, 0.25, 2.0),
            ContentFlags::SOLID,
        );
        for side in [-2.2, 2.2] {
            level.collision.add_box(
                Vec3::new(-5.0, 0.7, TUNNEL_Z + side),
                Vec3::new(5.0, 0.7, 0.2),
                ContentFlags::SOLID,
            );
        }

        // Platform slab
        let platform = level.collision.add_box(
            Vec3::new(-10.0, 0.25, 10.0),
            Vec3::new(2.0, 0.25, 2.0),
            ContentFlags::SOLID,
        );
        level.collision.set_surface(platform, SurfaceFlags::PLATFORM);

        level.spawn_points.extend([
            SpawnPoint::new("start", Vec3::new(-20.0, 0.0, 0.0), 0.0),
            SpawnPoint::new("stairs", Vec3::new(2.0, 0.0, STAIR_Z), 0.0),
            SpawnPoint::new("ramp", Vec3::new(4.0, 0.0, -10.0), 0.0),
            SpawnPoint::new("tunnel", Vec3::new(-12.0, 0.0, TUNNEL_Z), 0.0),
            SpawnPoint::new("platform", Vec3::new(-10.0, 1.0, 10.0), 0.0),
        ]);

        log::debug!(
            "Built {} with {} brushes and {} spawn points",
            level.id,
            level.collision.brush_count(),
            level.spawn_points.len()
        );

        level
    }

    /// Find a spawn point by name.
    pub fn spawn(&self, name: &str) -> Option<&SpawnPoint> {
        self.spawn_points.iter().find(|s| s.name == name)
    }

    /// Get a player spawn point.
    pub fn get_player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    /// Get the number of player spawn points.
    pub fn player_spawn_count(&self) -> usize {
        self.spawn_points.len()
    }
}

//! Collision world containing the static level geometry.
//!
//! Brushes are convex parry3d shapes. Queries are brute force over every
//! brush, which is plenty for hand-built test levels.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{cast_shapes, contact, ShapeCastOptions};
use parry3d::shape::SharedShape;

use super::backend::{CollisionBackend, MoveOutcome, MoveRequest, OverheadProbe};
use super::flags::{ContentFlags, SurfaceFlags};
use super::slide::move_and_slide;
use super::trace::{TraceResult, TraceShape};

/// Gap kept between a shape and the surfaces it rests against.
const PENETRATION_SKIN: f32 = 0.001;

/// Overlap depth below which a shape only counts as touching.
const CONTACT_EPSILON: f32 = 1e-4;

/// Minimum approach speed (relative to sweep length) for a hit to block.
const APPROACH_EPSILON: f32 = 1e-4;

/// A piece of collision geometry in the world.
#[derive(Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: u32,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags used for query filtering.
    pub contents: ContentFlags,
    /// Surface flags reported with every contact.
    pub surface: SurfaceFlags,
}

impl std::fmt::Debug for CollisionBrush {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionBrush")
            .field("id", &self.id)
            .field("contents", &self.contents)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}

/// Where a sweep first touched a brush.
#[derive(Debug, Clone, Copy)]
struct Impact {
    normal: Vec3,
    point: Vec3,
    surface: SurfaceFlags,
}

/// The collision world containing all level geometry.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis-aligned box.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> u32 {
        self.add_oriented_box(center, half_extents, Quat::IDENTITY, contents)
    }

    /// Add a rotated box, e.g. a ramp.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        contents: ContentFlags,
    ) -> u32 {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let (axis, angle) = rotation.normalize().to_axis_angle();
        let scaled_axis = axis * angle;
        let transform = Isometry::new(
            Vector::new(center.x, center.y, center.z),
            Vector::new(scaled_axis.x, scaled_axis.y, scaled_axis.z),
        );
        self.push_brush(shape, transform, contents)
    }

    /// Add a convex hull around `points`.
    ///
    /// Returns `None` if the points are degenerate (e.g. all coplanar).
    pub fn add_convex_hull(&mut self, points: &[Vec3], contents: ContentFlags) -> Option<u32> {
        let parry_points: Vec<Point<Real>> =
            points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();
        let shape = SharedShape::convex_hull(&parry_points)?;
        Some(self.push_brush(shape, Isometry::identity(), contents))
    }

    /// Set the surface flags of a brush. Returns `false` for an unknown id.
    pub fn set_surface(&mut self, id: u32, surface: SurfaceFlags) -> bool {
        match self.brushes.iter_mut().find(|b| b.id == id) {
            Some(brush) => {
                brush.surface = surface;
                true
            }
            None => false,
        }
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Sweep a shape from `start` to `end`.
    ///
    /// Every brush is shape-cast along the whole sweep and the earliest
    /// impact wins, so thin geometry cannot be skipped. The shape stops
    /// `PENETRATION_SKIN` short of the impact. Brushes the shape already
    /// touches only block motion that heads into them.
    pub fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape, mask: ContentFlags) -> TraceResult {
        let delta = end - start;
        let distance = delta.length();
        let started_in_solid = self.point_in_solid(start, shape, mask);

        if distance < 1e-5 {
            return TraceResult {
                all_solid: started_in_solid,
                started_in_solid,
                fraction: if started_in_solid { 0.0 } else { 1.0 },
                ..TraceResult::no_hit(start)
            };
        }

        let test_shape = create_parry_shape(shape);
        let test_transform = shape_transform(start, shape);
        let velocity = Vector::new(delta.x, delta.y, delta.z);

        let mut earliest: Option<(f32, Impact)> = None;
        for brush in self.brushes.iter().filter(|b| mask.intersects(b.contents)) {
            let options = ShapeCastOptions {
                max_time_of_impact: 1.0,
                stop_at_penetration: false,
                compute_impact_geometry_on_penetration: true,
                ..Default::default()
            };
            let Ok(Some(hit)) = cast_shapes(
                &test_transform,
                &velocity,
                test_shape.as_ref(),
                &brush.transform,
                &Vector::zeros(),
                brush.shape.as_ref(),
                options,
            ) else {
                continue;
            };

            let n = brush.transform.rotation * hit.normal2.into_inner();
            let normal = Vec3::new(n.x, n.y, n.z);
            // Grazing or separating motion is not blocked.
            if normal.dot(delta) > -APPROACH_EPSILON * distance {
                continue;
            }

            if earliest.as_ref().map_or(true, |(toi, _)| hit.time_of_impact < *toi) {
                let p = brush.transform * hit.witness2;
                earliest = Some((
                    hit.time_of_impact,
                    Impact {
                        normal,
                        point: Vec3::new(p.x, p.y, p.z),
                        surface: brush.surface,
                    },
                ));
            }
        }

        let Some((time_of_impact, impact)) = earliest else {
            return TraceResult {
                started_in_solid,
                ..TraceResult::no_hit(end)
            };
        };

        let fraction = (time_of_impact - PENETRATION_SKIN / distance).clamp(0.0, 1.0);
        TraceResult {
            fraction,
            end_position: start + delta * fraction,
            hit_normal: Some(impact.normal),
            hit_point: Some(impact.point),
            hit_surface: impact.surface,
            started_in_solid,
            all_solid: started_in_solid && fraction == 0.0,
        }
    }

    /// Check if a shape at `position` overlaps solid geometry.
    ///
    /// Touching a surface, or sinking into it by less than
    /// `CONTACT_EPSILON`, does not count.
    pub fn point_in_solid(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> bool {
        let test_shape = create_parry_shape(shape);
        let test_transform = shape_transform(position, shape);

        self.brushes
            .iter()
            .filter(|brush| mask.intersects(brush.contents))
            .any(|brush| {
                matches!(
                    contact(
                        &test_transform,
                        test_shape.as_ref(),
                        &brush.transform,
                        brush.shape.as_ref(),
                        0.0,
                    ),
                    Ok(Some(hit)) if hit.dist < -CONTACT_EPSILON
                )
            })
    }

    /// Push a shape out of any solid geometry it overlaps or touches.
    ///
    /// Surfaces closer than `PENETRATION_SKIN` are pushed back to exactly
    /// that gap. Returns the corrected position.
    pub fn resolve_penetration(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> Vec3 {
        let test_shape = create_parry_shape(shape);
        let mut corrected = position;

        // A push out of one brush can land in another, so settle a few times.
        for _ in 0..4 {
            let test_transform = shape_transform(corrected, shape);
            let mut correction = Vec3::ZERO;

            for brush in self.brushes.iter().filter(|b| mask.intersects(b.contents)) {
                if let Ok(Some(hit)) = contact(
                    &test_transform,
                    test_shape.as_ref(),
                    &brush.transform,
                    brush.shape.as_ref(),
                    PENETRATION_SKIN,
                ) {
                    let gap = PENETRATION_SKIN - hit.dist;
                    if gap > 0.0 {
                        let normal = Vec3::new(hit.normal2.x, hit.normal2.y, hit.normal2.z);
                        correction += normal * gap;
                    }
                }
            }

            if correction.length_squared() < 1e-12 {
                break;
            }
            corrected += correction;
        }

        corrected
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push_brush(&mut self, shape: SharedShape, transform: Isometry<Real>, contents: ContentFlags) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            contents,
            surface: SurfaceFlags::NONE,
        });
        id
    }
}

impl CollisionBackend for CollisionWorld {
    fn move_and_slide(&self, request: &MoveRequest) -> MoveOutcome {
        move_and_slide(self, request, ContentFlags::MASK_ACTOR_SOLID)
    }

    fn overhead_blocked(&self, probe: &OverheadProbe) -> bool {
        let (shape, origin) = probe.shape_and_origin();
        self.point_in_solid(origin, shape, ContentFlags::MASK_ACTOR_SOLID)
    }
}

/// Create a parry3d shape for a trace shape.
fn create_parry_shape(shape: TraceShape) -> SharedShape {
    match shape {
        TraceShape::Capsule { radius, height } => {
            // Parry capsules are defined by the half-height of the cylinder part
            let cylinder_half_height = (height - 2.0 * radius).max(0.0) / 2.0;
            SharedShape::capsule_y(cylinder_half_height, radius)
        }
        TraceShape::Sphere { radius } => SharedShape::ball(radius),
    }
}

/// Transform placing a shape's bottom-center at `position`.
fn shape_transform(position: Vec3, shape: TraceShape) -> Isometry<Real> {
    let offset_y = shape.height() / 2.0;
    Isometry::translation(position.x, position.y + offset_y, position.z)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor at y=0
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );

        // Wall whose near face is at x=9.5
        world.add_box(
            Vec3::new(10.0, 2.5, 0.0),
            Vec3::new(0.5, 2.5, 10.0),
            ContentFlags::SOLID,
        );

        world
    }

    fn actor() -> TraceShape {
        TraceShape::capsule(0.4, 1.8)
    }

    #[test]
    fn test_trace_capsule_stops_at_wall() {
        let world = create_test_world();

        let result = world.trace(
            Vec3::new(0.0, 0.1, 0.0),
            Vec3::new(9.8, 0.1, 0.0),
            actor(),
            ContentFlags::MASK_ACTOR_SOLID,
        );

        assert!(result.hit_something());
        // Capsule surface stops at the wall face
        assert!((result.end_position.x - 9.1).abs() < 0.05, "x={}", result.end_position.x);

        let normal = result.hit_normal.unwrap();
        assert!(normal.x < -0.9, "wall normal should face -X, got {:?}", normal);

        let point = result.hit_point.unwrap();
        assert!((point.x - 9.5).abs() < 0.05, "contact on wall face, got {:?}", point);
    }

    #[test]
    fn test_trace_down_reports_floor() {
        let world = create_test_world();

        let result = world.trace(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            actor(),
            ContentFlags::MASK_ACTOR_SOLID,
        );

        assert!(result.hit_something());
        assert!(result.end_position.y >= 0.0 && result.end_position.y < 0.01);
        assert!(result.hit_normal.unwrap().y > 0.99);
    }

    #[test]
    fn test_point_in_solid() {
        let world = create_test_world();
        let probe = TraceShape::Sphere { radius: 0.1 };

        assert!(world.point_in_solid(Vec3::new(0.0, -0.3, 0.0), probe, ContentFlags::SOLID));
        assert!(!world.point_in_solid(Vec3::new(0.0, 1.0, 0.0), probe, ContentFlags::SOLID));
    }

    #[test]
    fn test_touching_is_not_solid() {
        let world = create_test_world();

        assert!(!world.point_in_solid(Vec3::ZERO, actor(), ContentFlags::MASK_ACTOR_SOLID));
        assert!(world.point_in_solid(Vec3::new(0.0, -0.01, 0.0), actor(), ContentFlags::MASK_ACTOR_SOLID));
    }

    #[test]
    fn test_trace_along_floor_from_rest() {
        let world = create_test_world();

        let result = world.trace(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            actor(),
            ContentFlags::MASK_ACTOR_SOLID,
        );

        assert!(!result.hit_something(), "{:?}", result);
        assert!(!result.started_in_solid);
        assert!((result.end_position.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_trace_into_floor_from_rest_stops_in_place() {
        let world = create_test_world();

        let result = world.trace(
            Vec3::new(0.0, PENETRATION_SKIN, 0.0),
            Vec3::new(0.1, -5.0, 0.0),
            actor(),
            ContentFlags::MASK_ACTOR_SOLID,
        );

        assert!(result.hit_something());
        assert!(!result.all_solid);
        assert!(result.end_position.y >= 0.0 && result.end_position.y < 0.002);
        assert!(result.hit_normal.unwrap().y > 0.99);
    }

    #[test]
    fn test_long_sweep_stops_on_thin_floor() {
        let mut world = CollisionWorld::new();
        // 1m thick floor, much thinner than the sweep
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(5.0, 0.5, 5.0),
            ContentFlags::SOLID,
        );

        let result = world.trace(
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(0.0, -3.5, 0.0),
            actor(),
            ContentFlags::MASK_ACTOR_SOLID,
        );

        assert!(result.hit_something());
        assert!(result.end_position.y >= 0.0 && result.end_position.y < 0.01, "{:?}", result);
        assert!(result.hit_normal.unwrap().y > 0.99);
    }

    #[test]
    fn test_resolve_penetration_separates_touching_body() {
        let world = create_test_world();

        let resolved = world.resolve_penetration(Vec3::ZERO, actor(), ContentFlags::MASK_ACTOR_SOLID);
        assert!((resolved.y - PENETRATION_SKIN).abs() < 1e-4, "{:?}", resolved);

        // Already clear of everything: untouched
        let clear = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(world.resolve_penetration(clear, actor(), ContentFlags::MASK_ACTOR_SOLID), clear);
    }

    #[test]
    fn test_resolve_penetration_pushes_up_out_of_floor() {
        let world = create_test_world();

        let resolved = world.resolve_penetration(
            Vec3::new(0.0, -0.2, 0.0),
            actor(),
            ContentFlags::MASK_ACTOR_SOLID,
        );

        assert!(resolved.y >= 0.0, "should be pushed above the floor, got {:?}", resolved);
        assert!(resolved.x.abs() < 1e-3);
        assert!(!world.point_in_solid(resolved, actor(), ContentFlags::MASK_ACTOR_SOLID));
    }

    #[test]
    fn test_content_mask_filtering() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(3.0, 1.0, 0.0),
            Vec3::new(0.5, 1.0, 5.0),
            ContentFlags::TRIGGER,
        );

        assert!(!world.point_in_solid(
            Vec3::new(3.0, 0.5, 0.0),
            actor(),
            ContentFlags::MASK_ACTOR_SOLID,
        ));
        assert!(world.point_in_solid(Vec3::new(3.0, 0.5, 0.0), actor(), ContentFlags::TRIGGER));
    }

    #[test]
    fn test_oriented_box_slope_normal() {
        let mut world = CollisionWorld::new();
        // 30 degree ramp rising toward +X
        let rotation = Quat::from_rotation_z(30f32.to_radians());
        world.add_oriented_box(Vec3::ZERO, Vec3::new(5.0, 0.25, 5.0), rotation, ContentFlags::SOLID);

        let result = world.trace(
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(0.0, -3.0, 0.0),
            actor(),
            ContentFlags::MASK_ACTOR_SOLID,
        );

        let normal = result.hit_normal.unwrap();
        assert!((normal.y - 30f32.to_radians().cos()).abs() < 0.05, "normal={:?}", normal);
        assert!(normal.x < 0.0, "ramp rising toward +X faces -X, got {:?}", normal);
    }

    #[test]
    fn test_set_surface() {
        let mut world = create_test_world();
        assert!(world.set_surface(0, SurfaceFlags::PLATFORM));
        assert!(!world.set_surface(99, SurfaceFlags::PLATFORM));
    }

    #[test]
    fn test_overhead_probe() {
        let mut world = create_test_world();
        // Ceiling slab with its underside at y=1.4
        world.add_box(
            Vec3::new(0.0, 1.9, 0.0),
            Vec3::new(2.0, 0.5, 2.0),
            ContentFlags::SOLID,
        );

        let blocked = OverheadProbe {
            feet: Vec3::ZERO,
            radius: 0.36,
            bottom: 1.02,
            top: 1.9,
        };
        assert!(world.overhead_blocked(&blocked));

        let clear = OverheadProbe {
            feet: Vec3::new(-20.0, 0.0, 0.0),
            ..blocked
        };
        assert!(!world.overhead_blocked(&clear));
    }

    #[test]
    fn test_convex_hull_wedge() {
        let mut world = CollisionWorld::new();
        let wedge = [
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(2.0, 1.0, 2.0),
        ];
        assert!(world.add_convex_hull(&wedge, ContentFlags::SOLID).is_some());
        assert_eq!(world.brush_count(), 1);

        // Inside the tall end of the wedge
        let probe = TraceShape::Sphere { radius: 0.05 };
        assert!(world.point_in_solid(Vec3::new(1.8, 0.2, 1.0), probe, ContentFlags::SOLID));
        assert!(!world.point_in_solid(Vec3::new(0.2, 0.8, 1.0), probe, ContentFlags::SOLID));
    }
}

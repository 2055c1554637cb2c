//! Scripted collision backend for movement tests.

use std::cell::RefCell;

use glam::Vec3;

use crate::collision::{CollisionBackend, Contact, MoveOutcome, MoveRequest, OverheadProbe, SurfaceFlags};

/// Infinite horizontal floor with an optional ceiling and a switchable
/// overhead obstruction.
#[derive(Debug)]
pub struct FlatGround {
    /// Floor height, or `None` for a bottomless void.
    pub floor: Option<f32>,
    /// Normal reported for the floor (the floor stays flat for positioning).
    pub floor_normal: Vec3,
    /// Surface flags of the floor.
    pub floor_surface: SurfaceFlags,
    /// Height of the ceiling underside.
    pub ceiling: Option<f32>,
    /// Answer for every overhead probe.
    pub overhead: bool,
    /// Every request received, in order.
    pub requests: RefCell<Vec<MoveRequest>>,
}

impl FlatGround {
    pub fn new(floor: f32) -> Self {
        Self {
            floor: Some(floor),
            floor_normal: Vec3::Y,
            floor_surface: SurfaceFlags::NONE,
            ceiling: None,
            overhead: false,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn void() -> Self {
        Self {
            floor: None,
            ..Self::new(0.0)
        }
    }

    pub fn last_request(&self) -> Option<MoveRequest> {
        self.requests.borrow().last().copied()
    }
}

impl CollisionBackend for FlatGround {
    fn move_and_slide(&self, request: &MoveRequest) -> MoveOutcome {
        self.requests.borrow_mut().push(*request);

        let mut position = request.position + request.velocity * request.delta_time;
        let mut velocity = request.velocity;
        let mut outcome = MoveOutcome::resting_at(position, Vec3::Y);

        if let Some(floor) = self.floor {
            if position.y <= floor {
                position.y = floor;
                velocity.y = velocity.y.max(0.0);
                outcome.on_floor = true;
                outcome.floor_normal = self.floor_normal;
                outcome.contacts.push(Contact {
                    position: Vec3::new(position.x, floor, position.z),
                    normal: self.floor_normal,
                    surface: self.floor_surface,
                });
            }
        }

        if let Some(ceiling) = self.ceiling {
            let height = request.shape.height();
            if position.y + height >= ceiling {
                position.y = ceiling - height;
                velocity.y = velocity.y.min(0.0);
                outcome.on_ceiling = true;
                outcome.contacts.push(Contact {
                    position: Vec3::new(position.x, ceiling, position.z),
                    normal: Vec3::NEG_Y,
                    surface: SurfaceFlags::NONE,
                });
            }
        }

        outcome.position = position;
        outcome.velocity = velocity;
        outcome
    }

    fn overhead_blocked(&self, _probe: &OverheadProbe) -> bool {
        self.overhead
    }
}

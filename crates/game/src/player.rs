//! The player rig: controller, actor state and the collaborators around it.

use glam::Vec3;
use stride_physics::movement::{
    ActorState, InputSource, LocomotionController, PresentationFrame, PresentationSink, TickReport,
};
use stride_physics::CollisionBackend;

/// One controllable actor.
///
/// Owns its [`ActorState`] exclusively. Input is pulled from `I` once per
/// step and the resulting frame is pushed to `P`.
#[derive(Debug)]
pub struct Player<I: InputSource, P: PresentationSink> {
    controller: LocomotionController,
    state: ActorState,
    input: I,
    presentation: P,
}

impl<I: InputSource, P: PresentationSink> Player<I, P> {
    /// Create a player standing at `position`.
    pub fn new(controller: LocomotionController, position: Vec3, yaw: f32, input: I, presentation: P) -> Self {
        let state = controller.spawn(position, yaw);
        Self {
            controller,
            state,
            input,
            presentation,
        }
    }

    /// Run one tick: sample input, advance the actor and publish the frame.
    ///
    /// Returns `None` (and publishes nothing) if the controller rejects
    /// `delta_time`.
    pub fn step<B: CollisionBackend + ?Sized>(&mut self, backend: &B, delta_time: f32) -> Option<TickReport> {
        let command = self.input.sample();
        let report = self.controller.tick(&mut self.state, &command, backend, delta_time)?;
        self.presentation.publish(&report.frame);
        Some(report)
    }

    /// Put the player at `position`, resting on whatever is below it.
    pub fn respawn<B: CollisionBackend + ?Sized>(&mut self, position: Vec3, yaw: f32, backend: &B) {
        self.state = self.controller.spawn_on_ground(position, yaw, backend);
        self.presentation
            .publish(&PresentationFrame::capture(self.controller.config(), &self.state));
        log::info!("Player respawned at {:?}", self.state.position);
    }

    /// Get the player's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    /// Get the player's eye position.
    pub fn eye_position(&self) -> Vec3 {
        PresentationFrame::capture(self.controller.config(), &self.state).eye_position()
    }

    /// Check if the player is on the ground.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.state.grounded
    }

    /// Check if the player is crouching.
    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.state.is_crouching()
    }

    pub fn state(&self) -> &ActorState {
        &self.state
    }

    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use stride_physics::movement::LocomotionCommand;
    use stride_physics::{CollisionWorld, ContentFlags};

    /// Replays a fixed command forever.
    struct Constant(LocomotionCommand);

    impl InputSource for Constant {
        fn sample(&mut self) -> LocomotionCommand {
            self.0
        }
    }

    #[derive(Default)]
    struct Frames(Vec<PresentationFrame>);

    impl PresentationSink for Frames {
        fn publish(&mut self, frame: &PresentationFrame) {
            self.0.push(*frame);
        }
    }

    fn floor() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );
        world
    }

    fn walking() -> Constant {
        Constant(LocomotionCommand {
            move_axis: Vec2::Y,
            ..LocomotionCommand::captured()
        })
    }

    #[test]
    fn test_step_publishes_each_tick() {
        let world = floor();
        let mut player = Player::new(
            LocomotionController::with_default_config(),
            Vec3::ZERO,
            0.0,
            walking(),
            Frames::default(),
        );

        for _ in 0..30 {
            assert!(player.step(&world, 1.0 / 60.0).is_some());
        }

        assert_eq!(player.presentation().0.len(), 30);
        assert!(player.position().x > 0.5, "x={}", player.position().x);
        assert!(player.on_ground());
    }

    #[test]
    fn test_rejected_step_publishes_nothing() {
        let world = floor();
        let mut player = Player::new(
            LocomotionController::with_default_config(),
            Vec3::ZERO,
            0.0,
            walking(),
            Frames::default(),
        );

        assert!(player.step(&world, 0.0).is_none());
        assert!(player.presentation().0.is_empty());
        assert_eq!(player.position(), Vec3::ZERO);
    }

    #[test]
    fn test_respawn_drops_to_floor() {
        let world = floor();
        let mut player = Player::new(
            LocomotionController::with_default_config(),
            Vec3::ZERO,
            0.0,
            Constant(LocomotionCommand::captured()),
            (),
        );

        player.respawn(Vec3::new(3.0, 2.0, 0.0), 0.0, &world);
        assert!(player.position().y.abs() < 0.01, "y={}", player.position().y);
        assert!((player.position().x - 3.0).abs() < 1e-3);

        player.step(&world, 1.0 / 60.0);
        assert!(player.on_ground());
        assert!(!player.is_crouching());
        assert!((player.eye_position().y - 1.6).abs() < 0.01);
    }
}

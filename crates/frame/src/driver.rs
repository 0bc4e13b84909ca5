use glam::Quat;
use tracing::info;
use vitrine_camera::{OrbitCamera, OrbitController};
use vitrine_scene::Scene;

/// Angular speed of the rotating mesh, radians per elapsed second.
const ROTATION_SPEED: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Stopped,
}

/// Per-frame driver, modeled as an explicit state machine so the loop can be
/// single-stepped in tests instead of only observed live.
///
/// The application never stops it; `stop` exists so the lifecycle is
/// complete and testable.
#[derive(Debug)]
pub struct FrameDriver {
    state: DriverState,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Idle -> Running. Called once at startup; re-starting is a no-op.
    pub fn start(&mut self) {
        if self.state == DriverState::Idle {
            self.state = DriverState::Running;
            info!("frame driver running");
        }
    }

    pub fn stop(&mut self) {
        if self.state == DriverState::Running {
            self.state = DriverState::Stopped;
            info!("frame driver stopped");
        }
    }

    /// Advance one frame at `elapsed` seconds since start: set the rotating
    /// mesh's orientation to `0.5 * elapsed` radians about its vertical
    /// axis, then advance the orbit controller one damping step.
    ///
    /// The orientation is an absolute function of elapsed time, so the same
    /// elapsed-time sequence reproduces the same frames regardless of frame
    /// rate. Returns whether the caller should render.
    pub fn tick(
        &mut self,
        scene: &mut Scene,
        controller: &mut OrbitController,
        camera: &mut OrbitCamera,
        elapsed: f32,
    ) -> bool {
        if self.state != DriverState::Running {
            return false;
        }

        scene.rotating_transform_mut().rotation = Quat::from_rotation_y(ROTATION_SPEED * elapsed);
        let _ = controller.update(camera);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::PI;

    fn rig() -> (Scene, OrbitController, OrbitCamera, FrameDriver) {
        (
            Scene::assemble(),
            OrbitController::new(),
            OrbitCamera::with_aspect(800.0 / 600.0),
            FrameDriver::new(),
        )
    }

    fn rotation_of(scene: &Scene, label: &str) -> Quat {
        scene.node(label).unwrap().transform.rotation
    }

    #[test]
    fn starts_idle_and_ticks_only_when_running() {
        let (mut scene, mut ctl, mut cam, mut driver) = rig();
        assert_eq!(driver.state(), DriverState::Idle);
        assert!(!driver.tick(&mut scene, &mut ctl, &mut cam, 1.0));
        assert_eq!(rotation_of(&scene, "torus_knot"), Quat::IDENTITY);

        driver.start();
        assert_eq!(driver.state(), DriverState::Running);
        assert!(driver.tick(&mut scene, &mut ctl, &mut cam, 1.0));
    }

    #[test]
    fn stop_halts_ticking() {
        let (mut scene, mut ctl, mut cam, mut driver) = rig();
        driver.start();
        driver.stop();
        assert_eq!(driver.state(), DriverState::Stopped);
        assert!(!driver.tick(&mut scene, &mut ctl, &mut cam, 1.0));
        // A stopped driver does not restart
        driver.start();
        assert_eq!(driver.state(), DriverState::Stopped);
    }

    #[test]
    fn orientation_is_half_elapsed_time() {
        let (mut scene, mut ctl, mut cam, mut driver) = rig();
        driver.start();

        driver.tick(&mut scene, &mut ctl, &mut cam, 0.0);
        let spun = rotation_of(&scene, "torus_knot") * Vec3::X;
        assert!((spun - Vec3::X).length() < 1e-6);

        driver.tick(&mut scene, &mut ctl, &mut cam, 1.0);
        let q = rotation_of(&scene, "torus_knot");
        let (axis, angle) = q.to_axis_angle();
        assert!((angle - 0.5).abs() < 1e-6);
        assert!((axis - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn orientation_wraps_after_full_turn() {
        // t = 2*pi / 0.5: one full revolution, back to rest orientation
        let (mut scene, mut ctl, mut cam, mut driver) = rig();
        driver.start();
        driver.tick(&mut scene, &mut ctl, &mut cam, 4.0 * PI);
        let spun = rotation_of(&scene, "torus_knot") * Vec3::X;
        assert!((spun - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn orientation_is_frame_rate_independent() {
        let (mut scene_a, mut ctl_a, mut cam_a, mut driver_a) = rig();
        driver_a.start();
        // Many small steps
        for i in 0..=100 {
            driver_a.tick(&mut scene_a, &mut ctl_a, &mut cam_a, i as f32 * 0.03);
        }
        // One big step to the same elapsed time
        let (mut scene_b, mut ctl_b, mut cam_b, mut driver_b) = rig();
        driver_b.start();
        driver_b.tick(&mut scene_b, &mut ctl_b, &mut cam_b, 3.0);

        let qa = rotation_of(&scene_a, "torus_knot");
        let qb = rotation_of(&scene_b, "torus_knot");
        assert!(qa.angle_between(qb) < 1e-5);
    }

    #[test]
    fn tick_touches_only_the_rotating_mesh() {
        let (mut scene, mut ctl, mut cam, mut driver) = rig();
        driver.start();
        driver.tick(&mut scene, &mut ctl, &mut cam, 0.0);

        let cone_before = scene.node("cone").unwrap().transform;
        let plane_before = scene.node("ground_plane").unwrap().transform;

        driver.tick(&mut scene, &mut ctl, &mut cam, 1.0);

        assert_eq!(scene.node("cone").unwrap().transform, cone_before);
        assert_eq!(scene.node("ground_plane").unwrap().transform, plane_before);
        let (_, angle) = rotation_of(&scene, "torus_knot").to_axis_angle();
        assert!((angle - 0.5).abs() < 1e-6);
    }

    #[test]
    fn tick_advances_orbit_damping() {
        let (mut scene, mut ctl, mut cam, mut driver) = rig();
        driver.start();
        ctl.begin_drag();
        ctl.drag(100.0, 0.0);
        ctl.end_drag();

        let before = cam.position;
        driver.tick(&mut scene, &mut ctl, &mut cam, 0.1);
        assert_ne!(cam.position, before, "controller must be polled each frame");
    }
}

use crate::camera::OrbitCamera;
use glam::Vec3;
use std::f32::consts::PI;
use std::ops::RangeInclusive;
use tracing::trace;

/// Debug-panel slider range for the camera's x and y components.
pub const PANEL_XY_RANGE: RangeInclusive<f32> = -500.0..=500.0;
/// Debug-panel slider range for the camera's z component.
pub const PANEL_Z_RANGE: RangeInclusive<f32> = 0.0..=500.0;
/// Debug-panel slider step.
pub const PANEL_STEP: f32 = 5.0;

/// Snap a slider value to the nearest multiple of `step`, clamped to range.
pub fn snap_to_step(value: f32, range: RangeInclusive<f32>, step: f32) -> f32 {
    let snapped = (value / step).round() * step;
    snapped.clamp(*range.start(), *range.end())
}

/// Damped orbit interaction around the camera's target.
///
/// Pointer drags accumulate spherical-angle deltas; each `update` applies
/// `delta * damping_factor` and decays the residual by `1 - damping_factor`,
/// so the camera keeps decelerating after the drag ends instead of stopping
/// instantly. Same accumulate-then-decay scheme as the web orbit helper the
/// original display used.
#[derive(Debug, Clone)]
pub struct OrbitController {
    rotate_speed: f32,
    damping_factor: f32,
    dragging: bool,
    theta_delta: f32,
    phi_delta: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            damping_factor: 0.05,
            dragging: false,
            theta_delta: 0.0,
            phi_delta: 0.0,
        }
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Accumulate a pointer-drag delta in pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if !self.dragging {
            return;
        }
        self.theta_delta -= dx * self.rotate_speed;
        self.phi_delta -= dy * self.rotate_speed;
    }

    /// Advance the interaction by one damping step. Must be called exactly
    /// once per frame. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut OrbitCamera) -> bool {
        const REST: f32 = 1e-6;
        if self.theta_delta.abs() < REST && self.phi_delta.abs() < REST {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            return false;
        }

        let offset = camera.position - camera.target;
        let radius = offset.length().max(1e-4);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += self.theta_delta * self.damping_factor;
        phi += self.phi_delta * self.damping_factor;
        // Keep away from the poles so the view basis stays well-defined
        phi = phi.clamp(0.01, PI - 0.01);

        camera.position = camera.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
        trace!(theta, phi, "orbit step");

        self.theta_delta *= 1.0 - self.damping_factor;
        self.phi_delta *= 1.0 - self.damping_factor;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_nearest_step() {
        assert_eq!(snap_to_step(123.4, PANEL_XY_RANGE, PANEL_STEP), 125.0);
        assert_eq!(snap_to_step(122.4, PANEL_XY_RANGE, PANEL_STEP), 120.0);
        assert_eq!(snap_to_step(-2.4, PANEL_XY_RANGE, PANEL_STEP), 0.0);
    }

    #[test]
    fn snap_clamps_to_range() {
        assert_eq!(snap_to_step(777.0, PANEL_XY_RANGE, PANEL_STEP), 500.0);
        assert_eq!(snap_to_step(-777.0, PANEL_XY_RANGE, PANEL_STEP), -500.0);
        assert_eq!(snap_to_step(-40.0, PANEL_Z_RANGE, PANEL_STEP), 0.0);
    }

    #[test]
    fn panel_write_reads_back() {
        let mut cam = OrbitCamera::default();
        let v = snap_to_step(123.0, PANEL_XY_RANGE, PANEL_STEP);
        cam.position.x = v;
        assert_eq!(cam.position.x, 125.0);
    }

    #[test]
    fn update_without_input_is_a_no_op() {
        let mut cam = OrbitCamera::default();
        let mut ctl = OrbitController::new();
        let before = cam.position;
        assert!(!ctl.update(&mut cam));
        assert_eq!(cam.position, before);
    }

    #[test]
    fn drag_ignored_unless_started() {
        let mut cam = OrbitCamera::default();
        let mut ctl = OrbitController::new();
        ctl.drag(50.0, 0.0);
        assert!(!ctl.update(&mut cam));
    }

    #[test]
    fn damping_continues_after_release() {
        let mut cam = OrbitCamera::default();
        let mut ctl = OrbitController::new();
        ctl.begin_drag();
        ctl.drag(80.0, 20.0);
        ctl.end_drag();

        let p0 = cam.position;
        assert!(ctl.update(&mut cam));
        let p1 = cam.position;
        assert_ne!(p0, p1, "velocity must persist past the drag");
        assert!(ctl.update(&mut cam), "still decelerating on frame two");
    }

    #[test]
    fn damping_deltas_shrink_monotonically() {
        let mut cam = OrbitCamera::default();
        let mut ctl = OrbitController::new();
        ctl.begin_drag();
        ctl.drag(120.0, 40.0);
        ctl.end_drag();

        let mut last = cam.position;
        let mut last_step = f32::MAX;
        let mut came_to_rest = false;
        for _ in 0..1000 {
            if !ctl.update(&mut cam) {
                came_to_rest = true;
                break;
            }
            let step = (cam.position - last).length();
            // Tolerance covers f32 quantization of the ~100-unit position
            assert!(step <= last_step + 1e-4, "per-frame delta must not grow");
            last_step = step;
            last = cam.position;
        }
        assert!(came_to_rest, "motion must asymptotically stabilize");
        assert!(last_step < 1e-3);
    }

    #[test]
    fn orbit_preserves_distance_to_target() {
        let mut cam = OrbitCamera::default();
        let radius = (cam.position - cam.target).length();
        let mut ctl = OrbitController::new();
        ctl.begin_drag();
        ctl.drag(200.0, -60.0);
        ctl.end_drag();
        for _ in 0..20 {
            let _ = ctl.update(&mut cam);
        }
        let r = (cam.position - cam.target).length();
        assert!((r - radius).abs() < 1e-2);
    }

    #[test]
    fn polar_clamp_keeps_camera_off_the_poles() {
        let mut cam = OrbitCamera::default();
        let mut ctl = OrbitController::new();
        ctl.begin_drag();
        // Huge upward drag tries to push past the zenith
        ctl.drag(0.0, 100_000.0);
        ctl.end_drag();
        for _ in 0..200 {
            let _ = ctl.update(&mut cam);
        }
        let offset = cam.position - cam.target;
        // The polar clamp keeps sin(phi) >= sin(0.01), so the horizontal
        // offset never collapses and look-at stays well-defined
        let horiz = (offset.x * offset.x + offset.z * offset.z).sqrt();
        assert!(horiz / offset.length() >= (0.009f32).sin());
    }
}

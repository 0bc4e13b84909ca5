//! Camera: perspective projection plus a damped orbit controller.
//!
//! # Invariants
//! - `OrbitController::update` must run exactly once per frame, input or
//!   not, or damping stalls.
//! - Panel writes and orbit writes both target `OrbitCamera::position`;
//!   last write within a frame wins.

mod camera;
mod controller;

pub use camera::OrbitCamera;
pub use controller::{OrbitController, PANEL_STEP, PANEL_XY_RANGE, PANEL_Z_RANGE, snap_to_step};

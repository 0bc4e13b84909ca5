use tracing::debug;

/// Upper bound on the applied device pixel ratio, to bound GPU fill cost
/// on high-density displays.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Tracks the display surface's logical size and the clamped pixel ratio.
///
/// On resize the caller must apply, in order: stored dimensions, camera
/// aspect, render-surface size. Updating the projection last would show one
/// stretched frame.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    width: u32,
    height: u32,
    pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, host_pixel_ratio: f64) -> Self {
        let mut vp = Self {
            width: 1,
            height: 1,
            pixel_ratio: 1.0,
        };
        let _ = vp.resize(width, height, host_pixel_ratio);
        vp
    }

    /// Store new dimensions and clamp the host pixel ratio. Returns the new
    /// aspect ratio for the caller to push into the camera projection.
    pub fn resize(&mut self, width: u32, height: u32, host_pixel_ratio: f64) -> f32 {
        self.width = width.max(1);
        self.height = height.max(1);
        self.pixel_ratio = host_pixel_ratio.min(MAX_PIXEL_RATIO);
        debug!(
            width = self.width,
            height = self.height,
            pixel_ratio = self.pixel_ratio,
            "viewport resized"
        );
        self.aspect()
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Render-surface size in physical pixels after the ratio clamp.
    pub fn surface_size(&self) -> (u32, u32) {
        let w = (self.width as f64 * self.pixel_ratio).round() as u32;
        let h = (self.height as f64 * self.pixel_ratio).round() as u32;
        (w.max(1), h.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_equals_width_over_height() {
        let vp = Viewport::new(800, 600, 1.0);
        assert!((vp.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn resize_reports_new_aspect() {
        let mut vp = Viewport::new(800, 600, 1.0);
        let aspect = vp.resize(1920, 1080, 1.0);
        assert!((aspect - 1920.0 / 1080.0).abs() < 1e-6);
        assert_eq!(aspect, vp.aspect());
    }

    #[test]
    fn pixel_ratio_is_clamped_to_two() {
        let vp = Viewport::new(800, 600, 3.0);
        assert_eq!(vp.pixel_ratio(), 2.0);
        let vp = Viewport::new(800, 600, 1.5);
        assert_eq!(vp.pixel_ratio(), 1.5);
    }

    #[test]
    fn surface_size_applies_ratio() {
        let vp = Viewport::new(800, 600, 2.0);
        assert_eq!(vp.surface_size(), (1600, 1200));
        let vp = Viewport::new(800, 600, 4.0);
        assert_eq!(vp.surface_size(), (1600, 1200));
    }

    #[test]
    fn degenerate_sizes_are_floored() {
        let vp = Viewport::new(0, 0, 1.0);
        assert_eq!(vp.surface_size(), (1, 1));
        assert!(vp.aspect().is_finite());
    }
}

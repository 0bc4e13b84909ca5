use glam::Vec3;
use serde::{Deserialize, Serialize};
use vitrine_common::Color;

/// Uniform fill light with no direction or falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Sky/ground gradient light blended by the surface normal's up component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HemisphereLight {
    pub sky_color: Color,
    pub ground_color: Color,
    pub intensity: f32,
}

/// Infinitely distant light shining from `position` toward the origin.
///
/// Parallel rays, no falloff. Same role as the sun-style light in the
/// KhoraEngine renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Normalized direction the light travels (toward the origin).
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize()
    }
}

/// Line gizmo marking the directional light's position and aim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLightHelper {
    pub size: f32,
    pub color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_light_aims_at_origin() {
        let light = DirectionalLight {
            color: Color::WHITE,
            intensity: 0.5,
            position: Vec3::new(1000.0, 1000.0, 0.0),
        };
        let dir = light.direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x < 0.0 && dir.y < 0.0);
        assert_eq!(dir.z, 0.0);
    }
}

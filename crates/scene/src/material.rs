use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use vitrine_common::Color;

/// Lit surface with an optional normal map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardMaterial {
    pub color: Color,
    /// Path to a normal-map image. Load failure degrades shading to the
    /// flat geometric normal; it never halts startup.
    pub normal_map: Option<PathBuf>,
}

/// Glossy surface with clearcoat, used by the ground plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalMaterial {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub reflectivity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    /// Whether back faces are drawn. The original display left this off;
    /// the orbit polar clamp keeps the camera above the plane, so the
    /// underside is never seen.
    pub double_sided: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Standard(StandardMaterial),
    Physical(PhysicalMaterial),
}

impl Material {
    pub fn color(&self) -> Color {
        match self {
            Self::Standard(m) => m.color,
            Self::Physical(m) => m.color,
        }
    }

    pub fn normal_map(&self) -> Option<&PathBuf> {
        match self {
            Self::Standard(m) => m.normal_map.as_ref(),
            Self::Physical(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_material_has_no_normal_map() {
        let m = Material::Physical(PhysicalMaterial {
            color: Color::from_hex(0x2a3a40),
            roughness: 0.3,
            metalness: 0.46,
            reflectivity: 0.35,
            clearcoat: 0.49,
            clearcoat_roughness: 0.56,
            double_sided: false,
        });
        assert!(m.normal_map().is_none());
    }
}

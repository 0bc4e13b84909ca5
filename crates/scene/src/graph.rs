use crate::geometry::{self, MeshData};
use crate::light::{AmbientLight, DirectionalLight, DirectionalLightHelper, HemisphereLight};
use crate::material::{Material, PhysicalMaterial, StandardMaterial};
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;
use vitrine_common::{Color, Transform};

/// Relative path of the torus knot's normal map.
pub const NORMAL_MAP_PATH: &str = "assets/textures/normal_map.jpg";
/// Relative path of the cone's normal map.
pub const CRYSTAL_NORMAL_MAP_PATH: &str = "assets/textures/crystal_metal_norm.jpg";

/// What a scene node renders as.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Mesh { mesh: MeshData, material: Material },
    Ambient(AmbientLight),
    Hemisphere(HemisphereLight),
    Directional(DirectionalLight),
    LightHelper(DirectionalLightHelper),
}

/// One renderable or light node in the scene graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub label: &'static str,
    pub transform: Transform,
    pub kind: NodeKind,
}

/// The assembled scene: a background color and a flat, order-stable node list.
///
/// Owned by the application for its entire lifetime. After assembly the only
/// mutation is the frame driver rotating the torus knot node.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Color,
    nodes: Vec<Node>,
    rotating: usize,
}

impl Scene {
    /// Build the full showcase scene. Runs exactly once at startup; all
    /// inputs are compile-time constants, so there are no error paths.
    pub fn assemble() -> Self {
        let mut nodes = Vec::with_capacity(7);

        nodes.push(Node {
            label: "torus_knot",
            transform: Transform::at(Vec3::new(0.0, 40.0, 0.0)),
            kind: NodeKind::Mesh {
                mesh: geometry::torus_knot(10.0, 3.0, 100, 16, 2, 3),
                material: Material::Standard(StandardMaterial {
                    color: Color::from_hex(0xd8ebf2),
                    normal_map: Some(PathBuf::from(NORMAL_MAP_PATH)),
                }),
            },
        });
        let rotating = nodes.len() - 1;

        nodes.push(Node {
            label: "cone",
            transform: Transform::at(Vec3::new(0.0, 10.0, 0.0)),
            kind: NodeKind::Mesh {
                mesh: geometry::cone(8.0, 20.0, 40),
                material: Material::Standard(StandardMaterial {
                    color: Color::from_hex(0x81a6a6),
                    normal_map: Some(PathBuf::from(CRYSTAL_NORMAL_MAP_PATH)),
                }),
            },
        });

        // Ground: an XY quad laid flat by its transform
        nodes.push(Node {
            label: "ground_plane",
            transform: Transform {
                rotation: Quat::from_rotation_x(-FRAC_PI_2),
                ..Transform::default()
            },
            kind: NodeKind::Mesh {
                mesh: geometry::plane(200.0, 200.0),
                material: Material::Physical(PhysicalMaterial {
                    color: Color::from_hex(0x2a3a40),
                    roughness: 0.3,
                    metalness: 0.46,
                    reflectivity: 0.35,
                    clearcoat: 0.49,
                    clearcoat_roughness: 0.56,
                    double_sided: false,
                }),
            },
        });

        nodes.push(Node {
            label: "ambient_light",
            transform: Transform::default(),
            kind: NodeKind::Ambient(AmbientLight {
                color: Color::WHITE,
                intensity: 0.2,
            }),
        });

        nodes.push(Node {
            label: "hemisphere_light",
            transform: Transform::default(),
            kind: NodeKind::Hemisphere(HemisphereLight {
                sky_color: Color::WHITE,
                ground_color: Color::from_hex(0x2a3a40),
                intensity: 1.0,
            }),
        });

        let sun = DirectionalLight {
            color: Color::WHITE,
            intensity: 0.5,
            position: Vec3::new(1000.0, 1000.0, 0.0),
        };
        nodes.push(Node {
            label: "directional_light",
            transform: Transform::at(sun.position),
            kind: NodeKind::Directional(sun),
        });

        nodes.push(Node {
            label: "directional_light_helper",
            transform: Transform::at(sun.position),
            kind: NodeKind::LightHelper(DirectionalLightHelper {
                size: 5.0,
                color: Color::RED,
            }),
        });

        Self {
            background: Color::from_hex(0xd2d7d9),
            nodes,
            rotating,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Index of the node the frame driver rotates.
    pub fn rotating_index(&self) -> usize {
        self.rotating
    }

    /// Mutable access to the rotating node's transform. This is the only
    /// sanctioned post-assembly mutation.
    pub fn rotating_transform_mut(&mut self) -> &mut Transform {
        &mut self.nodes[self.rotating].transform
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Mesh { .. }))
    }

    pub fn ambient(&self) -> Option<&AmbientLight> {
        self.nodes.iter().find_map(|n| match &n.kind {
            NodeKind::Ambient(l) => Some(l),
            _ => None,
        })
    }

    pub fn hemisphere(&self) -> Option<&HemisphereLight> {
        self.nodes.iter().find_map(|n| match &n.kind {
            NodeKind::Hemisphere(l) => Some(l),
            _ => None,
        })
    }

    pub fn directional(&self) -> Option<&DirectionalLight> {
        self.nodes.iter().find_map(|n| match &n.kind {
            NodeKind::Directional(l) => Some(l),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembled_node_set_is_exact() {
        let scene = Scene::assemble();
        let labels: Vec<&str> = scene.nodes().iter().map(|n| n.label).collect();
        assert_eq!(
            labels,
            vec![
                "torus_knot",
                "cone",
                "ground_plane",
                "ambient_light",
                "hemisphere_light",
                "directional_light",
                "directional_light_helper",
            ]
        );
        // No duplicates
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), labels.len());
    }

    #[test]
    fn rotating_node_is_the_torus_knot() {
        let scene = Scene::assemble();
        assert_eq!(scene.nodes()[scene.rotating_index()].label, "torus_knot");
    }

    #[test]
    fn mesh_placement_matches_configuration() {
        let scene = Scene::assemble();
        let torus = scene.node("torus_knot").unwrap();
        assert_eq!(torus.transform.position, Vec3::new(0.0, 40.0, 0.0));
        let cone = scene.node("cone").unwrap();
        assert_eq!(cone.transform.position, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn ground_plane_faces_up() {
        let scene = Scene::assemble();
        let plane = scene.node("ground_plane").unwrap();
        // Local +Z (the quad's facing) must map to world +Y
        let up = plane.transform.rotation * Vec3::Z;
        assert!((up - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn lights_match_configuration() {
        let scene = Scene::assemble();
        assert_eq!(scene.ambient().unwrap().intensity, 0.2);
        assert_eq!(scene.hemisphere().unwrap().intensity, 1.0);
        let sun = scene.directional().unwrap();
        assert_eq!(sun.intensity, 0.5);
        assert_eq!(sun.position, Vec3::new(1000.0, 1000.0, 0.0));
    }

    #[test]
    fn helper_sits_at_the_light() {
        let scene = Scene::assemble();
        let light = scene.node("directional_light").unwrap();
        let helper = scene.node("directional_light_helper").unwrap();
        assert_eq!(light.transform.position, helper.transform.position);
    }
}

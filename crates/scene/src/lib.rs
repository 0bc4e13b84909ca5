//! Scene assembly: geometry generators, materials, lights, and the scene graph.
//!
//! The assembler runs exactly once at startup and produces the full node set;
//! after that the only mutation the rest of the program performs is rotating
//! the torus knot's transform each frame.
//!
//! # Invariants
//! - The assembled scene contains exactly the configured node set.
//! - Geometry and material parameters are compile-time constants.
//! - Node order is stable, so indices are valid for the scene's lifetime.

mod geometry;
mod graph;
mod light;
mod material;

pub use geometry::{MeshData, cone, plane, torus_knot};
pub use graph::{Node, NodeKind, Scene};
pub use light::{AmbientLight, DirectionalLight, DirectionalLightHelper, HemisphereLight};
pub use material::{Material, PhysicalMaterial, StandardMaterial};

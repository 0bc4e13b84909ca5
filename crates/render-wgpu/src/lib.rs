//! wgpu render backend for the showcase scene.
//!
//! Uploads the assembled scene's meshes once at startup, then draws them
//! each frame under a three-light model (ambient + hemisphere + directional)
//! with normal mapping, plus line gizmos for the world axes and the
//! directional light helper.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - GPU resources are acquired at startup and held for the process lifetime.
//! - A missing normal-map file degrades shading, never startup.

mod gpu;
mod shaders;
mod texture;

pub use gpu::SceneRenderer;
pub use texture::{NormalMap, TextureError};

//! Shared types for the vitrine showcase scene.
//!
//! # Invariants
//! - `Transform` composes as scale, then rotation, then translation.
//! - `Color` stores linear-space components; hex constructors decode sRGB.

mod types;

pub use types::{Color, Transform};

//! Frame lifecycle: viewport sizing, the monotonic clock, and the
//! Idle/Running/Stopped driver that advances per-frame state.
//!
//! # Invariants
//! - Camera aspect equals viewport width / height before the next render.
//! - The rotating mesh's orientation is a pure function of elapsed time.
//! - `FrameDriver::tick` advances the orbit controller exactly once.

mod clock;
mod driver;
mod viewport;

pub use clock::Clock;
pub use driver::{DriverState, FrameDriver};
pub use viewport::{MAX_PIXEL_RATIO, Viewport};

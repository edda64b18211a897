//! Utility Module
//!
//! Small self-contained helpers used by the application layer:
//!
//! - [`Timer`]: wall-clock frame timing
//! - [`FramePacer`]: caps update/draw work to a target frame rate
//! - [`FpsCounter`]: frame rate measurement
//! - [`OrbitControls`]: camera orbit controller for interactive viewing

pub mod fps_counter;
pub mod orbit_control;
pub mod time;

pub use fps_counter::FpsCounter;
pub use orbit_control::OrbitControls;
pub use time::{FramePacer, Timer};

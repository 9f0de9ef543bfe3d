//! Depth image input and back-projection into organized clouds
//!
//! - Depth decoding (16-bit single-channel images through `image`)
//! - Serial and row-parallel projection with fixed sensor scale

/// Depth image container and decoding
pub mod depth;
/// Depth-to-cloud back-projection
pub mod projector;

pub use depth::{DepthImage, decode_depth_image, load_depth_image};
pub use projector::{DEPTH_SCALE, project, project_parallel};

//! Core data structures (grids, clouds, intrinsics, transforms)

/// Organized and unorganized point clouds
pub mod cloud;
/// Row-major 2D storage
pub mod grid;
/// Pinhole camera parameters
pub mod intrinsics;
/// Point and normal types
pub mod point;
/// Rigid transforms applied to clouds
pub mod transform;

pub use cloud::{Cloud, ColoredCloud, NormalCloud, PointCloud};
pub use grid::Grid;
pub use intrinsics::Intrinsics;
pub use point::{Normal, PointXyz, PointXyzRgb};
pub use transform::RigidTransform;

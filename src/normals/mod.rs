//! Surface normal estimation for organized clouds
//!
//! Normals come from integral images of central differences
//! (average 3D gradient), so every pixel costs O(1) regardless of window size.

/// Average 3D gradient estimator
pub mod estimator;
/// Summed-area tables over vector fields
pub mod integral;

pub use estimator::NormalEstimator;
pub use integral::IntegralImage;

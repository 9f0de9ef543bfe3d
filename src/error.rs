//! Error type shared by every stage of the pipeline

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by decoding, projection and segmentation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The depth image could not be decoded
    #[error("depth image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// Reading the depth image from disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The depth image has zero width or height
    #[error("depth image is empty")]
    EmptyImage,

    /// The image decoded but is not a single-channel depth map
    #[error("unsupported depth format: {0}")]
    UnsupportedFormat(String),

    /// A buffer does not match the declared grid shape
    #[error("dimension mismatch: expected {expected} elements, got {actual}")]
    DimensionMismatch {
        /// Element count implied by width x height
        expected: usize,
        /// Element count actually supplied
        actual: usize,
    },

    /// An index referenced a point or disjoint-set element that does not exist
    #[error("index {index} out of range for {len} elements")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of addressable elements
        len: usize,
    },

    /// A union-find arena cannot address this many elements
    #[error("{len} elements exceed the union-find capacity of {max}")]
    TooManyElements {
        /// Requested element count
        len: usize,
        /// Largest addressable element count
        max: usize,
    },

    /// Focal lengths must be strictly positive
    #[error("invalid intrinsics: fx={fx}, fy={fy} (focal lengths must be > 0)")]
    InvalidIntrinsics {
        /// Horizontal focal length
        fx: f32,
        /// Vertical focal length
        fy: f32,
    },

    /// A segmenter was handed a normal field of the wrong shape
    #[error("normal field missing or not aligned with the cloud")]
    NormalsMissing,
}

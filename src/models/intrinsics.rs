//! Pinhole depth-camera intrinsics and the process-wide default
//!
//! Prefer passing an [`Intrinsics`] explicitly to the projector. The global
//! value exists for callers that configure the camera once at start-up;
//! configure it before spawning threads that construct frames, since a frame
//! snapshots the value at construction time.

use crate::error::{Error, Result};
use std::sync::{OnceLock, PoisonError, RwLock};

/// Focal lengths and principal point, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    /// Focal length along x
    pub fx: f32,
    /// Focal length along y
    pub fy: f32,
    /// Principal point x
    pub cx: f32,
    /// Principal point y
    pub cy: f32,
}

impl Intrinsics {
    /// Validated constructor; focal lengths must be strictly positive
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Result<Self> {
        // NaN fails both comparisons
        if !(fx > 0.0 && fy > 0.0) {
            return Err(Error::InvalidIntrinsics { fx, fy });
        }
        Ok(Self { fx, fy, cx, cy })
    }

    /// Back-project pixel `(u, v)` at metric depth `z`
    #[inline]
    pub fn back_project(&self, u: f32, v: f32, z: f32) -> [f32; 3] {
        [(u - self.cx) * z / self.fx, (v - self.cy) * z / self.fy, z]
    }
}

impl Default for Intrinsics {
    /// 640x480 structured-light defaults
    fn default() -> Self {
        Self {
            fx: 525.0,
            fy: 525.0,
            cx: 319.5,
            cy: 239.5,
        }
    }
}

static GLOBAL: OnceLock<RwLock<Intrinsics>> = OnceLock::new();

fn slot() -> &'static RwLock<Intrinsics> {
    GLOBAL.get_or_init(|| {
        log::debug!("intrinsics not configured, using defaults");
        RwLock::new(Intrinsics::default())
    })
}

/// Current process-wide intrinsics, created with defaults on first access
pub fn global() -> Intrinsics {
    // The guarded value is Copy and always fully written, so a poisoned lock
    // still holds a usable value.
    *slot().read().unwrap_or_else(PoisonError::into_inner)
}

/// Install `params` as the process-wide intrinsics
pub fn set_global(params: Intrinsics) {
    *slot().write().unwrap_or_else(PoisonError::into_inner) = params;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_focal_length() {
        assert!(Intrinsics::new(0.0, 525.0, 0.0, 0.0).is_err());
        assert!(Intrinsics::new(525.0, -1.0, 0.0, 0.0).is_err());
        assert!(Intrinsics::new(f32::NAN, 525.0, 0.0, 0.0).is_err());
        assert!(Intrinsics::new(525.0, 525.0, 319.5, 239.5).is_ok());
    }

    #[test]
    fn test_back_project() {
        let k = Intrinsics::new(500.0, 250.0, 100.0, 50.0).unwrap();
        let [x, y, z] = k.back_project(200.0, 150.0, 2.0);
        assert!((x - 0.4).abs() < 1e-6);
        assert!((y - 0.8).abs() < 1e-6);
        assert_eq!(z, 2.0);
    }

    #[test]
    fn test_global_set_replaces_value() {
        let custom = Intrinsics::new(600.0, 610.0, 320.0, 240.0).unwrap();
        set_global(custom);
        assert_eq!(global(), custom);
        set_global(Intrinsics::default());
        assert_eq!(global(), Intrinsics::default());
    }
}

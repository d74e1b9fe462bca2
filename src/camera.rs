#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR};

/// A touch point in page coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Viewport size as reported by the last resize.
///
/// `width` / `height` are in CSS pixels, `dpr` is the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, dpr: 1.0 }
    }
}

/// Perspective camera used by the host renderer outside of an AR session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self { fov_y_degrees: CAMERA_FOV_DEGREES, near: CAMERA_NEAR, far: CAMERA_FAR, aspect: 1.0 }
    }
}

impl PerspectiveCamera {
    #[must_use]
    pub fn with_fov(fov_y_degrees: f32) -> Self {
        Self { fov_y_degrees, ..Self::default() }
    }

    /// Update the aspect ratio from a viewport.
    ///
    /// Returns `false` and leaves the camera untouched for a degenerate
    /// viewport (zero or negative height or width).
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return false;
        }
        #[allow(clippy::cast_possible_truncation)]
        let aspect = (viewport.width / viewport.height) as f32;
        self.aspect = aspect;
        true
    }

    /// Right-handed projection matrix with a WebGL `[-1, 1]` depth range.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

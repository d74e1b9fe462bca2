//! Shared numeric constants for the placement engine.

// ── Placement ───────────────────────────────────────────────────

/// Uniform scale applied to a freshly placed instance.
pub const PLACEMENT_SCALE: f32 = 0.5;

/// Horizontal touch travel, in page pixels, that rotates the placed object by one radian.
pub const ROTATE_PX_PER_RADIAN: f64 = 100.0;

// ── Gestures ────────────────────────────────────────────────────

/// Pinch distances at or below this are treated as coincident touches.
pub const MIN_PINCH_DISTANCE_PX: f64 = 1e-6;

// ── Camera ──────────────────────────────────────────────────────

/// Vertical field of view of the scene camera, in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 75.0;

/// Near clip plane distance in meters.
pub const CAMERA_NEAR: f32 = 0.1;

/// Far clip plane distance in meters.
pub const CAMERA_FAR: f32 = 1000.0;

// ── Assets ──────────────────────────────────────────────────────

/// Asset paths requested at startup when none are configured.
pub const DEFAULT_MODEL_PATHS: [&str; 2] = ["/models/chair.gltf", "/models/bookcase.gltf"];

/// Model selected before the user touches the picker.
pub const DEFAULT_MODEL: &str = "chair";

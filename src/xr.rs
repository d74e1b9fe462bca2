//! AR session capability as seen by the engine.
//!
//! The device runtime is external. The engine needs three things from it: a
//! way to request a viewer-relative reference space, a way to request a
//! hit-test source bound to that space, and per-frame hit results. Requests
//! resolve through one-shot channels so the engine can poll them from the
//! frame loop without an executor.

use glam::Mat4;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Identifies one AR session, from start to end.
pub type SessionId = Uuid;

/// Error reported by the AR session capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArError {
    #[error("reference space '{0:?}' not supported")]
    UnsupportedReferenceSpace(ReferenceSpaceKind),
    #[error("hit-test source request rejected: {0}")]
    HitTestRejected(String),
    #[error("session ended")]
    SessionEnded,
}

/// Kind of reference space being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceSpaceKind {
    /// Origin tracks the viewer's head/device pose.
    Viewer,
    /// Origin fixed near the device's position at session start.
    Local,
}

/// Handle to a reference space granted by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSpace {
    pub session: SessionId,
    pub kind: ReferenceSpaceKind,
    pub handle: u64,
}

/// Handle to an active hit-test source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestSource {
    pub session: SessionId,
    pub space: ReferenceSpaceKind,
    pub handle: u64,
}

/// Pose of a detected real-world surface point, valid for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceHit {
    pub transform: Mat4,
}

impl SurfaceHit {
    #[must_use]
    pub fn new(transform: Mat4) -> Self {
        Self { transform }
    }
}

pub type ReferenceSpaceReply = oneshot::Receiver<Result<ReferenceSpace, ArError>>;
pub type HitTestSourceReply = oneshot::Receiver<Result<HitTestSource, ArError>>;

/// Requests the engine issues against a live AR session.
pub trait ArSession {
    /// Ask for a reference space of the given kind.
    fn request_reference_space(&mut self, session: SessionId, kind: ReferenceSpaceKind) -> ReferenceSpaceReply;

    /// Ask for a hit-test source casting from the origin of `space`.
    fn request_hit_test_source(&mut self, space: ReferenceSpace) -> HitTestSourceReply;
}

/// One tracked frame handed to the engine by the frame driver.
pub trait TrackingFrame {
    /// Ranked surface intersections for `source`, best first.
    fn hit_test_results(&self, source: &HitTestSource) -> Vec<SurfaceHit>;
}

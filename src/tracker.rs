//! Surface tracking: drives the hit-test source lifecycle and the reticle.
//!
//! Each AR session requests its hit-test source exactly once. The request is
//! a two-step pipeline (viewer reference space, then a hit-test source bound
//! to it) that resolves asynchronously; the tracker polls it from the frame
//! loop and only starts querying hits once the source is live. Ending the
//! session drops whatever is still in flight and re-arms the request for the
//! next session.

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tracker_test;

use glam::Mat4;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::engine::Action;
use crate::xr::{
    ArSession, HitTestSource, HitTestSourceReply, ReferenceSpaceKind, ReferenceSpaceReply, SessionId, TrackingFrame,
};

/// Reticle visibility and pose, as last reported to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReticleState {
    pub visible: bool,
    pub pose: Mat4,
}

impl Default for ReticleState {
    fn default() -> Self {
        Self { visible: false, pose: Mat4::IDENTITY }
    }
}

/// Where the per-session hit-test source request stands.
#[derive(Debug, Default)]
pub enum HitTestStage {
    /// Nothing requested yet for this session.
    #[default]
    Unrequested,
    /// Waiting on the viewer reference space.
    AwaitingReferenceSpace(ReferenceSpaceReply),
    /// Reference space granted; waiting on the hit-test source.
    AwaitingHitTestSource(HitTestSourceReply),
    /// Source is live and queried every frame.
    Active(HitTestSource),
    /// The request failed. Not retried until the next session.
    Failed,
}

impl HitTestStage {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

struct LiveSession {
    id: SessionId,
    capability: Box<dyn ArSession>,
}

/// Tracks the best surface under the view center and mirrors it onto the reticle.
#[derive(Default)]
pub struct SurfaceTracker {
    session: Option<LiveSession>,
    stage: HitTestStage,
    reticle: ReticleState,
    surface_acquired: bool,
}

impl SurfaceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin tracking for a new session. Any previous session is ended first.
    pub fn start_session(&mut self, id: SessionId, capability: Box<dyn ArSession>) -> Vec<Action> {
        let actions = self.end_session();
        info!(session = %id, "ar session started");
        self.session = Some(LiveSession { id, capability });
        actions
    }

    /// Stop querying, drop in-flight requests, and re-arm the one-time request.
    pub fn end_session(&mut self) -> Vec<Action> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        info!(session = %session.id, "ar session ended");
        self.stage = HitTestStage::Unrequested;
        self.surface_acquired = false;
        self.hide_reticle().into_iter().collect()
    }

    /// Run one frame of tracking.
    ///
    /// `frame` is `None` when the driver has no tracking data this frame; the
    /// reticle is left as-is in that case.
    pub fn on_frame(&mut self, frame: Option<&dyn TrackingFrame>) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(frame) = frame else {
            return actions;
        };
        if self.session.is_none() {
            return actions;
        }

        self.advance_request();

        let HitTestStage::Active(source) = &self.stage else {
            actions.extend(self.hide_reticle());
            return actions;
        };

        let hits = frame.hit_test_results(source);
        match hits.first() {
            Some(hit) => {
                if !self.surface_acquired {
                    self.surface_acquired = true;
                    actions.push(Action::SurfaceAcquired);
                }
                if !self.reticle.visible || self.reticle.pose != hit.transform {
                    self.reticle = ReticleState { visible: true, pose: hit.transform };
                    actions.push(Action::ReticleUpdated { visible: true, pose: hit.transform });
                }
            }
            None => actions.extend(self.hide_reticle()),
        }
        actions
    }

    /// Hide the reticle, returning the update to report if it was visible.
    pub fn hide_reticle(&mut self) -> Option<Action> {
        if !self.reticle.visible {
            return None;
        }
        self.reticle.visible = false;
        Some(Action::ReticleUpdated { visible: false, pose: self.reticle.pose })
    }

    #[must_use]
    pub fn reticle(&self) -> ReticleState {
        self.reticle
    }

    #[must_use]
    pub fn stage(&self) -> &HitTestStage {
        &self.stage
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    #[must_use]
    pub fn surface_acquired(&self) -> bool {
        self.surface_acquired
    }

    /// Move the request pipeline forward as far as completed replies allow.
    fn advance_request(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if matches!(self.stage, HitTestStage::Unrequested) {
            debug!(session = %session.id, "requesting viewer reference space");
            let rx = session.capability.request_reference_space(session.id, ReferenceSpaceKind::Viewer);
            self.stage = HitTestStage::AwaitingReferenceSpace(rx);
        }

        if let HitTestStage::AwaitingReferenceSpace(rx) = &mut self.stage {
            match rx.try_recv() {
                Ok(Ok(space)) if space.session == session.id => {
                    debug!(session = %session.id, "reference space granted; requesting hit-test source");
                    let rx = session.capability.request_hit_test_source(space);
                    self.stage = HitTestStage::AwaitingHitTestSource(rx);
                }
                Ok(Ok(space)) => {
                    warn!(session = %session.id, stale = %space.session, "discarding stale reference space");
                    self.stage = HitTestStage::Failed;
                }
                Ok(Err(e)) => {
                    warn!(session = %session.id, error = %e, "reference space request failed");
                    self.stage = HitTestStage::Failed;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    warn!(session = %session.id, "reference space request dropped");
                    self.stage = HitTestStage::Failed;
                }
            }
        }

        if let HitTestStage::AwaitingHitTestSource(rx) = &mut self.stage {
            match rx.try_recv() {
                Ok(Ok(source)) if source.session == session.id => {
                    info!(session = %session.id, "hit-test source active");
                    self.stage = HitTestStage::Active(source);
                }
                Ok(Ok(source)) => {
                    warn!(session = %session.id, stale = %source.session, "discarding stale hit-test source");
                    self.stage = HitTestStage::Failed;
                }
                Ok(Err(e)) => {
                    warn!(session = %session.id, error = %e, "hit-test source request failed");
                    self.stage = HitTestStage::Failed;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    warn!(session = %session.id, "hit-test source request dropped");
                    self.stage = HitTestStage::Failed;
                }
            }
        }
    }
}

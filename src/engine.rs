use glam::Mat4;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::camera::{PerspectiveCamera, Point, Viewport};
use crate::catalog::{AssetLoader, ModelCatalog};
use crate::config::EngineConfig;
use crate::input::{GestureController, GestureState};
use crate::placement::{PlacementController, PlacementError};
use crate::scene::{ObjectId, PlacedObject, SceneStore, Transform};
use crate::tracker::{ReticleState, SurfaceTracker};
use crate::xr::{ArSession, SessionId, TrackingFrame};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine handlers for the host to apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// A model template finished loading and can now be placed.
    ModelLoaded { model: String },
    /// First surface hit of the session; the host hides its scanning hint.
    SurfaceAcquired,
    /// Reticle visibility or pose changed.
    ReticleUpdated { visible: bool, pose: Mat4 },
    /// A new instance was inserted into the scene.
    ObjectPlaced(PlacedObject),
    /// An existing instance changed its transform.
    ObjectTransformed { id: ObjectId, transform: Transform },
    /// An instance was removed from the scene.
    ObjectRemoved { id: ObjectId },
    /// Viewport and camera aspect changed.
    ViewportResized { viewport: Viewport, aspect: f32 },
}

/// Core engine state. Owns everything the frame loop and input handlers touch.
pub struct EngineCore {
    pub config: EngineConfig,
    pub tracker: SurfaceTracker,
    pub catalog: ModelCatalog,
    pub scene: SceneStore,
    pub placement: PlacementController,
    pub gestures: GestureController,
    pub camera: PerspectiveCamera,
    pub viewport: Viewport,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            tracker: SurfaceTracker::new(),
            catalog: ModelCatalog::new(),
            scene: SceneStore::new(),
            placement: PlacementController::new(config.default_model.clone(), config.placement_options()),
            gestures: GestureController::new(config.rotate_px_per_radian),
            camera: PerspectiveCamera::with_fov(config.fov_degrees),
            viewport: Viewport::default(),
            config,
        }
    }

    // --- Assets ---

    /// Request every configured model asset from `loader`.
    pub fn start_loading(&mut self, loader: &mut dyn AssetLoader) {
        self.catalog.request_all(loader, &self.config.model_paths);
    }

    /// Drain completed model loads into the catalog.
    pub fn poll_loads(&mut self) -> Vec<Action> {
        self.catalog
            .poll()
            .into_iter()
            .map(|model| Action::ModelLoaded { model })
            .collect()
    }

    // --- Session lifecycle ---

    /// Start an AR session, ending any session still live.
    pub fn on_session_start(&mut self, capability: Box<dyn ArSession>) -> (SessionId, Vec<Action>) {
        let id = Uuid::new_v4();
        let actions = self.tracker.start_session(id, capability);
        (id, actions)
    }

    pub fn on_session_end(&mut self) -> Vec<Action> {
        self.tracker.end_session()
    }

    // --- Frame ---

    /// Per-frame callback from the frame driver.
    pub fn on_frame(&mut self, frame: Option<&dyn TrackingFrame>) -> Vec<Action> {
        let mut actions = self.poll_loads();
        actions.extend(self.tracker.on_frame(frame));
        actions
    }

    // --- Placement ---

    /// Discrete select trigger.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::ModelNotReady`] when the selected model has
    /// not loaded yet; nothing is placed and the reticle stays up.
    pub fn on_select(&mut self) -> Result<Vec<Action>, PlacementError> {
        let reticle = self.tracker.reticle();
        let mut actions = self.placement.on_select(reticle.visible, reticle.pose, &self.catalog, &mut self.scene)?;
        if !actions.is_empty() {
            actions.extend(self.tracker.hide_reticle());
        }
        Ok(actions)
    }

    /// The model picker changed.
    pub fn select_model(&mut self, model: &str) -> Vec<Action> {
        self.placement.select_model(model, &mut self.scene)
    }

    // --- Touch ---

    pub fn on_touch_start(&mut self, touches: &[Point]) {
        let placed = self.placement.placed().and_then(|id| self.scene.get(&id));
        self.gestures.on_touch_start(touches, placed);
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        let placed = self.placement.placed().and_then(|id| self.scene.get_mut(&id));
        self.gestures.on_touch_move(touches, placed).into_iter().collect()
    }

    pub fn on_touch_end(&mut self) {
        self.gestures.on_touch_end();
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio.
    ///
    /// The new size is always reported; a zero-area viewport keeps the
    /// previous camera aspect.
    pub fn on_resize(&mut self, width: f64, height: f64, dpr: f64) -> Vec<Action> {
        let viewport = Viewport { width, height, dpr };
        self.viewport = viewport;
        if !self.camera.set_viewport(viewport) {
            debug!(width, height, "degenerate viewport; keeping camera aspect");
        }
        info!(width, height, dpr, aspect = self.camera.aspect, "viewport resized");
        vec![Action::ViewportResized { viewport, aspect: self.camera.aspect }]
    }

    // --- Queries ---

    #[must_use]
    pub fn reticle(&self) -> ReticleState {
        self.tracker.reticle()
    }

    #[must_use]
    pub fn selected_model(&self) -> &str {
        self.placement.selected_model()
    }

    /// The instance placed during the current selection epoch.
    #[must_use]
    pub fn placed_object(&self) -> Option<&PlacedObject> {
        self.placement.placed().and_then(|id| self.scene.get(&id))
    }

    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.tracker.session_id()
    }
}

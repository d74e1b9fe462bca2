//! Tap-to-place: one model instance per selection epoch.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use glam::{Mat4, Vec3};
use tracing::{info, warn};

use crate::catalog::ModelCatalog;
use crate::engine::Action;
use crate::scene::{ObjectId, SceneStore};

/// Error returned by [`PlacementController::on_select`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// The selected model has not finished loading.
    #[error("model not ready: {model}")]
    ModelNotReady { model: String },
}

/// Placement knobs, split out of the engine config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    /// Uniform scale applied to each new instance.
    pub scale: f32,
    /// Remove the previous epoch's instance from the scene on selection change.
    pub retract_on_reselect: bool,
}

/// Selected model plus the instance placed for it, if any.
#[derive(Debug, Clone)]
pub struct PlacementController {
    selected_model: String,
    placed: Option<ObjectId>,
    options: PlacementOptions,
}

impl PlacementController {
    #[must_use]
    pub fn new(selected_model: impl Into<String>, options: PlacementOptions) -> Self {
        Self { selected_model: selected_model.into(), placed: None, options }
    }

    #[must_use]
    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    /// The instance placed during the current epoch.
    #[must_use]
    pub fn placed(&self) -> Option<ObjectId> {
        self.placed
    }

    /// Place the selected model at `reticle_pose`.
    ///
    /// Does nothing unless the reticle is visible and nothing has been placed
    /// yet this epoch. The caller hides the reticle when this returns a
    /// non-empty action list.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::ModelNotReady`] if the selected model is not
    /// in `catalog` yet. No state changes in that case.
    pub fn on_select(
        &mut self,
        reticle_visible: bool,
        reticle_pose: Mat4,
        catalog: &ModelCatalog,
        scene: &mut SceneStore,
    ) -> Result<Vec<Action>, PlacementError> {
        if !reticle_visible || self.placed.is_some() {
            return Ok(Vec::new());
        }
        let Some(template) = catalog.get(&self.selected_model) else {
            warn!(model = %self.selected_model, "select ignored; model not loaded yet");
            return Err(PlacementError::ModelNotReady { model: self.selected_model.clone() });
        };

        let mut obj = template.instantiate();
        obj.transform.position = reticle_pose.w_axis.truncate();
        obj.transform.scale = Vec3::splat(self.options.scale);

        info!(model = %obj.model, id = %obj.id, position = ?obj.transform.position, "placed instance");
        let id = scene.insert(obj);
        self.placed = Some(id);
        Ok(scene.get(&id).cloned().map(Action::ObjectPlaced).into_iter().collect())
    }

    /// Switch the selected model, starting a new epoch when it changes.
    pub fn select_model(&mut self, model: &str, scene: &mut SceneStore) -> Vec<Action> {
        if model == self.selected_model {
            return Vec::new();
        }
        info!(from = %self.selected_model, to = %model, "model selection changed");
        self.selected_model = model.to_string();

        let Some(previous) = self.placed.take() else {
            return Vec::new();
        };
        if !self.options.retract_on_reselect {
            return Vec::new();
        }
        match scene.remove(&previous) {
            Some(_) => vec![Action::ObjectRemoved { id: previous }],
            None => Vec::new(),
        }
    }
}

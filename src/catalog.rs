//! Model catalog and asynchronous asset loading.
//!
//! Templates arrive out of order from an [`AssetLoader`]; the engine keeps one
//! pending receiver per requested path and drains them once per frame. A
//! template is keyed by its own `name` (the scene name baked into the asset),
//! not by the path it was requested from.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::scene::{PlacedObject, Transform};

/// Error reported by an [`AssetLoader`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("asset decode failed for {path}: {message}")]
    Decode { path: String, message: String },
}

/// A loaded, clonable model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTemplate {
    /// Catalog key.
    pub name: String,
    /// Path the asset was loaded from.
    pub asset_path: String,
    /// Transform baked into the asset's root node.
    #[serde(default)]
    pub base: Transform,
}

impl ModelTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>, asset_path: impl Into<String>) -> Self {
        Self { name: name.into(), asset_path: asset_path.into(), base: Transform::default() }
    }

    /// Produce a fresh scene instance of this template.
    #[must_use]
    pub fn instantiate(&self) -> PlacedObject {
        PlacedObject {
            id: Uuid::new_v4(),
            model: self.name.clone(),
            asset_path: self.asset_path.clone(),
            transform: self.base,
            seq: 0,
        }
    }
}

/// Loads a model asset by path, resolving asynchronously.
pub trait AssetLoader {
    fn load(&mut self, path: &str) -> oneshot::Receiver<Result<ModelTemplate, AssetError>>;
}

struct PendingLoad {
    path: String,
    rx: oneshot::Receiver<Result<ModelTemplate, AssetError>>,
}

/// Read-mostly map from model identifier to template, plus in-flight loads.
#[derive(Default)]
pub struct ModelCatalog {
    templates: HashMap<String, ModelTemplate>,
    pending: Vec<PendingLoad>,
}

impl ModelCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request every path from `loader`. Each path is requested once per call.
    pub fn request_all<L: AssetLoader + ?Sized>(&mut self, loader: &mut L, paths: &[String]) {
        for path in paths {
            info!(%path, "requesting model asset");
            let rx = loader.load(path);
            self.pending.push(PendingLoad { path: path.clone(), rx });
        }
    }

    /// Drain every load that has completed since the last poll.
    ///
    /// Returns the names of templates inserted by this call, in completion
    /// order. Failed or abandoned loads are logged and dropped.
    pub fn poll(&mut self) -> Vec<String> {
        let mut loaded = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut load in self.pending.drain(..) {
            match load.rx.try_recv() {
                Ok(Ok(template)) => {
                    info!(model = %template.name, path = %load.path, "model asset loaded");
                    loaded.push(template.name.clone());
                    self.templates.insert(template.name.clone(), template);
                }
                Ok(Err(e)) => {
                    warn!(error = %e, path = %load.path, "model asset failed to load");
                }
                Err(TryRecvError::Empty) => still_pending.push(load),
                Err(TryRecvError::Closed) => {
                    warn!(path = %load.path, "model loader dropped request without a result");
                }
            }
        }
        self.pending = still_pending;
        loaded
    }

    /// Insert a template directly, replacing any previous one with the same name.
    pub fn insert(&mut self, template: ModelTemplate) {
        self.templates.insert(template.name.clone(), template);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModelTemplate> {
        self.templates.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Loaded model names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Number of loads requested but not yet resolved.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

//! Scene model: transforms, placed objects, and the in-memory scene mirror.
//!
//! The host renderer owns the real scene graph. This module keeps a mirror of
//! every object the engine has inserted into it (`SceneStore`), so gestures
//! can be applied to a concrete transform and the resulting state can be
//! inspected without a renderer. Each mutation is reported back to the host as
//! an [`crate::engine::Action`].

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an object inserted into the host scene.
pub type ObjectId = Uuid;

/// Position, Euler rotation, and per-axis scale of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation in meters, in the AR reference space.
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Per-axis scale factors.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Vec3::ZERO, scale: Vec3::ONE }
    }
}

impl Transform {
    /// Compose scale, rotation, and translation into a single matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    /// Multiply every scale axis by `factor`.
    pub fn scale_by(&mut self, factor: f32) {
        self.scale *= factor;
    }
}

/// A model instance living in the host scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    /// Unique identifier for this instance.
    pub id: ObjectId,
    /// Catalog key of the template this instance was cloned from.
    pub model: String,
    /// Asset path the template was loaded from.
    pub asset_path: String,
    /// Current transform.
    pub transform: Transform,
    /// Insertion counter assigned by [`SceneStore::insert`].
    #[serde(default)]
    pub seq: u64,
}

/// In-memory mirror of objects inserted into the host scene.
pub struct SceneStore {
    objects: HashMap<ObjectId, PlacedObject>,
    next_seq: u64,
}

impl SceneStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: HashMap::new(), next_seq: 0 }
    }

    /// Insert an object, stamping it with the next insertion counter. An
    /// object with the same `id` is overwritten.
    pub fn insert(&mut self, mut obj: PlacedObject) -> ObjectId {
        obj.seq = self.next_seq;
        self.next_seq += 1;
        let id = obj.id;
        self.objects.insert(id, obj);
        id
    }

    /// Remove an object by id, returning it if it was present.
    pub fn remove(&mut self, id: &ObjectId) -> Option<PlacedObject> {
        self.objects.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&PlacedObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut PlacedObject> {
        self.objects.get_mut(id)
    }

    /// Return all objects in insertion order.
    #[must_use]
    pub fn ordered_objects(&self) -> Vec<&PlacedObject> {
        let mut objs: Vec<&PlacedObject> = self.objects.values().collect();
        objs.sort_by_key(|o| o.seq);
        objs
    }

    /// Number of objects currently in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

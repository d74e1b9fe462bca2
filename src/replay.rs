//! Scripted event replay.
//!
//! A replay script is a JSON document listing host events in order (frames,
//! select triggers, touches, picker changes, resizes, session start/end). The
//! runner feeds them into an [`EngineCore`] backed by an in-memory AR session
//! and asset loader that answer every request immediately, and records each
//! emitted action. The `surface-replay` binary prints the records as JSON
//! lines.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::camera::Point;
use crate::catalog::{AssetError, AssetLoader, ModelTemplate};
use crate::config::{ConfigError, EngineConfig};
use crate::engine::{Action, EngineCore};
use crate::xr::{
    ArSession, HitTestSource, HitTestSourceReply, ReferenceSpace, ReferenceSpaceKind, ReferenceSpaceReply, SessionId,
    SurfaceHit, TrackingFrame,
};

/// Error returned while loading a replay script.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read script {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid script config: {0}")]
    Config(#[from] ConfigError),
}

/// A whole replay script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    /// Engine config; environment-derived config is used when absent.
    #[serde(default)]
    pub config: Option<EngineConfig>,
    /// Templates the scripted loader can serve, matched by `asset_path`.
    #[serde(default)]
    pub models: Vec<ModelTemplate>,
    /// Host events, in order.
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Parse a script from JSON text. An embedded config goes through the
    /// same range checks as one read from the environment.
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let script: Self = serde_json::from_str(text)?;
        if let Some(config) = &script.config {
            config.validate()?;
        }
        Ok(script)
    }

    /// Read and parse a script file.
    pub fn from_path(path: &str) -> Result<Self, ReplayError> {
        let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Read { path: path.to_string(), source })?;
        Self::from_json(&text)
    }
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Request every configured model asset.
    StartLoading,
    SessionStart,
    SessionEnd,
    /// A rendered frame. `hits` are surface positions, best first; `tracking`
    /// false means the driver had no tracking frame.
    Frame {
        #[serde(default)]
        hits: Vec<[f32; 3]>,
        #[serde(default = "default_tracking")]
        tracking: bool,
    },
    Select,
    SelectModel { model: String },
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    TouchEnd,
    Resize {
        width: f64,
        height: f64,
        #[serde(default = "default_dpr")]
        dpr: f64,
    },
}

fn default_tracking() -> bool {
    true
}

fn default_dpr() -> f64 {
    1.0
}

/// One line of replay output: the event index and what it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayRecord {
    Action { event: usize, action: Action },
    Error { event: usize, message: String },
}

/// Loader that serves templates from a fixed list and answers immediately.
pub struct ScriptedLoader {
    models: Vec<ModelTemplate>,
}

impl ScriptedLoader {
    #[must_use]
    pub fn new(models: Vec<ModelTemplate>) -> Self {
        Self { models }
    }
}

impl AssetLoader for ScriptedLoader {
    fn load(&mut self, path: &str) -> oneshot::Receiver<Result<ModelTemplate, AssetError>> {
        let (tx, rx) = oneshot::channel();
        let result = self
            .models
            .iter()
            .find(|m| m.asset_path == path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()));
        if tx.send(result).is_err() {
            debug!(%path, "load reply dropped before send");
        }
        rx
    }
}

/// AR session that grants every request on the spot.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    next_handle: u64,
}

impl ScriptedSession {
    fn handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl ArSession for ScriptedSession {
    fn request_reference_space(&mut self, session: SessionId, kind: ReferenceSpaceKind) -> ReferenceSpaceReply {
        let (tx, rx) = oneshot::channel();
        let space = ReferenceSpace { session, kind, handle: self.handle() };
        if tx.send(Ok(space)).is_err() {
            debug!("reference space reply dropped before send");
        }
        rx
    }

    fn request_hit_test_source(&mut self, space: ReferenceSpace) -> HitTestSourceReply {
        let (tx, rx) = oneshot::channel();
        let source = HitTestSource { session: space.session, space: space.kind, handle: self.handle() };
        if tx.send(Ok(source)).is_err() {
            debug!("hit-test source reply dropped before send");
        }
        rx
    }
}

/// Tracking frame with a fixed list of hits.
pub struct ScriptedFrame {
    hits: Vec<SurfaceHit>,
}

impl ScriptedFrame {
    #[must_use]
    pub fn from_positions(positions: &[[f32; 3]]) -> Self {
        let hits = positions
            .iter()
            .map(|p| SurfaceHit::new(Mat4::from_translation(Vec3::from_array(*p))))
            .collect();
        Self { hits }
    }
}

impl TrackingFrame for ScriptedFrame {
    fn hit_test_results(&self, _source: &HitTestSource) -> Vec<SurfaceHit> {
        self.hits.clone()
    }
}

/// Run `script` against a fresh engine built from `config`.
pub fn run_script(script: &Script, config: EngineConfig) -> (EngineCore, Vec<ReplayRecord>) {
    let mut engine = EngineCore::new(config);
    let mut loader = ScriptedLoader::new(script.models.clone());
    let mut records = Vec::new();

    for (event, step) in script.events.iter().enumerate() {
        let actions = match step {
            ScriptEvent::StartLoading => {
                engine.start_loading(&mut loader);
                engine.poll_loads()
            }
            ScriptEvent::SessionStart => engine.on_session_start(Box::new(ScriptedSession::default())).1,
            ScriptEvent::SessionEnd => engine.on_session_end(),
            ScriptEvent::Frame { hits, tracking } => {
                let scripted = ScriptedFrame::from_positions(hits);
                let frame: Option<&dyn TrackingFrame> = if *tracking { Some(&scripted) } else { None };
                engine.on_frame(frame)
            }
            ScriptEvent::Select => match engine.on_select() {
                Ok(actions) => actions,
                Err(e) => {
                    warn!(event, error = %e, "select failed");
                    records.push(ReplayRecord::Error { event, message: e.to_string() });
                    Vec::new()
                }
            },
            ScriptEvent::SelectModel { model } => engine.select_model(model),
            ScriptEvent::TouchStart { touches } => {
                engine.on_touch_start(touches);
                Vec::new()
            }
            ScriptEvent::TouchMove { touches } => engine.on_touch_move(touches),
            ScriptEvent::TouchEnd => {
                engine.on_touch_end();
                Vec::new()
            }
            ScriptEvent::Resize { width, height, dpr } => engine.on_resize(*width, *height, *dpr),
        };
        records.extend(actions.into_iter().map(|action| ReplayRecord::Action { event, action }));
    }

    (engine, records)
}

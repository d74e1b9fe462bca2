//! Tap-to-place AR core: surface tracking, placement, and touch gestures.
//!
//! The host owns the device session, the renderer, and the DOM. It forwards
//! the frame callback, select triggers, touch events, and resizes into an
//! [`engine::EngineCore`], then applies the returned [`engine::Action`]s to its
//! scene graph and UI. Asynchronous capabilities (reference space, hit-test
//! source, model loads) hand back one-shot replies that the engine polls from
//! the frame loop, so nothing here needs an executor.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`] and the [`engine::Action`] type |
//! | [`tracker`] | Hit-test source lifecycle and reticle state |
//! | [`placement`] | One placed instance per selection epoch |
//! | [`input`] | Touch gesture state machine (rotate / pinch-scale) |
//! | [`catalog`] | Model templates and asynchronous asset loading |
//! | [`scene`] | Transforms and the in-memory scene mirror |
//! | [`xr`] | AR session capability traits and handles |
//! | [`camera`] | Touch points, viewport, and perspective camera |
//! | [`replay`] | Scripted event replay against in-memory capabilities |
//! | [`config`] | Environment-driven engine configuration |
//! | [`consts`] | Shared numeric constants (placement scale, camera planes, etc.) |

pub mod camera;
pub mod catalog;
pub mod config;
pub mod consts;
pub mod engine;
pub mod input;
pub mod placement;
pub mod replay;
pub mod scene;
pub mod tracker;
pub mod xr;

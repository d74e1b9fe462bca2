//! Engine configuration parsed from environment variables.

use std::env::VarError;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{CAMERA_FOV_DEGREES, DEFAULT_MODEL, DEFAULT_MODEL_PATHS, PLACEMENT_SCALE, ROTATE_PX_PER_RADIAN};
use crate::placement::PlacementOptions;

/// Error returned when a configuration variable holds an invalid value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: '{value}' ({reason})")]
    Invalid { var: &'static str, value: String, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub placement_scale: f32,
    pub rotate_px_per_radian: f64,
    pub model_paths: Vec<String>,
    pub default_model: String,
    pub retract_on_reselect: bool,
    pub fov_degrees: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placement_scale: PLACEMENT_SCALE,
            rotate_px_per_radian: ROTATE_PX_PER_RADIAN,
            model_paths: DEFAULT_MODEL_PATHS.iter().map(ToString::to_string).collect(),
            default_model: DEFAULT_MODEL.to_string(),
            retract_on_reselect: true,
            fov_degrees: CAMERA_FOV_DEGREES,
        }
    }
}

impl EngineConfig {
    /// Build typed engine config from environment variables.
    ///
    /// Optional:
    /// - `SURFACE_PLACE_SCALE`: default 0.5
    /// - `SURFACE_PLACE_ROTATE_PX_PER_RADIAN`: default 100
    /// - `SURFACE_PLACE_MODELS`: comma-separated asset paths
    /// - `SURFACE_PLACE_DEFAULT_MODEL`: default `chair`
    /// - `SURFACE_PLACE_RETRACT_ON_RESELECT`: `true` (default) or `false`
    /// - `SURFACE_PLACE_FOV_DEGREES`: default 75
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_value)
    }

    /// Same as [`EngineConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let placement_scale =
            parse_positive("SURFACE_PLACE_SCALE", lookup("SURFACE_PLACE_SCALE"), defaults.placement_scale)?;
        let rotate_px_per_radian = parse_positive(
            "SURFACE_PLACE_ROTATE_PX_PER_RADIAN",
            lookup("SURFACE_PLACE_ROTATE_PX_PER_RADIAN"),
            defaults.rotate_px_per_radian,
        )?;
        let model_paths = match lookup("SURFACE_PLACE_MODELS") {
            Some(raw) => parse_paths(&raw)?,
            None => defaults.model_paths,
        };
        let default_model = lookup("SURFACE_PLACE_DEFAULT_MODEL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.default_model);
        let retract_on_reselect =
            parse_bool("SURFACE_PLACE_RETRACT_ON_RESELECT", lookup("SURFACE_PLACE_RETRACT_ON_RESELECT"), true)?;
        let fov_degrees =
            parse_positive("SURFACE_PLACE_FOV_DEGREES", lookup("SURFACE_PLACE_FOV_DEGREES"), defaults.fov_degrees)?;

        let config =
            Self { placement_scale, rotate_px_per_radian, model_paths, default_model, retract_on_reselect, fov_degrees };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges. Errors name the environment variable backing the
    /// offending field, whichever way the config was built.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a non-positive or non-finite
    /// scale, sensitivity or field of view, a field of view of 180 degrees
    /// or more, or an empty model list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.placement_scale.is_positive_finite() {
            return Err(ConfigError::Invalid {
                var: "SURFACE_PLACE_SCALE",
                value: self.placement_scale.to_string(),
                reason: MUST_BE_POSITIVE,
            });
        }
        if !self.rotate_px_per_radian.is_positive_finite() {
            return Err(ConfigError::Invalid {
                var: "SURFACE_PLACE_ROTATE_PX_PER_RADIAN",
                value: self.rotate_px_per_radian.to_string(),
                reason: MUST_BE_POSITIVE,
            });
        }
        if !self.fov_degrees.is_positive_finite() {
            return Err(ConfigError::Invalid {
                var: "SURFACE_PLACE_FOV_DEGREES",
                value: self.fov_degrees.to_string(),
                reason: MUST_BE_POSITIVE,
            });
        }
        if self.fov_degrees >= 180.0 {
            return Err(ConfigError::Invalid {
                var: "SURFACE_PLACE_FOV_DEGREES",
                value: self.fov_degrees.to_string(),
                reason: "must be below 180",
            });
        }
        if self.model_paths.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                var: "SURFACE_PLACE_MODELS",
                value: self.model_paths.join(","),
                reason: "no asset paths listed",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn placement_options(&self) -> PlacementOptions {
        PlacementOptions { scale: self.placement_scale, retract_on_reselect: self.retract_on_reselect }
    }
}

const MUST_BE_POSITIVE: &str = "must be finite and greater than zero";

trait PositiveFloat: std::str::FromStr + Copy {
    fn is_positive_finite(self) -> bool;
}

impl PositiveFloat for f32 {
    fn is_positive_finite(self) -> bool {
        self.is_finite() && self > 0.0
    }
}

impl PositiveFloat for f64 {
    fn is_positive_finite(self) -> bool {
        self.is_finite() && self > 0.0
    }
}

fn env_value(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(_)) => {
            warn!(var = key, "ignoring non-unicode environment value");
            None
        }
    }
}

fn parse_positive<T: PositiveFloat>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value = raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        var,
        value: raw.clone(),
        reason: "not a number",
    })?;
    if !value.is_positive_finite() {
        return Err(ConfigError::Invalid { var, value: raw, reason: MUST_BE_POSITIVE });
    }
    Ok(value)
}

fn parse_bool(var: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None => Ok(default),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(ConfigError::Invalid { var, value: other.to_string(), reason: "expected true or false" }),
    }
}

fn parse_paths(raw: &str) -> Result<Vec<String>, ConfigError> {
    let paths: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToString::to_string)
        .collect();
    if paths.is_empty() {
        return Err(ConfigError::Invalid {
            var: "SURFACE_PLACE_MODELS",
            value: raw.to_string(),
            reason: "no asset paths listed",
        });
    }
    Ok(paths)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

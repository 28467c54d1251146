//! Layout engine configuration.
//!
//! [`LayoutConfig`] captures the grid width, the collision policy and the
//! search bounds used by the placement algorithm. It can be loaded from TOML
//! or JSON when the `policy-config` feature is enabled:
//!
//! ```toml
//! cols = 12
//! collision_policy = "relocate_mover"
//! max_scan_rows = 1000
//! push_down_iterations = 10000
//! ```
//!
//! Every field defaults, so a partial file only overrides what it names.

use std::fmt;
#[cfg(feature = "policy-config")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::{CollisionPolicy, DEFAULT_COLS, DEFAULT_MAX_SCAN_ROWS, DEFAULT_PUSH_DOWN_ITERATIONS};

/// Tunables for placement and collision resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of grid columns.
    pub cols: u32,
    /// How move/resize collisions are resolved.
    pub collision_policy: CollisionPolicy,
    /// Row bound for the skyline scan.
    pub max_scan_rows: u32,
    /// Row-nudge budget for [`CollisionPolicy::PushDown`].
    pub push_down_iterations: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            collision_policy: CollisionPolicy::default(),
            max_scan_rows: DEFAULT_MAX_SCAN_ROWS,
            push_down_iterations: DEFAULT_PUSH_DOWN_ITERATIONS,
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn with_cols(mut self, cols: u32) -> Self {
        self.cols = cols;
        self
    }

    #[must_use]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    #[must_use]
    pub fn with_max_scan_rows(mut self, rows: u32) -> Self {
        self.max_scan_rows = rows;
        self
    }

    /// Column count actually used by the engine (never zero).
    #[inline]
    #[must_use]
    pub const fn effective_cols(&self) -> u32 {
        if self.cols == 0 { 1 } else { self.cols }
    }

    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, LayoutConfigError> {
        toml::from_str(s).map_err(LayoutConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LayoutConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LayoutConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, LayoutConfigError> {
        serde_json::from_str(s).map_err(LayoutConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LayoutConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LayoutConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.cols == 0 {
            errors.push("cols must be > 0".into());
        }
        if self.max_scan_rows == 0 {
            errors.push("max_scan_rows must be > 0".into());
        }
        if self.push_down_iterations == 0 {
            errors.push("push_down_iterations must be > 0".into());
        }
        errors
    }

    /// Return `self` if valid, otherwise the collected problems.
    pub fn validated(self) -> Result<Self, LayoutConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(LayoutConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`LayoutConfig`].
#[derive(Debug)]
pub enum LayoutConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for LayoutConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "layout config validation failed: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for LayoutConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

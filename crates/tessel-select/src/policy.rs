//! Selection policy: scoring weights, selection size and category coverage.
//!
//! ```toml
//! max = 6
//! required_categories = ["insight", "action", "learn"]
//! mobile_only = false
//!
//! [weights]
//! alpha = 0.6
//! beta = 0.3
//! gamma = 0.1
//! ```

use std::fmt;
#[cfg(feature = "policy-config")]
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ALPHA: f64 = 0.6;
pub const DEFAULT_BETA: f64 = 0.3;
pub const DEFAULT_GAMMA: f64 = 0.1;
pub const DEFAULT_MAX: usize = 8;
pub const DEFAULT_REQUIRED_CATEGORIES: [&str; 3] = ["insight", "action", "learn"];

/// Blend of stage fit (`alpha`), behavioral signal (`beta`) and catalog
/// priority (`gamma`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionWeights {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl SelectionWeights {
    #[must_use]
    pub const fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }
}

/// Everything about a selection run except its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    pub weights: SelectionWeights,
    pub max: usize,
    pub required_categories: Vec<String>,
    /// Only consider `mobile_friendly` catalog entries.
    pub mobile_only: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            weights: SelectionWeights::default(),
            max: DEFAULT_MAX,
            required_categories: DEFAULT_REQUIRED_CATEGORIES
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            mobile_only: false,
        }
    }
}

impl SelectionPolicy {
    #[must_use]
    pub fn with_weights(mut self, weights: SelectionWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_required_categories<S: Into<String>>(
        mut self,
        categories: impl IntoIterator<Item = S>,
    ) -> Self {
        self.required_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_mobile_only(mut self, mobile_only: bool) -> Self {
        self.mobile_only = mobile_only;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, SelectionPolicyError> {
        toml::from_str(s).map_err(SelectionPolicyError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SelectionPolicyError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SelectionPolicyError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, SelectionPolicyError> {
        serde_json::from_str(s).map_err(SelectionPolicyError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SelectionPolicyError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SelectionPolicyError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, value) in [
            ("alpha", self.weights.alpha),
            ("beta", self.weights.beta),
            ("gamma", self.weights.gamma),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("weights.{name} must be finite and >= 0, got {value}"));
            }
        }
        if self.max == 0 {
            errors.push("max must be > 0".into());
        }
        for (i, category) in self.required_categories.iter().enumerate() {
            if category.trim().is_empty() {
                errors.push(format!("required_categories[{i}] is empty"));
            } else if self.required_categories[..i].contains(category) {
                errors.push(format!("required_categories[{i}] duplicates {category:?}"));
            }
        }
        errors
    }

    /// Return `self` if valid, otherwise the collected problems.
    pub fn validated(self) -> Result<Self, SelectionPolicyError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SelectionPolicyError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`SelectionPolicy`].
#[derive(Debug)]
pub enum SelectionPolicyError {
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

impl fmt::Display for SelectionPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "selection policy validation failed: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SelectionPolicyError {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_weights() {
        let policy = SelectionPolicy::default();
        assert_eq!(policy.weights, SelectionWeights::new(0.6, 0.3, 0.1));
        assert_eq!(policy.max, 8);
        assert_eq!(policy.required_categories, ["insight", "action", "learn"]);
        assert!(!policy.mobile_only);
        assert!(policy.validate().is_empty());
    }

    #[test]
    fn invalid_values_are_all_reported() {
        let policy = SelectionPolicy::default()
            .with_weights(SelectionWeights::new(f64::NAN, -1.0, 0.1))
            .with_max(0)
            .with_required_categories(["learn", " ", "learn"]);
        let errors = policy.validate();
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(matches!(
            policy.validated(),
            Err(SelectionPolicyError::Validation(list)) if list.len() == 5
        ));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let policy: SelectionPolicy =
            serde_json::from_str(r#"{"max":4,"weights":{"beta":0.5}}"#).unwrap();
        assert_eq!(policy.max, 4);
        assert_eq!(policy.weights.alpha, DEFAULT_ALPHA);
        assert_eq!(policy.weights.beta, 0.5);
        assert_eq!(policy.required_categories.len(), 3);
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn toml_loader_reads_nested_weights() {
        let policy = SelectionPolicy::from_toml_str(
            "max = 6\nmobile_only = true\n\n[weights]\nalpha = 0.5\n",
        )
        .unwrap();
        assert_eq!(policy.max, 6);
        assert!(policy.mobile_only);
        assert_eq!(policy.weights.alpha, 0.5);
        assert_eq!(policy.weights.gamma, DEFAULT_GAMMA);
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn file_loaders_read_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"required_categories": ["learn"]}}"#).unwrap();
        let policy = SelectionPolicy::from_json_file(file.path()).unwrap();
        assert_eq!(policy.required_categories, ["learn"]);

        let missing = SelectionPolicy::from_toml_file("/nonexistent/tessel-select.toml");
        assert!(matches!(missing, Err(SelectionPolicyError::Io(_))));
    }
}

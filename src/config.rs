use serde::{Deserialize, Serialize};

/// Confidence levels reported when none are configured.
pub const DEFAULT_CONFIDENCE_LEVELS: [f64; 3] = [80.0, 90.0, 95.0];

/// How dependency names without a matching activity are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedDependencyPolicy {
    /// Fail the computation with `ScheduleError::UnresolvedDependency`.
    #[default]
    Reject,
    /// Drop the reference and log a warning.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_confidence_levels")]
    pub confidence_levels: Vec<f64>,
    #[serde(default)]
    pub unresolved_dependencies: UnresolvedDependencyPolicy,
    /// Fail computations on field-level validation issues instead of only reporting them.
    #[serde(default)]
    pub enforce_field_validation: bool,
}

fn default_confidence_levels() -> Vec<f64> {
    DEFAULT_CONFIDENCE_LEVELS.to_vec()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_levels: default_confidence_levels(),
            unresolved_dependencies: UnresolvedDependencyPolicy::default(),
            enforce_field_validation: false,
        }
    }
}

impl EngineConfig {
    pub fn with_unresolved_dependencies(mut self, policy: UnresolvedDependencyPolicy) -> Self {
        self.unresolved_dependencies = policy;
        self
    }

    pub fn with_confidence_levels(mut self, levels: impl Into<Vec<f64>>) -> Self {
        self.confidence_levels = levels.into();
        self
    }

    pub fn with_enforced_field_validation(mut self, enforce: bool) -> Self {
        self.enforce_field_validation = enforce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.confidence_levels, vec![80.0, 90.0, 95.0]);
        assert_eq!(config.unresolved_dependencies, UnresolvedDependencyPolicy::Reject);
    }

    #[test]
    fn policy_uses_snake_case_names() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"unresolved_dependencies":"ignore"}"#).unwrap();
        assert_eq!(config.unresolved_dependencies, UnresolvedDependencyPolicy::Ignore);
    }
}

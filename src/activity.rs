use serde::{Deserialize, Serialize};

/// A unit of work with a three-point duration estimate.
///
/// Dependencies reference other activities by `name`, so names must stay unique
/// across a project. Renaming an activity without rewriting the references that
/// point at it breaks those dependents; see `SchedulingStore::rename_activity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i32,
    pub name: String,
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Activity {
    /// Blank activity as produced by the "add" action; fails validation until edited.
    pub fn new(id: i32) -> Self {
        Self {
            id,
            name: String::new(),
            optimistic: 0.0,
            most_likely: 0.0,
            pessimistic: 0.0,
            dependencies: Vec::new(),
        }
    }

    pub fn with_estimates(
        id: i32,
        name: impl Into<String>,
        optimistic: f64,
        most_likely: f64,
        pessimistic: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            optimistic,
            most_likely,
            pessimistic,
            dependencies: Vec::new(),
        }
    }

    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = names.into_iter().map(Into::into).collect();
        self
    }

    /// PERT mean `(o + 4m + p) / 6`, unrounded.
    pub fn mean_duration(&self) -> f64 {
        (self.optimistic + 4.0 * self.most_likely + self.pessimistic) / 6.0
    }

    /// Expected duration in whole days.
    pub fn expected_duration(&self) -> i64 {
        self.mean_duration().round() as i64
    }

    /// `((p - o) / 6)^2`
    pub fn variance(&self) -> f64 {
        let spread = (self.pessimistic - self.optimistic) / 6.0;
        spread * spread
    }

    pub fn apply(&mut self, patch: ActivityPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(optimistic) = patch.optimistic {
            self.optimistic = optimistic;
        }
        if let Some(most_likely) = patch.most_likely {
            self.most_likely = most_likely;
        }
        if let Some(pessimistic) = patch.pessimistic {
            self.pessimistic = pessimistic;
        }
        if let Some(dependencies) = patch.dependencies {
            self.dependencies = dependencies;
        }
    }
}

/// Partial update of an activity. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimistic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_likely: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pessimistic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
}

impl ActivityPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn estimates(optimistic: f64, most_likely: f64, pessimistic: f64) -> Self {
        Self {
            optimistic: Some(optimistic),
            most_likely: Some(most_likely),
            pessimistic: Some(pessimistic),
            ..Self::default()
        }
    }

    pub fn dependencies<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dependencies: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.optimistic.is_none()
            && self.most_likely.is_none()
            && self.pessimistic.is_none()
            && self.dependencies.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_duration_rounds_pert_mean() {
        let a = Activity::with_estimates(1, "A", 1.0, 2.0, 3.0);
        assert_eq!(a.expected_duration(), 2);

        // (1 + 8 + 6) / 6 = 2.5 rounds away from zero
        let b = Activity::with_estimates(2, "B", 1.0, 2.0, 6.0);
        assert_eq!(b.expected_duration(), 3);
    }

    #[test]
    fn variance_uses_range_over_six() {
        let a = Activity::with_estimates(1, "A", 2.0, 3.0, 4.0);
        assert!((a.variance() - 1.0 / 9.0).abs() < 1e-12);
        let flat = Activity::with_estimates(2, "C", 1.0, 1.0, 1.0);
        assert_eq!(flat.variance(), 0.0);
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut a = Activity::with_estimates(1, "A", 1.0, 2.0, 3.0).depends_on(["X"]);
        a.apply(ActivityPatch {
            pessimistic: Some(9.0),
            ..ActivityPatch::default()
        });
        assert_eq!(a.name, "A");
        assert_eq!(a.optimistic, 1.0);
        assert_eq!(a.pessimistic, 9.0);
        assert_eq!(a.dependencies, vec!["X".to_string()]);

        a.apply(ActivityPatch::dependencies(Vec::<String>::new()));
        assert!(a.dependencies.is_empty());
        assert!(ActivityPatch::default().is_empty());
    }
}

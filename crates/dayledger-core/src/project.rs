//! Title to project lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Static mapping from event titles to project labels.
///
/// Lookups are exact and case-sensitive; unmapped titles resolve to the
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectMapping {
    projects: BTreeMap<String, String>,
}

impl ProjectMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a title mapping.
    pub fn with_project(mut self, title: impl Into<String>, project: impl Into<String>) -> Self {
        self.projects.insert(title.into(), project.into());
        self
    }

    /// Resolves the project for a title.
    pub fn resolve(&self, title: &str) -> &str {
        self.projects.get(title).map(String::as_str).unwrap_or("")
    }

    /// Returns the number of mapped titles.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Returns true if no title is mapped.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ProjectMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            projects: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

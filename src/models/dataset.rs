//! Dataset catalog records.

use serde::{Deserialize, Serialize};

use crate::core::host::GridItem;

/// Episode/frame counts published with a dataset.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Statistics {
    #[serde(default)]
    pub total_episodes: Option<u64>,
    #[serde(default)]
    pub total_frames: Option<u64>,
}

/// One catalog entry. `path` is its unique, stable identity.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub path: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub robot: Option<String>,
    /// Preformatted size label (e.g. "12.4 GB").
    #[serde(default)]
    pub dataset_size: Option<String>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
    #[serde(default)]
    pub scenes: Vec<String>,
    #[serde(default)]
    pub end_effectors: Option<Vec<String>>,
    /// Older catalogs carry a single end effector.
    #[serde(default)]
    pub end_effector: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl Dataset {
    /// Display title, falling back to the last path segment.
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.path.rsplit('/').next().unwrap_or(&self.path))
    }

    /// End effectors from either the list or the single legacy field.
    pub fn end_effectors(&self) -> Vec<&str> {
        match (&self.end_effectors, &self.end_effector) {
            (Some(list), _) => list.iter().map(String::as_str).collect(),
            (None, Some(single)) => vec![single.as_str()],
            (None, None) => Vec::new(),
        }
    }

    /// Case-insensitive match against path, name, robot, scenes and tags.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        std::iter::once(self.path.as_str())
            .chain(self.name.as_deref())
            .chain(self.robot.as_deref())
            .chain(self.scenes.iter().map(String::as_str))
            .chain(self.tags.iter().map(String::as_str))
            .any(|field| field.to_lowercase().contains(&query))
    }
}

impl GridItem for Dataset {
    fn key(&self) -> &str {
        &self.path
    }
}

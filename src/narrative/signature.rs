use crate::sequence::{SequenceResult, latest_result_for};
use serde::{Deserialize, Serialize};

/// A required `(step, segment)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentMatch {
    pub step_id: String,
    pub segment_id: String,
}

impl SegmentMatch {
    pub fn new(step_id: impl Into<String>, segment_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            segment_id: segment_id.into(),
        }
    }

    pub fn is_satisfied(&self, results: &[SequenceResult]) -> bool {
        latest_result_for(results, &self.step_id).is_some_and(|r| r.segment_id() == self.segment_id)
    }
}

/// A rare exact storyline: fires when every required match holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorylineSignature {
    /// Key into the theme's narrative templates.
    pub key: String,
    pub required_matches: Vec<SegmentMatch>,
}

impl StorylineSignature {
    pub fn new(key: impl Into<String>, required_matches: Vec<SegmentMatch>) -> Self {
        Self {
            key: key.into(),
            required_matches,
        }
    }

    /// A signature with no requirements never matches.
    pub fn matches(&self, results: &[SequenceResult]) -> bool {
        !self.required_matches.is_empty()
            && self.required_matches.iter().all(|m| m.is_satisfied(results))
    }
}

/// Selects a template when a marker step appears anywhere in the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMarker {
    pub step_id: String,
    pub key: String,
}

impl PathMarker {
    pub fn new(step_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            key: key.into(),
        }
    }

    pub fn is_present(&self, results: &[SequenceResult]) -> bool {
        results.iter().any(|r| r.step_id == self.step_id)
    }
}

/// Generic career and magic-alignment markers, highest priority first.
pub fn default_path_markers() -> Vec<PathMarker> {
    vec![
        PathMarker::new("hero-career", "hero-path"),
        PathMarker::new("scholar-career", "scholar-path"),
        PathMarker::new("nature-career", "nature-path"),
        PathMarker::new("light-magic", "light-path"),
        PathMarker::new("dark-magic", "dark-path"),
    ]
}

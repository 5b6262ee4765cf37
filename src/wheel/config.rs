use super::WheelSegment;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// An ordered set of segments plus the physical spin parameters of the wheel.
///
/// Segment order is significant: it fixes the angular layout used when mapping
/// between probabilities and rotation angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelConfig {
    pub segments: Vec<WheelSegment>,
    #[serde(default = "default_size")]
    pub size: f64,
    /// Spin animation length in milliseconds.
    #[serde(default = "default_spin_duration")]
    pub spin_duration: f64,
    #[serde(default = "default_friction")]
    pub friction: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

fn default_size() -> f64 {
    400.0
}

fn default_spin_duration() -> f64 {
    4000.0
}

fn default_friction() -> f64 {
    0.98
}

impl WheelConfig {
    pub fn new(segments: Vec<WheelSegment>) -> Self {
        Self {
            segments,
            size: default_size(),
            spin_duration: default_spin_duration(),
            friction: default_friction(),
            theme: None,
        }
    }

    pub fn segment(&self, id: &str) -> Option<&WheelSegment> {
        self.segments.iter().find(|s| s.id == id)
    }
}

/// The outcome of one spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    pub segment: WheelSegment,
    /// Final wheel rotation in radians.
    pub angle: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Position within a multi-spin burst; `None` for ordinary spins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_index: Option<u32>,
}

impl SpinResult {
    /// Creates a result stamped with the current wall-clock time.
    pub fn new(segment: WheelSegment, angle: f64) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            segment,
            angle,
            timestamp,
            spin_index: None,
        }
    }

    pub fn with_spin_index(mut self, spin_index: u32) -> Self {
        self.spin_index = Some(spin_index);
        self
    }
}

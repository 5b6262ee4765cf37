use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight assigned to a segment that declares neither a weight nor a rarity.
pub const DEFAULT_SEGMENT_WEIGHT: f64 = 25.0;

/// Rarity tiers. Each maps to a fixed base weight when no explicit weight is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    pub fn base_weight(self) -> f64 {
        match self {
            Rarity::Common => 40.0,
            Rarity::Uncommon => 30.0,
            Rarity::Rare => 20.0,
            Rarity::Legendary => 10.0,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        };
        write!(f, "{}", name)
    }
}

/// Marks a segment as a multi-spin trigger: landing on it asks for `count` more spins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSpinTrigger {
    pub count: u32,
    /// Keep every spin (`true`) or only the final one (`false`).
    #[serde(default = "default_aggregate")]
    pub aggregate_results: bool,
}

fn default_aggregate() -> bool {
    true
}

/// One selectable outcome on a wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelSegment {
    /// Unique within a wheel and stable across weight overrides.
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_spin: Option<MultiSpinTrigger>,
}

impl WheelSegment {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            color: String::new(),
            text_color: None,
            weight: None,
            rarity: None,
            multi_spin: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_multi_spin(mut self, count: u32, aggregate_results: bool) -> Self {
        self.multi_spin = Some(MultiSpinTrigger {
            count,
            aggregate_results,
        });
        self
    }

    /// Resolves the selection mass of this segment.
    ///
    /// An explicit weight always wins, including an explicit zero (which makes the
    /// segment unselectable). Without one, the rarity tier decides, and without a
    /// rarity the segment gets [`DEFAULT_SEGMENT_WEIGHT`].
    pub fn effective_weight(&self) -> f64 {
        match (self.weight, self.rarity) {
            (Some(weight), _) => weight,
            (None, Some(rarity)) => rarity.base_weight(),
            (None, None) => DEFAULT_SEGMENT_WEIGHT,
        }
    }
}

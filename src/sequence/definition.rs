use crate::error::ThemeError;
use crate::narrative::{PathMarker, StorylineSignature};
use crate::wheel::{SpinResult, WheelConfig};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Replaces the weight of one segment on the next step's wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightOverride {
    pub segment_id: String,
    /// Absolute weight on a 0-100 scale.
    pub new_weight: f64,
}

impl WeightOverride {
    pub fn new(segment_id: impl Into<String>, new_weight: f64) -> Self {
        Self {
            segment_id: segment_id.into(),
            new_weight,
        }
    }
}

/// The comparison a condition performs against a recorded segment id.
///
/// The operator and the shape of its operand are fixed together, so a set
/// operator can never be paired with a single id or vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionTest {
    Equals(String),
    NotEquals(String),
    In(Vec<String>),
    NotIn(Vec<String>),
    /// An operator this engine does not know. Always evaluates to `false`.
    Unsupported { operator: String },
}

impl ConditionTest {
    pub fn operator_name(&self) -> &str {
        match self {
            ConditionTest::Equals(_) => "equals",
            ConditionTest::NotEquals(_) => "not_equals",
            ConditionTest::In(_) => "in",
            ConditionTest::NotIn(_) => "not_in",
            ConditionTest::Unsupported { operator } => operator,
        }
    }
}

impl fmt::Display for ConditionTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionTest::Equals(id) => write!(f, "== {}", id),
            ConditionTest::NotEquals(id) => write!(f, "!= {}", id),
            ConditionTest::In(ids) => write!(f, "in [{}]", ids.join(", ")),
            ConditionTest::NotIn(ids) => write!(f, "not in [{}]", ids.join(", ")),
            ConditionTest::Unsupported { operator } => write!(f, "<unsupported '{}'>", operator),
        }
    }
}

/// A predicate over the result recorded for an earlier step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCondition", into = "RawCondition")]
pub struct SequenceCondition {
    pub step_id: String,
    pub test: ConditionTest,
}

impl SequenceCondition {
    pub fn equals(step_id: impl Into<String>, segment_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            test: ConditionTest::Equals(segment_id.into()),
        }
    }

    pub fn not_equals(step_id: impl Into<String>, segment_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            test: ConditionTest::NotEquals(segment_id.into()),
        }
    }

    pub fn is_in<I, S>(step_id: impl Into<String>, segment_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            step_id: step_id.into(),
            test: ConditionTest::In(segment_ids.into_iter().map(Into::into).collect()),
        }
    }

    pub fn not_in<I, S>(step_id: impl Into<String>, segment_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            step_id: step_id.into(),
            test: ConditionTest::NotIn(segment_ids.into_iter().map(Into::into).collect()),
        }
    }
}

/// The JSON shape of a condition: `{ "stepId", "operator"?, "value" }`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCondition {
    step_id: String,
    #[serde(default)]
    operator: Option<String>,
    #[serde(default)]
    value: serde_json::Value,
}

impl TryFrom<RawCondition> for SequenceCondition {
    type Error = ThemeError;

    fn try_from(raw: RawCondition) -> Result<Self, Self::Error> {
        let operator = raw.operator.as_deref().unwrap_or("equals");
        let test = match operator {
            "equals" => ConditionTest::Equals(single_value(&raw.step_id, operator, raw.value)?),
            "not_equals" => {
                ConditionTest::NotEquals(single_value(&raw.step_id, operator, raw.value)?)
            }
            "in" => ConditionTest::In(set_value(&raw.step_id, operator, raw.value)?),
            "not_in" => ConditionTest::NotIn(set_value(&raw.step_id, operator, raw.value)?),
            other => ConditionTest::Unsupported {
                operator: other.to_string(),
            },
        };
        Ok(SequenceCondition {
            step_id: raw.step_id,
            test,
        })
    }
}

impl From<SequenceCondition> for RawCondition {
    fn from(condition: SequenceCondition) -> Self {
        let operator = condition.test.operator_name().to_string();
        let value = match condition.test {
            ConditionTest::Equals(id) | ConditionTest::NotEquals(id) => {
                serde_json::Value::String(id)
            }
            ConditionTest::In(ids) | ConditionTest::NotIn(ids) => {
                serde_json::Value::Array(ids.into_iter().map(serde_json::Value::String).collect())
            }
            ConditionTest::Unsupported { .. } => serde_json::Value::Null,
        };
        RawCondition {
            step_id: condition.step_id,
            operator: Some(operator),
            value,
        }
    }
}

fn single_value(
    step_id: &str,
    operator: &str,
    value: serde_json::Value,
) -> Result<String, ThemeError> {
    match value {
        serde_json::Value::String(id) => Ok(id),
        other => Err(ThemeError::InvalidCondition(format!(
            "operator '{}' on step '{}' expects a segment id, found {}",
            operator, step_id, other
        ))),
    }
}

fn set_value(
    step_id: &str,
    operator: &str,
    value: serde_json::Value,
) -> Result<Vec<String>, ThemeError> {
    let invalid = |found: &serde_json::Value| {
        ThemeError::InvalidCondition(format!(
            "operator '{}' on step '{}' expects an array of segment ids, found {}",
            operator, step_id, found
        ))
    };
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(id) => Ok(id),
                other => Err(invalid(&other)),
            })
            .collect(),
        other => Err(invalid(&other)),
    }
}

/// How the conditions of a branch combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchOperator {
    #[default]
    And,
    Or,
}

/// A conditional edge out of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceBranch {
    #[serde(default)]
    pub conditions: Vec<SequenceCondition>,
    #[serde(default)]
    pub operator: BranchOperator,
    pub next_step_id: String,
    /// Applied to the next step's wheel when this branch fires.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weight_overrides: Vec<WeightOverride>,
}

impl SequenceBranch {
    pub fn new(conditions: Vec<SequenceCondition>, next_step_id: impl Into<String>) -> Self {
        Self {
            conditions,
            operator: BranchOperator::And,
            next_step_id: next_step_id.into(),
            weight_overrides: Vec::new(),
        }
    }

    pub fn with_operator(mut self, operator: BranchOperator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_overrides(mut self, weight_overrides: Vec<WeightOverride>) -> Self {
        self.weight_overrides = weight_overrides;
        self
    }
}

/// A node of the step graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceStep {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub wheel_config: WheelConfig,
    /// Evaluated in declaration order; the first match wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<SequenceBranch>,
    /// `None` marks a terminal step when no branch matches.
    #[serde(default)]
    pub default_next_step: Option<String>,
}

impl SequenceStep {
    pub fn new(id: impl Into<String>, title: impl Into<String>, wheel_config: WheelConfig) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            wheel_config,
            branches: Vec::new(),
            default_next_step: None,
        }
    }

    pub fn with_branch(mut self, branch: SequenceBranch) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn with_default_next(mut self, step_id: impl Into<String>) -> Self {
        self.default_next_step = Some(step_id.into());
        self
    }
}

/// One recorded outcome, tagged with the step it was spun on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceResult {
    pub step_id: String,
    pub spin_result: SpinResult,
}

impl SequenceResult {
    pub fn new(step_id: impl Into<String>, spin_result: SpinResult) -> Self {
        Self {
            step_id: step_id.into(),
            spin_result,
        }
    }

    pub fn segment_id(&self) -> &str {
        &self.spin_result.segment.id
    }
}

/// Returns the most recent result recorded for `step_id`.
pub fn latest_result_for<'a>(
    results: &'a [SequenceResult],
    step_id: &str,
) -> Option<&'a SequenceResult> {
    results.iter().rev().find(|r| r.step_id == step_id)
}

/// A complete themed sequence: the step graph plus its narrative templates.
///
/// Themes are read-only templates. Sessions share them behind an `Arc` and never
/// mutate them; weight overrides produce derived copies of individual steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceTheme {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<SequenceStep>,
    /// Defaults to the first declared step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_templates: Option<AHashMap<String, String>>,
    /// Storyline signatures checked before path markers. Empty means "use the built-in table".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub storylines: Vec<StorylineSignature>,
    /// Path markers checked after storylines. Empty means "use the default table".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_markers: Vec<PathMarker>,
}

impl SequenceTheme {
    pub fn new(id: impl Into<String>, name: impl Into<String>, steps: Vec<SequenceStep>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            steps,
            start_step_id: None,
            narrative_template: None,
            narrative_templates: None,
            storylines: Vec::new(),
            path_markers: Vec::new(),
        }
    }

    /// The id of the first step, explicit or implied by declaration order.
    pub fn start_step(&self) -> Option<&str> {
        self.start_step_id
            .as_deref()
            .or_else(|| self.steps.first().map(|s| s.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_defaults_to_equals() {
        let json = r#"{"stepId":"house","value":"gryffindor"}"#;
        let condition: SequenceCondition = serde_json::from_str(json).unwrap();
        assert_eq!(condition, SequenceCondition::equals("house", "gryffindor"));
    }

    #[test]
    fn test_condition_set_operator() {
        let json = r#"{"stepId":"house","operator":"not_in","value":["slytherin","ravenclaw"]}"#;
        let condition: SequenceCondition = serde_json::from_str(json).unwrap();
        assert_eq!(
            condition.test,
            ConditionTest::NotIn(vec!["slytherin".to_string(), "ravenclaw".to_string()])
        );
    }

    #[test]
    fn test_condition_shape_mismatch_rejected() {
        let array_for_equals = r#"{"stepId":"a","operator":"equals","value":["x"]}"#;
        let string_for_in = r#"{"stepId":"a","operator":"in","value":"x"}"#;
        assert!(serde_json::from_str::<SequenceCondition>(array_for_equals).is_err());
        assert!(serde_json::from_str::<SequenceCondition>(string_for_in).is_err());
    }

    #[test]
    fn test_unknown_operator_is_kept() {
        let json = r#"{"stepId":"a","operator":"greater_than","value":3}"#;
        let condition: SequenceCondition = serde_json::from_str(json).unwrap();
        assert_eq!(
            condition.test,
            ConditionTest::Unsupported {
                operator: "greater_than".to_string()
            }
        );
    }

    #[test]
    fn test_condition_serializes_back_to_json_shape() {
        let condition = SequenceCondition::is_in("a", ["x", "y"]);
        let value = serde_json::to_value(&condition).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"stepId": "a", "operator": "in", "value": ["x", "y"]})
        );
    }

    #[test]
    fn test_start_step_falls_back_to_first() {
        let step = SequenceStep::new("first", "First", WheelConfig::new(vec![]));
        let mut theme = SequenceTheme::new("t", "T", vec![step]);
        assert_eq!(theme.start_step(), Some("first"));
        theme.start_step_id = Some("other".to_string());
        assert_eq!(theme.start_step(), Some("other"));
    }
}

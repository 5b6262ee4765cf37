//! Branch evaluation over accumulated step results.
//!
//! Nothing here fails: a condition that references a step with no recorded
//! result is simply false, and a step with no matching branch falls through to
//! its default successor.

use crate::sequence::{
    BranchOperator, ConditionTest, SequenceBranch, SequenceCondition, SequenceResult, SequenceStep,
    WeightOverride, latest_result_for,
};
use log::{debug, warn};

pub mod trace;

/// Where a step leads, given the results so far.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTransition {
    /// `None` when the step is terminal.
    pub next_step_id: Option<String>,
    /// Overrides carried by the branch that fired. Empty for default transitions.
    pub weight_overrides: Vec<WeightOverride>,
    /// Index of the branch that fired, `None` if the default was used.
    pub matched_branch: Option<usize>,
}

impl StepTransition {
    pub fn is_terminal(&self) -> bool {
        self.next_step_id.is_none()
    }
}

/// Evaluates one condition against the latest result recorded for its step.
pub fn evaluate_condition(condition: &SequenceCondition, results: &[SequenceResult]) -> bool {
    let Some(result) = latest_result_for(results, &condition.step_id) else {
        return false;
    };
    let segment_id = result.segment_id();

    match &condition.test {
        ConditionTest::Equals(expected) => segment_id == expected,
        ConditionTest::NotEquals(expected) => segment_id != expected,
        ConditionTest::In(ids) => ids.iter().any(|id| id == segment_id),
        ConditionTest::NotIn(ids) => !ids.iter().any(|id| id == segment_id),
        ConditionTest::Unsupported { operator } => {
            warn!(
                "Condition on step '{}' uses unsupported operator '{}'; treating as false",
                condition.step_id, operator
            );
            false
        }
    }
}

/// Combines a branch's conditions.
///
/// `and` over no conditions is true; `or` over no conditions is false.
pub fn evaluate_branch(branch: &SequenceBranch, results: &[SequenceResult]) -> bool {
    match branch.operator {
        BranchOperator::And => branch
            .conditions
            .iter()
            .all(|c| evaluate_condition(c, results)),
        BranchOperator::Or => branch
            .conditions
            .iter()
            .any(|c| evaluate_condition(c, results)),
    }
}

/// Picks the successor of `current_step`: the first branch that matches, or the default.
pub fn get_next_step_id(current_step: &SequenceStep, results: &[SequenceResult]) -> StepTransition {
    for (index, branch) in current_step.branches.iter().enumerate() {
        if evaluate_branch(branch, results) {
            debug!(
                "Step '{}': branch #{} matched -> '{}' ({} overrides)",
                current_step.id,
                index,
                branch.next_step_id,
                branch.weight_overrides.len()
            );
            return StepTransition {
                next_step_id: Some(branch.next_step_id.clone()),
                weight_overrides: branch.weight_overrides.clone(),
                matched_branch: Some(index),
            };
        }
    }

    debug!(
        "Step '{}': no branch matched, default -> {:?}",
        current_step.id, current_step.default_next_step
    );
    StepTransition {
        next_step_id: current_step.default_next_step.clone(),
        weight_overrides: Vec::new(),
        matched_branch: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::{SpinResult, WheelConfig, WheelSegment};

    fn result(step_id: &str, segment_id: &str) -> SequenceResult {
        SequenceResult::new(
            step_id,
            SpinResult::new(WheelSegment::new(segment_id, segment_id), 0.0),
        )
    }

    fn step() -> SequenceStep {
        SequenceStep::new("sorting", "Sorting", WheelConfig::new(vec![]))
    }

    #[test]
    fn test_condition_on_missing_step_is_false() {
        let condition = SequenceCondition::equals("x", "a");
        assert!(!evaluate_condition(&condition, &[]));
        let negated = SequenceCondition::not_equals("x", "a");
        assert!(!evaluate_condition(&negated, &[]));
    }

    #[test]
    fn test_condition_operators() {
        let results = vec![result("house", "ravenclaw")];
        assert!(evaluate_condition(
            &SequenceCondition::equals("house", "ravenclaw"),
            &results
        ));
        assert!(evaluate_condition(
            &SequenceCondition::not_equals("house", "slytherin"),
            &results
        ));
        assert!(evaluate_condition(
            &SequenceCondition::is_in("house", ["gryffindor", "ravenclaw"]),
            &results
        ));
        assert!(!evaluate_condition(
            &SequenceCondition::not_in("house", ["ravenclaw"]),
            &results
        ));
        let unsupported = SequenceCondition {
            step_id: "house".to_string(),
            test: ConditionTest::Unsupported {
                operator: "matches".to_string(),
            },
        };
        assert!(!evaluate_condition(&unsupported, &results));
    }

    #[test]
    fn test_condition_reads_latest_result() {
        let results = vec![result("wand", "oak"), result("wand", "holly")];
        assert!(evaluate_condition(
            &SequenceCondition::equals("wand", "holly"),
            &results
        ));
    }

    #[test]
    fn test_empty_branch_asymmetry() {
        let and_branch = SequenceBranch::new(vec![], "next");
        let or_branch = SequenceBranch::new(vec![], "next").with_operator(BranchOperator::Or);
        assert!(evaluate_branch(&and_branch, &[]));
        assert!(!evaluate_branch(&or_branch, &[]));
    }

    #[test]
    fn test_or_branch_needs_one_condition() {
        let branch = SequenceBranch::new(
            vec![
                SequenceCondition::equals("a", "x"),
                SequenceCondition::equals("b", "y"),
            ],
            "next",
        )
        .with_operator(BranchOperator::Or);
        assert!(evaluate_branch(&branch, &[result("b", "y")]));
        assert!(!evaluate_branch(&branch, &[result("b", "z")]));
    }

    #[test]
    fn test_first_matching_branch_wins() {
        let step = step()
            .with_branch(SequenceBranch::new(
                vec![SequenceCondition::equals("house", "slytherin")],
                "first",
            ))
            .with_branch(SequenceBranch::new(
                vec![SequenceCondition::is_in("house", ["slytherin", "gryffindor"])],
                "second",
            ))
            .with_default_next("fallback");

        let transition = get_next_step_id(&step, &[result("house", "slytherin")]);
        assert_eq!(transition.next_step_id.as_deref(), Some("first"));
        assert_eq!(transition.matched_branch, Some(0));

        let transition = get_next_step_id(&step, &[result("house", "gryffindor")]);
        assert_eq!(transition.next_step_id.as_deref(), Some("second"));
    }

    #[test]
    fn test_default_and_terminal() {
        let with_default = step().with_default_next("next");
        let transition = get_next_step_id(&with_default, &[]);
        assert_eq!(transition.next_step_id.as_deref(), Some("next"));
        assert!(transition.weight_overrides.is_empty());
        assert_eq!(transition.matched_branch, None);

        let transition = get_next_step_id(&step(), &[]);
        assert!(transition.is_terminal());
    }
}

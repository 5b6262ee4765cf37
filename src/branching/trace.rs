use super::{StepTransition, evaluate_condition};
use crate::sequence::{
    BranchOperator, SequenceCondition, SequenceResult, SequenceStep, latest_result_for,
};
use itertools::Itertools;

/// Formats a condition with the value it was checked against, e.g.
/// `$house (was slytherin) == slytherin`.
pub fn describe_condition(condition: &SequenceCondition, results: &[SequenceResult]) -> String {
    let observed = latest_result_for(results, &condition.step_id)
        .map(|r| r.segment_id().to_string())
        .unwrap_or_else(|| "unset".to_string());
    format!("${} (was {}) {}", condition.step_id, observed, condition.test)
}

/// Explains why `transition` was chosen for `step`.
///
/// For a fired branch only the conditions that held are shown, since those are
/// the ones that decided the outcome.
pub fn describe_transition(
    step: &SequenceStep,
    transition: &StepTransition,
    results: &[SequenceResult],
) -> String {
    let target = transition.next_step_id.as_deref().unwrap_or("<end>");

    let Some(branch) = transition.matched_branch.and_then(|i| step.branches.get(i)) else {
        return match transition.next_step_id {
            Some(_) => format!("no branch matched, default -> {}", target),
            None => "no branch matched, sequence ends".to_string(),
        };
    };

    let joiner = match branch.operator {
        BranchOperator::And => " AND ",
        BranchOperator::Or => " OR ",
    };
    let reasons = branch
        .conditions
        .iter()
        .filter(|c| evaluate_condition(c, results))
        .map(|c| describe_condition(c, results))
        .join(joiner);
    let reasons = if reasons.is_empty() {
        "always".to_string()
    } else {
        reasons
    };

    if transition.weight_overrides.is_empty() {
        format!("{} -> {}", reasons, target)
    } else {
        let overrides = transition
            .weight_overrides
            .iter()
            .map(|o| format!("{}={}", o.segment_id, o.new_weight))
            .join(", ");
        format!("{} -> {} [weights: {}]", reasons, target, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::get_next_step_id;
    use crate::sequence::{SequenceBranch, WeightOverride};
    use crate::wheel::{SpinResult, WheelConfig, WheelSegment};

    fn results() -> Vec<SequenceResult> {
        vec![SequenceResult::new(
            "house",
            SpinResult::new(WheelSegment::new("slytherin", "Slytherin"), 0.0),
        )]
    }

    #[test]
    fn test_describe_fired_branch_with_overrides() {
        let step = SequenceStep::new("house", "House", WheelConfig::new(vec![])).with_branch(
            SequenceBranch::new(
                vec![SequenceCondition::equals("house", "slytherin")],
                "dark-path",
            )
            .with_overrides(vec![WeightOverride::new("avada-kedavra", 60.0)]),
        );
        let results = results();
        let transition = get_next_step_id(&step, &results);
        assert_eq!(
            describe_transition(&step, &transition, &results),
            "$house (was slytherin) == slytherin -> dark-path [weights: avada-kedavra=60]"
        );
    }

    #[test]
    fn test_describe_default_and_end() {
        let step = SequenceStep::new("house", "House", WheelConfig::new(vec![]));
        let transition = get_next_step_id(&step, &[]);
        assert_eq!(
            describe_transition(&step, &transition, &[]),
            "no branch matched, sequence ends"
        );

        let condition = SequenceCondition::is_in("wand", ["oak"]);
        assert_eq!(
            describe_condition(&condition, &[]),
            "$wand (was unset) in [oak]"
        );
    }
}

//! Sequence path resolution: the ordered steps a result history leads through.

use crate::branching::get_next_step_id;
use crate::error::PathError;
use crate::sequence::{SequenceResult, SequenceStep, SequenceTheme};
use ahash::AHashSet;
use log::trace;

/// Upper bound on the number of steps a resolved path may contain.
pub const DEFAULT_MAX_PATH_STEPS: usize = 256;

/// Looks up a step by id.
pub fn find_step_by_id<'a>(theme: &'a SequenceTheme, step_id: &str) -> Option<&'a SequenceStep> {
    theme.steps.iter().find(|s| s.id == step_id)
}

/// Walks the step graph of a theme for a given result history.
pub struct PathResolver<'a> {
    theme: &'a SequenceTheme,
    max_steps: usize,
}

impl<'a> PathResolver<'a> {
    pub fn new(theme: &'a SequenceTheme) -> Self {
        Self {
            theme,
            max_steps: DEFAULT_MAX_PATH_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Resolves the steps that would be visited given `results`.
    ///
    /// The walk starts at the theme's start step and stops at a terminal step or
    /// at a reference to a step that does not exist. Branches only see results of
    /// steps already on the path, so stale results further along cannot steer
    /// earlier decisions. Revisiting a step is reported as a cycle, since the
    /// same results would lead around the loop forever.
    pub fn resolve(&self, results: &[SequenceResult]) -> Result<Vec<&'a SequenceStep>, PathError> {
        let mut path: Vec<&'a SequenceStep> = Vec::new();
        let mut visited: AHashSet<&'a str> = AHashSet::new();
        let mut current_id = self.theme.start_step().map(str::to_string);

        while let Some(step_id) = current_id.take() {
            let Some(step) = find_step_by_id(self.theme, &step_id) else {
                trace!("Path stops at unknown step '{}'", step_id);
                break;
            };
            if visited.contains(step.id.as_str()) {
                return Err(PathError::CycleDetected {
                    step_id,
                    hops: path.len(),
                });
            }
            if path.len() >= self.max_steps {
                return Err(PathError::StepCeilingExceeded {
                    limit: self.max_steps,
                });
            }

            visited.insert(step.id.as_str());
            path.push(step);

            let relevant: Vec<SequenceResult> = results
                .iter()
                .filter(|r| visited.contains(r.step_id.as_str()))
                .cloned()
                .collect();
            current_id = get_next_step_id(step, &relevant).next_step_id;
        }

        Ok(path)
    }

    /// True once every step on the resolved path has a recorded result.
    pub fn is_complete(&self, results: &[SequenceResult]) -> Result<bool, PathError> {
        let path = self.resolve(results)?;
        Ok(path
            .iter()
            .all(|step| results.iter().any(|r| r.step_id == step.id)))
    }
}

/// Resolves the path with the default step ceiling.
pub fn get_sequence_path<'a>(
    theme: &'a SequenceTheme,
    results: &[SequenceResult],
) -> Result<Vec<&'a SequenceStep>, PathError> {
    PathResolver::new(theme).resolve(results)
}

/// Checks completion with the default step ceiling.
pub fn is_sequence_complete(
    theme: &SequenceTheme,
    results: &[SequenceResult],
) -> Result<bool, PathError> {
    PathResolver::new(theme).is_complete(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{SequenceBranch, SequenceCondition};
    use crate::wheel::{SpinResult, WheelConfig, WheelSegment};

    fn wheel() -> WheelConfig {
        WheelConfig::new(vec![WheelSegment::new("x", "X"), WheelSegment::new("y", "Y")])
    }

    fn result(step_id: &str, segment_id: &str) -> SequenceResult {
        SequenceResult::new(
            step_id,
            SpinResult::new(WheelSegment::new(segment_id, segment_id), 0.0),
        )
    }

    fn ids(path: &[&SequenceStep]) -> Vec<String> {
        path.iter().map(|s| s.id.clone()).collect()
    }

    fn branching_theme() -> SequenceTheme {
        SequenceTheme::new(
            "t",
            "T",
            vec![
                SequenceStep::new("a", "A", wheel())
                    .with_branch(SequenceBranch::new(
                        vec![SequenceCondition::equals("a", "y")],
                        "c",
                    ))
                    .with_default_next("b"),
                SequenceStep::new("b", "B", wheel()).with_default_next("d"),
                SequenceStep::new("c", "C", wheel()).with_default_next("d"),
                SequenceStep::new("d", "D", wheel()),
            ],
        )
    }

    #[test]
    fn test_find_step_by_id() {
        let theme = branching_theme();
        assert_eq!(find_step_by_id(&theme, "c").map(|s| s.title.as_str()), Some("C"));
        assert!(find_step_by_id(&theme, "z").is_none());
    }

    #[test]
    fn test_path_follows_branch() {
        let theme = branching_theme();
        assert_eq!(ids(&get_sequence_path(&theme, &[]).unwrap()), ["a", "b", "d"]);
        assert_eq!(
            ids(&get_sequence_path(&theme, &[result("a", "y")]).unwrap()),
            ["a", "c", "d"]
        );
    }

    #[test]
    fn test_results_of_unreached_steps_are_ignored() {
        let mut theme = branching_theme();
        // Step b branches on a result of step c, which is not on b's path.
        theme.steps[1].branches.push(SequenceBranch::new(
            vec![SequenceCondition::equals("c", "x")],
            "c",
        ));
        let results = vec![result("a", "x"), result("c", "x")];
        assert_eq!(ids(&get_sequence_path(&theme, &results).unwrap()), ["a", "b", "d"]);
    }

    #[test]
    fn test_unknown_step_truncates() {
        let mut theme = branching_theme();
        theme.steps[1].default_next_step = Some("missing".to_string());
        assert_eq!(ids(&get_sequence_path(&theme, &[]).unwrap()), ["a", "b"]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut theme = branching_theme();
        theme.steps[3].default_next_step = Some("a".to_string());
        assert_eq!(
            get_sequence_path(&theme, &[]),
            Err(PathError::CycleDetected {
                step_id: "a".to_string(),
                hops: 3
            })
        );
    }

    #[test]
    fn test_step_ceiling() {
        let theme = branching_theme();
        let resolver = PathResolver::new(&theme).with_max_steps(2);
        assert_eq!(
            resolver.resolve(&[]),
            Err(PathError::StepCeilingExceeded { limit: 2 })
        );
    }

    #[test]
    fn test_completion() {
        let theme = branching_theme();
        let mut results = vec![result("a", "y")];
        assert!(!is_sequence_complete(&theme, &results).unwrap());
        results.push(result("c", "x"));
        assert!(!is_sequence_complete(&theme, &results).unwrap());
        results.push(result("d", "x"));
        assert!(is_sequence_complete(&theme, &results).unwrap());
    }
}

use super::{ConditionTest, SequenceBranch, SequenceStep, SequenceTheme};
use crate::error::ThemeError;
use crate::overrides::apply_weight_overrides;
use crate::path::find_step_by_id;
use ahash::AHashSet;
use itertools::Itertools;

impl SequenceTheme {
    /// Checks the structural invariants of the theme content.
    ///
    /// Reports the first problem found: duplicate step or segment ids, an unknown
    /// start step, branch or default targets that do not exist, non-finite or
    /// negative weights, empty wheels, wheels whose weights sum to zero (with or
    /// without a branch's overrides applied), overrides naming a segment missing
    /// from the target wheel, and conditions using an unsupported operator.
    pub fn validate(&self) -> Result<(), ThemeError> {
        if let Some(duplicate) = self.steps.iter().map(|s| s.id.as_str()).duplicates().next() {
            return Err(ThemeError::DuplicateStep(duplicate.to_string()));
        }

        let step_ids: AHashSet<&str> = self.steps.iter().map(|s| s.id.as_str()).collect();
        if let Some(start) = self.start_step() {
            if !step_ids.contains(start) {
                return Err(ThemeError::UnknownStartStep(start.to_string()));
            }
        }

        for step in &self.steps {
            let segments = &step.wheel_config.segments;
            if segments.is_empty() {
                return Err(ThemeError::EmptyWheel(step.id.clone()));
            }
            if let Some(duplicate) = segments.iter().map(|s| s.id.as_str()).duplicates().next() {
                return Err(ThemeError::DuplicateSegment {
                    step_id: step.id.clone(),
                    segment_id: duplicate.to_string(),
                });
            }
            for segment in segments {
                if let Some(weight) = segment.weight {
                    if !weight.is_finite() || weight < 0.0 {
                        return Err(ThemeError::InvalidWeight {
                            step_id: step.id.clone(),
                            segment_id: segment.id.clone(),
                            weight,
                        });
                    }
                }
            }
            if segments.iter().map(|s| s.effective_weight()).sum::<f64>() <= 0.0 {
                return Err(ThemeError::InvalidWeight {
                    step_id: step.id.clone(),
                    segment_id: segments.iter().map(|s| s.id.as_str()).join(", "),
                    weight: 0.0,
                });
            }

            let targets = step
                .branches
                .iter()
                .map(|b| b.next_step_id.as_str())
                .chain(step.default_next_step.as_deref());
            for target in targets {
                if !step_ids.contains(target) {
                    return Err(ThemeError::DanglingStepReference {
                        source_step_id: step.id.clone(),
                        missing_step_id: target.to_string(),
                    });
                }
            }

            for branch in &step.branches {
                self.validate_overrides(step, branch)?;
            }

            for condition in step.branches.iter().flat_map(|b| &b.conditions) {
                if let ConditionTest::Unsupported { operator } = &condition.test {
                    return Err(ThemeError::UnsupportedOperator {
                        step_id: step.id.clone(),
                        operator: operator.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Checks a branch's overrides against the wheel of the step it leads to.
    fn validate_overrides(
        &self,
        step: &SequenceStep,
        branch: &SequenceBranch,
    ) -> Result<(), ThemeError> {
        if branch.weight_overrides.is_empty() {
            return Ok(());
        }
        let Some(target) = find_step_by_id(self, &branch.next_step_id) else {
            return Ok(());
        };

        for o in &branch.weight_overrides {
            if !o.new_weight.is_finite() || o.new_weight < 0.0 {
                return Err(ThemeError::InvalidWeight {
                    step_id: target.id.clone(),
                    segment_id: o.segment_id.clone(),
                    weight: o.new_weight,
                });
            }
            if target.wheel_config.segment(&o.segment_id).is_none() {
                return Err(ThemeError::UnknownOverrideSegment {
                    step_id: step.id.clone(),
                    target_step_id: target.id.clone(),
                    segment_id: o.segment_id.clone(),
                });
            }
        }

        let derived = apply_weight_overrides(target, &branch.weight_overrides);
        let segments = &derived.wheel_config.segments;
        if segments.iter().map(|s| s.effective_weight()).sum::<f64>() <= 0.0 {
            return Err(ThemeError::InvalidWeight {
                step_id: target.id.clone(),
                segment_id: segments.iter().map(|s| s.id.as_str()).join(", "),
                weight: 0.0,
            });
        }
        Ok(())
    }
}

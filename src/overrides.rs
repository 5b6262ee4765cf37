//! Weight override application.
//!
//! Overrides fix the weight of selected segments; whatever is left of the
//! 100-point budget is shared evenly among the remaining segments. Shares are
//! whole numbers assigned by the largest-remainder method. Every share has the
//! same remainder, so the spare units go to the earliest segments in wheel
//! order. Integer overrides totalling at most 100 therefore always yield a
//! wheel whose weights sum to exactly 100.

use crate::sequence::{SequenceStep, WeightOverride};
use ahash::AHashMap;
use log::{debug, warn};
use std::borrow::Cow;

/// The weight budget overrides are expressed against.
pub const WEIGHT_BUDGET: f64 = 100.0;

/// Derives a step whose wheel carries the given overrides.
///
/// Returns the original step untouched when there is nothing to apply. Overrides
/// naming a segment that is not on the wheel are ignored; if several overrides
/// name the same segment, the last one wins. Segments squeezed out of the budget
/// get weight 0 and stay on the wheel.
pub fn apply_weight_overrides<'a>(
    step: &'a SequenceStep,
    weight_overrides: &[WeightOverride],
) -> Cow<'a, SequenceStep> {
    if weight_overrides.is_empty() {
        return Cow::Borrowed(step);
    }

    let mut lookup: AHashMap<&str, f64> = AHashMap::new();
    for o in weight_overrides {
        if step.wheel_config.segment(&o.segment_id).is_some() {
            lookup.insert(o.segment_id.as_str(), o.new_weight);
        } else {
            warn!(
                "Ignoring weight override for unknown segment '{}' on step '{}'",
                o.segment_id, step.id
            );
        }
    }
    if lookup.is_empty() {
        return Cow::Borrowed(step);
    }

    let total_overridden: f64 = lookup.values().sum();
    let remaining = (WEIGHT_BUDGET - total_overridden).max(0.0);
    let free_count = step.wheel_config.segments.len() - lookup.len();
    let shares = even_shares(remaining, free_count);

    let mut derived = step.clone();
    let mut free_index = 0;
    for segment in &mut derived.wheel_config.segments {
        match lookup.get(segment.id.as_str()) {
            Some(&weight) => segment.weight = Some(weight),
            None => {
                segment.weight = Some(shares[free_index]);
                free_index += 1;
            }
        }
    }

    debug!(
        "Step '{}': {} overrides totalling {}, {} spread over {} segments",
        step.id,
        lookup.len(),
        total_overridden,
        remaining,
        free_count
    );
    Cow::Owned(derived)
}

/// Splits `remaining` into `count` whole-number shares that add up to `remaining` rounded.
fn even_shares(remaining: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let units = remaining.round() as u64;
    let base = units / count as u64;
    let spare = (units % count as u64) as usize;
    (0..count)
        .map(|i| (base + u64::from(i < spare)) as f64)
        .collect()
}

//! Common test utilities for building themes and result histories.
use spinverse::prelude::*;

/// The demo theme shipped with the crate.
#[allow(dead_code)]
pub const WIZARDING_WORLD_JSON: &str = include_str!("../themes/wizarding-world.json");

/// Creates a wheel with one equally weighted (25) segment per id.
#[allow(dead_code)]
pub fn equal_wheel(segment_ids: &[&str]) -> WheelConfig {
    WheelConfig::new(
        segment_ids
            .iter()
            .map(|id| WheelSegment::new(*id, id.to_uppercase()).with_weight(25.0))
            .collect(),
    )
}

/// Records `segment_id` as the outcome of `step_id`.
#[allow(dead_code)]
pub fn result(step_id: &str, segment_id: &str) -> SequenceResult {
    SequenceResult::new(
        step_id,
        SpinResult::new(WheelSegment::new(segment_id, segment_id.to_uppercase()), 0.0),
    )
}

/// Creates a linear theme `A -> B -> C` with no branches.
///
/// Every wheel has segments `s1..s4` weighted 25 each.
#[allow(dead_code)]
pub fn create_linear_theme() -> SequenceTheme {
    let wheel = equal_wheel(&["s1", "s2", "s3", "s4"]);
    SequenceTheme::new(
        "linear",
        "Linear",
        vec![
            SequenceStep::new("A", "Step A", wheel.clone()).with_default_next("B"),
            SequenceStep::new("B", "Step B", wheel.clone()).with_default_next("C"),
            SequenceStep::new("C", "Step C", wheel),
        ],
    )
}

/// Creates a sorting theme where Slytherin leads to the dark path.
///
/// Logic: `$A == slytherin` -> `dark-path` with `avada-kedavra` at 60, else `light-path`.
#[allow(dead_code)]
pub fn create_sorting_theme() -> SequenceTheme {
    let sorting = SequenceStep::new(
        "A",
        "Sorting",
        equal_wheel(&["gryffindor", "slytherin", "ravenclaw", "hufflepuff"]),
    )
    .with_branch(
        SequenceBranch::new(
            vec![SequenceCondition::equals("A", "slytherin")],
            "dark-path",
        )
        .with_overrides(vec![WeightOverride::new("avada-kedavra", 60.0)]),
    )
    .with_default_next("light-path");

    SequenceTheme::new(
        "sorting",
        "Sorting",
        vec![
            sorting,
            SequenceStep::new(
                "dark-path",
                "Dark Path",
                equal_wheel(&["avada-kedavra", "crucio", "imperio", "sectumsempra", "legilimens"]),
            ),
            SequenceStep::new(
                "light-path",
                "Light Path",
                equal_wheel(&["expelliarmus", "lumos", "protego"]),
            ),
        ],
    )
}

/// Builds a spin result for a segment of the current wheel of a session.
#[allow(dead_code)]
pub fn land_on(session: &SequenceSession, segment_id: &str) -> SpinResult {
    let wheel = session.current_wheel().expect("session has a current wheel");
    let index = wheel
        .segments
        .iter()
        .position(|s| s.id == segment_id)
        .expect("segment exists on the current wheel");
    let angle = calculate_target_angle(index, wheel.segments.len(), 3);
    SpinResult::new(wheel.segments[index].clone(), angle)
}

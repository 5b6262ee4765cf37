//! Tests for the pure engine operations working together.
mod common;
use common::*;
use spinverse::prelude::*;

#[test]
fn test_linear_theme_path_ignores_results() {
    let theme = create_linear_theme();
    let ids = |results: &[SequenceResult]| -> Vec<String> {
        get_sequence_path(&theme, results)
            .unwrap()
            .iter()
            .map(|s| s.id.clone())
            .collect()
    };
    assert_eq!(ids(&[]), ["A", "B", "C"]);
    assert_eq!(ids(&[result("A", "s3"), result("B", "s1")]), ["A", "B", "C"]);
}

#[test]
fn test_linear_scenario_end_to_end() {
    let theme = create_linear_theme();
    let step_a = find_step_by_id(&theme, "A").unwrap();

    let probabilities = calculate_segment_probabilities(&step_a.wheel_config.segments).unwrap();
    assert_eq!(probabilities, vec![0.25; 4]);

    let mut results = vec![result("A", "s1")];
    let transition = get_next_step_id(step_a, &results);
    assert_eq!(transition.next_step_id.as_deref(), Some("B"));
    assert!(transition.weight_overrides.is_empty());
    assert!(!is_sequence_complete(&theme, &results).unwrap());

    results.push(result("B", "s2"));
    assert!(!is_sequence_complete(&theme, &results).unwrap());
    results.push(result("C", "s4"));
    assert!(is_sequence_complete(&theme, &results).unwrap());

    let path = get_sequence_path(&theme, &results).unwrap();
    assert_eq!(
        path.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
        ["A", "B", "C"]
    );
}

#[test]
fn test_incomplete_while_results_shorter_than_path() {
    let theme = create_linear_theme();
    let all = [result("A", "s1"), result("B", "s1"), result("C", "s1")];
    for n in 0..all.len() {
        let prefix = &all[..n];
        assert!(prefix.len() < get_sequence_path(&theme, prefix).unwrap().len());
        assert!(!is_sequence_complete(&theme, prefix).unwrap());
    }
}

#[test]
fn test_slytherin_routes_to_dark_path_with_override() {
    let theme = create_sorting_theme();
    let sorting = find_step_by_id(&theme, "A").unwrap();

    let results = vec![result("A", "slytherin")];
    let transition = get_next_step_id(sorting, &results);
    assert_eq!(transition.next_step_id.as_deref(), Some("dark-path"));
    assert_eq!(
        transition.weight_overrides,
        vec![WeightOverride::new("avada-kedavra", 60.0)]
    );

    let dark = find_step_by_id(&theme, "dark-path").unwrap();
    let derived = apply_weight_overrides(dark, &transition.weight_overrides);
    let segments = &derived.wheel_config.segments;
    let count = segments.len() as f64;
    assert_eq!(segments[0].weight, Some(60.0));
    for segment in &segments[1..] {
        assert_eq!(segment.weight, Some(40.0 / (count - 1.0)));
    }

    let probabilities = calculate_segment_probabilities(segments).unwrap();
    assert!((probabilities[0] - 0.6).abs() < 1e-12);
}

#[test]
fn test_gryffindor_routes_to_light_path_without_override() {
    let theme = create_sorting_theme();
    let sorting = find_step_by_id(&theme, "A").unwrap();
    let transition = get_next_step_id(sorting, &[result("A", "gryffindor")]);
    assert_eq!(transition.next_step_id.as_deref(), Some("light-path"));
    assert!(transition.weight_overrides.is_empty());

    let light = find_step_by_id(&theme, "light-path").unwrap();
    let derived = apply_weight_overrides(light, &transition.weight_overrides);
    assert!(std::ptr::eq(&*derived, light));
}

#[test]
fn test_overrides_summing_to_budget() {
    let theme = create_sorting_theme();
    let dark = find_step_by_id(&theme, "dark-path").unwrap();
    let derived = apply_weight_overrides(
        dark,
        &[
            WeightOverride::new("avada-kedavra", 55.0),
            WeightOverride::new("crucio", 45.0),
        ],
    );
    let weights: Vec<f64> = derived
        .wheel_config
        .segments
        .iter()
        .map(|s| s.weight.unwrap())
        .collect();
    assert_eq!(weights, vec![55.0, 45.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_missing_reference_never_errors() {
    let condition = SequenceCondition::equals("x", "a");
    assert!(!evaluate_condition(&condition, &[]));
}

#[test]
fn test_multi_spin_collapse_keeps_final_spin() {
    let theme = create_sorting_theme();
    let dark = find_step_by_id(&theme, "dark-path").unwrap();
    let spin = |id: &str| SpinResult::new(dark.wheel_config.segment(id).unwrap().clone(), 0.0);

    let mut state = MultiSpinState::default();
    assert!(state.trigger("dark-path", spin("legilimens"), 3, false));
    assert_eq!((state.current_count, state.total_count), (0, 3));

    for id in ["crucio", "imperio", "avada-kedavra"] {
        state.record_spin(spin(id)).unwrap();
    }
    assert_eq!(state.current_count, state.total_count);
    assert_eq!(state.results.len(), 4);

    let outcome = state.outcome().unwrap();
    assert_eq!(outcome.len(), 1);
    assert_eq!(outcome[0], state.results[3]);
    assert_eq!(outcome[0].segment.id, "avada-kedavra");
}

#[test]
fn test_invalid_override_rejected_before_any_spin() {
    let mut theme = create_sorting_theme();
    assert_eq!(theme.validate(), Ok(()));

    theme.steps[0].branches[0].weight_overrides = vec![WeightOverride::new("avada-kedavra", -50.0)];
    assert_eq!(
        theme.validate(),
        Err(ThemeError::InvalidWeight {
            step_id: "dark-path".to_string(),
            segment_id: "avada-kedavra".to_string(),
            weight: -50.0,
        })
    );

    theme.steps[0].branches[0].weight_overrides = vec![WeightOverride::new("expelliarmus", 60.0)];
    assert!(matches!(
        theme.validate(),
        Err(ThemeError::UnknownOverrideSegment { ref target_step_id, .. })
            if target_step_id == "dark-path"
    ));
}

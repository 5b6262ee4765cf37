//! Probability engine: weight resolution, weighted sampling, and the mapping
//! between segments and wheel rotation angles.
//!
//! Angles follow the rendering convention of the wheel surface: the pointer sits
//! at the top, the wheel rotates clockwise by a positive angle, and segment 0
//! starts directly under the pointer when the rotation is zero. A segment's
//! angular width is proportional to its selection probability, so a wheel that
//! stops through physics and a wheel that is steered to a sampled segment agree.

use crate::error::ProbabilityError;
use crate::wheel::{WheelConfig, WheelSegment};
use log::trace;
use rand::Rng;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Number of full turns added to a target angle when none is specified.
pub const DEFAULT_EXTRA_ROTATIONS: u32 = 3;

/// Offset between the wheel-local angle 0 (pointer at top) and the canvas angle 0 (3 o'clock).
pub const POINTER_OFFSET: f64 = -FRAC_PI_2;

/// The angular range a segment covers in wheel-local radians, measured clockwise from the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSpan {
    pub start: f64,
    pub end: f64,
}

impl SegmentSpan {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.end
    }

    /// The canvas angle at which a renderer should start drawing this segment
    /// when the wheel is rotated by `rotation`.
    pub fn canvas_start(&self, rotation: f64) -> f64 {
        rotation + self.start + POINTER_OFFSET
    }
}

/// The chosen segment and the rotation the wheel must stop at to show it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinOutcome {
    pub index: usize,
    pub angle: f64,
}

/// Resolves every segment's weight and normalizes them into a distribution.
///
/// The output has one entry per segment, each in `[0, 1]`, summing to 1 modulo
/// rounding.
pub fn calculate_segment_probabilities(
    segments: &[WheelSegment],
) -> Result<Vec<f64>, ProbabilityError> {
    if segments.is_empty() {
        return Err(ProbabilityError::EmptyWheel);
    }

    let weights = segments
        .iter()
        .map(|segment| {
            let weight = segment.effective_weight();
            if weight.is_finite() && weight >= 0.0 {
                Ok(weight)
            } else {
                Err(ProbabilityError::InvalidWeight {
                    segment_id: segment.id.clone(),
                    weight,
                })
            }
        })
        .collect::<Result<Vec<f64>, ProbabilityError>>()?;

    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return Err(ProbabilityError::ZeroTotalWeight);
    }

    Ok(weights.into_iter().map(|w| w / total_weight).collect())
}

/// Picks a segment index by inverse-CDF sampling over the segment probabilities.
pub fn select_weighted_segment<R: Rng + ?Sized>(
    segments: &[WheelSegment],
    rng: &mut R,
) -> Result<usize, ProbabilityError> {
    let probabilities = calculate_segment_probabilities(segments)?;
    let r: f64 = rng.random();
    let index = pick_index(&probabilities, r);
    trace!("Sampled r={:.6} -> segment {} ('{}')", r, index, segments[index].id);
    Ok(index)
}

/// Returns the first index whose cumulative mass reaches `r`.
///
/// Zero-mass segments are never chosen. If rounding leaves the running sum just
/// short of 1, the last selectable segment covers the remainder.
fn pick_index(probabilities: &[f64], r: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_selectable = probabilities.len() - 1;
    for (index, &p) in probabilities.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        last_selectable = index;
        cumulative += p;
        if cumulative >= r {
            return index;
        }
    }
    last_selectable
}

/// Computes the wheel-local span of every segment, widths proportional to probability.
pub fn segment_spans(segments: &[WheelSegment]) -> Result<Vec<SegmentSpan>, ProbabilityError> {
    let probabilities = calculate_segment_probabilities(segments)?;
    let mut start = 0.0;
    let spans = probabilities
        .iter()
        .map(|p| {
            let end = start + p * TAU;
            let span = SegmentSpan { start, end };
            start = end;
            span
        })
        .collect();
    Ok(spans)
}

/// Rotation angle that stops the wheel with the centre of `segment_index` under the
/// pointer, assuming `total_segments` equal slices, plus `extra_rotations` full turns.
///
/// `total_segments` must be non-zero.
pub fn calculate_target_angle(
    segment_index: usize,
    total_segments: usize,
    extra_rotations: u32,
) -> f64 {
    let slice = TAU / total_segments as f64;
    let center = segment_index as f64 * slice + slice / 2.0;
    rotation_for(center, extra_rotations)
}

/// Like [`calculate_target_angle`], but aims at the centre of the probability-weighted span.
pub fn calculate_weighted_target_angle(
    segment_index: usize,
    segments: &[WheelSegment],
    extra_rotations: u32,
) -> Result<f64, ProbabilityError> {
    let spans = segment_spans(segments)?;
    let span = spans
        .get(segment_index)
        .ok_or(ProbabilityError::SegmentOutOfRange {
            index: segment_index,
            len: segments.len(),
        })?;
    Ok(rotation_for(span.center(), extra_rotations))
}

fn rotation_for(local_angle: f64, extra_rotations: u32) -> f64 {
    // Clockwise rotation brings the local angle back to the pointer.
    extra_rotations as f64 * TAU + (TAU - local_angle)
}

/// Resolves a final rotation angle to the segment shown under the pointer.
pub fn find_segment_by_angle(
    angle: f64,
    segments: &[WheelSegment],
) -> Result<usize, ProbabilityError> {
    let spans = segment_spans(segments)?;
    let local = (-angle).rem_euclid(TAU);

    if let Some(index) = spans.iter().position(|span| span.contains(local)) {
        return Ok(index);
    }
    // Only reachable when rounding leaves the final span ending just short of 2π.
    Ok(spans
        .iter()
        .rposition(|span| span.width() > 0.0)
        .unwrap_or(spans.len() - 1))
}

/// Samples a segment from the wheel and computes the stop angle for it.
pub fn spin_wheel<R: Rng + ?Sized>(
    wheel: &WheelConfig,
    rng: &mut R,
    extra_rotations: u32,
) -> Result<SpinOutcome, ProbabilityError> {
    let index = select_weighted_segment(&wheel.segments, rng)?;
    let angle = calculate_weighted_target_angle(index, &wheel.segments, extra_rotations)?;
    Ok(SpinOutcome { index, angle })
}

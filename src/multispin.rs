//! Multi-spin coordination: a trigger outcome asks for N more spins of the same
//! wheel, and the burst is either aggregated or collapsed to its final spin.

use crate::error::MultiSpinError;
use crate::wheel::SpinResult;
use log::debug;
use serde::{Deserialize, Serialize};

/// Progress after recording one spin of a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiSpinProgress {
    Pending { remaining: u32 },
    Exhausted,
}

/// State of the (at most one) multi-spin burst of a session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSpinState {
    pub is_active: bool,
    pub current_count: u32,
    pub total_count: u32,
    /// Index 0 is the triggering spin.
    pub results: Vec<SpinResult>,
    pub current_step_id: Option<String>,
    pub aggregate_results: bool,
}

impl MultiSpinState {
    /// Starts a burst of `total_count` spins on `step_id`.
    ///
    /// Returns `false` and changes nothing if a burst is already active.
    pub fn trigger(
        &mut self,
        step_id: impl Into<String>,
        triggering: SpinResult,
        total_count: u32,
        aggregate_results: bool,
    ) -> bool {
        if self.is_active {
            debug!(
                "Ignoring multi-spin trigger; burst on {:?} still active",
                self.current_step_id
            );
            return false;
        }
        *self = Self {
            is_active: true,
            current_count: 0,
            total_count,
            results: vec![triggering],
            current_step_id: Some(step_id.into()),
            aggregate_results,
        };
        debug!(
            "Multi-spin started on {:?}: {} spins, aggregate={}",
            self.current_step_id, total_count, aggregate_results
        );
        true
    }

    /// Records the next spin of the burst, tagging it with its 1-based spin index.
    pub fn record_spin(&mut self, spin: SpinResult) -> Result<MultiSpinProgress, MultiSpinError> {
        if !self.is_active {
            return Err(MultiSpinError::NotActive);
        }
        if self.is_exhausted() {
            return Err(MultiSpinError::AlreadyExhausted {
                total: self.total_count,
            });
        }
        self.current_count += 1;
        self.results.push(spin.with_spin_index(self.current_count));

        Ok(match self.remaining() {
            0 => MultiSpinProgress::Exhausted,
            remaining => MultiSpinProgress::Pending { remaining },
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.is_active && self.current_count >= self.total_count
    }

    pub fn remaining(&self) -> u32 {
        self.total_count.saturating_sub(self.current_count)
    }

    /// The spins that count for the narrative, once the burst is exhausted:
    /// all of them when aggregating, otherwise only the last one.
    pub fn outcome(&self) -> Option<&[SpinResult]> {
        if !self.is_exhausted() {
            return None;
        }
        if self.aggregate_results {
            Some(&self.results)
        } else {
            self.results.last().map(std::slice::from_ref)
        }
    }

    /// Takes the outcome of an exhausted burst and resets to inactive.
    pub fn consume(&mut self) -> Option<Vec<SpinResult>> {
        let outcome = self.outcome()?.to_vec();
        self.reset();
        Some(outcome)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

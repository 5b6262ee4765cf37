//! A live sequence session: the single owner of one run's cursor, results and
//! multi-spin state.
//!
//! ```text
//! idle --start--> active --complete_step--> active --next_step--> transitioning
//!                   ^                                                  |
//!                   +---------------------settle-----------------------+
//! active --next_step (terminal)--> complete        any --reset--> idle
//! ```

use crate::branching::{StepTransition, get_next_step_id};
use crate::error::{PathError, SessionError};
use crate::multispin::{MultiSpinProgress, MultiSpinState};
use crate::narrative::{get_narrative_template, render_narrative};
use crate::overrides::apply_weight_overrides;
use crate::path::{DEFAULT_MAX_PATH_STEPS, PathResolver, find_step_by_id};
use crate::probability::{DEFAULT_EXTRA_ROTATIONS, spin_wheel};
use crate::sequence::{SequenceResult, SequenceStep, SequenceTheme};
use crate::wheel::{SpinResult, WheelConfig};
use log::{debug, info, warn};
use rand::Rng;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Transitioning,
    Complete,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Active => "active",
            SessionState::Transitioning => "transitioning",
            SessionState::Complete => "complete",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What recording a spin did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCompletion {
    /// The result was appended to the history.
    Recorded,
    /// The spin landed on a trigger segment; `total` more spins are expected.
    MultiSpinStarted { total: u32 },
    /// A spin of an active burst was recorded.
    MultiSpinPending { remaining: u32 },
    /// The burst ended and `recorded` results were appended.
    MultiSpinFinished { recorded: usize },
}

/// What advancing the cursor did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAdvance {
    Moved {
        step_id: String,
        transition: StepTransition,
    },
    Completed,
}

#[derive(Debug, Clone, Copy)]
struct SessionConfig {
    max_path_steps: usize,
    extra_rotations: u32,
}

pub struct SessionBuilder {
    theme: Arc<SequenceTheme>,
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new(theme: Arc<SequenceTheme>) -> Self {
        Self {
            theme,
            config: SessionConfig {
                max_path_steps: DEFAULT_MAX_PATH_STEPS,
                extra_rotations: DEFAULT_EXTRA_ROTATIONS,
            },
        }
    }

    pub fn with_max_path_steps(mut self, max_path_steps: usize) -> Self {
        self.config.max_path_steps = max_path_steps;
        self
    }

    pub fn with_extra_rotations(mut self, extra_rotations: u32) -> Self {
        self.config.extra_rotations = extra_rotations;
        self
    }

    pub fn build(self) -> SequenceSession {
        SequenceSession {
            theme: self.theme,
            config: self.config,
            state: SessionState::Idle,
            current_step_id: None,
            derived_step: None,
            results: Vec::new(),
            multi_spin: MultiSpinState::default(),
            last_transition: None,
        }
    }
}

/// One user's run through a theme.
///
/// The theme is shared read-only; everything else belongs to this session alone.
pub struct SequenceSession {
    theme: Arc<SequenceTheme>,
    config: SessionConfig,
    state: SessionState,
    current_step_id: Option<String>,
    /// The current step with weight overrides applied, if a branch carried any.
    derived_step: Option<SequenceStep>,
    results: Vec<SequenceResult>,
    multi_spin: MultiSpinState,
    last_transition: Option<StepTransition>,
}

impl SequenceSession {
    pub fn builder(theme: Arc<SequenceTheme>) -> SessionBuilder {
        SessionBuilder::new(theme)
    }

    pub fn new(theme: Arc<SequenceTheme>) -> Self {
        SessionBuilder::new(theme).build()
    }

    pub fn theme(&self) -> &SequenceTheme {
        &self.theme
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn results(&self) -> &[SequenceResult] {
        &self.results
    }

    pub fn multi_spin(&self) -> &MultiSpinState {
        &self.multi_spin
    }

    pub fn last_transition(&self) -> Option<&StepTransition> {
        self.last_transition.as_ref()
    }

    pub fn current_step_id(&self) -> Option<&str> {
        self.current_step_id.as_deref()
    }

    /// The step under the cursor, with any weight overrides applied.
    pub fn current_step(&self) -> Option<&SequenceStep> {
        if let Some(derived) = &self.derived_step {
            return Some(derived);
        }
        self.current_step_id
            .as_deref()
            .and_then(|id| find_step_by_id(&self.theme, id))
    }

    pub fn current_wheel(&self) -> Option<&WheelConfig> {
        self.current_step().map(|s| &s.wheel_config)
    }

    /// Resets the history and places the cursor on the theme's start step.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let start = self
            .theme
            .start_step()
            .ok_or(SessionError::EmptyTheme)?
            .to_string();
        if find_step_by_id(&self.theme, &start).is_none() {
            return Err(SessionError::StepNotFound(start));
        }
        self.reset();
        debug!("Session on theme '{}' starts at '{}'", self.theme.id, start);
        self.current_step_id = Some(start);
        self.state = SessionState::Active;
        Ok(())
    }

    /// Samples the current wheel. The result is not recorded until `complete_step`.
    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SpinResult, SessionError> {
        self.require(SessionState::Active, "spin")?;
        let step = self.require_current_step()?;
        let outcome = spin_wheel(&step.wheel_config, rng, self.config.extra_rotations)?;
        let segment = step.wheel_config.segments[outcome.index].clone();
        Ok(SpinResult::new(segment, outcome.angle))
    }

    /// Records a spin on the current step.
    ///
    /// Landing on a segment that carries a multi-spin trigger starts a burst
    /// instead of recording; the burst's outcome is recorded once it is exhausted.
    pub fn complete_step(&mut self, result: SpinResult) -> Result<StepCompletion, SessionError> {
        self.require(SessionState::Active, "complete a step")?;
        let step_id = self.require_current_step()?.id.clone();

        if self.multi_spin.is_active {
            return match self.multi_spin.record_spin(result)? {
                MultiSpinProgress::Pending { remaining } => {
                    Ok(StepCompletion::MultiSpinPending { remaining })
                }
                MultiSpinProgress::Exhausted => {
                    let spins = self.multi_spin.consume().unwrap_or_default();
                    let recorded = spins.len();
                    self.results.extend(
                        spins
                            .into_iter()
                            .map(|spin| SequenceResult::new(step_id.clone(), spin)),
                    );
                    debug!("Step '{}': multi-spin recorded {} results", step_id, recorded);
                    Ok(StepCompletion::MultiSpinFinished { recorded })
                }
            };
        }

        if self.results.iter().any(|r| r.step_id == step_id) {
            return Err(SessionError::StepAlreadyCompleted(step_id));
        }

        if let Some(trigger) = result.segment.multi_spin.filter(|t| t.count > 0) {
            self.multi_spin
                .trigger(step_id, result, trigger.count, trigger.aggregate_results);
            return Ok(StepCompletion::MultiSpinStarted {
                total: trigger.count,
            });
        }

        debug!("Step '{}': recorded '{}'", step_id, result.segment.id);
        self.results.push(SequenceResult::new(step_id, result));
        Ok(StepCompletion::Recorded)
    }

    /// Moves the cursor to the next step, consulting the branches afresh.
    pub fn next_step(&mut self) -> Result<StepAdvance, SessionError> {
        self.require(SessionState::Active, "advance")?;
        if self.multi_spin.is_active {
            let step_id = self.multi_spin.current_step_id.clone().unwrap_or_default();
            return Err(SessionError::MultiSpinPending(step_id));
        }

        let theme = Arc::clone(&self.theme);
        let step_id = self.require_current_step()?.id.clone();
        let template = find_step_by_id(&theme, &step_id)
            .ok_or_else(|| SessionError::StepNotFound(step_id.clone()))?;
        if !self.results.iter().any(|r| r.step_id == step_id) {
            return Err(SessionError::StepNotCompleted(step_id));
        }

        let transition = get_next_step_id(template, &self.results);
        self.last_transition = Some(transition.clone());

        let Some(next_id) = transition.next_step_id.clone() else {
            return self.finish();
        };
        let Some(next) = find_step_by_id(&theme, &next_id) else {
            warn!(
                "Step '{}' points at missing step '{}'; ending the sequence",
                step_id, next_id
            );
            return self.finish();
        };

        self.derived_step = match apply_weight_overrides(next, &transition.weight_overrides) {
            Cow::Owned(derived) => Some(derived),
            Cow::Borrowed(_) => None,
        };
        self.current_step_id = Some(next_id.clone());
        self.state = SessionState::Transitioning;
        debug!("Session moved '{}' -> '{}'", step_id, next_id);

        Ok(StepAdvance::Moved {
            step_id: next_id,
            transition,
        })
    }

    /// Ends a transition, making the new step spinnable.
    pub fn settle(&mut self) -> Result<(), SessionError> {
        self.require(SessionState::Transitioning, "settle")?;
        self.state = SessionState::Active;
        Ok(())
    }

    /// Discards all per-session state.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.current_step_id = None;
        self.derived_step = None;
        self.results.clear();
        self.multi_spin.reset();
        self.last_transition = None;
    }

    pub fn path(&self) -> Result<Vec<&SequenceStep>, PathError> {
        self.resolver().resolve(&self.results)
    }

    pub fn is_complete(&self) -> Result<bool, PathError> {
        self.resolver().is_complete(&self.results)
    }

    /// The narrative for the results so far, with placeholders filled in.
    pub fn narrative(&self) -> String {
        render_narrative(get_narrative_template(&self.theme, &self.results), &self.results)
    }

    fn finish(&mut self) -> Result<StepAdvance, SessionError> {
        let path = self.resolver().resolve(&self.results)?;
        if let Some(missing) = path
            .iter()
            .find(|step| !self.results.iter().any(|r| r.step_id == step.id))
        {
            return Err(SessionError::StepNotCompleted(missing.id.clone()));
        }
        info!(
            "Sequence '{}' complete after {} steps",
            self.theme.id,
            path.len()
        );
        self.state = SessionState::Complete;
        Ok(StepAdvance::Completed)
    }

    fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.theme).with_max_steps(self.config.max_path_steps)
    }

    fn require(&self, expected: SessionState, operation: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state.name(),
            })
        }
    }

    fn require_current_step(&self) -> Result<&SequenceStep, SessionError> {
        self.current_step().ok_or_else(|| {
            SessionError::StepNotFound(self.current_step_id.clone().unwrap_or_default())
        })
    }
}

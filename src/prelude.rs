//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! spinverse crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use spinverse::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let theme = SequenceTheme::from_file("themes/wizarding-world.json")?;
//! let path = get_sequence_path(&theme, &[])?;
//! println!("Default path has {} steps", path.len());
//! # Ok(())
//! # }
//! ```

// Sessions
pub use crate::session::{SequenceSession, SessionState, StepAdvance, StepCompletion};

// Data model
pub use crate::sequence::{
    BranchOperator, ConditionTest, IntoTheme, SequenceBranch, SequenceCondition, SequenceResult,
    SequenceStep, SequenceTheme, WeightOverride,
};
pub use crate::wheel::{MultiSpinTrigger, Rarity, SpinResult, WheelConfig, WheelSegment};

// Engine operations
pub use crate::branching::{StepTransition, evaluate_branch, evaluate_condition, get_next_step_id};
pub use crate::multispin::{MultiSpinProgress, MultiSpinState};
pub use crate::narrative::{
    PathMarker, SegmentMatch, StorylineSignature, get_narrative_template, render_narrative,
};
pub use crate::overrides::apply_weight_overrides;
pub use crate::path::{PathResolver, find_step_by_id, get_sequence_path, is_sequence_complete};
pub use crate::probability::{
    SpinOutcome, calculate_segment_probabilities, calculate_target_angle, find_segment_by_angle,
    select_weighted_segment, spin_wheel,
};

// Error types
pub use crate::error::{
    MultiSpinError, PathError, ProbabilityError, SessionError, ThemeConversionError, ThemeError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

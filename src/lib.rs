//! # SpinVerse - Weighted Wheel and Branching Sequence Engine
//!
//! **SpinVerse** is the engine behind themed story wheels. A theme is a graph of
//! steps; each step holds a wheel of weighted segments and a list of branches
//! that decide, from the outcomes spun so far, which step comes next. When the
//! run is over, the accumulated outcomes pick the narrative told about it.
//!
//! ## Core Workflow
//!
//! 1.  **Load a Theme**: Parse theme content from JSON with [`SequenceTheme::from_json_str`]
//!     or [`SequenceTheme::from_file`], or implement [`IntoTheme`] for your own format.
//! 2.  **Start a Session**: Wrap the theme in an `Arc` (themes are shared read-only)
//!     and build a [`SequenceSession`]. The session owns the cursor, the results and
//!     any multi-spin burst.
//! 3.  **Spin and Advance**: `spin` samples the current wheel, `complete_step` records
//!     the outcome, `next_step` evaluates the branches and applies weight overrides
//!     to the next wheel, `settle` ends the transition.
//! 4.  **Tell the Story**: `narrative` selects and renders the template matching the run.
//!
//! The pure building blocks ([`probability`], [`branching`], [`overrides`], [`path`],
//! [`narrative`], [`multispin`]) can be used directly without a session.
//!
//! ## Quick Start
//!
//! ```rust
//! use spinverse::prelude::*;
//! use std::sync::Arc;
//!
//! fn wheel(ids: &[&str]) -> WheelConfig {
//!     WheelConfig::new(ids.iter().map(|id| WheelSegment::new(*id, *id)).collect())
//! }
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let mut theme = SequenceTheme::new(
//!         "quest",
//!         "Quest",
//!         vec![
//!             SequenceStep::new("origin", "Origin", wheel(&["farm", "castle"]))
//!                 .with_default_next("fate"),
//!             SequenceStep::new("fate", "Fate", wheel(&["glory", "ruin"])),
//!         ],
//!     );
//!     theme.narrative_template = Some("Born on a {origin}, destined for {fate}.".to_string());
//!     theme.validate()?;
//!
//!     let mut session = SequenceSession::new(Arc::new(theme));
//!     session.start()?;
//!     let mut rng = rand::rng();
//!
//!     loop {
//!         let spin = session.spin(&mut rng)?;
//!         session.complete_step(spin)?;
//!         match session.next_step()? {
//!             StepAdvance::Moved { .. } => session.settle()?,
//!             StepAdvance::Completed => break,
//!         }
//!     }
//!
//!     assert!(session.is_complete()?);
//!     println!("{}", session.narrative());
//!     Ok(())
//! }
//! ```

pub mod branching;
pub mod error;
pub mod multispin;
pub mod narrative;
pub mod overrides;
pub mod path;
pub mod prelude;
pub mod probability;
pub mod sequence;
pub mod session;
pub mod wheel;

pub use sequence::{IntoTheme, SequenceTheme};
pub use session::SequenceSession;

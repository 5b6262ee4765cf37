//! Narrative template selection and rendering.
//!
//! Selection runs through a fixed chain and never fails:
//!
//! 1. A theme without keyed templates uses its single template.
//! 2. Storyline signatures (the theme's own, or the built-in table for its id)
//!    are checked in order; the first that matches and has a template wins.
//! 3. Path markers are checked in priority order; the first marker step present
//!    in the results with a template wins.
//! 4. The `default` template, then the single template, then the empty string.

use crate::sequence::{SequenceResult, SequenceTheme, latest_result_for};
use log::debug;

pub mod builtin;
pub mod signature;

pub use signature::*;

/// Key of the fallback entry in a theme's keyed templates.
pub const DEFAULT_TEMPLATE_KEY: &str = "default";

/// Chooses the narrative template for a result history.
pub fn get_narrative_template<'a>(theme: &'a SequenceTheme, results: &[SequenceResult]) -> &'a str {
    let flat = theme.narrative_template.as_deref().unwrap_or("");
    let Some(templates) = &theme.narrative_templates else {
        return flat;
    };

    let fallback;
    let storylines = if theme.storylines.is_empty() {
        fallback = builtin::storylines_for(&theme.id);
        &fallback
    } else {
        &theme.storylines
    };
    for storyline in storylines {
        if storyline.matches(results) {
            if let Some(template) = templates.get(&storyline.key) {
                debug!("Theme '{}': storyline '{}' matched", theme.id, storyline.key);
                return template;
            }
        }
    }

    let defaults;
    let markers = if theme.path_markers.is_empty() {
        defaults = default_path_markers();
        &defaults
    } else {
        &theme.path_markers
    };
    for marker in markers {
        if marker.is_present(results) {
            if let Some(template) = templates.get(&marker.key) {
                debug!("Theme '{}': path marker '{}' matched", theme.id, marker.step_id);
                return template;
            }
        }
    }

    templates
        .get(DEFAULT_TEMPLATE_KEY)
        .map(String::as_str)
        .unwrap_or(flat)
}

/// Fills `{step-id}` placeholders with the text of the segment last recorded for that step.
///
/// Placeholders without a recorded result, and unbalanced braces, are kept verbatim.
pub fn render_narrative(template: &str, results: &[SequenceResult]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            rendered.push_str(&rest[open..]);
            return rendered;
        };
        let key = &after_open[..close];
        match latest_result_for(results, key) {
            Some(result) => rendered.push_str(&result.spin_result.segment.text),
            None => {
                rendered.push('{');
                rendered.push_str(key);
                rendered.push('}');
            }
        }
        rest = &after_open[close + 1..];
    }
    rendered.push_str(rest);
    rendered
}

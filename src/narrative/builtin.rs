//! Storyline tables for the themes that ship with hand-authored easter eggs.
//!
//! Each table is evaluated in order and the first full match wins. Death
//! outcomes come before victories.

use super::signature::{SegmentMatch, StorylineSignature};

pub const HARRY_POTTER_THEME_ID: &str = "harry-potter";
pub const HUNGER_GAMES_THEME_ID: &str = "hunger-games";

/// Returns the built-in table for a theme id, or an empty table when there is none.
pub fn storylines_for(theme_id: &str) -> Vec<StorylineSignature> {
    match theme_id {
        HARRY_POTTER_THEME_ID => harry_potter_storylines(),
        HUNGER_GAMES_THEME_ID => hunger_games_storylines(),
        _ => Vec::new(),
    }
}

fn signature(key: &str, matches: &[(&str, &str)]) -> StorylineSignature {
    StorylineSignature::new(
        key,
        matches
            .iter()
            .map(|(step, segment)| SegmentMatch::new(*step, *segment))
            .collect(),
    )
}

pub fn harry_potter_storylines() -> Vec<StorylineSignature> {
    vec![
        signature(
            "chosen-one",
            &[
                ("hogwarts-house", "gryffindor"),
                ("wand-core", "phoenix-feather"),
                ("patronus", "stag"),
            ],
        ),
        signature(
            "dark-lord",
            &[
                ("hogwarts-house", "slytherin"),
                ("wand-core", "phoenix-feather"),
                ("dark-magic", "avada-kedavra"),
            ],
        ),
        signature(
            "half-blood-prince",
            &[
                ("hogwarts-house", "slytherin"),
                ("blood-status", "half-blood"),
                ("patronus", "doe"),
            ],
        ),
        signature(
            "brightest-witch",
            &[
                ("hogwarts-house", "gryffindor"),
                ("blood-status", "muggle-born"),
                ("patronus", "otter"),
            ],
        ),
    ]
}

pub fn hunger_games_storylines() -> Vec<StorylineSignature> {
    vec![
        signature("death-bloodbath", &[("cornucopia", "bloodbath-death")]),
        signature("death-tracker-jackers", &[("arena-event", "tracker-jackers")]),
        signature("death-final-showdown", &[("final-showdown", "fallen")]),
        signature(
            "mockingjay",
            &[
                ("district", "district-12"),
                ("reaping", "volunteer"),
                ("final-showdown", "berry-gambit"),
            ],
        ),
        signature(
            "career-victor",
            &[
                ("district", "district-2"),
                ("training-score", "eleven"),
                ("final-showdown", "victor"),
            ],
        ),
        signature("victor", &[("final-showdown", "victor")]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_by_theme_id() {
        assert!(!storylines_for(HARRY_POTTER_THEME_ID).is_empty());
        assert!(storylines_for("space-opera").is_empty());
    }

    #[test]
    fn test_hunger_games_deaths_precede_victories() {
        let table = hunger_games_storylines();
        let first_victory = table.iter().position(|s| !s.key.starts_with("death-")).unwrap();
        assert!(table[first_victory..].iter().all(|s| !s.key.starts_with("death-")));
    }
}

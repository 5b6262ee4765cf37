use super::definition::SequenceTheme;
use crate::error::ThemeConversionError;

/// A trait for custom content models that can be converted into a `SequenceTheme`.
///
/// Themes are usually authored as JSON in the shape `SequenceTheme` deserializes
/// from directly. When content lives in a different format (a CMS export, a
/// spreadsheet, a legacy schema), implement this trait on your own structs to
/// provide the translation layer.
///
/// # Example
///
/// ```rust
/// use spinverse::prelude::*;
/// use spinverse::error::ThemeConversionError;
///
/// struct Chapter { key: String, choices: Vec<String> }
/// struct Book { title: String, chapters: Vec<Chapter> }
///
/// impl IntoTheme for Book {
///     fn into_theme(self) -> std::result::Result<SequenceTheme, ThemeConversionError> {
///         if self.chapters.is_empty() {
///             return Err(ThemeConversionError::ValidationError("book has no chapters".into()));
///         }
///         let keys: Vec<String> = self.chapters.iter().map(|c| c.key.clone()).collect();
///         let steps = self
///             .chapters
///             .into_iter()
///             .enumerate()
///             .map(|(i, chapter)| {
///                 let segments = chapter
///                     .choices
///                     .iter()
///                     .map(|c| WheelSegment::new(c.clone(), c.clone()))
///                     .collect();
///                 let wheel = WheelConfig::new(segments);
///                 let step = SequenceStep::new(chapter.key.clone(), chapter.key, wheel);
///                 match keys.get(i + 1) {
///                     Some(next) => step.with_default_next(next.clone()),
///                     None => step,
///                 }
///             })
///             .collect();
///         Ok(SequenceTheme::new(self.title.to_lowercase(), self.title, steps))
///     }
/// }
///
/// let book = Book {
///     title: "Quest".to_string(),
///     chapters: vec![Chapter {
///         key: "start".to_string(),
///         choices: vec!["left".to_string(), "right".to_string()],
///     }],
/// };
/// let theme = book.into_theme().unwrap();
/// assert_eq!(theme.start_step(), Some("start"));
/// ```
pub trait IntoTheme {
    /// Consumes the object and converts it into a theme the engine can run.
    fn into_theme(self) -> Result<SequenceTheme, ThemeConversionError>;
}

impl IntoTheme for SequenceTheme {
    fn into_theme(self) -> Result<SequenceTheme, ThemeConversionError> {
        Ok(self)
    }
}

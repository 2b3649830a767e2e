pub mod compose;
pub mod instruction;
pub mod summary;
mod caption_describer;
mod object_summary_describer;
mod text_describer;
#[macro_use]
mod dispatch_macro;

use crate::detect::analysis::caption_describer::CaptionDescriber;
use crate::detect::analysis::object_summary_describer::ObjectSummaryDescriber;
use crate::detect::analysis::text_describer::TextDescriber;
use crate::detect::detection::{Detection, FrameContext};
use crate::vocabulary::Vocabulary;

pub use crate::detect::analysis::text_describer::{extract_text, TextFragment};

/// Everything known about one frame that can end up in its description.
/// Caption and text come from external services and are passed through as is.
#[derive(Debug, Clone, Copy)]
pub struct SceneData<'a> {
    pub detections: &'a [Detection],
    pub frame: &'a FrameContext,
    pub vocabulary: &'a Vocabulary,
    pub caption: Option<&'a str>,
    pub text_fragments: &'a [TextFragment],
}

/// Trait for generating a specific *part* of the scene description.
pub trait Describer {
    /// Returns Some(description_part) if relevant, None otherwise.
    fn describe(&self, data: &SceneData<'_>) -> Option<String>;
}

define_describer![
    Caption => CaptionDescriber,
    Objects => ObjectSummaryDescriber,
    Text => TextDescriber,
];

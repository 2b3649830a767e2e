use crate::detect::analysis::{Describer, SceneData};
use crate::detect::{MAX_TEXT_CHARS, MIN_TEXT_CONFIDENCE};
use serde::{Deserialize, Serialize};

/// One string recognized by an OCR service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub confidence: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Joins the confident fragments into one readable string, cut at 200
/// characters. Single characters are dropped as OCR noise.
pub fn extract_text(fragments: &[TextFragment]) -> Option<String> {
    let joined = fragments
        .iter()
        .filter(|f| f.confidence > MIN_TEXT_CONFIDENCE)
        .map(|f| f.text.trim())
        .filter(|text| text.chars().count() > 1)
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        return None;
    }

    if joined.chars().count() > MAX_TEXT_CHARS {
        let truncated: String = joined.chars().take(MAX_TEXT_CHARS).collect();
        Some(format!("{}...", truncated))
    } else {
        Some(joined)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TextDescriber;

impl Describer for TextDescriber {
    fn describe(&self, data: &SceneData<'_>) -> Option<String> {
        extract_text(data.text_fragments).map(|text| format!("Text found: {}", text))
    }
}

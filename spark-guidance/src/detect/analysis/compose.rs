use crate::detect::analysis::{Describer, DescriberDispatcher, SceneData};

/// Builds the full spoken scene description: caption, object summary and any
/// text found in view, e.g.
/// "Scene: a busy street. Objects detected: 2 persons left. Text found: EXIT."
pub struct CompositeDescriber {
    describers: Vec<DescriberDispatcher>,
}

impl Default for CompositeDescriber {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeDescriber {
    pub fn new() -> Self {
        CompositeDescriber {
            describers: DescriberDispatcher::all(),
        }
    }

    /// Generates the full description by combining outputs from individual describers.
    pub fn describe(&self, data: &SceneData<'_>) -> String {
        let Some(description) = self.describers.as_slice().describe(data) else {
            return String::new();
        };

        // Capitalize the first part and make sure the whole ends with a period.
        let mut chars = description.chars();
        let mut final_description = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
        if !final_description.ends_with('.') {
            final_description.push('.');
        }

        final_description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::analysis::TextFragment;
    use crate::detect::detection::{BoundingBox, Detection, FrameContext};
    use crate::vocabulary::Vocabulary;

    #[test]
    fn test_full_description() {
        let frame = FrameContext::default();
        let vocabulary = Vocabulary::default();
        let detections = [
            Detection::new("person", 0.9, Some(BoundingBox::new(20.0, 100.0, 120.0, 400.0))),
            Detection::new("person", 0.8, Some(BoundingBox::new(40.0, 100.0, 140.0, 400.0))),
        ];
        let fragments = [TextFragment::new("EXIT", 0.95)];
        let data = SceneData {
            detections: &detections,
            frame: &frame,
            vocabulary: &vocabulary,
            caption: Some("a hallway with a door."),
            text_fragments: &fragments,
        };

        assert_eq!(
            CompositeDescriber::new().describe(&data),
            "Scene: a hallway with a door. Objects detected: 2 persons left. Text found: EXIT."
        );
    }

    #[test]
    fn test_fallback_parts() {
        let frame = FrameContext::default();
        let vocabulary = Vocabulary::default();
        let data = SceneData {
            detections: &[],
            frame: &frame,
            vocabulary: &vocabulary,
            caption: None,
            text_fragments: &[],
        };

        assert_eq!(
            CompositeDescriber::default().describe(&data),
            "Scene: Scene analysis unavailable. No specific objects detected in view."
        );
    }
}

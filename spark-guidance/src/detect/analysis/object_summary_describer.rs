use crate::detect::analysis::summary::summarize_scene;
use crate::detect::analysis::{Describer, SceneData};
use crate::detect::NO_OBJECTS_IN_VIEW;

#[derive(Debug, Copy, Clone)]
pub struct ObjectSummaryDescriber;

impl Describer for ObjectSummaryDescriber {
    fn describe(&self, data: &SceneData<'_>) -> Option<String> {
        if data.detections.is_empty() {
            return Some(NO_OBJECTS_IN_VIEW.to_string());
        }

        let summary = summarize_scene(data.detections, data.frame, data.vocabulary);
        Some(format!("Objects detected: {}", summary))
    }
}

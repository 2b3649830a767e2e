use crate::detect::analysis::{Describer, SceneData};
use crate::detect::CAPTION_UNAVAILABLE;

#[derive(Debug, Copy, Clone)]
pub struct CaptionDescriber;

impl Describer for CaptionDescriber {
    fn describe(&self, data: &SceneData<'_>) -> Option<String> {
        let caption = data
            .caption
            .map(|c| c.trim().trim_end_matches('.'))
            .filter(|c| !c.is_empty())
            .unwrap_or(CAPTION_UNAVAILABLE);

        Some(format!("Scene: {}", caption))
    }
}

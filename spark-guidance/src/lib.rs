pub mod detect;
pub mod error;
pub mod guidance;
pub mod vocabulary;

pub use detect::detection::{BoundingBox, BoxInput, ClientObject, Detection, DetectionInput, FrameContext};
pub use error::{GuidanceError, Result};
pub use guidance::{GuidanceDistance, GuidanceEngine, GuidanceResult, NavigationDetail};
pub use vocabulary::Vocabulary;

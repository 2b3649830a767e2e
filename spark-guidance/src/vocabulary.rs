//! Content tables used by the engine: object-size priors, query stop words and
//! scene-summary priority groups. The defaults describe the COCO label set;
//! deployments with another vocabulary or locale load their own from TOML.

use crate::error::{GuidanceError, Result};
use hashbrown::{HashMap, HashSet};
use log::info;
use serde::Deserialize;
use std::path::Path;

/// Size assumed for labels missing from the prior table, in meters.
pub const DEFAULT_OBJECT_SIZE_M: f32 = 1.0;

const DEFAULT_SIZE_PRIORS: &[(&str, f32)] = &[
    ("person", 1.7),
    ("car", 4.5),
    ("chair", 0.9),
    ("table", 0.75),
    ("door", 2.0),
    ("laptop", 0.35),
    ("cell phone", 0.15),
    ("bottle", 0.25),
    ("cup", 0.1),
    ("book", 0.25),
    ("clock", 0.3),
    ("tv", 1.0),
    ("refrigerator", 1.8),
    ("microwave", 0.5),
    ("oven", 0.6),
    ("sink", 0.6),
    ("toilet", 0.7),
    ("bed", 2.0),
    ("dining table", 1.5),
    ("sofa", 2.0),
    ("potted plant", 0.5),
    ("bicycle", 1.7),
    ("motorcycle", 2.0),
    ("airplane", 50.0),
    ("bus", 12.0),
    ("train", 25.0),
    ("truck", 8.0),
    ("boat", 6.0),
    ("stop sign", 0.8),
    ("parking meter", 1.2),
    ("bench", 1.5),
    ("bird", 0.15),
    ("cat", 0.4),
    ("dog", 0.6),
    ("horse", 2.5),
    ("sheep", 1.5),
    ("cow", 2.5),
    ("elephant", 6.0),
    ("bear", 2.0),
    ("zebra", 2.5),
    ("giraffe", 5.0),
];

const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "to", "is", "are", "there", "on", "at", "my", "in", "for", "of", "do",
    "i", "can", "you", "me", "near",
];

const DEFAULT_PRIORITY_GROUPS: &[&[&str]] = &[
    &["person"],
    &["car", "bus", "truck", "motorcycle", "bicycle"],
    &["dog", "cat"],
    &["chair", "bench"],
];

/// Read-only tables shared by every guidance call.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    size_priors: HashMap<String, f32>,
    stop_words: HashSet<String>,
    priority_groups: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
struct VocabularyFile {
    size_priors: Option<HashMap<String, f32>>,
    stop_words: Option<Vec<String>>,
    priority_groups: Option<Vec<Vec<String>>>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            size_priors: DEFAULT_SIZE_PRIORS
                .iter()
                .map(|(label, size)| (label.to_string(), *size))
                .collect(),
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            priority_groups: DEFAULT_PRIORITY_GROUPS
                .iter()
                .map(|group| group.iter().map(|label| label.to_string()).collect())
                .collect(),
        }
    }
}

impl Vocabulary {
    pub fn new(
        size_priors: HashMap<String, f32>,
        stop_words: HashSet<String>,
        priority_groups: Vec<Vec<String>>,
    ) -> Result<Self> {
        let size_priors = size_priors
            .into_iter()
            .map(|(label, size)| {
                if size.is_finite() && size > 0.0 {
                    Ok((label.to_lowercase(), size))
                } else {
                    Err(GuidanceError::Vocabulary(format!(
                        "size prior for '{}' must be positive, got {}",
                        label, size
                    )))
                }
            })
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            size_priors,
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
            priority_groups: priority_groups
                .into_iter()
                .map(|group| group.into_iter().map(|label| label.to_lowercase()).collect())
                .filter(|group: &Vec<String>| !group.is_empty())
                .collect(),
        })
    }

    /// Parses a TOML document. Sections that are absent keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: VocabularyFile = toml::from_str(source)?;
        let defaults = Self::default();

        Self::new(
            file.size_priors.unwrap_or(defaults.size_priors),
            file.stop_words
                .map(|words| words.into_iter().collect())
                .unwrap_or(defaults.stop_words),
            file.priority_groups.unwrap_or(defaults.priority_groups),
        )
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let vocabulary = Self::from_toml_str(&source)?;
        info!(
            "Loaded vocabulary from {}: {} size priors, {} stop words",
            path.display(),
            vocabulary.size_priors.len(),
            vocabulary.stop_words.len()
        );
        Ok(vocabulary)
    }

    /// Assumed real-world size of an object, in meters.
    pub fn object_size(&self, label: &str) -> f32 {
        self.size_priors
            .get(label.to_lowercase().as_str())
            .copied()
            .unwrap_or(DEFAULT_OBJECT_SIZE_M)
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn priority_groups(&self) -> &[Vec<String>] {
        &self.priority_groups
    }

    pub fn label_count(&self) -> usize {
        self.size_priors.len()
    }

    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }
}

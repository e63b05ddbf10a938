//! Lesson records and the ordered catalog.
//!
//! The catalog is the one bit-exact contract with the data file. Field names follow the
//! current schema (`id`, `heroName`, `vocabulary`, `imageRef`, ...) and also accept the legacy
//! names the first data files shipped with (`lessonId`, `hero`, `vocabToExplain`, `imagePath`).
//! Every field except `imageRef` is required; a record missing one fails the load.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DataIntegrityError, LoadError};
use crate::script;

pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.png";

fn placeholder_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

/// One dictionary entry explained inside a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    #[serde(alias = "character")]
    pub surface_form: String,
    #[serde(default)]
    pub pinyin: String,
    #[serde(default)]
    pub definition: String,
}

impl VocabEntry {
    pub fn new(surface_form: &str, pinyin: &str, definition: &str) -> Self {
        Self {
            surface_form: surface_form.to_string(),
            pinyin: pinyin.to_string(),
            definition: definition.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(alias = "lessonId")]
    pub id: String,
    pub title: String,
    #[serde(alias = "hero")]
    pub hero_name: String,
    pub story_text: String,
    pub pinyin_text: String,
    #[serde(alias = "vocabToExplain")]
    pub vocabulary: Vec<VocabEntry>,
    pub seek_characters: Vec<char>,
    #[serde(alias = "imagePath", default = "placeholder_image")]
    pub image_ref: String,
}

impl Lesson {
    /// Checks that every hanzi in the story has exactly one pinyin syllable.
    pub fn check_alignment(&self) -> Result<(), DataIntegrityError> {
        let script_chars = script::count_hanzi(&self.story_text);
        let pinyin_tokens = script::pinyin_tokens(&self.pinyin_text).len();
        if script_chars == pinyin_tokens {
            Ok(())
        } else {
            Err(DataIntegrityError {
                lesson: self.id.clone(),
                script_chars,
                pinyin_tokens,
            })
        }
    }

    /// Seek characters with duplicates removed, first occurrence wins.
    pub fn distinct_seek_characters(&self) -> Vec<char> {
        let mut seen = HashSet::new();
        self.seek_characters
            .iter()
            .copied()
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

/// Ordered lesson list; position defines unlock precedence. Only built through
/// [`Catalog::new`] / [`Catalog::from_json`], which validate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    lessons: Vec<Lesson>,
}

impl Catalog {
    /// Builds a catalog, rejecting empty lists and duplicate ids.
    pub fn new(lessons: Vec<Lesson>) -> Result<Self, LoadError> {
        if lessons.is_empty() {
            return Err(LoadError::Empty);
        }
        let mut ids = HashSet::new();
        for lesson in &lessons {
            if lesson.id.trim().is_empty() {
                return Err(LoadError::Schema {
                    lesson: lesson.title.clone(),
                    reason: "empty lesson id".to_string(),
                });
            }
            if !ids.insert(lesson.id.as_str()) {
                return Err(LoadError::DuplicateId(lesson.id.clone()));
            }
            if let Err(e) = lesson.check_alignment() {
                // Tolerated at load time; the lesson renders without pinyin when entered.
                tracing::warn!("{e}");
            }
            for c in &lesson.seek_characters {
                if !script::is_hanzi(*c) {
                    tracing::warn!(lesson = %lesson.id, "seek character '{c}' is not an annotatable hanzi");
                }
            }
        }
        Ok(Self { lessons })
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let lessons: Vec<Lesson> = serde_json::from_str(json)?;
        Self::new(lessons)
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.lessons.iter().position(|l| l.id == id)
    }
}

/// Source of the catalog. Fetching and retry policy live with the host; the core only sees
/// the outcome.
pub trait CatalogLoader {
    fn load(&mut self) -> Result<Catalog, LoadError>;
}

impl<F> CatalogLoader for F
where
    F: FnMut() -> Result<Catalog, LoadError>,
{
    fn load(&mut self) -> Result<Catalog, LoadError> {
        self()
    }
}

/// Loader over catalog JSON already fetched by the host.
pub struct JsonCatalog<'a>(pub &'a str);

impl CatalogLoader for JsonCatalog<'_> {
    fn load(&mut self) -> Result<Catalog, LoadError> {
        Catalog::from_json(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_SCHEMA: &str = r#"[{
        "id": "Group_1",
        "title": "小猫",
        "heroName": "Mimi",
        "storyText": "小猫，你好！",
        "pinyinText": "xiǎo māo nǐ hǎo",
        "vocabulary": [{"surfaceForm": "小猫", "pinyin": "xiǎo māo", "definition": "kitten"}],
        "seekCharacters": ["猫"],
        "imageRef": "images/cat.png"
    }]"#;

    const LEGACY_SCHEMA: &str = r#"[{
        "lessonId": "Group_1",
        "title": "小猫",
        "hero": "Mimi",
        "storyText": "小猫，你好！",
        "pinyinText": "xiǎo māo nǐ hǎo",
        "vocabToExplain": [{"character": "小猫", "pinyin": "xiǎo māo", "definition": "kitten"}],
        "seekCharacters": ["猫"],
        "imagePath": "images/cat.png"
    }]"#;

    #[test]
    fn current_and_legacy_schema_parse_identically() {
        let a = Catalog::from_json(CURRENT_SCHEMA).unwrap();
        let b = Catalog::from_json(LEGACY_SCHEMA).unwrap();
        assert_eq!(a, b);
        let lesson = &a.lessons()[0];
        assert_eq!(lesson.hero_name, "Mimi");
        assert_eq!(lesson.vocabulary[0].surface_form, "小猫");
        assert_eq!(lesson.seek_characters, vec!['猫']);
        assert!(lesson.check_alignment().is_ok());
    }

    #[test]
    fn missing_image_defaults_to_placeholder() {
        let json = r#"[{"id":"a","title":"t","heroName":"","storyText":"你","pinyinText":"nǐ",
            "vocabulary":[],"seekCharacters":["你"]}]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.lessons()[0].image_ref, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn lesson_without_seek_characters_field_is_rejected() {
        let json = r#"[{"id":"a","title":"t","heroName":"","storyText":"猫","pinyinText":"māo",
            "vocabulary":[]}]"#;
        assert!(matches!(Catalog::from_json(json), Err(LoadError::Parse(_))));
        let json = r#"[{"id":"a","title":"t","heroName":"","storyText":"猫",
            "vocabulary":[],"seekCharacters":["猫"]}]"#;
        assert!(matches!(Catalog::from_json(json), Err(LoadError::Parse(_))));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(Catalog::from_json("[]"), Err(LoadError::Empty)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            {"id":"a","title":"t","heroName":"","storyText":"","pinyinText":"","vocabulary":[],"seekCharacters":[]},
            {"id":"a","title":"u","heroName":"","storyText":"","pinyinText":"","vocabulary":[],"seekCharacters":[]}
        ]"#;
        assert!(matches!(Catalog::from_json(json), Err(LoadError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Catalog::from_json("{not json"), Err(LoadError::Parse(_))));
        // Seek characters must be single characters.
        let json = r#"[{"id":"a","title":"t","heroName":"","storyText":"","pinyinText":"",
            "vocabulary":[],"seekCharacters":["猫猫"]}]"#;
        assert!(matches!(Catalog::from_json(json), Err(LoadError::Parse(_))));
    }

    #[test]
    fn misaligned_lesson_loads_but_reports_integrity_error() {
        let json = r#"[{"id":"a","title":"t","heroName":"","storyText":"你好","pinyinText":"nǐ",
            "vocabulary":[],"seekCharacters":[]}]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let err = catalog.lessons()[0].check_alignment().unwrap_err();
        assert_eq!(err.script_chars, 2);
        assert_eq!(err.pinyin_tokens, 1);
    }

    #[test]
    fn distinct_seek_characters_keep_first_order() {
        let json = r#"[{"id":"a","title":"t","heroName":"","storyText":"","pinyinText":"",
            "vocabulary":[],"seekCharacters":["猫","你","猫"]}]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.lessons()[0].distinct_seek_characters(), vec!['猫', '你']);
    }

    #[test]
    fn closure_loader_propagates_failure() {
        let mut loader = || -> Result<Catalog, LoadError> { Err(LoadError::Unavailable("404".into())) };
        assert!(matches!(loader.load(), Err(LoadError::Unavailable(_))));
        assert_eq!(JsonCatalog(CURRENT_SCHEMA).load().unwrap().position("Group_1"), Some(0));
    }
}

// Dataset invariants for the bundled demo catalog.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use mandarin_quest::script::{count_hanzi, is_hanzi, pinyin_tokens};

#[test]
fn demo_catalog_loads_with_unique_ids() {
    let catalog = mandarin_quest::demo::catalog().expect("demo catalog parses");
    assert_eq!(catalog.len(), 3);
    let mut seen = HashSet::new();
    for lesson in catalog.lessons() {
        assert!(seen.insert(lesson.id.as_str()), "duplicate lesson id '{}'", lesson.id);
        assert!(!lesson.title.is_empty(), "lesson '{}' has no title", lesson.id);
        assert!(!lesson.hero_name.is_empty(), "lesson '{}' has no hero", lesson.id);
        assert!(lesson.image_ref.starts_with("images/"), "lesson '{}' image path", lesson.id);
    }
}

#[test]
fn pinyin_is_aligned_with_hanzi() {
    let catalog = mandarin_quest::demo::catalog().unwrap();
    for lesson in catalog.lessons() {
        assert_eq!(
            pinyin_tokens(&lesson.pinyin_text).len(),
            count_hanzi(&lesson.story_text),
            "pinyin misaligned in '{}'",
            lesson.id
        );
        assert!(lesson.check_alignment().is_ok());
    }
}

#[test]
fn seek_characters_are_hanzi_present_in_story() {
    let catalog = mandarin_quest::demo::catalog().unwrap();
    for lesson in catalog.lessons() {
        assert!(!lesson.seek_characters.is_empty(), "lesson '{}' has nothing to hunt", lesson.id);
        for c in &lesson.seek_characters {
            assert!(is_hanzi(*c), "seek character '{}' in '{}' is not hanzi", c, lesson.id);
            assert!(lesson.story_text.contains(*c), "seek character '{}' missing from '{}'", c, lesson.id);
        }
    }
}

#[test]
fn vocabulary_appears_in_story_with_one_syllable_per_hanzi() {
    let catalog = mandarin_quest::demo::catalog().unwrap();
    for lesson in catalog.lessons() {
        for v in &lesson.vocabulary {
            assert!(
                lesson.story_text.contains(&v.surface_form),
                "vocab '{}' not in story '{}'",
                v.surface_form,
                lesson.id
            );
            assert_eq!(
                pinyin_tokens(&v.pinyin).len(),
                v.surface_form.chars().count(),
                "vocab '{}' pinyin '{}'",
                v.surface_form,
                v.pinyin
            );
            assert!(!v.definition.is_empty());
        }
    }
}

#[test]
fn composed_totals_match_raw_text_occurrences() {
    // Totals derived from composed tokens agree with a plain scan of the story.
    use mandarin_quest::{HuntState, compose::compose_lesson, hunt::DEFAULT_HINT_PERCENT};
    let catalog = mandarin_quest::demo::catalog().unwrap();
    for lesson in catalog.lessons() {
        let story = compose_lesson(lesson, true);
        let hunt = HuntState::initialize(&lesson.seek_characters, &story, DEFAULT_HINT_PERCENT);
        for p in hunt.progress() {
            let raw = lesson.story_text.chars().filter(|c| *c == p.character).count() as u32;
            assert_eq!(p.total, raw, "'{}' in '{}'", p.character, lesson.id);
        }
    }
}

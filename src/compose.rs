//! Story compositor: turns raw story text into annotated, clickable tokens.
//!
//! Pinyin is attached positionally: the n-th hanzi of the story receives the n-th
//! whitespace-separated syllable. Vocabulary spans are matched greedily left to right, and at
//! each position the first entry in declared vocabulary order wins (not the longest).
//! Every input character appears in the output exactly once, in order.

use serde::Serialize;

use crate::lesson::{Lesson, VocabEntry};
use crate::script;

/// Identity of a hanzi token: its character offset in the story text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HanziToken {
    pub id: TokenId,
    pub character: char,
    pub pinyin: String,
    pub in_vocab: bool,
    pub seek: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Token {
    /// Punctuation, latin text, whitespace: rendered as-is, never clickable.
    Literal { character: char },
    Hanzi(HanziToken),
}

impl Token {
    pub fn character(&self) -> char {
        match self {
            Token::Literal { character } => *character,
            Token::Hanzi(h) => h.character,
        }
    }

    pub fn as_hanzi(&self) -> Option<&HanziToken> {
        match self {
            Token::Hanzi(h) => Some(h),
            Token::Literal { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Segment {
    Single { token: Token },
    /// Consecutive tokens forming one vocabulary entry; `entry` indexes the lesson vocabulary.
    Vocab { entry: usize, tokens: Vec<Token> },
}

impl Segment {
    pub fn tokens(&self) -> &[Token] {
        match self {
            Segment::Single { token } => std::slice::from_ref(token),
            Segment::Vocab { tokens, .. } => tokens,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComposedStory {
    segments: Vec<Segment>,
}

impl ComposedStory {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.segments.iter().flat_map(Segment::tokens)
    }

    pub fn hanzi(&self) -> impl Iterator<Item = &HanziToken> {
        self.tokens().filter_map(Token::as_hanzi)
    }

    pub fn seek_tokens(&self) -> impl Iterator<Item = &HanziToken> {
        self.hanzi().filter(|h| h.seek)
    }

    pub fn token(&self, id: TokenId) -> Option<&HanziToken> {
        self.hanzi().find(|h| h.id == id)
    }

    /// The story text reassembled from the tokens.
    pub fn text(&self) -> String {
        self.tokens().map(Token::character).collect()
    }
}

/// Builds the annotated token sequence for one story.
///
/// Missing pinyin (fewer syllables than hanzi) leaves the affected tokens with an empty
/// reading; surplus syllables are ignored. Empty vocabulary surface forms never match.
pub fn compose(
    story_text: &str,
    pinyin_text: &str,
    vocabulary: &[VocabEntry],
    seek_characters: &[char],
) -> ComposedStory {
    let chars: Vec<char> = story_text.chars().collect();
    let syllables = script::pinyin_tokens(pinyin_text);

    // Position -> pinyin, advancing the syllable cursor on hanzi only.
    let mut readings: Vec<&str> = Vec::with_capacity(chars.len());
    let mut cursor = 0;
    for &c in &chars {
        if script::is_hanzi(c) {
            readings.push(syllables.get(cursor).copied().unwrap_or(""));
            cursor += 1;
        } else {
            readings.push("");
        }
    }

    let surfaces: Vec<Vec<char>> = vocabulary
        .iter()
        .map(|v| v.surface_form.chars().collect())
        .collect();

    let make_token = |pos: usize, in_vocab: bool| -> Token {
        let c = chars[pos];
        if !script::is_hanzi(c) {
            return Token::Literal { character: c };
        }
        Token::Hanzi(HanziToken {
            id: TokenId(pos as u32),
            character: c,
            pinyin: readings[pos].to_string(),
            in_vocab,
            seek: seek_characters.contains(&c),
        })
    };

    let mut segments = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let matched = surfaces
            .iter()
            .position(|s| !s.is_empty() && chars[i..].starts_with(s));
        match matched {
            Some(entry) => {
                let len = surfaces[entry].len();
                let tokens = (i..i + len).map(|pos| make_token(pos, true)).collect();
                segments.push(Segment::Vocab { entry, tokens });
                i += len;
            }
            None => {
                segments.push(Segment::Single {
                    token: make_token(i, false),
                });
                i += 1;
            }
        }
    }

    ComposedStory { segments }
}

/// Composes a lesson, degrading to pinyin-less rendering when its pinyin is misaligned.
///
/// With `strict` set a misalignment panics instead, so bad data is caught during development.
pub fn compose_lesson(lesson: &Lesson, strict: bool) -> ComposedStory {
    let pinyin = match lesson.check_alignment() {
        Ok(()) => lesson.pinyin_text.as_str(),
        Err(e) => {
            assert!(!strict, "{e}");
            tracing::error!("{e}; rendering without pinyin");
            ""
        }
    };
    compose(
        &lesson.story_text,
        pinyin,
        &lesson.vocabulary,
        &lesson.distinct_seek_characters(),
    )
}

//! Ruby markup for a composed story.
//!
//! The markup only carries data attributes; the host attaches click listeners and styling.
//! Seek targets get `data-token`, vocabulary spans get `data-vocab` (index into the lesson
//! vocabulary), captured targets the `found` class and hint reveals `hint-reveal` as well.

use std::fmt::{Display, Write};

use askama::{Html, MarkupDisplay};

use crate::compose::{ComposedStory, Segment, Token};
use crate::hunt::HuntState;

type Escaped<T> = MarkupDisplay<Html, T>;

fn escaped<T: Display>(value: T) -> Escaped<T> {
    MarkupDisplay::new_unsafe(value, Html)
}

/// HTML-escapes text for element content and attribute values.
pub fn escape_html(text: &str) -> String {
    escaped(text).to_string()
}

/// Story line breaks become `<br>`; everything else is escaped.
fn push_literal(out: &mut String, c: char) {
    if c == '\n' {
        out.push_str("<br>");
    } else {
        let _ = write!(out, "{}", escaped(c));
    }
}

fn render_token(out: &mut String, token: &Token, hunt: Option<&HuntState>) {
    let hanzi = match token {
        Token::Literal { character } => {
            push_literal(out, *character);
            return;
        }
        Token::Hanzi(h) => h,
    };
    let pinyin = escaped(hanzi.pinyin.as_str());
    if !hanzi.seek {
        let _ = write!(out, "<ruby>{}<rt>{}</rt></ruby>", hanzi.character, pinyin);
        return;
    }
    let mut class = String::from("hidden-char");
    if let Some(hunt) = hunt {
        if hunt.is_captured(hanzi.id) {
            class.push_str(" found");
        }
        if hunt.is_hinted(hanzi.id) {
            class.push_str(" hint-reveal");
        }
    }
    let _ = write!(
        out,
        "<ruby class=\"{}\" data-token=\"{}\">{}<rt>{}</rt></ruby>",
        class, hanzi.id.0, hanzi.character, pinyin
    );
}

/// Renders the story; pass the hunt to reflect capture state.
pub fn render_story(story: &ComposedStory, hunt: Option<&HuntState>) -> String {
    let mut out = String::new();
    for segment in story.segments() {
        match segment {
            Segment::Single { token } => render_token(&mut out, token, hunt),
            Segment::Vocab { entry, tokens } => {
                let _ = write!(out, "<span class=\"vocab-word\" data-vocab=\"{entry}\">");
                for token in tokens {
                    render_token(&mut out, token, hunt);
                }
                out.push_str("</span>");
            }
        }
    }
    out
}

//! Character classification: which characters carry a pinyin reading.

/// First and last code points of the annotatable hanzi block (CJK Unified Ideographs,
/// excluding the late additions at the tail of the block).
pub const HANZI_FIRST: char = '\u{4e00}';
pub const HANZI_LAST: char = '\u{9fa5}';

/// True for characters that consume one pinyin token and may be hunted.
/// Punctuation, latin letters, digits and whitespace pass through untouched.
pub fn is_hanzi(c: char) -> bool {
    (HANZI_FIRST..=HANZI_LAST).contains(&c)
}

/// Number of annotatable characters in `text`.
pub fn count_hanzi(text: &str) -> usize {
    text.chars().filter(|&c| is_hanzi(c)).count()
}

/// Whitespace-separated pinyin syllables, in story order.
pub fn pinyin_tokens(pinyin: &str) -> Vec<&str> {
    pinyin.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_hanzi() {
        for c in ['你', '好', '猫', '一', '龥'] {
            assert!(is_hanzi(c), "'{}' should be annotatable", c);
        }
    }

    #[test]
    fn punctuation_and_latin_pass_through() {
        for c in ['，', '。', '！', '“', 'a', 'Z', '7', ' ', '\n', '々'] {
            assert!(!is_hanzi(c), "'{}' should not be annotatable", c);
        }
    }

    #[test]
    fn counts_only_hanzi() {
        assert_eq!(count_hanzi("小猫，你好！Hi 2"), 4);
        assert_eq!(count_hanzi(""), 0);
    }

    #[test]
    fn pinyin_splits_on_any_whitespace() {
        assert_eq!(pinyin_tokens("  xiǎo māo\n nǐ\thǎo "), vec!["xiǎo", "māo", "nǐ", "hǎo"]);
        assert!(pinyin_tokens("   ").is_empty());
    }
}

//! Error taxonomy for the game core.
//!
//! Each kind maps to a different recovery: a [`LoadError`] shows the retry screen, a
//! [`DataIntegrityError`] degrades one lesson to pinyin-less rendering, and a
//! [`PersistenceError`] leaves progress session-only. None of them abort a transition.

/// Catalog unavailable or malformed.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("catalog could not be fetched: {0}")]
    Unavailable(String),

    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog contains no lessons")]
    Empty,

    #[error("duplicate lesson id '{0}' in catalog")]
    DuplicateId(String),

    #[error("lesson '{lesson}': {reason}")]
    Schema { lesson: String, reason: String },
}

/// Pinyin stream and story text disagree on how many annotatable characters there are.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lesson '{lesson}': {pinyin_tokens} pinyin tokens for {script_chars} hanzi")]
pub struct DataIntegrityError {
    pub lesson: String,
    pub script_chars: usize,
    pub pinyin_tokens: usize,
}

/// Durable key-value store refused a read or write.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    #[error("write to '{key}' failed: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("stored progress under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

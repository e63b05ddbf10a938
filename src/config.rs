//! Runtime settings passed in by the host page, with `?debug=true` style query overrides.

use serde::{Deserialize, Serialize};

use crate::hunt::DEFAULT_HINT_PERCENT;
use crate::progress::DEFAULT_STORAGE_KEY;

/// Runtime settings. Every field has a default, so hosts only pass what they override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Storage key holding the completion record.
    pub storage_key: String,
    /// Hint budget as a percentage of all seek-character occurrences, rounded up.
    pub hint_percent: u32,
    /// Panic on bad lesson data and contract violations (unknown lesson ids, misaligned
    /// pinyin) instead of degrading. Defaults to on in debug builds.
    pub strict: bool,
    /// Enables debug events (force-complete, progress reset) and verbose logging.
    pub debug: bool,
    /// Fixed seed for hint selection; fresh entropy when absent.
    pub hint_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            hint_percent: DEFAULT_HINT_PERCENT,
            strict: cfg!(debug_assertions),
            debug: false,
            hint_seed: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a (possibly partial) JSON object; an empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    /// Applies page query overrides such as `?debug=true`.
    pub fn with_query(mut self, query: &str) -> Self {
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "debug" => self.debug = matches!(value, "true" | "1" | ""),
                "seed" => self.hint_seed = value.parse().ok().or(self.hint_seed),
                _ => {}
            }
        }
        self
    }
}

//! Hunt tracker: per-character capture counts, hint budget and completion detection.
//!
//! Totals come from the composed story, so the counters always agree with what was rendered.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::Serialize;

use crate::compose::{ComposedStory, TokenId};

pub const DEFAULT_HINT_PERCENT: u32 = 15;

/// `ceil(percent% of total)` in exact integer arithmetic, capped at `total`.
pub fn hint_budget(total: u32, percent: u32) -> u32 {
    let budget = (u64::from(total) * u64::from(percent)).div_ceil(100);
    u32::try_from(budget.min(u64::from(total))).unwrap_or(total)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekProgress {
    pub character: char,
    pub found: u32,
    pub total: u32,
}

impl SeekProgress {
    pub fn is_done(&self) -> bool {
        self.found == self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The token does not exist or is not a seek target.
    NotATarget,
    AlreadyCaptured,
    Captured {
        character: char,
        character_complete: bool,
        hunt_complete: bool,
    },
}

impl CaptureOutcome {
    pub fn hunt_complete(&self) -> bool {
        matches!(self, CaptureOutcome::Captured { hunt_complete: true, .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintReveal {
    pub token: TokenId,
    pub outcome: CaptureOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HuntSnapshot {
    pub progress: Vec<SeekProgress>,
    pub hints_remaining: u32,
    pub hints_max: u32,
    pub captured: Vec<TokenId>,
    pub hinted: Vec<TokenId>,
    pub complete: bool,
}

#[derive(Debug, Clone)]
pub struct HuntState {
    progress: Vec<SeekProgress>,
    targets: BTreeMap<TokenId, char>,
    captured: BTreeSet<TokenId>,
    hinted: BTreeSet<TokenId>,
    hints_remaining: u32,
    hints_max: u32,
}

impl HuntState {
    /// Counts every rendered occurrence of each seek character, vocabulary spans included.
    pub fn initialize(seek_characters: &[char], story: &ComposedStory, hint_percent: u32) -> Self {
        let mut progress: Vec<SeekProgress> = Vec::with_capacity(seek_characters.len());
        for &c in seek_characters {
            if progress.iter().any(|p| p.character == c) {
                continue;
            }
            let total = story.hanzi().filter(|h| h.character == c).count() as u32;
            progress.push(SeekProgress {
                character: c,
                found: 0,
                total,
            });
        }
        let targets: BTreeMap<TokenId, char> = story
            .hanzi()
            .filter(|h| seek_characters.contains(&h.character))
            .map(|h| (h.id, h.character))
            .collect();
        let hints_max = hint_budget(progress.iter().map(|p| p.total).sum(), hint_percent);
        tracing::debug!(targets = targets.len(), hints_max, "hunt initialized");
        Self {
            progress,
            targets,
            captured: BTreeSet::new(),
            hinted: BTreeSet::new(),
            hints_remaining: hints_max,
            hints_max,
        }
    }

    /// Marks a seek token as found. Capturing the same token twice counts once.
    pub fn capture(&mut self, token: TokenId) -> CaptureOutcome {
        let Some(&character) = self.targets.get(&token) else {
            return CaptureOutcome::NotATarget;
        };
        if !self.captured.insert(token) {
            return CaptureOutcome::AlreadyCaptured;
        }
        let mut character_complete = false;
        if let Some(slot) = self.progress.iter_mut().find(|p| p.character == character) {
            debug_assert!(slot.found < slot.total);
            slot.found += 1;
            character_complete = slot.is_done();
        }
        CaptureOutcome::Captured {
            character,
            character_complete,
            hunt_complete: self.is_complete(),
        }
    }

    /// Spends one hint on a uniformly random uncaptured seek token.
    /// Returns `None` without spending when the budget is exhausted or nothing is left to find.
    pub fn use_hint<R: Rng>(&mut self, rng: &mut R) -> Option<HintReveal> {
        if self.hints_remaining == 0 {
            return None;
        }
        let open: Vec<TokenId> = self.uncaptured().collect();
        if open.is_empty() {
            return None;
        }
        let token = open[rng.gen_range(0..open.len())];
        let outcome = self.capture(token);
        self.hinted.insert(token);
        self.hints_remaining -= 1;
        Some(HintReveal { token, outcome })
    }

    /// Every seek character fully found. A hunt with nothing to capture (no seek characters,
    /// or none of them in the story) is never complete.
    pub fn is_complete(&self) -> bool {
        !self.targets.is_empty() && self.progress.iter().all(SeekProgress::is_done)
    }

    pub fn uncaptured(&self) -> impl Iterator<Item = TokenId> + '_ {
        self.targets.keys().copied().filter(|t| !self.captured.contains(t))
    }

    pub fn is_captured(&self, token: TokenId) -> bool {
        self.captured.contains(&token)
    }

    pub fn is_hinted(&self, token: TokenId) -> bool {
        self.hinted.contains(&token)
    }

    pub fn progress(&self) -> &[SeekProgress] {
        &self.progress
    }

    pub fn progress_of(&self, character: char) -> Option<&SeekProgress> {
        self.progress.iter().find(|p| p.character == character)
    }

    pub fn hints_remaining(&self) -> u32 {
        self.hints_remaining
    }

    pub fn hints_max(&self) -> u32 {
        self.hints_max
    }

    pub fn snapshot(&self) -> HuntSnapshot {
        HuntSnapshot {
            progress: self.progress.clone(),
            hints_remaining: self.hints_remaining,
            hints_max: self.hints_max,
            captured: self.captured.iter().copied().collect(),
            hinted: self.hinted.iter().copied().collect(),
            complete: self.is_complete(),
        }
    }
}

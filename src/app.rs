//! Lesson / view state machine.
//!
//! `App` is the single owner of all game state. The presentation layer feeds it [`Event`]s one
//! at a time and reads snapshots back; nothing else mutates state. Each event is processed to
//! completion (capture, completion check, progress write) before `dispatch` returns.
//!
//! ```text
//! Booting --load ok--> Catalog --select (unlocked)--> LessonIntro --begin--> ActiveHunt
//!    |                   ^  ^                                                  |    ^
//!    +--load err--> LoadFailed --retry--+                        capture/hint  +----+
//!                        |                                                     |
//!                        |          Catalog <--acknowledge-- Completion <--hunt complete
//! any lesson view --abandon--> Catalog (no completion recorded)
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::compose::{ComposedStory, TokenId, compose_lesson};
use crate::config::Config;
use crate::hunt::{CaptureOutcome, HuntSnapshot, HuntState};
use crate::lesson::{Catalog, CatalogLoader, Lesson, VocabEntry};
use crate::markup;
use crate::progress::ProgressStore;
use crate::storage::KeyValueStore;
use crate::unlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    /// Waiting for the catalog; no user event is valid yet.
    Booting,
    /// Catalog could not be loaded; only a retry is valid.
    LoadFailed,
    Catalog,
    LessonIntro,
    ActiveHunt,
    Completion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectLesson(String),
    BeginLesson,
    CaptureToken(TokenId),
    UseHint,
    Abandon,
    /// Leave the completion screen.
    Acknowledge,
    /// Debug only: finish the active lesson immediately.
    ForceComplete,
    /// Debug only: forget all completions (from the catalog view).
    ResetProgress,
}

/// What changed as a result of one event. An empty list means the event was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Notification {
    #[serde(rename_all = "camelCase")]
    ViewChanged { view: View },
    #[serde(rename_all = "camelCase")]
    Captured {
        token: TokenId,
        character: char,
        character_complete: bool,
        by_hint: bool,
    },
    /// The lesson was recorded as complete; `persisted` is false when storage refused the write.
    #[serde(rename_all = "camelCase")]
    LessonCompleted { lesson_id: String, persisted: bool },
    ProgressReset,
}

/// One bookshelf card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub hero_name: String,
    pub image_ref: String,
    pub unlocked: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub hero_name: String,
    pub image_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub view: View,
    pub lesson: Option<LessonSummary>,
    pub hunt: Option<HuntSnapshot>,
    pub load_error: Option<String>,
}

/// The lesson currently entered. Composition happens once, when the session is created.
struct Session {
    index: usize,
    story: ComposedStory,
    hunt: Option<HuntState>,
}

pub struct App<S: KeyValueStore> {
    config: Config,
    catalog: Option<Catalog>,
    load_error: Option<String>,
    progress: ProgressStore<S>,
    session: Option<Session>,
    view: View,
    rng: ChaCha8Rng,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(config: Config, store: S) -> Self {
        let progress = ProgressStore::open(store, &config.storage_key);
        let rng = match config.hint_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            catalog: None,
            load_error: None,
            progress,
            session: None,
            view: View::Booting,
            rng,
        }
    }

    // --- Boot -----------------------------------------------------------------

    /// Resolves the one-time catalog load. Only valid while booting.
    pub fn boot<L: CatalogLoader + ?Sized>(&mut self, loader: &mut L) -> View {
        if self.view != View::Booting {
            tracing::warn!(view = ?self.view, "boot ignored: catalog already resolved");
            return self.view;
        }
        self.load(loader)
    }

    /// Tries the load again after a failure.
    pub fn retry<L: CatalogLoader + ?Sized>(&mut self, loader: &mut L) -> View {
        if self.view != View::LoadFailed {
            return self.view;
        }
        self.load(loader)
    }

    fn load<L: CatalogLoader + ?Sized>(&mut self, loader: &mut L) -> View {
        match loader.load() {
            Ok(catalog) => {
                tracing::info!(lessons = catalog.len(), "catalog loaded");
                self.catalog = Some(catalog);
                self.load_error = None;
                self.view = View::Catalog;
            }
            Err(e) => {
                tracing::error!("catalog load failed: {e}");
                self.load_error = Some(e.to_string());
                self.view = View::LoadFailed;
            }
        }
        self.view
    }

    // --- Dispatch -------------------------------------------------------------

    pub fn dispatch(&mut self, event: Event) -> Vec<Notification> {
        tracing::debug!(view = ?self.view, ?event, "dispatch");
        match (self.view, event) {
            (View::Catalog, Event::SelectLesson(id)) => self.select(&id),
            (View::LessonIntro, Event::BeginLesson) => self.begin(),
            (View::ActiveHunt, Event::CaptureToken(token)) => self.capture(token),
            (View::ActiveHunt, Event::UseHint) => self.hint(),
            (View::ActiveHunt, Event::ForceComplete) if self.config.debug => self.complete(Vec::new()),
            (View::Completion, Event::Acknowledge) => self.to_catalog(),
            (View::LessonIntro | View::ActiveHunt | View::Completion, Event::Abandon) => self.to_catalog(),
            (View::Catalog, Event::ResetProgress) if self.config.debug => self.reset_progress(),
            (view, event) => {
                tracing::debug!(?view, ?event, "event not valid in this view");
                Vec::new()
            }
        }
    }

    fn select(&mut self, id: &str) -> Vec<Notification> {
        let Some(catalog) = self.catalog.as_ref() else {
            return Vec::new();
        };
        let Some(index) = catalog.position(id) else {
            assert!(!self.config.strict, "selected unknown lesson '{id}'");
            tracing::warn!(lesson = id, "selected unknown lesson");
            return Vec::new();
        };
        if !unlock::is_unlocked(catalog, &self.progress, index) {
            tracing::debug!(lesson = id, "lesson is locked");
            return Vec::new();
        }
        let lesson = &catalog.lessons()[index];
        let story = compose_lesson(lesson, self.config.strict);
        tracing::info!(lesson = id, "entering lesson");
        self.session = Some(Session {
            index,
            story,
            hunt: None,
        });
        self.set_view(View::LessonIntro)
    }

    fn begin(&mut self) -> Vec<Notification> {
        let hint_percent = self.config.hint_percent;
        let Some(lesson) = self.active_lesson() else {
            return Vec::new();
        };
        let seek = lesson.distinct_seek_characters();
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        session.hunt = Some(HuntState::initialize(&seek, &session.story, hint_percent));
        self.set_view(View::ActiveHunt)
    }

    fn capture(&mut self, token: TokenId) -> Vec<Notification> {
        let Some(hunt) = self.session.as_mut().and_then(|s| s.hunt.as_mut()) else {
            return Vec::new();
        };
        let outcome = hunt.capture(token);
        self.after_capture(token, outcome, false)
    }

    fn hint(&mut self) -> Vec<Notification> {
        let Some(hunt) = self.session.as_mut().and_then(|s| s.hunt.as_mut()) else {
            return Vec::new();
        };
        let Some(reveal) = hunt.use_hint(&mut self.rng) else {
            tracing::debug!("no hint available");
            return Vec::new();
        };
        tracing::debug!(token = reveal.token.0, remaining = hunt.hints_remaining(), "hint used");
        self.after_capture(reveal.token, reveal.outcome, true)
    }

    fn after_capture(&mut self, token: TokenId, outcome: CaptureOutcome, by_hint: bool) -> Vec<Notification> {
        let CaptureOutcome::Captured {
            character,
            character_complete,
            hunt_complete,
        } = outcome
        else {
            return Vec::new();
        };
        let captured = Notification::Captured {
            token,
            character,
            character_complete,
            by_hint,
        };
        if hunt_complete {
            self.complete(vec![captured])
        } else {
            vec![captured]
        }
    }

    /// Records completion before the completion screen is shown, so the next catalog render
    /// already sees the unlock.
    fn complete(&mut self, mut notes: Vec<Notification>) -> Vec<Notification> {
        let Some(lesson_id) = self.active_lesson().map(|l| l.id.clone()) else {
            return notes;
        };
        let persisted = match self.progress.mark_complete(&lesson_id) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(lesson = %lesson_id, "progress kept for this session only: {e}");
                false
            }
        };
        tracing::info!(lesson = %lesson_id, "lesson complete");
        notes.push(Notification::LessonCompleted { lesson_id, persisted });
        notes.extend(self.set_view(View::Completion));
        notes
    }

    fn to_catalog(&mut self) -> Vec<Notification> {
        self.session = None;
        self.set_view(View::Catalog)
    }

    fn reset_progress(&mut self) -> Vec<Notification> {
        if let Err(e) = self.progress.clear() {
            tracing::warn!("progress reset not persisted: {e}");
        }
        vec![Notification::ProgressReset]
    }

    fn set_view(&mut self, view: View) -> Vec<Notification> {
        if self.view == view {
            return Vec::new();
        }
        self.view = view;
        vec![Notification::ViewChanged { view }]
    }

    // --- Queries --------------------------------------------------------------

    pub fn view(&self) -> View {
        self.view
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn progress(&self) -> &ProgressStore<S> {
        &self.progress
    }

    pub fn catalog_entries(&self) -> Vec<CatalogEntry> {
        let Some(catalog) = self.catalog.as_ref() else {
            return Vec::new();
        };
        catalog
            .lessons()
            .iter()
            .enumerate()
            .map(|(i, lesson)| CatalogEntry {
                id: lesson.id.clone(),
                title: lesson.title.clone(),
                hero_name: lesson.hero_name.clone(),
                image_ref: lesson.image_ref.clone(),
                unlocked: unlock::is_unlocked(catalog, &self.progress, i),
                completed: self.progress.is_complete(&lesson.id),
            })
            .collect()
    }

    pub fn active_lesson(&self) -> Option<&Lesson> {
        let index = self.session.as_ref()?.index;
        self.catalog.as_ref()?.get(index)
    }

    pub fn story(&self) -> Option<&ComposedStory> {
        self.session.as_ref().map(|s| &s.story)
    }

    pub fn hunt(&self) -> Option<&HuntState> {
        self.session.as_ref()?.hunt.as_ref()
    }

    /// Entry behind a clicked vocabulary span.
    pub fn vocabulary(&self, index: usize) -> Option<&VocabEntry> {
        self.active_lesson()?.vocabulary.get(index)
    }

    pub fn story_markup(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        Some(markup::render_story(&session.story, session.hunt.as_ref()))
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            view: self.view,
            lesson: self.active_lesson().map(|l| LessonSummary {
                id: l.id.clone(),
                title: l.title.clone(),
                hero_name: l.hero_name.clone(),
                image_ref: l.image_ref.clone(),
            }),
            hunt: self.hunt().map(HuntState::snapshot),
            load_error: self.load_error.clone(),
        }
    }
}

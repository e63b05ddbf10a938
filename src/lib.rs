//! Mandarin Quest core crate.
//!
//! Learners read short illustrated stories, tap every occurrence of the target hanzi to
//! capture them, and unlock the next lesson on completion. This crate holds everything
//! except the page chrome: story annotation ([`compose`]), the hunt counters ([`hunt`]),
//! completion persistence ([`progress`]), the unlock rule ([`unlock`]) and the view state
//! machine ([`app`]). The browser binding lives in `web` (wasm32 only).

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod compose;
pub mod config;
pub mod demo;
pub mod error;
pub mod hunt;
pub mod lesson;
pub mod logging;
pub mod markup;
pub mod progress;
pub mod script;
pub mod storage;
pub mod unlock;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{App, AppSnapshot, CatalogEntry, Event, Notification, View};
pub use compose::{ComposedStory, HanziToken, Segment, Token, TokenId, compose};
pub use config::Config;
pub use error::{DataIntegrityError, LoadError, PersistenceError};
pub use hunt::{CaptureOutcome, HuntSnapshot, HuntState};
pub use lesson::{Catalog, CatalogLoader, JsonCatalog, Lesson, VocabEntry};
pub use progress::ProgressStore;
pub use storage::{KeyValueStore, MemoryStore};
pub use unlock::{CompletionLookup, is_unlocked};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

//! Browser shell: the object the page script talks to.
//!
//! The page fetches `data.json` itself and hands the text over (or the failure reason), then
//! forwards clicks as method calls. Every event method returns the JSON list of
//! notifications so the page can animate captures and switch views.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::app::{App, Event};
use crate::compose::TokenId;
use crate::config::Config;
use crate::error::LoadError;
use crate::lesson::{Catalog, JsonCatalog};
use crate::logging;
use crate::storage::LocalStorage;

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn page_query() -> String {
    window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

#[wasm_bindgen]
pub struct MandarinQuest {
    app: App<LocalStorage>,
}

impl MandarinQuest {
    fn send(&mut self, event: Event) -> Result<String, JsValue> {
        to_json(&self.app.dispatch(event))
    }
}

#[wasm_bindgen]
impl MandarinQuest {
    /// `config_json` may be empty; `?debug=true` on the page URL enables debug mode.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<MandarinQuest, JsValue> {
        let config = Config::from_json(config_json)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?
            .with_query(&page_query());
        logging::init(config.debug);
        Ok(MandarinQuest {
            app: App::new(config, LocalStorage::new()),
        })
    }

    /// Catalog text fetched by the page. Returns the resulting view name.
    #[wasm_bindgen(js_name = catalogLoaded)]
    pub fn catalog_loaded(&mut self, json: &str) -> Result<String, JsValue> {
        let view = match self.app.load_error() {
            Some(_) => self.app.retry(&mut JsonCatalog(json)),
            None => self.app.boot(&mut JsonCatalog(json)),
        };
        to_json(&view)
    }

    /// The page could not fetch the catalog; shows the retry screen.
    #[wasm_bindgen(js_name = catalogFailed)]
    pub fn catalog_failed(&mut self, reason: &str) -> Result<String, JsValue> {
        let mut failed = || -> Result<Catalog, LoadError> { Err(LoadError::Unavailable(reason.to_string())) };
        let view = match self.app.load_error() {
            Some(_) => self.app.retry(&mut failed),
            None => self.app.boot(&mut failed),
        };
        to_json(&view)
    }

    #[wasm_bindgen(js_name = selectLesson)]
    pub fn select_lesson(&mut self, id: &str) -> Result<String, JsValue> {
        self.send(Event::SelectLesson(id.to_string()))
    }

    #[wasm_bindgen(js_name = beginLesson)]
    pub fn begin_lesson(&mut self) -> Result<String, JsValue> {
        self.send(Event::BeginLesson)
    }

    #[wasm_bindgen(js_name = captureToken)]
    pub fn capture_token(&mut self, token: u32) -> Result<String, JsValue> {
        self.send(Event::CaptureToken(TokenId(token)))
    }

    #[wasm_bindgen(js_name = useHint)]
    pub fn use_hint(&mut self) -> Result<String, JsValue> {
        self.send(Event::UseHint)
    }

    pub fn abandon(&mut self) -> Result<String, JsValue> {
        self.send(Event::Abandon)
    }

    pub fn acknowledge(&mut self) -> Result<String, JsValue> {
        self.send(Event::Acknowledge)
    }

    #[wasm_bindgen(js_name = forceComplete)]
    pub fn force_complete(&mut self) -> Result<String, JsValue> {
        self.send(Event::ForceComplete)
    }

    #[wasm_bindgen(js_name = resetProgress)]
    pub fn reset_progress(&mut self) -> Result<String, JsValue> {
        self.send(Event::ResetProgress)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        to_json(&self.app.snapshot())
    }

    /// Bookshelf cards with lock / star state.
    pub fn catalog(&self) -> Result<String, JsValue> {
        to_json(&self.app.catalog_entries())
    }

    /// Annotated story markup for the entered lesson.
    #[wasm_bindgen(js_name = storyHtml)]
    pub fn story_html(&self) -> Option<String> {
        self.app.story_markup()
    }

    /// Vocabulary popup content for a clicked `data-vocab` span.
    pub fn vocabulary(&self, index: usize) -> Result<Option<String>, JsValue> {
        self.app.vocabulary(index).map(to_json).transpose()
    }
}

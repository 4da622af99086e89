//! TariffBrowser: JS bindings for the browser pipeline
//!
//! ```javascript,ignore
//! const browser = new TariffBrowser(treeJson, { include_descendants: true });
//! input.oninput = (e) => {
//!     const deadline = browser.setInput(e.target.value, performance.now());
//!     setTimeout(() => { if (browser.tick(performance.now())) list.refresh(); },
//!                deadline - performance.now());
//! };
//! list.renderWindow = (start, count) => browser.rows(start, count, 'ro');
//! ```

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use super::view::Browser;
use crate::catalog::Lang;
use crate::search::{highlight, normalize, SearchConfig};

// Maps become plain objects, not JS `Map`s
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn lang_or_default(lang: Option<String>) -> Lang {
    lang.as_deref().and_then(Lang::parse).unwrap_or_default()
}

#[wasm_bindgen]
pub struct TariffBrowser {
    inner: Browser,
}

#[wasm_bindgen]
impl TariffBrowser {
    /// Load the nested tree. `config` may be `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str, config: JsValue) -> Result<TariffBrowser, JsValue> {
        let config: SearchConfig = if config.is_undefined() || config.is_null() {
            SearchConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };

        let start = instant::Instant::now();
        let inner = Browser::from_json(json, config).map_err(|e| {
            web_sys::console::error_1(&format!("[TariffBrowser] Load failed: {}", e).into());
            JsValue::from_str(&e.to_string())
        })?;

        web_sys::console::log_1(
            &format!(
                "[TariffBrowser] Loaded {} records in {}ms",
                inner.catalog().len(),
                start.elapsed().as_millis()
            )
            .into(),
        );

        Ok(TariffBrowser { inner })
    }

    /// Record raw input; returns the time (ms) at which `tick` should be called
    #[wasm_bindgen(js_name = setInput)]
    pub fn set_input(&mut self, raw: &str, now_ms: f64) -> f64 {
        self.inner.set_input(raw, now_ms);
        self.inner.next_deadline().unwrap_or(now_ms)
    }

    /// Returns true when the visible rows changed
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.inner.tick(now_ms)
    }

    #[wasm_bindgen(js_name = applyQuery)]
    pub fn apply_query(&mut self, raw: &str) -> bool {
        self.inner.apply_query(raw)
    }

    #[wasm_bindgen(js_name = hasPending)]
    pub fn has_pending(&self) -> bool {
        self.inner.has_pending()
    }

    #[wasm_bindgen]
    pub fn input(&self) -> String {
        self.inner.input().to_string()
    }

    /// Query text behind the current rows
    #[wasm_bindgen(js_name = activeQuery)]
    pub fn active_query(&self) -> String {
        self.inner.snapshot().query.clone()
    }

    #[wasm_bindgen(js_name = visibleCount)]
    pub fn visible_count(&self) -> usize {
        self.inner.snapshot().visible.len()
    }

    #[wasm_bindgen(js_name = matchedCount)]
    pub fn matched_count(&self) -> usize {
        self.inner.snapshot().matched_count
    }

    #[wasm_bindgen(js_name = recordCount)]
    pub fn record_count(&self) -> usize {
        self.inner.catalog().len()
    }

    /// Array of row objects for the window `[start, start + count)`
    #[wasm_bindgen]
    pub fn rows(&self, start: usize, count: usize, lang: Option<String>) -> Result<JsValue, JsValue> {
        let rows = self.inner.rows(start, count, lang_or_default(lang));
        to_js(&rows).map_err(|e| {
            web_sys::console::error_1(&format!("[TariffBrowser] Serialization failed: {:?}", e).into());
            e
        })
    }

    #[wasm_bindgen]
    pub fn breadcrumb(&self, id: u32, lang: Option<String>) -> Option<String> {
        self.inner.breadcrumb(id, lang_or_default(lang))
    }

    #[wasm_bindgen]
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.stats())
    }

    /// `{ search_us, expand_us, total_us }` of the last recompute
    #[wasm_bindgen(js_name = lastTimings)]
    pub fn last_timings(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.snapshot().timings)
    }
}

/// Case- and diacritic-folded form of `text`
#[wasm_bindgen(js_name = normalizeText)]
pub fn normalize_text(text: &str) -> String {
    normalize(text)
}

/// Split `text` into `{ text, is_match }` spans for the given words
#[wasm_bindgen(js_name = highlightText)]
pub fn highlight_text(text: &str, words: &js_sys::Array) -> Result<JsValue, JsValue> {
    let words: Vec<String> = words.iter().filter_map(|w| w.as_string()).collect();
    to_js(&highlight(text, &words).to_owned_spans())
}

//! Radial Bubble - WASM Module
//!
//! This module provides the layout and interaction engine for a radial
//! bubble chart. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen: the host pushes a categorical
//! dataset and gets back a frame of circles and text marks to draw.
//!
//! # Architecture
//!
//! - `chart`: Dataset ingestion, resolved points and the chart engine
//! - `layout`: Value transform, ranking, angles, colors and ring geometry
//! - `render`: Projection of points into layer attributes
//! - `interaction`: Highlight and click-selection opacity rules
//! - `objects`: Property round-trip with the host's persisted objects
//! - `spatial`: R-tree spatial indexing for hit testing

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};

pub mod chart;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod logging;
pub mod objects;
pub mod render;
pub mod settings;
pub mod spatial;

use chart::{CategoricalDataset, ChartEngine, SelectionKey};
use layout::Viewport;
use objects::ObjectKind;
use render::{EstimatedTextMeasurer, RenderFrame, TextMeasurer};
use settings::Settings;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

/// Everything the host pushes on an update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateOptions {
    pub dataset: CategoricalDataset,
    pub viewport: Viewport,
    pub settings: Settings,
}

/// Text measurer backed by a host function `(text, fontSize) -> number`.
struct JsTextMeasurer {
    measure: Function,
    fallback: EstimatedTextMeasurer,
}

impl TextMeasurer for JsTextMeasurer {
    fn text_height(&self, text: &str, font_size: f64) -> f64 {
        let measured = self
            .measure
            .call2(
                &JsValue::NULL,
                &JsValue::from_str(text),
                &JsValue::from_f64(font_size),
            )
            .ok()
            .and_then(|value| value.as_f64())
            .filter(|height| height.is_finite());
        match measured {
            Some(height) => height,
            None => {
                log::debug!("host text measurer failed for {text:?}; using estimate");
                self.fallback.text_height(text, font_size)
            }
        }
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

/// Main entry point for the chart engine.
///
/// This struct wraps the internal ChartEngine and provides the public API
/// exposed to JavaScript. The engine is shared with in-flight selection
/// futures, so it lives behind `Rc<RefCell<_>>`.
#[wasm_bindgen]
pub struct RadialBubbleWasm {
    engine: Rc<RefCell<ChartEngine>>,
}

#[wasm_bindgen]
impl RadialBubbleWasm {
    /// Create a chart with nothing rendered.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: Rc::new(RefCell::new(ChartEngine::new())),
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Run a full render pass and return the frame to draw.
    ///
    /// Never throws. Malformed options or a failed render are logged and
    /// yield an empty frame, and the chart then enumerates nothing.
    ///
    /// # Arguments
    ///
    /// * `options` - `{ dataset, viewport, settings }`
    ///
    /// The render runs on an engine detached from the chart, so a host text
    /// measurer that calls back into the chart sees an empty one instead of
    /// a held borrow.
    pub fn update(&mut self, options: JsValue) -> JsValue {
        let mut engine = self.engine.take();
        let frame = match serde_wasm_bindgen::from_value::<UpdateOptions>(options) {
            Ok(opts) => match engine.render(&opts.dataset, opts.viewport, opts.settings) {
                Ok(frame) => frame.clone(),
                Err(err) => {
                    log::error!("render failed: {err}");
                    RenderFrame::default()
                }
            },
            Err(err) => {
                log::error!("malformed update options: {err}");
                engine.clear();
                RenderFrame::default()
            }
        };
        self.engine.replace(engine);
        to_js(&frame).unwrap_or(JsValue::NULL)
    }

    /// The frame of the last render, including applied opacity updates.
    #[wasm_bindgen(js_name = currentFrame)]
    pub fn current_frame(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.borrow().frame())
    }

    /// Get the number of rendered points.
    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.engine.borrow().point_count()
    }

    /// Install a host text measurer used to center value labels.
    ///
    /// # Arguments
    ///
    /// * `measure` - `(text: string, fontSize: number) => number`
    #[wasm_bindgen(js_name = setTextMeasurer)]
    pub fn set_text_measurer(&mut self, measure: Function) {
        self.engine
            .borrow_mut()
            .set_measurer(Box::new(JsTextMeasurer {
                measure,
                fallback: EstimatedTextMeasurer::default(),
            }));
    }

    // =========================================================================
    // Property Round-Trip
    // =========================================================================

    /// Enumerate persistable objects of the given kind.
    ///
    /// Unknown kinds yield an empty array.
    #[wasm_bindgen(js_name = enumerateObjects)]
    pub fn enumerate_objects(&self, kind: &str) -> Result<JsValue, JsValue> {
        let instances = self
            .engine
            .borrow()
            .enumerate_objects(&ObjectKind::parse(kind));
        to_js(&instances)
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Selection key of the topmost bubble at `(x, y)`, if any.
    #[wasm_bindgen(js_name = hitTest)]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<String> {
        self.engine
            .borrow()
            .hit_test(x, y)
            .map(|key| key.as_str().to_owned())
    }

    /// Ask the host to select `key` and apply its answer.
    ///
    /// `host_select` receives the key and returns the resulting selection
    /// (an array of keys, or a Promise of one). The returned Promise
    /// resolves to the opacity update, or rejects if the host fails; in
    /// that case opacity is left unchanged.
    ///
    /// # Arguments
    ///
    /// * `key` - Selection key of the clicked bubble
    /// * `host_select` - `(key: string) => string[] | Promise<string[]>`
    pub fn select(&self, key: String, host_select: Function) -> Promise {
        let ticket = self
            .engine
            .borrow_mut()
            .begin_selection(SelectionKey::new(key.clone()));
        let engine = Rc::clone(&self.engine);

        future_to_promise(async move {
            let answer: Result<Vec<SelectionKey>, JsValue> = async {
                let pending = host_select.call1(&JsValue::NULL, &JsValue::from_str(&key))?;
                let resolved = JsFuture::from(Promise::resolve(&pending)).await?;
                serde_wasm_bindgen::from_value::<Vec<SelectionKey>>(resolved).map_err(JsValue::from)
            }
            .await;

            match answer {
                Ok(selection) => {
                    let update = engine.borrow_mut().resolve_selection(ticket, selection);
                    to_js(&update)
                }
                Err(err) => {
                    engine.borrow_mut().abandon_selection(ticket);
                    Err(err)
                }
            }
        })
    }
}

impl Default for RadialBubbleWasm {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Integration tests (no JS types)
// =========================================================================


// =========================================================================
// Browser tests (JS boundary)
// =========================================================================

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::cell::Cell;

    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    fn abc_chart() -> RadialBubbleWasm {
        let options = serde_json::json!({
            "dataset": {
                "categories": ["A", "B", "C"],
                "measure": { "values": [0.5, 0.3, 0.2] }
            },
            "viewport": { "width": 800.0, "height": 600.0 }
        });
        let mut chart = RadialBubbleWasm::new();
        chart.update(js_sys::JSON::parse(&options.to_string()).unwrap());
        assert_eq!(chart.point_count(), 3);
        chart
    }

    fn bubble_opacities(chart: &RadialBubbleWasm) -> Vec<f64> {
        chart
            .engine
            .borrow()
            .frame()
            .bubbles
            .iter()
            .map(|b| b.fill_opacity)
            .collect()
    }

    fn host(body: &str) -> Function {
        Function::new_with_args("key", body)
    }

    #[wasm_bindgen_test]
    async fn test_select_with_array_answer() {
        let chart = abc_chart();
        let update = JsFuture::from(chart.select("B".into(), host("return [key];")))
            .await
            .unwrap();
        assert!(!update.is_undefined());
        assert_eq!(bubble_opacities(&chart), vec![0.3, 0.7, 0.3]);
    }

    #[wasm_bindgen_test]
    async fn test_select_with_promise_answer_then_clear() {
        let chart = abc_chart();
        JsFuture::from(chart.select("C".into(), host("return Promise.resolve([key]);")))
            .await
            .unwrap();
        assert_eq!(bubble_opacities(&chart), vec![0.3, 0.3, 0.7]);

        JsFuture::from(chart.select("C".into(), host("return Promise.resolve([]);")))
            .await
            .unwrap();
        assert_eq!(bubble_opacities(&chart), vec![0.9, 0.9, 0.9]);
    }

    #[wasm_bindgen_test]
    async fn test_select_rejects_and_keeps_opacity() {
        let chart = abc_chart();
        JsFuture::from(chart.select("B".into(), host("return [key];")))
            .await
            .unwrap();

        let thrown = JsFuture::from(chart.select("A".into(), host("throw new Error('down');"))).await;
        assert!(thrown.is_err());
        assert_eq!(bubble_opacities(&chart), vec![0.3, 0.7, 0.3]);

        let malformed = JsFuture::from(chart.select("A".into(), host("return 42;"))).await;
        assert!(malformed.is_err());
        let rejected =
            JsFuture::from(chart.select("A".into(), host("return Promise.reject('no');"))).await;
        assert!(rejected.is_err());
        assert_eq!(bubble_opacities(&chart), vec![0.3, 0.7, 0.3]);
    }

    #[wasm_bindgen_test]
    fn test_js_measurer_falls_back_to_estimate() {
        let estimate = EstimatedTextMeasurer::default().text_height("50%", 10.0);
        let measurer = |body: &str| JsTextMeasurer {
            measure: Function::new_with_args("text, size", body),
            fallback: EstimatedTextMeasurer::default(),
        };

        assert_eq!(measurer("return size * 2;").text_height("50%", 10.0), 20.0);
        assert_eq!(measurer("return 'tall';").text_height("50%", 10.0), estimate);
        assert_eq!(measurer("return NaN;").text_height("50%", 10.0), estimate);
        assert_eq!(
            measurer("throw new Error('no canvas');").text_height("50%", 10.0),
            estimate
        );
    }

    #[wasm_bindgen_test]
    fn test_reentrant_measurer_does_not_panic() {
        let mut chart = abc_chart();
        let engine = Rc::clone(&chart.engine);
        let seen = Rc::new(Cell::new(usize::MAX));
        let seen_in_host = Rc::clone(&seen);
        let callback = Closure::<dyn Fn(String, f64) -> f64>::new(move |_text: String, size: f64| {
            seen_in_host.set(engine.borrow().point_count());
            size
        });
        chart.set_text_measurer(callback.as_ref().unchecked_ref::<Function>().clone());

        let options = serde_json::json!({
            "dataset": {
                "categories": ["A", "B"],
                "measure": { "values": [0.5, 0.3] }
            },
            "viewport": { "width": 400.0, "height": 300.0 }
        });
        chart.update(js_sys::JSON::parse(&options.to_string()).unwrap());

        assert_eq!(seen.get(), 0);
        assert_eq!(chart.point_count(), 2);
    }
}

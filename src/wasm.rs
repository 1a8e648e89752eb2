use wasm_bindgen::prelude::*;

use crate::{parse_data, parse_design, Composer, SceneOptions};

/// Compose a design and return its render tree as a JS value.
#[wasm_bindgen]
pub fn compose_scene(design_json: &str, data_json: &str) -> Result<JsValue, JsValue> {
    let design = parse_design(design_json).map_err(to_js_error)?;
    let data = parse_data(data_json).map_err(to_js_error)?;
    let composer = Composer::for_design(&design).map_err(to_js_error)?;
    let nodes = composer.compose(&design, &data, SceneOptions::new());
    composer.run_microtasks();
    serde_wasm_bindgen::to_value(&nodes).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Same as [`compose_scene`] with the render tree serialized to a JSON string.
#[wasm_bindgen]
pub fn render_json(design_json: &str, data_json: &str) -> Result<String, JsValue> {
    crate::render_json(design_json, data_json).map_err(to_js_error)
}

/// Names of the placeholder tokens a text element may contain.
#[wasm_bindgen]
pub fn placeholder_tokens() -> js_sys::Array {
    crate::placeholder::Placeholder::ALL
        .iter()
        .map(|p| JsValue::from_str(&p.token()))
        .collect()
}

fn to_js_error(e: crate::PodiumError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

//! Calls into page-provided JS libraries (Bootstrap, Chart.js).
//!
//! Both libraries are loaded by the server templates as globals, so they are
//! reached through `js_sys::Reflect` instead of typed bindings.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

/// Resolve a dotted global such as `["bootstrap", "Modal"]` as a constructor.
///
/// # Errors
///
/// Returns a JS error value when a path segment is missing or the final value
/// is not callable.
pub fn global_constructor(path: &[&str]) -> Result<Function, JsValue> {
    let mut current: JsValue = js_sys::global().into();
    for segment in path {
        current = Reflect::get(&current, &JsValue::from_str(segment))?;
        if current.is_undefined() || current.is_null() {
            return Err(JsValue::from_str(&format!("global {} is not loaded", path.join("."))));
        }
    }
    current
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("global {} is not a constructor", path.join("."))))
}

/// `new <path>(...args)`.
///
/// # Errors
///
/// Propagates lookup failures and exceptions thrown by the constructor.
pub fn construct(path: &[&str], args: &Array) -> Result<JsValue, JsValue> {
    let ctor = global_constructor(path)?;
    Reflect::construct(&ctor, args)
}

/// `target.<name>()`.
///
/// # Errors
///
/// Returns a JS error value when `name` is not a method of `target`, or the
/// exception it throws.
pub fn call_method(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    let method = Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("{name} is not a method")))?;
    method.call0(target)
}

/// Read a property as an element, e.g. the `relatedTarget` of a Bootstrap
/// modal event.
pub fn element_property(target: &JsValue, name: &str) -> Option<web_sys::Element> {
    match Reflect::get(target, &JsValue::from_str(name)) {
        Ok(value) => match value.dyn_into::<web_sys::Element>() {
            Ok(element) => Some(element),
            Err(_) => None,
        },
        Err(err) => {
            log::warn!("failed to read {name}: {err:?}");
            None
        }
    }
}

/// Parse serialized JSON into a plain JS object for library calls.
///
/// # Errors
///
/// Returns the `JSON.parse` exception.
pub fn json_to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}

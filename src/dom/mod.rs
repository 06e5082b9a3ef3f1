//! Browser DOM helpers shared by the page bindings (hydrate only).
//!
//! SYSTEM CONTEXT
//! ==============
//! Page modules look elements up by id once, at attach time, and hand typed
//! handles to the code that needs them. Missing or mistyped elements come back
//! as `None` so a page without a given widget simply skips it.

pub mod js;
pub mod select;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

pub fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Look up `id` and cast it to `T`.
pub fn element_by_id<T: JsCast>(id: &str) -> Option<T> {
    let element = document()?.get_element_by_id(id)?;
    match element.dyn_into::<T>() {
        Ok(typed) => Some(typed),
        Err(_) => {
            log::warn!("element #{id} does not have the expected type");
            None
        }
    }
}

/// Look up `#id` inside `scope`.
pub fn find_within(scope: &web_sys::Element, id: &str) -> Option<web_sys::Element> {
    match scope.query_selector(&format!("#{id}")) {
        Ok(found) => found,
        Err(err) => {
            log::warn!("query for #{id} failed: {err:?}");
            None
        }
    }
}

/// Register `handler` for `event` on `target` for the lifetime of the page.
pub fn listen(target: &web_sys::EventTarget, event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    if let Err(err) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        log::warn!("failed to listen for {event}: {err:?}");
        return;
    }
    // Page-lifetime listener; the closure must outlive this call.
    cb.forget();
}

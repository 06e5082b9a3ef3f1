//! Expense form: parent category -> subcategory selector.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reads the lookup endpoint from the form markup, attaches a
//! `DependentSelector` to the two category `<select>` elements, loads the
//! child for a pre-selected parent, and runs each change's continuation on
//! the browser event loop.

/// Attach the dependent selector if the expense form is on this page.
pub fn attach() {
    #[cfg(feature = "hydrate")]
    attach_to_document();
}

#[cfg(feature = "hydrate")]
fn attach_to_document() {
    use crate::config::{ENDPOINT_ATTRIBUTE, EXPENSE_FORM_ID, SelectorConfig};
    use crate::dom::{self, select::DomSelect};
    use crate::net::lookup::HttpSubcategoryLookup;
    use crate::selector::DependentSelector;

    let Some(form) = dom::element_by_id::<web_sys::Element>(EXPENSE_FORM_ID) else {
        log::debug!("no expense form on this page");
        return;
    };
    let config = match SelectorConfig::expense_form(form.get_attribute(ENDPOINT_ATTRIBUTE)) {
        Ok(config) => config,
        Err(err) => {
            log::error!("expense form selector not attached: {err}");
            return;
        }
    };
    let (Some(parent), Some(child)) = (
        DomSelect::by_id(&config.parent_control_ref),
        DomSelect::by_id(&config.child_control_ref),
    ) else {
        log::warn!(
            "expense form is missing #{} or #{}",
            config.parent_control_ref,
            config.child_control_ref
        );
        return;
    };

    let parent_target = parent.element().clone();
    let lookup = HttpSubcategoryLookup::new(config.endpoint.clone());
    let selector = DependentSelector::attach(parent, child, lookup, config.sentinel());
    spawn_continuation(selector.sync());

    dom::listen(&parent_target, "change", move |_event| {
        spawn_continuation(selector.on_parent_change(&selector.parent_value()));
    });
}

#[cfg(feature = "hydrate")]
fn spawn_continuation(continuation: futures::future::LocalBoxFuture<'static, crate::selector::LookupOutcome>) {
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = continuation.await;
        log::debug!("subcategory selector: {outcome:?}");
    });
}

//! Budget form: replacement confirmation.
//!
//! SYSTEM CONTEXT
//! ==============
//! When a budget for the same category and period already exists, the server
//! re-renders the form with the conflict modal flagged `data-mostrar="true"`.
//! Confirming marks the hidden `confirmar` input and resubmits the form, which
//! tells the server to replace the existing budget.

#[cfg(test)]
#[path = "budget_form_test.rs"]
mod budget_form_test;

pub const CONFLICT_MODAL_ID: &str = "modalConflicto";
pub const SHOW_ATTRIBUTE: &str = "data-mostrar";
pub const REPLACE_BUTTON_ID: &str = "btnConfirmarReemplazo";
pub const CONFIRM_INPUT_ID: &str = "inputConfirmar";
pub const FORM_ID: &str = "formPresupuesto";

/// Value the server expects in the hidden input to replace a budget.
pub const REPLACE_CONFIRMATION: &str = "si";

/// Whether the server asked for the conflict modal. Only the exact string
/// `"true"` counts.
pub fn should_show_conflict(show_attribute: Option<&str>) -> bool {
    show_attribute == Some("true")
}

pub fn attach() {
    #[cfg(feature = "hydrate")]
    {
        show_conflict_if_flagged();
        bind_replace_button();
    }
}

#[cfg(feature = "hydrate")]
fn show_conflict_if_flagged() {
    use crate::dom;

    let Some(modal) = dom::element_by_id::<web_sys::Element>(CONFLICT_MODAL_ID) else {
        return;
    };
    if !should_show_conflict(modal.get_attribute(SHOW_ATTRIBUTE).as_deref()) {
        return;
    }
    let shown = dom::js::construct(&["bootstrap", "Modal"], &js_sys::Array::of1(&modal))
        .and_then(|instance| dom::js::call_method(&instance, "show"));
    if let Err(err) = shown {
        log::error!("failed to show #{CONFLICT_MODAL_ID}: {err:?}");
    }
}

#[cfg(feature = "hydrate")]
fn bind_replace_button() {
    use crate::dom;

    let Some(button) = dom::element_by_id::<web_sys::Element>(REPLACE_BUTTON_ID) else {
        return;
    };
    dom::listen(&button, "click", move |_event| {
        if let Some(input) = dom::element_by_id::<web_sys::HtmlInputElement>(CONFIRM_INPUT_ID) {
            input.set_value(REPLACE_CONFIRMATION);
        }
        if let Some(form) = dom::element_by_id::<web_sys::HtmlFormElement>(FORM_ID) {
            if let Err(err) = form.submit() {
                log::error!("failed to submit #{FORM_ID}: {err:?}");
            }
        }
    });
}

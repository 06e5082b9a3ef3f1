//! Delete-confirmation modals on the category and expense lists.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each row's delete button opens a shared Bootstrap modal and carries the
//! delete URL plus a human label in `data-*` attributes. When the modal opens,
//! the label is shown in the body and the URL becomes the confirm link.

#[cfg(test)]
#[path = "delete_modal_test.rs"]
mod delete_modal_test;

/// Bootstrap event fired before a modal is shown.
pub const SHOW_EVENT: &str = "show.bs.modal";

/// Trigger attribute holding the delete URL.
pub const URL_ATTRIBUTE: &str = "data-url";

/// Markup contract for one confirmation modal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteModal {
    pub modal_id: &'static str,
    pub label_attribute: &'static str,
    pub label_target_id: &'static str,
    pub confirm_target_id: &'static str,
}

pub const CATEGORY_DELETE: DeleteModal = DeleteModal {
    modal_id: "deleteModal",
    label_attribute: "data-nombre",
    label_target_id: "modalNombreCategoria",
    confirm_target_id: "btnConfirmarEliminar",
};

pub const EXPENSE_DELETE: DeleteModal = DeleteModal {
    modal_id: "deleteGastoModal",
    label_attribute: "data-descripcion",
    label_target_id: "modalDescripcionGasto",
    confirm_target_id: "btnConfirmarEliminarGasto",
};

/// What the modal should display for the row that opened it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletePrompt {
    pub url: String,
    pub label: String,
}

impl DeletePrompt {
    /// Build from the trigger's attributes. A trigger without a URL yields
    /// `None`; a missing label shows as empty text.
    pub fn from_attributes(url: Option<String>, label: Option<String>) -> Option<Self> {
        let url = url.filter(|u| !u.trim().is_empty())?;
        Some(Self {
            url,
            label: label.unwrap_or_default(),
        })
    }
}

/// Bind both confirmation modals when present.
pub fn attach() {
    #[cfg(feature = "hydrate")]
    for modal in [CATEGORY_DELETE, EXPENSE_DELETE] {
        bind(modal);
    }
}

#[cfg(feature = "hydrate")]
fn bind(spec: DeleteModal) {
    use crate::dom;

    let Some(modal) = dom::element_by_id::<web_sys::Element>(spec.modal_id) else {
        return;
    };
    let modal_for_cb = modal.clone();
    dom::listen(&modal, SHOW_EVENT, move |event| {
        let Some(trigger) = dom::js::element_property(&event, "relatedTarget") else {
            log::warn!("#{} opened without a trigger element", spec.modal_id);
            return;
        };
        let prompt = DeletePrompt::from_attributes(
            trigger.get_attribute(URL_ATTRIBUTE),
            trigger.get_attribute(spec.label_attribute),
        );
        match prompt {
            Some(prompt) => apply(&modal_for_cb, spec, &prompt),
            None => log::warn!("#{} trigger has no {URL_ATTRIBUTE}", spec.modal_id),
        }
    });
}

#[cfg(feature = "hydrate")]
fn apply(modal: &web_sys::Element, spec: DeleteModal, prompt: &DeletePrompt) {
    use crate::dom;

    if let Some(label) = dom::find_within(modal, spec.label_target_id) {
        label.set_text_content(Some(&prompt.label));
    }
    if let Some(confirm) = dom::find_within(modal, spec.confirm_target_id) {
        if let Err(err) = confirm.set_attribute("href", &prompt.url) {
            log::warn!("failed to set delete link: {err:?}");
        }
    }
}

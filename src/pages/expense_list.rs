//! Expense list: the "Personalizado..." button shows or hides the custom date
//! range inputs by toggling Bootstrap's `d-none` class.

#[cfg(test)]
#[path = "expense_list_test.rs"]
mod expense_list_test;

pub const TOGGLE_BUTTON_ID: &str = "btnCustom";
pub const RANGE_CONTAINER_ID: &str = "customRange";
pub const HIDDEN_CLASS: &str = "d-none";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassChange {
    Add,
    Remove,
}

/// Change that flips the range container's visibility given its current
/// `class` attribute.
pub fn toggle_hidden(class_attribute: &str) -> ClassChange {
    if class_attribute.split_whitespace().any(|c| c == HIDDEN_CLASS) {
        ClassChange::Remove
    } else {
        ClassChange::Add
    }
}

pub fn attach() {
    #[cfg(feature = "hydrate")]
    attach_to_document();
}

#[cfg(feature = "hydrate")]
fn attach_to_document() {
    use crate::dom;

    let Some(button) = dom::element_by_id::<web_sys::Element>(TOGGLE_BUTTON_ID) else {
        return;
    };
    dom::listen(&button, "click", move |_event| {
        let Some(range) = dom::element_by_id::<web_sys::Element>(RANGE_CONTAINER_ID) else {
            log::warn!("#{RANGE_CONTAINER_ID} missing");
            return;
        };
        let classes = range.class_list();
        let result = match toggle_hidden(&range.class_name()) {
            ClassChange::Add => classes.add_1(HIDDEN_CLASS),
            ClassChange::Remove => classes.remove_1(HIDDEN_CLASS),
        };
        if let Err(err) = result {
            log::warn!("failed to toggle #{RANGE_CONTAINER_ID}: {err:?}");
        }
    });
}

//! `SelectControl` over a real `<select>` element.

use web_sys::{HtmlOptionElement, HtmlSelectElement};

use crate::selector::{ChildOptionList, SelectControl};

#[derive(Clone, Debug)]
pub struct DomSelect {
    element: HtmlSelectElement,
}

impl DomSelect {
    pub fn new(element: HtmlSelectElement) -> Self {
        Self { element }
    }

    pub fn by_id(id: &str) -> Option<Self> {
        super::element_by_id::<HtmlSelectElement>(id).map(Self::new)
    }

    pub fn element(&self) -> &HtmlSelectElement {
        &self.element
    }
}

impl SelectControl for DomSelect {
    fn value(&self) -> String {
        self.element.value()
    }

    fn replace_options(&self, options: &ChildOptionList) {
        let Some(document) = super::document() else {
            log::warn!("no document to build child options in");
            return;
        };
        // Built detached, then swapped in with a single DOM call.
        let fragment = document.create_document_fragment();
        for option in options.options() {
            let node = match HtmlOptionElement::new_with_text_and_value(&option.display_name, &option.id) {
                Ok(node) => node,
                Err(err) => {
                    log::warn!("failed to create option {}: {err:?}", option.id);
                    return;
                }
            };
            if let Err(err) = fragment.append_child(&node) {
                log::warn!("failed to stage option {}: {err:?}", option.id);
                return;
            }
        }
        if let Err(err) = self.element.replace_children_with_node_1(&fragment) {
            log::warn!("failed to install child options: {err:?}");
        }
    }

    fn set_disabled(&self, disabled: bool) {
        self.element.set_disabled(disabled);
    }

    fn set_value(&self, value: &str) {
        self.element.set_value(value);
    }
}

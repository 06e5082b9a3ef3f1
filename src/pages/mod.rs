//! Behaviors for individual server-rendered pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page loads the same WASM bundle. Each module checks for its own host
//! markup and does nothing when the current page does not contain it, so
//! `attach_all` is safe to call on any page.

pub mod budget_form;
pub mod dashboard;
pub mod delete_modal;
pub mod expense_form;
pub mod expense_list;

/// Attach every page behavior whose markup is present.
pub fn attach_all() {
    expense_form::attach();
    expense_list::attach();
    delete_modal::attach();
    budget_form::attach();
    dashboard::attach();
}

//! Dependent selector controller.
//!
//! DESIGN
//! ======
//! The controller receives its two controls and its lookup at construction
//! time and never queries the document itself. `on_parent_change` does the
//! synchronous part of a change immediately (reset the child) and returns the
//! continuation as a future; the caller schedules it on the page's event loop
//! (`spawn_local` in the browser, `block_on` in tests). `sync` runs the same
//! path for the parent's value at page load, so the child is only ever
//! enabled with options from a lookup.
//!
//! ORDERING
//! ========
//! Every change bumps a generation counter. A continuation applies its result
//! only when its generation is still the latest and the parent's live value
//! still equals the value the request was issued for. Anything else is a
//! stale response and is dropped, including results that arrive after the
//! parent was cleared.
//!
//! ERROR HANDLING
//! ==============
//! Lookup failures leave the child disabled with only the sentinel and are
//! reported through `log::error!`. Nothing is returned to the caller as an
//! error; the continuation resolves to a `LookupOutcome` instead.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};

use super::types::{ChildControlState, ChildOption, ChildOptionList, ParentId};
use crate::net::lookup::{LookupError, SubcategoryLookup};

/// A selection control the controller can read and repopulate.
///
/// Implementations use interior mutability: the page's controls are shared
/// handles, not owned values.
pub trait SelectControl {
    /// Current raw value (empty string for "no selection").
    fn value(&self) -> String;
    /// Replace every option with `options` in one step.
    fn replace_options(&self, options: &ChildOptionList);
    fn set_disabled(&self, disabled: bool);
    /// Select the option whose id is `value`.
    fn set_value(&self, value: &str);
}

/// How a parent change was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The parent was cleared; no request was made.
    Cleared,
    /// The child now lists `count` options for `parent` (sentinel excluded).
    Applied { parent: ParentId, count: usize },
    /// The parent changed before the result arrived; the result was dropped.
    Stale { parent: ParentId },
    /// The lookup for the current parent failed; the child stays disabled.
    Failed { parent: ParentId, error: LookupError },
}

struct Shared<P, C, L> {
    parent: P,
    child: C,
    lookup: L,
    sentinel: ChildOption,
    state: Cell<ChildControlState>,
    generation: Cell<u64>,
    /// Child value rendered by the server, reselected after the first sync.
    initial_child: RefCell<Option<String>>,
}

/// Keeps the child control's options consistent with the parent's value.
pub struct DependentSelector<P, C, L> {
    shared: Rc<Shared<P, C, L>>,
}

impl<P, C, L> Clone for DependentSelector<P, C, L> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<P, C, L> DependentSelector<P, C, L>
where
    P: SelectControl + 'static,
    C: SelectControl + 'static,
    L: SubcategoryLookup + 'static,
{
    /// Attach to a pair of controls.
    ///
    /// The child always starts disabled with only the sentinel, whatever the
    /// server rendered into it. When the parent is pre-selected (edit forms)
    /// the child's rendered value is remembered and restored by `sync` once
    /// the lookup for that parent has returned.
    pub fn attach(parent: P, child: C, lookup: L, sentinel: ChildOption) -> Self {
        let child_value = child.value().trim().to_owned();
        let initial_child =
            (ParentId::parse(&parent.value()).is_some() && !child_value.is_empty()).then_some(child_value);
        let selector = Self {
            shared: Rc::new(Shared {
                parent,
                child,
                lookup,
                sentinel,
                state: Cell::new(ChildControlState::DisabledEmpty),
                generation: Cell::new(0),
                initial_child: RefCell::new(initial_child),
            }),
        };
        selector.shared.reset_child();
        selector
    }

    /// Load the child for the parent's current value, as on page load.
    ///
    /// Reselects the child value rendered by the server if the lookup result
    /// still contains it. Any parent change made before this resolves drops
    /// that value.
    pub fn sync(&self) -> LocalBoxFuture<'static, LookupOutcome> {
        let restore = self.shared.initial_child.borrow_mut().take();
        self.change(&self.parent_value(), restore)
    }

    pub fn state(&self) -> ChildControlState {
        self.shared.state.get()
    }

    /// Live value of the parent control.
    pub fn parent_value(&self) -> String {
        self.shared.parent.value()
    }

    /// React to the parent changing to `value`.
    ///
    /// The child is reset before this returns. The returned future performs
    /// the lookup (if any) and applies its result when still current; it must
    /// be driven for the child to be repopulated.
    pub fn on_parent_change(&self, value: &str) -> LocalBoxFuture<'static, LookupOutcome> {
        self.shared.initial_child.borrow_mut().take();
        self.change(value, None)
    }

    fn change(&self, value: &str, restore: Option<String>) -> LocalBoxFuture<'static, LookupOutcome> {
        let generation = self.shared.generation.get().wrapping_add(1);
        self.shared.generation.set(generation);
        self.shared.reset_child();

        let Some(parent) = ParentId::parse(value) else {
            return future::ready(LookupOutcome::Cleared).boxed_local();
        };

        let shared = Rc::clone(&self.shared);
        async move {
            let result = shared.lookup.fetch_children(&parent).await;
            shared.resolve(parent, generation, result, restore)
        }
        .boxed_local()
    }
}

impl<P, C, L> Shared<P, C, L>
where
    P: SelectControl,
    C: SelectControl,
{
    fn reset_child(&self) {
        self.child.replace_options(&ChildOptionList::sentinel_only(&self.sentinel));
        self.child.set_disabled(true);
        self.state.set(ChildControlState::DisabledEmpty);
    }

    fn is_current(&self, parent: &ParentId, generation: u64) -> bool {
        generation == self.generation.get() && ParentId::parse(&self.parent.value()).as_ref() == Some(parent)
    }

    fn resolve(
        &self,
        parent: ParentId,
        generation: u64,
        result: Result<Vec<ChildOption>, LookupError>,
        restore: Option<String>,
    ) -> LookupOutcome {
        if !self.is_current(&parent, generation) {
            log::debug!("dropping stale subcategory lookup for parent {parent}");
            return LookupOutcome::Stale { parent };
        }
        match result {
            Ok(children) => {
                let list = ChildOptionList::populated(&self.sentinel, children);
                let count = list.children().len();
                self.child.replace_options(&list);
                if let Some(value) = restore.filter(|v| list.children().iter().any(|o| &o.id == v)) {
                    self.child.set_value(&value);
                }
                self.child.set_disabled(false);
                self.state.set(ChildControlState::EnabledPopulated);
                LookupOutcome::Applied { parent, count }
            }
            Err(error) => {
                log::error!("subcategory lookup for parent {parent} failed: {error}");
                self.reset_child();
                LookupOutcome::Failed { parent, error }
            }
        }
    }
}

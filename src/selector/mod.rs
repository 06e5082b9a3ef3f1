//! Dependent selector: a child `<select>` whose options follow the parent's
//! current value.
//!
//! DESIGN
//! ======
//! `types` holds the data model (parent selection, option list, control
//! state). `controller` owns the synchronization and only talks to the page
//! through the `SelectControl` trait and to the network through
//! `SubcategoryLookup`, so both sides can be swapped for fakes in tests.

pub mod controller;
pub mod types;

pub use controller::{DependentSelector, LookupOutcome, SelectControl};
pub use types::{ChildControlState, ChildOption, ChildOptionList, ParentId, ParentSelection};

//! Networking for the subcategory lookup endpoint.
//!
//! SYSTEM CONTEXT
//! ==============
//! `lookup` defines the lookup contract, its wire format, and the `gloo-net`
//! transport used in the browser.

pub mod lookup;

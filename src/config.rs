//! Selector configuration and the expense form's markup contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server renders the expense form with two `<select>` elements and stores
//! the subcategory lookup URL on the form itself (templates resolve URLs, static
//! assets cannot). `SelectorConfig` collects those references so the selector
//! controller never reaches into the document on its own.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::selector::ChildOption;

/// Placeholder shown as the first child option, meaning "no selection".
pub const SENTINEL_LABEL: &str = "Selecciona una opción...";

/// Id of the expense form carrying the lookup endpoint.
pub const EXPENSE_FORM_ID: &str = "gastoForm";

/// Form attribute holding the subcategory lookup URL.
pub const ENDPOINT_ATTRIBUTE: &str = "data-subcategorias-url";

/// Id of the parent category `<select>`.
pub const PARENT_SELECT_ID: &str = "id_categoria_padre";

/// Id of the dependent subcategory `<select>`.
pub const CHILD_SELECT_ID: &str = "id_categoria";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing selector setting: {0}")]
    Missing(&'static str),
}

/// Wiring for one dependent selector: which controls, which endpoint, and the
/// label of the placeholder option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorConfig {
    pub parent_control_ref: String,
    pub child_control_ref: String,
    pub endpoint: String,
    pub sentinel_label: String,
}

impl SelectorConfig {
    pub fn new(
        parent_control_ref: impl Into<String>,
        child_control_ref: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            parent_control_ref: parent_control_ref.into(),
            child_control_ref: child_control_ref.into(),
            endpoint: endpoint.into(),
            sentinel_label: SENTINEL_LABEL.to_owned(),
        }
    }

    /// Configuration for the expense form, given the raw value of its
    /// endpoint attribute.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when the attribute is absent or blank.
    pub fn expense_form(endpoint_attribute: Option<String>) -> Result<Self, ConfigError> {
        let endpoint = endpoint_attribute.unwrap_or_default();
        let config = Self::new(PARENT_SELECT_ID, CHILD_SELECT_ID, endpoint.trim());
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_sentinel_label(mut self, label: impl Into<String>) -> Self {
        self.sentinel_label = label.into();
        self
    }

    /// Check that every reference is non-blank.
    ///
    /// # Errors
    ///
    /// Returns the first blank setting as `ConfigError::Missing`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parent_control_ref.trim().is_empty() {
            return Err(ConfigError::Missing("parent control"));
        }
        if self.child_control_ref.trim().is_empty() {
            return Err(ConfigError::Missing("child control"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Missing("lookup endpoint"));
        }
        if self.sentinel_label.trim().is_empty() {
            return Err(ConfigError::Missing("sentinel label"));
        }
        Ok(())
    }

    pub fn sentinel(&self) -> ChildOption {
        ChildOption::sentinel(&self.sentinel_label)
    }
}

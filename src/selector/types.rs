//! Data model for the dependent selector.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

/// Identifier of a chosen parent category, as rendered in the `<option>` value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParentId(String);

/// The parent control's value: `None` means "no selection".
pub type ParentSelection = Option<ParentId>;

impl ParentId {
    /// Parse a raw control value. Blank values are "no selection".
    pub fn parse(value: &str) -> ParentSelection {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `<option>` of the child control. The sentinel is the option with an
/// empty id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildOption {
    pub id: String,
    pub display_name: String,
}

impl ChildOption {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    pub fn sentinel(label: impl Into<String>) -> Self {
        Self::new(String::new(), label)
    }

    pub fn is_sentinel(&self) -> bool {
        self.id.is_empty()
    }
}

/// Complete option list for the child control: the sentinel first, then the
/// lookup results in server order. Always installed as a whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildOptionList {
    options: Vec<ChildOption>,
}

impl ChildOptionList {
    pub fn sentinel_only(sentinel: &ChildOption) -> Self {
        Self {
            options: vec![sentinel.clone()],
        }
    }

    pub fn populated(sentinel: &ChildOption, children: Vec<ChildOption>) -> Self {
        let mut options = Vec::with_capacity(children.len() + 1);
        options.push(sentinel.clone());
        options.extend(children);
        Self { options }
    }

    pub fn options(&self) -> &[ChildOption] {
        &self.options
    }

    /// Options after the sentinel.
    pub fn children(&self) -> &[ChildOption] {
        self.options.get(1..).unwrap_or_default()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.display_name.as_str()).collect()
    }

    pub fn is_sentinel_only(&self) -> bool {
        self.children().is_empty()
    }
}

/// Externally visible state of the child control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChildControlState {
    /// Disabled, sentinel only. No parent selected or a lookup is pending.
    #[default]
    DisabledEmpty,
    /// Enabled with the result of the latest lookup for the current parent.
    EnabledPopulated,
}

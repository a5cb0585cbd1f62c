//! Configuration for lists.
//!
//! Settings are plain structs with sensible defaults. They can be built in
//! code with the `with_*` setters or loaded from TOML, where every table and
//! key is optional:
//!
//! ```toml
//! [list]
//! capacity_hint = 128
//!
//! [groups]
//! expanded_by_default = true
//! display_empty_cell = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tidelist_core::logging::targets;

use crate::error::{Error, Result};

/// Largest accepted `capacity_hint`.
pub const MAX_CAPACITY_HINT: usize = 1 << 24;

/// Settings for a [`SortedList`](crate::model::SortedList).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Number of items to reserve room for up front.
    pub capacity_hint: usize,
}

impl ListConfig {
    /// Sets the capacity hint.
    pub fn with_capacity_hint(mut self, capacity_hint: usize) -> Self {
        self.capacity_hint = capacity_hint;
        self
    }
}

/// Settings for a [`GroupSortedList`](crate::model::GroupSortedList).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupListConfig {
    /// Whether groups start expanded. Off by default.
    pub expanded_by_default: bool,
    /// Whether an expanded group without items shows a placeholder row.
    pub display_empty_cell: bool,
    /// Whether child rows are laid out above their group header.
    pub children_above_group: bool,
    /// Whether groups are pinned open.
    pub disallow_collapse: bool,
}

impl Default for GroupListConfig {
    fn default() -> Self {
        Self {
            expanded_by_default: false,
            display_empty_cell: false,
            children_above_group: false,
            disallow_collapse: false,
        }
    }
}

impl GroupListConfig {
    /// Sets whether groups start expanded.
    pub fn with_expanded_by_default(mut self, expanded: bool) -> Self {
        self.expanded_by_default = expanded;
        self
    }

    /// Sets whether empty groups show a placeholder row.
    pub fn with_display_empty_cell(mut self, display: bool) -> Self {
        self.display_empty_cell = display;
        self
    }

    /// Sets whether child rows precede their header.
    pub fn with_children_above_group(mut self, above: bool) -> Self {
        self.children_above_group = above;
        self
    }

    /// Sets whether groups are pinned open.
    pub fn with_disallow_collapse(mut self, disallow: bool) -> Self {
        self.disallow_collapse = disallow;
        self
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TidelistConfig {
    /// Flat list settings.
    pub list: ListConfig,
    /// Grouped list settings.
    pub groups: GroupListConfig,
}

impl TidelistConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        tracing::debug!(target: targets::CONFIG, ?config, "config loaded");
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
        Self::from_toml_str(&source)
    }

    /// Replaces the list settings.
    pub fn with_list(mut self, list: ListConfig) -> Self {
        self.list = list;
        self
    }

    /// Replaces the grouped list settings.
    pub fn with_groups(mut self, groups: GroupListConfig) -> Self {
        self.groups = groups;
        self
    }

    /// Checks values that parse but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.list.capacity_hint > MAX_CAPACITY_HINT {
            return Err(Error::invalid_value(
                "list.capacity_hint",
                format!(
                    "{} exceeds the maximum of {MAX_CAPACITY_HINT}",
                    self.list.capacity_hint
                ),
            ));
        }
        Ok(())
    }
}

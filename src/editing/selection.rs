//! List addressing and selection
//!
//! Entries are addressed purely by position, so a selection is an
//! (list, index) pair and goes stale on every structural edit unless the
//! command that made the edit updates it.

use serde::{Deserialize, Serialize};

/// One of the ordered lists of a figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "list", rename_all = "snake_case")]
pub enum ListAddress {
    /// The figure's panels
    Panels,
    /// The metadata fields of one panel
    Fields { panel: usize },
}

impl std::fmt::Display for ListAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListAddress::Panels => write!(f, "panels"),
            ListAddress::Fields { panel } => write!(f, "fields of panel {}", panel),
        }
    }
}

/// Which input of a metadata field holds the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldInput {
    Name,
    Value,
}

/// The current editor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Selection {
    Panel { index: usize },
    Field {
        panel: usize,
        index: usize,
        input: FieldInput,
    },
}

impl Selection {
    /// Build the selection for entry `index` of `list`
    pub fn at(list: ListAddress, index: usize, input: FieldInput) -> Self {
        match list {
            ListAddress::Panels => Selection::Panel { index },
            ListAddress::Fields { panel } => Selection::Field {
                panel,
                index,
                input,
            },
        }
    }

    /// The list the selected entry lives in
    pub fn list(&self) -> ListAddress {
        match *self {
            Selection::Panel { .. } => ListAddress::Panels,
            Selection::Field { panel, .. } => ListAddress::Fields { panel },
        }
    }

    pub fn index(&self) -> usize {
        match *self {
            Selection::Panel { index } => index,
            Selection::Field { index, .. } => index,
        }
    }

    /// The panel this selection points into
    pub fn panel(&self) -> usize {
        match *self {
            Selection::Panel { index } => index,
            Selection::Field { panel, .. } => panel,
        }
    }

    pub fn input(&self) -> Option<FieldInput> {
        match *self {
            Selection::Panel { .. } => None,
            Selection::Field { input, .. } => Some(input),
        }
    }
}

/// Holder of the editor selection, read and updated by the edit commands.
pub trait SelectionHolder {
    fn selection(&self) -> Option<Selection>;

    fn set_selection(&mut self, selection: Option<Selection>);

    fn clear_selection(&mut self) {
        self.set_selection(None);
    }
}

/// Plain in-memory selection holder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorSelection {
    current: Option<Selection>,
}

impl EditorSelection {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn with_selection(selection: Selection) -> Self {
        Self {
            current: Some(selection),
        }
    }
}

impl SelectionHolder for EditorSelection {
    fn selection(&self) -> Option<Selection> {
        self.current
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.current = selection;
    }
}

//! Tool enablement
//!
//! The enabled/disabled state of the field tools, derived from the figure
//! and the selection as they are right now. Never store a `ToolState` across
//! an edit; derive a fresh one.

use serde::Serialize;

use super::commands::FieldEditCommands;
use super::selection::Selection;
use crate::figure::FigureModel;

/// Which field tools are currently enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ToolState {
    pub add_field: bool,
    pub remove: bool,
    pub move_up: bool,
    pub move_down: bool,
}

impl ToolState {
    pub fn derive(figure: &FigureModel, selection: Option<Selection>) -> Self {
        // Same target panel `add_metadata_field` would use
        let target = selection.map_or(figure.current_panel_index(), |s| s.panel());
        let add_field = figure.panel(target).is_some();

        let Some(selection) = selection else {
            return Self {
                add_field,
                ..Self::default()
            };
        };

        let list = selection.list();
        let index = selection.index();
        let valid = figure.list_len(list).map_or(false, |len| index < len);

        Self {
            add_field,
            remove: valid,
            move_up: FieldEditCommands::can_move_up(figure, list, index),
            move_down: FieldEditCommands::can_move_down(figure, list, index),
        }
    }
}

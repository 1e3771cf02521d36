//! Structural edit commands
//!
//! Add, remove, reorder and select entries of one addressed list of a
//! figure: either its panels or the fields of one panel. Commands hold no
//! state of their own. After every mutation the selection is rewritten from
//! the post-mutation list, and the move predicates are always computed from
//! the list as it is now.

use tracing::debug;

use super::selection::{FieldInput, ListAddress, Selection, SelectionHolder};
use crate::error::{ManuscriptError, MoveDirection, Result};
use crate::figure::{FieldTemplate, FigureModel, MetadataField, Panel, PanelTemplate};

/// Template for a new list entry; the kind must match the addressed list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryTemplate {
    Field(FieldTemplate),
    Panel(PanelTemplate),
}

/// Edit commands over a figure's ordered lists
pub struct FieldEditCommands;

impl FieldEditCommands {
    /// Append an entry built from `template` to the end of `list`.
    ///
    /// The selection moves to the new entry (the name input for fields).
    ///
    /// # Returns
    /// The index of the new entry
    pub fn add_field(
        figure: &mut FigureModel,
        list: ListAddress,
        template: EntryTemplate,
        selection: &mut impl SelectionHolder,
    ) -> Result<usize> {
        let index = match (list, template) {
            (ListAddress::Panels, EntryTemplate::Panel(template)) => {
                let panels = figure.panels_mut();
                panels.push(Panel::from_template(&template));
                panels.len() - 1
            }
            (ListAddress::Fields { panel }, EntryTemplate::Field(template)) => {
                let fields = figure
                    .panel_mut(panel)
                    .ok_or(ManuscriptError::NoSuchList { list })?
                    .fields_mut();
                fields.push(MetadataField::from_template(&template));
                fields.len() - 1
            }
            _ => return Err(ManuscriptError::TemplateMismatch { list }),
        };

        debug!(%list, index, "added entry");
        selection.set_selection(Some(Selection::at(list, index, FieldInput::Name)));
        Ok(index)
    }

    /// Append a panel shaped like the current panel.
    ///
    /// An empty figure gets a panel without fields.
    pub fn add_panel(
        figure: &mut FigureModel,
        selection: &mut impl SelectionHolder,
    ) -> Result<usize> {
        let template = if figure.is_empty() {
            PanelTemplate::default()
        } else {
            figure.template_from_current_panel()?
        };
        Self::add_field(
            figure,
            ListAddress::Panels,
            EntryTemplate::Panel(template),
            selection,
        )
    }

    /// Append an empty field to the panel the selection points into.
    ///
    /// Falls back to the current panel when nothing is selected.
    pub fn add_metadata_field(
        figure: &mut FigureModel,
        selection: &mut impl SelectionHolder,
    ) -> Result<usize> {
        if figure.is_empty() {
            return Err(ManuscriptError::EmptyFigure);
        }
        let panel = selection
            .selection()
            .map(|s| s.panel())
            .unwrap_or_else(|| figure.current_panel_index());
        Self::add_field(
            figure,
            ListAddress::Fields { panel },
            EntryTemplate::Field(FieldTemplate::default()),
            selection,
        )
    }

    /// Delete the entry at `index`; later entries shift down by one.
    ///
    /// A selection on the removed entry moves to its previous neighbor, or
    /// is cleared if the list is now empty. Selections after it shift down.
    pub fn remove_field(
        figure: &mut FigureModel,
        list: ListAddress,
        index: usize,
        selection: &mut impl SelectionHolder,
    ) -> Result<()> {
        let len = list_len(figure, list)?;
        check_index(list, index, len)?;

        match list {
            ListAddress::Panels => {
                figure.panels_mut().remove(index);
                let current = figure.current_panel_index();
                if current > index {
                    figure.set_current_panel_unchecked(current - 1);
                } else {
                    figure.clamp_current_panel();
                }
            }
            ListAddress::Fields { panel } => {
                figure
                    .panel_mut(panel)
                    .ok_or(ManuscriptError::NoSuchList { list })?
                    .fields_mut()
                    .remove(index);
            }
        }

        debug!(%list, index, "removed entry");
        let next = selection
            .selection()
            .and_then(|current| selection_after_remove(current, list, index, len - 1));
        selection.set_selection(next);
        Ok(())
    }

    /// Swap the entry at `index` with its predecessor
    ///
    /// # Returns
    /// The entry's new index
    pub fn move_field_up(
        figure: &mut FigureModel,
        list: ListAddress,
        index: usize,
        selection: &mut impl SelectionHolder,
    ) -> Result<usize> {
        Self::move_entry(figure, list, index, MoveDirection::Up, selection)
    }

    /// Swap the entry at `index` with its successor
    ///
    /// # Returns
    /// The entry's new index
    pub fn move_field_down(
        figure: &mut FigureModel,
        list: ListAddress,
        index: usize,
        selection: &mut impl SelectionHolder,
    ) -> Result<usize> {
        Self::move_entry(figure, list, index, MoveDirection::Down, selection)
    }

    /// Whether the entry at `index` can move up
    pub fn can_move_up(figure: &FigureModel, list: ListAddress, index: usize) -> bool {
        figure
            .list_len(list)
            .map_or(false, |len| index < len && index > 0)
    }

    /// Whether the entry at `index` can move down
    pub fn can_move_down(figure: &FigureModel, list: ListAddress, index: usize) -> bool {
        figure.list_len(list).map_or(false, |len| index + 1 < len)
    }

    /// Put the selection on the name or value input of an entry
    pub fn select_field(
        figure: &FigureModel,
        list: ListAddress,
        index: usize,
        input: FieldInput,
        selection: &mut impl SelectionHolder,
    ) -> Result<()> {
        let len = list_len(figure, list)?;
        check_index(list, index, len)?;
        selection.set_selection(Some(Selection::at(list, index, input)));
        Ok(())
    }

    fn move_entry(
        figure: &mut FigureModel,
        list: ListAddress,
        index: usize,
        direction: MoveDirection,
        selection: &mut impl SelectionHolder,
    ) -> Result<usize> {
        let len = list_len(figure, list)?;
        check_index(list, index, len)?;

        let legal = match direction {
            MoveDirection::Up => Self::can_move_up(figure, list, index),
            MoveDirection::Down => Self::can_move_down(figure, list, index),
        };
        if !legal {
            return Err(ManuscriptError::IllegalMove {
                list,
                index,
                direction,
            });
        }

        let target = match direction {
            MoveDirection::Up => index - 1,
            MoveDirection::Down => index + 1,
        };

        match list {
            ListAddress::Panels => {
                figure.panels_mut().swap(index, target);
                let current = figure.current_panel_index();
                if current == index {
                    figure.set_current_panel_unchecked(target);
                } else if current == target {
                    figure.set_current_panel_unchecked(index);
                }
            }
            ListAddress::Fields { panel } => {
                figure
                    .panel_mut(panel)
                    .ok_or(ManuscriptError::NoSuchList { list })?
                    .fields_mut()
                    .swap(index, target);
            }
        }

        debug!(%list, from = index, to = target, "moved entry");
        let input = selection
            .selection()
            .filter(|s| s.list() == list && s.index() == index)
            .and_then(|s| s.input())
            .unwrap_or(FieldInput::Value);
        selection.set_selection(Some(Selection::at(list, target, input)));
        Ok(target)
    }
}

fn list_len(figure: &FigureModel, list: ListAddress) -> Result<usize> {
    figure
        .list_len(list)
        .ok_or(ManuscriptError::NoSuchList { list })
}

fn check_index(list: ListAddress, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(ManuscriptError::OutOfRange { list, index, len });
    }
    Ok(())
}

/// Where a selection ends up after entry `removed` of `list` was deleted
fn selection_after_remove(
    current: Selection,
    list: ListAddress,
    removed: usize,
    new_len: usize,
) -> Option<Selection> {
    let input = current.input().unwrap_or(FieldInput::Value);

    if current.list() == list {
        let index = current.index();
        return if index == removed {
            if new_len == 0 {
                None
            } else {
                Some(Selection::at(list, removed.saturating_sub(1), input))
            }
        } else if index > removed {
            Some(Selection::at(list, index - 1, input))
        } else {
            Some(current)
        };
    }

    // Field selections live inside a panel; removing panels can move or drop them.
    match (list, current) {
        (ListAddress::Panels, Selection::Field { panel, index, input }) => {
            if panel == removed {
                None
            } else if panel > removed {
                Some(Selection::Field {
                    panel: panel - 1,
                    index,
                    input,
                })
            } else {
                Some(current)
            }
        }
        _ => Some(current),
    }
}

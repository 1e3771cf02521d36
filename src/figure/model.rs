//! Figure model
//!
//! A figure is an ordered list of panels plus a pointer to the active
//! panel. Panels are addressed by position only. The active panel is the
//! template source when a new panel is added.
//!
//! Figures may have zero panels; templating an empty figure is a checked
//! error rather than a precondition.

use serde::{Deserialize, Serialize};

use super::field::FieldTemplate;
use super::panel::{Panel, PanelTemplate};
use crate::editing::ListAddress;
use crate::error::{ManuscriptError, Result};

/// Serialized shape of a figure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FigureData {
    #[serde(default)]
    panels: Vec<Panel>,
    #[serde(default)]
    current_panel_index: usize,
}

/// The structured content of a figure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FigureData", into = "FigureData")]
pub struct FigureModel {
    panels: Vec<Panel>,
    current_panel_index: usize,
}

impl From<FigureData> for FigureModel {
    fn from(data: FigureData) -> Self {
        let mut figure = FigureModel::new(data.panels);
        figure.current_panel_index = data.current_panel_index;
        figure.clamp_current_panel();
        figure
    }
}

impl From<FigureModel> for FigureData {
    fn from(figure: FigureModel) -> Self {
        FigureData {
            panels: figure.panels,
            current_panel_index: figure.current_panel_index,
        }
    }
}

impl FigureModel {
    /// Create a figure from an initial panel set (possibly empty)
    pub fn new(panels: Vec<Panel>) -> Self {
        Self {
            panels,
            current_panel_index: 0,
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    pub fn panel_mut(&mut self, index: usize) -> Option<&mut Panel> {
        self.panels.get_mut(index)
    }

    pub(crate) fn panels_mut(&mut self) -> &mut Vec<Panel> {
        &mut self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn current_panel_index(&self) -> usize {
        self.current_panel_index
    }

    /// The active panel, if the figure has any panels
    pub fn current_panel(&self) -> Option<&Panel> {
        self.panels.get(self.current_panel_index)
    }

    pub fn current_panel_mut(&mut self) -> Option<&mut Panel> {
        self.panels.get_mut(self.current_panel_index)
    }

    /// Make the panel at `index` the active one
    pub fn set_current_panel(&mut self, index: usize) -> Result<()> {
        if index >= self.panels.len() {
            return Err(ManuscriptError::OutOfRange {
                list: ListAddress::Panels,
                index,
                len: self.panels.len(),
            });
        }
        self.current_panel_index = index;
        Ok(())
    }

    pub(crate) fn set_current_panel_unchecked(&mut self, index: usize) {
        self.current_panel_index = index;
        self.clamp_current_panel();
    }

    /// Keep `current_panel_index` inside `0..max(1, len)`
    pub(crate) fn clamp_current_panel(&mut self) {
        let upper = self.panels.len().max(1) - 1;
        if self.current_panel_index > upper {
            self.current_panel_index = upper;
        }
    }

    /// Template for a new panel: the active panel's field names, in order,
    /// with empty values.
    pub fn template_from_current_panel(&self) -> Result<PanelTemplate> {
        let panel = self.current_panel().ok_or(ManuscriptError::EmptyFigure)?;
        Ok(PanelTemplate {
            fields: panel
                .fields()
                .iter()
                .map(|field| FieldTemplate::new(field.name()))
                .collect(),
        })
    }

    /// Number of entries in the addressed list, or None if it doesn't exist
    pub fn list_len(&self, list: ListAddress) -> Option<usize> {
        match list {
            ListAddress::Panels => Some(self.panels.len()),
            ListAddress::Fields { panel } => self.panels.get(panel).map(Panel::len),
        }
    }
}

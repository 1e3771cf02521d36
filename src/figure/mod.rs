//! Figure content model
//!
//! This module provides:
//! - `MetadataField` name/value pairs
//! - `Panel`, an ordered list of fields
//! - `FigureModel`, an ordered list of panels with an active panel

mod field;
mod model;
mod panel;

pub use field::{FieldTemplate, FieldValue, MetadataField};
pub use model::FigureModel;
pub use panel::{Panel, PanelTemplate};

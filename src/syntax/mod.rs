//! Text front-end: transition notation and definition documents.
//!
//! The engines never see text; everything here produces [`crate::model`] values.

pub mod loader;
pub mod notation;

pub use loader::{load_definition, parse_document, DefinitionDocument, Format, LoadedDefinition, Settings};
pub use notation::{parse_transition, parse_transition_in};

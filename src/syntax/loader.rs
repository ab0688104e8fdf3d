//! Definition documents.
//!
//! A definition file is YAML or JSON. List-valued fields accept either a sequence or a
//! single comma-separated string, so `states: q0,q1,q2` and `states: [q0, q1, q2]` mean
//! the same thing. Transitions are notation strings.
//!
//! ```yaml
//! name: anbn
//! states: q0,q1,q2
//! input_alphabet: a,b
//! stack_alphabet: A,Z
//! start: q0
//! bottom: Z
//! accept: q2
//! transitions:
//!   - q0,a,Z -> q0,AZ
//!   - q1,ε,Z -> q2,Z
//! settings:
//!   max_depth: 500
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::notation::parse_transition_in;
use crate::engine::{CyclePolicy, SearchConfig, StepConfig};
use crate::errors::{
    unspanned, DefinitionContext, ErrorKind, ErrorReporting, PdaError, SourceContext,
};
use crate::model::{PdaDefinition, StackSymbol, State, Symbol, DEFAULT_BOTTOM};
use crate::trace::RecordingPolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// `.json` is JSON; everything else is read as YAML, which also covers JSON text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Format::Yaml => "YAML",
            Format::Json => "JSON",
        }
    }
}

/// Either `[a, b]` or `"a,b"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing {
    Many(Vec<String>),
    Joined(String),
}

impl Default for Listing {
    fn default() -> Self {
        Listing::Many(Vec::new())
    }
}

impl Listing {
    pub fn items(&self) -> Vec<String> {
        let split = |s: &str| -> Vec<String> {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        };
        match self {
            Listing::Many(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Listing::Joined(text) => split(text),
        }
    }
}

/// Optional engine settings carried by a definition file. Command-line flags win.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub max_depth: Option<usize>,
    pub cycle_policy: Option<CyclePolicy>,
    pub recording: Option<RecordingPolicy>,
    pub max_steps: Option<usize>,
}

impl Settings {
    pub fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default();
        if let Some(max_depth) = self.max_depth {
            config = config.with_max_depth(max_depth);
        }
        if let Some(cycle_policy) = self.cycle_policy {
            config = config.with_cycle_policy(cycle_policy);
        }
        if let Some(recording) = self.recording {
            config = config.with_recording(recording);
        }
        config
    }

    pub fn step_config(&self) -> StepConfig {
        match self.max_steps {
            Some(max_steps) => StepConfig::default().with_max_steps(max_steps),
            None => StepConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefinitionDocument {
    pub name: Option<String>,
    pub description: Option<String>,
    pub states: Listing,
    pub input_alphabet: Listing,
    pub stack_alphabet: Listing,
    pub start: Option<String>,
    pub bottom: Option<String>,
    pub accept: Listing,
    pub transitions: Vec<String>,
    pub settings: Settings,
}

/// A decoded document, ready to compile.
#[derive(Clone, Debug)]
pub struct LoadedDefinition {
    pub name: String,
    pub description: Option<String>,
    pub definition: PdaDefinition,
    pub settings: Settings,
}

pub fn load_definition(path: &Path) -> Result<LoadedDefinition, PdaError> {
    let text = fs::read_to_string(path).map_err(|e| {
        PdaError::unsourced(
            ErrorKind::Io {
                operation: "read".into(),
                path: path.display().to_string(),
                reason: e.to_string(),
            },
            "loader",
        )
        .with_help("check that the definition file exists and is readable")
    })?;
    let fallback_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "definition".to_string());
    tracing::debug!(path = %path.display(), "loading definition");
    parse_document(&text, Format::from_path(path), &fallback_name)
}

pub fn parse_document(
    text: &str,
    format: Format,
    fallback_name: &str,
) -> Result<LoadedDefinition, PdaError> {
    let document: DefinitionDocument = match format {
        Format::Yaml => serde_yaml::from_str(text).map_err(|e| decode_error(format, e))?,
        Format::Json => serde_json::from_str(text).map_err(|e| decode_error(format, e))?,
    };
    let name = document
        .name
        .clone()
        .unwrap_or_else(|| fallback_name.to_string());
    let definition = document.to_definition(&name)?;
    Ok(LoadedDefinition {
        name,
        description: document.description,
        definition,
        settings: document.settings,
    })
}

fn decode_error(format: Format, error: impl std::fmt::Display) -> PdaError {
    PdaError::unsourced(
        ErrorKind::Decode {
            format: format.name().into(),
            reason: error.to_string(),
        },
        "loader",
    )
}

impl DefinitionDocument {
    pub fn to_definition(&self, name: &str) -> Result<PdaDefinition, PdaError> {
        let fields = DefinitionContext::new(SourceContext::from_file(name, ""), "loader");

        let input_alphabet = self
            .input_alphabet
            .items()
            .iter()
            .map(|s| Symbol::new(s).ok_or_else(|| fields.invalid_symbol("input", s, unspanned())))
            .collect::<Result<_, _>>()?;
        let stack_alphabet = self
            .stack_alphabet
            .items()
            .iter()
            .map(|s| {
                StackSymbol::new(s).ok_or_else(|| fields.invalid_symbol("stack", s, unspanned()))
            })
            .collect::<Result<_, _>>()?;
        let bottom = match self.bottom.as_deref().map(str::trim) {
            None | Some("") => StackSymbol::from(DEFAULT_BOTTOM),
            Some(text) => StackSymbol::new(text)
                .ok_or_else(|| fields.invalid_symbol("bottom-of-stack", text, unspanned()))?,
        };

        let mut transitions = Vec::with_capacity(self.transitions.len());
        for (index, line) in self.transitions.iter().enumerate() {
            let line = line.trim();
            let ctx = DefinitionContext::new(
                SourceContext::from_file(format!("{name}: transition #{}", index + 1), line),
                "syntax",
            );
            transitions.push(parse_transition_in(&ctx, line)?);
        }

        Ok(PdaDefinition {
            states: self.states.items().iter().map(State::new).collect(),
            input_alphabet,
            stack_alphabet,
            start: self
                .start
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(State::new),
            bottom,
            accept: self.accept.items().iter().map(State::new).collect(),
            transitions,
        })
    }
}

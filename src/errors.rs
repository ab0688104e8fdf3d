//! Pushdown Error Handling
//!
//! A single error type, [`PdaError`], carries what went wrong ([`ErrorKind`]), where it
//! happened ([`SourceInfo`], when a source text is available) and how to help
//! ([`DiagnosticInfo`]). Contexts that know their source implement [`ErrorReporting`] and
//! build errors through it instead of assembling the struct by hand.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Named source text an error can point into.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

#[derive(Debug)]
pub struct PdaError {
    pub kind: ErrorKind,
    pub source_info: Option<SourceInfo>,
    pub diagnostic_info: DiagnosticInfo,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Structural problems with a definition
    #[error("PDA not properly defined: {reason}")]
    UndefinedPda { reason: String },

    // Front-end parse problems
    #[error("malformed transition '{text}': expected {expected}")]
    MalformedTransition { text: String, expected: String },
    #[error("invalid {role} symbol '{symbol}': a symbol is exactly one character")]
    InvalidSymbol { role: String, symbol: String },

    // Lint findings
    #[error("state '{state}' is not declared in the state set")]
    UnknownState { state: String },
    #[error("symbol '{symbol}' is not in the declared {alphabet} alphabet")]
    SymbolOutsideAlphabet { symbol: String, alphabet: String },
    #[error("state '{state}' is unreachable from the start state")]
    UnreachableState { state: String },

    // Environment
    #[error("cannot {operation} '{path}': {reason}")]
    Io {
        operation: String,
        path: String,
        reason: String,
    },
    #[error("cannot decode {format} document: {reason}")]
    Decode { format: String, reason: String },
    #[error("unknown preset '{name}'")]
    UnknownPreset { name: String },
}

#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
    pub is_warning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Definition,
    Syntax,
    Lint,
    Environment,
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UndefinedPda { .. } => ErrorCategory::Definition,
            Self::MalformedTransition { .. } | Self::InvalidSymbol { .. } => ErrorCategory::Syntax,
            Self::UnknownState { .. }
            | Self::SymbolOutsideAlphabet { .. }
            | Self::UnreachableState { .. } => ErrorCategory::Lint,
            Self::Io { .. } | Self::Decode { .. } | Self::UnknownPreset { .. } => {
                ErrorCategory::Environment
            }
        }
    }

    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UndefinedPda { .. } => "undefined_pda",
            Self::MalformedTransition { .. } => "malformed_transition",
            Self::InvalidSymbol { .. } => "invalid_symbol",
            Self::UnknownState { .. } => "unknown_state",
            Self::SymbolOutsideAlphabet { .. } => "symbol_outside_alphabet",
            Self::UnreachableState { .. } => "unreachable_state",
            Self::Io { .. } => "io",
            Self::Decode { .. } => "decode",
            Self::UnknownPreset { .. } => "unknown_preset",
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::UndefinedPda { .. } => "definition incomplete",
            Self::MalformedTransition { .. } => "malformed here",
            Self::InvalidSymbol { .. } => "invalid symbol",
            Self::UnknownState { .. } => "unknown state",
            Self::SymbolOutsideAlphabet { .. } => "outside alphabet",
            Self::UnreachableState { .. } => "unreachable",
            Self::Io { .. } | Self::Decode { .. } | Self::UnknownPreset { .. } => "here",
        }
    }
}

impl PdaError {
    /// Builds an error that has no source text to point into.
    pub fn unsourced(kind: ErrorKind, phase: &str) -> Self {
        let error_code = format!("pushdown::{}::{}", phase, kind.code_suffix());
        Self {
            kind,
            source_info: None,
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
                is_warning: false,
            },
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.diagnostic_info.help = Some(help.into());
        self
    }

    pub fn as_warning(mut self) -> Self {
        self.diagnostic_info.is_warning = true;
        self
    }

    pub fn is_warning(&self) -> bool {
        self.diagnostic_info.is_warning
    }

    pub fn code(&self) -> &str {
        &self.diagnostic_info.error_code
    }
}

impl std::error::Error for PdaError {}

impl fmt::Display for PdaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Diagnostic for PdaError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        if self.diagnostic_info.is_warning {
            Some(miette::Severity::Warning)
        } else {
            Some(miette::Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let info = self.source_info.as_ref()?;
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_info
            .as_ref()
            .map(|info| &*info.source as &dyn miette::SourceCode)
    }
}

// ============================================================================
// ERROR REPORTING
// ============================================================================

/// Context-aware error creation; each context knows its source and phase.
pub trait ErrorReporting {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> PdaError;

    fn malformed_transition(&self, text: &str, expected: &str, span: SourceSpan) -> PdaError {
        self.report(
            ErrorKind::MalformedTransition {
                text: text.into(),
                expected: expected.into(),
            },
            span,
        )
    }

    fn invalid_symbol(&self, role: &str, symbol: &str, span: SourceSpan) -> PdaError {
        self.report(
            ErrorKind::InvalidSymbol {
                role: role.into(),
                symbol: symbol.into(),
            },
            span,
        )
    }
}

/// Error creation context for anything that reads definition text.
pub struct DefinitionContext {
    pub source: SourceContext,
    pub phase: String,
}

impl DefinitionContext {
    pub fn new(source: SourceContext, phase: impl Into<String>) -> Self {
        Self {
            source,
            phase: phase.into(),
        }
    }
}

impl ErrorReporting for DefinitionContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> PdaError {
        let error_code = format!("pushdown::{}::{}", self.phase, kind.code_suffix());

        PdaError {
            kind,
            source_info: Some(SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: self.phase.clone(),
            }),
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
                is_warning: false,
            },
        }
    }
}

/// Creates a placeholder span for errors not tied to a specific source location.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// Prints a PdaError with full miette diagnostics.
pub fn print_error(error: PdaError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

use thiserror::Error;
use tracing::{error, warn};

use crate::prelude::*;

use super::Header;

/// How severe a [`Diagnostic`] is. A single error makes the whole parse fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Reported but the parse may still succeed.
    Warning,
    /// The parse fails.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Coarse classification of a [`Problem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Unexpected, duplicate or unterminated sections, stray content and unmatched `End`.
    SectionStructure,
    /// Lines with the wrong number of fields or with invalid tokens.
    MalformedLine,
    /// A transition refers to a state or symbol that was never declared.
    UndefinedReference,
    /// One of `Sigma:`, `States:` or `Transitions:` never appears.
    MissingSection,
    /// No state is marked initial.
    MissingInitialState,
    /// More than one state is marked initial.
    DuplicateInitialState,
    /// A state carries an unknown or repeated attribute.
    InvalidAttribute,
    /// Remarks that never affect the outcome of a parse.
    Informational,
}

/// The role a field plays in a transition line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The state a transition leaves from.
    Source,
    /// The symbol a transition is labeled with.
    Symbol,
    /// The state a transition leads to.
    Target,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Source => write!(f, "source state"),
            Role::Symbol => write!(f, "symbol"),
            Role::Target => write!(f, "target state"),
        }
    }
}

/// Everything that can be wrong with a description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum Problem {
    #[error("unexpected `{0}`")]
    UnexpectedSection(Header),
    #[error("duplicate section `{0}`")]
    DuplicateSection(Header),
    #[error("end of input before end of section `{0}`")]
    UnterminatedSection(Header),
    #[error("unexpected `End`, no section is open")]
    UnmatchedEnd,
    #[error("invalid token `{0}` outside of a section")]
    StrayContent(String),
    #[error("invalid letter `{0}`")]
    InvalidSymbol(String),
    #[error("empty name in `{0}`")]
    EmptyField(String),
    #[error("malformed state `{0}`")]
    MalformedState(String),
    #[error("invalid state `{0}`")]
    InvalidState(String),
    #[error("repeated attribute `{0}`")]
    RepeatedAttribute(String),
    #[error("invalid attribute `{0}`")]
    InvalidAttribute(String),
    #[error("duplicate initial state `{0}`")]
    DuplicateInitialState(State),
    #[error("malformed transition `{0}`")]
    MalformedTransition(String),
    #[error("invalid transition {role} `{token}`")]
    InvalidTransitionField { role: Role, token: String },
    #[error("undefined state `{0}`")]
    UndefinedState(State),
    #[error("undefined letter `{0}`")]
    UndefinedSymbol(Symbol),
    #[error("missing section `{0}`")]
    MissingSection(Header),
    #[error("missing initial state")]
    MissingInitialState,
    #[error("no final state")]
    NoFinalStates,
    #[error("{} `{word}`", verdict(.expected))]
    SelfCheckMismatch { word: String, expected: bool },
}

impl Problem {
    /// Maps `self` to its [`Category`].
    pub fn category(&self) -> Category {
        use Problem::*;
        match self {
            UnexpectedSection(_)
            | DuplicateSection(_)
            | UnterminatedSection(_)
            | UnmatchedEnd
            | StrayContent(_) => Category::SectionStructure,
            InvalidSymbol(_)
            | EmptyField(_)
            | MalformedState(_)
            | InvalidState(_)
            | MalformedTransition(_)
            | InvalidTransitionField { .. } => Category::MalformedLine,
            RepeatedAttribute(_) | InvalidAttribute(_) => Category::InvalidAttribute,
            DuplicateInitialState(_) => Category::DuplicateInitialState,
            UndefinedState(_) | UndefinedSymbol(_) => Category::UndefinedReference,
            MissingSection(_) => Category::MissingSection,
            MissingInitialState => Category::MissingInitialState,
            NoFinalStates | SelfCheckMismatch { .. } => Category::Informational,
        }
    }

    /// Describes how a lenient parse repairs `self`, if it does.
    pub fn repair(&self) -> Option<&'static str> {
        use Problem::*;
        match self {
            UnexpectedSection(_) => Some("switching to the new section"),
            DuplicateSection(_) => Some("continuing previous section"),
            UnterminatedSection(_) => Some("closing it"),
            StrayContent(_) => Some("treating as comment"),
            EmptyField(_) | MalformedTransition(_) => Some("ignoring"),
            DuplicateInitialState(_) => Some("keeping the first initial state"),
            UndefinedState(_) => Some("adding to states"),
            UndefinedSymbol(_) => Some("adding to sigma"),
            MissingSection(_) => Some("adding as empty"),
            _ => None,
        }
    }
}

fn verdict(expected: &bool) -> &'static str {
    if *expected {
        "should accept"
    } else {
        "should reject"
    }
}

/// A [`Problem`] together with its [`Severity`] and the (1-based) line it was found at.
/// Problems that are detected after all lines have been read, like a missing section,
/// carry no line, except for undefined references which point to the first transition
/// that requires the state or symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Line number, starting at 1.
    pub line: Option<usize>,
    /// Whether this is an error or a warning.
    pub severity: Severity,
    /// What is wrong.
    pub problem: Problem,
}

impl Diagnostic {
    /// Returns true if `self` is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.problem)?;
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
        }
        if self.severity == Severity::Warning {
            if let Some(repair) = self.problem.repair() {
                write!(f, ", {repair}")?;
            }
        }
        Ok(())
    }
}

/// Collects the diagnostics of a single parse and logs them as they come in.
#[derive(Debug)]
pub(crate) struct Reporter {
    options: ParseOptions,
    diagnostics: Vec<Diagnostic>,
    failed: bool,
}

impl Reporter {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            diagnostics: vec![],
            failed: false,
        }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Records an error, which makes the parse fail.
    pub fn error(&mut self, line: Option<usize>, problem: Problem) {
        self.failed = true;
        self.record(line, Severity::Error, problem);
    }

    /// Records a warning, unless warnings are switched off.
    pub fn warn(&mut self, line: Option<usize>, problem: Problem) {
        if self.options.warnings() {
            self.record(line, Severity::Warning, problem);
        }
    }

    /// Records a warning regardless of the options.
    pub fn note(&mut self, line: Option<usize>, problem: Problem) {
        self.record(line, Severity::Warning, problem);
    }

    /// An error in strict mode, a warning otherwise.
    pub fn anomaly(&mut self, line: Option<usize>, problem: Problem) {
        match self.options.mode() {
            Mode::Strict => self.error(line, problem),
            Mode::Lenient => self.warn(line, problem),
        }
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn record(&mut self, line: Option<usize>, severity: Severity, problem: Problem) {
        let diagnostic = Diagnostic {
            line,
            severity,
            problem,
        };
        match severity {
            Severity::Error => error!("{diagnostic}"),
            Severity::Warning => warn!("{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display() {
        let warning = Diagnostic {
            line: Some(4),
            severity: Severity::Warning,
            problem: Problem::DuplicateSection(Header::States),
        };
        assert_eq!(
            warning.to_string(),
            "warning: duplicate section `States:` at line 4, continuing previous section"
        );
        let error = Diagnostic {
            severity: Severity::Error,
            ..warning
        };
        assert_eq!(
            error.to_string(),
            "error: duplicate section `States:` at line 4"
        );
        let mismatch = Problem::SelfCheckMismatch {
            word: "ab".into(),
            expected: false,
        };
        assert_eq!(mismatch.to_string(), "should reject `ab`");
        assert_eq!(mismatch.category(), Category::Informational);
    }

    #[test]
    fn reporter_respects_mode() {
        let mut lenient = Reporter::new(ParseOptions::lenient().with_warnings(false));
        lenient.anomaly(Some(1), Problem::UnmatchedEnd);
        assert!(!lenient.failed());
        lenient.note(None, Problem::NoFinalStates);
        assert_eq!(lenient.into_diagnostics().len(), 1);

        let mut strict = Reporter::new(ParseOptions::strict());
        strict.anomaly(Some(1), Problem::UnmatchedEnd);
        assert!(strict.failed());
    }
}

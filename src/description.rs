use std::{borrow::Cow, io::BufRead};

use thiserror::Error;
use tracing::{debug, trace};

use crate::prelude::*;

mod check;
pub use check::WordCheck;

mod diagnostic;
pub use diagnostic::{Category, Diagnostic, Problem, Role, Severity};
use diagnostic::Reporter;

mod options;
pub use options::{Mode, ParseOptions};

mod section;
pub use section::Header;
use section::{Cursor, Line, Sections, StateDecls, TransitionDecls};

/// The result of a successful parse: the automaton together with the words listed in
/// `Accept:`/`Reject:` sections, everything that was reported along the way and the
/// outcome of checking the listed words.
#[derive(Debug, Clone)]
pub struct Description {
    automaton: Automaton,
    accept: Option<Set<String>>,
    reject: Option<Set<String>>,
    diagnostics: Vec<Diagnostic>,
    checks: Vec<WordCheck>,
}

impl Description {
    /// The parsed automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Consumes `self` and gives back the parsed automaton.
    pub fn into_automaton(self) -> Automaton {
        self.automaton
    }

    /// Words of the `Accept:` section, `None` if there was no such section.
    pub fn accept(&self) -> Option<&Set<String>> {
        self.accept.as_ref()
    }

    /// Words of the `Reject:` section, `None` if there was no such section.
    pub fn reject(&self) -> Option<&Set<String>> {
        self.reject.as_ref()
    }

    /// All warnings that were recorded. A successful parse never contains errors.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Results of checking the `Accept:`/`Reject:` words. This is empty unless the automaton
    /// is deterministic and at least one such word was given.
    pub fn checks(&self) -> &[WordCheck] {
        &self.checks
    }
}

/// Returned when a description contains at least one error. Holds every diagnostic
/// that was recorded, errors and warnings alike, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid automaton, found {} error(s)", count_errors(.diagnostics))]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// All recorded diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Only the errors among the recorded diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

fn count_errors(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_error()).count()
}

/// Failure of [`parse_reader`], either reading or parsing went wrong.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The lines could not be read.
    #[error("could not read description: {0}")]
    Io(#[from] std::io::Error),
    /// The lines were read but do not form a valid description.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parses a description given as a sequence of lines. Every line is processed, so that all
/// problems of the input are reported at once, and only afterwards it is decided whether the
/// parse succeeded. It fails if and only if some error has been recorded.
///
/// # Example
/// ```
/// use fa_text::prelude::*;
///
/// let lines = [
///     "Sigma:", "a", "End",
///     "States:", "q0, S", "q1, F", "End",
///     "Transitions:", "q0, a, q1", "End",
/// ];
/// let description = parse(lines, ParseOptions::strict()).unwrap();
/// let aut = description.automaton();
/// assert!(aut.is_deterministic());
/// assert!(aut.accepts_word("a"));
///
/// // there is no initial state without `S`
/// let broken = ["Sigma:", "a", "End", "States:", "q0", "End", "Transitions:", "End"];
/// assert!(parse(broken, ParseOptions::lenient()).is_err());
/// ```
pub fn parse<I>(lines: I, options: ParseOptions) -> Result<Description, ParseError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut scanner = Scanner::new(options);
    for (idx, line) in lines.into_iter().enumerate() {
        scanner.line(idx + 1, line.as_ref());
    }
    scanner.finish()
}

/// Parses a description given as a single string, see [`parse`].
pub fn parse_str(text: &str, options: ParseOptions) -> Result<Description, ParseError> {
    parse(text.lines(), options)
}

/// Reads all lines from `read` and parses them, see [`parse`].
pub fn parse_reader<R: BufRead>(read: R, options: ParseOptions) -> Result<Description, ReadError> {
    let lines = read.lines().collect::<Result<Vec<_>, _>>()?;
    debug!("read {} lines", lines.len());
    Ok(parse(lines, options)?)
}

/// Removes everything from the first unescaped `#` on. An escaped `\#` stands for a literal `#`.
fn strip_comment(line: &str) -> Cow<'_, str> {
    if !line.contains("\\#") {
        return match line.find('#') {
            Some(pos) => Cow::Borrowed(&line[..pos]),
            None => Cow::Borrowed(line),
        };
    }

    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'#') => {
                out.push('#');
                chars.next();
            }
            '#' => break,
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn has_whitespace(token: &str) -> bool {
    token.contains(char::is_whitespace)
}

/// Single pass over the lines of a description.
#[derive(Debug)]
struct Scanner {
    reporter: Reporter,
    cursor: Cursor,
    sections: Sections,
}

impl Scanner {
    fn new(options: ParseOptions) -> Self {
        Self {
            reporter: Reporter::new(options),
            cursor: Cursor::Idle,
            sections: Sections::default(),
        }
    }

    fn mode(&self) -> Mode {
        self.reporter.options().mode()
    }

    fn line(&mut self, number: usize, raw: &str) {
        let stripped = strip_comment(raw);
        let text = stripped.trim();
        if text.is_empty() {
            return;
        }
        trace!("line {number}: {text}");

        match Line::classify(text, self.mode()) {
            Line::Open(header) => self.open(number, header),
            Line::End => self.end(number),
            Line::Content(content) => self.content(number, content),
        }
    }

    fn open(&mut self, number: usize, header: Header) {
        let line = Some(number);
        if self.cursor.header().is_some() {
            if self.mode() == Mode::Strict {
                self.reporter.error(line, Problem::UnexpectedSection(header));
                return;
            }
            self.reporter.warn(line, Problem::UnexpectedSection(header));
        }

        if self.sections.seen(header) || self.cursor.header() == Some(header) {
            if self.mode() == Mode::Strict {
                self.reporter.error(line, Problem::DuplicateSection(header));
                return;
            }
            self.reporter.warn(line, Problem::DuplicateSection(header));
        }

        debug!("opening section {header} at line {number}");
        let previous = std::mem::take(&mut self.cursor);
        self.sections.park(previous);
        self.cursor = self.sections.open(header);
    }

    fn end(&mut self, number: usize) {
        match self.cursor.header() {
            None => self.reporter.error(Some(number), Problem::UnmatchedEnd),
            Some(header) => {
                debug!("closing section {header} at line {number}");
                let current = std::mem::take(&mut self.cursor);
                self.sections.park(current);
            }
        }
    }

    fn content(&mut self, number: usize, text: &str) {
        let reporter = &mut self.reporter;
        match &mut self.cursor {
            Cursor::Idle => reporter.anomaly(Some(number), Problem::StrayContent(text.into())),
            Cursor::Sigma(letters) => sigma_line(letters, number, text, reporter),
            Cursor::States(decls) => states_line(decls, number, text, reporter),
            Cursor::Transitions(decls) => transitions_line(decls, number, text, reporter),
            Cursor::Accept(words) | Cursor::Reject(words) => {
                words.insert(text.to_string());
            }
        }
    }

    /// Runs the checks that need the whole input and, if no error was found, builds the automaton.
    fn finish(mut self) -> Result<Description, ParseError> {
        if let Some(header) = self.cursor.header() {
            self.reporter
                .anomaly(None, Problem::UnterminatedSection(header));
            let current = std::mem::take(&mut self.cursor);
            self.sections.park(current);
        }

        let Sections {
            sigma,
            states,
            transitions,
            accept,
            reject,
        } = self.sections;
        let mut reporter = self.reporter;

        let mut states = states.unwrap_or_else(|| {
            reporter.anomaly(None, Problem::MissingSection(Header::States));
            StateDecls::default()
        });
        let mut letters = sigma.unwrap_or_else(|| {
            reporter.anomaly(None, Problem::MissingSection(Header::Sigma));
            Set::default()
        });
        let transitions = transitions.unwrap_or_else(|| {
            reporter.anomaly(None, Problem::MissingSection(Header::Transitions));
            TransitionDecls::default()
        });

        debug!("checking transitions for undefined states and letters");
        let mut undefined_states = transitions
            .required_states
            .iter()
            .filter(|(q, _)| !states.names.contains(*q))
            .collect::<Vec<_>>();
        undefined_states.sort_by(|l, r| (l.1, l.0).cmp(&(r.1, r.0)));
        for (q, line) in undefined_states {
            reporter.anomaly(Some(*line), Problem::UndefinedState(q.clone()));
            states.names.insert(q.clone());
        }

        let mut undefined_letters = transitions
            .required_symbols
            .iter()
            .filter(|(sym, _)| !letters.contains(*sym))
            .collect::<Vec<_>>();
        undefined_letters.sort_by(|l, r| (l.1, l.0).cmp(&(r.1, r.0)));
        for (sym, line) in undefined_letters {
            reporter.anomaly(Some(*line), Problem::UndefinedSymbol(sym.clone()));
            letters.insert(sym.clone());
        }

        if states.initial.is_none() {
            reporter.error(None, Problem::MissingInitialState);
        }
        if states.finals.is_empty() && reporter.options().mode() == Mode::Lenient {
            reporter.warn(None, Problem::NoFinalStates);
        }

        let initial = match states.initial {
            Some(initial) if !reporter.failed() => initial,
            _ => {
                return Err(ParseError {
                    diagnostics: reporter.into_diagnostics(),
                })
            }
        };

        let automaton = Automaton::from_parts(
            states.names,
            letters,
            transitions.relation,
            states.finals,
            initial,
        );
        debug!(
            "parsed automaton with {} states, deterministic: {}",
            automaton.size(),
            automaton.is_deterministic()
        );

        let has_words = accept.iter().chain(reject.iter()).any(|w| !w.is_empty());
        let checks = if has_words && automaton.is_deterministic() {
            check::self_check(&automaton, accept.as_ref(), reject.as_ref(), &mut reporter)
        } else {
            vec![]
        };

        Ok(Description {
            automaton,
            accept,
            reject,
            diagnostics: reporter.into_diagnostics(),
            checks,
        })
    }
}

fn sigma_line(letters: &mut Set<Symbol>, number: usize, text: &str, reporter: &mut Reporter) {
    let line = Some(number);
    if has_whitespace(text) {
        reporter.error(line, Problem::InvalidSymbol(text.into()));
    } else if text == LAMBDA {
        trace!("line {number}: `{LAMBDA}` is implicit, not adding it to sigma");
    } else {
        letters.insert(text.to_string());
    }
}

/// A state line is `name[, attr[, attr]]`.
fn states_line(decls: &mut StateDecls, number: usize, text: &str, reporter: &mut Reporter) {
    let line = Some(number);
    let fields = text.split(',').map(str::trim).collect::<Vec<_>>();
    if fields.len() > 3 {
        reporter.error(line, Problem::MalformedState(text.into()));
        return;
    }

    let name = fields[0];
    if name.is_empty() {
        reporter.anomaly(line, Problem::EmptyField(text.into()));
        return;
    }
    if has_whitespace(name) {
        reporter.error(line, Problem::InvalidState(name.into()));
        return;
    }
    decls.names.insert(name.to_string());

    let strict = reporter.options().is_strict();
    if strict && fields.len() == 3 && fields[1] == fields[2] {
        reporter.error(line, Problem::RepeatedAttribute(fields[1].into()));
        return;
    }

    for attribute in &fields[1..] {
        match *attribute {
            "S" => {
                if decls.initial.is_none() {
                    decls.initial = Some(name.to_string());
                } else {
                    reporter.anomaly(line, Problem::DuplicateInitialState(name.into()));
                }
            }
            "F" => {
                decls.finals.insert(name.to_string());
            }
            other => reporter.error(line, Problem::InvalidAttribute(other.into())),
        }
    }
}

/// A transition line is `source, symbol, target`.
fn transitions_line(
    decls: &mut TransitionDecls,
    number: usize,
    text: &str,
    reporter: &mut Reporter,
) {
    let line = Some(number);
    let fields = text.split(',').map(str::trim).collect::<Vec<_>>();
    let [source, symbol, target] = fields[..] else {
        reporter.anomaly(line, Problem::MalformedTransition(text.into()));
        return;
    };

    if fields.iter().any(|field| field.is_empty()) {
        reporter.anomaly(line, Problem::EmptyField(text.into()));
        return;
    }

    for (role, token) in [
        (Role::Source, source),
        (Role::Symbol, symbol),
        (Role::Target, target),
    ] {
        if has_whitespace(token) {
            reporter.error(
                line,
                Problem::InvalidTransitionField {
                    role,
                    token: token.into(),
                },
            );
            return;
        }
    }

    decls.insert(source, symbol, target, number);
}

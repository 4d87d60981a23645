/// Determines how anomalies in a description are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Every anomaly is an error and the parse fails.
    Strict,
    /// Most anomalies are downgraded to warnings and repaired locally. Only in this mode the
    /// `Accept:` and `Reject:` sections are recognized.
    #[default]
    Lenient,
}

/// Configuration of a single parse.
///
/// The default is lenient parsing with warnings suppressed, which is also what the `fa`
/// binary uses unless told otherwise.
///
/// ```
/// use fa_text::prelude::*;
///
/// let options = ParseOptions::lenient().with_warnings(true);
/// assert_eq!(options.mode(), Mode::Lenient);
/// assert!(options.warnings());
/// assert!(ParseOptions::strict().is_strict());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ParseOptions {
    mode: Mode,
    warnings: bool,
}

impl ParseOptions {
    /// Strict parsing, warnings enabled.
    pub fn strict() -> Self {
        Self {
            mode: Mode::Strict,
            warnings: true,
        }
    }

    /// Lenient parsing, warnings enabled.
    pub fn lenient() -> Self {
        Self {
            mode: Mode::Lenient,
            warnings: true,
        }
    }

    /// Sets whether warnings are recorded. Errors are always recorded.
    pub fn with_warnings(self, warnings: bool) -> Self {
        Self { warnings, ..self }
    }

    /// The mode in which anomalies are treated.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns true if the mode is [`Mode::Strict`].
    pub fn is_strict(&self) -> bool {
        self.mode == Mode::Strict
    }

    /// Returns true if warnings are recorded.
    pub fn warnings(&self) -> bool {
        self.warnings
    }
}

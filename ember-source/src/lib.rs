//! Source code representation and error management.

use std::cell::{Ref, RefCell};
use std::fmt;

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Accumulated errors.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// A position in the source code.
/// Both `line` and `column` are 0-based. The [`fmt::Display`] implementation prints them 1-based.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Moves the location past a consumed character.
    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Represents a syntax error (compile time error).
/// Produced by both the lexer and the parser.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at {location}")]
pub struct SyntaxError {
    pub message: String,
    pub location: Location,
}

impl SyntaxError {
    /// Create a new syntax error with the specified `message` and `location`.
    pub fn new(message: impl ToString, location: Location) -> Self {
        Self {
            message: message.to_string(),
            location,
        }
    }

    /// Create a new lexical error. The message is prefixed with `lex error: `.
    pub fn lex(message: impl fmt::Display, location: Location) -> Self {
        Self::new(format!("lex error: {}", message), location)
    }
}

/// Manages all the errors.
pub struct ErrorReporter {
    errors: RefCell<Vec<SyntaxError>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds an error to the `ErrorReporter`.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, error: SyntaxError) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(error);
    }

    /// Returns the accumulated errors in the order they were reported.
    pub fn errors(&self) -> Ref<'_, [SyntaxError]> {
        Ref::map(self.errors.borrow(), |errors| errors.as_slice())
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Clones the accumulated errors out of the reporter.
    pub fn to_vec(&self) -> Vec<SyntaxError> {
        self.errors.borrow().clone()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.borrow();
        for error in errors.iter() {
            writeln!(f, "ERROR: {}", error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display_is_one_based() {
        let mut loc = Location::default();
        assert_eq!(loc.to_string(), "1:1");
        loc.advance('a');
        loc.advance('\n');
        loc.advance('b');
        assert_eq!(loc, Location::new(1, 1));
        assert_eq!(loc.to_string(), "2:2");
    }

    #[test]
    fn syntax_error_format() {
        let err = SyntaxError::new("missing ; after var decl", Location::new(0, 9));
        assert_eq!(err.to_string(), "missing ; after var decl at 1:10");
        let err = SyntaxError::lex("empty char literal", Location::new(2, 0));
        assert_eq!(err.to_string(), "lex error: empty char literal at 3:1");
    }

    #[test]
    fn reporter_keeps_order() {
        let source: Source = "".into();
        assert!(source.has_no_errors());
        source.errors.add_error(SyntaxError::new("first", Location::new(0, 0)));
        source.errors.add_error(SyntaxError::new("second", Location::new(1, 0)));
        assert_eq!(source.errors.len(), 2);
        assert_eq!(source.errors.errors()[1].message, "second");
        assert_eq!(
            source.errors.to_string(),
            "ERROR: first at 1:1\nERROR: second at 2:1\n"
        );
    }
}

//! Raw character cursor over source text.

use ember_source::Location;
use std::iter::Peekable;
use std::str::Chars;

/// Walks the source one character at a time while tracking the [`Location`] of the cursor.
/// The cursor only ever moves forward.
pub struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    location: Location,
}

impl<'a> Scanner<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            chars: content.chars().peekable(),
            location: Location::default(),
        }
    }

    /// Returns the next character without consuming it or `None` at end of input.
    pub fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Consumes the next character and advances the location.
    pub fn get_symbol(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.location.advance(ch);
        Some(ch)
    }

    /// Consumes the next character iff it is equal to `ch`.
    pub fn matches(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.get_symbol();
            true
        } else {
            false
        }
    }

    /// Consumes everything up to and including the next newline (or until end of input).
    pub fn get_line(&mut self) -> String {
        let mut line = String::new();
        while let Some(ch) = self.get_symbol() {
            line.push(ch);
            if ch == '\n' {
                break;
            }
        }
        line
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn eof(&mut self) -> bool {
        self.peek().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor() {
        let mut scanner = Scanner::new("ab\nc");
        assert_eq!(scanner.peek(), Some('a'));
        assert_eq!(scanner.location(), Location::new(0, 0));
        assert!(!scanner.matches('b'));
        assert!(scanner.matches('a'));
        assert_eq!(scanner.get_symbol(), Some('b'));
        assert_eq!(scanner.location(), Location::new(0, 2));
        assert_eq!(scanner.get_symbol(), Some('\n'));
        assert_eq!(scanner.location(), Location::new(1, 0));
        assert_eq!(scanner.get_symbol(), Some('c'));
        assert!(scanner.eof());
        assert_eq!(scanner.get_symbol(), None);
        assert_eq!(scanner.location(), Location::new(1, 1));
    }

    #[test]
    fn test_get_line() {
        let mut scanner = Scanner::new("# comment\nnext");
        assert_eq!(scanner.get_line(), "# comment\n");
        assert_eq!(scanner.location(), Location::new(1, 0));
        assert_eq!(scanner.get_line(), "next");
        assert!(scanner.eof());
    }
}

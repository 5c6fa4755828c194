//! Tokens and the lexer turning a [`Scanner`] into a token stream.

use crate::scanner::Scanner;
use ember_source::{Location, SyntaxError};
use log::{debug, trace};
use std::{fmt, mem};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Only used before the first token has been produced.
    Undefined,
    /// A malformed lexical unit. Carries the error describing what went wrong.
    Invalid(SyntaxError),
    Eof,

    // literals
    NumberLit(u64),
    StringLit(String),
    CharLit(char),

    // operators
    // - arithmetics
    Plus,
    Minus, // NOTE: can also be unary
    Asterisk,
    Slash,
    Percent,
    // - assignment
    Equals,
    // - equality
    EqualsEquals,
    NotEquals,
    LogicalNot,
    // - ordering
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,

    // delimiters
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Dot,
    Comma,
    Semi,
    Colon,
    Pipe,

    // identifiers
    Identifier(String),

    // keywords
    True,
    False,
    Fun,
    Var,
    If,
    Then,
    Else,
    For,
    Return,
    Yield,
    Struct,
    Match,
    Exports,

    // built-in types
    TyInt,
    TyString,
    TyBool,
    TyUnit,
}

impl Default for TokenKind {
    fn default() -> Self {
        TokenKind::Undefined
    }
}

impl TokenKind {
    /// Returns `true` if `self` and `other` are the same kind of token, ignoring any payload.
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Undefined => "UNDEFINED",
            TokenKind::Invalid(_) => "INVALID",
            TokenKind::Eof => "EOF",
            TokenKind::NumberLit(_) => "NUMBER",
            TokenKind::StringLit(_) => "STRING",
            TokenKind::CharLit(_) => "CHAR",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Equals => "=",
            TokenKind::EqualsEquals => "==",
            TokenKind::NotEquals => "!=",
            TokenKind::LogicalNot => "!",
            TokenKind::LessThan => "<",
            TokenKind::LessThanEquals => "<=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterThanEquals => ">=",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Colon => ":",
            TokenKind::Pipe => "|",
            TokenKind::Identifier(_) => "IDENT",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Fun => "fun",
            TokenKind::Var => "var",
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::Return => "return",
            TokenKind::Yield => "yield",
            TokenKind::Struct => "struct",
            TokenKind::Match => "match",
            TokenKind::Exports => "exports",
            TokenKind::TyInt => "Int",
            TokenKind::TyString => "String",
            TokenKind::TyBool => "Bool",
            TokenKind::TyUnit => "Unit",
        };
        f.write_str(text)
    }
}

/// A classified lexical unit together with the location of its first character.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, location: Location) -> Self {
        Self { kind, location }
    }
}

/// Maps reserved words to their token kinds. Anything else is an identifier.
pub fn lookup_word(word: &str) -> TokenKind {
    match word {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "fun" => TokenKind::Fun,
        "var" => TokenKind::Var,
        "if" => TokenKind::If,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "return" => TokenKind::Return,
        "yield" => TokenKind::Yield,
        "struct" => TokenKind::Struct,
        "match" => TokenKind::Match,
        "exports" => TokenKind::Exports,

        "Int" => TokenKind::TyInt,
        "String" => TokenKind::TyString,
        "Bool" => TokenKind::TyBool,
        "Unit" => TokenKind::TyUnit,

        _ => TokenKind::Identifier(word.to_string()),
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | '\t' | '\r')
}

fn is_word_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_word_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Produces tokens on demand with one token of lookahead.
///
/// Lexical errors never stop tokenization: a malformed unit becomes a [`TokenKind::Invalid`] token
/// and the error is recorded in [`Lexer::errors`].
pub struct Lexer<'a> {
    scanner: Scanner<'a>,
    /// The most recently consumed token.
    previous: Token,
    /// The next token, not consumed yet.
    lookahead: Token,
    errors: Vec<SyntaxError>,
    recent_errors_count: usize,
    /// Set once the iterator has yielded [`TokenKind::Eof`].
    exhausted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(content: &'a str) -> Self {
        let mut lexer = Self {
            scanner: Scanner::new(content),
            previous: Token::default(),
            lookahead: Token::default(),
            errors: Vec::new(),
            recent_errors_count: 0,
            exhausted: false,
        };
        lexer.next_token(); // fill lookahead
        lexer
    }

    /// Consumes the lookahead token and returns it.
    /// The consumed token becomes [`Lexer::previous`].
    pub fn next_token(&mut self) -> Token {
        self.recent_errors_count = 0;
        let token = self.scan_token();
        trace!("token {:?} at {}", token.kind, token.location);

        let consumed = mem::replace(&mut self.lookahead, token);
        self.previous = consumed.clone();
        consumed
    }

    pub fn advance(&mut self) {
        self.next_token();
    }

    /// Returns the lookahead token without consuming it.
    pub fn peek(&self) -> &Token {
        &self.lookahead
    }

    /// Returns the most recently consumed token.
    pub fn previous(&self) -> &Token {
        &self.previous
    }

    /// Predicate that tests whether the lookahead token has the same kind as `kind`.
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.lookahead.kind.same_kind(kind)
    }

    /// Predicate that tests whether the lookahead token has the same kind and eats it if yes as a side effect.
    pub fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(&kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// All lexical errors in the order they were found.
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Number of errors recorded by the last call to [`Lexer::next_token`].
    pub fn recent_errors_count(&self) -> usize {
        self.recent_errors_count
    }
}

/* Scanning */
impl<'a> Lexer<'a> {
    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();
        self.skip_comments();

        let location = self.scanner.location();
        let ch = match self.scanner.peek() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, location),
        };

        let kind = if let Some(literal) = self.match_literal(ch, location) {
            literal
        } else if let Some(word) = self.match_word(ch) {
            word
        } else {
            self.match_operator(location)
        };
        Token::new(kind, location)
    }

    fn skip_whitespace(&mut self) {
        while self.scanner.peek().map_or(false, is_whitespace) {
            self.scanner.get_symbol();
        }
    }

    /// Comments start with `#` and run until the end of the line.
    fn skip_comments(&mut self) {
        while self.scanner.peek() == Some('#') {
            self.scanner.get_line();
            self.skip_whitespace();
        }
    }

    /// Records a lexical error and returns the matching invalid token kind.
    fn invalid(&mut self, message: impl fmt::Display, location: Location) -> TokenKind {
        let error = SyntaxError::lex(message, location);
        debug!("{}", error);
        self.errors.push(error.clone());
        self.recent_errors_count += 1;
        TokenKind::Invalid(error)
    }

    /* Literals */
    fn match_literal(&mut self, ch: char, location: Location) -> Option<TokenKind> {
        match ch {
            '\'' => Some(self.match_char_literal(location)),
            '"' => Some(self.match_string_literal(location)),
            '0'..='9' => Some(self.match_number_literal(location)),
            _ => None,
        }
    }

    fn match_number_literal(&mut self, location: Location) -> TokenKind {
        let mut number = String::new();
        while let Some(ch) = self.scanner.peek().filter(char::is_ascii_digit) {
            number.push(ch);
            self.scanner.get_symbol();
        }

        match number.parse() {
            Ok(value) => TokenKind::NumberLit(value),
            Err(_) => self.invalid("number literal out of range", location),
        }
    }

    fn match_char_literal(&mut self, location: Location) -> TokenKind {
        if !self.scanner.matches('\'') {
            return self.invalid("not a char literal", location);
        }

        let ch = match self.scanner.get_symbol() {
            None => return self.invalid("unexpected EOF: missing closing quote(')", location),
            Some('\'') => return self.invalid("empty char literal", location),
            Some('\\') => match self.read_escape() {
                Ok(ch) => ch,
                Err(message) => {
                    self.scanner.matches('\'');
                    return self.invalid(message, location);
                }
            },
            Some(ch) => ch,
        };

        if !self.scanner.matches('\'') {
            return self.invalid("missing closing quote(')", location);
        }
        TokenKind::CharLit(ch)
    }

    fn match_string_literal(&mut self, location: Location) -> TokenKind {
        if !self.scanner.matches('"') {
            return self.invalid("not a string literal", location);
        }

        let mut string = String::new();
        // A bad escape does not stop the scan so that the rest of the literal is not lexed as code.
        let mut bad_escape = None;
        loop {
            match self.scanner.get_symbol() {
                None => {
                    return self.invalid("unexpected EOF: missing closing quotes(\")", location)
                }
                Some('"') => break,
                Some('\\') => match self.read_escape() {
                    Ok(ch) => string.push(ch),
                    Err(message) => {
                        bad_escape.get_or_insert(message);
                    }
                },
                Some(ch) => string.push(ch),
            }
        }

        match bad_escape {
            Some(message) => self.invalid(message, location),
            None => TokenKind::StringLit(string),
        }
    }

    /// Reads the character following a `\`.
    fn read_escape(&mut self) -> Result<char, String> {
        match self.scanner.get_symbol() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('0') => Ok('\0'),
            Some('\\') => Ok('\\'),
            Some('"') => Ok('"'),
            Some('\'') => Ok('\''),
            Some(ch) => Err(format!("unknown escape sequence \\{}", ch)),
            None => Err("unexpected EOF in escape sequence".to_string()),
        }
    }

    /* Words */
    fn match_word(&mut self, ch: char) -> Option<TokenKind> {
        if !is_word_start(ch) {
            return None;
        }

        let mut word = String::new();
        while let Some(ch) = self.scanner.peek().filter(|ch| is_word_continue(*ch)) {
            word.push(ch);
            self.scanner.get_symbol();
        }
        Some(lookup_word(&word))
    }

    /* Operators and delimiters */
    fn match_operator(&mut self, location: Location) -> TokenKind {
        let ch = match self.scanner.get_symbol() {
            Some(ch) => ch,
            None => return TokenKind::Eof,
        };

        match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => self.match_eq(TokenKind::NotEquals, TokenKind::LogicalNot),
            '=' => self.match_eq(TokenKind::EqualsEquals, TokenKind::Equals),
            '<' => self.match_eq(TokenKind::LessThanEquals, TokenKind::LessThan),
            '>' => self.match_eq(TokenKind::GreaterThanEquals, TokenKind::GreaterThan),

            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            ':' => TokenKind::Colon,
            '|' => TokenKind::Pipe,

            _ => self.invalid(format!("unexpected symbol {}", ch), location),
        }
    }

    /// Returns `matched` if the next character is `=` (and eats it), `single` otherwise.
    fn match_eq(&mut self, matched: TokenKind, single: TokenKind) -> TokenKind {
        if self.scanner.matches('=') {
            matched
        } else {
            single
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    /// Yields every token up to and including [`TokenKind::Eof`].
    fn next(&mut self) -> Option<Token> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.exhausted = true;
        }
        Some(token)
    }
}

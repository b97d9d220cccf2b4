//! A lexer for generating tokens from a command line.

use alloc::borrow::Cow;
use core::iter::FusedIterator;

use crate::scanner::scan;

/// Separator between tokens.
pub const DELIMITER: char = ' ';

/// Variant of `Option` token. Only store the identifier, not the hyphens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flag<'a> {
    /// Identifier with quote characters removed.
    pub name: Cow<'a, str>,

    /// True for a long flag (e.g. --verbose), false for a short one (e.g. -v).
    pub long: bool,
}

/// Defines a `Token` that has been read from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Option marker.
    Option(Flag<'a>),

    /// Free text (i.e. everything that does not start with a hyphen).
    Argument(Cow<'a, str>),
}

impl<'a> Token<'a> {
    /// Evaluate if the token is an option marker.
    #[inline(always)]
    pub fn is_option(&self) -> bool {
        matches!(self, Token::Option(_))
    }

    /// Evaluate if the token is free text.
    #[inline(always)]
    pub fn is_argument(&self) -> bool {
        matches!(self, Token::Argument(_))
    }

    /// Retrieve the text of an argument token.
    pub fn into_argument(self) -> Option<Cow<'a, str>> {
        match self {
            Token::Argument(text) => Some(text),
            Token::Option(_) => None,
        }
    }
}

/// Defines a lexer that is responsible for streaming tokens from a command line.
///
/// Tokens are produced lazily, in a single pass. Creating a new lexer over the same line scans it
/// again from the start.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    line: &'a str,
    cursor: usize,
}

impl<'a> Tokens<'a> {
    /// Create a new lexer from the command line input. Surrounding whitespace is ignored.
    pub fn new(line: &'a str) -> Self {
        Tokens {
            line: line.trim(),
            cursor: 0,
        }
    }

    fn skip_delimiters(&mut self) {
        let rest = &self.line[self.cursor..];
        self.cursor += rest.len() - rest.trim_start_matches(DELIMITER).len();
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_delimiters();

        let rest = &self.line[self.cursor..];
        if rest.is_empty() {
            return None;
        }

        // Options, long (--flag) or short (-f).
        if let Some(after_dash) = rest.strip_prefix('-') {
            let (long, name) = match after_dash.strip_prefix('-') {
                Some(name) => (true, name),
                None => (false, after_dash),
            };

            let scanned = scan(name, &[DELIMITER]);
            self.cursor += rest.len() - name.len() + scanned.consumed();

            trace!("lexed option `{=str}`", scanned.raw);

            return Some(Token::Option(Flag {
                name: scanned.text,
                long,
            }));
        }

        let scanned = scan(rest, &[DELIMITER]);
        self.cursor += scanned.consumed();

        trace!("lexed argument `{=str}`", scanned.raw);

        Some(Token::Argument(scanned.text))
    }
}

impl FusedIterator for Tokens<'_> {}

//! A scanner for reading runs of text up to an unquoted, unescaped delimiter.

use alloc::borrow::Cow;

/// Escape marker. The character following it never terminates a scan or toggles a quoted span.
pub const ESCAPE: char = '\\';

/// Evaluate if the character opens or closes a quoted span.
#[inline(always)]
pub fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Defines a run of text read from the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scanned<'a> {
    /// The source span, quote characters included.
    pub raw: &'a str,

    /// The text with quote characters removed. Escape markers are kept verbatim.
    pub text: Cow<'a, str>,
}

impl Scanned<'_> {
    /// Number of bytes consumed from the input, which may exceed the length of the text.
    #[inline(always)]
    pub fn consumed(&self) -> usize {
        self.raw.len()
    }
}

enum Step {
    Keep,
    Drop,
    Stop,
}

#[derive(Default)]
struct State {
    quote: Option<char>,
    previous: Option<char>,
}

impl State {
    fn step(&mut self, c: char, delimiters: &[char]) -> Step {
        let escaped = self.previous == Some(ESCAPE);
        self.previous = Some(c);

        match self.quote {
            // Only the matching quote closes a quoted span.
            Some(quote) if c == quote && !escaped => {
                self.quote = None;
                Step::Drop
            }

            Some(_) => Step::Keep,

            None if is_quote(c) && !escaped => {
                self.quote = Some(c);
                Step::Drop
            }

            None if delimiters.contains(&c) && !escaped => Step::Stop,

            None => Step::Keep,
        }
    }
}

/// Read the longest prefix of `input` that does not contain an unescaped, unquoted delimiter.
///
/// Quote characters are consumed but not emitted. An unterminated quote consumes the input up to
/// its end. The text is only allocated when quote characters had to be removed.
pub fn scan<'a>(input: &'a str, delimiters: &[char]) -> Scanned<'a> {
    let mut state = State::default();
    let mut end = input.len();
    let mut dropped = false;

    for (i, c) in input.char_indices() {
        match state.step(c, delimiters) {
            Step::Keep => {}
            Step::Drop => dropped = true,
            Step::Stop => {
                end = i;
                break;
            }
        }
    }

    let raw = &input[..end];

    let text = if dropped {
        // Replay the same state machine over the span, it never stops before its end.
        let mut state = State::default();
        Cow::Owned(
            raw.chars()
                .filter(|&c| matches!(state.step(c, delimiters), Step::Keep))
                .collect(),
        )
    } else {
        Cow::Borrowed(raw)
    };

    Scanned { raw, text }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn it_should_stop_at_delimiter() {
        let scanned = scan("hello world", &[' ']);

        assert_that!(&*scanned.text, eq("hello"));
        assert_that!(scanned.consumed(), eq(5));
        assert_that!(matches!(scanned.text, Cow::Borrowed(_)), eq(true));
    }

    #[test]
    fn it_should_read_to_end_without_delimiter() {
        let scanned = scan("hello", &[' ']);

        assert_that!(&*scanned.text, eq("hello"));
        assert_that!(scanned.consumed(), eq(5));
    }

    #[test]
    fn it_should_honor_any_of_the_delimiters() {
        let scanned = scan("key=value other", &[' ', '=']);

        assert_that!(&*scanned.text, eq("key"));
        assert_that!(scanned.consumed(), eq(3));
    }

    #[test]
    fn it_should_strip_quotes_and_keep_spaces() {
        let scanned = scan("'hello world' next", &[' ']);

        assert_that!(&*scanned.text, eq("hello world"));
        assert_that!(scanned.consumed(), eq(13));
        assert_that!(scanned.raw, eq("'hello world'"));
    }

    #[test]
    fn it_should_strip_double_quotes() {
        let scanned = scan("\"file name.txt\"", &[' ']);

        assert_that!(&*scanned.text, eq("file name.txt"));
        assert_that!(scanned.consumed(), eq(15));
    }

    #[test]
    fn it_should_join_quoted_and_bare_text() {
        let scanned = scan("pre'fix suf'fix tail", &[' ']);

        assert_that!(&*scanned.text, eq("prefix suffix"));
        assert_that!(scanned.consumed(), eq(15));
    }

    #[test]
    fn it_should_keep_other_quote_inside_quoted_span() {
        let scanned = scan("\"it's here\"", &[' ']);

        assert_that!(&*scanned.text, eq("it's here"));
    }

    #[test]
    fn it_should_not_stop_at_escaped_delimiter() {
        let scanned = scan("hello\\ world next", &[' ']);

        // The escape marker is kept verbatim.
        assert_that!(&*scanned.text, eq("hello\\ world"));
        assert_that!(scanned.consumed(), eq(12));
    }

    #[test]
    fn it_should_not_toggle_on_escaped_quote() {
        let scanned = scan("it\\'s fine", &[' ']);

        assert_that!(&*scanned.text, eq("it\\'s"));
        assert_that!(scanned.consumed(), eq(5));
    }

    #[test]
    fn it_should_consume_unterminated_quote_to_end() {
        let scanned = scan("'never closed and more", &[' ']);

        assert_that!(&*scanned.text, eq("never closed and more"));
        assert_that!(scanned.consumed(), eq(22));
    }

    #[test]
    fn it_should_read_empty_quoted_text() {
        let scanned = scan("'' next", &[' ']);

        assert_that!(&*scanned.text, eq(""));
        assert_that!(scanned.consumed(), eq(2));
    }

    #[test]
    fn it_should_count_bytes_of_multibyte_characters() {
        let scanned = scan("'héllo' wörld", &[' ']);

        assert_that!(&*scanned.text, eq("héllo"));
        assert_that!(scanned.consumed(), eq("'héllo'".len()));
    }
}

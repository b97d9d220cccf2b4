//! A parser for resolving options and arguments from a command line.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::iter::{FusedIterator, Peekable};

use crate::lexer::{Flag, Token, Tokens};
use crate::registry::{OptionDefinition, Registry};

/// Defines the possible errors that may occur during parsing of a command line.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError<'a> {
    /// The option is not defined in the registry.
    #[error("unknown option '{name}'")]
    UnknownOption {
        /// The option name, without hyphens or quotes.
        name: Cow<'a, str>,
    },

    /// The option requires an argument but none follows it.
    #[error("option '{name}' must have an argument")]
    MissingArgument {
        /// The option name, without hyphens or quotes.
        name: Cow<'a, str>,
    },

    /// The option takes no argument and free text may only follow the last option.
    #[error("option '{name}' can't have an argument, non-option arguments must go at the end")]
    MisplacedArgument {
        /// The option name, without hyphens or quotes.
        name: Cow<'a, str>,
    },

    /// The option has already been seen and cannot be repeated.
    #[error("option '{name}' can only appear once")]
    RepeatedOption {
        /// The option name, without hyphens or quotes.
        name: Cow<'a, str>,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ParseError<'_> {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            ParseError::UnknownOption { name } => {
                defmt::write!(f, "UnknownOption {{ name: {=str} }}", name)
            }
            ParseError::MissingArgument { name } => {
                defmt::write!(f, "MissingArgument {{ name: {=str} }}", name)
            }
            ParseError::MisplacedArgument { name } => {
                defmt::write!(f, "MisplacedArgument {{ name: {=str} }}", name)
            }
            ParseError::RepeatedOption { name } => {
                defmt::write!(f, "RepeatedOption {{ name: {=str} }}", name)
            }
        }
    }
}

/// Defines the parser configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// If true, free text may follow an option without argument anywhere on the line
    /// (e.g. `--flag 'text' --other`). Otherwise it may only follow the last option.
    pub allow_argument_between_options: bool,
}

impl Config {
    /// Create the default configuration.
    pub const fn new() -> Self {
        Config {
            allow_argument_between_options: true,
        }
    }

    /// Set whether free text may follow options that are not the last one.
    pub const fn allow_argument_between_options(mut self, allow: bool) -> Self {
        self.allow_argument_between_options = allow;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Defines a resolved value, the unit of parser output.
///
/// - an option with no argument is a flag that was present,
/// - an option with an argument is a bound option,
/// - no option is a positional value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedValue<'a> {
    /// The matched definition, if any.
    pub option: Option<&'a OptionDefinition<'a>>,

    /// The argument text, with quote characters removed.
    pub argument: Option<Cow<'a, str>>,
}

impl<'a> ResolvedValue<'a> {
    /// Create a positional value.
    #[inline(always)]
    pub fn positional(text: Cow<'a, str>) -> Self {
        ResolvedValue {
            option: None,
            argument: Some(text),
        }
    }

    /// Create an option value.
    #[inline(always)]
    pub fn option(option: &'a OptionDefinition<'a>, argument: Option<Cow<'a, str>>) -> Self {
        ResolvedValue {
            option: Some(option),
            argument,
        }
    }

    /// Evaluate if the value is not attached to any option.
    #[inline(always)]
    pub fn is_positional(&self) -> bool {
        self.option.is_none()
    }

    /// Retrieve the canonical name of the matched option, if any.
    #[inline(always)]
    pub fn canonical_name(&self) -> Option<&'a str> {
        self.option.map(OptionDefinition::canonical_name)
    }

    /// Retrieve the argument text, if any.
    #[inline(always)]
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }
}

/// Defines a parser, i.e. a registry of option definitions and a configuration.
#[derive(Clone, Copy, Debug)]
pub struct Parser<'a, const SIZE: usize> {
    registry: &'a Registry<'a, SIZE>,
    config: Config,
}

impl<'a, const SIZE: usize> Parser<'a, SIZE> {
    /// Create a parser with the default configuration.
    pub fn new(registry: &'a Registry<'a, SIZE>) -> Self {
        Self::with_config(registry, Config::default())
    }

    /// Create a parser with an explicit configuration.
    pub fn with_config(registry: &'a Registry<'a, SIZE>, config: Config) -> Self {
        Parser { registry, config }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'a Registry<'a, SIZE> {
        self.registry
    }

    #[inline(always)]
    pub fn config(&self) -> Config {
        self.config
    }

    /// Lazily resolve the values of a command line. The iterator stops after the first error.
    pub fn resolve<'l>(&self, line: &'l str) -> Resolve<'l, SIZE>
    where
        'a: 'l,
    {
        Resolve::new(self.registry, self.config, line)
    }

    /// Resolve all the values of a command line, in order. Nothing is returned on error.
    pub fn resolve_all<'l>(&self, line: &'l str) -> Result<Vec<ResolvedValue<'l>>, ParseError<'l>>
    where
        'a: 'l,
    {
        self.resolve(line).collect()
    }
}

/// An iterator over the resolved values of a command line.
#[derive(Debug)]
pub struct Resolve<'a, const SIZE: usize> {
    registry: &'a Registry<'a, SIZE>,
    config: Config,
    tokens: Peekable<Tokens<'a>>,

    /// Positions of the definitions already seen, never larger than the registry.
    appearances: heapless::Vec<usize, SIZE>,

    /// Option tokens not yet walked, zero once the last one has been reached.
    options_left: usize,

    /// Free text split from an option that takes no argument, emitted next.
    pending: Option<Cow<'a, str>>,

    done: bool,
}

impl<'a, const SIZE: usize> Resolve<'a, SIZE> {
    fn new(registry: &'a Registry<'a, SIZE>, config: Config, line: &'a str) -> Self {
        Resolve {
            registry,
            config,
            tokens: Tokens::new(line).peekable(),
            appearances: heapless::Vec::new(),
            options_left: Tokens::new(line).filter(Token::is_option).count(),
            pending: None,
            done: false,
        }
    }

    fn resolve_option(&mut self, flag: Flag<'a>) -> Result<ResolvedValue<'a>, ParseError<'a>> {
        self.options_left = self.options_left.saturating_sub(1);

        let Some((index, option)) = self.registry.lookup(&flag) else {
            return Err(ParseError::UnknownOption { name: flag.name });
        };

        let argument = self
            .tokens
            .next_if(Token::is_argument)
            .and_then(Token::into_argument);

        let seen = self.appearances.contains(&index);
        if seen && !option.is_repeatable() {
            return Err(ParseError::RepeatedOption { name: flag.name });
        }

        match (option.has_argument(), argument) {
            (true, None) => Err(ParseError::MissingArgument { name: flag.name }),

            (false, Some(text)) => {
                if self.options_left > 0 && !self.config.allow_argument_between_options {
                    return Err(ParseError::MisplacedArgument { name: flag.name });
                }

                trace!("split argument from option `{=str}`", option.canonical_name());

                // A split option is not recorded as an appearance.
                self.pending = Some(text);
                Ok(ResolvedValue::option(option, None))
            }

            (_, argument) => {
                if !seen {
                    // Indices are distinct and bounded by the registry length, so this cannot
                    // overflow.
                    let _ = self.appearances.push(index);
                }

                trace!("resolved option `{=str}`", option.canonical_name());

                Ok(ResolvedValue::option(option, argument))
            }
        }
    }
}

impl<'a, const SIZE: usize> Iterator for Resolve<'a, SIZE> {
    type Item = Result<ResolvedValue<'a>, ParseError<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(text) = self.pending.take() {
            return Some(Ok(ResolvedValue::positional(text)));
        }

        let result = match self.tokens.next()? {
            Token::Argument(text) => Ok(ResolvedValue::positional(text)),
            Token::Option(flag) => self.resolve_option(flag),
        };

        if result.is_err() {
            self.done = true;
        }

        Some(result)
    }
}

impl<const SIZE: usize> FusedIterator for Resolve<'_, SIZE> {}

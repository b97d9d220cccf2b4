//! optline, a `no_std` command line parser and binder.
#![no_std]
#![deny(missing_docs)]

extern crate alloc;

pub mod argv;
pub mod bind;
pub mod usage;

pub use optline_parser as parser;

pub use argv::join;
pub use bind::{BindError, Binder, Binding, Positional, Positionals};
pub use parser::{
    Config, DefinitionError, OptionDefinition, ParseError, Parser, Registry, ResolvedValue,
};
pub use usage::{Usage, write_usage};

/// Defines the possible errors that may occur during usage of the crate.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error<'a> {
    /// An error comes from the definition of options.
    #[error(transparent)]
    Definition(DefinitionError<'a>),

    /// An error comes from the parsing of the command line.
    #[error(transparent)]
    Parse(ParseError<'a>),

    /// An error comes from the binding of values.
    #[error(transparent)]
    Bind(BindError<'a>),
}

impl<'a> From<DefinitionError<'a>> for Error<'a> {
    fn from(err: DefinitionError<'a>) -> Self {
        Error::Definition(err)
    }
}

impl<'a> From<ParseError<'a>> for Error<'a> {
    fn from(err: ParseError<'a>) -> Self {
        Error::Parse(err)
    }
}

impl<'a> From<BindError<'a>> for Error<'a> {
    fn from(err: BindError<'a>) -> Self {
        Error::Bind(err)
    }
}

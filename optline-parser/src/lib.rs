//! optline-parser, a `no_std` command line tokenizer and option parser.
#![no_std]

extern crate alloc;

#[macro_use]
mod fmt;

mod lexer;
pub mod parser;
pub mod registry;
mod scanner;

pub use parser::{Config, ParseError, Parser, Resolve, ResolvedValue};
pub use registry::{DefinitionError, OptionDefinition, Registry};

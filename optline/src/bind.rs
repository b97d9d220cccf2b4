//! Binding of resolved values onto the fields of a user defined type.
//!
//! Bindings are declared explicitly, as a table of canonical option names and field setters:
//!
//! ```
//! use optline::{Binder, Binding, OptionDefinition, Positional, Registry};
//!
//! #[derive(Default)]
//! struct Args {
//!     help: bool,
//!     extract: Option<String>,
//! }
//!
//! let registry: Registry<'_> = Registry::new([
//!     OptionDefinition::new("h", "help").with_long("help"),
//!     OptionDefinition::new("e", "extract").requires_argument(true),
//! ])
//! .unwrap();
//!
//! let bindings = [
//!     Binding::flag("help", |args: &mut Args, value| args.help = value),
//!     Binding::value("extract", |args: &mut Args, value| {
//!         args.extract = value.map(String::from)
//!     }),
//! ];
//! let positionals = [Positional::optional("file")];
//!
//! let binder = Binder::new(&registry, &bindings, &positionals).unwrap();
//!
//! let mut args = Args::default();
//! let rest = binder.parse("--help -e 'a file.txt' other", &mut args).unwrap();
//!
//! assert!(args.help);
//! assert_eq!(args.extract.as_deref(), Some("a file.txt"));
//! assert_eq!(rest.get("file"), Some("other"));
//! ```

use alloc::borrow::Cow;
use alloc::vec::Vec;

use optline_parser::{Config, Parser, Registry, ResolvedValue};

use crate::Error;

/// Defines the possible errors that may occur while binding values.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum BindError<'a> {
    /// A value binding refers to an option that takes no argument.
    #[error("option '{name}' takes no argument and cannot be bound to a value")]
    IncompatibleField {
        /// Canonical name of the option.
        name: &'a str,
    },

    /// A binding refers to no defined option.
    #[error("no option is named '{name}'")]
    UnknownField {
        /// Canonical name of the binding.
        name: &'a str,
    },

    /// More positional values than declared.
    #[error("too many arguments, expected at most {expected} but found {found}")]
    TooManyPositionals {
        /// Number of declared positional arguments.
        expected: usize,
        /// Number of positional values on the command line.
        found: usize,
    },

    /// A required positional argument has no value.
    #[error("missing argument '{name}'")]
    MissingPositional {
        /// Name of the positional declaration.
        name: &'a str,
    },

    /// Two positional declarations share a name.
    #[error("duplicate argument name '{name}'")]
    DuplicatePositional {
        /// Name of the positional declaration.
        name: &'a str,
    },
}

/// Defines how a field is set from the values of its option.
pub enum Setter<T> {
    /// Set to true if and only if the option appears on the command line.
    Flag(fn(&mut T, bool)),

    /// Set to the argument of the option, or `None` if it does not appear. When the option is
    /// repeated, the last argument wins.
    Value(fn(&mut T, Option<&str>)),
}

/// Defines an entry of a binding table, i.e. a canonical option name and a field setter.
pub struct Binding<'a, T> {
    canonical_name: &'a str,
    setter: Setter<T>,
}

impl<'a, T> Binding<'a, T> {
    /// Bind the presence of an option.
    pub const fn flag(canonical_name: &'a str, set: fn(&mut T, bool)) -> Self {
        Binding {
            canonical_name,
            setter: Setter::Flag(set),
        }
    }

    /// Bind the argument of an option.
    pub const fn value(canonical_name: &'a str, set: fn(&mut T, Option<&str>)) -> Self {
        Binding {
            canonical_name,
            setter: Setter::Value(set),
        }
    }

    /// Canonical name of the bound option.
    #[inline(always)]
    pub fn canonical_name(&self) -> &'a str {
        self.canonical_name
    }
}

/// Defines a named positional argument, bound by order of appearance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Positional<'a> {
    name: &'a str,
    optional: bool,
}

impl<'a> Positional<'a> {
    /// Declare a positional argument that must have a value.
    pub const fn required(name: &'a str) -> Self {
        Positional {
            name,
            optional: false,
        }
    }

    /// Declare a positional argument that may be left without value.
    pub const fn optional(name: &'a str) -> Self {
        Positional {
            name,
            optional: true,
        }
    }

    /// Name of the positional argument.
    #[inline(always)]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Whether the positional argument may be left without value.
    #[inline(always)]
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Defines the positional values bound by name, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Positionals<'a> {
    values: Vec<(&'a str, Cow<'a, str>)>,
}

impl<'a> Positionals<'a> {
    /// Get the value of a positional argument, if it has one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(x, _)| *x == name)
            .map(|(_, value)| &**value)
    }

    /// Iterate over the bound names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &str)> {
        self.values.iter().map(|(name, value)| (*name, &**value))
    }

    /// Number of bound positional arguments.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no positional argument has been bound.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Defines a binder, i.e. a parser together with a binding table and positional declarations.
pub struct Binder<'a, T, const SIZE: usize> {
    parser: Parser<'a, SIZE>,
    bindings: &'a [Binding<'a, T>],
    positionals: &'a [Positional<'a>],
}

impl<'a, T, const SIZE: usize> Binder<'a, T, SIZE> {
    /// Create a binder and check its table against the registry.
    pub fn new(
        registry: &'a Registry<'a, SIZE>,
        bindings: &'a [Binding<'a, T>],
        positionals: &'a [Positional<'a>],
    ) -> Result<Self, BindError<'a>> {
        for binding in bindings {
            let name = binding.canonical_name;

            let option = registry
                .find_canonical(name)
                .ok_or(BindError::UnknownField { name })?;

            if matches!(binding.setter, Setter::Value(_)) && !option.has_argument() {
                return Err(BindError::IncompatibleField { name });
            }
        }

        for (i, positional) in positionals.iter().enumerate() {
            if positionals[..i].iter().any(|x| x.name == positional.name) {
                return Err(BindError::DuplicatePositional {
                    name: positional.name,
                });
            }
        }

        Ok(Binder {
            parser: Parser::new(registry),
            bindings,
            positionals,
        })
    }

    /// Use an explicit parser configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.parser = Parser::with_config(self.parser.registry(), config);
        self
    }

    /// Parse a command line and bind its values onto the target.
    pub fn parse<'l>(&self, line: &'l str, target: &mut T) -> Result<Positionals<'l>, Error<'l>>
    where
        'a: 'l,
    {
        let values = self.parser.resolve_all(line)?;
        Ok(self.bind(&values, target)?)
    }

    /// Bind resolved values onto the target. Every binding sets its field, even when its option
    /// does not appear.
    pub fn bind<'l>(
        &self,
        values: &[ResolvedValue<'l>],
        target: &mut T,
    ) -> Result<Positionals<'l>, BindError<'l>>
    where
        'a: 'l,
    {
        for binding in self.bindings {
            let mut found = values
                .iter()
                .filter(|x| x.canonical_name() == Some(binding.canonical_name));

            match binding.setter {
                Setter::Flag(set) => set(target, found.next().is_some()),
                Setter::Value(set) => set(target, found.filter_map(ResolvedValue::argument).last()),
            }
        }

        let mut free = values
            .iter()
            .filter(|x| x.is_positional())
            .filter_map(|x| x.argument.clone());

        let mut out = Positionals::default();

        for positional in self.positionals {
            match free.next() {
                Some(value) => out.values.push((positional.name, value)),
                None if positional.optional => {}
                None => {
                    return Err(BindError::MissingPositional {
                        name: positional.name,
                    });
                }
            }
        }

        let excess = free.count();
        if excess > 0 {
            return Err(BindError::TooManyPositionals {
                expected: self.positionals.len(),
                found: self.positionals.len() + excess,
            });
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use googletest::prelude::*;
    use optline_parser::{OptionDefinition, ParseError};

    use super::*;

    #[derive(Debug, Default)]
    struct MyArgs {
        show_help: bool,
        extract_file: Option<String>,
    }

    fn registry() -> Registry<'static> {
        Registry::new([
            OptionDefinition::new("h", "help")
                .with_long("help")
                .with_usage("Shows help")
                .allows_repeats(false),
            OptionDefinition::new("e", "extract")
                .with_long("extract")
                .with_usage("Extracts a file")
                .requires_argument(true),
        ])
        .unwrap()
    }

    fn bindings() -> [Binding<'static, MyArgs>; 2] {
        [
            Binding::flag("help", |args: &mut MyArgs, value| args.show_help = value),
            Binding::value("extract", |args: &mut MyArgs, value| {
                args.extract_file = value.map(String::from)
            }),
        ]
    }

    #[test]
    fn it_should_bind_flag_and_value() {
        let registry = registry();
        let bindings = bindings();
        let binder = Binder::new(&registry, &bindings, &[]).unwrap();

        let mut args = MyArgs::default();
        let res = binder.parse("--extract 'hola' --help", &mut args);

        assert_that!(res.is_ok(), eq(true));
        assert_that!(args.show_help, eq(true));
        assert_that!(args.extract_file.as_deref(), eq(Some("hola")));
    }

    #[test]
    fn it_should_reset_absent_fields() {
        let registry = registry();
        let bindings = bindings();
        let binder = Binder::new(&registry, &bindings, &[]).unwrap();

        let mut args = MyArgs {
            show_help: true,
            extract_file: Some(String::from("stale")),
        };
        let res = binder.parse("", &mut args);

        assert_that!(res.is_ok(), eq(true));
        assert_that!(args.show_help, eq(false));
        assert_that!(args.extract_file, eq(&None));
    }

    #[test]
    fn it_should_keep_last_value_of_repeated_option() {
        let registry = registry();
        let bindings = bindings();
        let binder = Binder::new(&registry, &bindings, &[]).unwrap();

        let mut args = MyArgs::default();
        binder.parse("-e first -e second", &mut args).unwrap();

        assert_that!(args.extract_file.as_deref(), eq(Some("second")));
    }

    #[test]
    fn it_should_bind_positionals_in_order() {
        let registry = registry();
        let bindings = bindings();
        let positionals = [Positional::required("file1"), Positional::optional("file2")];
        let binder = Binder::new(&registry, &bindings, &positionals).unwrap();

        let mut args = MyArgs::default();
        let rest = binder.parse("-h argumento 'lol xd'", &mut args).unwrap();

        assert_that!(args.show_help, eq(true));
        assert_that!(rest.len(), eq(2));
        assert_that!(rest.get("file1"), eq(Some("argumento")));
        assert_that!(rest.get("file2"), eq(Some("lol xd")));
    }

    #[test]
    fn it_should_leave_optional_positional_unset() {
        let registry = registry();
        let bindings = bindings();
        let positionals = [Positional::required("file1"), Positional::optional("file2")];
        let binder = Binder::new(&registry, &bindings, &positionals).unwrap();

        let mut args = MyArgs::default();
        let rest = binder.parse("only", &mut args).unwrap();

        assert_that!(rest.get("file1"), eq(Some("only")));
        assert_that!(rest.get("file2"), eq(None));
    }

    #[test]
    fn it_should_fail_on_missing_positional() {
        let registry = registry();
        let bindings = bindings();
        let positionals = [Positional::required("file1"), Positional::optional("file2")];
        let binder = Binder::new(&registry, &bindings, &positionals).unwrap();

        let mut args = MyArgs::default();

        assert_that!(
            binder.parse("-h", &mut args),
            eq(&Err(Error::Bind(BindError::MissingPositional { name: "file1" })))
        );
    }

    #[test]
    fn it_should_fail_on_too_many_positionals() {
        let registry = registry();
        let bindings = bindings();
        let positionals = [Positional::optional("file")];
        let binder = Binder::new(&registry, &bindings, &positionals).unwrap();

        let mut args = MyArgs::default();

        assert_that!(
            binder.parse("one two three", &mut args),
            eq(&Err(Error::Bind(BindError::TooManyPositionals {
                expected: 1,
                found: 3
            })))
        );
    }

    #[test]
    fn it_should_forward_parse_errors() {
        let registry = registry();
        let bindings = bindings();
        let binder = Binder::new(&registry, &bindings, &[]).unwrap();

        let mut args = MyArgs::default();

        assert_that!(
            binder.parse("-h -h", &mut args),
            eq(&Err(Error::Parse(ParseError::RepeatedOption { name: "h".into() })))
        );
    }

    #[test]
    fn it_should_forward_parser_config() {
        let registry = registry();
        let bindings = bindings();
        let positionals = [Positional::optional("file")];
        let binder = Binder::new(&registry, &bindings, &positionals)
            .unwrap()
            .with_config(Config::new().allow_argument_between_options(false));

        let mut args = MyArgs::default();

        assert_that!(
            binder.parse("-h file -e x", &mut args),
            eq(&Err(Error::Parse(ParseError::MisplacedArgument { name: "h".into() })))
        );
    }

    #[test]
    fn it_should_reject_value_bound_to_flag() {
        let registry = registry();
        let bindings = [Binding::value("help", |args: &mut MyArgs, value| {
            args.extract_file = value.map(String::from)
        })];

        assert_that!(
            Binder::new(&registry, &bindings, &[]).err(),
            eq(&Some(BindError::IncompatibleField { name: "help" }))
        );
    }

    #[test]
    fn it_should_accept_flag_bound_to_option_with_argument() {
        let registry = registry();
        let bindings = [Binding::flag("extract", |args: &mut MyArgs, value| {
            args.show_help = value
        })];
        let binder = Binder::new(&registry, &bindings, &[]).unwrap();

        let mut args = MyArgs::default();
        binder.parse("-e file.txt", &mut args).unwrap();

        assert_that!(args.show_help, eq(true));
    }

    #[test]
    fn it_should_reject_unknown_field() {
        let registry = registry();
        let bindings = [Binding::flag("verbose", |args: &mut MyArgs, value| {
            args.show_help = value
        })];

        assert_that!(
            Binder::new(&registry, &bindings, &[]).err(),
            eq(&Some(BindError::UnknownField { name: "verbose" }))
        );
    }

    #[test]
    fn it_should_reject_duplicate_positional() {
        let registry = registry();
        let positionals = [Positional::required("file"), Positional::optional("file")];

        assert_that!(
            Binder::<MyArgs, 16>::new(&registry, &[], &positionals).err(),
            eq(&Some(BindError::DuplicatePositional { name: "file" }))
        );
    }
}

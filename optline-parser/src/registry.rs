//! Option definitions and the registry validating them.

use heapless::Vec;

use crate::lexer::Flag;

/// Defines the possible errors that may occur while building a registry.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum DefinitionError<'a> {
    /// A definition has an empty or blank short name.
    #[error("short name must not be empty")]
    EmptyShortName,

    /// A definition has an empty or blank canonical name.
    #[error("canonical name must not be empty")]
    EmptyCanonicalName,

    /// Two definitions share a short name, ignoring case.
    #[error("duplicate short option '{name}'")]
    DuplicateShortName {
        /// The offending short name.
        name: &'a str,
    },

    /// Two definitions share a long name, ignoring case.
    #[error("duplicate long option '{name}'")]
    DuplicateLongName {
        /// The offending long name.
        name: &'a str,
    },

    /// Two definitions share a canonical name, ignoring case.
    #[error("duplicate option name '{name}'")]
    DuplicateCanonicalName {
        /// The offending canonical name.
        name: &'a str,
    },

    /// Insufficient space for storing definitions.
    #[error("out of registry memory space")]
    OutOfMemory,
}

/// Defines a recognized option and the rules it is parsed with.
///
/// A definition is an immutable value. It is built with [`OptionDefinition::new`] and refined
/// with the `with_*` methods, usually in a `const` context:
///
/// ```
/// use optline_parser::OptionDefinition;
///
/// const EXTRACT: OptionDefinition<'static> = OptionDefinition::new("e", "extract")
///     .with_long("extract")
///     .with_usage("Extracts a file")
///     .requires_argument(true);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OptionDefinition<'a> {
    short_name: &'a str,
    long_name: Option<&'a str>,
    canonical_name: &'a str,
    usage: Option<&'a str>,
    argument_name: Option<&'a str>,
    requires_argument: bool,
    allows_repeats: bool,
}

impl<'a> OptionDefinition<'a> {
    /// Create a definition without argument, that may be repeated.
    pub const fn new(short_name: &'a str, canonical_name: &'a str) -> Self {
        OptionDefinition {
            short_name,
            long_name: None,
            canonical_name,
            usage: None,
            argument_name: None,
            requires_argument: false,
            allows_repeats: true,
        }
    }

    /// Set the long name, matched by `--name`.
    pub const fn with_long(mut self, long_name: &'a str) -> Self {
        self.long_name = Some(long_name);
        self
    }

    /// Set the usage text shown in help listings.
    pub const fn with_usage(mut self, usage: &'a str) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Set the argument placeholder shown in help listings.
    pub const fn with_argument_name(mut self, argument_name: &'a str) -> Self {
        self.argument_name = Some(argument_name);
        self
    }

    /// Set whether the option must be followed by an argument.
    pub const fn requires_argument(mut self, requires_argument: bool) -> Self {
        self.requires_argument = requires_argument;
        self
    }

    /// Set whether the option may appear more than once.
    pub const fn allows_repeats(mut self, allows_repeats: bool) -> Self {
        self.allows_repeats = allows_repeats;
        self
    }

    /// Short name, without the hyphen.
    #[inline(always)]
    pub fn short_name(&self) -> &'a str {
        self.short_name
    }

    /// Long name, without the hyphens.
    #[inline(always)]
    pub fn long_name(&self) -> Option<&'a str> {
        self.long_name
    }

    /// Name used to refer to the option once parsed.
    #[inline(always)]
    pub fn canonical_name(&self) -> &'a str {
        self.canonical_name
    }

    #[inline(always)]
    pub fn usage(&self) -> Option<&'a str> {
        self.usage
    }

    #[inline(always)]
    pub fn argument_name(&self) -> Option<&'a str> {
        self.argument_name
    }

    #[inline(always)]
    pub fn has_argument(&self) -> bool {
        self.requires_argument
    }

    #[inline(always)]
    pub fn is_repeatable(&self) -> bool {
        self.allows_repeats
    }

    fn validate(&self) -> Result<(), DefinitionError<'a>> {
        if self.short_name.trim().is_empty() {
            return Err(DefinitionError::EmptyShortName);
        }

        if self.canonical_name.trim().is_empty() {
            return Err(DefinitionError::EmptyCanonicalName);
        }

        Ok(())
    }

    /// Check the definition against an earlier one. The error names the earlier identifier.
    fn check_collision(&self, earlier: &Self) -> Result<(), DefinitionError<'a>> {
        if eq_ignore_case(self.short_name, earlier.short_name) {
            return Err(DefinitionError::DuplicateShortName {
                name: earlier.short_name,
            });
        }

        if let (Some(name), Some(earlier)) = (self.long_name, earlier.long_name) {
            if eq_ignore_case(name, earlier) {
                return Err(DefinitionError::DuplicateLongName { name: earlier });
            }
        }

        if eq_ignore_case(self.canonical_name, earlier.canonical_name) {
            return Err(DefinitionError::DuplicateCanonicalName {
                name: earlier.canonical_name,
            });
        }

        Ok(())
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Defines the default capacity of a registry.
pub const REGISTRY_SIZE_MAX: usize = 16;

/// Defines a validated set of option definitions.
///
/// Identifiers are unique ignoring case, which is checked once at construction. A registry is
/// never mutated afterwards and can be shared by any number of parsers.
#[derive(Clone, Debug, Default)]
pub struct Registry<'a, const SIZE: usize = REGISTRY_SIZE_MAX> {
    definitions: Vec<OptionDefinition<'a>, SIZE>,
}

impl<'a, const SIZE: usize> Registry<'a, SIZE> {
    /// Build a registry from option definitions.
    pub fn new<I>(definitions: I) -> Result<Self, DefinitionError<'a>>
    where
        I: IntoIterator<Item = OptionDefinition<'a>>,
    {
        let mut out = Self::default();

        for definition in definitions {
            definition.validate()?;

            for other in &out.definitions {
                definition.check_collision(other)?;
            }

            if out.definitions.push(definition).is_err() {
                return Err(DefinitionError::OutOfMemory);
            }
        }

        debug!("registry built with {=usize} options", out.definitions.len());

        Ok(out)
    }

    /// Find a definition by exact short name.
    pub fn find_short(&self, name: &str) -> Option<&OptionDefinition<'a>> {
        self.definitions.iter().find(|x| x.short_name == name)
    }

    /// Find a definition by exact long name.
    pub fn find_long(&self, name: &str) -> Option<&OptionDefinition<'a>> {
        self.definitions
            .iter()
            .find(|x| x.long_name.is_some_and(|long| long == name))
    }

    /// Find a definition by exact canonical name.
    pub fn find_canonical(&self, name: &str) -> Option<&OptionDefinition<'a>> {
        self.definitions.iter().find(|x| x.canonical_name == name)
    }

    /// Iterate over definitions, in registration order.
    pub fn iter(&self) -> core::slice::Iter<'_, OptionDefinition<'a>> {
        self.definitions.iter()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Resolve a lexed flag to the position and definition it matches.
    pub(crate) fn lookup(&self, flag: &Flag<'_>) -> Option<(usize, &OptionDefinition<'a>)> {
        let name = &*flag.name;

        self.definitions.iter().enumerate().find(|(_, x)| {
            if flag.long {
                x.long_name == Some(name)
            } else {
                x.short_name == name
            }
        })
    }
}

impl<'r, 'a, const SIZE: usize> IntoIterator for &'r Registry<'a, SIZE> {
    type Item = &'r OptionDefinition<'a>;
    type IntoIter = core::slice::Iter<'r, OptionDefinition<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Usage text of a registry, as a two-column help listing.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display, Write};

use optline_parser::{OptionDefinition, Registry};

/// Space between the option column and the usage column.
const GAP: &str = "  ";

/// Defines a displayable help listing for all the options of a registry.
#[derive(Clone, Copy, Debug)]
pub struct Usage<'r, 'a, const SIZE: usize> {
    registry: &'r Registry<'a, SIZE>,
}

impl<'r, 'a, const SIZE: usize> Usage<'r, 'a, SIZE> {
    /// Create a help listing for the registry.
    pub fn new(registry: &'r Registry<'a, SIZE>) -> Self {
        Usage { registry }
    }
}

impl<const SIZE: usize> Display for Usage<'_, '_, SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_usage(self.registry, f)
    }
}

/// Write one line per option, in registration order.
///
/// The left column holds the short and long names and, for options requiring an argument, a
/// placeholder. It is padded to the widest entry. The right column holds the usage text.
pub fn write_usage<W, const SIZE: usize>(registry: &Registry<'_, SIZE>, out: &mut W) -> fmt::Result
where
    W: Write + ?Sized,
{
    let rows: Vec<_> = registry
        .iter()
        .map(|x| (option_column(x), x.usage()))
        .collect();

    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or_default();

    for (left, usage) in &rows {
        match usage {
            Some(usage) => writeln!(out, "{left:<width$}{GAP}{usage}")?,
            None => writeln!(out, "{left}")?,
        }
    }

    Ok(())
}

fn option_column(option: &OptionDefinition<'_>) -> String {
    let mut out = format!("-{}", option.short_name());

    if let Some(long) = option.long_name() {
        out.push_str(", --");
        out.push_str(long);
    }

    if option.has_argument() {
        match option.argument_name() {
            Some(name) => out.push_str(&format!(" <{name}>")),
            None => out.push_str(&format!(" <{}>", option.canonical_name().to_uppercase())),
        }
    }

    out
}

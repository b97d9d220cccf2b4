use core::panic;

use optline_parser::{Config, OptionDefinition, Parser, Registry};

fn main() {
    let registry: Registry<'_> = Registry::new([
        OptionDefinition::new("h", "help")
            .with_long("help")
            .allows_repeats(false),
        OptionDefinition::new("e", "extract")
            .with_long("extract")
            .requires_argument(true),
    ])
    .expect("must be valid");

    let parser = Parser::with_config(&registry, Config::new());
    let values = parser
        .resolve_all("--extract 'file name.txt' -h trailing")
        .expect("must be parsed");

    for value in &values {
        println!("{:?} {:?}", value.canonical_name(), value.argument());
    }

    if values.len() != 3 {
        panic!("invalid value count");
    }

    if values[0].argument() != Some("file name.txt") {
        panic!("invalid extract argument");
    }

    if !values[2].is_positional() {
        panic!("invalid trailing argument");
    }
}

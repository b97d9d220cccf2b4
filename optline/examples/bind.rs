use optline::{Binder, Binding, OptionDefinition, Positional, Registry, Usage};

#[derive(Debug, Default)]
struct MyArgs {
    show_help: bool,
    extract_file: Option<String>,
}

fn main() {
    let registry: Registry<'_> = Registry::new([
        OptionDefinition::new("h", "help")
            .with_long("help")
            .with_usage("Shows help")
            .allows_repeats(false),
        OptionDefinition::new("e", "extract")
            .with_long("extract")
            .with_usage("Extracts a file")
            .with_argument_name("file")
            .requires_argument(true),
    ])
    .expect("must be valid");

    let bindings = [
        Binding::flag("help", |args: &mut MyArgs, value| args.show_help = value),
        Binding::value("extract", |args: &mut MyArgs, value| {
            args.extract_file = value.map(String::from)
        }),
    ];
    let positionals = [Positional::required("file1"), Positional::optional("file2")];

    let binder = Binder::new(&registry, &bindings, &positionals).expect("must be valid");

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let line = optline::join(&argv);

    let mut args = MyArgs::default();
    match binder.parse(&line, &mut args) {
        Ok(rest) => {
            if args.show_help {
                print!("{}", Usage::new(&registry));
                return;
            }

            println!("{args:?}");
            for (name, value) in rest.iter() {
                println!("{name} = {value}");
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprint!("{}", Usage::new(&registry));
            std::process::exit(2);
        }
    }
}

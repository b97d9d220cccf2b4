//! Conversion of an argument vector to a command line.

use alloc::string::String;

/// Join argument vector elements into a single command line.
///
/// Elements are separated by a single space. An element containing a space is wrapped in double
/// quotes, so that it is read back as a single argument.
pub fn join<I, S>(argv: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();

    for arg in argv {
        let arg = arg.as_ref();

        if !line.is_empty() {
            line.push(' ');
        }

        if arg.contains(' ') {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }

    line
}

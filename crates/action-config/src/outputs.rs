//! Step outputs and workflow commands
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT`; annotations are
//! printed as `::warning::` / `::error::` workflow commands on stdout.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Set a step output for downstream steps
///
/// Outside of a runner (no `GITHUB_OUTPUT`) the value is only logged.
pub fn set_output(name: &str, value: &str) -> io::Result<()> {
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) => write_output(Path::new(&path), name, value),
        None => {
            log::info!("output {}={}", name, value);
            Ok(())
        }
    }
}

/// Append one output to an output file
pub fn write_output(path: &Path, name: &str, value: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format_output(name, value).as_bytes())
}

fn format_output(name: &str, value: &str) -> String {
    if !value.contains('\n') {
        return format!("{}={}\n", name, value);
    }

    let mut delimiter = format!("ghadelimiter_{}", name);
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

/// Emit a warning annotation on the workflow run
pub fn warning(message: &str) {
    println!("::warning::{}", escape_data(message));
}

/// Emit an error annotation on the workflow run
pub fn error(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Escape a message the way the runner expects command data
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

//! Action outputs and the `GITHUB_OUTPUT` record format.
//!
//! The runtime appends one record per output:
//!
//! ```text
//! key<<DELIMITER
//! value
//! DELIMITER
//! ```
//!
//! The delimiter is a fresh `ghadelimiter_<uuid>` token per record, so values
//! may span several lines. [`parse_output_log`] reads the records back in
//! order and the last record for a key wins.

mod error;

use std::collections::BTreeMap;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use uuid::Uuid;

use crate::inputs::InputSource;

pub use error::OutputError;

/// Environment variable naming the output log.
pub const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

const DELIMITER_PREFIX: &str = "ghadelimiter_";

/// Named string outputs reported back to the runtime.
pub type Outputs = BTreeMap<String, String>;

/// Generates a record delimiter.
#[must_use]
pub fn new_delimiter() -> String {
    format!("{DELIMITER_PREFIX}{}", Uuid::new_v4())
}

/// Renders one record for `key` and `value`.
///
/// # Errors
///
/// Returns [`OutputError::DelimiterCollision`] when `delimiter` occurs in
/// either the key or the value.
pub fn format_output_record(
    key: &str,
    value: &str,
    delimiter: &str,
) -> Result<String, OutputError> {
    if key.contains(delimiter) || value.contains(delimiter) {
        return Err(OutputError::DelimiterCollision {
            key: key.to_owned(),
            delimiter: delimiter.to_owned(),
        });
    }
    Ok(format!("{key}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Parses every record in `contents`.
///
/// A key runs from the end of the previous record up to the first `<<` that
/// opens a closed record, so keys may span several lines. Trailing text that
/// never closes a record is ignored.
#[must_use]
pub fn parse_output_log(contents: &str) -> Outputs {
    let mut outputs = Outputs::new();
    let mut rest = contents;
    while let Some((key, value, remainder)) = next_record(rest) {
        outputs.insert(key.to_owned(), value.to_owned());
        rest = remainder;
    }
    outputs
}

/// Finds the first closed record in `text`, trying each `<<` in turn.
fn next_record(text: &str) -> Option<(&str, &str, &str)> {
    let mut search_from = 1;
    loop {
        let offset = text.get(search_from..)?.find("<<")?;
        let opener = search_from + offset;
        let key = text.get(..opener)?;
        let after_opener = text.get(opener + 2..)?;
        if let Some((value, remainder)) = parse_body(after_opener) {
            return Some((key, value, remainder));
        }
        search_from = opener + 1;
    }
}

/// Matches `DELIMITER\n` followed by the value terminated by
/// `\nDELIMITER\n`.
fn parse_body(text: &str) -> Option<(&str, &str)> {
    let (delimiter, body) = text.split_once('\n')?;
    if delimiter.is_empty() || delimiter.chars().any(char::is_whitespace) {
        return None;
    }
    let terminator = format!("\n{delimiter}\n");
    let end = body.find(&terminator)?;
    let value = body.get(..end)?;
    let remainder = body.get(end + terminator.len()..)?;
    Some((value, remainder))
}

/// Resolves the output log path from an explicit argument or
/// `GITHUB_OUTPUT`.
///
/// # Errors
///
/// Returns [`OutputError::MissingLocation`] when neither is available.
pub fn output_path(
    explicit: Option<&Utf8Path>,
    source: &(impl InputSource + ?Sized),
) -> Result<Utf8PathBuf, OutputError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    source
        .var(OUTPUT_FILE_VAR)
        .filter(|value| !value.trim().is_empty())
        .map(Utf8PathBuf::from)
        .ok_or(OutputError::MissingLocation)
}

/// Reads the output log back into a mapping.
///
/// A missing or empty file yields an empty mapping.
///
/// # Errors
///
/// Returns [`OutputError::MissingLocation`] when no path is resolvable and
/// [`OutputError::Io`] when the file exists but cannot be read.
pub fn parse_outputs(
    explicit: Option<&Utf8Path>,
    source: &(impl InputSource + ?Sized),
) -> Result<Outputs, OutputError> {
    let path = output_path(explicit, source)?;
    let (dir, file_name) = open_parent(&path)?;
    match dir.read_to_string(file_name) {
        Ok(contents) => Ok(parse_output_log(&contents)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Outputs::new()),
        Err(error) => Err(io_error(&path, error)),
    }
}

/// Appends one record to the log at `path`, creating the file if needed.
///
/// # Errors
///
/// Returns [`OutputError::DelimiterCollision`] for unsafe content and
/// [`OutputError::Io`] when the file cannot be written.
pub fn append_output(path: &Utf8Path, key: &str, value: &str) -> Result<(), OutputError> {
    let record = format_output_record(key, value, &new_delimiter())?;
    let (dir, file_name) = open_parent(path)?;
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    let mut file = dir
        .open_with(file_name, &options)
        .map_err(|error| io_error(path, error))?;
    file.write_all(record.as_bytes())
        .map_err(|error| io_error(path, error))?;
    tracing::debug!(key, path = %path, "recorded action output");
    Ok(())
}

fn open_parent(path: &Utf8Path) -> Result<(Dir, &str), OutputError> {
    let file_name = path.file_name().ok_or_else(|| {
        io_error(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir =
        Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| io_error(path, error))?;
    Ok((dir, file_name))
}

fn io_error(path: &Utf8Path, source: io::Error) -> OutputError {
    OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

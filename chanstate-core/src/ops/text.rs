//! String and whole-file helpers.
//!
//! File access here is synchronous and runs on the caller's thread. Called
//! from a processing graph it can stall the audio thread for as long as the
//! disk takes; hosts that need hard real-time behaviour should run these
//! from a background task instead.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use chanstate_types::StateError;

/// Remove up to `max_count` non-overlapping occurrences of `needle`, scanning
/// left to right. `None` removes all of them.
///
/// Returns the remaining text and how many occurrences were removed.
pub fn remove_occurrences(input: &str, needle: &str, max_count: Option<usize>) -> (String, usize) {
    if needle.is_empty() {
        return (input.to_string(), 0);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut removed = 0;
    while max_count.map_or(true, |max| removed < max) {
        match rest.find(needle) {
            Some(pos) => {
                out.push_str(&rest[..pos]);
                rest = &rest[pos + needle.len()..];
                removed += 1;
            }
            None => break,
        }
    }
    out.push_str(rest);
    (out, removed)
}

/// Split on every occurrence of `delimiter`.
///
/// Empty segments are kept except a trailing one: `"a,b,"` gives `["a", "b"]`
/// and `""` gives nothing at all. An empty delimiter never splits.
pub fn split_to_array(input: &str, delimiter: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }
    if delimiter.is_empty() {
        return vec![input.to_string()];
    }

    let mut tokens: Vec<String> = input.split(delimiter).map(str::to_string).collect();
    if tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Write `text` verbatim to `path`, truncating unless `append` is set.
pub fn write_file(text: &str, path: &Path, append: bool) -> Result<(), StateError> {
    write_text(text, path, append).inspect_err(|e| {
        log::warn!(target: "text", "could not write file: {}", e);
    })
}

/// Whole file contents, one `\n` after every line.
pub fn read_file(path: &Path) -> Result<String, StateError> {
    read_text(path).inspect_err(|e| {
        log::warn!(target: "text", "could not read file: {}", e);
    })
}

pub(crate) fn write_text(text: &str, path: &Path, append: bool) -> Result<(), StateError> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    let mut file = options.open(path).map_err(|e| StateError::file(path, &e))?;
    file.write_all(text.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| StateError::file(path, &e))
}

pub(crate) fn read_text(path: &Path) -> Result<String, StateError> {
    let file = std::fs::File::open(path).map_err(|e| StateError::file(path, &e))?;
    let mut lines = String::new();
    for line in BufReader::new(file).split(b'\n') {
        let line = line.map_err(|e| StateError::file(path, &e))?;
        lines.push_str(&String::from_utf8_lossy(&line));
        lines.push('\n');
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanstate_types::ErrorKind;

    #[test]
    fn bounded_removal() {
        assert_eq!(remove_occurrences("aaa", "a", Some(2)), ("a".to_string(), 2));
        assert_eq!(remove_occurrences("aaa", "a", None), (String::new(), 3));
        assert_eq!(remove_occurrences("aaa", "a", Some(0)), ("aaa".to_string(), 0));
    }

    #[test]
    fn removal_does_not_rescan_joined_text() {
        // Removing "ab" from "aabb" joins a new "ab" that starts before the cursor
        assert_eq!(remove_occurrences("aabb", "ab", None), ("ab".to_string(), 1));
    }

    #[test]
    fn removal_edge_cases() {
        assert_eq!(remove_occurrences("abc", "", None), ("abc".to_string(), 0));
        assert_eq!(remove_occurrences("abc", "x", None), ("abc".to_string(), 0));
        assert_eq!(
            remove_occurrences("a--b--c", "--", Some(5)),
            ("abc".to_string(), 2)
        );
    }

    #[test]
    fn split_drops_trailing_empty_segment() {
        assert_eq!(split_to_array("a,b,", ","), vec!["a", "b"]);
        assert_eq!(split_to_array("a,b", ","), vec!["a", "b"]);
    }

    #[test]
    fn split_keeps_leading_and_interior_empties() {
        assert_eq!(split_to_array(",a,,b", ","), vec!["", "a", "", "b"]);
        assert_eq!(split_to_array(",", ","), vec![""]);
    }

    #[test]
    fn split_without_delimiter_is_whole_input() {
        assert_eq!(split_to_array("abc", ","), vec!["abc"]);
        assert_eq!(split_to_array("abc", ""), vec!["abc"]);
        assert!(split_to_array("", ",").is_empty());
        assert_eq!(split_to_array("a::b", "::"), vec!["a", "b"]);
    }

    #[test]
    fn write_truncates_or_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_file("first", &path, false).unwrap();
        write_file("second", &path, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");

        write_file(" more", &path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second more");
    }

    #[test]
    fn read_adds_newline_after_every_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "one\ntwo").unwrap();
        assert_eq!(read_file(&path).unwrap(), "one\ntwo\n");

        std::fs::write(&path, "one\r\n\ntwo\n").unwrap();
        assert_eq!(read_file(&path).unwrap(), "one\r\n\ntwo\n");

        std::fs::write(&path, "").unwrap();
        assert_eq!(read_file(&path).unwrap(), "");
    }

    #[test]
    fn missing_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope").join("file.txt");
        assert_eq!(read_file(&missing).unwrap_err().kind, ErrorKind::FileUnavailable);
        assert_eq!(
            write_file("x", &missing, false).unwrap_err().kind,
            ErrorKind::FileUnavailable
        );
    }
}

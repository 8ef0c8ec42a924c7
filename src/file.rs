//! The `file()` I/O boundary: read a whole file into a growable string, or
//! write/append one back out.
//!
//! The allocator contract the string grows through is what matters here, not
//! the I/O semantics themselves, so this module is a thin wrapper over
//! `std::fs` rather than a hand-rolled platform layer.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;

use crate::string::GpcString;

/// Which direction data flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Slurp the whole file into the string, replacing its contents.
    Read,
    /// Write the string's contents to the file, truncating any existing
    /// content.
    Write,
    /// Append the string's contents to the end of the file.
    Append,
}

/// `Binary` is the default; `Text` is the explicit modifier. Rust's
/// `std::fs` does not perform newline translation, so this only documents
/// intent — both variants currently behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    #[default]
    Binary,
    Text,
}

/// Performs `mode` against `path`, using `string` as the in-memory side of
/// the transfer. Returns `0` on success, `-1` on I/O error, `+1` if the
/// file's size exceeds what this platform's `usize` can address.
pub fn gpc_file(string: &mut GpcString<'_>, path: &Path, mode: Mode, text_mode: TextMode) -> i32 {
    match mode {
        Mode::Read => read_into(string, path, text_mode),
        Mode::Write => write_from(string, path, false),
        Mode::Append => write_from(string, path, true),
    }
}

fn read_into(string: &mut GpcString<'_>, path: &Path, _text_mode: TextMode) -> i32 {
    let mut file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return -1,
    };
    let size = match file.metadata() {
        Ok(meta) => meta.len(),
        Err(_) => return -1,
    };
    if size > usize::MAX as u64 {
        return 1;
    }
    let mut buf = Vec::with_capacity(size as usize);
    if file.read_to_end(&mut buf).is_err() {
        return -1;
    }
    string.copy_from(&buf);
    0
}

fn write_from(string: &GpcString<'_>, path: &Path, append: bool) -> i32 {
    let opened = OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(path);
    let result = opened.and_then(|mut f| f.write_all(string.as_bytes()));
    match result {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Heap;

    #[test]
    fn write_then_read_round_trips_contents() {
        let heap = Heap::new();
        let mut path = std::env::temp_dir();
        path.push(format!("polyarena-file-test-{:?}", std::thread::current().id()));

        let mut out = GpcString::new(&heap, 8, b"round trip payload");
        assert_eq!(gpc_file(&mut out, &path, Mode::Write, TextMode::Binary), 0);

        let mut input = GpcString::new(&heap, 0, b"");
        assert_eq!(gpc_file(&mut input, &path, Mode::Read, TextMode::Binary), 0);
        assert_eq!(input.as_bytes(), b"round trip payload");

        let mut appended = GpcString::new(&heap, 8, b" more");
        assert_eq!(gpc_file(&mut appended, &path, Mode::Append, TextMode::Binary), 0);

        let mut reread = GpcString::new(&heap, 0, b"");
        assert_eq!(gpc_file(&mut reread, &path, Mode::Read, TextMode::Binary), 0);
        assert_eq!(reread.as_bytes(), b"round trip payload more");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn reading_a_missing_file_reports_io_error() {
        let heap = Heap::new();
        let mut s = GpcString::new(&heap, 0, b"");
        let path = Path::new("/nonexistent/polyarena-definitely-missing");
        assert_eq!(gpc_file(&mut s, path, Mode::Read, TextMode::Binary), -1);
    }
}

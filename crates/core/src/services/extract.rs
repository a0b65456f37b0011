use std::io;
use std::path::Path;

use tracing::debug;

use crate::model::LineSelection;
use crate::services::error::SliceError;

/// Reconstruct slice text from a selection.
///
/// Files are visited in the selection's key order; the empty key is skipped.
/// Every other key is opened and decoded as UTF-8, even when no line of it is
/// selected. Within a file, selected lines are emitted top to bottom regardless
/// of the order they were inserted in.
///
/// `\n`, `\r\n` and a lone `\r` all end a line, and each emitted line ends in
/// `\n`. A final line without a terminator is emitted as-is.
pub fn extract_source(selection: &LineSelection) -> Result<String, SliceError> {
    let mut out = String::new();
    for (file, lines) in selection.iter() {
        if file.is_empty() {
            continue;
        }
        let path = Path::new(file);
        let unavailable =
            |source| SliceError::SourceFileUnavailable { path: path.to_path_buf(), source };

        let bytes = std::fs::read(path).map_err(unavailable)?;
        let text = String::from_utf8(bytes)
            .map_err(|err| unavailable(io::Error::new(io::ErrorKind::InvalidData, err)))?;

        let mut emitted = 0usize;
        for (idx, (line, terminated)) in source_lines(&text).enumerate() {
            let lineno = u32::try_from(idx + 1).unwrap_or(u32::MAX);
            if !lines.contains(&lineno) {
                continue;
            }
            out.push_str(line);
            if terminated {
                out.push('\n');
            }
            emitted += 1;
            if emitted == lines.len() {
                break;
            }
        }
        debug!(file, selected = lines.len(), emitted, "extracted source lines");
    }
    Ok(out)
}

/// Split `text` into lines without their terminators, flagging whether each
/// line had one.
fn source_lines(text: &str) -> impl Iterator<Item = (&str, bool)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(|c| c == '\r' || c == '\n') {
            Some(end) => {
                let width = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                let line = &rest[..end];
                rest = &rest[end + width..];
                Some((line, true))
            }
            None => {
                let line = rest;
                rest = "";
                Some((line, false))
            }
        }
    })
}

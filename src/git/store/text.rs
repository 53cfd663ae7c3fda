use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::{ConfigStore, OVERRIDE_KEY, OVERRIDE_SECTION, Removal};
use crate::error::{HooksError, Result};
use crate::git::Repository;

/// Direct, section-aware line parser for `.git/config`
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStore;

impl ConfigStore for TextStore {
    fn name(&self) -> &'static str {
        "text"
    }

    fn read_override(&self, config_path: &Path) -> Result<Option<String>> {
        let content = read_store(config_path)?;
        Ok(statements(&content).into_iter().filter_map(|s| s.override_value).last())
    }

    fn remove_override(&self, repository: &Repository) -> Result<Removal> {
        let config_path = &repository.config_path;
        let content = read_store(config_path)?;

        let mut kept = Vec::with_capacity(content.len());
        let mut dropped = 0;
        for statement in statements(&content) {
            if statement.override_value.is_none() {
                kept.extend_from_slice(statement.raw);
                continue;
            }
            dropped += 1;
            // `[core] hooksPath = x` keeps its header
            if statement.header_len > 0 {
                kept.extend_from_slice(&statement.raw[..statement.header_len]);
                kept.extend_from_slice(line_terminator(statement.raw));
            }
        }

        if dropped == 0 {
            return Ok(Removal::AlreadyAbsent);
        }

        write_atomically(config_path, &kept)?;
        tracing::trace!("Dropped {} hooksPath entries from {}", dropped, config_path.display());
        Ok(Removal::Removed)
    }
}

fn read_store(config_path: &Path) -> Result<Vec<u8>> {
    fs::read(config_path).map_err(|source| HooksError::StoreRead {
        path: config_path.to_path_buf(),
        source,
    })
}

/// Replace `path` with `content` via a sibling temp file and a rename, so
/// readers see either the old store or the new one.
fn write_atomically(path: &Path, content: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| HooksError::StoreWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content).map_err(write_err)?;

    let permissions = fs::metadata(path).map_err(write_err)?.permissions();
    tmp.as_file().set_permissions(permissions).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// One logical line of the store: a single physical line, or several when a
/// value continues with a trailing backslash
struct Statement<'a> {
    /// Every physical line, terminators included
    raw: &'a [u8],
    /// Bytes of `raw` taken by section headers preceding a key on the same line
    header_len: usize,
    /// Decoded value when this statement sets `hooksPath` inside `[core]`.
    /// A bare `hooksPath` (boolean true) decodes to an empty string.
    override_value: Option<String>,
}

/// Split `content` into statements, tracking the current section the way git
/// does: headers may share their line with a key, and `[core "sub"]`,
/// `[core.sub]` or a malformed header all leave `[core]`.
fn statements(content: &[u8]) -> Vec<Statement<'_>> {
    let mut statements = Vec::new();
    let mut in_core = false;
    let mut pos = 0;

    while pos < content.len() {
        let line_end = content[pos..]
            .iter()
            .position(|b| *b == b'\n')
            .map_or(content.len(), |i| pos + i + 1);
        let line = strip_terminator(&content[pos..line_end]);

        let mut cursor = skip_whitespace(line, 0);
        let mut header_len = 0;
        while line.get(cursor) == Some(&b'[') {
            match parse_header(line, cursor) {
                Some((end, is_core)) => {
                    in_core = is_core;
                    header_len = end;
                    cursor = skip_whitespace(line, end);
                }
                None => {
                    in_core = false;
                    cursor = line.len();
                }
            }
        }

        let mut end = line_end;
        let mut override_value = None;
        if let Some(key) = parse_key(line, cursor) {
            let value = match key.value_start {
                Some(start) => {
                    let (value, value_end) = scan_value(content, pos + start);
                    end = value_end;
                    value
                }
                None => String::new(),
            };
            if in_core && key.name.eq_ignore_ascii_case(OVERRIDE_KEY.as_bytes()) {
                override_value = Some(value);
            }
        }

        statements.push(Statement {
            raw: &content[pos..end],
            header_len,
            override_value,
        });
        pos = end;
    }

    statements
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn line_terminator(raw: &[u8]) -> &'static [u8] {
    if raw.ends_with(b"\r\n") {
        &b"\r\n"[..]
    } else if raw.ends_with(b"\n") {
        &b"\n"[..]
    } else {
        &[]
    }
}

fn skip_whitespace(line: &[u8], mut i: usize) -> usize {
    while line.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    i
}

/// Parse the header starting at `line[start] == b'['`. Returns the offset just
/// past `]` and whether the header is exactly `[core]`.
fn parse_header(line: &[u8], start: usize) -> Option<(usize, bool)> {
    let name_start = start + 1;
    let mut i = name_start;
    while line.get(i).is_some_and(|b| *b != b']' && !b.is_ascii_whitespace()) {
        i += 1;
    }
    let name = &line[name_start..i];

    if line.get(i) == Some(&b']') {
        return Some((i + 1, name.eq_ignore_ascii_case(OVERRIDE_SECTION.as_bytes())));
    }

    // `[name "subsection"]`
    i = skip_whitespace(line, i);
    if line.get(i) != Some(&b'"') {
        return None;
    }
    i += 1;
    loop {
        match line.get(i)? {
            b'\\' => i += 2,
            b'"' => break,
            _ => i += 1,
        }
    }
    (line.get(i + 1) == Some(&b']')).then_some((i + 2, false))
}

struct Key<'a> {
    name: &'a [u8],
    /// Offset just past `=`; `None` for a bare boolean key
    value_start: Option<usize>,
}

fn parse_key(line: &[u8], start: usize) -> Option<Key<'_>> {
    if !line.get(start).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let mut i = start;
    while line.get(i).is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'-') {
        i += 1;
    }
    let name = &line[start..i];

    let i = skip_whitespace(line, i);
    match line.get(i) {
        Some(b'=') => Some(Key {
            name,
            value_start: Some(i + 1),
        }),
        None | Some(b'#' | b';') => Some(Key {
            name,
            value_start: None,
        }),
        Some(_) => None,
    }
}

/// Decode the value starting at `content[start]` the way git does: surrounding
/// whitespace trimmed, double quotes removed, backslash escapes resolved,
/// unquoted `#`/`;` comments cut off and backslash-newline joining the next
/// line. Returns the value and the offset just past the line it ends on.
fn scan_value(content: &[u8], start: usize) -> (String, usize) {
    let mut value = Vec::new();
    let mut in_quotes = false;
    let mut in_comment = false;
    let mut trailing_ws = 0;
    let mut i = start;

    while let Some(&b) = content.get(i) {
        i += 1;
        match b {
            b'\n' => break,
            b'\r' if content.get(i) == Some(&b'\n') => {}
            _ if in_comment => {}
            b'\\' => {
                match content.get(i) {
                    Some(b'\n') => {}
                    Some(b'\r') if content.get(i + 1) == Some(&b'\n') => i += 1,
                    Some(b'n') => value.push(b'\n'),
                    Some(b't') => value.push(b'\t'),
                    Some(b'b') => value.push(0x08),
                    Some(&other) => value.push(other),
                    None => {}
                }
                i += 1;
                trailing_ws = 0;
            }
            b'"' => {
                in_quotes = !in_quotes;
                trailing_ws = 0;
            }
            b'#' | b';' if !in_quotes => in_comment = true,
            b' ' | b'\t' if !in_quotes => {
                if !value.is_empty() {
                    value.push(b);
                    trailing_ws += 1;
                }
            }
            other => {
                value.push(other);
                trailing_ws = 0;
            }
        }
    }

    value.truncate(value.len() - trailing_ws);
    (String::from_utf8_lossy(&value).into_owned(), i.min(content.len()))
}

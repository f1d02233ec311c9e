//! Line-preserving INI document.
//!
//! Grammar accepted by [`IniDocument::parse`]:
//! ```text
//! [Section]            section header, name trimmed
//! Key=Value            entry, key and value trimmed
//! ; comment            kept verbatim
//! # comment            kept verbatim
//! <anything else>      kept verbatim
//! ```
//! Entries before the first header belong to the unnamed section `""`.
//! Section and key lookups are ASCII case-insensitive, matching how the
//! engine resolves config names. Parsing never fails: unrecognised lines are
//! carried through unchanged.
//!
//! The line terminator of the input (`\n` or `\r\n`) is detected from the
//! first line break and reused when rendering. A leading UTF-8 byte order
//! mark is set aside before parsing and written back in front of the output.

use std::fmt;

use thiserror::Error;

const BOM: char = '\u{feff}';

/// Errors returned when editing an [`IniDocument`].
#[derive(Debug, Error, PartialEq)]
pub enum IniError {
    /// Section names cannot be empty or contain brackets or line breaks.
    #[error("invalid section name: {0:?}")]
    InvalidSection(String),

    /// Keys cannot be empty or contain `=`, `[` or line breaks.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// Values cannot contain line breaks.
    #[error("invalid value for key {key}: line breaks are not allowed")]
    InvalidValue { key: String },
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    /// Blank line, comment or unrecognised text.
    Raw(String),
    Section {
        name: String,
        raw: String,
    },
    Entry {
        key: String,
        value: String,
        /// Original text; `None` once the entry has been modified.
        raw: Option<String>,
    },
}

impl Line {
    fn render(&self) -> String {
        match self {
            Line::Raw(text) => text.clone(),
            Line::Section { raw, .. } => raw.clone(),
            Line::Entry { raw: Some(raw), .. } => raw.clone(),
            Line::Entry {
                key,
                value,
                raw: None,
            } => format!("{key}={value}"),
        }
    }
}

/// An INI file held as an ordered list of lines.
#[derive(Debug, Clone, PartialEq)]
pub struct IniDocument {
    lines: Vec<Line>,
    newline: &'static str,
    trailing_newline: bool,
    bom: bool,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl IniDocument {
    /// Creates an empty document that renders with `\n` line endings.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            newline: "\n",
            trailing_newline: true,
            bom: false,
        }
    }

    /// Parses `text`. Never fails; see the module documentation.
    pub fn parse(text: &str) -> Self {
        let (bom, text) = match text.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = text.is_empty() || text.ends_with('\n');

        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|line| parse_line(line.strip_suffix('\r').unwrap_or(line)))
                .collect()
        };

        Self {
            lines,
            newline,
            trailing_newline,
            bom,
        }
    }

    /// Returns `true` when the document has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the value of the first `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.entries_in(section)
            .find(|(_, entry_key, _)| entry_key.eq_ignore_ascii_case(key))
            .map(|(_, _, value)| value)
    }

    pub fn contains_key(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Sets `key` in `section` to `value`.
    ///
    /// The first existing entry is updated in place and any later duplicates
    /// of the same key in that section are dropped. A missing key is added
    /// after the last entry of the section; a missing section is appended at
    /// the end of the document.
    ///
    /// Returns `true` if the document changed.
    ///
    /// # Errors
    ///
    /// Returns [`IniError`] if the section, key or value cannot be
    /// represented on a single INI line.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<bool, IniError> {
        validate_section(section)?;
        validate_key(key)?;
        if value.contains(['\n', '\r']) {
            return Err(IniError::InvalidValue {
                key: key.to_string(),
            });
        }

        let matches: Vec<usize> = self
            .entries_in(section)
            .filter(|(_, entry_key, _)| entry_key.eq_ignore_ascii_case(key))
            .map(|(idx, _, _)| idx)
            .collect();

        if let Some((&first, rest)) = matches.split_first() {
            let mut changed = !rest.is_empty();
            for &idx in rest.iter().rev() {
                self.lines.remove(idx);
            }
            if let Line::Entry {
                value: current,
                raw,
                ..
            } = &mut self.lines[first]
            {
                if current.as_str() != value {
                    *current = value.to_string();
                    *raw = None;
                    changed = true;
                }
            }
            return Ok(changed);
        }

        let entry = Line::Entry {
            key: key.to_string(),
            value: value.to_string(),
            raw: None,
        };
        match self.insertion_point(section) {
            Some(idx) => self.lines.insert(idx, entry),
            None => {
                if matches!(self.lines.last(), Some(line) if !is_blank(line)) {
                    self.lines.push(Line::Raw(String::new()));
                }
                self.lines.push(Line::Section {
                    name: section.to_string(),
                    raw: format!("[{section}]"),
                });
                self.lines.push(entry);
            }
        }
        Ok(true)
    }

    /// Removes every `key` entry in `section`. Returns `true` if any was removed.
    pub fn remove(&mut self, section: &str, key: &str) -> bool {
        let matches: Vec<usize> = self
            .entries_in(section)
            .filter(|(_, entry_key, _)| entry_key.eq_ignore_ascii_case(key))
            .map(|(idx, _, _)| idx)
            .collect();
        for &idx in matches.iter().rev() {
            self.lines.remove(idx);
        }
        !matches.is_empty()
    }

    /// Iterates `(line index, key, value)` for every entry in `section`,
    /// across all occurrences of its header.
    fn entries_in<'a, 's>(
        &'a self,
        section: &'s str,
    ) -> impl Iterator<Item = (usize, &'a str, &'a str)> + 's
    where
        'a: 's,
    {
        let mut current = "";
        self.lines
            .iter()
            .enumerate()
            .filter_map(move |(idx, line)| match line {
                Line::Section { name, .. } => {
                    current = name.as_str();
                    None
                }
                Line::Entry { key, value, .. } if current.eq_ignore_ascii_case(section) => {
                    Some((idx, key.as_str(), value.as_str()))
                }
                _ => None,
            })
    }

    /// Index at which a new entry for `section` goes, or `None` if the
    /// section does not exist yet.
    fn insertion_point(&self, section: &str) -> Option<usize> {
        let mut current = "";
        let mut point = None;
        for (idx, line) in self.lines.iter().enumerate() {
            match line {
                Line::Section { name, .. } => {
                    current = name.as_str();
                    if current.eq_ignore_ascii_case(section) {
                        point = Some(idx + 1);
                    }
                }
                Line::Entry { .. } if current.eq_ignore_ascii_case(section) => {
                    point = Some(idx + 1);
                }
                _ => {}
            }
        }
        point
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bom {
            write!(f, "{BOM}")?;
        }
        for (idx, line) in self.lines.iter().enumerate() {
            f.write_str(&line.render())?;
            if idx + 1 < self.lines.len() || self.trailing_newline {
                f.write_str(self.newline)?;
            }
        }
        Ok(())
    }
}

fn parse_line(line: &str) -> Line {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
        return Line::Raw(line.to_string());
    }
    if trimmed.starts_with('[') && trimmed.ends_with(']') && trimmed.len() >= 2 {
        return Line::Section {
            name: trimmed[1..trimmed.len() - 1].trim().to_string(),
            raw: line.to_string(),
        };
    }
    match trimmed.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Line::Entry {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
            raw: Some(line.to_string()),
        },
        _ => Line::Raw(line.to_string()),
    }
}

fn is_blank(line: &Line) -> bool {
    matches!(line, Line::Raw(text) if text.trim().is_empty())
}

fn validate_section(section: &str) -> Result<(), IniError> {
    if section.trim().is_empty() || section.contains(['[', ']', '\n', '\r']) {
        return Err(IniError::InvalidSection(section.to_string()));
    }
    Ok(())
}

fn validate_key(key: &str) -> Result<(), IniError> {
    if key.trim().is_empty() || key.contains(['=', '[', '\n', '\r']) {
        return Err(IniError::InvalidKey(key.to_string()));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

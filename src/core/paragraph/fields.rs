//! The `Key: Value` paragraph text format.
//!
//! ```text
//! Package: zlib
//! Version: 1.2.11
//! Description: A compression library
//!  with a second line
//!  .
//!  and a line after an empty one
//!
//! Package: bzip2
//! ```
//!
//! The value starts after the single space following `:`. Continuation lines
//! start with a single space, blank lines end a paragraph and `#` lines are
//! comments. A value line made only of dots and whitespace (including an
//! empty one) is written with one extra leading `.`, so ` .` stands for an
//! empty line and ` ..` for a line holding a single dot.

use std::collections::HashMap;

use crate::core::paragraph::ParagraphError;

/// A parsed paragraph before it is projected into a typed record.
pub type FieldMap = HashMap<String, String>;

/// Parse text into its paragraphs.
pub fn parse_paragraphs(text: &str) -> Result<Vec<FieldMap>, ParagraphError> {
    let mut paragraphs = Vec::new();
    let mut current = FieldMap::new();
    let mut last_key: Option<String> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;

        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            last_key = None;
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix([' ', '\t']) {
            let value = last_key
                .as_ref()
                .and_then(|key| current.get_mut(key))
                .ok_or(ParagraphError::OrphanContinuation { line: line_no })?;
            value.push('\n');
            value.push_str(unescape_line(rest));
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or(ParagraphError::MalformedLine { line: line_no })?;
        let key = key.trim_end();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(ParagraphError::MalformedLine { line: line_no });
        }
        if current.contains_key(key) {
            return Err(ParagraphError::DuplicateField {
                field: key.to_string(),
            });
        }

        let value = value.strip_prefix(' ').unwrap_or(value);
        current.insert(key.to_string(), value.to_string());
        last_key = Some(key.to_string());
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs)
}

/// Parse text that must hold exactly one paragraph.
pub fn parse_single_paragraph(text: &str) -> Result<FieldMap, ParagraphError> {
    let mut paragraphs = parse_paragraphs(text)?;
    if paragraphs.len() != 1 {
        return Err(ParagraphError::ParagraphCount {
            found: paragraphs.len(),
        });
    }
    Ok(paragraphs.remove(0))
}

/// Append one `Key: Value` field, folding multi-line values.
pub fn write_field(out: &mut String, key: &str, value: &str) {
    let mut lines = value.split('\n');
    out.push_str(key);
    out.push(':');
    if let Some(first) = lines.next() {
        if !first.is_empty() {
            out.push(' ');
            out.push_str(first);
        }
    }
    out.push('\n');

    for line in lines {
        out.push(' ');
        if needs_escape(line) {
            out.push('.');
        }
        out.push_str(line);
        out.push('\n');
    }
}

/// Lines that would otherwise read back as a paragraph break or lose a dot.
fn needs_escape(line: &str) -> bool {
    line.chars().all(|c| c == '.' || c.is_whitespace())
}

fn unescape_line(rest: &str) -> &str {
    match rest.strip_prefix('.') {
        Some(line) if needs_escape(line) => line,
        _ => rest,
    }
}

/// Remove a required field.
pub(crate) fn take_required(
    fields: &mut FieldMap,
    field: &'static str,
) -> Result<String, ParagraphError> {
    match fields.remove(field) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ParagraphError::MissingField { field }),
    }
}

/// Remove an optional field, defaulting to empty.
pub(crate) fn take_optional(fields: &mut FieldMap, field: &str) -> String {
    fields.remove(field).unwrap_or_default()
}

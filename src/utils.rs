//! String and path helpers shared by the renderers.
//!
//! This module provides:
//! - Home directory expansion for configured file names
//! - Paragraph-aware word wrapping with a fixed indent
//! - Single-line normalization of free text
//! - Human-readable durations and sizes
//! - The January 7 anniversary message

use chrono::{Datelike, NaiveDate};
use humansize::{DECIMAL, format_size};
use std::path::{Path, PathBuf};

/// Line separator written by all renderers.
#[cfg(windows)]
pub const LINESEP: &str = "\r\n";
#[cfg(not(windows))]
pub const LINESEP: &str = "\n";

/// Expands a leading `~` to the user's home directory.
pub fn expand_user(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

/// Replaces line breaks so the text fits on a single output line.
pub fn strline(text: &str) -> String {
    text.replace("\r\n", "\\n").replace(['\r', '\n'], "\\n")
}

/// Splits text into paragraphs separated by blank lines.
fn paragraphs(text: &str) -> Vec<String> {
    let mut paras = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paras.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paras.push(current.join(" "));
    }
    paras
}

/// Word-wraps `text` to `width` columns, paragraph by paragraph.
///
/// Whitespace inside a paragraph is collapsed. Every output line starts with
/// `indent`. A word longer than a whole line is broken: its head fills the
/// rest of the current line and the remainder continues on the next lines.
/// Paragraphs are joined with a single line separator. A `width` of zero or
/// an empty text returns the text unchanged.
pub fn wrap(text: &str, width: usize, indent: &str) -> String {
    if width == 0 || text.is_empty() {
        return text.to_string();
    }
    let indent_width = indent.chars().count();
    let capacity = width.saturating_sub(indent_width).max(1);
    let mut lines: Vec<String> = Vec::new();
    for para in paragraphs(text) {
        let mut line = String::from(indent);
        let mut line_width = indent_width;
        let mut empty = true;
        for word in para.split_whitespace() {
            let mut rest = word;
            while !rest.is_empty() {
                let rest_width = rest.chars().count();
                let sep = usize::from(!empty);
                if line_width + sep + rest_width <= width {
                    if !empty {
                        line.push(' ');
                    }
                    line.push_str(rest);
                    line_width += sep + rest_width;
                    empty = false;
                    break;
                }
                let room = width.saturating_sub(line_width + sep);
                if empty || (rest_width > capacity && room > 0) {
                    let (head, tail) = split_at_char(rest, room.max(1));
                    if !empty {
                        line.push(' ');
                    }
                    line.push_str(head);
                    rest = tail;
                }
                lines.push(std::mem::replace(&mut line, String::from(indent)));
                line_width = indent_width;
                empty = true;
            }
        }
        if !empty {
            lines.push(line);
        }
    }
    lines.join(LINESEP)
}

/// Splits `s` after its first `n` characters.
fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    let index = s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len());
    s.split_at(index)
}

/// Formats a number of seconds as e.g. `"1 hour, 2 minutes"` or `"3.142 seconds"`.
pub fn format_elapsed(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{seconds:.3} seconds");
    }
    let total = seconds.round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    let unit = |n: u64, name: &str| {
        if n == 1 {
            format!("1 {name}")
        } else {
            format!("{n} {name}s")
        }
    };
    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "minute"));
    }
    if secs > 0 && hours == 0 {
        parts.push(unit(secs, "second"));
    }
    parts.join(", ")
}

/// `"1 link"` / `"2 links"` style counts.
pub fn pluralize(n: u64, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("1 {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Human-readable byte size, e.g. `"1.02 kB"`.
pub fn format_bytes(size: u64) -> String {
    format_size(size, DECIMAL)
}

/// Anniversary greeting emitted on January 7, or `None` on any other day.
pub fn birthday_message(today: NaiveDate) -> Option<String> {
    (today.day() == 7 && today.month() == 1).then(|| {
        format!(
            "Happy birthday for linkreport, I'm {} years old today!",
            today.year() - 2000
        )
    })
}

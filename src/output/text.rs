//! Plain text renderer.
//!
//! Writes one block per record with right-aligned field labels:
//!
//! ```text
//! URL        `http://example.com/missing'
//! Parent URL http://example.com/, line 3, col 10
//! Result     Error: 404 Not Found
//! ```
//!
//! The footer summarizes the session counters.

use super::{CommentStyle, Renderer, ReportCore};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::fields::Field;
use crate::record::UrlRecord;
use crate::utils::{format_bytes, pluralize, strline};

/// Column width for wrapped info and warning text.
const WRAP_WIDTH: usize = 65;

pub struct TextRenderer {
    core: ReportCore,
}

impl TextRenderer {
    fn field_line(&mut self, field: Field, value: &str) {
        let line = format!("{}{}{}", self.core.part(field), self.core.spaces(field), value);
        self.core.writeln(&line);
    }

    fn write_url(&mut self, record: &UrlRecord) {
        let mut value = format!("`{}'", strline(record.url.as_deref().unwrap_or_default()));
        if record.cached {
            value.push_str(" (cached)");
        }
        self.core.writeln("");
        self.field_line(Field::Url, &value);
    }

    fn write_parent(&mut self, record: &UrlRecord, parent: &str) {
        let mut value = strline(parent);
        if let Some(line) = record.line {
            value.push_str(&format!(", line {line}"));
        }
        if let Some(column) = record.column {
            value.push_str(&format!(", col {column}"));
        }
        self.field_line(Field::ParentUrl, &value);
    }

    fn write_result(&mut self, record: &UrlRecord) {
        let status = if record.valid { "Valid" } else { "Error" };
        let value = if record.result.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {}", strline(&record.result))
        };
        self.field_line(Field::Result, &value);
    }
}

impl Renderer for TextRenderer {
    fn new(config: &ReportConfig) -> Result<Self> {
        Ok(Self {
            core: ReportCore::new(config, "linkreport-out.txt", CommentStyle::Plain)?,
        })
    }

    fn name(&self) -> &'static str {
        "text"
    }

    fn core(&self) -> &ReportCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ReportCore {
        &mut self.core
    }

    fn start_output(&mut self) -> Result<()> {
        self.core.start_output();
        self.core.write_intro();
        self.core.flush();
        Ok(())
    }

    fn render(&mut self, record: &UrlRecord) -> Result<()> {
        if self.core.has_part(Field::Url) {
            self.write_url(record);
        }
        if !record.name.is_empty() && self.core.has_part(Field::Name) {
            self.field_line(Field::Name, &format!("`{}'", strline(&record.name)));
        }
        if let Some(parent) = record.parent_url.as_deref() {
            if self.core.has_part(Field::ParentUrl) {
                self.write_parent(record, parent);
            }
        }
        if let Some(base) = record.base_ref.as_deref() {
            if self.core.has_part(Field::Base) {
                self.field_line(Field::Base, &strline(base));
            }
        }
        if let Some(real_url) = record.real_url.as_deref() {
            if self.core.has_part(Field::RealUrl) {
                self.field_line(Field::RealUrl, &strline(real_url));
            }
        }
        if let Some(cache_key) = record.cache_key.as_deref() {
            if self.core.has_part(Field::CacheKey) {
                self.field_line(Field::CacheKey, &strline(cache_key));
            }
        }
        if let Some(is_extern) = record.is_extern {
            if self.core.has_part(Field::Extern) {
                self.field_line(Field::Extern, if is_extern { "yes" } else { "no" });
            }
        }
        if let Some(dltime) = record.dltime {
            if self.core.has_part(Field::DlTime) {
                self.field_line(Field::DlTime, &format!("{dltime:.3} seconds"));
            }
        }
        if let Some(dlsize) = record.dlsize {
            if self.core.has_part(Field::DlSize) {
                self.field_line(Field::DlSize, &format_bytes(dlsize));
            }
        }
        if record.checktime > 0.0 && self.core.has_part(Field::CheckTime) {
            let value = format!("{:.3} seconds", record.checktime);
            self.field_line(Field::CheckTime, &value);
        }
        if !record.info.is_empty() && self.core.has_part(Field::Info) {
            let text = self.core.wrap(record.info.as_slice(), WRAP_WIDTH);
            self.field_line(Field::Info, &text);
        }
        if !record.warnings.is_empty() && self.core.has_part(Field::Warning) {
            let messages: Vec<&str> = record.warnings.iter().map(|w| w.message.as_str()).collect();
            let text = self.core.wrap(messages.as_slice(), WRAP_WIDTH);
            self.field_line(Field::Warning, &text);
        }
        if self.core.has_part(Field::Result) {
            self.write_result(record);
        }
        self.core.flush();
        Ok(())
    }

    fn end_output(&mut self) -> Result<()> {
        let counters = self.core.counters();
        let mut summary = String::from("That's it. ");
        summary.push_str(&pluralize(counters.number, "link checked", "links checked"));
        summary.push_str(". ");
        summary.push_str(&pluralize(
            counters.warnings_printed,
            "warning found",
            "warnings found",
        ));
        if counters.warnings != counters.warnings_printed {
            summary.push_str(&format!(
                " ({} ignored or duplicates not printed)",
                counters.warnings - counters.warnings_printed
            ));
        }
        summary.push_str(". ");
        summary.push_str(&pluralize(counters.errors_printed, "error found", "errors found"));
        if counters.errors != counters.errors_printed {
            summary.push_str(&format!(
                " ({} duplicates not printed)",
                counters.errors - counters.errors_printed
            ));
        }
        summary.push('.');

        self.core.writeln("");
        self.core.writeln(&summary);
        self.core.write_outro();
        self.core.close();
        Ok(())
    }
}

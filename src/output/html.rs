//! HTML renderer producing a standalone page with one table per record.

use super::base::format_time;
use super::markup::escape;
use super::{CommentStyle, Renderer, ReportCore};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::fields::Field;
use crate::record::UrlRecord;
use crate::utils::{format_bytes, format_elapsed, pluralize};
use chrono::Local;

const STYLE: &str = "body { font-family: sans-serif; background: #fff; color: #000 }\n\
table.url { border: 1px solid #888; border-collapse: collapse; margin: 1em 0 }\n\
table.url td { padding: 2px 6px; vertical-align: top }\n\
td.label { font-weight: bold; text-align: right; background: #eee }\n\
td.valid { color: #080 }\n\
td.error { color: #d00 }\n\
td.warning { color: #c60 }";

pub struct HtmlRenderer {
    core: ReportCore,
}

impl HtmlRenderer {
    fn row(&mut self, field: Field, value: &str, class: Option<&str>) {
        let class = class.map(|c| format!(" class=\"{c}\"")).unwrap_or_default();
        let line = format!(
            "<tr><td class=\"label\">{}</td><td{class}>{value}</td></tr>",
            escape(self.core.part(field))
        );
        self.core.writeln(&line);
    }
}

impl Renderer for HtmlRenderer {
    fn new(config: &ReportConfig) -> Result<Self> {
        Ok(Self {
            core: ReportCore::new(config, "linkreport-out.html", CommentStyle::Markup)?,
        })
    }

    fn name(&self) -> &'static str {
        "html"
    }

    fn core(&self) -> &ReportCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ReportCore {
        &mut self.core
    }

    fn start_output(&mut self) -> Result<()> {
        self.core.start_output();
        let title = format!("{} report", crate::APP_NAME);
        let charset = self.core.codec().name();
        self.core.write_prologue("<!DOCTYPE html>");
        let header = [
            "<html>".to_string(),
            "<head>".to_string(),
            format!("<meta charset=\"{}\">", escape(charset)),
            format!("<title>{}</title>", escape(&title)),
            format!("<style>\n{STYLE}\n</style>"),
            "</head>".to_string(),
            "<body>".to_string(),
            format!("<h2>{}</h2>", escape(&title)),
        ];
        for line in header {
            self.core.writeln(&line);
        }
        self.core.write_intro();
        self.core.flush();
        Ok(())
    }

    fn render(&mut self, record: &UrlRecord) -> Result<()> {
        self.core.writeln("<table class=\"url\">");
        if self.core.has_part(Field::Url) {
            let url = record.url.as_deref().unwrap_or_default();
            let mut value = format!("<a href=\"{0}\">{0}</a>", escape(url));
            if record.cached {
                value.push_str(" (cached)");
            }
            self.row(Field::Url, &value, None);
        }
        if !record.name.is_empty() && self.core.has_part(Field::Name) {
            self.row(Field::Name, &escape(&record.name), None);
        }
        if let Some(parent) = record.parent_url.as_deref() {
            if self.core.has_part(Field::ParentUrl) {
                let mut value = format!("<a href=\"{0}\">{0}</a>", escape(parent));
                if let Some(line) = record.line {
                    value.push_str(&format!(", line {line}"));
                }
                if let Some(column) = record.column {
                    value.push_str(&format!(", col {column}"));
                }
                self.row(Field::ParentUrl, &value, None);
            }
        }
        if let Some(base) = record.base_ref.as_deref() {
            if self.core.has_part(Field::Base) {
                self.row(Field::Base, &escape(base), None);
            }
        }
        if let Some(real_url) = record.real_url.as_deref() {
            if self.core.has_part(Field::RealUrl) {
                let value = format!("<a href=\"{0}\">{0}</a>", escape(real_url));
                self.row(Field::RealUrl, &value, None);
            }
        }
        if let Some(dltime) = record.dltime {
            if self.core.has_part(Field::DlTime) {
                self.row(Field::DlTime, &format!("{dltime:.3} seconds"), None);
            }
        }
        if let Some(dlsize) = record.dlsize {
            if self.core.has_part(Field::DlSize) {
                self.row(Field::DlSize, &escape(&format_bytes(dlsize)), None);
            }
        }
        if record.checktime > 0.0 && self.core.has_part(Field::CheckTime) {
            let value = format!("{:.3} seconds", record.checktime);
            self.row(Field::CheckTime, &value, None);
        }
        if !record.info.is_empty() && self.core.has_part(Field::Info) {
            let value = record
                .info
                .iter()
                .map(|i| escape(i))
                .collect::<Vec<_>>()
                .join("<br>");
            self.row(Field::Info, &value, None);
        }
        if !record.warnings.is_empty() && self.core.has_part(Field::Warning) {
            let value = record
                .warnings
                .iter()
                .map(|w| escape(&w.message))
                .collect::<Vec<_>>()
                .join("<br>");
            self.row(Field::Warning, &value, Some("warning"));
        }
        if self.core.has_part(Field::Result) {
            let (status, class) = if record.valid {
                ("Valid", "valid")
            } else {
                ("Error", "error")
            };
            let value = if record.result.is_empty() {
                status.to_string()
            } else {
                format!("{status}: {}", escape(&record.result))
            };
            self.row(Field::Result, &value, Some(class));
        }
        self.core.writeln("</table>");
        self.core.flush();
        Ok(())
    }

    fn end_output(&mut self) -> Result<()> {
        let counters = self.core.counters();
        let summary = format!(
            "<p>That's it. {}. {}. {}.</p>",
            pluralize(counters.number, "link checked", "links checked"),
            pluralize(counters.warnings_printed, "warning found", "warnings found"),
            pluralize(counters.errors_printed, "error found", "errors found"),
        );
        self.core.writeln(&summary);
        let stopped = format!(
            "<p>Stopped checking at {} ({})</p>",
            escape(&format_time(&Local::now())),
            format_elapsed(self.core.elapsed_seconds())
        );
        self.core.writeln(&stopped);
        self.core.writeln("</body>");
        self.core.writeln("</html>");
        self.core.close();
        Ok(())
    }
}

//! XML renderer writing one `<urldata>` element per record.

use super::markup::{element, xml_declaration};
use super::{CommentStyle, Renderer, ReportCore};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::fields::Field;
use crate::record::UrlRecord;

pub struct XmlRenderer {
    core: ReportCore,
}

impl XmlRenderer {
    fn line(&mut self, depth: usize, text: &str) {
        let line = format!("{}{text}", "  ".repeat(depth));
        self.core.writeln(&line);
    }
}

impl Renderer for XmlRenderer {
    fn new(config: &ReportConfig) -> Result<Self> {
        Ok(Self {
            core: ReportCore::new(config, "linkreport-out.xml", CommentStyle::Markup)?,
        })
    }

    fn name(&self) -> &'static str {
        "xml"
    }

    fn core(&self) -> &ReportCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ReportCore {
        &mut self.core
    }

    fn start_output(&mut self) -> Result<()> {
        self.core.start_output();
        let declaration = xml_declaration(self.core.codec().name());
        self.core.write_prologue(&declaration);
        self.core.write_intro();
        self.core.writeln("<linkchecker>");
        self.core.flush();
        Ok(())
    }

    fn render(&mut self, record: &UrlRecord) -> Result<()> {
        self.line(1, "<urldata>");
        if self.core.has_part(Field::Url) {
            self.line(2, &element("url", &[], record.url.as_deref().unwrap_or_default()));
        }
        if !record.name.is_empty() && self.core.has_part(Field::Name) {
            self.line(2, &element("name", &[], &record.name));
        }
        if let Some(parent) = record.parent_url.as_deref() {
            if self.core.has_part(Field::ParentUrl) {
                let mut attrs = Vec::new();
                if let Some(line) = record.line {
                    attrs.push(("line", line.to_string()));
                }
                if let Some(column) = record.column {
                    attrs.push(("column", column.to_string()));
                }
                self.line(2, &element("parent", &attrs, parent));
            }
        }
        if let Some(base) = record.base_ref.as_deref() {
            if self.core.has_part(Field::Base) {
                self.line(2, &element("baseref", &[], base));
            }
        }
        if let Some(real_url) = record.real_url.as_deref() {
            if self.core.has_part(Field::RealUrl) {
                self.line(2, &element("realurl", &[], real_url));
            }
        }
        if let Some(is_extern) = record.is_extern {
            if self.core.has_part(Field::Extern) {
                let value = u8::from(is_extern).to_string();
                self.line(2, &element("extern", &[], &value));
            }
        }
        if let Some(dltime) = record.dltime {
            if self.core.has_part(Field::DlTime) {
                self.line(2, &element("dltime", &[], &dltime.to_string()));
            }
        }
        if let Some(dlsize) = record.dlsize {
            if self.core.has_part(Field::DlSize) {
                self.line(2, &element("dlsize", &[], &dlsize.to_string()));
            }
        }
        if record.checktime > 0.0 && self.core.has_part(Field::CheckTime) {
            self.line(2, &element("checktime", &[], &record.checktime.to_string()));
        }
        if !record.info.is_empty() && self.core.has_part(Field::Info) {
            self.line(2, "<infos>");
            for info in &record.info {
                self.line(3, &element("info", &[], info));
            }
            self.line(2, "</infos>");
        }
        if !record.warnings.is_empty() && self.core.has_part(Field::Warning) {
            self.line(2, "<warnings>");
            for warning in &record.warnings {
                let attrs: Vec<(&str, String)> = warning
                    .tag
                    .iter()
                    .map(|tag| ("tag", tag.clone()))
                    .collect();
                self.line(3, &element("warning", &attrs, &warning.message));
            }
            self.line(2, "</warnings>");
        }
        if self.core.has_part(Field::Result) {
            let attrs = [("result", record.result.clone())];
            let valid = u8::from(record.valid).to_string();
            self.line(2, &element("valid", &attrs, &valid));
        }
        self.line(1, "</urldata>");
        self.core.flush();
        Ok(())
    }

    fn end_output(&mut self) -> Result<()> {
        self.core.writeln("</linkchecker>");
        self.core.write_outro();
        self.core.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SharedStream;
    use chrono::NaiveDate;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_declaration_stays_first_on_anniversary() {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let stream: SharedStream = buffer.clone();
        let config = ReportConfig::default()
            .with_encoding("utf-8")
            .with_stream(stream);
        let mut renderer = XmlRenderer::new(&config).unwrap();
        renderer
            .core
            .set_today(NaiveDate::from_ymd_opt(2031, 1, 7).unwrap());
        renderer.start_output().unwrap();
        renderer.end_output().unwrap();

        let out = String::from_utf8(buffer.lock().clone()).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("<?xml version=\"1.0\" encoding=\"UTF-8\"?>")
        );
        assert_eq!(
            lines.next(),
            Some("<!-- Happy birthday for linkreport, I'm 31 years old today! -->")
        );
    }
}

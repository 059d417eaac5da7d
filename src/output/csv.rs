//! CSV output renderer for checked links.
//!
//! This module writes one row per printed record using the `csv` crate, with
//! a configurable separator and quote character. The banner and the session
//! end are written as `#` comment lines around the rows.

use super::{CommentStyle, Renderer, ReportCore};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::fields::Field;
use crate::record::UrlRecord;
use ::csv::{QuoteStyle, WriterBuilder};

/// Column names of the header row and the part each column belongs to.
/// Columns of unselected parts are left out; `cached` is always written.
pub const COLUMNS: [(&str, Option<Field>); 15] = [
    ("urlname", Some(Field::Url)),
    ("parentname", Some(Field::ParentUrl)),
    ("baseref", Some(Field::Base)),
    ("result", Some(Field::Result)),
    ("warningstring", Some(Field::Warning)),
    ("infostring", Some(Field::Info)),
    ("valid", Some(Field::Result)),
    ("url", Some(Field::RealUrl)),
    ("line", Some(Field::ParentUrl)),
    ("column", Some(Field::ParentUrl)),
    ("name", Some(Field::Name)),
    ("dltime", Some(Field::DlTime)),
    ("dlsize", Some(Field::DlSize)),
    ("checktime", Some(Field::CheckTime)),
    ("cached", None),
];

pub struct CsvRenderer {
    core: ReportCore,
    separator: u8,
    quotechar: u8,
}

fn ascii_byte(option: &str, value: char) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| ReportError::Config(format!("csv {option} must be ASCII, got {value:?}")))
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: bool) -> String {
    let flag = if value { "1" } else { "0" };
    flag.to_string()
}

impl CsvRenderer {
    /// The values of the selected columns.
    fn selected<'a, T>(&self, values: &'a [T; 15]) -> Vec<&'a T> {
        COLUMNS
            .iter()
            .zip(values)
            .filter(|((_, field), _)| field.is_none_or(|f| self.core.has_part(f)))
            .map(|(_, value)| value)
            .collect()
    }

    /// Formats one CSV line, without the line terminator.
    fn line<I, S>(&self, fields: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(self.separator)
            .quote(self.quotechar)
            .quote_style(QuoteStyle::Necessary)
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(fields)?;
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        let line = String::from_utf8_lossy(&bytes);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Renderer for CsvRenderer {
    fn new(config: &ReportConfig) -> Result<Self> {
        Ok(Self {
            core: ReportCore::new(config, "linkreport-out.csv", CommentStyle::Hash)?,
            separator: ascii_byte("separator", config.csv.separator)?,
            quotechar: ascii_byte("quotechar", config.csv.quotechar)?,
        })
    }

    fn name(&self) -> &'static str {
        "csv"
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
        let names = COLUMNS.map(|(name, _)| name);
        let header = self.line(self.selected(&names))?;
        self.core.writeln(&header);
        self.core.flush();
        Ok(())
    }

    fn render(&mut self, record: &UrlRecord) -> Result<()> {
        let row = [
            opt(record.url.as_deref()),
            opt(record.parent_url.as_deref()),
            opt(record.base_ref.as_deref()),
            record.result.clone(),
            record.warning_text(),
            record.info.join("\n"),
            flag(record.valid),
            opt(record.real_url.as_deref()),
            opt(record.line),
            opt(record.column),
            record.name.clone(),
            opt(record.dltime),
            opt(record.dlsize),
            record.checktime.to_string(),
            flag(record.cached),
        ];
        let line = self.line(self.selected(&row))?;
        self.core.writeln(&line);
        self.core.flush();
        Ok(())
    }

    fn end_output(&mut self) -> Result<()> {
        self.core.write_outro();
        self.core.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_must_be_ascii() {
        let mut config = ReportConfig::default();
        config.csv.separator = '§';
        assert!(matches!(
            CsvRenderer::new(&config),
            Err(ReportError::Config(_))
        ));
    }

    #[test]
    fn test_unselected_columns_are_left_out() {
        let mut config = ReportConfig::default();
        config.parts = crate::config::PartSelection::parse(["url", "result"]).unwrap();
        let renderer = CsvRenderer::new(&config).unwrap();
        let names = COLUMNS.map(|(name, _)| name);
        let header: Vec<&str> = renderer.selected(&names).into_iter().copied().collect();
        assert_eq!(header, vec!["urlname", "result", "valid", "cached"]);
    }

    #[test]
    fn test_line_quotes_when_needed() {
        let renderer = CsvRenderer::new(&ReportConfig::default()).unwrap();
        let line = renderer.line(["a", "b;c", "d\"e"]).unwrap();
        assert_eq!(line, "a;\"b;c\";\"d\"\"e\"");
    }
}

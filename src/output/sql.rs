//! SQL renderer writing one `INSERT` statement per record.

use super::{CommentStyle, Renderer, ReportCore};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::fields::Field;
use crate::record::UrlRecord;
use crate::utils::LINESEP;

/// Quotes a string as an SQL literal; `None` becomes `NULL`.
pub fn sqlify(value: Option<&str>) -> String {
    match value {
        Some(s) => format!("'{}'", s.replace('\'', "''").replace(['\r', '\n'], " ")),
        None => "NULL".to_string(),
    }
}

/// Numeric literal of an optional number; `None` becomes `NULL`.
fn numeric<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "NULL".to_string())
}

/// Table columns and the part each belongs to; `cached` is always written.
const COLUMNS: [(&str, Option<Field>); 15] = [
    ("urlname", Some(Field::Url)),
    ("parentname", Some(Field::ParentUrl)),
    ("baseref", Some(Field::Base)),
    ("valid", Some(Field::Result)),
    ("result", Some(Field::Result)),
    ("warning", Some(Field::Warning)),
    ("info", Some(Field::Info)),
    ("url", Some(Field::RealUrl)),
    ("line", Some(Field::ParentUrl)),
    ("col", Some(Field::ParentUrl)),
    ("name", Some(Field::Name)),
    ("checktime", Some(Field::CheckTime)),
    ("dltime", Some(Field::DlTime)),
    ("dlsize", Some(Field::DlSize)),
    ("cached", None),
];

pub struct SqlRenderer {
    core: ReportCore,
    dbname: String,
    separator: String,
}

impl Renderer for SqlRenderer {
    fn new(config: &ReportConfig) -> Result<Self> {
        Ok(Self {
            core: ReportCore::new(config, "linkreport-out.sql", CommentStyle::Sql)?,
            dbname: config.sql.dbname.clone(),
            separator: config.sql.separator.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "sql"
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
        let warning = record.warning_text();
        let info = record.info.join("\n");
        let values = [
            sqlify(record.url.as_deref()),
            sqlify(record.parent_url.as_deref()),
            sqlify(record.base_ref.as_deref()),
            numeric(Some(u8::from(record.valid))),
            sqlify(Some(record.result.as_str())),
            sqlify(Some(warning.as_str())),
            sqlify(Some(info.as_str())),
            sqlify(record.real_url.as_deref()),
            numeric(record.line),
            numeric(record.column),
            sqlify(Some(record.name.as_str())),
            numeric(Some(record.checktime)),
            numeric(record.dltime),
            numeric(record.dlsize),
            numeric(Some(u8::from(record.cached))),
        ];
        let (columns, values): (Vec<&str>, Vec<String>) = COLUMNS
            .iter()
            .zip(values)
            .filter(|((_, field), _)| field.is_none_or(|f| self.core.has_part(f)))
            .map(|((column, _), value)| (*column, value))
            .unzip();
        let statement = format!(
            "insert into {}({}) values ({}){}",
            self.dbname,
            columns.join(","),
            values.join(","),
            self.separator
        );
        self.core.writeln(&statement);
        self.core.flush();
        Ok(())
    }

    fn end_output(&mut self) -> Result<()> {
        self.core.write(LINESEP);
        self.core.write_outro();
        self.core.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlify() {
        assert_eq!(sqlify(None), "NULL");
        assert_eq!(sqlify(Some("it's")), "'it''s'");
        assert_eq!(sqlify(Some("a\nb")), "'a b'");
    }

    #[test]
    fn test_numeric() {
        assert_eq!(numeric::<u32>(None), "NULL");
        assert_eq!(numeric(Some(3u32)), "3");
    }
}

//! Shared state and behavior composed into every renderer.
//!
//! [`ReportCore`] owns the part selection, the label alignment table, the
//! session counters, the text codec and the output sink. Concrete renderers
//! hold one and delegate all writing and accounting to it.

use crate::LOG_CHECK;
use crate::codec::TextCodec;
use crate::config::{PartSelection, ReportConfig};
use crate::error::Result;
use crate::fields::{Field, field_label};
use crate::record::UrlRecord;
use crate::sink::OutputSink;
use crate::utils::{LINESEP, birthday_message, format_elapsed, wrap};
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// How a format writes free-text comment lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// The text as is.
    Plain,
    /// `# text`
    Hash,
    /// `-- text`
    Sql,
    /// `// text`
    Slash,
    /// `<!-- text -->`
    Markup,
}

impl CommentStyle {
    fn format(&self, text: &str) -> String {
        match self {
            CommentStyle::Plain => text.to_string(),
            CommentStyle::Hash => format!("# {text}"),
            CommentStyle::Sql => format!("-- {text}"),
            CommentStyle::Slash => format!("// {text}"),
            CommentStyle::Markup => format!("<!-- {} -->", text.replace("--", "- -")),
        }
    }
}

/// Per-session accounting of processed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    /// Records seen.
    pub number: u64,
    /// Invalid records seen.
    pub errors: u64,
    /// Invalid records that were printed.
    pub errors_printed: u64,
    /// Warnings seen.
    pub warnings: u64,
    /// Warnings that were printed.
    pub warnings_printed: u64,
}

/// Session state shared by all renderers.
pub struct ReportCore {
    parts: PartSelection,
    spaces: HashMap<Field, String>,
    max_indent: usize,
    counters: Counters,
    codec: TextCodec,
    sink: OutputSink,
    comment_style: CommentStyle,
    started_at: Option<DateTime<Local>>,
    greeted: bool,
    today: Option<NaiveDate>,
}

impl ReportCore {
    /// Builds the core from a configuration.
    ///
    /// # Errors
    /// Fails if the configured encoding is unknown.
    pub fn new(
        config: &ReportConfig,
        default_filename: &str,
        comment_style: CommentStyle,
    ) -> Result<Self> {
        let codec = match &config.encoding {
            Some(label) => TextCodec::for_label(label)?,
            None => TextCodec::system_default(),
        };
        Ok(Self::with_sink(
            config.parts.clone(),
            codec,
            config.open_sink(default_filename),
            comment_style,
        ))
    }

    pub fn with_sink(
        parts: PartSelection,
        codec: TextCodec,
        sink: OutputSink,
        comment_style: CommentStyle,
    ) -> Self {
        Self {
            parts,
            spaces: HashMap::new(),
            max_indent: 0,
            counters: Counters::default(),
            codec,
            sink,
            comment_style,
            started_at: None,
            greeted: false,
            today: None,
        }
    }

    /// Computes the alignment table and records the session start time.
    pub fn start_output(&mut self) {
        let fields = self.parts.fields();
        self.max_indent = fields
            .iter()
            .map(|f| f.label().chars().count())
            .max()
            .unwrap_or(0)
            + 1;
        self.spaces = fields
            .iter()
            .map(|f| (*f, " ".repeat(self.max_indent - f.label().chars().count())))
            .collect();
        self.started_at = Some(Local::now());
        debug!(target: LOG_CHECK, "output started with {} parts", fields.len());
    }

    /// Updates the counters for one record and reports whether it should
    /// be rendered.
    ///
    /// Warnings are counted for every record; printed errors and warnings
    /// only for records with `do_print` set.
    pub fn account(&mut self, record: &UrlRecord, do_print: bool) -> bool {
        self.counters.number += 1;
        if !record.is_valid() {
            self.counters.errors += 1;
            if do_print {
                self.counters.errors_printed += 1;
            }
        }
        let num_warnings = record.warning_count();
        self.counters.warnings += num_warnings;
        if do_print {
            self.counters.warnings_printed += num_warnings;
        }
        do_print
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn has_part(&self, field: Field) -> bool {
        self.parts.contains(field)
    }

    pub fn parts(&self) -> &PartSelection {
        &self.parts
    }

    /// Localized label of a field.
    pub fn part(&self, field: Field) -> &'static str {
        field.label()
    }

    /// Localized label of a field identifier.
    ///
    /// # Errors
    /// Returns [`crate::ReportError::UnknownField`] for unknown identifiers.
    pub fn field_label(&self, id: &str) -> Result<&'static str> {
        field_label(id)
    }

    /// Padding that right-aligns the values after `field`'s label.
    /// Empty before [`ReportCore::start_output`] or for unselected fields.
    pub fn spaces(&self, field: Field) -> &str {
        self.spaces.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn max_indent(&self) -> usize {
        self.max_indent
    }

    /// Joins blocks with blank lines and wraps them to `width` columns,
    /// indenting continuation lines to the label column.
    pub fn wrap<S: AsRef<str>>(&self, lines: &[S], width: usize) -> String {
        let sep = format!("{LINESEP}{LINESEP}");
        let text = lines
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(&sep);
        let indent = " ".repeat(self.max_indent);
        wrap(&text, width, &indent).trim_start().to_string()
    }

    pub fn codec(&self) -> &TextCodec {
        &self.codec
    }

    /// Encodes and writes text.
    ///
    /// The first write of a session is preceded by the anniversary comment
    /// when the session runs on January 7.
    pub fn write(&mut self, text: &str) {
        if !self.greeted {
            self.greeted = true;
            let today = self.today.unwrap_or_else(|| Local::now().date_naive());
            if let Some(message) = birthday_message(today) {
                self.comment(&message);
            }
        }
        let bytes = self.codec.encode_str(text);
        self.sink.write(&bytes);
    }

    /// Suppresses the anniversary comment for formats that are read back
    /// by programs.
    pub fn skip_greeting(&mut self) {
        self.greeted = true;
    }

    /// Writes a line that must open the document, such as an XML
    /// declaration. The anniversary comment, if due, follows it.
    pub fn write_prologue(&mut self, line: &str) {
        for text in [line, LINESEP] {
            let bytes = self.codec.encode_str(text);
            self.sink.write(&bytes);
        }
    }

    #[cfg(test)]
    pub(crate) fn set_today(&mut self, today: NaiveDate) {
        self.today = Some(today);
    }

    pub fn writeln(&mut self, text: &str) {
        self.write(text);
        self.write(LINESEP);
    }

    /// Writes one comment line in this format's comment style.
    pub fn comment(&mut self, text: &str) {
        let line = self.comment_style.format(text);
        self.writeln(&line);
    }

    /// Session start time; set by [`ReportCore::start_output`].
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    /// Writes the program banner and the start time as comments.
    pub fn write_intro(&mut self) {
        self.comment(&format!("{} {}", crate::APP_NAME, crate::VERSION));
        let started = self.started_at.unwrap_or_else(Local::now);
        self.comment(&format!("Start checking at {}", format_time(&started)));
    }

    /// Seconds since the session started; zero before it started.
    pub fn elapsed_seconds(&self) -> f64 {
        self.started_at
            .map(|start| (Local::now() - start).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0)
    }

    /// Writes the stop time and elapsed time as a comment.
    pub fn write_outro(&mut self) {
        let elapsed = format_elapsed(self.elapsed_seconds());
        self.comment(&format!(
            "Stopped checking at {} ({elapsed})",
            format_time(&Local::now())
        ));
    }

    /// Best-effort flush of the sink.
    pub fn flush(&mut self) {
        self.sink.flush();
    }

    /// Flushes and closes the sink if this session owns it.
    pub fn close(&mut self) {
        self.sink.close();
        debug!(target: LOG_CHECK, "output closed");
    }
}

/// Timestamp format used in banners.
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S%z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Warning;
    use crate::sink::SharedStream;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn core_with_buffer(parts: PartSelection) -> (ReportCore, Arc<Mutex<Vec<u8>>>) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let stream: SharedStream = buffer.clone();
        let core = ReportCore::with_sink(
            parts,
            TextCodec::for_label("utf-8").unwrap(),
            OutputSink::shared(stream),
            CommentStyle::Hash,
        );
        (core, buffer)
    }

    fn output(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().clone()).unwrap()
    }

    #[test]
    fn test_spaces_for_url_and_result() {
        let parts = PartSelection::parse(["url", "result"]).unwrap();
        let (mut core, _) = core_with_buffer(parts);
        core.start_output();
        assert_eq!(core.max_indent(), 7);
        assert_eq!(core.spaces(Field::Url), "    ");
        assert_eq!(core.spaces(Field::Result), " ");
        assert_eq!(core.spaces(Field::Info), "");
    }

    #[test]
    fn test_spaces_align_all_fields() {
        let (mut core, _) = core_with_buffer(PartSelection::All);
        core.start_output();
        let max = Field::ALL.iter().map(|f| f.label().len()).max().unwrap();
        for field in Field::ALL {
            assert_eq!(
                core.spaces(field).len() + field.label().len(),
                max + 1,
                "misaligned {field}"
            );
        }
    }

    #[test]
    fn test_has_part() {
        let (core, _) = core_with_buffer(PartSelection::All);
        assert!(Field::ALL.iter().all(|f| core.has_part(*f)));

        let parts = PartSelection::parse(["url", "warning"]).unwrap();
        let (core, _) = core_with_buffer(parts);
        for field in Field::ALL {
            assert_eq!(
                core.has_part(field),
                matches!(field, Field::Url | Field::Warning)
            );
        }
    }

    #[test]
    fn test_account_suppressed_records() {
        let (mut core, _) = core_with_buffer(PartSelection::All);
        let valid = UrlRecord::new("http://a/", true);
        let mut invalid = UrlRecord::new("http://b/", false);
        invalid.warnings = vec![Warning::new("w1")];
        for _ in 0..3 {
            assert!(!core.account(&valid, false));
            assert!(!core.account(&invalid, false));
        }
        let counters = core.counters();
        assert_eq!(counters.number, 6);
        assert_eq!(counters.errors, 3);
        assert_eq!(counters.errors_printed, 0);
        assert_eq!(counters.warnings_printed, 0);
    }

    #[test]
    fn test_account_printed_invalid_record() {
        let (mut core, _) = core_with_buffer(PartSelection::All);
        let mut invalid = UrlRecord::new("http://b/", false);
        invalid.warnings = vec![Warning::new("w1"), Warning::new("w2"), Warning::new("w3")];
        assert!(core.account(&invalid, true));
        assert_eq!(
            core.counters(),
            Counters {
                number: 1,
                errors: 1,
                errors_printed: 1,
                warnings: 3,
                warnings_printed: 3,
            }
        );
    }

    #[test]
    fn test_wrap_indents_to_label_column() {
        let parts = PartSelection::parse(["url", "result"]).unwrap();
        let (mut core, _) = core_with_buffer(parts);
        core.start_output();
        let wrapped = core.wrap(&["alpha beta gamma", "delta"], 30);
        assert_eq!(
            wrapped,
            format!("alpha beta gamma{LINESEP}       delta")
        );
    }

    #[test]
    fn test_comment_styles() {
        assert_eq!(CommentStyle::Plain.format("x"), "x");
        assert_eq!(CommentStyle::Sql.format("x"), "-- x");
        assert_eq!(CommentStyle::Slash.format("x"), "// x");
        assert_eq!(CommentStyle::Markup.format("a--b"), "<!-- a- -b -->");
    }

    #[test]
    fn test_birthday_comment_precedes_first_write() {
        let (mut core, buffer) = core_with_buffer(PartSelection::All);
        core.today = NaiveDate::from_ymd_opt(2030, 1, 7);
        core.writeln("first");
        core.writeln("second");
        assert_eq!(
            output(&buffer),
            format!(
                "# Happy birthday for linkreport, I'm 30 years old today!{LINESEP}first{LINESEP}second{LINESEP}"
            )
        );
    }

    #[test]
    fn test_birthday_comment_follows_prologue() {
        let (mut core, buffer) = core_with_buffer(PartSelection::All);
        core.set_today(NaiveDate::from_ymd_opt(2030, 1, 7).unwrap());
        core.write_prologue("<?xml version=\"1.0\"?>");
        core.writeln("<root/>");
        assert_eq!(
            output(&buffer),
            format!(
                "<?xml version=\"1.0\"?>{LINESEP}# Happy birthday for linkreport, I'm 30 years old today!{LINESEP}<root/>{LINESEP}"
            )
        );
    }

    #[test]
    fn test_no_birthday_comment_on_other_days() {
        let (mut core, buffer) = core_with_buffer(PartSelection::All);
        core.today = NaiveDate::from_ymd_opt(2030, 3, 7);
        core.comment("banner");
        assert_eq!(output(&buffer), format!("# banner{LINESEP}"));
    }
}

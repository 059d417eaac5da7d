//! Configuration surface for renderers.
//!
//! A [`ReportConfig`] can be built in code or deserialized from JSON. Every
//! key is optional and unknown keys are ignored:
//!
//! ```json
//! {
//!     "parts": ["url", "result"],
//!     "encoding": "iso-8859-1",
//!     "fileoutput": true,
//!     "filename": "~/reports/out.csv",
//!     "csv": { "separator": ",", "quotechar": "'" },
//!     "sql": { "dbname": "links", "separator": ";" }
//! }
//! ```
//!
//! The output target is chosen in this order: a file when `fileoutput` is
//! set (falling back to the format's default file name), then an attached
//! [`SharedStream`], then stdout.

use crate::error::{ReportError, Result};
use crate::fields::Field;
use crate::sink::{OutputSink, SharedStream};
use crate::utils::expand_user;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which fields a renderer emits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum PartSelection {
    #[default]
    All,
    Only(BTreeSet<Field>),
}

impl PartSelection {
    /// Parses field identifiers; the special id `all` selects every field.
    ///
    /// # Errors
    /// Returns [`ReportError::UnknownField`] for any unregistered identifier.
    pub fn parse<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = BTreeSet::new();
        let mut all = false;
        for id in ids {
            match id.as_ref() {
                "all" => all = true,
                other => {
                    fields.insert(other.parse::<Field>()?);
                }
            }
        }
        Ok(if all {
            PartSelection::All
        } else {
            PartSelection::Only(fields)
        })
    }

    pub fn contains(&self, field: Field) -> bool {
        match self {
            PartSelection::All => true,
            PartSelection::Only(fields) => fields.contains(&field),
        }
    }

    /// The selected fields in registry order.
    pub fn fields(&self) -> Vec<Field> {
        match self {
            PartSelection::All => Field::ALL.to_vec(),
            PartSelection::Only(fields) => fields.iter().copied().collect(),
        }
    }
}

impl TryFrom<Vec<String>> for PartSelection {
    type Error = ReportError;

    fn try_from(ids: Vec<String>) -> Result<Self> {
        PartSelection::parse(ids)
    }
}

impl From<PartSelection> for Vec<String> {
    fn from(selection: PartSelection) -> Self {
        match selection {
            PartSelection::All => vec!["all".to_string()],
            PartSelection::Only(fields) => fields.iter().map(|f| f.as_str().to_string()).collect(),
        }
    }
}

/// Options of the CSV renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub separator: char,
    pub quotechar: char,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            separator: ';',
            quotechar: '"',
        }
    }
}

/// Options of the SQL renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlOptions {
    pub dbname: String,
    pub separator: String,
}

impl Default for SqlOptions {
    fn default() -> Self {
        Self {
            dbname: "linksdb".to_string(),
            separator: ";".to_string(),
        }
    }
}

/// Construction options shared by all renderers.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub parts: PartSelection,
    /// Output encoding label; the system default when absent.
    pub encoding: Option<String>,
    /// Write to a file instead of a stream.
    pub fileoutput: bool,
    /// File to write when `fileoutput` is set; `~` is expanded.
    pub filename: Option<PathBuf>,
    pub csv: CsvOptions,
    pub sql: SqlOptions,
    /// Externally owned stream, used when no file output is requested.
    #[serde(skip)]
    pub stream: Option<SharedStream>,
}

impl fmt::Debug for ReportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportConfig")
            .field("parts", &self.parts)
            .field("encoding", &self.encoding)
            .field("fileoutput", &self.fileoutput)
            .field("filename", &self.filename)
            .field("csv", &self.csv)
            .field("sql", &self.sql)
            .field("stream", &self.stream.as_ref().map(|_| "<shared>"))
            .finish()
    }
}

/// Where a renderer's output goes.
pub enum OutputTarget {
    File(PathBuf),
    Stream(SharedStream),
    Stdout,
}

impl ReportConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    /// Fails on malformed JSON or on an unknown field id in `parts`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read report configuration {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse report configuration {}", path.display()))
    }

    pub fn with_parts(mut self, parts: PartSelection) -> Self {
        self.parts = parts;
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Requests file output to `path`.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.fileoutput = true;
        self.filename = Some(path.into());
        self
    }

    /// Attaches a caller-owned stream.
    pub fn with_stream(mut self, stream: SharedStream) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Resolves the output target, using `default_filename` for file output
    /// without an explicit file name.
    pub fn output_target(&self, default_filename: &str) -> OutputTarget {
        if self.fileoutput {
            let filename = self
                .filename
                .clone()
                .unwrap_or_else(|| PathBuf::from(default_filename));
            OutputTarget::File(expand_user(&filename))
        } else if let Some(stream) = &self.stream {
            OutputTarget::Stream(stream.clone())
        } else {
            OutputTarget::Stdout
        }
    }

    /// Builds the sink for the resolved output target.
    pub fn open_sink(&self, default_filename: &str) -> OutputSink {
        match self.output_target(default_filename) {
            OutputTarget::File(path) => OutputSink::deferred(path),
            OutputTarget::Stream(stream) => OutputSink::shared(stream),
            OutputTarget::Stdout => OutputSink::stdout(),
        }
    }
}

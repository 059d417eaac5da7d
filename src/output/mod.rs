//! Pluggable output system for checked-link reports.
//!
//! Every output format implements the [`Renderer`] trait. A renderer is
//! driven through one session:
//!
//! 1. [`Renderer::start_output`] computes the label alignment and writes the
//!    format's header,
//! 2. [`Renderer::log_record`] is called once per record in discovery order,
//!    updating the counters and rendering records that should be printed,
//! 3. [`Renderer::end_output`] writes the footer and closes the output.
//!
//! Shared behavior (part selection, alignment, accounting, encoding and the
//! output sink) lives in [`ReportCore`], which each renderer composes.
//!
//! # Available Formats
//!
//! - **text**: aligned, human-readable listing
//! - **html**: standalone HTML page
//! - **csv**: rows for spreadsheet processing
//! - **sql**: `INSERT` statements
//! - **dot**, **gml**, **gxml**: link graphs
//! - **xml**: structured XML document
//! - **blacklist**: counts of repeatedly failing URLs
//! - **none**: no output

pub mod base;
pub mod blacklist;
pub mod csv;
pub mod dot;
pub mod gml;
mod graph;
pub mod gxml;
pub mod html;
mod markup;
pub mod none;
pub mod sql;
pub mod text;
pub mod xml;

pub use base::{CommentStyle, Counters, ReportCore};

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::record::UrlRecord;

/// A format-specific report writer.
pub trait Renderer: Send {
    /// Creates the renderer from a configuration.
    fn new(config: &ReportConfig) -> Result<Self>
    where
        Self: Sized;

    /// Registry name of the format, e.g. `"text"`.
    fn name(&self) -> &'static str;

    fn core(&self) -> &ReportCore;

    fn core_mut(&mut self) -> &mut ReportCore;

    /// Starts the session. Must be called once, before any record.
    fn start_output(&mut self) -> Result<()> {
        self.core_mut().start_output();
        Ok(())
    }

    /// Accounts for a record and renders it when `do_print` is set.
    fn log_record(&mut self, record: &UrlRecord, do_print: bool) -> Result<()> {
        if self.core_mut().account(record, do_print) {
            self.render(record)?;
        }
        Ok(())
    }

    /// Writes one record.
    fn render(&mut self, _record: &UrlRecord) -> Result<()> {
        Err(ReportError::NotImplemented {
            renderer: self.name(),
            operation: "render",
        })
    }

    /// Writes the footer and releases the output.
    fn end_output(&mut self) -> Result<()> {
        Err(ReportError::NotImplemented {
            renderer: self.name(),
            operation: "end_output",
        })
    }

    fn counters(&self) -> Counters {
        self.core().counters()
    }

    /// Writes a comment line in the format's comment syntax.
    fn comment(&mut self, text: &str) {
        self.core_mut().comment(text);
    }

    /// Best-effort flush; output failures are never reported.
    fn flush(&mut self) {
        self.core_mut().flush();
    }
}

impl std::fmt::Debug for dyn Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Builds a boxed renderer from a configuration.
pub type Constructor = fn(&ReportConfig) -> Result<Box<dyn Renderer>>;

fn construct<R: Renderer + 'static>(config: &ReportConfig) -> Result<Box<dyn Renderer>> {
    Ok(Box::new(R::new(config)?))
}

/// Format name to constructor table.
pub static RENDERERS: [(&str, Constructor); 10] = [
    ("text", construct::<text::TextRenderer>),
    ("html", construct::<html::HtmlRenderer>),
    ("gml", construct::<gml::GmlRenderer>),
    ("dot", construct::<dot::DotRenderer>),
    ("sql", construct::<sql::SqlRenderer>),
    ("csv", construct::<csv::CsvRenderer>),
    ("blacklist", construct::<blacklist::BlacklistRenderer>),
    ("gxml", construct::<gxml::GraphXmlRenderer>),
    ("xml", construct::<xml::XmlRenderer>),
    ("none", construct::<none::NoneRenderer>),
];

/// Looks up the constructor registered for a format name.
pub fn lookup(name: &str) -> Option<Constructor> {
    RENDERERS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, constructor)| *constructor)
}

/// Creates the renderer for a format name.
///
/// # Errors
/// Returns [`ReportError::UnknownFormat`] for unregistered names, or the
/// renderer's own construction error.
pub fn create(name: &str, config: &ReportConfig) -> Result<Box<dyn Renderer>> {
    let constructor = lookup(name).ok_or_else(|| ReportError::UnknownFormat(name.to_string()))?;
    constructor(config)
}

/// Registered format names.
pub fn names() -> impl Iterator<Item = &'static str> {
    RENDERERS.iter().map(|(name, _)| *name)
}

/// Comma separated, quoted list of format names for help texts.
pub fn logger_keys() -> String {
    names()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

//! Library crate for linkreport
//!
//! Renders the results of a link check into one of several output formats.
//! The checker hands over one [`UrlRecord`] at a time; the selected
//! [`Renderer`] formats it and writes it to its output sink.
//!
//! # Features
//!
//! - **Pluggable Formats**: text, HTML, CSV, SQL, DOT, GML, GraphXML, XML,
//!   blacklist and a silent renderer, looked up by name
//! - **Field Selection**: emit only the configured parts of each record
//! - **Fail-soft Output**: lazily created output files; I/O failures are
//!   logged and never abort the check
//! - **Output Encodings**: any WHATWG encoding, with character replacement
//!
//! # Modules
//!
//! - [`fields`]: field identifiers and their labels
//! - [`codec`]: output text encoding
//! - [`sink`]: output stream lifecycle
//! - [`config`]: renderer configuration
//! - [`record`]: checked-item records
//! - [`output`]: the renderer trait, shared core and concrete formats
//!
//! # Example
//!
//! ```rust
//! use linkreport::{ReportConfig, UrlRecord, output};
//!
//! let config = ReportConfig::from_json(r#"{"parts": ["url", "result"]}"#)?;
//! let mut renderer = output::create("none", &config)?;
//! renderer.start_output()?;
//! renderer.log_record(&UrlRecord::new("http://example.com/", true), true)?;
//! renderer.end_output()?;
//! assert_eq!(renderer.counters().number, 1);
//! # Ok::<(), linkreport::ReportError>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod fields;
pub mod output;
pub mod record;
pub mod sink;
pub mod utils;

pub use codec::TextCodec;
pub use config::{PartSelection, ReportConfig};
pub use error::ReportError;
pub use fields::Field;
pub use output::{Counters, Renderer};
pub use record::{UrlRecord, Warning};
pub use sink::{OutputSink, SharedStream};

/// Program name used in report banners.
pub const APP_NAME: &str = "linkreport";

/// Version used in report banners.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logging target for output problems during a check.
pub const LOG_CHECK: &str = "linkreport::check";

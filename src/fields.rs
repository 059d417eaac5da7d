//! Field registry: the closed set of record attributes a renderer may emit,
//! together with their human-readable labels.
//!
//! The label table is a process-wide read-only resource. A translation hook
//! may be installed once, before the first label is looked up; after that the
//! labels never change.

use crate::error::{ReportError, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A named attribute of a checked record that can be selected for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    RealUrl,
    CacheKey,
    Result,
    Base,
    Name,
    ParentUrl,
    Extern,
    Info,
    Warning,
    DlTime,
    DlSize,
    CheckTime,
    Url,
}

impl Field {
    /// Every field, in registry order.
    pub const ALL: [Field; 13] = [
        Field::RealUrl,
        Field::CacheKey,
        Field::Result,
        Field::Base,
        Field::Name,
        Field::ParentUrl,
        Field::Extern,
        Field::Info,
        Field::Warning,
        Field::DlTime,
        Field::DlSize,
        Field::CheckTime,
        Field::Url,
    ];

    /// Returns the identifier used in configuration, e.g. `"parenturl"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::RealUrl => "realurl",
            Field::CacheKey => "cachekey",
            Field::Result => "result",
            Field::Base => "base",
            Field::Name => "name",
            Field::ParentUrl => "parenturl",
            Field::Extern => "extern",
            Field::Info => "info",
            Field::Warning => "warning",
            Field::DlTime => "dltime",
            Field::DlSize => "dlsize",
            Field::CheckTime => "checktime",
            Field::Url => "url",
        }
    }

    /// Untranslated label of this field.
    fn raw_label(&self) -> &'static str {
        match self {
            Field::RealUrl => "Real URL",
            Field::CacheKey => "Cache key",
            Field::Result => "Result",
            Field::Base => "Base",
            Field::Name => "Name",
            Field::ParentUrl => "Parent URL",
            Field::Extern => "Extern",
            Field::Info => "Info",
            Field::Warning => "Warning",
            Field::DlTime => "D/L Time",
            Field::DlSize => "D/L Size",
            Field::CheckTime => "Check Time",
            Field::Url => "URL",
        }
    }

    /// Localized label of this field.
    pub fn label(&self) -> &'static str {
        labels().get(self).map(String::as_str).unwrap_or(self.raw_label())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ReportError::UnknownField(s.to_string()))
    }
}

/// Translation function applied to every label when the table is built.
pub type Translator = fn(&str) -> String;

static LABELS: OnceCell<HashMap<Field, String>> = OnceCell::new();

fn build_labels(translate: Option<Translator>) -> HashMap<Field, String> {
    Field::ALL
        .iter()
        .map(|field| {
            let raw = field.raw_label();
            let label = match translate {
                Some(translate) => translate(raw),
                None => raw.to_string(),
            };
            (*field, label)
        })
        .collect()
}

fn labels() -> &'static HashMap<Field, String> {
    LABELS.get_or_init(|| build_labels(None))
}

/// Installs the label translation hook.
///
/// Returns `false` if the label table has already been built, by an earlier
/// hook or by a label lookup, in which case the labels stay as they are.
pub fn set_translator(translator: Translator) -> bool {
    LABELS.set(build_labels(Some(translator))).is_ok()
}

/// Looks up the localized label of a field identifier.
///
/// # Errors
/// Returns [`ReportError::UnknownField`] if `id` is not a registered field.
pub fn field_label(id: &str) -> Result<&'static str> {
    id.parse::<Field>().map(|field| field.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_label() {
        for field in Field::ALL {
            assert!(!field.label().is_empty(), "{field} has no label");
            assert_eq!(field_label(field.as_str()).unwrap(), field.label());
        }
    }

    #[test]
    fn test_unknown_field_faults() {
        let err = field_label("colour").unwrap_err();
        assert!(matches!(err, ReportError::UnknownField(ref id) if id == "colour"));
        assert!(field_label("URL").is_err());
    }

    #[test]
    fn test_field_ids_roundtrip() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>().unwrap(), field);
        }
        let parsed: Field = serde_json::from_str("\"parenturl\"").unwrap();
        assert_eq!(parsed, Field::ParentUrl);
    }

    #[test]
    fn test_translator_after_first_lookup_is_refused() {
        assert_eq!(Field::Url.label(), "URL");
        assert!(!set_translator(|raw| raw.to_uppercase()));
        assert_eq!(Field::Name.label(), "Name");
    }

    #[test]
    fn test_known_labels() {
        assert_eq!(Field::Url.label(), "URL");
        assert_eq!(Field::Result.label(), "Result");
        assert_eq!(Field::DlTime.label(), "D/L Time");
    }
}

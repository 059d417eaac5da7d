//! Data structures for checked items handed to renderers.
//!
//! A [`UrlRecord`] is produced by the checker for every link it visits and
//! passed to the active renderer in discovery order. Renderers only read it.

use serde::{Deserialize, Serialize};

/// A warning attached to a checked item.
///
/// # Fields
/// * `tag` - Optional machine-readable warning category
/// * `message` - Human-readable warning text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    #[serde(default)]
    pub tag: Option<String>,
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            tag: None,
            message: message.into(),
        }
    }

    pub fn tagged(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            message: message.into(),
        }
    }
}

/// The result of checking one URL.
///
/// # Fields
/// * `url` - The URL as found in the parent document
/// * `name` - Link text or name attribute
/// * `parent_url` - URL of the document containing the link
/// * `base_ref` - Base reference in effect for the link
/// * `real_url` - URL after resolution and redirects
/// * `cache_key` - Key identifying the checked resource
/// * `valid` - Whether the check succeeded
/// * `result` - Human-readable check result
/// * `is_extern` - Whether the URL was considered external
/// * `info` - Informational messages
/// * `warnings` - Warnings raised during the check
/// * `dltime` - Download time in seconds
/// * `dlsize` - Download size in bytes
/// * `checktime` - Check time in seconds
/// * `line`, `column` - Position of the link in the parent document
/// * `cached` - Whether the result came from the check cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlRecord {
    pub url: Option<String>,
    pub name: String,
    pub parent_url: Option<String>,
    pub base_ref: Option<String>,
    pub real_url: Option<String>,
    pub cache_key: Option<String>,
    pub valid: bool,
    pub result: String,
    #[serde(rename = "extern")]
    pub is_extern: Option<bool>,
    pub info: Vec<String>,
    pub warnings: Vec<Warning>,
    pub dltime: Option<f64>,
    pub dlsize: Option<u64>,
    pub checktime: f64,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub cached: bool,
}

impl UrlRecord {
    /// Creates a record for `url` with the given validity and everything else empty.
    pub fn new(url: impl Into<String>, valid: bool) -> Self {
        Self {
            url: Some(url.into()),
            valid,
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn warning_count(&self) -> u64 {
        self.warnings.len() as u64
    }

    /// Key identifying this record's node in graph output: the cache key,
    /// falling back to the URL.
    pub fn node_key(&self) -> &str {
        self.cache_key
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or_default()
    }

    /// Warning messages, one per line.
    pub fn warning_text(&self) -> String {
        self.warnings
            .iter()
            .map(|w| w.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_json_defaults() {
        let record: UrlRecord = serde_json::from_str(
            r#"{"url": "http://example.com/", "valid": false, "extern": true,
                "warnings": [{"message": "slow"}, {"tag": "http-moved", "message": "moved"}]}"#,
        )
        .unwrap();
        assert_eq!(record.url.as_deref(), Some("http://example.com/"));
        assert!(!record.is_valid());
        assert_eq!(record.is_extern, Some(true));
        assert_eq!(record.warning_count(), 2);
        assert_eq!(record.warnings[1].tag.as_deref(), Some("http-moved"));
        assert!(record.info.is_empty());
    }

    #[test]
    fn test_node_key_prefers_cache_key() {
        let mut record = UrlRecord::new("http://example.com/a", true);
        assert_eq!(record.node_key(), "http://example.com/a");
        record.cache_key = Some("example.com/a".to_string());
        assert_eq!(record.node_key(), "example.com/a");
    }
}

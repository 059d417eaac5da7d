//! Blacklist renderer.
//!
//! Keeps a table of URLs that failed, with the number of consecutive runs in
//! which they failed. An existing blacklist file is loaded at construction;
//! URLs that check valid again are dropped from it. The table is written at
//! the end of the session as `count url` lines.
//!
//! Unlike the other formats, every record updates the table, whether or not
//! it is printed.

use super::{CommentStyle, Renderer, ReportCore};
use crate::LOG_CHECK;
use crate::config::{OutputTarget, ReportConfig};
use crate::error::Result;
use crate::record::UrlRecord;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Default blacklist location when file output is requested without a name.
pub const DEFAULT_FILENAME: &str = "~/.linkreport/blacklist";

pub struct BlacklistRenderer {
    core: ReportCore,
    blacklist: BTreeMap<String, u64>,
}

impl BlacklistRenderer {
    /// Failure counts by URL.
    pub fn blacklist(&self) -> &BTreeMap<String, u64> {
        &self.blacklist
    }
}

/// Parses `count url` lines; malformed lines are skipped.
fn parse_blacklist(contents: &str) -> BTreeMap<String, u64> {
    contents
        .lines()
        .filter_map(|line| {
            let (count, url) = line.trim().split_once(' ')?;
            let count = count.parse::<u64>().ok()?;
            let url = url.trim();
            (!url.is_empty()).then(|| (url.to_string(), count))
        })
        .collect()
}

fn read_blacklist(path: &Path) -> BTreeMap<String, u64> {
    if !path.is_file() {
        return BTreeMap::new();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_blacklist(&contents),
        Err(err) => {
            warn!(target: LOG_CHECK, "Could not read blacklist {}: {err}", path.display());
            BTreeMap::new()
        }
    }
}

impl Renderer for BlacklistRenderer {
    fn new(config: &ReportConfig) -> Result<Self> {
        let blacklist = match config.output_target(DEFAULT_FILENAME) {
            OutputTarget::File(path) => read_blacklist(&path),
            _ => BTreeMap::new(),
        };
        let mut core = ReportCore::new(config, DEFAULT_FILENAME, CommentStyle::Plain)?;
        core.skip_greeting();
        Ok(Self { core, blacklist })
    }

    fn name(&self) -> &'static str {
        "blacklist"
    }

    fn core(&self) -> &ReportCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ReportCore {
        &mut self.core
    }

    fn log_record(&mut self, record: &UrlRecord, do_print: bool) -> Result<()> {
        self.core.account(record, do_print);
        self.render(record)
    }

    fn render(&mut self, record: &UrlRecord) -> Result<()> {
        let key = record.node_key();
        if record.valid {
            self.blacklist.remove(key);
        } else {
            *self.blacklist.entry(key.to_string()).or_insert(0) += 1;
        }
        Ok(())
    }

    fn end_output(&mut self) -> Result<()> {
        let lines: Vec<String> = self
            .blacklist
            .iter()
            .map(|(url, count)| format!("{count} {url}"))
            .collect();
        // an empty write still truncates a blacklist that became empty
        self.core.write("");
        for line in lines {
            self.core.writeln(&line);
        }
        self.core.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blacklist_skips_garbage() {
        let table = parse_blacklist("2 http://a/\nnonsense\nx http://b/\n1 http://c/ \n");
        assert_eq!(table.len(), 2);
        assert_eq!(table["http://a/"], 2);
        assert_eq!(table["http://c/"], 1);
    }
}

//! Renderer that produces no output. Counters are still kept.

use super::{CommentStyle, Renderer, ReportCore};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::record::UrlRecord;

pub struct NoneRenderer {
    core: ReportCore,
}

impl Renderer for NoneRenderer {
    fn new(config: &ReportConfig) -> Result<Self> {
        Ok(Self {
            core: ReportCore::new(config, "linkreport-out.none", CommentStyle::Plain)?,
        })
    }

    fn name(&self) -> &'static str {
        "none"
    }

    fn core(&self) -> &ReportCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ReportCore {
        &mut self.core
    }

    fn render(&mut self, _record: &UrlRecord) -> Result<()> {
        Ok(())
    }

    fn end_output(&mut self) -> Result<()> {
        self.core.close();
        Ok(())
    }
}

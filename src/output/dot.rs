//! Graphviz DOT renderer.
//!
//! Nodes are written as records arrive; edges to parents are collected and
//! written before the closing brace.

use super::graph::{GraphNodes, Node, node_label};
use super::{CommentStyle, Renderer, ReportCore};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::fields::Field;
use crate::record::UrlRecord;

/// Quotes a DOT string.
fn dotquote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
}

pub struct DotRenderer {
    core: ReportCore,
    nodes: GraphNodes,
}

fn write_node(core: &mut ReportCore, node: &Node) {
    core.writeln(&format!("  {} [", node.id));
    core.writeln(&format!("    label={},", dotquote(node_label(node))));
    if core.has_part(Field::RealUrl) {
        core.writeln(&format!("    href={},", dotquote(&node.url)));
    }
    if let Some(dltime) = node.dltime.filter(|_| core.has_part(Field::DlTime)) {
        core.writeln(&format!("    dltime={dltime},"));
    }
    if let Some(dlsize) = node.dlsize.filter(|_| core.has_part(Field::DlSize)) {
        core.writeln(&format!("    dlsize={dlsize},"));
    }
    if node.checktime > 0.0 && core.has_part(Field::CheckTime) {
        core.writeln(&format!("    checktime={},", node.checktime));
    }
    if let Some(is_extern) = node.is_extern.filter(|_| core.has_part(Field::Extern)) {
        core.writeln(&format!("    extern={},", u8::from(is_extern)));
    }
    core.writeln("  ];");
}

impl Renderer for DotRenderer {
    fn new(config: &ReportConfig) -> Result<Self> {
        Ok(Self {
            core: ReportCore::new(config, "linkreport-out.dot", CommentStyle::Slash)?,
            nodes: GraphNodes::default(),
        })
    }

    fn name(&self) -> &'static str {
        "dot"
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
        self.core.writeln("digraph G {");
        self.core.writeln("  graph [");
        let charset = format!("    charset={},", dotquote(self.core.codec().name()));
        self.core.writeln(&charset);
        self.core.writeln("  ];");
        self.core.flush();
        Ok(())
    }

    fn render(&mut self, record: &UrlRecord) -> Result<()> {
        if let Some(node) = self.nodes.add(record) {
            write_node(&mut self.core, node);
            self.core.flush();
        }
        Ok(())
    }

    fn end_output(&mut self) -> Result<()> {
        for (parent, child) in self.nodes.edges() {
            self.core.writeln(&format!("  {} -> {} [", parent.id, child.id));
            self.core.writeln(&format!("    label={},", dotquote(node_label(child))));
            if self.core.has_part(Field::Result) {
                self.core.writeln(&format!("    valid={},", u8::from(child.valid)));
            }
            self.core.writeln("  ];");
        }
        self.core.writeln("}");
        self.core.write_outro();
        self.core.close();
        Ok(())
    }
}

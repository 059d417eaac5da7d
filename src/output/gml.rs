//! GML (Graph Modelling Language) renderer.

use super::graph::{GraphNodes, Node, node_label};
use super::{CommentStyle, Renderer, ReportCore};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::fields::Field;
use crate::record::UrlRecord;

/// Quotes a GML string; GML strings cannot contain double quotes.
fn gmlquote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "&quot;").replace('\n', " "))
}

pub struct GmlRenderer {
    core: ReportCore,
    nodes: GraphNodes,
}

fn write_node(core: &mut ReportCore, node: &Node) {
    core.writeln("  node [");
    core.writeln(&format!("    id {}", node.id));
    core.writeln(&format!("    label {}", gmlquote(node_label(node))));
    if core.has_part(Field::RealUrl) {
        core.writeln(&format!("    url {}", gmlquote(&node.url)));
    }
    if let Some(dltime) = node.dltime.filter(|_| core.has_part(Field::DlTime)) {
        core.writeln(&format!("    dltime {dltime}"));
    }
    if let Some(dlsize) = node.dlsize.filter(|_| core.has_part(Field::DlSize)) {
        core.writeln(&format!("    dlsize {dlsize}"));
    }
    if node.checktime > 0.0 && core.has_part(Field::CheckTime) {
        core.writeln(&format!("    checktime {}", node.checktime));
    }
    if let Some(is_extern) = node.is_extern.filter(|_| core.has_part(Field::Extern)) {
        core.writeln(&format!("    extern {}", u8::from(is_extern)));
    }
    core.writeln("  ]");
}

impl Renderer for GmlRenderer {
    fn new(config: &ReportConfig) -> Result<Self> {
        Ok(Self {
            core: ReportCore::new(config, "linkreport-out.gml", CommentStyle::Hash)?,
            nodes: GraphNodes::default(),
        })
    }

    fn name(&self) -> &'static str {
        "gml"
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
        self.core.writeln("graph [");
        self.core.writeln("  directed 1");
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
            self.core.writeln("  edge [");
            self.core.writeln(&format!("    source {}", parent.id));
            self.core.writeln(&format!("    target {}", child.id));
            if self.core.has_part(Field::Result) {
                self.core.writeln(&format!("    valid {}", u8::from(child.valid)));
            }
            self.core.writeln("  ]");
        }
        self.core.writeln("]");
        self.core.write_outro();
        self.core.close();
        Ok(())
    }
}

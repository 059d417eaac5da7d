//! GraphXML renderer.

use super::graph::{GraphNodes, Node, node_label};
use super::markup::{element, xml_declaration};
use super::{CommentStyle, Renderer, ReportCore};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::fields::Field;
use crate::record::UrlRecord;

pub struct GraphXmlRenderer {
    core: ReportCore,
    nodes: GraphNodes,
}

fn write_node(core: &mut ReportCore, node: &Node) {
    core.writeln(&format!("  <node name=\"{}\">", node.id));
    core.writeln(&format!("    {}", element("label", &[], node_label(node))));
    core.writeln("    <data>");
    if core.has_part(Field::RealUrl) {
        core.writeln(&format!("      {}", element("url", &[], &node.url)));
    }
    if let Some(dltime) = node.dltime.filter(|_| core.has_part(Field::DlTime)) {
        core.writeln(&format!("      {}", element("dltime", &[], &dltime.to_string())));
    }
    if let Some(dlsize) = node.dlsize.filter(|_| core.has_part(Field::DlSize)) {
        core.writeln(&format!("      {}", element("dlsize", &[], &dlsize.to_string())));
    }
    if node.checktime > 0.0 && core.has_part(Field::CheckTime) {
        let checktime = node.checktime.to_string();
        core.writeln(&format!("      {}", element("checktime", &[], &checktime)));
    }
    if let Some(is_extern) = node.is_extern.filter(|_| core.has_part(Field::Extern)) {
        let value = u8::from(is_extern).to_string();
        core.writeln(&format!("      {}", element("extern", &[], &value)));
    }
    core.writeln("    </data>");
    core.writeln("  </node>");
}

impl Renderer for GraphXmlRenderer {
    fn new(config: &ReportConfig) -> Result<Self> {
        Ok(Self {
            core: ReportCore::new(config, "linkreport-out.gxml", CommentStyle::Markup)?,
            nodes: GraphNodes::default(),
        })
    }

    fn name(&self) -> &'static str {
        "gxml"
    }

    fn core(&self) -> &ReportCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ReportCore {
        &mut self.core
    }

    fn start_output(&mut self) -> Result<()> {
        self.core.start_output();
        let declaration = xml_declaration(self.core.codec().name());
        self.core.write_prologue(&declaration);
        self.core.write_intro();
        self.core.writeln("<GraphXML>");
        self.core.writeln("<graph isDirected=\"true\">");
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
            self.core.writeln(&format!(
                "  <edge source=\"{}\" target=\"{}\">",
                parent.id, child.id
            ));
            if self.core.has_part(Field::Result) {
                let valid = u8::from(child.valid).to_string();
                self.core
                    .writeln(&format!("    <data>{}</data>", element("valid", &[], &valid)));
            }
            self.core.writeln("  </edge>");
        }
        self.core.writeln("</graph>");
        self.core.writeln("</GraphXML>");
        self.core.write_outro();
        self.core.close();
        Ok(())
    }
}

//! Escaping shared by the HTML and XML renderers.

/// Escapes text for element content and attribute values.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// XML declaration for a document in `encoding`.
pub fn xml_declaration(encoding: &str) -> String {
    format!("<?xml version=\"1.0\" encoding=\"{}\"?>", escape(encoding))
}

/// Writes `<tag attrs>text</tag>` with escaped content.
pub fn element(tag: &str, attrs: &[(&str, String)], text: &str) -> String {
    let mut out = format!("<{tag}");
    for (name, value) in attrs {
        out.push_str(&format!(" {name}=\"{}\"", escape(value)));
    }
    out.push_str(&format!(">{}</{tag}>", escape(text)));
    out
}

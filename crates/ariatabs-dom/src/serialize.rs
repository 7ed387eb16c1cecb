//! Markup output

use std::fmt::Write;

use crate::document::{Document, NodeData, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text children are written verbatim. `noscript` is included
/// because markup is parsed with scripting enabled.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "script",
    "style",
    "xmp",
];

impl Document {
    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            self.write_node(*child, &mut out);
        }
        out
    }

    /// Serialize a single node and its subtree
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if self.contains(id) {
            self.write_node(id, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.index()].data {
            NodeData::Root => {
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
            }
            NodeData::Doctype(name) => {
                let _ = write!(out, "<!DOCTYPE {}>", name);
            }
            NodeData::Comment(text) => {
                let _ = write!(out, "<!--{}-->", text);
            }
            NodeData::Text(text) => {
                let raw = self
                    .parent(id)
                    .and_then(|parent| self.tag_name(parent))
                    .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name));
                if raw {
                    out.push_str(text);
                } else {
                    escape_text(text, out);
                }
            }
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for (key, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&element.name.as_str()) {
                    return;
                }

                for child in self.children(id) {
                    self.write_node(*child, out);
                }
                let _ = write!(out, "</{}>", element.name);
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            other => out.push(other),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_fragment() {
        let markup = r##"<ul class="tl_list"><li><a href="#a">A &amp; B</a></li></ul><img src="x.png">"##;
        let doc = Document::parse_fragment(markup);
        assert_eq!(doc.to_html(), markup);
    }

    #[test]
    fn test_serialize_reflects_mutation() {
        let mut doc = Document::parse_fragment(r#"<section id="a"><h2>A</h2></section>"#);
        let panel = doc.element_by_id("a").unwrap();
        doc.set_attribute(panel, "role", "tabpanel").unwrap();
        doc.set_attribute(panel, "data-note", "say \"hi\"").unwrap();

        assert_eq!(
            doc.outer_html(panel),
            r#"<section id="a" role="tabpanel" data-note="say &quot;hi&quot;"><h2>A</h2></section>"#
        );
    }

    #[test]
    fn test_script_text_is_not_escaped() {
        let doc = Document::parse_fragment("<script>if (a < b) {}</script>");
        assert_eq!(doc.to_html(), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_noscript_fallback_survives() {
        let markup = r#"<noscript><img src="x.png"></noscript>"#;
        let doc = Document::parse_fragment(markup);
        assert_eq!(doc.to_html(), markup);
    }

    #[test]
    fn test_raw_text_elements_are_not_escaped() {
        let doc = Document::parse_fragment("<xmp><b>a & b</b></xmp><style>a > b {}</style>");
        assert_eq!(doc.to_html(), "<xmp><b>a & b</b></xmp><style>a > b {}</style>");
    }
}

//! Markup import via `scraper`

use scraper::{Html, Node};

use crate::document::{Document, ElementData, NodeData};

impl Document {
    /// Parse a complete HTML document. The doctype and the `<html>` element
    /// become children of the root.
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        Self::from_html(&html, true)
    }

    /// Parse a markup fragment. Top-level nodes become children of the root.
    pub fn parse_fragment(markup: &str) -> Self {
        let html = Html::parse_fragment(markup);
        Self::from_html(&html, false)
    }

    fn from_html(html: &Html, keep_wrapper: bool) -> Self {
        let mut doc = Document::new();
        let root = doc.root();

        // A fragment is wrapped in a synthetic <html> element that is skipped
        let top = if keep_wrapper {
            html.tree.root()
        } else {
            *html.root_element()
        };

        // Preorder walk; children are pushed reversed so node ids follow
        // document order.
        let mut stack: Vec<_> = top.children().map(|child| (child, root)).collect();
        stack.reverse();

        while let Some((source, parent)) = stack.pop() {
            let data = match source.value() {
                Node::Element(element) => NodeData::Element(ElementData {
                    name: element.name().to_string(),
                    attrs: element
                        .attrs()
                        .map(|(key, value)| (key.to_string(), value.to_string()))
                        .collect(),
                }),
                Node::Text(text) => NodeData::Text(String::from(&**text)),
                Node::Comment(comment) => NodeData::Comment(String::from(&**comment)),
                Node::Doctype(doctype) => NodeData::Doctype(doctype.name().to_string()),
                _ => continue,
            };

            let is_element = matches!(data, NodeData::Element(_));
            let id = match doc.append(parent, data) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(error = %e, "Dropped node during import");
                    continue;
                }
            };

            if is_element {
                let children: Vec<_> = source.children().collect();
                for child in children.into_iter().rev() {
                    stack.push((child, id));
                }
            }
        }

        tracing::debug!(nodes = doc.len(), "Parsed markup");
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        let doc = Document::parse_fragment(
            r##"<ul class="tl_list"><li><a href="#a" class="ON">A</a></li></ul><section id="a"><h2>A</h2></section>"##,
        );

        let lists = doc.elements_by_class_name("tl_list");
        assert_eq!(lists.len(), 1);
        assert_eq!(doc.parent(lists[0]), Some(doc.root()));

        let links = doc.elements_by_tag_name(lists[0], "a");
        assert_eq!(links.len(), 1);
        assert_eq!(doc.attribute(links[0], "href"), Some("#a"));
        assert!(doc.has_class(links[0], "ON"));

        let panel = doc.element_by_id("a").unwrap();
        assert_eq!(doc.tag_name(panel), Some("section"));
        assert_eq!(doc.text_content(panel), "A");
    }

    #[test]
    fn test_parse_document_keeps_wrapper() {
        let doc = Document::parse("<!DOCTYPE html><html><body><p id=x>hi</p></body></html>");
        let html = doc.first_element_child(doc.root()).unwrap();
        assert_eq!(doc.tag_name(html), Some("html"));

        let p = doc.element_by_id("x").unwrap();
        assert!(doc.is_ancestor_of(html, p));
    }

    #[test]
    fn test_parse_document_keeps_doctype() {
        let doc = Document::parse("<!DOCTYPE html><html><body><p>x</p></body></html>");
        assert_eq!(doc.children(doc.root()).len(), 2);
        assert_eq!(
            doc.to_html(),
            "<!DOCTYPE html><html><head></head><body><p>x</p></body></html>"
        );
    }

    #[test]
    fn test_node_ids_follow_document_order() {
        let doc = Document::parse_fragment("<div><p>one</p><p>two</p></div><span></span>");
        let order = doc.descendants(doc.root());
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }
}

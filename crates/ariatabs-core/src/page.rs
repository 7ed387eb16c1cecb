//! Page state
//!
//! A page owns one document behind a lock together with the controller that
//! initialized it. Every interaction goes through the lock, so handlers run
//! to completion one at a time.

use parking_lot::RwLock;
use std::sync::Arc;

use ariatabs_dom::{Document, Event, Key, NodeId};
use ariatabs_tabs::{GroupSnapshot, InitReport, TabListConfig, TabListController};

use crate::error::CoreError;
use crate::Result;

pub struct Page {
    document: Arc<RwLock<Document>>,
    controller: TabListController,
    report: InitReport,
}

impl Page {
    /// Parse `markup` as a fragment and initialize its tab lists
    pub fn load(markup: &str, config: TabListConfig) -> Self {
        Self::from_document(Document::parse_fragment(markup), config)
    }

    /// Parse `markup` as a full HTML document and initialize its tab lists
    pub fn load_document(markup: &str, config: TabListConfig) -> Self {
        Self::from_document(Document::parse(markup), config)
    }

    pub fn from_document(mut document: Document, config: TabListConfig) -> Self {
        let controller = TabListController::new(config);
        let report = controller.initialize(&mut document);

        Self {
            document: Arc::new(RwLock::new(document)),
            controller,
            report,
        }
    }

    pub fn controller(&self) -> &TabListController {
        &self.controller
    }

    /// Result of the initial setup
    pub fn report(&self) -> &InitReport {
        &self.report
    }

    /// Run the controller again over the current document
    pub fn reinitialize(&self) -> InitReport {
        let mut document = self.document.write();
        self.controller.initialize(&mut document)
    }

    pub fn with_document<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Document) -> T,
    {
        let guard = self.document.read();
        f(&guard)
    }

    pub fn with_document_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Document) -> T,
    {
        let mut guard = self.document.write();
        f(&mut guard)
    }

    /// Dispatch an event and return it with its final flags
    pub fn dispatch(&self, event: Event) -> Event {
        self.document.write().dispatch_event(event)
    }

    /// Resolve an element by its `id` attribute
    pub fn element(&self, id: &str) -> Result<NodeId> {
        self.with_document(|doc| doc.element_by_id(id))
            .ok_or_else(|| CoreError::ElementNotFound(id.to_string()))
    }

    pub fn click(&self, id: &str) -> Result<Event> {
        let node = self.element(id)?;
        Ok(self.dispatch(Event::click(node)))
    }

    pub fn hover(&self, id: &str) -> Result<Event> {
        let node = self.element(id)?;
        Ok(self.dispatch(Event::mouse_over(node)))
    }

    pub fn key_down(&self, id: &str, key: Key) -> Result<Event> {
        let node = self.element(id)?;
        Ok(self.dispatch(Event::key_down(node, key)))
    }

    /// `id` of the selected tab in the container with the given `id`
    pub fn selected_tab_id(&self, container_id: &str) -> Result<Option<String>> {
        let container = self.element(container_id)?;
        Ok(self.with_document(|doc| {
            self.controller
                .selected_tab(doc, container)
                .and_then(|tab| doc.element_id(tab).map(str::to_string))
        }))
    }

    /// `id` of the focused element, if it has one
    pub fn focused_id(&self) -> Option<String> {
        self.with_document(|doc| {
            doc.focused()
                .and_then(|node| doc.element_id(node).map(str::to_string))
        })
    }

    pub fn snapshot(&self) -> Vec<GroupSnapshot> {
        self.with_document(|doc| self.controller.snapshot(doc))
    }

    pub fn html(&self) -> String {
        self.with_document(|doc| doc.to_html())
    }
}

impl Clone for Page {
    fn clone(&self) -> Self {
        Self {
            document: Arc::clone(&self.document),
            controller: self.controller.clone(),
            report: self.report.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r##"<ul class="tl_list" id="list"><li><a href="#a">A</a></li><li><a href="#b">B</a></li></ul>
<section id="a"><h2 id="a-heading">A</h2></section><section id="b"><h2 id="b-heading">B</h2></section>"##;

    #[test]
    fn test_load_and_click() {
        let page = Page::load(MARKUP, TabListConfig::default());
        assert_eq!(page.report().groups, 1);
        assert_eq!(page.selected_tab_id("list").unwrap().as_deref(), Some("tab-a"));

        let event = page.click("tab-b").unwrap();
        assert!(event.default_prevented());
        assert_eq!(page.selected_tab_id("list").unwrap().as_deref(), Some("tab-b"));
        assert_eq!(page.focused_id().as_deref(), Some("b-heading"));
    }

    #[test]
    fn test_unknown_element() {
        let page = Page::load(MARKUP, TabListConfig::default());
        assert!(matches!(
            page.click("nope"),
            Err(CoreError::ElementNotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_clones_share_the_document() {
        let page = Page::load(MARKUP, TabListConfig::default());
        let other = page.clone();
        other.key_down("tab-a", Key::ArrowRight).unwrap();
        assert_eq!(page.selected_tab_id("list").unwrap().as_deref(), Some("tab-b"));
        assert_eq!(page.focused_id().as_deref(), Some("tab-b"));
    }

    #[test]
    fn test_reinitialize_reports_existing_groups() {
        let page = Page::load(MARKUP, TabListConfig::default());
        let report = page.reinitialize();
        assert_eq!(report.groups, 0);
        assert_eq!(report.already_initialized, 1);
    }
}

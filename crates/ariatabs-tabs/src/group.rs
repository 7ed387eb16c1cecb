//! Tab groups
//!
//! A [`TabGroup`] is the side-table for one tab list container: the ordered
//! tabs, their panels and positions, keyed by element handle. It is also the
//! event listener registered on each of its tabs, so every event is resolved
//! against the group that owns the tab and never reaches another group.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use ariatabs_dom::{Document, DocumentId, Event, EventKind, EventListener, EventType, NodeId};

use crate::command::{Direction, TabCommand};
use crate::config::TabListConfig;
use crate::error::TabListError;
use crate::state::TabState;
use crate::Result;

const LISTENED_EVENTS: [EventType; 3] = [
    EventType::Click,
    EventType::KeyDown,
    EventType::MouseOver,
];

/// One tab resolved during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabMetadata {
    /// The link element acting as the tab
    pub node: NodeId,
    /// The element the link's fragment resolved to
    pub panel: NodeId,
    /// `id` of the panel, also the source of the tab's own `id`
    pub panel_id: String,
    /// Zero-based index within the group
    pub position: usize,
}

impl TabMetadata {
    pub fn tab_id(&self) -> String {
        format!("tab-{}", self.panel_id)
    }
}

#[derive(Debug)]
pub struct TabGroup {
    document: DocumentId,
    container: NodeId,
    tabs: Vec<TabMetadata>,
    index: HashMap<NodeId, usize>,
    hoverable_class: String,
    discarded: usize,
}

impl TabGroup {
    /// Set up the tab list rooted at `container`.
    ///
    /// Writes the ARIA contract onto the container, its tabs and their
    /// panels, consumes the "on" marker and selects the default tab.
    /// Listeners are attached separately with [`TabGroup::attach`].
    pub fn setup(
        document: &mut Document,
        container: NodeId,
        config: &TabListConfig,
    ) -> Result<Self> {
        if !document.is_element(container) {
            return Err(TabListError::NotAContainer(container));
        }
        document.set_attribute(container, "role", "tablist")?;

        let candidates = candidates(document, container, &config.tab_list_class);
        let mut tabs: Vec<TabMetadata> = Vec::with_capacity(candidates.len());
        let mut discarded = 0;
        let mut default_position = None;

        for link in candidates {
            let panel_id = match document.attribute(link, "href").and_then(fragment) {
                Some(id) => id.to_string(),
                None => {
                    tracing::debug!(link = %link, "Skipping link without fragment target");
                    discarded += 1;
                    continue;
                }
            };

            let panel = match document.element_by_id(&panel_id) {
                Some(panel) if panel != link => panel,
                _ => {
                    tracing::debug!(
                        link = %link,
                        panel_id = %panel_id,
                        "Skipping link with no panel"
                    );
                    discarded += 1;
                    continue;
                }
            };

            let tab = TabMetadata {
                node: link,
                panel,
                panel_id,
                position: tabs.len(),
            };
            initialise_aria(document, container, &tab)?;

            if document.has_class(link, &config.on_class) {
                if default_position.is_none() {
                    default_position = Some(tab.position);
                }
                // The marker only declares initial state
                document.remove_class(link, &config.on_class)?;
                document.remove_class(panel, &config.on_class)?;
            }

            tabs.push(tab);
        }

        let index = tabs.iter().map(|tab| (tab.node, tab.position)).collect();
        let group = Self {
            document: document.id(),
            container,
            tabs,
            index,
            hoverable_class: config.hoverable_class.clone(),
            discarded,
        };

        group.deselect_all(document);
        if let Some(tab) = group.tabs.get(default_position.unwrap_or(0)) {
            group.select(document, tab);
        }

        tracing::debug!(
            container = %container,
            tabs = group.tabs.len(),
            discarded,
            "Tab list set up"
        );

        Ok(group)
    }

    /// Register this group as the click, keydown and mouseover listener on
    /// each of its tabs. Returns the number of listeners registered.
    pub fn attach(self: &Arc<Self>, document: &mut Document) -> usize {
        let listener: Arc<dyn EventListener> = self.clone();
        let mut registered = 0;
        for tab in &self.tabs {
            for event_type in LISTENED_EVENTS {
                if document.add_event_listener(tab.node, event_type, Arc::clone(&listener)) {
                    registered += 1;
                }
            }
        }
        registered
    }

    // === Accessors ===

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn tabs(&self) -> &[TabMetadata] {
        &self.tabs
    }

    pub fn tab(&self, position: usize) -> Option<&TabMetadata> {
        self.tabs.get(position)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Candidates dropped because their panel could not be resolved
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn position_of(&self, node: NodeId) -> Option<usize> {
        self.index.get(&node).copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    /// Checked on every hover so the marker can be toggled at runtime
    pub fn is_hoverable(&self, document: &Document) -> bool {
        document.has_class(self.container, &self.hoverable_class)
    }

    /// The first tab whose `aria-selected` is `true`
    pub fn selected(&self, document: &Document) -> Option<&TabMetadata> {
        self.tabs
            .iter()
            .find(|tab| TabState::of(document, tab.node).is_selected())
    }

    // === State transitions ===

    pub fn select(&self, document: &mut Document, tab: &TabMetadata) {
        self.apply(document, tab, TabState::Selected);
    }

    pub fn deselect(&self, document: &mut Document, tab: &TabMetadata) {
        self.apply(document, tab, TabState::Deselected);
    }

    pub fn deselect_all(&self, document: &mut Document) {
        for tab in &self.tabs {
            self.deselect(document, tab);
        }
    }

    fn apply(&self, document: &mut Document, tab: &TabMetadata, state: TabState) {
        // Panels that vanished from the document leave the tab untouched
        if !document.is_element(tab.panel) {
            return;
        }
        if let Err(e) = write_state(document, tab, state) {
            tracing::warn!(
                tab = %tab.node,
                state = %state,
                error = %e,
                "Failed to apply tab state"
            );
        }
    }

    /// Select the tab at `position` and move focus into its panel
    pub fn activate(&self, document: &mut Document, position: usize) -> bool {
        let Some(tab) = self.tabs.get(position) else {
            return false;
        };

        self.deselect_all(document);
        self.select(document, tab);

        if let Some(target) = document.first_element_child(tab.panel) {
            let _ = document.focus(target);
        }

        tracing::debug!(container = %self.container, position, "Tab activated");
        true
    }

    /// Move selection one step from `from` and focus the newly selected tab
    pub fn navigate(
        &self,
        document: &mut Document,
        from: usize,
        direction: Direction,
    ) -> Option<usize> {
        let target = direction.step(from, self.tabs.len())?;
        let tab = &self.tabs[target];

        self.deselect_all(document);
        self.select(document, tab);
        let _ = document.focus(tab.node);

        tracing::debug!(container = %self.container, from, to = target, "Tab navigated");
        Some(target)
    }

    pub fn snapshot(&self, document: &Document) -> GroupSnapshot {
        let tabs: Vec<TabSnapshot> = self
            .tabs
            .iter()
            .map(|tab| TabSnapshot {
                position: tab.position,
                id: document.element_id(tab.node).map(str::to_string),
                panel_id: tab.panel_id.clone(),
                state: TabState::of(document, tab.node),
                panel_hidden: document.attribute(tab.panel, "aria-hidden") != Some("false"),
                focused: document.focused() == Some(tab.node),
            })
            .collect();

        GroupSnapshot {
            container_id: document.element_id(self.container).map(str::to_string),
            hoverable: self.is_hoverable(document),
            selected: tabs.iter().position(|tab| tab.state.is_selected()),
            discarded: self.discarded,
            tabs,
        }
    }
}

impl EventListener for TabGroup {
    fn handle_event(&self, document: &mut Document, event: &mut Event) {
        let Some(position) = event.current_target().and_then(|node| self.position_of(node)) else {
            return;
        };

        let command = match event.kind() {
            EventKind::Click => Some(TabCommand::Activate),
            EventKind::KeyDown(key) => TabCommand::from_key(key),
            EventKind::MouseOver if self.is_hoverable(document) => Some(TabCommand::Activate),
            EventKind::MouseOver => None,
        };

        match command {
            Some(TabCommand::Activate) => {
                event.prevent_default();
                self.activate(document, position);
            }
            Some(TabCommand::Move(direction)) => {
                self.navigate(document, position, direction);
            }
            None => {}
        }
    }
}

/// Read-only view of a group for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSnapshot {
    pub container_id: Option<String>,
    pub hoverable: bool,
    pub selected: Option<usize>,
    pub discarded: usize,
    pub tabs: Vec<TabSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSnapshot {
    pub position: usize,
    pub id: Option<String>,
    pub panel_id: String,
    pub state: TabState,
    pub panel_hidden: bool,
    pub focused: bool,
}

fn write_state(
    document: &mut Document,
    tab: &TabMetadata,
    state: TabState,
) -> ariatabs_dom::Result<()> {
    document.set_attribute(tab.panel, "aria-hidden", state.panel_hidden())?;
    document.set_attribute(tab.node, "aria-selected", state.aria_selected())?;
    document.set_attribute(tab.node, "tabindex", state.tabindex())
}

/// Links under `container` in document order, excluding links owned by a
/// nested tab list
fn candidates(document: &Document, container: NodeId, list_class: &str) -> Vec<NodeId> {
    document
        .elements_by_tag_name(container, "a")
        .into_iter()
        .filter(|link| {
            document
                .ancestors(*link)
                .find(|node| document.has_class(*node, list_class))
                == Some(container)
        })
        .collect()
}

/// Text after the last `#`, if any
fn fragment(href: &str) -> Option<&str> {
    href.rsplit_once('#')
        .map(|(_, fragment)| fragment)
        .filter(|fragment| !fragment.is_empty())
}

fn initialise_aria(document: &mut Document, container: NodeId, tab: &TabMetadata) -> Result<()> {
    let tab_id = tab.tab_id();

    if let Some(parent) = document.parent(tab.node) {
        if parent != container && document.is_element(parent) {
            document.set_attribute(parent, "role", "presentation")?;
        }
    }
    document.set_attribute(tab.node, "id", &tab_id)?;
    document.set_attribute(tab.node, "role", "tab")?;
    document.set_attribute(tab.node, "aria-controls", &tab.panel_id)?;

    document.set_attribute(tab.panel, "role", "tabpanel")?;
    document.set_attribute(tab.panel, "aria-labelledby", &tab_id)?;

    // First child is the landing point when the tab is activated; tabindex 0
    // keeps it reachable in both directions
    if let Some(first) = document.first_element_child(tab.panel) {
        document.set_attribute(first, "tabindex", "0")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariatabs_dom::Key;

    const THREE_TABS: &str = r##"
        <ul class="tl_list" id="list">
            <li><a href="#a">A</a></li>
            <li><a href="#b" class="ON">B</a></li>
            <li><a href="#c">C</a></li>
        </ul>
        <section id="a"><h2>A</h2><p>a</p></section>
        <section id="b" class="ON"><h2>B</h2></section>
        <section id="c"><h2>C</h2></section>
    "##;

    fn setup(markup: &str) -> (Document, Arc<TabGroup>) {
        let mut doc = Document::parse_fragment(markup);
        let container = doc.elements_by_class_name("tl_list")[0];
        let group = TabGroup::setup(&mut doc, container, &TabListConfig::default()).unwrap();
        let group = Arc::new(group);
        group.attach(&mut doc);
        (doc, group)
    }

    fn node(doc: &Document, id: &str) -> NodeId {
        doc.element_by_id(id).unwrap()
    }

    fn selected_positions(doc: &Document, group: &TabGroup) -> Vec<usize> {
        group
            .tabs()
            .iter()
            .filter(|tab| TabState::of(doc, tab.node).is_selected())
            .map(|tab| tab.position)
            .collect()
    }

    #[test]
    fn test_basic_setup() {
        let (doc, group) = setup(THREE_TABS);
        assert_eq!(group.len(), 3);
        assert_eq!(doc.attribute(group.container(), "role"), Some("tablist"));

        let b = node(&doc, "tab-b");
        assert_eq!(doc.attribute(b, "aria-selected"), Some("true"));
        assert_eq!(doc.attribute(b, "tabindex"), Some("0"));
        assert!(!doc.has_class(b, "ON"));

        for other in ["tab-a", "tab-c"] {
            let tab = node(&doc, other);
            assert_eq!(doc.attribute(tab, "aria-selected"), Some("false"));
            assert_eq!(doc.attribute(tab, "tabindex"), Some("-1"));
        }

        let panel_b = node(&doc, "b");
        assert_eq!(doc.attribute(panel_b, "aria-hidden"), Some("false"));
        assert!(!doc.has_class(panel_b, "ON"));
        assert_eq!(doc.attribute(node(&doc, "a"), "aria-hidden"), Some("true"));
        assert_eq!(doc.attribute(node(&doc, "c"), "aria-hidden"), Some("true"));
    }

    #[test]
    fn test_aria_wiring() {
        let (doc, group) = setup(THREE_TABS);
        let tab = group.tab(0).unwrap();

        assert_eq!(doc.attribute(tab.node, "role"), Some("tab"));
        assert_eq!(doc.attribute(tab.node, "aria-controls"), Some("a"));
        assert_eq!(doc.attribute(tab.panel, "role"), Some("tabpanel"));
        assert_eq!(doc.attribute(tab.panel, "aria-labelledby"), Some("tab-a"));

        let heading = doc.first_element_child(tab.panel).unwrap();
        assert_eq!(doc.attribute(heading, "tabindex"), Some("0"));

        let item = doc.parent(tab.node).unwrap();
        assert_eq!(doc.attribute(item, "role"), Some("presentation"));
        assert_eq!(doc.listeners_on(tab.node), 3);
    }

    #[test]
    fn test_default_is_first_tab_without_marker() {
        let (doc, group) = setup(
            r##"<div class="tl_list"><a href="#x">X</a><a href="#y">Y</a></div>
                <div id="x"><p>x</p></div><div id="y"><p>y</p></div>"##,
        );
        assert_eq!(selected_positions(&doc, &group), vec![0]);
        // Links sitting directly in the container keep the tablist role there
        assert_eq!(doc.attribute(group.container(), "role"), Some("tablist"));
    }

    #[test]
    fn test_first_marked_tab_wins_and_all_markers_removed() {
        let (doc, group) = setup(
            r##"<div class="tl_list"><a href="#x">X</a><a href="#y" class="ON">Y</a><a href="#z" class="ON">Z</a></div>
                <div id="x"></div><div id="y" class="ON"></div><div id="z" class="ON"></div>"##,
        );
        assert_eq!(selected_positions(&doc, &group), vec![1]);
        assert!(doc.elements_by_class_name("ON").is_empty());
    }

    #[test]
    fn test_malformed_entry_is_discarded() {
        let (doc, group) = setup(
            r##"<ul class="tl_list"><li><a href="#a">A</a></li><li><a href="#missing" id="bad">M</a></li><li><a href="page.html">P</a></li></ul>
                <section id="a"><h2>A</h2></section>"##,
        );
        assert_eq!(group.len(), 1);
        assert_eq!(group.discarded(), 2);

        let bad = node(&doc, "bad");
        assert!(doc.attribute(bad, "role").is_none());
        assert_eq!(doc.listeners_on(bad), 0);
        assert_eq!(selected_positions(&doc, &group), vec![0]);
    }

    #[test]
    fn test_marker_on_discarded_link_is_ignored() {
        let (doc, group) = setup(
            r##"<div class="tl_list"><a href="#gone" class="ON">G</a><a href="#x">X</a><a href="#y">Y</a></div>
                <div id="x"></div><div id="y"></div>"##,
        );
        assert_eq!(group.len(), 2);
        assert_eq!(selected_positions(&doc, &group), vec![0]);
    }

    #[test]
    fn test_panel_without_children() {
        let (mut doc, group) = setup(
            r##"<div class="tl_list"><a href="#x">X</a><a href="#y">Y</a></div><div id="x"></div><div id="y">text only</div>"##,
        );
        let y = group.tab(1).unwrap().node;
        doc.dispatch_event(Event::click(y));
        assert_eq!(selected_positions(&doc, &group), vec![1]);
        assert!(doc.focused().is_none());
    }

    #[test]
    fn test_click_activates_and_focuses_panel() {
        let (mut doc, group) = setup(THREE_TABS);
        let c = node(&doc, "tab-c");

        let event = doc.dispatch_event(Event::click(c));
        assert!(event.default_prevented());
        assert_eq!(selected_positions(&doc, &group), vec![2]);

        let heading = doc.first_element_child(node(&doc, "c")).unwrap();
        assert_eq!(doc.focused(), Some(heading));
        assert_eq!(doc.attribute(node(&doc, "b"), "aria-hidden"), Some("true"));
    }

    #[test]
    fn test_click_on_link_child_uses_owning_tab() {
        let (mut doc, group) = setup(
            r##"<div class="tl_list"><a href="#x"><span id="inner">X</span></a><a href="#y">Y</a></div>
                <div id="x"><p>x</p></div><div id="y"><p>y</p></div>"##,
        );
        doc.dispatch_event(Event::click(group.tab(1).unwrap().node));
        doc.dispatch_event(Event::click(node(&doc, "inner")));
        assert_eq!(selected_positions(&doc, &group), vec![0]);
    }

    #[test]
    fn test_arrow_wrap() {
        let (mut doc, group) = setup(
            r##"<div class="tl_list"><a href="#x">X</a><a href="#y">Y</a><a href="#z">Z</a></div>
                <div id="x"></div><div id="y"></div><div id="z"></div>"##,
        );
        let first = group.tab(0).unwrap().node;
        let last = group.tab(2).unwrap().node;

        doc.dispatch_event(Event::key_down(first, Key::ArrowLeft));
        assert_eq!(selected_positions(&doc, &group), vec![2]);
        assert_eq!(doc.focused(), Some(last));

        doc.dispatch_event(Event::key_down(last, Key::ArrowDown));
        assert_eq!(selected_positions(&doc, &group), vec![0]);
        assert_eq!(doc.focused(), Some(first));
    }

    #[test]
    fn test_other_keys_do_nothing() {
        let (mut doc, group) = setup(THREE_TABS);
        let before = doc.to_html();
        let b = node(&doc, "tab-b");

        let event = doc.dispatch_event(Event::key_down(b, Key::Other("Tab".into())));
        assert!(!event.default_prevented());
        assert_eq!(doc.to_html(), before);
        assert_eq!(selected_positions(&doc, &group), vec![1]);
    }

    #[test]
    fn test_enter_activates() {
        let (mut doc, group) = setup(THREE_TABS);
        let a = node(&doc, "tab-a");
        let event = doc.dispatch_event(Event::key_down(a, Key::Enter));
        assert!(event.default_prevented());
        assert_eq!(selected_positions(&doc, &group), vec![0]);
    }

    #[test]
    fn test_hover_gating() {
        let (mut doc, group) = setup(THREE_TABS);
        let a = node(&doc, "tab-a");
        let before = doc.to_html();

        doc.dispatch_event(Event::mouse_over(a));
        assert_eq!(doc.to_html(), before);

        doc.add_class(group.container(), "tl-hoverable").unwrap();
        let event = doc.dispatch_event(Event::mouse_over(a));
        assert!(event.default_prevented());
        assert_eq!(selected_positions(&doc, &group), vec![0]);

        // Same result as clicking
        let (mut clicked, _) = setup(THREE_TABS);
        clicked.add_class(clicked.elements_by_class_name("tl_list")[0], "tl-hoverable").unwrap();
        let a = node(&clicked, "tab-a");
        clicked.dispatch_event(Event::click(a));
        assert_eq!(clicked.to_html(), doc.to_html());
    }

    #[test]
    fn test_select_and_deselect_are_idempotent() {
        let (mut doc, group) = setup(THREE_TABS);
        let b = group.tab(1).unwrap().clone();
        let a = group.tab(0).unwrap().clone();
        let before = doc.to_html();

        group.select(&mut doc, &b);
        group.deselect(&mut doc, &a);
        assert_eq!(doc.to_html(), before);
    }

    #[test]
    fn test_nested_lists_are_independent() {
        let mut doc = Document::parse_fragment(
            r##"<div class="tl_list" id="outer">
                    <a href="#o1">O1</a><a href="#o2">O2</a>
                    <section id="o1"><h2>O1</h2>
                        <div class="tl_list" id="inner"><a href="#i1">I1</a><a href="#i2">I2</a></div>
                        <section id="i1"><h3>I1</h3></section><section id="i2"><h3>I2</h3></section>
                    </section>
                    <section id="o2"><h2>O2</h2></section>
                </div>"##,
        );
        let config = TabListConfig::default();
        let outer_node = node(&doc, "outer");
        let inner_node = node(&doc, "inner");
        let outer = Arc::new(TabGroup::setup(&mut doc, outer_node, &config).unwrap());
        let inner = Arc::new(TabGroup::setup(&mut doc, inner_node, &config).unwrap());
        outer.attach(&mut doc);
        inner.attach(&mut doc);
        assert_eq!(outer.len(), 2);
        assert_eq!(inner.len(), 2);

        let i2 = node(&doc, "tab-i2");
        doc.dispatch_event(Event::click(i2));
        assert_eq!(selected_positions(&doc, &inner), vec![1]);
        assert_eq!(selected_positions(&doc, &outer), vec![0]);

        doc.dispatch_event(Event::key_down(i2, Key::ArrowRight));
        assert_eq!(selected_positions(&doc, &inner), vec![0]);
        assert_eq!(selected_positions(&doc, &outer), vec![0]);
    }

    #[test]
    fn test_snapshot() {
        let (doc, group) = setup(THREE_TABS);
        let snapshot = group.snapshot(&doc);
        assert_eq!(snapshot.container_id.as_deref(), Some("list"));
        assert_eq!(snapshot.selected, Some(1));
        assert!(!snapshot.hoverable);
        assert_eq!(snapshot.tabs[1].id.as_deref(), Some("tab-b"));
        assert!(!snapshot.tabs[1].panel_hidden);
        assert!(snapshot.tabs[0].panel_hidden);
    }

    #[test]
    fn test_fragment() {
        assert_eq!(fragment("#a"), Some("a"));
        assert_eq!(fragment("page.html#x#y"), Some("y"));
        assert_eq!(fragment("page.html#"), None);
        assert_eq!(fragment("page.html"), None);
    }
}

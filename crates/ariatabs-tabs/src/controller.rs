//! Tab List Controller
//!
//! Discovers tab list containers and owns the resulting groups.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use ariatabs_dom::{Document, DocumentId, NodeId};

use crate::config::TabListConfig;
use crate::group::{GroupSnapshot, TabGroup};

/// Outcome of one [`TabListController::initialize`] call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    /// The host lacked a required capability; nothing was touched
    pub inert: bool,
    /// Groups set up by this call
    pub groups: usize,
    /// Tabs across those groups
    pub tabs: usize,
    /// Links dropped because their panel did not resolve
    pub discarded: usize,
    /// Containers already set up by an earlier call
    pub already_initialized: usize,
    /// Containers whose setup failed
    pub failed: usize,
}

/// Owns the groups of every document it initializes.
///
/// Groups are kept until [`TabListController::forget`] is called for their
/// document, so a controller shared across documents should forget each one
/// when it is discarded.
pub struct TabListController {
    config: TabListConfig,
    /// Set-up groups per document, in setup order
    groups: Arc<RwLock<HashMap<DocumentId, Vec<Arc<TabGroup>>>>>,
}

impl TabListController {
    pub fn new(config: TabListConfig) -> Self {
        Self {
            config: config.normalized(),
            groups: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &TabListConfig {
        &self.config
    }

    /// Set up every tab list container in `document`.
    ///
    /// Does nothing on hosts without the required capabilities. Containers
    /// this controller already set up are skipped, so calling it again only
    /// picks up containers it has not seen.
    pub fn initialize(&self, document: &mut Document) -> InitReport {
        let mut report = InitReport::default();

        if !document.capabilities().is_supported() {
            tracing::info!(
                capabilities = ?document.capabilities(),
                "Host lacks required capabilities, tab lists left inert"
            );
            report.inert = true;
            return report;
        }

        for container in document.elements_by_class_name(&self.config.tab_list_class) {
            if self.group(document, container).is_some() {
                tracing::debug!(container = %container, "Tab list already initialized");
                report.already_initialized += 1;
                continue;
            }

            match TabGroup::setup(document, container, &self.config) {
                Ok(group) => {
                    let group = Arc::new(group);
                    group.attach(document);

                    report.groups += 1;
                    report.tabs += group.len();
                    report.discarded += group.discarded();

                    self.groups
                        .write()
                        .entry(document.id())
                        .or_default()
                        .push(group);
                }
                Err(e) => {
                    tracing::warn!(container = %container, error = %e, "Skipping tab list");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            groups = report.groups,
            tabs = report.tabs,
            discarded = report.discarded,
            "Tab lists initialized"
        );

        report
    }

    /// Number of groups set up across all documents
    pub fn group_count(&self) -> usize {
        self.groups.read().values().map(Vec::len).sum()
    }

    /// Groups belonging to `document`, in setup order
    pub fn groups(&self, document: &Document) -> Vec<Arc<TabGroup>> {
        self.groups
            .read()
            .get(&document.id())
            .cloned()
            .unwrap_or_default()
    }

    /// The group rooted at `container`
    pub fn group(&self, document: &Document, container: NodeId) -> Option<Arc<TabGroup>> {
        self.find(document, |group| group.container() == container)
    }

    /// The group owning the tab element `tab`
    pub fn group_of(&self, document: &Document, tab: NodeId) -> Option<Arc<TabGroup>> {
        self.find(document, |group| group.contains(tab))
    }

    /// Drop every group of `document` and return how many were held.
    ///
    /// Listeners already registered on the document keep their groups alive
    /// until the document itself is dropped.
    pub fn forget(&self, document: &Document) -> usize {
        let removed = self
            .groups
            .write()
            .remove(&document.id())
            .map(|groups| groups.len())
            .unwrap_or(0);
        tracing::debug!(document = ?document.id(), groups = removed, "Forgot document");
        removed
    }

    fn find<F>(&self, document: &Document, predicate: F) -> Option<Arc<TabGroup>>
    where
        F: Fn(&TabGroup) -> bool,
    {
        self.groups
            .read()
            .get(&document.id())?
            .iter()
            .find(|group| predicate(group))
            .cloned()
    }

    /// Currently selected tab element of the group rooted at `container`
    pub fn selected_tab(&self, document: &Document, container: NodeId) -> Option<NodeId> {
        let group = self.group(document, container)?;
        group.selected(document).map(|tab| tab.node)
    }

    /// Activate `tab` as if it had been clicked. Returns `false` when the
    /// element is not a tab this controller set up.
    pub fn activate(&self, document: &mut Document, tab: NodeId) -> bool {
        let Some(group) = self.group_of(document, tab) else {
            return false;
        };
        match group.position_of(tab) {
            Some(position) => group.activate(document, position),
            None => false,
        }
    }

    pub fn snapshot(&self, document: &Document) -> Vec<GroupSnapshot> {
        self.groups(document)
            .iter()
            .map(|group| group.snapshot(document))
            .collect()
    }
}

impl Default for TabListController {
    fn default() -> Self {
        Self::new(TabListConfig::default())
    }
}

impl Clone for TabListController {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            groups: Arc::clone(&self.groups),
        }
    }
}

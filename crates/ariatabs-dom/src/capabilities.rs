//! Host capability gate
//!
//! A document advertises which host primitives it provides. Consumers that
//! need all of them check [`Capabilities::is_supported`] once and stay inert
//! otherwise.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Listener registration and event dispatch
    pub event_listeners: bool,
    /// Class list inspection and mutation
    pub class_list: bool,
    /// Bulk element lookup by class, tag or id
    pub query_selector: bool,
}

impl Capabilities {
    /// Every primitive available.
    pub const fn full() -> Self {
        Self {
            event_listeners: true,
            class_list: true,
            query_selector: true,
        }
    }

    /// A host without any of the required primitives.
    pub const fn legacy() -> Self {
        Self {
            event_listeners: false,
            class_list: false,
            query_selector: false,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.event_listeners && self.class_list && self.query_selector
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::full()
    }
}

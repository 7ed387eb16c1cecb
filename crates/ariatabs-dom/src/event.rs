//! Events and listener dispatch
//!
//! Dispatch follows the DOM bubbling order: listeners on the target run
//! first, then those on each ancestor up to the root, until a listener stops
//! propagation. Listeners receive the document mutably so they can update
//! attributes and focus in place.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::document::{Document, NodeId};
use crate::error::DomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Click,
    KeyDown,
    MouseOver,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Click => "click",
            EventType::KeyDown => "keydown",
            EventType::MouseOver => "mouseover",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keyboard keys, named after `KeyboardEvent.key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Enter,
    Space,
    Other(String),
}

impl Key {
    /// Map a legacy `keyCode` value
    pub fn from_key_code(code: u32) -> Self {
        match code {
            13 => Key::Enter,
            32 => Key::Space,
            37 => Key::ArrowLeft,
            38 => Key::ArrowUp,
            39 => Key::ArrowRight,
            40 => Key::ArrowDown,
            other => Key::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowUp => "ArrowUp",
            Key::ArrowRight => "ArrowRight",
            Key::ArrowDown => "ArrowDown",
            Key::Enter => "Enter",
            Key::Space => " ",
            Key::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Space => write!(f, "Space"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl std::str::FromStr for Key {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == " " {
            return Ok(Key::Space);
        }
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomError::UnknownKey(s.to_string()));
        }
        let key = match trimmed.to_lowercase().as_str() {
            "arrowleft" | "left" => Key::ArrowLeft,
            "arrowup" | "up" => Key::ArrowUp,
            "arrowright" | "right" => Key::ArrowRight,
            "arrowdown" | "down" => Key::ArrowDown,
            "enter" | "return" => Key::Enter,
            "space" | "spacebar" => Key::Space,
            _ => Key::Other(trimmed.to_string()),
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Click,
    KeyDown(Key),
    MouseOver,
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Click => EventType::Click,
            EventKind::KeyDown(_) => EventType::KeyDown,
            EventKind::MouseOver => EventType::MouseOver,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    target: NodeId,
    current_target: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn click(target: NodeId) -> Self {
        Self::new(EventKind::Click, target)
    }

    pub fn key_down(target: NodeId, key: Key) -> Self {
        Self::new(EventKind::KeyDown(key), target)
    }

    pub fn mouse_over(target: NodeId) -> Self {
        Self::new(EventKind::MouseOver, target)
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// Node the event was dispatched to
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose listener is currently running
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Receiver of dispatched events
pub trait EventListener: Send + Sync {
    fn handle_event(&self, document: &mut Document, event: &mut Event);
}

#[derive(Clone)]
pub(crate) struct Registration {
    event_type: EventType,
    listener: Arc<dyn EventListener>,
}

impl Document {
    /// Register `listener` for `event_type` on `node`.
    ///
    /// Returns `false` without registering when the document lacks listener
    /// support or the node is not an element.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: EventType,
        listener: Arc<dyn EventListener>,
    ) -> bool {
        if !self.capabilities().event_listeners || !self.is_element(node) {
            return false;
        }
        self.listeners.entry(node).or_default().push(Registration {
            event_type,
            listener,
        });
        true
    }

    /// Number of listeners registered on `node`
    pub fn listeners_on(&self, node: NodeId) -> usize {
        self.listeners.get(&node).map(Vec::len).unwrap_or(0)
    }

    /// Total listeners registered in the document
    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Dispatch `event` along the bubbling path and return it with its final
    /// flags
    pub fn dispatch_event(&mut self, mut event: Event) -> Event {
        if !self.contains(event.target) {
            return event;
        }

        let mut path = vec![event.target];
        path.extend(self.ancestors(event.target));

        for node in path {
            let listeners: Vec<Arc<dyn EventListener>> = match self.listeners.get(&node) {
                Some(regs) => regs
                    .iter()
                    .filter(|r| r.event_type == event.event_type())
                    .map(|r| Arc::clone(&r.listener))
                    .collect(),
                None => continue,
            };

            event.current_target = Some(node);
            for listener in listeners {
                listener.handle_event(self, &mut event);
            }
            if event.propagation_stopped {
                break;
            }
        }

        event.current_target = None;
        event
    }
}

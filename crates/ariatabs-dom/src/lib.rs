//! ariatabs Document Model
//!
//! A small arena-backed element tree standing in for the host page:
//! - Elements carry attributes and a class list (stored in `class`)
//! - Focus is tracked per document
//! - Listeners are registered per node and events bubble target → root
//!
//! Markup is read with `scraper` and written back with [`Document::to_html`].

mod capabilities;
mod document;
mod error;
mod event;
mod parse;
mod serialize;

pub use capabilities::Capabilities;
pub use document::{Ancestors, Document, DocumentId, NodeId};
pub use error::DomError;
pub use event::{Event, EventKind, EventListener, EventType, Key};

pub type Result<T> = std::result::Result<T, DomError>;

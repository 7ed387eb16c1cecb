//! ariatabs Core
//!
//! Host-side coordination: a [`Page`] pairs a shared document with the
//! controller that set it up, and [`Config`] carries file-backed settings.

mod config;
mod error;
mod page;

pub use config::Config;
pub use error::CoreError;
pub use page::Page;

// Re-export the document and tab list layers
pub use ariatabs_dom::{
    Capabilities, Document, DocumentId, DomError, Event, EventKind, EventListener, EventType, Key,
    NodeId,
};
pub use ariatabs_tabs::{
    Direction, GroupSnapshot, InitReport, TabCommand, TabGroup, TabListConfig, TabListController,
    TabListError, TabMetadata, TabSnapshot, TabState,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    init_logging_with("info");
}

/// Initialize logging, using `default_level` when `RUST_LOG` is unset
pub fn init_logging_with(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Hosts may have installed a subscriber already
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

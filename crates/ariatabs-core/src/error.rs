//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Document error: {0}")]
    Dom(#[from] ariatabs_dom::DomError),

    #[error("Tab list error: {0}")]
    TabList(#[from] ariatabs_tabs::TabListError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Element not found: #{0}")]
    ElementNotFound(String),
}

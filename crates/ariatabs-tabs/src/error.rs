//! Tab list error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabListError {
    #[error("Document error: {0}")]
    Dom(#[from] ariatabs_dom::DomError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Not a tab list container: {0}")]
    NotAContainer(ariatabs_dom::NodeId),
}

//! ariatabs Tab Lists
//!
//! Turns marked-up link lists into accessible tab interfaces:
//! - Containers carrying the list class become `tablist`s
//! - Links whose fragment resolves to an element become `tab`s
//! - Selection follows the roving tabindex pattern
//!
//! Selection state is never cached; it is read from and written to the
//! document's ARIA attributes.

mod command;
mod config;
mod controller;
mod error;
mod group;
mod state;

pub use command::{Direction, TabCommand};
pub use config::TabListConfig;
pub use controller::{InitReport, TabListController};
pub use error::TabListError;
pub use group::{GroupSnapshot, TabGroup, TabMetadata, TabSnapshot};
pub use state::TabState;

pub type Result<T> = std::result::Result<T, TabListError>;

//! Keyboard commands on a focused tab
//!
//! - Left / Up → previous tab, wrapping to the last
//! - Right / Down → next tab, wrapping to the first
//! - Enter / Space → activate the focused tab
//!
//! Every other key maps to no command.

use ariatabs_dom::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Position reached from `position` in a group of `len` tabs
    pub fn step(self, position: usize, len: usize) -> Option<usize> {
        if len == 0 || position >= len {
            return None;
        }
        let last = len - 1;
        let target = match self {
            Direction::Previous if position == 0 => last,
            Direction::Previous => position - 1,
            Direction::Next if position == last => 0,
            Direction::Next => position + 1,
        };
        Some(target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabCommand {
    Activate,
    Move(Direction),
}

impl TabCommand {
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::ArrowLeft | Key::ArrowUp => Some(TabCommand::Move(Direction::Previous)),
            Key::ArrowRight | Key::ArrowDown => Some(TabCommand::Move(Direction::Next)),
            Key::Enter | Key::Space => Some(TabCommand::Activate),
            Key::Other(_) => None,
        }
    }
}

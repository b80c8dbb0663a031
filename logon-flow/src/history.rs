//! Browser style navigation history.
//!
//! The screens never touch a real browser history directly; they read and
//! modify a [`History`] which remembers how the current entry was reached.

use std::fmt;

/// How the current history entry was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    Push,
    Replace,
    Pop,
}

impl NavigationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationAction::Push => "PUSH",
            NavigationAction::Replace => "REPLACE",
            NavigationAction::Pop => "POP",
        }
    }
}

impl fmt::Display for NavigationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single history entry: path, search (with leading `?`) and hash (with
/// leading `#`). Search and hash are empty strings when absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

impl Location {
    /// Split a relative URL like `/identifier?prompt=login#top`
    pub fn parse(path: &str) -> Self {
        let (rest, hash) = match path.find('#') {
            Some(idx) => (&path[..idx], &path[idx..]),
            None => (path, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        let pathname = if pathname.is_empty() { "/" } else { pathname };

        Self {
            pathname: pathname.to_string(),
            search: if search == "?" { String::new() } else { search.to_string() },
            hash: if hash == "#" { String::new() } else { hash.to_string() },
        }
    }

    /// Search string without the leading `?`
    pub fn query_string(&self) -> &str {
        self.search.strip_prefix('?').unwrap_or(&self.search)
    }

    /// Build a path that keeps this location's search and hash
    pub fn with_pathname(&self, pathname: &str) -> String {
        format!("{}{}{}", pathname, self.search, self.hash)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// In-memory navigation history
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<Location>,
    index: usize,
    action: NavigationAction,
}

impl History {
    /// A fresh history, as after a full page load
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![Location::parse(initial)],
            index: 0,
            action: NavigationAction::Pop,
        }
    }

    pub fn action(&self) -> NavigationAction {
        self.action
    }

    pub fn location(&self) -> &Location {
        &self.entries[self.index]
    }

    /// Navigate forward to a new entry, dropping any forward entries
    pub fn push(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Location::parse(path));
        self.index = self.entries.len() - 1;
        self.action = NavigationAction::Push;
        log::debug!("history push {}", path);
    }

    /// Swap the current entry
    pub fn replace(&mut self, path: &str) {
        self.entries[self.index] = Location::parse(path);
        self.action = NavigationAction::Replace;
        log::debug!("history replace {}", path);
    }

    /// Step back; returns false when already at the first entry
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.action = NavigationAction::Pop;
        true
    }

    /// Step forward; returns false when already at the last entry
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        self.action = NavigationAction::Pop;
        true
    }
}

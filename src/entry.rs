use std::{cmp::Ordering, path::PathBuf};

pub const PARENT_LABEL: &str = "..";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Parent,
    Dir,
    File,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Parent | EntryKind::Dir)
    }
}

/// One row of a directory view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Size in bytes; always 0 for directories.
    pub size: u64,
    pub selected: bool,
}

impl Entry {
    pub fn parent(path: PathBuf) -> Self {
        Self {
            name: PARENT_LABEL.to_string(),
            path,
            kind: EntryKind::Parent,
            size: 0,
            selected: false,
        }
    }

    pub fn dir(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
            kind: EntryKind::Dir,
            size: 0,
            selected: false,
        }
    }

    pub fn file(name: impl Into<String>, path: PathBuf, size: u64) -> Self {
        Self {
            name: name.into(),
            path,
            kind: EntryKind::File,
            size,
            selected: false,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Directories before files, then case-insensitive name order.
///
/// Names equal ignoring case fall back to an exact comparison so the order
/// stays total and listings render the same way every time.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    match (a.is_dir(), b.is_dir()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

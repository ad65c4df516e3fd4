use crate::entry::{Entry, EntryKind};
use std::path::PathBuf;

/// Entries of one directory view together with their selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<Entry>,
}

impl EntryList {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn parent_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.kind == EntryKind::Parent)
    }

    /// Flips the selected flag of a file row and returns the new value.
    /// Directory rows are never selectable.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let entry = self.entries.get_mut(index)?;
        if entry.kind != EntryKind::File {
            return None;
        }
        entry.selected = !entry.selected;
        Some(entry.selected)
    }

    pub fn first_selected(&self) -> Option<usize> {
        self.entries.iter().position(|entry| entry.selected)
    }

    pub fn next_selected(&self, after: usize) -> Option<usize> {
        let start = after.checked_add(1)?;
        self.entries
            .get(start..)?
            .iter()
            .position(|entry| entry.selected)
            .map(|offset| start + offset)
    }

    pub fn selected_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        let mut cursor = self.first_selected();
        while let Some(index) = cursor {
            paths.push(self.entries[index].path.clone());
            cursor = self.next_selected(index);
        }
        paths
    }

    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.selected).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EntryList {
        EntryList::new(vec![
            Entry::parent(PathBuf::from("/")),
            Entry::dir("docs", PathBuf::from("/t/docs")),
            Entry::file("a.txt", PathBuf::from("/t/a.txt"), 10),
            Entry::file("b.txt", PathBuf::from("/t/b.txt"), 20),
            Entry::file("c.txt", PathBuf::from("/t/c.txt"), 30),
        ])
    }

    #[test]
    fn nothing_selected_reports_none() {
        let list = sample();
        assert_eq!(list.first_selected(), None);
        assert_eq!(list.next_selected(0), None);
        assert!(list.selected_paths().is_empty());
    }

    #[test]
    fn toggle_twice_restores_original_state() {
        let mut list = sample();
        assert_eq!(list.toggle(3), Some(true));
        assert_eq!(list.toggle(3), Some(false));
        assert_eq!(list.selected_count(), 0);
    }

    #[test]
    fn directories_and_parent_cannot_be_selected() {
        let mut list = sample();
        assert_eq!(list.toggle(0), None);
        assert_eq!(list.toggle(1), None);
        assert_eq!(list.toggle(99), None);
        assert_eq!(list.first_selected(), None);
    }

    #[test]
    fn sequential_scan_walks_selection_in_index_order() {
        let mut list = sample();
        list.toggle(4);
        list.toggle(2);
        assert_eq!(list.first_selected(), Some(2));
        assert_eq!(list.next_selected(2), Some(4));
        assert_eq!(list.next_selected(4), None);
        assert_eq!(list.next_selected(usize::MAX), None);
        assert_eq!(
            list.selected_paths(),
            vec![PathBuf::from("/t/a.txt"), PathBuf::from("/t/c.txt")]
        );
    }

    #[test]
    fn parent_row_is_found() {
        assert_eq!(sample().parent_index(), Some(0));
        assert_eq!(EntryList::default().parent_index(), None);
    }
}

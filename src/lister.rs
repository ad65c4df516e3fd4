use crate::{
    entry::{compare_entries, Entry},
    filter::ExtensionFilter,
};
use std::{fs, path::Path};

/// Lists the immediate children of `dir` that pass `filter`, sorted, with a
/// `..` row in front when `dir` has a parent.
///
/// An unreadable directory yields only the `..` row (or nothing at the root).
pub fn list_directory(dir: &Path, filter: &ExtensionFilter) -> Vec<Entry> {
    let mut entries = Vec::new();
    match fs::read_dir(dir) {
        Ok(read_dir) => {
            for child in read_dir.flatten() {
                let path = child.path();
                let name = child.file_name().to_string_lossy().to_string();
                let is_dir = path.is_dir();
                if !filter.accepts(&name, is_dir) {
                    continue;
                }
                if is_dir {
                    entries.push(Entry::dir(name, path));
                } else {
                    let size = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
                    entries.push(Entry::file(name, path, size));
                }
            }
            entries.sort_by(compare_entries);
        }
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "directory unreadable, listing as empty");
        }
    }

    if let Some(parent) = dir.parent() {
        entries.insert(0, Entry::parent(parent.to_path_buf()));
    }
    entries
}

use crate::entry::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Normal,
    Inverted,
}

/// Two-line presentation of an entry, independent of any terminal backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub title: String,
    pub detail: String,
    pub style: RowStyle,
}

pub fn row_view(entry: &Entry) -> RowView {
    let (title, detail) = if entry.is_dir() {
        (format!("{}/", entry.name), "(directory)".to_string())
    } else {
        (entry.name.clone(), size_label(entry.size))
    };
    let style = if entry.selected {
        RowStyle::Inverted
    } else {
        RowStyle::Normal
    };
    RowView {
        title,
        detail,
        style,
    }
}

pub fn size_label(bytes: u64) -> String {
    format!("{} [KB]", bytes / 1024)
}

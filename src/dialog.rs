use crate::{entry_list::EntryList, filter::ExtensionFilter, lister};
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use thiserror::Error;

pub const NOTHING_SELECTED_NOTICE: &str = "No file selected.";
pub const OK_LABEL: &str = "OK";
pub const CANCEL_LABEL: &str = "Cancel";
const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialogError {
    #[error("dialog is not open")]
    NotOpen,
    #[error("row {index} is out of range ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub expires_at: Instant,
}

impl Notice {
    pub fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// The listing currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryView {
    pub directory: PathBuf,
    pub title: String,
    pub entries: EntryList,
    pub cursor: usize,
}

impl DirectoryView {
    fn load(directory: PathBuf, filter: &ExtensionFilter) -> Self {
        let entries = EntryList::new(lister::list_directory(&directory, filter));
        Self {
            title: directory.display().to_string(),
            directory,
            entries,
            cursor: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Open(DirectoryView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Navigated(PathBuf),
    Toggled { index: usize, selected: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Delivered(usize),
    NothingSelected,
}

/// Why an OK press was refused. Checked before the dialog closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmRejection {
    NothingSelected,
}

pub fn validate_confirm(view: &DirectoryView) -> Result<Vec<PathBuf>, ConfirmRejection> {
    let paths = view.entries.selected_paths();
    if paths.is_empty() {
        return Err(ConfirmRejection::NothingSelected);
    }
    Ok(paths)
}

/// Modal multi-select file chooser.
///
/// `on_select` runs at most once per `show` cycle, only when the user
/// confirms a non-empty selection, and receives file paths in row order.
pub struct FileSelectionDialog<F>
where
    F: FnMut(Vec<PathBuf>),
{
    filter: ExtensionFilter,
    on_select: F,
    state: DialogState,
    notice: Option<Notice>,
    notice_duration: Duration,
}

impl<F> FileSelectionDialog<F>
where
    F: FnMut(Vec<PathBuf>),
{
    pub fn new(on_select: F, extensions: Option<&str>) -> Self {
        Self {
            filter: ExtensionFilter::parse(extensions),
            on_select,
            state: DialogState::Closed,
            notice: None,
            notice_duration: DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn with_notice_duration(mut self, duration: Duration) -> Self {
        self.notice_duration = duration;
        self
    }

    pub fn filter(&self) -> &ExtensionFilter {
        &self.filter
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open(_))
    }

    pub fn view(&self) -> Option<&DirectoryView> {
        match &self.state {
            DialogState::Open(view) => Some(view),
            DialogState::Closed => None,
        }
    }

    fn view_mut(&mut self) -> Result<&mut DirectoryView, DialogError> {
        match &mut self.state {
            DialogState::Open(view) => Ok(view),
            DialogState::Closed => Err(DialogError::NotOpen),
        }
    }

    /// Live notice at `now`, if any.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|notice| notice.is_live(now))
    }

    pub fn show(&mut self, directory: impl AsRef<Path>) {
        let directory = absolute_dir(directory.as_ref());
        let view = DirectoryView::load(directory, &self.filter);
        tracing::debug!(
            dir = %view.directory.display(),
            rows = view.entries.len(),
            "showing directory"
        );
        self.state = DialogState::Open(view);
    }

    pub fn click(&mut self, index: usize) -> Result<ClickOutcome, DialogError> {
        let view = self.view_mut()?;
        let len = view.entries.len();
        let entry = view
            .entries
            .get(index)
            .ok_or(DialogError::RowOutOfRange { index, len })?;
        if entry.kind.is_dir() {
            let target = entry.path.clone();
            tracing::debug!(dir = %target.display(), "entering directory");
            self.show(&target);
            return Ok(ClickOutcome::Navigated(target));
        }

        view.cursor = index;
        let selected = view.entries.toggle(index).unwrap_or(false);
        tracing::debug!(index, selected, "toggled file");
        Ok(ClickOutcome::Toggled { index, selected })
    }

    pub fn confirm(&mut self) -> Result<ConfirmOutcome, DialogError> {
        let view = self.view_mut()?;
        match validate_confirm(view) {
            Err(ConfirmRejection::NothingSelected) => {
                tracing::info!("confirm rejected: nothing selected");
                self.raise_notice(NOTHING_SELECTED_NOTICE);
                Ok(ConfirmOutcome::NothingSelected)
            }
            Ok(paths) => {
                let count = paths.len();
                self.state = DialogState::Closed;
                tracing::info!(count, "selection confirmed");
                (self.on_select)(paths);
                Ok(ConfirmOutcome::Delivered(count))
            }
        }
    }

    pub fn cancel(&mut self) {
        if self.is_open() {
            tracing::info!("dialog cancelled");
        }
        self.state = DialogState::Closed;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let Ok(view) = self.view_mut() else {
            return;
        };
        if view.entries.is_empty() {
            view.cursor = 0;
            return;
        }
        let last = view.entries.len() - 1;
        view.cursor = if delta.is_negative() {
            view.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            view.cursor.saturating_add(delta as usize).min(last)
        };
    }

    pub fn cursor_to_start(&mut self) {
        if let Ok(view) = self.view_mut() {
            view.cursor = 0;
        }
    }

    pub fn cursor_to_end(&mut self) {
        if let Ok(view) = self.view_mut() {
            view.cursor = view.entries.len().saturating_sub(1);
        }
    }

    pub fn activate_cursor(&mut self) -> Result<ClickOutcome, DialogError> {
        let cursor = self.view().ok_or(DialogError::NotOpen)?.cursor;
        self.click(cursor)
    }

    /// Follows the `..` row. `None` at the filesystem root.
    pub fn go_to_parent(&mut self) -> Result<Option<ClickOutcome>, DialogError> {
        let view = self.view().ok_or(DialogError::NotOpen)?;
        let Some(index) = view.entries.parent_index() else {
            return Ok(None);
        };
        self.click(index).map(Some)
    }

    fn raise_notice(&mut self, message: &str) {
        self.notice = Some(Notice {
            message: message.to_string(),
            expires_at: Instant::now() + self.notice_duration,
        });
    }
}

/// An empty path means the working directory.
fn absolute_dir(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        if let Ok(cwd) = std::env::current_dir() {
            return cwd;
        }
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path_resolves_to_working_directory() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolute_dir(Path::new("")), cwd);
        assert_eq!(absolute_dir(Path::new("sub")), cwd.join("sub"));
    }

    #[test]
    fn empty_path_shows_working_directory_as_title() {
        let mut dialog = FileSelectionDialog::new(|_: Vec<PathBuf>| {}, None);
        dialog.show("");
        let view = dialog.view().unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(view.directory, cwd);
        assert_eq!(view.title, cwd.display().to_string());
    }
}

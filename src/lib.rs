//! Modal multi-select file chooser for the terminal.
//!
//! [`FileSelectionDialog`] lists one directory at a time, lets the user toggle
//! any number of files that pass an extension filter, and hands the chosen
//! paths to a callback when OK is pressed. [`ui::run`] drives it with
//! crossterm input and ratatui drawing.

pub mod config;
pub mod dialog;
pub mod entry;
pub mod entry_list;
pub mod filter;
pub mod lister;
pub mod logging;
pub mod row;
pub mod ui;

pub use dialog::{
    ClickOutcome, ConfirmOutcome, DialogError, DialogState, DirectoryView, FileSelectionDialog,
};
pub use entry::{Entry, EntryKind};
pub use entry_list::EntryList;
pub use filter::ExtensionFilter;

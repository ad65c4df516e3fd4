use crate::{
    dialog::{DirectoryView, FileSelectionDialog, Notice, CANCEL_LABEL, OK_LABEL},
    row::{row_view, RowStyle, RowView},
};
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

const ROW_HEIGHT: u16 = 2;
const BUTTON_WIDTH: u16 = 10;
const MIN_DIALOG_WIDTH: u16 = 40;
const KEY_HINTS: &str = "Space select | Enter open | Tab buttons | o OK | Esc cancel";

#[derive(Clone)]
struct Theme {
    accent: Color,
    accent_soft: Color,
    border: Color,
    text: Color,
    muted: Color,
    warning: Color,
    header_bg: Color,
    selection_bg: Color,
    selection_fg: Color,
}

impl Theme {
    fn new() -> Self {
        Self {
            accent: Color::Rgb(120, 190, 255),
            accent_soft: Color::Rgb(70, 110, 160),
            border: Color::Rgb(65, 75, 90),
            text: Color::Rgb(220, 230, 240),
            muted: Color::Rgb(135, 145, 155),
            warning: Color::Rgb(230, 200, 120),
            header_bg: Color::Rgb(22, 28, 36),
            selection_bg: Color::Rgb(40, 90, 200),
            selection_fg: Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    List,
    Cancel,
    Ok,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::List => Focus::Cancel,
            Focus::Cancel => Focus::Ok,
            Focus::Ok => Focus::List,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::List => Focus::Ok,
            Focus::Cancel => Focus::List,
            Focus::Ok => Focus::Cancel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DialogLayout {
    outer: Rect,
    list: Rect,
    cancel: Rect,
    ok: Rect,
    hints: Rect,
}

impl DialogLayout {
    fn visible_rows(&self) -> usize {
        usize::from((self.list.height / ROW_HEIGHT).max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    Row(usize),
    Cancel,
    Ok,
}

#[derive(Debug, Default)]
struct UiState {
    focus: Focus,
    offset: usize,
    directory: Option<PathBuf>,
    layout: Option<DialogLayout>,
}

impl UiState {
    fn sync_directory(&mut self, view: &DirectoryView) {
        if self.directory.as_ref() != Some(&view.directory) {
            self.directory = Some(view.directory.clone());
            self.offset = 0;
            self.focus = Focus::List;
        }
    }

    fn page(&self) -> isize {
        self.layout
            .map(|layout| layout.visible_rows() as isize)
            .unwrap_or(10)
    }
}

pub fn run<F>(dialog: &mut FileSelectionDialog<F>) -> Result<()>
where
    F: FnMut(Vec<PathBuf>),
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, dialog);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<F>(terminal: &mut Terminal<impl Backend>, dialog: &mut FileSelectionDialog<F>) -> Result<()>
where
    F: FnMut(Vec<PathBuf>),
{
    let theme = Theme::new();
    let mut ui = UiState::default();
    loop {
        let Some(view) = dialog.view() else {
            break;
        };
        ui.sync_directory(view);
        let notice = dialog.notice(Instant::now());
        terminal.draw(|frame| draw(frame, view, notice, &theme, &mut ui))?;

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(dialog, &mut ui, key)?;
                }
                Event::Mouse(mouse) => {
                    handle_mouse(dialog, &mut ui, mouse)?;
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn handle_key<F>(dialog: &mut FileSelectionDialog<F>, ui: &mut UiState, key: KeyEvent) -> Result<()>
where
    F: FnMut(Vec<PathBuf>),
{
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            dialog.cancel();
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => dialog.cancel(),
        KeyCode::Char('o') | KeyCode::Char('O') => {
            dialog.confirm()?;
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            ui.focus = Focus::List;
            dialog.move_cursor(-1);
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            ui.focus = Focus::List;
            dialog.move_cursor(1);
        }
        KeyCode::PageUp => dialog.move_cursor(-ui.page()),
        KeyCode::PageDown => dialog.move_cursor(ui.page()),
        KeyCode::Home | KeyCode::Char('g') => dialog.cursor_to_start(),
        KeyCode::End | KeyCode::Char('G') => dialog.cursor_to_end(),
        KeyCode::Char(' ') => {
            if !is_empty_view(dialog) {
                dialog.activate_cursor()?;
            }
        }
        KeyCode::Backspace => {
            dialog.go_to_parent()?;
        }
        KeyCode::Tab | KeyCode::Right => ui.focus = ui.focus.next(),
        KeyCode::BackTab | KeyCode::Left => ui.focus = ui.focus.prev(),
        KeyCode::Enter => match ui.focus {
            Focus::List => {
                if !is_empty_view(dialog) {
                    dialog.activate_cursor()?;
                }
            }
            Focus::Cancel => dialog.cancel(),
            Focus::Ok => {
                dialog.confirm()?;
            }
        },
        _ => {}
    }

    Ok(())
}

fn handle_mouse<F>(dialog: &mut FileSelectionDialog<F>, ui: &mut UiState, mouse: MouseEvent) -> Result<()>
where
    F: FnMut(Vec<PathBuf>),
{
    match mouse.kind {
        MouseEventKind::ScrollUp => dialog.move_cursor(-1),
        MouseEventKind::ScrollDown => dialog.move_cursor(1),
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(layout) = ui.layout else {
                return Ok(());
            };
            let rows = dialog.view().map(|view| view.entries.len()).unwrap_or(0);
            match hit_test(&layout, ui.offset, rows, mouse.column, mouse.row) {
                Some(Hit::Row(index)) => {
                    ui.focus = Focus::List;
                    dialog.click(index)?;
                }
                Some(Hit::Cancel) => dialog.cancel(),
                Some(Hit::Ok) => {
                    ui.focus = Focus::Ok;
                    dialog.confirm()?;
                }
                None => {}
            }
        }
        _ => {}
    }
    Ok(())
}

fn is_empty_view<F>(dialog: &FileSelectionDialog<F>) -> bool
where
    F: FnMut(Vec<PathBuf>),
{
    dialog
        .view()
        .map(|view| view.entries.is_empty())
        .unwrap_or(true)
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

fn hit_test(layout: &DialogLayout, offset: usize, rows: usize, column: u16, row: u16) -> Option<Hit> {
    if contains(layout.ok, column, row) {
        return Some(Hit::Ok);
    }
    if contains(layout.cancel, column, row) {
        return Some(Hit::Cancel);
    }
    if contains(layout.list, column, row) {
        let index = offset + usize::from((row - layout.list.y) / ROW_HEIGHT);
        if index < rows {
            return Some(Hit::Row(index));
        }
    }
    None
}

fn dialog_layout(area: Rect) -> DialogLayout {
    let width = (area.width.saturating_mul(2) / 3)
        .max(MIN_DIALOG_WIDTH)
        .min(area.width);
    let height = area.height.saturating_sub(2).max(area.height.min(6));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let outer = Rect::new(x, y, width, height);

    let inner = Rect::new(
        outer.x + 1,
        outer.y + 1,
        outer.width.saturating_sub(2),
        outer.height.saturating_sub(2),
    );
    let footer = 2.min(inner.height);
    let list = Rect::new(inner.x, inner.y, inner.width, inner.height - footer);
    let buttons_y = list.bottom();
    let ok_x = inner.right().saturating_sub(BUTTON_WIDTH + 1).max(inner.x);
    let ok = Rect::new(ok_x, buttons_y, BUTTON_WIDTH.min(inner.width), footer.min(1));
    let cancel_x = ok.x.saturating_sub(BUTTON_WIDTH + 2).max(inner.x);
    let cancel = Rect::new(cancel_x, buttons_y, BUTTON_WIDTH.min(inner.width), footer.min(1));
    let hints = Rect::new(inner.x, buttons_y + footer.min(1), inner.width, footer.saturating_sub(1));

    DialogLayout {
        outer,
        list,
        cancel,
        ok,
        hints,
    }
}

fn scroll_offset(offset: usize, cursor: usize, visible: usize) -> usize {
    if cursor < offset {
        cursor
    } else if cursor >= offset + visible {
        cursor + 1 - visible
    } else {
        offset
    }
}

fn draw(
    frame: &mut Frame<'_>,
    view: &DirectoryView,
    notice: Option<&Notice>,
    theme: &Theme,
    ui: &mut UiState,
) {
    let layout = dialog_layout(frame.size());
    ui.layout = Some(layout);
    ui.offset = scroll_offset(ui.offset, view.cursor, layout.visible_rows());

    frame.render_widget(Clear, layout.outer);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent_soft))
        .style(Style::default().bg(theme.header_bg))
        .title(Span::styled(
            format!(" {} ", view.title),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(block, layout.outer);

    if view.entries.is_empty() {
        let empty = Paragraph::new("(empty)")
            .style(Style::default().fg(theme.muted))
            .alignment(Alignment::Center);
        frame.render_widget(empty, layout.list);
    } else {
        let items: Vec<ListItem<'static>> = view
            .entries
            .entries()
            .iter()
            .map(|entry| row_item(&row_view(entry), theme))
            .collect();
        let highlight = if ui.focus == Focus::List {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .highlight_style(highlight)
            .highlight_symbol("> ");
        let mut state = ListState::default()
            .with_offset(ui.offset)
            .with_selected(Some(view.cursor));
        frame.render_stateful_widget(list, layout.list, &mut state);
    }

    frame.render_widget(
        button(CANCEL_LABEL, ui.focus == Focus::Cancel, theme.warning, theme),
        layout.cancel,
    );
    frame.render_widget(
        button(OK_LABEL, ui.focus == Focus::Ok, theme.accent, theme),
        layout.ok,
    );

    let selected = view.entries.selected_count();
    let hints = Line::from(vec![
        Span::styled(
            format!("{selected} selected"),
            Style::default().fg(theme.text),
        ),
        Span::styled(format!("  {KEY_HINTS}"), Style::default().fg(theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(hints), layout.hints);

    if let Some(notice) = notice {
        render_toast(frame, theme, layout.outer, &notice.message);
    }
}

fn row_item(row: &RowView, theme: &Theme) -> ListItem<'static> {
    match row.style {
        RowStyle::Inverted => ListItem::new(vec![
            Line::from(row.title.clone()),
            Line::from(row.detail.clone()),
        ])
        .style(
            Style::default()
                .bg(theme.selection_bg)
                .fg(theme.selection_fg),
        ),
        RowStyle::Normal => ListItem::new(vec![
            Line::from(Span::styled(row.title.clone(), Style::default().fg(theme.text))),
            Line::from(Span::styled(row.detail.clone(), Style::default().fg(theme.muted))),
        ]),
    }
}

fn button(label: &str, focused: bool, color: Color, theme: &Theme) -> Paragraph<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).bg(theme.border)
    };
    Paragraph::new(label.to_string())
        .style(style)
        .alignment(Alignment::Center)
}

fn render_toast(frame: &mut Frame<'_>, theme: &Theme, body_area: Rect, message: &str) {
    let mut message = message.to_string();
    let max_width = body_area.width.saturating_sub(4).max(24);
    let max_text = max_width.saturating_sub(4) as usize;
    if message.len() > max_text {
        message.truncate(max_text.saturating_sub(3));
        message.push_str("...");
    }
    let width = (message.len() as u16 + 4).clamp(24, max_width).min(body_area.width);
    let height = 3u16.min(body_area.height);
    let x = body_area.x + (body_area.width.saturating_sub(width)) / 2;
    let y = body_area.y + body_area.height.saturating_sub(height + 3);
    let toast_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.warning))
        .style(Style::default().bg(theme.header_bg));
    let content = Paragraph::new(message)
        .block(block)
        .style(Style::default().fg(theme.text))
        .alignment(Alignment::Center);
    frame.render_widget(content, toast_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use std::cell::RefCell;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn layout_fits_inside_terminal() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = dialog_layout(area);
        assert!(layout.outer.right() <= area.right());
        assert!(layout.outer.bottom() <= area.bottom());
        assert_eq!(layout.list.y, layout.outer.y + 1);
        assert_eq!(layout.ok.y, layout.list.bottom());
        assert!(layout.cancel.right() <= layout.ok.x);
        assert_eq!(layout.visible_rows(), usize::from(layout.list.height / 2));
    }

    #[test]
    fn hit_test_maps_two_line_rows() {
        let layout = dialog_layout(Rect::new(0, 0, 90, 30));
        let column = layout.list.x + 3;
        assert_eq!(hit_test(&layout, 0, 5, column, layout.list.y), Some(Hit::Row(0)));
        assert_eq!(hit_test(&layout, 0, 5, column, layout.list.y + 1), Some(Hit::Row(0)));
        assert_eq!(hit_test(&layout, 0, 5, column, layout.list.y + 2), Some(Hit::Row(1)));
        assert_eq!(hit_test(&layout, 3, 5, column, layout.list.y + 2), Some(Hit::Row(4)));
        assert_eq!(hit_test(&layout, 3, 5, column, layout.list.y + 4), None);
        assert_eq!(hit_test(&layout, 0, 5, layout.ok.x, layout.ok.y), Some(Hit::Ok));
        assert_eq!(
            hit_test(&layout, 0, 5, layout.cancel.x, layout.cancel.y),
            Some(Hit::Cancel)
        );
    }

    #[test]
    fn scroll_offset_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 3, 5), 0);
        assert_eq!(scroll_offset(0, 7, 5), 3);
        assert_eq!(scroll_offset(4, 2, 5), 2);
    }

    #[test]
    fn focus_cycles_through_buttons() {
        assert_eq!(Focus::List.next(), Focus::Cancel);
        assert_eq!(Focus::Cancel.next(), Focus::Ok);
        assert_eq!(Focus::Ok.next(), Focus::List);
        assert_eq!(Focus::List.prev(), Focus::Ok);
    }

    #[test]
    fn draws_title_rows_buttons_and_notice() {
        let dir = std::env::temp_dir().join(format!("multipick-ui-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("clip.txt"), vec![0u8; 2048]).unwrap();

        let mut dialog = FileSelectionDialog::new(|_: Vec<PathBuf>| {}, None);
        dialog.show(&dir);
        dialog.confirm().unwrap();
        let view = dialog.view().unwrap();
        let notice = dialog.notice(Instant::now());
        assert!(notice.is_some());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut ui = UiState::default();
        terminal
            .draw(|frame| draw(frame, view, notice, &Theme::new(), &mut ui))
            .unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains(&view.title));
        assert!(text.contains("../"));
        assert!(text.contains("sub/"));
        assert!(text.contains("(directory)"));
        assert!(text.contains("clip.txt"));
        assert!(text.contains("2 [KB]"));
        assert!(text.contains("Cancel"));
        assert!(text.contains("OK"));
        assert!(text.contains("No file selected."));
        assert!(ui.layout.is_some());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    fn picker_dir(prefix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "multipick-{prefix}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.txt"), b"x").unwrap();
        dir
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn left_click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn enter_on_ok_with_nothing_selected_keeps_dialog_open() {
        let dir = picker_dir("keys-empty");
        let picked = RefCell::new(Vec::new());
        let mut dialog =
            FileSelectionDialog::new(|paths: Vec<PathBuf>| picked.borrow_mut().push(paths), None);
        dialog.show(&dir);
        let mut ui = UiState::default();

        handle_key(&mut dialog, &mut ui, press(KeyCode::Tab)).unwrap();
        handle_key(&mut dialog, &mut ui, press(KeyCode::Tab)).unwrap();
        assert_eq!(ui.focus, Focus::Ok);
        handle_key(&mut dialog, &mut ui, press(KeyCode::Enter)).unwrap();

        assert!(dialog.is_open());
        assert!(dialog.notice(Instant::now()).is_some());
        assert!(picked.borrow().is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn keyboard_select_and_ok_delivers_one_path() {
        let dir = picker_dir("keys-select");
        let picked = RefCell::new(Vec::new());
        let mut dialog =
            FileSelectionDialog::new(|paths: Vec<PathBuf>| picked.borrow_mut().push(paths), None);
        dialog.show(&dir);
        let mut ui = UiState::default();

        handle_key(&mut dialog, &mut ui, press(KeyCode::Down)).unwrap();
        handle_key(&mut dialog, &mut ui, press(KeyCode::Char(' '))).unwrap();
        handle_key(&mut dialog, &mut ui, press(KeyCode::Char('o'))).unwrap();

        assert!(!dialog.is_open());
        assert_eq!(*picked.borrow(), vec![vec![dir.join("a.txt")]]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn escape_closes_without_callback() {
        let dir = picker_dir("keys-esc");
        let picked = RefCell::new(Vec::new());
        let mut dialog =
            FileSelectionDialog::new(|paths: Vec<PathBuf>| picked.borrow_mut().push(paths), None);
        dialog.show(&dir);
        let mut ui = UiState::default();

        handle_key(&mut dialog, &mut ui, press(KeyCode::Down)).unwrap();
        handle_key(&mut dialog, &mut ui, press(KeyCode::Char(' '))).unwrap();
        handle_key(&mut dialog, &mut ui, press(KeyCode::Esc)).unwrap();

        assert!(!dialog.is_open());
        assert!(picked.borrow().is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn backspace_moves_to_parent_directory() {
        let dir = picker_dir("keys-parent");
        let mut dialog = FileSelectionDialog::new(|_: Vec<PathBuf>| {}, None);
        dialog.show(&dir);
        let mut ui = UiState::default();

        handle_key(&mut dialog, &mut ui, press(KeyCode::Backspace)).unwrap();
        assert_eq!(
            dialog.view().map(|view| view.directory.clone()),
            dir.parent().map(|parent| parent.to_path_buf())
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn mouse_clicks_select_rows_and_press_ok() {
        let dir = picker_dir("mouse");
        let picked = RefCell::new(Vec::new());
        let mut dialog =
            FileSelectionDialog::new(|paths: Vec<PathBuf>| picked.borrow_mut().push(paths), None);
        dialog.show(&dir);
        let layout = dialog_layout(Rect::new(0, 0, 100, 30));
        let mut ui = UiState {
            layout: Some(layout),
            ..UiState::default()
        };

        handle_mouse(&mut dialog, &mut ui, left_click(layout.ok.x, layout.ok.y)).unwrap();
        assert!(dialog.is_open());
        assert!(picked.borrow().is_empty());

        let column = layout.list.x + 3;
        handle_mouse(&mut dialog, &mut ui, left_click(column, layout.list.y + ROW_HEIGHT)).unwrap();
        assert_eq!(dialog.view().unwrap().entries.selected_count(), 1);

        handle_mouse(&mut dialog, &mut ui, left_click(layout.ok.x + 1, layout.ok.y)).unwrap();
        assert!(!dialog.is_open());
        assert_eq!(*picked.borrow(), vec![vec![dir.join("a.txt")]]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn mouse_click_on_cancel_closes_without_callback() {
        let dir = picker_dir("mouse-cancel");
        let picked = RefCell::new(Vec::new());
        let mut dialog =
            FileSelectionDialog::new(|paths: Vec<PathBuf>| picked.borrow_mut().push(paths), None);
        dialog.show(&dir);
        let layout = dialog_layout(Rect::new(0, 0, 100, 30));
        let mut ui = UiState {
            layout: Some(layout),
            ..UiState::default()
        };

        handle_mouse(&mut dialog, &mut ui, left_click(layout.cancel.x, layout.cancel.y)).unwrap();
        assert!(!dialog.is_open());
        assert!(picked.borrow().is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

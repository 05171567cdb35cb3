//! Demo application: a titled pile of entries under a command frame
//!
//! Command handlers only queue [`Request`]s; the app applies them once the
//! frame has finished with the key, so handlers never borrow the widgets.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mapwidgets_core::{
    Arity, Command, CommandRegistry, ContainerEvent, Direction, EditOptions,
};
use ratatui::{
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
    Frame,
};
use tracing::{debug, info, warn};

use crate::config::{KeyBindings, WidgetsConfig};
use crate::frame::{CommandFrame, FocusPart, FrameEvent, FrameOutcome};
use crate::keymap::{KeyBinding, Keymap, NavAction};
use crate::list::navigate;
use crate::pile::{MappedPile, PileKey};
use crate::wrap::MappedWrap;

const ACCENT: Color = Color::Cyan;
const SECONDARY: Color = Color::DarkGray;

/// Per-entry bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    Rename,
    Remove,
}

pub type Entry = MappedWrap<String, EntryAction>;

/// Which prompt the command line is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Search,
    Rename,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    Add(String),
    Divider,
    Remove,
    Rename(String),
    Find(String),
    CommitSearch(String),
    Top,
    Bottom,
    Clear,
    Echo(String),
    Quit,
}

type Requests = Rc<RefCell<Vec<Request>>>;

/// A selectable entry row
pub fn entry(text: impl Into<String>) -> Entry {
    MappedWrap::new(text.into())
        .with_focus_style(Style::default().fg(ACCENT).add_modifier(Modifier::REVERSED))
        .with_keymap(
            Keymap::new()
                .bind(KeyBinding::char('r'), EntryAction::Rename)
                .bind(KeyBinding::char('d'), EntryAction::Remove),
        )
}

/// A row that never takes focus
pub fn divider() -> Entry {
    MappedWrap::new("----".to_string())
        .with_style(Style::default().fg(SECONDARY))
        .with_selectable(false)
}

fn sample_entries() -> Vec<Entry> {
    vec![
        entry("Read the manual"),
        entry("Write the parser"),
        divider(),
        entry("Review focus handling"),
        entry("Ship it"),
    ]
}

/// Command whose handler only queues a request for the app
fn queued(requests: &Requests, arity: Arity, make: fn(&[String]) -> Request) -> Command {
    let requests = Rc::clone(requests);
    Command::new(arity, move |args| {
        requests.borrow_mut().push(make(args));
        Ok(())
    })
}

fn build_registry(requests: &Requests) -> CommandRegistry {
    CommandRegistry::new()
        .with("add", queued(requests, Arity::AtLeast(1), |args| Request::Add(args.join(" "))))
        .with("divider", queued(requests, Arity::Exact(0), |_| Request::Divider))
        .with("remove", queued(requests, Arity::Exact(0), |_| Request::Remove))
        .with("rename", queued(requests, Arity::AtLeast(1), |args| Request::Rename(args.join(" "))))
        .with("find", queued(requests, Arity::AtLeast(1), |args| Request::Find(args.join(" "))))
        .with("top", queued(requests, Arity::Exact(0), |_| Request::Top))
        .with("bottom", queued(requests, Arity::Exact(0), |_| Request::Bottom))
        .with("clear", queued(requests, Arity::Exact(0), |_| Request::Clear))
        .with("echo", queued(requests, Arity::AtLeast(0), |args| Request::Echo(args.join(" "))))
        .with("quit", queued(requests, Arity::Exact(0), |_| Request::Quit))
}

fn matches_query(entry: &Entry, needle: &str) -> bool {
    entry.inner().to_lowercase().contains(needle)
}

pub struct App {
    frame: CommandFrame,
    entries: MappedPile<String, EntryAction>,
    keys: KeyBindings,
    mode: Mode,
    requests: Requests,
    quit: Rc<Cell<bool>>,
}

impl App {
    pub fn new(config: &WidgetsConfig) -> anyhow::Result<Self> {
        Self::with_entries(config, sample_entries())
    }

    pub fn with_entries(config: &WidgetsConfig, items: Vec<Entry>) -> anyhow::Result<Self> {
        let keys = config.keys.bindings()?;
        let requests: Requests = Rc::default();

        let frame = CommandFrame::new(build_registry(&requests))
            .with_command_key(keys.command)
            .with_caption(config.frame.caption.clone())
            .with_confirm_suffix(config.frame.confirm_suffix.clone());

        let nav = Keymap::navigation()
            .bind(keys.up, NavAction::Up)
            .bind(keys.down, NavAction::Down)
            .bind(keys.top, NavAction::Top)
            .bind(keys.bottom, NavAction::Bottom)
            .bind(keys.search_next, NavAction::SearchNext)
            .bind(keys.search_previous, NavAction::SearchPrevious);
        let title = MappedWrap::new("entries".to_string())
            .with_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
        let entries = MappedPile::titled(title, items).with_keymap(nav).with_block(
            Block::default()
                .title(" mapwidgets ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(SECONDARY)),
        );

        Ok(Self {
            frame,
            entries,
            keys,
            mode: Mode::Normal,
            requests,
            quit: Rc::new(Cell::new(false)),
        })
    }

    pub fn should_quit(&self) -> bool {
        self.quit.get()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn frame(&self) -> &CommandFrame {
        &self.frame
    }

    pub fn entries(&self) -> &MappedPile<String, EntryAction> {
        &self.entries
    }

    /// Text of the focused entry
    pub fn focused_text(&self) -> Option<&str> {
        self.entries
            .controller()
            .focused()
            .map(|entry| entry.inner().as_str())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit.set(true);
            return;
        }

        let outcome = self.frame.handle_key(key).unwrap_or_else(|err| {
            warn!(error = %err, "command failed");
            self.frame.change_status(&err.to_string());
            FrameOutcome::Consumed
        });
        if outcome == FrameOutcome::Forward {
            self.handle_body_key(key);
        }

        self.process_frame_events();
        self.process_requests();
        self.process_entry_events();
        if !self.frame.is_editing() {
            self.mode = Mode::Normal;
        }
    }

    /// Whether the entries or the footer changed since the last render
    pub fn needs_redraw(&self) -> bool {
        self.entries.needs_redraw() || self.frame.needs_redraw()
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let (body, footer) = CommandFrame::layout(frame.area());
        let focused = self.frame.focus() == FocusPart::Body;
        self.entries.render(body, frame.buffer_mut(), focused);
        self.frame.render_footer(frame, footer);
        self.frame.take_redraw();
    }

    fn handle_body_key(&mut self, key: KeyEvent) {
        if self.keys.quit.matches(&key) {
            self.confirm_quit();
            return;
        }
        if self.keys.search.matches(&key) {
            self.start_search();
            return;
        }
        match self.entries.keypress(&key) {
            Some(PileKey::Child(EntryAction::Rename)) => self.start_rename(),
            Some(PileKey::Child(EntryAction::Remove)) => self.remove_focused(),
            Some(PileKey::Nav(transition)) => debug!(?transition, "entry navigation"),
            None => {}
        }
    }

    fn start_search(&mut self) {
        self.mode = Mode::Search;
        let requests = Rc::clone(&self.requests);
        self.frame.start_editing(EditOptions::new().caption("/").callback(move |text| {
            requests
                .borrow_mut()
                .push(Request::CommitSearch(text.to_string()));
            Ok(())
        }));
    }

    fn start_rename(&mut self) {
        let Some(current) = self.focused_text().map(str::to_string) else {
            return;
        };
        self.mode = Mode::Rename;
        let requests = Rc::clone(&self.requests);
        self.frame.start_editing(
            EditOptions::new()
                .caption("rename: ")
                .start_text(current)
                .callback(move |text| {
                    requests.borrow_mut().push(Request::Rename(text.to_string()));
                    Ok(())
                }),
        );
    }

    fn confirm_quit(&mut self) {
        let quit = Rc::clone(&self.quit);
        self.frame.are_you_sure("Quit?", move || quit.set(true), || {});
    }

    fn process_frame_events(&mut self) {
        for event in self.frame.drain_events() {
            if self.mode != Mode::Search {
                continue;
            }
            let controller = self.entries.controller_mut();
            match event {
                FrameEvent::Change { text, deleted } => {
                    if deleted {
                        controller.reset_anchor();
                    }
                    if text.is_empty() {
                        controller.cancel_search();
                        continue;
                    }
                    let needle = text.to_lowercase();
                    let found =
                        controller.inc_search(|entry| matches_query(entry, &needle), Direction::Forward);
                    debug!(query = %text, ?found, "incremental search");
                }
                FrameEvent::Cancelled => {
                    controller.cancel_search();
                }
            }
        }
    }

    fn process_requests(&mut self) {
        let pending = std::mem::take(&mut *self.requests.borrow_mut());
        for request in pending {
            info!(?request, "applying request");
            match request {
                Request::Add(text) => {
                    self.entries.add(entry(text));
                }
                Request::Divider => {
                    self.entries.add(divider());
                }
                Request::Remove => self.remove_focused(),
                Request::Rename(text) => self.rename_focused(text),
                Request::Find(text) => self.find(&text, None),
                Request::CommitSearch(text) => {
                    let anchor = self.entries.controller().search_anchor();
                    if text.is_empty() {
                        self.entries.controller_mut().cancel_search();
                    } else {
                        self.find(&text, anchor);
                    }
                }
                Request::Top => {
                    navigate(self.entries.controller_mut(), NavAction::Top);
                }
                Request::Bottom => {
                    navigate(self.entries.controller_mut(), NavAction::Bottom);
                }
                Request::Clear => self.entries.set(Vec::new()),
                Request::Echo(text) => self.frame.change_status(&text),
                Request::Quit => self.confirm_quit(),
            }
        }
    }

    fn process_entry_events(&mut self) {
        // Boundary hits leave the screen untouched; they are only logged.
        for event in self.entries.drain_events() {
            match event {
                ContainerEvent::Shift => debug!("entries focus shifted"),
                ContainerEvent::Top | ContainerEvent::Bottom => {
                    debug!(signal = event.name(), "entries boundary")
                }
            }
        }
    }

    fn find(&mut self, text: &str, start: Option<usize>) {
        let needle = text.to_lowercase();
        let found = self.entries.controller_mut().search(
            move |entry: &Entry| matches_query(entry, &needle),
            Direction::Forward,
            start,
        );
        if found.is_none() {
            self.frame.change_status(&format!("Pattern not found: {text}"));
        }
    }

    fn remove_focused(&mut self) {
        let controller = self.entries.controller_mut();
        if controller.focused().is_none() {
            self.frame.change_status("Nothing to remove");
            return;
        }
        let focus = controller.focus();
        controller.remove(focus);
    }

    fn rename_focused(&mut self, text: String) {
        match self.entries.controller_mut().focused_mut() {
            Some(row) => {
                row.set_inner(text);
            }
            None => self.frame.change_status("Nothing to rename"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_keys(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn run_command(app: &mut App, line: &str) {
        app.handle_key(press(KeyCode::Char(':')));
        type_keys(app, line);
        app.handle_key(press(KeyCode::Enter));
    }

    fn demo() -> App {
        App::new(&WidgetsConfig::default()).unwrap()
    }

    fn screen(app: &mut App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn test_starts_on_first_entry() {
        let app = demo();
        assert_eq!(app.focused_text(), Some("Read the manual"));
        assert_eq!(app.mode(), Mode::Normal);
    }

    #[test]
    fn test_navigation_skips_divider_and_stops_at_bottom() {
        let mut app = demo();
        type_keys(&mut app, "jj");
        assert_eq!(app.focused_text(), Some("Review focus handling"));
        type_keys(&mut app, "G");
        assert_eq!(app.focused_text(), Some("Ship it"));
        type_keys(&mut app, "j");
        assert_eq!(app.focused_text(), Some("Ship it"));
        assert_eq!(app.frame().status(), None);
        type_keys(&mut app, "g");
        assert_eq!(app.focused_text(), Some("Read the manual"));
    }

    #[test]
    fn test_boundary_key_does_not_request_redraw() {
        let mut app = demo();
        type_keys(&mut app, "G");
        assert!(app.needs_redraw());
        screen(&mut app, 40, 10);
        assert!(!app.needs_redraw());

        type_keys(&mut app, "j");
        assert!(!app.needs_redraw());

        type_keys(&mut app, "k");
        assert!(app.needs_redraw());
        assert_eq!(app.focused_text(), Some("Review focus handling"));
    }

    #[test]
    fn test_add_after_divider_focuses_entry() {
        let mut app = demo();
        run_command(&mut app, "clear");
        run_command(&mut app, "divider");
        run_command(&mut app, "add fresh");
        assert_eq!(app.focused_text(), Some("fresh"));
        let controller = app.entries().controller();
        assert!(controller.is_eligible(controller.focus()));
    }

    #[test]
    fn test_add_and_remove_commands() {
        let mut app = demo();
        run_command(&mut app, "add \"Buy milk\"");
        assert_eq!(app.entries().controller().content_len(), 6);

        run_command(&mut app, "bottom");
        assert_eq!(app.focused_text(), Some("Buy milk"));

        run_command(&mut app, "remove");
        assert_eq!(app.entries().controller().content_len(), 5);
        assert_eq!(app.focused_text(), Some("Ship it"));
    }

    #[test]
    fn test_clear_then_add_focuses_new_entry() {
        let mut app = demo();
        run_command(&mut app, "clear");
        assert!(app.entries().controller().is_empty());
        assert_eq!(app.focused_text(), None);

        type_keys(&mut app, "d");
        run_command(&mut app, "add first");
        assert_eq!(app.focused_text(), Some("first"));
    }

    #[test]
    fn test_status_errors_from_commands() {
        let mut app = demo();
        run_command(&mut app, "frobnicate");
        assert_eq!(app.frame().status(), Some("Command not found"));

        run_command(&mut app, "top now");
        assert_eq!(app.frame().status(), Some("Wrong number of arguments"));

        run_command(&mut app, "echo \"unterminated");
        assert_eq!(app.frame().status(), Some("Invalid command"));

        run_command(&mut app, "echo hello world");
        assert_eq!(app.frame().status(), Some("hello world"));
    }

    #[test]
    fn test_incremental_search_and_cancel() {
        let mut app = demo();
        type_keys(&mut app, "/");
        assert_eq!(app.mode(), Mode::Search);

        type_keys(&mut app, "sh");
        assert_eq!(app.focused_text(), Some("Ship it"));

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.focused_text(), Some("Read the manual"));
        assert_eq!(app.mode(), Mode::Normal);
    }

    #[test]
    fn test_committed_search_then_next() {
        let mut app = demo();
        type_keys(&mut app, "/re");
        assert_eq!(app.focused_text(), Some("Review focus handling"));
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.focused_text(), Some("Review focus handling"));
        assert_eq!(app.mode(), Mode::Normal);

        type_keys(&mut app, "n");
        assert_eq!(app.focused_text(), Some("Read the manual"));
        type_keys(&mut app, "N");
        assert_eq!(app.focused_text(), Some("Review focus handling"));
    }

    #[test]
    fn test_find_command_reports_missing_pattern() {
        let mut app = demo();
        run_command(&mut app, "find parser");
        assert_eq!(app.focused_text(), Some("Write the parser"));
        run_command(&mut app, "find zebra");
        assert_eq!(app.frame().status(), Some("Pattern not found: zebra"));
    }

    #[test]
    fn test_rename_prompt_prefills_current_text() {
        let mut app = demo();
        type_keys(&mut app, "r");
        assert_eq!(app.mode(), Mode::Rename);
        assert_eq!(app.frame().command_line().text(), "Read the manual");

        for _ in 0.."manual".len() {
            app.handle_key(press(KeyCode::Backspace));
        }
        type_keys(&mut app, "docs");
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.focused_text(), Some("Read the docs"));
    }

    #[test]
    fn test_quit_needs_confirmation() {
        let mut app = demo();
        type_keys(&mut app, "q");
        assert!(!app.should_quit());
        assert_eq!(app.frame().confirm_text(), Some("Quit? [y/n]"));

        type_keys(&mut app, "n");
        assert!(!app.should_quit());

        run_command(&mut app, "quit");
        type_keys(&mut app, "y");
        assert!(app.should_quit());
    }

    #[test]
    fn test_ctrl_c_quits_immediately() {
        let mut app = demo();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_render_layout() {
        let mut app = demo();
        app.handle_key(press(KeyCode::Char(':')));
        type_keys(&mut app, "ad");

        let rows = screen(&mut app, 40, 10);
        assert!(rows[0].contains("mapwidgets"));
        assert!(rows[1].contains("entries"));
        assert!(rows[2].contains("Read the manual"));
        assert!(rows[9].starts_with("> ad"));
    }
}

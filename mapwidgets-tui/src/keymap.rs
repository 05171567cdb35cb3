//! Key bindings and per-widget keymaps
//!
//! A [`Keymap`] maps a [`KeyBinding`] to a widget action. Widgets consult
//! their keymap around their own default key handling and hand mapped
//! actions back to the caller.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key plus modifiers, normalized so `G` and `shift-g` compare equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        normalize(code, modifiers)
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    /// Parse strings such as `"k"`, `"G"`, `"ctrl-n"`, `"pageup"`, `"esc"`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            bail!("Empty key binding");
        }
        // A lone "-" or a trailing "--" names the minus key itself.
        let (prefix, key) = match trimmed.strip_suffix("--") {
            Some(rest) => (rest, "-"),
            None if trimmed == "-" => ("", "-"),
            None => match trimmed.rsplit_once('-') {
                Some((mods, key)) => (mods, key),
                None => ("", trimmed),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.split('-').filter(|part| !part.is_empty()) {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "c" => KeyModifiers::CONTROL,
                "alt" | "meta" | "m" => KeyModifiers::ALT,
                "shift" | "s" => KeyModifiers::SHIFT,
                other => bail!("Unknown modifier '{other}' in key binding '{input}'"),
            };
        }

        let code = parse_code(key).ok_or_else(|| {
            anyhow::anyhow!("Unknown key '{key}' in key binding '{input}'")
        })?;
        Ok(Self::new(code, modifiers))
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        *self == KeyBinding::from(*event)
    }
}

fn normalize(code: KeyCode, mut modifiers: KeyModifiers) -> KeyBinding {
    let code = match code {
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::SHIFT) => {
            modifiers.remove(KeyModifiers::SHIFT);
            KeyCode::Char(c.to_ascii_uppercase())
        }
        KeyCode::BackTab => {
            modifiers.remove(KeyModifiers::SHIFT);
            KeyCode::BackTab
        }
        other => other,
    };
    KeyBinding { code, modifiers }
}

fn parse_code(key: &str) -> Option<KeyCode> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    let code = match key.to_ascii_lowercase().as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        other => {
            let n: u8 = other.strip_prefix('f')?.parse().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
    };
    Some(code)
}

impl From<KeyEvent> for KeyBinding {
    fn from(event: KeyEvent) -> Self {
        KeyBinding::new(event.code, event.modifiers)
    }
}

impl FromStr for KeyBinding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        KeyBinding::parse(s)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt-")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("shift-")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "f{n}"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::PageUp => f.write_str("pageup"),
            KeyCode::PageDown => f.write_str("pagedown"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::BackTab => f.write_str("backtab"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Delete => f.write_str("delete"),
            KeyCode::Insert => f.write_str("insert"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Binding table owned by one widget
#[derive(Debug, Clone)]
pub struct Keymap<A> {
    bindings: HashMap<KeyBinding, A>,
}

impl<A> Default for Keymap<A> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<A: Copy> Keymap<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style binding
    pub fn bind(mut self, key: KeyBinding, action: A) -> Self {
        self.insert(key, action);
        self
    }

    /// Bind `key` to `action`, returning the action it replaced
    pub fn insert(&mut self, key: KeyBinding, action: A) -> Option<A> {
        self.bindings.insert(key, action)
    }

    pub fn remove(&mut self, key: &KeyBinding) -> Option<A> {
        self.bindings.remove(key)
    }

    pub fn lookup(&self, event: &KeyEvent) -> Option<A> {
        self.bindings.get(&KeyBinding::from(*event)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyBinding, &A)> {
        self.bindings.iter()
    }
}

/// Focus movement understood by list and pile adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    SearchNext,
    SearchPrevious,
}

impl Keymap<NavAction> {
    /// Arrow keys step, page keys jump, home/end go to the ends
    pub fn navigation() -> Self {
        Keymap::new()
            .bind(KeyBinding::plain(KeyCode::Up), NavAction::Up)
            .bind(KeyBinding::plain(KeyCode::Down), NavAction::Down)
            .bind(KeyBinding::plain(KeyCode::PageUp), NavAction::PageUp)
            .bind(KeyBinding::plain(KeyCode::PageDown), NavAction::PageDown)
            .bind(KeyBinding::plain(KeyCode::Home), NavAction::Top)
            .bind(KeyBinding::plain(KeyCode::End), NavAction::Bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_named() {
        assert_eq!(KeyBinding::parse("k").unwrap(), KeyBinding::char('k'));
        assert_eq!(KeyBinding::parse("pageup").unwrap(), KeyBinding::plain(KeyCode::PageUp));
        assert_eq!(KeyBinding::parse("Esc").unwrap(), KeyBinding::plain(KeyCode::Esc));
        assert_eq!(KeyBinding::parse("f5").unwrap(), KeyBinding::plain(KeyCode::F(5)));
        assert_eq!(KeyBinding::parse("space").unwrap(), KeyBinding::char(' '));
        assert_eq!(KeyBinding::parse("-").unwrap(), KeyBinding::char('-'));
    }

    #[test]
    fn test_parse_modifiers() {
        let binding = KeyBinding::parse("ctrl-n").unwrap();
        assert_eq!(binding.code, KeyCode::Char('n'));
        assert_eq!(binding.modifiers, KeyModifiers::CONTROL);

        assert_eq!(KeyBinding::parse("shift-g").unwrap(), KeyBinding::char('G'));
        assert_eq!(
            KeyBinding::parse("alt--").unwrap(),
            KeyBinding::new(KeyCode::Char('-'), KeyModifiers::ALT)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(KeyBinding::parse("").is_err());
        assert!(KeyBinding::parse("hyper-k").is_err());
        assert!(KeyBinding::parse("f13").is_err());
        let err = KeyBinding::parse("nope").unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_shifted_event_matches_uppercase() {
        let event = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert!(KeyBinding::char('G').matches(&event));
        assert!(!KeyBinding::char('g').matches(&event));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for text in ["ctrl-n", "G", "pagedown", "space", "alt-x"] {
            let binding = KeyBinding::parse(text).unwrap();
            assert_eq!(KeyBinding::parse(&binding.to_string()).unwrap(), binding);
        }
    }

    #[test]
    fn test_keymap_lookup() {
        let keymap = Keymap::navigation().bind(KeyBinding::char('j'), NavAction::Down);
        let down = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(keymap.lookup(&down), Some(NavAction::Down));
        let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(keymap.lookup(&other), None);
    }
}

//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! This module manages keyboard shortcuts for the list panel. It supports:
//! - Loading custom keybindings from a config file (`keybinds.conf`)
//! - Providing sensible defaults if no config is present
//! - Resolving key presses (with modifiers) to semantic actions
//! - Exporting the current keymap back to a file for reference or customization
//!
//! Form panels handle keys directly (text input, field switching, submit),
//! so only list-focus actions are remappable.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Multiple key combinations can map to the same action, allowing for
/// flexibility (e.g., both 'j' and Down arrow can move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help/keybindings overlay.
    OpenHelp,
    /// Delete the currently selected user.
    DeleteSelection,
    /// Move focus to the next panel (list, create form, update form).
    FocusNext,
    /// Move focus to the previous panel.
    FocusPrev,
    /// Move up in the user list.
    MoveUp,
    /// Move down in the user list.
    MoveDown,
    /// Step one page up in the user list.
    PageUp,
    /// Step one page down in the user list.
    PageDown,
    /// Ignore this key (used for keys that shouldn't trigger anything).
    Ignore,
}

/// Manages keybinding configuration and key-to-action resolution.
///
/// The keymap uses a canonical mapping from `(KeyModifiers, KeyCode)` pairs
/// to [`KeyAction`]s. It supports loading from and saving to a configuration
/// file, with sensible defaults if no custom config is present.
#[derive(Clone, Debug)]
pub struct Keymap {
    /// Canonical mapping from (modifiers, code) to action.
    bindings: std::collections::HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings.
    ///
    /// Includes:
    /// - Arrow keys and vim-style keys (hjkl) for navigation
    /// - q (quit), ? (help), Delete (delete selection)
    /// - Tab/BackTab for panel switching
    /// - Page Up/Down for paging
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = std::collections::HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, KeyCode::Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Tab), KeyAction::FocusNext);
        // Shift+Tab is BackTab in crossterm
        bindings.insert((M::NONE, BackTab), KeyAction::FocusPrev);
        // Some terminals report BackTab with SHIFT modifier, and some send Tab+SHIFT
        bindings.insert((M::SHIFT, BackTab), KeyAction::FocusPrev);
        bindings.insert((M::SHIFT, Tab), KeyAction::FocusPrev);
        // Navigation
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PageUp);
        bindings.insert((M::NONE, Right), KeyAction::PageDown);
        // Vim-like keys
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::PageUp);
        bindings.insert((M::NONE, Char('l')), KeyAction::PageDown);
        // Page keys
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);

        Self { bindings }
    }

    /// Load a keymap from a file, or create defaults if the file doesn't exist.
    ///
    /// Checks the given path first, then the standard config locations. If no
    /// file is found anywhere, a fresh default keymap is written to the given
    /// path for future customization.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::app::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// The file should use the format `<Action> = <KeySpec>`; the reversed
    /// `<KeySpec> = <Action>` form is also accepted. Parsing starts from the
    /// defaults and overrides with user-specified bindings; malformed lines
    /// are skipped.
    ///
    /// Returns `Some(keymap)` if the file exists and is readable; `None`
    /// otherwise.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        // Start from defaults, then override with user-specified bindings
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            // Preferred format: Action = KeySpec
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
            // Reversed format: KeySpec = Action
            if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
        }
        Some(map)
    }

    /// Write the current keymap to a configuration file in a human-readable
    /// format, with comments and examples for common key combinations.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# usermgr-tui keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Tab, BackTab, Up, Down, Left, Right, PageUp, PageDown, Delete, ?, j, k, h, l\n");
        buf.push_str("# Actions: Quit, OpenHelp, DeleteSelection, FocusNext, FocusPrev, MoveUp, MoveDown, PageUp, PageDown, Ignore\n\n");

        // Emit a stable, readable subset of current bindings
        let dump = [
            ("q", KeyAction::Quit),
            ("Esc", KeyAction::Ignore),
            ("?", KeyAction::OpenHelp),
            ("Tab", KeyAction::FocusNext),
            ("BackTab", KeyAction::FocusPrev),
            ("Up", KeyAction::MoveUp),
            ("Down", KeyAction::MoveDown),
            ("k", KeyAction::MoveUp),
            ("j", KeyAction::MoveDown),
            ("Left", KeyAction::PageUp),
            ("Right", KeyAction::PageDown),
            ("h", KeyAction::PageUp),
            ("l", KeyAction::PageDown),
            ("PageUp", KeyAction::PageUp),
            ("PageDown", KeyAction::PageDown),
            ("Delete", KeyAction::DeleteSelection),
        ];
        for (k, a) in dump {
            let _ = writeln!(&mut buf, "{} = {}", format_action(a), k);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event (modifiers + code) to its bound action, if any.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        let mm = key.modifiers;
        let code = key.code;
        self.bindings.get(&(mm, code)).copied()
    }

    /// Return a snapshot of all bindings as ((modifiers, code), action) pairs.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Format a key (modifiers + code) into a human-readable spec like
    /// "Ctrl+q", "BackTab".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char('?') => "?".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else if mods.is_empty() {
            base
        } else {
            // Future: format other modifiers when supported
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    // Future: Alt+ / Shift+
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "?" => Char('?'),
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let chars: Vec<char> = rest.chars().collect();
            if chars.len() == 1 {
                KeyCode::Char(chars[0])
            } else {
                return None;
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "OpenHelp" => Some(KeyAction::OpenHelp),
        "DeleteSelection" => Some(KeyAction::DeleteSelection),
        "FocusNext" => Some(KeyAction::FocusNext),
        "FocusPrev" => Some(KeyAction::FocusPrev),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "PageUp" => Some(KeyAction::PageUp),
        "PageDown" => Some(KeyAction::PageDown),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::FocusNext => "FocusNext",
        KeyAction::FocusPrev => "FocusPrev",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Ignore => "Ignore",
    }
}

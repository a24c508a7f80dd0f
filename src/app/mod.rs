//! Application state types and entry glue.
//!
//! Defines the enums and structs that model the TUI state, the request and
//! completion-event types exchanged with the network layer, and helpers to
//! construct defaults and run the application loop (re-exported as `run`).
//!
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::time::Instant;

use crate::api::{User, UserDraft};
use keymap::Keymap;

/// Which panel receives key input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    UsersList,
    CreateForm,
    UpdateForm,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::UsersList => Focus::CreateForm,
            Focus::CreateForm => Focus::UpdateForm,
            Focus::UpdateForm => Focus::UsersList,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::UsersList => Focus::UpdateForm,
            Focus::CreateForm => Focus::UsersList,
            Focus::UpdateForm => Focus::CreateForm,
        }
    }
}

/// Active field of the create form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CreateField {
    #[default]
    Name,
    Email,
}

/// In-progress input for the "Add User" form. Cleared only when the
/// server confirms the create.
#[derive(Clone, Debug, Default)]
pub struct CreateForm {
    pub name: String,
    pub email: String,
    pub field: CreateField,
}

impl CreateForm {
    /// Reset both inputs and put the cursor back on the name field.
    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
        self.field = CreateField::Name;
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            CreateField::Name => CreateField::Email,
            CreateField::Email => CreateField::Name,
        };
    }

    pub fn prev_field(&mut self) {
        // Two fields, so forward and backward meet.
        self.next_field();
    }

    /// The string the active field edits.
    pub fn active_value_mut(&mut self) -> &mut String {
        match self.field {
            CreateField::Name => &mut self.name,
            CreateField::Email => &mut self.email,
        }
    }
}

/// Active field of the update form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UpdateField {
    #[default]
    Id,
    Name,
    Email,
}

/// In-progress input for the "Update User" form. The id is free text;
/// it is sent raw in the URL path and parsed as a number only for the
/// local list patch. Cleared at submission, whatever the outcome.
#[derive(Clone, Debug, Default)]
pub struct UpdateForm {
    pub id: String,
    pub name: String,
    pub email: String,
    pub field: UpdateField,
}

impl UpdateForm {
    /// Reset all inputs and put the cursor back on the id field.
    pub fn clear(&mut self) {
        self.id.clear();
        self.name.clear();
        self.email.clear();
        self.field = UpdateField::Id;
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            UpdateField::Id => UpdateField::Name,
            UpdateField::Name => UpdateField::Email,
            UpdateField::Email => UpdateField::Id,
        };
    }

    pub fn prev_field(&mut self) {
        self.field = match self.field {
            UpdateField::Id => UpdateField::Email,
            UpdateField::Name => UpdateField::Id,
            UpdateField::Email => UpdateField::Name,
        };
    }

    /// The string the active field edits.
    pub fn active_value_mut(&mut self) -> &mut String {
        match self.field {
            UpdateField::Id => &mut self.id,
            UpdateField::Name => &mut self.name,
            UpdateField::Email => &mut self.email,
        }
    }
}

/// A network call to run on the background runtime.
#[derive(Clone, Debug)]
pub enum ApiRequest {
    LoadUsers,
    CreateUser { draft: UserDraft },
    UpdateUser { id: String, draft: UserDraft },
    DeleteUser { id: i64 },
}

/// Outcome of a completed network call, sent back to the UI loop.
///
/// Mutation events carry the values that were sent, since successful
/// update and delete patches use the request's input, not the server's
/// response.
#[derive(Debug)]
pub enum ApiEvent {
    Loaded(std::result::Result<Vec<User>, String>),
    Created(std::result::Result<User, String>),
    Updated {
        id: String,
        draft: UserDraft,
        result: std::result::Result<(), String>,
    },
    Deleted {
        id: i64,
        result: std::result::Result<(), String>,
    },
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub border_focus: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

impl Theme {
    /// Dark default theme.
    #[allow(dead_code)]
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            border_focus: Color::Cyan,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            // text & neutrals
            text: Color::Rgb(0xcd, 0xd6, 0xf4),  // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c), // overlay1
            // accents and chrome
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            border_focus: Color::Rgb(0xb4, 0xbe, 0xfe), // lavender
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "border_focus" => theme.border_focus = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or special names: "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let t = s.trim();
        let lower = t.to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = if let Some(h) = lower.strip_prefix('#') {
            h
        } else {
            lower.as_str()
        };
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        // Minimal header
        buf.push_str("# usermgr-tui theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // For named colors, emit a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("border_focus", self.border_focus);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, look in the standard config
    /// locations, and failing that write one with the defaults and return it.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        let _ = t.write_file(path);
        t
    }
}

/// Resolve a config file to read from the standard locations:
/// `$XDG_CONFIG_HOME/usermgr-tui/<name>`, then `~/.config/usermgr-tui/<name>`.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let mut candidates: Vec<std::path::PathBuf> = Vec::new();
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        candidates.push(std::path::Path::new(&xdg).join("usermgr-tui").join(name));
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.is_empty()
    {
        candidates.push(
            std::path::Path::new(&home)
                .join(".config")
                .join("usermgr-tui")
                .join(name),
        );
    }
    candidates
        .into_iter()
        .find(|p| p.exists())
        .map(|p| p.to_string_lossy().to_string())
}

pub struct AppState {
    pub started_at: Instant,
    /// Shown in the header so it is obvious which server the list mirrors.
    pub api_base: String,
    /// Best-effort cache of server state, patched after each successful call.
    pub users: Vec<User>,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub focus: Focus,
    pub create_form: CreateForm,
    pub update_form: UpdateForm,
    pub show_help: bool,
    pub theme: Theme,
    pub keymap: Keymap,
}

impl AppState {
    /// Fresh state with config loaded. The user list starts empty until the
    /// first load completes.
    pub fn new(api_base: String) -> Self {
        Self {
            started_at: Instant::now(),
            api_base,
            users: Vec::new(),
            selected_index: 0,
            rows_per_page: 10,
            focus: Focus::UsersList,
            create_form: CreateForm::default(),
            update_form: UpdateForm::default(),
            show_help: false,
            theme: Theme::load_or_init("theme.conf"),
            keymap: Keymap::load_or_init("keybinds.conf"),
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

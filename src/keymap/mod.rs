use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Logical editor actions a key can be bound to. The front-end resolves
/// these into core commands (some, like `Recolor`, go through a prompt
/// first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PerformAction,
    Undo,
    NextColor,
    PrevColor,
    NextTool,
    PrevTool,
    ToolPoint,
    ToolStroke,
    ToolBucket,
    ToolLine,
    ToolRect,
    ToolEllipse,
    ToolPicker,
    ToggleMirrorH,
    ToggleMirrorV,
    MirrorLeft,
    MirrorRight,
    MirrorUp,
    MirrorDown,
    Recolor,
    ExportPalette,
    Reset,
    QuitSave,
    QuitConfirm,
}

/// action_name -> Action, the names accepted in keymap files.
const ACTION_NAMES: &[(&str, Action)] = &[
    ("move_up", Action::MoveUp),
    ("move_down", Action::MoveDown),
    ("move_left", Action::MoveLeft),
    ("move_right", Action::MoveRight),
    ("perform_action", Action::PerformAction),
    ("undo", Action::Undo),
    ("next_color", Action::NextColor),
    ("prev_color", Action::PrevColor),
    ("next_tool", Action::NextTool),
    ("prev_tool", Action::PrevTool),
    ("tool_point", Action::ToolPoint),
    ("tool_stroke", Action::ToolStroke),
    ("tool_bucket", Action::ToolBucket),
    ("tool_line", Action::ToolLine),
    ("tool_rect", Action::ToolRect),
    ("tool_ellipse", Action::ToolEllipse),
    ("tool_picker", Action::ToolPicker),
    ("toggle_mirror_h", Action::ToggleMirrorH),
    ("toggle_mirror_v", Action::ToggleMirrorV),
    ("mirror_left", Action::MirrorLeft),
    ("mirror_right", Action::MirrorRight),
    ("mirror_up", Action::MirrorUp),
    ("mirror_down", Action::MirrorDown),
    ("recolor", Action::Recolor),
    ("export_palette", Action::ExportPalette),
    ("reset", Action::Reset),
    ("quit_save", Action::QuitSave),
    ("quit_confirm", Action::QuitConfirm),
];

/// Backend-independent key token. The terminal front-end translates its
/// own key events into these before lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Tab,
}

#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("failed to read keymap file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("line {line}: missing '::' separator")]
    MissingSeparator { line: usize },
    #[error("line {line}: unknown action '{name}'")]
    UnknownAction { line: usize, name: String },
    #[error("line {line}: unknown key alias '{token}'")]
    UnknownKey { line: usize, token: String },
}

/// Key bindings: `action_name::key1,key2,...` lines, one action per line.
/// Keys are single characters or named aliases (`space`, `enter`, `up`,
/// `down`, `left`, `right`, `esc`, `tab`). Later lines win on conflicts.
#[derive(Debug)]
pub struct Keymap {
    bindings: HashMap<KeyToken, Action>,
}

impl Keymap {
    /// The built-in bindings, used when no keymap file is found.
    pub fn defaults() -> Self {
        let text = "\
move_up::w,up
move_down::s,down
move_left::a,left
move_right::d,right
perform_action::space,enter
undo::u
next_color::=
prev_color::-
next_tool::t
prev_tool::T
tool_point::1
tool_stroke::2
tool_bucket::3
tool_line::4
tool_rect::5
tool_ellipse::6
tool_picker::7
toggle_mirror_h::h
toggle_mirror_v::v
mirror_left::[
mirror_right::]
mirror_up::{
mirror_down::}
recolor::c
export_palette::p
reset::r
quit_save::q
quit_confirm::Q
";
        Self::parse(text).expect("built-in keymap is valid")
    }

    pub fn parse(text: &str) -> Result<Self, KeymapError> {
        let mut bindings = HashMap::new();
        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (name, keys) = line
                .split_once("::")
                .ok_or(KeymapError::MissingSeparator { line: line_no + 1 })?;

            let action = ACTION_NAMES
                .iter()
                .find(|(n, _)| *n == name.trim())
                .map(|(_, a)| *a)
                .ok_or_else(|| KeymapError::UnknownAction {
                    line: line_no + 1,
                    name: name.trim().to_string(),
                })?;

            for token in keys.split(',') {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                let key = parse_key_token(token).ok_or_else(|| KeymapError::UnknownKey {
                    line: line_no + 1,
                    token: token.to_string(),
                })?;
                bindings.insert(key, action);
            }
        }
        Ok(Self { bindings })
    }

    pub fn load(path: &Path) -> Result<Self, KeymapError> {
        let content = fs::read_to_string(path).map_err(|source| KeymapError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Explicit path must parse; otherwise the search paths are tried and
    /// a missing file falls back to the built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, KeymapError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        for path in Self::search_paths() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::defaults())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("pixtty.keys")];
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "pixtty") {
            paths.push(proj_dirs.config_dir().join("pixtty.keys"));
        }
        paths
    }

    pub fn resolve(&self, key: KeyToken) -> Option<Action> {
        self.bindings.get(&key).copied()
    }
}

fn parse_key_token(token: &str) -> Option<KeyToken> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyToken::Char(c));
    }
    match token.to_ascii_lowercase().as_str() {
        "space" => Some(KeyToken::Char(' ')),
        "enter" | "return" => Some(KeyToken::Enter),
        "up" => Some(KeyToken::Up),
        "down" => Some(KeyToken::Down),
        "left" => Some(KeyToken::Left),
        "right" => Some(KeyToken::Right),
        "esc" | "escape" => Some(KeyToken::Escape),
        "tab" => Some(KeyToken::Tab),
        _ => None,
    }
}

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::image_io;
use crate::keymap::{Action, KeyToken, Keymap};
use crate::palette::parse_hex_color;
use crate::session::{Command, Control, PersistRequest, Session};
use crate::theme::Theme;
use crate::viewport::{CellFlags, Frame, Renderer};

const SIGINT: i32 = 2;

/// Raw-mode guard: restores the terminal even on early return.
struct RawScreen;

impl RawScreen {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for RawScreen {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking event loop: one key, one state update, one frame. Returns on
/// quit; Ctrl+C takes the emergency-save path first.
pub fn run(
    session: &mut Session,
    renderer: &Renderer,
    theme: &Theme,
    keymap: &Keymap,
    output: &Path,
) -> Result<()> {
    let screen = RawScreen::enter()?;
    let mut status: Option<String> = None;

    loop {
        let frame = renderer.render(session, theme);
        draw_frame(&frame, session, status.take().as_deref())?;

        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        if is_interrupt(&key) {
            let emergency = image_io::emergency_path(output, SIGINT);
            if !emergency.exists() {
                if let Err(err) = image_io::save_image(&emergency, &session.canvas) {
                    status = Some(format!("emergency save failed: {err}"));
                    continue;
                }
            }
            return Ok(());
        }

        let Some(token) = key_token(&key) else {
            continue;
        };
        let Some(action) = keymap.resolve(token) else {
            continue;
        };

        let command = match action {
            Action::Recolor => match prompt(&screen, "Enter hex color (e.g. #ff5733): ")? {
                Some(text) => match parse_hex_color(text.trim()) {
                    Some(rgb) => Command::Recolor(rgb),
                    None => {
                        status = Some(format!("'{}' is not a hex color", text.trim()));
                        continue;
                    }
                },
                None => continue,
            },
            Action::Reset => {
                if confirm(&screen, "Reset canvas? (y/N): ")? {
                    Command::Reset
                } else {
                    continue;
                }
            }
            other => match resolve_command(other) {
                Some(command) => command,
                None => continue,
            },
        };

        let outcome = session.apply(command);

        match outcome.persist {
            Some(PersistRequest::Checkpoint) => {
                let checkpoint = image_io::checkpoint_path(output);
                if let Err(err) = image_io::save_image(&checkpoint, &session.canvas) {
                    // the canvas is untouched; report and keep editing
                    status = Some(format!("autosave failed: {err}"));
                }
            }
            Some(PersistRequest::Palette) => {
                if let Some(path) = prompt(&screen, "Export palette to (default 'palette.hex'): ")? {
                    let path = if path.trim().is_empty() {
                        "palette.hex".to_string()
                    } else {
                        path.trim().to_string()
                    };
                    match session.palette.export_hex_file(Path::new(&path)) {
                        Ok(()) => status = Some(format!("palette written to {path}")),
                        Err(err) => status = Some(format!("palette export failed: {err}")),
                    }
                }
            }
            None => {}
        }

        if let Control::Quit { save, confirm: ask } = outcome.control {
            let mut do_save = save;
            if ask {
                do_save = confirm(&screen, &format!("Save changes to {}? (y/N): ", output.display()))?;
            }
            if do_save {
                if let Err(err) = image_io::save_image(output, &session.canvas) {
                    status = Some(format!("save failed: {err}"));
                    continue;
                }
            }
            return Ok(());
        }
    }
}

/// Direct action-to-command mapping; prompt-backed actions return None and
/// are handled in the event loop.
fn resolve_command(action: Action) -> Option<Command> {
    let command = match action {
        Action::MoveUp => Command::MoveUp,
        Action::MoveDown => Command::MoveDown,
        Action::MoveLeft => Command::MoveLeft,
        Action::MoveRight => Command::MoveRight,
        Action::PerformAction => Command::Commit,
        Action::Undo => Command::Undo,
        Action::NextColor => Command::NextColor,
        Action::PrevColor => Command::PrevColor,
        Action::NextTool => Command::NextTool,
        Action::PrevTool => Command::PrevTool,
        Action::ToolPoint => Command::SelectTool(0),
        Action::ToolStroke => Command::SelectTool(1),
        Action::ToolBucket => Command::SelectTool(2),
        Action::ToolLine => Command::SelectTool(3),
        Action::ToolRect => Command::SelectTool(4),
        Action::ToolEllipse => Command::SelectTool(5),
        Action::ToolPicker => Command::SelectTool(6),
        Action::ToggleMirrorH => Command::ToggleMirrorH,
        Action::ToggleMirrorV => Command::ToggleMirrorV,
        Action::MirrorLeft => Command::ShiftMirrorX(-1),
        Action::MirrorRight => Command::ShiftMirrorX(1),
        Action::MirrorUp => Command::ShiftMirrorY(-1),
        Action::MirrorDown => Command::ShiftMirrorY(1),
        Action::ExportPalette => Command::ExportPalette,
        Action::QuitSave => Command::QuitSave,
        Action::QuitConfirm => Command::QuitConfirm,
        Action::Recolor | Action::Reset => return None,
    };
    Some(command)
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn key_token(key: &KeyEvent) -> Option<KeyToken> {
    match key.code {
        KeyCode::Char(c) => Some(KeyToken::Char(c)),
        KeyCode::Up => Some(KeyToken::Up),
        KeyCode::Down => Some(KeyToken::Down),
        KeyCode::Left => Some(KeyToken::Left),
        KeyCode::Right => Some(KeyToken::Right),
        KeyCode::Enter => Some(KeyToken::Enter),
        KeyCode::Esc => Some(KeyToken::Escape),
        KeyCode::Tab => Some(KeyToken::Tab),
        _ => None,
    }
}

fn draw_frame(frame: &Frame, session: &Session, status: Option<&str>) -> Result<()> {
    let mut stdout = io::stdout();
    queue!(stdout, Clear(ClearType::All))?;

    let grid = &frame.grid;
    for y in 0..grid.height() {
        queue!(stdout, cursor::MoveTo(0, y as u16))?;
        for x in 0..grid.width() {
            let Some(cell) = grid.get_cell(x, y) else {
                continue;
            };
            if cell.flags.contains(CellFlags::REVERSE) {
                queue!(stdout, SetAttribute(Attribute::Reverse))?;
            }
            match cell.color {
                Some(index) => {
                    let (r, g, b) = session.palette.get(index as usize);
                    queue!(stdout, SetForegroundColor(Color::Rgb { r, g, b }))?;
                }
                None => queue!(stdout, ResetColor)?,
            }
            queue!(stdout, crossterm::style::Print(cell.glyph))?;
            if cell.flags.contains(CellFlags::REVERSE) {
                queue!(stdout, SetAttribute(Attribute::NoReverse))?;
            }
        }
        queue!(stdout, ResetColor)?;
    }

    if let Some(message) = status {
        queue!(
            stdout,
            cursor::MoveTo(0, grid.height() as u16),
            crossterm::style::Print(message)
        )?;
    }

    let (cx, cy) = frame.cursor;
    queue!(stdout, cursor::MoveTo(cx as u16, cy as u16))?;
    stdout.flush()?;
    Ok(())
}

/// Drops to cooked mode for a single line of input. Returns None on EOF.
fn prompt(_screen: &RawScreen, label: &str) -> Result<Option<String>> {
    terminal::disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0), Clear(ClearType::CurrentLine), cursor::Show)?;
    write!(stdout, "{label}")?;
    stdout.flush()?;

    let mut line = String::new();
    let read = io::stdin().read_line(&mut line)?;

    execute!(stdout, cursor::Hide)?;
    terminal::enable_raw_mode()?;

    if read == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn confirm(screen: &RawScreen, label: &str) -> Result<bool> {
    Ok(prompt(screen, label)?
        .map(|answer| answer.trim().eq_ignore_ascii_case("y"))
        .unwrap_or(false))
}
